use perfprobe_harness::report::{comparison_table, format_statistics, format_verdict};
use perfprobe_harness::validate::validate;
use perfprobe_harness::{SampleSet, StatisticsResult, StatsReducer, Thresholds};

fn result(concurrency: usize, samples: Vec<f64>, failures: usize) -> StatisticsResult {
    StatsReducer::new().reduce(&SampleSet::new(samples, concurrency, 1, failures))
}

#[test]
fn test_statistics_block_lists_every_metric() {
    let lines = format_statistics(&result(5, vec![10.0, 20.0, 30.0, 40.0, 50.0], 0));

    assert!(lines.contains(&"Concurrency:   5".to_string()));
    assert!(lines.contains(&"Samples:       5".to_string()));
    assert!(lines.contains(&"Mean:          30.00 ms".to_string()));
    assert!(lines.contains(&"P90:           46.00 ms".to_string()));
    assert!(lines.iter().any(|l| l.starts_with("Std dev:")));
}

#[test]
fn test_statistics_block_for_no_data() {
    let lines = format_statistics(&result(2, Vec::new(), 2));

    assert!(lines.contains(&"Failures:      2".to_string()));
    assert!(lines.contains(&"No data: every attempt failed".to_string()));
    assert!(!lines.iter().any(|l| l.starts_with("Mean:")));
}

#[test]
fn test_comparison_table_sorted_by_concurrency() {
    let results = vec![
        result(10, vec![3.0, 5.0], 0),
        result(1, vec![1.0], 0),
        result(9, Vec::new(), 9),
    ];
    let table = comparison_table(&results);
    let rows: Vec<&str> = table.lines().skip(2).collect();

    assert_eq!(rows.len(), 3);
    assert!(rows[0].starts_with("1 "));
    assert!(rows[1].starts_with("9 "));
    assert!(rows[1].contains(" - "));
    assert!(rows[2].starts_with("10 "));
    assert!(rows[2].contains("4.00"));
}

#[test]
fn test_verdict_lines() {
    let measured = result(1, vec![10.0, 20.0, 30.0, 40.0, 50.0], 0);
    let thresholds = Thresholds { max_avg_ms: Some(20.0), ..Thresholds::default() };
    let lines = format_verdict(&validate(&measured, &thresholds));

    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("mean"));
    assert!(lines[0].contains("30.00 ms"));
    assert!(lines[0].ends_with('✗'));

    let lines = format_verdict(&validate(&result(1, Vec::new(), 1), &thresholds));
    assert_eq!(lines, vec!["no samples collected ✗".to_string()]);

    let lines = format_verdict(&validate(&measured, &Thresholds::default()));
    assert_eq!(lines, vec!["no thresholds configured ✓".to_string()]);
}
