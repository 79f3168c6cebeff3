use std::fmt::Write;
use tracing::info;

use crate::stats::StatisticsResult;
use crate::validate::Verdict;

const RULE_WIDTH: usize = 80;

/// Human-readable block describing one run. Not a machine format.
pub fn format_statistics(result: &StatisticsResult) -> Vec<String> {
    let mut lines = vec![
        format!("Concurrency:   {}", result.concurrency),
        format!("Iterations:    {}", result.iterations),
        format!("Attempts:      {}", result.attempts),
        format!("Failures:      {}", result.failures),
    ];
    match result.summary() {
        None => lines.push("No data: every attempt failed".to_string()),
        Some(s) => {
            lines.push(format!("Samples:       {}", s.count));
            lines.push(format!("Min:           {:.2} ms", s.min_ms));
            lines.push(format!("Max:           {:.2} ms", s.max_ms));
            lines.push(format!("Mean:          {:.2} ms", s.mean_ms));
            lines.push(format!("Median:        {:.2} ms", s.median_ms));
            lines.push(format!("Std dev:       {:.2} ms", s.std_dev_ms));
            lines.push(format!("P50:           {:.2} ms", s.p50_ms));
            lines.push(format!("P90:           {:.2} ms", s.p90_ms));
            lines.push(format!("P95:           {:.2} ms", s.p95_ms));
            lines.push(format!("P99:           {:.2} ms", s.p99_ms));
        }
    }
    lines
}

pub fn log_statistics(result: &StatisticsResult) {
    info!("{}", "=".repeat(RULE_WIDTH));
    for line in format_statistics(result) {
        info!("{line}");
    }
    info!("{}", "=".repeat(RULE_WIDTH));
}

/// Table of mean/max/p95/p99 per concurrency level, rows ordered by concurrency.
pub fn comparison_table(results: &[StatisticsResult]) -> String {
    let mut rows: Vec<&StatisticsResult> = results.iter().collect();
    rows.sort_by_key(|r| r.concurrency);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<12} {:>12} {:>12} {:>12} {:>12} {:>9}",
        "Concurrency", "Mean(ms)", "Max(ms)", "P95(ms)", "P99(ms)", "Failures"
    );
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    for r in rows {
        match r.summary() {
            Some(s) => {
                let _ = writeln!(
                    out,
                    "{:<12} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>9}",
                    r.concurrency, s.mean_ms, s.max_ms, s.p95_ms, s.p99_ms, r.failures
                );
            }
            None => {
                let _ = writeln!(
                    out,
                    "{:<12} {:>12} {:>12} {:>12} {:>12} {:>9}",
                    r.concurrency, "-", "-", "-", "-", r.failures
                );
            }
        }
    }
    out
}

pub fn log_comparison(results: &[StatisticsResult]) {
    info!("{}", "=".repeat(RULE_WIDTH));
    info!("Concurrency comparison:");
    for line in comparison_table(results).lines() {
        info!("{line}");
    }
    info!("{}", "=".repeat(RULE_WIDTH));
}

/// One line per threshold check, or a single no-data line.
pub fn format_verdict(verdict: &Verdict) -> Vec<String> {
    if verdict.no_data {
        return vec!["no samples collected ✗".to_string()];
    }
    if verdict.checks.is_empty() {
        return vec!["no thresholds configured ✓".to_string()];
    }
    verdict
        .checks
        .iter()
        .map(|c| {
            format!(
                "{:<5} {:>10.2} ms <= {:>10.2} ms  {}",
                c.metric,
                c.observed_ms,
                c.limit_ms,
                if c.passed { "✓" } else { "✗" }
            )
        })
        .collect()
}
