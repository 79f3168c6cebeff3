use perfprobe_common::ProbeError;
use perfprobe_harness::logging::init_logging;
use perfprobe_harness::{HarnessConfig, Outcome, PerfHarness, Thresholds};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

fn no_cooldown() -> PerfHarness {
    PerfHarness::new(HarnessConfig { cooldown: Duration::ZERO })
}

#[test]
fn test_default_config_has_cooldown() {
    assert_eq!(PerfHarness::default().config().cooldown, Duration::from_secs(1));
}

#[test]
fn test_init_logging_twice_is_harmless() {
    init_logging(false, true);
    assert!(!init_logging(false, true));
}

#[tokio::test]
async fn test_single_caller_ten_iterations() {
    let harness = no_cooldown();
    let result = harness.measure_blocking(|| Ok::<_, String>(()), 1, 10).await.unwrap();

    assert_eq!(result.concurrency, 1);
    assert_eq!(result.iterations, 10);
    assert_eq!(result.attempts, 10);
    let s = result.summary().expect("expected data");
    assert_eq!(s.count, 10);
    assert!(s.max_ms >= s.min_ms);
    assert!(s.min_ms >= 0.0);
}

#[tokio::test]
async fn test_async_operation_measured() {
    let harness = no_cooldown();
    let op = || async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        Ok::<_, String>(())
    };
    let result = harness.measure(op, 4, 2).await.unwrap();

    let s = result.summary().unwrap();
    assert_eq!(s.count, 8);
    assert!(s.min_ms >= 10.0);
    assert!(harness.validate(&result, &Thresholds::uniform(5_000.0)).passed);
}

#[tokio::test]
async fn test_exhausted_run_fails_validation() {
    let harness = no_cooldown();
    let result = harness
        .measure(|| async { Err::<(), _>("HTTP 503: unavailable") }, 3, 2)
        .await
        .expect("measurement failures must not surface as errors");

    assert_eq!(result.outcome, Outcome::NoData);
    assert_eq!(result.failures, 6);
    let verdict = harness.validate(&result, &Thresholds::uniform(5_000.0));
    assert!(!verdict.passed);
    assert!(verdict.no_data);
}

#[tokio::test]
async fn test_invalid_parameters_are_errors() {
    let harness = no_cooldown();
    let err = harness.measure_blocking(|| Ok::<_, String>(()), 0, 1).await.unwrap_err();
    assert_eq!(err, ProbeError::InvalidConcurrency(0));
    assert!(err.is_configuration());

    let err = harness.measure(|| async { Ok::<_, String>(()) }, 1, 0).await.unwrap_err();
    assert_eq!(err, ProbeError::InvalidIterations(0));
}

#[tokio::test]
async fn test_sweep_measures_each_level_in_order() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let op = move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok::<_, String>(())
    };

    let results = no_cooldown().sweep_blocking(op, &[1, 3, 2], 2).await.unwrap();

    let levels: Vec<usize> = results.iter().map(|r| r.concurrency).collect();
    assert_eq!(levels, vec![1, 3, 2]);
    assert_eq!(calls.load(Ordering::SeqCst), (1 + 3 + 2) * 2);
    assert!(results.iter().all(|r| r.summary().map(|s| s.count) == Some(r.concurrency * 2)));
}

#[tokio::test]
async fn test_sweep_validates_every_level_before_running() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let op = move || {
        counter.fetch_add(1, Ordering::SeqCst);
        async { Ok::<_, String>(()) }
    };

    let err = no_cooldown().sweep(op, &[1, 0, 2], 1).await.unwrap_err();
    assert_eq!(err, ProbeError::InvalidConcurrency(0));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let err = no_cooldown().sweep_blocking(|| Ok::<_, String>(()), &[], 1).await.unwrap_err();
    assert_eq!(err, ProbeError::EmptySweep);
}

#[tokio::test]
async fn test_sweep_pauses_between_levels_only() {
    let starts = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&starts);
    let op = move || {
        recorder.lock().unwrap().push(Instant::now());
        Ok::<_, String>(())
    };

    let harness = PerfHarness::new(HarnessConfig { cooldown: Duration::from_millis(80) });
    let begun = Instant::now();
    harness.sweep_blocking(op, &[1, 1], 1).await.unwrap();
    let total = begun.elapsed();

    let starts = starts.lock().unwrap();
    assert_eq!(starts.len(), 2);
    assert!(starts[1].duration_since(starts[0]) >= Duration::from_millis(80));
    // No trailing pause after the last level.
    assert!(total < Duration::from_millis(160), "sweep took {total:?}");
}

#[tokio::test]
async fn test_harness_instances_are_independent() {
    let a = no_cooldown();
    let b = no_cooldown();

    let (ra, rb) = tokio::join!(
        a.measure_blocking(|| Ok::<_, String>(()), 2, 3),
        b.measure_blocking(|| Err::<(), _>("down"), 2, 3),
    );

    assert_eq!(ra.unwrap().summary().unwrap().count, 6);
    assert!(rb.unwrap().is_no_data());
}
