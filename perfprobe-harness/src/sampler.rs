use std::fmt::Display;
use std::future::Future;
use std::time::Instant;
use tracing::warn;

/// Outcome of timing a single invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Attempt {
    /// The operation returned `Ok`; wall-clock duration in milliseconds.
    Completed(f64),
    /// The operation returned `Err`; the rendered error.
    Failed(String),
}

impl Attempt {
    pub fn duration_ms(&self) -> Option<f64> {
        match self {
            Attempt::Completed(ms) => Some(*ms),
            Attempt::Failed(_) => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Attempt::Failed(_))
    }
}

/// Run a blocking operation once and time it.
pub fn sample_blocking<F, T, E>(op: &F) -> Attempt
where
    F: Fn() -> Result<T, E>,
    E: Display,
{
    let start = Instant::now();
    let outcome = op();
    let elapsed = elapsed_ms(start);
    settle(outcome, elapsed)
}

/// Invoke an async operation once and time it until its future resolves.
///
/// The clock starts before `op` is called, so synchronous work done while building the
/// future is counted.
pub async fn sample<F, Fut, T, E>(op: &F) -> Attempt
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let start = Instant::now();
    let outcome = op().await;
    let elapsed = elapsed_ms(start);
    settle(outcome, elapsed)
}

fn settle<T, E: Display>(outcome: Result<T, E>, elapsed: f64) -> Attempt {
    match outcome {
        Ok(_) => Attempt::Completed(elapsed),
        Err(e) => {
            let reason = e.to_string();
            warn!(error = %reason, elapsed_ms = elapsed, "operation failed");
            Attempt::Failed(reason)
        }
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1_000.0
}
