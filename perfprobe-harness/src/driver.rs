use perfprobe_common::{ProbeError, Result};
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tokio::sync::oneshot;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::sampler::{self, Attempt};

/// Pool of successful durations from every round of one run, plus the parameters that produced it.
///
/// Samples are kept in arrival order, which is meaningless within a round; treat them as a multiset.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    samples: Vec<f64>,
    concurrency: usize,
    iterations: usize,
    failures: usize,
}

impl SampleSet {
    pub fn new(samples: Vec<f64>, concurrency: usize, iterations: usize, failures: usize) -> Self {
        Self { samples, concurrency, iterations, failures }
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn failures(&self) -> usize {
        self.failures
    }

    /// Invocations made: successes plus failures.
    pub fn attempts(&self) -> usize {
        self.samples.len() + self.failures
    }
}

/// Reject parameters that would make a run meaningless. Called before any round starts.
pub fn check_params(concurrency: usize, iterations: usize) -> Result<()> {
    if concurrency == 0 {
        return Err(ProbeError::InvalidConcurrency(concurrency));
    }
    if iterations == 0 {
        return Err(ProbeError::InvalidIterations(iterations));
    }
    Ok(())
}

/// Wrap a blocking operation so each launch times one call on its own OS thread.
///
/// Every call of a round gets a dedicated thread, so the whole round runs at once however
/// large `concurrency` is. A call that panics, or whose thread cannot be spawned, is a
/// failed attempt.
pub fn launch_blocking<F, T, E>(op: F) -> impl Fn(&mut JoinSet<Attempt>)
where
    F: Fn() -> std::result::Result<T, E> + Send + Sync + 'static,
    T: 'static,
    E: Display + 'static,
{
    let op = Arc::new(op);
    move |round: &mut JoinSet<Attempt>| {
        let op = Arc::clone(&op);
        let (tx, rx) = oneshot::channel();
        let spawned = thread::Builder::new().name("perfprobe-worker".to_string()).spawn(move || {
            tx.send(sampler::sample_blocking(&*op)).ok();
        });
        round.spawn(async move {
            if let Err(e) = spawned {
                warn!(error = %e, "cannot spawn worker thread");
                return Attempt::Failed(format!("cannot spawn worker thread: {e}"));
            }
            rx.await.unwrap_or_else(|_| {
                warn!("worker thread panicked");
                Attempt::Failed("worker thread panicked".to_string())
            })
        });
    }
}

/// Wrap an async operation so each launch times one call as its own task.
pub fn launch_async<F, Fut, T, E>(op: F) -> impl Fn(&mut JoinSet<Attempt>)
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Display + Send + 'static,
{
    let op = Arc::new(op);
    move |round: &mut JoinSet<Attempt>| {
        let op = Arc::clone(&op);
        round.spawn(async move { sampler::sample(&*op).await });
    }
}

/// Execute `iterations` sequential rounds of `concurrency` parallel invocations.
///
/// `launch` must add exactly one task to the round it is given. A round ends only when every
/// task in it has finished; failed and panicked tasks are counted and logged, never raised.
pub async fn run<L>(launch: &L, concurrency: usize, iterations: usize) -> Result<SampleSet>
where
    L: Fn(&mut JoinSet<Attempt>),
{
    check_params(concurrency, iterations)?;
    info!(concurrency, iterations, "starting run");

    let mut samples = Vec::new();
    let mut failures = 0;

    for round in 1..=iterations {
        debug!(round, iterations, "launching round");
        let round_start = Instant::now();

        samples.reserve(concurrency);
        let mut tasks = JoinSet::new();
        for _ in 0..concurrency {
            launch(&mut tasks);
        }

        let mut completed = 0usize;
        let mut failed = 0usize;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Attempt::Completed(ms)) => {
                    samples.push(ms);
                    completed += 1;
                }
                Ok(Attempt::Failed(_)) => failed += 1,
                Err(e) => {
                    warn!(round, error = %e, "task execution failed");
                    failed += 1;
                }
            }
        }
        failures += failed;

        info!(
            round,
            iterations,
            completed,
            failed,
            elapsed_ms = round_start.elapsed().as_secs_f64() * 1_000.0,
            "round complete"
        );
    }

    if samples.is_empty() {
        warn!(concurrency, iterations, failures, "every attempt failed; no samples collected");
    }

    Ok(SampleSet::new(samples, concurrency, iterations, failures))
}
