use perfprobe_common::{ProbeError, Result, DEFAULT_COOLDOWN};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::info;

use crate::driver;
use crate::report;
use crate::sampler::Attempt;
use crate::stats::{StatisticsResult, StatsReducer};
use crate::validate::{self, Thresholds, Verdict};

#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Pause between concurrency levels of a sweep. Zero disables it.
    pub cooldown: Duration,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self { cooldown: DEFAULT_COOLDOWN }
    }
}

/// Entry point tying driver, reducer and validator together.
///
/// Each instance is independent; nothing is shared between harnesses beyond the
/// global tracing subscriber.
#[derive(Debug, Clone, Default)]
pub struct PerfHarness {
    config: HarnessConfig,
    reducer: StatsReducer,
}

impl PerfHarness {
    pub fn new(config: HarnessConfig) -> Self {
        Self { config, reducer: StatsReducer::new() }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Time `op` (an async operation) in `iterations` rounds of `concurrency` parallel calls.
    pub async fn measure<F, Fut, T, E>(&self, op: F, concurrency: usize, iterations: usize) -> Result<StatisticsResult>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Display + Send + 'static,
    {
        self.measure_with(&driver::launch_async(op), concurrency, iterations).await
    }

    /// Like [`PerfHarness::measure`] for a blocking operation, each call on its own thread.
    pub async fn measure_blocking<F, T, E>(
        &self,
        op: F,
        concurrency: usize,
        iterations: usize,
    ) -> Result<StatisticsResult>
    where
        F: Fn() -> std::result::Result<T, E> + Send + Sync + 'static,
        T: 'static,
        E: Display + 'static,
    {
        self.measure_with(&driver::launch_blocking(op), concurrency, iterations).await
    }

    /// Measure `op` once per concurrency level, in the order given.
    pub async fn sweep<F, Fut, T, E>(
        &self,
        op: F,
        levels: &[usize],
        iterations: usize,
    ) -> Result<Vec<StatisticsResult>>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Display + Send + 'static,
    {
        self.sweep_with(&driver::launch_async(op), levels, iterations).await
    }

    pub async fn sweep_blocking<F, T, E>(
        &self,
        op: F,
        levels: &[usize],
        iterations: usize,
    ) -> Result<Vec<StatisticsResult>>
    where
        F: Fn() -> std::result::Result<T, E> + Send + Sync + 'static,
        T: 'static,
        E: Display + 'static,
    {
        self.sweep_with(&driver::launch_blocking(op), levels, iterations).await
    }

    pub fn validate(&self, result: &StatisticsResult, thresholds: &Thresholds) -> Verdict {
        validate::validate(result, thresholds)
    }

    async fn measure_with<L>(&self, launch: &L, concurrency: usize, iterations: usize) -> Result<StatisticsResult>
    where
        L: Fn(&mut JoinSet<Attempt>),
    {
        let samples = driver::run(launch, concurrency, iterations).await?;
        let result = self.reducer.reduce(&samples);
        report::log_statistics(&result);
        Ok(result)
    }

    async fn sweep_with<L>(&self, launch: &L, levels: &[usize], iterations: usize) -> Result<Vec<StatisticsResult>>
    where
        L: Fn(&mut JoinSet<Attempt>),
    {
        if levels.is_empty() {
            return Err(ProbeError::EmptySweep);
        }
        for &concurrency in levels {
            driver::check_params(concurrency, iterations)?;
        }

        let mut results = Vec::with_capacity(levels.len());
        for (idx, &concurrency) in levels.iter().enumerate() {
            if idx > 0 && !self.config.cooldown.is_zero() {
                tokio::time::sleep(self.config.cooldown).await;
            }
            info!(level = idx + 1, levels = levels.len(), concurrency, "testing concurrency level");
            results.push(self.measure_with(launch, concurrency, iterations).await?);
        }

        report::log_comparison(&results);
        Ok(results)
    }
}
