use serde::Serialize;

use crate::driver::SampleSet;

/// Descriptive statistics over a non-empty set of durations (all values in milliseconds).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatencySummary {
    pub count: usize,
    pub min_ms: f64,
    pub max_ms: f64,
    pub mean_ms: f64,
    pub median_ms: f64,
    pub std_dev_ms: f64,
    pub p50_ms: f64,
    pub p90_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Every attempt failed; there is nothing to summarise.
    NoData,
    Measured(LatencySummary),
}

/// Snapshot of one run: the parameters that drove it and what it measured.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsResult {
    pub concurrency: usize,
    pub iterations: usize,
    pub attempts: usize,
    pub failures: usize,
    pub outcome: Outcome,
}

impl StatisticsResult {
    pub fn summary(&self) -> Option<&LatencySummary> {
        match &self.outcome {
            Outcome::Measured(summary) => Some(summary),
            Outcome::NoData => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self.outcome, Outcome::NoData)
    }
}

/// Reduces pooled samples into a [`StatisticsResult`]. Holds no state between calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatsReducer;

impl StatsReducer {
    pub fn new() -> Self {
        Self
    }

    pub fn reduce(&self, set: &SampleSet) -> StatisticsResult {
        let outcome = match self.summarize(set.samples()) {
            Some(summary) => Outcome::Measured(summary),
            None => Outcome::NoData,
        };
        StatisticsResult {
            concurrency: set.concurrency(),
            iterations: set.iterations(),
            attempts: set.attempts(),
            failures: set.failures(),
            outcome,
        }
    }

    /// Summarise raw durations; `None` when `samples` is empty.
    pub fn summarize(&self, samples: &[f64]) -> Option<LatencySummary> {
        if samples.is_empty() {
            return None;
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let n = sorted.len();

        // Accumulate offsets from the minimum so constant input yields its value exactly.
        let base = sorted[0];
        let mean = base + sorted.iter().map(|x| x - base).sum::<f64>() / n as f64;
        let std_dev = if n > 1 {
            let ss: f64 = sorted.iter().map(|x| (x - mean).powi(2)).sum();
            (ss / (n - 1) as f64).sqrt()
        } else {
            0.0
        };

        Some(LatencySummary {
            count: n,
            min_ms: sorted[0],
            max_ms: sorted[n - 1],
            mean_ms: mean,
            median_ms: median(&sorted),
            std_dev_ms: std_dev,
            p50_ms: percentile(&sorted, 50.0),
            p90_ms: percentile(&sorted, 90.0),
            p95_ms: percentile(&sorted, 95.0),
            p99_ms: percentile(&sorted, 99.0),
        })
    }
}

fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    let mid = n / 2;
    if n % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Rank-interpolated percentile of ascending `sorted` data, `p` in `0..=100`.
///
/// The fractional rank is `k = (n - 1) * p / 100`; the result interpolates linearly between
/// `sorted[floor(k)]` and the next element. Returns 0.0 for an empty slice.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    let p = p.clamp(0.0, 100.0);
    let k = (n - 1) as f64 * p / 100.0;
    let f = k.floor() as usize;
    let c = (f + 1).min(n - 1);
    if f == c {
        return sorted[f];
    }
    sorted[f] * (c as f64 - k) + sorted[c] * (k - f as f64)
}
