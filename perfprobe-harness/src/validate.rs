use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

use crate::report;
use crate::stats::StatisticsResult;

/// Latency ceilings in milliseconds. `None` means the statistic is not constrained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub max_avg_ms: Option<f64>,
    pub max_p95_ms: Option<f64>,
    pub max_p99_ms: Option<f64>,
}

impl Thresholds {
    /// The same ceiling for mean, p95 and p99.
    pub fn uniform(max_ms: f64) -> Self {
        Self { max_avg_ms: Some(max_ms), max_p95_ms: Some(max_ms), max_p99_ms: Some(max_ms) }
    }

    pub fn is_empty(&self) -> bool {
        self.max_avg_ms.is_none() && self.max_p95_ms.is_none() && self.max_p99_ms.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Mean,
    P95,
    P99,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::Mean => "mean",
            Metric::P95 => "p95",
            Metric::P99 => "p99",
        };
        f.pad(name)
    }
}

/// One `observed <= limit` comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdCheck {
    pub metric: Metric,
    pub observed_ms: f64,
    pub limit_ms: f64,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub passed: bool,
    /// Set when the run produced no samples; such a run never passes.
    pub no_data: bool,
    pub checks: Vec<ThresholdCheck>,
}

impl Verdict {
    pub fn failed_checks(&self) -> impl Iterator<Item = &ThresholdCheck> {
        self.checks.iter().filter(|c| !c.passed)
    }
}

/// Compare `result` against every supplied threshold.
pub fn validate(result: &StatisticsResult, thresholds: &Thresholds) -> Verdict {
    let Some(summary) = result.summary() else {
        warn!(
            concurrency = result.concurrency,
            attempts = result.attempts,
            "validation failed: run produced no samples"
        );
        return Verdict { passed: false, no_data: true, checks: Vec::new() };
    };

    let checks: Vec<ThresholdCheck> = [
        (Metric::Mean, summary.mean_ms, thresholds.max_avg_ms),
        (Metric::P95, summary.p95_ms, thresholds.max_p95_ms),
        (Metric::P99, summary.p99_ms, thresholds.max_p99_ms),
    ]
    .into_iter()
    .filter_map(|(metric, observed_ms, limit)| {
        limit.map(|limit_ms| ThresholdCheck {
            metric,
            observed_ms,
            limit_ms,
            passed: observed_ms <= limit_ms,
        })
    })
    .collect();

    let passed = checks.iter().all(|c| c.passed);
    let verdict = Verdict { passed, no_data: false, checks };

    for line in report::format_verdict(&verdict) {
        if passed {
            info!("{line}");
        } else {
            warn!("{line}");
        }
    }
    if passed {
        info!(concurrency = result.concurrency, "performance requirement met");
    } else {
        warn!(concurrency = result.concurrency, "performance requirement not met");
    }

    verdict
}
