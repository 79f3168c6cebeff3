//! Concurrent latency measurement.
//!
//! A run is `iterations` sequential rounds, each fanning out `concurrency` parallel calls of
//! one operation and waiting for all of them. Successful call durations are pooled, reduced
//! to summary statistics and compared against latency thresholds.

pub mod config;
pub mod driver;
pub mod harness;
pub mod logging;
pub mod report;
pub mod sampler;
pub mod stats;
pub mod validate;

pub use driver::SampleSet;
pub use harness::{HarnessConfig, PerfHarness};
pub use sampler::Attempt;
pub use stats::{LatencySummary, Outcome, StatisticsResult, StatsReducer};
pub use validate::{Metric, ThresholdCheck, Thresholds, Verdict};
