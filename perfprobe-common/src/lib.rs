use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Latency ceiling (ms) applied to mean, p95 and p99 when no explicit threshold is configured.
pub const DEFAULT_MAX_WAIT_MS: f64 = 5_000.0;

/// Concurrency levels swept by default: a single caller, then just below, at and above ten.
pub const DEFAULT_CONCURRENCY_LEVELS: [usize; 4] = [1, 9, 10, 11];

pub const DEFAULT_ITERATIONS: usize = 10;

/// Pause between concurrency levels of a sweep.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(1);

/// Per-request timeout used by the HTTP target client.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_PAGE_SIZE: u32 = 18;

/// Error types for perfprobe
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProbeError {
    #[error("Concurrency must be at least 1, got {0}")]
    InvalidConcurrency(usize),

    #[error("Iterations must be at least 1, got {0}")]
    InvalidIterations(usize),

    #[error("At least one concurrency level is required")]
    EmptySweep,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("HTTP {0}: {1}")]
    HttpError(u16, String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ProbeError {
    /// `true` for errors raised because the harness itself was invoked with bad parameters.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ProbeError::InvalidConcurrency(_)
                | ProbeError::InvalidIterations(_)
                | ProbeError::EmptySweep
                | ProbeError::Config(_)
        )
    }
}

/// JSON error envelope returned by the target for all error responses
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// JSON envelope wrapping every successful catalogue response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResult<T> {
    pub code: u16,
    pub message: String,
    pub result: T,
}

impl<T> ApiResult<T> {
    pub fn ok(result: T) -> Self {
        Self { code: 200, message: "success".to_string(), result }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: u64,
    pub title: String,
    pub author: String,
    pub category: String,
}

/// One page of the book listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookPage {
    pub page: u32,
    pub size: u32,
    pub total: u64,
    pub books: Vec<Book>,
}

/// Result type for perfprobe operations
pub type Result<T> = std::result::Result<T, ProbeError>;
