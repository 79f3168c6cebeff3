use perfprobe_client::ClientConfig;
use perfprobe_common::{
    ProbeError, Result, DEFAULT_CONCURRENCY_LEVELS, DEFAULT_COOLDOWN, DEFAULT_ITERATIONS, DEFAULT_MAX_WAIT_MS,
    DEFAULT_REQUEST_TIMEOUT,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::driver;
use crate::harness::HarnessConfig;
use crate::validate::Thresholds;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8443";

/// Which catalogue call each attempt issues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Endpoint {
    /// GET /api/books
    #[default]
    Books,
    /// GET /api/books/search
    Search,
}

impl Endpoint {
    pub fn as_name(&self) -> &'static str {
        match self {
            Endpoint::Books => "books",
            Endpoint::Search => "search",
        }
    }
}

/// Settings for a `perfprobe` run, loadable from a JSON file. Absent fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub base_url: String,
    pub endpoint: Endpoint,
    pub keyword: String,
    pub concurrency_levels: Vec<usize>,
    pub iterations: usize,
    pub cooldown_ms: u64,
    pub request_timeout_ms: u64,
    pub thresholds: Thresholds,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoint: Endpoint::Books,
            keyword: "test".to_string(),
            concurrency_levels: DEFAULT_CONCURRENCY_LEVELS.to_vec(),
            iterations: DEFAULT_ITERATIONS,
            cooldown_ms: DEFAULT_COOLDOWN.as_millis() as u64,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT.as_millis() as u64,
            thresholds: Thresholds::uniform(DEFAULT_MAX_WAIT_MS),
        }
    }
}

impl ProbeConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ProbeError::Config(format!("cannot read {}: {e}", path.display())))?;
        serde_json::from_str(&content)
            .map_err(|e| ProbeError::Config(format!("cannot parse {}: {e}", path.display())))
    }

    /// Reject settings the harness would refuse anyway, before any network activity.
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ProbeError::Config(format!(
                "base_url must start with http:// or https://, got {:?}",
                self.base_url
            )));
        }
        if self.concurrency_levels.is_empty() {
            return Err(ProbeError::EmptySweep);
        }
        for &concurrency in &self.concurrency_levels {
            driver::check_params(concurrency, self.iterations)?;
        }
        if self.request_timeout_ms == 0 {
            return Err(ProbeError::Config("request_timeout_ms must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn harness_config(&self) -> HarnessConfig {
        HarnessConfig { cooldown: Duration::from_millis(self.cooldown_ms) }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }
}
