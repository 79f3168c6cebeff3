use perfprobe_common::{ProbeError, DEFAULT_CONCURRENCY_LEVELS, DEFAULT_ITERATIONS, DEFAULT_MAX_WAIT_MS};
use perfprobe_harness::config::{Endpoint, ProbeConfig, DEFAULT_BASE_URL};
use perfprobe_harness::Thresholds;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn write_config(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create tmpfile");
    file.write_all(json.as_bytes()).expect("write tmpfile");
    file
}

#[test]
fn test_defaults() {
    let config = ProbeConfig::default();

    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.endpoint, Endpoint::Books);
    assert_eq!(config.concurrency_levels, DEFAULT_CONCURRENCY_LEVELS.to_vec());
    assert_eq!(config.iterations, DEFAULT_ITERATIONS);
    assert_eq!(config.thresholds, Thresholds::uniform(DEFAULT_MAX_WAIT_MS));
    assert_eq!(config.validate(), Ok(()));
}

#[test]
fn test_load_partial_file_fills_defaults() {
    let file = write_config(
        r#"{
            "base_url": "http://10.0.0.5:8443",
            "endpoint": "search",
            "keyword": "rust",
            "concurrency_levels": [2, 4],
            "thresholds": {"max_avg_ms": 800.0}
        }"#,
    );

    let config = ProbeConfig::load(file.path()).expect("load failed");

    assert_eq!(config.base_url, "http://10.0.0.5:8443");
    assert_eq!(config.endpoint, Endpoint::Search);
    assert_eq!(config.keyword, "rust");
    assert_eq!(config.concurrency_levels, vec![2, 4]);
    assert_eq!(config.iterations, DEFAULT_ITERATIONS);
    assert_eq!(config.thresholds, Thresholds { max_avg_ms: Some(800.0), ..Thresholds::default() });
}

#[test]
fn test_load_missing_file_is_config_error() {
    let err = ProbeConfig::load(std::path::Path::new("/nonexistent/perfprobe.json")).unwrap_err();
    assert!(matches!(err, ProbeError::Config(msg) if msg.contains("cannot read")));
}

#[test]
fn test_load_malformed_file_is_config_error() {
    let file = write_config("{ not json");
    let err = ProbeConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, ProbeError::Config(msg) if msg.contains("cannot parse")));
}

#[test]
fn test_validate_rejects_bad_values() {
    let bad_url = ProbeConfig { base_url: "localhost:8443".to_string(), ..ProbeConfig::default() };
    assert!(matches!(bad_url.validate(), Err(ProbeError::Config(_))));

    let no_levels = ProbeConfig { concurrency_levels: vec![], ..ProbeConfig::default() };
    assert_eq!(no_levels.validate(), Err(ProbeError::EmptySweep));

    let zero_level = ProbeConfig { concurrency_levels: vec![1, 0], ..ProbeConfig::default() };
    assert_eq!(zero_level.validate(), Err(ProbeError::InvalidConcurrency(0)));

    let zero_iterations = ProbeConfig { iterations: 0, ..ProbeConfig::default() };
    assert_eq!(zero_iterations.validate(), Err(ProbeError::InvalidIterations(0)));

    let zero_timeout = ProbeConfig { request_timeout_ms: 0, ..ProbeConfig::default() };
    assert!(matches!(zero_timeout.validate(), Err(ProbeError::Config(_))));
}

#[test]
fn test_derived_configs() {
    let config = ProbeConfig { cooldown_ms: 250, request_timeout_ms: 1_500, ..ProbeConfig::default() };

    assert_eq!(config.harness_config().cooldown, Duration::from_millis(250));
    let client = config.client_config();
    assert_eq!(client.base_url, DEFAULT_BASE_URL);
    assert_eq!(client.timeout, Duration::from_millis(1_500));
}

#[test]
fn test_endpoint_names() {
    assert_eq!(Endpoint::Books.as_name(), "books");
    assert_eq!(Endpoint::Search.as_name(), "search");
}
