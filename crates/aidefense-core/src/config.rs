//! Configuration module
//!
//! SDK-level configuration (service endpoint, request timeout) plus the
//! polling parameters used by the scan lifecycle. Polling values are
//! injected per client instance so tests can shrink the wait interval
//! instead of sleeping through real poll cycles.

use std::env;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.security.cisco.com";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
const DEFAULT_RETRY_COUNT_FOR_SCANNING: u32 = 30;
const DEFAULT_WAIT_SECS_BETWEEN_SCAN_CHECKS: u64 = 2;

/// SDK configuration shared by all API calls.
#[derive(Clone, Debug)]
pub struct Config {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Read configuration from the environment: `AIDEFENSE_BASE_URL` and
    /// `AIDEFENSE_TIMEOUT_SECS`. Missing or unparsable values fall back to
    /// defaults.
    pub fn from_env() -> Self {
        let base_url =
            env::var("AIDEFENSE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout_secs = env::var("AIDEFENSE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        Self {
            base_url,
            request_timeout: Duration::from_secs(timeout_secs),
        }
    }
}

/// Bounded-polling parameters for the scan lifecycle. The worst-case wait
/// for a scan is `retry_count * wait_interval`.
#[derive(Clone, Debug)]
pub struct ScanPollConfig {
    /// Number of `get_scan` status checks before giving up.
    pub retry_count: u32,
    /// Fixed sleep between successive status checks.
    pub wait_interval: Duration,
}

impl Default for ScanPollConfig {
    fn default() -> Self {
        Self {
            retry_count: DEFAULT_RETRY_COUNT_FOR_SCANNING,
            wait_interval: Duration::from_secs(DEFAULT_WAIT_SECS_BETWEEN_SCAN_CHECKS),
        }
    }
}
