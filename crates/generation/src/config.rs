//! Environment-driven configuration.
//!
//! All fields have defaults suitable for local development; override
//! via environment variables (a `.env` file is honored).

use std::time::Duration;

/// Polling parameters for a shot context.
///
/// | Env Var                     | Default |
/// |-----------------------------|---------|
/// | `SHOTFLOW_POLL_INTERVAL_MS` | `3000`  |
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Fixed delay between reconciliation ticks. No backoff: jobs are
    /// expected to finish in seconds to low minutes.
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
        }
    }
}

impl PollConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let interval_ms: u64 = std::env::var("SHOTFLOW_POLL_INTERVAL_MS")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("SHOTFLOW_POLL_INTERVAL_MS must be a valid u64");
        Self {
            interval: Duration::from_millis(interval_ms),
        }
    }
}

/// Connection parameters for the generation backend.
///
/// | Env Var                            | Default                 |
/// |------------------------------------|-------------------------|
/// | `SHOTFLOW_GENERATION_URL`          | `http://localhost:8000` |
/// | `SHOTFLOW_GENERATION_TIMEOUT_SECS` | `30`                    |
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base HTTP URL of the generation service.
    pub base_url: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl BackendConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let base_url = std::env::var("SHOTFLOW_GENERATION_URL")
            .unwrap_or_else(|_| "http://localhost:8000".into());
        let timeout_secs: u64 = std::env::var("SHOTFLOW_GENERATION_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHOTFLOW_GENERATION_TIMEOUT_SECS must be a valid u64");
        Self {
            base_url,
            request_timeout: Duration::from_secs(timeout_secs),
        }
    }
}
