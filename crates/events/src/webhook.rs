//! Webhook forwarding of domain events.
//!
//! [`WebhookForwarder`] subscribes to the [`EventBus`](crate::EventBus)
//! and POSTs each event to an external URL, retrying with exponential
//! backoff. Delivery is best-effort: an event that exhausts its retries
//! is logged and dropped.

use std::time::Duration;

use tokio::sync::broadcast;

use crate::bus::DomainEvent;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tunable delivery parameters.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Total attempts per event (first try included).
    pub max_attempts: u32,
    /// Delay before the first retry; doubles each subsequent retry.
    pub base_delay: Duration,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_secs(1),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Delay before retry number `retry` (0-based): `base * 2^retry`.
pub fn retry_delay(retry: u32, base: Duration) -> Duration {
    base.saturating_mul(2u32.saturating_pow(retry))
}

// ---------------------------------------------------------------------------
// WebhookForwarder
// ---------------------------------------------------------------------------

/// Errors from a single delivery attempt.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Webhook returned HTTP {0}")]
    HttpStatus(u16),
}

/// Pushes domain events to an external HTTP sink.
pub struct WebhookForwarder {
    client: reqwest::Client,
    url: String,
    config: WebhookConfig,
}

impl WebhookForwarder {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_config(url, WebhookConfig::default())
    }

    pub fn with_config(url: impl Into<String>, config: WebhookConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            url: url.into(),
            config,
        }
    }

    /// Forward events from the bus until it is closed.
    pub async fn run(self, mut receiver: broadcast::Receiver<DomainEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = self.deliver(&event).await {
                        tracing::error!(
                            url = %self.url,
                            event_type = %event.event_type,
                            error = %e,
                            "Dropping event after exhausting webhook retries"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Webhook forwarder lagged, events were skipped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, webhook forwarder shutting down");
                    break;
                }
            }
        }
    }

    /// Deliver one event, retrying per the config.
    pub async fn deliver(&self, event: &DomainEvent) -> Result<(), WebhookError> {
        let mut last_err = None;

        for attempt in 0..self.config.max_attempts {
            if attempt > 0 {
                tokio::time::sleep(retry_delay(attempt - 1, self.config.base_delay)).await;
            }
            match self.try_send(event).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        url = %self.url,
                        error = %e,
                        "Webhook delivery attempt failed"
                    );
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.expect("at least one attempt was made"))
    }

    async fn try_send(&self, event: &DomainEvent) -> Result<(), WebhookError> {
        let response = self.client.post(&self.url).json(event).send().await?;
        if !response.status().is_success() {
            return Err(WebhookError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles() {
        let base = Duration::from_secs(1);
        assert_eq!(retry_delay(0, base), Duration::from_secs(1));
        assert_eq!(retry_delay(1, base), Duration::from_secs(2));
        assert_eq!(retry_delay(2, base), Duration::from_secs(4));
    }

    #[test]
    fn backoff_saturates_instead_of_overflowing() {
        let d = retry_delay(40, Duration::from_secs(1));
        assert!(d >= Duration::from_secs(1));
    }

    #[test]
    fn default_config_is_bounded() {
        let config = WebhookConfig::default();
        assert_eq!(config.max_attempts, 4);
        assert!(config.request_timeout >= config.base_delay);
    }

    #[test]
    fn forwarder_construction_does_not_panic() {
        let _ = WebhookForwarder::new("http://localhost:9/sink");
    }

    #[test]
    fn error_display() {
        assert_eq!(
            WebhookError::HttpStatus(503).to_string(),
            "Webhook returned HTTP 503"
        );
    }
}
