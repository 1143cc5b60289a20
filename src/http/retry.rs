//! Retry policies for HTTP requests.

use std::time::Duration;

use reqwest::Method;

use crate::error::HttpError;

/// Retry policy for an HTTP request.
#[derive(Debug, Clone, Default)]
pub enum RetryPolicy {
    /// No retries — used for mutating endpoints.
    #[default]
    None,
    /// Retry network failures, timeouts, 408 and 5xx with the client's
    /// configured backoff. Default for GET endpoints.
    Idempotent,
    /// User-provided retry logic.
    Custom(RetryConfig),
}

/// How the delay grows between attempts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// `initial_delay × attempt`.
    Linear,
    /// `initial_delay × factor^(attempt - 1)`.
    Exponential { factor: f64 },
}

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not counting the initial request).
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    pub backoff: Backoff,
    /// Whether to add ±25% jitter to the delay.
    pub jitter: bool,
    /// HTTP status codes that trigger a retry.
    pub retryable_statuses: Vec<u16>,
    /// Whether connection failures and timeouts trigger a retry.
    pub retry_network: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
            backoff: Backoff::Linear,
            jitter: false,
            retryable_statuses: std::iter::once(408).chain(500..=599).collect(),
            retry_network: true,
        }
    }
}

impl RetryConfig {
    /// Retry config with no waiting between attempts.
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            initial_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (1-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let attempt = attempt.max(1);
        let base = self.initial_delay.as_millis() as f64
            * match self.backoff {
                Backoff::Linear => f64::from(attempt),
                Backoff::Exponential { factor } => factor.powi(attempt as i32 - 1),
            };
        let capped = base.min(self.max_delay.as_millis() as f64);

        let final_ms = if self.jitter {
            let jitter_range = capped * 0.25;
            let jitter = (rand::random::<f64>() - 0.5) * 2.0 * jitter_range;
            (capped + jitter).max(0.0)
        } else {
            capped
        };

        Duration::from_millis(final_ms as u64)
    }

    /// Whether `error` on a `method` request is worth another attempt.
    ///
    /// A POST answered with 400 is a validation failure and never retried.
    pub fn should_retry(&self, method: &Method, error: &HttpError) -> bool {
        match error {
            HttpError::Network(_) | HttpError::Timeout => self.retry_network,
            HttpError::BadRequest { status: 400, .. } if *method == Method::POST => false,
            other => other
                .status()
                .is_some_and(|status| self.retryable_statuses.contains(&status)),
        }
    }
}
