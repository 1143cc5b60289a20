//! Client configuration.
//!
//! [`ClientConfig`] carries every tunable the [`StoreClientBuilder`] accepts.
//! Defaults match the storefront's production values; `from_env()` overlays
//! `BUYGREEN_*` environment variables on top of them.
//!
//! [`StoreClientBuilder`]: crate::client::StoreClientBuilder

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::SdkError;
use crate::http::retry::RetryConfig;
use crate::network;

pub const ENV_API_BASE_URL: &str = "BUYGREEN_API_BASE_URL";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "BUYGREEN_REQUEST_TIMEOUT_SECS";
pub const ENV_ORDER_TIMEOUT_SECS: &str = "BUYGREEN_ORDER_TIMEOUT_SECS";
pub const ENV_SESSION_FILE: &str = "BUYGREEN_SESSION_FILE";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Deadline for ordinary requests.
    pub request_timeout: Duration,
    /// Deadline for `POST /orders/create`.
    pub order_timeout: Duration,
    /// How long checkout waits before handing a stalled order back to the caller.
    pub order_watchdog: Duration,
    pub retry: RetryConfig,
    /// Default TTL of the response cache.
    pub cache_ttl: Duration,
    /// Interval of the background sweep of expired cache entries. `None` disables it.
    pub cache_sweep_interval: Option<Duration>,
    /// Prefix of the payment receipt string (`<prefix>_<millis>`).
    pub receipt_prefix: String,
    pub currency: String,
    /// Where a `FileSessionStore` persists the session, if any.
    pub session_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: network::DEFAULT_API_URL.to_string(),
            request_timeout: network::DEFAULT_REQUEST_TIMEOUT,
            order_timeout: network::ORDER_REQUEST_TIMEOUT,
            order_watchdog: network::ORDER_WATCHDOG,
            retry: RetryConfig::default(),
            cache_ttl: Duration::from_secs(5 * 60),
            cache_sweep_interval: Some(Duration::from_secs(10 * 60)),
            receipt_prefix: "buygreen".to_string(),
            currency: "INR".to_string(),
            session_file: None,
        }
    }
}

impl ClientConfig {
    /// Defaults overlaid with `BUYGREEN_*` environment variables.
    ///
    /// Unset variables fall back silently; malformed ones are a
    /// [`SdkError::Config`].
    pub fn from_env() -> Result<Self, SdkError> {
        let mut config = Self::default();

        if let Some(url) = var(ENV_API_BASE_URL) {
            config.base_url = url;
        }
        if let Some(secs) = try_load::<u64>(ENV_REQUEST_TIMEOUT_SECS)? {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = try_load::<u64>(ENV_ORDER_TIMEOUT_SECS)? {
            config.order_timeout = Duration::from_secs(secs);
        }
        config.session_file = var(ENV_SESSION_FILE).map(PathBuf::from);

        Ok(config)
    }
}

fn var(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => {
            debug!("{key} not set, using default");
            None
        }
    }
}

fn try_load<T: FromStr>(key: &str) -> Result<Option<T>, SdkError>
where
    T::Err: Display,
{
    var(key)
        .map(|raw| {
            raw.parse().map_err(|e| {
                warn!("Invalid {key} value: {e}");
                SdkError::Config(format!("{key}={raw}: {e}"))
            })
        })
        .transpose()
}
