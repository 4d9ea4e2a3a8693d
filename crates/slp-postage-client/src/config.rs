//! Post office client configuration.

use std::time::Duration;

/// Default post office hosts queried when none are configured.
pub const DEFAULT_POST_OFFICE_HOSTS: &[&str] = &["https://postoffice.fountainhead.cash"];

/// Default interval between poll cycles.
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(100);

/// Default per-request timeout for quote fetches.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Post office client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Post office base URLs (scheme included, no trailing slash)
    pub hosts: Vec<String>,
    /// Interval between poll cycles
    pub update_interval: Duration,
    /// Timeout applied to each quote fetch, so one unreachable host can
    /// stall a cycle by at most this much
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            hosts: DEFAULT_POST_OFFICE_HOSTS
                .iter()
                .map(|h| h.to_string())
                .collect(),
            update_interval: DEFAULT_UPDATE_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}
