//! SleepIQ client configuration.

use std::time::Duration;

use serde::Deserialize;

/// Production endpoint of the SleepIQ REST API.
pub const DEFAULT_BASE_URL: &str = "https://prod-api.sleepiq.sleepnumber.com/rest/";

/// Configuration for the SleepIQ client.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SleepIqConfig {
    /// Root of the REST API; endpoints are joined onto it.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SleepIqConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

impl SleepIqConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
