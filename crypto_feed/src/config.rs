//! Feed client configuration.
//!
//! Deserializes from the `[feed]` table of the application config. Every
//! field has a default, so an absent table yields a working CryptoCompare
//! setup (given an API key in the environment).

use std::num::NonZeroU32;
use std::time::Duration;

use nonzero_ext::nonzero;
use serde::{Deserialize, Serialize};

/// Default upstream; override for proxies or test servers.
pub const DEFAULT_BASE_URL: &str = "https://min-api.cryptocompare.com";
/// Environment variable holding the API key.
pub const DEFAULT_API_KEY_ENV: &str = "CRYPTOCOMPARE_API_KEY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    /// Base URL without trailing slash.
    pub base_url: String,
    /// Quote currency for history requests (`tsym`).
    pub quote_currency: String,
    /// Number of days requested per symbol (`limit`).
    pub history_limit: u32,
    /// Per-request timeout.
    pub request_timeout_secs: u64,
    /// Client-side pacing of outbound requests.
    pub requests_per_second: NonZeroU32,
    /// Name of the environment variable that holds the API key.
    pub api_key_env: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            quote_currency: "USD".to_string(),
            history_limit: 1,
            request_timeout_secs: 120,
            requests_per_second: nonzero!(20u32),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

impl FeedConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}
