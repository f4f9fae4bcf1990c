//! SmartThings client configuration.

use std::fmt;

use serde::Deserialize;

/// Public SmartThings REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.smartthings.com/v1";

/// Configuration for the SmartThings client.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct SmartThingsConfig {
    /// Personal access token sent as a bearer token.
    pub token: String,
    /// API root, without trailing slash.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for SmartThingsConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl fmt::Debug for SmartThingsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmartThingsConfig")
            .field("token", &if self.token.is_empty() { "" } else { "***" })
            .field("base_url", &self.base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}
