//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `acbridge.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use acbridge_adapter_smartthings::SmartThingsConfig;
use acbridge_app::platform::PlatformConfig;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Polling settings.
    pub platform: PollingConfig,
    /// SmartThings account settings.
    pub smartthings: SmartThingsConfig,
    /// Integration toggles.
    pub integrations: IntegrationsConfig,
    /// Accessory host settings.
    pub host: HostConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Seconds between two status polls of an accessory.
    pub poll_interval_secs: u64,
}

/// Per-integration toggles.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IntegrationsConfig {
    /// Serve simulated devices instead of the SmartThings cloud.
    pub virtual_enabled: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// JSON file holding the accessory cache between restarts.
    pub cache_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from `acbridge.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("acbridge.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("ACBRIDGE_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("ACBRIDGE_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("ACBRIDGE_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Ok(val) = std::env::var("ACBRIDGE_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("ACBRIDGE_POLL_INTERVAL") {
            if let Ok(secs) = val.parse() {
                self.platform.poll_interval_secs = secs;
            }
        }
        if let Ok(val) = std::env::var("ACBRIDGE_SMARTTHINGS_TOKEN") {
            self.smartthings.token = val;
        }
        if let Ok(val) = std::env::var("ACBRIDGE_SMARTTHINGS_URL") {
            self.smartthings.base_url = val;
        }
        if let Ok(val) = std::env::var("ACBRIDGE_CACHE_PATH") {
            self.host.cache_path = Some(PathBuf::from(val));
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.platform.poll_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "poll interval must be non-zero".to_string(),
            ));
        }
        if !self.integrations.virtual_enabled && self.smartthings.token.trim().is_empty() {
            return Err(ConfigError::Validation(
                "a SmartThings token is required unless the virtual integration is enabled"
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    #[must_use]
    pub fn platform_config(&self) -> PlatformConfig {
        PlatformConfig {
            poll_interval: Duration::from_secs(self.platform.poll_interval_secs),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "acbridged=info,acbridge=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 15,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
