use crate::error::{Result, SeawatchError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000/api";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for SeaWatch
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// Base URL of the backend, without a trailing slash
    pub api_url: ConfigValue<String>,
    pub poll_interval_secs: ConfigValue<u64>,
    pub request_timeout_secs: ConfigValue<u64>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            api_url: ConfigValue::new(DEFAULT_API_URL.to_string(), ConfigSource::Default),
            poll_interval_secs: ConfigValue::new(DEFAULT_POLL_INTERVAL_SECS, ConfigSource::Default),
            request_timeout_secs: ConfigValue::new(
                DEFAULT_REQUEST_TIMEOUT_SECS,
                ConfigSource::Default,
            ),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| SeawatchError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| SeawatchError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(api_url) = file_config.api_url {
            self.api_url.update(normalize_api_url(&api_url), ConfigSource::File);
        }

        if let Some(secs) = file_config.poll_interval_secs {
            self.poll_interval_secs.update(secs, ConfigSource::File);
        }

        if let Some(secs) = file_config.request_timeout_secs {
            self.request_timeout_secs.update(secs, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // SEAWATCH_API_URL
        if let Ok(api_url) = env::var("SEAWATCH_API_URL") {
            self.api_url.update(normalize_api_url(&api_url), ConfigSource::Environment);
        }

        // SEAWATCH_POLL_INTERVAL_SECS
        if let Ok(raw) = env::var("SEAWATCH_POLL_INTERVAL_SECS") {
            match parse_positive_secs("poll_interval_secs", &raw) {
                Ok(secs) => self.poll_interval_secs.update(secs, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid SEAWATCH_POLL_INTERVAL_SECS value '{}': expected a positive integer",
                    raw
                ),
            }
        }

        // SEAWATCH_REQUEST_TIMEOUT_SECS
        if let Ok(raw) = env::var("SEAWATCH_REQUEST_TIMEOUT_SECS") {
            match parse_positive_secs("request_timeout_secs", &raw) {
                Ok(secs) => self.request_timeout_secs.update(secs, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid SEAWATCH_REQUEST_TIMEOUT_SECS value '{}': expected a positive integer",
                    raw
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(api_url) = overrides.api_url {
            self.api_url.update(normalize_api_url(&api_url), ConfigSource::Cli);
        }

        if let Some(secs) = overrides.poll_interval_secs {
            self.poll_interval_secs.update(secs, ConfigSource::Cli);
        }

        if let Some(secs) = overrides.request_timeout_secs {
            self.request_timeout_secs.update(secs, ConfigSource::Cli);
        }
    }

    /// Reject values that would stall the poller or the HTTP client
    pub fn validate(&self) -> Result<()> {
        if self.api_url.value.is_empty() {
            return Err(SeawatchError::ConfigMissing { key: "api_url".to_string() });
        }

        if self.poll_interval_secs.value == 0 {
            return Err(SeawatchError::ConfigInvalid {
                key: "poll_interval_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.request_timeout_secs.value == 0 {
            return Err(SeawatchError::ConfigInvalid {
                key: "request_timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.value)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.value)
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert("api_url".to_string(), (self.api_url.value.clone(), self.api_url.source));

        map.insert(
            "poll_interval_secs".to_string(),
            (format!("{}s", self.poll_interval_secs.value), self.poll_interval_secs.source),
        );

        map.insert(
            "request_timeout_secs".to_string(),
            (format!("{}s", self.request_timeout_secs.value), self.request_timeout_secs.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    api_url: Option<String>,
    poll_interval_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub api_url: Option<String>,
    pub poll_interval_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
}

/// Parse a strictly positive number of seconds
pub fn parse_positive_secs(key: &str, s: &str) -> Result<u64> {
    match s.trim().parse::<u64>() {
        Ok(0) => Err(SeawatchError::ConfigInvalid {
            key: key.to_string(),
            reason: "must be greater than zero".to_string(),
        }),
        Ok(secs) => Ok(secs),
        Err(e) => Err(SeawatchError::ConfigInvalid {
            key: key.to_string(),
            reason: format!("Invalid number of seconds '{}': {}", s, e),
        }),
    }
}

fn normalize_api_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
