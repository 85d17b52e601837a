//! Engine configuration.
//!
//! Supports TOML config files, environment variable overrides, and defaults.

use std::env;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FormError, Result};

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// chrono format `Date` values must parse with
    pub date_format: String,
    /// chrono format `DateTime` values must parse with
    pub datetime_format: String,
    /// Dependency fetch timeout in milliseconds
    pub fetch_timeout_ms: u64,
    /// Prefix for placeholder names of fields added in the builder
    pub new_field_prefix: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            date_format: "%Y-%m-%d".to_string(),
            datetime_format: "%Y-%m-%d %H:%M:%S".to_string(),
            fetch_timeout_ms: 10000, // 10 seconds default
            new_field_prefix: "new_field".to_string(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| FormError::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string. Missing keys keep their defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| FormError::Config(format!("Invalid TOML: {}", e)))
    }

    /// Applies environment variable overrides.
    /// Variables are prefixed with `FORM_ENGINE_`, e.g. `FORM_ENGINE_FETCH_TIMEOUT_MS=500`.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = env::var("FORM_ENGINE_DATE_FORMAT") {
            self.date_format = val;
        }
        if let Ok(val) = env::var("FORM_ENGINE_DATETIME_FORMAT") {
            self.datetime_format = val;
        }
        if let Ok(val) = env::var("FORM_ENGINE_FETCH_TIMEOUT_MS") {
            self.fetch_timeout_ms = val
                .parse()
                .map_err(|_| FormError::Config(format!("Invalid fetch_timeout_ms: {}", val)))?;
        }
        if let Ok(val) = env::var("FORM_ENGINE_NEW_FIELD_PREFIX") {
            if val.trim().is_empty() {
                return Err(FormError::Config("new_field_prefix must not be empty".into()));
            }
            self.new_field_prefix = val;
        }
        Ok(())
    }

    /// Returns the fetch timeout as a `Duration`.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}
