//! Telemetry configuration.

use crate::TelemetryError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;

/// Log line encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, colored output for development.
    #[default]
    Pretty,
    /// One JSON object per line for containers.
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub service_name: String,
    /// Fallback filter directive when `RUST_LOG` is unset.
    pub log_level: String,
    pub log_format: LogFormat,
    /// Include file and line in JSON output.
    pub source_locations: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "donation-hub".to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            source_locations: false,
        }
    }
}

impl TelemetryConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply `HUB_SERVICE_NAME`, `HUB_LOG_LEVEL` and `HUB_LOG_FORMAT`.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(name) = env::var("HUB_SERVICE_NAME") {
            self.service_name = name;
        }
        if let Ok(level) = env::var("HUB_LOG_LEVEL") {
            self.log_level = level;
        }
        if let Ok(format) = env::var("HUB_LOG_FORMAT") {
            self.log_format = if format.eq_ignore_ascii_case("json") {
                LogFormat::Json
            } else {
                LogFormat::Pretty
            };
        }
        self
    }

    pub fn validate(&self) -> Result<(), TelemetryError> {
        if self.service_name.trim().is_empty() {
            return Err(TelemetryError::Config("service_name is empty".into()));
        }
        if self.log_level.trim().is_empty() {
            return Err(TelemetryError::Config("log_level is empty".into()));
        }
        Ok(())
    }
}
