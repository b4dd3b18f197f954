//! Configuration sections.

use serde::{Deserialize, Serialize};
use typed_views_core::SchemaFamily;
use typed_views_telemetry::LogConfig;

use crate::ConfigError;

/// Complex-schema configuration.
///
/// Only families listed in `packages` are treated as complex-schema types
/// when handler parameters are resolved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct SchemaConfig {
    /// Enabled schema families (`serde`, `validator`, `declarative`).
    #[serde(default)]
    pub packages: Vec<String>,
}

impl SchemaConfig {
    /// Parses the configured family names.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an unknown family name.
    pub fn families(&self) -> Result<Vec<SchemaFamily>, ConfigError> {
        self.packages
            .iter()
            .map(|name| {
                name.parse()
                    .map_err(|e| ConfigError::invalid_value("schema.packages", format!("{e}")))
            })
            .collect()
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable pretty format (development).
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level or filter directive.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include ANSI color codes in output.
    #[serde(default)]
    pub ansi_enabled: bool,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            ansi_enabled: false,
            include_location: false,
        }
    }
}

impl LoggingConfig {
    /// Converts the section into the telemetry crate's [`LogConfig`].
    #[must_use]
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            enabled: self.enabled,
            level: self.level.clone(),
            json_format: self.format == LogFormat::Json,
            file_line_info: self.include_location,
            ansi: self.ansi_enabled,
            ..LogConfig::default()
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}
