//! The `log` section of the application config.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

use crate::error::ConfigError;

use super::ConfigSection;

pub const DEFAULT_LEVEL: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LoggingConfig {
    /// Emit log entries as JSON lines.
    pub structured: bool,
    pub level: String,
    /// Append log entries to this file instead of stderr.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            structured: false,
            level: DEFAULT_LEVEL.to_string(),
            file: None,
        }
    }
}

/// Parse a level name (case-insensitive).
pub fn parse_level(level: &str) -> Result<LevelFilter, ConfigError> {
    match level.trim().to_lowercase().as_str() {
        "error" => Ok(LevelFilter::ERROR),
        "warn" | "warning" => Ok(LevelFilter::WARN),
        "info" => Ok(LevelFilter::INFO),
        "debug" => Ok(LevelFilter::DEBUG),
        "trace" => Ok(LevelFilter::TRACE),
        "off" | "disabled" | "none" => Ok(LevelFilter::OFF),
        _ => Err(ConfigError::InvalidLogLevel(level.to_string())),
    }
}

/// Level implied by `-v` flags; `None` when none were given.
fn verbosity_level(verbosity: u8) -> Option<LevelFilter> {
    match verbosity {
        0 => None,
        1 => Some(LevelFilter::INFO),
        2 => Some(LevelFilter::DEBUG),
        _ => Some(LevelFilter::TRACE),
    }
}

impl LoggingConfig {
    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        parse_level(&self.level)
    }

    /// Settle the effective level: quiet disables logging, `-v` flags take
    /// precedence over the configured level, otherwise the configured level
    /// must be valid.
    pub fn resolve_level(&mut self, quiet: bool, verbosity: u8) -> Result<(), ConfigError> {
        let level = if quiet {
            LevelFilter::OFF
        } else if let Some(level) = verbosity_level(verbosity) {
            level
        } else {
            self.level_filter()?
        };

        self.level = level.to_string().to_lowercase();
        Ok(())
    }
}

impl ConfigSection for LoggingConfig {
    fn name(&self) -> &'static str {
        "log"
    }

    fn apply_defaults(&mut self) {
        if self.level.trim().is_empty() {
            self.level = DEFAULT_LEVEL.to_string();
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.level_filter().map(|_| ())
    }
}
