//! Configuration validation with error accumulation
//!
//! Every problem is collected with Stillwater's `Validation` so a bad
//! configuration is reported in one pass.

use super::RollupConfig;
use stillwater::Validation;
use thiserror::Error;

/// Valid log levels for configuration validation.
pub const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Upper bound on map partitions and reducers.
pub const MAX_WORKERS: usize = 1024;

/// One invalid configuration value.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{path} = {value}: {message}")]
pub struct ConfigError {
    pub path: String,
    pub value: String,
    pub message: String,
}

impl ConfigError {
    fn new(path: &str, value: impl ToString, message: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            value: value.to_string(),
            message: message.into(),
        }
    }
}

impl RollupConfig {
    /// Check every field, accumulating all errors.
    pub fn validate(&self) -> Validation<(), Vec<ConfigError>> {
        let mut errors = Vec::new();

        if !(1..=MAX_WORKERS).contains(&self.partitions) {
            errors.push(ConfigError::new(
                "partitions",
                self.partitions,
                format!("partitions must be between 1 and {MAX_WORKERS}"),
            ));
        }

        if !(1..=MAX_WORKERS).contains(&self.reducers) {
            errors.push(ConfigError::new(
                "reducers",
                self.reducers,
                format!("reducers must be between 1 and {MAX_WORKERS}"),
            ));
        }

        if let Some(ref level) = self.log_level {
            if !VALID_LOG_LEVELS.contains(&level.as_str()) {
                errors.push(ConfigError::new(
                    "log_level",
                    level,
                    format!("log_level must be one of: {}", VALID_LOG_LEVELS.join(", ")),
                ));
            }
        }

        if errors.is_empty() {
            Validation::success(())
        } else {
            Validation::failure(errors)
        }
    }
}
