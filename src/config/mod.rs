//! Run configuration
//!
//! Settings are layered with increasing precedence:
//!
//! 1. Built-in defaults
//! 2. A TOML file passed with `--config`
//! 3. `ROLLUP_*` environment variables
//! 4. Command line flags (applied by the binary)
//!
//! The bucket time zone is deliberately absent: it is fixed at GMT-3.
//!
//! ```toml
//! on_malformed = "skip"
//! partitions = 8
//! reducers = 2
//! combine = true
//! separator = "tab"
//! log_level = "debug"
//! ```

pub mod validation;

pub use validation::{ConfigError, VALID_LOG_LEVELS};

use crate::core::pipeline::{MalformedPolicy, PipelineOptions};
use crate::error::RollupError;
use crate::output::Separator;
use crate::runtime::RunOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

pub const ENV_ON_MALFORMED: &str = "ROLLUP_ON_MALFORMED";
pub const ENV_PARTITIONS: &str = "ROLLUP_PARTITIONS";
pub const ENV_REDUCERS: &str = "ROLLUP_REDUCERS";
pub const ENV_COMBINE: &str = "ROLLUP_COMBINE";
pub const ENV_SEPARATOR: &str = "ROLLUP_SEPARATOR";
pub const ENV_LOG_LEVEL: &str = "ROLLUP_LOG_LEVEL";

/// Effective settings for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollupConfig {
    /// Abort on the first malformed line, or skip and count it.
    pub on_malformed: MalformedPolicy,

    /// Maximum number of map partitions.
    pub partitions: usize,

    /// Number of reduce groups.
    pub reducers: usize,

    /// Pre-aggregate inside each partition before the shuffle.
    pub combine: bool,

    /// Separator between key and statistic in the output.
    pub separator: Separator,

    /// Logging level; `-v` flags win when given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Default for RollupConfig {
    fn default() -> Self {
        Self {
            on_malformed: MalformedPolicy::default(),
            partitions: default_partitions(),
            reducers: 1,
            combine: true,
            separator: Separator::default(),
            log_level: None,
        }
    }
}

fn default_partitions() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

impl RollupConfig {
    /// Load defaults, an optional TOML file, then process environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, RollupError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.merge_env_with(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Parse a TOML configuration file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, RollupError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, RollupError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, RollupError> {
        toml::to_string(self).map_err(|e| RollupError::Config(e.to_string()))
    }

    /// Apply `ROLLUP_*` overrides using `lookup` to read variables.
    ///
    /// Unparseable values are rejected rather than ignored.
    pub fn merge_env_with<F>(&mut self, lookup: F) -> Result<(), RollupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_ON_MALFORMED) {
            self.on_malformed = raw.parse().map_err(|e| env_error(ENV_ON_MALFORMED, e))?;
        }
        if let Some(raw) = lookup(ENV_PARTITIONS) {
            self.partitions = raw
                .trim()
                .parse()
                .map_err(|e| env_error(ENV_PARTITIONS, e))?;
        }
        if let Some(raw) = lookup(ENV_REDUCERS) {
            self.reducers = raw
                .trim()
                .parse()
                .map_err(|e| env_error(ENV_REDUCERS, e))?;
        }
        if let Some(raw) = lookup(ENV_COMBINE) {
            self.combine = raw.trim().parse().map_err(|e| env_error(ENV_COMBINE, e))?;
        }
        if let Some(raw) = lookup(ENV_SEPARATOR) {
            self.separator = raw.parse().map_err(|e| env_error(ENV_SEPARATOR, e))?;
        }
        if let Some(raw) = lookup(ENV_LOG_LEVEL) {
            self.log_level = Some(raw.trim().to_ascii_lowercase());
        }
        Ok(())
    }

    /// Runtime layout derived from this configuration.
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            partitions: self.partitions,
            reducers: self.reducers,
            pipeline: PipelineOptions {
                combine: self.combine,
                on_malformed: self.on_malformed,
            },
        }
    }
}

fn env_error(name: &str, err: impl std::fmt::Display) -> RollupError {
    RollupError::Config(format!("{name}: {err}"))
}
