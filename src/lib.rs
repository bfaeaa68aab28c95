//! # sensor-rollup
//!
//! Per-minute statistics over semicolon-delimited sensor readings, computed
//! with a map/combine/reduce engine whose results do not depend on how the
//! input is partitioned.
//!
//! ## Usage
//!
//! ```bash
//! sensor-rollup count -i readings.txt
//! sensor-rollup mean -i readings.txt --skip-malformed
//! ```
//!
//! ## Modules
//!
//! - `core` - Record parsing, minute bucketing and the mergeable aggregation states
//! - `runtime` - Local partitioned execution: map, shuffle, reduce
//! - `config` - Layered run configuration with accumulated validation
//! - `output` - Key/value text emission of results
//! - `cli` - Command line front end
//! - `error` - Error types shared across the crate
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod output;
pub mod runtime;

pub use error::{Result, RollupError};
