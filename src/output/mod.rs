//! Key/value emission of finalized statistics

pub mod formatter;

pub use formatter::{OutputFormatter, Separator};
