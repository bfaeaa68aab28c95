//! CLI argument structures

use crate::output::Separator;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Per-minute statistics over semicolon-delimited sensor readings
#[derive(Parser)]
#[command(name = "sensor-rollup")]
#[command(about = "sensor-rollup - Per-minute sensor statistics", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to a TOML configuration file
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Count readings per sensor per minute
    Count(JobArgs),

    /// Mean measured value per minute across all sensors
    Mean(JobArgs),

    /// Print the effective configuration and check it
    Config,
}

#[derive(Args, Debug, Clone, Default)]
pub struct JobArgs {
    /// Input file with one reading per line ("-" reads stdin)
    #[arg(short, long, default_value = "-")]
    pub input: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Maximum number of map partitions
    #[arg(short = 'p', long)]
    pub partitions: Option<usize>,

    /// Number of reduce groups
    #[arg(long)]
    pub reducers: Option<usize>,

    /// Send raw partials to the reducers without combining them first
    #[arg(long)]
    pub no_combine: bool,

    /// Skip and count malformed lines instead of failing the run
    #[arg(long)]
    pub skip_malformed: bool,

    /// Separator between key and statistic (tab or space)
    #[arg(long)]
    pub separator: Option<Separator>,

    /// Print a one-line run summary to stderr
    #[arg(long)]
    pub summary: bool,
}
