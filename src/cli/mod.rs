//! Command line front end
//!
//! Reads the input, runs the selected job on the local runtime and writes
//! the results. Nothing is written to the output unless the run succeeds.

pub mod args;

pub use args::{Cli, Commands, JobArgs};

use crate::config::RollupConfig;
use crate::core::aggregation::JobKind;
use crate::core::pipeline::MalformedPolicy;
use crate::output::OutputFormatter;
use crate::runtime;
use anyhow::{anyhow, Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter};
use std::path::Path;
use stillwater::Validation;
use tracing::{debug, info};

/// Fold command line flags into the loaded configuration.
pub fn apply_overrides(config: &mut RollupConfig, args: &JobArgs) {
    if let Some(partitions) = args.partitions {
        config.partitions = partitions;
    }
    if let Some(reducers) = args.reducers {
        config.reducers = reducers;
    }
    if args.no_combine {
        config.combine = false;
    }
    if args.skip_malformed {
        config.on_malformed = MalformedPolicy::Skip;
    }
    if let Some(separator) = args.separator {
        config.separator = separator;
    }
}

/// Turn accumulated validation errors into a single error.
pub fn ensure_valid(config: &RollupConfig) -> Result<()> {
    match config.validate() {
        Validation::Success(()) => Ok(()),
        Validation::Failure(errors) => {
            let details: Vec<String> = errors.iter().map(|e| format!("  - {e}")).collect();
            Err(anyhow!("Invalid configuration:\n{}", details.join("\n")))
        }
    }
}

/// Run one aggregation job end to end.
pub fn run_job(kind: JobKind, args: &JobArgs, config: &RollupConfig) -> Result<()> {
    ensure_valid(config)?;

    let lines = read_lines(&args.input)?;
    debug!(lines = lines.len(), input = %args.input.display(), "Input loaded");

    let report = runtime::run(kind, &lines, &config.run_options())
        .with_context(|| format!("{kind} job failed"))?;

    let formatter = OutputFormatter::new(config.separator);
    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            formatter
                .write_rows(&mut BufWriter::new(file), &report.rows)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {} rows to {}", report.rows.len(), path.display());
        }
        None => {
            let stdout = io::stdout();
            formatter
                .write_rows(&mut stdout.lock(), &report.rows)
                .context("Failed to write to stdout")?;
        }
    }

    if args.summary {
        eprintln!("{}", OutputFormatter::summary(&report));
    }

    Ok(())
}

/// Print the effective configuration followed by its validation status.
pub fn show_config(config: &RollupConfig) -> Result<()> {
    print!("{}", config.to_toml()?);
    ensure_valid(config)?;
    println!("# configuration is valid");
    Ok(())
}

/// Read raw `\n`-terminated lines. Decoding is left to the pipeline so an
/// undecodable line is handled by the malformed-record policy.
fn read_lines(input: &Path) -> Result<Vec<Vec<u8>>> {
    let reader: Box<dyn BufRead> = if input == Path::new("-") {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(input)
            .with_context(|| format!("Failed to open input file {}", input.display()))?;
        Box::new(BufReader::new(file))
    };

    reader
        .split(b'\n')
        .collect::<io::Result<Vec<_>>>()
        .with_context(|| format!("Failed to read input {}", input.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Separator;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_flags_override_config() {
        let mut config = RollupConfig {
            partitions: 2,
            ..RollupConfig::default()
        };
        let args = JobArgs {
            partitions: Some(9),
            reducers: Some(3),
            no_combine: true,
            skip_malformed: true,
            separator: Some(Separator::Space),
            ..JobArgs::default()
        };

        apply_overrides(&mut config, &args);

        assert_eq!(config.partitions, 9);
        assert_eq!(config.reducers, 3);
        assert!(!config.combine);
        assert_eq!(config.on_malformed, MalformedPolicy::Skip);
        assert_eq!(config.separator, Separator::Space);
    }

    #[test]
    fn test_absent_flags_keep_config() {
        let original = RollupConfig {
            partitions: 2,
            combine: true,
            ..RollupConfig::default()
        };
        let mut config = original.clone();
        apply_overrides(&mut config, &JobArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_ensure_valid_lists_every_error() {
        let config = RollupConfig {
            partitions: 0,
            reducers: 0,
            ..RollupConfig::default()
        };
        let message = ensure_valid(&config).unwrap_err().to_string();
        assert!(message.contains("partitions"));
        assert!(message.contains("reducers"));
    }

    #[test]
    fn test_read_lines_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "a;b;1\r\nc;d;2\n").unwrap();

        let lines = read_lines(file.path()).unwrap();
        assert_eq!(lines, vec![b"a;b;1\r".to_vec(), b"c;d;2".to_vec()]);
    }

    #[test]
    fn test_read_lines_keeps_invalid_utf8() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"a;b;1\nbad\xff;b;1\n").unwrap();

        let lines = read_lines(file.path()).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], b"bad\xff;b;1".to_vec());
    }

    #[test]
    fn test_read_lines_missing_file() {
        let err = read_lines(Path::new("/nonexistent/input.txt")).unwrap_err();
        assert!(err.to_string().contains("Failed to open input file"));
    }
}
