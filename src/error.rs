//! Error types for record parsing, aggregation and whole runs.

use thiserror::Error;

/// Failure to turn one raw line into a typed reading.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("malformed record: expected at least {required} fields, found {found}")]
    MalformedRecord { required: usize, found: usize },

    #[error("invalid {field} field {value:?}: {reason}")]
    InvalidFieldFormat {
        field: &'static str,
        value: String,
        reason: String,
    },
}

impl RecordError {
    pub(crate) fn invalid(field: &'static str, value: &str, reason: impl ToString) -> Self {
        Self::InvalidFieldFormat {
            field,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Failure to finalize a merged partial state.
///
/// Every merged partial derives from at least one record, so any of these
/// surfacing means the extractor or merger is broken.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregateError {
    #[error("cannot finalize an empty aggregate for key {key}")]
    EmptyAggregate { key: String },
}

/// Run-level error for a whole job execution.
#[derive(Error, Debug)]
pub enum RollupError {
    #[error("malformed input at line {line}")]
    Record {
        line: usize,
        #[source]
        source: RecordError,
    },

    #[error("internal aggregation invariant violated: {0}")]
    Invariant(#[from] AggregateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl RollupError {
    /// Line number of the offending record, if this error came from parsing.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Record { line, .. } => Some(*line),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RollupError>;
