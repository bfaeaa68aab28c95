//! Map/combine and reduce entry points
//!
//! A distributed runtime drives a job through exactly two calls:
//!
//! - [`preaggregate`] once per input partition (map, then optional combine)
//! - [`finalize`] once per reduce group, after the runtime has routed every
//!   partial for a key to the same call
//!
//! Neither call knows how many partitions, workers or shuffle rounds exist.

use super::aggregation::{aggregate, finalize_all, AggregationJob, FinalRows};
use super::parser::{decode_line, parse_line};
use crate::error::{RecordError, Result, RollupError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// What to do with a line that cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Abort the whole run on the first bad line.
    #[default]
    Fail,
    /// Log the line, count it and keep going.
    Skip,
}

impl fmt::Display for MalformedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedPolicy::Fail => write!(f, "fail"),
            MalformedPolicy::Skip => write!(f, "skip"),
        }
    }
}

impl FromStr for MalformedPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fail" => Ok(MalformedPolicy::Fail),
            "skip" => Ok(MalformedPolicy::Skip),
            other => Err(format!(
                "unknown malformed-record policy '{other}' (expected 'fail' or 'skip')"
            )),
        }
    }
}

/// Per-partition behaviour of [`preaggregate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Fold partials locally before they leave the partition.
    pub combine: bool,
    pub on_malformed: MalformedPolicy,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            combine: true,
            on_malformed: MalformedPolicy::Fail,
        }
    }
}

/// Partials leaving one partition, ready to be shuffled by key.
#[derive(Debug, Clone)]
pub struct PartitionOutput<J: AggregationJob> {
    pub partials: Vec<(J::Key, J::Partial)>,
    /// Lines that produced a partial.
    pub records: usize,
    /// Lines dropped under [`MalformedPolicy::Skip`].
    pub skipped: usize,
}

/// Parse and extract a single line.
pub fn map_line<J: AggregationJob>(
    line: &str,
) -> std::result::Result<(J::Key, J::Partial), RecordError> {
    let reading = parse_line(line, J::SCHEMA)?;
    J::extract(reading)
}

/// Map every line of one partition and optionally combine the result.
///
/// `lines` carries each raw line with its 1-based number in the whole input
/// so failures can be reported against the original position. Lines that are
/// not valid UTF-8 are malformed records.
pub fn preaggregate<J, I, S>(lines: I, options: &PipelineOptions) -> Result<PartitionOutput<J>>
where
    J: AggregationJob,
    I: IntoIterator<Item = (usize, S)>,
    S: AsRef<[u8]>,
{
    let mut pairs = Vec::new();
    let mut skipped = 0;

    for (number, line) in lines {
        match decode_line(line.as_ref()).and_then(map_line::<J>) {
            Ok(pair) => pairs.push(pair),
            Err(source) => match options.on_malformed {
                MalformedPolicy::Fail => {
                    return Err(RollupError::Record {
                        line: number,
                        source,
                    })
                }
                MalformedPolicy::Skip => {
                    warn!(line = number, error = %source, "Skipping malformed record");
                    skipped += 1;
                }
            },
        }
    }

    let records = pairs.len();
    let partials: Vec<_> = if options.combine {
        aggregate(pairs).into_iter().collect()
    } else {
        pairs
    };

    debug!(
        job = %J::KIND,
        records,
        skipped,
        partials = partials.len(),
        combined = options.combine,
        "Partition mapped"
    );

    Ok(PartitionOutput {
        partials,
        records,
        skipped,
    })
}

/// Reduce all partials of one or more keys and finalize them.
///
/// The caller must supply every partial for each key it passes in. Partials
/// may arrive in any order, combined or not.
pub fn finalize<J, I>(grouped: I) -> Result<FinalRows<J>>
where
    J: AggregationJob,
    I: IntoIterator<Item = (J::Key, J::Partial)>,
{
    let reduced = aggregate(grouped);
    Ok(finalize_all::<J>(reduced)?)
}
