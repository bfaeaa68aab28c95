//! Local execution runtime
//!
//! Stands in for a distributed batch runtime: partition assignment, parallel
//! map/combine, the group-by-key shuffle and the reduce phase all happen
//! in-process. The pure computation it drives lives in [`crate::core`].

pub mod local;
pub mod partition;

pub use local::{run_local, JobReport, RunOptions};
pub use partition::{partition_ranges, reducer_for};

use crate::core::aggregation::{AggregationJob, CountPerMinute, JobKind, MeanPerMinute, Statistic};
use crate::error::Result;

/// One emitted `(key, statistic)` pair with the key already rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub key: String,
    pub value: Statistic,
}

/// Job-independent view of a finished run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub job: JobKind,
    pub rows: Vec<Row>,
    pub records: usize,
    pub skipped: usize,
    pub partitions: usize,
}

/// Run the job selected at runtime over raw input lines.
pub fn run(
    kind: JobKind,
    lines: &[impl AsRef<[u8]> + Sync],
    options: &RunOptions,
) -> Result<RunReport> {
    match kind {
        JobKind::Count => run_erased::<CountPerMinute>(lines, options),
        JobKind::Mean => run_erased::<MeanPerMinute>(lines, options),
    }
}

fn run_erased<J: AggregationJob>(
    lines: &[impl AsRef<[u8]> + Sync],
    options: &RunOptions,
) -> Result<RunReport> {
    let report = run_local::<J>(lines, options)?;
    let rows = report
        .rows
        .into_iter()
        .map(|(key, value)| Row {
            key: key.to_string(),
            value: value.into(),
        })
        .collect();

    Ok(RunReport {
        job: J::KIND,
        rows,
        records: report.records,
        skipped: report.skipped,
        partitions: report.partitions,
    })
}
