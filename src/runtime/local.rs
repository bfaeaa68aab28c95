//! In-process map/shuffle/reduce driver
//!
//! Plays the role of the distributed runtime on a single machine: splits the
//! input into partitions, maps them in parallel on the rayon pool, routes
//! every partial to the reducer owning its key, and only then starts the
//! reducers.

use super::partition::{partition_ranges, reducer_for};
use crate::core::aggregation::{AggregationJob, FinalRows};
use crate::core::pipeline::{finalize, preaggregate, PartitionOutput, PipelineOptions};
use crate::error::Result;
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, info};

/// How the local runtime lays out a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Upper bound on map partitions; fewer are used for short inputs.
    pub partitions: usize,
    /// Number of reduce groups keys are routed to.
    pub reducers: usize,
    pub pipeline: PipelineOptions,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            partitions: 1,
            reducers: 1,
            pipeline: PipelineOptions::default(),
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct JobReport<J: AggregationJob> {
    /// Finalized statistics, ordered by key.
    pub rows: FinalRows<J>,
    pub records: usize,
    pub skipped: usize,
    pub partitions: usize,
    /// Partials that crossed the shuffle.
    pub shuffled: usize,
}

/// Run job `J` over raw `lines` on the local thread pool.
///
/// Under [`crate::core::MalformedPolicy::Fail`] the earliest malformed line
/// aborts the run and no rows are returned. A partition count of zero is
/// treated as one.
pub fn run_local<J: AggregationJob>(
    lines: &[impl AsRef<[u8]> + Sync],
    options: &RunOptions,
) -> Result<JobReport<J>> {
    let started = Instant::now();
    let ranges = partition_ranges(lines.len(), options.partitions);
    let partitions = ranges.len();

    let mapped: Vec<Result<PartitionOutput<J>>> = ranges
        .par_iter()
        .map(|range| {
            let numbered = lines[range.clone()]
                .iter()
                .enumerate()
                .map(|(offset, line)| (range.start + offset + 1, line.as_ref()));
            preaggregate::<J, _, _>(numbered, &options.pipeline)
        })
        .collect();

    // Partitions are contiguous and each stops at its own first bad line, so
    // the first failure in partition order is the earliest one overall.
    let outputs = mapped.into_iter().collect::<Result<Vec<_>>>()?;

    let records = outputs.iter().map(|o| o.records).sum();
    let skipped = outputs.iter().map(|o| o.skipped).sum();

    let groups = shuffle::<J>(outputs, options.reducers);
    let shuffled = groups.iter().map(Vec::len).sum();
    debug!(
        partitions,
        reducers = groups.len(),
        shuffled,
        "Shuffle complete"
    );

    let reduced: Vec<Result<FinalRows<J>>> = groups
        .into_par_iter()
        .map(finalize::<J, _>)
        .collect();

    let mut rows = Vec::new();
    for group in reduced {
        rows.extend(group?);
    }
    rows.sort_by(|a, b| a.0.cmp(&b.0));

    info!(
        job = %J::KIND,
        records,
        skipped,
        keys = rows.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Aggregation finished"
    );

    Ok(JobReport {
        rows,
        records,
        skipped,
        partitions,
        shuffled,
    })
}

/// Group-by-key shuffle: route each partial to the reducer owning its key.
///
/// Partials keep partition order within a reducer, which keeps floating point
/// reductions reproducible for a fixed layout.
fn shuffle<J: AggregationJob>(
    outputs: Vec<PartitionOutput<J>>,
    reducers: usize,
) -> Vec<Vec<(J::Key, J::Partial)>> {
    let reducers = reducers.max(1);
    let mut groups: Vec<Vec<(J::Key, J::Partial)>> = (0..reducers).map(|_| Vec::new()).collect();

    for output in outputs {
        for (key, partial) in output.partials {
            let target = reducer_for(&key, reducers);
            groups[target].push((key, partial));
        }
    }

    groups
}
