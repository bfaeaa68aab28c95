//! Partitioned aggregation engine
//!
//! Records become `(key, partial)` pairs through a job's extractor, partials
//! are merged with their `Semigroup` implementation by a single grouped fold,
//! and merged partials are finalized into statistics.

pub mod finalize;
pub mod job;
pub mod stage;
pub mod state;


pub use finalize::{finalize_all, FinalRows};
pub use job::{AggregationJob, CountPerMinute, JobKind, MeanPerMinute, SensorMinute};
pub use stage::{aggregate, merge_aggregates, parallel_aggregate, Aggregated};
pub use state::{CountState, MeanState, Statistic};
