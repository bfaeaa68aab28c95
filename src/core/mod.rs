//! Pure aggregation logic
//!
//! Nothing in here performs I/O, blocks, or shares mutable state; every
//! function is a transformation over owned or borrowed data and may run on
//! any number of workers at once.

pub mod aggregation;
pub mod bucket;
pub mod parser;
pub mod pipeline;

pub use bucket::MinuteBucket;
pub use parser::{parse_line, RecordSchema, SensorReading};
pub use pipeline::{finalize, map_line, preaggregate, MalformedPolicy, PartitionOutput, PipelineOptions};
