//! Per-minute aggregation jobs
//!
//! A job names three things: which fields a record must carry, how a reading
//! becomes a `(key, partial)` pair, and how a fully merged partial becomes the
//! emitted statistic. Everything in between (grouping, combining, reducing)
//! is shared and lives in [`super::stage`].

use super::state::{CountState, MeanState, Statistic};
use crate::core::bucket::MinuteBucket;
use crate::core::parser::{RecordSchema, SensorReading};
use crate::error::{AggregateError, RecordError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use stillwater::Semigroup;

/// A statistic computed per aggregation key.
pub trait AggregationJob: Send + Sync + 'static {
    type Key: Clone + Ord + Hash + fmt::Display + fmt::Debug + Send + Sync + Serialize;
    type Partial: Semigroup + Clone + fmt::Debug + Send + Sync + Serialize;
    type Output: Into<Statistic> + Copy + fmt::Debug + Send;

    const KIND: JobKind;
    const SCHEMA: RecordSchema;

    /// Derive the aggregation key and the single-record partial.
    fn extract(reading: SensorReading) -> Result<(Self::Key, Self::Partial), RecordError>;

    /// Turn a fully merged partial into the user-visible statistic.
    fn finalize(key: &Self::Key, partial: Self::Partial) -> Result<Self::Output, AggregateError>;
}

/// Key for the count job: one bucket per sensor per minute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SensorMinute {
    pub sensor_id: String,
    pub bucket: MinuteBucket,
}

impl fmt::Display for SensorMinute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.sensor_id, self.bucket)
    }
}

/// Number of readings per sensor per minute.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountPerMinute;

impl AggregationJob for CountPerMinute {
    type Key = SensorMinute;
    type Partial = CountState;
    type Output = u64;

    const KIND: JobKind = JobKind::Count;
    const SCHEMA: RecordSchema = RecordSchema::TIMESTAMPED;

    fn extract(reading: SensorReading) -> Result<(SensorMinute, CountState), RecordError> {
        let bucket = MinuteBucket::from_timestamp_millis(reading.timestamp_millis)?;
        let key = SensorMinute {
            sensor_id: reading.sensor_id,
            bucket,
        };
        Ok((key, CountState::one()))
    }

    fn finalize(_key: &SensorMinute, partial: CountState) -> Result<u64, AggregateError> {
        Ok(partial.finalize())
    }
}

/// Mean measured value per minute, across all sensors.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanPerMinute;

impl AggregationJob for MeanPerMinute {
    type Key = MinuteBucket;
    type Partial = MeanState;
    type Output = f64;

    const KIND: JobKind = JobKind::Mean;
    const SCHEMA: RecordSchema = RecordSchema::MEASURED;

    fn extract(reading: SensorReading) -> Result<(MinuteBucket, MeanState), RecordError> {
        let bucket = MinuteBucket::from_timestamp_millis(reading.timestamp_millis)?;
        let value = reading
            .value
            .ok_or_else(|| RecordError::invalid("value", "", "missing measurement"))?;
        Ok((bucket, MeanState::of(value)))
    }

    fn finalize(key: &MinuteBucket, partial: MeanState) -> Result<f64, AggregateError> {
        partial.finalize(key)
    }
}

/// Runtime selector for the available jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    #[default]
    Count,
    Mean,
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobKind::Count => write!(f, "count"),
            JobKind::Mean => write!(f, "mean"),
        }
    }
}

impl FromStr for JobKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "count" => Ok(JobKind::Count),
            "mean" => Ok(JobKind::Mean),
            other => Err(format!("unknown job '{other}' (expected 'count' or 'mean')")),
        }
    }
}
