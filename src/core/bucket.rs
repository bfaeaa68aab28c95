//! Minute bucketing of reading timestamps
//!
//! Readings are grouped by the `HH:mm` wall-clock label at a fixed UTC-3
//! offset. The date is discarded, so readings taken at the same clock minute
//! on different days share a bucket.

use crate::error::RecordError;
use chrono::{DateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed UTC offset applied before reading the wall clock (GMT-3).
pub const BUCKET_UTC_OFFSET_MILLIS: i64 = -3 * 3600 * 1000;

/// Wall-clock minute label, ordered by hour then minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MinuteBucket {
    hour: u8,
    minute: u8,
}

impl MinuteBucket {
    /// Build a bucket directly from its clock components.
    ///
    /// Returns `None` when the hour or minute is out of range.
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    /// Convert a Unix timestamp in milliseconds into its GMT-3 minute bucket.
    pub fn from_timestamp_millis(millis: i64) -> Result<Self, RecordError> {
        let local = millis
            .checked_add(BUCKET_UTC_OFFSET_MILLIS)
            .and_then(DateTime::from_timestamp_millis)
            .ok_or_else(|| {
                RecordError::invalid(
                    "timestamp",
                    &millis.to_string(),
                    "outside the representable date range",
                )
            })?;

        Ok(Self {
            hour: local.hour() as u8,
            minute: local.minute() as u8,
        })
    }

}

impl fmt::Display for MinuteBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}
