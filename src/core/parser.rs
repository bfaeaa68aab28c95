//! Record parsing
//!
//! Raw readings are semicolon separated with positional fields:
//! `sensorId;category;unixTimestampMillis[;value]`. Positions are fixed by
//! convention, so the only structural check is the field count required by
//! the job being run.

use crate::error::RecordError;
use serde::{Deserialize, Serialize};

pub const FIELD_SEPARATOR: char = ';';

const SENSOR_ID_FIELD: usize = 0;
const CATEGORY_FIELD: usize = 1;
const TIMESTAMP_FIELD: usize = 2;
const VALUE_FIELD: usize = 3;

/// Which optional fields a job needs from each record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordSchema {
    pub requires_value: bool,
}

impl RecordSchema {
    /// Identity and timestamp only.
    pub const TIMESTAMPED: Self = Self {
        requires_value: false,
    };

    /// Identity, timestamp and a numeric measurement.
    pub const MEASURED: Self = Self {
        requires_value: true,
    };

    /// Minimum number of fields a line must carry.
    pub fn required_fields(&self) -> usize {
        if self.requires_value {
            VALUE_FIELD + 1
        } else {
            TIMESTAMP_FIELD + 1
        }
    }
}

/// A typed sensor reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub sensor_id: String,
    pub category: String,
    pub timestamp_millis: i64,
    /// Present only when parsed with [`RecordSchema::MEASURED`].
    pub value: Option<f64>,
}

/// Decode one raw input line as UTF-8.
///
/// Undecodable bytes make the record malformed, like any other bad field.
pub fn decode_line(raw: &[u8]) -> Result<&str, RecordError> {
    std::str::from_utf8(raw)
        .map_err(|e| RecordError::invalid("record", &String::from_utf8_lossy(raw), e))
}

/// Parse one raw line into a [`SensorReading`].
///
/// Trailing empty fields do not count toward the field minimum, so
/// `a;b;1;` carries three fields.
pub fn parse_line(line: &str, schema: RecordSchema) -> Result<SensorReading, RecordError> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let fields = split_fields(line);

    let required = schema.required_fields();
    if fields.len() < required {
        return Err(RecordError::MalformedRecord {
            required,
            found: fields.len(),
        });
    }

    let timestamp_millis = parse_timestamp(fields[TIMESTAMP_FIELD])?;
    let value = if schema.requires_value {
        Some(parse_value(fields[VALUE_FIELD])?)
    } else {
        None
    };

    Ok(SensorReading {
        sensor_id: fields[SENSOR_ID_FIELD].to_string(),
        category: fields[CATEGORY_FIELD].to_string(),
        timestamp_millis,
        value,
    })
}

fn split_fields(line: &str) -> Vec<&str> {
    let mut fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    while fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    fields
}

fn parse_timestamp(raw: &str) -> Result<i64, RecordError> {
    raw.parse::<i64>()
        .map_err(|e| RecordError::invalid("timestamp", raw, e))
}

fn parse_value(raw: &str) -> Result<f64, RecordError> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|e| RecordError::invalid("value", raw, e))?;

    if !value.is_finite() {
        return Err(RecordError::invalid("value", raw, "value must be finite"));
    }
    Ok(value)
}
