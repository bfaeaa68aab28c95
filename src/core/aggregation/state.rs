//! Partial aggregate states and their `Semigroup` implementations
//!
//! A partial state is the mergeable, not-yet-finalized form of a statistic.
//! `combine` is associative and commutative for every state here, which is
//! what lets the aggregation stage run zero, one or many times over any
//! partitioning of the input and still produce the same merged state.
//!
//! The mean is carried as a running `(sum, count)` pair and only divided on
//! finalize; averages of averages are never taken.

use crate::error::AggregateError;
use serde::{Deserialize, Serialize};
use std::fmt;
use stillwater::Semigroup;

/// Occurrence count. Identity: `count == 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountState {
    pub count: u64,
}

impl CountState {
    pub const IDENTITY: Self = Self { count: 0 };

    /// State contributed by a single record.
    pub fn one() -> Self {
        Self { count: 1 }
    }

    pub fn finalize(self) -> u64 {
        self.count
    }
}

impl Semigroup for CountState {
    fn combine(self, other: Self) -> Self {
        // Saturating addition stays associative
        Self {
            count: self.count.saturating_add(other.count),
        }
    }
}

/// Running sum and count for a mean. Identity: `sum == 0.0 && count == 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MeanState {
    pub sum: f64,
    pub count: u64,
}

impl MeanState {
    pub const IDENTITY: Self = Self { sum: 0.0, count: 0 };

    /// State contributed by a single measured value.
    pub fn of(value: f64) -> Self {
        Self {
            sum: value,
            count: 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Divide the accumulated sum by the accumulated count.
    ///
    /// `key` is only used to describe the failure.
    pub fn finalize(self, key: &impl fmt::Display) -> Result<f64, AggregateError> {
        if self.is_empty() {
            return Err(AggregateError::EmptyAggregate {
                key: key.to_string(),
            });
        }
        Ok(self.sum / self.count as f64)
    }
}

impl Semigroup for MeanState {
    fn combine(self, other: Self) -> Self {
        Self {
            sum: self.sum + other.sum,
            count: self.count.saturating_add(other.count),
        }
    }
}

/// User-visible statistic produced by finalizing a partial state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Statistic {
    Count(u64),
    Mean(f64),
}

impl From<u64> for Statistic {
    fn from(count: u64) -> Self {
        Statistic::Count(count)
    }
}

impl From<f64> for Statistic {
    fn from(mean: f64) -> Self {
        Statistic::Mean(mean)
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statistic::Count(n) => write!(f, "{n}"),
            // Plain decimal, never exponent form; whole numbers keep ".0"
            Statistic::Mean(m) if m.is_finite() && m.fract() == 0.0 => write!(f, "{m:.1}"),
            Statistic::Mean(m) => write!(f, "{m}"),
        }
    }
}
