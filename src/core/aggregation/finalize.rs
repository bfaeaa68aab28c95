//! Result finalization
//!
//! Converts each fully merged partial into the statistic emitted for its key.

use super::job::AggregationJob;
use super::stage::Aggregated;
use crate::error::AggregateError;

/// Finalized `(key, statistic)` rows, ordered by key.
pub type FinalRows<J> = Vec<(<J as AggregationJob>::Key, <J as AggregationJob>::Output)>;

/// Finalize every key of a fully reduced set.
///
/// Must only be called once all partials for every key have been merged.
pub fn finalize_all<J: AggregationJob>(
    reduced: Aggregated<J::Key, J::Partial>,
) -> Result<FinalRows<J>, AggregateError> {
    reduced
        .into_iter()
        .map(|(key, partial)| {
            let output = J::finalize(&key, partial)?;
            Ok((key, output))
        })
        .collect()
}
