//! Input partitioning and key routing

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::ops::Range;

/// Split `total` items into at most `max_partitions` contiguous ranges.
///
/// Range sizes differ by at most one and earlier ranges take the remainder.
/// No empty ranges are produced, so an empty input yields no partitions. A
/// `max_partitions` of zero behaves as one.
pub fn partition_ranges(total: usize, max_partitions: usize) -> Vec<Range<usize>> {
    let partitions = max_partitions.max(1).min(total);
    if partitions == 0 {
        return Vec::new();
    }

    let per_partition = total / partitions;
    let remainder = total % partitions;

    let mut ranges = Vec::with_capacity(partitions);
    let mut start = 0;
    for i in 0..partitions {
        let len = per_partition + usize::from(i < remainder);
        ranges.push(start..start + len);
        start += len;
    }

    ranges
}

/// Pick the reducer responsible for `key`.
///
/// Stable for a given key within a process, which is all the shuffle needs:
/// every partial for a key lands on the same reducer.
pub fn reducer_for<K: Hash>(key: &K, reducers: usize) -> usize {
    if reducers <= 1 {
        return 0;
    }
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    (hasher.finish() % reducers as u64) as usize
}
