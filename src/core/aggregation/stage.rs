//! Grouped fold shared by the combine and reduce roles
//!
//! The same operation serves as the optional per-partition pre-aggregation
//! and as the final cross-partition reduction. Because partial states form a
//! commutative semigroup, running it zero, one or several times over any
//! split of the same `(key, partial)` multiset yields the same merged state
//! per key.

use rayon::prelude::*;
use std::collections::BTreeMap;
use stillwater::Semigroup;

/// One merged partial per distinct key, ordered by key.
pub type Aggregated<K, S> = BTreeMap<K, S>;

/// Group `(key, partial)` pairs by key and fold each group with `combine`.
pub fn aggregate<K, S, I>(pairs: I) -> Aggregated<K, S>
where
    K: Ord,
    S: Semigroup,
    I: IntoIterator<Item = (K, S)>,
{
    pairs.into_iter().fold(BTreeMap::new(), |mut acc, (key, partial)| {
        merge_into(&mut acc, key, partial);
        acc
    })
}

/// Merge two already-aggregated sets, keeping one partial per key.
///
/// For keys present in both, `left`'s partial is combined with `right`'s.
pub fn merge_aggregates<K, S>(left: Aggregated<K, S>, right: Aggregated<K, S>) -> Aggregated<K, S>
where
    K: Ord,
    S: Semigroup,
{
    let mut acc = left;
    for (key, partial) in right {
        merge_into(&mut acc, key, partial);
    }
    acc
}

/// Aggregate across the rayon pool.
///
/// Each worker folds its own slice into a private map; the maps are then
/// merged pairwise. Counts come out identical to [`aggregate`]; floating
/// point sums may differ in the last bits since the grouping differs.
pub fn parallel_aggregate<K, S>(pairs: Vec<(K, S)>) -> Aggregated<K, S>
where
    K: Ord + Send,
    S: Semigroup + Send,
{
    pairs
        .into_par_iter()
        .fold(BTreeMap::new, |mut acc, (key, partial)| {
            merge_into(&mut acc, key, partial);
            acc
        })
        .reduce(BTreeMap::new, merge_aggregates)
}

fn merge_into<K: Ord, S: Semigroup>(acc: &mut Aggregated<K, S>, key: K, partial: S) {
    let merged = match acc.remove(&key) {
        Some(existing) => existing.combine(partial),
        None => partial,
    };
    acc.insert(key, merged);
}
