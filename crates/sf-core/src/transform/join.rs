//! Left outer equi-join.
//!
//! Every left row appears once per matching right row, or once paired with
//! `None` when nothing matches. With a non-unique right key (song titles are
//! not unique) a left row fans out into several output rows.

use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;

/// Counters describing one join.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct JoinStats {
    pub left_rows: usize,
    /// Left rows with at least one match.
    pub matched_left_rows: usize,
    pub unmatched_left_rows: usize,
    /// Output rows beyond one per left row, caused by duplicate right keys.
    pub fan_out_rows: usize,
    pub output_rows: usize,
}

/// Joined pairs plus stats.
#[derive(Debug)]
pub struct Joined<'a, L, R> {
    pub rows: Vec<(&'a L, Option<&'a R>)>,
    pub stats: JoinStats,
}

/// Left outer join of `left` against `right` on key equality.
///
/// A `None` left key never matches. Output follows left order; within a
/// fan-out group matches follow right order.
pub fn left_outer_join<'a, L, R, K, FL, FR>(
    left: &'a [L],
    right: &'a [R],
    left_key: FL,
    right_key: FR,
) -> Joined<'a, L, R>
where
    K: Eq + Hash,
    FL: Fn(&'a L) -> Option<K>,
    FR: Fn(&'a R) -> K,
{
    let mut index: HashMap<K, Vec<&'a R>> = HashMap::new();
    for r in right {
        index.entry(right_key(r)).or_default().push(r);
    }

    let mut stats = JoinStats {
        left_rows: left.len(),
        ..Default::default()
    };
    let mut rows = Vec::with_capacity(left.len());

    for l in left {
        match left_key(l).and_then(|k| index.get(&k)) {
            Some(matches) => {
                stats.matched_left_rows += 1;
                stats.fan_out_rows += matches.len() - 1;
                rows.extend(matches.iter().map(|r| (l, Some(*r))));
            }
            None => {
                stats.unmatched_left_rows += 1;
                rows.push((l, None));
            }
        }
    }

    stats.output_rows = rows.len();
    Joined { rows, stats }
}
