//! Dense surrogate key assignment.
//!
//! Ids are positional: 1 for the first row, N for the last, no gaps. Two
//! runs only agree on ids when they see rows in the same order, so callers
//! that need reproducible ids sort first with [`assign_ids_by_key`].

/// Number rows 1..=N in input order.
pub fn assign_ids<T>(rows: Vec<T>) -> Vec<(i64, T)> {
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| (i as i64 + 1, row))
        .collect()
}

/// Stable-sort rows by `key`, then number them 1..=N.
///
/// Rows with equal keys keep their relative input order.
pub fn assign_ids_by_key<T, K, F>(mut rows: Vec<T>, key: F) -> Vec<(i64, T)>
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    rows.sort_by_key(key);
    assign_ids(rows)
}
