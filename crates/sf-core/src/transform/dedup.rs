//! Exact-duplicate removal.

use std::collections::HashSet;
use std::hash::Hash;

/// Remove rows equal on every field.
///
/// Equality is the row type's `Eq`; for decoded records that is type-aware
/// and compares floats bit for bit. The first occurrence of each distinct
/// row is kept and returned in input order, but callers must not rely on
/// the order.
pub fn dedup<T: Eq + Hash + Clone>(rows: &[T]) -> Vec<T> {
    let mut seen: HashSet<&T> = HashSet::with_capacity(rows.len());
    rows.iter().filter(|row| seen.insert(*row)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf_common::{Record, Value};

    #[test]
    fn test_removes_exact_duplicates() {
        assert_eq!(dedup(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }

    #[test]
    fn test_records_differing_in_one_field_survive() {
        let free = Record::new().with("user_id", "U1").with("level", "free");
        let paid = Record::new().with("user_id", "U1").with("level", "paid");
        let out = dedup(&[free.clone(), paid, free]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_float_comparison_is_exact() {
        let a = Record::new().with("lat", 40.7);
        let b = Record::new().with("lat", 40.700000000000003);
        let c = Record::new().with("lat", Value::Int(40));
        assert_eq!(dedup(&[a.clone(), a.clone(), c]).len(), 2);
        // 40.700000000000003 parses to the same f64 as 40.7
        assert_eq!(dedup(&[a, b]).len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let rows: Vec<Record> = Vec::new();
        assert!(dedup(&rows).is_empty());
    }
}
