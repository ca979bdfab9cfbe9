//! Property-based tests for the row transforms.

use proptest::prelude::*;
use sf_common::{Record, Value};
use sf_core::transform::{assign_ids, assign_ids_by_key, dedup, left_outer_join, project};
use std::collections::HashSet;

const FIELDS: &[&str] = &["song_id", "title", "artist_id", "year", "duration"];

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (-1.0e6f64..1.0e6).prop_map(Value::Float),
        "[a-zA-Z0-9 ]{0,12}".prop_map(Value::Str),
    ]
}

fn record_strategy() -> impl Strategy<Value = Record> {
    prop::collection::vec(value_strategy(), FIELDS.len()).prop_map(|values| {
        FIELDS
            .iter()
            .zip(values)
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    })
}

fn field_subset_strategy() -> impl Strategy<Value = Vec<&'static str>> {
    prop::sample::subsequence(FIELDS.to_vec(), 0..=FIELDS.len()).prop_shuffle()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// The projected field set is exactly the requested one, in order.
    #[test]
    fn projection_field_set_matches_request(
        record in record_strategy(),
        fields in field_subset_strategy(),
    ) {
        let out = project(&record, &fields).unwrap();
        prop_assert_eq!(out.field_names().collect::<Vec<_>>(), fields.clone());
        for field in &fields {
            prop_assert_eq!(out.get(field), record.get(field));
        }
    }

    /// Dedup output is distinct, drawn from the input, and covers it.
    #[test]
    fn dedup_is_distinct_subset(rows in prop::collection::vec(0u8..6, 0..40)) {
        let out = dedup(&rows);
        let distinct: HashSet<_> = out.iter().collect();
        prop_assert_eq!(distinct.len(), out.len());

        let input: HashSet<_> = rows.iter().collect();
        prop_assert_eq!(distinct, input);
    }

    /// Dedup on records compares floats exactly.
    #[test]
    fn dedup_records_keeps_first_occurrence(
        records in prop::collection::vec(record_strategy(), 0..10),
    ) {
        let mut doubled = records.clone();
        doubled.extend(records.iter().cloned());
        let out = dedup(&doubled);
        prop_assert_eq!(out, dedup(&records));
    }

    /// Ids are exactly 1..=N and increase with input position.
    #[test]
    fn surrogate_ids_dense_and_increasing(rows in prop::collection::vec(any::<u32>(), 0..100)) {
        let numbered = assign_ids(rows.clone());
        let ids: Vec<i64> = numbered.iter().map(|(id, _)| *id).collect();
        let expected: Vec<i64> = (1..=rows.len() as i64).collect();
        prop_assert_eq!(ids, expected);
        let kept: Vec<u32> = numbered.into_iter().map(|(_, r)| r).collect();
        prop_assert_eq!(kept, rows);
    }

    /// Keyed assignment is independent of input order for distinct keys.
    #[test]
    fn keyed_ids_ignore_arrival_order(
        rows in prop::collection::hash_set(any::<(i64, i64)>(), 0..50),
    ) {
        let forward: Vec<(i64, i64)> = rows.iter().copied().collect();
        let mut backward = forward.clone();
        backward.reverse();
        prop_assert_eq!(
            assign_ids_by_key(forward, |r| *r),
            assign_ids_by_key(backward, |r| *r)
        );
    }

    /// A left outer join never drops left rows and fans out per match.
    #[test]
    fn join_preserves_left_rows(
        left in prop::collection::vec(prop::option::of(0u8..5), 0..30),
        right in prop::collection::vec(0u8..5, 0..10),
    ) {
        let joined = left_outer_join(&left, &right, |l| *l, |r| *r);
        let expected: usize = left
            .iter()
            .map(|l| match l {
                Some(k) => right.iter().filter(|r| *r == k).count().max(1),
                None => 1,
            })
            .sum();
        prop_assert_eq!(joined.rows.len(), expected);
        prop_assert_eq!(joined.stats.output_rows, expected);
        prop_assert_eq!(
            joined.stats.matched_left_rows + joined.stats.unmatched_left_rows,
            left.len()
        );
        for (l, r) in &joined.rows {
            if let Some(r) = r {
                prop_assert_eq!(**l, Some(**r));
            }
        }
    }
}
