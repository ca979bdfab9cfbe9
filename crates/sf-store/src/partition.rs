//! Hive-style partition grouping and path encoding.
//!
//! A partition path is `key1=value1/key2=value2/...` in declaration order.
//! Values are rendered with their display form and percent-encoded outside
//! the URL-unreserved set (so `/`, `=` and `%` never appear raw); nulls use
//! the Hive default partition name.

use crate::batch::ArrowRow;
use crate::writer::WriteError;
use sf_common::Value;
use std::collections::BTreeMap;

/// Directory name used for a null partition value.
pub const NULL_PARTITION: &str = "__HIVE_DEFAULT_PARTITION__";

/// Rows sharing one partition-key tuple.
#[derive(Debug)]
pub struct PartitionGroup<'a, R> {
    /// Encoded relative path; empty for unpartitioned tables.
    pub path: String,
    /// Partition values in declaration order.
    pub values: Vec<(String, Value)>,
    pub rows: Vec<&'a R>,
}

/// Group rows by their partition-key tuple.
///
/// Groups come back sorted by encoded path; rows inside a group keep
/// input order. With no keys, all rows form a single group with an empty
/// path (even when there are no rows, so empty tables still get written).
pub fn group_by_partition<'a, R: ArrowRow>(
    rows: &'a [R],
    keys: &[&str],
) -> Result<Vec<PartitionGroup<'a, R>>, WriteError> {
    if keys.is_empty() {
        return Ok(vec![PartitionGroup {
            path: String::new(),
            values: Vec::new(),
            rows: rows.iter().collect(),
        }]);
    }

    let mut groups: BTreeMap<String, PartitionGroup<'a, R>> = BTreeMap::new();
    for row in rows {
        let mut values = Vec::with_capacity(keys.len());
        for key in keys {
            let value = row
                .column_value(key)
                .ok_or_else(|| WriteError::UnknownPartitionKey {
                    table: R::TABLE.to_string(),
                    key: key.to_string(),
                })?;
            values.push((key.to_string(), value));
        }
        let path = partition_path(&values);
        groups
            .entry(path.clone())
            .or_insert_with(|| PartitionGroup {
                path,
                values,
                rows: Vec::new(),
            })
            .rows
            .push(row);
    }
    Ok(groups.into_values().collect())
}

/// Encode partition values as a relative path.
pub fn partition_path(values: &[(String, Value)]) -> String {
    values
        .iter()
        .map(|(key, value)| format!("{}={}", escape(key), render(value)))
        .collect::<Vec<_>>()
        .join("/")
}

/// Decode a relative partition path into raw `(key, value)` strings.
///
/// Components without `=` are ignored; the null partition decodes to `None`.
pub fn parse_partition_path(path: &str) -> Vec<(String, Option<String>)> {
    path.split('/')
        .filter_map(|component| component.split_once('='))
        .map(|(key, value)| {
            let value = if value == NULL_PARTITION {
                None
            } else {
                Some(unescape(value))
            };
            (unescape(key), value)
        })
        .collect()
}

fn render(value: &Value) -> String {
    match value {
        Value::Null => NULL_PARTITION.to_string(),
        other => escape(&other.to_string()),
    }
}

fn escape(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

/// Percent-decode a path component; invalid UTF-8 after decoding keeps the
/// component as written.
fn unescape(encoded: &str) -> String {
    urlencoding::decode(encoded)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| encoded.to_string())
}
