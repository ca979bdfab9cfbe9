//! Record projection.

use sf_common::{Record, Result};

/// Narrow `record` to exactly `fields`, in that order.
///
/// Values are copied unchanged. A field absent from the input fails the
/// projection with `MissingField`; nothing is null-filled.
pub fn project(record: &Record, fields: &[&str]) -> Result<Record> {
    let mut out = Record::with_capacity(fields.len());
    for field in fields {
        out.insert(*field, record.require(field)?.clone());
    }
    Ok(out)
}

/// Project and rename: each `(from, to)` pair copies input field `from`
/// into output field `to`.
pub fn project_as(record: &Record, mapping: &[(&str, &str)]) -> Result<Record> {
    let mut out = Record::with_capacity(mapping.len());
    for (from, to) in mapping {
        out.insert(*to, record.require(from)?.clone());
    }
    Ok(out)
}

/// Project every record, stopping at the first failure.
pub fn project_all(records: &[Record], fields: &[&str]) -> Result<Vec<Record>> {
    records.iter().map(|r| project(r, fields)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf_common::{Error, Value};

    fn catalog() -> Record {
        Record::new()
            .with("artist_id", "AR1")
            .with("song_id", "S1")
            .with("title", "Song A")
            .with("year", 2000i64)
            .with("artist_latitude", Value::Null)
    }

    #[test]
    fn test_field_set_and_order_follow_request() {
        let out = project(&catalog(), &["title", "song_id", "artist_latitude"]).unwrap();
        assert_eq!(
            out.field_names().collect::<Vec<_>>(),
            vec!["title", "song_id", "artist_latitude"]
        );
        assert_eq!(out.get("artist_latitude"), Some(&Value::Null));
    }

    #[test]
    fn test_types_preserved() {
        let out = project(&catalog(), &["year"]).unwrap();
        assert_eq!(out.get("year"), Some(&Value::Int(2000)));
    }

    #[test]
    fn test_missing_field_fails() {
        let err = project(&catalog(), &["song_id", "duration"]).unwrap_err();
        match err {
            Error::MissingField { field, available } => {
                assert_eq!(field, "duration");
                assert!(available.contains(&"song_id".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_project_as_renames() {
        let log = Record::new().with("userId", "U1").with("firstName", "Jo");
        let out = project_as(&log, &[("userId", "user_id"), ("firstName", "first_name")]).unwrap();
        assert_eq!(out.str_field("user_id").unwrap(), "U1");
        assert!(!out.contains("userId"));
    }

    #[test]
    fn test_project_all_stops_on_first_bad_record() {
        let records = vec![catalog(), Record::new().with("song_id", "S2")];
        assert!(project_all(&records, &["song_id", "title"]).is_err());
        assert_eq!(project_all(&records[..1], &["song_id"]).unwrap().len(), 1);
    }
}
