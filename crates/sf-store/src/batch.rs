//! Row → Arrow `RecordBatch` conversion.

use crate::schema::TableName;
use arrow::array::{ArrayRef, Float64Array, Int32Array, Int64Array, StringArray};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use sf_common::{ArtistRow, SongRow, SongplayRow, TimeRow, UserRow, Value};
use std::sync::Arc;

/// A typed row that belongs to one output table.
pub trait ArrowRow: Sized {
    /// Table this row type is written to.
    const TABLE: TableName;

    /// Build a batch with the table's full schema, in row order.
    fn to_batch(rows: &[&Self]) -> Result<RecordBatch, ArrowError>;

    /// Value of a named column, used for partition grouping.
    fn column_value(&self, column: &str) -> Option<Value>;
}

macro_rules! utf8 {
    ($rows:expr, $field:ident) => {
        Arc::new(StringArray::from_iter_values(
            $rows.iter().map(|r| r.$field.as_str()),
        )) as ArrayRef
    };
}

macro_rules! utf8_opt {
    ($rows:expr, $field:ident) => {
        Arc::new(StringArray::from_iter(
            $rows.iter().map(|r| r.$field.as_deref()),
        )) as ArrayRef
    };
}

macro_rules! int64 {
    ($rows:expr, $field:ident) => {
        Arc::new(Int64Array::from_iter_values($rows.iter().map(|r| r.$field))) as ArrayRef
    };
}

macro_rules! int32 {
    ($rows:expr, $field:ident) => {
        Arc::new(Int32Array::from_iter_values($rows.iter().map(|r| r.$field))) as ArrayRef
    };
}

macro_rules! float64 {
    ($rows:expr, $field:ident) => {
        Arc::new(Float64Array::from_iter_values($rows.iter().map(|r| r.$field))) as ArrayRef
    };
}

macro_rules! float64_opt {
    ($rows:expr, $field:ident) => {
        Arc::new(Float64Array::from_iter($rows.iter().map(|r| r.$field))) as ArrayRef
    };
}

impl ArrowRow for SongRow {
    const TABLE: TableName = TableName::Songs;

    fn to_batch(rows: &[&Self]) -> Result<RecordBatch, ArrowError> {
        RecordBatch::try_new(
            Self::TABLE.schema(),
            vec![
                utf8!(rows, song_id),
                utf8!(rows, title),
                utf8!(rows, artist_id),
                int64!(rows, year),
                float64!(rows, duration),
            ],
        )
    }

    fn column_value(&self, column: &str) -> Option<Value> {
        self.value(column)
    }
}

impl ArrowRow for ArtistRow {
    const TABLE: TableName = TableName::Artists;

    fn to_batch(rows: &[&Self]) -> Result<RecordBatch, ArrowError> {
        RecordBatch::try_new(
            Self::TABLE.schema(),
            vec![
                utf8!(rows, artist_id),
                utf8!(rows, artist_name),
                utf8_opt!(rows, artist_location),
                float64_opt!(rows, artist_latitude),
                float64_opt!(rows, artist_longitude),
            ],
        )
    }

    fn column_value(&self, column: &str) -> Option<Value> {
        self.value(column)
    }
}

impl ArrowRow for UserRow {
    const TABLE: TableName = TableName::Users;

    fn to_batch(rows: &[&Self]) -> Result<RecordBatch, ArrowError> {
        RecordBatch::try_new(
            Self::TABLE.schema(),
            vec![
                utf8!(rows, user_id),
                utf8!(rows, first_name),
                utf8!(rows, last_name),
                utf8_opt!(rows, gender),
                utf8!(rows, level),
            ],
        )
    }

    fn column_value(&self, column: &str) -> Option<Value> {
        self.value(column)
    }
}

impl ArrowRow for TimeRow {
    const TABLE: TableName = TableName::Time;

    fn to_batch(rows: &[&Self]) -> Result<RecordBatch, ArrowError> {
        RecordBatch::try_new(
            Self::TABLE.schema(),
            vec![
                int64!(rows, start_time),
                int32!(rows, hour),
                int32!(rows, day),
                int32!(rows, week),
                int32!(rows, month),
                int32!(rows, year),
                int32!(rows, weekday),
            ],
        )
    }

    fn column_value(&self, column: &str) -> Option<Value> {
        self.value(column)
    }
}

impl ArrowRow for SongplayRow {
    const TABLE: TableName = TableName::Songplays;

    fn to_batch(rows: &[&Self]) -> Result<RecordBatch, ArrowError> {
        RecordBatch::try_new(
            Self::TABLE.schema(),
            vec![
                int64!(rows, songplay_id),
                int64!(rows, start_time),
                utf8!(rows, user_id),
                utf8!(rows, level),
                utf8_opt!(rows, song_id),
                utf8_opt!(rows, artist_id),
                int64!(rows, session_id),
                utf8_opt!(rows, location),
                utf8_opt!(rows, user_agent),
                int32!(rows, month),
                int32!(rows, year),
            ],
        )
    }

    fn column_value(&self, column: &str) -> Option<Value> {
        self.value(column)
    }
}
