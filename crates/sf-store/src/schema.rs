//! Arrow schemas for the star-schema tables.
//!
//! These schemas are the contract for anything reading the output
//! directory. Keep changes additive and bump `SCHEMA_VERSION` on breaking
//! changes.

use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The five output tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableName {
    Songs,
    Artists,
    Users,
    Time,
    Songplays,
}

impl TableName {
    pub const ALL: [TableName; 5] = [
        TableName::Songs,
        TableName::Artists,
        TableName::Users,
        TableName::Time,
        TableName::Songplays,
    ];

    /// Directory name under the output root.
    pub fn as_str(self) -> &'static str {
        match self {
            TableName::Songs => "songs",
            TableName::Artists => "artists",
            TableName::Users => "users",
            TableName::Time => "time",
            TableName::Songplays => "songplays",
        }
    }

    /// Partition columns, outermost directory first.
    pub fn partition_keys(self) -> &'static [&'static str] {
        match self {
            TableName::Songs => &["year", "artist_id"],
            TableName::Time | TableName::Songplays => &["year", "month"],
            TableName::Artists | TableName::Users => &[],
        }
    }

    pub fn schema(self) -> SchemaRef {
        match self {
            TableName::Songs => songs_schema(),
            TableName::Artists => artists_schema(),
            TableName::Users => users_schema(),
            TableName::Time => time_schema(),
            TableName::Songplays => songplays_schema(),
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn songs_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("song_id", DataType::Utf8, false),
        Field::new("title", DataType::Utf8, false),
        Field::new("artist_id", DataType::Utf8, false),
        Field::new("year", DataType::Int64, false),
        Field::new("duration", DataType::Float64, false),
    ]))
}

pub fn artists_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("artist_id", DataType::Utf8, false),
        Field::new("artist_name", DataType::Utf8, false),
        Field::new("artist_location", DataType::Utf8, true),
        Field::new("artist_latitude", DataType::Float64, true),
        Field::new("artist_longitude", DataType::Float64, true),
    ]))
}

pub fn users_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("user_id", DataType::Utf8, false),
        Field::new("first_name", DataType::Utf8, false),
        Field::new("last_name", DataType::Utf8, false),
        Field::new("gender", DataType::Utf8, true),
        Field::new("level", DataType::Utf8, false),
    ]))
}

pub fn time_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("start_time", DataType::Int64, false),
        Field::new("hour", DataType::Int32, false),
        Field::new("day", DataType::Int32, false),
        Field::new("week", DataType::Int32, false),
        Field::new("month", DataType::Int32, false),
        Field::new("year", DataType::Int32, false),
        Field::new("weekday", DataType::Int32, false),
    ]))
}

pub fn songplays_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("songplay_id", DataType::Int64, false),
        Field::new("start_time", DataType::Int64, false),
        Field::new("user_id", DataType::Utf8, false),
        Field::new("level", DataType::Utf8, false),
        Field::new("song_id", DataType::Utf8, true),
        Field::new("artist_id", DataType::Utf8, true),
        Field::new("session_id", DataType::Int64, false),
        Field::new("location", DataType::Utf8, true),
        Field::new("user_agent", DataType::Utf8, true),
        Field::new("month", DataType::Int32, false),
        Field::new("year", DataType::Int32, false),
    ]))
}
