//! Typed rows of the five output tables.
//!
//! Each row type is built from a projected [`Record`] exactly once; after
//! that point the pipeline works on typed values only. `COLUMNS` is the
//! declared column order, shared by the projector and the Arrow schemas.

use crate::error::Result;
use crate::record::Record;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Row of the `songs` dimension.
///
/// Equality and hashing compare `duration` by bit pattern, like [`Value`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongRow {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub year: i64,
    pub duration: f64,
}

impl SongRow {
    pub const COLUMNS: &'static [&'static str] =
        &["song_id", "title", "artist_id", "year", "duration"];

    fn key(&self) -> (&str, &str, &str, i64, u64) {
        (
            self.song_id.as_str(),
            self.title.as_str(),
            self.artist_id.as_str(),
            self.year,
            self.duration.to_bits(),
        )
    }

    pub fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            song_id: record.str_field("song_id")?,
            title: record.str_field("title")?,
            artist_id: record.str_field("artist_id")?,
            year: record.int_field("year")?,
            duration: record.float_field("duration")?,
        })
    }

    pub fn value(&self, column: &str) -> Option<Value> {
        match column {
            "song_id" => Some(self.song_id.as_str().into()),
            "title" => Some(self.title.as_str().into()),
            "artist_id" => Some(self.artist_id.as_str().into()),
            "year" => Some(self.year.into()),
            "duration" => Some(self.duration.into()),
            _ => None,
        }
    }
}

impl PartialEq for SongRow {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for SongRow {}

impl Hash for SongRow {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// Row of the `artists` dimension.
///
/// Coordinates compare by bit pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistRow {
    pub artist_id: String,
    pub artist_name: String,
    pub artist_location: Option<String>,
    pub artist_latitude: Option<f64>,
    pub artist_longitude: Option<f64>,
}

impl ArtistRow {
    pub const COLUMNS: &'static [&'static str] = &[
        "artist_id",
        "artist_name",
        "artist_location",
        "artist_latitude",
        "artist_longitude",
    ];

    fn key(&self) -> (&str, &str, Option<&str>, Option<u64>, Option<u64>) {
        (
            self.artist_id.as_str(),
            self.artist_name.as_str(),
            self.artist_location.as_deref(),
            self.artist_latitude.map(f64::to_bits),
            self.artist_longitude.map(f64::to_bits),
        )
    }

    pub fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            artist_id: record.str_field("artist_id")?,
            artist_name: record.str_field("artist_name")?,
            artist_location: record.opt_str_field("artist_location")?,
            artist_latitude: record.opt_float_field("artist_latitude")?,
            artist_longitude: record.opt_float_field("artist_longitude")?,
        })
    }

    pub fn value(&self, column: &str) -> Option<Value> {
        match column {
            "artist_id" => Some(self.artist_id.as_str().into()),
            "artist_name" => Some(self.artist_name.as_str().into()),
            "artist_location" => Some(self.artist_location.clone().into()),
            "artist_latitude" => Some(self.artist_latitude.into()),
            "artist_longitude" => Some(self.artist_longitude.into()),
            _ => None,
        }
    }
}

impl PartialEq for ArtistRow {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for ArtistRow {}

impl Hash for ArtistRow {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// Row of the `users` dimension.
///
/// Rows are distinct on every column, so a user whose level changed
/// appears once per level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserRow {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub level: String,
}

impl UserRow {
    pub const COLUMNS: &'static [&'static str] =
        &["user_id", "first_name", "last_name", "gender", "level"];

    pub fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            user_id: record.str_field("user_id")?,
            first_name: record.str_field("first_name")?,
            last_name: record.str_field("last_name")?,
            gender: record.opt_str_field("gender")?,
            level: record.str_field("level")?,
        })
    }

    pub fn value(&self, column: &str) -> Option<Value> {
        match column {
            "user_id" => Some(self.user_id.as_str().into()),
            "first_name" => Some(self.first_name.as_str().into()),
            "last_name" => Some(self.last_name.as_str().into()),
            "gender" => Some(self.gender.clone().into()),
            "level" => Some(self.level.as_str().into()),
            _ => None,
        }
    }
}

/// Row of the `time` dimension: one calendar decomposition per start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRow {
    /// Epoch seconds.
    pub start_time: i64,
    pub hour: i32,
    pub day: i32,
    pub week: i32,
    pub month: i32,
    pub year: i32,
    /// 1 = Sunday .. 7 = Saturday.
    pub weekday: i32,
}

impl TimeRow {
    pub const COLUMNS: &'static [&'static str] = &[
        "start_time",
        "hour",
        "day",
        "week",
        "month",
        "year",
        "weekday",
    ];

    pub fn value(&self, column: &str) -> Option<Value> {
        match column {
            "start_time" => Some(self.start_time.into()),
            "hour" => Some(self.hour.into()),
            "day" => Some(self.day.into()),
            "week" => Some(self.week.into()),
            "month" => Some(self.month.into()),
            "year" => Some(self.year.into()),
            "weekday" => Some(self.weekday.into()),
            _ => None,
        }
    }
}

/// Row of the `songplays` fact table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SongplayRow {
    pub songplay_id: i64,
    pub start_time: i64,
    pub user_id: String,
    pub level: String,
    pub song_id: Option<String>,
    pub artist_id: Option<String>,
    pub session_id: i64,
    pub location: Option<String>,
    pub user_agent: Option<String>,
    pub month: i32,
    pub year: i32,
}

impl SongplayRow {
    pub const COLUMNS: &'static [&'static str] = &[
        "songplay_id",
        "start_time",
        "user_id",
        "level",
        "song_id",
        "artist_id",
        "session_id",
        "location",
        "user_agent",
        "month",
        "year",
    ];

    pub fn value(&self, column: &str) -> Option<Value> {
        match column {
            "songplay_id" => Some(self.songplay_id.into()),
            "start_time" => Some(self.start_time.into()),
            "user_id" => Some(self.user_id.as_str().into()),
            "level" => Some(self.level.as_str().into()),
            "song_id" => Some(self.song_id.clone().into()),
            "artist_id" => Some(self.artist_id.clone().into()),
            "session_id" => Some(self.session_id.into()),
            "location" => Some(self.location.clone().into()),
            "user_agent" => Some(self.user_agent.clone().into()),
            "month" => Some(self.month.into()),
            "year" => Some(self.year.into()),
            _ => None,
        }
    }
}
