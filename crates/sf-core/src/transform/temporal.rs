//! Calendar decomposition of epoch-millisecond timestamps.
//!
//! Conventions are fixed for compatibility with existing consumers of the
//! `time` table:
//! - milliseconds are truncated to seconds (integer division), not rounded
//! - all fields are computed in UTC
//! - `week` is the ISO-8601 week number
//! - `weekday` counts 1 = Sunday .. 7 = Saturday

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::Serialize;
use sf_common::{Error, Result, TimeRow};

/// A timestamp split into calendar fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TemporalRecord {
    pub epoch_seconds: i64,
    pub hour: u32,
    pub day: u32,
    pub week: u32,
    pub month: u32,
    pub year: i32,
    pub weekday: u32,
}

/// Decompose an epoch-millisecond timestamp.
///
/// Negative input and instants outside chrono's representable range fail
/// with `InvalidTimestamp`.
pub fn decompose(epoch_millis: i64) -> Result<TemporalRecord> {
    if epoch_millis < 0 {
        return Err(Error::InvalidTimestamp {
            value: epoch_millis,
            reason: "negative epoch milliseconds".to_string(),
        });
    }

    let epoch_seconds = epoch_millis / 1000;
    let instant: DateTime<Utc> =
        DateTime::from_timestamp(epoch_seconds, 0).ok_or_else(|| Error::InvalidTimestamp {
            value: epoch_millis,
            reason: "outside the representable calendar range".to_string(),
        })?;

    Ok(TemporalRecord {
        epoch_seconds,
        hour: instant.hour(),
        day: instant.day(),
        week: instant.iso_week().week(),
        month: instant.month(),
        year: instant.year(),
        weekday: instant.weekday().number_from_sunday(),
    })
}

impl From<TemporalRecord> for TimeRow {
    fn from(t: TemporalRecord) -> Self {
        // Calendar fields are bounded (hour < 24, week <= 53, ...).
        TimeRow {
            start_time: t.epoch_seconds,
            hour: t.hour as i32,
            day: t.day as i32,
            week: t.week as i32,
            month: t.month as i32,
            year: t.year,
            weekday: t.weekday as i32,
        }
    }
}
