//! Version stamp of the written tables.
//!
//! Every Parquet file carries `schema_version` in its key-value metadata.
//! A later run reading the songs table back checks the stamp before
//! trusting the column layout.

/// Layout version of the five output tables (`MAJOR.MINOR.PATCH`).
///
/// A minor bump may only add nullable columns; renaming, retyping or
/// dropping a column, or changing a partition key, bumps the major.
pub const SCHEMA_VERSION: &str = "1.0.0";

fn major(version: &str) -> Option<u32> {
    let mut parts = version.trim().split('.');
    let major = parts.next()?.parse().ok()?;
    (parts.count() == 2).then_some(major)
}

/// Whether tables stamped with `version` can be read by this build.
///
/// Malformed stamps are never compatible.
pub fn is_compatible(version: &str) -> bool {
    match (major(version), major(SCHEMA_VERSION)) {
        (Some(stored), Some(current)) => stored == current,
        _ => false,
    }
}
