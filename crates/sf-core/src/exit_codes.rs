//! Exit codes for the sparkify-etl CLI.
//!
//! Exit codes communicate the run outcome without requiring output parsing.

/// Exit codes for sparkify-etl operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Every requested table was written
    Clean = 0,

    /// Configuration could not be loaded or is invalid
    ConfigError = 10,

    /// Input violated the declared schema (missing field, wrong type, bad JSON)
    SchemaError = 11,

    /// An activity timestamp could not be decomposed
    TimestampError = 12,

    /// A table or partition could not be written
    WriteError = 13,

    /// Input or previously written output could not be read
    IoError = 14,

    /// Internal/unknown error
    InternalError = 99,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}
