//! Error types for Sparkify ETL.

use thiserror::Error;

/// Result type alias for record and transform operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for decoding and transforming records.
#[derive(Error, Debug)]
pub enum Error {
    // Schema errors (20-29)
    #[error("missing field '{field}' (available: {})", available.join(", "))]
    MissingField {
        field: String,
        available: Vec<String>,
    },

    #[error("field '{field}' has type {found}, expected {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("failed to decode {source_name}: {message}")]
    Decode {
        source_name: String,
        message: String,
    },

    // Temporal errors (30-39)
    #[error("invalid timestamp {value}: {reason}")]
    InvalidTimestamp { value: i64, reason: String },

    // I/O errors (60-69)
    #[error("failed to read {path}: {source}")]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    /// Used for detailed error reporting in JSON output.
    pub fn code(&self) -> u32 {
        match self {
            Error::MissingField { .. } => 20,
            Error::TypeMismatch { .. } => 21,
            Error::Decode { .. } => 22,
            Error::InvalidTimestamp { .. } => 30,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
            Error::Read { .. } => 62,
        }
    }

    /// Whether the error indicates the input violated the declared schema.
    pub fn is_schema_violation(&self) -> bool {
        matches!(
            self,
            Error::MissingField { .. } | Error::TypeMismatch { .. } | Error::Decode { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_lists_available() {
        let err = Error::MissingField {
            field: "title".to_string(),
            available: vec!["song_id".to_string(), "year".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "missing field 'title' (available: song_id, year)"
        );
        assert_eq!(err.code(), 20);
        assert!(err.is_schema_violation());
    }

    #[test]
    fn test_timestamp_is_not_schema_violation() {
        let err = Error::InvalidTimestamp {
            value: -1,
            reason: "negative".to_string(),
        };
        assert!(!err.is_schema_violation());
        assert_eq!(err.code(), 30);
    }
}
