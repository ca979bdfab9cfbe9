//! Pipeline-level error type.

use crate::exit_codes::ExitCode;
use sf_config::ConfigError;
use sf_store::{ReadError, WriteError};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Any failure that aborts a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Record(#[from] sf_common::Error),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error("failed to load song dimension: {0}")]
    Read(#[from] ReadError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to write run summary to {path}: {source}")]
    Summary {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    /// Map the failure to the CLI exit code.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            PipelineError::Record(e) if e.is_schema_violation() => ExitCode::SchemaError,
            PipelineError::Record(sf_common::Error::InvalidTimestamp { .. }) => {
                ExitCode::TimestampError
            }
            PipelineError::Record(_) => ExitCode::IoError,
            PipelineError::Write(_) | PipelineError::Summary { .. } => ExitCode::WriteError,
            PipelineError::Read(_) => ExitCode::IoError,
            PipelineError::Config(_) => ExitCode::ConfigError,
            PipelineError::Json(_) => ExitCode::InternalError,
        }
    }
}
