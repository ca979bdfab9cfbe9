//! Sparkify ETL core: transforms, stage orchestration and the CLI.
//!
//! Song catalog and listening activity records are reshaped into a star
//! schema (songs, artists, users, time, songplays) and written as
//! partitioned Parquet tables.

pub mod cli;
pub mod context;
pub mod error;
pub mod exit_codes;
pub mod pipeline;
pub mod source;
pub mod summary;
pub mod transform;

pub use context::EtlContext;
pub use error::{PipelineError, Result};
pub use exit_codes::ExitCode;
pub use pipeline::{run_activity_stage, run_catalog_stage, run_stage, Stage, StageReport};
pub use source::{JsonDirSource, MemorySource, RecordSource};
pub use summary::{RunSummary, SUMMARY_FILE_NAME};
