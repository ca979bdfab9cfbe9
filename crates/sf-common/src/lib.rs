//! Sparkify ETL common types, IDs, and errors.
//!
//! This crate provides foundational types shared across the sf-* crates:
//! - Dynamically typed values and records as decoded from input files
//! - Typed row schemas for the five star-schema tables
//! - Run identity and output schema versioning
//! - Common error types
//! - Output format specifications

pub mod error;
pub mod id;
pub mod output;
pub mod record;
pub mod rows;
pub mod schema;
pub mod value;

pub use error::{Error, Result};
pub use id::RunId;
pub use output::OutputFormat;
pub use record::Record;
pub use rows::{ArtistRow, SongRow, SongplayRow, TimeRow, UserRow};
pub use schema::SCHEMA_VERSION;
pub use value::Value;
