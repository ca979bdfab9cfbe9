//! Sparkify ETL configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for `etl.toml`
//! - Config resolution (CLI → env → XDG → defaults)
//! - Semantic validation
//! - JSON schema export for editor tooling

pub mod etl;
pub mod resolve;
pub mod validate;

pub use etl::{
    Compression, EtlConfig, InputConfig, InvalidTimestampPolicy, OutputConfig, PipelineConfig,
    SongplayOrder,
};
pub use resolve::{resolve_config, ConfigError, ConfigPaths, ConfigSource, ResolvedConfig};
pub use validate::{validate, ValidationError, ValidationResult};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "SPARKIFY_ETL_CONFIG";

/// File name looked up in the XDG config directory.
pub const CONFIG_FILE_NAME: &str = "etl.toml";
