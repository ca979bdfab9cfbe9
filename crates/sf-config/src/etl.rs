//! ETL run configuration types.
//!
//! Every field has a default so a partial `etl.toml` (or none at all) is
//! valid. Defaults reproduce the layout of the Sparkify S3 datasets.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete ETL configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct EtlConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub pipeline: PipelineConfig,
}

/// Where decoded records come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// Root directory holding the song and log datasets.
    pub root: PathBuf,

    /// Glob, relative to `root`, matching catalog (song) documents.
    pub song_glob: String,

    /// Glob, relative to `root`, matching activity log documents.
    pub log_glob: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("data"),
            song_glob: "song_data/*/*/*/*.json".to_string(),
            log_glob: "log_data/*/*/*.json".to_string(),
        }
    }
}

/// Where and how tables are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Root directory; each table is written to `<root>/<table>`.
    pub root: PathBuf,

    /// Column compression codec for Parquet files.
    pub compression: Compression,

    /// Also store partition columns inside each file, not only in the path.
    pub keep_partition_columns: bool,

    /// Write `_run_summary.json` at the output root after a run.
    pub write_summary: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("output"),
            compression: Compression::default(),
            keep_partition_columns: false,
            write_summary: true,
        }
    }
}

/// Parquet compression codec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Compression {
    #[default]
    Zstd,
    Snappy,
    None,
}

/// Transform behaviour knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Activity `page` value that marks a song play.
    pub activity_page: String,

    /// Order in which songplay surrogate keys are assigned.
    pub songplay_order: SongplayOrder,

    /// What to do with activity records whose `ts` cannot be decomposed.
    pub invalid_timestamps: InvalidTimestampPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            activity_page: "NextSong".to_string(),
            songplay_order: SongplayOrder::default(),
            invalid_timestamps: InvalidTimestampPolicy::default(),
        }
    }
}

/// Surrogate key ordering for the fact table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SongplayOrder {
    /// Number rows in the order the join produced them.
    #[default]
    Arrival,
    /// Sort by (start_time, session_id, user_id) first; reproducible across runs.
    Stable,
}

/// Handling of activity records with an unusable timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum InvalidTimestampPolicy {
    /// Abort the run on the first invalid timestamp.
    #[default]
    Fail,
    /// Drop the record from `time` and `songplays` and keep going.
    Skip,
}

impl EtlConfig {
    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// JSON schema describing the configuration file.
    pub fn json_schema() -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(schemars::schema_for!(EtlConfig))
    }
}
