//! Execution context for a run.
//!
//! Created once in `main`, passed by reference to every stage and dropped
//! when the process ends. It replaces any process-wide session state.

use chrono::{DateTime, Utc};
use parquet::basic::{Compression as ParquetCompression, ZstdLevel};
use sf_common::RunId;
use sf_config::{Compression, ConfigSource, EtlConfig, ResolvedConfig};
use sf_store::WriterConfig;

/// Immutable per-run state.
#[derive(Debug, Clone)]
pub struct EtlContext {
    pub run_id: RunId,
    pub config: EtlConfig,
    pub config_source: ConfigSource,
    pub started_at: DateTime<Utc>,
}

impl EtlContext {
    pub fn new(resolved: ResolvedConfig) -> Self {
        Self {
            run_id: RunId::new(),
            config: resolved.config,
            config_source: resolved.source,
            started_at: Utc::now(),
        }
    }

    /// Context over an in-memory configuration (tests, embedding).
    pub fn from_config(config: EtlConfig) -> Self {
        Self::new(ResolvedConfig {
            config,
            source: ConfigSource::Defaults,
        })
    }

    /// Writer settings derived from the output configuration.
    pub fn writer_config(&self) -> WriterConfig {
        WriterConfig {
            compression: parquet_compression(self.config.output.compression),
            keep_partition_columns: self.config.output.keep_partition_columns,
        }
    }
}

fn parquet_compression(compression: Compression) -> ParquetCompression {
    match compression {
        Compression::Zstd => ParquetCompression::ZSTD(ZstdLevel::default()),
        Compression::Snappy => ParquetCompression::SNAPPY,
        Compression::None => ParquetCompression::UNCOMPRESSED,
    }
}
