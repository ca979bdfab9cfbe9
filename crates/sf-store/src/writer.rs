//! Partitioned table writer.
//!
//! Rows are grouped by their partition-key tuple and each group is handed
//! to a [`TableSink`] as one independent unit. Units are written in sorted
//! path order. A failure aborts the table; units already written stay
//! in place (there is no rollback across partitions).

use crate::batch::ArrowRow;
use crate::partition::group_by_partition;
use crate::schema::TableName;
use crate::sink::TableSink;
use arrow::error::ArrowError;
use parquet::basic::{Compression, ZstdLevel};
use parquet::errors::ParquetError;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

/// Errors from writing a table.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    #[error("table {table} has no column '{key}' to partition by")]
    UnknownPartitionKey { table: String, key: String },

    #[error("failed to write {table} partition '{partition}': {source}")]
    Partition {
        table: String,
        partition: String,
        #[source]
        source: Box<WriteError>,
    },
}

/// Writer configuration.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Parquet column compression.
    pub compression: Compression,

    /// Keep partition columns inside the data files as well as in the path.
    pub keep_partition_columns: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::ZSTD(ZstdLevel::default()),
            keep_partition_columns: false,
        }
    }
}

/// Outcome of writing one partition unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionReport {
    pub path: String,
    pub rows: usize,
}

/// Outcome of writing a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteReport {
    pub table: TableName,
    pub rows: usize,
    pub partitions: Vec<PartitionReport>,
}

/// Write a table using its declared partition keys.
pub fn write_table<R, S>(
    sink: &mut S,
    rows: &[R],
    config: &WriterConfig,
) -> Result<WriteReport, WriteError>
where
    R: ArrowRow,
    S: TableSink + ?Sized,
{
    write_partitioned(sink, rows, R::TABLE.partition_keys(), config)
}

/// Write rows grouped by an explicit ordered list of partition keys.
pub fn write_partitioned<R, S>(
    sink: &mut S,
    rows: &[R],
    partition_keys: &[&str],
    config: &WriterConfig,
) -> Result<WriteReport, WriteError>
where
    R: ArrowRow,
    S: TableSink + ?Sized,
{
    let table = R::TABLE;
    let groups = group_by_partition(rows, partition_keys)?;

    sink.begin_table(table)?;

    let mut partitions = Vec::with_capacity(groups.len());
    for group in groups {
        let batch = R::to_batch(&group.rows)?;
        let batch = if config.keep_partition_columns || partition_keys.is_empty() {
            batch
        } else {
            let schema = batch.schema();
            let keep: Vec<usize> = schema
                .fields()
                .iter()
                .enumerate()
                .filter(|(_, f)| !partition_keys.contains(&f.name().as_str()))
                .map(|(i, _)| i)
                .collect();
            batch.project(&keep)?
        };

        sink.write_unit(table, &group.path, &batch)
            .map_err(|source| WriteError::Partition {
                table: table.to_string(),
                partition: group.path.clone(),
                source: Box::new(source),
            })?;

        debug!(table = %table, partition = %group.path, rows = group.rows.len(), "partition written");
        partitions.push(PartitionReport {
            path: group.path,
            rows: group.rows.len(),
        });
    }

    sink.finish_table(table)?;

    info!(
        table = %table,
        rows = rows.len(),
        partitions = partitions.len(),
        "table written"
    );

    Ok(WriteReport {
        table,
        rows: rows.len(),
        partitions,
    })
}
