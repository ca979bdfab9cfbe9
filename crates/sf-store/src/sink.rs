//! Destinations for encoded partition units.

use crate::schema::TableName;
use crate::writer::WriteError;
use crate::{CREATED_BY, PART_FILE_NAME, SUCCESS_MARKER};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use parquet::format::KeyValue;
use sf_common::SCHEMA_VERSION;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Storage backend that receives one batch per partition unit.
///
/// A table is written as `begin_table`, any number of `write_unit`, then
/// `finish_table`. `begin_table` discards whatever a previous run left for
/// that table.
pub trait TableSink {
    fn begin_table(&mut self, table: TableName) -> Result<(), WriteError>;

    /// Write one unit. `partition` is the encoded relative path, empty for
    /// unpartitioned tables.
    fn write_unit(
        &mut self,
        table: TableName,
        partition: &str,
        batch: &RecordBatch,
    ) -> Result<(), WriteError>;

    fn finish_table(&mut self, table: TableName) -> Result<(), WriteError>;
}

/// Local directory of Parquet files:
/// `<root>/<table>/<partition path>/part-00000.parquet`.
#[derive(Debug, Clone)]
pub struct ParquetDirSink {
    root: PathBuf,
    compression: Compression,
}

impl ParquetDirSink {
    pub fn new(root: impl Into<PathBuf>, compression: Compression) -> Self {
        Self {
            root: root.into(),
            compression,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn table_dir(&self, table: TableName) -> PathBuf {
        self.root.join(table.as_str())
    }

    fn properties(&self, table: TableName) -> WriterProperties {
        let metadata = vec![
            KeyValue::new("created_by".to_string(), CREATED_BY.to_string()),
            KeyValue::new("schema_version".to_string(), SCHEMA_VERSION.to_string()),
            KeyValue::new("table".to_string(), table.as_str().to_string()),
        ];
        WriterProperties::builder()
            .set_compression(self.compression)
            .set_key_value_metadata(Some(metadata))
            .build()
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> WriteError + '_ {
    move |source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl TableSink for ParquetDirSink {
    fn begin_table(&mut self, table: TableName) -> Result<(), WriteError> {
        let dir = self.table_dir(table);
        if dir.exists() {
            debug!(path = %dir.display(), "removing previous table output");
            fs::remove_dir_all(&dir).map_err(io_err(&dir))?;
        }
        fs::create_dir_all(&dir).map_err(io_err(&dir))
    }

    fn write_unit(
        &mut self,
        table: TableName,
        partition: &str,
        batch: &RecordBatch,
    ) -> Result<(), WriteError> {
        let dir = if partition.is_empty() {
            self.table_dir(table)
        } else {
            self.table_dir(table).join(partition)
        };
        fs::create_dir_all(&dir).map_err(io_err(&dir))?;

        let path = dir.join(PART_FILE_NAME);
        let file = File::create(&path).map_err(io_err(&path))?;
        let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(self.properties(table)))?;
        writer.write(batch)?;
        writer.close()?;

        debug!(path = %path.display(), rows = batch.num_rows(), "parquet unit written");
        Ok(())
    }

    fn finish_table(&mut self, table: TableName) -> Result<(), WriteError> {
        let marker = self.table_dir(table).join(SUCCESS_MARKER);
        File::create(&marker).map_err(io_err(&marker))?;
        Ok(())
    }
}

/// A unit captured by [`MemorySink`].
#[derive(Debug, Clone)]
pub struct WrittenUnit {
    pub table: TableName,
    pub partition: String,
    pub batch: RecordBatch,
}

/// In-memory sink that keeps every unit; used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemorySink {
    units: Vec<WrittenUnit>,
    finished: Vec<TableName>,
}

impl MemorySink {
    /// Units written for `table`, in write order.
    pub fn units(&self, table: TableName) -> Vec<&WrittenUnit> {
        self.units.iter().filter(|u| u.table == table).collect()
    }

    /// Total rows written for `table` across all units.
    pub fn row_count(&self, table: TableName) -> usize {
        self.units(table).iter().map(|u| u.batch.num_rows()).sum()
    }

    pub fn is_finished(&self, table: TableName) -> bool {
        self.finished.contains(&table)
    }

    /// Render every unit of `table` as an ASCII table.
    pub fn pretty(&self, table: TableName) -> Result<String, ArrowError> {
        let batches: Vec<RecordBatch> = self
            .units(table)
            .into_iter()
            .map(|u| u.batch.clone())
            .collect();
        Ok(pretty_format_batches(&batches)?.to_string())
    }
}

impl TableSink for MemorySink {
    fn begin_table(&mut self, table: TableName) -> Result<(), WriteError> {
        self.units.retain(|u| u.table != table);
        self.finished.retain(|t| *t != table);
        Ok(())
    }

    fn write_unit(
        &mut self,
        table: TableName,
        partition: &str,
        batch: &RecordBatch,
    ) -> Result<(), WriteError> {
        self.units.push(WrittenUnit {
            table,
            partition: partition.to_string(),
            batch: batch.clone(),
        });
        Ok(())
    }

    fn finish_table(&mut self, table: TableName) -> Result<(), WriteError> {
        self.finished.push(table);
        Ok(())
    }
}
