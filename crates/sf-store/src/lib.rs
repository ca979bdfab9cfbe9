//! Sparkify ETL table storage.
//!
//! This crate provides:
//! - Arrow schema definitions for the five star-schema tables
//! - Row → `RecordBatch` conversion
//! - Hive-style partition grouping and path encoding
//! - A partitioned writer over pluggable sinks (Parquet directory, memory)
//! - A reader for the written song dimension

pub mod batch;
pub mod partition;
pub mod reader;
pub mod schema;
pub mod sink;
pub mod writer;

pub use batch::ArrowRow;
pub use partition::{group_by_partition, parse_partition_path, partition_path, PartitionGroup};
pub use reader::{read_songs, ReadError};
pub use schema::{
    artists_schema, songplays_schema, songs_schema, time_schema, users_schema, TableName,
};
pub use sink::{MemorySink, ParquetDirSink, TableSink, WrittenUnit};
pub use writer::{
    write_partitioned, write_table, PartitionReport, WriteError, WriteReport, WriterConfig,
};

/// File name of the single data file written per partition unit.
pub const PART_FILE_NAME: &str = "part-00000.parquet";

/// Marker written into a table directory once every unit is written.
pub const SUCCESS_MARKER: &str = "_SUCCESS";

/// Value recorded in the Parquet `created_by` key-value metadata.
pub const CREATED_BY: &str = "sparkify-etl";
