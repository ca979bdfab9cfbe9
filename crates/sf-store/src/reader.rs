//! Reader for the written song dimension.
//!
//! The activity stage joins against the songs table as it was written, so
//! it can run in a separate process after the catalog stage. Partition
//! columns are restored from the directory names when they were not kept
//! inside the files.

use crate::partition::parse_partition_path;
use crate::schema::TableName;
use arrow::array::{Array, Float64Array, Int64Array, StringArray};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::errors::ParquetError;
use sf_common::schema::is_compatible;
use sf_common::SongRow;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors from reading a written table.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("table directory not found: {0}")]
    TableNotFound(PathBuf),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Parquet error in {path}: {source}")]
    Parquet {
        path: PathBuf,
        #[source]
        source: ParquetError,
    },

    #[error("Arrow error in {path}: {source}")]
    Arrow {
        path: PathBuf,
        #[source]
        source: arrow::error::ArrowError,
    },

    #[error("{path} was written with incompatible schema version {version}")]
    IncompatibleSchema { path: PathBuf, version: String },

    #[error("{path}: column '{column}' is missing or has an unexpected type")]
    Column { path: PathBuf, column: String },
}

/// Read every row of `<root>/songs`.
pub fn read_songs(root: &Path) -> Result<Vec<SongRow>, ReadError> {
    let table_dir = root.join(TableName::Songs.as_str());
    if !table_dir.is_dir() {
        return Err(ReadError::TableNotFound(table_dir));
    }

    let pattern = format!("{}/**/*.parquet", glob::Pattern::escape(&table_dir.to_string_lossy()));
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry.map_err(|e| ReadError::Io {
            path: e.path().to_path_buf(),
            source: std::io::Error::new(e.error().kind(), e.error().to_string()),
        })?;
        files.push(path);
    }
    files.sort();

    let mut songs = Vec::new();
    for path in &files {
        let relative = path
            .parent()
            .and_then(|p| p.strip_prefix(&table_dir).ok())
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .unwrap_or_default();
        let partition = parse_partition_path(&relative);
        let before = songs.len();
        read_song_file(path, &partition, &mut songs)?;
        debug!(path = %path.display(), rows = songs.len() - before, "song file read");
    }

    info!(files = files.len(), rows = songs.len(), "song dimension loaded");
    Ok(songs)
}

fn read_song_file(
    path: &Path,
    partition: &[(String, Option<String>)],
    out: &mut Vec<SongRow>,
) -> Result<(), ReadError> {
    let file = File::open(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).map_err(|source| ReadError::Parquet {
            path: path.to_path_buf(),
            source,
        })?;

    let version = builder
        .metadata()
        .file_metadata()
        .key_value_metadata()
        .and_then(|kvs| kvs.iter().find(|kv| kv.key == "schema_version"))
        .and_then(|kv| kv.value.clone());
    if let Some(version) = version {
        if !is_compatible(&version) {
            return Err(ReadError::IncompatibleSchema {
                path: path.to_path_buf(),
                version,
            });
        }
    }

    let reader = builder.build().map_err(|source| ReadError::Parquet {
        path: path.to_path_buf(),
        source,
    })?;
    for batch in reader {
        let batch = batch.map_err(|source| ReadError::Arrow {
            path: path.to_path_buf(),
            source,
        })?;
        let columns = SongColumns::resolve(&batch, partition, path)?;
        for i in 0..batch.num_rows() {
            out.push(columns.row(i, path)?);
        }
    }
    Ok(())
}

/// A song column: stored in the file, or fixed by the partition path.
enum Column<'a, A> {
    Stored(&'a A),
    Partition(Option<&'a str>),
}

struct SongColumns<'a> {
    song_id: Column<'a, StringArray>,
    title: Column<'a, StringArray>,
    artist_id: Column<'a, StringArray>,
    year: Column<'a, Int64Array>,
    duration: Column<'a, Float64Array>,
}

impl<'a> SongColumns<'a> {
    fn resolve(
        batch: &'a RecordBatch,
        partition: &'a [(String, Option<String>)],
        path: &Path,
    ) -> Result<Self, ReadError> {
        Ok(Self {
            song_id: column(batch, partition, "song_id", path)?,
            title: column(batch, partition, "title", path)?,
            artist_id: column(batch, partition, "artist_id", path)?,
            year: column(batch, partition, "year", path)?,
            duration: column(batch, partition, "duration", path)?,
        })
    }

    fn row(&self, i: usize, path: &Path) -> Result<SongRow, ReadError> {
        Ok(SongRow {
            song_id: string_at(&self.song_id, i, "song_id", path)?,
            title: string_at(&self.title, i, "title", path)?,
            artist_id: string_at(&self.artist_id, i, "artist_id", path)?,
            year: match &self.year {
                Column::Stored(a) if a.is_valid(i) => a.value(i),
                Column::Partition(Some(v)) => v.parse().map_err(|_| bad(path, "year"))?,
                _ => return Err(bad(path, "year")),
            },
            duration: match &self.duration {
                Column::Stored(a) if a.is_valid(i) => a.value(i),
                Column::Partition(Some(v)) => v.parse().map_err(|_| bad(path, "duration"))?,
                _ => return Err(bad(path, "duration")),
            },
        })
    }
}

fn column<'a, A: Array + 'static>(
    batch: &'a RecordBatch,
    partition: &'a [(String, Option<String>)],
    name: &str,
    path: &Path,
) -> Result<Column<'a, A>, ReadError> {
    if let Some(array) = batch.column_by_name(name) {
        return array
            .as_any()
            .downcast_ref::<A>()
            .map(Column::Stored)
            .ok_or_else(|| bad(path, name));
    }
    partition
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| Column::Partition(value.as_deref()))
        .ok_or_else(|| bad(path, name))
}

fn string_at(
    column: &Column<'_, StringArray>,
    i: usize,
    name: &str,
    path: &Path,
) -> Result<String, ReadError> {
    match column {
        Column::Stored(a) if a.is_valid(i) => Ok(a.value(i).to_string()),
        Column::Partition(Some(v)) => Ok((*v).to_string()),
        _ => Err(bad(path, name)),
    }
}

fn bad(path: &Path, column: &str) -> ReadError {
    ReadError::Column {
        path: path.to_path_buf(),
        column: column.to_string(),
    }
}
