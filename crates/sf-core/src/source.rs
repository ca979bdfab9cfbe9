//! Input record sources.
//!
//! A source yields the decoded catalog and activity records. The JSON
//! directory source reads files matched by glob patterns under an input
//! root; every file may hold one object or a stream of objects (JSON lines).

use serde_json::Deserializer;
use sf_common::{Error, Record, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Provider of raw input records.
pub trait RecordSource {
    /// Song catalog records.
    fn catalog_records(&self) -> Result<Vec<Record>>;

    /// Listening activity records, unfiltered.
    fn activity_records(&self) -> Result<Vec<Record>>;
}

/// JSON files under a local directory.
#[derive(Debug, Clone)]
pub struct JsonDirSource {
    root: PathBuf,
    song_glob: String,
    log_glob: String,
}

impl JsonDirSource {
    pub fn new(root: impl Into<PathBuf>, song_glob: &str, log_glob: &str) -> Self {
        Self {
            root: root.into(),
            song_glob: song_glob.to_string(),
            log_glob: log_glob.to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Files matching `pattern` relative to the root, in sorted order.
    pub fn matching_files(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let full = format!(
            "{}/{}",
            glob::Pattern::escape(&self.root.to_string_lossy()),
            pattern
        );
        let paths = glob::glob(&full).map_err(|e| Error::Decode {
            source_name: pattern.to_string(),
            message: format!("invalid glob pattern: {e}"),
        })?;

        let mut files = Vec::new();
        for entry in paths {
            let path = entry.map_err(|e| Error::Read {
                path: e.path().to_path_buf(),
                source: std::io::Error::new(e.error().kind(), e.error().to_string()),
            })?;
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn read_all(&self, pattern: &str, kind: &str) -> Result<Vec<Record>> {
        let files = self.matching_files(pattern)?;
        let mut records = Vec::new();
        for path in &files {
            let before = records.len();
            read_json_file(path, &mut records)?;
            debug!(path = %path.display(), records = records.len() - before, "input file decoded");
        }
        info!(
            kind,
            files = files.len(),
            records = records.len(),
            root = %self.root.display(),
            "input records loaded"
        );
        Ok(records)
    }
}

impl RecordSource for JsonDirSource {
    fn catalog_records(&self) -> Result<Vec<Record>> {
        self.read_all(&self.song_glob, "catalog")
    }

    fn activity_records(&self) -> Result<Vec<Record>> {
        self.read_all(&self.log_glob, "activity")
    }
}

/// Decode every JSON document in `path` and append it to `out`.
pub fn read_json_file(path: &Path, out: &mut Vec<Record>) -> Result<()> {
    let file = File::open(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let source_name = path.display().to_string();
    let stream = Deserializer::from_reader(BufReader::new(file)).into_iter::<serde_json::Value>();
    for (index, document) in stream.enumerate() {
        let document = document.map_err(|e| Error::Decode {
            source_name: source_name.clone(),
            message: format!("document {}: {e}", index + 1),
        })?;
        out.push(Record::from_json(document, &source_name)?);
    }
    Ok(())
}

/// Records held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pub catalog: Vec<Record>,
    pub activity: Vec<Record>,
}

impl MemorySource {
    pub fn new(catalog: Vec<Record>, activity: Vec<Record>) -> Self {
        Self { catalog, activity }
    }
}

impl RecordSource for MemorySource {
    fn catalog_records(&self) -> Result<Vec<Record>> {
        Ok(self.catalog.clone())
    }

    fn activity_records(&self) -> Result<Vec<Record>> {
        Ok(self.activity.clone())
    }
}
