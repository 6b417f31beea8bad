//! Input record sources.
//!
//! Crawler output files are JSON objects mapping record id to
//! `{ "url": ..., "content": ... }`. Each file is loaded whole. An entry that
//! is not such an object is rejected on its own; its siblings still load.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, warn};

use character_types::RawRecord;

use crate::builder::BuildError;
use crate::error::IndexingError;

/// A named group of raw records.
pub trait RecordSource: Send + Sync {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Read all records. Called once per session.
    fn load(&self) -> Result<SourceRecords, IndexingError>;
}

/// Everything read from one source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRecords {
    pub records: Vec<RawRecord>,
    /// Entries present in the source that could not be read as records.
    pub rejected: Vec<BuildError>,
}

impl SourceRecords {
    /// Entries seen, readable or not.
    pub fn len(&self) -> usize {
        self.records.len() + self.rejected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<RawRecord>> for SourceRecords {
    fn from(records: Vec<RawRecord>) -> Self {
        Self {
            records,
            rejected: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SourceEntry {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

/// Crawler output file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    name: String,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn source_error(&self, message: impl ToString) -> IndexingError {
        IndexingError::Source {
            name: self.name.clone(),
            message: message.to_string(),
        }
    }
}

impl RecordSource for JsonFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    /// Records come back ordered by id.
    fn load(&self) -> Result<SourceRecords, IndexingError> {
        let file = File::open(&self.path).map_err(|e| self.source_error(e))?;
        let entries: BTreeMap<String, serde_json::Value> =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| self.source_error(e))?;

        let mut loaded = SourceRecords::default();
        for (id, value) in entries {
            match serde_json::from_value::<SourceEntry>(value) {
                Ok(entry) => loaded.records.push(RawRecord {
                    id,
                    url: entry.url,
                    content: entry.content,
                }),
                Err(e) => loaded.rejected.push(BuildError::Rejected {
                    id,
                    reason: e.to_string(),
                }),
            }
        }

        debug!(
            source = %self.name,
            records = loaded.records.len(),
            rejected = loaded.rejected.len(),
            "Loaded source"
        );
        Ok(loaded)
    }
}

/// In-memory records, for tests and embedding.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    records: Vec<RawRecord>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, records: Vec<RawRecord>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }
}

impl RecordSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<SourceRecords, IndexingError> {
        Ok(SourceRecords::from(self.records.clone()))
    }
}

/// Keep the configured input files that exist, in the given order.
///
/// Missing files are logged and skipped. Fails when none exist.
pub fn discover_sources(paths: &[PathBuf]) -> Result<Vec<JsonFileSource>, IndexingError> {
    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        if path.is_file() {
            sources.push(JsonFileSource::new(path));
        } else {
            warn!(path = %path.display(), "Input file not found, skipping");
        }
    }

    if sources.is_empty() {
        return Err(IndexingError::NoValidSources);
    }

    info!(found = sources.len(), configured = paths.len(), "Discovered input files");
    Ok(sources)
}
