//! Tantivy index management.
//!
//! Handles index creation, opening, and writer/reader construction.

use std::path::{Path, PathBuf};

use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy};
use tracing::{debug, info};

use crate::error::SearchError;
use crate::schema::{build_character_schema, SearchSchema};

/// Default memory budget for IndexWriter (256MB)
const DEFAULT_WRITER_MEMORY_MB: usize = 256;

/// Search index configuration
#[derive(Debug, Clone)]
pub struct SearchIndexConfig {
    /// Path to index directory
    pub index_path: PathBuf,
    /// Memory budget for writer in MB
    pub writer_memory_mb: usize,
}

impl Default for SearchIndexConfig {
    fn default() -> Self {
        Self {
            index_path: PathBuf::from("./marvel_index"),
            writer_memory_mb: DEFAULT_WRITER_MEMORY_MB,
        }
    }
}

impl SearchIndexConfig {
    pub fn new(index_path: impl Into<PathBuf>) -> Self {
        Self {
            index_path: index_path.into(),
            writer_memory_mb: DEFAULT_WRITER_MEMORY_MB,
        }
    }

    pub fn with_memory_mb(mut self, mb: usize) -> Self {
        self.writer_memory_mb = mb;
        self
    }
}

/// Wrapper for Tantivy index with schema access.
pub struct SearchIndex {
    index: Index,
    schema: SearchSchema,
    config: SearchIndexConfig,
}

impl SearchIndex {
    /// Create an empty index at the configured path.
    ///
    /// A missing or empty directory gets a new index. An existing index is
    /// emptied in place with one commit, leaving other files untouched. A
    /// non-empty directory that holds no index is refused.
    pub fn create(config: SearchIndexConfig) -> Result<Self, SearchError> {
        let path = &config.index_path;

        if Self::exists_at(path) {
            let index = Index::open_in_dir(path)?;
            let schema = SearchSchema::from_schema(index.schema())?;
            let search_index = Self {
                index,
                schema,
                config,
            };

            let mut writer = search_index.writer()?;
            writer.delete_all_documents()?;
            writer.commit()?;
            writer.wait_merging_threads()?;

            info!(path = ?search_index.path(), "Cleared existing search index");
            return Ok(search_index);
        }

        if path.exists() && std::fs::read_dir(path)?.next().is_some() {
            return Err(SearchError::NotAnIndex(path.display().to_string()));
        }
        std::fs::create_dir_all(path)?;

        let schema = build_character_schema();
        let index = Index::create_in_dir(path, schema.schema().clone())?;

        info!(path = ?path, "Created search index");

        Ok(Self {
            index,
            schema,
            config,
        })
    }

    /// Open an existing index.
    pub fn open(config: SearchIndexConfig) -> Result<Self, SearchError> {
        if !Self::exists_at(&config.index_path) {
            return Err(SearchError::IndexNotFound(
                config.index_path.display().to_string(),
            ));
        }

        let index = Index::open_in_dir(&config.index_path)?;
        let schema = SearchSchema::from_schema(index.schema())?;

        debug!(path = ?config.index_path, "Opened search index");

        Ok(Self {
            index,
            schema,
            config,
        })
    }

    /// Get the search schema
    pub fn schema(&self) -> &SearchSchema {
        &self.schema
    }

    /// Get the underlying Tantivy index
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Create an IndexWriter with configured memory budget
    pub fn writer(&self) -> Result<IndexWriter, SearchError> {
        let memory_budget = self.config.writer_memory_mb * 1024 * 1024;
        let writer = self.index.writer(memory_budget)?;
        debug!(
            memory_mb = self.config.writer_memory_mb,
            "Created index writer"
        );
        Ok(writer)
    }

    /// Create an IndexReader that only reloads when asked.
    ///
    /// Readers are opened per query session, so the snapshot taken here is
    /// the latest commit at open time.
    pub fn reader(&self) -> Result<IndexReader, SearchError> {
        let reader = self
            .index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;
        debug!("Created index reader");
        Ok(reader)
    }

    /// Get the index path
    pub fn path(&self) -> &Path {
        &self.config.index_path
    }

    /// Whether `path` holds index metadata.
    pub fn exists_at(path: &Path) -> bool {
        path.join("meta.json").exists()
    }
}
