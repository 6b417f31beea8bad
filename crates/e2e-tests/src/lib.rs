//! End-to-end test infrastructure for the character index.
//!
//! Provides a shared TestHarness and helpers for scenarios covering the full
//! source-file-to-query pipeline against a real on-disk index.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use character_indexing::{
    BuildError, CharacterDocumentBuilder, DocumentBuilder, IndexingError, IndexingSession,
    JsonFileSource, RecordSource, RunStatsSnapshot, SessionConfig, TantivyIndexUpdater,
};
use character_search::{CharacterSearcher, SearchIndexConfig};
use character_types::{IndexableDocument, RawRecord};

/// Writer memory for test indexes, kept small.
pub const TEST_WRITER_MEMORY_MB: usize = 50;

/// Shared test harness for E2E tests.
pub struct TestHarness {
    /// Keeps temp dir alive for the lifetime of the harness
    pub _temp_dir: tempfile::TempDir,
    /// Directory holding crawler output files
    pub input_dir: PathBuf,
    /// Path for index files
    pub index_path: PathBuf,
}

impl TestHarness {
    /// Create a new test harness with an empty input directory.
    pub fn new() -> Self {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let input_dir = temp_dir.path().join("input");
        let index_path = temp_dir.path().join("index");

        std::fs::create_dir_all(&input_dir).expect("Failed to create input dir");

        Self {
            _temp_dir: temp_dir,
            input_dir,
            index_path,
        }
    }

    /// Write records as a crawler output file and return its path.
    pub fn write_source(&self, name: &str, records: &[RawRecord]) -> PathBuf {
        let entries: BTreeMap<&str, serde_json::Value> = records
            .iter()
            .map(|record| {
                (
                    record.id.as_str(),
                    serde_json::json!({ "url": record.url, "content": record.content }),
                )
            })
            .collect();

        let path = self.input_dir.join(name);
        let body = serde_json::to_string_pretty(&entries).expect("Failed to serialize source");
        std::fs::write(&path, body).expect("Failed to write source file");
        path
    }

    pub fn index_config(&self) -> SearchIndexConfig {
        SearchIndexConfig::new(&self.index_path).with_memory_mb(TEST_WRITER_MEMORY_MB)
    }

    /// Index the given files with the default builder.
    pub async fn index_files(
        &self,
        files: &[PathBuf],
        config: SessionConfig,
    ) -> Result<RunStatsSnapshot, IndexingError> {
        self.index_files_with(files, config, Arc::new(CharacterDocumentBuilder::new()))
            .await
    }

    /// Index the given files with a custom builder.
    pub async fn index_files_with(
        &self,
        files: &[PathBuf],
        config: SessionConfig,
        builder: Arc<dyn DocumentBuilder>,
    ) -> Result<RunStatsSnapshot, IndexingError> {
        let sources: Vec<Box<dyn RecordSource>> = files
            .iter()
            .map(|path| Box::new(JsonFileSource::new(path)) as Box<dyn RecordSource>)
            .collect();

        let index_config = self.index_config();
        IndexingSession::with_builder(config, builder)
            .run(|| TantivyIndexUpdater::create(index_config), &sources)
            .await
    }

    pub fn searcher(&self) -> CharacterSearcher {
        CharacterSearcher::open(&self.index_path).expect("Failed to open searcher")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Character record with the given page text.
pub fn character(id: &str, content: &str) -> RawRecord {
    RawRecord::new(id)
        .with_url(format!("https://marvel.fandom.com/wiki/{}", id))
        .with_content(content)
}

/// Builder that panics on chosen ids and otherwise builds normally.
pub struct PanickingBuilder {
    ids: Vec<String>,
}

impl PanickingBuilder {
    pub fn new(ids: &[&str]) -> Self {
        Self {
            ids: ids.iter().map(|id| id.to_string()).collect(),
        }
    }
}

impl DocumentBuilder for PanickingBuilder {
    fn build(&self, record: &RawRecord) -> Result<IndexableDocument, BuildError> {
        if self.ids.contains(&record.id) {
            panic!("malformed page content for {}", record.id);
        }
        CharacterDocumentBuilder::new().build(record)
    }
}
