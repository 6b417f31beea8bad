//! Tantivy-backed index updater.
//!
//! Wraps SearchIndexer from character-search. Each session starts from an
//! empty index.

use tracing::info;

use character_search::{SearchIndex, SearchIndexConfig, SearchIndexer};
use character_types::IndexableDocument;

use crate::error::IndexingError;
use crate::updater::IndexUpdater;

/// Index updater over an on-disk Tantivy index.
pub struct TantivyIndexUpdater {
    index: SearchIndex,
    indexer: SearchIndexer,
}

impl TantivyIndexUpdater {
    /// Create or empty the index and take its writer.
    pub fn create(config: SearchIndexConfig) -> Result<Self, IndexingError> {
        let index = SearchIndex::create(config)?;
        let indexer = SearchIndexer::new(&index)?;
        info!(path = %index.path().display(), "Opened index writer");
        Ok(Self { index, indexer })
    }

    pub fn index(&self) -> &SearchIndex {
        &self.index
    }
}

impl IndexUpdater for TantivyIndexUpdater {
    fn add(&mut self, document: &IndexableDocument) -> Result<(), IndexingError> {
        self.indexer
            .add(document)
            .map(|_| ())
            .map_err(|e| IndexingError::Index(format!("add {}: {}", document.id(), e)))
    }

    fn commit(&mut self) -> Result<(), IndexingError> {
        self.indexer
            .commit()
            .map(|_| ())
            .map_err(|e| IndexingError::Index(format!("commit: {}", e)))
    }

    fn rollback(&mut self) -> Result<(), IndexingError> {
        self.indexer.rollback()?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), IndexingError> {
        self.indexer.close()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "tantivy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use character_search::CharacterSearcher;
    use character_types::field_names;
    use tempfile::TempDir;

    fn document(id: &str) -> IndexableDocument {
        let mut doc = IndexableDocument::new(id);
        doc.insert_text(field_names::CONTENT, format!("Name {}", id));
        doc
    }

    #[test]
    fn test_add_commit_close() {
        let temp_dir = TempDir::new().unwrap();
        let config = SearchIndexConfig::new(temp_dir.path()).with_memory_mb(50);
        let mut updater = TantivyIndexUpdater::create(config).unwrap();
        assert_eq!(updater.name(), "tantivy");

        updater.add(&document("a")).unwrap();
        updater.add(&document("b")).unwrap();
        updater.commit().unwrap();
        updater.close().unwrap();
        updater.close().unwrap();

        let searcher = CharacterSearcher::open(temp_dir.path()).unwrap();
        assert_eq!(searcher.num_docs(), 2);
    }

    #[test]
    fn test_rollback_discards_staged() {
        let temp_dir = TempDir::new().unwrap();
        let config = SearchIndexConfig::new(temp_dir.path()).with_memory_mb(50);
        let mut updater = TantivyIndexUpdater::create(config).unwrap();

        updater.add(&document("kept")).unwrap();
        updater.commit().unwrap();
        updater.add(&document("dropped")).unwrap();
        updater.rollback().unwrap();
        updater.close().unwrap();

        let searcher = CharacterSearcher::new(updater.index()).unwrap();
        assert_eq!(searcher.num_docs(), 1);
        assert!(searcher.get_by_id("dropped").unwrap().is_none());
    }

    #[test]
    fn test_writes_after_close_fail() {
        let temp_dir = TempDir::new().unwrap();
        let config = SearchIndexConfig::new(temp_dir.path()).with_memory_mb(50);
        let mut updater = TantivyIndexUpdater::create(config).unwrap();
        updater.close().unwrap();

        assert!(matches!(
            updater.add(&document("late")),
            Err(IndexingError::Index(_))
        ));
        assert!(matches!(
            updater.rollback(),
            Err(IndexingError::Search(_))
        ));
    }
}
