//! Search indexer for adding documents to the Tantivy index.
//!
//! The indexer exclusively owns the single IndexWriter of a session.
//! Documents are not visible until commit() is called.

use tantivy::{IndexWriter, Term};
use tracing::{debug, info, warn};

use character_types::IndexableDocument;

use crate::document::to_tantivy_doc;
use crate::error::SearchError;
use crate::index::SearchIndex;
use crate::schema::SearchSchema;

/// Manages document indexing operations.
///
/// All writes go through `&mut self`, so a single caller drives the writer.
pub struct SearchIndexer {
    writer: Option<IndexWriter>,
    schema: SearchSchema,
}

impl SearchIndexer {
    /// Create a new indexer from a SearchIndex.
    pub fn new(index: &SearchIndex) -> Result<Self, SearchError> {
        let writer = index.writer()?;
        let schema = index.schema().clone();

        Ok(Self {
            writer: Some(writer),
            schema,
        })
    }

    fn writer(&mut self) -> Result<&mut IndexWriter, SearchError> {
        self.writer.as_mut().ok_or(SearchError::WriterClosed)
    }

    /// Add a document.
    ///
    /// If a document with the same id exists, it will be replaced.
    pub fn add(&mut self, document: &IndexableDocument) -> Result<u64, SearchError> {
        let doc = to_tantivy_doc(&self.schema, document)?;
        let term = Term::from_field_text(self.schema.id, document.id());

        let writer = self.writer()?;
        writer.delete_term(term);
        let opstamp = writer.add_document(doc)?;

        debug!(id = %document.id(), opstamp, "Added document");
        Ok(opstamp)
    }

    /// Commit pending changes to make them searchable.
    pub fn commit(&mut self) -> Result<u64, SearchError> {
        let opstamp = self.writer()?.commit()?;
        info!(opstamp, "Committed index changes");
        Ok(opstamp)
    }

    /// Rollback uncommitted changes.
    pub fn rollback(&mut self) -> Result<u64, SearchError> {
        let opstamp = self.writer()?.rollback()?;
        warn!(opstamp, "Rolled back index changes");
        Ok(opstamp)
    }

    /// Release the writer, waiting for background merges.
    ///
    /// Uncommitted changes are discarded. Closing twice is a no-op.
    pub fn close(&mut self) -> Result<(), SearchError> {
        let Some(writer) = self.writer.take() else {
            debug!("Index writer already closed");
            return Ok(());
        };
        writer.wait_merging_threads()?;
        info!("Closed index writer");
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.writer.is_none()
    }
}
