//! Index updater trait.
//!
//! The write side of the index engine as the commit coordinator sees it.
//! Exactly one caller drives an updater, so every operation takes `&mut self`.

use character_types::IndexableDocument;

use crate::error::IndexingError;

/// Write operations on an index engine.
pub trait IndexUpdater: Send {
    /// Stage a document. Not visible to readers until [`commit`](Self::commit).
    fn add(&mut self, document: &IndexableDocument) -> Result<(), IndexingError>;

    /// Make all staged documents visible.
    fn commit(&mut self) -> Result<(), IndexingError>;

    /// Discard everything staged since the last commit.
    fn rollback(&mut self) -> Result<(), IndexingError>;

    /// Release the engine. Must tolerate repeated calls.
    fn close(&mut self) -> Result<(), IndexingError>;

    /// Get the name of this updater for logging.
    fn name(&self) -> &str;
}
