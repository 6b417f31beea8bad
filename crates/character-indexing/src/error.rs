//! Error types for the indexing pipeline.

use character_search::SearchError;
use thiserror::Error;

/// Errors that can occur in the indexing pipeline
#[derive(Error, Debug)]
pub enum IndexingError {
    /// An input source could not be read or parsed
    #[error("Source error in {name}: {message}")]
    Source { name: String, message: String },

    /// None of the configured input files exist
    #[error("No valid input sources found")]
    NoValidSources,

    /// Generic index operation error
    #[error("Index error: {0}")]
    Index(String),

    /// Search engine error
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// A batch failed to apply and was rolled back
    #[error("Batch {batch} rolled back: {reason}")]
    BatchRolledBack { batch: usize, reason: String },

    /// Operation not allowed in the current session state
    #[error("Invalid session state: {0}")]
    InvalidState(String),

    /// Engine-level failure that ends the session
    #[error("Fatal error: {0}")]
    Fatal(String),
}

impl IndexingError {
    /// Whether the error ends the session rather than one source or batch.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            IndexingError::Fatal(_) | IndexingError::NoValidSources | IndexingError::InvalidState(_)
        )
    }
}
