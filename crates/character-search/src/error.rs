//! Search error types.

use thiserror::Error;

/// Errors that can occur during index and search operations.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Tantivy index error
    #[error("Tantivy error: {0}")]
    Tantivy(#[from] tantivy::TantivyError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Index not found
    #[error("Index not found at path: {0}")]
    IndexNotFound(String),

    /// Directory has other content and no index
    #[error("Refusing to create index in non-index directory: {0}")]
    NotAnIndex(String),

    /// Schema mismatch
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Field name not present in the schema
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Writer used after close
    #[error("Index writer is closed")]
    WriterClosed,
}
