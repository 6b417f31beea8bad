//! # character-search
//!
//! Full-text storage and search for character documents using Tantivy.
//!
//! ## Features
//! - On-disk Tantivy index recreated per indexing run
//! - Exclusive writer with add / commit / rollback / close
//! - Per-query reader snapshots with BM25 ranking
//! - Default-field or explicit multi-field query parsing
//! - Section-grouped display formatting of hits

pub mod document;
pub mod error;
pub mod format;
pub mod index;
pub mod indexer;
pub mod schema;
pub mod searcher;

pub use document::{stored_fields, to_tantivy_doc};
pub use error::SearchError;
pub use format::{
    format_hit, render_hits, FormattedHit, FormattedSection, NO_RESULTS, UNKNOWN,
};
pub use index::{SearchIndex, SearchIndexConfig};
pub use indexer::SearchIndexer;
pub use schema::{build_character_schema, SearchSchema};
pub use searcher::{CharacterSearcher, SearchHit, SearchOptions};
