//! Indexing pipeline for crawled character pages.
//!
//! Turns raw crawler records into indexable documents and applies them to a
//! full-text index batch by batch.
//!
//! ## Key Components
//!
//! - [`extract_character_info`]: Line-oriented field extraction from page text
//! - [`DocumentBuilder`]: Raw record -> flat namespaced document
//! - [`BatchProcessor`]: Bounded worker pool building one batch concurrently
//! - [`CommitCoordinator`]: Sequential adds plus one commit, or a full rollback
//! - [`IndexingSession`]: Sources, batching, statistics and writer lifecycle
//! - [`IndexUpdater`]: Write-side seam; [`TantivyIndexUpdater`] is the real one
//! - [`RunStatistics`]: Atomic run counters
//!
//! ## Example
//!
//! ```ignore
//! use character_indexing::{discover_sources, IndexingSession, SessionConfig, TantivyIndexUpdater};
//!
//! let sources = discover_sources(&settings.input_paths())?;
//! let sources: Vec<Box<dyn RecordSource>> = sources.into_iter().map(|s| Box::new(s) as _).collect();
//! let stats = IndexingSession::new(SessionConfig::from(&settings))
//!     .run(|| TantivyIndexUpdater::create(index_config), &sources)
//!     .await?;
//! ```

pub mod batch;
pub mod builder;
pub mod commit;
pub mod error;
pub mod extractor;
pub mod session;
pub mod source;
pub mod stats;
pub mod tantivy_updater;
pub mod updater;

#[cfg(test)]
mod test_support;

pub use batch::{BatchProcessor, BuiltDocuments};
pub use builder::{BuildError, CharacterDocumentBuilder, DocumentBuilder};
pub use commit::{BatchOutcome, CommitCoordinator};
pub use error::IndexingError;
pub use extractor::{extract, extract_character_info, Extraction, FieldKind, FieldRule, FIELD_RULES};
pub use session::{IndexingSession, SessionConfig, SessionState};
pub use source::{discover_sources, JsonFileSource, MemorySource, RecordSource, SourceRecords};
pub use stats::{RunStatistics, RunStatsSnapshot};
pub use tantivy_updater::TantivyIndexUpdater;
pub use updater::IndexUpdater;
