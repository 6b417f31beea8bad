//! # character-types
//!
//! Shared domain types for the character index.
//!
//! - Raw records: crawler-produced `{id, url?, content?}` entries
//! - Structured records: section -> field -> value views of record content
//! - Indexable documents: flat, namespaced field sets for the index engine
//! - Settings: layered configuration

pub mod config;
pub mod document;
pub mod error;
pub mod record;

pub use config::Settings;
pub use document::{field_names, namespaced, IndexableDocument, EXTRACTED_FIELDS};
pub use error::CharacterError;
pub use record::{FieldValue, RawRecord, Section, StructuredRecord, LIST_SEPARATOR};
