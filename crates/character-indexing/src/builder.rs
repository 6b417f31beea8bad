//! Document building: raw record -> indexable document.

use thiserror::Error;
use tracing::trace;

use character_types::{field_names, namespaced, IndexableDocument, RawRecord};

use crate::extractor::extract;

/// Per-record build failure. Never aborts sibling records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("Record has no id")]
    MissingId,

    #[error("Record {id} rejected: {reason}")]
    Rejected { id: String, reason: String },
}

/// Converts one raw record into the flat field set the index stores.
///
/// Called from worker threads, so implementations must be shareable.
pub trait DocumentBuilder: Send + Sync {
    fn build(&self, record: &RawRecord) -> Result<IndexableDocument, BuildError>;
}

/// Builder for crawled character pages.
///
/// Stores `id` as given, `url` and `content` verbatim, then every non-empty
/// extracted field under its `section.field` name.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharacterDocumentBuilder;

impl CharacterDocumentBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentBuilder for CharacterDocumentBuilder {
    fn build(&self, record: &RawRecord) -> Result<IndexableDocument, BuildError> {
        if record.id.trim().is_empty() {
            return Err(BuildError::MissingId);
        }

        let mut doc = IndexableDocument::new(record.id.clone());

        if let Some(url) = &record.url {
            doc.insert_text(field_names::URL, url.as_str());
        }

        if let Some(content) = &record.content {
            doc.insert_text(field_names::CONTENT, content.as_str());

            let extraction = extract(content);
            for (section, field, value) in extraction.record.iter() {
                doc.insert_text(namespaced(section, field), value.flatten());
            }

            trace!(
                id = %record.id,
                fields = doc.len(),
                skipped_lines = extraction.skipped_lines,
                "Built document"
            );
        }

        Ok(doc)
    }
}
