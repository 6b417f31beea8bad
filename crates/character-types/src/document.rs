//! Flat, namespaced documents handed to the index engine.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::record::Section;

/// Stored field names.
pub mod field_names {
    /// Exact-match primary key.
    pub const ID: &str = "id";
    pub const URL: &str = "url";
    pub const CONTENT: &str = "content";

    pub const BASIC_INFO_NAME: &str = "basic_info.name";
    pub const BASIC_INFO_CURRENT_ALIAS: &str = "basic_info.current_alias";
    pub const BASIC_INFO_ALIASES: &str = "basic_info.aliases";
    pub const APPEARANCE_GENDER: &str = "appearance.gender";
    pub const APPEARANCE_EYES: &str = "appearance.eyes";
    pub const APPEARANCE_SKIN: &str = "appearance.skin";
    pub const APPEARANCE_FEATURES: &str = "appearance.features";
    pub const ORIGIN_ORIGIN: &str = "origin.origin";
    pub const ORIGIN_STATUS: &str = "origin.status";
    pub const ORIGIN_REALITY: &str = "origin.reality";
    pub const AFFILIATIONS_AFFILIATION: &str = "affiliations.affiliation";
    pub const POWERS_POWERS: &str = "powers.powers";
}

/// Every namespaced field the extractor can produce, in schema order.
pub const EXTRACTED_FIELDS: &[&str] = &[
    field_names::BASIC_INFO_NAME,
    field_names::BASIC_INFO_CURRENT_ALIAS,
    field_names::BASIC_INFO_ALIASES,
    field_names::APPEARANCE_GENDER,
    field_names::APPEARANCE_EYES,
    field_names::APPEARANCE_SKIN,
    field_names::APPEARANCE_FEATURES,
    field_names::ORIGIN_ORIGIN,
    field_names::ORIGIN_STATUS,
    field_names::ORIGIN_REALITY,
    field_names::AFFILIATIONS_AFFILIATION,
    field_names::POWERS_POWERS,
];

/// Build the `section.field` name for an extracted field.
pub fn namespaced(section: Section, field: &str) -> String {
    format!("{}.{}", section.as_str(), field)
}

/// Flat mapping from field name to stored text.
///
/// `id` is always present. Empty values are never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexableDocument {
    id: String,
    fields: BTreeMap<String, String>,
}

impl IndexableDocument {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Add a tokenized text field. Empty values and the `id` name are ignored.
    pub fn insert_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if value.is_empty() || name == field_names::ID {
            return;
        }
        self.fields.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        if name == field_names::ID {
            return Some(&self.id);
        }
        self.fields.get(name).map(String::as_str)
    }

    /// Text fields, excluding `id`.
    pub fn text_fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Number of stored fields including `id`.
    pub fn len(&self) -> usize {
        self.fields.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespaced() {
        assert_eq!(namespaced(Section::BasicInfo, "name"), field_names::BASIC_INFO_NAME);
        assert_eq!(namespaced(Section::Powers, "powers"), field_names::POWERS_POWERS);
    }

    #[test]
    fn test_document_with_only_id() {
        let doc = IndexableDocument::new("groot");
        assert_eq!(doc.id(), "groot");
        assert_eq!(doc.get(field_names::ID), Some("groot"));
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.text_fields().count(), 0);
    }

    #[test]
    fn test_insert_text_skips_empty_and_id() {
        let mut doc = IndexableDocument::new("groot");
        doc.insert_text(field_names::URL, "");
        doc.insert_text(field_names::ID, "other");
        doc.insert_text(field_names::CONTENT, "I am Groot");

        assert_eq!(doc.get(field_names::URL), None);
        assert_eq!(doc.get(field_names::ID), Some("groot"));
        assert_eq!(doc.get(field_names::CONTENT), Some("I am Groot"));
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_extracted_fields_are_namespaced() {
        for name in EXTRACTED_FIELDS {
            let (section, field) = name.split_once('.').unwrap();
            assert!(Section::parse(section).is_some(), "bad section in {}", name);
            assert!(!field.is_empty());
        }
    }
}
