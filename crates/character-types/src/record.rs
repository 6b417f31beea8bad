//! Raw and structured character records.
//!
//! A [`RawRecord`] is one crawler-produced entry. A [`StructuredRecord`] is the
//! section -> field -> value view extracted from its content.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CharacterError;

/// Separator used when a list value is flattened into stored text.
pub const LIST_SEPARATOR: &str = "; ";

/// One crawler-produced entry, keyed by a stable id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl RawRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: None,
            content: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

/// Section vocabulary of a structured record.
///
/// Declaration order is the display and iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    BasicInfo,
    Appearance,
    Origin,
    Powers,
    Affiliations,
    Story,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::BasicInfo,
        Section::Appearance,
        Section::Origin,
        Section::Powers,
        Section::Affiliations,
        Section::Story,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::BasicInfo => "basic_info",
            Section::Appearance => "appearance",
            Section::Origin => "origin",
            Section::Powers => "powers",
            Section::Affiliations => "affiliations",
            Section::Story => "story",
        }
    }

    /// Parse from string, returning None for unknown sections.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|section| section.as_str() == s)
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Section {
    type Err = CharacterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| CharacterError::InvalidInput(format!("unknown section: {}", s)))
    }
}

/// A single extracted value: plain text or an ordered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.is_empty(),
            FieldValue::List(items) => items.is_empty(),
        }
    }

    /// Flatten into stored text. Lists join with [`LIST_SEPARATOR`].
    ///
    /// This is lossy: an item that itself contains the separator cannot be
    /// recovered by splitting the flattened text.
    pub fn flatten(&self) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::List(items) => items.join(LIST_SEPARATOR),
        }
    }
}

/// Section -> field -> value view of a record's content.
///
/// Every stored value is non-empty; absent fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StructuredRecord {
    sections: BTreeMap<Section, BTreeMap<String, FieldValue>>,
}

impl StructuredRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value. Empty values are ignored.
    pub fn insert(&mut self, section: Section, field: impl Into<String>, value: FieldValue) {
        if value.is_empty() {
            return;
        }
        self.sections
            .entry(section)
            .or_default()
            .insert(field.into(), value);
    }

    /// Remove a field, dropping the section entry once it has no fields left.
    pub fn remove(&mut self, section: Section, field: &str) -> Option<FieldValue> {
        let fields = self.sections.get_mut(&section)?;
        let removed = fields.remove(field);
        if fields.is_empty() {
            self.sections.remove(&section);
        }
        removed
    }

    pub fn get(&self, section: Section, field: &str) -> Option<&FieldValue> {
        self.sections.get(&section).and_then(|fields| fields.get(field))
    }

    /// Fields of one section; empty sections yield an empty iterator.
    pub fn section(&self, section: Section) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.sections
            .get(&section)
            .into_iter()
            .flat_map(|fields| fields.iter().map(|(name, value)| (name.as_str(), value)))
    }

    pub fn section_is_empty(&self, section: Section) -> bool {
        self.sections.get(&section).is_none_or(|fields| fields.is_empty())
    }

    /// All fields in section order.
    pub fn iter(&self) -> impl Iterator<Item = (Section, &str, &FieldValue)> {
        self.sections.iter().flat_map(|(section, fields)| {
            fields
                .iter()
                .map(move |(name, value)| (*section, name.as_str(), value))
        })
    }

    pub fn len(&self) -> usize {
        self.sections.values().map(|fields| fields.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
