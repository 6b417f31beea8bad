//! Tantivy schema definition for character documents.
//!
//! `id` is the only exact-match field. Everything else is tokenized text,
//! and every field is stored so hits can be reconstructed for display.

use tantivy::schema::{Field, Schema, STORED, STRING, TEXT};

use character_types::{field_names, EXTRACTED_FIELDS};

use crate::SearchError;

/// Schema field handles for efficient access
#[derive(Debug, Clone)]
pub struct SearchSchema {
    schema: Schema,
    /// Primary key (STRING | STORED)
    pub id: Field,
    /// Source page URL (TEXT | STORED)
    pub url: Field,
    /// Raw page text (TEXT | STORED)
    pub content: Field,
    /// Namespaced extracted fields (TEXT | STORED), in schema order
    extracted: Vec<(&'static str, Field)>,
}

impl SearchSchema {
    /// Get the underlying Tantivy schema
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Create a SearchSchema from an existing Tantivy Schema
    pub fn from_schema(schema: Schema) -> Result<Self, SearchError> {
        let lookup = |name: &str| {
            schema
                .get_field(name)
                .map_err(|_| SearchError::SchemaMismatch(format!("missing {} field", name)))
        };

        let id = lookup(field_names::ID)?;
        let url = lookup(field_names::URL)?;
        let content = lookup(field_names::CONTENT)?;
        let extracted = EXTRACTED_FIELDS
            .iter()
            .map(|name| lookup(name).map(|field| (*name, field)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            schema,
            id,
            url,
            content,
            extracted,
        })
    }

    /// Resolve a stored field name to its handle.
    pub fn field(&self, name: &str) -> Option<Field> {
        match name {
            field_names::ID => Some(self.id),
            field_names::URL => Some(self.url),
            field_names::CONTENT => Some(self.content),
            _ => self
                .extracted
                .iter()
                .find(|(field_name, _)| *field_name == name)
                .map(|(_, field)| *field),
        }
    }

    /// Resolve a list of names, failing on the first unknown one.
    pub fn fields(&self, names: &[String]) -> Result<Vec<Field>, SearchError> {
        names
            .iter()
            .map(|name| {
                self.field(name)
                    .ok_or_else(|| SearchError::UnknownField(name.clone()))
            })
            .collect()
    }

    /// Every stored field as (name, handle), `id` first.
    pub fn stored_fields(&self) -> impl Iterator<Item = (&'static str, Field)> + '_ {
        [
            (field_names::ID, self.id),
            (field_names::URL, self.url),
            (field_names::CONTENT, self.content),
        ]
        .into_iter()
        .chain(self.extracted.iter().copied())
    }
}

/// Build the character document schema.
///
/// Schema fields:
/// - id: STRING | STORED - exact-match primary key
/// - url: TEXT | STORED
/// - content: TEXT | STORED - default search field
/// - `section.field` for every extracted field: TEXT | STORED
pub fn build_character_schema() -> SearchSchema {
    let mut schema_builder = Schema::builder();

    let id = schema_builder.add_text_field(field_names::ID, STRING | STORED);
    let url = schema_builder.add_text_field(field_names::URL, TEXT | STORED);
    let content = schema_builder.add_text_field(field_names::CONTENT, TEXT | STORED);

    let extracted = EXTRACTED_FIELDS
        .iter()
        .map(|name| (*name, schema_builder.add_text_field(name, TEXT | STORED)))
        .collect();

    let schema = schema_builder.build();

    SearchSchema {
        schema,
        id,
        url,
        content,
        extracted,
    }
}
