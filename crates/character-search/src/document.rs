//! Document mapping between indexable documents and Tantivy documents.

use std::collections::BTreeMap;

use tantivy::schema::Value;
use tantivy::TantivyDocument;

use character_types::IndexableDocument;

use crate::error::SearchError;
use crate::schema::SearchSchema;

/// Convert an IndexableDocument to a Tantivy document.
///
/// Fails on a field name the schema does not know.
pub fn to_tantivy_doc(
    schema: &SearchSchema,
    document: &IndexableDocument,
) -> Result<TantivyDocument, SearchError> {
    let mut doc = TantivyDocument::default();
    doc.add_text(schema.id, document.id());

    for (name, value) in document.text_fields() {
        let field = schema
            .field(name)
            .ok_or_else(|| SearchError::UnknownField(name.to_string()))?;
        doc.add_text(field, value);
    }

    Ok(doc)
}

/// Read every stored field of a Tantivy document back into a flat map.
///
/// Fields without a stored value are absent from the map.
pub fn stored_fields(schema: &SearchSchema, doc: &TantivyDocument) -> BTreeMap<String, String> {
    schema
        .stored_fields()
        .filter_map(|(name, field)| {
            doc.get_first(field)
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(|s| (name.to_string(), s.to_string()))
        })
        .collect()
}
