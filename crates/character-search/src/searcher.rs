//! Ranked search over character documents.
//!
//! A searcher holds one reader snapshot. Open it for a query session and drop
//! it once the hits are read.

use std::collections::BTreeMap;
use std::path::Path;

use tantivy::collector::TopDocs;
use tantivy::query::{QueryParser, TermQuery};
use tantivy::schema::IndexRecordOption;
use tantivy::{Index, IndexReader, TantivyDocument, Term};
use tracing::{debug, info, warn};

use character_types::field_names;

use crate::document::stored_fields;
use crate::error::SearchError;
use crate::index::{SearchIndex, SearchIndexConfig};
use crate::schema::SearchSchema;

/// A search hit: relevance score plus the stored fields of the document.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// BM25 relevance score
    pub score: f32,
    /// Stored field values keyed by field name
    pub fields: BTreeMap<String, String>,
}

impl SearchHit {
    pub fn id(&self) -> &str {
        self.get(field_names::ID).unwrap_or_default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Search options for field selection and limiting results.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Fields to search; empty means the `content` field
    pub fields: Vec<String>,
    /// Maximum results to return
    pub limit: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchOptions {
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            limit: 10,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_field(self, field: impl Into<String>) -> Self {
        self.with_fields([field.into()])
    }
}

/// Searcher over a committed character index.
pub struct CharacterSearcher {
    index: Index,
    reader: IndexReader,
    schema: SearchSchema,
}

impl CharacterSearcher {
    /// Create a new searcher from a SearchIndex.
    pub fn new(index: &SearchIndex) -> Result<Self, SearchError> {
        Ok(Self {
            index: index.index().clone(),
            reader: index.reader()?,
            schema: index.schema().clone(),
        })
    }

    /// Open the index at `path` and take a reader snapshot.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SearchError> {
        let index = SearchIndex::open(SearchIndexConfig::new(path.as_ref()))?;
        Self::new(&index)
    }

    /// Search with a query string.
    ///
    /// Multiple fields are OR-combined by the query parser. Blank queries
    /// return no hits. Malformed syntax is parsed leniently and logged.
    pub fn search(
        &self,
        query_str: &str,
        options: &SearchOptions,
    ) -> Result<Vec<SearchHit>, SearchError> {
        if query_str.trim().is_empty() {
            return Ok(Vec::new());
        }

        let default_fields = if options.fields.is_empty() {
            vec![self.schema.content]
        } else {
            self.schema.fields(&options.fields)?
        };

        let query_parser = QueryParser::for_index(&self.index, default_fields);
        let (query, errors) = query_parser.parse_query_lenient(query_str);
        if !errors.is_empty() {
            warn!(query = query_str, errors = ?errors, "Ignoring malformed parts of query");
        }

        let searcher = self.reader.searcher();
        let top_docs = searcher.search(&query, &TopDocs::with_limit(options.limit.max(1)))?;

        let mut hits = Vec::with_capacity(top_docs.len());
        for (score, doc_address) in top_docs {
            let doc: TantivyDocument = searcher.doc(doc_address)?;
            hits.push(SearchHit {
                score,
                fields: stored_fields(&self.schema, &doc),
            });
        }

        info!(
            query = query_str,
            fields = ?options.fields,
            results = hits.len(),
            "Search complete"
        );

        Ok(hits)
    }

    /// Exact-match lookup on the `id` field.
    pub fn get_by_id(&self, id: &str) -> Result<Option<SearchHit>, SearchError> {
        let term = Term::from_field_text(self.schema.id, id);
        let query = TermQuery::new(term, IndexRecordOption::Basic);

        let searcher = self.reader.searcher();
        let top_docs = searcher.search(&query, &TopDocs::with_limit(1))?;

        let Some((score, doc_address)) = top_docs.into_iter().next() else {
            debug!(id, "No document with id");
            return Ok(None);
        };

        let doc: TantivyDocument = searcher.doc(doc_address)?;
        Ok(Some(SearchHit {
            score,
            fields: stored_fields(&self.schema, &doc),
        }))
    }

    /// Get the number of indexed documents.
    pub fn num_docs(&self) -> u64 {
        self.reader.searcher().num_docs()
    }
}
