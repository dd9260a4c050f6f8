//! In-memory document store
//!
//! Keeps every collection as an insertion-ordered list of JSON documents
//! behind a `parking_lot::RwLock`. Writes are atomic per document, which is
//! all the catalog relies on. Text search follows the usual document-store
//! rule: a collection must carry a text index before [`Filter::Text`] can be
//! evaluated, and a document matches when any query term appears among the
//! tokens of any indexed field.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use regex::{Regex, RegexBuilder};
use serde_json::Value;
use tracing::debug;

use super::{
    document_id, text_terms, Document, DocumentStore, Filter, IndexKind, IndexSpec, StoreError,
    StoreResult, ID_FIELD,
};

#[derive(Debug, Default)]
struct MemoryCollection {
    documents: Vec<Document>,
    indexes: Vec<IndexSpec>,
}

impl MemoryCollection {
    fn text_fields(&self) -> Option<&[String]> {
        self.indexes
            .iter()
            .find(|index| index.kind == IndexKind::Text)
            .map(|index| index.fields.as_slice())
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.documents
            .iter()
            .position(|doc| document_id(doc) == Some(id))
    }
}

/// Process-local [`DocumentStore`]
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, MemoryCollection>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the indexes defined on `collection`
    pub fn index_names(&self, collection: &str) -> Vec<String> {
        self.collections
            .read()
            .get(collection)
            .map(|c| c.indexes.iter().map(|i| i.name.clone()).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read();
        let Some(coll) = collections.get(collection) else {
            // Querying a collection that was never written is not an error,
            // except for text search which still needs its index.
            if filter.uses_text_index() {
                return Err(missing_text_index(collection));
            }
            return Ok(Vec::new());
        };

        let predicate = CompiledFilter::compile(filter, coll.text_fields(), collection)?;
        Ok(coll
            .documents
            .iter()
            .filter(|doc| predicate.matches(doc))
            .cloned()
            .collect())
    }

    async fn insert_one(&self, collection: &str, document: Document) -> StoreResult<()> {
        let id = document_id(&document)
            .ok_or_else(|| {
                StoreError::InvalidDocument(format!("document has no string `{}` field", ID_FIELD))
            })?
            .to_string();

        let mut collections = self.collections.write();
        let coll = collections.entry(collection.to_string()).or_default();
        if coll.position(&id).is_some() {
            return Err(StoreError::DuplicateKey {
                collection: collection.to_string(),
                id,
            });
        }

        debug!(collection, id = %id, "inserting document");
        coll.documents.push(document);
        Ok(())
    }

    async fn replace_one(
        &self,
        collection: &str,
        id: &str,
        mut document: Document,
    ) -> StoreResult<u64> {
        document.insert(ID_FIELD.to_string(), Value::String(id.to_string()));

        let mut collections = self.collections.write();
        let Some(coll) = collections.get_mut(collection) else {
            return Ok(0);
        };
        match coll.position(id) {
            Some(pos) => {
                coll.documents[pos] = document;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_one(&self, collection: &str, id: &str) -> StoreResult<u64> {
        let mut collections = self.collections.write();
        let Some(coll) = collections.get_mut(collection) else {
            return Ok(0);
        };
        match coll.position(id) {
            Some(pos) => {
                coll.documents.remove(pos);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let mut collections = self.collections.write();
        let Some(coll) = collections.get_mut(collection) else {
            return Ok(0);
        };

        let predicate = CompiledFilter::compile(filter, coll.text_fields(), collection)?;
        let before = coll.documents.len();
        coll.documents.retain(|doc| !predicate.matches(doc));
        Ok((before - coll.documents.len()) as u64)
    }

    async fn create_indexes(&self, collection: &str, indexes: &[IndexSpec]) -> StoreResult<()> {
        let mut collections = self.collections.write();
        let coll = collections.entry(collection.to_string()).or_default();

        for index in indexes {
            if index.fields.is_empty() {
                return Err(StoreError::Index(format!(
                    "index {} on {} has no fields",
                    index.name, collection
                )));
            }

            if let Some(existing) = coll.indexes.iter().find(|i| i.name == index.name) {
                if existing == index {
                    continue;
                }
                return Err(StoreError::Index(format!(
                    "index {} on {} already exists with different options",
                    index.name, collection
                )));
            }

            if index.kind == IndexKind::Text && coll.text_fields().is_some() {
                return Err(StoreError::Index(format!(
                    "collection {} already has a text index",
                    collection
                )));
            }

            debug!(collection, index = %index.name, "created index");
            coll.indexes.push(index.clone());
        }

        Ok(())
    }
}

fn missing_text_index(collection: &str) -> StoreError {
    StoreError::Query(format!(
        "text index required for text search on {}",
        collection
    ))
}


/// A filter with its regular expressions compiled once per query
enum CompiledFilter {
    All,
    Eq(String, Value),
    Text {
        terms: Vec<String>,
        fields: Vec<String>,
    },
    Regex(String, Regex),
    Range(String, Option<f64>, Option<f64>),
    And(Vec<CompiledFilter>),
}

impl CompiledFilter {
    fn compile(
        filter: &Filter,
        text_fields: Option<&[String]>,
        collection: &str,
    ) -> StoreResult<Self> {
        Ok(match filter {
            Filter::All => CompiledFilter::All,
            Filter::Eq { field, value } => CompiledFilter::Eq(field.clone(), value.clone()),
            Filter::Text { query } => {
                let fields = text_fields.ok_or_else(|| missing_text_index(collection))?;
                CompiledFilter::Text {
                    terms: text_terms(query),
                    fields: fields.to_vec(),
                }
            }
            Filter::Regex {
                field,
                pattern,
                case_insensitive,
            } => {
                let regex = RegexBuilder::new(pattern)
                    .case_insensitive(*case_insensitive)
                    .build()
                    .map_err(|e| StoreError::query(format!("invalid regex: {}", e)))?;
                CompiledFilter::Regex(field.clone(), regex)
            }
            Filter::Range { field, min, max } => CompiledFilter::Range(field.clone(), *min, *max),
            Filter::And(terms) => CompiledFilter::And(
                terms
                    .iter()
                    .map(|t| Self::compile(t, text_fields, collection))
                    .collect::<StoreResult<_>>()?,
            ),
        })
    }

    fn matches(&self, doc: &Document) -> bool {
        match self {
            CompiledFilter::All => true,
            CompiledFilter::Eq(field, value) => doc.get(field) == Some(value),
            CompiledFilter::Text { terms, fields } => fields
                .iter()
                .filter_map(|f| doc.get(f).and_then(Value::as_str))
                .flat_map(text_terms)
                .any(|token| terms.contains(&token)),
            CompiledFilter::Regex(field, regex) => doc
                .get(field)
                .and_then(Value::as_str)
                .is_some_and(|s| regex.is_match(s)),
            CompiledFilter::Range(field, min, max) => {
                let Some(n) = doc.get(field).and_then(Value::as_f64) else {
                    return false;
                };
                min.map_or(true, |lo| n >= lo) && max.map_or(true, |hi| n <= hi)
            }
            CompiledFilter::And(terms) => terms.iter().all(|t| t.matches(doc)),
        }
    }
}
