//! Document Store Contract
//!
//! The catalog persists its entities in a schema-less document store that
//! offers named collections, point lookups, range/text/regex filters and
//! single-document writes, but no joins, no foreign keys and no
//! multi-document transactions. Everything relational is built on top of this
//! contract in the repository layer.
//!
//! ## Implementations
//!
//! - [`memory::InMemoryDocumentStore`] - process-local store, used by tests and
//!   ephemeral runs
//! - `estate_surrealdb::SurrealDocumentStore` - SurrealDB-backed store
//!
//! Documents are JSON objects. Each one carries its identifier as a hex string
//! in the [`ID_FIELD`] field.

pub mod error;
pub mod filter;
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use error::{StoreError, StoreResult};
pub use filter::{text_terms, Filter};
pub use memory::InMemoryDocumentStore;

/// A stored document
pub type Document = Map<String, Value>;

/// Name of the identifier field in every document
pub const ID_FIELD: &str = "id";

/// Kind of secondary index a collection can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    /// Tokenized full-text index; backs [`Filter::Text`]
    Text,
    /// Ordered index for range predicates
    Ascending,
}

/// Definition of an index to create on a collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSpec {
    pub name: String,
    pub kind: IndexKind,
    pub fields: Vec<String>,
}

impl IndexSpec {
    /// Text index over one or more string fields
    pub fn text(name: impl Into<String>, fields: &[&str]) -> Self {
        Self {
            name: name.into(),
            kind: IndexKind::Text,
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Ascending index over one or more fields
    pub fn ascending(name: impl Into<String>, fields: &[&str]) -> Self {
        Self {
            name: name.into(),
            kind: IndexKind::Ascending,
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Read the identifier of a document, if it has one
pub fn document_id(document: &Document) -> Option<&str> {
    document.get(ID_FIELD).and_then(Value::as_str)
}

/// Connection to a single logical database exposing named collections
///
/// Implementations must be `Send + Sync`; a single handle is created at
/// startup and shared by every repository.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Return every document in `collection` matching `filter`, in the
    /// collection's natural order
    async fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>>;

    /// Return the first document matching `filter`
    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        Ok(self.find(collection, filter).await?.into_iter().next())
    }

    /// Count documents matching `filter`
    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        Ok(self.find(collection, filter).await?.len() as u64)
    }

    /// Insert a document
    ///
    /// The document must carry a string [`ID_FIELD`]. Fails with
    /// [`StoreError::DuplicateKey`] when the identifier is already taken.
    async fn insert_one(&self, collection: &str, document: Document) -> StoreResult<()>;

    /// Replace the document keyed by `id` with `document`
    ///
    /// Returns the number of matched documents (0 or 1). Never inserts.
    async fn replace_one(&self, collection: &str, id: &str, document: Document)
        -> StoreResult<u64>;

    /// Delete the document keyed by `id`, returning the number removed
    async fn delete_one(&self, collection: &str, id: &str) -> StoreResult<u64>;

    /// Delete every document matching `filter`, returning the number removed
    async fn delete_many(&self, collection: &str, filter: &Filter) -> StoreResult<u64>;

    /// Create indexes on `collection`
    ///
    /// Re-creating an identical index is not an error.
    async fn create_indexes(&self, collection: &str, indexes: &[IndexSpec]) -> StoreResult<()>;
}
