//! Document store error types

use thiserror::Error;

/// Errors raised by a [`DocumentStore`](super::DocumentStore) implementation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("duplicate key {id} in collection {collection}")]
    DuplicateKey { collection: String, id: String },

    #[error("connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("index error: {0}")]
    Index(String),
}

/// Result type for document store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn query<S: Into<String>>(msg: S) -> Self {
        Self::Query(msg.into())
    }

    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        Self::Serialization(msg.into())
    }

    /// Whether the error signals a duplicate identifier on insert
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::DuplicateKey { .. })
    }

    /// Whether the store itself could not be reached
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
