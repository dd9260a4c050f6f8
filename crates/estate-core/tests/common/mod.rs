//! Shared fixtures for catalog integration tests
//!
//! Provides entity builders and store wrappers that count or break individual
//! document-store operations.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use estate_core::{
    Document, DocumentStore, EntityId, Filter, InMemoryDocumentStore, IndexSpec, Owner, Property,
    PropertyImage, PropertyTrace, StoreError, StoreResult,
};

// =============================================================================
// ENTITY BUILDERS
// =============================================================================

pub fn owner(name: &str) -> Owner {
    Owner::new(
        name,
        format!("{} Street 1", name),
        format!("{}.png", name.to_lowercase()),
        NaiveDate::from_ymd_opt(1975, 3, 14).unwrap(),
    )
}

pub fn property(name: &str, address: &str, price: f64, owner_id: EntityId) -> Property {
    Property::new(name, address, price, format!("CODE-{}", name.len()), 1999, owner_id)
}

pub fn image(property_id: EntityId, file: &str) -> PropertyImage {
    PropertyImage::new(property_id, file, true)
}

pub fn trace(property_id: EntityId, name: &str, value: f64) -> PropertyTrace {
    PropertyTrace::new(property_id, Utc::now(), name, value, value * 0.1)
}

// =============================================================================
// COUNTING STORE
// =============================================================================

/// Wraps a store and counts every call made through it
#[derive(Default)]
pub struct CountingStore {
    inner: InMemoryDocumentStore,
    pub finds: AtomicUsize,
    pub writes: AtomicUsize,
}

impl CountingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn finds(&self) -> usize {
        self.finds.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.finds() + self.writes.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.finds.store(0, Ordering::SeqCst);
        self.writes.store(0, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for CountingStore {
    async fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        self.inner.find(collection, filter).await
    }

    async fn insert_one(&self, collection: &str, document: Document) -> StoreResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.insert_one(collection, document).await
    }

    async fn replace_one(&self, collection: &str, id: &str, document: Document) -> StoreResult<u64> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.replace_one(collection, id, document).await
    }

    async fn delete_one(&self, collection: &str, id: &str) -> StoreResult<u64> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_one(collection, id).await
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_many(collection, filter).await
    }

    async fn create_indexes(&self, collection: &str, indexes: &[IndexSpec]) -> StoreResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.create_indexes(collection, indexes).await
    }
}

// =============================================================================
// FAULTY STORES
// =============================================================================

/// Store whose index creation always fails
#[derive(Default)]
pub struct NoIndexStore {
    inner: InMemoryDocumentStore,
}

#[async_trait]
impl DocumentStore for NoIndexStore {
    async fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>> {
        self.inner.find(collection, filter).await
    }

    async fn insert_one(&self, collection: &str, document: Document) -> StoreResult<()> {
        self.inner.insert_one(collection, document).await
    }

    async fn replace_one(&self, collection: &str, id: &str, document: Document) -> StoreResult<u64> {
        self.inner.replace_one(collection, id, document).await
    }

    async fn delete_one(&self, collection: &str, id: &str) -> StoreResult<u64> {
        self.inner.delete_one(collection, id).await
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        self.inner.delete_many(collection, filter).await
    }

    async fn create_indexes(&self, _collection: &str, _indexes: &[IndexSpec]) -> StoreResult<()> {
        Err(StoreError::Index("insufficient privileges".to_string()))
    }
}

/// Store that cannot be reached
pub struct OfflineStore;

#[async_trait]
impl DocumentStore for OfflineStore {
    async fn find(&self, _collection: &str, _filter: &Filter) -> StoreResult<Vec<Document>> {
        Err(StoreError::Connection("connection refused".to_string()))
    }

    async fn insert_one(&self, _collection: &str, _document: Document) -> StoreResult<()> {
        Err(StoreError::Connection("connection refused".to_string()))
    }

    async fn replace_one(&self, _collection: &str, _id: &str, _document: Document) -> StoreResult<u64> {
        Err(StoreError::Connection("connection refused".to_string()))
    }

    async fn delete_one(&self, _collection: &str, _id: &str) -> StoreResult<u64> {
        Err(StoreError::Connection("connection refused".to_string()))
    }

    async fn delete_many(&self, _collection: &str, _filter: &Filter) -> StoreResult<u64> {
        Err(StoreError::Connection("connection refused".to_string()))
    }

    async fn create_indexes(&self, _collection: &str, _indexes: &[IndexSpec]) -> StoreResult<()> {
        Err(StoreError::Connection("connection refused".to_string()))
    }
}
