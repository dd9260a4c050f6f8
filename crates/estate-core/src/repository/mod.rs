//! Entity repositories
//!
//! Every repository wraps one collection of the shared [`DocumentStore`]
//! through a typed [`Collection`]. The collection owns the behaviour all
//! entities share: identifier assignment, timestamps, duplicate-key
//! translation and not-found detection. The per-entity repositories only
//! decide which of those operations they expose, and [`PropertyRepository`]
//! adds the owner guard, the cascade delete and the relation attachment.

mod image;
mod owner;
mod property;
mod trace;

use std::marker::PhantomData;
use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::entities::Entity;
use crate::error::{CatalogError, CatalogResult};
use crate::id::EntityId;
use crate::store::{DocumentStore, Filter, StoreError};

pub use image::PropertyImageRepository;
pub use owner::OwnerRepository;
pub use property::PropertyRepository;
pub use trace::PropertyTraceRepository;

/// Tuning knobs shared by the repositories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositoryOptions {
    /// Upper bound on properties whose relations are fetched at once
    pub join_concurrency: usize,
}

impl RepositoryOptions {
    pub const DEFAULT_JOIN_CONCURRENCY: usize = 8;

    pub fn with_join_concurrency(mut self, join_concurrency: usize) -> Self {
        self.join_concurrency = join_concurrency.max(1);
        self
    }
}

impl Default for RepositoryOptions {
    fn default() -> Self {
        Self {
            join_concurrency: Self::DEFAULT_JOIN_CONCURRENCY,
        }
    }
}

/// Typed view of one collection
pub struct Collection<E> {
    store: Arc<dyn DocumentStore>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Collection<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Collection<E> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        E::COLLECTION
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub async fn find(&self, filter: &Filter) -> CatalogResult<Vec<E>> {
        debug!(collection = E::COLLECTION, ?filter, "find");
        self.store
            .find(E::COLLECTION, filter)
            .await?
            .into_iter()
            .map(|doc| E::from_document(doc).map_err(CatalogError::from))
            .collect()
    }

    pub async fn find_by_id(&self, id: EntityId) -> CatalogResult<Option<E>> {
        let document = self.store.find_one(E::COLLECTION, &Filter::id(&id)).await?;
        document
            .map(|doc| E::from_document(doc).map_err(CatalogError::from))
            .transpose()
    }

    /// Point lookup that fails with `NotFound` when the document is absent
    pub async fn get(&self, id: EntityId) -> CatalogResult<E> {
        self.find_by_id(id).await?.ok_or_else(not_found::<E>)
    }

    pub async fn exists(&self, filter: &Filter) -> CatalogResult<bool> {
        Ok(self.store.count(E::COLLECTION, filter).await? > 0)
    }

    /// Assign an identifier when missing and stamp the creation time
    pub fn prepare_insert(&self, entity: &mut E) {
        if entity.id().is_empty() {
            entity.set_id(EntityId::generate());
        }
        entity.stamp_created(Utc::now());
    }

    /// Insert an entity already passed through [`Collection::prepare_insert`]
    pub async fn insert_prepared(&self, entity: &E) -> CatalogResult<()> {
        let document = entity.to_document()?;
        debug!(collection = E::COLLECTION, id = %entity.id(), "insert");
        self.store
            .insert_one(E::COLLECTION, document)
            .await
            .map_err(|err| match err {
                StoreError::DuplicateKey { .. } => duplicate::<E>(),
                other => other.into(),
            })
    }

    pub async fn insert(&self, mut entity: E) -> CatalogResult<E> {
        self.prepare_insert(&mut entity);
        self.insert_prepared(&entity).await?;
        Ok(entity)
    }

    /// Replace the stored document with `entity`, keyed by its identifier
    pub async fn replace(&self, mut entity: E) -> CatalogResult<E> {
        ensure_id::<E>(entity.id())?;
        entity.stamp_updated(Utc::now());

        let id = entity.id().to_hex();
        let document = entity.to_document()?;
        debug!(collection = E::COLLECTION, id = %id, "replace");
        let matched = self.store.replace_one(E::COLLECTION, &id, document).await?;
        if matched == 0 {
            return Err(not_found::<E>());
        }
        Ok(entity)
    }

    pub async fn delete(&self, id: EntityId) -> CatalogResult<()> {
        debug!(collection = E::COLLECTION, id = %id, "delete");
        let removed = self.store.delete_one(E::COLLECTION, &id.to_hex()).await?;
        if removed == 0 {
            return Err(not_found::<E>());
        }
        Ok(())
    }

    /// Delete every matching document, returning how many were removed
    pub async fn delete_where(&self, filter: &Filter) -> CatalogResult<u64> {
        debug!(collection = E::COLLECTION, ?filter, "delete many");
        Ok(self.store.delete_many(E::COLLECTION, filter).await?)
    }
}

/// `InvalidArgument` unless `id` is set
pub(crate) fn ensure_id<E: Entity>(id: EntityId) -> CatalogResult<()> {
    if id.is_empty() {
        return Err(CatalogError::invalid_argument(format!("Invalid {} ID", E::NOUN)));
    }
    Ok(())
}

pub(crate) fn not_found<E: Entity>() -> CatalogError {
    CatalogError::not_found(format!("{} not found", capitalize(E::NOUN)))
}

fn duplicate<E: Entity>() -> CatalogError {
    let article = match E::NOUN.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "An",
        _ => "A",
    };
    CatalogError::conflict(format!("{} {} with this ID already exists", article, E::NOUN))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Owner, PropertyImage, PropertyTrace};
    use crate::store::InMemoryDocumentStore;
    use chrono::NaiveDate;

    fn owners() -> Collection<Owner> {
        Collection::new(Arc::new(InMemoryDocumentStore::new()))
    }

    fn owner(name: &str) -> Owner {
        Owner::new(
            name,
            "1 Elm St",
            "",
            NaiveDate::from_ymd_opt(1980, 1, 1).unwrap(),
        )
    }

    #[test]
    fn messages_follow_entity_noun() {
        assert_eq!(not_found::<Owner>().to_string(), "Owner not found");
        assert_eq!(
            duplicate::<Owner>().to_string(),
            "An owner with this ID already exists"
        );
        assert_eq!(
            duplicate::<PropertyImage>().to_string(),
            "A property image with this ID already exists"
        );
        assert_eq!(
            not_found::<PropertyTrace>().to_string(),
            "Property trace not found"
        );
        assert_eq!(
            ensure_id::<PropertyImage>(EntityId::EMPTY)
                .unwrap_err()
                .to_string(),
            "Invalid property image ID"
        );
    }

    #[tokio::test]
    async fn insert_assigns_id_and_created_at() {
        let collection = owners();
        let before = Utc::now();
        let created = collection.insert(owner("Ana")).await.unwrap();

        assert!(!created.id.is_empty());
        assert!(created.created_at >= before);
        assert!(created.updated_at.is_none());
        assert_eq!(collection.get(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn insert_keeps_supplied_id() {
        let collection = owners();
        let id = EntityId::generate();
        let mut ana = owner("Ana");
        ana.id = id;

        let created = collection.insert(ana.clone()).await.unwrap();
        assert_eq!(created.id, id);

        let err = collection.insert(ana).await.unwrap_err();
        assert_eq!(
            err,
            CatalogError::conflict("An owner with this ID already exists")
        );
    }

    #[tokio::test]
    async fn replace_stamps_updated_at_and_requires_match() {
        let collection = owners();
        let mut created = collection.insert(owner("Ana")).await.unwrap();
        created.name = "Ana Maria".to_string();

        let updated = collection.replace(created.clone()).await.unwrap();
        assert!(updated.updated_at.is_some());
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(collection.get(created.id).await.unwrap().name, "Ana Maria");

        let mut ghost = owner("Ghost");
        ghost.id = EntityId::generate();
        assert!(collection.replace(ghost).await.unwrap_err().is_not_found());

        let err = collection.replace(owner("No id")).await.unwrap_err();
        assert_eq!(err, CatalogError::invalid_argument("Invalid owner ID"));
    }

    #[tokio::test]
    async fn delete_reports_missing_documents() {
        let collection = owners();
        let created = collection.insert(owner("Ana")).await.unwrap();

        collection.delete(created.id).await.unwrap();
        assert_eq!(
            collection.delete(created.id).await.unwrap_err(),
            CatalogError::not_found("Owner not found")
        );
    }
}
