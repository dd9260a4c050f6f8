use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::aggregation::{attach, attach_all, RelationLookup};
use crate::entities::{Owner, Property, PropertyImage, PropertyTrace, PROPERTIES};
use crate::error::{CatalogError, CatalogResult};
use crate::id::EntityId;
use crate::indexes::{ensure_indexes, property_indexes};
use crate::search::PropertyFilter;
use crate::store::{DocumentStore, Filter};

use super::{ensure_id, Collection, RepositoryOptions};

/// Properties with their owner, images and traces
///
/// Reads attach the related documents; writes check that the owner exists;
/// deletes cascade to images and traces.
#[derive(Clone)]
pub struct PropertyRepository {
    properties: Collection<Property>,
    owners: Collection<Owner>,
    images: Collection<PropertyImage>,
    traces: Collection<PropertyTrace>,
    options: RepositoryOptions,
}

impl PropertyRepository {
    /// Build the repository and bootstrap the `Properties` indexes
    ///
    /// Index failures are logged; the repository is returned regardless.
    pub async fn new(store: Arc<dyn DocumentStore>, options: RepositoryOptions) -> Self {
        ensure_indexes(store.as_ref(), PROPERTIES, &property_indexes()).await;

        Self {
            properties: Collection::new(Arc::clone(&store)),
            owners: Collection::new(Arc::clone(&store)),
            images: Collection::new(Arc::clone(&store)),
            traces: Collection::new(store),
            options,
        }
    }

    pub fn options(&self) -> RepositoryOptions {
        self.options
    }

    pub async fn get_all(&self) -> CatalogResult<Vec<Property>> {
        self.get_by_filter(&PropertyFilter::default()).await
    }

    pub async fn get_by_id(&self, id: EntityId) -> CatalogResult<Property> {
        let property = self.properties.get(id).await?;
        attach(property, self).await
    }

    /// The stored property alone, without owner, images or traces
    pub async fn get_stored(&self, id: EntityId) -> CatalogResult<Property> {
        self.properties.get(id).await
    }

    pub async fn get_by_filter(&self, criteria: &PropertyFilter) -> CatalogResult<Vec<Property>> {
        let properties = self.properties.find(&criteria.to_filter()).await?;
        debug!(count = properties.len(), "attaching property relations");
        attach_all(properties, self, self.options.join_concurrency).await
    }

    /// Properties of one owner, without relations attached
    pub async fn get_by_owner_id(&self, owner_id: EntityId) -> CatalogResult<Vec<Property>> {
        self.properties
            .find(&Filter::eq("owner_id", owner_id.to_hex()))
            .await
    }

    pub async fn create(&self, property: Property) -> CatalogResult<Property> {
        let mut property = property.detached();
        self.properties.prepare_insert(&mut property);
        self.ensure_owner_exists(property.owner_id).await?;
        self.properties.insert_prepared(&property).await?;
        Ok(property)
    }

    pub async fn update(&self, property: Property) -> CatalogResult<Property> {
        ensure_id::<Property>(property.id)?;
        self.ensure_owner_exists(property.owner_id).await?;
        self.properties.replace(property).await
    }

    /// Delete the property after its images and traces
    pub async fn delete(&self, id: EntityId) -> CatalogResult<()> {
        let children = Filter::eq("property_id", id.to_hex());
        let images = self.images.delete_where(&children).await?;
        let traces = self.traces.delete_where(&children).await?;
        debug!(property = %id, images, traces, "deleted property children");

        self.properties.delete(id).await
    }

    /// `NotFound` unless an owner with `owner_id` is stored
    pub async fn ensure_owner_exists(&self, owner_id: EntityId) -> CatalogResult<()> {
        if owner_id.is_empty() || !self.owners.exists(&Filter::id(&owner_id)).await? {
            return Err(CatalogError::not_found("Owner not found"));
        }
        Ok(())
    }
}

#[async_trait]
impl RelationLookup for PropertyRepository {
    async fn owner(&self, owner_id: EntityId) -> CatalogResult<Option<Owner>> {
        self.owners.find_by_id(owner_id).await
    }

    async fn images(&self, property_id: EntityId) -> CatalogResult<Vec<PropertyImage>> {
        self.images
            .find(&Filter::eq("property_id", property_id.to_hex()))
            .await
    }

    async fn traces(&self, property_id: EntityId) -> CatalogResult<Vec<PropertyTrace>> {
        self.traces
            .find(&Filter::eq("property_id", property_id.to_hex()))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Document, InMemoryDocumentStore, IndexSpec, StoreError, StoreResult};
    use tracing_test::traced_test;

    /// Memory store that refuses to create indexes
    #[derive(Default)]
    struct ReadOnlySchema(InMemoryDocumentStore);

    #[async_trait]
    impl DocumentStore for ReadOnlySchema {
        async fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>> {
            self.0.find(collection, filter).await
        }

        async fn insert_one(&self, collection: &str, document: Document) -> StoreResult<()> {
            self.0.insert_one(collection, document).await
        }

        async fn replace_one(&self, collection: &str, id: &str, document: Document) -> StoreResult<u64> {
            self.0.replace_one(collection, id, document).await
        }

        async fn delete_one(&self, collection: &str, id: &str) -> StoreResult<u64> {
            self.0.delete_one(collection, id).await
        }

        async fn delete_many(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
            self.0.delete_many(collection, filter).await
        }

        async fn create_indexes(&self, _collection: &str, _indexes: &[IndexSpec]) -> StoreResult<()> {
            Err(StoreError::Index("not authorized".to_string()))
        }
    }

    #[tokio::test]
    #[traced_test]
    async fn index_failure_is_logged_and_repository_still_works() {
        let store = Arc::new(ReadOnlySchema::default());
        let repo = PropertyRepository::new(store, RepositoryOptions::default()).await;

        assert!(logs_contain("failed to create indexes"));
        assert!(logs_contain("not authorized"));
        assert!(repo.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    #[traced_test]
    async fn construction_bootstraps_property_indexes() {
        let store = Arc::new(InMemoryDocumentStore::new());
        PropertyRepository::new(store.clone(), RepositoryOptions::default()).await;

        assert_eq!(
            store.index_names(PROPERTIES),
            vec!["property_text", "property_price"]
        );
        assert!(logs_contain("indexes ready"));
    }
}
