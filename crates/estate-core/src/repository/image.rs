use std::sync::Arc;

use crate::entities::PropertyImage;
use crate::error::CatalogResult;
use crate::id::EntityId;
use crate::store::{DocumentStore, Filter};

use super::Collection;

/// CRUD over the `PropertyImages` collection
///
/// The parent property is not checked on write.
#[derive(Clone)]
pub struct PropertyImageRepository {
    images: Collection<PropertyImage>,
}

impl PropertyImageRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            images: Collection::new(store),
        }
    }

    /// Images of a property in collection order
    pub async fn get_by_property_id(&self, property_id: EntityId) -> CatalogResult<Vec<PropertyImage>> {
        self.images
            .find(&Filter::eq("property_id", property_id.to_hex()))
            .await
    }

    pub async fn get_by_id(&self, id: EntityId) -> CatalogResult<PropertyImage> {
        self.images.get(id).await
    }

    pub async fn create(&self, image: PropertyImage) -> CatalogResult<PropertyImage> {
        self.images.insert(image).await
    }

    pub async fn update(&self, image: PropertyImage) -> CatalogResult<PropertyImage> {
        self.images.replace(image).await
    }

    pub async fn delete(&self, id: EntityId) -> CatalogResult<()> {
        self.images.delete(id).await
    }
}
