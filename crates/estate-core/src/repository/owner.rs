use std::sync::Arc;

use crate::entities::Owner;
use crate::error::CatalogResult;
use crate::id::EntityId;
use crate::store::{DocumentStore, Filter};

use super::Collection;

/// CRUD over the `Owners` collection
#[derive(Clone)]
pub struct OwnerRepository {
    owners: Collection<Owner>,
}

impl OwnerRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            owners: Collection::new(store),
        }
    }

    pub async fn get_all(&self) -> CatalogResult<Vec<Owner>> {
        self.owners.find(&Filter::All).await
    }

    pub async fn get_by_id(&self, id: EntityId) -> CatalogResult<Owner> {
        self.owners.get(id).await
    }

    pub async fn create(&self, owner: Owner) -> CatalogResult<Owner> {
        self.owners.insert(owner).await
    }

    pub async fn update(&self, owner: Owner) -> CatalogResult<Owner> {
        self.owners.replace(owner).await
    }

    pub async fn delete(&self, id: EntityId) -> CatalogResult<()> {
        self.owners.delete(id).await
    }
}
