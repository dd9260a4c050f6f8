//! Command and query surface of the catalog
//!
//! [`CatalogService`] is what outer layers call. Commands are validated
//! before any repository is touched; repository errors pass through
//! unchanged.

use std::sync::Arc;

use tracing::info;

use crate::commands::{
    validate_command, CreateOwner, CreateProperty, CreatePropertyImage, CreatePropertyTrace,
    UpdateOwner, UpdateProperty, UpdatePropertyImage,
};
use crate::entities::{Owner, Property, PropertyImage, PropertyTrace};
use crate::error::CatalogResult;
use crate::id::EntityId;
use crate::repository::{
    OwnerRepository, PropertyImageRepository, PropertyRepository, PropertyTraceRepository,
    RepositoryOptions,
};
use crate::search::PropertyFilter;
use crate::store::DocumentStore;

#[derive(Clone)]
pub struct CatalogService {
    owners: OwnerRepository,
    properties: PropertyRepository,
    images: PropertyImageRepository,
    traces: PropertyTraceRepository,
}

impl CatalogService {
    /// Wire every repository to the shared store handle
    pub async fn new(store: Arc<dyn DocumentStore>, options: RepositoryOptions) -> Self {
        Self {
            owners: OwnerRepository::new(Arc::clone(&store)),
            properties: PropertyRepository::new(Arc::clone(&store), options).await,
            images: PropertyImageRepository::new(Arc::clone(&store)),
            traces: PropertyTraceRepository::new(store),
        }
    }

    pub fn properties(&self) -> &PropertyRepository {
        &self.properties
    }

    // Owners

    pub async fn list_owners(&self) -> CatalogResult<Vec<Owner>> {
        self.owners.get_all().await
    }

    pub async fn get_owner(&self, id: EntityId) -> CatalogResult<Owner> {
        self.owners.get_by_id(id).await
    }

    pub async fn create_owner(&self, command: CreateOwner) -> CatalogResult<Owner> {
        validate_command(&command)?;
        let owner = self.owners.create(command.into_owner()).await?;
        info!(id = %owner.id, "owner created");
        Ok(owner)
    }

    pub async fn update_owner(&self, command: UpdateOwner) -> CatalogResult<Owner> {
        validate_command(&command)?;
        let mut owner = self.owners.get_by_id(command.id).await?;
        command.apply(&mut owner);
        self.owners.update(owner).await
    }

    pub async fn delete_owner(&self, id: EntityId) -> CatalogResult<()> {
        self.owners.delete(id).await
    }

    // Properties

    pub async fn list_properties(&self) -> CatalogResult<Vec<Property>> {
        self.properties.get_all().await
    }

    pub async fn get_property(&self, id: EntityId) -> CatalogResult<Property> {
        self.properties.get_by_id(id).await
    }

    pub async fn search_properties(&self, filter: &PropertyFilter) -> CatalogResult<Vec<Property>> {
        self.properties.get_by_filter(filter).await
    }

    pub async fn properties_by_owner(&self, owner_id: EntityId) -> CatalogResult<Vec<Property>> {
        self.properties.get_by_owner_id(owner_id).await
    }

    pub async fn create_property(&self, command: CreateProperty) -> CatalogResult<Property> {
        validate_command(&command)?;
        let property = self.properties.create(command.into_property()).await?;
        info!(id = %property.id, owner = %property.owner_id, "property created");
        Ok(property)
    }

    pub async fn update_property(&self, command: UpdateProperty) -> CatalogResult<Property> {
        validate_command(&command)?;
        let mut property = self.properties.get_stored(command.id).await?;
        command.apply(&mut property);
        self.properties.update(property).await
    }

    pub async fn delete_property(&self, id: EntityId) -> CatalogResult<()> {
        self.properties.delete(id).await?;
        info!(id = %id, "property deleted");
        Ok(())
    }

    // Images

    pub async fn list_images(&self, property_id: EntityId) -> CatalogResult<Vec<PropertyImage>> {
        self.images.get_by_property_id(property_id).await
    }

    pub async fn get_image(&self, id: EntityId) -> CatalogResult<PropertyImage> {
        self.images.get_by_id(id).await
    }

    pub async fn create_image(&self, command: CreatePropertyImage) -> CatalogResult<PropertyImage> {
        validate_command(&command)?;
        self.images.create(command.into_image()).await
    }

    pub async fn update_image(&self, command: UpdatePropertyImage) -> CatalogResult<PropertyImage> {
        validate_command(&command)?;
        let mut image = self.images.get_by_id(command.id).await?;
        command.apply(&mut image);
        self.images.update(image).await
    }

    pub async fn delete_image(&self, id: EntityId) -> CatalogResult<()> {
        self.images.delete(id).await
    }

    // Traces

    pub async fn list_traces(&self, property_id: EntityId) -> CatalogResult<Vec<PropertyTrace>> {
        self.traces.get_by_property_id(property_id).await
    }

    pub async fn get_trace(&self, id: EntityId) -> CatalogResult<PropertyTrace> {
        self.traces.get_by_id(id).await
    }

    pub async fn create_trace(&self, command: CreatePropertyTrace) -> CatalogResult<PropertyTrace> {
        validate_command(&command)?;
        self.traces.create(command.into_trace()).await
    }
}
