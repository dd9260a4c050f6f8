//! Relation attachment for properties
//!
//! The store cannot join collections, so a property read is followed by three
//! independent lookups: the owner by `owner_id`, and the images and traces by
//! `property_id`. [`attach`] performs those lookups for one property against
//! any [`RelationLookup`], which keeps the join testable without a database.
//! For M properties a full read costs 1 + 3M lookups.

use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};

use crate::entities::{Owner, Property, PropertyImage, PropertyTrace};
use crate::error::CatalogResult;
use crate::id::EntityId;

/// Source of the related documents attached to a property
#[async_trait]
pub trait RelationLookup: Send + Sync {
    /// The owner with `owner_id`, if one exists
    async fn owner(&self, owner_id: EntityId) -> CatalogResult<Option<Owner>>;

    /// Images of the property in collection order
    async fn images(&self, property_id: EntityId) -> CatalogResult<Vec<PropertyImage>>;

    /// Traces of the property in collection order
    async fn traces(&self, property_id: EntityId) -> CatalogResult<Vec<PropertyTrace>>;
}

/// Fetch and attach the owner, images and traces of `property`
///
/// A missing owner leaves `owner` as `None`; a property without children gets
/// empty lists. Any failed lookup fails the call.
pub async fn attach(mut property: Property, lookup: &dyn RelationLookup) -> CatalogResult<Property> {
    let (owner, images, traces) = tokio::try_join!(
        lookup.owner(property.owner_id),
        lookup.images(property.id),
        lookup.traces(property.id),
    )?;

    property.owner = owner;
    property.images = images;
    property.traces = traces;
    Ok(property)
}

/// [`attach`] every property, at most `concurrency` at a time
///
/// The result keeps the order of `properties`. No partial result is
/// returned: the first failure fails the whole call.
pub async fn attach_all(
    properties: Vec<Property>,
    lookup: &dyn RelationLookup,
    concurrency: usize,
) -> CatalogResult<Vec<Property>> {
    stream::iter(properties)
        .map(|property| attach(property, lookup))
        .buffered(concurrency.max(1))
        .try_collect()
        .await
}
