use std::sync::Arc;

use crate::entities::PropertyTrace;
use crate::error::CatalogResult;
use crate::id::EntityId;
use crate::store::{DocumentStore, Filter};

use super::Collection;

/// Append-only access to the `PropertyTraces` collection
///
/// Traces are permanent history: there is no update or delete. The parent
/// property is not checked on write.
#[derive(Clone)]
pub struct PropertyTraceRepository {
    traces: Collection<PropertyTrace>,
}

impl PropertyTraceRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            traces: Collection::new(store),
        }
    }

    /// Traces of a property in collection order
    pub async fn get_by_property_id(&self, property_id: EntityId) -> CatalogResult<Vec<PropertyTrace>> {
        self.traces
            .find(&Filter::eq("property_id", property_id.to_hex()))
            .await
    }

    pub async fn get_by_id(&self, id: EntityId) -> CatalogResult<PropertyTrace> {
        self.traces.get(id).await
    }

    pub async fn create(&self, trace: PropertyTrace) -> CatalogResult<PropertyTrace> {
        self.traces.insert(trace).await
    }
}
