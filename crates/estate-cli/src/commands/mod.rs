pub mod config;
pub mod images;
pub mod owners;
pub mod properties;
pub mod traces;

use std::sync::Arc;

use anyhow::Result;
use estate_core::{CatalogError, CatalogService};
use tracing::debug;

use crate::config::EstateConfig;

/// Open the configured store and wire the catalog over it
pub async fn open_service(config: &EstateConfig) -> Result<CatalogService> {
    let store = estate_surrealdb::open(config.database.clone())
        .await
        .map_err(CatalogError::from)?;
    debug!(path = %config.database.path, "store opened");
    Ok(CatalogService::new(Arc::new(store), config.repository_options()).await)
}
