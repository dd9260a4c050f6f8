//! # Estate SurrealDB Backend
//!
//! SurrealDB implementation of the catalog's
//! [`DocumentStore`](estate_core::DocumentStore), running embedded with either
//! the in-memory engine or RocksDB.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use estate_core::{CatalogService, RepositoryOptions};
//! use estate_surrealdb::{SurrealClient, SurrealDbConfig, SurrealDocumentStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = SurrealClient::new(SurrealDbConfig::default()).await?;
//!     let store = Arc::new(SurrealDocumentStore::new(client));
//!     let catalog = CatalogService::new(store, RepositoryOptions::default()).await;
//!
//!     for owner in catalog.list_owners().await? {
//!         println!("{} {}", owner.id, owner.name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod document_store;
pub mod query;
pub mod surreal_client;
pub mod types;

pub use document_store::SurrealDocumentStore;
pub use surreal_client::SurrealClient;
pub use types::SurrealDbConfig;

/// Open the database described by `config` as a document store
pub async fn open(config: SurrealDbConfig) -> estate_core::StoreResult<SurrealDocumentStore> {
    Ok(SurrealDocumentStore::new(SurrealClient::new(config).await?))
}
