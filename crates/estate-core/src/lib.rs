//! # Estate Core
//!
//! Data-access layer of the real-estate listing catalog: owners, properties,
//! property images and property traces kept in a schema-less document store.
//!
//! The store offers no joins, no foreign keys and no cross-collection
//! transactions. This crate rebuilds what the catalog needs on top of it:
//!
//! - **Relation attachment**: property reads fetch the owner, images and
//!   traces from their own collections ([`aggregation`])
//! - **Referential integrity**: property writes check the owner exists
//!   ([`PropertyRepository::ensure_owner_exists`])
//! - **Cascade delete**: deleting a property removes its images and traces
//! - **Search**: text, address and price criteria ([`PropertyFilter`])
//! - **Index bootstrap**: best-effort creation of the search indexes
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use estate_core::{CatalogService, InMemoryDocumentStore, PropertyFilter, RepositoryOptions};
//!
//! # async fn demo() -> estate_core::CatalogResult<()> {
//! let store = Arc::new(InMemoryDocumentStore::new());
//! let catalog = CatalogService::new(store, RepositoryOptions::default()).await;
//!
//! let cheap = catalog
//!     .search_properties(&PropertyFilter::new().max_price(200.0))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod aggregation;
pub mod commands;
pub mod entities;
pub mod error;
pub mod id;
pub mod indexes;
pub mod repository;
pub mod search;
pub mod service;
pub mod store;

pub use aggregation::{attach, attach_all, RelationLookup};
pub use commands::{
    validate_command, CreateOwner, CreateProperty, CreatePropertyImage, CreatePropertyTrace,
    UpdateOwner, UpdateProperty, UpdatePropertyImage,
};
pub use entities::{Entity, Owner, Property, PropertyImage, PropertyTrace};
pub use error::{CatalogError, CatalogResult, ErrorResponse, FieldViolation};
pub use id::{EntityId, IdError};
pub use repository::{
    Collection, OwnerRepository, PropertyImageRepository, PropertyRepository,
    PropertyTraceRepository, RepositoryOptions,
};
pub use search::PropertyFilter;
pub use service::CatalogService;
pub use store::{
    Document, DocumentStore, Filter, InMemoryDocumentStore, IndexKind, IndexSpec, StoreError,
    StoreResult,
};
