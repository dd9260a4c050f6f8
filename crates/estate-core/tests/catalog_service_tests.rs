//! Command/query surface: validation, sibling repositories and error mapping

mod common;

use std::sync::Arc;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use common::CountingStore;
use estate_core::{
    CatalogError, CatalogService, CreateOwner, CreateProperty, CreatePropertyImage,
    CreatePropertyTrace, EntityId, ErrorResponse, FieldViolation, InMemoryDocumentStore,
    PropertyFilter, RepositoryOptions, UpdateOwner, UpdateProperty, UpdatePropertyImage,
};

async fn service() -> CatalogService {
    CatalogService::new(
        Arc::new(InMemoryDocumentStore::new()),
        RepositoryOptions::default(),
    )
    .await
}

fn create_owner(name: &str) -> CreateOwner {
    CreateOwner {
        name: name.to_string(),
        address: "1 Elm St".to_string(),
        photo: String::new(),
        birthday: NaiveDate::from_ymd_opt(1980, 5, 17).unwrap(),
    }
}

fn create_property(owner_id: EntityId, price: f64) -> CreateProperty {
    CreateProperty {
        name: "Sunny Villa".to_string(),
        address: "12 Ocean Drive".to_string(),
        price,
        code_internal: "SV-01".to_string(),
        year: 2001,
        owner_id,
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

#[tokio::test]
async fn test_invalid_command_never_reaches_the_store() {
    let store = CountingStore::new();
    let catalog = CatalogService::new(store.clone(), RepositoryOptions::default()).await;
    store.reset();

    let mut command = create_property(EntityId::EMPTY, -10.0);
    command.name.clear();
    let err = catalog.create_property(command).await.unwrap_err();

    assert_eq!(err.status_code(), 400);
    assert_eq!(
        err.violations(),
        &[
            FieldViolation::new("name", "must be between 1 and 100 characters"),
            FieldViolation::new("owner_id", "must not be empty"),
            FieldViolation::new("price", "must be a non-negative number"),
        ]
    );
    assert_eq!(store.total(), 0);
}

#[tokio::test]
async fn test_validation_failure_renders_every_violation() {
    let catalog = service().await;
    let err = catalog
        .create_owner(CreateOwner {
            name: String::new(),
            address: String::new(),
            photo: String::new(),
            birthday: NaiveDate::from_ymd_opt(1980, 1, 1).unwrap(),
        })
        .await
        .unwrap_err();

    let response = ErrorResponse::from(&err);
    assert_eq!(response.status, 400);
    let fields: Vec<&str> = response.errors.iter().map(|v| v.field.as_str()).collect();
    assert_eq!(fields, vec!["address", "name"]);
}

// =============================================================================
// OWNERS
// =============================================================================

#[tokio::test]
async fn test_owner_lifecycle() -> Result<()> {
    let catalog = service().await;
    let created = catalog.create_owner(create_owner("Ana")).await?;
    assert_eq!(catalog.get_owner(created.id).await?, created);

    let updated = catalog
        .update_owner(UpdateOwner {
            id: created.id,
            name: "Ana Maria".to_string(),
            address: "2 Oak St".to_string(),
            photo: "ana.png".to_string(),
            birthday: created.birthday,
        })
        .await?;
    assert_eq!(updated.name, "Ana Maria");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at.is_some());

    assert_eq!(catalog.list_owners().await?, vec![updated]);

    catalog.delete_owner(created.id).await?;
    assert_eq!(
        catalog.get_owner(created.id).await.unwrap_err(),
        CatalogError::not_found("Owner not found")
    );
    assert_eq!(
        catalog.delete_owner(created.id).await.unwrap_err(),
        CatalogError::not_found("Owner not found")
    );
    Ok(())
}

#[tokio::test]
async fn test_update_of_unknown_owner_is_not_found() {
    let catalog = service().await;
    let err = catalog
        .update_owner(UpdateOwner {
            id: EntityId::generate(),
            name: "Nobody".to_string(),
            address: "Nowhere".to_string(),
            photo: String::new(),
            birthday: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        })
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

// =============================================================================
// PROPERTIES
// =============================================================================

#[tokio::test]
async fn test_update_property_preserves_created_at() -> Result<()> {
    let catalog = service().await;
    let owner = catalog.create_owner(create_owner("Ana")).await?;
    let created = catalog.create_property(create_property(owner.id, 150.0)).await?;

    let updated = catalog
        .update_property(UpdateProperty {
            id: created.id,
            name: "Sunny Villa II".to_string(),
            address: created.address.clone(),
            price: 160.0,
            code_internal: created.code_internal.clone(),
            year: created.year,
            owner_id: owner.id,
        })
        .await?;

    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.owner.is_none());
    let stored = catalog.get_property(created.id).await?;
    assert_eq!(stored.name, "Sunny Villa II");
    assert_eq!(stored.owner.map(|o| o.id), Some(owner.id));
    Ok(())
}

#[tokio::test]
async fn test_update_property_skips_relation_lookups() -> Result<()> {
    let store = CountingStore::new();
    let catalog = CatalogService::new(store.clone(), RepositoryOptions::default()).await;
    let owner = catalog.create_owner(create_owner("Ana")).await?;
    let created = catalog.create_property(create_property(owner.id, 150.0)).await?;
    store.reset();

    catalog
        .update_property(UpdateProperty {
            id: created.id,
            name: created.name.clone(),
            address: created.address.clone(),
            price: 175.0,
            code_internal: created.code_internal.clone(),
            year: created.year,
            owner_id: owner.id,
        })
        .await?;

    // One load of the property and one owner check; no image or trace reads
    assert_eq!(store.finds(), 2);
    assert_eq!(store.total(), 3);
    Ok(())
}

#[tokio::test]
async fn test_search_and_by_owner_queries() -> Result<()> {
    let catalog = service().await;
    let owner = catalog.create_owner(create_owner("Ana")).await?;
    for price in [50.0, 150.0, 250.0] {
        catalog.create_property(create_property(owner.id, price)).await?;
    }

    let mid = catalog
        .search_properties(&PropertyFilter::new().min_price(100.0).max_price(200.0))
        .await?;
    assert_eq!(mid.len(), 1);
    assert_eq!(mid[0].price, 150.0);

    assert_eq!(catalog.properties_by_owner(owner.id).await?.len(), 3);
    assert_eq!(catalog.list_properties().await?.len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_delete_property_cascades_through_service() -> Result<()> {
    let catalog = service().await;
    let owner = catalog.create_owner(create_owner("Ana")).await?;
    let property = catalog.create_property(create_property(owner.id, 150.0)).await?;
    catalog
        .create_image(CreatePropertyImage {
            property_id: property.id,
            file: "front.jpg".to_string(),
            enabled: true,
        })
        .await?;

    catalog.delete_property(property.id).await?;
    assert!(catalog.list_images(property.id).await?.is_empty());
    Ok(())
}

// =============================================================================
// IMAGES AND TRACES
// =============================================================================

#[tokio::test]
async fn test_children_do_not_check_their_property() -> Result<()> {
    let catalog = service().await;
    let orphan_parent = EntityId::generate();

    let image = catalog
        .create_image(CreatePropertyImage {
            property_id: orphan_parent,
            file: "lost.jpg".to_string(),
            enabled: false,
        })
        .await?;
    let trace = catalog
        .create_trace(CreatePropertyTrace {
            property_id: orphan_parent,
            date_sale: Utc::now(),
            name: "Appraisal".to_string(),
            value: 1000.0,
            tax: 0.0,
        })
        .await?;

    assert_eq!(catalog.list_images(orphan_parent).await?, vec![image]);
    assert_eq!(catalog.list_traces(orphan_parent).await?, vec![trace]);
    Ok(())
}

#[tokio::test]
async fn test_image_lifecycle() -> Result<()> {
    let catalog = service().await;
    let property_id = EntityId::generate();
    let image = catalog
        .create_image(CreatePropertyImage {
            property_id,
            file: "front.jpg".to_string(),
            enabled: false,
        })
        .await?;

    let updated = catalog
        .update_image(UpdatePropertyImage {
            id: image.id,
            property_id,
            file: "front-hd.jpg".to_string(),
            enabled: true,
        })
        .await?;
    assert!(updated.enabled);
    assert_eq!(updated.created_at, image.created_at);
    assert_eq!(catalog.get_image(image.id).await?.file, "front-hd.jpg");

    catalog.delete_image(image.id).await?;
    assert_eq!(
        catalog.get_image(image.id).await.unwrap_err(),
        CatalogError::not_found("Property image not found")
    );
    Ok(())
}

#[tokio::test]
async fn test_traces_are_append_only_history() -> Result<()> {
    let catalog = service().await;
    let property_id = EntityId::generate();
    let trace = catalog
        .create_trace(CreatePropertyTrace {
            property_id,
            date_sale: Utc::now(),
            name: "Sale".to_string(),
            value: 150_000.0,
            tax: 4_500.0,
        })
        .await?;

    let loaded = catalog.get_trace(trace.id).await?;
    assert_eq!(loaded, trace);
    assert_eq!(
        catalog.get_trace(EntityId::generate()).await.unwrap_err(),
        CatalogError::not_found("Property trace not found")
    );
    Ok(())
}
