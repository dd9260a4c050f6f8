//! Catalog entities
//!
//! Four document types live in four independent collections. A property
//! refers to its owner by `owner_id`; images and traces refer to their
//! property by `property_id`. None of these references is enforced by the
//! store.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::id::EntityId;
use crate::store::{Document, StoreError, StoreResult};

pub const OWNERS: &str = "Owners";
pub const PROPERTIES: &str = "Properties";
pub const PROPERTY_IMAGES: &str = "PropertyImages";
pub const PROPERTY_TRACES: &str = "PropertyTraces";

/// A value persisted as one document in its own collection
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection holding documents of this type
    const COLLECTION: &'static str;

    /// Lower-case human name used in error messages, e.g. `"property image"`
    const NOUN: &'static str;

    fn id(&self) -> EntityId;

    fn set_id(&mut self, id: EntityId);

    fn stamp_created(&mut self, now: DateTime<Utc>);

    /// Record a successful update. Append-only entities keep the default.
    fn stamp_updated(&mut self, _now: DateTime<Utc>) {}

    /// Render the persisted form of the entity
    fn to_document(&self) -> StoreResult<Document> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(StoreError::serialization(format!(
                "{} serialized to a non-object value: {}",
                Self::NOUN,
                other
            ))),
        }
    }

    fn from_document(document: Document) -> StoreResult<Self> {
        Ok(serde_json::from_value(Value::Object(document))?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    #[serde(default)]
    pub id: EntityId,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub photo: String,
    pub birthday: NaiveDate,
    #[serde(default = "epoch")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Owner {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        photo: impl Into<String>,
        birthday: NaiveDate,
    ) -> Self {
        Self {
            id: EntityId::EMPTY,
            name: name.into(),
            address: address.into(),
            photo: photo.into(),
            birthday,
            created_at: epoch(),
            updated_at: None,
        }
    }
}

impl Entity for Owner {
    const COLLECTION: &'static str = OWNERS;
    const NOUN: &'static str = "owner";

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn stamp_created(&mut self, now: DateTime<Utc>) {
        self.created_at = now;
    }

    fn stamp_updated(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }
}

/// A listed property
///
/// `owner`, `images` and `traces` are filled in at read time and are never
/// written to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    #[serde(default)]
    pub id: EntityId,
    pub name: String,
    pub address: String,
    pub price: f64,
    pub code_internal: String,
    pub year: i32,
    pub owner_id: EntityId,
    #[serde(default = "epoch")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub owner: Option<Owner>,
    #[serde(default)]
    pub images: Vec<PropertyImage>,
    #[serde(default)]
    pub traces: Vec<PropertyTrace>,
}

const TRANSIENT_PROPERTY_FIELDS: [&str; 3] = ["owner", "images", "traces"];

impl Property {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        price: f64,
        code_internal: impl Into<String>,
        year: i32,
        owner_id: EntityId,
    ) -> Self {
        Self {
            id: EntityId::EMPTY,
            name: name.into(),
            address: address.into(),
            price,
            code_internal: code_internal.into(),
            year,
            owner_id,
            created_at: epoch(),
            updated_at: None,
            owner: None,
            images: Vec::new(),
            traces: Vec::new(),
        }
    }

    /// Copy of the property with the read-time relations cleared
    pub fn detached(&self) -> Self {
        Self {
            owner: None,
            images: Vec::new(),
            traces: Vec::new(),
            ..self.clone()
        }
    }
}

impl Entity for Property {
    const COLLECTION: &'static str = PROPERTIES;
    const NOUN: &'static str = "property";

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn stamp_created(&mut self, now: DateTime<Utc>) {
        self.created_at = now;
    }

    fn stamp_updated(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }

    fn to_document(&self) -> StoreResult<Document> {
        let mut document = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            other => {
                return Err(StoreError::serialization(format!(
                    "property serialized to a non-object value: {}",
                    other
                )))
            }
        };
        for field in TRANSIENT_PROPERTY_FIELDS {
            document.remove(field);
        }
        Ok(document)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyImage {
    #[serde(default)]
    pub id: EntityId,
    pub property_id: EntityId,
    pub file: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "epoch")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PropertyImage {
    pub fn new(property_id: EntityId, file: impl Into<String>, enabled: bool) -> Self {
        Self {
            id: EntityId::EMPTY,
            property_id,
            file: file.into(),
            enabled,
            created_at: epoch(),
            updated_at: None,
        }
    }
}

impl Entity for PropertyImage {
    const COLLECTION: &'static str = PROPERTY_IMAGES;
    const NOUN: &'static str = "property image";

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn stamp_created(&mut self, now: DateTime<Utc>) {
        self.created_at = now;
    }

    fn stamp_updated(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }
}

/// A historical sale or valuation of a property. Never modified once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyTrace {
    #[serde(default)]
    pub id: EntityId,
    pub property_id: EntityId,
    pub date_sale: DateTime<Utc>,
    pub name: String,
    pub value: f64,
    pub tax: f64,
    #[serde(default = "epoch")]
    pub created_at: DateTime<Utc>,
}

impl PropertyTrace {
    pub fn new(
        property_id: EntityId,
        date_sale: DateTime<Utc>,
        name: impl Into<String>,
        value: f64,
        tax: f64,
    ) -> Self {
        Self {
            id: EntityId::EMPTY,
            property_id,
            date_sale,
            name: name.into(),
            value,
            tax,
            created_at: epoch(),
        }
    }
}

impl Entity for PropertyTrace {
    const COLLECTION: &'static str = PROPERTY_TRACES;
    const NOUN: &'static str = "property trace";

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    fn stamp_created(&mut self, now: DateTime<Utc>) {
        self.created_at = now;
    }
}

fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::default()
}
