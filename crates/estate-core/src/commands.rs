//! Write commands and their validation rules
//!
//! Every write reaching the catalog arrives as one of these commands. The
//! command is validated as a whole first; on failure the caller receives
//! [`CatalogError::ValidationFailed`] listing every broken rule, sorted by
//! field, and no repository is touched.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::entities::{Owner, Property, PropertyImage, PropertyTrace};
use crate::error::{CatalogError, CatalogResult, FieldViolation};
use crate::id::EntityId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateOwner {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub address: String,
    #[serde(default)]
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub photo: String,
    #[validate(custom(function = "not_in_future"))]
    pub birthday: NaiveDate,
}

impl CreateOwner {
    pub fn into_owner(self) -> Owner {
        Owner::new(self.name, self.address, self.photo, self.birthday)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct UpdateOwner {
    #[validate(custom(function = "required_id"))]
    pub id: EntityId,
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub address: String,
    #[serde(default)]
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub photo: String,
    #[validate(custom(function = "not_in_future"))]
    pub birthday: NaiveDate,
}

impl UpdateOwner {
    /// Overwrite the mutable fields of `owner`
    pub fn apply(self, owner: &mut Owner) {
        owner.name = self.name;
        owner.address = self.address;
        owner.photo = self.photo;
        owner.birthday = self.birthday;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateProperty {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub address: String,
    #[validate(custom(function = "non_negative_amount"))]
    pub price: f64,
    #[validate(length(min = 1, max = 50, message = "must be between 1 and 50 characters"))]
    pub code_internal: String,
    #[validate(range(min = 1800, max = 2100, message = "must be between 1800 and 2100"))]
    pub year: i32,
    #[validate(custom(function = "required_id"))]
    pub owner_id: EntityId,
}

impl CreateProperty {
    pub fn into_property(self) -> Property {
        Property::new(
            self.name,
            self.address,
            self.price,
            self.code_internal,
            self.year,
            self.owner_id,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct UpdateProperty {
    #[validate(custom(function = "required_id"))]
    pub id: EntityId,
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub address: String,
    #[validate(custom(function = "non_negative_amount"))]
    pub price: f64,
    #[validate(length(min = 1, max = 50, message = "must be between 1 and 50 characters"))]
    pub code_internal: String,
    #[validate(range(min = 1800, max = 2100, message = "must be between 1800 and 2100"))]
    pub year: i32,
    #[validate(custom(function = "required_id"))]
    pub owner_id: EntityId,
}

impl UpdateProperty {
    pub fn apply(self, property: &mut Property) {
        property.name = self.name;
        property.address = self.address;
        property.price = self.price;
        property.code_internal = self.code_internal;
        property.year = self.year;
        property.owner_id = self.owner_id;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreatePropertyImage {
    #[validate(custom(function = "required_id"))]
    pub property_id: EntityId,
    #[validate(length(min = 1, max = 500, message = "must be between 1 and 500 characters"))]
    pub file: String,
    #[serde(default)]
    pub enabled: bool,
}

impl CreatePropertyImage {
    pub fn into_image(self) -> PropertyImage {
        PropertyImage::new(self.property_id, self.file, self.enabled)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct UpdatePropertyImage {
    #[validate(custom(function = "required_id"))]
    pub id: EntityId,
    #[validate(custom(function = "required_id"))]
    pub property_id: EntityId,
    #[validate(length(min = 1, max = 500, message = "must be between 1 and 500 characters"))]
    pub file: String,
    #[serde(default)]
    pub enabled: bool,
}

impl UpdatePropertyImage {
    pub fn apply(self, image: &mut PropertyImage) {
        image.property_id = self.property_id;
        image.file = self.file;
        image.enabled = self.enabled;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreatePropertyTrace {
    #[validate(custom(function = "required_id"))]
    pub property_id: EntityId,
    pub date_sale: DateTime<Utc>,
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(custom(function = "non_negative_amount"))]
    pub value: f64,
    #[validate(custom(function = "non_negative_amount"))]
    pub tax: f64,
}

impl CreatePropertyTrace {
    pub fn into_trace(self) -> PropertyTrace {
        PropertyTrace::new(
            self.property_id,
            self.date_sale,
            self.name,
            self.value,
            self.tax,
        )
    }
}

/// Run the command's rules, collecting every violation
pub fn validate_command<C: Validate>(command: &C) -> CatalogResult<()> {
    command
        .validate()
        .map_err(|errors| CatalogError::ValidationFailed(violations(&errors)))
}

fn violations(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut violations: Vec<FieldViolation> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                FieldViolation::new(field.to_string(), message)
            })
        })
        .collect();

    violations.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
    violations
}

fn required_id(id: &EntityId) -> Result<(), ValidationError> {
    if id.is_empty() {
        return Err(ValidationError::new("required").with_message("must not be empty".into()));
    }
    Ok(())
}

fn non_negative_amount(amount: f64) -> Result<(), ValidationError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(ValidationError::new("range")
            .with_message("must be a non-negative number".into()));
    }
    Ok(())
}

fn not_in_future(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date > Utc::now().date_naive() {
        return Err(ValidationError::new("future_date")
            .with_message("must not be in the future".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn owner_command() -> CreateOwner {
        CreateOwner {
            name: "Ana".into(),
            address: "1 Elm St".into(),
            photo: String::new(),
            birthday: NaiveDate::from_ymd_opt(1980, 5, 17).unwrap(),
        }
    }

    fn property_command() -> CreateProperty {
        CreateProperty {
            name: "Sunny Villa".into(),
            address: "12 Ocean Drive".into(),
            price: 150.0,
            code_internal: "SV-01".into(),
            year: 2001,
            owner_id: EntityId::generate(),
        }
    }

    fn failed_fields(result: CatalogResult<()>) -> Vec<String> {
        result
            .unwrap_err()
            .violations()
            .iter()
            .map(|v| v.field.clone())
            .collect()
    }

    #[test]
    fn valid_commands_pass() {
        validate_command(&owner_command()).unwrap();
        validate_command(&property_command()).unwrap();
    }

    #[test_case(|c: &mut CreateProperty| c.name.clear(), "name" ; "empty name")]
    #[test_case(|c: &mut CreateProperty| c.name = "x".repeat(101), "name" ; "long name")]
    #[test_case(|c: &mut CreateProperty| c.address.clear(), "address" ; "empty address")]
    #[test_case(|c: &mut CreateProperty| c.price = -1.0, "price" ; "negative price")]
    #[test_case(|c: &mut CreateProperty| c.price = f64::NAN, "price" ; "nan price")]
    #[test_case(|c: &mut CreateProperty| c.code_internal = "c".repeat(51), "code_internal" ; "long code")]
    #[test_case(|c: &mut CreateProperty| c.year = 1799, "year" ; "year too early")]
    #[test_case(|c: &mut CreateProperty| c.year = 2101, "year" ; "year too late")]
    #[test_case(|c: &mut CreateProperty| c.owner_id = EntityId::EMPTY, "owner_id" ; "missing owner")]
    fn property_rule(mutate: fn(&mut CreateProperty), field: &str) {
        let mut command = property_command();
        mutate(&mut command);
        assert_eq!(failed_fields(validate_command(&command)), vec![field]);
    }

    #[test]
    fn every_violation_is_reported_in_field_order() {
        let command = CreateProperty {
            name: String::new(),
            address: String::new(),
            price: -5.0,
            code_internal: String::new(),
            year: 0,
            owner_id: EntityId::EMPTY,
        };
        assert_eq!(
            failed_fields(validate_command(&command)),
            vec!["address", "code_internal", "name", "owner_id", "price", "year"]
        );
    }

    #[test]
    fn owner_birthday_cannot_be_in_the_future() {
        let mut command = owner_command();
        command.birthday = Utc::now().date_naive() + chrono::Duration::days(2);
        let err = validate_command(&command).unwrap_err();
        assert_eq!(
            err.violations(),
            &[FieldViolation::new("birthday", "must not be in the future")]
        );
    }

    #[test]
    fn update_commands_require_an_id() {
        let command = UpdatePropertyImage {
            id: EntityId::EMPTY,
            property_id: EntityId::generate(),
            file: "front.jpg".into(),
            enabled: true,
        };
        assert_eq!(failed_fields(validate_command(&command)), vec!["id"]);
    }

    #[test_case(-0.01, 0.0, &["value"] ; "negative value")]
    #[test_case(10.0, -1.0, &["tax"] ; "negative tax")]
    #[test_case(10.0, f64::INFINITY, &["tax"] ; "infinite tax")]
    #[test_case(0.0, 0.0, &[] ; "zero amounts")]
    fn trace_amounts(value: f64, tax: f64, expected: &[&str]) {
        let command = CreatePropertyTrace {
            property_id: EntityId::generate(),
            date_sale: Utc::now(),
            name: "Sale".into(),
            value,
            tax,
        };
        let fields = match validate_command(&command) {
            Ok(()) => Vec::new(),
            Err(err) => err.violations().iter().map(|v| v.field.clone()).collect(),
        };
        assert_eq!(fields, expected);
    }

    #[test]
    fn update_owner_keeps_identity_fields() {
        let mut owner = owner_command().into_owner();
        owner.id = EntityId::generate();
        let created_at = owner.created_at;

        UpdateOwner {
            id: owner.id,
            name: "Ana Maria".into(),
            address: "2 Oak St".into(),
            photo: "ana.png".into(),
            birthday: owner.birthday,
        }
        .apply(&mut owner);

        assert_eq!(owner.name, "Ana Maria");
        assert_eq!(owner.photo, "ana.png");
        assert_eq!(owner.created_at, created_at);
    }
}
