//! Catalog error taxonomy
//!
//! Repository and service operations fail with [`CatalogError`], never with a
//! raw [`StoreError`]. Each variant maps to an HTTP-equivalent status code so
//! an outer layer can translate it uniformly through [`ErrorResponse`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::StoreError;

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// A single violated validation rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// Entity or referenced owner absent
    #[error("{0}")]
    NotFound(String),

    /// Duplicate identifier on insert
    #[error("{0}")]
    Conflict(String),

    /// Missing or empty identifier on update
    #[error("{0}")]
    InvalidArgument(String),

    /// Write command rejected before reaching a repository
    #[error("Validation failed: {} error(s)", .0.len())]
    ValidationFailed(Vec<FieldViolation>),

    /// The document store could not be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl CatalogError {
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict<S: Into<String>>(msg: S) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// HTTP-equivalent status code
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::InvalidArgument(_) | Self::ValidationFailed(_) => 400,
            Self::Unavailable(_) | Self::Store(_) => 500,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Violations carried by a validation failure, empty otherwise
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            Self::ValidationFailed(violations) => violations,
            _ => &[],
        }
    }
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Connection(msg) => Self::Unavailable(msg),
            other => Self::Store(other),
        }
    }
}

/// Boundary rendering of a [`CatalogError`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldViolation>,
}

impl From<&CatalogError> for ErrorResponse {
    fn from(err: &CatalogError) -> Self {
        Self {
            status: err.status_code(),
            message: err.to_string(),
            errors: err.violations().to_vec(),
        }
    }
}

impl From<CatalogError> for ErrorResponse {
    fn from(err: CatalogError) -> Self {
        Self::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(CatalogError::not_found("Owner not found").status_code(), 404);
        assert_eq!(CatalogError::conflict("dup").status_code(), 409);
        assert_eq!(CatalogError::invalid_argument("bad").status_code(), 400);
        assert_eq!(CatalogError::ValidationFailed(vec![]).status_code(), 400);
        assert_eq!(CatalogError::Unavailable("down".into()).status_code(), 500);
    }

    #[test]
    fn connection_failures_become_unavailable() {
        let err: CatalogError = StoreError::Connection("refused".into()).into();
        assert_eq!(err, CatalogError::Unavailable("refused".into()));

        let err: CatalogError = StoreError::query("syntax").into();
        assert!(matches!(err, CatalogError::Store(StoreError::Query(_))));
    }

    #[test]
    fn response_lists_violations() {
        let err = CatalogError::ValidationFailed(vec![
            FieldViolation::new("name", "must not be empty"),
            FieldViolation::new("price", "must not be negative"),
        ]);
        let response = ErrorResponse::from(&err);
        assert_eq!(response.status, 400);
        assert_eq!(response.message, "Validation failed: 2 error(s)");
        assert_eq!(response.errors.len(), 2);

        let json = serde_json::to_value(ErrorResponse::from(CatalogError::not_found(
            "Property not found",
        )))
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": 404, "message": "Property not found"})
        );
    }
}
