//! Filter predicates understood by every document store

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ID_FIELD;
use crate::id::EntityId;

/// Composable predicate over documents
///
/// # Examples
///
/// ```
/// use estate_core::store::Filter;
///
/// // price in [100, 200] AND address contains "main" (any case)
/// let filter = Filter::and(vec![
///     Filter::range("price", Some(100.0), Some(200.0)),
///     Filter::regex("address", "main", true),
/// ]);
/// assert!(filter.is_compound());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Filter {
    /// Matches every document
    All,

    /// Field equals value
    Eq { field: String, value: Value },

    /// Tokenized search against the collection's text index
    Text { query: String },

    /// Regular-expression match against a string field
    Regex {
        field: String,
        pattern: String,
        case_insensitive: bool,
    },

    /// Inclusive numeric range; an absent bound is open
    Range {
        field: String,
        min: Option<f64>,
        max: Option<f64>,
    },

    /// Logical AND; an empty list matches every document
    And(Vec<Filter>),
}

impl Filter {
    /// Match the document keyed by `id`
    pub fn id(id: &EntityId) -> Self {
        Filter::Eq {
            field: ID_FIELD.to_string(),
            value: Value::String(id.to_hex()),
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn text(query: impl Into<String>) -> Self {
        Filter::Text {
            query: query.into(),
        }
    }

    pub fn regex(field: impl Into<String>, pattern: impl Into<String>, case_insensitive: bool) -> Self {
        Filter::Regex {
            field: field.into(),
            pattern: pattern.into(),
            case_insensitive,
        }
    }

    pub fn range(field: impl Into<String>, min: Option<f64>, max: Option<f64>) -> Self {
        Filter::Range {
            field: field.into(),
            min,
            max,
        }
    }

    /// Conjunction of `filters`
    ///
    /// Nested conjunctions are flattened and `All` terms dropped. A
    /// conjunction of zero terms collapses to `All`, of one term to that term.
    pub fn and(filters: Vec<Filter>) -> Self {
        let mut terms = Vec::with_capacity(filters.len());
        for filter in filters {
            match filter {
                Filter::All => {}
                Filter::And(inner) => terms.extend(inner),
                other => terms.push(other),
            }
        }

        match terms.len() {
            0 => Filter::All,
            1 => terms.remove(0),
            _ => Filter::And(terms),
        }
    }

    pub fn is_compound(&self) -> bool {
        matches!(self, Filter::And(_))
    }

    /// Whether the filter needs a text index to be evaluated
    pub fn uses_text_index(&self) -> bool {
        match self {
            Filter::Text { .. } => true,
            Filter::And(terms) => terms.iter().any(Filter::uses_text_index),
            _ => false,
        }
    }

    /// When the filter is a bare identifier match, return the identifier
    pub fn as_id(&self) -> Option<&str> {
        match self {
            Filter::Eq { field, value } if field == ID_FIELD => value.as_str(),
            _ => None,
        }
    }
}

/// Search terms of `text`: maximal runs of alphanumeric characters, lowercased
///
/// Documents and queries are split the same way, so a term only matches a
/// whole word. Accents are kept and letters stay glued to digits.
pub fn text_terms(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn and_flattens_and_collapses() {
        assert_eq!(Filter::and(vec![]), Filter::All);
        assert_eq!(Filter::and(vec![Filter::All, Filter::All]), Filter::All);

        let single = Filter::and(vec![Filter::All, Filter::text("villa")]);
        assert_eq!(single, Filter::text("villa"));

        let nested = Filter::and(vec![
            Filter::and(vec![Filter::text("villa"), Filter::eq("year", 2001)]),
            Filter::range("price", Some(1.0), None),
        ]);
        match nested {
            Filter::And(terms) => assert_eq!(terms.len(), 3),
            other => panic!("expected conjunction, got {:?}", other),
        }
    }

    #[test]
    fn id_filter_round_trips_through_as_id() {
        let id = EntityId::generate();
        let filter = Filter::id(&id);
        assert_eq!(filter.as_id(), Some(id.to_hex().as_str()));
        assert_eq!(Filter::eq("owner_id", json!("x")).as_id(), None);
    }

    #[test]
    fn text_usage_is_detected_in_conjunctions() {
        assert!(Filter::text("x").uses_text_index());
        assert!(Filter::and(vec![Filter::text("x"), Filter::eq("a", 1)]).uses_text_index());
        assert!(!Filter::range("price", None, Some(3.0)).uses_text_index());
    }

    #[test]
    fn text_terms_split_on_anything_not_alphanumeric() {
        assert_eq!(
            text_terms("12 Ocean Drive, Apt. 4-B"),
            vec!["12", "ocean", "drive", "apt", "4", "b"]
        );
        assert_eq!(text_terms("Bogotá SV01"), vec!["bogotá", "sv01"]);
        assert!(text_terms(" !! ").is_empty());
    }
}
