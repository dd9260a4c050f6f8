//! Filter to SurrealQL translation
//!
//! Filters compile to a `WHERE` clause plus named parameters. Values are
//! always bound, never spliced into the query text; field names are checked
//! against a plain identifier grammar before they are written out.
//!
//! Text criteria are resolved before compiling: each term is looked up with a
//! single `field @@ $term` statement, the only shape the planner always serves
//! from a search index, and the criterion becomes a record key membership test.

use std::collections::HashMap;

use estate_core::store::{Filter, StoreError, StoreResult, ID_FIELD};
use serde_json::Value;

/// Record keys matched by each text query of a filter
pub type TextMatches = HashMap<String, Vec<String>>;

/// A compiled `WHERE` clause and its bound parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhereClause {
    /// Condition text, `None` when every record matches
    pub condition: Option<String>,
    pub params: Vec<(String, Value)>,
}

impl WhereClause {
    /// ` WHERE <condition>` or the empty string
    pub fn to_sql(&self) -> String {
        match &self.condition {
            Some(condition) => format!(" WHERE {}", condition),
            None => String::new(),
        }
    }
}

/// Compile `filter`
///
/// `text` holds the resolved text queries; text filters fail without it.
pub fn compile(filter: &Filter, text: Option<&TextMatches>) -> StoreResult<WhereClause> {
    let mut compiler = Compiler {
        params: Vec::new(),
        text,
    };
    let condition = compiler.condition(filter)?;
    Ok(WhereClause {
        condition,
        params: compiler.params,
    })
}

/// Whether `name` is safe to use unquoted as a table or field name
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub fn ensure_identifier(name: &str) -> StoreResult<&str> {
    if is_identifier(name) {
        Ok(name)
    } else {
        Err(StoreError::query(format!("invalid identifier: {:?}", name)))
    }
}

/// Text queries appearing in `filter`, in order
pub fn text_queries(filter: &Filter) -> Vec<&str> {
    match filter {
        Filter::Text { query } => vec![query.as_str()],
        Filter::And(terms) => terms.iter().flat_map(text_queries).collect(),
        _ => Vec::new(),
    }
}

/// Statement returning the keys of records whose `field` contains `$term`
pub fn text_lookup(field: &str) -> StoreResult<String> {
    Ok(format!(
        "SELECT meta::id(id) AS key FROM type::table($table) WHERE {} @@ $term",
        ensure_identifier(field)?
    ))
}

struct Compiler<'a> {
    params: Vec<(String, Value)>,
    text: Option<&'a TextMatches>,
}

impl Compiler<'_> {
    fn bind(&mut self, value: Value) -> String {
        let name = format!("p{}", self.params.len());
        self.params.push((name.clone(), value));
        format!("${}", name)
    }

    fn field(name: &str) -> StoreResult<String> {
        if name == ID_FIELD {
            return Ok("meta::id(id)".to_string());
        }
        Ok(ensure_identifier(name)?.to_string())
    }

    fn condition(&mut self, filter: &Filter) -> StoreResult<Option<String>> {
        let condition = match filter {
            Filter::All => return Ok(None),
            Filter::Eq { field, value } => {
                let field = Self::field(field)?;
                format!("{} = {}", field, self.bind(value.clone()))
            }
            Filter::Text { query } => {
                let matches = self.text.ok_or_else(|| {
                    StoreError::query("text search requires a text index on the collection")
                })?;
                let keys = matches.get(query).ok_or_else(|| {
                    StoreError::query(format!("text query {:?} was not resolved", query))
                })?;
                if keys.is_empty() {
                    return Ok(Some("false".to_string()));
                }
                let keys = Value::from(keys.clone());
                format!("meta::id(id) INSIDE {}", self.bind(keys))
            }
            Filter::Regex {
                field,
                pattern,
                case_insensitive,
            } => {
                let field = Self::field(field)?;
                let pattern = if *case_insensitive {
                    format!("(?i){}", pattern)
                } else {
                    pattern.clone()
                };
                format!("string::matches({}, {})", field, self.bind(Value::String(pattern)))
            }
            Filter::Range { field, min, max } => {
                let field = Self::field(field)?;
                let mut bounds = Vec::new();
                if let Some(min) = min {
                    bounds.push(format!("{} >= {}", field, self.bind(Value::from(*min))));
                }
                if let Some(max) = max {
                    bounds.push(format!("{} <= {}", field, self.bind(Value::from(*max))));
                }
                if bounds.is_empty() {
                    return Ok(None);
                }
                bounds.join(" AND ")
            }
            Filter::And(terms) => {
                let mut parts = Vec::new();
                for term in terms {
                    if let Some(part) = self.condition(term)? {
                        parts.push(format!("({})", part));
                    }
                }
                if parts.is_empty() {
                    return Ok(None);
                }
                parts.join(" AND ")
            }
        };
        Ok(Some(condition))
    }
}
