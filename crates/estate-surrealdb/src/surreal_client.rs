//! SurrealDB client
//!
//! Thin wrapper around the embedded SurrealDB SDK. One client is opened at
//! startup and shared; cloning is cheap and never reopens the database, which
//! matters for RocksDB since a directory can only be locked once per process.
//!
//! ## Supported Backends
//!
//! - **Memory (Mem)**: in-memory storage for development and tests
//! - **File (RocksDB)**: persistent storage
//!
//! ## Usage
//!
//! ```no_run
//! use estate_surrealdb::SurrealClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = SurrealClient::new_file("./data/estate.db").await?;
//!     let rows = client
//!         .query("SELECT * FROM Owners", Vec::new())
//!         .await?;
//!     println!("{} owners", rows.len());
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use estate_core::store::{Document, StoreError, StoreResult};
use serde_json::{Map, Value};
use surrealdb::engine::local::Db;
use surrealdb::Surreal;
use tracing::debug;

use crate::types::SurrealDbConfig;

#[derive(Clone)]
pub struct SurrealClient {
    inner: Arc<SurrealClientInner>,
}

struct SurrealClientInner {
    db: Surreal<Db>,
    config: SurrealDbConfig,
}

impl std::fmt::Debug for SurrealClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurrealClient")
            .field("config", &self.inner.config)
            .finish()
    }
}

impl SurrealClient {
    /// Open the database described by `config`
    ///
    /// A `:memory:` (or empty) path selects the in-memory engine, anything
    /// else is a RocksDB directory.
    pub async fn new(config: SurrealDbConfig) -> StoreResult<Self> {
        use surrealdb::engine::local::{Mem, RocksDb};

        let db = if config.is_memory() {
            Surreal::new::<Mem>(()).await.map_err(|e| {
                StoreError::Connection(format!("Failed to create in-memory database: {}", e))
            })?
        } else {
            Surreal::new::<RocksDb>(&config.path).await.map_err(|e| {
                StoreError::Connection(format!(
                    "Failed to open database at {}: {}",
                    config.path, e
                ))
            })?
        };

        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await
            .map_err(|e| {
                StoreError::Connection(format!(
                    "Failed to use namespace '{}' and database '{}': {}",
                    config.namespace, config.database, e
                ))
            })?;

        debug!(
            namespace = %config.namespace,
            database = %config.database,
            path = %config.path,
            "opened SurrealDB"
        );

        Ok(Self {
            inner: Arc::new(SurrealClientInner { db, config }),
        })
    }

    pub async fn new_memory() -> StoreResult<Self> {
        Self::new(SurrealDbConfig::memory("estate", "catalog")).await
    }

    /// In-memory client with a namespace and database unique to this call
    ///
    /// Lets tests running in parallel share nothing.
    pub async fn new_isolated_memory() -> StoreResult<Self> {
        let unique = uuid::Uuid::new_v4().simple().to_string();
        Self::new(SurrealDbConfig::memory(
            format!("test_{}", &unique[..8]),
            format!("db_{}", &unique[8..]),
        ))
        .await
    }

    pub async fn new_file(path: &str) -> StoreResult<Self> {
        Self::new(SurrealDbConfig {
            path: path.to_string(),
            ..SurrealDbConfig::default()
        })
        .await
    }

    /// Run one SurrealQL statement and return its rows as documents
    ///
    /// Parameters are bound by name (`$name` in the statement).
    pub async fn query(&self, sql: &str, params: Vec<(String, Value)>) -> StoreResult<Vec<Document>> {
        let mut query = self.inner.db.query(sql);
        for binding in params {
            query = query.bind(binding);
        }

        let response = query
            .await
            .map_err(|e| StoreError::query(format!("Query execution failed: {}", e)))?;
        let mut response = response
            .check()
            .map_err(|e| StoreError::query(format!("Query returned error: {}", e)))?;

        let surreal_value: surrealdb::Value = response
            .take(0)
            .map_err(|e| StoreError::query(format!("Failed to extract query results: {}", e)))?;

        // The SDK value serializes in its tagged form, e.g. {"Array": [{"Object": ..}]}
        let tagged = serde_json::to_value(&surreal_value).map_err(|e| {
            StoreError::serialization(format!("Failed to serialize SurrealDB value: {}", e))
        })?;

        let rows = match unwrap_surreal_value(tagged) {
            Value::Array(rows) => rows,
            Value::Null => Vec::new(),
            other => vec![other],
        };

        Ok(rows
            .into_iter()
            .filter_map(|row| match row {
                Value::Object(map) => Some(record_to_document(map)),
                _ => None,
            })
            .collect())
    }

    /// Run statements whose results are not needed, such as schema definitions
    pub async fn execute(&self, sql: &str) -> StoreResult<()> {
        self.inner
            .db
            .query(sql)
            .await
            .map_err(|e| StoreError::query(format!("Query execution failed: {}", e)))?
            .check()
            .map_err(|e| StoreError::query(format!("Query returned error: {}", e)))?;
        Ok(())
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.inner.db
    }

    pub fn config(&self) -> &SurrealDbConfig {
        &self.inner.config
    }
}

/// Replace the record link in `id` with its bare key
fn record_to_document(mut map: Map<String, Value>) -> Document {
    let key = match map.get("id") {
        Some(Value::String(link)) => link.split_once(':').map(|(_, key)| key.to_string()),
        _ => None,
    };
    if let Some(key) = key {
        map.insert("id".to_string(), Value::String(key));
    }
    map
}

/// Convert the SDK's tagged serialization to plain JSON
///
/// `{"Number": {"Int": 30}}` becomes `30`, `{"Strand": "Ana"}` becomes
/// `"Ana"` and a record link `{"Thing": {"tb": "Owners", "id": ..}}` becomes
/// `"Owners:<key>"`. Bare `"None"`/`"Null"` strings are unit variants and map
/// to JSON null.
pub(crate) fn unwrap_surreal_value(value: Value) -> Value {
    match value {
        Value::String(s) if s == "None" || s == "Null" => Value::Null,
        Value::Array(items) => Value::Array(items.into_iter().map(unwrap_surreal_value).collect()),
        Value::Object(mut obj) => {
            if obj.len() == 1 {
                if let Some(inner) = obj.remove("Number") {
                    return unwrap_number(inner);
                }
                if let Some(inner) = obj
                    .remove("Strand")
                    .or_else(|| obj.remove("String"))
                    .or_else(|| obj.remove("Datetime"))
                    .or_else(|| obj.remove("Uuid"))
                    .or_else(|| obj.remove("Bool"))
                {
                    return inner;
                }
                if let Some(thing) = obj.remove("Thing") {
                    return unwrap_thing(thing);
                }
                if let Some(inner) = obj.remove("Array").or_else(|| obj.remove("Object")) {
                    return unwrap_surreal_value(inner);
                }
            }

            Value::Object(
                obj.into_iter()
                    .map(|(k, v)| (k, unwrap_surreal_value(v)))
                    .collect(),
            )
        }
        other => other,
    }
}

fn unwrap_number(inner: Value) -> Value {
    match inner {
        Value::Object(mut num) => {
            if let Some(int) = num.remove("Int") {
                return int;
            }
            if let Some(float) = num.remove("Float") {
                return float;
            }
            if let Some(Value::String(decimal)) = num.remove("Decimal") {
                return decimal
                    .parse::<f64>()
                    .map(Value::from)
                    .unwrap_or(Value::String(decimal));
            }
            Value::Object(num)
        }
        other => other,
    }
}

fn unwrap_thing(thing: Value) -> Value {
    let Value::Object(mut thing) = thing else {
        return thing;
    };
    let table = thing.remove("tb").and_then(|v| v.as_str().map(String::from));
    let key = thing.remove("id").map(unwrap_surreal_value);

    match (table, key) {
        (Some(table), Some(Value::String(key))) => Value::String(format!("{}:{}", table, key)),
        (Some(table), Some(Value::Number(key))) => Value::String(format!("{}:{}", table, key)),
        (table, key) => {
            let mut rest = thing;
            if let Some(table) = table {
                rest.insert("tb".to_string(), Value::String(table));
            }
            if let Some(key) = key {
                rest.insert("id".to_string(), key);
            }
            Value::Object(rest)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tagged_values_are_unwrapped() {
        let tagged = json!({"Array": [{"Object": {
            "id": {"Thing": {"tb": "Owners", "id": {"String": "65a1"}}},
            "name": {"Strand": "Ana"},
            "age": {"Number": {"Int": 30}},
            "price": {"Number": {"Float": 150.5}},
            "enabled": {"Bool": true},
            "updated_at": "Null",
            "tags": {"Array": [{"Strand": "a"}]}
        }}]});

        assert_eq!(
            unwrap_surreal_value(tagged),
            json!([{
                "id": "Owners:65a1",
                "name": "Ana",
                "age": 30,
                "price": 150.5,
                "enabled": true,
                "updated_at": null,
                "tags": ["a"]
            }])
        );
    }

    #[test]
    fn record_link_becomes_bare_key() {
        let doc = record_to_document(
            json!({"id": "Properties:65a1", "name": "Villa"})
                .as_object()
                .cloned()
                .unwrap(),
        );
        assert_eq!(doc["id"], json!("65a1"));
    }

    #[test]
    fn strings_named_like_variants_survive_inside_strand() {
        assert_eq!(unwrap_surreal_value(json!({"Strand": "None"})), json!("None"));
    }

    #[tokio::test]
    async fn memory_client_runs_queries() {
        let client = SurrealClient::new_isolated_memory().await.unwrap();
        client
            .query(
                "CREATE type::thing($table, $id) CONTENT $content",
                vec![
                    ("table".to_string(), json!("Owners")),
                    ("id".to_string(), json!("abc")),
                    ("content".to_string(), json!({"name": "Ana", "age": 30})),
                ],
            )
            .await
            .unwrap();

        let rows = client
            .query("SELECT * FROM Owners", Vec::new())
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], json!("abc"));
        assert_eq!(rows[0]["name"], json!("Ana"));
        assert_eq!(rows[0]["age"], json!(30));
    }
}
