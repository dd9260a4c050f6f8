use serde::{Deserialize, Serialize};

/// Path value selecting the in-memory engine
pub const MEMORY_PATH: &str = ":memory:";

/// Configuration for the SurrealDB backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurrealDbConfig {
    pub namespace: String,
    pub database: String,
    /// RocksDB directory, or `:memory:` for a process-local database
    pub path: String,
    pub max_connections: Option<u32>,
    pub timeout_seconds: Option<u64>,
}

impl SurrealDbConfig {
    pub fn memory(namespace: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            database: database.into(),
            path: MEMORY_PATH.to_string(),
            ..Self::default()
        }
    }

    pub fn is_memory(&self) -> bool {
        self.path.is_empty() || self.path == MEMORY_PATH
    }
}

impl Default for SurrealDbConfig {
    fn default() -> Self {
        Self {
            namespace: "estate".to_string(),
            database: "catalog".to_string(),
            path: "./estate.db".to_string(),
            max_connections: Some(10),
            timeout_seconds: Some(30),
        }
    }
}
