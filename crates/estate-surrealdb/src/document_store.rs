//! [`DocumentStore`] over SurrealDB
//!
//! Each collection is a schemaless table and each document a record keyed by
//! its hex identifier. Text search runs on `SEARCH` indexes; which fields a
//! table's text index covers is remembered when the index is created.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use estate_core::store::{
    document_id, text_terms, Document, DocumentStore, Filter, IndexKind, IndexSpec, StoreError,
    StoreResult, ID_FIELD,
};
use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

use crate::query::{
    compile, ensure_identifier, text_lookup, text_queries, TextMatches, WhereClause,
};
use crate::surreal_client::SurrealClient;

/// Analyzer backing every text index
pub const TEXT_ANALYZER: &str = "estate_text";

/// Splits on whitespace and punctuation and lowercases, which yields the same
/// words as [`text_terms`]; punctuation marks become tokens of their own but
/// are never searched for
const TEXT_ANALYZER_DEFINITION: &str = "TOKENIZERS blank,punct FILTERS lowercase";

pub struct SurrealDocumentStore {
    client: SurrealClient,
    text_fields: RwLock<HashMap<String, Vec<String>>>,
}

impl SurrealDocumentStore {
    pub fn new(client: SurrealClient) -> Self {
        Self {
            client,
            text_fields: RwLock::new(HashMap::new()),
        }
    }

    pub fn client(&self) -> &SurrealClient {
        &self.client
    }

    fn text_fields_for(&self, collection: &str) -> Option<Vec<String>> {
        self.text_fields.read().get(collection).cloned()
    }

    fn table_param(collection: &str) -> (String, Value) {
        ("table".to_string(), Value::String(collection.to_string()))
    }

    /// Compile `filter`, resolving its text criteria first
    async fn where_clause(&self, collection: &str, filter: &Filter) -> StoreResult<WhereClause> {
        let queries = text_queries(filter);
        if queries.is_empty() {
            return compile(filter, None);
        }
        let Some(fields) = self.text_fields_for(collection) else {
            return compile(filter, None);
        };

        let mut matches = TextMatches::new();
        for query in queries {
            if !matches.contains_key(query) {
                let keys = self.match_text(collection, &fields, query).await?;
                matches.insert(query.to_string(), keys);
            }
        }
        compile(filter, Some(&matches))
    }

    /// Keys of records where any term of `query` appears in any of `fields`
    async fn match_text(
        &self,
        collection: &str,
        fields: &[String],
        query: &str,
    ) -> StoreResult<Vec<String>> {
        let mut keys = BTreeSet::new();
        for term in text_terms(query) {
            for field in fields {
                let rows = self
                    .client
                    .query(
                        &text_lookup(field)?,
                        vec![
                            Self::table_param(collection),
                            ("term".to_string(), Value::String(term.clone())),
                        ],
                    )
                    .await?;
                keys.extend(
                    rows.iter()
                        .filter_map(|row| row.get("key").and_then(Value::as_str))
                        .map(String::from),
                );
            }
        }
        debug!(collection, query, hits = keys.len(), "text lookup");
        Ok(keys.into_iter().collect())
    }

    fn id_params(collection: &str, id: &str) -> Vec<(String, Value)> {
        vec![
            Self::table_param(collection),
            ("id".to_string(), Value::String(id.to_string())),
        ]
    }
}

/// Record content: the document without its identifier, which lives in the record key
fn content(mut document: Document) -> Value {
    document.remove(ID_FIELD);
    Value::Object(document)
}

#[async_trait]
impl DocumentStore for SurrealDocumentStore {
    async fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Document>> {
        if let Some(id) = filter.as_id() {
            return self
                .client
                .query(
                    "SELECT * FROM type::thing($table, $id)",
                    Self::id_params(collection, id),
                )
                .await;
        }

        let clause = self.where_clause(collection, filter).await?;
        let sql = format!("SELECT * FROM type::table($table){}", clause.to_sql());
        debug!(collection, sql = %sql, "find");

        let mut params = clause.params;
        params.push(Self::table_param(collection));
        self.client.query(&sql, params).await
    }

    async fn insert_one(&self, collection: &str, document: Document) -> StoreResult<()> {
        let id = document_id(&document)
            .ok_or_else(|| {
                StoreError::InvalidDocument(format!("document has no string `{}` field", ID_FIELD))
            })?
            .to_string();

        let mut params = Self::id_params(collection, &id);
        params.push(("content".to_string(), content(document)));

        match self
            .client
            .query("CREATE type::thing($table, $id) CONTENT $content", params)
            .await
        {
            Ok(_) => Ok(()),
            Err(e) if e.to_string().contains("already exists") => Err(StoreError::DuplicateKey {
                collection: collection.to_string(),
                id,
            }),
            Err(e) => Err(e),
        }
    }

    async fn replace_one(&self, collection: &str, id: &str, document: Document) -> StoreResult<u64> {
        let mut params = Self::id_params(collection, id);
        params.push(("content".to_string(), content(document)));

        // UPDATE leaves missing records alone, so an empty result means no match
        let rows = self
            .client
            .query(
                "UPDATE type::thing($table, $id) CONTENT $content RETURN AFTER",
                params,
            )
            .await?;
        Ok(rows.len() as u64)
    }

    async fn delete_one(&self, collection: &str, id: &str) -> StoreResult<u64> {
        let rows = self
            .client
            .query(
                "DELETE type::thing($table, $id) RETURN BEFORE",
                Self::id_params(collection, id),
            )
            .await?;
        Ok(rows.len() as u64)
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let clause = self.where_clause(collection, filter).await?;
        let sql = format!(
            "DELETE type::table($table){} RETURN BEFORE",
            clause.to_sql()
        );
        debug!(collection, sql = %sql, "delete many");

        let mut params = clause.params;
        params.push(Self::table_param(collection));
        let rows = self.client.query(&sql, params).await?;
        Ok(rows.len() as u64)
    }

    async fn create_indexes(&self, collection: &str, indexes: &[IndexSpec]) -> StoreResult<()> {
        let table = ensure_identifier(collection)?;

        for index in indexes {
            let name = ensure_identifier(&index.name)?;
            if index.fields.is_empty() {
                return Err(StoreError::Index(format!(
                    "index {} on {} has no fields",
                    name, table
                )));
            }
            let fields = index
                .fields
                .iter()
                .map(|f| ensure_identifier(f))
                .collect::<StoreResult<Vec<_>>>()?;

            let statements = match index.kind {
                IndexKind::Text => {
                    let mut statements = vec![format!(
                        "DEFINE ANALYZER IF NOT EXISTS {} {};",
                        TEXT_ANALYZER, TEXT_ANALYZER_DEFINITION
                    )];
                    // A search index covers exactly one field
                    for field in &fields {
                        statements.push(format!(
                            "DEFINE INDEX IF NOT EXISTS {}_{} ON TABLE {} FIELDS {} SEARCH ANALYZER {} BM25;",
                            name, field, table, field, TEXT_ANALYZER
                        ));
                    }
                    statements.join("\n")
                }
                IndexKind::Ascending => format!(
                    "DEFINE INDEX IF NOT EXISTS {} ON TABLE {} FIELDS {};",
                    name,
                    table,
                    fields.join(", ")
                ),
            };

            self.client
                .execute(&statements)
                .await
                .map_err(|e| StoreError::Index(format!("{}: {}", name, e)))?;
            debug!(collection, index = %name, "index defined");

            if index.kind == IndexKind::Text {
                self.text_fields
                    .write()
                    .insert(collection.to_string(), index.fields.clone());
            }
        }

        Ok(())
    }
}
