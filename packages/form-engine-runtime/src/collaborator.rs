//! Collaborator contracts the engine consumes.
//!
//! Implementations live outside the engine; the in-memory versions here back
//! tests and local tooling.

use std::collections::HashMap;

use async_trait::async_trait;
use form_engine_core::schema::Schema;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use thiserror::Error;

/// Collaborator failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Referenced entity does not exist
    #[error("{entity_type} '{name}' not found")]
    NotFound { entity_type: String, name: String },

    /// Service could not be reached or returned an error
    #[error("Document service unavailable: {0}")]
    Unavailable(String),

    /// Request exceeded the configured timeout
    #[error("Fetch timed out after {0} ms")]
    Timeout(u64),
}

/// Reads field values of a stored document.
///
/// Must be idempotent; the resolver may call it redundantly.
#[async_trait]
pub trait DocumentFetch: Send + Sync {
    async fn get_field_values(
        &self,
        entity_type: &str,
        entity_id: &str,
        field_names: &[String],
    ) -> Result<HashMap<String, Value>, FetchError>;
}

/// Provides the schema for an entity type.
#[async_trait]
pub trait SchemaSource: Send + Sync {
    async fn get_schema(&self, entity_type: &str) -> Result<Schema, FetchError>;
}

/// In-memory document store.
#[derive(Debug, Default)]
pub struct InMemoryDocuments {
    documents: RwLock<HashMap<(String, String), Map<String, Value>>>,
}

impl InMemoryDocuments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores (or replaces) a document. Non-object values store an empty document.
    pub fn insert(&self, entity_type: &str, entity_id: &str, fields: Value) {
        let fields = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self.documents
            .write()
            .insert((entity_type.to_string(), entity_id.to_string()), fields);
    }
}

#[async_trait]
impl DocumentFetch for InMemoryDocuments {
    async fn get_field_values(
        &self,
        entity_type: &str,
        entity_id: &str,
        field_names: &[String],
    ) -> Result<HashMap<String, Value>, FetchError> {
        let documents = self.documents.read();
        let document = documents
            .get(&(entity_type.to_string(), entity_id.to_string()))
            .ok_or_else(|| FetchError::NotFound {
                entity_type: entity_type.to_string(),
                name: entity_id.to_string(),
            })?;
        Ok(field_names
            .iter()
            .filter_map(|name| document.get(name).map(|v| (name.clone(), v.clone())))
            .collect())
    }
}

/// In-memory schema registry.
#[derive(Debug, Default)]
pub struct InMemorySchemas {
    schemas: RwLock<HashMap<String, Schema>>,
}

impl InMemorySchemas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, schema: Schema) {
        self.schemas
            .write()
            .insert(schema.entity_type.clone(), schema);
    }
}

#[async_trait]
impl SchemaSource for InMemorySchemas {
    async fn get_schema(&self, entity_type: &str) -> Result<Schema, FetchError> {
        self.schemas
            .read()
            .get(entity_type)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                entity_type: "Schema".to_string(),
                name: entity_type.to_string(),
            })
    }
}
