//! Fetch bindings between link fields and the fields they populate.

use std::collections::HashMap;

use crate::error::{FormError, Result};

use super::field::{FieldDescriptor, FieldType};
use super::schema::Schema;

/// A `fetchBinding` resolved against a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchBinding {
    /// Link field whose value names the remote entity
    pub source_field: String,
    /// Entity type the link field points at
    pub target_entity_type: String,
    /// Field that receives the fetched value
    pub destination_field: String,
    /// Field read from the remote entity
    pub remote_field_name: String,
    /// Only write when the destination is empty
    pub if_empty_only: bool,
}

impl FetchBinding {
    /// Splits `<link>.<remote>` at the first dot. Both halves must be non-empty.
    pub fn parse(expr: &str) -> Option<(&str, &str)> {
        let (source, remote) = expr.trim().split_once('.')?;
        let (source, remote) = (source.trim(), remote.trim());
        if source.is_empty() || remote.is_empty() {
            return None;
        }
        Some((source, remote))
    }

    /// Resolves a descriptor's binding against the schema.
    ///
    /// # Returns
    /// `Ok(None)` when the descriptor has no binding, `Err(InvalidBinding)` when
    /// the binding is malformed or its source is not a link field.
    pub fn resolve(descriptor: &FieldDescriptor, schema: &Schema) -> Result<Option<Self>> {
        let Some(expr) = descriptor.fetch_binding.as_deref() else {
            return Ok(None);
        };
        if expr.trim().is_empty() {
            return Ok(None);
        }
        let invalid = |reason: &str| FormError::InvalidBinding {
            field: descriptor.field_name.clone(),
            binding: expr.to_string(),
            reason: reason.to_string(),
        };

        if descriptor.is_break() {
            return Err(invalid("break markers cannot be bound"));
        }
        let (source, remote) =
            Self::parse(expr).ok_or_else(|| invalid("expected '<link field>.<remote field>'"))?;
        if source == descriptor.field_name {
            return Err(invalid("field cannot fetch from itself"));
        }
        let source_field = schema
            .get(source)
            .ok_or_else(|| invalid("source field does not exist"))?;
        if source_field.field_type != FieldType::Link {
            return Err(invalid("source field is not a Link field"));
        }
        let target = source_field
            .link_target()
            .ok_or_else(|| invalid("source link field has no target entity type"))?;

        Ok(Some(Self {
            source_field: source.to_string(),
            target_entity_type: target.to_string(),
            destination_field: descriptor.field_name.clone(),
            remote_field_name: remote.to_string(),
            if_empty_only: descriptor.fetch_if_empty_only,
        }))
    }
}

/// Map from link field name to the bindings that depend on it.
///
/// Built once per schema load so a commit only touches its own dependents.
#[derive(Debug, Clone, Default)]
pub struct DependencyIndex {
    by_source: HashMap<String, Vec<FetchBinding>>,
}

impl DependencyIndex {
    /// Builds the index. Invalid bindings are logged and left out.
    pub fn build(schema: &Schema) -> Self {
        let mut by_source: HashMap<String, Vec<FetchBinding>> = HashMap::new();
        for field in schema.data_fields() {
            match FetchBinding::resolve(field, schema) {
                Ok(Some(binding)) => by_source
                    .entry(binding.source_field.clone())
                    .or_default()
                    .push(binding),
                Ok(None) => {}
                Err(e) => tracing::warn!("Ignoring fetch binding: {}", e),
            }
        }
        Self { by_source }
    }

    /// Bindings whose source is `source_field`, in schema order.
    pub fn dependents(&self, source_field: &str) -> &[FetchBinding] {
        self.by_source
            .get(source_field)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_source(&self, field_name: &str) -> bool {
        self.by_source.contains_key(field_name)
    }

    /// Names of all link fields with at least one dependent.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.by_source.keys().map(String::as_str)
    }

    /// Total number of bindings.
    pub fn len(&self) -> usize {
        self.by_source.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_source.is_empty()
    }
}
