//! Ordered form schema.
//!
//! A schema is a flat list of field descriptors. Column and layout breaks are
//! interleaved with real fields; `order` is always `1..=len` in list order.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{FormError, Result};

use super::field::FieldDescriptor;

/// Ordered sequence of field descriptors for one entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "SchemaFile")]
pub struct Schema {
    /// Entity type this schema describes
    pub entity_type: String,
    fields: Vec<FieldDescriptor>,
}

/// Schema as found on the wire, before ordering is normalized.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SchemaFile {
    entity_type: String,
    #[serde(default)]
    fields: Vec<FieldDescriptor>,
}

impl From<SchemaFile> for Schema {
    fn from(file: SchemaFile) -> Self {
        let mut fields = file.fields;
        // Stable: equal orders keep their file position.
        fields.sort_by_key(|f| f.order);
        let mut schema = Self {
            entity_type: file.entity_type,
            fields,
        };
        schema.renumber();
        schema
    }
}

impl Schema {
    /// Creates an empty schema.
    pub fn new(entity_type: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            fields: Vec::new(),
        }
    }

    /// Creates a schema from fields in list order.
    ///
    /// # Returns
    /// `Result<Schema, FormError>`; fails on duplicate or missing field names.
    pub fn with_fields(
        entity_type: impl Into<String>,
        fields: Vec<FieldDescriptor>,
    ) -> Result<Self> {
        let mut schema = Self::new(entity_type);
        let mut seen = HashSet::new();
        for (position, field) in fields.iter().enumerate() {
            if field.is_break() {
                continue;
            }
            if field.field_name.is_empty() {
                return Err(FormError::MissingFieldName {
                    entity_type: schema.entity_type.clone(),
                    position,
                });
            }
            if !seen.insert(field.field_name.as_str()) {
                return Err(schema.duplicate(&field.field_name));
            }
        }
        schema.fields = fields;
        schema.renumber();
        Ok(schema)
    }

    /// Parses a schema from its JSON wire form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the schema to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Field descriptors in order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Looks up a non-break field by name.
    pub fn get(&self, field_name: &str) -> Option<&FieldDescriptor> {
        self.position(field_name).map(|index| &self.fields[index])
    }

    /// Index of a non-break field by name.
    pub fn position(&self, field_name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| !f.is_break() && f.field_name == field_name)
    }

    pub fn contains(&self, field_name: &str) -> bool {
        self.position(field_name).is_some()
    }

    /// Non-break fields in order.
    pub fn data_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| !f.is_break())
    }

    /// Indices of all column break markers.
    pub fn column_break_positions(&self) -> Vec<usize> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_column_break())
            .map(|(index, _)| index)
            .collect()
    }

    /// Inserts a descriptor at `at_index` (clamped to the end) and renumbers.
    ///
    /// # Returns
    /// `Result<(), FormError>`; the schema is unchanged on error.
    pub fn insert(&mut self, descriptor: FieldDescriptor, at_index: usize) -> Result<()> {
        if !descriptor.is_break() {
            if descriptor.field_name.is_empty() {
                return Err(FormError::MissingFieldName {
                    entity_type: self.entity_type.clone(),
                    position: at_index,
                });
            }
            if self.contains(&descriptor.field_name) {
                return Err(self.duplicate(&descriptor.field_name));
            }
        }
        let index = at_index.min(self.fields.len());
        self.fields.insert(index, descriptor);
        self.renumber();
        Ok(())
    }

    /// Removes a non-break field by name and renumbers.
    pub fn remove(&mut self, field_name: &str) -> Result<FieldDescriptor> {
        let index = self
            .position(field_name)
            .ok_or_else(|| self.not_found(field_name))?;
        Ok(self.remove_at(index))
    }

    /// Moves a non-break field so it ends up at `to_index` (clamped).
    ///
    /// The index refers to the list after the field has been taken out, so the
    /// field's final position is exactly `to_index`.
    pub fn move_field(&mut self, field_name: &str, to_index: usize) -> Result<()> {
        let from = self
            .position(field_name)
            .ok_or_else(|| self.not_found(field_name))?;
        let field = self.fields.remove(from);
        let index = to_index.min(self.fields.len());
        self.fields.insert(index, field);
        self.renumber();
        Ok(())
    }

    /// Reports duplicate names, order gaps and unresolvable bindings.
    pub fn check_integrity(&self) -> Vec<FormError> {
        super::validation::check_integrity(self)
    }

    /// Renumbers `order` to match list position.
    pub fn normalize_order(&mut self) {
        self.renumber();
    }

    /// Removes the entry at `index` (break or field) and renumbers.
    pub(crate) fn remove_at(&mut self, index: usize) -> FieldDescriptor {
        let removed = self.fields.remove(index);
        self.renumber();
        removed
    }

    /// Replaces the entry at `index`, keeping its position.
    pub(crate) fn replace_at(&mut self, index: usize, mut descriptor: FieldDescriptor) {
        descriptor.order = index as u32 + 1;
        self.fields[index] = descriptor;
    }

    pub(crate) fn not_found(&self, field_name: &str) -> FormError {
        FormError::FieldNotFound {
            entity_type: self.entity_type.clone(),
            field: field_name.to_string(),
        }
    }

    pub(crate) fn duplicate(&self, field_name: &str) -> FormError {
        FormError::DuplicateField {
            entity_type: self.entity_type.clone(),
            field: field_name.to_string(),
        }
    }

    fn renumber(&mut self) {
        for (index, field) in self.fields.iter_mut().enumerate() {
            field.order = index as u32 + 1;
        }
    }
}
