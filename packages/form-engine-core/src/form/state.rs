//! Form state container.
//!
//! `set_value` is the single write path for editors and the dependency
//! resolver. The container never talks to the network; commits to watched
//! link fields are queued as [`SourceCommit`]s for the resolver to drain.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;
use serde_json::Value;

use crate::config::EngineConfig;
use crate::schema::{DependencyIndex, Schema};

use super::value::{check_value, is_empty_value};

/// A commit to a link field that other fields fetch from.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceCommit {
    pub field_name: String,
    pub value: Value,
}

/// Immutable copy of the form values, handed to the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FormSnapshot {
    values: BTreeMap<String, Value>,
}

impl FormSnapshot {
    pub fn get(&self, field_name: &str) -> Option<&Value> {
        self.values.get(field_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Snapshot as a JSON object.
    pub fn to_json(&self) -> Value {
        Value::Object(self.values.clone().into_iter().collect())
    }
}

/// Values, dirty set and field errors for one editing session.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    values: BTreeMap<String, Value>,
    dirty: BTreeSet<String>,
    errors: BTreeMap<String, String>,
    /// Link fields with dependents
    watched: HashSet<String>,
    pending: Vec<SourceCommit>,
    config: EngineConfig,
}

impl FormState {
    /// Creates an empty state that queues commits to the given link fields.
    pub fn new<I, S>(watched: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            watched: watched.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Creates a state for a new document: watches the index's sources and
    /// seeds default values without marking them dirty.
    pub fn for_schema(schema: &Schema, index: &DependencyIndex) -> Self {
        let mut state = Self::new(index.sources());
        for field in schema.data_fields() {
            if let Some(default) = field.default_json() {
                state.values.insert(field.field_name.clone(), default);
            }
        }
        state
    }

    /// Uses the given configuration for value format checks.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Writes a value, marks it dirty and clears its error.
    ///
    /// Commits to watched link fields are queued for the dependency resolver.
    pub fn set_value(&mut self, field_name: impl Into<String>, value: Value) {
        let field_name = field_name.into();
        self.errors.remove(&field_name);
        self.dirty.insert(field_name.clone());
        if self.watched.contains(&field_name) {
            self.pending.push(SourceCommit {
                field_name: field_name.clone(),
                value: value.clone(),
            });
        }
        self.values.insert(field_name, value);
    }

    pub fn value(&self, field_name: &str) -> Option<&Value> {
        self.values.get(field_name)
    }

    /// Returns true if the field is missing or holds an empty value.
    pub fn is_empty(&self, field_name: &str) -> bool {
        self.values.get(field_name).map_or(true, is_empty_value)
    }

    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn is_field_dirty(&self, field_name: &str) -> bool {
        self.dirty.contains(field_name)
    }

    pub fn dirty_fields(&self) -> &BTreeSet<String> {
        &self.dirty
    }

    pub fn error(&self, field_name: &str) -> Option<&str> {
        self.errors.get(field_name).map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    /// Records a field-scoped error. Cleared by the next `set_value` on the field.
    pub fn set_error(&mut self, field_name: impl Into<String>, message: impl Into<String>) {
        self.errors.insert(field_name.into(), message.into());
    }

    /// Returns true if the field is a watched link source.
    pub fn watches(&self, field_name: &str) -> bool {
        self.watched.contains(field_name)
    }

    /// Drains queued link-source commits in the order they were made.
    pub fn take_triggers(&mut self) -> Vec<SourceCommit> {
        std::mem::take(&mut self.pending)
    }

    pub fn has_pending_triggers(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Checks required fields and value formats.
    ///
    /// Errors recorded earlier (e.g. a link target that was not found) stay
    /// until their field is written again.
    ///
    /// # Returns
    /// All current field errors; empty if the form is valid.
    pub fn validate(&mut self, schema: &Schema) -> BTreeMap<String, String> {
        for field in schema.data_fields() {
            let value = self.values.get(&field.field_name);
            let empty = value.map_or(true, is_empty_value);
            let message = if field.required && empty {
                let label = if field.label.is_empty() {
                    &field.field_name
                } else {
                    &field.label
                };
                Some(format!("{} is required", label))
            } else {
                value.and_then(|v| check_value(field, v, &self.config))
            };
            if let Some(message) = message {
                self.errors.insert(field.field_name.clone(), message);
            }
        }
        self.errors.clone()
    }

    /// Immutable copy of the current values. Dirty flags are left alone.
    pub fn commit(&self) -> FormSnapshot {
        FormSnapshot {
            values: self.values.clone(),
        }
    }

    /// Clears the dirty set after the caller confirmed a successful save.
    pub fn mark_clean(&mut self) {
        self.dirty.clear();
    }

    /// Replaces all values and clears dirty flags, errors and queued triggers.
    pub fn reset<I>(&mut self, new_values: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        self.values = new_values.into_iter().collect();
        self.dirty.clear();
        self.errors.clear();
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldDescriptor, FieldType};
    use serde_json::json;

    fn schema() -> Schema {
        Schema::with_fields(
            "Invoice",
            vec![
                FieldDescriptor::new("customer", "Customer", FieldType::Link)
                    .with_options("Customer")
                    .required(),
                FieldDescriptor::new("city", "City", FieldType::Text).with_fetch("customer.city", true),
                FieldDescriptor::new("due", "Due Date", FieldType::Date),
                FieldDescriptor::new("status", "Status", FieldType::Select)
                    .with_options("Draft\nPaid")
                    .with_default("Draft"),
            ],
        )
        .unwrap()
    }

    fn state() -> FormState {
        let schema = schema();
        FormState::for_schema(&schema, &DependencyIndex::build(&schema))
    }

    #[test]
    fn test_defaults_are_clean() {
        let state = state();
        assert_eq!(state.value("status"), Some(&json!("Draft")));
        assert!(!state.is_dirty());
    }

    #[test]
    fn test_set_value_marks_dirty_and_clears_error() {
        let mut state = state();
        state.set_error("due", "bad");
        state.set_value("due", json!("2024-05-01"));
        assert!(state.is_field_dirty("due"));
        assert_eq!(state.error("due"), None);
        assert!(!state.has_pending_triggers());
    }

    #[test]
    fn test_watched_commits_are_queued_in_order() {
        let mut state = state();
        state.set_value("customer", json!("A"));
        state.set_value("city", json!("x"));
        state.set_value("customer", json!("B"));
        let triggers = state.take_triggers();
        assert_eq!(triggers.len(), 2);
        assert_eq!(triggers[0].value, json!("A"));
        assert_eq!(triggers[1].value, json!("B"));
        assert!(state.take_triggers().is_empty());
    }

    #[test]
    fn test_validate_required_and_formats() {
        let schema = schema();
        let mut state = state();
        state.set_value("due", json!("01/05/2024"));
        let errors = state.validate(&schema);
        assert_eq!(errors.get("customer").map(String::as_str), Some("Customer is required"));
        assert!(errors.contains_key("due"));
        assert_eq!(errors.len(), 2);

        state.set_value("customer", json!("CUST-1"));
        state.set_value("due", json!("2024-05-01"));
        assert!(state.validate(&schema).is_empty());
    }

    #[test]
    fn test_validate_uses_configured_format() {
        let schema = schema();
        let config = EngineConfig {
            date_format: "%d/%m/%Y".to_string(),
            ..Default::default()
        };
        let mut state = FormState::new(Vec::<String>::new()).with_config(config);
        state.set_value("customer", json!("CUST-1"));
        state.set_value("due", json!("01/05/2024"));
        assert!(state.validate(&schema).is_empty());
    }

    #[test]
    fn test_commit_is_a_snapshot() {
        let mut state = state();
        state.set_value("city", json!("Pune"));
        let snapshot = state.commit();
        state.set_value("city", json!("Delhi"));
        assert_eq!(snapshot.get("city"), Some(&json!("Pune")));
        assert!(state.is_field_dirty("city"));
        assert_eq!(snapshot.to_json()["status"], json!("Draft"));
    }

    #[test]
    fn test_reset_and_mark_clean() {
        let mut state = state();
        state.set_value("customer", json!("A"));
        state.set_error("customer", "not found");
        state.mark_clean();
        assert!(!state.is_dirty());
        assert!(state.has_pending_triggers());

        state.reset(vec![("city".to_string(), json!("Mumbai"))]);
        assert_eq!(state.value("city"), Some(&json!("Mumbai")));
        assert_eq!(state.value("customer"), None);
        assert!(state.errors().is_empty());
        assert!(!state.has_pending_triggers());
    }
}
