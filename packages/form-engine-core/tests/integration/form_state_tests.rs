//! Form state over a loaded schema.

use form_engine_core::form::FormState;
use form_engine_core::schema::{DependencyIndex, Schema};
use serde_json::json;

const TASK_FORM: &str = r#"{
  "entityType": "Task",
  "fields": [
    {"fieldName": "subject", "label": "Subject", "fieldType": "Text", "required": true, "order": 1},
    {"fieldName": "project", "label": "Project", "fieldType": "Link", "options": "Project", "order": 2},
    {"fieldName": "project_owner", "label": "Owner", "fieldType": "Text", "fetchBinding": "project.owner", "readOnly": true, "order": 3},
    {"fieldName": "priority", "label": "Priority", "fieldType": "Select", "options": "Low\nHigh", "defaultValue": "Low", "order": 4},
    {"fieldName": "estimate", "label": "Estimate", "fieldType": "Integer", "order": 5}
  ]
}"#;

#[test]
fn test_edit_validate_commit() {
    let schema = Schema::from_json(TASK_FORM).unwrap();
    let index = DependencyIndex::build(&schema);
    let mut state = FormState::for_schema(&schema, &index);

    assert!(state.watches("project"));
    assert!(!state.is_dirty());

    state.set_value("estimate", json!("three"));
    let errors = state.validate(&schema);
    assert_eq!(errors.len(), 2);
    assert!(errors.contains_key("subject"));
    assert!(errors.contains_key("estimate"));

    state.set_value("subject", json!("Write docs"));
    state.set_value("estimate", json!("3"));
    state.set_value("project", json!("PROJ-0001"));
    assert!(state.validate(&schema).is_empty());
    assert_eq!(state.take_triggers().len(), 1);

    let snapshot = state.commit();
    assert_eq!(
        snapshot.to_json(),
        json!({"subject": "Write docs", "estimate": "3", "project": "PROJ-0001", "priority": "Low"})
    );
    assert!(state.is_dirty());
    state.mark_clean();
    assert!(!state.is_dirty());
}
