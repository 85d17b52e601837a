//! Schema JSON produced by external tooling.

use anyhow::Context;
use form_engine_core::editor::{editor_contract, resolve_editor, EditorKind};
use form_engine_core::layout::split_into_columns;
use form_engine_core::schema::{DependencyIndex, Schema};

const CUSTOMER_FORM: &str = r#"{
  "entityType": "Address",
  "fields": [
    {"fieldName": "customer", "label": "Customer", "fieldType": "Link", "options": "Customer", "required": true, "order": 1},
    {"fieldName": "phone", "label": "Phone", "fieldType": "Text", "options": "Phone", "fetchBinding": "customer.mobile_no", "order": 2},
    {"fieldType": "ColumnBreak", "order": 3},
    {"fieldName": "city", "label": "City", "fieldType": "Text", "fetchBinding": "customer.city", "fetchIfEmptyOnly": true, "order": 4},
    {"fieldName": "type", "label": "Address Type", "fieldType": "Select", "options": "Billing\nShipping", "order": 5},
    {"fieldName": "map", "label": "Map", "fieldType": "Geolocation", "order": 6},
    {"fieldName": "proof", "label": "Proof", "fieldType": "FileAttachment", "order": 7}
  ]
}"#;

#[test]
fn test_load_dispatch_and_layout() -> anyhow::Result<()> {
    let schema = Schema::from_json(CUSTOMER_FORM)?;
    assert!(schema.check_integrity().is_empty());

    let kinds: Vec<EditorKind> = schema.fields().iter().map(resolve_editor).collect();
    assert_eq!(
        kinds,
        vec![
            EditorKind::Link,
            EditorKind::Phone,
            EditorKind::Structural,
            EditorKind::Text,
            EditorKind::Select,
            EditorKind::Text,
            EditorKind::FileAttachment,
        ]
    );

    let columns = split_into_columns(&schema);
    assert_eq!(columns.len(), 2);
    assert_eq!(columns[1].field_names(), vec!["city", "type", "map", "proof"]);

    let contract = editor_contract(schema.get("type").context("type field missing")?);
    assert_eq!(contract.choices, vec!["Billing", "Shipping"]);

    let index = DependencyIndex::build(&schema);
    assert_eq!(index.dependents("customer").len(), 2);
    Ok(())
}

#[test]
fn test_round_trip_preserves_unknown_tags() -> anyhow::Result<()> {
    let schema = Schema::from_json(CUSTOMER_FORM)?;
    let reparsed = Schema::from_json(&schema.to_json()?)?;
    assert_eq!(reparsed, schema);
    let map = reparsed.get("map").context("map field missing")?;
    assert_eq!(map.field_type.as_str(), "Geolocation");
    Ok(())
}
