//! Builder session workflows.

use form_engine_core::builder::{Builder, DropTarget};
use form_engine_core::layout::split_into_columns;
use form_engine_core::schema::{FieldDescriptor, FieldType, Schema};

fn field(name: &str) -> FieldDescriptor {
    FieldDescriptor::new(name, name, FieldType::Text)
}

fn shape(schema: &Schema) -> Vec<Vec<String>> {
    split_into_columns(schema)
        .iter()
        .map(|c| c.field_names().into_iter().map(str::to_string).collect())
        .collect()
}

/// Three-column form built from scratch, a field dragged into the empty
/// middle column, the trailing column dropped again.
#[test]
fn test_build_three_column_form() {
    let mut builder = Builder::new(Schema::new("Lead"));

    let first = builder.add_field(FieldType::Text, None).unwrap();
    builder.begin_edit(&first).unwrap();
    builder.draft_mut().unwrap().label = "Lead Name".to_string();
    builder.draft_mut().unwrap().required = true;
    assert_eq!(builder.save_draft().unwrap(), "lead_name");

    let second = builder.add_field(FieldType::Link, None).unwrap();
    builder.begin_edit(&second).unwrap();
    {
        let draft = builder.draft_mut().unwrap();
        draft.label = "Company".to_string();
        draft.options = Some("Company".to_string());
    }
    assert_eq!(builder.save_draft().unwrap(), "company");

    builder.add_column_break();
    builder.add_column_break();
    assert_eq!(
        shape(builder.schema()),
        vec![vec!["lead_name".to_string(), "company".to_string()], vec![], vec![]]
    );

    builder.reorder("company", DropTarget::Column(1)).unwrap();
    assert_eq!(
        shape(builder.schema()),
        vec![vec!["lead_name".to_string()], vec!["company".to_string()], vec![]]
    );

    builder.remove_column_break(2).unwrap();
    let schema = builder.into_schema();
    assert_eq!(shape(&schema).len(), 2);
    assert!(schema.check_integrity().is_empty());
    let orders: Vec<u32> = schema.fields().iter().map(|f| f.order).collect();
    assert_eq!(orders, vec![1, 2, 3]);
}

#[test]
fn test_failed_operations_keep_schema_intact() {
    let schema = Schema::with_fields(
        "Task",
        vec![field("subject"), FieldDescriptor::column_break(), field("owner")],
    )
    .unwrap();
    let mut builder = Builder::new(schema.clone());

    assert!(builder.remove_field("missing").is_err());
    assert!(builder.reorder("missing", DropTarget::Column(0)).is_err());
    assert!(builder.reorder("owner", DropTarget::Column(7)).is_err());
    assert!(builder.remove_column_break(3).is_err());
    assert!(builder.begin_edit("missing").is_err());

    assert_eq!(builder.schema(), &schema);
}
