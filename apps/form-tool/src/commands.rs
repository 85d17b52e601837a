//! Report rendering for the CLI commands.

use std::fmt::Write;

use form_engine_core::editor::{editor_contract, EditorKind};
use form_engine_core::error::FormError;
use form_engine_core::layout::split_into_columns;
use form_engine_core::schema::Schema;

pub fn validate(schema: &Schema) -> Vec<FormError> {
    schema.check_integrity()
}

pub fn render_columns(schema: &Schema) -> String {
    let mut out = String::new();
    for column in split_into_columns(schema) {
        if column.is_empty() {
            let _ = writeln!(out, "column {}: (empty)", column.index);
        } else {
            let _ = writeln!(out, "column {}: {}", column.index, column.field_names().join(", "));
        }
    }
    out
}

pub fn render_editors(schema: &Schema) -> String {
    let mut out = String::new();
    for field in schema.data_fields() {
        let contract = editor_contract(field);
        let mut flags = Vec::new();
        if contract.required {
            flags.push("required");
        }
        if contract.read_only {
            flags.push("read-only");
        }
        let _ = write!(out, "{} [{}] -> {:?}", field.order, field.field_name, contract.kind);
        if contract.kind == EditorKind::Link {
            if let Some(target) = &contract.link_target {
                let _ = write!(out, " ({})", target);
            }
        }
        if !flags.is_empty() {
            let _ = write!(out, " {}", flags.join(" "));
        }
        out.push('\n');
    }
    out
}
