//! Integrity checks for loaded schemas.

use std::collections::HashSet;

use crate::error::FormError;

use super::binding::FetchBinding;
use super::schema::Schema;

/// Collects every integrity problem in the schema.
///
/// # Arguments
/// * `schema` - Schema to check
///
/// # Returns
/// All problems found; empty when the schema is consistent.
pub fn check_integrity(schema: &Schema) -> Vec<FormError> {
    let mut problems = Vec::new();
    let mut seen = HashSet::new();

    for (position, field) in schema.fields().iter().enumerate() {
        if field.order != position as u32 + 1 {
            problems.push(FormError::Validation {
                field: field.field_name.clone(),
                message: format!(
                    "order {} does not match position {}",
                    field.order,
                    position + 1
                ),
            });
        }
        if field.is_break() {
            continue;
        }
        if field.field_name.is_empty() {
            problems.push(FormError::MissingFieldName {
                entity_type: schema.entity_type.clone(),
                position,
            });
        } else if !seen.insert(field.field_name.as_str()) {
            problems.push(schema.duplicate(&field.field_name));
        }
        if let Err(e) = FetchBinding::resolve(field, schema) {
            problems.push(e);
        }
    }

    problems
}
