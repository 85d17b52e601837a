//! Fetch-binding candidates offered by the builder.

use form_engine_core::error::FormError;
use form_engine_core::schema::{FieldType, Schema};

use crate::collaborator::SchemaSource;
use crate::Result;

/// Lists `<link>.<remote>` bindings a field could use with `link_field`.
///
/// Loads the link target's schema from the source; every non-break field of
/// the target is a candidate.
pub async fn binding_candidates(
    source: &dyn SchemaSource,
    schema: &Schema,
    link_field: &str,
) -> Result<Vec<String>> {
    let field = schema
        .get(link_field)
        .ok_or_else(|| FormError::FieldNotFound {
            entity_type: schema.entity_type.clone(),
            field: link_field.to_string(),
        })?;
    let target = match (&field.field_type, field.link_target()) {
        (FieldType::Link, Some(target)) => target,
        _ => {
            return Err(FormError::Validation {
                field: link_field.to_string(),
                message: "not a Link field with a target entity type".to_string(),
            })
        }
    };

    let target_schema = source
        .get_schema(target)
        .await
        .map_err(|e| FormError::SchemaUnavailable {
            entity_type: target.to_string(),
            reason: e.to_string(),
        })?;

    Ok(target_schema
        .data_fields()
        .map(|remote| format!("{}.{}", link_field, remote.field_name))
        .collect())
}
