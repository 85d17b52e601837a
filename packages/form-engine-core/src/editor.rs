//! Field type dispatch.
//!
//! Maps a descriptor to the editor the renderer mounts against the form state.
//! Dispatch depends on `(field_type, options)`: a `Text` field whose options
//! are exactly `"Phone"` gets the phone editor.

use crate::schema::{FieldDescriptor, FieldType, PHONE_OPTION};
use serde_json::Value;

/// Editor kinds the renderer knows how to mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorKind {
    Text,
    Phone,
    LongText,
    Checkbox,
    Select,
    Date,
    DateTime,
    Integer,
    Link,
    FileAttachment,
    /// Column or layout break; nothing to edit
    Structural,
}

impl EditorKind {
    /// Returns true if the editor writes a value into the form state.
    pub fn is_editable(self) -> bool {
        self != EditorKind::Structural
    }
}

/// Resolves the editor for a descriptor. Never fails; unknown types get `Text`.
pub fn resolve_editor(descriptor: &FieldDescriptor) -> EditorKind {
    match &descriptor.field_type {
        FieldType::Text if descriptor.options.as_deref() == Some(PHONE_OPTION) => {
            EditorKind::Phone
        }
        FieldType::Text => EditorKind::Text,
        FieldType::LongText => EditorKind::LongText,
        FieldType::Checkbox => EditorKind::Checkbox,
        FieldType::Select => EditorKind::Select,
        FieldType::Date => EditorKind::Date,
        FieldType::DateTime => EditorKind::DateTime,
        FieldType::Integer => EditorKind::Integer,
        FieldType::Link => EditorKind::Link,
        FieldType::FileAttachment => EditorKind::FileAttachment,
        FieldType::LayoutBreak | FieldType::ColumnBreak => EditorKind::Structural,
        FieldType::Unknown(tag) => {
            tracing::debug!(
                "No editor for field type '{}' on '{}', using Text",
                tag,
                descriptor.field_name
            );
            EditorKind::Text
        }
    }
}

/// Everything the renderer needs to mount an editor for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorContract {
    pub field_name: String,
    pub label: String,
    pub kind: EditorKind,
    pub required: bool,
    /// Read-only fields are displayed but not editable by the user
    pub read_only: bool,
    /// Choices for `Select` editors
    pub choices: Vec<String>,
    /// Target entity type for `Link` editors
    pub link_target: Option<String>,
    /// Initial value for new documents
    pub default_value: Option<Value>,
}

/// Builds the full editor contract for a descriptor.
pub fn editor_contract(descriptor: &FieldDescriptor) -> EditorContract {
    let kind = resolve_editor(descriptor);
    EditorContract {
        field_name: descriptor.field_name.clone(),
        label: descriptor.label.clone(),
        kind,
        required: descriptor.required,
        read_only: descriptor.read_only,
        choices: match kind {
            EditorKind::Select => descriptor.choices(),
            _ => Vec::new(),
        },
        link_target: descriptor.link_target().map(str::to_string),
        default_value: descriptor.default_json(),
    }
}
