//! Field descriptor within a form schema.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Options sentinel that re-routes a `Text` field to the phone editor.
pub const PHONE_OPTION: &str = "Phone";

/// Field type tag.
///
/// Serialized as its exact tag string. Tags this engine does not know are kept
/// as `Unknown` so a schema written by newer tooling still round-trips.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Text,
    LongText,
    Checkbox,
    Select,
    Date,
    DateTime,
    Integer,
    Link,
    FileAttachment,
    LayoutBreak,
    ColumnBreak,
    Unknown(String),
}

impl FieldType {
    /// Returns the wire tag for this type.
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Text => "Text",
            FieldType::LongText => "LongText",
            FieldType::Checkbox => "Checkbox",
            FieldType::Select => "Select",
            FieldType::Date => "Date",
            FieldType::DateTime => "DateTime",
            FieldType::Integer => "Integer",
            FieldType::Link => "Link",
            FieldType::FileAttachment => "FileAttachment",
            FieldType::LayoutBreak => "LayoutBreak",
            FieldType::ColumnBreak => "ColumnBreak",
            FieldType::Unknown(tag) => tag,
        }
    }

    /// Returns true for structural markers that are not editable fields.
    pub fn is_break(&self) -> bool {
        matches!(self, FieldType::LayoutBreak | FieldType::ColumnBreak)
    }
}

impl From<String> for FieldType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "Text" => FieldType::Text,
            "LongText" => FieldType::LongText,
            "Checkbox" => FieldType::Checkbox,
            "Select" => FieldType::Select,
            "Date" => FieldType::Date,
            "DateTime" => FieldType::DateTime,
            "Integer" => FieldType::Integer,
            "Link" => FieldType::Link,
            "FileAttachment" => FieldType::FileAttachment,
            "LayoutBreak" => FieldType::LayoutBreak,
            "ColumnBreak" => FieldType::ColumnBreak,
            _ => FieldType::Unknown(tag),
        }
    }
}

impl From<&str> for FieldType {
    fn from(tag: &str) -> Self {
        FieldType::from(tag.to_string())
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Unknown(tag) => tag,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One schema entry describing a single form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Unique key within the schema (may be empty for break markers)
    #[serde(default)]
    pub field_name: String,
    /// Display label
    #[serde(default)]
    pub label: String,
    /// Field type tag
    pub field_type: FieldType,
    /// Choices for `Select`, target entity for `Link`, editor sentinel for `Text`
    #[serde(default)]
    pub options: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub default_value: Option<String>,
    /// `<linkFieldName>.<remoteFieldName>`
    #[serde(default)]
    pub fetch_binding: Option<String>,
    /// Only fetch when the current value is empty
    #[serde(default)]
    pub fetch_if_empty_only: bool,
    /// 1-based position within the schema
    #[serde(default)]
    pub order: u32,
}

impl FieldDescriptor {
    /// Creates a field with the given name, label and type. Flags default to off.
    pub fn new(field_name: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            field_name: field_name.into(),
            label: label.into(),
            field_type,
            options: None,
            required: false,
            read_only: false,
            default_value: None,
            fetch_binding: None,
            fetch_if_empty_only: false,
            order: 0,
        }
    }

    /// Creates an unnamed column break marker.
    pub fn column_break() -> Self {
        Self::new("", "", FieldType::ColumnBreak)
    }

    /// Creates an unnamed layout (section) break marker.
    pub fn layout_break() -> Self {
        Self::new("", "", FieldType::LayoutBreak)
    }

    /// Sets `options`.
    pub fn with_options(mut self, options: impl Into<String>) -> Self {
        self.options = Some(options.into());
        self
    }

    /// Sets `fetch_binding` and `fetch_if_empty_only`.
    pub fn with_fetch(mut self, binding: impl Into<String>, if_empty_only: bool) -> Self {
        self.fetch_binding = Some(binding.into());
        self.fetch_if_empty_only = if_empty_only;
        self
    }

    /// Sets `required`.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets `read_only`.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Sets `default_value`.
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Returns true for column/layout break markers.
    pub fn is_break(&self) -> bool {
        self.field_type.is_break()
    }

    /// Returns true for column break markers.
    pub fn is_column_break(&self) -> bool {
        self.field_type == FieldType::ColumnBreak
    }

    /// Select choices: `options` split on newlines, trimmed, blanks dropped.
    pub fn choices(&self) -> Vec<String> {
        self.options
            .as_deref()
            .unwrap_or_default()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Target entity type of a `Link` field.
    pub fn link_target(&self) -> Option<&str> {
        match self.field_type {
            FieldType::Link => self
                .options
                .as_deref()
                .map(str::trim)
                .filter(|target| !target.is_empty()),
            _ => None,
        }
    }

    /// Default value as a form value, if any.
    pub fn default_json(&self) -> Option<Value> {
        self.default_value.clone().map(Value::String)
    }
}
