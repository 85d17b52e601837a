//! Value emptiness and per-type format checks.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::config::EngineConfig;
use crate::schema::{FieldDescriptor, FieldType};

/// Returns true for null, blank strings, empty arrays and empty objects.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Checks a non-empty value against its field type.
///
/// # Returns
/// `Some(message)` describing the problem, `None` if the value is acceptable.
pub fn check_value(descriptor: &FieldDescriptor, value: &Value, config: &EngineConfig) -> Option<String> {
    if is_empty_value(value) {
        return None;
    }
    match &descriptor.field_type {
        FieldType::Date => {
            let Some(text) = value.as_str() else {
                return Some(format!("'{}' is not a valid date", display(value)));
            };
            NaiveDate::parse_from_str(text.trim(), &config.date_format)
                .err()
                .map(|_| format!("'{}' is not a valid date (expected {})", text, config.date_format))
        }
        FieldType::DateTime => {
            let Some(text) = value.as_str() else {
                return Some(format!("'{}' is not a valid date and time", display(value)));
            };
            NaiveDateTime::parse_from_str(text.trim(), &config.datetime_format)
                .err()
                .map(|_| {
                    format!(
                        "'{}' is not a valid date and time (expected {})",
                        text, config.datetime_format
                    )
                })
        }
        FieldType::Integer => match value {
            Value::Number(n) if n.is_i64() => None,
            Value::String(s) if s.trim().parse::<i64>().is_ok() => None,
            other => Some(format!("'{}' is not a whole number", display(other))),
        },
        FieldType::Checkbox => match value {
            Value::Bool(_) => None,
            Value::Number(n) if n.as_u64().is_some_and(|n| n <= 1) => None,
            Value::String(s) if matches!(s.trim(), "0" | "1" | "true" | "false") => None,
            other => Some(format!("'{}' is not a checkbox value", display(other))),
        },
        FieldType::Select => {
            let choices = descriptor.choices();
            let text = display(value);
            if choices.is_empty() || choices.iter().any(|c| *c == text) {
                None
            } else {
                Some(format!("'{}' is not one of {}", text, choices.join(", ")))
            }
        }
        _ => None,
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
