//! Form engine error types.

use thiserror::Error;

/// Error category as surfaced to the editing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Structural schema violation (duplicate name, bad binding)
    Schema,
    /// Lookup of a field or column that does not exist
    NotFound,
    /// Field-scoped value problem
    Validation,
    /// Failure while resolving a fetch binding
    DependencyFetch,
    /// Configuration could not be loaded
    Config,
}

/// Form engine operation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    /// Field name already used by another non-break field
    #[error("Field '{field}' already exists in schema '{entity_type}'")]
    DuplicateField { entity_type: String, field: String },

    /// Non-break field without a name
    #[error("Field at position {position} in schema '{entity_type}' has no name")]
    MissingFieldName { entity_type: String, position: usize },

    /// Field not found in schema
    #[error("Field '{field}' not found in schema '{entity_type}'")]
    FieldNotFound { entity_type: String, field: String },

    /// Column index outside the current layout
    #[error("Column {index} not found (layout has {count} columns)")]
    ColumnNotFound { index: usize, count: usize },

    /// Fetch binding could not be parsed or resolved against the schema
    #[error("Invalid fetch binding '{binding}' on field '{field}': {reason}")]
    InvalidBinding {
        field: String,
        binding: String,
        reason: String,
    },

    /// Field value failed validation
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    /// Dependency fetch failed (network, timeout)
    #[error("Could not fetch linked values: {0}")]
    DependencyFetch(String),

    /// Schema source could not provide a schema
    #[error("Schema for '{entity_type}' unavailable: {reason}")]
    SchemaUnavailable { entity_type: String, reason: String },

    /// Builder save without a matching open edit
    #[error("Field '{0}' is not open for editing")]
    InvalidEditState(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl FormError {
    /// Returns the error category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FormError::DuplicateField { .. }
            | FormError::MissingFieldName { .. }
            | FormError::InvalidBinding { .. }
            | FormError::InvalidEditState(_)
            | FormError::Serialization(_) => ErrorKind::Schema,
            FormError::FieldNotFound { .. } | FormError::ColumnNotFound { .. } => {
                ErrorKind::NotFound
            }
            FormError::Validation { .. } => ErrorKind::Validation,
            FormError::DependencyFetch(_) | FormError::SchemaUnavailable { .. } => {
                ErrorKind::DependencyFetch
            }
            FormError::Config(_) => ErrorKind::Config,
        }
    }

    /// Returns true if the caller may ignore the error and carry on.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::NotFound | ErrorKind::Validation | ErrorKind::DependencyFetch
        )
    }
}

impl From<serde_json::Error> for FormError {
    fn from(err: serde_json::Error) -> Self {
        FormError::Serialization(err.to_string())
    }
}

/// Result type for form engine operations.
pub type Result<T> = std::result::Result<T, FormError>;
