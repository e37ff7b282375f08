//! Error types for the tablecast library.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Main error type for tablecast operations.
#[derive(Debug, Error)]
pub enum CastError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Descriptor source could not be fetched or parsed.
    #[error("failed to load descriptor: {0}")]
    Load(String),

    /// Descriptor failed structural validation.
    #[error("descriptor validation failed with {} error(s)", .0.len())]
    Descriptor(Vec<ValidationError>),

    /// One or more values failed casting or constraint checks.
    #[error("validation failed with {} error(s)", .0.len())]
    Validation(Vec<ValidationError>),
}

impl CastError {
    /// The validation errors carried by this error, if any.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            CastError::Descriptor(errors) | CastError::Validation(errors) => errors,
            _ => &[],
        }
    }

    /// Flatten this error into a list of validation errors.
    ///
    /// Load, IO, and parse failures become a single `LoadFailed` record so
    /// the `validate_*` family always returns a non-empty list on failure.
    pub fn into_validation_errors(self) -> Vec<ValidationError> {
        match self {
            CastError::Descriptor(errors) | CastError::Validation(errors) => errors,
            other => vec![ValidationError::load_failed(other.to_string())],
        }
    }
}

/// Result type alias for tablecast operations.
pub type Result<T> = std::result::Result<T, CastError>;

/// Category of a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Descriptor source unreadable or unparsable.
    LoadFailed,
    /// Descriptor structurally invalid.
    SchemaValidationFailed,
    /// A value failed required/parse/constraint checks.
    FieldValidation,
}

/// A single structured validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Error category.
    pub kind: ErrorKind,
    /// Affected field name, when field-scoped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// The offending raw value, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Human-readable description.
    pub message: String,
}

impl ValidationError {
    /// A descriptor-source load failure.
    pub fn load_failed(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::LoadFailed,
            field: None,
            value: None,
            message: message.into(),
        }
    }

    /// A structural descriptor failure.
    pub fn schema(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::SchemaValidationFailed,
            field: None,
            value: None,
            message: message.into(),
        }
    }

    /// A field-scoped value failure.
    pub fn field(
        name: impl Into<String>,
        value: Option<Value>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: ErrorKind::FieldValidation,
            field: Some(name.into()),
            value,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_error_shape() {
        let err = ValidationError::field("age", Some(json!("200")), "value is above maximum");
        assert_eq!(err.kind, ErrorKind::FieldValidation);
        assert_eq!(err.field.as_deref(), Some("age"));
        assert_eq!(err.value, Some(json!("200")));
    }

    #[test]
    fn test_into_validation_errors_wraps_load_failures() {
        let err = CastError::Load("bad json".to_string());
        let errors = err.into_validation_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::LoadFailed);
    }

    #[test]
    fn test_validation_errors_accessor() {
        let err = CastError::Validation(vec![ValidationError::field("x", None, "bad")]);
        assert_eq!(err.validation_errors().len(), 1);
        assert!(CastError::Load("x".into()).validation_errors().is_empty());
    }
}
