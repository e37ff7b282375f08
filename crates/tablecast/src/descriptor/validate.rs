//! Structural validation of parsed descriptors.

use std::collections::HashSet;

use regex::Regex;
use serde_json::Value;

use crate::error::ValidationError;
use crate::field::FieldType;

use super::SchemaDescriptor;

/// Check a parsed descriptor's structure.
///
/// Returns every structural fault found; an empty list means the descriptor
/// can be turned into a `Schema`.
pub fn validate_descriptor(descriptor: &SchemaDescriptor) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if descriptor.fields.is_empty() {
        errors.push(ValidationError::schema("descriptor declares no fields"));
    }

    let mut seen = HashSet::new();
    for field in &descriptor.fields {
        if field.name.is_empty() {
            errors.push(ValidationError::schema("field with empty name"));
        } else if !seen.insert(field.name.as_str()) {
            errors.push(ValidationError::schema(format!(
                "duplicate field name '{}'",
                field.name
            )));
        }

        if FieldType::from_tag(&field.field_type).is_none() {
            errors.push(ValidationError::schema(format!(
                "field '{}' has unknown type '{}'",
                field.name, field.field_type
            )));
        }

        let constraints = &field.constraints;
        if let Some(min) = constraints.min_length {
            if min < 0 {
                errors.push(ValidationError::schema(format!(
                    "field '{}' has negative minLength",
                    field.name
                )));
            }
        }
        if let Some(max) = constraints.max_length {
            if max < 0 {
                errors.push(ValidationError::schema(format!(
                    "field '{}' has negative maxLength",
                    field.name
                )));
            }
        }
        if let Some(pattern) = &constraints.pattern {
            if Regex::new(&format!("^(?:{pattern})$")).is_err() {
                errors.push(ValidationError::schema(format!(
                    "field '{}' has invalid pattern '{}'",
                    field.name, pattern
                )));
            }
        }
        if let Some(members) = &constraints.enum_values {
            if members.is_empty() {
                errors.push(ValidationError::schema(format!(
                    "field '{}' has an empty enum",
                    field.name
                )));
            }
        }
    }

    if let Some(primary_key) = &descriptor.primary_key {
        if !matches!(primary_key, Value::String(_) | Value::Array(_)) {
            errors.push(ValidationError::schema(
                "primaryKey must be a field name or a list of field names",
            ));
        }
        for name in descriptor.primary_key_names() {
            if !descriptor.fields.iter().any(|f| f.name == name) {
                errors.push(ValidationError::schema(format!(
                    "primaryKey references undeclared field '{name}'"
                )));
            }
        }
    }

    errors
}
