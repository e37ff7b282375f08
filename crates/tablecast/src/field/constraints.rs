//! Shared constraint checking applied after a successful cast.

use std::cmp::Ordering;

use serde_json::Value;

use crate::error::ValidationError;
use crate::value::CastValue;

use super::Field;

/// Check every declared constraint against a cast value.
///
/// Each check is evaluated independently and all violations are collected;
/// the checker itself never fails. Enum members and range bounds are cast
/// through the field with constraints skipped, and members or bounds that
/// do not cast are ignored.
pub fn check_constraints(field: &Field, native: &CastValue, raw: &Value) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let constraints = field.constraints();

    let members: Vec<CastValue> = field
        .enum_values()
        .iter()
        .filter_map(|member| field.cast_value_impl(member, true).ok())
        .collect();
    if !members.is_empty() && !members.contains(native) {
        errors.push(violation(field, raw, "value not in enum"));
    }

    // pattern applies to the raw string form only
    if let (Some(pattern), Value::String(s)) = (field.pattern(), raw) {
        if !pattern.is_match(s) {
            errors.push(violation(field, raw, "value does not match pattern"));
        }
    }

    if let Some(minimum) = &constraints.minimum {
        if let Ok(bound) = field.cast_value_impl(minimum, true) {
            if native.partial_cmp(&bound) == Some(Ordering::Less) {
                errors.push(violation(field, raw, "value is below minimum"));
            }
        }
    }

    if let Some(maximum) = &constraints.maximum {
        if let Ok(bound) = field.cast_value_impl(maximum, true) {
            if native.partial_cmp(&bound) == Some(Ordering::Greater) {
                errors.push(violation(field, raw, "value is above maximum"));
            }
        }
    }

    if let Some(min_length) = constraints.min_length {
        if (raw_length(raw) as i64) < min_length {
            errors.push(violation(field, raw, "value is below minimum length"));
        }
    }

    if let Some(max_length) = constraints.max_length {
        if (raw_length(raw) as i64) > max_length {
            errors.push(violation(field, raw, "value is above maximum length"));
        }
    }

    errors
}

/// Character length of the raw value's string form. Deliberately measured
/// on the raw value, never on the cast value's canonical form.
fn raw_length(raw: &Value) -> usize {
    match raw {
        Value::String(s) => s.chars().count(),
        other => other.to_string().chars().count(),
    }
}

fn violation(field: &Field, raw: &Value, message: &str) -> ValidationError {
    ValidationError::field(field.name(), Some(raw.clone()), message)
}
