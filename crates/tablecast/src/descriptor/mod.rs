//! Descriptor model for schemas, fields, and constraints.

mod load;
mod validate;

pub use load::load_descriptor;
pub use validate::validate_descriptor;

use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_type() -> String {
    "string".to_string()
}

fn default_format() -> String {
    "default".to_string()
}

fn default_missing_values() -> Vec<Value> {
    vec![Value::String(String::new())]
}

/// Declarative schema descriptor: an ordered list of field descriptors plus
/// schema-level options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDescriptor {
    /// Field declarations, in order.
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
    /// Raw sentinels treated as absent before casting.
    #[serde(default = "default_missing_values")]
    pub missing_values: Vec<Value>,
    /// Advisory primary key: a single field name or a list of names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<Value>,
}

impl SchemaDescriptor {
    /// Primary key field names, normalized from the single-name or list form.
    pub fn primary_key_names(&self) -> Vec<&str> {
        match &self.primary_key {
            Some(Value::String(name)) => vec![name.as_str()],
            Some(Value::Array(items)) => items.iter().filter_map(|v| v.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}

impl Default for SchemaDescriptor {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            missing_values: default_missing_values(),
            primary_key: None,
        }
    }
}

/// Declaration of a single named, typed field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Field name, unique within a schema.
    pub name: String,
    /// Type tag selecting the field variant.
    #[serde(rename = "type", default = "default_type")]
    pub field_type: String,
    /// Parsing sub-mode (e.g. a date format).
    #[serde(default = "default_format")]
    pub format: String,
    /// Human-readable title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Value constraints.
    #[serde(default, skip_serializing_if = "Constraints::is_empty")]
    pub constraints: Constraints,
    /// Decimal separator for number fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimal_char: Option<String>,
    /// Group separator for number fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_char: Option<String>,
    /// When false, leading/trailing non-numeric noise is stripped before
    /// integer/number parsing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bare_number: Option<bool>,
    /// Accepted spellings of true for boolean fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub true_values: Option<Vec<String>>,
    /// Accepted spellings of false for boolean fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub false_values: Option<Vec<String>>,
}

impl Default for FieldDescriptor {
    fn default() -> Self {
        Self {
            name: String::new(),
            field_type: default_type(),
            format: default_format(),
            title: None,
            description: None,
            constraints: Constraints::default(),
            decimal_char: None,
            group_char: None,
            bare_number: None,
            true_values: None,
            false_values: None,
        }
    }
}

/// Declarative constraints checked after a successful cast.
///
/// `minimum`/`maximum` and `enum` members are raw values; they are cast
/// through the owning field's type at check time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    /// A value must be present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Values are expected to be unique (advisory, not enforced per row).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique: Option<bool>,
    /// Allowed values, each cast through the field's own type.
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    /// Anchored regex matched against the raw string form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Lower bound in the type's natural ordering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Value>,
    /// Upper bound in the type's natural ordering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Value>,
    /// Minimum character length of the raw value's string form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<i64>,
    /// Maximum character length of the raw value's string form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i64>,
}

impl Constraints {
    /// Returns true when no constraint is declared.
    pub fn is_empty(&self) -> bool {
        self.required.is_none()
            && self.unique.is_none()
            && self.enum_values.is_none()
            && self.pattern.is_none()
            && self.minimum.is_none()
            && self.maximum.is_none()
            && self.min_length.is_none()
            && self.max_length.is_none()
    }
}
