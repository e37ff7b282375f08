//! Schema construction and row-level casting.

use indexmap::IndexMap;
use serde_json::Value;

use crate::descriptor::{self, SchemaDescriptor};
use crate::error::{CastError, Result, ValidationError};
use crate::field::Field;
use crate::inference;
use crate::value::CastValue;

/// A raw input row: field name to raw value.
pub type RawRow = IndexMap<String, Value>;

/// A fully cast output row, in field declaration order.
pub type CastRow = IndexMap<String, CastValue>;

/// An ordered set of fields applied to rows as a unit.
///
/// Immutable after construction; casting keeps no per-row state, so one
/// schema can serve any number of rows (or threads).
#[derive(Debug, Clone)]
pub struct Schema {
    descriptor: SchemaDescriptor,
    fields: IndexMap<String, Field>,
}

impl Schema {
    /// Build a schema from a parsed descriptor.
    ///
    /// Construction is atomic: the descriptor is structurally validated
    /// first and every fault is reported together; no partial schema is
    /// ever produced.
    pub fn from_descriptor(descriptor: SchemaDescriptor) -> Result<Self> {
        let errors = descriptor::validate_descriptor(&descriptor);
        if !errors.is_empty() {
            return Err(CastError::Descriptor(errors));
        }

        let mut fields = IndexMap::with_capacity(descriptor.fields.len());
        for field_descriptor in &descriptor.fields {
            let field = Field::new(field_descriptor.clone())?;
            fields.insert(field.name().to_string(), field);
        }

        Ok(Self { descriptor, fields })
    }

    /// Build a schema from a source string: inline JSON, a file path, or a
    /// URL.
    pub fn from_source(source: &str) -> Result<Self> {
        Self::from_descriptor(descriptor::load_descriptor(source)?)
    }

    /// Build a schema from an already-parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        let descriptor = serde_json::from_value(value)
            .map_err(|e| CastError::Load(format!("invalid descriptor: {e}")))?;
        Self::from_descriptor(descriptor)
    }

    /// Check a descriptor source without keeping the schema.
    ///
    /// Returns every load and structural error found, or an empty list when
    /// a schema could be built.
    pub fn validate(source: &str) -> Vec<ValidationError> {
        match Self::from_source(source) {
            Ok(_) => Vec::new(),
            Err(err) => err.into_validation_errors(),
        }
    }

    /// Infer a schema from headers and sample rows.
    pub fn infer(headers: &[String], rows: &[Vec<Value>]) -> Result<Self> {
        let missing = vec![Value::String(String::new())];
        Self::from_descriptor(inference::infer_descriptor(headers, rows, &missing))
    }

    /// The backing descriptor.
    pub fn descriptor(&self) -> &SchemaDescriptor {
        &self.descriptor
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &IndexMap<String, Field> {
        &self.fields
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Declared field names, in order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    /// Raw sentinels treated as absent values.
    pub fn missing_values(&self) -> &[Value] {
        &self.descriptor.missing_values
    }

    /// Advisory primary key field names.
    pub fn primary_key(&self) -> Vec<&str> {
        self.descriptor.primary_key_names()
    }

    /// Cast a raw row against every declared field.
    ///
    /// Absent keys and missing-value sentinels are treated as null. Every
    /// field is processed regardless of individual failures; the result is
    /// either a fully cast row or the merged error list. Row keys not
    /// declared in the schema are ignored.
    pub fn cast_row(&self, row: &RawRow) -> Result<CastRow> {
        let mut output = IndexMap::with_capacity(self.fields.len());
        let mut errors = Vec::new();

        for (name, field) in &self.fields {
            let mut raw = row.get(name).cloned().unwrap_or(Value::Null);
            if self.is_missing_value(&raw) {
                raw = Value::Null;
            }

            match field.cast_value(&raw) {
                Ok(native) => {
                    output.insert(name.clone(), native);
                }
                Err(err) => errors.extend(err.into_validation_errors()),
            }
        }

        if errors.is_empty() {
            Ok(output)
        } else {
            Err(CastError::Validation(errors))
        }
    }

    /// Run `cast_row` and return its errors instead of failing.
    pub fn validate_row(&self, row: &RawRow) -> Vec<ValidationError> {
        match self.cast_row(row) {
            Ok(_) => Vec::new(),
            Err(err) => err.into_validation_errors(),
        }
    }

    fn is_missing_value(&self, raw: &Value) -> bool {
        !raw.is_null() && self.missing_values().contains(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(value: Value) -> Schema {
        Schema::from_value(value).unwrap()
    }

    fn row(pairs: &[(&str, Value)]) -> RawRow {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_cast_row_outputs_declared_fields_in_order() {
        let s = schema(json!({
            "fields": [
                {"name": "id", "type": "integer"},
                {"name": "name", "type": "string"}
            ]
        }));
        let cast = s
            .cast_row(&row(&[
                ("name", json!("Alice")),
                ("id", json!("1")),
                ("extra", json!("ignored")),
            ]))
            .unwrap();

        let keys: Vec<&String> = cast.keys().collect();
        assert_eq!(keys, vec!["id", "name"]);
        assert_eq!(cast["id"], CastValue::Integer(1));
        assert_eq!(cast["name"], CastValue::String("Alice".into()));
    }

    #[test]
    fn test_cast_row_absent_key_is_null() {
        let s = schema(json!({"fields": [{"name": "note", "type": "string"}]}));
        let cast = s.cast_row(&RawRow::new()).unwrap();
        assert_eq!(cast["note"], CastValue::Null);
    }

    #[test]
    fn test_missing_value_sentinel_maps_to_null() {
        let s = schema(json!({
            "fields": [{"name": "score", "type": "integer"}],
            "missingValues": ["", "NA"]
        }));
        let cast = s.cast_row(&row(&[("score", json!("NA"))])).unwrap();
        assert_eq!(cast["score"], CastValue::Null);
    }

    #[test]
    fn test_missing_value_sentinel_still_fails_required() {
        let s = schema(json!({
            "fields": [{
                "name": "score",
                "type": "integer",
                "constraints": {"required": true}
            }],
            "missingValues": ["NA"]
        }));
        let errors = s.validate_row(&row(&[("score", json!("NA"))]));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "field is required");
    }

    #[test]
    fn test_cast_row_collects_errors_across_fields() {
        let s = schema(json!({
            "fields": [
                {"name": "id", "type": "integer", "constraints": {"required": true}},
                {"name": "code", "type": "string", "constraints": {"pattern": "[A-Z]{3}"}}
            ]
        }));
        let errors = s.validate_row(&row(&[("code", json!("abc"))]));
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field.as_deref(), Some("id"));
        assert_eq!(errors[0].message, "field is required");
        assert_eq!(errors[1].field.as_deref(), Some("code"));
        assert_eq!(errors[1].message, "value does not match pattern");
    }

    #[test]
    fn test_construction_is_atomic() {
        let result = Schema::from_value(json!({
            "fields": [
                {"name": "a", "type": "bogus"},
                {"name": "a", "type": "integer"}
            ]
        }));
        match result {
            Err(CastError::Descriptor(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected descriptor error, got {other:?}"),
        }
    }

    #[test]
    fn test_static_validate() {
        assert!(Schema::validate(r#"{"fields": [{"name": "x"}]}"#).is_empty());

        let errors = Schema::validate("{broken");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, crate::error::ErrorKind::LoadFailed);

        let errors = Schema::validate(r#"{"fields": [{"name": "x", "type": "bogus"}]}"#);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].kind,
            crate::error::ErrorKind::SchemaValidationFailed
        );
    }

    #[test]
    fn test_infer_builds_castable_schema() {
        let headers = vec!["id".to_string(), "when".to_string()];
        let rows = vec![
            vec![json!("1"), json!("2024-01-15")],
            vec![json!("2"), json!("2024-02-20")],
        ];
        let s = Schema::infer(&headers, &rows).unwrap();
        assert_eq!(s.field_names(), vec!["id", "when"]);

        let cast = s
            .cast_row(&row(&[("id", json!("3")), ("when", json!("2024-03-25"))]))
            .unwrap();
        assert_eq!(cast["id"], CastValue::Integer(3));
        assert!(matches!(cast["when"], CastValue::Date(_)));
    }
}
