//! Property-based tests for tablecast.
//!
//! These tests use proptest to generate random inputs and verify that
//! casting maintains its invariants under all conditions.
//!
//! # Testing Philosophy
//!
//! Property-based tests verify:
//! 1. **No panics**: Casting never crashes on any input
//! 2. **Determinism**: Same input always produces same output
//! 3. **Laws**: Required/enum/round-trip properties always hold
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p tablecast --test property_tests
//!
//! # Run with more cases (slower but more thorough)
//! PROPTEST_CASES=10000 cargo test -p tablecast --test property_tests
//! ```

use proptest::prelude::*;
use serde_json::{Value, json};

use tablecast::{CastValue, RawRow, Schema};

// =============================================================================
// Test Strategies
// =============================================================================

/// Generate arbitrary ASCII strings (common case)
fn ascii_string() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_\\-\\.\\s]{0,60}"
}

/// Generate strings that look like numbers, valid or nearly so
fn number_like() -> impl Strategy<Value = String> {
    prop_oneof![
        "-?[0-9]{1,12}",
        "-?[0-9]{1,6}\\.[0-9]{1,6}",
        "[0-9]{1,3}[eE][0-9]{1,2}",
        "[0-9.\\-+e]{1,10}",
    ]
}

/// Generate strings that look like dates
fn date_like() -> impl Strategy<Value = String> {
    prop_oneof![
        "[12][0-9]{3}-[01][0-9]-[0-3][0-9]",
        "[0-3][0-9]/[01][0-9]/[12][0-9]{3}",
        "[a-zA-Z0-9\\-/]{5,15}",
    ]
}

/// Generate random raw JSON scalars
fn raw_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        ascii_string().prop_map(Value::String),
    ]
}

fn all_types_schema() -> Schema {
    Schema::from_value(json!({
        "fields": [
            {"name": "s", "type": "string"},
            {"name": "i", "type": "integer"},
            {"name": "n", "type": "number"},
            {"name": "b", "type": "boolean"},
            {"name": "d", "type": "date"},
            {"name": "t", "type": "time"},
            {"name": "dt", "type": "datetime"},
            {"name": "y", "type": "year"},
            {"name": "ym", "type": "yearmonth"},
            {"name": "dur", "type": "duration"},
            {"name": "a", "type": "array"},
            {"name": "o", "type": "object"},
            {"name": "gp", "type": "geopoint"},
            {"name": "gj", "type": "geojson"},
            {"name": "any", "type": "any"}
        ]
    }))
    .expect("schema builds")
}

// =============================================================================
// Casting Properties
// =============================================================================

proptest! {
    /// Casting never panics, whatever the raw value, for every field type.
    #[test]
    fn never_panics_on_any_scalar(raw in raw_scalar()) {
        let schema = all_types_schema();
        for field in schema.fields().values() {
            let _ = field.validate_value(&raw);
        }
    }

    /// Casting is deterministic.
    #[test]
    fn casting_is_deterministic(raw in raw_scalar()) {
        let schema = all_types_schema();
        for field in schema.fields().values() {
            let first = field.validate_value(&raw);
            let second = field.validate_value(&raw);
            prop_assert_eq!(first, second);
        }
    }

    /// A cast row contains exactly the declared field names; a failed cast
    /// reports only declared field names.
    #[test]
    fn cast_row_keys_match_schema(value in ascii_string()) {
        let schema = Schema::from_value(json!({
            "fields": [
                {"name": "a", "type": "integer"},
                {"name": "b", "type": "string"}
            ]
        })).unwrap();

        let mut row = RawRow::new();
        row.insert("a".to_string(), Value::String(value.clone()));
        row.insert("undeclared".to_string(), Value::String(value));

        match schema.cast_row(&row) {
            Ok(cast) => {
                let keys: Vec<&String> = cast.keys().collect();
                prop_assert_eq!(keys, vec!["a", "b"]);
            }
            Err(err) => {
                for error in err.validation_errors() {
                    let field = error.field.as_deref().unwrap_or("");
                    prop_assert!(field == "a" || field == "b");
                }
            }
        }
    }

    /// Required fields always reject null, whatever other constraints say.
    #[test]
    fn required_law(min in -100i64..100, max in -100i64..100) {
        let schema = Schema::from_value(json!({
            "fields": [{
                "name": "x",
                "type": "integer",
                "constraints": {"required": true, "minimum": min, "maximum": max}
            }]
        })).unwrap();

        let errors = schema.field("x").unwrap().validate_value(&Value::Null);
        prop_assert_eq!(errors.len(), 1);
        prop_assert_eq!(errors[0].message.as_str(), "field is required");
    }

    /// Integers survive a string round-trip through the caster.
    #[test]
    fn integer_string_round_trip(n in any::<i64>()) {
        let schema = all_types_schema();
        let field = schema.field("i").unwrap();
        let cast = field.cast_value(&Value::String(n.to_string())).unwrap();
        prop_assert_eq!(cast, CastValue::Integer(n));
    }

    /// A parse failure short-circuits constraint checks: the error list for
    /// an uncastable value is always exactly one entry.
    #[test]
    fn parse_failure_yields_single_error(text in "[a-zA-Z]{1,20}") {
        let schema = Schema::from_value(json!({
            "fields": [{
                "name": "x",
                "type": "integer",
                "constraints": {"minimum": 0, "maximum": 10, "minLength": 100}
            }]
        })).unwrap();

        let errors = schema.field("x").unwrap().validate_value(&json!(text));
        prop_assert_eq!(errors.len(), 1);
        prop_assert_eq!(errors[0].message.as_str(), "value is not integer");
    }

    /// Number-like strings either cast or produce a single structured error;
    /// they never panic and never pass constraints when uncastable.
    #[test]
    fn number_like_strings_are_total(text in number_like()) {
        let schema = all_types_schema();
        let _ = schema.field("n").unwrap().validate_value(&Value::String(text));
    }

    /// Date-like strings never panic in default or any formats.
    #[test]
    fn date_like_strings_are_total(text in date_like()) {
        let any_format = Schema::from_value(json!({
            "fields": [{"name": "d", "type": "date", "format": "any"}]
        })).unwrap();
        let schema = all_types_schema();

        let _ = schema.field("d").unwrap().validate_value(&json!(text.clone()));
        let _ = any_format.field("d").unwrap().validate_value(&json!(text));
    }

    /// validate_row and cast_row always agree.
    #[test]
    fn validate_row_agrees_with_cast_row(value in raw_scalar()) {
        let schema = Schema::from_value(json!({
            "fields": [{"name": "x", "type": "integer", "constraints": {"minimum": 0}}]
        })).unwrap();

        let mut row = RawRow::new();
        row.insert("x".to_string(), value);

        let errors = schema.validate_row(&row);
        prop_assert_eq!(errors.is_empty(), schema.cast_row(&row).is_ok());
    }
}
