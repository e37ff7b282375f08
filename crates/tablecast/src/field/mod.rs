//! Field variants and the value-casting contract.

pub(crate) mod cast;
mod constraints;

pub use constraints::check_constraints;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::descriptor::{Constraints, FieldDescriptor};
use crate::error::{CastError, Result, ValidationError};
use crate::value::CastValue;

/// Closed set of field type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Text values, with optional format checks (email, uri, uuid, binary).
    String,
    /// Whole numbers.
    Integer,
    /// Floating-point numbers.
    Number,
    /// Boolean values.
    Boolean,
    /// Calendar dates.
    Date,
    /// Times of day.
    Time,
    /// Dates with times.
    DateTime,
    /// Calendar years.
    Year,
    /// Calendar year-month pairs.
    YearMonth,
    /// ISO 8601 durations.
    Duration,
    /// JSON arrays.
    Array,
    /// JSON objects.
    Object,
    /// Longitude/latitude pairs.
    Geopoint,
    /// GeoJSON objects.
    Geojson,
    /// Untyped passthrough.
    Any,
}

impl FieldType {
    /// Parse a descriptor type tag.
    pub fn from_tag(tag: &str) -> Option<FieldType> {
        match tag {
            "string" => Some(FieldType::String),
            "integer" => Some(FieldType::Integer),
            "number" => Some(FieldType::Number),
            "boolean" => Some(FieldType::Boolean),
            "date" => Some(FieldType::Date),
            "time" => Some(FieldType::Time),
            "datetime" => Some(FieldType::DateTime),
            "year" => Some(FieldType::Year),
            "yearmonth" => Some(FieldType::YearMonth),
            "duration" => Some(FieldType::Duration),
            "array" => Some(FieldType::Array),
            "object" => Some(FieldType::Object),
            "geopoint" => Some(FieldType::Geopoint),
            "geojson" => Some(FieldType::Geojson),
            "any" => Some(FieldType::Any),
            _ => None,
        }
    }

    /// The canonical tag for this type.
    pub fn tag(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::DateTime => "datetime",
            FieldType::Year => "year",
            FieldType::YearMonth => "yearmonth",
            FieldType::Duration => "duration",
            FieldType::Array => "array",
            FieldType::Object => "object",
            FieldType::Geopoint => "geopoint",
            FieldType::Geojson => "geojson",
            FieldType::Any => "any",
        }
    }

    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Integer | FieldType::Number)
    }

    /// Returns true if this type is temporal.
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            FieldType::Date | FieldType::Time | FieldType::DateTime
        )
    }
}

/// A named, typed column definition plus its constraints.
///
/// Immutable after construction and freely shareable: casting threads any
/// internal state (such as constraint suppression) through arguments, never
/// through the instance.
#[derive(Debug, Clone)]
pub struct Field {
    descriptor: FieldDescriptor,
    field_type: FieldType,
    pattern: Option<Regex>,
}

impl Field {
    /// Build a field from its descriptor.
    ///
    /// An unknown type tag or an uncompilable pattern constraint is
    /// rejected here; schema construction reports the same faults earlier
    /// through structural validation.
    pub fn new(descriptor: FieldDescriptor) -> Result<Self> {
        let field_type = FieldType::from_tag(&descriptor.field_type).ok_or_else(|| {
            CastError::Descriptor(vec![ValidationError::schema(format!(
                "field '{}' has unknown type '{}'",
                descriptor.name, descriptor.field_type
            ))])
        })?;

        let pattern = match &descriptor.constraints.pattern {
            Some(pattern) => {
                let anchored = format!("^(?:{pattern})$");
                Some(Regex::new(&anchored).map_err(|e| {
                    CastError::Descriptor(vec![ValidationError::schema(format!(
                        "field '{}' has invalid pattern: {e}",
                        descriptor.name
                    ))])
                })?)
            }
            None => None,
        };

        Ok(Self {
            descriptor,
            field_type,
            pattern,
        })
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// The field's type.
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Parsing sub-mode, `"default"` unless the descriptor says otherwise.
    pub fn format(&self) -> &str {
        &self.descriptor.format
    }

    /// Whether a value must be present.
    pub fn required(&self) -> bool {
        self.descriptor.constraints.required.unwrap_or(false)
    }

    /// Whether values are expected to be unique (advisory; not enforced by
    /// per-value casting).
    pub fn unique(&self) -> bool {
        self.descriptor.constraints.unique.unwrap_or(false)
    }

    /// Declared enum members, raw.
    pub fn enum_values(&self) -> &[Value] {
        self.descriptor
            .constraints
            .enum_values
            .as_deref()
            .unwrap_or(&[])
    }

    /// The constraints sub-object.
    pub fn constraints(&self) -> &Constraints {
        &self.descriptor.constraints
    }

    /// The backing descriptor.
    pub fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    /// The compiled, anchored pattern constraint.
    pub(crate) fn pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    /// Cast a raw value to this field's native type.
    ///
    /// An empty value yields `CastValue::Null` unless the field is
    /// required. A value that parses is then checked against the declared
    /// constraints, and every violation is reported together; a value that
    /// does not parse fails without constraint checks.
    pub fn cast_value(&self, raw: &Value) -> Result<CastValue> {
        self.cast_value_impl(raw, false)
    }

    /// Cast with constraint checks optionally skipped.
    ///
    /// `skip_constraints` is threaded through the bound/enum-member casting
    /// path so a constraint value is never constraint-checked itself.
    pub(crate) fn cast_value_impl(&self, raw: &Value, skip_constraints: bool) -> Result<CastValue> {
        if self.is_empty_value(raw) {
            if self.required() {
                return Err(CastError::Validation(vec![ValidationError::field(
                    self.name(),
                    Some(raw.clone()),
                    "field is required",
                )]));
            }
            return Ok(CastValue::Null);
        }

        let native = match cast::cast(self, raw) {
            Ok(native) => native,
            Err(message) => {
                return Err(CastError::Validation(vec![ValidationError::field(
                    self.name(),
                    Some(raw.clone()),
                    message,
                )]));
            }
        };

        if !skip_constraints {
            let errors = check_constraints(self, &native, raw);
            if !errors.is_empty() {
                return Err(CastError::Validation(errors));
            }
        }

        Ok(native)
    }

    /// Run `cast_value` and return its errors instead of failing.
    pub fn validate_value(&self, raw: &Value) -> Vec<ValidationError> {
        match self.cast_value(raw) {
            Ok(_) => Vec::new(),
            Err(err) => err.into_validation_errors(),
        }
    }

    /// Null is always empty; string fields also treat the empty string as
    /// empty.
    fn is_empty_value(&self, raw: &Value) -> bool {
        match raw {
            Value::Null => true,
            Value::String(s) if s.is_empty() => self.field_type == FieldType::String,
            _ => false,
        }
    }
}
