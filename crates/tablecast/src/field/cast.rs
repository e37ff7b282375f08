//! Type-specific parsing from raw values to native values.
//!
//! Each function interprets one raw value as one field type, returning the
//! failure message when the value does not fit. Constraint checking happens
//! after parsing, in `constraints.rs`.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::value::{CastValue, Duration};

use super::{Field, FieldType};

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern compiles")
});

static URI_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://[^\s]+$").expect("uri pattern compiles")
});

static UUID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("uuid pattern compiles")
});

static BASE64_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9+/]*={0,2}$").expect("base64 pattern compiles"));

/// Patterns tried, in order, by the `any` date format and by inference.
pub(crate) const DATE_ANY_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%d-%m-%Y",
    "%d.%m.%Y",
];

/// Patterns tried, in order, by the `any` time format and by inference.
pub(crate) const TIME_ANY_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M", "%I:%M %p"];

/// Patterns tried, in order, by the `any` datetime format and by inference.
pub(crate) const DATETIME_ANY_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%SZ",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

const DEFAULT_TRUE_VALUES: &[&str] = &["true", "True", "TRUE", "1"];
const DEFAULT_FALSE_VALUES: &[&str] = &["false", "False", "FALSE", "0"];

const GEOJSON_TYPES: &[&str] = &[
    "Point",
    "MultiPoint",
    "LineString",
    "MultiLineString",
    "Polygon",
    "MultiPolygon",
    "GeometryCollection",
    "Feature",
    "FeatureCollection",
];

/// Parse a non-empty raw value as the field's type.
pub(crate) fn cast(field: &Field, raw: &Value) -> Result<CastValue, String> {
    match field.field_type() {
        FieldType::String => cast_string(field, raw),
        FieldType::Integer => cast_integer(field, raw),
        FieldType::Number => cast_number(field, raw),
        FieldType::Boolean => cast_boolean(field, raw),
        FieldType::Date => cast_date(field, raw),
        FieldType::Time => cast_time(field, raw),
        FieldType::DateTime => cast_datetime(field, raw),
        FieldType::Year => cast_year(raw),
        FieldType::YearMonth => cast_yearmonth(raw),
        FieldType::Duration => cast_duration(raw),
        FieldType::Array => cast_array(raw),
        FieldType::Object => cast_object(raw),
        FieldType::Geopoint => cast_geopoint(field, raw),
        FieldType::Geojson => cast_geojson(field, raw),
        FieldType::Any => Ok(CastValue::Any(raw.clone())),
    }
}

fn type_error(field_type: FieldType) -> String {
    format!("value is not {}", field_type.tag())
}

fn cast_string(field: &Field, raw: &Value) -> Result<CastValue, String> {
    let s = raw.as_str().ok_or_else(|| type_error(FieldType::String))?;

    let ok = match field.format() {
        "email" => EMAIL_PATTERN.is_match(s),
        "uri" => URI_PATTERN.is_match(s),
        "uuid" => UUID_PATTERN.is_match(s),
        "binary" => s.len() % 4 == 0 && BASE64_PATTERN.is_match(s),
        _ => true,
    };

    if ok {
        Ok(CastValue::String(s.to_string()))
    } else {
        Err(format!("value is not a valid '{}' string", field.format()))
    }
}

fn cast_integer(field: &Field, raw: &Value) -> Result<CastValue, String> {
    match raw {
        Value::Number(n) => n
            .as_i64()
            .map(CastValue::Integer)
            .ok_or_else(|| type_error(FieldType::Integer)),
        Value::String(s) => {
            let text = if bare_number(field) {
                s.trim()
            } else {
                strip_number_noise(s.trim())
            };
            text.parse::<i64>()
                .map(CastValue::Integer)
                .map_err(|_| type_error(FieldType::Integer))
        }
        _ => Err(type_error(FieldType::Integer)),
    }
}

fn cast_number(field: &Field, raw: &Value) -> Result<CastValue, String> {
    match raw {
        Value::Number(n) => n
            .as_f64()
            .map(CastValue::Number)
            .ok_or_else(|| type_error(FieldType::Number)),
        Value::String(s) => {
            let mut text = s.trim().to_string();
            if let Some(group) = &field.descriptor().group_char {
                text = text.replace(group.as_str(), "");
            }
            if let Some(decimal) = &field.descriptor().decimal_char {
                if decimal != "." {
                    text = text.replace(decimal.as_str(), ".");
                }
            }
            if !bare_number(field) {
                text = strip_number_noise(&text).to_string();
            }
            text.parse::<f64>()
                .map(CastValue::Number)
                .map_err(|_| type_error(FieldType::Number))
        }
        _ => Err(type_error(FieldType::Number)),
    }
}

fn bare_number(field: &Field) -> bool {
    field.descriptor().bare_number.unwrap_or(true)
}

/// Strip leading/trailing characters that cannot start or end a number,
/// e.g. currency symbols or a percent suffix. A number never starts or
/// ends with an exponent marker, so only digits, signs, and the decimal
/// point count as boundaries.
fn strip_number_noise(s: &str) -> &str {
    let boundary = |c: char| c.is_ascii_digit() || matches!(c, '.' | '+' | '-');
    let start = match s.find(boundary) {
        Some(start) => start,
        None => return "",
    };
    let end = s.rfind(boundary).map(|i| i + 1).unwrap_or(s.len());
    &s[start..end]
}

fn cast_boolean(field: &Field, raw: &Value) -> Result<CastValue, String> {
    match raw {
        Value::Bool(b) => Ok(CastValue::Boolean(*b)),
        Value::String(s) => {
            let descriptor = field.descriptor();
            let truthy = match &descriptor.true_values {
                Some(values) => values.iter().any(|v| v == s),
                None => DEFAULT_TRUE_VALUES.contains(&s.as_str()),
            };
            if truthy {
                return Ok(CastValue::Boolean(true));
            }
            let falsy = match &descriptor.false_values {
                Some(values) => values.iter().any(|v| v == s),
                None => DEFAULT_FALSE_VALUES.contains(&s.as_str()),
            };
            if falsy {
                return Ok(CastValue::Boolean(false));
            }
            Err(type_error(FieldType::Boolean))
        }
        _ => Err(type_error(FieldType::Boolean)),
    }
}

/// An explicit strptime-style format, with the legacy `fmt:` prefix
/// stripped.
fn explicit_format(format: &str) -> &str {
    format.strip_prefix("fmt:").unwrap_or(format)
}

fn cast_date(field: &Field, raw: &Value) -> Result<CastValue, String> {
    let s = raw.as_str().ok_or_else(|| type_error(FieldType::Date))?;
    let parsed = match field.format() {
        "default" => NaiveDate::parse_from_str(s, "%Y-%m-%d").ok(),
        "any" => DATE_ANY_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(s, format).ok()),
        format => NaiveDate::parse_from_str(s, explicit_format(format)).ok(),
    };
    parsed
        .map(CastValue::Date)
        .ok_or_else(|| type_error(FieldType::Date))
}

fn cast_time(field: &Field, raw: &Value) -> Result<CastValue, String> {
    let s = raw.as_str().ok_or_else(|| type_error(FieldType::Time))?;
    let parsed = match field.format() {
        "default" => NaiveTime::parse_from_str(s, "%H:%M:%S").ok(),
        "any" => TIME_ANY_FORMATS
            .iter()
            .find_map(|format| NaiveTime::parse_from_str(s, format).ok()),
        format => NaiveTime::parse_from_str(s, explicit_format(format)).ok(),
    };
    parsed
        .map(CastValue::Time)
        .ok_or_else(|| type_error(FieldType::Time))
}

fn cast_datetime(field: &Field, raw: &Value) -> Result<CastValue, String> {
    let s = raw.as_str().ok_or_else(|| type_error(FieldType::DateTime))?;
    let parsed = match field.format() {
        "default" => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%SZ").ok(),
        "any" => DATETIME_ANY_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
            .or_else(|| {
                DATE_ANY_FORMATS
                    .iter()
                    .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
                    .map(|d| d.and_time(NaiveTime::MIN))
            }),
        format => NaiveDateTime::parse_from_str(s, explicit_format(format)).ok(),
    };
    parsed
        .map(CastValue::DateTime)
        .ok_or_else(|| type_error(FieldType::DateTime))
}

fn cast_year(raw: &Value) -> Result<CastValue, String> {
    let year = match raw {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    match year {
        Some(y) if (0..=9999).contains(&y) => Ok(CastValue::Year(y as i32)),
        _ => Err(type_error(FieldType::Year)),
    }
}

fn cast_yearmonth(raw: &Value) -> Result<CastValue, String> {
    let parts: Option<(i64, i64)> = match raw {
        Value::String(s) => s.split_once('-').and_then(|(y, m)| {
            Some((y.parse::<i64>().ok()?, m.parse::<i64>().ok()?))
        }),
        Value::Array(items) if items.len() == 2 => {
            let year = number_component(&items[0]);
            let month = number_component(&items[1]);
            year.zip(month)
        }
        _ => None,
    };
    match parts {
        Some((y, m)) if (0..=9999).contains(&y) && (1..=12).contains(&m) => {
            Ok(CastValue::YearMonth(y as i32, m as u32))
        }
        _ => Err(type_error(FieldType::YearMonth)),
    }
}

fn number_component(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse::<i64>().ok(),
        _ => None,
    }
}

fn cast_duration(raw: &Value) -> Result<CastValue, String> {
    raw.as_str()
        .and_then(Duration::parse)
        .map(CastValue::Duration)
        .ok_or_else(|| type_error(FieldType::Duration))
}

fn cast_array(raw: &Value) -> Result<CastValue, String> {
    match raw {
        Value::Array(items) => Ok(CastValue::Array(items.clone())),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Array(items)) => Ok(CastValue::Array(items)),
            _ => Err(type_error(FieldType::Array)),
        },
        _ => Err(type_error(FieldType::Array)),
    }
}

fn cast_object(raw: &Value) -> Result<CastValue, String> {
    match raw {
        Value::Object(map) => Ok(CastValue::Object(map.clone())),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(map)) => Ok(CastValue::Object(map)),
            _ => Err(type_error(FieldType::Object)),
        },
        _ => Err(type_error(FieldType::Object)),
    }
}

fn cast_geopoint(field: &Field, raw: &Value) -> Result<CastValue, String> {
    let pair = match (field.format(), raw) {
        ("default", Value::String(s)) => {
            let parts: Vec<&str> = s.split(',').map(str::trim).collect();
            if parts.len() == 2 {
                parts[0].parse::<f64>().ok().zip(parts[1].parse::<f64>().ok())
            } else {
                None
            }
        }
        ("array", Value::Array(items)) if items.len() == 2 => {
            float_component(&items[0]).zip(float_component(&items[1]))
        }
        ("object", Value::Object(map)) => {
            let lon = map.get("lon").and_then(float_component);
            let lat = map.get("lat").and_then(float_component);
            lon.zip(lat)
        }
        _ => None,
    };
    pair.map(|(lon, lat)| CastValue::Geopoint(lon, lat))
        .ok_or_else(|| type_error(FieldType::Geopoint))
}

fn float_component(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn cast_geojson(field: &Field, raw: &Value) -> Result<CastValue, String> {
    let object = match raw {
        Value::Object(_) => Some(raw.clone()),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(value @ Value::Object(_)) => Some(value),
            _ => None,
        },
        _ => None,
    };

    let object = object.ok_or_else(|| type_error(FieldType::Geojson))?;

    if field.format() == "default" {
        let known_type = object
            .get("type")
            .and_then(Value::as_str)
            .is_some_and(|t| GEOJSON_TYPES.contains(&t));
        if !known_type {
            return Err(type_error(FieldType::Geojson));
        }
    }

    Ok(CastValue::Geojson(object))
}
