//! Native value representation produced by casting.

use std::cmp::Ordering;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// A raw value cast to its declared field type.
///
/// One variant per field type, plus `Null` for absent values. Values of
/// different variants are incomparable; `partial_cmp` implements the
/// natural ordering used by minimum/maximum constraints.
#[derive(Debug, Clone, PartialEq)]
pub enum CastValue {
    /// Absent value (null raw, or a missing-value sentinel).
    Null,
    /// Text.
    String(String),
    /// Whole number.
    Integer(i64),
    /// Floating-point number.
    Number(f64),
    /// Boolean.
    Boolean(bool),
    /// Calendar date.
    Date(NaiveDate),
    /// Time of day.
    Time(NaiveTime),
    /// Date and time, no offset.
    DateTime(NaiveDateTime),
    /// Calendar year.
    Year(i32),
    /// Calendar year and month (1-12).
    YearMonth(i32, u32),
    /// ISO 8601 duration.
    Duration(Duration),
    /// JSON array, kept as-is.
    Array(Vec<Value>),
    /// JSON object, kept as-is.
    Object(serde_json::Map<String, Value>),
    /// Longitude/latitude pair.
    Geopoint(f64, f64),
    /// GeoJSON object.
    Geojson(Value),
    /// Untyped passthrough.
    Any(Value),
}

impl CastValue {
    /// Returns true if this is the null value.
    pub fn is_null(&self) -> bool {
        matches!(self, CastValue::Null)
    }

    /// JSON representation of the native value.
    ///
    /// Temporal values render in their default wire forms; durations render
    /// in ISO 8601 form. A non-finite number renders as null.
    pub fn to_json(&self) -> Value {
        match self {
            CastValue::Null => Value::Null,
            CastValue::String(s) => Value::String(s.clone()),
            CastValue::Integer(i) => Value::from(*i),
            CastValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            CastValue::Boolean(b) => Value::Bool(*b),
            CastValue::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
            CastValue::Time(t) => Value::String(t.format("%H:%M:%S").to_string()),
            CastValue::DateTime(dt) => Value::String(dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
            CastValue::Year(y) => Value::from(*y),
            CastValue::YearMonth(y, m) => Value::String(format!("{y:04}-{m:02}")),
            CastValue::Duration(d) => Value::String(d.to_string()),
            CastValue::Array(items) => Value::Array(items.clone()),
            CastValue::Object(map) => Value::Object(map.clone()),
            CastValue::Geopoint(lon, lat) => Value::Array(vec![
                serde_json::Number::from_f64(*lon)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
                serde_json::Number::from_f64(*lat)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
            ]),
            CastValue::Geojson(v) | CastValue::Any(v) => v.clone(),
        }
    }
}

impl PartialOrd for CastValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (CastValue::String(a), CastValue::String(b)) => a.partial_cmp(b),
            (CastValue::Integer(a), CastValue::Integer(b)) => a.partial_cmp(b),
            (CastValue::Number(a), CastValue::Number(b)) => a.partial_cmp(b),
            (CastValue::Integer(a), CastValue::Number(b)) => (*a as f64).partial_cmp(b),
            (CastValue::Number(a), CastValue::Integer(b)) => a.partial_cmp(&(*b as f64)),
            (CastValue::Date(a), CastValue::Date(b)) => a.partial_cmp(b),
            (CastValue::Time(a), CastValue::Time(b)) => a.partial_cmp(b),
            (CastValue::DateTime(a), CastValue::DateTime(b)) => a.partial_cmp(b),
            (CastValue::Year(a), CastValue::Year(b)) => a.partial_cmp(b),
            (CastValue::YearMonth(y1, m1), CastValue::YearMonth(y2, m2)) => {
                (y1, m1).partial_cmp(&(y2, m2))
            }
            (CastValue::Duration(a), CastValue::Duration(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl Serialize for CastValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

static DURATION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^P(?:(?P<weeks>\d+)W|(?:(?P<years>\d+)Y)?(?:(?P<months>\d+)M)?(?:(?P<days>\d+)D)?(?:T(?:(?P<hours>\d+)H)?(?:(?P<minutes>\d+)M)?(?:(?P<seconds>\d+(?:\.\d+)?)S)?)?)$",
    )
    .expect("duration pattern compiles")
});

/// An ISO 8601 duration, kept in its calendar components.
///
/// The week form (`P3W`) is folded into days. Ordering and equality use a
/// canonical seconds value with 365-day years and 30-day months.
#[derive(Debug, Clone, Copy)]
pub struct Duration {
    pub years: u32,
    pub months: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: f64,
}

impl Duration {
    /// Parse an ISO 8601 duration string.
    ///
    /// Returns `None` for non-duration text, including a bare `P` or `PT`
    /// with no components.
    pub fn parse(text: &str) -> Option<Duration> {
        let captures = DURATION_PATTERN.captures(text)?;

        let component = |name: &str| -> Option<u32> {
            captures.name(name).and_then(|m| m.as_str().parse().ok())
        };

        let weeks = component("weeks");
        let years = component("years");
        let months = component("months");
        let days = component("days");
        let hours = component("hours");
        let minutes = component("minutes");
        let seconds: Option<f64> = captures
            .name("seconds")
            .and_then(|m| m.as_str().parse().ok());

        if weeks.is_none()
            && years.is_none()
            && months.is_none()
            && days.is_none()
            && hours.is_none()
            && minutes.is_none()
            && seconds.is_none()
        {
            return None;
        }

        Some(Duration {
            years: years.unwrap_or(0),
            months: months.unwrap_or(0),
            days: days.unwrap_or(0) + weeks.unwrap_or(0) * 7,
            hours: hours.unwrap_or(0),
            minutes: minutes.unwrap_or(0),
            seconds: seconds.unwrap_or(0.0),
        })
    }

    /// Canonical length in seconds (365-day years, 30-day months).
    pub fn total_seconds(&self) -> f64 {
        let days = self.years as f64 * 365.0 + self.months as f64 * 30.0 + self.days as f64;
        days * 86_400.0 + self.hours as f64 * 3_600.0 + self.minutes as f64 * 60.0 + self.seconds
    }
}

impl PartialEq for Duration {
    fn eq(&self, other: &Self) -> bool {
        self.total_seconds() == other.total_seconds()
    }
}

impl PartialOrd for Duration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.total_seconds().partial_cmp(&other.total_seconds())
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P")?;
        if self.years > 0 {
            write!(f, "{}Y", self.years)?;
        }
        if self.months > 0 {
            write!(f, "{}M", self.months)?;
        }
        if self.days > 0 {
            write!(f, "{}D", self.days)?;
        }
        if self.hours > 0 || self.minutes > 0 || self.seconds > 0.0 {
            write!(f, "T")?;
            if self.hours > 0 {
                write!(f, "{}H", self.hours)?;
            }
            if self.minutes > 0 {
                write!(f, "{}M", self.minutes)?;
            }
            if self.seconds > 0.0 {
                write!(f, "{}S", self.seconds)?;
            }
        }
        if self.years == 0
            && self.months == 0
            && self.days == 0
            && self.hours == 0
            && self.minutes == 0
            && self.seconds == 0.0
        {
            write!(f, "0D")?;
        }
        Ok(())
    }
}
