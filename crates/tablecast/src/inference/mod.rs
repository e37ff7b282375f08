//! Field type inference from sample data.

use indexmap::IndexMap;
use serde_json::Value;

use crate::descriptor::{FieldDescriptor, SchemaDescriptor};
use crate::field::{Field, FieldType, cast};

/// Candidate types in priority order, most specific first.
///
/// Inference trial-casts each candidate and takes the first success, so
/// earlier entries win whenever several types accept the same raw value.
/// `year` and `yearmonth` are deliberately absent: every small integer and
/// every ISO date prefix would match them, so they are only used when
/// declared explicitly.
const CANDIDATES: &[FieldType] = &[
    FieldType::Duration,
    FieldType::Geojson,
    FieldType::Geopoint,
    FieldType::Object,
    FieldType::Array,
    FieldType::DateTime,
    FieldType::Time,
    FieldType::Date,
    FieldType::Integer,
    FieldType::Number,
    FieldType::Boolean,
    FieldType::String,
    FieldType::Any,
];

/// Outcome of probing a single raw value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InferredType {
    /// The most specific type that accepted the value.
    pub field_type: FieldType,
    /// Detected format, `"default"` unless refinement found a better one.
    pub format: String,
}

/// Infer the most specific field type that casts a raw value.
pub fn infer_value(raw: &Value) -> InferredType {
    for &candidate in CANDIDATES {
        if let Some(inferred) = probe(candidate, raw) {
            return inferred;
        }
    }
    InferredType {
        field_type: FieldType::Any,
        format: "default".to_string(),
    }
}

/// Trial-cast `raw` as `candidate`, refining the format on success.
///
/// Never fails: a value the candidate cannot accept in any known format is
/// simply not applicable.
fn probe(candidate: FieldType, raw: &Value) -> Option<InferredType> {
    if trial_field(candidate, "default").cast_value(raw).is_ok() {
        return Some(InferredType {
            field_type: candidate,
            format: "default".to_string(),
        });
    }

    // temporal values that miss the default format may still match one of
    // the known explicit patterns
    for format in format_candidates(candidate) {
        if trial_field(candidate, format).cast_value(raw).is_ok() {
            return Some(InferredType {
                field_type: candidate,
                format: (*format).to_string(),
            });
        }
    }

    None
}

fn format_candidates(candidate: FieldType) -> &'static [&'static str] {
    match candidate {
        FieldType::Date => cast::DATE_ANY_FORMATS,
        FieldType::Time => cast::TIME_ANY_FORMATS,
        FieldType::DateTime => cast::DATETIME_ANY_FORMATS,
        _ => &[],
    }
}

fn trial_field(field_type: FieldType, format: &str) -> Field {
    let descriptor = FieldDescriptor {
        name: "value".to_string(),
        field_type: field_type.tag().to_string(),
        format: format.to_string(),
        ..FieldDescriptor::default()
    };
    Field::new(descriptor).expect("trial descriptor is well-formed")
}

/// Infer a schema descriptor from headers and sample rows.
///
/// Each non-missing cell votes for its most specific candidate; a column
/// takes the most common vote, with ties resolved toward the more specific
/// candidate. A column whose integer votes are mixed with number votes is
/// promoted to number. Columns with no usable samples fall back to `any`.
pub fn infer_descriptor(
    headers: &[String],
    rows: &[Vec<Value>],
    missing_values: &[Value],
) -> SchemaDescriptor {
    let mut fields = Vec::with_capacity(headers.len());

    for (index, name) in headers.iter().enumerate() {
        let mut votes: IndexMap<InferredType, usize> = IndexMap::new();

        for row in rows {
            let raw = row.get(index).unwrap_or(&Value::Null);
            if raw.is_null() || missing_values.contains(raw) {
                continue;
            }
            *votes.entry(infer_value(raw)).or_insert(0) += 1;
        }

        let mut best: Option<(&InferredType, usize)> = None;
        for (inferred, count) in &votes {
            let better = match best {
                None => true,
                Some((current, current_count)) => {
                    *count > current_count
                        || (*count == current_count
                            && priority(inferred.field_type) < priority(current.field_type))
                }
            };
            if better {
                best = Some((inferred, *count));
            }
        }

        let (mut field_type, mut format) = match best {
            Some((inferred, _)) => (inferred.field_type, inferred.format.clone()),
            None => (FieldType::Any, "default".to_string()),
        };

        // a column of integers with the occasional decimal is a number column
        if field_type == FieldType::Integer
            && votes
                .keys()
                .any(|inferred| inferred.field_type == FieldType::Number)
        {
            field_type = FieldType::Number;
            format = "default".to_string();
        }

        fields.push(FieldDescriptor {
            name: name.clone(),
            field_type: field_type.tag().to_string(),
            format,
            ..FieldDescriptor::default()
        });
    }

    SchemaDescriptor {
        fields,
        ..SchemaDescriptor::default()
    }
}

fn priority(field_type: FieldType) -> usize {
    CANDIDATES
        .iter()
        .position(|&candidate| candidate == field_type)
        .unwrap_or(usize::MAX)
}
