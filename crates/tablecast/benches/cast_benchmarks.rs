//! Row casting performance benchmarks.
//!
//! Measures single-value casting across field types and full-row casting
//! with and without constraint checks.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use serde_json::json;

use tablecast::{RawRow, Schema};

/// Sample raw values per field type.
const SCALAR_SAMPLES: &[(&str, &str)] = &[
    ("integer", "12345"),
    ("number", "123.45"),
    ("boolean", "true"),
    ("date", "2024-01-15"),
    ("datetime", "2024-01-15T10:30:00Z"),
    ("duration", "P1Y2M3D"),
    ("string", "hello world"),
];

fn bench_cast_value(c: &mut Criterion) {
    let mut group = c.benchmark_group("cast_value");

    for (type_tag, sample) in SCALAR_SAMPLES {
        let schema = Schema::from_value(json!({
            "fields": [{"name": "value", "type": type_tag}]
        }))
        .expect("schema builds");
        let field = schema.field("value").expect("field exists");
        let raw = json!(sample);

        group.bench_function(*type_tag, |b| {
            b.iter(|| field.cast_value(black_box(&raw)))
        });
    }

    group.finish();
}

fn bench_cast_row(c: &mut Criterion) {
    let schema = Schema::from_value(json!({
        "fields": [
            {"name": "id", "type": "integer", "constraints": {"required": true}},
            {"name": "name", "type": "string", "constraints": {"pattern": "[A-Za-z ]+"}},
            {"name": "age", "type": "integer", "constraints": {"minimum": 0, "maximum": 150}},
            {"name": "joined", "type": "date"},
            {"name": "active", "type": "boolean"}
        ]
    }))
    .expect("schema builds");

    let mut row = RawRow::new();
    row.insert("id".to_string(), json!("42"));
    row.insert("name".to_string(), json!("Alice Example"));
    row.insert("age".to_string(), json!("30"));
    row.insert("joined".to_string(), json!("2024-01-15"));
    row.insert("active".to_string(), json!("true"));

    c.bench_function("cast_row_constrained", |b| {
        b.iter(|| schema.cast_row(black_box(&row)))
    });

    let plain = Schema::from_value(json!({
        "fields": [
            {"name": "id", "type": "integer"},
            {"name": "name", "type": "string"},
            {"name": "age", "type": "integer"},
            {"name": "joined", "type": "date"},
            {"name": "active", "type": "boolean"}
        ]
    }))
    .expect("schema builds");

    c.bench_function("cast_row_unconstrained", |b| {
        b.iter(|| plain.cast_row(black_box(&row)))
    });
}

criterion_group!(benches, bench_cast_value, bench_cast_row);
criterion_main!(benches);
