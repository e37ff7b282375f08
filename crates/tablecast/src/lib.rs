//! Tablecast: schema-driven casting and validation for tabular data.
//!
//! Tablecast converts loosely-typed row data (e.g. CSV cells) into
//! well-typed, constraint-checked values against a declarative schema,
//! collecting structured errors instead of failing on the first mismatch.
//! Schemas can also be inferred from sample data.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use tablecast::{CastValue, RawRow, Schema};
//!
//! let schema = Schema::from_source(r#"{
//!     "fields": [
//!         {"name": "id", "type": "integer"},
//!         {"name": "name", "type": "string"}
//!     ]
//! }"#).unwrap();
//!
//! let mut row = RawRow::new();
//! row.insert("id".to_string(), json!("42"));
//! row.insert("name".to_string(), json!("Alice"));
//!
//! let cast = schema.cast_row(&row).unwrap();
//! assert_eq!(cast["id"], CastValue::Integer(42));
//! ```

pub mod descriptor;
pub mod error;
pub mod field;
pub mod inference;
pub mod schema;
pub mod table;
pub mod value;

pub use descriptor::{Constraints, FieldDescriptor, SchemaDescriptor};
pub use error::{CastError, ErrorKind, Result, ValidationError};
pub use field::{Field, FieldType};
pub use schema::{CastRow, RawRow, Schema};
pub use table::{ReaderConfig, Table};
pub use value::{CastValue, Duration};
