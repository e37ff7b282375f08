//! CSV-backed table reading and row casting.
//!
//! A thin convenience over the casting core: records are zipped with the
//! header row into raw rows and streamed through `Schema::cast_row`. The
//! core itself stays I/O-free.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{Result, ValidationError};
use crate::schema::{CastRow, RawRow, Schema};

/// Reader configuration for delimited files.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Field delimiter.
    pub delimiter: u8,
    /// Whether the file starts with a header row. Without one, the
    /// schema's field names are used positionally.
    pub has_headers: bool,
    /// Quote character.
    pub quote: u8,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_headers: true,
            quote: b'"',
        }
    }
}

/// A delimited file bound to a schema.
pub struct Table {
    schema: Schema,
    path: PathBuf,
    config: ReaderConfig,
}

impl Table {
    /// Bind a file to a schema with the default reader configuration.
    ///
    /// No I/O happens until `read` or `validate` is called.
    pub fn new(path: impl AsRef<Path>, schema: Schema) -> Self {
        Self {
            schema,
            path: path.as_ref().to_path_buf(),
            config: ReaderConfig::default(),
        }
    }

    /// Use a custom reader configuration.
    pub fn with_config(mut self, config: ReaderConfig) -> Self {
        self.config = config;
        self
    }

    /// The bound schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Read and cast every record.
    ///
    /// Fails on the first record whose cast fails, carrying that row's full
    /// error list.
    pub fn read(&self) -> Result<Vec<CastRow>> {
        let mut cast_rows = Vec::new();
        for row in self.raw_rows()? {
            cast_rows.push(self.schema.cast_row(&row)?);
        }
        Ok(cast_rows)
    }

    /// Cast every record and merge all validation errors.
    ///
    /// Only I/O and parse failures fail the call itself.
    pub fn validate(&self) -> Result<Vec<ValidationError>> {
        let mut errors = Vec::new();
        for row in self.raw_rows()? {
            errors.extend(self.schema.validate_row(&row));
        }
        Ok(errors)
    }

    /// Infer a schema from a delimited file's contents.
    pub fn infer(path: impl AsRef<Path>, config: &ReaderConfig) -> Result<Schema> {
        let (headers, rows) = read_raw(path.as_ref(), config, None)?;
        Schema::infer(&headers, &rows)
    }

    fn raw_rows(&self) -> Result<Vec<RawRow>> {
        let header_names = if self.config.has_headers {
            None
        } else {
            Some(
                self.schema
                    .field_names()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            )
        };
        let (headers, rows) = read_raw(&self.path, &self.config, header_names)?;

        Ok(rows
            .into_iter()
            .map(|values| {
                headers
                    .iter()
                    .cloned()
                    .zip(values)
                    .collect::<RawRow>()
            })
            .collect())
    }
}

/// Read headers and string-valued rows from a delimited file.
///
/// Short records pad with null so every row has one value per header.
fn read_raw(
    path: &Path,
    config: &ReaderConfig,
    header_names: Option<Vec<String>>,
) -> Result<(Vec<String>, Vec<Vec<Value>>)> {
    let has_headers = config.has_headers && header_names.is_none();
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(has_headers)
        .quote(config.quote)
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = match header_names {
        Some(names) => names,
        None => reader.headers()?.iter().map(str::to_string).collect(),
    };

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let row: Vec<Value> = (0..headers.len())
            .map(|i| {
                record
                    .get(i)
                    .map(|s| Value::String(s.to_string()))
                    .unwrap_or(Value::Null)
            })
            .collect();
        rows.push(row);
    }

    Ok((headers, rows))
}
