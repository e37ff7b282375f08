//! Descriptor source resolution and loading.

use std::fs;
use std::path::PathBuf;

use crate::error::{CastError, Result};

use super::SchemaDescriptor;

/// Resolve a descriptor source and parse it.
///
/// A source whose first non-whitespace character is `{` is inline JSON, an
/// `http(s)://` prefix is fetched over the network, anything else is read
/// as a file path.
pub fn load_descriptor(source: &str) -> Result<SchemaDescriptor> {
    if source.trim_start().starts_with('{') {
        parse_descriptor(source)
    } else if source.starts_with("http://") || source.starts_with("https://") {
        let body = fetch_url(source)?;
        parse_descriptor(&body)
    } else {
        let text = fs::read_to_string(source).map_err(|e| CastError::Io {
            path: PathBuf::from(source),
            source: e,
        })?;
        parse_descriptor(&text)
    }
}

fn parse_descriptor(text: &str) -> Result<SchemaDescriptor> {
    serde_json::from_str(text).map_err(|e| CastError::Load(format!("invalid descriptor JSON: {e}")))
}

fn fetch_url(url: &str) -> Result<String> {
    let response = reqwest::blocking::get(url)
        .map_err(|e| CastError::Load(format!("failed to fetch '{url}': {e}")))?;

    if !response.status().is_success() {
        return Err(CastError::Load(format!(
            "failed to fetch '{url}': HTTP {}",
            response.status()
        )));
    }

    response
        .text()
        .map_err(|e| CastError::Load(format!("failed to read '{url}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_json_source() {
        let descriptor = load_descriptor(r#"{"fields": [{"name": "id"}]}"#).unwrap();
        assert_eq!(descriptor.fields.len(), 1);
    }

    #[test]
    fn test_inline_json_with_leading_whitespace() {
        let descriptor = load_descriptor("  \n{\"fields\": []}").unwrap();
        assert!(descriptor.fields.is_empty());
    }

    #[test]
    fn test_invalid_inline_json() {
        let err = load_descriptor("{not json").unwrap_err();
        assert!(matches!(err, CastError::Load(_)));
    }

    #[test]
    fn test_missing_file_source() {
        let err = load_descriptor("/no/such/descriptor.json").unwrap_err();
        assert!(matches!(err, CastError::Io { .. }));
    }
}
