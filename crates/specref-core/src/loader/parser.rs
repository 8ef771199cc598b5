//! Document parsing for JSON and YAML sources
//!
//! Copyright (c) 2025 Specref Team
//! Licensed under the Apache-2.0 license

use crate::loader::error::DocumentError;
use serde_json::Value;
use std::path::Path;

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// YAML format (.yaml, .yml)
    Yaml,
    /// JSON format (.json)
    Json,
}

impl Format {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        match extension.to_lowercase().as_str() {
            "yaml" | "yml" => Some(Format::Yaml),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

/// Parser turning raw bytes into a generic document tree
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentParser;

impl DocumentParser {
    /// Create a new document parser
    pub fn new() -> Self {
        Self
    }

    /// Parse bytes as strict JSON, falling back to YAML
    pub fn parse_bytes(&self, content: &[u8]) -> Result<(Value, Format), DocumentError> {
        if is_blank(content) {
            return Err(DocumentError::Empty);
        }

        let json_error = match serde_json::from_slice(content) {
            Ok(value) => return Ok((value, Format::Json)),
            Err(e) => e,
        };

        // Parse as a YAML value first so YAML-specific errors surface unchanged
        let yaml_value: serde_yaml::Value = match serde_yaml::from_slice(content) {
            Ok(value) => value,
            Err(yaml) => {
                return Err(DocumentError::Yaml {
                    json: json_error,
                    yaml,
                })
            }
        };

        // Convert to JSON Value for consistent handling
        serde_json::to_value(yaml_value)
            .map(|value| (value, Format::Yaml))
            .map_err(DocumentError::Conversion)
    }

    /// Parse bytes as strict JSON only
    pub fn parse_json(&self, content: &[u8]) -> Result<Value, DocumentError> {
        if is_blank(content) {
            return Err(DocumentError::Empty);
        }
        serde_json::from_slice(content).map_err(DocumentError::Json)
    }
}

/// Heuristic format sniffing: anything not opening with `{` or `[` looks like YAML
pub fn looks_like_yaml(content: &[u8]) -> bool {
    match content.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'{') | Some(b'[') => false,
        _ => true,
    }
}

fn is_blank(content: &[u8]) -> bool {
    content.iter().all(|b| b.is_ascii_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path(Path::new("test.yaml")), Some(Format::Yaml));
        assert_eq!(Format::from_path(Path::new("test.YML")), Some(Format::Yaml));
        assert_eq!(Format::from_path(Path::new("test.json")), Some(Format::Json));

        assert_eq!(Format::from_path(Path::new("test.txt")), None);
        assert_eq!(Format::from_path(Path::new("test")), None);
    }

    #[test]
    fn test_json_first() {
        let parser = DocumentParser::new();
        let (value, format) = parser.parse_bytes(br#"{"a": {"b": 42}}"#).unwrap();
        assert_eq!(format, Format::Json);
        assert_eq!(value, json!({"a": {"b": 42}}));
    }

    #[test]
    fn test_yaml_fallback() {
        let parser = DocumentParser::new();
        let content = b"
asyncapi: '2.6.0'
components:
  schemas:
    User:
      type: object
      required: [name]
";
        let (value, format) = parser.parse_bytes(content).unwrap();
        assert_eq!(format, Format::Yaml);
        assert_eq!(value["asyncapi"], "2.6.0");
        assert_eq!(value["components"]["schemas"]["User"]["required"], json!(["name"]));
    }

    #[test]
    fn test_yaml_ref_key() {
        let parser = DocumentParser::new();
        let (value, _) = parser.parse_bytes(b"payload:\n  $ref: './user.yaml'\n").unwrap();
        assert_eq!(value["payload"]["$ref"], "./user.yaml");
    }

    #[test]
    fn test_both_formats_fail() {
        let parser = DocumentParser::new();
        let err = parser.parse_bytes(b"key: [unclosed").unwrap_err();
        assert!(matches!(err, DocumentError::Yaml { .. }));
        assert!(err.to_string().contains("JSON attempt"));
    }

    #[test]
    fn test_empty_input() {
        let parser = DocumentParser::new();
        assert!(matches!(parser.parse_bytes(b"  \n"), Err(DocumentError::Empty)));
        assert!(matches!(parser.parse_json(b""), Err(DocumentError::Empty)));
    }

    #[test]
    fn test_strict_json() {
        let parser = DocumentParser::new();
        assert!(parser.parse_json(br#"{"type": "string"}"#).is_ok());
        assert!(matches!(
            parser.parse_json(b"type: string"),
            Err(DocumentError::Json(_))
        ));
    }

    #[test]
    fn test_yaml_sniffing() {
        assert!(!looks_like_yaml(b"  {\"a\": 1}"));
        assert!(!looks_like_yaml(b"\n[1, 2]"));
        assert!(looks_like_yaml(b"asyncapi: 2.0.0"));
        assert!(looks_like_yaml(b"---\na: 1"));
    }
}
