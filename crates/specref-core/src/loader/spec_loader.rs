//! Top-level entry point: parse a document and resolve its references
//!
//! Copyright (c) 2025 Specref Team
//! Licensed under the Apache-2.0 license

use crate::loader::{
    config::ResolverConfig,
    error::{ResolutionError, ResolutionResult},
    parser::{DocumentParser, Format},
    reference::collect_references,
    resolver::ReferenceResolver,
};
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Options for parsing an in-memory document
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Path of the file the bytes came from, used to resolve relative refs
    pub file_path: Option<PathBuf>,
    /// Explicit base directory; overrides the directory of `file_path`
    pub base_dir: Option<PathBuf>,
}

impl ParseOptions {
    /// Options for bytes read from `path`
    pub fn for_file(path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: Some(path.into()),
            base_dir: None,
        }
    }

    /// Base directory for top-level relative file references
    pub fn base_dir(&self) -> PathBuf {
        if let Some(base_dir) = &self.base_dir {
            return base_dir.clone();
        }
        self.file_path
            .as_deref()
            .and_then(Path::parent)
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// A parsed and fully resolved document
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDocument {
    /// The resolved tree, free of `$ref` nodes
    pub content: Value,
    /// Format the top-level document was parsed as
    pub format: Format,
    /// Reference strings present in the unresolved document
    pub references: BTreeSet<String>,
}

/// Loader tying parsing and resolution together
#[derive(Debug, Clone, Default)]
pub struct SpecLoader {
    config: ResolverConfig,
    parser: DocumentParser,
}

impl SpecLoader {
    /// Create a loader with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader with custom resolver configuration
    pub fn with_config(config: ResolverConfig) -> Self {
        Self {
            config,
            parser: DocumentParser::new(),
        }
    }

    /// Get current configuration
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Read a file, parse it and resolve its references
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load_file(&self, path: &Path) -> ResolutionResult<LoadedDocument> {
        let data = std::fs::read(path).map_err(|source| ResolutionError::Source {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_bytes(&data, &ParseOptions::for_file(path))
    }

    /// Parse bytes and resolve their references
    pub fn load_bytes(&self, data: &[u8], options: &ParseOptions) -> ResolutionResult<LoadedDocument> {
        let (root, format) = self.parse(data, options)?;
        let references = self.references(&root);

        let base_dir = options.base_dir();
        let mut resolver = ReferenceResolver::with_config(&base_dir, self.config.clone());
        let content = resolver.resolve_refs(&root)?;

        info!(
            base_dir = %base_dir.display(),
            references = references.len(),
            sources = resolver.cache_stats().sources,
            "Document resolved"
        );

        Ok(LoadedDocument {
            content,
            format,
            references,
        })
    }

    /// Collect every `$ref` string present in an unresolved tree
    pub fn references(&self, document: &Value) -> BTreeSet<String> {
        collect_references(document)
    }

    /// Parse bytes without resolving references
    pub fn parse(&self, data: &[u8], options: &ParseOptions) -> ResolutionResult<(Value, Format)> {
        self.parser.parse_bytes(data).map_err(|e| {
            let source = options
                .file_path
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<memory>".to_string());
            ResolutionError::parse(source, e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_base_dir_from_options() {
        assert_eq!(ParseOptions::default().base_dir(), PathBuf::from("."));
        assert_eq!(ParseOptions::for_file("spec.yaml").base_dir(), PathBuf::from("."));
        assert_eq!(
            ParseOptions::for_file("/specs/api/asyncapi.yaml").base_dir(),
            PathBuf::from("/specs/api")
        );

        let options = ParseOptions {
            file_path: Some(PathBuf::from("/specs/api/asyncapi.yaml")),
            base_dir: Some(PathBuf::from("/shared")),
        };
        assert_eq!(options.base_dir(), PathBuf::from("/shared"));
    }

    #[test]
    fn test_load_bytes_local_refs() {
        let loader = SpecLoader::new();
        let data = br##"{
            "channels": {"user/signup": {"publish": {"message": {"$ref": "#/components/messages/Signup"}}}},
            "components": {"messages": {"Signup": {"payload": {"type": "string"}}}}
        }"##;

        let loaded = loader.load_bytes(data, &ParseOptions::default()).unwrap();
        assert_eq!(loaded.format, Format::Json);
        assert_eq!(
            loaded.content["channels"]["user/signup"]["publish"]["message"],
            json!({"payload": {"type": "string"}})
        );
        assert!(loaded.references.contains("#/components/messages/Signup"));
    }

    #[test]
    fn test_load_yaml_file_with_relative_refs() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let specs = dir.path().join("specs");
        fs::create_dir_all(specs.join("schemas"))?;

        fs::write(
            specs.join("asyncapi.yaml"),
            "asyncapi: '2.6.0'\ncomponents:\n  schemas:\n    User:\n      $ref: './schemas/user.yaml'\n",
        )?;
        fs::write(
            specs.join("schemas/user.yaml"),
            "type: object\nproperties:\n  email:\n    $ref: './email.json'\n",
        )?;
        fs::write(
            specs.join("schemas/email.json"),
            r#"{"type": "string", "format": "email"}"#,
        )?;

        let loaded = SpecLoader::new().load_file(&specs.join("asyncapi.yaml"))?;
        assert_eq!(loaded.format, Format::Yaml);
        assert_eq!(
            loaded.content["components"]["schemas"]["User"]["properties"]["email"],
            json!({"type": "string", "format": "email"})
        );
        Ok(())
    }

    #[test]
    fn test_load_missing_file() {
        let err = SpecLoader::new()
            .load_file(Path::new("/definitely/not/here.yaml"))
            .unwrap_err();
        assert!(matches!(err, ResolutionError::Source { .. }));
    }

    #[test]
    fn test_parse_error_names_source() {
        let err = SpecLoader::new()
            .load_bytes(b"a: [", &ParseOptions::for_file("broken.yaml"))
            .unwrap_err();
        assert_eq!(err.reference(), Some("broken.yaml"));
    }
}
