//! Specref Core - `$ref` resolution for JSON and YAML specification documents
//!
//! This crate takes a generic document tree (as produced from JSON or YAML)
//! and replaces every `{"$ref": "..."}` node with the content it points to,
//! so downstream consumers never see unresolved pointers.
//!
//! ## Features
//!
//! - **Local references**: `#/components/schemas/User`, JSON pointer escapes included
//! - **File references**: `./schemas/user.yaml#/User`, relative to the referencing file
//! - **Remote references**: `https://example.com/common.json#/Id` over blocking HTTP
//! - **Cycle detection**: a reference revisited on its own chain is a hard error
//! - **Caching**: each reference is resolved and each source is read once per resolver
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use specref_core::SpecLoader;
//! use std::path::Path;
//!
//! let loader = SpecLoader::new();
//! let document = loader.load_file(Path::new("asyncapi.yaml"))?;
//! println!("{}", serde_json::to_string_pretty(&document.content)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Copyright (c) 2025 Specref Team
//! Licensed under the Apache-2.0 license

pub mod loader;

// Re-export commonly used types for convenience
pub use loader::{
    collect_references, CacheStats, CancellationToken, DefaultFetcher, DocumentFetcher,
    DocumentParser, Format, LoadedDocument, ParseOptions, ReferenceResolver, ResolutionError,
    ResolutionResult, ResolverConfig, SpecLoader,
};
