//! Document loading and `$ref` resolution
//!
//! This module provides:
//! - JSON parsing with YAML fallback
//! - Local, file and remote reference resolution
//! - A resolution cache keyed by reference
//! - Circular reference detection along the active resolution chain
//!
//! # Example Usage
//!
//! ```rust
//! use serde_json::json;
//! use specref_core::loader::ReferenceResolver;
//!
//! let root = json!({
//!     "components": {"schemas": {"Id": {"type": "integer"}}},
//!     "payload": {"$ref": "#/components/schemas/Id"}
//! });
//!
//! let mut resolver = ReferenceResolver::new(".");
//! let resolved = resolver.resolve_refs(&root)?;
//! assert_eq!(resolved["payload"], json!({"type": "integer"}));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Copyright (c) 2025 Specref Team
//! Licensed under the Apache-2.0 license

pub mod cache;
pub mod cancel;
pub mod config;
pub mod error;
pub mod fetch;
pub mod parser;
pub mod pointer;
pub mod reference;
pub mod resolver;
pub mod spec_loader;

pub use cache::{CacheStats, ReferenceCache, ANCHOR_KEY};
pub use cancel::CancellationToken;
pub use config::{ResolverConfig, DEFAULT_MAX_DEPTH};
pub use error::{DocumentError, FetchError, LookupError, ResolutionError, ResolutionResult};
pub use fetch::{DefaultFetcher, DocumentFetcher};
pub use parser::{looks_like_yaml, DocumentParser, Format};
pub use pointer::JsonPointer;
pub use reference::{collect_references, Reference, REF_KEY};
pub use resolver::{Location, ReferenceResolver, ResolverContext};
pub use spec_loader::{LoadedDocument, ParseOptions, SpecLoader};
