//! Error types for document loading and reference resolution
//!
//! Copyright (c) 2025 Specref Team
//! Licensed under the Apache-2.0 license

use std::path::PathBuf;
use thiserror::Error;

/// Result type for resolution operations
pub type ResolutionResult<T> = Result<T, ResolutionError>;

/// Failure to turn raw bytes into a document tree
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The input was empty or whitespace only
    #[error("document is empty")]
    Empty,

    /// Strict JSON parsing failed and no fallback was attempted
    #[error("invalid JSON: {0}")]
    Json(#[source] serde_json::Error),

    /// Neither JSON nor YAML could parse the input
    #[error("invalid YAML: {yaml} (JSON attempt: {json})")]
    Yaml {
        json: serde_json::Error,
        #[source]
        yaml: serde_yaml::Error,
    },

    /// YAML parsed but could not be represented as a JSON tree
    #[error("YAML document cannot be represented as JSON: {0}")]
    Conversion(#[source] serde_json::Error),
}

/// Failure of the transport layer while fetching a remote document
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("server responded with status {0}")]
    Status(u16),

    /// Remote references are disabled in the resolver configuration
    #[error("remote references are disabled")]
    Disabled,
}

/// Why a reference target could not be found
#[derive(Error, Debug)]
pub enum LookupError {
    /// A pointer segment named a key that does not exist
    #[error("'{segment}' not found")]
    MissingSegment { segment: String },

    /// A pointer segment tried to descend into something that is not an object
    #[error("'{segment}' is not an object")]
    NotAnObject { segment: String },

    /// The fragment is not a JSON pointer
    #[error("fragment '{fragment}' must be empty or start with '/'")]
    InvalidPointer { fragment: String },

    /// A referenced file could not be read
    #[error("failed to read file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A remote reference is not a valid URL
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A remote document could not be fetched
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },
}

/// Errors surfaced by the reference resolver
#[derive(Error, Debug)]
pub enum ResolutionError {
    /// A referenced source held a malformed JSON or YAML body
    #[error("failed to parse '{reference}': {source}")]
    Parse {
        reference: String,
        #[source]
        source: DocumentError,
    },

    /// A `$ref` value was not a string
    ///
    /// `pointer` locates the offending node inside the target of `within`,
    /// or inside the root document when `within` is unset.
    #[error(
        "$ref value must be a string at '{pointer}'{}, got {found}",
        within.as_deref().map(|key| format!(" within '{key}'")).unwrap_or_default()
    )]
    ReferenceType {
        found: String,
        pointer: String,
        within: Option<String>,
    },

    /// The reference target does not exist or could not be reached
    #[error("failed to resolve reference '{reference}': {source}")]
    ReferenceNotFound {
        reference: String,
        #[source]
        source: LookupError,
    },

    /// The reference was revisited on the active resolution chain
    #[error("circular reference detected: {reference} (chain: {})", chain.join(" -> "))]
    CircularReference {
        reference: String,
        chain: Vec<String>,
    },

    /// The chain of nested references grew past the configured limit
    #[error(
        "reference nesting exceeds {max_depth} levels at '{reference}' (chain starts at {})",
        chain.first().map(String::as_str).unwrap_or("")
    )]
    DepthExceeded {
        reference: String,
        max_depth: usize,
        chain: Vec<String>,
    },

    /// Resolution was cancelled before the reference could be resolved
    #[error("resolution cancelled at reference '{reference}'")]
    Cancelled { reference: String },

    /// The top-level document could not be read
    #[error("failed to read '{}': {source}", path.display())]
    Source {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ResolutionError {
    /// Create a parse error for a referenced source
    pub fn parse(reference: impl Into<String>, source: DocumentError) -> Self {
        Self::Parse {
            reference: reference.into(),
            source,
        }
    }

    /// Create a type error from the offending `$ref` value and its location
    pub fn reference_type(
        value: &serde_json::Value,
        pointer: impl Into<String>,
        within: Option<&str>,
    ) -> Self {
        let found = match value {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "boolean",
            serde_json::Value::Number(_) => "number",
            serde_json::Value::String(_) => "string",
            serde_json::Value::Array(_) => "array",
            serde_json::Value::Object(_) => "object",
        };
        Self::ReferenceType {
            found: format!("{} ({})", found, value),
            pointer: pointer.into(),
            within: within.map(str::to_string),
        }
    }

    /// Create a not-found error
    pub fn not_found(reference: impl Into<String>, source: LookupError) -> Self {
        Self::ReferenceNotFound {
            reference: reference.into(),
            source,
        }
    }

    /// Create a circular reference error from the active chain
    pub fn circular(reference: impl Into<String>, chain: Vec<String>) -> Self {
        Self::CircularReference {
            reference: reference.into(),
            chain,
        }
    }

    /// The reference string this error is about, if any
    pub fn reference(&self) -> Option<&str> {
        match self {
            Self::Parse { reference, .. }
            | Self::ReferenceNotFound { reference, .. }
            | Self::CircularReference { reference, .. }
            | Self::DepthExceeded { reference, .. }
            | Self::Cancelled { reference } => Some(reference),
            Self::ReferenceType { .. } | Self::Source { .. } => None,
        }
    }

    /// Check if this error is a cycle in the reference graph
    pub fn is_circular(&self) -> bool {
        matches!(self, Self::CircularReference { .. })
    }
}
