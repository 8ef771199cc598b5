//! Classification of `$ref` strings
//!
//! Copyright (c) 2025 Specref Team
//! Licensed under the Apache-2.0 license

use serde_json::Value;
use std::collections::BTreeSet;

/// Key marking a reference node
pub const REF_KEY: &str = "$ref";

/// A reference string, classified by prefix
///
/// Classification is total: every string is exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference<'a> {
    /// `#...`, resolved against the current anchor document
    Local { fragment: &'a str },
    /// `http://...` or `https://...`
    Remote { url: &'a str },
    /// Anything else, a path with an optional `#fragment`
    File {
        path: &'a str,
        fragment: Option<&'a str>,
    },
}

impl<'a> Reference<'a> {
    /// Classify a raw reference string
    pub fn classify(raw: &'a str) -> Self {
        if let Some(fragment) = raw.strip_prefix('#') {
            Reference::Local { fragment }
        } else if raw.starts_with("http://") || raw.starts_with("https://") {
            Reference::Remote { url: raw }
        } else {
            match raw.split_once('#') {
                Some((path, fragment)) => Reference::File {
                    path,
                    fragment: Some(fragment),
                },
                None => Reference::File {
                    path: raw,
                    fragment: None,
                },
            }
        }
    }

    /// Short label for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Reference::Local { .. } => "local",
            Reference::Remote { .. } => "remote",
            Reference::File { .. } => "file",
        }
    }
}

/// Collect every `$ref` string present in a tree
///
/// Non-string `$ref` values are skipped. Siblings of a reference node are not
/// visited, matching what resolution would replace.
pub fn collect_references(value: &Value) -> BTreeSet<String> {
    let mut references = BTreeSet::new();
    collect_recursive(value, &mut references);
    references
}

fn collect_recursive(value: &Value, references: &mut BTreeSet<String>) {
    match value {
        Value::Object(obj) => {
            if let Some(ref_value) = obj.get(REF_KEY) {
                if let Some(ref_str) = ref_value.as_str() {
                    references.insert(ref_str.to_string());
                }
                return;
            }
            for val in obj.values() {
                collect_recursive(val, references);
            }
        }
        Value::Array(arr) => {
            for item in arr {
                collect_recursive(item, references);
            }
        }
        _ => {}
    }
}
