//! JSON pointer decoding and lookup for local reference fragments
//!
//! Copyright (c) 2025 Specref Team
//! Licensed under the Apache-2.0 license

use crate::loader::error::LookupError;
use serde_json::Value;

/// A decoded JSON pointer (RFC 6901), taken from a reference fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPointer {
    segments: Vec<String>,
}

impl JsonPointer {
    /// Parse the fragment part of a reference, without the leading `#`
    ///
    /// An empty fragment addresses the whole document.
    pub fn from_fragment(fragment: &str) -> Result<Self, LookupError> {
        if fragment.is_empty() {
            return Ok(Self { segments: Vec::new() });
        }

        let rest = fragment
            .strip_prefix('/')
            .ok_or_else(|| LookupError::InvalidPointer {
                fragment: fragment.to_string(),
            })?;

        Ok(Self {
            segments: rest.split('/').map(unescape_segment).collect(),
        })
    }

    /// Decoded segments of this pointer
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Walk `document` segment by segment
    pub fn resolve<'a>(&self, document: &'a Value) -> Result<&'a Value, LookupError> {
        let mut current = document;

        for segment in &self.segments {
            match current {
                Value::Object(obj) => {
                    current = obj.get(segment).ok_or_else(|| LookupError::MissingSegment {
                        segment: segment.clone(),
                    })?;
                }
                _ => {
                    return Err(LookupError::NotAnObject {
                        segment: segment.clone(),
                    })
                }
            }
        }

        Ok(current)
    }
}

/// Decode one pointer segment: `~1` becomes `/` first, then `~0` becomes `~`
pub fn unescape_segment(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

/// Encode a key for use as a pointer segment
pub fn escape_segment(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}
