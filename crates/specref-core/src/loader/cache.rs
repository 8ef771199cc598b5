//! Resolution cache for fully resolved references and parsed sources
//!
//! Copyright (c) 2025 Specref Team
//! Licensed under the Apache-2.0 license

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Cache key holding the root anchor document
pub const ANCHOR_KEY: &str = "#";

/// In-memory cache owned by one resolver
///
/// `resolved` maps a reference key to content with no `$ref` left inside;
/// the entry under [`ANCHOR_KEY`] is the exception and holds the unresolved
/// root document that local pointers walk. `sources` maps an absolute file
/// path or fragment-less URL to its parsed document.
#[derive(Debug, Default)]
pub struct ReferenceCache {
    resolved: HashMap<String, Value>,
    sources: HashMap<String, Arc<Value>>,
    anchor: Option<Arc<Value>>,
    stats: CacheStats,
}

impl ReferenceCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the root anchor document
    ///
    /// Replacing the anchor with a different document drops every cached
    /// root-level local reference, since those were walked on the old one.
    pub fn set_anchor(&mut self, root: Value) -> Arc<Value> {
        if let Some(existing) = &self.anchor {
            if **existing == root {
                return Arc::clone(existing);
            }
            self.resolved.retain(|key, _| !key.starts_with('#'));
        }

        let anchor = Arc::new(root);
        self.anchor = Some(Arc::clone(&anchor));
        anchor
    }

    /// The root anchor document, if seeded
    pub fn anchor(&self) -> Option<Arc<Value>> {
        self.anchor.clone()
    }

    /// Look up a fully resolved reference
    pub fn get(&mut self, key: &str) -> Option<Value> {
        if key == ANCHOR_KEY {
            // the anchor itself is unresolved content
            return None;
        }
        match self.resolved.get(key) {
            Some(value) => {
                self.stats.hits += 1;
                Some(value.clone())
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Store a fully resolved reference
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.resolved.insert(key.into(), value);
    }

    /// Check if a reference key has a resolved entry
    pub fn contains(&self, key: &str) -> bool {
        (key == ANCHOR_KEY && self.anchor.is_some()) || self.resolved.contains_key(key)
    }

    /// Look up a parsed source document
    pub fn source(&self, location: &str) -> Option<Arc<Value>> {
        self.sources.get(location).cloned()
    }

    /// Store a parsed source document
    pub fn insert_source(&mut self, location: impl Into<String>, document: Value) -> Arc<Value> {
        let document = Arc::new(document);
        self.sources.insert(location.into(), Arc::clone(&document));
        self.stats.source_loads += 1;
        document
    }

    /// Number of resolved entries
    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    /// Whether no reference has been resolved yet
    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }

    /// Clear all entries, including the anchor
    pub fn clear(&mut self) {
        self.resolved.clear();
        self.sources.clear();
        self.anchor = None;
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.resolved.len(),
            sources: self.sources.len(),
            ..self.stats
        }
    }
}

/// Cache statistics for monitoring and debugging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Resolved references currently cached
    pub entries: usize,
    /// Parsed source documents currently cached
    pub sources: usize,
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that required resolution
    pub misses: u64,
    /// Source documents loaded from disk or network
    pub source_loads: u64,
}

impl CacheStats {
    /// Fraction of lookups answered from the cache, in percent
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}
