//! Resolver configuration
//!
//! Copyright (c) 2025 Specref Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for reference resolution behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Whether `http://` and `https://` references may be fetched
    pub remote_enabled: bool,
    /// Timeout for a single HTTP GET; no timeout when unset
    pub http_timeout_secs: Option<u64>,
    /// User agent sent with remote fetches
    pub user_agent: String,
    /// Longest chain of nested references followed before giving up
    pub max_depth: usize,
}

/// Default limit on nested reference depth
pub const DEFAULT_MAX_DEPTH: usize = 128;

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            remote_enabled: true,
            http_timeout_secs: None,
            user_agent: format!("specref/{}", env!("CARGO_PKG_VERSION")),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ResolverConfig {
    /// HTTP timeout as a duration
    pub fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout_secs.map(Duration::from_secs)
    }
}
