//! I/O seam for reading referenced files and fetching remote documents
//!
//! Copyright (c) 2025 Specref Team
//! Licensed under the Apache-2.0 license

use crate::loader::config::ResolverConfig;
use crate::loader::error::FetchError;
use reqwest::blocking::Client;
use std::path::Path;
use std::sync::OnceLock;
use tracing::trace;
use url::Url;

/// Source of raw document bytes
///
/// Both calls block the current thread.
pub trait DocumentFetcher {
    /// Read a file from disk
    fn read_file(&self, path: &Path) -> std::io::Result<Vec<u8>>;

    /// Perform an HTTP GET and return the response body
    fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError>;
}

/// Filesystem and blocking HTTP fetcher
#[derive(Debug)]
pub struct DefaultFetcher {
    config: ResolverConfig,
    client: OnceLock<Client>,
}

impl DefaultFetcher {
    /// Create a fetcher; the HTTP client is built on first use
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            client: OnceLock::new(),
        }
    }

    fn client(&self) -> Result<&Client, FetchError> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }

        // an unset timeout also lifts the blocking client's 30s default
        let client = Client::builder()
            .user_agent(self.config.user_agent.clone())
            .timeout(self.config.http_timeout())
            .build()?;

        Ok(self.client.get_or_init(|| client))
    }
}

impl Default for DefaultFetcher {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

impl DocumentFetcher for DefaultFetcher {
    fn read_file(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        trace!(path = %path.display(), "Reading referenced file");
        std::fs::read(path)
    }

    fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        if !self.config.remote_enabled {
            return Err(FetchError::Disabled);
        }

        trace!(%url, "Fetching remote document");
        let response = self.client()?.get(url.clone()).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(response.bytes()?.to_vec())
    }
}
