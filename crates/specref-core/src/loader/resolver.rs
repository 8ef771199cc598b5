//! Reference resolution
//!
//! This module handles:
//! - `$ref` node detection and full-replacement substitution
//! - Local, file and remote reference resolution
//! - Relative path tracking across nested files
//! - Circular reference detection along the active resolution chain
//!
//! Copyright (c) 2025 Specref Team
//! Licensed under the Apache-2.0 license

use crate::loader::cache::{CacheStats, ReferenceCache};
use crate::loader::cancel::CancellationToken;
use crate::loader::config::{ResolverConfig, DEFAULT_MAX_DEPTH};
use crate::loader::error::{LookupError, ResolutionError, ResolutionResult};
use crate::loader::fetch::{DefaultFetcher, DocumentFetcher};
use crate::loader::parser::DocumentParser;
use crate::loader::pointer::{escape_segment, JsonPointer};
use crate::loader::reference::{Reference, REF_KEY};
use serde_json::{Map, Value};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, instrument, trace};
use url::Url;

/// Where the document being walked came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// The caller's root document; relative paths resolve against the base path
    Root,
    /// A file loaded through a file reference
    File(PathBuf),
    /// A document fetched through a remote reference, without fragment
    Remote(Url),
}

/// One reference key on the active chain, linked to the one that led to it
#[derive(Debug)]
struct ChainLink {
    key: String,
    parent: Option<Arc<ChainLink>>,
}

/// Context for one step of resolution
///
/// Passed by reference down the recursion and extended on descent into a
/// reference, so unrelated branches never share a resolution chain and the
/// caller's location is restored simply by returning. The chain is a shared
/// list: descending adds one link and never copies the links above it.
#[derive(Debug, Clone)]
pub struct ResolverContext {
    location: Location,
    anchor: Arc<Value>,
    chain: Option<Arc<ChainLink>>,
    depth: usize,
}

impl ResolverContext {
    /// Create the context for a root document
    pub fn root(anchor: Arc<Value>) -> Self {
        Self {
            location: Location::Root,
            anchor,
            chain: None,
            depth: 0,
        }
    }

    /// The location of the document currently being walked
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// The file currently being processed, if any
    pub fn current_file(&self) -> Option<&Path> {
        match &self.location {
            Location::File(path) => Some(path),
            _ => None,
        }
    }

    /// Reference keys on the active resolution chain, outermost first
    pub fn chain(&self) -> Vec<String> {
        let mut chain: Vec<String> = self.keys().map(str::to_string).collect();
        chain.reverse();
        chain
    }

    /// Number of references on the active chain
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The innermost reference key being resolved, if any
    pub fn current_key(&self) -> Option<&str> {
        self.chain.as_deref().map(|link| link.key.as_str())
    }

    /// Chain keys, innermost first
    fn keys(&self) -> impl Iterator<Item = &str> {
        std::iter::successors(self.chain.as_deref(), |link| link.parent.as_deref())
            .map(|link| link.key.as_str())
    }

    /// Extend the chain with `key`
    ///
    /// Fails if `key` is already on the chain, or if the chain would grow
    /// past `max_depth`.
    fn enter(&self, key: &str, reference: &str, max_depth: usize) -> ResolutionResult<Self> {
        let revisited = self.keys().any(|visited| visited == key);

        let child = Self {
            location: self.location.clone(),
            anchor: Arc::clone(&self.anchor),
            chain: Some(Arc::new(ChainLink {
                key: key.to_string(),
                parent: self.chain.clone(),
            })),
            depth: self.depth + 1,
        };

        if revisited {
            return Err(ResolutionError::circular(reference, child.chain()));
        }
        if child.depth > max_depth {
            return Err(ResolutionError::DepthExceeded {
                reference: reference.to_string(),
                max_depth,
                chain: self.chain(),
            });
        }
        Ok(child)
    }

    /// Switch to a freshly loaded document, keeping the chain
    fn with_document(self, location: Location, anchor: Arc<Value>) -> Self {
        Self {
            location,
            anchor,
            ..self
        }
    }
}

/// A classified reference with its location made absolute
#[derive(Debug)]
enum Target<'a> {
    Local { fragment: &'a str },
    File { path: PathBuf, fragment: Option<&'a str> },
    Remote { url: Url, fragment: Option<String> },
}

/// Reference resolver for `$ref` pointers
///
/// One resolver owns one cache; it is not meant to be shared between
/// concurrent resolutions.
#[derive(Debug)]
pub struct ReferenceResolver<F = DefaultFetcher> {
    base_path: PathBuf,
    parser: DocumentParser,
    cache: ReferenceCache,
    fetcher: F,
    cancellation: Option<CancellationToken>,
    max_depth: usize,
}

impl ReferenceResolver<DefaultFetcher> {
    /// Create a resolver with default configuration
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self::with_config(base_path, ResolverConfig::default())
    }

    /// Create a resolver with custom configuration
    pub fn with_config(base_path: impl Into<PathBuf>, config: ResolverConfig) -> Self {
        let max_depth = config.max_depth;
        Self::with_fetcher(base_path, DefaultFetcher::new(config)).with_max_depth(max_depth)
    }
}

impl<F: DocumentFetcher> ReferenceResolver<F> {
    /// Create a resolver reading documents through `fetcher`
    pub fn with_fetcher(base_path: impl Into<PathBuf>, fetcher: F) -> Self {
        Self {
            base_path: base_path.into(),
            parser: DocumentParser::new(),
            cache: ReferenceCache::new(),
            fetcher,
            cancellation: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Limit how many references may be nested inside one another
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Attach a cancellation token checked before each reference is fetched
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Base path for top-level relative file references
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// The fetcher used for file and remote reads
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// The resolution cache
    pub fn cache(&self) -> &ReferenceCache {
        &self.cache
    }

    /// Get cache statistics
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Clear the resolution cache, including the root anchor
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Seed the root anchor that local pointers resolve against
    pub fn seed_anchor(&mut self, root: Value) {
        self.cache.set_anchor(root);
    }

    /// Resolve every `$ref` in `root`, returning a tree without references
    ///
    /// `root` also becomes the anchor document for local pointers.
    #[instrument(skip(self, root), fields(base_path = %self.base_path.display()))]
    pub fn resolve_refs(&mut self, root: &Value) -> ResolutionResult<Value> {
        let anchor = self.cache.set_anchor(root.clone());
        let context = ResolverContext::root(anchor);
        let resolved = self.resolve_value(root, &context, &mut Vec::new())?;

        let stats = self.cache.stats();
        debug!(
            entries = stats.entries,
            hits = stats.hits,
            sources = stats.sources,
            "Reference resolution completed"
        );
        Ok(resolved)
    }

    /// Resolve a single reference string against the seeded anchor
    pub fn resolve_reference(&mut self, reference: &str) -> ResolutionResult<Value> {
        let anchor = self
            .cache
            .anchor()
            .unwrap_or_else(|| Arc::new(Value::Null));
        let context = ResolverContext::root(anchor);
        self.resolve_ref(reference, &context)
    }

    /// Walk a tree, substituting every reference node
    ///
    /// `path` holds the keys leading to `value` from the start of the walk.
    fn resolve_value(
        &mut self,
        value: &Value,
        context: &ResolverContext,
        path: &mut Vec<String>,
    ) -> ResolutionResult<Value> {
        match value {
            Value::Object(obj) => {
                // Sibling keys of a reference node are dropped
                if let Some(ref_value) = obj.get(REF_KEY) {
                    let reference = ref_value.as_str().ok_or_else(|| {
                        ResolutionError::reference_type(
                            ref_value,
                            pointer_to(path),
                            context.current_key(),
                        )
                    })?;
                    return self.resolve_ref(reference, context);
                }

                let mut resolved = Map::with_capacity(obj.len());
                for (key, val) in obj {
                    path.push(key.clone());
                    let item = self.resolve_value(val, context, path);
                    path.pop();
                    resolved.insert(key.clone(), item?);
                }
                Ok(Value::Object(resolved))
            }
            Value::Array(arr) => {
                let mut resolved = Vec::with_capacity(arr.len());
                for (index, item) in arr.iter().enumerate() {
                    path.push(index.to_string());
                    let item = self.resolve_value(item, context, path);
                    path.pop();
                    resolved.push(item?);
                }
                Ok(Value::Array(resolved))
            }
            _ => Ok(value.clone()),
        }
    }

    /// Resolve one reference string to fully resolved content
    fn resolve_ref(&mut self, reference: &str, context: &ResolverContext) -> ResolutionResult<Value> {
        let (target, key) = self.target(reference, context)?;

        if let Some(cached) = self.cache.get(&key) {
            trace!(reference, key = %key, "Reference cache hit");
            return Ok(cached);
        }

        if self
            .cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
        {
            return Err(ResolutionError::Cancelled {
                reference: reference.to_string(),
            });
        }

        let child = context.enter(&key, reference, self.max_depth)?;
        debug!(reference, key = %key, depth = child.depth, "Resolving reference");

        let resolved = match target {
            Target::Local { fragment } => {
                let found = lookup(&child.anchor, fragment, reference)?;
                self.resolve_value(found, &child, &mut Vec::new())?
            }
            Target::File { path, fragment } => {
                let document = self.load_file(&path, reference)?;
                let child = child.with_document(Location::File(path), document);
                let found = lookup(&child.anchor, fragment.unwrap_or(""), reference)?;
                self.resolve_value(found, &child, &mut Vec::new())?
            }
            Target::Remote { url, fragment } => {
                let document = self.load_remote(&url, reference)?;
                let child = child.with_document(Location::Remote(url), document);
                let found = lookup(&child.anchor, fragment.as_deref().unwrap_or(""), reference)?;
                self.resolve_value(found, &child, &mut Vec::new())?
            }
        };

        self.cache.insert(key, resolved.clone());
        Ok(resolved)
    }

    /// Make a reference absolute relative to the current location
    ///
    /// Returns the target and its cache key: the literal reference for
    /// root-level local pointers and remote URLs, otherwise the reference
    /// qualified by the file or URL it resolves against.
    fn target<'a>(
        &self,
        reference: &'a str,
        context: &ResolverContext,
    ) -> ResolutionResult<(Target<'a>, String)> {
        match Reference::classify(reference) {
            Reference::Local { fragment } => {
                let key = match &context.location {
                    Location::Root => reference.to_string(),
                    Location::File(path) => format!("{}{}", path.display(), reference),
                    Location::Remote(url) => format!("{}{}", url, reference),
                };
                Ok((Target::Local { fragment }, key))
            }
            Reference::Remote { url } => {
                let url = Url::parse(url)
                    .map_err(|e| ResolutionError::not_found(reference, LookupError::InvalidUrl(e)))?;
                let (url, fragment) = split_url_fragment(url, reference)?;
                Ok((Target::Remote { url, fragment }, reference.to_string()))
            }
            Reference::File { path, fragment } => match &context.location {
                Location::Remote(base) => {
                    // relative references inside a remote document stay remote
                    let url = base
                        .join(reference)
                        .map_err(|e| ResolutionError::not_found(reference, LookupError::InvalidUrl(e)))?;
                    let key = url.to_string();
                    let (url, fragment) = split_url_fragment(url, reference)?;
                    Ok((Target::Remote { url, fragment }, key))
                }
                location => {
                    let path = self.resolve_path(Path::new(path), location);
                    let key = with_fragment(&path.display().to_string(), fragment);
                    Ok((Target::File { path, fragment }, key))
                }
            },
        }
    }

    /// Resolve a file path against the current file's directory or the base path
    fn resolve_path(&self, path: &Path, location: &Location) -> PathBuf {
        if path.is_absolute() {
            return normalize_path(path);
        }

        let base = match location {
            Location::File(current) => current.parent().unwrap_or_else(|| Path::new("")),
            _ => self.base_path.as_path(),
        };
        normalize_path(&base.join(path))
    }

    /// Load and parse a referenced file, once per path
    fn load_file(&mut self, path: &Path, reference: &str) -> ResolutionResult<Arc<Value>> {
        let location = path.display().to_string();
        if let Some(document) = self.cache.source(&location) {
            return Ok(document);
        }

        let content = self.fetcher.read_file(path).map_err(|source| {
            ResolutionError::not_found(
                reference,
                LookupError::Io {
                    path: path.to_path_buf(),
                    source,
                },
            )
        })?;

        let (document, format) = self
            .parser
            .parse_bytes(&content)
            .map_err(|e| ResolutionError::parse(reference, e))?;
        debug!(path = %path.display(), format = ?format, bytes = content.len(), "Loaded referenced file");

        Ok(self.cache.insert_source(location, document))
    }

    /// Fetch and parse a remote JSON document, once per URL
    fn load_remote(&mut self, url: &Url, reference: &str) -> ResolutionResult<Arc<Value>> {
        if let Some(document) = self.cache.source(url.as_str()) {
            return Ok(document);
        }

        let content = self.fetcher.fetch(url).map_err(|source| {
            ResolutionError::not_found(
                reference,
                LookupError::Fetch {
                    url: url.to_string(),
                    source,
                },
            )
        })?;

        let document = self
            .parser
            .parse_json(&content)
            .map_err(|e| ResolutionError::parse(reference, e))?;
        debug!(%url, bytes = content.len(), "Fetched remote document");

        Ok(self.cache.insert_source(url.as_str(), document))
    }
}

/// Apply a fragment to a document
fn lookup<'d>(document: &'d Value, fragment: &str, reference: &str) -> ResolutionResult<&'d Value> {
    JsonPointer::from_fragment(fragment)
        .and_then(|pointer| pointer.resolve(document))
        .map_err(|e| ResolutionError::not_found(reference, e))
}

/// Detach and percent-decode the fragment of a remote reference
fn split_url_fragment(mut url: Url, reference: &str) -> ResolutionResult<(Url, Option<String>)> {
    let fragment = match url.fragment() {
        Some(raw) => {
            let decoded = urlencoding::decode(raw).map_err(|_| {
                ResolutionError::not_found(
                    reference,
                    LookupError::InvalidPointer {
                        fragment: raw.to_string(),
                    },
                )
            })?;
            Some(decoded.into_owned())
        }
        None => None,
    };
    url.set_fragment(None);
    Ok((url, fragment))
}

/// JSON pointer of the node reached through `path`
fn pointer_to(path: &[String]) -> String {
    let mut pointer = String::from("#");
    for segment in path {
        pointer.push('/');
        pointer.push_str(&escape_segment(segment));
    }
    pointer
}

fn with_fragment(location: &str, fragment: Option<&str>) -> String {
    match fragment {
        Some(fragment) => format!("{}#{}", location, fragment),
        None => location.to_string(),
    }
}

/// Lexically remove `.` and resolvable `..` components
fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
