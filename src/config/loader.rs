//! Configuration loading from disk with memoized reuse.
//!
//! # Responsibilities
//! - Read and parse the YAML config file
//! - Flatten the parsed document into a `FlatConfig`
//! - Memoize the result per source path so repeated loads skip the filesystem
//!
//! # Design Decisions
//! - The cache is owned by the loader instance, not process-global, so tests
//!   and embedders construct independent loaders
//! - A failed load keeps the previous cache entry intact and still reports
//!   the error; there is no partial success
//! - The file is not watched for changes: staleness after an external edit is
//!   an accepted limitation of the single-entry cache

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::flatten::{flatten, FlatConfig};
use crate::config::resolver::ResolverContext;
use crate::config::{ConfigError, ConfigResult};

struct CacheEntry {
    path: PathBuf,
    config: Arc<FlatConfig>,
}

/// Reads, flattens and memoizes the node configuration file.
///
/// The cache holds the result of the most recent successful load, keyed by
/// source path. Loading the same path again returns the cached value without
/// touching the filesystem; loading a different path replaces the entry.
pub struct ConfigLoader {
    default_path: PathBuf,
    cache: Option<CacheEntry>,
}

impl ConfigLoader {
    /// Create a loader whose `None`-source loads read `default_path`.
    pub fn new(default_path: impl Into<PathBuf>) -> Self {
        Self {
            default_path: default_path.into(),
            cache: None,
        }
    }

    /// Create a loader for the canonical config file of a resolved root.
    pub fn for_context(ctx: &ResolverContext) -> Self {
        Self::new(ctx.config_path())
    }

    /// Path used when `load` is called without an explicit source.
    pub fn default_path(&self) -> &Path {
        &self.default_path
    }

    /// Load the flattened config for `source` (default: the loader's path).
    ///
    /// Returns the cached `FlatConfig` when `source` matches the previous
    /// successful load. Otherwise reads and parses the file, replacing the
    /// cache entry on success.
    pub fn load(&mut self, source: Option<&Path>) -> ConfigResult<Arc<FlatConfig>> {
        let path = source.unwrap_or(&self.default_path);

        if let Some(entry) = &self.cache {
            if entry.path == path {
                return Ok(Arc::clone(&entry.config));
            }
        }

        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let doc: serde_yaml::Value =
            serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let config = Arc::new(flatten(&doc));
        tracing::debug!(
            path = %path.display(),
            entries = config.len(),
            "config file loaded"
        );

        self.cache = Some(CacheEntry {
            path: path.to_path_buf(),
            config: Arc::clone(&config),
        });
        Ok(config)
    }
}
