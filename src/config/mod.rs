//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! CACTUS_ROOT env override (or ~/.cactus/mainnet)
//!     → resolver.rs (root dir + derived canonical paths)
//!     → loader.rs (read config.yaml, parse, memoize per source path)
//!     → flatten.rs (nested document → flat canonical-path map)
//!     → FlatConfig (read by RPC endpoint construction and callers)
//! ```
//!
//! # Design Decisions
//! - The root directory is computed once and immutable for the process lifetime
//! - Flattening is a lossless projection: one entry per leaf, canonical path
//!   `/seg1/seg2/...` with sequence indices as decimal segments
//! - The loader memoizes a single entry keyed by source path; there is no
//!   invalidation API and no file watching — external edits go unseen until a
//!   load with a different path
//! - Errors are surfaced to the caller, never retried or swallowed here

pub mod flatten;
pub mod loader;
pub mod resolver;

use std::path::PathBuf;

use thiserror::Error;

pub use flatten::{flatten, FlatConfig, Scalar};
pub use loader::ConfigLoader;
pub use resolver::{ResolverContext, ROOT_ENV_VAR};

/// Errors that can occur while resolving or loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file missing or unreadable.
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not a well-formed YAML document.
    #[error("malformed config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Canonical path absent from the flattened config.
    #[error("config key not found: {0}")]
    MissingKey(String),

    /// Value present but of the wrong scalar kind for the requested use.
    #[error("config key {key}: expected {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::MissingKey("/daemon_ssl/private_key".to_string());
        assert_eq!(
            err.to_string(),
            "config key not found: /daemon_ssl/private_key"
        );

        let err = ConfigError::TypeMismatch {
            key: "/daemon_port".to_string(),
            expected: "string",
            found: "integer",
        };
        assert!(err.to_string().contains("expected string"));
        assert!(err.to_string().contains("found integer"));
    }
}
