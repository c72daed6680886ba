//! Root directory resolution and derived canonical paths.
//!
//! # Responsibilities
//! - Establish the single root directory for all persisted node state
//! - Derive the canonical sub-paths (config file, log dir, plotter dir,
//!   daemon credentials) from it
//! - Resolve path fragments stored inside the config against the root
//!
//! # Design Decisions
//! - The root comes from the `CACTUS_ROOT` override when set and non-empty,
//!   else `~/.cactus/mainnet`; it is computed once and never mutated
//! - Derived paths are precomputed at construction, not rejoined per call
//! - Joining normalizes `.`/`..` lexically; no filesystem I/O happens here

use std::env;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use crate::config::loader::ConfigLoader;
use crate::config::ConfigResult;

/// Environment variable overriding the root directory.
pub const ROOT_ENV_VAR: &str = "CACTUS_ROOT";

/// Network-name segment of the default root.
const DEFAULT_NETWORK: &str = "mainnet";

/// Root directory plus the canonical paths derived from it.
///
/// Computed once per process (`from_env`) or explicitly (`with_root`) and
/// immutable afterward.
#[derive(Debug, Clone)]
pub struct ResolverContext {
    root: PathBuf,
    config_path: PathBuf,
    log_dir: PathBuf,
    plotter_dir: PathBuf,
    daemon_key_path: PathBuf,
    daemon_cert_path: PathBuf,
}

impl ResolverContext {
    /// Resolve the root from the environment.
    pub fn from_env() -> Self {
        Self::with_root(root_from(env::var_os(ROOT_ENV_VAR)))
    }

    /// Use an explicit root directory.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let root = normalize(&absolute(root.into()));
        let config_path = root.join("config").join("config.yaml");
        let log_dir = root.join("log");
        let plotter_dir = root.join("plotter");
        let ssl_dir = root.join("config").join("ssl").join("daemon");
        let daemon_key_path = ssl_dir.join("private_daemon.key");
        let daemon_cert_path = ssl_dir.join("private_daemon.crt");

        Self {
            root,
            config_path,
            log_dir,
            plotter_dir,
            daemon_key_path,
            daemon_cert_path,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Canonical location of the config file: `<root>/config/config.yaml`.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn plotter_dir(&self) -> &Path {
        &self.plotter_dir
    }

    /// Daemon mutual-TLS private key: `<root>/config/ssl/daemon/private_daemon.key`.
    pub fn daemon_key_path(&self) -> &Path {
        &self.daemon_key_path
    }

    /// Daemon mutual-TLS certificate: `<root>/config/ssl/daemon/private_daemon.crt`.
    pub fn daemon_cert_path(&self) -> &Path {
        &self.daemon_cert_path
    }

    /// Join `segments` onto the root with lexical normalization. No I/O.
    pub fn resolve_from_root<I, S>(&self, segments: I) -> PathBuf
    where
        I: IntoIterator<Item = S>,
        S: AsRef<Path>,
    {
        let mut path = self.root.clone();
        for segment in segments {
            path.push(segment.as_ref());
        }
        normalize(&path)
    }

    /// Resolve a path fragment stored in the config against the root.
    ///
    /// Looks up `canonical_path` in the flattened config for `source`
    /// (default: this context's config file), requires a string scalar, and
    /// joins it onto the root. Fails with `MissingKey` when the key is absent
    /// and `TypeMismatch` when the value is not a string.
    pub fn resolve_path_from_config(
        &self,
        loader: &mut ConfigLoader,
        canonical_path: &str,
        source: Option<&Path>,
    ) -> ConfigResult<PathBuf> {
        let config = loader.load(source)?;
        let fragment = config.get_str(canonical_path)?;
        Ok(self.resolve_from_root([fragment]))
    }
}

/// Pick the root directory for a given override value.
///
/// Pure function of its input: a set, non-empty override wins; anything else
/// falls back to `~/.cactus/<network>`.
pub fn root_from(override_dir: Option<OsString>) -> PathBuf {
    match override_dir {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => default_root(),
    }
}

fn default_root() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".cactus")
        .join(DEFAULT_NETWORK)
}

/// Make a path absolute against the current working directory.
fn absolute(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    }
}

/// Lexically resolve `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::Prefix(p) => components.push(Component::Prefix(p)),
            Component::RootDir => components.push(Component::RootDir),
            Component::CurDir => {}
            Component::ParentDir => {
                if let Some(Component::Normal(_)) = components.last() {
                    components.pop();
                } else {
                    components.push(Component::ParentDir);
                }
            }
            Component::Normal(name) => components.push(Component::Normal(name)),
        }
    }

    components.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use std::fs;

    #[test]
    fn override_wins_over_default() {
        let root = root_from(Some(OsString::from("/opt/cactus/testnet")));
        assert_eq!(root, PathBuf::from("/opt/cactus/testnet"));
    }

    #[test]
    fn unset_or_empty_override_falls_back_to_home_default() {
        for missing in [None, Some(OsString::new())] {
            let root = root_from(missing);
            assert!(root.ends_with(Path::new(".cactus").join(DEFAULT_NETWORK)));
        }
    }

    #[test]
    fn derived_paths_hang_off_the_root() {
        let ctx = ResolverContext::with_root("/home/u/.cactus/mainnet");

        assert_eq!(
            ctx.config_path(),
            Path::new("/home/u/.cactus/mainnet/config/config.yaml")
        );
        assert_eq!(ctx.log_dir(), Path::new("/home/u/.cactus/mainnet/log"));
        assert_eq!(
            ctx.plotter_dir(),
            Path::new("/home/u/.cactus/mainnet/plotter")
        );
        assert_eq!(
            ctx.daemon_key_path(),
            Path::new("/home/u/.cactus/mainnet/config/ssl/daemon/private_daemon.key")
        );
        assert_eq!(
            ctx.daemon_cert_path(),
            Path::new("/home/u/.cactus/mainnet/config/ssl/daemon/private_daemon.crt")
        );
    }

    #[test]
    fn resolve_from_root_normalizes_dot_segments() {
        let ctx = ResolverContext::with_root("/data/cactus");

        assert_eq!(
            ctx.resolve_from_root(["config", ".", "ssl"]),
            PathBuf::from("/data/cactus/config/ssl")
        );
        assert_eq!(
            ctx.resolve_from_root(["config", "..", "log"]),
            PathBuf::from("/data/cactus/log")
        );
    }

    #[test]
    fn resolve_path_from_config_joins_the_stored_fragment() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        fs::write(
            &config_path,
            "daemon_ssl:\n  private_key: config/ssl/daemon/private_daemon.key\n",
        )
        .unwrap();

        let ctx = ResolverContext::with_root("/home/u/.cactus/mainnet");
        let mut loader = ConfigLoader::new(&config_path);

        let resolved = ctx
            .resolve_path_from_config(&mut loader, "/daemon_ssl/private_key", None)
            .unwrap();
        assert_eq!(
            resolved,
            PathBuf::from("/home/u/.cactus/mainnet/config/ssl/daemon/private_daemon.key")
        );
    }

    #[test]
    fn resolve_path_from_config_rejects_absent_and_non_string_keys() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        fs::write(&config_path, "daemon_port: 58400\n").unwrap();

        let ctx = ResolverContext::with_root("/home/u/.cactus/mainnet");
        let mut loader = ConfigLoader::new(&config_path);

        assert!(matches!(
            ctx.resolve_path_from_config(&mut loader, "/daemon_ssl/private_key", None),
            Err(ConfigError::MissingKey(_))
        ));
        assert!(matches!(
            ctx.resolve_path_from_config(&mut loader, "/daemon_port", None),
            Err(ConfigError::TypeMismatch { .. })
        ));
    }
}
