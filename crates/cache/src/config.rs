use std::{
    env,
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use thiserror::Error;

/// Configuration for opening a [`Context`](crate::Context).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    path: PathBuf,
    capacity: Option<NonZeroUsize>,
    seed: Option<u64>,
}

/// Errors that can occur when building a [`CacheConfig`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("cache path must not be empty")]
    EmptyPath,

    #[error("capacity must be at least one entry")]
    ZeroCapacity,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            capacity: None,
            seed: None,
        }
    }
}

impl CacheConfig {
    /// Creates an unbounded, randomly seeded config storing its log at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyPath`] if `path` is empty.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath);
        }

        Ok(Self {
            path,
            ..Self::default()
        })
    }

    /// Bounds the cache to `capacity` entries.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroCapacity`] if `capacity` is zero.
    pub fn with_capacity(mut self, capacity: usize) -> Result<Self, ConfigError> {
        self.capacity = Some(NonZeroUsize::new(capacity).ok_or(ConfigError::ZeroCapacity)?);
        Ok(self)
    }

    /// Seeds the random instance generator.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns the path of the store log.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the entry capacity, or `None` if unbounded.
    #[must_use]
    pub fn capacity(&self) -> Option<NonZeroUsize> {
        self.capacity
    }

    /// Returns the generator seed, or `None` to seed from the OS.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

/// Resolves `$XDG_CACHE_HOME/waterfill/cache.db`, falling back to
/// `$HOME/.cache` and then the system temp directory.
fn default_path() -> PathBuf {
    let base = env::var_os("XDG_CACHE_HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            env::var_os("HOME")
                .filter(|dir| !dir.is_empty())
                .map(|home| PathBuf::from(home).join(".cache"))
        })
        .unwrap_or_else(env::temp_dir);
    base.join("waterfill").join("cache.db")
}
