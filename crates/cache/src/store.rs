mod file;
mod memory;
mod record;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

use crate::{Artifact, CacheKey};

/// A solved instance as persisted in a store.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub level: f64,
    pub artifact: Artifact,
}

/// Errors raised by a [`Store`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed")]
    Io(#[from] std::io::Error),

    #[error("failed to encode record")]
    Encode(#[source] bincode::Error),

    #[error("corrupt record at byte {offset}: {reason}")]
    Corrupt { offset: u64, reason: String },
}

/// Key/value storage behind a [`ResultCache`](crate::ResultCache).
///
/// Entries are never modified in place; inserting an existing key replaces
/// its entry.
pub trait Store {
    /// Returns the entry stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, StoreError>;

    /// Stores `entry` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be persisted.
    fn insert(&mut self, key: CacheKey, entry: CacheEntry) -> Result<(), StoreError>;

    /// Removes the entry under `key`, returning whether one existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal cannot be persisted.
    fn remove(&mut self, key: &CacheKey) -> Result<bool, StoreError>;

    /// Returns every stored key.
    fn keys(&self) -> Vec<CacheKey>;

    /// Returns the number of stored entries.
    fn len(&self) -> usize;

    /// Returns true if the store holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pushes buffered writes to durable storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails.
    fn flush(&mut self) -> Result<(), StoreError>;
}
