use std::collections::HashMap;

use crate::CacheKey;

use super::{CacheEntry, Store, StoreError};

/// A store that keeps entries in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<CacheKey, CacheEntry>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn insert(&mut self, key: CacheKey, entry: CacheEntry) -> Result<(), StoreError> {
        self.entries.insert(key, entry);
        Ok(())
    }

    fn remove(&mut self, key: &CacheKey) -> Result<bool, StoreError> {
        Ok(self.entries.remove(key).is_some())
    }

    fn keys(&self) -> Vec<CacheKey> {
        self.entries.keys().cloned().collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}
