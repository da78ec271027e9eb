use std::collections::{BTreeMap, HashMap};

use crate::CacheKey;

/// Least-recently-used ordering of cache keys.
#[derive(Debug, Default)]
pub(crate) struct Recency {
    clock: u64,
    by_key: HashMap<CacheKey, u64>,
    by_tick: BTreeMap<u64, CacheKey>,
}

impl Recency {
    /// Marks `key` as the most recently used.
    pub(crate) fn touch(&mut self, key: &CacheKey) {
        self.clock += 1;
        if let Some(previous) = self.by_key.insert(key.clone(), self.clock) {
            self.by_tick.remove(&previous);
        }
        self.by_tick.insert(self.clock, key.clone());
    }

    /// Returns the least recently used key.
    pub(crate) fn oldest(&self) -> Option<&CacheKey> {
        self.by_tick.first_key_value().map(|(_, key)| key)
    }

    /// Stops tracking `key`.
    pub(crate) fn forget(&mut self, key: &CacheKey) {
        if let Some(tick) = self.by_key.remove(key) {
            self.by_tick.remove(&tick);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.by_key.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use waterfill_core::{Terrain, Volume};

    fn key(volume: i64) -> CacheKey {
        CacheKey::new(&Terrain::new(vec![0.0]).unwrap(), Volume::Integer(volume))
    }

    #[test]
    fn oldest_follows_least_recent_use() {
        let mut recency = Recency::default();
        recency.touch(&key(1));
        recency.touch(&key(2));
        recency.touch(&key(3));
        recency.touch(&key(1));

        assert_eq!(recency.len(), 3);
        assert_eq!(recency.oldest(), Some(&key(2)));
        recency.forget(&key(2));
        assert_eq!(recency.oldest(), Some(&key(3)));
        recency.forget(&key(3));
        assert_eq!(recency.oldest(), Some(&key(1)));
        recency.forget(&key(1));
        assert_eq!(recency.oldest(), None);
        assert_eq!(recency.len(), 0);
    }

    #[test]
    fn forgetting_an_untracked_key_is_a_no_op() {
        let mut recency = Recency::default();
        recency.touch(&key(1));

        recency.forget(&key(2));

        assert_eq!(recency.len(), 1);
        assert_eq!(recency.oldest(), Some(&key(1)));
    }
}
