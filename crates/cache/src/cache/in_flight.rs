use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;

use crate::CacheKey;

/// Per-key locks that serialize work on identical keys.
///
/// A slot exists only while some caller holds or waits for it.
#[derive(Debug, Default)]
pub(super) struct InFlight {
    slots: Mutex<HashMap<CacheKey, Arc<Mutex<()>>>>,
}

impl InFlight {
    /// Runs `f` while holding the lock for `key`.
    ///
    /// Callers with other keys are never blocked by `f`.
    pub(super) fn run<T>(&self, key: &CacheKey, f: impl FnOnce() -> T) -> T {
        let slot = Arc::clone(self.slots.lock().entry(key.clone()).or_default());

        let result = {
            let _guard = slot.lock();
            f()
        };

        let mut slots = self.slots.lock();
        // Only the table and this caller still reference the slot.
        if Arc::strong_count(&slot) == 2 {
            slots.remove(key);
        }
        result
    }

    #[cfg(test)]
    pub(super) fn slots(&self) -> usize {
        self.slots.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::{
        sync::{
            Barrier,
            atomic::{AtomicUsize, Ordering},
        },
        thread,
        time::Duration,
    };

    use waterfill_core::{Terrain, Volume};

    fn key(volume: i64) -> CacheKey {
        CacheKey::new(&Terrain::new(vec![0.0]).unwrap(), Volume::Integer(volume))
    }

    #[test]
    fn same_key_never_overlaps() {
        let in_flight = InFlight::default();
        let active = AtomicUsize::new(0);
        let barrier = Barrier::new(8);

        thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    barrier.wait();
                    in_flight.run(&key(1), || {
                        assert_eq!(active.fetch_add(1, Ordering::SeqCst), 0);
                        thread::sleep(Duration::from_millis(2));
                        active.fetch_sub(1, Ordering::SeqCst);
                    });
                });
            }
        });

        assert_eq!(in_flight.slots(), 0);
    }

    #[test]
    fn distinct_keys_overlap() {
        let in_flight = InFlight::default();
        let barrier = Barrier::new(2);

        // Each closure waits for the other, which only works if both run at once.
        thread::scope(|scope| {
            for volume in [1, 2] {
                let in_flight = &in_flight;
                let barrier = &barrier;
                scope.spawn(move || {
                    in_flight.run(&key(volume), || {
                        barrier.wait();
                    });
                });
            }
        });

        assert_eq!(in_flight.slots(), 0);
    }
}
