mod in_flight;

use std::{error::Error as StdError, num::NonZeroUsize};

use parking_lot::Mutex;
use waterfill_core::{Terrain, Volume};

use crate::{Artifact, CacheEntry, CacheKey, Error, Render, Store, recency::Recency};

use in_flight::InFlight;

/// A freshly computed level and artifact, ready to be cached.
#[derive(Debug, Clone, PartialEq)]
pub struct Computed {
    pub level: f64,
    pub artifact: Artifact,
}

/// The answer served for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Fulfilled {
    pub level: f64,
    pub artifact: Artifact,
    /// True if the answer came from the store rather than a new computation.
    pub cache_hit: bool,
}

/// Memoizes solved instances in a [`Store`].
///
/// Lookups and inserts go through the store every time. Requests for the
/// same instance are serialized, so an instance is computed at most once no
/// matter how many callers ask for it at the same moment, while requests
/// for different instances compute in parallel.
///
/// With a capacity, inserting past it evicts the least recently used entry.
/// Without one, entries are kept forever.
#[derive(Debug)]
pub struct ResultCache<S> {
    shared: Mutex<Shared<S>>,
    in_flight: InFlight,
    capacity: Option<NonZeroUsize>,
}

#[derive(Debug)]
struct Shared<S> {
    store: S,
    recency: Recency,
}

impl<S: Store> ResultCache<S> {
    /// Creates a cache over `store`.
    ///
    /// Entries already in the store start out equally old. If the store holds
    /// more than `capacity` entries, the excess is evicted right away.
    ///
    /// # Errors
    ///
    /// Returns an error if evicting excess entries fails.
    pub fn new(store: S, capacity: Option<NonZeroUsize>) -> Result<Self, Error> {
        let mut recency = Recency::default();
        for key in store.keys() {
            recency.touch(&key);
        }

        let mut shared = Shared { store, recency };
        shared.evict_to(capacity)?;

        Ok(Self {
            shared: Mutex::new(shared),
            in_flight: InFlight::default(),
            capacity,
        })
    }

    /// Returns the cached answer for `(terrain, volume)`, computing and
    /// storing it first if needed.
    ///
    /// `compute` runs at most once per distinct key, and never while the
    /// store is locked.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the store fails and [`Error::Compute`] if
    /// `compute` fails. Nothing is stored when `compute` fails. A store
    /// failure while evicting is reported even though the new entry was
    /// already stored.
    pub fn get_or_compute<F, E>(
        &self,
        terrain: &Terrain,
        volume: Volume,
        compute: F,
    ) -> Result<Fulfilled, Error>
    where
        F: FnOnce(&Terrain, Volume) -> Result<Computed, E>,
        E: StdError + Send + Sync + 'static,
    {
        self.serve(terrain, volume, || {
            compute(terrain, volume).map_err(|err| Error::Compute(Box::new(err)))
        })
    }

    /// Returns the cached answer for `(terrain, volume)`, solving for the
    /// level and rendering it with `renderer` on a miss.
    ///
    /// # Errors
    ///
    /// Returns an error if the store, the solver, or the renderer fails.
    pub fn fulfill<R: Render>(
        &self,
        terrain: &Terrain,
        volume: Volume,
        renderer: &R,
    ) -> Result<Fulfilled, Error> {
        self.serve(terrain, volume, || compute(terrain, volume, renderer))
    }

    /// Returns true if `(terrain, volume)` is cached.
    ///
    /// Does not count as a use for eviction.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn contains(&self, terrain: &Terrain, volume: Volume) -> Result<bool, Error> {
        let key = CacheKey::new(terrain, volume);
        Ok(self.shared.lock().store.get(&key)?.is_some())
    }

    /// Returns the number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.lock().store.len()
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the configured capacity, if any.
    #[must_use]
    pub fn capacity(&self) -> Option<NonZeroUsize> {
        self.capacity
    }

    /// Flushes the underlying store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails to flush.
    pub fn flush(&self) -> Result<(), Error> {
        self.shared.lock().store.flush()?;
        Ok(())
    }

    /// Consumes the cache and returns its store.
    pub fn into_store(self) -> S {
        self.shared.into_inner().store
    }

    fn serve(
        &self,
        terrain: &Terrain,
        volume: Volume,
        compute: impl FnOnce() -> Result<Computed, Error>,
    ) -> Result<Fulfilled, Error> {
        let key = CacheKey::new(terrain, volume);

        self.in_flight.run(&key, || -> Result<Fulfilled, Error> {
            if let Some(entry) = self.lookup(&key)? {
                log::debug!("cache hit for {key:?}");
                return Ok(Fulfilled {
                    level: entry.level,
                    artifact: entry.artifact,
                    cache_hit: true,
                });
            }

            log::debug!("cache miss for {key:?}, computing");
            let Computed { level, artifact } = compute()?;
            self.insert(
                key.clone(),
                CacheEntry {
                    level,
                    artifact: artifact.clone(),
                },
            )?;

            Ok(Fulfilled {
                level,
                artifact,
                cache_hit: false,
            })
        })
    }

    fn lookup(&self, key: &CacheKey) -> Result<Option<CacheEntry>, Error> {
        let mut shared = self.shared.lock();
        let entry = shared.store.get(key)?;
        if entry.is_some() {
            shared.recency.touch(key);
        }
        Ok(entry)
    }

    fn insert(&self, key: CacheKey, entry: CacheEntry) -> Result<(), Error> {
        let mut shared = self.shared.lock();
        shared.store.insert(key.clone(), entry)?;
        shared.recency.touch(&key);
        shared.evict_to(self.capacity)
    }
}

impl<S: Store> Shared<S> {
    /// Evicts least recently used entries until at most `capacity` remain.
    ///
    /// A key stays tracked until the store has removed it, so an eviction
    /// that fails is retried on the next insert.
    fn evict_to(&mut self, capacity: Option<NonZeroUsize>) -> Result<(), Error> {
        let Some(capacity) = capacity else {
            return Ok(());
        };

        while self.recency.len() > capacity.get() {
            let Some(oldest) = self.recency.oldest().cloned() else {
                break;
            };
            self.store.remove(&oldest)?;
            self.recency.forget(&oldest);
            log::debug!("evicted {oldest:?} to stay within {capacity} entries");
        }
        Ok(())
    }
}

/// Solves for the level and renders it.
pub(crate) fn compute<R: Render>(
    terrain: &Terrain,
    volume: Volume,
    renderer: &R,
) -> Result<Computed, Error> {
    let level = waterfill_solvers::level(terrain, volume.value())?;
    let artifact = renderer
        .render(terrain, level)
        .map_err(|err| Error::Render(Box::new(err)))?;
    Ok(Computed { level, artifact })
}
