use std::num::NonZeroUsize;

use parking_lot::Mutex;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use waterfill_core::{Terrain, Volume, random_instance};

use crate::{
    CacheConfig, Error, FileStore, Fulfilled, Render, ResultCache, Store, cache::compute,
};

/// Owns the result cache and the random generator for one session.
///
/// Nothing here is global: open a context, pass it to whoever serves
/// requests, and close it when done. Tests build one over a
/// [`MemoryStore`](crate::MemoryStore) with a seeded generator.
#[derive(Debug)]
pub struct Context<S> {
    cache: ResultCache<S>,
    rng: Mutex<ChaCha8Rng>,
}

impl Context<FileStore> {
    /// Opens the file store described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be opened or trimmed to capacity.
    pub fn open(config: &CacheConfig) -> Result<Self, Error> {
        let store = FileStore::open(config.path())?;
        let rng = match config.seed() {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_store(store, config.capacity(), rng)
    }
}

impl<S: Store> Context<S> {
    /// Builds a context from its parts.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be trimmed to `capacity`.
    pub fn with_store(
        store: S,
        capacity: Option<NonZeroUsize>,
        rng: ChaCha8Rng,
    ) -> Result<Self, Error> {
        Ok(Self {
            cache: ResultCache::new(store, capacity)?,
            rng: Mutex::new(rng),
        })
    }

    /// Returns the result cache.
    #[must_use]
    pub fn cache(&self) -> &ResultCache<S> {
        &self.cache
    }

    /// Draws a random problem instance.
    #[must_use]
    pub fn random_instance(&self) -> (Terrain, Volume) {
        random_instance(&mut *self.rng.lock())
    }

    /// Runs `f` with exclusive access to the generator.
    ///
    /// Renderers that pick colors at random should draw from here so a
    /// seeded context stays reproducible.
    pub fn with_rng<T>(&self, f: impl FnOnce(&mut ChaCha8Rng) -> T) -> T {
        f(&mut self.rng.lock())
    }

    /// Serves `(terrain, volume)` through the cache.
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
        self.cache.fulfill(terrain, volume, renderer)
    }

    /// Solves and renders `(terrain, volume)` without touching the cache.
    ///
    /// Used for one-off builds that should neither read nor grow the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the solver or the renderer fails.
    pub fn solve_uncached<R: Render>(
        &self,
        terrain: &Terrain,
        volume: Volume,
        renderer: &R,
    ) -> Result<Fulfilled, Error> {
        let computed = compute(terrain, volume, renderer)?;
        Ok(Fulfilled {
            level: computed.level,
            artifact: computed.artifact,
            cache_hit: false,
        })
    }

    /// Flushes the store and hands it back.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails.
    pub fn close(self) -> Result<S, Error> {
        self.cache.flush()?;
        let store = self.cache.into_store();
        log::info!("closed cache context with {} entries", store.len());
        Ok(store)
    }
}
