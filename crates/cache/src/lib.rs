//! Persistent memoization of solved water-filling instances.
//!
//! Solving an instance means finding its water level and rendering an
//! [`Artifact`] for it, and the rendering is the expensive half. A
//! [`ResultCache`] remembers both, keyed by the exact terrain and volume
//! (including whether the volume was written as an integer or a float), so
//! each distinct instance is computed at most once, even when identical
//! requests race.
//!
//! Entries live in a [`Store`]. [`MemoryStore`] keeps them in a map and
//! [`FileStore`] keeps them in an append-only file. A [`Context`] owns a
//! cache together with the random generator used for random instances and
//! gives both an explicit open/close lifecycle.

mod cache;
mod config;
mod context;
mod error;
mod key;
mod recency;
mod render;
mod store;

pub use cache::{Computed, Fulfilled, ResultCache};
pub use config::{CacheConfig, ConfigError};
pub use context::Context;
pub use error::Error;
pub use key::CacheKey;
pub use render::{Artifact, Render};
pub use store::{CacheEntry, FileStore, MemoryStore, Store, StoreError};
