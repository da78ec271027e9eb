use std::error::Error as StdError;

use thiserror::Error;

use crate::{ConfigError, StoreError};

/// Errors that can occur while serving an instance through the cache.
///
/// Store failures are always surfaced; the cache never falls back to
/// computing without persisting.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cache store failed")]
    Store(#[from] StoreError),

    #[error("failed to solve for the water level")]
    Solve(#[from] waterfill_solvers::Error),

    #[error("failed to render the solved instance")]
    Render(#[source] Box<dyn StdError + Send + Sync>),

    #[error("failed to compute the instance")]
    Compute(#[source] Box<dyn StdError + Send + Sync>),

    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
}
