//! Core types for the water-filling problem.
//!
//! Given a one-dimensional terrain and a target volume of water, the
//! water-filling problem asks for the surface level at which the water
//! standing above the terrain adds up to that volume. This crate defines the
//! shared pieces that the solver and cache crates build on:
//!
//! - [`Terrain`]: a validated, immutable sequence of heights
//! - [`Volume`]: a non-negative volume that remembers whether it was given
//!   as an integer or a float
//! - [`volume`]: the accumulated water volume for a terrain and a level
//! - [`random_instance`]: a random problem instance for demos and warm-up

mod random;
mod terrain;
mod volume;
mod water;

pub use random::random_instance;
pub use terrain::{MAX_TERRAIN_LEN, Terrain, TerrainError};
pub use volume::{Volume, VolumeError};
pub use water::volume;
