//! Regula falsi (false position) solver for the water level.
//!
//! The solver keeps a bracket `[lo, hi]` whose volumes straddle the target,
//! places the next candidate where the chord between the bracket endpoints
//! meets the target, and replaces whichever endpoint lies on the same side.
//! Because the volume function is convex and piecewise linear, the bracket
//! always converges; failing to do so within [`Config::max_iters`] is
//! reported as [`Error::ConvergenceFailure`].
//!
//! This solver exists to cross-check [`crate::level`]. Prefer that function
//! everywhere else.

mod bracket;
mod config;
mod error;
mod event;
mod solution;

pub use bracket::Bracket;
pub use config::{Config, ConfigError};
pub use error::Error;
pub use event::{Action, Event, Observer};
pub use solution::{Solution, Status};

use waterfill_core::{Terrain, volume};

/// Finds the level at which `terrain` holds `target_volume`.
///
/// Observers see every candidate level together with the bracket it was
/// drawn from, and may stop the iteration early.
///
/// # Errors
///
/// Returns an error if the target is invalid or the solver does not converge
/// within the configured iteration limit.
pub fn solve(
    terrain: &Terrain,
    target_volume: f64,
    config: &Config,
    mut observer: impl Observer,
) -> Result<Solution, Error> {
    let target = crate::Error::check_target(target_volume)?;

    if target == 0.0 {
        return Ok(Solution {
            status: Status::Converged,
            level: terrain.min(),
            volume: 0.0,
            iters: 0,
        });
    }

    let mut bracket = Bracket::initial(terrain, target);

    for iter in 1..=config.max_iters() {
        let level = bracket.interpolate(target);
        let level_volume = volume(terrain, level);

        let event = Event {
            iter,
            bracket: &bracket,
            level,
            volume: level_volume,
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            return Ok(Solution {
                status: Status::StoppedByObserver,
                level,
                volume: level_volume,
                iters: iter,
            });
        }

        if config.is_converged(level_volume, target) {
            log::debug!("regula falsi converged to level {level} after {iter} iterations");
            return Ok(Solution {
                status: Status::Converged,
                level,
                volume: level_volume,
                iters: iter,
            });
        }

        bracket.shrink(level, level_volume, target);
    }

    let [lo, hi] = bracket.as_array();
    Err(Error::ConvergenceFailure {
        iters: config.max_iters(),
        target,
        lo,
        hi,
    })
}

/// Runs regula falsi without observation.
///
/// # Errors
///
/// Returns an error if the target is invalid or the solver does not converge
/// within the configured iteration limit.
pub fn solve_unobserved(
    terrain: &Terrain,
    target_volume: f64,
    config: &Config,
) -> Result<Solution, Error> {
    solve(terrain, target_volume, config, ())
}
