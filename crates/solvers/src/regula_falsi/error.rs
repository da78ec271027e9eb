use thiserror::Error;

/// Errors that can occur during regula falsi solving.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum Error {
    #[error(transparent)]
    InvalidTarget(#[from] crate::Error),

    /// The bracket did not close on the target in time.
    ///
    /// The volume function is convex and piecewise linear, so reaching this
    /// means the tolerances are tighter than floating point can resolve.
    #[error("no convergence after {iters} iterations: target {target}, bracket [{lo}, {hi}]")]
    ConvergenceFailure {
        iters: usize,
        target: f64,
        lo: f64,
        hi: f64,
    },
}
