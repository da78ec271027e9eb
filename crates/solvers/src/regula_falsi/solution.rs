/// How the regula falsi solver finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The candidate volume is within tolerance of the target.
    Converged,
    /// An observer stopped the solver.
    StoppedByObserver,
}

/// The result of a regula falsi solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    pub status: Status,
    /// Reported water level.
    pub level: f64,
    /// Volume held at `level`.
    pub volume: f64,
    /// Number of candidate levels evaluated.
    pub iters: usize,
}
