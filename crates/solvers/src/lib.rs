//! Solvers that invert the water volume function.
//!
//! [`level`] finds the lowest water level at which a terrain holds a target
//! volume. It sorts the terrain once and reads the answer off the resulting
//! piecewise-linear table ([`Breakpoints`]), so there is no iteration and no
//! convergence tolerance.
//!
//! The iterative [`regula_falsi`] solver reaches the same answer by
//! bracketing. It is kept only to cross-check the closed-form solver and is
//! compiled for tests or with the `cross-check` feature.

mod level;

pub use level::{Breakpoints, Error, level};

#[cfg(any(test, feature = "cross-check"))]
pub mod regula_falsi;
