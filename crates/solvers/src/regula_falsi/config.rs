use thiserror::Error;

/// Configuration for the regula falsi solver.
///
/// A candidate level is accepted once its volume is within
/// `volume_abs_tol + volume_rel_tol * target` of the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    max_iters: usize,
    volume_abs_tol: f64,
    volume_rel_tol: f64,
}

/// Errors that can occur when validating a regula falsi solver config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("volume_abs_tol must be finite and non-negative")]
    VolumeAbs,

    #[error("volume_rel_tol must be finite and non-negative")]
    VolumeRel,
}

impl Default for Config {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(5000, 1e-9, 1e-9).unwrap()
    }
}

impl Config {
    /// Creates a new config with validated tolerances.
    ///
    /// # Errors
    ///
    /// Returns an error if any tolerance is negative or non-finite.
    pub fn new(
        max_iters: usize,
        volume_abs_tol: f64,
        volume_rel_tol: f64,
    ) -> Result<Self, ConfigError> {
        if !volume_abs_tol.is_finite() || volume_abs_tol < 0.0 {
            return Err(ConfigError::VolumeAbs);
        }
        if !volume_rel_tol.is_finite() || volume_rel_tol < 0.0 {
            return Err(ConfigError::VolumeRel);
        }

        Ok(Self {
            max_iters,
            volume_abs_tol,
            volume_rel_tol,
        })
    }

    /// Returns the maximum number of candidate evaluations.
    #[must_use]
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    /// Returns the absolute volume tolerance.
    #[must_use]
    pub fn volume_abs_tol(&self) -> f64 {
        self.volume_abs_tol
    }

    /// Returns the relative volume tolerance.
    #[must_use]
    pub fn volume_rel_tol(&self) -> f64 {
        self.volume_rel_tol
    }

    /// Returns true if `volume` is close enough to `target`.
    #[must_use]
    pub fn is_converged(&self, volume: f64, target: f64) -> bool {
        (volume - target).abs() <= self.volume_abs_tol + self.volume_rel_tol * target.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_tolerances() {
        assert_eq!(Config::new(10, -1.0, 0.0), Err(ConfigError::VolumeAbs));
        assert_eq!(Config::new(10, 0.0, f64::NAN), Err(ConfigError::VolumeRel));
    }

    #[test]
    fn convergence_uses_both_tolerances() {
        let config = Config::new(10, 1e-3, 1e-2).unwrap();

        assert!(config.is_converged(100.5, 100.0));
        assert!(!config.is_converged(101.5, 100.0));
        assert!(config.is_converged(0.0005, 0.0));
    }
}
