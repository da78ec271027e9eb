use thiserror::Error;

/// Errors that can occur when solving for a water level.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum Error {
    #[error("target volume must be finite and non-negative, got {value}")]
    InvalidTarget { value: f64 },
}

impl Error {
    /// Checks that a target volume is finite and non-negative.
    pub(crate) fn check_target(value: f64) -> Result<f64, Self> {
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            Err(Self::InvalidTarget { value })
        }
    }
}
