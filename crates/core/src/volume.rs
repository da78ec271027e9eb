use std::fmt;

use thiserror::Error;

/// Errors that can occur when constructing a [`Volume`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum VolumeError {
    #[error("volume must be non-negative")]
    Negative,

    #[error("volume must be finite")]
    NonFinite,
}

/// A non-negative, finite target volume.
///
/// The variant records how the volume was written by the caller. `3` and
/// `3.0` describe the same amount of water but are different values of this
/// type, and they stay different all the way through caching and display.
/// Compare [`Volume::value`] when only the amount matters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Volume {
    Integer(i64),
    Float(f64),
}

impl Volume {
    /// Creates an integer-valued volume.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::Negative`] if `value < 0`.
    pub fn integer(value: i64) -> Result<Self, VolumeError> {
        if value < 0 {
            return Err(VolumeError::Negative);
        }
        Ok(Self::Integer(value))
    }

    /// Creates a float-valued volume.
    ///
    /// Negative zero is normalized to `0.0`.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is NaN, infinite, or negative.
    #[allow(clippy::float_cmp)]
    pub fn float(value: f64) -> Result<Self, VolumeError> {
        if !value.is_finite() {
            return Err(VolumeError::NonFinite);
        }
        if value < 0.0 {
            return Err(VolumeError::Negative);
        }
        if value == 0.0 {
            return Ok(Self::Float(0.0));
        }
        Ok(Self::Float(value))
    }

    /// Returns the amount of water as a float.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn value(self) -> f64 {
        match self {
            Self::Integer(value) => value as f64,
            Self::Float(value) => value,
        }
    }

    /// Returns true if the volume was given as an integer.
    #[must_use]
    pub fn is_integer(self) -> bool {
        matches!(self, Self::Integer(_))
    }
}

impl From<Volume> for f64 {
    fn from(volume: Volume) -> Self {
        volume.value()
    }
}

/// Integers print without a decimal point, floats always carry one.
impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn integer_rejects_negative() {
        assert_eq!(Volume::integer(-1), Err(VolumeError::Negative));
        assert_eq!(Volume::integer(0), Ok(Volume::Integer(0)));
    }

    #[test]
    fn float_rejects_invalid() {
        assert_eq!(Volume::float(-1.0), Err(VolumeError::Negative));
        assert_eq!(Volume::float(f64::NAN), Err(VolumeError::NonFinite));
        assert_eq!(Volume::float(f64::INFINITY), Err(VolumeError::NonFinite));
    }

    #[test]
    fn float_normalizes_negative_zero() {
        let Volume::Float(value) = Volume::float(-0.0).unwrap() else {
            panic!("expected a float volume");
        };
        assert!(value.is_sign_positive());
    }

    #[test]
    fn variants_with_equal_values_differ() {
        let int = Volume::integer(3).unwrap();
        let float = Volume::float(3.0).unwrap();

        assert_ne!(int, float);
        assert_relative_eq!(int.value(), float.value());
        assert!(int.is_integer());
        assert!(!float.is_integer());
    }

    #[test]
    fn display_keeps_variant() {
        assert_eq!(Volume::integer(3).unwrap().to_string(), "3");
        assert_eq!(Volume::float(3.0).unwrap().to_string(), "3.0");
        assert_eq!(Volume::float(1.5).unwrap().to_string(), "1.5");
    }
}
