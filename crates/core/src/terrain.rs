use thiserror::Error;

/// Largest number of heights a [`Terrain`] may hold.
pub const MAX_TERRAIN_LEN: usize = u16::MAX as usize;

/// Errors that can occur when constructing a [`Terrain`].
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum TerrainError {
    #[error("terrain has no heights")]
    Empty,

    #[error("terrain has {len} heights, at most 65535 are allowed")]
    TooLong { len: usize },

    #[error("height {value} at index {index} is not finite")]
    NonFinite { index: usize, value: f64 },
}

/// An ordered, immutable sequence of terrain heights.
///
/// A terrain always holds between 1 and [`MAX_TERRAIN_LEN`] finite heights.
/// The minimum and maximum are computed once at construction because every
/// solve needs them.
///
/// For example, the heights `[1, 4, 2, 3]` describe this cross-section:
///
/// ```text
///   |
///   |   x
///   |   x   x
///   |   x x x
///   | x x x x
///    (0 1 2 3)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Terrain {
    heights: Box<[f64]>,
    min: f64,
    max: f64,
}

impl Terrain {
    /// Creates a terrain from its heights.
    ///
    /// # Errors
    ///
    /// Returns an error if `heights` is empty, longer than
    /// [`MAX_TERRAIN_LEN`], or contains a NaN or infinite value.
    pub fn new(heights: impl Into<Vec<f64>>) -> Result<Self, TerrainError> {
        let heights = heights.into();

        if heights.is_empty() {
            return Err(TerrainError::Empty);
        }
        if heights.len() > MAX_TERRAIN_LEN {
            return Err(TerrainError::TooLong { len: heights.len() });
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for (index, &value) in heights.iter().enumerate() {
            if !value.is_finite() {
                return Err(TerrainError::NonFinite { index, value });
            }
            min = min.min(value);
            max = max.max(value);
        }

        Ok(Self {
            heights: heights.into_boxed_slice(),
            min,
            max,
        })
    }

    /// Returns the heights in their original order.
    #[must_use]
    pub fn heights(&self) -> &[f64] {
        &self.heights
    }

    /// Returns the number of heights.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Always false, a terrain holds at least one height.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the lowest height.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Returns the highest height.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Returns the exact little-endian bit pattern of every height.
    ///
    /// Two terrains produce the same bytes only if their heights are
    /// bitwise identical, so `0.0` and `-0.0` are kept apart.
    #[must_use]
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.heights
            .iter()
            .flat_map(|height| height.to_le_bytes())
            .collect()
    }
}

impl TryFrom<Vec<f64>> for Terrain {
    type Error = TerrainError;

    fn try_from(heights: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(heights)
    }
}

impl TryFrom<&[f64]> for Terrain {
    type Error = TerrainError;

    fn try_from(heights: &[f64]) -> Result<Self, Self::Error> {
        Self::new(heights.to_vec())
    }
}
