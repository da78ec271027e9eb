use waterfill_core::Terrain;

use super::Error;

/// The water volume function of a terrain, tabulated at its breakpoints.
///
/// Between two consecutive sorted heights `h[i]` and `h[i + 1]`, exactly
/// `i + 1` terrain points are under water, so the volume grows linearly with
/// slope `i + 1`. Storing the volume reached at each sorted height turns the
/// inversion into a binary search followed by one linear step. Above the
/// highest height every point is under water and the last segment continues
/// with slope `n`, which stands in for a sentinel height above the solution.
#[derive(Debug, Clone, PartialEq)]
pub struct Breakpoints {
    /// Terrain heights in ascending order.
    heights: Vec<f64>,
    /// `volumes[i]` is the volume when the level equals `heights[i]`.
    volumes: Vec<f64>,
}

impl Breakpoints {
    /// Tabulates the volume function of `terrain`.
    #[must_use]
    pub fn new(terrain: &Terrain) -> Self {
        let mut heights = terrain.heights().to_vec();
        heights.sort_by(f64::total_cmp);

        let mut volumes = Vec::with_capacity(heights.len());
        let mut accumulated = 0.0;
        volumes.push(accumulated);
        for (submerged, pair) in heights.windows(2).enumerate() {
            accumulated += (pair[1] - pair[0]) * count(submerged + 1);
            volumes.push(accumulated);
        }

        Self { heights, volumes }
    }

    /// Returns the lowest level at which the terrain holds `target_volume`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTarget`] if `target_volume` is negative, NaN,
    /// or infinite.
    pub fn level(&self, target_volume: f64) -> Result<f64, Error> {
        let target = Error::check_target(target_volume)?;

        // First breakpoint whose volume reaches the target.
        let index = self.volumes.partition_point(|&volume| volume < target);

        let level = if index == 0 {
            // Only a zero target gets here; every level up to the lowest
            // height holds nothing, and the lowest of them is the answer.
            self.heights[0]
        } else {
            let below = index - 1;
            self.heights[below] + (target - self.volumes[below]) / count(index)
        };

        log::trace!("target volume {target} lies in segment {index}, level {level}");
        Ok(level)
    }

    /// Returns the volume held at `level`, read from the table.
    ///
    /// Agrees with [`waterfill_core::volume`] up to rounding.
    #[must_use]
    pub fn volume(&self, level: f64) -> f64 {
        let submerged = self.heights.partition_point(|&height| height < level);
        if submerged == 0 {
            return 0.0;
        }
        let below = submerged - 1;
        self.volumes[below] + (level - self.heights[below]) * count(submerged)
    }

    /// Returns the terrain heights in ascending order.
    #[must_use]
    pub fn sorted_heights(&self) -> &[f64] {
        &self.heights
    }

    /// Returns the volume held when the level equals each sorted height.
    #[must_use]
    pub fn volumes(&self) -> &[f64] {
        &self.volumes
    }
}

/// Converts a point count to `f64`.
///
/// Terrains hold at most `u16::MAX` points, so the conversion is exact.
#[allow(clippy::cast_precision_loss)]
fn count(points: usize) -> f64 {
    points as f64
}
