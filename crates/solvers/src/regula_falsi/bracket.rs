use waterfill_core::{Terrain, volume};

/// A level interval whose volumes straddle the target.
///
/// The invariant `lo_volume <= target <= hi_volume` holds from construction
/// through every [`Bracket::shrink`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    lo: f64,
    hi: f64,
    lo_volume: f64,
    hi_volume: f64,
}

impl Bracket {
    /// Creates the starting bracket for a positive target.
    ///
    /// The terrain minimum holds no water. Raising the level to
    /// `max + target / n` puts at least `target / n` above every point, so the
    /// upper end holds at least the target.
    pub(super) fn initial(terrain: &Terrain, target: f64) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let hi = terrain.max() + target / terrain.len() as f64;
        Self {
            lo: terrain.min(),
            hi,
            lo_volume: 0.0,
            hi_volume: volume(terrain, hi),
        }
    }

    /// Returns the bracket bounds as an array.
    #[must_use]
    pub fn as_array(&self) -> [f64; 2] {
        [self.lo, self.hi]
    }

    /// Returns the volumes held at the bracket bounds.
    #[must_use]
    pub fn volumes(&self) -> [f64; 2] {
        [self.lo_volume, self.hi_volume]
    }

    /// Returns the bracket width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }

    /// Returns the level where the chord between the bounds meets `target`.
    #[must_use]
    pub fn interpolate(&self, target: f64) -> f64 {
        let fraction = (target - self.lo_volume) / (self.hi_volume - self.lo_volume);
        self.lo + fraction * self.width()
    }

    /// Replaces the bound on the same side of `target` as `level_volume`.
    pub(super) fn shrink(&mut self, level: f64, level_volume: f64, target: f64) {
        if level_volume > target {
            self.hi = level;
            self.hi_volume = level_volume;
        } else {
            self.lo = level;
            self.lo_volume = level_volume;
        }
    }
}
