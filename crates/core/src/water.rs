use crate::Terrain;

/// Returns the volume of water standing above `terrain` at `level`.
///
/// Each height contributes `max(level - height, 0)`. The result is
/// continuous, convex, and non-decreasing in `level`, piecewise linear with a
/// breakpoint at each distinct height, and exactly `0.0` for any level at or
/// below the lowest height.
///
/// When `level = 2.5`, the terrain `[1, 4, 2, 3]` holds `1.5` units of water
/// above index `0` and `0.5` units above index `2`:
///
/// ```
/// use waterfill_core::{Terrain, volume};
///
/// let terrain = Terrain::new(vec![1.0, 4.0, 2.0, 3.0]).unwrap();
/// assert_eq!(volume(&terrain, 2.5), 2.0);
/// ```
#[must_use]
pub fn volume(terrain: &Terrain, level: f64) -> f64 {
    terrain
        .heights()
        .iter()
        .map(|&height| (level - height).max(0.0))
        .sum()
}
