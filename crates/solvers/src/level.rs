mod breakpoints;
mod error;

pub use breakpoints::Breakpoints;
pub use error::Error;

use waterfill_core::Terrain;

/// Returns the lowest level at which `terrain` holds `target_volume`.
///
/// A zero target returns the terrain minimum exactly. A uniform terrain of
/// height `h` and length `n` returns `h + target_volume / n`.
///
/// Runs in `O(n log n)`. When solving many targets against the same terrain,
/// build a [`Breakpoints`] table once instead.
///
/// # Errors
///
/// Returns [`Error::InvalidTarget`] if `target_volume` is negative, NaN, or
/// infinite.
pub fn level(terrain: &Terrain, target_volume: f64) -> Result<f64, Error> {
    Breakpoints::new(terrain).level(target_volume)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use waterfill_core::volume;

    use crate::regula_falsi;

    fn terrain(heights: &[f64]) -> Terrain {
        Terrain::try_from(heights).expect("valid terrain")
    }

    fn random_terrain(rng: &mut ChaCha8Rng) -> Terrain {
        let len = rng.gen_range(1..=64);
        let heights: Vec<f64> = (0..len).map(|_| rng.gen_range(-50.0..50.0)).collect();
        Terrain::new(heights).expect("valid terrain")
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn known_levels() {
        let ascending = terrain(&[1.0, 2.0, 3.0, 4.0]);
        for (target, expected) in [(0.0, 1.0), (0.5, 1.5), (2.0, 2.5), (6.0, 4.0), (30.0, 10.0)] {
            assert_eq!(level(&ascending, target).unwrap(), expected);
        }

        let mixed = terrain(&[-1.0, 2.0, -3.0, -4.0]);
        for (target, expected) in [
            (0.0, -4.0),
            (0.5, -3.5),
            (8.0, 0.0),
            (12.5, 1.5),
            (14.0, 2.0),
            (18.0, 3.0),
        ] {
            assert_eq!(level(&mixed, target).unwrap(), expected);
        }
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn uniform_terrain() {
        let flat = terrain(&[4.0; 4]);
        assert_eq!(level(&flat, 0.0).unwrap(), 4.0);
        assert_eq!(level(&flat, 8.0).unwrap(), 6.0);
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn zero_target_returns_min_exactly() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..50 {
            let terrain = random_terrain(&mut rng);
            assert_eq!(level(&terrain, 0.0).unwrap(), terrain.min());
        }
    }

    #[test]
    fn recovers_target_volume() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..200 {
            let terrain = random_terrain(&mut rng);
            let target = rng.gen_range(0.0..5000.0);

            let found = level(&terrain, target).unwrap();

            assert_relative_eq!(
                volume(&terrain, found),
                target,
                epsilon = 1e-9,
                max_relative = 1e-9
            );
        }
    }

    #[test]
    fn rejects_invalid_targets() {
        let ascending = terrain(&[1.0, 2.0, 3.0, 4.0]);
        for target in [-1.0, -1e-300, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                level(&ascending, target),
                Err(Error::InvalidTarget { .. })
            ));
        }
    }

    #[test]
    fn agrees_with_regula_falsi() {
        let mut rng = ChaCha8Rng::seed_from_u64(19);
        let config = regula_falsi::Config::default();

        for _ in 0..200 {
            let terrain = random_terrain(&mut rng);
            let target = rng.gen_range(0.0..2000.0);

            let closed_form = level(&terrain, target).unwrap();
            let iterative = regula_falsi::solve_unobserved(&terrain, target, &config)
                .expect("regula falsi converges");

            assert_relative_eq!(
                closed_form,
                iterative.level,
                epsilon = 1e-5,
                max_relative = 1e-6
            );
        }
    }
}
