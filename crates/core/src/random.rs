use rand::Rng;

use crate::{Terrain, Volume};

/// Returns a random problem instance `(terrain, volume)`.
///
/// The terrain has between 10 and 20 integer-valued heights in `[0, 20]`,
/// and the volume is an integer in `[1, 15 * len)`, so every instance has a
/// non-trivial, readable answer.
pub fn random_instance<R: Rng + ?Sized>(rng: &mut R) -> (Terrain, Volume) {
    let len: usize = rng.gen_range(10..=20);
    let heights: Vec<f64> = (0..len)
        .map(|_| f64::from(rng.gen_range(0_u8..=20)))
        .collect();
    #[allow(clippy::cast_possible_wrap)]
    let volume = rng.gen_range(1..(15 * len as i64));

    // Generated heights are finite and bounded in count, unwrap is safe
    let terrain = Terrain::new(heights).unwrap();
    (terrain, Volume::Integer(volume))
}
