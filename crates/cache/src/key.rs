use std::fmt;

use waterfill_core::{Terrain, Volume};
use xxhash_rust::xxh32::xxh32;

const INTEGER_TAG: u8 = 0;
const FLOAT_TAG: u8 = 1;

/// Exact byte encoding of a `(terrain, volume)` instance.
///
/// The layout is the terrain length as a little-endian `u32`, each height as
/// little-endian `f64` bits, a tag byte (`0` integer, `1` float), and the
/// volume payload as eight little-endian bytes. Keys compare bytewise, so
/// `Volume::Integer(3)` and `Volume::Float(3.0)` are different keys, as are
/// heights `0.0` and `-0.0`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    bytes: Box<[u8]>,
}

impl CacheKey {
    /// Encodes an instance.
    #[must_use]
    pub fn new(terrain: &Terrain, volume: Volume) -> Self {
        let mut bytes = Vec::with_capacity(4 + 8 * terrain.len() + 9);

        // Terrain length is bounded by u16::MAX.
        #[allow(clippy::cast_possible_truncation)]
        bytes.extend_from_slice(&(terrain.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&terrain.to_le_bytes());

        match volume {
            Volume::Integer(value) => {
                bytes.push(INTEGER_TAG);
                bytes.extend_from_slice(&value.to_le_bytes());
            }
            Volume::Float(value) => {
                bytes.push(FLOAT_TAG);
                bytes.extend_from_slice(&value.to_le_bytes());
            }
        }

        Self {
            bytes: bytes.into_boxed_slice(),
        }
    }

    /// Wraps bytes read back from a store.
    pub(crate) fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes: bytes.into_boxed_slice(),
        }
    }

    /// Returns the encoded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns a short hash of the key for log lines.
    #[must_use]
    pub fn fingerprint(&self) -> u32 {
        xxh32(&self.bytes, 0)
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CacheKey({:08x}, {} bytes)", self.fingerprint(), self.bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terrain(heights: &[f64]) -> Terrain {
        Terrain::try_from(heights).expect("valid terrain")
    }

    #[test]
    fn layout() {
        let key = CacheKey::new(&terrain(&[1.0, 2.0]), Volume::Integer(3));
        let bytes = key.as_bytes();

        assert_eq!(bytes.len(), 4 + 16 + 9);
        assert_eq!(&bytes[..4], &2u32.to_le_bytes());
        assert_eq!(&bytes[4..12], &1.0f64.to_le_bytes());
        assert_eq!(&bytes[12..20], &2.0f64.to_le_bytes());
        assert_eq!(bytes[20], INTEGER_TAG);
        assert_eq!(&bytes[21..], &3i64.to_le_bytes());
    }

    #[test]
    fn identical_instances_share_a_key() {
        let a = CacheKey::new(&terrain(&[1.0, 2.0, 3.0]), Volume::Float(0.5));
        let b = CacheKey::new(&terrain(&[1.0, 2.0, 3.0]), Volume::Float(0.5));

        assert_eq!(a, b);
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn integer_and_float_volumes_are_distinct() {
        let heights = terrain(&[1.0, 2.0, 3.0, 4.0]);
        let int = CacheKey::new(&heights, Volume::Integer(3));
        let float = CacheKey::new(&heights, Volume::Float(3.0));

        assert_ne!(int, float);
    }

    #[test]
    fn height_order_matters() {
        let a = CacheKey::new(&terrain(&[1.0, 2.0]), Volume::Integer(1));
        let b = CacheKey::new(&terrain(&[2.0, 1.0]), Volume::Integer(1));

        assert_ne!(a, b);
    }

    #[test]
    fn round_trips_through_bytes() {
        let key = CacheKey::new(&terrain(&[-1.5]), Volume::Float(2.25));
        let restored = CacheKey::from_bytes(key.as_bytes().to_vec());

        assert_eq!(key, restored);
    }
}
