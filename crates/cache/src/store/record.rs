//! Framing for records in a [`FileStore`](super::FileStore) log.
//!
//! Each record is a 16-byte header followed by a bincode payload:
//!
//! ```text
//! [0..4]    magic b"WFC1"
//! [4..8]    payload length (u32, little-endian)
//! [8..12]   xxh32 checksum of bytes [0..8] (u32, little-endian)
//! [12..16]  xxh32 checksum of the payload (u32, little-endian)
//! [16..]    payload
//! ```
//!
//! The header checksum lets a reader trust the length before acting on it,
//! so a frame that runs past the end of the log is only treated as torn when
//! its header verifies.

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh32::xxh32;

use crate::CacheKey;

use super::{CacheEntry, StoreError};

pub(super) const MAGIC: [u8; 4] = *b"WFC1";
pub(super) const HEADER_LEN: usize = 16;
const CHECKSUM_SEED: u32 = 0;

/// One logged change to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(super) enum Record {
    Put {
        key: Vec<u8>,
        level: f64,
        artifact: Vec<u8>,
    },
    Remove {
        key: Vec<u8>,
    },
}

/// Outcome of reading one record from the front of a buffer.
#[derive(Debug, PartialEq)]
pub(super) enum Decoded {
    /// A complete, verified record and the number of bytes it occupied.
    Complete { record: Record, len: usize },
    /// The buffer ends partway through a record.
    Torn,
}

impl Record {
    pub(super) fn put(key: &CacheKey, entry: &CacheEntry) -> Self {
        Self::Put {
            key: key.as_bytes().to_vec(),
            level: entry.level,
            artifact: entry.artifact.as_bytes().to_vec(),
        }
    }

    pub(super) fn remove(key: &CacheKey) -> Self {
        Self::Remove {
            key: key.as_bytes().to_vec(),
        }
    }

    /// Encodes the record with its header.
    pub(super) fn encode(&self) -> Result<Vec<u8>, StoreError> {
        let payload = bincode::serialize(self).map_err(StoreError::Encode)?;
        let len = u32::try_from(payload.len()).map_err(|_| {
            StoreError::Encode(Box::new(bincode::ErrorKind::Custom(format!(
                "record payload of {} bytes is too large",
                payload.len()
            ))))
        })?;

        let mut frame = Vec::with_capacity(HEADER_LEN + payload.len());
        frame.extend_from_slice(&MAGIC);
        frame.extend_from_slice(&len.to_le_bytes());
        let header_checksum = xxh32(&frame, CHECKSUM_SEED);
        frame.extend_from_slice(&header_checksum.to_le_bytes());
        frame.extend_from_slice(&xxh32(&payload, CHECKSUM_SEED).to_le_bytes());
        frame.extend_from_slice(&payload);
        Ok(frame)
    }
}

/// Reads the record at the front of `buf`, which starts at `offset` in the log.
///
/// # Errors
///
/// Returns [`StoreError::Corrupt`] if the record has a bad magic or header
/// checksum, or if a complete record has a payload checksum mismatch or a
/// payload that does not decode.
pub(super) fn decode(buf: &[u8], offset: u64) -> Result<Decoded, StoreError> {
    let corrupt = |reason: String| StoreError::Corrupt { offset, reason };

    if buf.len() < HEADER_LEN {
        return Ok(Decoded::Torn);
    }
    if buf[0..4] != MAGIC {
        return Err(corrupt(format!("bad magic {:02x?}", &buf[0..4])));
    }

    let header_checksum = read_u32(buf, 8);
    let actual = xxh32(&buf[0..8], CHECKSUM_SEED);
    if actual != header_checksum {
        return Err(corrupt(format!(
            "header checksum mismatch: expected {header_checksum:08x}, found {actual:08x}"
        )));
    }

    let len = read_u32(buf, 4) as usize;
    let Some(payload) = buf.get(HEADER_LEN..HEADER_LEN + len) else {
        return Ok(Decoded::Torn);
    };

    let payload_checksum = read_u32(buf, 12);
    let actual = xxh32(payload, CHECKSUM_SEED);
    if actual != payload_checksum {
        return Err(corrupt(format!(
            "payload checksum mismatch: expected {payload_checksum:08x}, found {actual:08x}"
        )));
    }

    let record = bincode::deserialize(payload).map_err(|err| corrupt(err.to_string()))?;
    Ok(Decoded::Complete {
        record,
        len: HEADER_LEN + len,
    })
}

fn read_u32(buf: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}
