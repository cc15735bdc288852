//! Binary configuration snapshot
//!
//! The persisted and over-the-wire form of [`Config`]. The body is
//! postcard-serialized and wrapped in a small header and a CRC32 trailer:
//!
//! ```text
//! ┌───────┬─────────┬──────────┬──────────────┬───────┐
//! │ MAGIC │ VERSION │ BODY LEN │ BODY         │ CRC32 │
//! │ 4B LE │ 1B      │ 2B LE    │ postcard     │ 4B LE │
//! └───────┴─────────┴──────────┴──────────────┴───────┘
//! ```
//!
//! Decoding validates the config, so a snapshot that decodes is safe to
//! hand to the core.

use core::fmt;

use heapless::Vec;

use super::types::Config;
use super::validation::ConfigError;

/// Magic number to identify a config snapshot ("CLCF")
pub const SNAPSHOT_MAGIC: u32 = 0x4643_4C43;

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u8 = 1;

/// Header bytes before the body
pub const SNAPSHOT_HEADER_LEN: usize = 4 + 1 + 2;

/// Trailer bytes after the body
pub const SNAPSHOT_TRAILER_LEN: usize = 4;

/// Largest encoded snapshot; fits a single protocol frame
pub const MAX_SNAPSHOT_SIZE: usize = 240;

/// Snapshot encode/decode errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SnapshotError {
    /// Output buffer cannot hold the snapshot
    BufferTooSmall,
    /// Input ends before the declared body and trailer
    Truncated,
    /// Magic number mismatch
    BadMagic,
    /// Snapshot written by an incompatible format version
    UnsupportedVersion(u8),
    /// Body CRC does not match the trailer
    ChecksumMismatch,
    /// Body is not a valid postcard config
    Decode,
    /// Serializer failure other than running out of space
    Encode,
    /// Body decoded but the config fails validation
    Invalid(ConfigError),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::BufferTooSmall => f.write_str("buffer too small for snapshot"),
            SnapshotError::Truncated => f.write_str("snapshot truncated"),
            SnapshotError::BadMagic => f.write_str("not a config snapshot"),
            SnapshotError::UnsupportedVersion(v) => write!(f, "unsupported snapshot version {}", v),
            SnapshotError::ChecksumMismatch => f.write_str("snapshot checksum mismatch"),
            SnapshotError::Decode => f.write_str("snapshot body is malformed"),
            SnapshotError::Encode => f.write_str("failed to serialize config"),
            SnapshotError::Invalid(e) => write!(f, "invalid config: {}", e),
        }
    }
}

impl From<ConfigError> for SnapshotError {
    fn from(e: ConfigError) -> Self {
        SnapshotError::Invalid(e)
    }
}

/// Encode a config into `buffer`
///
/// Invalid configs are refused so they can never be persisted.
/// Returns the number of bytes written.
pub fn encode(config: &Config, buffer: &mut [u8]) -> Result<usize, SnapshotError> {
    config.validate()?;

    if buffer.len() < SNAPSHOT_HEADER_LEN + SNAPSHOT_TRAILER_LEN {
        return Err(SnapshotError::BufferTooSmall);
    }
    let body_end_max = buffer.len() - SNAPSHOT_TRAILER_LEN;

    let body_len = postcard::to_slice(config, &mut buffer[SNAPSHOT_HEADER_LEN..body_end_max])
        .map_err(|e| match e {
            postcard::Error::SerializeBufferFull => SnapshotError::BufferTooSmall,
            _ => SnapshotError::Encode,
        })?
        .len();
    let body_end = SNAPSHOT_HEADER_LEN + body_len;

    buffer[0..4].copy_from_slice(&SNAPSHOT_MAGIC.to_le_bytes());
    buffer[4] = SNAPSHOT_VERSION;
    buffer[5..7].copy_from_slice(&(body_len as u16).to_le_bytes());

    let crc = crc32(&buffer[SNAPSHOT_HEADER_LEN..body_end]);
    buffer[body_end..body_end + SNAPSHOT_TRAILER_LEN].copy_from_slice(&crc.to_le_bytes());

    Ok(body_end + SNAPSHOT_TRAILER_LEN)
}

/// Encode a config into a fixed-capacity vector
pub fn encode_to_vec(config: &Config) -> Result<Vec<u8, MAX_SNAPSHOT_SIZE>, SnapshotError> {
    let mut buffer = [0u8; MAX_SNAPSHOT_SIZE];
    let len = encode(config, &mut buffer)?;
    let mut vec = Vec::new();
    vec.extend_from_slice(&buffer[..len])
        .map_err(|_| SnapshotError::BufferTooSmall)?;
    Ok(vec)
}

/// Decode and validate a snapshot
pub fn decode(bytes: &[u8]) -> Result<Config, SnapshotError> {
    if bytes.len() < SNAPSHOT_HEADER_LEN {
        return Err(SnapshotError::Truncated);
    }

    let magic = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    if magic != SNAPSHOT_MAGIC {
        return Err(SnapshotError::BadMagic);
    }
    if bytes[4] != SNAPSHOT_VERSION {
        return Err(SnapshotError::UnsupportedVersion(bytes[4]));
    }

    let body_len = u16::from_le_bytes([bytes[5], bytes[6]]) as usize;
    let body_end = SNAPSHOT_HEADER_LEN + body_len;
    if bytes.len() < body_end + SNAPSHOT_TRAILER_LEN {
        return Err(SnapshotError::Truncated);
    }

    let body = &bytes[SNAPSHOT_HEADER_LEN..body_end];
    let stored_crc = u32::from_le_bytes([
        bytes[body_end],
        bytes[body_end + 1],
        bytes[body_end + 2],
        bytes[body_end + 3],
    ]);
    if stored_crc != crc32(body) {
        return Err(SnapshotError::ChecksumMismatch);
    }

    let config: Config = postcard::from_bytes(body).map_err(|_| SnapshotError::Decode)?;
    config.validate()?;
    Ok(config)
}

/// CRC32 (IEEE 802.3) over a byte slice
pub fn crc32(data: &[u8]) -> u32 {
    !crc32_update(0xFFFF_FFFF, data)
}

/// Simple CRC32 update function (IEEE 802.3 polynomial)
fn crc32_update(crc: u32, data: &[u8]) -> u32 {
    const POLY: u32 = 0xEDB88320;
    let mut crc = crc;

    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ POLY;
            } else {
                crc >>= 1;
            }
        }
    }

    crc
}
