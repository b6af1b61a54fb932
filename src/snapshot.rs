//! Binary snapshot of a [`MatchState`] for persistence between events.
//!
//! Layout: 20-byte header followed by a JSON payload.
//!
//! | offset | size | field                     |
//! |--------|------|---------------------------|
//! | 0      | 4    | magic `SNKR`              |
//! | 4      | 4    | version (u32 LE)          |
//! | 8      | 4    | payload length (u32 LE)   |
//! | 12     | 4    | CRC32 of payload (u32 LE) |
//! | 16     | 4    | reserved, zero            |

use log::warn;
use thiserror::Error;

use crate::game::MatchState;
use crate::types::MatchSetup;

const MAGIC: &[u8; 4] = b"SNKR";
const VERSION: u32 = 1;
const HEADER_SIZE: usize = 20;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot too short: expected at least 20 bytes, got {0}")]
    TooShort(usize),
    #[error("invalid snapshot magic (expected SNKR)")]
    BadMagic,
    #[error("unsupported snapshot version: {0}")]
    UnsupportedVersion(u32),
    #[error("snapshot payload length mismatch: header says {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("CRC32 mismatch: expected {expected:#010x}, got {actual:#010x}")]
    CrcMismatch { expected: u32, actual: u32 },
    #[error("snapshot payload too large")]
    TooLarge,
    #[error("malformed snapshot payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("inconsistent match state: {0}")]
    InvalidState(String),
}

pub fn encode(state: &MatchState) -> Result<Vec<u8>, SnapshotError> {
    let payload = serde_json::to_vec(state)?;
    let len = u32::try_from(payload.len()).map_err(|_| SnapshotError::TooLarge)?;
    let crc = crc32fast::hash(&payload);

    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&VERSION.to_le_bytes());
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(&crc.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

pub fn decode(data: &[u8]) -> Result<MatchState, SnapshotError> {
    if data.len() < HEADER_SIZE {
        return Err(SnapshotError::TooShort(data.len()));
    }
    if &data[0..4] != MAGIC {
        return Err(SnapshotError::BadMagic);
    }

    let version = read_u32_le(data, 4);
    if version != VERSION {
        return Err(SnapshotError::UnsupportedVersion(version));
    }

    let expected_len = read_u32_le(data, 8) as usize;
    let payload = &data[HEADER_SIZE..];
    if payload.len() != expected_len {
        return Err(SnapshotError::LengthMismatch {
            expected: expected_len,
            actual: payload.len(),
        });
    }

    let expected_crc = read_u32_le(data, 12);
    let actual_crc = crc32fast::hash(payload);
    if actual_crc != expected_crc {
        return Err(SnapshotError::CrcMismatch {
            expected: expected_crc,
            actual: actual_crc,
        });
    }

    let state: MatchState = serde_json::from_slice(payload)?;
    state.validate().map_err(SnapshotError::InvalidState)?;
    Ok(state)
}

/// Decodes `data`, falling back to a fresh default match when it is unusable.
pub fn restore_or_default(data: &[u8]) -> MatchState {
    match decode(data) {
        Ok(state) => state,
        Err(err) => {
            warn!("discarding saved match: {err}");
            MatchState::from_checked_setup(MatchSetup::default())
        }
    }
}

/// Caller contract: `offset + 4 <= data.len()`.
fn read_u32_le(data: &[u8], offset: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&data[offset..offset + 4]);
    u32::from_le_bytes(bytes)
}
