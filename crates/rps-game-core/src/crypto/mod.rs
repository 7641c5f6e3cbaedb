//! Cryptographic primitives for the commit-reveal protocol.
//!
//! This module provides:
//! - Commitment and Salt for the commit-reveal scheme
//! - `compute_commitment`, the game-scoped hash player1 commits with

mod commitment;

pub use commitment::{compute_commitment, Commitment, Salt};

fn decode_hex32(s: &str) -> Result<[u8; 32], hex::FromHexError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    let mut bytes = [0u8; 32];
    hex::decode_to_slice(s, &mut bytes)?;
    Ok(bytes)
}

/// Serde helpers encoding 32-byte arrays as hex strings
mod hex32 {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], s: S) -> Result<S::Ok, S::Error> {
        hex::encode(bytes).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; 32], D::Error> {
        let hex_str = String::deserialize(d)?;
        super::decode_hex32(&hex_str).map_err(serde::de::Error::custom)
    }
}
