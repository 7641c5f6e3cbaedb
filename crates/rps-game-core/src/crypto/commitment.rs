//! Commitment and Salt for the commit-reveal scheme.

use crate::protocol::GameId;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Secret salt player1 mixes into their commitment
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Salt(#[serde(with = "super::hex32")] [u8; 32]);

impl Salt {
    /// Create a new random salt
    pub fn random() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Right-pad a short passphrase with zeros into a 32-byte salt.
    ///
    /// Returns `None` when the passphrase does not fit.
    pub fn from_passphrase(passphrase: &str) -> Option<Self> {
        let raw = passphrase.as_bytes();
        if raw.len() > 32 {
            return None;
        }
        let mut bytes = [0u8; 32];
        bytes[..raw.len()].copy_from_slice(raw);
        Some(Self(bytes))
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Salt({}..)", hex::encode(&self.0[..4]))
    }
}

impl FromStr for Salt {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        super::decode_hex32(s).map(Self)
    }
}

/// Commitment = H(game_id || move || salt)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commitment(#[serde(with = "super::hex32")] [u8; 32]);

impl Commitment {
    /// The all-zero commitment, treated as "no commitment"
    pub const EMPTY: Commitment = Commitment([0u8; 32]);

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for Commitment {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        super::decode_hex32(s).map(Self)
    }
}

/// Compute the game-scoped commitment for a move.
///
/// The game id is hashed in front of the move so a (move, salt) pair
/// captured in one game never opens a commitment in another. The move
/// value is hashed as given; callers validate it.
pub fn compute_commitment(game_id: GameId, move_value: u8, salt: &Salt) -> Commitment {
    let mut hasher = Sha256::new();
    hasher.update(game_id.as_u64().to_be_bytes());
    hasher.update([move_value]);
    hasher.update(salt.as_bytes());
    Commitment(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commitment_is_deterministic() {
        let salt = Salt::from_passphrase("super secure pwd").unwrap();
        let first = compute_commitment(GameId::new(0), 1, &salt);
        let second = compute_commitment(GameId::new(0), 1, &salt);

        assert_eq!(first, second);
    }

    #[test]
    fn test_commitment_bound_to_game_id() {
        let salt = Salt::random();
        let in_game_0 = compute_commitment(GameId::new(0), 1, &salt);
        let in_game_1 = compute_commitment(GameId::new(1), 1, &salt);

        assert_ne!(in_game_0, in_game_1);
    }

    #[test]
    fn test_different_moves_different_commitments() {
        let salt = Salt::random();
        let rock = compute_commitment(GameId::new(3), 1, &salt);
        let paper = compute_commitment(GameId::new(3), 2, &salt);

        assert_ne!(rock, paper);
    }

    #[test]
    fn test_different_salts_different_commitments() {
        let id = GameId::new(3);

        assert_ne!(
            compute_commitment(id, 1, &Salt::random()),
            compute_commitment(id, 1, &Salt::random())
        );
    }

    #[test]
    fn test_passphrase_is_zero_padded() {
        let salt = Salt::from_passphrase("s").unwrap();

        assert_eq!(salt.as_bytes()[0], b's');
        assert!(salt.as_bytes()[1..].iter().all(|b| *b == 0));
        assert!(Salt::from_passphrase(&"x".repeat(33)).is_none());
    }

    #[test]
    fn test_empty_commitment() {
        assert!(Commitment::EMPTY.is_empty());
        assert!(!compute_commitment(GameId::new(0), 1, &Salt::random()).is_empty());
    }

    #[test]
    fn test_commitment_hex_roundtrip_accepts_prefix() {
        let commitment = compute_commitment(GameId::new(9), 3, &Salt::random());
        let text = format!("0x{}", commitment);

        assert_eq!(text.parse::<Commitment>().unwrap(), commitment);
        assert!("abcd".parse::<Commitment>().is_err());
    }
}
