//! Rock-Paper-Scissors moves and judging.

use crate::protocol::Outcome;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Rock-Paper-Scissors move.
///
/// The discriminants are the canonical wire encoding hashed into commitments.
/// Each move beats the one whose value is one less, cyclically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum Move {
    Rock = 1,
    Paper = 2,
    Scissors = 3,
}

/// Raw value outside `1..=3`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("invalid move value {0}, expected 1, 2 or 3")]
pub struct InvalidMove(pub u8);

impl Move {
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    pub fn value(self) -> u8 {
        self as u8
    }

    /// Check if this move beats the other
    pub fn beats(self, other: Move) -> bool {
        judge(self, other) == Outcome::Player1Wins
    }
}

impl From<Move> for u8 {
    fn from(m: Move) -> u8 {
        m.value()
    }
}

impl TryFrom<u8> for Move {
    type Error = InvalidMove;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Move::Rock),
            2 => Ok(Move::Paper),
            3 => Ok(Move::Scissors),
            other => Err(InvalidMove(other)),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Move::Rock => "rock",
            Move::Paper => "paper",
            Move::Scissors => "scissors",
        };
        write!(f, "{}", name)
    }
}

/// Judge player1's revealed move against player2's move.
pub fn judge(first: Move, second: Move) -> Outcome {
    let d = (i16::from(first.value()) - i16::from(second.value())).rem_euclid(3);
    match d {
        0 => Outcome::Draw,
        1 => Outcome::Player1Wins,
        _ => Outcome::Player2Wins,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn judge_raw(first: u8, second: u8) -> Outcome {
        judge(
            Move::try_from(first).unwrap(),
            Move::try_from(second).unwrap(),
        )
    }

    #[test]
    fn test_outcome_table() {
        assert_eq!(judge_raw(1, 2), Outcome::Player2Wins);
        assert_eq!(judge_raw(2, 1), Outcome::Player1Wins);
        assert_eq!(judge_raw(1, 1), Outcome::Draw);
        assert_eq!(judge_raw(3, 1), Outcome::Player1Wins);
        assert_eq!(judge_raw(1, 3), Outcome::Player2Wins);
    }

    #[test]
    fn test_rock_beats_scissors() {
        assert!(Move::Rock.beats(Move::Scissors));
        assert!(!Move::Scissors.beats(Move::Rock));
    }

    #[test]
    fn test_all_outcomes() {
        let mut p1_wins = 0;
        let mut p2_wins = 0;
        let mut draws = 0;

        for a in Move::ALL {
            for b in Move::ALL {
                match judge(a, b) {
                    Outcome::Player1Wins => p1_wins += 1,
                    Outcome::Player2Wins => p2_wins += 1,
                    Outcome::Draw => draws += 1,
                }
            }
        }

        assert_eq!(p1_wins, 3);
        assert_eq!(p2_wins, 3);
        assert_eq!(draws, 3);
    }

    #[test]
    fn test_move_encoding() {
        assert_eq!(Move::try_from(0), Err(InvalidMove(0)));
        assert_eq!(Move::try_from(4), Err(InvalidMove(4)));
        assert_eq!(
            InvalidMove(0).to_string(),
            "invalid move value 0, expected 1, 2 or 3"
        );
        assert_eq!(u8::from(Move::Scissors), 3);
        assert_eq!(serde_json::to_string(&Move::Paper).unwrap(), "2");
        assert!(serde_json::from_str::<Move>("0").is_err());
    }
}
