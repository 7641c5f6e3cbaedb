//! Notifications emitted by the engine.

use crate::crypto::Commitment;
use crate::games::Move;
use crate::protocol::{GameId, Outcome, PlayerId};
use serde::{Deserialize, Serialize};

/// One notification per successful transition.
///
/// `Revealed` is always immediately followed by `Outcome` for the same game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    Started {
        id: GameId,
        owner: PlayerId,
        stake: u64,
    },
    Declined {
        owner: PlayerId,
        id: GameId,
    },
    Joined {
        player: PlayerId,
        id: GameId,
    },
    FirstMoved {
        player: PlayerId,
        id: GameId,
        commitment: Commitment,
    },
    SecondMoved {
        player: PlayerId,
        id: GameId,
        #[serde(rename = "move")]
        second_move: Move,
    },
    Revealed {
        player: PlayerId,
        id: GameId,
        #[serde(rename = "move")]
        first_move: Move,
    },
    Outcome {
        id: GameId,
        outcome: Outcome,
        stake: u64,
    },
    Claimed {
        id: GameId,
        outcome: Outcome,
        stake: u64,
    },
}

impl GameEvent {
    pub fn game_id(&self) -> GameId {
        match self {
            GameEvent::Started { id, .. }
            | GameEvent::Declined { id, .. }
            | GameEvent::Joined { id, .. }
            | GameEvent::FirstMoved { id, .. }
            | GameEvent::SecondMoved { id, .. }
            | GameEvent::Revealed { id, .. }
            | GameEvent::Outcome { id, .. }
            | GameEvent::Claimed { id, .. } => *id,
        }
    }
}
