//! The per-game record and its precondition checks.

use crate::crypto::Commitment;
use crate::games::Move;
use crate::protocol::{GameId, Outcome, PlayerId, Seat};
use crate::{GameError, Result};
use serde::{Deserialize, Serialize};

/// Lifecycle of a game. An id that was never handed out is the implicit
/// initial state; nothing leaves `Finished`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    WaitingForOpponent,
    Active,
    Finished,
}

/// Snapshot of one game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub(super) id: GameId,
    pub(super) player1: PlayerId,
    pub(super) player2: Option<PlayerId>,
    pub(super) stake: u64,
    pub(super) state: GameState,
    pub(super) step_duration: u64,
    pub(super) next_deadline: u64,
    pub(super) commitment1: Option<Commitment>,
    pub(super) move2: Option<Move>,
    pub(super) move1_revealed: Option<Move>,
    pub(super) outcome: Option<Outcome>,
}

impl Game {
    pub(super) fn open(
        id: GameId,
        owner: PlayerId,
        stake: u64,
        step_duration: u64,
        next_deadline: u64,
    ) -> Self {
        Self {
            id,
            player1: owner,
            player2: None,
            stake,
            state: GameState::WaitingForOpponent,
            step_duration,
            next_deadline,
            commitment1: None,
            move2: None,
            move1_revealed: None,
            outcome: None,
        }
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn player1(&self) -> PlayerId {
        self.player1
    }

    pub fn player2(&self) -> Option<PlayerId> {
        self.player2
    }

    pub fn stake(&self) -> u64 {
        self.stake
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn step_duration(&self) -> u64 {
        self.step_duration
    }

    pub fn next_deadline(&self) -> u64 {
        self.next_deadline
    }

    pub fn commitment1(&self) -> Option<Commitment> {
        self.commitment1
    }

    pub fn move2(&self) -> Option<Move> {
        self.move2
    }

    pub fn move1_revealed(&self) -> Option<Move> {
        self.move1_revealed
    }

    /// Set once the game is `Finished` through reveal or claim
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub(super) fn require_player1(&self, caller: PlayerId) -> Result<()> {
        if caller != self.player1 {
            return Err(GameError::Unauthorized("caller is not player1"));
        }
        Ok(())
    }

    pub(super) fn require_player2(&self, caller: PlayerId) -> Result<()> {
        if self.player2 != Some(caller) {
            return Err(GameError::Unauthorized("caller is not player2"));
        }
        Ok(())
    }

    pub(super) fn require_state(&self, expected: GameState) -> Result<()> {
        if self.state != expected {
            return Err(GameError::InvalidState(match expected {
                GameState::WaitingForOpponent => "game is not waiting for an opponent",
                GameState::Active => "game is not active",
                GameState::Finished => "game is not finished",
            }));
        }
        Ok(())
    }

    pub(super) fn require_open_step(&self, now: u64) -> Result<()> {
        if now >= self.next_deadline {
            return Err(GameError::DeadlineExceeded {
                deadline: self.next_deadline,
                now,
            });
        }
        Ok(())
    }

    pub(super) fn require_missed_step(&self, now: u64) -> Result<()> {
        if now < self.next_deadline {
            return Err(GameError::DeadlineNotYetReached {
                deadline: self.next_deadline,
                now,
            });
        }
        Ok(())
    }

    /// `now + step_duration`, rejected instead of wrapping
    pub(super) fn deadline_from(&self, now: u64) -> Result<u64> {
        deadline_after(now, self.step_duration)
    }

    /// The seat that failed to act before the deadline, judged by which
    /// fields are populated.
    pub(super) fn missed_step(&self) -> Seat {
        match (self.commitment1, self.move2) {
            (None, _) => Seat::Player1,
            (Some(_), None) => Seat::Player2,
            (Some(_), Some(_)) => Seat::Player1,
        }
    }

    /// Ledger credits settling this game's stake for `outcome`.
    ///
    /// On a draw player2 gets `stake / 2` and player1 the rest, so the
    /// credits always sum to the stake.
    pub(super) fn payouts(&self, outcome: Outcome) -> Result<Vec<(PlayerId, u64)>> {
        let player2 = self
            .player2
            .ok_or(GameError::InvalidState("game has no opponent"))?;

        Ok(match outcome {
            Outcome::Player1Wins => vec![(self.player1, self.stake)],
            Outcome::Player2Wins => vec![(player2, self.stake)],
            Outcome::Draw => {
                let half = self.stake / 2;
                vec![(self.player1, self.stake - half), (player2, half)]
            }
        })
    }
}

pub(super) fn deadline_after(now: u64, step_duration: u64) -> Result<u64> {
    now.checked_add(step_duration)
        .ok_or(GameError::ArithmeticOverflow)
}
