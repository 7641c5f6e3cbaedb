use crate::host::HostError;
use crate::protocol::GameId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GameError>;

/// Every way an engine or ledger call can be rejected.
///
/// A call that returns an error has changed nothing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("Game not found: {0}")]
    NotFound(GameId),

    #[error("Unauthorized: {0}")]
    Unauthorized(&'static str),

    #[error("Invalid game state: {0}")]
    InvalidState(&'static str),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Deadline exceeded: step closed at {deadline}, now {now}")]
    DeadlineExceeded { deadline: u64, now: u64 },

    #[error("Deadline not yet reached: step open until {deadline}, now {now}")]
    DeadlineNotYetReached { deadline: u64, now: u64 },

    #[error("Move does not match commitment")]
    CommitmentMismatch,

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,

    #[error("Escrow host error: {0}")]
    Host(#[from] HostError),
}
