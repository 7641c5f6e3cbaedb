//! RPS Game Core Library
//!
//! Two-party Rock-Paper-Scissors with escrowed stakes. Player1 commits to a
//! game-scoped hash of their move, player2 answers in the clear, player1
//! reveals, and the stake is credited to a pull-payment ledger. Every step
//! has a deadline; anyone may `claim` a game whose current actor missed it.

pub mod clock;
pub mod crypto;
pub mod engine;
pub mod error;
pub mod games;
pub mod host;
pub mod ledger;
pub mod protocol;

pub use clock::{Clock, ManualClock, SystemClock};
pub use crypto::{compute_commitment, Commitment, Salt};
pub use engine::{EngineConfig, Game, GameEngine, GameState};
pub use error::{GameError, Result};
pub use games::{judge, Move};
pub use host::{EscrowHost, HostError, MockEscrowHost};
pub use ledger::Ledger;
pub use protocol::{GameEvent, GameId, Outcome, PlayerId, Seat};
