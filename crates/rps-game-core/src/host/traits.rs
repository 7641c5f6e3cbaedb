//! Escrow host trait definition.

use crate::protocol::PlayerId;
use thiserror::Error;

/// Errors from the host's value-transfer primitives
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HostError {
    #[error("Insufficient funds: need {need}, have {available}")]
    InsufficientFunds { need: u64, available: u64 },

    #[error("Unknown account: {0}")]
    UnknownAccount(PlayerId),

    #[error("Transfer failed: {0}")]
    TransferFailed(String),
}

/// Value transfer into and out of the escrow, provided by the host environment.
///
/// Implementations can be:
/// - MockEscrowHost for testing and the demo service
/// - a real payment rail in production
pub trait EscrowHost: Send + Sync {
    /// Move `amount` from the caller's funds into escrow.
    ///
    /// Called at `start` and `join` after every precondition has passed;
    /// an error aborts the call with nothing changed.
    fn take_deposit(&self, from: PlayerId, amount: u64) -> Result<(), HostError>;

    /// Pay `amount` out of escrow to `to`.
    fn pay_out(&self, to: PlayerId, amount: u64) -> Result<(), HostError>;
}
