//! In-memory escrow host for tests and the demo service.

use super::traits::{EscrowHost, HostError};
use crate::protocol::PlayerId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct Accounts {
    wallets: HashMap<PlayerId, u64>,
    /// Funds currently held in escrow
    escrowed: u64,
}

/// In-memory wallets plus an escrow pot
#[derive(Clone, Default)]
pub struct MockEscrowHost {
    accounts: Arc<Mutex<Accounts>>,
}

impl MockEscrowHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn accounts(&self) -> MutexGuard<'_, Accounts> {
        self.accounts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add `amount` to a player's wallet, opening it if needed
    pub fn fund(&self, player: PlayerId, amount: u64) {
        let mut accounts = self.accounts();
        let wallet = accounts.wallets.entry(player).or_insert(0);
        *wallet = wallet.saturating_add(amount);
    }

    /// Get a player's wallet balance
    pub fn wallet_balance(&self, player: PlayerId) -> u64 {
        self.accounts().wallets.get(&player).copied().unwrap_or(0)
    }

    /// Total currently held in escrow
    pub fn escrowed(&self) -> u64 {
        self.accounts().escrowed
    }
}

impl EscrowHost for MockEscrowHost {
    fn take_deposit(&self, from: PlayerId, amount: u64) -> Result<(), HostError> {
        if amount == 0 {
            return Ok(());
        }

        let mut accounts = self.accounts();
        let available = *accounts
            .wallets
            .get(&from)
            .ok_or(HostError::UnknownAccount(from))?;
        if available < amount {
            return Err(HostError::InsufficientFunds {
                need: amount,
                available,
            });
        }
        let escrowed = accounts
            .escrowed
            .checked_add(amount)
            .ok_or_else(|| HostError::TransferFailed("escrow pot overflow".to_string()))?;

        accounts.wallets.insert(from, available - amount);
        accounts.escrowed = escrowed;
        Ok(())
    }

    fn pay_out(&self, to: PlayerId, amount: u64) -> Result<(), HostError> {
        let mut accounts = self.accounts();
        if accounts.escrowed < amount {
            return Err(HostError::TransferFailed(format!(
                "escrow holds {}, cannot pay {}",
                accounts.escrowed, amount
            )));
        }

        accounts.escrowed -= amount;
        let wallet = accounts.wallets.entry(to).or_insert(0);
        *wallet = wallet.saturating_add(amount);
        Ok(())
    }
}
