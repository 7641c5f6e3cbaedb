//! Pull-payment balances.
//!
//! The engine only ever credits. Balances leave through [`Ledger::withdraw`],
//! which pays out through the host before zeroing the entry.

use crate::host::EscrowHost;
use crate::protocol::PlayerId;
use crate::{GameError, Result};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct Ledger {
    balances: HashMap<PlayerId, u64>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Withdrawable balance, 0 for unknown identities
    pub fn balance_of(&self, who: PlayerId) -> u64 {
        self.balances.get(&who).copied().unwrap_or(0)
    }

    pub fn credit(&mut self, who: PlayerId, amount: u64) -> Result<()> {
        self.credit_all(&[(who, amount)])
    }

    /// Apply several credits as one unit: if any would overflow, none land.
    pub fn credit_all(&mut self, credits: &[(PlayerId, u64)]) -> Result<()> {
        let mut staged: HashMap<PlayerId, u64> = HashMap::with_capacity(credits.len());
        for &(who, amount) in credits {
            let current = staged
                .get(&who)
                .copied()
                .unwrap_or_else(|| self.balance_of(who));
            let next = current
                .checked_add(amount)
                .ok_or(GameError::ArithmeticOverflow)?;
            staged.insert(who, next);
        }

        self.balances.extend(staged);
        Ok(())
    }

    /// Drain `who`'s whole balance to their wallet.
    ///
    /// The entry is zeroed only after the host confirms the payout.
    pub fn withdraw(&mut self, who: PlayerId, host: &dyn EscrowHost) -> Result<u64> {
        let amount = self.balance_of(who);
        if amount == 0 {
            return Err(GameError::InvalidArgument(
                "nothing to withdraw".to_string(),
            ));
        }

        host.pay_out(who, amount)?;
        self.balances.remove(&who);

        tracing::info!("Player {} withdrew {}", who, amount);
        Ok(amount)
    }

    /// Sum of all balances
    pub fn total(&self) -> u128 {
        self.balances.values().map(|v| u128::from(*v)).sum()
    }
}
