//! Token balance bookkeeping.
//!
//! The `Ledger` models the token transfer mechanics that are external
//! collaborators of the migration system: every asset balance held by any
//! party (users, markets, pools, the orchestrator) lives here, keyed by
//! `(asset, holder)`. Protocol traits receive a mutable ledger reference for
//! the duration of a call instead of owning balances themselves, which keeps
//! the whole execution context cheap to snapshot for rollback.

use crate::errors::{LedgerError, Result};
use alloy::primitives::{Address, U256};
use std::collections::HashMap;

/// In-memory token balance book keyed by `(asset, holder)`.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    balances: HashMap<(Address, Address), U256>,
}

impl Ledger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current balance of `asset` held by `holder`. Unknown pairs read as zero.
    pub fn balance_of(&self, asset: Address, holder: Address) -> U256 {
        self.balances
            .get(&(asset, holder))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    /// Credit `amount` of `asset` to `holder`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::BalanceOverflow` if the resulting balance would
    /// not fit in a `U256`.
    pub fn credit(&mut self, asset: Address, holder: Address, amount: U256) -> Result<()> {
        if amount.is_zero() {
            return Ok(());
        }
        let entry = self.balances.entry((asset, holder)).or_insert(U256::ZERO);
        *entry = entry
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow {
                asset,
                holder,
                amount,
            })?;
        Ok(())
    }

    /// Debit `amount` of `asset` from `holder`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InsufficientBalance` if the holder does not hold
    /// at least `amount`.
    pub fn debit(&mut self, asset: Address, holder: Address, amount: U256) -> Result<()> {
        if amount.is_zero() {
            return Ok(());
        }
        let available = self.balance_of(asset, holder);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                asset,
                holder,
                required: amount,
                available,
            }
            .into());
        }
        self.balances.insert((asset, holder), available - amount);
        Ok(())
    }

    /// Move `amount` of `asset` from `from` to `to`.
    ///
    /// The debit is applied before the credit, so a failed transfer leaves
    /// both balances untouched.
    pub fn transfer(
        &mut self,
        asset: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<()> {
        self.debit(asset, from, amount)?;
        self.credit(asset, to, amount)?;
        Ok(())
    }
}
