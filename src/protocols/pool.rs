//! Flash-loan liquidity pool.
//!
//! A `LiquidityPool` transiently lends its own ledger balance within a single
//! call: it transfers the principal to the receiver, invokes the receiver's
//! callback, and pulls principal plus fee back before returning. If the
//! receiver cannot cover the repayment the whole call fails, and the
//! orchestrator rolls the execution context back.

use crate::errors::{ProtocolError, Result};
use crate::protocols::ExecutionContext;
use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// Receiver side of the flash-loan primitive.
///
/// Implemented by the migration orchestrator. The pool passes its own address
/// as `caller` so the receiver can authenticate the callback's origin.
pub trait FlashLoanReceiver {
    /// The address whose ledger balance receives the principal.
    fn receiver_address(&self) -> Address;

    /// Invoked by the pool after the principal has been credited. On return,
    /// the receiver must hold at least `amount + fee` of `asset`.
    fn on_flash_loan(
        &mut self,
        env: &mut ExecutionContext,
        caller: Address,
        asset: Address,
        amount: U256,
        fee: U256,
        data: &Bytes,
    ) -> Result<()>;
}

/// A single-asset flash-loan pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityPool {
    address: Address,
    asset: Address,
    fee_bps: u64,
}

impl LiquidityPool {
    /// Create a pool lending `asset` at `fee_bps` basis points per loan.
    pub fn new(address: Address, asset: Address, fee_bps: u64) -> Self {
        Self {
            address,
            asset,
            fee_bps,
        }
    }

    /// The pool's address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The asset this pool lends.
    pub fn asset(&self) -> Address {
        self.asset
    }

    /// The loan fee for `amount`, rounded up so repayment can never be
    /// satisfied by rounding dust.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::FeeOverflow` when `amount * fee_bps` does not
    /// fit in a `U256`.
    pub fn fee_for(&self, amount: U256) -> Result<U256> {
        let bps = U256::from(self.fee_bps);
        let denominator = U256::from(10_000u64);
        let scaled = amount
            .checked_mul(bps)
            .and_then(|s| s.checked_add(denominator - U256::from(1u64)))
            .ok_or(ProtocolError::FeeOverflow {
                pool: self.address,
                amount,
            })?;
        Ok(scaled / denominator)
    }

    /// Flash-lend `amount` to `receiver` and invoke its callback with `data`.
    ///
    /// # Errors
    ///
    /// Fails when the pool lacks liquidity, when the callback fails, or when
    /// the receiver cannot repay principal plus fee.
    pub fn flash<R: FlashLoanReceiver>(
        &self,
        env: &mut ExecutionContext,
        receiver: &mut R,
        amount: U256,
        data: &Bytes,
    ) -> Result<()> {
        let available = env.ledger.balance_of(self.asset, self.address);
        if amount > available {
            return Err(ProtocolError::InsufficientPoolLiquidity {
                pool: self.address,
                requested: amount,
                available,
            }
            .into());
        }

        let fee = self.fee_for(amount)?;
        let borrower = receiver.receiver_address();

        tracing::debug!(
            pool = %self.address,
            asset = %self.asset,
            amount = %amount,
            fee = %fee,
            borrower = %borrower,
            "Flash loan issued"
        );

        env.ledger.transfer(self.asset, self.address, borrower, amount)?;
        receiver.on_flash_loan(env, self.address, self.asset, amount, fee, data)?;
        env.ledger
            .transfer(self.asset, borrower, self.address, amount + fee)?;

        tracing::debug!(
            pool = %self.address,
            repaid = %(amount + fee),
            "Flash loan repaid"
        );

        Ok(())
    }
}
