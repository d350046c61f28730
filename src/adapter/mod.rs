//! Adapter contract protocol.
//!
//! An adapter is the protocol-specific plugin that knows how to read a
//! position out of one particular source lending market, clear its debts,
//! move its collateral, and re-establish the position in the target market.
//! New source protocols are integrated by implementing [`MigrationAdapter`]
//! and registering the implementation with the orchestrator; the orchestrator
//! itself is never modified.
//!
//! # Contract
//!
//! Every implementation must guarantee, for one `execute_migration` call:
//!
//! - `position_data` is decoded with [`crate::codec::Position`] and consumed
//!   within the call; borrow legs are processed strictly before collateral
//!   legs, each list in supplied order.
//! - Each borrow leg's debt is fully cleared (to dust tolerance), resolving
//!   the `All` sentinel against live accounting.
//! - Each swap respects its leg's bound: maximum input when buying debt
//!   asset, minimum output when selling collateral.
//! - When full migration is flagged, zero residual debt remains in the source
//!   market, or the call fails.
//! - On return, any remaining working funds sit on the orchestrator's
//!   balance; the adapter never repays the flash loan itself.
//!
//! Any violated guarantee must surface as an error so the orchestrator can
//! roll the execution context back.

pub mod lending;

pub use lending::LendingPoolAdapter;

use crate::errors::Result;
use crate::protocols::ExecutionContext;
use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// The flash-borrowed working capital handed to an adapter.
///
/// `holder` is the orchestrator address custodying the funds; adapters spend
/// from and return surplus to that balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashFunds {
    /// The loaned asset.
    pub asset: Address,
    /// Principal borrowed; zero for migrations needing no bridging liquidity.
    pub principal: U256,
    /// Flash-loan fee owed on top of the principal.
    pub fee: U256,
    /// The address whose ledger balance holds the funds.
    pub holder: Address,
}

impl FlashFunds {
    /// Principal plus fee: the balance the holder must present at settlement.
    pub fn repayment_due(&self) -> U256 {
        self.principal + self.fee
    }
}

/// Accounting summary an adapter reports back for the completion record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationSummary {
    /// Total debt repaid in the source market, in debt-asset units summed
    /// per leg.
    pub debt_repaid: U256,
    /// Total collateral withdrawn from the source market.
    pub collateral_withdrawn: U256,
    /// Total supplied into the target market.
    pub supplied: U256,
    /// Debt opened in the target market to fund flash-loan repayment.
    pub target_borrowed: U256,
}

/// Protocol-specific migration strategy.
///
/// Implementations are registered with the orchestrator as boxed trait
/// objects and looked up per call; they hold only configuration, never
/// per-migration state.
pub trait MigrationAdapter: Send {
    /// The adapter's address, used for registry authorization.
    fn address(&self) -> Address;

    /// Execute the migration for `user` into `target_market`.
    ///
    /// `working` carries the flash-borrowed funds (possibly zero) custodied
    /// at the orchestrator's balance. Returns the accounting summary for the
    /// completion record.
    fn execute_migration(
        &self,
        env: &mut ExecutionContext,
        user: Address,
        target_market: Address,
        position_data: &Bytes,
        working: &FlashFunds,
    ) -> Result<MigrationSummary>;

    /// Clone into a boxed trait object for registry snapshots.
    fn clone_box(&self) -> Box<dyn MigrationAdapter>;
}

impl Clone for Box<dyn MigrationAdapter> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
