//! Lending market boundary.
//!
//! Source and target protocol accounting is an external collaborator: this
//! trait specifies it exactly at the boundary the migration system touches.
//! Authorization and collateralization rules live behind the trait; errors a
//! market raises are bubbled up unchanged.

use crate::errors::Result;
use crate::ledger::Ledger;
use alloy::primitives::{Address, U256};

/// A lending market holding users' supplied collateral and outstanding debt.
///
/// Mutating operations act "on behalf of" a user and must enforce the user's
/// prior authorization of the operator; the migration system never moves
/// balances the user has not separately pre-authorized. Implementations are
/// boxed trait objects cloned via [`LendingMarket::clone_box`] so the whole
/// execution context can be snapshotted for rollback.
pub trait LendingMarket: Send {
    /// The market's address.
    fn address(&self) -> Address;

    /// The market's base (primary deposit/borrow) asset.
    fn base_asset(&self) -> Address;

    /// The user's outstanding debt in `debt_asset`.
    fn debt_of(&self, user: Address, debt_asset: Address) -> U256;

    /// The user's supplied collateral balance in `collateral_asset`.
    fn collateral_of(&self, user: Address, collateral_asset: Address) -> U256;

    /// The user's total outstanding debt across all assets, in the market's
    /// own accounting unit. Used for full-migration completeness checks.
    fn total_debt_of(&self, user: Address) -> U256;

    /// Repay up to `amount` of the user's debt in `debt_asset`, funded from
    /// `payer`'s ledger balance. Returns the amount actually repaid, which
    /// may be lower when the live debt is smaller than `amount`.
    fn repay_on_behalf(
        &mut self,
        ledger: &mut Ledger,
        payer: Address,
        user: Address,
        debt_asset: Address,
        amount: U256,
    ) -> Result<U256>;

    /// Withdraw `amount` of the user's collateral in `collateral_asset` to
    /// `recipient`. Fails when `operator` lacks the user's authorization or
    /// when the withdrawal would leave the user undercollateralized.
    fn withdraw_to(
        &mut self,
        ledger: &mut Ledger,
        operator: Address,
        user: Address,
        collateral_asset: Address,
        amount: U256,
        recipient: Address,
    ) -> Result<U256>;

    /// Supply `amount` of `asset` from `payer`'s ledger balance, crediting
    /// the position of `user`.
    fn supply_on_behalf(
        &mut self,
        ledger: &mut Ledger,
        payer: Address,
        user: Address,
        asset: Address,
        amount: U256,
    ) -> Result<()>;

    /// Open a borrow of `amount` in `asset` against `user`'s position, paying
    /// the proceeds to `recipient`. Fails when `operator` lacks the user's
    /// authorization or the position cannot carry the debt.
    fn borrow_on_behalf(
        &mut self,
        ledger: &mut Ledger,
        operator: Address,
        user: Address,
        asset: Address,
        amount: U256,
        recipient: Address,
    ) -> Result<()>;

    /// Clone into a boxed trait object for context snapshotting.
    fn clone_box(&self) -> Box<dyn LendingMarket>;
}

impl Clone for Box<dyn LendingMarket> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
