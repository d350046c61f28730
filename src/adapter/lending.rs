//! Reference adapter for pool-style lending markets.
//!
//! `LendingPoolAdapter` migrates a position out of one configured source
//! market: it clears each borrow leg with working capital (swapping into the
//! debt asset when needed), withdraws and converts each collateral leg into
//! the target market, and finally re-borrows from the target on the user's
//! behalf to cover any flash-loan repayment shortfall. That closing borrow is
//! how the debt side of the position re-materializes in the target protocol.

use crate::adapter::{FlashFunds, MigrationAdapter, MigrationSummary};
use crate::codec::{Position, SwapPath};
use crate::config::MigratorConfig;
use crate::errors::{AdapterError, Result};
use crate::ledger::Ledger;
use crate::protocols::{ExecutionContext, LendingMarket, SwapAmount, SwapVenue};
use alloy::primitives::{Address, Bytes, U256};
use std::collections::HashMap;

/// Migration strategy for one pool-style source lending market.
#[derive(Debug, Clone)]
pub struct LendingPoolAdapter {
    address: Address,
    source_market: Address,
    dust_tolerance: U256,
}

impl LendingPoolAdapter {
    /// Create an adapter for `source_market`.
    ///
    /// `dust_tolerance` is the residual source debt still considered cleared
    /// in full-migration completeness checks.
    pub fn new(address: Address, source_market: Address, dust_tolerance: U256) -> Self {
        Self {
            address,
            source_market,
            dust_tolerance,
        }
    }

    /// Create an adapter for `source_market` with the dust tolerance from
    /// the system configuration.
    pub fn from_config(address: Address, source_market: Address, config: &MigratorConfig) -> Self {
        Self::new(address, source_market, U256::from(config.dust_tolerance))
    }

    /// The source market this adapter migrates away from.
    pub fn source_market(&self) -> Address {
        self.source_market
    }

    fn market_mut<'a>(
        markets: &'a mut HashMap<Address, Box<dyn LendingMarket>>,
        address: Address,
        missing: fn(Address) -> AdapterError,
    ) -> Result<&'a mut Box<dyn LendingMarket>> {
        markets.get_mut(&address).ok_or_else(|| missing(address).into())
    }

    /// Convert working funds into `amount` of the leg's debt asset, then
    /// repay. Returns the amount actually repaid.
    #[allow(clippy::too_many_arguments)]
    fn clear_borrow_leg(
        &self,
        ledger: &mut Ledger,
        markets: &mut HashMap<Address, Box<dyn LendingMarket>>,
        venue: &dyn SwapVenue,
        user: Address,
        working: &FlashFunds,
        path: &SwapPath,
        debt_asset: Address,
        amount: U256,
        swap_bound: U256,
    ) -> Result<U256> {
        if path.end_asset() != debt_asset {
            return Err(AdapterError::PathEndMismatch {
                expected: debt_asset,
                actual: path.end_asset(),
            }
            .into());
        }

        if !path.is_identity() {
            if path.start_asset() != working.asset {
                return Err(AdapterError::PathStartMismatch {
                    expected: working.asset,
                    actual: path.start_asset(),
                }
                .into());
            }
            // Buy exactly the debt amount; the bound caps the input spent.
            let spent = venue.swap(ledger, working.holder, path, SwapAmount::ExactOut(amount))?;
            if spent > swap_bound {
                return Err(AdapterError::SwapBoundExceeded {
                    bound: swap_bound,
                    actual: spent,
                }
                .into());
            }
            tracing::debug!(
                debt_asset = %debt_asset,
                bought = %amount,
                spent = %spent,
                bound = %swap_bound,
                "Converted working funds into debt asset"
            );
        } else if debt_asset != working.asset {
            return Err(AdapterError::PathStartMismatch {
                expected: working.asset,
                actual: debt_asset,
            }
            .into());
        }

        let source = Self::market_mut(markets, self.source_market, |market| {
            AdapterError::UnknownSourceMarket { market }
        })?;
        source.repay_on_behalf(ledger, working.holder, user, debt_asset, amount)
    }

    /// Withdraw a collateral leg, convert it, and supply the proceeds to the
    /// target market. Returns `(withdrawn, supplied)`.
    #[allow(clippy::too_many_arguments)]
    fn move_collateral_leg(
        &self,
        ledger: &mut Ledger,
        markets: &mut HashMap<Address, Box<dyn LendingMarket>>,
        venue: &dyn SwapVenue,
        user: Address,
        target_market: Address,
        working: &FlashFunds,
        path: &SwapPath,
        collateral_asset: Address,
        amount: U256,
        swap_bound: U256,
    ) -> Result<(U256, U256)> {
        if path.start_asset() != collateral_asset {
            return Err(AdapterError::PathStartMismatch {
                expected: collateral_asset,
                actual: path.start_asset(),
            }
            .into());
        }

        let source = Self::market_mut(markets, self.source_market, |market| {
            AdapterError::UnknownSourceMarket { market }
        })?;
        let withdrawn = source.withdraw_to(
            ledger,
            working.holder,
            user,
            collateral_asset,
            amount,
            working.holder,
        )?;

        let (deposit_asset, deposit_amount) = if path.is_identity() {
            (collateral_asset, withdrawn)
        } else {
            // Sell everything withdrawn; the bound floors the output.
            let out = venue.swap(ledger, working.holder, path, SwapAmount::ExactIn(withdrawn))?;
            if out < swap_bound {
                return Err(AdapterError::SwapBoundExceeded {
                    bound: swap_bound,
                    actual: out,
                }
                .into());
            }
            tracing::debug!(
                collateral_asset = %collateral_asset,
                sold = %withdrawn,
                received = %out,
                bound = %swap_bound,
                "Converted collateral for target deposit"
            );
            (path.end_asset(), out)
        };

        let target = Self::market_mut(markets, target_market, |market| {
            AdapterError::UnknownTargetMarket { market }
        })?;
        target.supply_on_behalf(ledger, working.holder, user, deposit_asset, deposit_amount)?;

        Ok((withdrawn, deposit_amount))
    }
}

impl MigrationAdapter for LendingPoolAdapter {
    fn address(&self) -> Address {
        self.address
    }

    fn execute_migration(
        &self,
        env: &mut ExecutionContext,
        user: Address,
        target_market: Address,
        position_data: &Bytes,
        working: &FlashFunds,
    ) -> Result<MigrationSummary> {
        let position = Position::decode(position_data)?;
        if position.borrows.is_empty() && position.collaterals.is_empty() {
            return Err(AdapterError::EmptyPosition.into());
        }

        tracing::info!(
            adapter = %self.address,
            user = %user,
            source_market = %self.source_market,
            target_market = %target_market,
            borrow_legs = position.borrows.len(),
            collateral_legs = position.collaterals.len(),
            full_migration = position.full_migration,
            principal = %working.principal,
            "Executing position migration"
        );

        let ExecutionContext {
            ledger,
            markets,
            venue,
            ..
        } = env;

        let mut summary = MigrationSummary::default();

        // Debt first: the source protocol's collateralization check would
        // block withdrawals while debt remains.
        for leg in &position.borrows {
            let source = Self::market_mut(markets, self.source_market, |market| {
                AdapterError::UnknownSourceMarket { market }
            })?;
            let live_debt = source.debt_of(user, leg.debt_asset);
            let amount = leg.amount.resolve(live_debt);
            if amount.is_zero() {
                tracing::debug!(debt_asset = %leg.debt_asset, "Borrow leg has no outstanding debt, skipping");
                continue;
            }

            let repaid = self.clear_borrow_leg(
                ledger,
                markets,
                venue.as_ref(),
                user,
                working,
                &leg.swap_path,
                leg.debt_asset,
                amount,
                leg.swap_bound,
            )?;
            summary.debt_repaid += repaid;
        }

        if position.full_migration {
            let source = Self::market_mut(markets, self.source_market, |market| {
                AdapterError::UnknownSourceMarket { market }
            })?;
            let outstanding = source.total_debt_of(user);
            if outstanding > self.dust_tolerance {
                return Err(AdapterError::ResidualDebt {
                    market: self.source_market,
                    user,
                    outstanding,
                }
                .into());
            }
        }

        for leg in &position.collaterals {
            let source = Self::market_mut(markets, self.source_market, |market| {
                AdapterError::UnknownSourceMarket { market }
            })?;
            let live_collateral = source.collateral_of(user, leg.collateral_asset);
            let amount = leg.amount.resolve(live_collateral);
            if amount.is_zero() {
                tracing::debug!(
                    collateral_asset = %leg.collateral_asset,
                    "Collateral leg has no balance, skipping"
                );
                continue;
            }

            let (withdrawn, supplied) = self.move_collateral_leg(
                ledger,
                markets,
                venue.as_ref(),
                user,
                target_market,
                working,
                &leg.swap_path,
                leg.collateral_asset,
                amount,
                leg.swap_bound,
            )?;
            summary.collateral_withdrawn += withdrawn;
            summary.supplied += supplied;
        }

        // Fund the flash repayment by borrowing the shortfall from the target
        // market against the user's freshly supplied collateral.
        let due = working.repayment_due();
        let held = ledger.balance_of(working.asset, working.holder);
        if held < due {
            let shortfall = due - held;
            let target = Self::market_mut(markets, target_market, |market| {
                AdapterError::UnknownTargetMarket { market }
            })?;
            target.borrow_on_behalf(
                ledger,
                working.holder,
                user,
                working.asset,
                shortfall,
                working.holder,
            )?;
            summary.target_borrowed = shortfall;
            tracing::debug!(
                shortfall = %shortfall,
                "Borrowed flash repayment shortfall from target market"
            );
        }

        tracing::info!(
            debt_repaid = %summary.debt_repaid,
            collateral_withdrawn = %summary.collateral_withdrawn,
            supplied = %summary.supplied,
            target_borrowed = %summary.target_borrowed,
            "Position migration legs completed"
        );

        Ok(summary)
    }

    fn clone_box(&self) -> Box<dyn MigrationAdapter> {
        Box::new(self.clone())
    }
}
