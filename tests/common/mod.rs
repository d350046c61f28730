//! Shared mock collaborators for integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use alloy::primitives::{Address, U256};
use flash_migrator::codec::{FeeTier, SwapPath};
use flash_migrator::errors::{ProtocolError, Result};
use flash_migrator::ledger::Ledger;
use flash_migrator::protocols::{LendingMarket, SwapAmount, SwapVenue, VenueQuote};

pub fn addr(n: u8) -> Address {
    Address::repeat_byte(n)
}

/// Install a subscriber honoring `RUST_LOG`; repeat calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// An in-memory lending market with per-user debt and collateral books.
///
/// Withdrawals are blocked while the user carries any debt, which is the
/// collateralization rule that forces migrations to clear borrow legs first.
#[derive(Debug, Clone)]
pub struct MockLendingMarket {
    address: Address,
    base_asset: Address,
    debts: HashMap<(Address, Address), U256>,
    collaterals: HashMap<(Address, Address), U256>,
    /// (user, operator) pairs the user has pre-authorized.
    authorized: HashSet<(Address, Address)>,
    refuse_borrows: bool,
}

impl MockLendingMarket {
    pub fn new(address: Address, base_asset: Address) -> Self {
        Self {
            address,
            base_asset,
            debts: HashMap::new(),
            collaterals: HashMap::new(),
            authorized: HashSet::new(),
            refuse_borrows: false,
        }
    }

    pub fn with_debt(mut self, user: Address, asset: Address, amount: U256) -> Self {
        self.debts.insert((user, asset), amount);
        self
    }

    pub fn with_collateral(mut self, user: Address, asset: Address, amount: U256) -> Self {
        self.collaterals.insert((user, asset), amount);
        self
    }

    pub fn with_authorization(mut self, user: Address, operator: Address) -> Self {
        self.authorized.insert((user, operator));
        self
    }

    /// Make every borrow attempt fail, to exercise settlement failures.
    pub fn refusing_borrows(mut self) -> Self {
        self.refuse_borrows = true;
        self
    }

    fn check_authorized(&self, user: Address, operator: Address) -> Result<()> {
        if operator == user || self.authorized.contains(&(user, operator)) {
            Ok(())
        } else {
            Err(ProtocolError::NotAuthorized { user, operator }.into())
        }
    }
}

impl LendingMarket for MockLendingMarket {
    fn address(&self) -> Address {
        self.address
    }

    fn base_asset(&self) -> Address {
        self.base_asset
    }

    fn debt_of(&self, user: Address, debt_asset: Address) -> U256 {
        self.debts.get(&(user, debt_asset)).copied().unwrap_or_default()
    }

    fn collateral_of(&self, user: Address, collateral_asset: Address) -> U256 {
        self.collaterals
            .get(&(user, collateral_asset))
            .copied()
            .unwrap_or_default()
    }

    fn total_debt_of(&self, user: Address) -> U256 {
        self.debts
            .iter()
            .filter(|((debtor, _), _)| *debtor == user)
            .map(|(_, amount)| *amount)
            .sum()
    }

    fn repay_on_behalf(
        &mut self,
        ledger: &mut Ledger,
        payer: Address,
        user: Address,
        debt_asset: Address,
        amount: U256,
    ) -> Result<U256> {
        let live = self.debt_of(user, debt_asset);
        let repaid = amount.min(live);
        if repaid.is_zero() {
            return Ok(U256::ZERO);
        }
        ledger.debit(debt_asset, payer, repaid)?;
        self.debts.insert((user, debt_asset), live - repaid);
        Ok(repaid)
    }

    fn withdraw_to(
        &mut self,
        ledger: &mut Ledger,
        operator: Address,
        user: Address,
        collateral_asset: Address,
        amount: U256,
        recipient: Address,
    ) -> Result<U256> {
        self.check_authorized(user, operator)?;
        let held = self.collateral_of(user, collateral_asset);
        if amount > held || !self.total_debt_of(user).is_zero() {
            return Err(ProtocolError::Undercollateralized {
                user,
                market: self.address,
            }
            .into());
        }
        self.collaterals.insert((user, collateral_asset), held - amount);
        ledger.credit(collateral_asset, recipient, amount)?;
        Ok(amount)
    }

    fn supply_on_behalf(
        &mut self,
        ledger: &mut Ledger,
        payer: Address,
        user: Address,
        asset: Address,
        amount: U256,
    ) -> Result<()> {
        ledger.debit(asset, payer, amount)?;
        let held = self.collateral_of(user, asset);
        self.collaterals.insert((user, asset), held + amount);
        Ok(())
    }

    fn borrow_on_behalf(
        &mut self,
        ledger: &mut Ledger,
        operator: Address,
        user: Address,
        asset: Address,
        amount: U256,
        recipient: Address,
    ) -> Result<()> {
        self.check_authorized(user, operator)?;
        if self.refuse_borrows {
            return Err(ProtocolError::NotAuthorized { user, operator }.into());
        }
        let live = self.debt_of(user, asset);
        self.debts.insert((user, asset), live + amount);
        ledger.credit(asset, recipient, amount)?;
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn LendingMarket> {
        Box::new(self.clone())
    }
}

#[derive(Debug, Clone, Copy)]
struct PoolEntry {
    pool: Address,
    rate_num: u64,
    rate_den: u64,
}

/// A fee-tiered venue with fixed per-pool exchange rates and linear gas.
///
/// Rates are registered per (pair, tier) and applied without slippage, so
/// tests can predict every quote exactly. Parity hops convert 1:1 and cost
/// no gas, mirroring a non-market redeemer.
#[derive(Debug, Clone)]
pub struct MockSwapVenue {
    address: Address,
    pools: HashMap<(Address, Address, u32), PoolEntry>,
    gas_per_hop: u64,
}

impl MockSwapVenue {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            pools: HashMap::new(),
            gas_per_hop: 60_000,
        }
    }

    pub fn with_gas_per_hop(mut self, gas: u64) -> Self {
        self.gas_per_hop = gas;
        self
    }

    /// Register a pool for `(token_a, token_b)` at `fee`, converting at
    /// `rate_num / rate_den` output per input in the a-to-b direction.
    pub fn with_pool(
        mut self,
        token_a: Address,
        token_b: Address,
        fee: FeeTier,
        pool: Address,
        rate_num: u64,
        rate_den: u64,
    ) -> Self {
        self.pools.insert(
            (token_a, token_b, fee.0),
            PoolEntry {
                pool,
                rate_num,
                rate_den,
            },
        );
        self.pools.insert(
            (token_b, token_a, fee.0),
            PoolEntry {
                pool,
                rate_num: rate_den,
                rate_den: rate_num,
            },
        );
        self
    }

    fn entry(&self, token_in: Address, token_out: Address, fee: FeeTier) -> Result<PoolEntry> {
        self.pools
            .get(&(token_in, token_out, fee.0))
            .copied()
            .ok_or_else(|| ProtocolError::MissingHopPool { token_in, token_out }.into())
    }

    /// Walk the path forward for an exact input, returning (output, gas).
    fn walk_forward(&self, path: &SwapPath, amount_in: U256) -> Result<(U256, u64)> {
        let mut amount = amount_in;
        let mut gas = 0u64;
        let mut token_in = path.start_asset();
        for hop in path.hops() {
            if hop.fee.is_parity() {
                token_in = hop.asset_out;
                continue;
            }
            let entry = self.entry(token_in, hop.asset_out, hop.fee)?;
            amount = amount * U256::from(entry.rate_num) / U256::from(entry.rate_den);
            gas += self.gas_per_hop;
            token_in = hop.asset_out;
        }
        Ok((amount, gas))
    }

    /// Walk the path backward for an exact output, returning (input, gas).
    /// Inputs round up so the forward walk never undershoots the target.
    fn walk_backward(&self, path: &SwapPath, amount_out: U256) -> Result<(U256, u64)> {
        let mut amount = amount_out;
        let mut gas = 0u64;
        let mut token_out_stack: Vec<(Address, FeeTier, Address)> = Vec::new();
        let mut token_in = path.start_asset();
        for hop in path.hops() {
            token_out_stack.push((token_in, hop.fee, hop.asset_out));
            token_in = hop.asset_out;
        }
        for (hop_in, fee, hop_out) in token_out_stack.into_iter().rev() {
            if fee.is_parity() {
                continue;
            }
            let entry = self.entry(hop_in, hop_out, fee)?;
            let num = U256::from(entry.rate_num);
            let den = U256::from(entry.rate_den);
            amount = (amount * den + num - U256::from(1)) / num;
            gas += self.gas_per_hop;
        }
        Ok((amount, gas))
    }
}

impl SwapVenue for MockSwapVenue {
    fn address(&self) -> Address {
        self.address
    }

    fn pool_for(&self, token_a: Address, token_b: Address, fee: FeeTier) -> Option<Address> {
        self.pools.get(&(token_a, token_b, fee.0)).map(|e| e.pool)
    }

    fn quote(&self, path: &SwapPath, amount: SwapAmount, gas_limit: u64) -> Result<VenueQuote> {
        let (counter, gas_estimate) = match amount {
            SwapAmount::ExactIn(amount_in) => self.walk_forward(path, amount_in)?,
            SwapAmount::ExactOut(amount_out) => self.walk_backward(path, amount_out)?,
        };
        if gas_estimate > gas_limit {
            return Err(ProtocolError::QuoteGasBudgetExceeded { budget: gas_limit }.into());
        }
        Ok(VenueQuote {
            amount: counter,
            gas_estimate,
        })
    }

    fn swap(
        &self,
        ledger: &mut Ledger,
        holder: Address,
        path: &SwapPath,
        amount: SwapAmount,
    ) -> Result<U256> {
        match amount {
            SwapAmount::ExactIn(amount_in) => {
                let (out, _) = self.walk_forward(path, amount_in)?;
                ledger.debit(path.start_asset(), holder, amount_in)?;
                ledger.credit(path.end_asset(), holder, out)?;
                Ok(out)
            }
            SwapAmount::ExactOut(amount_out) => {
                let (spent, _) = self.walk_backward(path, amount_out)?;
                ledger.debit(path.start_asset(), holder, spent)?;
                ledger.credit(path.end_asset(), holder, amount_out)?;
                Ok(spent)
            }
        }
    }

    fn clone_box(&self) -> Box<dyn SwapVenue> {
        Box::new(self.clone())
    }
}
