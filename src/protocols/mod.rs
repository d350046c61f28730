//! External-collaborator boundary for the migration system.
//!
//! Lending protocol accounting, flash-loan liquidity, the swap venue, and
//! token transfer mechanics are all external to this library; these modules
//! pin each one down at exactly the surface a migration touches:
//!
//! - **`lending`**: the [`LendingMarket`] trait for source and target protocols
//! - **`pool`**: the [`LiquidityPool`] flash-loan provider and its receiver trait
//! - **`venue`**: the [`SwapVenue`] trait for quotes and bounded swap execution
//!
//! The [`ExecutionContext`] bundles every collaborator plus the token ledger
//! into one value so the orchestrator can snapshot and roll back the world as
//! a unit, which is how a non-transactional host reproduces the all-or-nothing
//! semantics of an atomic-transaction chain.

pub mod lending;
pub mod pool;
pub mod venue;

pub use lending::LendingMarket;
pub use pool::{FlashLoanReceiver, LiquidityPool};
pub use venue::{SwapAmount, SwapVenue, VenueQuote};

use crate::ledger::Ledger;
use alloy::primitives::Address;
use std::collections::HashMap;

/// Everything external a migration can touch, bundled for atomic rollback.
///
/// Markets and the venue are boxed trait objects cloned through `clone_box`;
/// a [`ExecutionContext::snapshot`] is therefore a complete deep copy of the
/// simulated world, and restoring it undoes every protocol mutation and token
/// movement a failed migration performed.
#[derive(Clone)]
pub struct ExecutionContext {
    /// Token balances for every party.
    pub ledger: Ledger,
    /// Lending markets by address (sources and targets alike).
    pub markets: HashMap<Address, Box<dyn LendingMarket>>,
    /// Flash-loan pools by address.
    pub pools: HashMap<Address, LiquidityPool>,
    /// The swap execution venue.
    pub venue: Box<dyn SwapVenue>,
}

impl ExecutionContext {
    /// Create an empty context around `venue`.
    pub fn new(venue: Box<dyn SwapVenue>) -> Self {
        Self {
            ledger: Ledger::new(),
            markets: HashMap::new(),
            pools: HashMap::new(),
            venue,
        }
    }

    /// Register a lending market.
    pub fn add_market(&mut self, market: Box<dyn LendingMarket>) {
        self.markets.insert(market.address(), market);
    }

    /// Register a flash-loan pool.
    pub fn add_pool(&mut self, pool: LiquidityPool) {
        self.pools.insert(pool.address(), pool);
    }

    /// Deep-copy the entire simulated world.
    pub fn snapshot(&self) -> Self {
        self.clone()
    }
}
