//! Swap route search for migration planning.
//!
//! Routes are precomputed off the hot migration path and supplied to
//! adapters inside position payloads; nothing here executes a trade or holds
//! funds. The search enumerates the venue's fee-tier/connector space and
//! relies on simulate-and-discard quote probes, each bounded by a caller
//! gas budget.

pub mod finder;

pub use finder::PathFinder;

use crate::codec::SwapPath;
use crate::errors::{Result, RoutingError};
use crate::protocols::SwapAmount;
use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// Parameters for one route search.
///
/// Exactly one of `amount_in` / `amount_out` must be set: `amount_in`
/// requests an exact-input search (best = largest output), `amount_out` an
/// exact-output search (best = smallest input).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapSearch {
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: Option<U256>,
    pub amount_out: Option<U256>,
    /// A pool the route must never touch, e.g. the pool being flash-borrowed
    /// from, to avoid self-interference.
    pub excluded_pool: Option<Address>,
    /// Gas budget for each quote probe; probes over budget count as failed.
    /// When unset, the finder falls back to its configured default.
    pub max_gas_estimate: Option<u64>,
}

impl SwapSearch {
    /// An exact-input search spending `amount` of `token_in`.
    pub fn exact_in(token_in: Address, token_out: Address, amount: U256) -> Self {
        Self {
            token_in,
            token_out,
            amount_in: Some(amount),
            amount_out: None,
            excluded_pool: None,
            max_gas_estimate: None,
        }
    }

    /// An exact-output search producing `amount` of `token_out`.
    pub fn exact_out(token_in: Address, token_out: Address, amount: U256) -> Self {
        Self {
            token_in,
            token_out,
            amount_in: None,
            amount_out: Some(amount),
            excluded_pool: None,
            max_gas_estimate: None,
        }
    }

    /// Exclude `pool` from every candidate route.
    pub fn exclude_pool(mut self, pool: Address) -> Self {
        self.excluded_pool = Some(pool);
        self
    }

    /// Override the configured default gas budget for this search.
    pub fn with_max_gas_estimate(mut self, max_gas_estimate: u64) -> Self {
        self.max_gas_estimate = Some(max_gas_estimate);
        self
    }

    /// Validate the parameter combination and return the search direction.
    ///
    /// # Errors
    ///
    /// - `MustBeSetAmountInOrAmountOut` when neither amount is set
    /// - `OnlyOneAmountMustBeSet` when both are set
    /// - `MustBeSetMaxGasEstimate` when an explicit gas budget is zero
    pub fn direction(&self) -> Result<SwapAmount> {
        let amount = match (self.amount_in, self.amount_out) {
            (None, None) => return Err(RoutingError::MustBeSetAmountInOrAmountOut.into()),
            (Some(_), Some(_)) => return Err(RoutingError::OnlyOneAmountMustBeSet.into()),
            (Some(amount_in), None) => SwapAmount::ExactIn(amount_in),
            (None, Some(amount_out)) => SwapAmount::ExactOut(amount_out),
        };
        if self.max_gas_estimate == Some(0) {
            return Err(RoutingError::MustBeSetMaxGasEstimate.into());
        }
        Ok(amount)
    }
}

/// A search result: the encoded route, its estimated counter-amount, and the
/// venue's gas estimate for executing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteQuote {
    pub path: SwapPath,
    /// Estimated output for exact-input searches, estimated input for
    /// exact-output searches.
    pub amount: U256,
    pub gas_estimate: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MigrationError;

    fn addr(n: u8) -> Address {
        Address::repeat_byte(n)
    }

    #[test]
    fn test_direction_requires_exactly_one_amount() {
        let mut search = SwapSearch::exact_in(addr(1), addr(2), U256::from(10));
        assert_eq!(search.direction().unwrap(), SwapAmount::ExactIn(U256::from(10)));

        search.amount_out = Some(U256::from(5));
        assert!(matches!(
            search.direction(),
            Err(MigrationError::Routing(RoutingError::OnlyOneAmountMustBeSet))
        ));

        search.amount_in = None;
        search.amount_out = None;
        assert!(matches!(
            search.direction(),
            Err(MigrationError::Routing(
                RoutingError::MustBeSetAmountInOrAmountOut
            ))
        ));
    }

    #[test]
    fn test_direction_rejects_explicit_zero_gas_budget() {
        let search =
            SwapSearch::exact_out(addr(1), addr(2), U256::from(10)).with_max_gas_estimate(0);
        assert!(matches!(
            search.direction(),
            Err(MigrationError::Routing(RoutingError::MustBeSetMaxGasEstimate))
        ));
    }
}
