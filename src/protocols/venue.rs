//! Swap execution venue boundary.
//!
//! The venue's AMM math is out of scope; this trait pins down the three
//! operations the migration system needs: pool lookup for path construction,
//! read-only quote probes for the path finder, and bound-enforcing execution
//! for adapters. Quotes are simulate-and-discard: `quote` takes `&self` and
//! must not mutate venue state.

use crate::codec::{FeeTier, SwapPath};
use crate::errors::Result;
use crate::ledger::Ledger;
use alloy::primitives::{Address, U256};

/// Direction and size of a swap or quote request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapAmount {
    /// Spend exactly this input amount; the venue reports the output.
    ExactIn(U256),
    /// Produce exactly this output amount; the venue reports the input.
    ExactOut(U256),
}

impl SwapAmount {
    /// The fixed side's magnitude, regardless of direction.
    pub fn magnitude(&self) -> U256 {
        match self {
            SwapAmount::ExactIn(amount) | SwapAmount::ExactOut(amount) => *amount,
        }
    }

    /// Whether this is an exact-input request.
    pub fn is_exact_in(&self) -> bool {
        matches!(self, SwapAmount::ExactIn(_))
    }
}

/// Result of a quote probe: the counter-amount and the gas the venue
/// estimates for executing the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VenueQuote {
    /// Output amount for exact-input requests, input amount for exact-output.
    pub amount: U256,
    /// Estimated execution gas for the full route.
    pub gas_estimate: u64,
}

/// A fee-tiered automated market maker venue.
pub trait SwapVenue: Send {
    /// The venue's address.
    fn address(&self) -> Address;

    /// Look up the venue's pool for `(token_a, token_b)` at `fee`, if one
    /// exists. Pair ordering is insignificant.
    fn pool_for(&self, token_a: Address, token_b: Address, fee: FeeTier) -> Option<Address>;

    /// Simulate executing `path` for `amount` and report the counter-amount
    /// and gas estimate, without mutating any state. `gas_limit` bounds the
    /// resources the probe may consume before it must fail.
    fn quote(&self, path: &SwapPath, amount: SwapAmount, gas_limit: u64) -> Result<VenueQuote>;

    /// Execute `path` for `amount` against `holder`'s ledger balances and
    /// return the counter-amount. Parity hops (fee tier 0) convert 1:1.
    fn swap(
        &self,
        ledger: &mut Ledger,
        holder: Address,
        path: &SwapPath,
        amount: SwapAmount,
    ) -> Result<U256>;

    /// Clone into a boxed trait object for context snapshotting.
    fn clone_box(&self) -> Box<dyn SwapVenue>;
}

impl Clone for Box<dyn SwapVenue> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
