//! Adapter execution errors.

use alloy::primitives::{Address, U256};

/// Errors that can occur while an adapter executes a position migration
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error(
        "Full migration requested but user {user} still owes {outstanding} in market {market}"
    )]
    ResidualDebt {
        market: Address,
        user: Address,
        outstanding: U256,
    },

    #[error("Swap bound exceeded: bound {bound}, actual amount {actual}")]
    SwapBoundExceeded { bound: U256, actual: U256 },

    #[error("Swap path starts at {actual}, expected {expected}")]
    PathStartMismatch { expected: Address, actual: Address },

    #[error("Swap path ends at {actual}, expected {expected}")]
    PathEndMismatch { expected: Address, actual: Address },

    #[error("Source market {market} is not known to this adapter")]
    UnknownSourceMarket { market: Address },

    #[error("Target market {market} is not known to this adapter")]
    UnknownTargetMarket { market: Address },

    #[error("Position contains no legs to migrate")]
    EmptyPosition,
}
