//! Swap path search and quote parameter errors.

use alloy::primitives::Address;

/// Errors that can occur during swap path search
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    #[error("No swap pools found for pair {token_in} -> {token_out}")]
    SwapPoolsNotFound { token_in: Address, token_out: Address },

    #[error("At least one connector asset must be provided")]
    MustBeAtLeastOneConnector,

    #[error("Either amount in or amount out must be set")]
    MustBeSetAmountInOrAmountOut,

    #[error("Only one of amount in and amount out must be set")]
    OnlyOneAmountMustBeSet,

    #[error("A non-zero max gas estimate must be set")]
    MustBeSetMaxGasEstimate,

    #[error("Stable pair {token_a}/{token_b} is configured more than once")]
    AmbiguousStablePair { token_a: Address, token_b: Address },
}
