//! Migration orchestration, callback authentication, and settlement errors.

use alloy::primitives::{Address, U256};

/// Errors that can occur during orchestrator operations
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error("Adapter {adapter} is not registered for target market {market}")]
    AdapterNotRegistered { adapter: Address, market: Address },

    #[error("No flash loan route configured for target market {market}")]
    FlashRouteNotConfigured { market: Address },

    #[error("Flash loan callback from untrusted caller {actual}, expected pool {expected}")]
    UntrustedFlashCallback { expected: Address, actual: Address },

    #[error("Flash loan callback received while no loan was requested")]
    UnexpectedFlashCallback,

    #[error("A migration is already in progress")]
    MigrationInProgress,

    #[error(
        "Flash loan under-repaid in asset {asset}: required {required}, balance held {held}"
    )]
    FlashLoanNotRepaid {
        asset: Address,
        required: U256,
        held: U256,
    },

    #[error("Zero address supplied for {field}")]
    ZeroAddress { field: &'static str },

    #[error("Invalid orchestrator configuration: {message}")]
    InvalidConfiguration { message: String },
}
