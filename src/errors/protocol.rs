//! Errors originating in external protocol collaborators.
//!
//! These are bubbled up unchanged through the adapter and orchestrator; the
//! library never interprets or retries them.

use alloy::primitives::{Address, U256};

/// Errors raised by lending markets, liquidity pools, and the swap venue
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("Operator {operator} is not authorized to act for user {user}")]
    NotAuthorized { user: Address, operator: Address },

    #[error("Withdrawal would leave user {user} undercollateralized in market {market}")]
    Undercollateralized { user: Address, market: Address },

    #[error("Asset {asset} is not supported by {venue}")]
    UnsupportedAsset { asset: Address, venue: Address },

    #[error("Pool {pool} has insufficient liquidity: requested {requested}, available {available}")]
    InsufficientPoolLiquidity {
        pool: Address,
        requested: U256,
        available: U256,
    },

    #[error("Fee computation for pool {pool} overflowed on amount {amount}")]
    FeeOverflow { pool: Address, amount: U256 },

    #[error("Quote for path exceeded the allotted gas budget of {budget}")]
    QuoteGasBudgetExceeded { budget: u64 },

    #[error("No pool exists for the requested hop {token_in} -> {token_out}")]
    MissingHopPool { token_in: Address, token_out: Address },
}

/// Errors in token balance bookkeeping
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error(
        "Insufficient balance of {asset} for holder {holder}: required {required}, available {available}"
    )]
    InsufficientBalance {
        asset: Address,
        holder: Address,
        required: U256,
        available: U256,
    },

    #[error("Balance overflow crediting {amount} of {asset} to {holder}")]
    BalanceOverflow {
        asset: Address,
        holder: Address,
        amount: U256,
    },
}
