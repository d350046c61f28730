//! Flash Migrator Library
//!
//! A library for atomically moving a leveraged lending position — supplied
//! collateral plus outstanding debt — from one lending protocol into another,
//! funded by a short-term uncollateralized loan from a liquidity pool. The
//! whole operation is all-or-nothing: any failed step unwinds every protocol
//! mutation and token movement as if the call never happened.
//!
//! # Architecture Overview
//!
//! The library is organized into several key modules:
//!
//! - **`orchestrator`**: The migration orchestration engine users call directly
//! - **`adapter`**: The protocol-plugin contract and a reference lending adapter
//! - **`routing`**: Swap route search over the venue's fee-tier/connector space
//! - **`protocols`**: Trait boundaries for external collaborators (lending
//!   markets, flash-loan pools, the swap venue)
//! - **`codec`**: Typed byte codecs for payloads crossing the callback boundary
//! - **`ledger`**: Token balance bookkeeping
//! - **`config`**: Environment-based configuration with eager validation
//! - **`builders`**: Builder patterns for complex object construction
//! - **`errors`**: Hierarchical error handling and reporting
//!
//! # Core Concepts
//!
//! - **Flash loan**: a loan valid only within a single atomic call, repaid
//!   with a fee before the call returns or the whole call is undone
//! - **Position**: ordered borrow and collateral legs a user wants moved,
//!   carried as an opaque, adapter-specific byte payload
//! - **Adapter**: a protocol-specific plugin implementing the migration steps
//!   for one source lending market
//! - **Swap path**: an encoded sequence of hops through fee-tiered pools,
//!   precomputed by the path finder and executed by the venue
//!
//! # Execution Model
//!
//! Strictly single-threaded, single-call synchronous execution: one
//! migration is one nested call tree (orchestrator → pool → callback →
//! adapter → protocols) with no background work and no persisted state.
//! Atomicity is simulated explicitly: the orchestrator snapshots the
//! [`protocols::ExecutionContext`] on entry and restores it on any error.

pub mod adapter;
pub mod builders;
pub mod codec;
pub mod config;
pub mod errors;
pub mod ledger;
pub mod orchestrator;
pub mod protocols;
pub mod routing;

// Re-export the main Result type and error enum for convenience
pub use errors::{MigrationError, Result};

// Re-export builder patterns for convenience
pub use builders::{OrchestratorBuilder, PathFinderBuilder};

// Type aliases for commonly used collaborator maps
pub type MarketMap =
    std::collections::HashMap<alloy::primitives::Address, Box<dyn protocols::LendingMarket>>;
pub type PoolMap = std::collections::HashMap<alloy::primitives::Address, protocols::LiquidityPool>;

// Module-specific result types for better ergonomics
pub type OrchestratorResult<T> = std::result::Result<T, errors::OrchestratorError>;
pub type AdapterResult<T> = std::result::Result<T, errors::AdapterError>;
pub type RoutingResult<T> = std::result::Result<T, errors::RoutingError>;
pub type CodecResult<T> = std::result::Result<T, errors::CodecError>;
