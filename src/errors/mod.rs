//! Error handling and reporting for the migration library.
//!
//! This module provides a hierarchical error system with fine-grained error types
//! for each major component of the library. The error system is designed to provide
//! clear, actionable error messages while maintaining type safety.
//!
//! # Error Hierarchy
//!
//! The error system is organized into domain-specific error types:
//!
//! - **`OrchestratorError`**: Errors in migration orchestration, callback
//!   authentication, and flash-loan settlement
//! - **`AdapterError`**: Errors raised by protocol adapters while executing
//!   a position migration
//! - **`RoutingError`**: Errors in swap path search and quote parameter validation
//! - **`ProtocolError`**: Errors bubbled up unchanged from external protocol
//!   collaborators (lending markets, liquidity pools, the swap venue)
//! - **`CodecError`**: Errors while decoding position payloads and swap paths
//!
//! # Top-Level Error Type
//!
//! The `MigrationError` enum serves as the top-level error type that encompasses
//! all possible errors from the library. It provides automatic conversion from
//! all domain-specific errors via `#[from]`, which enables clean `?` propagation
//! throughout the call chain.
//!
//! # Propagation Policy
//!
//! Nothing in this library is retried internally. Every detected error aborts
//! the entire migration call chain; the orchestrator rolls the execution
//! context back to its entry snapshot, so user-visible behavior is binary:
//! either a completion receipt is produced, or state is exactly as it was
//! before the call began.

pub mod adapter;
pub mod codec;
pub mod orchestrator;
pub mod protocol;
pub mod routing;

// Re-export all error types for convenience
pub use adapter::AdapterError;
pub use codec::CodecError;
pub use orchestrator::OrchestratorError;
pub use protocol::{LedgerError, ProtocolError};
pub use routing::RoutingError;

/// Main result type for the library
pub type Result<T> = std::result::Result<T, MigrationError>;

/// Top-level error enum that encompasses all possible errors in the migration library.
///
/// This enum serves as the unified error type for the entire library, providing
/// automatic conversion from all domain-specific errors. Downstream protocol
/// errors are carried unchanged: the orchestrator and adapters never interpret
/// or retry them.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// Error in migration orchestration, registry lookups, callback
    /// authentication, or flash-loan settlement.
    #[error("Orchestrator operation failed: {0}")]
    Orchestrator(#[from] OrchestratorError),

    /// Error raised by a protocol adapter while executing a migration.
    ///
    /// This includes swap bound violations, residual-debt completeness
    /// failures, and malformed leg sequences.
    #[error("Adapter operation failed: {0}")]
    Adapter(#[from] AdapterError),

    /// Error in swap path search or quote parameter validation.
    #[error("Routing operation failed: {0}")]
    Routing(#[from] RoutingError),

    /// Error bubbled up unchanged from an external protocol collaborator.
    ///
    /// This includes authorization refusals, collateralization failures,
    /// and liquidity shortfalls in lending markets and pools.
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error in token balance bookkeeping.
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Error while decoding a position payload, callback payload, or swap path.
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Generic error for cases not covered by specific error types.
    #[error("Generic error: {0}")]
    Other(#[from] anyhow::Error),
}
