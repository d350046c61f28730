//! Migration orchestration engine.
//!
//! The orchestrator is the only component a user calls directly. One call to
//! [`MigrationOrchestrator::migrate`] validates the request against the
//! adapter registry and flash-loan routes, borrows working capital from the
//! configured liquidity pool, hands custody to the registered adapter inside
//! the loan callback, enforces the repayment gate, and either returns a
//! completion receipt or rolls the entire execution context back to its entry
//! snapshot.
//!
//! # State machine
//!
//! Per call, never persisted: `Idle → FlashRequested → InAdapterCallback →
//! Settled | Reverted`. A second migration cannot begin while one is in
//! flight, and the loan callback is only honored while a loan is actually
//! outstanding, from the exact pool it was requested from.

use crate::adapter::{FlashFunds, MigrationAdapter, MigrationSummary};
use crate::codec::CallbackPayload;
use crate::errors::{OrchestratorError, Result};
use crate::protocols::{ExecutionContext, FlashLoanReceiver};
use alloy::primitives::{Address, Bytes, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Where to borrow flash liquidity for one target market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashLoanRoute {
    /// The liquidity pool to borrow from.
    pub pool: Address,
    /// The asset the pool lends.
    pub base_asset: Address,
    /// Whether the loaned asset is the target market's primary base asset.
    pub base_asset_primary: bool,
}

/// A caller-supplied migration request, processed at most once per call.
///
/// `position_data` is an opaque, adapter-specific encoding; the orchestrator
/// never interprets it, only threads it through the loan callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationRequest {
    pub adapter: Address,
    pub target_market: Address,
    pub position_data: Bytes,
    pub flash_amount: U256,
}

/// Per-call state of the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationPhase {
    Idle,
    /// A flash loan has been requested from this pool; only its callback is
    /// trusted.
    FlashRequested { pool: Address },
    InAdapterCallback,
    Settled,
    Reverted,
}

impl MigrationPhase {
    fn in_flight(&self) -> bool {
        matches!(
            self,
            MigrationPhase::FlashRequested { .. } | MigrationPhase::InAdapterCallback
        )
    }
}

/// Completion record emitted for every successful migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationReceipt {
    pub adapter: Address,
    pub user: Address,
    pub target_market: Address,
    pub flash_amount: U256,
    pub summary: MigrationSummary,
    pub executed_at: DateTime<Utc>,
}

/// The migration orchestration engine.
pub struct MigrationOrchestrator {
    address: Address,
    routes: HashMap<Address, FlashLoanRoute>,
    adapters: HashMap<Address, Box<dyn MigrationAdapter>>,
    /// Target market -> adapter addresses authorized for it.
    registry: HashMap<Address, HashSet<Address>>,
    phase: MigrationPhase,
    /// Adapter outcome stashed by the loan callback for the outer call.
    pending: Option<MigrationSummary>,
}

impl MigrationOrchestrator {
    /// Create an orchestrator executing at `address`.
    ///
    /// # Errors
    ///
    /// Returns `OrchestratorError::ZeroAddress` for a zero address.
    pub fn new(address: Address) -> Result<Self> {
        if address.is_zero() {
            return Err(OrchestratorError::ZeroAddress {
                field: "orchestrator",
            }
            .into());
        }
        Ok(Self {
            address,
            routes: HashMap::new(),
            adapters: HashMap::new(),
            registry: HashMap::new(),
            phase: MigrationPhase::Idle,
            pending: None,
        })
    }

    /// The orchestrator's executing address, which custodies working funds.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The current per-call phase. Terminal phases persist until the next
    /// `migrate` call begins.
    pub fn phase(&self) -> MigrationPhase {
        self.phase
    }

    /// Authorize `adapter` for `target_market` (admin surface, out of the
    /// hot path).
    pub fn register_adapter(
        &mut self,
        target_market: Address,
        adapter: Box<dyn MigrationAdapter>,
    ) -> Result<()> {
        if target_market.is_zero() {
            return Err(OrchestratorError::ZeroAddress {
                field: "target_market",
            }
            .into());
        }
        let adapter_address = adapter.address();
        if adapter_address.is_zero() {
            return Err(OrchestratorError::ZeroAddress { field: "adapter" }.into());
        }

        self.registry
            .entry(target_market)
            .or_default()
            .insert(adapter_address);
        self.adapters.insert(adapter_address, adapter);

        tracing::info!(
            target_market = %target_market,
            adapter = %adapter_address,
            "Adapter registered"
        );
        Ok(())
    }

    /// Configure the flash-loan route for `target_market` (admin surface).
    pub fn set_flash_route(&mut self, target_market: Address, route: FlashLoanRoute) -> Result<()> {
        if target_market.is_zero() {
            return Err(OrchestratorError::ZeroAddress {
                field: "target_market",
            }
            .into());
        }
        if route.pool.is_zero() {
            return Err(OrchestratorError::ZeroAddress { field: "pool" }.into());
        }
        if route.base_asset.is_zero() {
            return Err(OrchestratorError::ZeroAddress { field: "base_asset" }.into());
        }

        self.routes.insert(target_market, route);
        tracing::info!(
            target_market = %target_market,
            pool = %route.pool,
            base_asset = %route.base_asset,
            "Flash loan route configured"
        );
        Ok(())
    }

    /// Migrate `user`'s position per `request`.
    ///
    /// All-or-nothing: on any failure in any step the execution context is
    /// restored to its entry snapshot and the error is propagated unchanged.
    ///
    /// # Errors
    ///
    /// Rejects unregistered adapters and unconfigured flash routes before any
    /// external interaction; propagates adapter, protocol, and settlement
    /// errors afterwards.
    pub fn migrate(
        &mut self,
        env: &mut ExecutionContext,
        user: Address,
        request: MigrationRequest,
    ) -> Result<MigrationReceipt> {
        if self.phase.in_flight() {
            return Err(OrchestratorError::MigrationInProgress.into());
        }
        self.phase = MigrationPhase::Idle;
        self.pending = None;

        // Registry and route checks are the cheapest failures; they happen
        // before any external call.
        let authorized = self
            .registry
            .get(&request.target_market)
            .map(|set| set.contains(&request.adapter))
            .unwrap_or(false);
        if !authorized || !self.adapters.contains_key(&request.adapter) {
            return Err(OrchestratorError::AdapterNotRegistered {
                adapter: request.adapter,
                market: request.target_market,
            }
            .into());
        }
        let route = *self.routes.get(&request.target_market).ok_or(
            OrchestratorError::FlashRouteNotConfigured {
                market: request.target_market,
            },
        )?;
        // A route claiming to lend the target's primary asset must agree
        // with the market's own accounting.
        if route.base_asset_primary {
            if let Some(market) = env.markets.get(&request.target_market) {
                if market.base_asset() != route.base_asset {
                    return Err(OrchestratorError::InvalidConfiguration {
                        message: format!(
                            "Flash route lends {} but target market {} uses base asset {}",
                            route.base_asset,
                            request.target_market,
                            market.base_asset()
                        ),
                    }
                    .into());
                }
            }
        }

        tracing::info!(
            user = %user,
            adapter = %request.adapter,
            target_market = %request.target_market,
            flash_amount = %request.flash_amount,
            pool = %route.pool,
            "Starting migration"
        );

        let snapshot = env.snapshot();
        match self.migrate_inner(env, user, &request, route) {
            Ok(summary) => {
                self.phase = MigrationPhase::Settled;
                let receipt = MigrationReceipt {
                    adapter: request.adapter,
                    user,
                    target_market: request.target_market,
                    flash_amount: request.flash_amount,
                    summary,
                    executed_at: Utc::now(),
                };
                tracing::info!(
                    user = %user,
                    adapter = %request.adapter,
                    target_market = %request.target_market,
                    flash_amount = %request.flash_amount,
                    supplied = %summary.supplied,
                    debt_repaid = %summary.debt_repaid,
                    "Migration executed"
                );
                Ok(receipt)
            }
            Err(error) => {
                *env = snapshot;
                self.phase = MigrationPhase::Reverted;
                self.pending = None;
                tracing::warn!(
                    user = %user,
                    adapter = %request.adapter,
                    target_market = %request.target_market,
                    error = %error,
                    "Migration reverted, execution context restored"
                );
                Err(error)
            }
        }
    }

    fn migrate_inner(
        &mut self,
        env: &mut ExecutionContext,
        user: Address,
        request: &MigrationRequest,
        route: FlashLoanRoute,
    ) -> Result<MigrationSummary> {
        if request.flash_amount.is_zero() {
            // No bridging liquidity needed: skip the loan and hand the
            // adapter zero working capital directly.
            self.phase = MigrationPhase::InAdapterCallback;
            let working = FlashFunds {
                asset: route.base_asset,
                principal: U256::ZERO,
                fee: U256::ZERO,
                holder: self.address,
            };
            let adapter = self.adapters.get(&request.adapter).ok_or(
                OrchestratorError::AdapterNotRegistered {
                    adapter: request.adapter,
                    market: request.target_market,
                },
            )?;
            return adapter.execute_migration(
                env,
                user,
                request.target_market,
                &request.position_data,
                &working,
            );
        }

        let pool = env.pools.get(&route.pool).cloned().ok_or_else(|| {
            OrchestratorError::InvalidConfiguration {
                message: format!("Flash route names unknown pool {}", route.pool),
            }
        })?;

        let payload = CallbackPayload {
            user,
            adapter: request.adapter,
            target_market: request.target_market,
            position_data: request.position_data.clone(),
        }
        .encode()?;

        self.phase = MigrationPhase::FlashRequested { pool: pool.address() };
        pool.flash(env, self, request.flash_amount, &payload)?;

        self.pending
            .take()
            .ok_or_else(|| anyhow::anyhow!("flash loan returned without an adapter outcome").into())
    }
}

impl FlashLoanReceiver for MigrationOrchestrator {
    fn receiver_address(&self) -> Address {
        self.address
    }

    /// The flash-loan callback surface.
    ///
    /// Authenticates the caller against the exact pool the loan was requested
    /// from, re-derives the opaque payload, delegates to the adapter, and
    /// enforces the repayment gate before returning control to the pool.
    fn on_flash_loan(
        &mut self,
        env: &mut ExecutionContext,
        caller: Address,
        asset: Address,
        amount: U256,
        fee: U256,
        data: &Bytes,
    ) -> Result<()> {
        // A contract merely claiming the pool interface must not get in.
        match self.phase {
            MigrationPhase::FlashRequested { pool } => {
                if caller != pool {
                    return Err(OrchestratorError::UntrustedFlashCallback {
                        expected: pool,
                        actual: caller,
                    }
                    .into());
                }
            }
            _ => return Err(OrchestratorError::UnexpectedFlashCallback.into()),
        }

        let payload = CallbackPayload::decode(data)?;
        // The payload round-tripped through an external call; re-check it
        // against the registry rather than trusting it.
        let authorized = self
            .registry
            .get(&payload.target_market)
            .map(|set| set.contains(&payload.adapter))
            .unwrap_or(false);
        if !authorized {
            return Err(OrchestratorError::AdapterNotRegistered {
                adapter: payload.adapter,
                market: payload.target_market,
            }
            .into());
        }

        self.phase = MigrationPhase::InAdapterCallback;

        let working = FlashFunds {
            asset,
            principal: amount,
            fee,
            holder: self.address,
        };
        let summary = self
            .adapters
            .get(&payload.adapter)
            .ok_or(OrchestratorError::AdapterNotRegistered {
                adapter: payload.adapter,
                market: payload.target_market,
            })?
            .execute_migration(
                env,
                payload.user,
                payload.target_market,
                &payload.position_data,
                &working,
            )?;

        // The single most important correctness gate: the pool is about to
        // pull principal plus fee from our balance.
        let required = amount + fee;
        let held = env.ledger.balance_of(asset, self.address);
        if held < required {
            return Err(OrchestratorError::FlashLoanNotRepaid {
                asset,
                required,
                held,
            }
            .into());
        }

        self.pending = Some(summary);
        Ok(())
    }
}
