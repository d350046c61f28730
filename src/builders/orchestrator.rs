//! Builder pattern for MigrationOrchestrator

use crate::adapter::MigrationAdapter;
use crate::errors::Result;
use crate::orchestrator::{FlashLoanRoute, MigrationOrchestrator};
use alloy::primitives::Address;

/// Builder for creating MigrationOrchestrator instances with a fluent API
pub struct OrchestratorBuilder {
    address: Address,
    adapters: Vec<(Address, Box<dyn MigrationAdapter>)>,
    routes: Vec<(Address, FlashLoanRoute)>,
}

impl OrchestratorBuilder {
    /// Create a new builder for an orchestrator executing at `address`
    pub fn new(address: Address) -> Self {
        Self {
            address,
            adapters: Vec::new(),
            routes: Vec::new(),
        }
    }

    /// Authorize an adapter for a target market
    ///
    /// # Arguments
    ///
    /// * `target_market` - The market the adapter may migrate into
    /// * `adapter` - The adapter implementation
    pub fn with_adapter(
        mut self,
        target_market: Address,
        adapter: Box<dyn MigrationAdapter>,
    ) -> Self {
        self.adapters.push((target_market, adapter));
        self
    }

    /// Configure the flash-loan route for a target market
    pub fn with_flash_route(mut self, target_market: Address, route: FlashLoanRoute) -> Self {
        self.routes.push((target_market, route));
        self
    }

    /// Build the orchestrator
    ///
    /// # Errors
    ///
    /// Returns an error if the orchestrator address, any registry entry, or
    /// any route fails zero-address validation
    pub fn build(self) -> Result<MigrationOrchestrator> {
        let mut orchestrator = MigrationOrchestrator::new(self.address)?;
        for (target_market, adapter) in self.adapters {
            orchestrator.register_adapter(target_market, adapter)?;
        }
        for (target_market, route) in self.routes {
            orchestrator.set_flash_route(target_market, route)?;
        }
        Ok(orchestrator)
    }
}
