//! Builder pattern for PathFinder

use crate::codec::FeeTier;
use crate::config::FinderConfig;
use crate::errors::Result;
use crate::routing::PathFinder;
use alloy::primitives::Address;

/// Builder for creating PathFinder instances with a fluent API
pub struct PathFinderBuilder {
    config: FinderConfig,
}

impl PathFinderBuilder {
    /// Create a new builder with the default fee tier set
    pub fn new() -> Self {
        Self {
            config: FinderConfig::default(),
        }
    }

    /// Replace the fee tier set (must be strictly ascending)
    pub fn with_fee_tiers<I>(mut self, tiers: I) -> Self
    where
        I: IntoIterator<Item = FeeTier>,
    {
        self.config.fee_tiers = tiers.into_iter().collect();
        self
    }

    /// Register a stable 1:1 conversion pair
    pub fn with_stable_pair(mut self, a: Address, b: Address) -> Self {
        self.config.stable_pairs.push((a, b));
        self
    }

    /// Set the default quote probe gas budget
    pub fn with_default_max_gas_estimate(mut self, gas: u64) -> Self {
        self.config.default_max_gas_estimate = gas;
        self
    }

    /// Build the path finder
    ///
    /// # Errors
    ///
    /// Returns an error if the assembled configuration fails validation
    pub fn build(self) -> Result<PathFinder> {
        PathFinder::new(self.config)
    }
}

impl Default for PathFinderBuilder {
    fn default() -> Self {
        Self::new()
    }
}
