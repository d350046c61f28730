//! Configuration management for the flash migration library.
//!
//! This module provides environment-based configuration loading with eager
//! validation: configuration errors are the cheapest to signal and are always
//! detected before any protocol interaction begins.

use crate::codec::FeeTier;
use crate::errors::{OrchestratorError, Result, RoutingError};
use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Default fee tiers searched by the path finder, ascending.
const DEFAULT_FEE_TIERS: [u32; 4] = [100, 500, 3_000, 10_000];

/// Default gas budget applied to quote probes when a caller supplies none.
const DEFAULT_MAX_GAS_ESTIMATE: u64 = 1_500_000;

/// Swap path search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinderConfig {
    /// Fee tiers to enumerate, in ascending order. Ascending iteration makes
    /// the first-found tie-break favor the lowest fee.
    pub fee_tiers: Vec<FeeTier>,
    /// Asset pairs convertible 1:1 outside the venue (e.g. a wrapped
    /// stablecoin and its redeemer). Orientation-insensitive.
    pub stable_pairs: Vec<(Address, Address)>,
    /// Default gas budget for quote probes.
    pub default_max_gas_estimate: u64,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            fee_tiers: DEFAULT_FEE_TIERS.iter().map(|&t| FeeTier(t)).collect(),
            stable_pairs: Vec::new(),
            default_max_gas_estimate: DEFAULT_MAX_GAS_ESTIMATE,
        }
    }
}

impl FinderConfig {
    /// Whether `(a, b)` is a configured stable 1:1 pair, in either order.
    pub fn is_stable_pair(&self, a: Address, b: Address) -> bool {
        self.stable_pairs
            .iter()
            .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
    }

    /// Validate tier ordering and stable-pair uniqueness.
    pub fn validate(&self) -> Result<()> {
        if self.fee_tiers.is_empty() {
            return Err(OrchestratorError::InvalidConfiguration {
                message: "At least one fee tier must be configured".to_string(),
            }
            .into());
        }
        if self.fee_tiers.iter().any(|t| t.is_parity()) {
            return Err(OrchestratorError::InvalidConfiguration {
                message: "Fee tier 0 is reserved for parity conversions".to_string(),
            }
            .into());
        }
        if self.fee_tiers.windows(2).any(|w| w[0] >= w[1]) {
            return Err(OrchestratorError::InvalidConfiguration {
                message: "Fee tiers must be strictly ascending".to_string(),
            }
            .into());
        }
        if self.default_max_gas_estimate == 0 {
            return Err(RoutingError::MustBeSetMaxGasEstimate.into());
        }

        for (i, &(a, b)) in self.stable_pairs.iter().enumerate() {
            if a == b {
                return Err(OrchestratorError::InvalidConfiguration {
                    message: format!("Stable pair {i} maps asset {a} to itself"),
                }
                .into());
            }
            let duplicated = self.stable_pairs[i + 1..]
                .iter()
                .any(|&(x, y)| (x == a && y == b) || (x == b && y == a));
            if duplicated {
                return Err(RoutingError::AmbiguousStablePair {
                    token_a: a,
                    token_b: b,
                }
                .into());
            }
        }

        Ok(())
    }
}

/// Main configuration for the migration system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigratorConfig {
    /// Path finder settings.
    pub finder: FinderConfig,
    /// Residual debt at or below this figure counts as cleared in
    /// full-migration completeness checks (protocol-defined dust).
    pub dust_tolerance: u64,
}

impl Default for MigratorConfig {
    fn default() -> Self {
        Self {
            finder: FinderConfig::default(),
            dust_tolerance: 0,
        }
    }
}

impl MigratorConfig {
    /// Create a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// All optional, with defaults applied when unset:
    /// - `MIGRATOR_FEE_TIERS`: comma-separated fee tiers in hundredths of a
    ///   basis point (default: `100,500,3000,10000`)
    /// - `MIGRATOR_STABLE_PAIRS`: comma-separated `addrA:addrB` parity pairs
    /// - `MIGRATOR_MAX_GAS_ESTIMATE`: default quote probe gas budget
    /// - `MIGRATOR_DUST_TOLERANCE`: residual-debt dust tolerance
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is malformed or the resulting
    /// configuration fails validation.
    pub fn from_env() -> Result<Self> {
        tracing::info!("Loading migrator configuration from environment");

        let fee_tiers = match env::var("MIGRATOR_FEE_TIERS") {
            Ok(raw) => parse_fee_tiers(&raw)?,
            Err(_) => DEFAULT_FEE_TIERS.iter().map(|&t| FeeTier(t)).collect(),
        };

        let stable_pairs = match env::var("MIGRATOR_STABLE_PAIRS") {
            Ok(raw) => parse_stable_pairs(&raw)?,
            Err(_) => Vec::new(),
        };

        let default_max_gas_estimate = parse_env_u64(
            "MIGRATOR_MAX_GAS_ESTIMATE",
            DEFAULT_MAX_GAS_ESTIMATE,
        )?;
        let dust_tolerance = parse_env_u64("MIGRATOR_DUST_TOLERANCE", 0)?;

        let config = Self {
            finder: FinderConfig {
                fee_tiers,
                stable_pairs,
                default_max_gas_estimate,
            },
            dust_tolerance,
        };
        config.finder.validate()?;

        tracing::info!(
            fee_tier_count = config.finder.fee_tiers.len(),
            stable_pair_count = config.finder.stable_pairs.len(),
            max_gas_estimate = config.finder.default_max_gas_estimate,
            dust_tolerance = config.dust_tolerance,
            "Migrator configuration loaded successfully"
        );

        Ok(config)
    }

    /// Create a configuration for testing purposes with the default tier set
    /// and a small dust tolerance.
    pub fn for_testing() -> Self {
        Self {
            finder: FinderConfig::default(),
            dust_tolerance: 1,
        }
    }
}

fn parse_env_u64(var: &str, default: u64) -> Result<u64> {
    match env::var(var) {
        Ok(raw) => raw.parse::<u64>().map_err(|_| {
            OrchestratorError::InvalidConfiguration {
                message: format!("Invalid {var} value: {raw}. Must be a valid integer"),
            }
            .into()
        }),
        Err(_) => Ok(default),
    }
}

fn parse_fee_tiers(raw: &str) -> Result<Vec<FeeTier>> {
    let mut tiers = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let value = part.parse::<u32>().map_err(|_| {
            OrchestratorError::InvalidConfiguration {
                message: format!("Invalid fee tier value: {part}"),
            }
        })?;
        tiers.push(FeeTier(value));
    }
    Ok(tiers)
}

fn parse_stable_pairs(raw: &str) -> Result<Vec<(Address, Address)>> {
    let mut pairs = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (left, right) = part.split_once(':').ok_or_else(|| {
            OrchestratorError::InvalidConfiguration {
                message: format!("Stable pair must be addrA:addrB, got: {part}"),
            }
        })?;
        let a = parse_address(left)?;
        let b = parse_address(right)?;
        pairs.push((a, b));
    }
    Ok(pairs)
}

fn parse_address(raw: &str) -> Result<Address> {
    Address::from_str(raw.trim()).map_err(|e| {
        OrchestratorError::InvalidConfiguration {
            message: format!("Invalid address {raw}: {e}"),
        }
        .into()
    })
}
