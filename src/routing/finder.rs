//! Best-route search over the venue's fee-tier/connector space.

use crate::codec::{FeeTier, SwapPath};
use crate::config::{FinderConfig, MigratorConfig};
use crate::errors::{Result, RoutingError};
use crate::protocols::{SwapAmount, SwapVenue};
use crate::routing::{RouteQuote, SwapSearch};
use alloy::primitives::Address;
use itertools::Itertools;

/// Read-only swap route search utility.
///
/// The finder never executes a swap and never mutates venue state; every
/// candidate is evaluated through a quote probe that is simulated and
/// discarded. Quoting is defensive: a probe that fails or exceeds the gas
/// budget makes its candidate score zero, it never aborts the search.
pub struct PathFinder {
    config: FinderConfig,
}

impl PathFinder {
    /// Create a finder over a validated configuration.
    pub fn new(config: FinderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a finder from the system configuration.
    pub fn from_config(config: &MigratorConfig) -> Result<Self> {
        Self::new(config.finder.clone())
    }

    /// The finder's configuration.
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// The gas budget for one search: the search's own when set, the
    /// configured default otherwise.
    fn budget(&self, search: &SwapSearch) -> u64 {
        search
            .max_gas_estimate
            .unwrap_or(self.config.default_max_gas_estimate)
    }

    /// Find the best direct route from `token_in` to `token_out`.
    ///
    /// Enumerates every configured fee tier in ascending order, skipping
    /// missing pools and the search's excluded pool. For an exact-input
    /// search the best candidate is the one producing the largest output;
    /// for exact-output, the one requiring the smallest input. Ties keep the
    /// first-found candidate, so the lower fee tier wins.
    ///
    /// A configured stable 1:1 pair short-circuits the venue entirely and
    /// returns a parity route with zero gas.
    ///
    /// # Errors
    ///
    /// Returns `SwapPoolsNotFound` when no tier produced a non-zero quote,
    /// or a parameter error from [`SwapSearch::direction`].
    pub fn best_single_swap_path(
        &self,
        venue: &dyn SwapVenue,
        search: &SwapSearch,
    ) -> Result<RouteQuote> {
        let amount = search.direction()?;
        let budget = self.budget(search);

        if self.config.is_stable_pair(search.token_in, search.token_out) {
            tracing::debug!(
                token_in = %search.token_in,
                token_out = %search.token_out,
                "Stable pair short-circuit, returning parity route"
            );
            return Ok(RouteQuote {
                path: SwapPath::single(search.token_in, FeeTier::PARITY, search.token_out),
                amount: amount.magnitude(),
                gas_estimate: 0,
            });
        }

        let mut best: Option<RouteQuote> = None;
        for &tier in &self.config.fee_tiers {
            let Some(pool) = venue.pool_for(search.token_in, search.token_out, tier) else {
                continue;
            };
            if search.excluded_pool == Some(pool) {
                tracing::debug!(pool = %pool, tier = %tier, "Skipping excluded pool");
                continue;
            }

            let path = SwapPath::single(search.token_in, tier, search.token_out);
            if let Some(candidate) = self.probe(venue, path, amount, budget) {
                track_best(&mut best, candidate, amount);
            }
        }

        best.ok_or_else(|| {
            RoutingError::SwapPoolsNotFound {
                token_in: search.token_in,
                token_out: search.token_out,
            }
            .into()
        })
    }

    /// Find the best route from `token_in` to `token_out` through one of the
    /// supplied connector assets.
    ///
    /// Path shape is assembled before direction-aware quoting: the first leg
    /// (far endpoint to connector) is always searched as exact-input with the
    /// caller's amount as the probe size, regardless of the requested
    /// direction. Each partial path is then extended to the final endpoint
    /// across every fee tier, and the complete route is quoted in the true
    /// direction under the same best/tie-break/defensive rules as the
    /// single-hop search.
    ///
    /// # Errors
    ///
    /// Returns `MustBeAtLeastOneConnector` for an empty connector set and
    /// `SwapPoolsNotFound` when no combination produced a non-zero quote.
    pub fn best_multi_swap_path(
        &self,
        venue: &dyn SwapVenue,
        search: &SwapSearch,
        connectors: &[Address],
    ) -> Result<RouteQuote> {
        let amount = search.direction()?;
        let budget = self.budget(search);
        if connectors.is_empty() {
            return Err(RoutingError::MustBeAtLeastOneConnector.into());
        }

        // First legs, one per usable connector.
        let partials: Vec<RouteQuote> = connectors
            .iter()
            .filter(|&&connector| {
                connector != search.token_in && connector != search.token_out
            })
            .filter_map(|&connector| {
                let leg_search = SwapSearch {
                    token_in: search.token_in,
                    token_out: connector,
                    amount_in: Some(amount.magnitude()),
                    amount_out: None,
                    excluded_pool: search.excluded_pool,
                    max_gas_estimate: Some(budget),
                };
                match self.best_single_swap_path(venue, &leg_search) {
                    Ok(leg) => Some(leg),
                    Err(error) => {
                        tracing::debug!(
                            connector = %connector,
                            error = %error,
                            "No first leg to connector, skipping"
                        );
                        None
                    }
                }
            })
            .collect();

        let mut best: Option<RouteQuote> = None;
        for (partial, &tier) in partials.iter().cartesian_product(&self.config.fee_tiers) {
            let connector = partial.path.end_asset();
            let Some(pool) = venue.pool_for(connector, search.token_out, tier) else {
                continue;
            };
            if search.excluded_pool == Some(pool) {
                tracing::debug!(pool = %pool, tier = %tier, "Skipping excluded pool");
                continue;
            }

            let full_path = partial.path.extended(tier, search.token_out);
            if let Some(candidate) = self.probe(venue, full_path, amount, budget) {
                track_best(&mut best, candidate, amount);
            }
        }

        best.ok_or_else(|| {
            RoutingError::SwapPoolsNotFound {
                token_in: search.token_in,
                token_out: search.token_out,
            }
            .into()
        })
    }

    /// Quote a candidate path defensively: a failed probe, a zero quote, or
    /// a gas estimate over budget discards the candidate without aborting
    /// the search.
    fn probe(
        &self,
        venue: &dyn SwapVenue,
        path: SwapPath,
        amount: SwapAmount,
        max_gas_estimate: u64,
    ) -> Option<RouteQuote> {
        match venue.quote(&path, amount, max_gas_estimate) {
            Ok(quote) => {
                if quote.amount.is_zero() {
                    tracing::debug!(path = %path, "Quote returned zero, discarding candidate");
                    return None;
                }
                if quote.gas_estimate > max_gas_estimate {
                    tracing::debug!(
                        path = %path,
                        gas_estimate = quote.gas_estimate,
                        budget = max_gas_estimate,
                        "Quote exceeded gas budget, discarding candidate"
                    );
                    return None;
                }
                Some(RouteQuote {
                    path,
                    amount: quote.amount,
                    gas_estimate: quote.gas_estimate,
                })
            }
            Err(error) => {
                tracing::debug!(path = %path, error = %error, "Quote probe failed, discarding candidate");
                None
            }
        }
    }
}

/// Keep the better of the incumbent and the candidate. Strict comparison
/// keeps the incumbent on ties, which preserves first-found ordering.
fn track_best(best: &mut Option<RouteQuote>, candidate: RouteQuote, amount: SwapAmount) {
    let improves = match best {
        None => true,
        Some(incumbent) => {
            if amount.is_exact_in() {
                candidate.amount > incumbent.amount
            } else {
                candidate.amount < incumbent.amount
            }
        }
    };
    if improves {
        *best = Some(candidate);
    }
}
