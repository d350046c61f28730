//! Route search behavior over a mock fee-tiered venue.

mod common;

use alloy::primitives::U256;
use common::{addr, MockSwapVenue};
use flash_migrator::codec::FeeTier;
use flash_migrator::config::MigratorConfig;
use flash_migrator::errors::{MigrationError, RoutingError};
use flash_migrator::protocols::{SwapAmount, SwapVenue};
use flash_migrator::routing::{PathFinder, SwapSearch};
use flash_migrator::PathFinderBuilder;

const TOKEN_A: u8 = 0xB1;
const TOKEN_B: u8 = 0xB2;
const CONNECTOR_X: u8 = 0xB3;
const CONNECTOR_Y: u8 = 0xB4;
const POOL_LOW: u8 = 0xC1;
const POOL_MEDIUM: u8 = 0xC2;
const POOL_AX: u8 = 0xC3;
const POOL_XB: u8 = 0xC4;
const POOL_AY: u8 = 0xC5;
const POOL_YB: u8 = 0xC6;
const POOL_XB_ALT: u8 = 0xC7;
const VENUE: u8 = 0xD0;

const GAS_BUDGET: u64 = 500_000;

fn default_finder() -> PathFinder {
    PathFinder::from_config(&MigratorConfig::default()).unwrap()
}

/// Direct A/B pools at two tiers with different rates: the low tier pays 3
/// output per input, the medium tier only 2.
fn tiered_venue() -> MockSwapVenue {
    MockSwapVenue::new(addr(VENUE))
        .with_pool(addr(TOKEN_A), addr(TOKEN_B), FeeTier::LOW, addr(POOL_LOW), 3, 1)
        .with_pool(
            addr(TOKEN_A),
            addr(TOKEN_B),
            FeeTier::MEDIUM,
            addr(POOL_MEDIUM),
            2,
            1,
        )
}

#[test]
fn test_exact_in_picks_largest_output_across_tiers() {
    let finder = default_finder();
    let venue = tiered_venue();

    let search = SwapSearch::exact_in(addr(TOKEN_A), addr(TOKEN_B), U256::from(1_000u64))
            .with_max_gas_estimate(GAS_BUDGET);
    let best = finder.best_single_swap_path(&venue, &search).unwrap();
    assert_eq!(best.amount, U256::from(3_000u64));
    assert_eq!(best.path.hops()[0].fee, FeeTier::LOW);

    // The winner is at least as good as every tier quoted individually
    for &tier in &finder.config().fee_tiers {
        if venue
            .pool_for(addr(TOKEN_A), addr(TOKEN_B), tier)
            .is_none()
        {
            continue;
        }
        let path = flash_migrator::codec::SwapPath::single(addr(TOKEN_A), tier, addr(TOKEN_B));
        let quote = venue
            .quote(&path, SwapAmount::ExactIn(U256::from(1_000u64)), GAS_BUDGET)
            .unwrap();
        assert!(best.amount >= quote.amount);
    }
}

#[test]
fn test_exact_out_picks_smallest_input() {
    let finder = default_finder();
    let venue = tiered_venue();

    let search = SwapSearch::exact_out(addr(TOKEN_A), addr(TOKEN_B), U256::from(900u64))
            .with_max_gas_estimate(GAS_BUDGET);
    let best = finder.best_single_swap_path(&venue, &search).unwrap();
    // Low tier needs 300 in, medium tier 450
    assert_eq!(best.amount, U256::from(300u64));
    assert_eq!(best.path.hops()[0].fee, FeeTier::LOW);
}

#[test]
fn test_excluded_pool_never_appears_in_route() {
    let finder = default_finder();
    let venue = tiered_venue();

    let search =
        SwapSearch::exact_in(addr(TOKEN_A), addr(TOKEN_B), U256::from(1_000u64))
            .with_max_gas_estimate(GAS_BUDGET)
            .exclude_pool(addr(POOL_LOW));
    let best = finder.best_single_swap_path(&venue, &search).unwrap();
    // With the better pool off limits the medium tier wins
    assert_eq!(best.amount, U256::from(2_000u64));
    let hop = best.path.hops()[0];
    assert_ne!(
        venue.pool_for(addr(TOKEN_A), hop.asset_out, hop.fee),
        Some(addr(POOL_LOW))
    );
}

#[test]
fn test_multi_hop_picks_best_connector() {
    common::init_tracing();
    let finder = default_finder();
    // A-X doubles, X-B is flat; the Y route is flat end to end
    let venue = MockSwapVenue::new(addr(VENUE))
        .with_pool(addr(TOKEN_A), addr(CONNECTOR_X), FeeTier::LOW, addr(POOL_AX), 2, 1)
        .with_pool(addr(CONNECTOR_X), addr(TOKEN_B), FeeTier::LOW, addr(POOL_XB), 1, 1)
        .with_pool(addr(TOKEN_A), addr(CONNECTOR_Y), FeeTier::LOW, addr(POOL_AY), 1, 1)
        .with_pool(addr(CONNECTOR_Y), addr(TOKEN_B), FeeTier::LOW, addr(POOL_YB), 1, 1);

    let search = SwapSearch::exact_in(addr(TOKEN_A), addr(TOKEN_B), U256::from(1_000u64))
            .with_max_gas_estimate(GAS_BUDGET);
    let best = finder
        .best_multi_swap_path(&venue, &search, &[addr(CONNECTOR_X), addr(CONNECTOR_Y)])
        .unwrap();

    assert_eq!(best.amount, U256::from(2_000u64));
    assert_eq!(best.path.hop_count(), 2);
    assert_eq!(best.path.hops()[0].asset_out, addr(CONNECTOR_X));
    assert_eq!(best.path.end_asset(), addr(TOKEN_B));
}

#[test]
fn test_excluded_pool_skipped_on_second_hop() {
    let finder = default_finder();
    // Both X-B tiers exist; the better one is excluded
    let venue = MockSwapVenue::new(addr(VENUE))
        .with_pool(addr(TOKEN_A), addr(CONNECTOR_X), FeeTier::LOW, addr(POOL_AX), 2, 1)
        .with_pool(addr(CONNECTOR_X), addr(TOKEN_B), FeeTier::LOW, addr(POOL_XB), 2, 1)
        .with_pool(
            addr(CONNECTOR_X),
            addr(TOKEN_B),
            FeeTier::MEDIUM,
            addr(POOL_XB_ALT),
            1,
            1,
        );

    let search = SwapSearch::exact_in(addr(TOKEN_A), addr(TOKEN_B), U256::from(1_000u64))
        .with_max_gas_estimate(GAS_BUDGET)
        .exclude_pool(addr(POOL_XB));
    let best = finder
        .best_multi_swap_path(&venue, &search, &[addr(CONNECTOR_X)])
        .unwrap();

    // 2000 via the medium tier, not 4000 via the excluded low-tier pool
    assert_eq!(best.amount, U256::from(2_000u64));
    let second = best.path.hops()[1];
    assert_eq!(second.fee, FeeTier::MEDIUM);
    assert_ne!(
        venue.pool_for(addr(CONNECTOR_X), second.asset_out, second.fee),
        Some(addr(POOL_XB))
    );
}

#[test]
fn test_unset_budget_falls_back_to_configured_default() {
    // Default budget of 50k cannot afford a 60k hop
    let finder = PathFinderBuilder::new()
        .with_default_max_gas_estimate(50_000)
        .build()
        .unwrap();
    let venue = tiered_venue().with_gas_per_hop(60_000);

    let search = SwapSearch::exact_in(addr(TOKEN_A), addr(TOKEN_B), U256::from(1_000u64));
    let result = finder.best_single_swap_path(&venue, &search);
    assert!(matches!(
        result,
        Err(MigrationError::Routing(RoutingError::SwapPoolsNotFound { .. }))
    ));

    // An explicit budget on the same search overrides the default
    let search = search.with_max_gas_estimate(GAS_BUDGET);
    let best = finder.best_single_swap_path(&venue, &search).unwrap();
    assert_eq!(best.amount, U256::from(3_000u64));
}

#[test]
fn test_stable_pair_wins_over_live_pools() {
    let finder = PathFinderBuilder::new()
        .with_stable_pair(addr(TOKEN_A), addr(TOKEN_B))
        .build()
        .unwrap();
    // The venue has real pools, but the configured pair short-circuits them
    let venue = tiered_venue();

    let search = SwapSearch::exact_in(addr(TOKEN_A), addr(TOKEN_B), U256::from(1_000u64))
            .with_max_gas_estimate(GAS_BUDGET);
    let best = finder.best_single_swap_path(&venue, &search).unwrap();
    assert_eq!(best.amount, U256::from(1_000u64));
    assert_eq!(best.gas_estimate, 0);
    assert!(best.path.hops()[0].fee.is_parity());
}

#[test]
fn test_over_budget_probes_leave_no_candidates() {
    let finder = default_finder();
    let venue = tiered_venue().with_gas_per_hop(GAS_BUDGET + 1);

    let search = SwapSearch::exact_in(addr(TOKEN_A), addr(TOKEN_B), U256::from(1_000u64))
            .with_max_gas_estimate(GAS_BUDGET);
    let result = finder.best_single_swap_path(&venue, &search);
    assert!(matches!(
        result,
        Err(MigrationError::Routing(RoutingError::SwapPoolsNotFound { .. }))
    ));
}
