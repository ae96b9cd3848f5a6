//! Property-based tests for the swap path.
//!
//! 1. **k preservation**: `k` never decreases and only grows by rounding dust.
//! 2. **Price direction**: buying base raises the price, selling lowers it.
//! 3. **Atomic rejection**: a rejected swap leaves the pool untouched and an
//!    accepted one stays within the fluctuation limit.
//! 4. **Round trip**: selling back what a buy delivered never returns more
//!    than was paid.
//! 5. **Sequential k**: over many blocks of swaps on wide fractional
//!    reserves, `k` compares exactly and never decreases.

use primitive_types::U256;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{SwapEngine, SwapRequest};
use crate::block::BlockContext;
use crate::oracle::StaticOracle;
use crate::registry::{MemoryPoolStore, PoolStore};
use chrono::{TimeZone, Utc};
use vamm_domain::{Amount, AssetPair, AssetSide, Direction, Pool, PoolParams};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn pair() -> AssetPair {
    let Ok(pair) = "ubtc:unusd".parse() else {
        panic!("valid pair");
    };
    pair
}

fn params(trade: Decimal, fluctuation: Decimal, spread: Decimal) -> PoolParams {
    PoolParams {
        trade_limit_ratio: trade,
        fluctuation_limit_ratio: fluctuation,
        max_oracle_spread_ratio: spread,
        maintenance_margin_ratio: dec!(0.0625),
        max_leverage: dec!(10),
    }
}

fn setup(quote: u64, base: u64, params: PoolParams) -> (MemoryPoolStore, BlockContext, StaticOracle) {
    setup_raw(Amount::from_units(quote), Amount::from_units(base), params)
}

fn setup_raw(
    quote: Amount,
    base: Amount,
    params: PoolParams,
) -> (MemoryPoolStore, BlockContext, StaticOracle) {
    let Ok(pool) = Pool::new(pair(), quote, base, params) else {
        panic!("valid pool");
    };
    let Ok(spot) = pool.spot_price() else {
        panic!("valid price");
    };
    let mut store = MemoryPoolStore::new();
    let Ok(()) = store.create(pool) else {
        panic!("fresh store");
    };
    let Some(time) = Utc.timestamp_opt(1_700_000_000, 0).single() else {
        panic!("valid time");
    };
    let mut oracle = StaticOracle::new();
    oracle.post(pair(), spot, time);
    (store, BlockContext::new(1, time), oracle)
}

fn side_strategy() -> impl Strategy<Value = AssetSide> {
    prop_oneof![Just(AssetSide::Quote), Just(AssetSide::Base)]
}

fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::AddToPool), Just(Direction::RemoveFromPool)]
}

fn request(pool: &Pool, side: AssetSide, direction: Direction, percent: u64) -> SwapRequest {
    let ratio = Decimal::new(i64::try_from(percent).unwrap_or(i64::MAX), 2);
    let Some(amount) = pool.reserve(side).mul_ratio_floor(ratio) else {
        panic!("percent is non-negative");
    };
    SwapRequest::new(pair(), direction, side, amount)
}

/// `units + frac × 10^-18`.
fn fractional(units: u64, frac: u64) -> Amount {
    Amount::from_raw(U256::from(units) * U256::exp10(18) + U256::from(frac))
}

/// Reserve the trade was denominated in, after the trade.
fn input_reserve(quote: Amount, base: Amount, side: AssetSide) -> Amount {
    match side {
        AssetSide::Quote => quote,
        AssetSide::Base => base,
    }
}

// ---------------------------------------------------------------------------
// Property 1: k preservation
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_k_never_decreases(
        quote in 1_000u64..10_000_000,
        base in 1_000u64..100_000,
        side in side_strategy(),
        direction in direction_strategy(),
        percent in 1u64..60,
    ) {
        let (store, _, _) = setup(quote, base, params(dec!(1), dec!(1), dec!(1)));
        let Ok(pool) = store.get(&pair()) else { panic!("pool exists") };
        let Ok(k) = pool.k() else { panic!("valid k") };

        let curve = match SwapEngine::default().quote(&store, &request(&pool, side, direction, percent)) {
            Ok(curve) => curve,
            Err(err) => return Err(TestCaseError::fail(format!("curve failed: {err}"))),
        };
        let Some(k_after) = curve.quote_reserve.checked_mul(curve.base_reserve) else {
            return Err(TestCaseError::fail("k overflow"));
        };

        prop_assert!(k_after >= k, "k decreased: {} < {}", k_after, k);
        let input = input_reserve(curve.quote_reserve, curve.base_reserve, side);
        prop_assert!(
            k_after.raw() - k.raw() < input.raw(),
            "k grew by more than dust: {} -> {}", k, k_after
        );
    }
}

// ---------------------------------------------------------------------------
// Property 2: Price direction
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_price_direction(
        quote in 1_000u64..10_000_000,
        base in 1_000u64..100_000,
        side in side_strategy(),
        direction in direction_strategy(),
        percent in 1u64..60,
    ) {
        let (store, _, _) = setup(quote, base, params(dec!(1), dec!(1), dec!(1)));
        let Ok(pool) = store.get(&pair()) else { panic!("pool exists") };
        let Ok(curve) = SwapEngine::default().quote(&store, &request(&pool, side, direction, percent)) else {
            return Err(TestCaseError::fail("curve failed"));
        };

        let buys_base = matches!(
            (side, direction),
            (AssetSide::Quote, Direction::AddToPool) | (AssetSide::Base, Direction::RemoveFromPool)
        );
        if buys_base {
            prop_assert!(curve.post_price > curve.pre_price);
        } else {
            prop_assert!(curve.post_price < curve.pre_price);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: Atomic rejection
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_rejection_leaves_pool_untouched(
        quote in 100_000u64..10_000_000,
        base in 1_000u64..100_000,
        side in side_strategy(),
        direction in direction_strategy(),
        percent in 1u64..150,
    ) {
        let (mut store, mut block, oracle) = setup(quote, base, params(dec!(0.1), dec!(0.05), dec!(0.1)));
        let Ok(before) = store.get(&pair()) else { panic!("pool exists") };
        let request = request(&before, side, direction, percent);

        match SwapEngine::default().execute(&mut store, &mut block, &oracle, &request) {
            Ok(outcome) => {
                let Ok(open) = before.spot_price() else { panic!("valid price") };
                prop_assert!(outcome.post_price.within_ratio_of(open, dec!(0.05)));
            }
            Err(err) => {
                prop_assert!(!err.is_fatal(), "fatal error {}", err);
                prop_assert_eq!(store.get(&pair()).ok(), Some(before));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property 4: Round trip
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_round_trip_never_profits(
        quote in 100_000u64..10_000_000,
        base in 1_000u64..100_000,
        percent in 1u64..40,
    ) {
        let (mut store, mut block, oracle) = setup(quote, base, params(dec!(1), dec!(1), dec!(1)));
        let engine = SwapEngine::default();
        let Ok(pool) = store.get(&pair()) else { panic!("pool exists") };

        let buy = request(&pool, AssetSide::Quote, Direction::AddToPool, percent);
        let Ok(bought) = engine.execute(&mut store, &mut block, &oracle, &buy) else {
            return Ok(());
        };
        let sell = SwapRequest::new(pair(), Direction::AddToPool, AssetSide::Base, bought.counter_amount);
        let Ok(sold) = engine.execute(&mut store, &mut block, &oracle, &sell) else {
            return Ok(());
        };

        prop_assert!(
            sold.counter_amount <= buy.amount,
            "round trip returned {} for {}", sold.counter_amount, buy.amount
        );
    }
}

// ---------------------------------------------------------------------------
// Property 5: Sequential k on wide fractional reserves
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_sequential_swaps_keep_k_exactly(
        quote_units in 1_000_000_000_000u64..10_000_000_000_000,
        quote_frac in 0u64..1_000_000_000_000_000_000,
        base_units in 1_000_000u64..1_000_000_000,
        base_frac in 0u64..1_000_000_000_000_000_000,
        steps in prop::collection::vec(
            (side_strategy(), direction_strategy(), 1u64..12),
            20..80,
        ),
    ) {
        let (mut store, mut block, mut oracle) = setup_raw(
            fractional(quote_units, quote_frac),
            fractional(base_units, base_frac),
            params(dec!(0.1), dec!(0.5), dec!(0.5)),
        );
        let engine = SwapEngine::default();

        for (step, (side, direction, percent)) in steps.into_iter().enumerate() {
            let Ok(before) = store.get(&pair()) else { panic!("pool exists") };
            let Ok(k_before) = before.k() else { panic!("valid k") };
            let Ok(spot) = before.spot_price() else { panic!("valid price") };

            let height = block.height() + 1;
            let time = block.time() + chrono::Duration::seconds(5);
            block.advance(height, time);
            oracle.post(pair(), spot, time);

            let request = request(&before, side, direction, percent);
            match engine.execute(&mut store, &mut block, &oracle, &request) {
                Ok(outcome) => {
                    let Ok(after) = store.get(&pair()) else { panic!("pool exists") };
                    let Ok(k_after) = after.k() else { panic!("valid k") };
                    prop_assert!(
                        k_after >= k_before,
                        "step {}: k decreased from {} to {}", step, k_before, k_after
                    );
                    let input = input_reserve(outcome.quote_reserve, outcome.base_reserve, side);
                    prop_assert!(
                        k_after.raw() - k_before.raw() < input.raw(),
                        "step {}: k grew by more than dust: {} -> {}", step, k_before, k_after
                    );
                }
                Err(err) => {
                    prop_assert!(!err.is_fatal(), "step {}: fatal error {}", step, err);
                    prop_assert_eq!(store.get(&pair()).ok(), Some(before));
                }
            }
        }
    }
}
