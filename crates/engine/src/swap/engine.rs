//! Swap engine: curve evaluation, guard checks and the atomic commit.

use super::request::{SwapOutcome, SwapPhase, SwapRequest};
use crate::block::BlockContext;
use crate::config::EngineConfig;
use crate::guards::{check_fluctuation_limit, check_oracle_spread, check_trade_limit};
use crate::oracle::PriceOracle;
use crate::registry::PoolStore;
use tracing::{debug, error, info, warn};
use vamm_domain::math::{CurveOutcome, apply_trade};
use vamm_domain::{Direction, Pool, Result, VammError};

/// Executes swaps. Holds no pool state; the store, block context and oracle
/// are passed into every call.
#[derive(Debug, Clone, Default)]
pub struct SwapEngine {
    config: EngineConfig,
}

impl SwapEngine {
    /// Creates a new swap engine.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Gets the configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Prices a trade without running guards or committing anything.
    ///
    /// # Errors
    /// Returns `PoolNotFound`, `InvalidAmount`, or `InvariantViolation` when
    /// the trade would drain a reserve.
    pub fn quote<S: PoolStore>(&self, store: &S, request: &SwapRequest) -> Result<CurveOutcome> {
        let pool = store.get(&request.pair)?;
        apply_trade(
            pool.quote_asset_reserve(),
            pool.base_asset_reserve(),
            request.side,
            request.direction,
            request.amount,
        )
    }

    /// Executes a swap.
    ///
    /// Guards run in a fixed order and the new reserves are committed only
    /// after all of them pass. On any error the pool is left exactly as it
    /// was.
    ///
    /// # Errors
    /// Returns the first failing check. `InvariantViolation` is fatal and the
    /// enclosing transaction must abort.
    pub fn execute<S, O>(
        &self,
        store: &mut S,
        block: &mut BlockContext,
        oracle: &O,
        request: &SwapRequest,
    ) -> Result<SwapOutcome>
    where
        S: PoolStore,
        O: PriceOracle + ?Sized,
    {
        debug!(
            phase = %SwapPhase::Requested,
            pair = %request.pair,
            direction = %request.direction,
            side = %request.side,
            amount = %request.amount,
            "Swap requested"
        );

        let result = self
            .validate(store, block, oracle, request)
            .and_then(|outcome| {
                debug!(phase = %SwapPhase::Validated, pair = %request.pair, "Swap passed all guards");
                store.update(&request.pair, |pool| {
                    pool.set_reserves(outcome.quote_reserve, outcome.base_reserve)
                })?;
                Ok(outcome)
            });

        match &result {
            Ok(outcome) => info!(
                phase = %SwapPhase::Applied,
                pair = %outcome.pair,
                counter_amount = %outcome.counter_amount,
                price = %outcome.post_price,
                price_impact = %outcome.price_impact,
                "Swap applied"
            ),
            Err(e) if e.is_fatal() => error!(
                phase = %SwapPhase::Rejected,
                pair = %request.pair,
                error = %e,
                "Swap aborted on invariant violation"
            ),
            Err(e) => warn!(
                phase = %SwapPhase::Rejected,
                pair = %request.pair,
                error = %e,
                "Swap rejected"
            ),
        }
        result
    }

    fn validate<S, O>(
        &self,
        store: &S,
        block: &mut BlockContext,
        oracle: &O,
        request: &SwapRequest,
    ) -> Result<SwapOutcome>
    where
        S: PoolStore,
        O: PriceOracle + ?Sized,
    {
        let pool = store.get(&request.pair)?;
        if request.amount.is_zero() {
            return Err(VammError::InvalidAmount {
                amount: request.amount,
            });
        }
        let open_price = block.open_price(pool.pair(), pool.spot_price()?);

        check_trade_limit(&pool, request.side, request.amount, request.direction)?;

        let curve = apply_trade(
            pool.quote_asset_reserve(),
            pool.base_asset_reserve(),
            request.side,
            request.direction,
            request.amount,
        )?;
        let counter_direction = match request.direction {
            Direction::AddToPool => Direction::RemoveFromPool,
            Direction::RemoveFromPool => Direction::AddToPool,
        };
        check_trade_limit(
            &pool,
            request.side.counter(),
            curve.counter_amount,
            counter_direction,
        )?;
        check_slippage(&pool, request, &curve)?;

        let params = pool.params();
        check_fluctuation_limit(
            pool.pair(),
            curve.post_price,
            open_price,
            params.fluctuation_limit_ratio,
        )?;
        check_oracle_spread(
            pool.pair(),
            curve.post_price,
            oracle,
            params.max_oracle_spread_ratio,
            block.time(),
            self.config.max_oracle_age_secs,
        )?;

        Ok(SwapOutcome::from_curve(request, curve))
    }
}

fn check_slippage(pool: &Pool, request: &SwapRequest, curve: &CurveOutcome) -> Result<()> {
    let Some(limit) = request.counter_amount_limit else {
        return Ok(());
    };
    let acceptable = match request.direction {
        Direction::AddToPool => curve.counter_amount >= limit,
        Direction::RemoveFromPool => curve.counter_amount <= limit,
    };
    if acceptable {
        return Ok(());
    }
    Err(VammError::SlippageExceeded {
        pair: pool.pair().clone(),
        counter_amount: curve.counter_amount,
        limit,
    })
}
