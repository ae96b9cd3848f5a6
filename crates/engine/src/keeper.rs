//! Keeper: the module's public surface toward the surrounding state machine.
//!
//! Owns the pool store, the oracle view, the current block context, reserve
//! snapshots and the pending event buffer. Every mutation of a pool goes
//! through the store's typed API.

use crate::block::BlockContext;
use crate::config::EngineConfig;
use crate::events::{EventRecord, VammEvent};
use crate::governance::{
    CreatePoolProposal, EditPoolParamsProposal, validate_create_pool, validate_edit_pool,
};
use crate::guards::fresh_reference_price;
use crate::oracle::PriceOracle;
use crate::registry::PoolStore;
use crate::snapshot::{ReserveSnapshot, SnapshotHistory};
use crate::swap::{SwapEngine, SwapOutcome, SwapRequest};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::{info, warn};
use vamm_domain::math::CurveOutcome;
use vamm_domain::validation::check_reserves;
use vamm_domain::{Amount, AssetPair, MarginParams, Pool, Price, Result, Violations};

/// vAMM keeper.
#[derive(Debug)]
pub struct VammKeeper<S, O> {
    store: S,
    oracle: O,
    engine: SwapEngine,
    block: BlockContext,
    snapshots: BTreeMap<AssetPair, SnapshotHistory>,
    events: Vec<EventRecord>,
}

impl<S: PoolStore, O: PriceOracle> VammKeeper<S, O> {
    /// Creates a keeper positioned at block 0 (Unix epoch).
    pub fn new(store: S, oracle: O, config: EngineConfig) -> Self {
        Self {
            store,
            oracle,
            engine: SwapEngine::new(config),
            block: BlockContext::new(0, DateTime::<Utc>::default()),
            snapshots: BTreeMap::new(),
            events: Vec::new(),
        }
    }

    /// Starts a new block. Every pool's opening price is reset.
    pub fn begin_block(&mut self, height: u64, time: DateTime<Utc>) {
        self.block.advance(height, time);
    }

    pub fn block(&self) -> &BlockContext {
        &self.block
    }

    pub fn config(&self) -> &EngineConfig {
        self.engine.config()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the oracle view, for hosts that feed it directly.
    pub fn oracle_mut(&mut self) -> &mut O {
        &mut self.oracle
    }

    /// Applies a passed create-pool proposal.
    ///
    /// # Errors
    /// Returns `InvalidProposal` or `PoolAlreadyExists`.
    pub fn create_pool(&mut self, proposal: &CreatePoolProposal) -> Result<Pool> {
        let pool = validate_create_pool(proposal)?;
        self.store.create(pool.clone()).inspect_err(|e| {
            warn!(pair = %pool.pair(), error = %e, "Pool creation rejected");
        })?;

        info!(
            pair = %pool.pair(),
            quote_reserve = %pool.quote_asset_reserve(),
            base_reserve = %pool.base_asset_reserve(),
            max_leverage = %pool.params().max_leverage,
            "Pool created"
        );
        self.record_snapshot(&pool);
        self.emit(VammEvent::PoolCreated {
            pair: pool.pair().clone(),
            quote_asset_reserve: pool.quote_asset_reserve(),
            base_asset_reserve: pool.base_asset_reserve(),
        });
        Ok(pool)
    }

    /// Applies a passed parameter-edit proposal. Reserves and `k` are kept.
    ///
    /// # Errors
    /// Returns `InvalidProposal` or `PoolNotFound`.
    pub fn edit_pool_params(&mut self, proposal: &EditPoolParamsProposal) -> Result<Pool> {
        let (pair, params) = validate_edit_pool(proposal)?;
        let pool = self.store.update(&pair, |pool| pool.set_params(params))?;
        info!(
            pair = %pair,
            trade_limit_ratio = %params.trade_limit_ratio,
            fluctuation_limit_ratio = %params.fluctuation_limit_ratio,
            max_oracle_spread_ratio = %params.max_oracle_spread_ratio,
            max_leverage = %params.max_leverage,
            "Pool parameters updated"
        );
        self.emit(VammEvent::PoolParamsUpdated { pair, params });
        Ok(pool)
    }

    /// Replaces both reserves of a pool. This is the only operation that
    /// changes `k`; the pool's opening price for the current block is reset.
    ///
    /// # Errors
    /// Returns `InvalidProposal` for bad reserves or `PoolNotFound`.
    pub fn reinitialize_reserves(
        &mut self,
        pair: &AssetPair,
        quote_asset_reserve: Amount,
        base_asset_reserve: Amount,
    ) -> Result<Pool> {
        let mut violations = Violations::new();
        check_reserves(quote_asset_reserve, base_asset_reserve, &mut violations);
        violations.into_result().inspect_err(|e| {
            warn!(pair = %pair, error = %e, "Reserve reinitialization rejected");
        })?;

        let previous_k = self.store.get(pair)?.k()?;
        let pool = self.store.update(pair, |pool| {
            pool.set_reserves(quote_asset_reserve, base_asset_reserve)
        })?;
        let k = pool.k()?;
        info!(
            pair = %pair,
            quote_reserve = %quote_asset_reserve,
            base_reserve = %base_asset_reserve,
            previous_k = %previous_k,
            k = %k,
            "Pool reserves reinitialized"
        );
        self.block.forget(pair);
        self.record_snapshot(&pool);
        self.emit(VammEvent::ReservesReinitialized {
            pair: pair.clone(),
            quote_asset_reserve,
            base_asset_reserve,
            previous_k,
            k,
        });
        Ok(pool)
    }

    /// Removes a pool with its snapshots.
    ///
    /// # Errors
    /// Returns `PoolNotFound`.
    pub fn remove_pool(&mut self, pair: &AssetPair) -> Result<Pool> {
        let pool = self.store.remove(pair)?;
        self.snapshots.remove(pair);
        self.block.forget(pair);
        info!(pair = %pair, "Pool removed");
        self.emit(VammEvent::PoolRemoved { pair: pair.clone() });
        Ok(pool)
    }

    /// # Errors
    /// Returns `PoolNotFound`.
    pub fn pool(&self, pair: &AssetPair) -> Result<Pool> {
        self.store.get(pair)
    }

    pub fn exists(&self, pair: &AssetPair) -> bool {
        self.store.contains(pair)
    }

    /// Registered pairs in ascending order.
    pub fn pairs(&self) -> Vec<AssetPair> {
        self.store.pairs()
    }

    /// Current spot price `quote / base`.
    ///
    /// # Errors
    /// Returns `PoolNotFound`.
    pub fn get_current_price(&self, pair: &AssetPair) -> Result<Price> {
        self.store.get(pair)?.spot_price()
    }

    /// Parameters the margin ledger reads for a pool.
    ///
    /// # Errors
    /// Returns `PoolNotFound`.
    pub fn get_pool_params(&self, pair: &AssetPair) -> Result<MarginParams> {
        Ok(self.store.get(pair)?.params().margin_params())
    }

    /// Executes a swap in the current block.
    ///
    /// # Errors
    /// See [`SwapEngine::execute`].
    pub fn swap(&mut self, request: &SwapRequest) -> Result<SwapOutcome> {
        let outcome = self
            .engine
            .execute(&mut self.store, &mut self.block, &self.oracle, request)?;
        let pool = self.store.get(&request.pair)?;
        self.record_snapshot(&pool);
        self.emit(VammEvent::Swap(outcome.clone()));
        Ok(outcome)
    }

    /// Prices a swap without guards and without committing.
    ///
    /// # Errors
    /// See [`SwapEngine::quote`].
    pub fn quote_swap(&self, request: &SwapRequest) -> Result<CurveOutcome> {
        self.engine.quote(&self.store, request)
    }

    /// Time-weighted spot price over `lookback_secs` (the configured window
    /// when `None`). Falls back to the spot price when no snapshot exists.
    ///
    /// # Errors
    /// Returns `PoolNotFound`.
    pub fn twap_price(&self, pair: &AssetPair, lookback_secs: Option<u64>) -> Result<Price> {
        let pool = self.store.get(pair)?;
        let lookback = lookback_secs.unwrap_or(self.engine.config().twap_lookback_secs);
        let twap = match self.snapshots.get(pair) {
            Some(history) => history.twap(self.block.time(), lookback)?,
            None => None,
        };
        match twap {
            Some(price) => Ok(price),
            None => pool.spot_price(),
        }
    }

    /// True when the current spot price diverges from the oracle by more
    /// than the pool's max oracle spread ratio.
    ///
    /// # Errors
    /// Returns `PoolNotFound` or `OraclePriceUnavailable`.
    pub fn is_over_spread_limit(&self, pair: &AssetPair) -> Result<bool> {
        let pool = self.store.get(pair)?;
        let reference = fresh_reference_price(
            &self.oracle,
            pair,
            self.block.time(),
            self.engine.config().max_oracle_age_secs,
        )?;
        let within = pool
            .spot_price()?
            .within_ratio_of(reference.price, pool.params().max_oracle_spread_ratio);
        Ok(!within)
    }

    /// Takes every event emitted since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<EventRecord> {
        std::mem::take(&mut self.events)
    }

    fn record_snapshot(&mut self, pool: &Pool) {
        let retention = self.engine.config().snapshot_retention;
        self.snapshots
            .entry(pool.pair().clone())
            .or_insert_with(|| SnapshotHistory::new(retention))
            .record(ReserveSnapshot::of(pool, self.block.height(), self.block.time()));
    }

    fn emit(&mut self, event: VammEvent) {
        self.events.push(EventRecord {
            block_height: self.block.height(),
            time: self.block.time(),
            event,
        });
    }
}
