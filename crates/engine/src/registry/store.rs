//! Pool store contract and in-memory implementation.

use std::collections::BTreeMap;
use tracing::debug;
use vamm_domain::{AssetPair, Pool, Result, VammError};

/// Typed access to committed pool state.
///
/// Every mutation is all-or-nothing: [`PoolStore::update`] runs the mutation
/// on a copy and writes it back only if the mutation succeeds.
pub trait PoolStore {
    /// Returns a copy of the pool for `pair`.
    ///
    /// # Errors
    /// Returns `PoolNotFound` if no pool is registered.
    fn get(&self, pair: &AssetPair) -> Result<Pool>;

    /// Returns true if a pool is registered for `pair`.
    fn contains(&self, pair: &AssetPair) -> bool;

    /// Registers a new pool.
    ///
    /// # Errors
    /// Returns `PoolAlreadyExists` if the pair is taken.
    fn create(&mut self, pool: Pool) -> Result<()>;

    /// Applies `mutation` atomically and returns the committed pool.
    ///
    /// # Errors
    /// Returns `PoolNotFound`, or the mutation's own error (state untouched).
    fn update<F>(&mut self, pair: &AssetPair, mutation: F) -> Result<Pool>
    where
        F: FnOnce(&mut Pool) -> Result<()>;

    /// Removes and returns the pool.
    ///
    /// # Errors
    /// Returns `PoolNotFound` if no pool is registered.
    fn remove(&mut self, pair: &AssetPair) -> Result<Pool>;

    /// All registered pairs in ascending order.
    fn pairs(&self) -> Vec<AssetPair>;
}

/// Pools held decoded in an ordered map.
#[derive(Debug, Clone, Default)]
pub struct MemoryPoolStore {
    pools: BTreeMap<AssetPair, Pool>,
}

impl MemoryPoolStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

impl PoolStore for MemoryPoolStore {
    fn get(&self, pair: &AssetPair) -> Result<Pool> {
        self.pools
            .get(pair)
            .cloned()
            .ok_or_else(|| VammError::PoolNotFound { pair: pair.clone() })
    }

    fn contains(&self, pair: &AssetPair) -> bool {
        self.pools.contains_key(pair)
    }

    fn create(&mut self, pool: Pool) -> Result<()> {
        if self.pools.contains_key(pool.pair()) {
            return Err(VammError::PoolAlreadyExists {
                pair: pool.pair().clone(),
            });
        }
        debug!(pair = %pool.pair(), "Pool stored");
        self.pools.insert(pool.pair().clone(), pool);
        Ok(())
    }

    fn update<F>(&mut self, pair: &AssetPair, mutation: F) -> Result<Pool>
    where
        F: FnOnce(&mut Pool) -> Result<()>,
    {
        let slot = self
            .pools
            .get_mut(pair)
            .ok_or_else(|| VammError::PoolNotFound { pair: pair.clone() })?;
        let mut staged = slot.clone();
        mutation(&mut staged)?;
        if staged.pair() != pair {
            return Err(VammError::invariant(format!(
                "mutation changed pool key from {pair} to {}",
                staged.pair()
            )));
        }
        *slot = staged.clone();
        Ok(staged)
    }

    fn remove(&mut self, pair: &AssetPair) -> Result<Pool> {
        self.pools
            .remove(pair)
            .ok_or_else(|| VammError::PoolNotFound { pair: pair.clone() })
    }

    fn pairs(&self) -> Vec<AssetPair> {
        self.pools.keys().cloned().collect()
    }
}
