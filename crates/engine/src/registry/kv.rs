//! Pool store over a byte key-value store.
//!
//! Key is the pair identifier, value is the encoded pool record. This is the
//! layout persisted by the surrounding state machine.

use super::store::PoolStore;
use crate::governance::{decode_pool, encode_pool};
use std::collections::BTreeMap;
use tracing::{debug, error};
use vamm_domain::{AssetPair, Pool, Result, VammError};

/// Minimal byte store the registry persists into.
pub trait KeyValueStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;
    fn set(&mut self, key: Vec<u8>, value: Vec<u8>);
    fn delete(&mut self, key: &[u8]) -> bool;
    /// Keys in ascending byte order.
    fn keys(&self) -> Vec<Vec<u8>>;
}

/// Ordered in-memory byte store.
#[derive(Debug, Clone, Default)]
pub struct MemoryKv {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryKv {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKv {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.entries.insert(key, value);
    }

    fn delete(&mut self, key: &[u8]) -> bool {
        self.entries.remove(key).is_some()
    }

    fn keys(&self) -> Vec<Vec<u8>> {
        self.entries.keys().cloned().collect()
    }
}

/// [`PoolStore`] that keeps every pool encoded in a [`KeyValueStore`].
#[derive(Debug, Clone, Default)]
pub struct KvPoolStore<K> {
    kv: K,
}

impl<K: KeyValueStore> KvPoolStore<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    /// Underlying byte store.
    pub fn kv(&self) -> &K {
        &self.kv
    }

    pub fn into_inner(self) -> K {
        self.kv
    }

    fn load(&self, pair: &AssetPair) -> Result<Option<Pool>> {
        let Some(bytes) = self.kv.get(&pair.key_bytes()) else {
            return Ok(None);
        };
        let pool = decode_pool(&bytes).map_err(|e| {
            error!(pair = %pair, error = %e, "Stored pool record is corrupt");
            VammError::invariant(format!("stored record for {pair} is corrupt: {e}"))
        })?;
        if pool.pair() != pair {
            return Err(VammError::invariant(format!(
                "record under key {pair} holds pool {}",
                pool.pair()
            )));
        }
        Ok(Some(pool))
    }

    fn store(&mut self, pool: &Pool) -> Result<()> {
        let bytes = encode_pool(pool).map_err(|e| {
            VammError::invariant(format!("pool {} cannot be encoded: {e}", pool.pair()))
        })?;
        self.kv.set(pool.pair().key_bytes(), bytes);
        Ok(())
    }
}

impl<K: KeyValueStore> PoolStore for KvPoolStore<K> {
    fn get(&self, pair: &AssetPair) -> Result<Pool> {
        self.load(pair)?
            .ok_or_else(|| VammError::PoolNotFound { pair: pair.clone() })
    }

    fn contains(&self, pair: &AssetPair) -> bool {
        self.kv.get(&pair.key_bytes()).is_some()
    }

    fn create(&mut self, pool: Pool) -> Result<()> {
        if self.contains(pool.pair()) {
            return Err(VammError::PoolAlreadyExists {
                pair: pool.pair().clone(),
            });
        }
        self.store(&pool)?;
        debug!(pair = %pool.pair(), "Pool record written");
        Ok(())
    }

    fn update<F>(&mut self, pair: &AssetPair, mutation: F) -> Result<Pool>
    where
        F: FnOnce(&mut Pool) -> Result<()>,
    {
        let mut staged = self.get(pair)?;
        mutation(&mut staged)?;
        if staged.pair() != pair {
            return Err(VammError::invariant(format!(
                "mutation changed pool key from {pair} to {}",
                staged.pair()
            )));
        }
        self.store(&staged)?;
        Ok(staged)
    }

    fn remove(&mut self, pair: &AssetPair) -> Result<Pool> {
        let pool = self.get(pair)?;
        self.kv.delete(&pair.key_bytes());
        Ok(pool)
    }

    fn pairs(&self) -> Vec<AssetPair> {
        let mut pairs: Vec<AssetPair> = self
            .kv
            .keys()
            .into_iter()
            .filter_map(|key| String::from_utf8(key).ok())
            .filter_map(|key| key.parse().ok())
            .collect();
        pairs.sort();
        pairs
    }
}
