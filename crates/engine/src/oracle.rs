//! Oracle interface consumed by the oracle-spread guard.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use vamm_domain::{AssetPair, Price};

/// A reference price published by the oracle subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OraclePrice {
    pub price: Price,
    pub published_at: DateTime<Utc>,
}

impl OraclePrice {
    pub fn new(price: Price, published_at: DateTime<Utc>) -> Self {
        Self {
            price,
            published_at,
        }
    }

    /// True when published no more than `max_age_secs` before `now`.
    /// Prices stamped after `now` count as fresh.
    pub fn is_fresh(&self, now: DateTime<Utc>, max_age_secs: u64) -> bool {
        let max_age = i64::try_from(max_age_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX);
        now.signed_duration_since(self.published_at) <= max_age
    }
}

/// Read-only view of already-committed oracle state.
pub trait PriceOracle {
    /// Latest reference price for `pair`, if any was posted.
    fn reference_price(&self, pair: &AssetPair) -> Option<OraclePrice>;
}

/// In-memory oracle holding one posted price per pair.
#[derive(Debug, Clone, Default)]
pub struct StaticOracle {
    prices: BTreeMap<AssetPair, OraclePrice>,
}

impl StaticOracle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Posts (or replaces) the price for `pair`.
    pub fn post(&mut self, pair: AssetPair, price: Price, published_at: DateTime<Utc>) {
        self.prices.insert(pair, OraclePrice::new(price, published_at));
    }

    /// Removes the price for `pair`.
    pub fn clear(&mut self, pair: &AssetPair) {
        self.prices.remove(pair);
    }
}

impl PriceOracle for StaticOracle {
    fn reference_price(&self, pair: &AssetPair) -> Option<OraclePrice> {
        self.prices.get(pair).copied()
    }
}

impl<T: PriceOracle + ?Sized> PriceOracle for &T {
    fn reference_price(&self, pair: &AssetPair) -> Option<OraclePrice> {
        (**self).reference_price(pair)
    }
}
