//! Per-block execution context.
//!
//! The block's opening price for each pool lives here rather than in the
//! pool itself. It is captured the first time a pool is touched in a block,
//! stays fixed for the rest of the block, and is dropped when the context
//! advances to the next block.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::debug;
use vamm_domain::{AssetPair, Price};

/// Block-scoped state supplied by the surrounding state machine.
#[derive(Debug, Clone)]
pub struct BlockContext {
    height: u64,
    time: DateTime<Utc>,
    open_prices: BTreeMap<AssetPair, Price>,
}

impl BlockContext {
    /// Creates the context for a block.
    #[must_use]
    pub fn new(height: u64, time: DateTime<Utc>) -> Self {
        Self {
            height,
            time,
            open_prices: BTreeMap::new(),
        }
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    /// Returns the opening price for `pair`, capturing `current` on first touch.
    pub fn open_price(&mut self, pair: &AssetPair, current: Price) -> Price {
        *self.open_prices.entry(pair.clone()).or_insert_with(|| {
            debug!(pair = %pair, height = self.height, price = %current, "Captured block open price");
            current
        })
    }

    /// Opening price if the pool was already touched in this block.
    pub fn captured_open_price(&self, pair: &AssetPair) -> Option<Price> {
        self.open_prices.get(pair).copied()
    }

    /// Drops the captured price of a pool, e.g. after governance replaced its reserves.
    pub fn forget(&mut self, pair: &AssetPair) {
        self.open_prices.remove(pair);
    }

    /// Moves to the next block and resets every opening price.
    pub fn advance(&mut self, height: u64, time: DateTime<Utc>) {
        self.height = height;
        self.time = time;
        self.open_prices.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn pair() -> AssetPair {
        "ubtc:unusd".parse().unwrap()
    }

    #[test]
    fn test_open_price_fixed_within_block() {
        let mut ctx = BlockContext::new(1, Utc.timestamp_opt(1_000, 0).unwrap());
        let first = ctx.open_price(&pair(), Price::new(dec!(1000)));
        let second = ctx.open_price(&pair(), Price::new(dec!(1040)));
        assert_eq!(first.value, dec!(1000));
        assert_eq!(second.value, dec!(1000));
    }

    #[test]
    fn test_advance_resets() {
        let mut ctx = BlockContext::new(1, Utc.timestamp_opt(1_000, 0).unwrap());
        ctx.open_price(&pair(), Price::new(dec!(1000)));
        ctx.advance(2, Utc.timestamp_opt(1_006, 0).unwrap());
        assert_eq!(ctx.height(), 2);
        assert!(ctx.captured_open_price(&pair()).is_none());
        assert_eq!(ctx.open_price(&pair(), Price::new(dec!(1040))).value, dec!(1040));
    }
}
