//! Reserve snapshots and time-weighted average price.

use chrono::{DateTime, Duration, Utc};
use primitive_types::U512;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use vamm_domain::math::fixed::{decimal_from_scaled, scaled_from_decimal};
use vamm_domain::math::{PRECISION_SCALE, Rounding, spot_price};
use vamm_domain::{Amount, Pool, Price, Result, VammError};

/// Reserves of a pool as committed at the end of a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveSnapshot {
    pub quote_reserve: Amount,
    pub base_reserve: Amount,
    pub block_height: u64,
    pub time: DateTime<Utc>,
}

impl ReserveSnapshot {
    pub fn of(pool: &Pool, block_height: u64, time: DateTime<Utc>) -> Self {
        Self {
            quote_reserve: pool.quote_asset_reserve(),
            base_reserve: pool.base_asset_reserve(),
            block_height,
            time,
        }
    }

    /// Spot price at this snapshot.
    ///
    /// # Errors
    /// Returns `InvariantViolation` if the recorded reserves are not positive.
    pub fn price(&self) -> Result<Price> {
        spot_price(self.quote_reserve, self.base_reserve)
    }
}

/// Bounded, time-ordered snapshots of one pool. At most one snapshot is
/// kept per block: a later write in the same block replaces the earlier one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotHistory {
    snapshots: VecDeque<ReserveSnapshot>,
    retention: usize,
}

impl SnapshotHistory {
    pub fn new(retention: usize) -> Self {
        Self {
            snapshots: VecDeque::new(),
            retention: retention.max(1),
        }
    }

    pub fn record(&mut self, snapshot: ReserveSnapshot) {
        match self.snapshots.back_mut() {
            Some(last) if last.block_height == snapshot.block_height => {
                *last = snapshot;
                return;
            }
            _ => {}
        }
        self.snapshots.push_back(snapshot);
        while self.snapshots.len() > self.retention {
            self.snapshots.pop_front();
        }
    }

    pub fn latest(&self) -> Option<&ReserveSnapshot> {
        self.snapshots.back()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Time-weighted spot price over `[now − lookback, now]`.
    ///
    /// Each snapshot's price holds from its time until the next snapshot (the
    /// latest one until `now`). With no elapsed time in the window the latest
    /// price is returned. `None` when the history is empty.
    ///
    /// The weighted sum is accumulated exactly and the mean rounded down.
    ///
    /// # Errors
    /// Returns `InvariantViolation` on corrupt reserves or overflow.
    pub fn twap(&self, now: DateTime<Utc>, lookback_secs: u64) -> Result<Option<Price>> {
        let Some(latest) = self.snapshots.back() else {
            return Ok(None);
        };
        let lookback = i64::try_from(lookback_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(|| VammError::invariant(format!("lookback {lookback_secs}s is out of range")))?;
        let window_start = now
            .checked_sub_signed(lookback)
            .ok_or_else(|| VammError::invariant("lookback window underflows"))?;

        let overflow = || VammError::invariant("twap accumulation overflows");
        let mut weighted = U512::zero();
        let mut total_ms = U512::zero();
        let mut end = now;
        for snapshot in self.snapshots.iter().rev() {
            let start = snapshot.time.max(window_start);
            if end > start {
                let ms = u64::try_from((end - start).num_milliseconds())
                    .map(U512::from)
                    .map_err(|_| overflow())?;
                let price = snapshot.price()?.value;
                let scaled = scaled_from_decimal(price, PRECISION_SCALE).ok_or_else(overflow)?;
                weighted = scaled
                    .checked_mul(ms)
                    .and_then(|term| weighted.checked_add(term))
                    .ok_or_else(overflow)?;
                total_ms = total_ms.checked_add(ms).ok_or_else(overflow)?;
            }
            if snapshot.time <= window_start {
                break;
            }
            end = end.min(snapshot.time);
        }

        if total_ms.is_zero() {
            return latest.price().map(Some);
        }
        let value = decimal_from_scaled(weighted / total_ms, false, PRECISION_SCALE, Rounding::Down)
            .ok_or_else(overflow)?;
        Price::try_new(value).map(Some)
    }
}
