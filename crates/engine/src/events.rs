//! Events emitted by the keeper for the surrounding state machine.

use crate::swap::SwapOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vamm_domain::{Amount, AssetPair, PoolParams, ReserveProduct};

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VammEvent {
    /// A pool was registered.
    PoolCreated {
        pair: AssetPair,
        quote_asset_reserve: Amount,
        base_asset_reserve: Amount,
    },
    /// Governance replaced the risk parameters.
    PoolParamsUpdated { pair: AssetPair, params: PoolParams },
    /// Governance replaced both reserves, changing `k`.
    ReservesReinitialized {
        pair: AssetPair,
        quote_asset_reserve: Amount,
        base_asset_reserve: Amount,
        previous_k: ReserveProduct,
        k: ReserveProduct,
    },
    /// A pool was removed.
    PoolRemoved { pair: AssetPair },
    /// A swap was committed.
    Swap(SwapOutcome),
}

impl VammEvent {
    /// Pair the event refers to.
    pub fn pair(&self) -> &AssetPair {
        match self {
            Self::PoolCreated { pair, .. }
            | Self::PoolParamsUpdated { pair, .. }
            | Self::ReservesReinitialized { pair, .. }
            | Self::PoolRemoved { pair } => pair,
            Self::Swap(outcome) => &outcome.pair,
        }
    }
}

/// An event stamped with the block that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub block_height: u64,
    pub time: DateTime<Utc>,
    pub event: VammEvent,
}
