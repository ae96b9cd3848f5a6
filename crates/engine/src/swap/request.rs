use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use vamm_domain::math::CurveOutcome;
use vamm_domain::{Amount, AssetPair, AssetSide, Direction, Price};

/// A trade against one pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRequest {
    pub pair: AssetPair,
    pub direction: Direction,
    /// Side the amount is denominated in.
    pub side: AssetSide,
    pub amount: Amount,
    /// Worst acceptable counter amount: a minimum delivered for
    /// `AddToPool`, a maximum required for `RemoveFromPool`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counter_amount_limit: Option<Amount>,
}

impl SwapRequest {
    pub fn new(pair: AssetPair, direction: Direction, side: AssetSide, amount: Amount) -> Self {
        Self {
            pair,
            direction,
            side,
            amount,
            counter_amount_limit: None,
        }
    }

    /// Sets the slippage bound on the counter amount.
    #[must_use]
    pub fn with_counter_amount_limit(mut self, limit: Amount) -> Self {
        self.counter_amount_limit = Some(limit);
        self
    }
}

/// Result of a committed swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapOutcome {
    pub pair: AssetPair,
    pub direction: Direction,
    pub side: AssetSide,
    pub amount: Amount,
    /// Delivered to the trader (`AddToPool`) or required from them (`RemoveFromPool`).
    pub counter_amount: Amount,
    pub price_impact: Decimal,
    pub pre_price: Price,
    pub post_price: Price,
    pub quote_reserve: Amount,
    pub base_reserve: Amount,
}

impl SwapOutcome {
    pub(crate) fn from_curve(request: &SwapRequest, curve: CurveOutcome) -> Self {
        Self {
            pair: request.pair.clone(),
            direction: request.direction,
            side: request.side,
            amount: request.amount,
            counter_amount: curve.counter_amount,
            price_impact: curve.price_impact,
            pre_price: curve.pre_price,
            post_price: curve.post_price,
            quote_reserve: curve.quote_reserve,
            base_reserve: curve.base_reserve,
        }
    }
}

/// Lifecycle of a swap inside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapPhase {
    /// Received, nothing evaluated yet.
    Requested,
    /// Curve computed and every guard passed.
    Validated,
    /// New reserves committed.
    Applied,
    /// Rejected; no state changed.
    Rejected,
}

impl fmt::Display for SwapPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Requested => write!(f, "requested"),
            Self::Validated => write!(f, "validated"),
            Self::Applied => write!(f, "applied"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}
