//! Unified error type for pool, swap and governance operations.

use crate::enums::AssetSide;
use crate::validation::Violations;
use crate::value_objects::{Amount, AssetPair};
use rust_decimal::Decimal;

/// Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, VammError>;

/// Errors returned by the vAMM engine.
///
/// Every variant except [`VammError::InvariantViolation`] is a recoverable
/// business error: the operation was rejected and no state was mutated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VammError {
    /// No pool is registered for the pair.
    #[error("pool {pair} not found")]
    PoolNotFound {
        /// Requested pair.
        pair: AssetPair,
    },

    /// A pool is already registered for the pair.
    #[error("pool {pair} already exists")]
    PoolAlreadyExists {
        /// Duplicate pair.
        pair: AssetPair,
    },

    /// The pair identifier is malformed.
    #[error("invalid pair {value:?}: {reason}")]
    InvalidPair {
        /// Raw identifier.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Trade amount must be strictly positive.
    #[error("invalid trade amount {amount}: must be positive")]
    InvalidAmount {
        /// Offending amount.
        amount: Amount,
    },

    /// A quantity could not be parsed or converted.
    #[error("malformed amount {value:?}: {reason}")]
    MalformedAmount {
        /// Raw text or decimal.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// One or more pool parameters are out of bounds.
    #[error("invalid proposal: {0}")]
    InvalidProposal(Violations),

    /// The trade consumes more of a reserve than the trade limit allows.
    #[error("{side} leg of {amount} on {pair} exceeds trade limit {limit}")]
    OverTradeLimit {
        /// Pool pair.
        pair: AssetPair,
        /// Reserve side that was over-consumed.
        side: AssetSide,
        /// Amount the trade would consume.
        amount: Amount,
        /// `trade_limit_ratio × reserve`, rounded down.
        limit: Amount,
    },

    /// The post-trade price moves too far from the block's opening price.
    #[error(
        "price {price} on {pair} moves {movement} from block open {open_price}, limit {limit_ratio}"
    )]
    OverFluctuationLimit {
        /// Pool pair.
        pair: AssetPair,
        /// Hypothetical post-trade price.
        price: Decimal,
        /// Price captured on first touch in this block.
        open_price: Decimal,
        /// `|price − open| / open`.
        movement: Decimal,
        /// Configured fluctuation limit ratio.
        limit_ratio: Decimal,
    },

    /// The post-trade price diverges too far from the oracle.
    #[error(
        "price {price} on {pair} spreads {spread} from oracle {oracle_price}, limit {limit_ratio}"
    )]
    OverSpreadLimit {
        /// Pool pair.
        pair: AssetPair,
        /// Hypothetical post-trade price.
        price: Decimal,
        /// Oracle reference price.
        oracle_price: Decimal,
        /// `|price − oracle| / oracle`.
        spread: Decimal,
        /// Configured max oracle spread ratio.
        limit_ratio: Decimal,
    },

    /// No fresh oracle price exists for the pair.
    #[error("no fresh oracle price for {pair}")]
    OraclePriceUnavailable {
        /// Pool pair.
        pair: AssetPair,
    },

    /// The counter amount is worse than the trader's limit.
    #[error("counter amount {counter_amount} on {pair} violates trader limit {limit}")]
    SlippageExceeded {
        /// Pool pair.
        pair: AssetPair,
        /// Amount delivered or required by the curve.
        counter_amount: Amount,
        /// Trader-supplied bound.
        limit: Amount,
    },

    /// A state invariant would break. The enclosing transaction must abort.
    #[error("invariant violation: {reason}")]
    InvariantViolation {
        /// Description of the broken invariant.
        reason: String,
    },
}

impl VammError {
    /// Builds an [`VammError::InvariantViolation`].
    pub fn invariant(reason: impl Into<String>) -> Self {
        Self::InvariantViolation {
            reason: reason.into(),
        }
    }

    /// Returns true when the error must abort the enclosing transaction.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvariantViolation { .. })
    }

    /// Returns true for the guard-check rejections.
    #[must_use]
    pub fn is_guard_rejection(&self) -> bool {
        matches!(
            self,
            Self::OverTradeLimit { .. }
                | Self::OverFluctuationLimit { .. }
                | Self::OverSpreadLimit { .. }
                | Self::OraclePriceUnavailable { .. }
        )
    }
}
