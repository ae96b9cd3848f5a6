//! Governance proposal payloads.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vamm_domain::{Amount, PoolParams};

/// Creates a new virtual pool once governance passes it.
///
/// The pair is kept as the raw submitted string; it is parsed by the
/// validator together with every other field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePoolProposal {
    pub title: String,
    pub description: String,
    pub pair: String,
    pub trade_limit_ratio: Decimal,
    pub quote_asset_reserve: Amount,
    pub base_asset_reserve: Amount,
    pub fluctuation_limit_ratio: Decimal,
    pub max_oracle_spread_ratio: Decimal,
    pub maintenance_margin_ratio: Decimal,
    pub max_leverage: Decimal,
}

impl CreatePoolProposal {
    /// Risk parameters carried by the proposal.
    #[must_use]
    pub fn params(&self) -> PoolParams {
        PoolParams {
            trade_limit_ratio: self.trade_limit_ratio,
            fluctuation_limit_ratio: self.fluctuation_limit_ratio,
            max_oracle_spread_ratio: self.max_oracle_spread_ratio,
            maintenance_margin_ratio: self.maintenance_margin_ratio,
            max_leverage: self.max_leverage,
        }
    }
}

/// Replaces the risk parameters of an existing pool. Reserves are untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditPoolParamsProposal {
    pub title: String,
    pub description: String,
    pub pair: String,
    pub params: PoolParams,
}
