use crate::enums::AssetSide;
use crate::error::{Result, VammError};
use crate::math::constant_product::{calculate_k, spot_price};
use crate::validation::{ProposalField, Violations, check_bound, check_precision, check_reserves};
use crate::value_objects::{Amount, AssetPair, Price, RatioBound, ReserveProduct};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Governance-controlled risk parameters of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolParams {
    /// Max fraction of a reserve a single trade may consume, in `(0, 1]`.
    pub trade_limit_ratio: Decimal,
    /// Max price move within one block relative to its opening price, in `(0, 1]`.
    pub fluctuation_limit_ratio: Decimal,
    /// Max divergence between post-trade price and oracle, in `(0, 1]`.
    pub max_oracle_spread_ratio: Decimal,
    /// Liquidation threshold used by the margin ledger, in `[0, 1)`.
    pub maintenance_margin_ratio: Decimal,
    /// Max notional/margin when opening a position, `>= 1`.
    pub max_leverage: Decimal,
}

impl PoolParams {
    /// Records every out-of-bounds field into `violations`.
    pub fn check(&self, violations: &mut Violations) {
        let fields = [
            (ProposalField::TradeLimitRatio, self.trade_limit_ratio, RatioBound::POSITIVE_FRACTION),
            (
                ProposalField::FluctuationLimitRatio,
                self.fluctuation_limit_ratio,
                RatioBound::POSITIVE_FRACTION,
            ),
            (
                ProposalField::MaxOracleSpreadRatio,
                self.max_oracle_spread_ratio,
                RatioBound::POSITIVE_FRACTION,
            ),
            (
                ProposalField::MaintenanceMarginRatio,
                self.maintenance_margin_ratio,
                RatioBound::PROPER_FRACTION,
            ),
            (ProposalField::MaxLeverage, self.max_leverage, RatioBound::AT_LEAST_ONE),
        ];
        for (field, value, bound) in fields {
            check_bound(field, value, bound, violations);
            check_precision(field, value, violations);
        }
    }

    /// The subset consumed by the margin ledger.
    #[must_use]
    pub fn margin_params(&self) -> MarginParams {
        MarginParams {
            max_leverage: self.max_leverage,
            maintenance_margin_ratio: self.maintenance_margin_ratio,
        }
    }
}

/// Risk parameters the external margin ledger reads from a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginParams {
    pub max_leverage: Decimal,
    pub maintenance_margin_ratio: Decimal,
}

/// Virtual pool for one trading pair.
///
/// Fields are private: reserves change only through [`Pool::set_reserves`]
/// and parameters only through [`Pool::set_params`], both of which re-check
/// the pool invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedPool")]
pub struct Pool {
    pair: AssetPair,
    quote_asset_reserve: Amount,
    base_asset_reserve: Amount,
    params: PoolParams,
}

/// Deserialization shape; converted through [`Pool::new`] so that a decoded
/// pool satisfies the same invariants as a created one.
#[derive(Deserialize)]
struct UncheckedPool {
    pair: AssetPair,
    quote_asset_reserve: Amount,
    base_asset_reserve: Amount,
    params: PoolParams,
}

impl TryFrom<UncheckedPool> for Pool {
    type Error = VammError;

    fn try_from(raw: UncheckedPool) -> Result<Self> {
        Pool::new(raw.pair, raw.quote_asset_reserve, raw.base_asset_reserve, raw.params)
    }
}

impl Pool {
    /// Creates a pool, checking every invariant at once.
    ///
    /// # Errors
    /// Returns `InvalidProposal` listing every violated constraint.
    pub fn new(
        pair: AssetPair,
        quote_asset_reserve: Amount,
        base_asset_reserve: Amount,
        params: PoolParams,
    ) -> Result<Self> {
        let mut violations = Violations::new();
        check_reserves(quote_asset_reserve, base_asset_reserve, &mut violations);
        params.check(&mut violations);
        violations.into_result()?;
        Ok(Self {
            pair,
            quote_asset_reserve,
            base_asset_reserve,
            params,
        })
    }

    pub fn pair(&self) -> &AssetPair {
        &self.pair
    }

    pub fn quote_asset_reserve(&self) -> Amount {
        self.quote_asset_reserve
    }

    pub fn base_asset_reserve(&self) -> Amount {
        self.base_asset_reserve
    }

    pub fn params(&self) -> &PoolParams {
        &self.params
    }

    /// Reserve on the given side.
    pub fn reserve(&self, side: AssetSide) -> Amount {
        match side {
            AssetSide::Quote => self.quote_asset_reserve,
            AssetSide::Base => self.base_asset_reserve,
        }
    }

    /// The constant product `k`, exact.
    ///
    /// # Errors
    /// Returns `InvariantViolation` on overflow.
    pub fn k(&self) -> Result<ReserveProduct> {
        calculate_k(self.quote_asset_reserve, self.base_asset_reserve)
    }

    /// Current spot price `quote / base`.
    ///
    /// # Errors
    /// Returns `InvariantViolation` if the reserves are corrupt.
    pub fn spot_price(&self) -> Result<Price> {
        spot_price(self.quote_asset_reserve, self.base_asset_reserve)
    }

    /// Replaces both reserves together.
    ///
    /// # Errors
    /// Returns `InvariantViolation` if either reserve is zero.
    pub fn set_reserves(&mut self, quote: Amount, base: Amount) -> Result<()> {
        if quote.is_zero() || base.is_zero() {
            return Err(VammError::invariant(format!(
                "pool {} reserves must stay positive, got quote {quote} base {base}",
                self.pair
            )));
        }
        self.quote_asset_reserve = quote;
        self.base_asset_reserve = base;
        Ok(())
    }

    /// Replaces the risk parameters. Reserves and `k` are untouched.
    ///
    /// # Errors
    /// Returns `InvalidProposal` listing every out-of-bounds field.
    pub fn set_params(&mut self, params: PoolParams) -> Result<()> {
        let mut violations = Violations::new();
        params.check(&mut violations);
        violations.into_result()?;
        self.params = params;
        Ok(())
    }
}
