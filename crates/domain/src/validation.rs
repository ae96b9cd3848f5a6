//! Parameter constraints and collect-all violation reporting.
//!
//! Checks push into a [`Violations`] set instead of returning early, so a
//! governance submitter sees every defect of a proposal at once.

use crate::error::{Result, VammError};
use crate::math::constant_product::spot_price;
use crate::math::rounding::{PRECISION_SCALE, exceeds_precision};
use crate::value_objects::{Amount, RatioBound};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Field of a pool proposal that a constraint applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalField {
    Title,
    Pair,
    QuoteAssetReserve,
    BaseAssetReserve,
    TradeLimitRatio,
    FluctuationLimitRatio,
    MaxOracleSpreadRatio,
    MaintenanceMarginRatio,
    MaxLeverage,
}

impl ProposalField {
    /// Wire/JSON name of the field.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Pair => "pair",
            Self::QuoteAssetReserve => "quote_asset_reserve",
            Self::BaseAssetReserve => "base_asset_reserve",
            Self::TradeLimitRatio => "trade_limit_ratio",
            Self::FluctuationLimitRatio => "fluctuation_limit_ratio",
            Self::MaxOracleSpreadRatio => "max_oracle_spread_ratio",
            Self::MaintenanceMarginRatio => "maintenance_margin_ratio",
            Self::MaxLeverage => "max_leverage",
        }
    }
}

impl fmt::Display for ProposalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub field: ProposalField,
    pub reason: String,
}

impl Violation {
    pub fn new(field: ProposalField, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Ordered set of violations, in the order the checks ran.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violations(Vec<Violation>);

impl Violations {
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, violation: Violation) {
        self.0.push(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    /// Returns true if any violation cites `field`.
    pub fn cites(&self, field: ProposalField) -> bool {
        self.0.iter().any(|v| v.field == field)
    }

    /// `Ok(())` when empty, otherwise `InvalidProposal` carrying every violation.
    ///
    /// # Errors
    /// Returns `InvalidProposal` if at least one violation was recorded.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(VammError::InvalidProposal(self))
        }
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

/// Records a violation unless `amount > 0`.
pub fn check_positive(field: ProposalField, amount: Amount, violations: &mut Violations) {
    if amount.is_zero() {
        violations.push(Violation::new(field, "must be positive, got 0"));
    }
}

/// Records a violation unless `value` lies in `bound`.
pub fn check_bound(
    field: ProposalField,
    value: Decimal,
    bound: RatioBound,
    violations: &mut Violations,
) {
    if !bound.contains(value) {
        violations.push(Violation::new(field, format!("must be in {bound}, got {value}")));
    }
}

/// Records a violation when `value` is finer than the canonical precision.
pub fn check_precision(field: ProposalField, value: Decimal, violations: &mut Violations) {
    if exceeds_precision(value) {
        violations.push(Violation::new(
            field,
            format!("{value} has more than {PRECISION_SCALE} decimal places"),
        ));
    }
}

/// Validates a pair of initial reserves: both positive, with a representable
/// product and spot price.
pub fn check_reserves(quote: Amount, base: Amount, violations: &mut Violations) {
    check_positive(ProposalField::QuoteAssetReserve, quote, violations);
    check_positive(ProposalField::BaseAssetReserve, base, violations);
    if quote.is_zero() || base.is_zero() {
        return;
    }
    if quote.checked_mul(base).is_none() {
        violations.push(Violation::new(
            ProposalField::QuoteAssetReserve,
            format!("reserve product {quote} x {base} is not representable"),
        ));
    } else if spot_price(quote, base).is_err() {
        violations.push(Violation::new(
            ProposalField::QuoteAssetReserve,
            format!("spot price {quote} / {base} is not representable"),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitive_types::U256;
    use rust_decimal_macros::dec;

    #[test]
    fn test_collects_all() {
        let mut v = Violations::new();
        check_reserves(Amount::zero(), Amount::zero(), &mut v);
        check_bound(ProposalField::MaxLeverage, dec!(0.5), RatioBound::AT_LEAST_ONE, &mut v);
        assert_eq!(v.len(), 3);
        assert!(v.cites(ProposalField::QuoteAssetReserve));
        assert!(v.cites(ProposalField::BaseAssetReserve));
        assert!(v.cites(ProposalField::MaxLeverage));
        assert!(matches!(v.into_result(), Err(VammError::InvalidProposal(_))));
    }

    #[test]
    fn test_empty_is_ok() {
        let mut v = Violations::new();
        check_reserves(Amount::from_units(1_000_000), Amount::from_units(1000), &mut v);
        assert!(v.into_result().is_ok());
    }

    #[test]
    fn test_unrepresentable_product() {
        let mut v = Violations::new();
        check_reserves(Amount::from_raw(U256::MAX), Amount::from_units(10), &mut v);
        assert_eq!(v.len(), 1);
    }

    #[test]
    fn test_unrepresentable_price() {
        // 1e40 quote per raw base unit does not fit a decimal
        let mut v = Violations::new();
        let quote = "10000000000000000000000".parse::<Amount>().unwrap();
        check_reserves(quote, Amount::from_raw(U256::one()), &mut v);
        assert_eq!(v.len(), 1);
        assert!(v.cites(ProposalField::QuoteAssetReserve));
    }

    #[test]
    fn test_wide_reserves_are_accepted() {
        let mut v = Violations::new();
        let quote = "5000000000000.123456789012345678".parse::<Amount>().unwrap();
        let base = "1000000000.000000000000000001".parse::<Amount>().unwrap();
        check_reserves(quote, base, &mut v);
        assert!(v.is_empty(), "{v}");
    }

    #[test]
    fn test_display_joins() {
        let mut v = Violations::new();
        check_bound(ProposalField::TradeLimitRatio, dec!(0), RatioBound::POSITIVE_FRACTION, &mut v);
        check_precision(ProposalField::MaxLeverage, dec!(1.0000000000000000001), &mut v);
        assert_eq!(
            v.to_string(),
            "trade_limit_ratio: must be in (0, 1], got 0; \
             max_leverage: 1.0000000000000000001 has more than 18 decimal places"
        );
    }
}
