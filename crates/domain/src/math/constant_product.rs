//! Constant-product pricing curve over virtual reserves.
//!
//! For reserves `(q, b)` and invariant `k = q × b`, a trade moving one reserve
//! to `x'` sets the other to `k / x'`. Reserves are 18-digit fixed-point
//! integers and `k` is their exact product, so the only rounding is that
//! division, which is always rounded up. That is the direction unfavourable
//! to the trader in both directions:
//! - adding an asset, the trader receives `y − ceil(k / x')` (less)
//! - removing an asset, the trader pays `ceil(k / x') − y` (more)
//!
//! As a consequence `k` never decreases across a swap and grows by less than
//! one raw unit of `x'`.

use crate::enums::{AssetSide, Direction};
use crate::error::{Result, VammError};
use crate::math::fixed::{decimal_from_scaled, pow10};
use crate::math::rounding::{PRECISION_SCALE, Rounding};
use crate::value_objects::{Amount, Price, ReserveProduct};
use primitive_types::U512;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Hypothetical post-trade state produced by [`apply_trade`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveOutcome {
    pub quote_reserve: Amount,
    pub base_reserve: Amount,
    /// Counter asset delivered to (`AddToPool`) or required from
    /// (`RemoveFromPool`) the trader.
    pub counter_amount: Amount,
    pub pre_price: Price,
    pub post_price: Price,
    /// `|post − pre| / pre`.
    pub price_impact: Decimal,
}

/// Calculates the constant product `k = quote × base`, exactly.
///
/// # Errors
/// Returns `InvariantViolation` if the product exceeds 256 bits.
pub fn calculate_k(quote_reserve: Amount, base_reserve: Amount) -> Result<ReserveProduct> {
    quote_reserve.checked_mul(base_reserve).ok_or_else(|| {
        VammError::invariant(format!(
            "reserve product {quote_reserve} x {base_reserve} overflows"
        ))
    })
}

/// Spot price `quote / base`, truncated at 18 fractional digits.
///
/// # Errors
/// Returns `InvariantViolation` if either reserve is zero or the price does
/// not fit a positive decimal.
pub fn spot_price(quote_reserve: Amount, base_reserve: Amount) -> Result<Price> {
    if quote_reserve.is_zero() || base_reserve.is_zero() {
        return Err(VammError::invariant(format!(
            "reserves must be positive, got quote {quote_reserve} base {base_reserve}"
        )));
    }
    let scaled = U512::from(quote_reserve.raw()) * pow10(PRECISION_SCALE)
        / U512::from(base_reserve.raw());
    let value = decimal_from_scaled(scaled, false, PRECISION_SCALE, Rounding::Down)
        .ok_or_else(|| {
            VammError::invariant(format!(
                "spot price of {quote_reserve} / {base_reserve} overflows"
            ))
        })?;
    Price::try_new(value)
}

/// Relative price move `|post − pre| / pre`.
///
/// # Errors
/// Returns `InvariantViolation` on overflow.
pub fn price_impact(pre: Price, post: Price) -> Result<Decimal> {
    post.deviation_from(pre)
        .ok_or_else(|| VammError::invariant("price impact overflows"))
}

/// Applies a trade to the reserves without touching any pool state.
///
/// `amount` is denominated in `side`; `direction` says whether it is added
/// to or removed from that reserve.
///
/// # Errors
/// Returns `InvalidAmount` for a zero amount and `InvariantViolation` when a
/// reserve would become zero or the arithmetic overflows. Upstream
/// trade-limit checks keep the latter unreachable.
pub fn apply_trade(
    quote_reserve: Amount,
    base_reserve: Amount,
    side: AssetSide,
    direction: Direction,
    amount: Amount,
) -> Result<CurveOutcome> {
    if amount.is_zero() {
        return Err(VammError::InvalidAmount { amount });
    }
    let pre_price = spot_price(quote_reserve, base_reserve)?;
    let k = calculate_k(quote_reserve, base_reserve)?;

    let (input_reserve, counter_reserve) = match side {
        AssetSide::Quote => (quote_reserve, base_reserve),
        AssetSide::Base => (base_reserve, quote_reserve),
    };

    let new_input = match direction {
        Direction::AddToPool => input_reserve.checked_add(amount),
        Direction::RemoveFromPool => input_reserve.checked_sub(amount),
    }
    .filter(|reserve| !reserve.is_zero())
    .ok_or_else(|| {
        VammError::invariant(format!(
            "{side} reserve {input_reserve} cannot absorb {direction} of {amount}"
        ))
    })?;

    let new_counter = k
        .div_ceil(new_input)
        .filter(|reserve| !reserve.is_zero())
        .ok_or_else(|| VammError::invariant(format!("{} reserve would become zero", side.counter())))?;

    let counter_amount = match direction {
        Direction::AddToPool => counter_reserve.checked_sub(new_counter),
        Direction::RemoveFromPool => new_counter.checked_sub(counter_reserve),
    }
    .ok_or_else(|| VammError::invariant("counter reserve moved the wrong way"))?;

    let (new_quote, new_base) = match side {
        AssetSide::Quote => (new_input, new_counter),
        AssetSide::Base => (new_counter, new_input),
    };
    // the new product must stay representable for the next trade
    calculate_k(new_quote, new_base)?;
    let post_price = spot_price(new_quote, new_base)?;

    Ok(CurveOutcome {
        quote_reserve: new_quote,
        base_reserve: new_base,
        counter_amount,
        pre_price,
        post_price,
        price_impact: price_impact(pre_price, post_price)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitive_types::U256;
    use rust_decimal_macros::dec;

    fn amount(s: &str) -> Amount {
        s.parse().unwrap()
    }

    fn units(n: u64) -> Amount {
        Amount::from_units(n)
    }

    #[test]
    fn test_calculate_k() {
        assert_eq!(calculate_k(units(1_000_000), units(1000)).unwrap().to_string(), "1000000000");
        let huge = Amount::from_raw(U256::MAX);
        assert!(calculate_k(huge, units(2)).is_err());
    }

    #[test]
    fn test_spot_price() {
        assert_eq!(spot_price(units(2000), units(1000)).unwrap().value, dec!(2));
        assert_eq!(spot_price(units(1), units(3)).unwrap().value, dec!(0.333333333333333333));
        assert_eq!(spot_price(units(2), units(3)).unwrap().value, dec!(0.666666666666666666));
        assert!(spot_price(Amount::zero(), units(1000)).is_err());
    }

    #[test]
    fn test_spot_price_of_wide_reserves() {
        let price = spot_price(
            amount("123456789012.345678901234567"),
            amount("98765432.1234567890123"),
        )
        .unwrap();
        assert!(price.value > dec!(1249.99) && price.value < dec!(1250));
    }

    #[test]
    fn test_quote_in() {
        // k = 1e9, q' = 1_050_000, b' = ceil(1e9 / 1_050_000)
        let out = apply_trade(
            units(1_000_000),
            units(1000),
            AssetSide::Quote,
            Direction::AddToPool,
            units(50_000),
        )
        .unwrap();

        assert_eq!(out.quote_reserve, units(1_050_000));
        assert_eq!(out.base_reserve, amount("952.380952380952380953"));
        assert_eq!(out.counter_amount, amount("47.619047619047619047"));
        assert_eq!(out.pre_price.value, dec!(1000));
        assert_eq!(out.post_price.value, dec!(1102.499999999999999998));
        assert!(out.price_impact > dec!(0.1024) && out.price_impact <= dec!(0.1025));
    }

    #[test]
    fn test_quote_out_charges_more_base() {
        let out = apply_trade(
            units(1_000_000),
            units(1000),
            AssetSide::Quote,
            Direction::RemoveFromPool,
            units(50_000),
        )
        .unwrap();
        // b' = ceil(1e9 / 950_000) = 1052.631578947368421053
        assert_eq!(out.quote_reserve, units(950_000));
        assert_eq!(out.base_reserve, amount("1052.631578947368421053"));
        assert_eq!(out.counter_amount, amount("52.631578947368421053"));
        assert!(out.post_price < out.pre_price);
    }

    #[test]
    fn test_base_in_lowers_price() {
        let out = apply_trade(
            units(1_000_000),
            units(1000),
            AssetSide::Base,
            Direction::AddToPool,
            units(100),
        )
        .unwrap();
        assert_eq!(out.base_reserve, units(1100));
        // q' = ceil(1e9 / 1100) = 909090.909090909090909091
        assert_eq!(out.quote_reserve, amount("909090.909090909090909091"));
        assert_eq!(out.counter_amount, amount("90909.090909090909090909"));
        assert!(out.post_price < out.pre_price);
    }

    #[test]
    fn test_base_out_raises_price() {
        let out = apply_trade(
            units(1_000_000),
            units(1000),
            AssetSide::Base,
            Direction::RemoveFromPool,
            units(200),
        )
        .unwrap();
        assert_eq!(out.base_reserve, units(800));
        assert_eq!(out.quote_reserve, units(1_250_000));
        assert_eq!(out.counter_amount, units(250_000));
        assert_eq!(out.post_price.value, dec!(1562.5));
        assert_eq!(out.price_impact, dec!(0.5625));
    }

    #[test]
    fn test_k_never_decreases_on_wide_reserves() {
        // Reserves beyond 28 significant digits, alternating trades.
        let mut quote = amount("5000000000000");
        let mut base = amount("1000000000");
        let quote_step = units(1_000_003);
        let base_step = units(197);
        for step in 0..200 {
            let k = calculate_k(quote, base).unwrap();
            let (side, amount) = if step % 2 == 0 {
                (AssetSide::Quote, quote_step)
            } else {
                (AssetSide::Base, base_step)
            };
            let out = apply_trade(quote, base, side, Direction::AddToPool, amount).unwrap();
            let k_after = calculate_k(out.quote_reserve, out.base_reserve).unwrap();
            assert!(k_after >= k, "step {step}: k decreased from {k} to {k_after}");
            let input = match side {
                AssetSide::Quote => out.quote_reserve,
                AssetSide::Base => out.base_reserve,
            };
            assert!(k_after.raw() - k.raw() < input.raw(), "step {step}: k grew past dust");
            quote = out.quote_reserve;
            base = out.base_reserve;
        }
    }

    #[test]
    fn test_k_never_decreases_on_fractional_reserves() {
        let mut quote = amount("123456789012.345678901234567");
        let mut base = amount("98765432.1234567890123");
        for step in 0..100 {
            let k = calculate_k(quote, base).unwrap();
            let (side, direction, amount) = match step % 4 {
                0 => (AssetSide::Quote, Direction::AddToPool, amount("1234.567890123456789")),
                1 => (AssetSide::Base, Direction::AddToPool, amount("0.987654321098765432")),
                2 => (AssetSide::Quote, Direction::RemoveFromPool, amount("999.000000000000000001")),
                _ => (AssetSide::Base, Direction::RemoveFromPool, amount("0.5")),
            };
            let out = apply_trade(quote, base, side, direction, amount).unwrap();
            let k_after = calculate_k(out.quote_reserve, out.base_reserve).unwrap();
            assert!(k_after >= k, "step {step}: k decreased from {k} to {k_after}");
            quote = out.quote_reserve;
            base = out.base_reserve;
        }
    }

    #[test]
    fn test_draining_reserve_is_invariant_violation() {
        let err = apply_trade(units(1_000_000), units(1000), AssetSide::Base, Direction::RemoveFromPool, units(1000))
            .unwrap_err();
        assert!(err.is_fatal());
        let err = apply_trade(units(1_000_000), units(1000), AssetSide::Base, Direction::RemoveFromPool, units(1001))
            .unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_zero_amount() {
        let err = apply_trade(units(1_000_000), units(1000), AssetSide::Base, Direction::AddToPool, Amount::zero())
            .unwrap_err();
        assert_eq!(err, VammError::InvalidAmount { amount: Amount::zero() });
    }
}
