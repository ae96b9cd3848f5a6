//! Explicit rounding for decimal division.
//!
//! Every division on the state path names its rounding direction. Values are
//! kept at no more than [`PRECISION_SCALE`] fractional digits, which is also
//! the precision of the on-wire decimal encoding.

use crate::math::fixed::{decimal_from_scaled, decimal_parts, pow10};
use primitive_types::U512;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fractional digits carried by reserves, ratios and prices.
pub const PRECISION_SCALE: u32 = 18;

/// Rounding direction for a division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rounding {
    /// Towards positive infinity.
    Up,
    /// Towards negative infinity.
    Down,
}

/// Divides and rounds the quotient at [`PRECISION_SCALE`] in the given
/// direction. Returns `None` on a zero denominator or when the quotient does
/// not fit a `Decimal`.
///
/// The quotient is computed on 512-bit integers, so the direction holds for
/// operands of any precision. A quotient too wide for the decimal mantissa
/// loses trailing digits in the same direction.
pub fn div_rounded(numerator: Decimal, denominator: Decimal, rounding: Rounding) -> Option<Decimal> {
    if denominator.is_zero() {
        return None;
    }
    let (num_neg, num_m, num_s) = decimal_parts(numerator);
    let (den_neg, den_m, den_s) = decimal_parts(denominator);
    let negative = num_neg != den_neg && !numerator.is_zero();

    // (num_m / 10^num_s) / (den_m / 10^den_s) × 10^18
    let scaled_num = num_m * pow10(den_s + PRECISION_SCALE);
    let scaled_den = den_m * pow10(num_s);
    let (mut quotient, remainder) = scaled_num.div_mod(scaled_den);

    let away = matches!((rounding, negative), (Rounding::Up, false) | (Rounding::Down, true));
    if away && !remainder.is_zero() {
        quotient = quotient + U512::one();
    }
    decimal_from_scaled(quotient, negative, PRECISION_SCALE, rounding)
}

/// True when `value` carries more fractional digits than [`PRECISION_SCALE`].
pub fn exceeds_precision(value: Decimal) -> bool {
    value.normalize().scale() > PRECISION_SCALE
}
