//! Exact integer arithmetic behind the decimal API.
//!
//! A `Decimal` is `mantissa / 10^scale` with a 96-bit mantissa. Lifting both
//! sides of a comparison or division into 512-bit integers keeps every
//! intermediate exact; rounding happens once, in a named direction, when a
//! result is narrowed back to a `Decimal`.

use crate::math::rounding::Rounding;
use primitive_types::{U256, U512};
use rust_decimal::Decimal;

/// Largest scale a `Decimal` can carry.
const MAX_DECIMAL_SCALE: u32 = 28;

/// Sign, magnitude of the mantissa and scale of `value`.
pub fn decimal_parts(value: Decimal) -> (bool, U512, u32) {
    let negative = value.is_sign_negative() && !value.is_zero();
    (
        negative,
        U512::from(value.mantissa().unsigned_abs()),
        value.scale(),
    )
}

/// `10^exp` as a 512-bit integer.
pub fn pow10(exp: u32) -> U512 {
    U512::exp10(exp as usize)
}

/// The integer `value × 10^scale`, or `None` when `value` is negative or
/// carries more than `scale` fractional digits.
pub fn scaled_from_decimal(value: Decimal, scale: u32) -> Option<U512> {
    let normalized = value.normalize();
    let (negative, mantissa, own_scale) = decimal_parts(normalized);
    if negative || own_scale > scale {
        return None;
    }
    Some(mantissa * pow10(scale - own_scale))
}

/// Narrows the integer `raw / 10^scale` to a `Decimal`.
///
/// Digits that do not fit the 96-bit mantissa are dropped, and the result is
/// moved one unit in the `rounding` direction when a dropped digit was
/// non-zero. Returns `None` when even the integer part does not fit.
pub fn decimal_from_scaled(
    raw: U512,
    negative: bool,
    scale: u32,
    rounding: Rounding,
) -> Option<Decimal> {
    let limit = U512::from(1u128 << 96);
    let ten = U512::from(10u8);
    // Up moves positive values away from zero, Down moves negative ones.
    let away = matches!((rounding, negative), (Rounding::Up, false) | (Rounding::Down, true));

    let mut raw = raw;
    let mut scale = scale;
    while raw >= limit || scale > MAX_DECIMAL_SCALE {
        if scale == 0 {
            return None;
        }
        let (quotient, remainder) = raw.div_mod(ten);
        raw = quotient;
        scale -= 1;
        if away && !remainder.is_zero() {
            raw = raw + U512::one();
        }
    }

    let mantissa = i128::try_from(raw.low_u128()).ok()?;
    let magnitude = Decimal::try_from_i128_with_scale(mantissa, scale).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Narrows a 512-bit integer to 256 bits.
pub fn narrow(value: U512) -> Option<U256> {
    if value.bits() > 256 {
        return None;
    }
    let limbs = value.0;
    Some(U256([limbs[0], limbs[1], limbs[2], limbs[3]]))
}

/// Exact `|value − reference| <= ratio × |reference|`.
///
/// A negative ratio admits nothing.
pub fn within_ratio(value: Decimal, reference: Decimal, ratio: Decimal) -> bool {
    let (value_neg, value_m, value_s) = decimal_parts(value);
    let (ref_neg, ref_m, ref_s) = decimal_parts(reference);
    let (ratio_neg, ratio_m, ratio_s) = decimal_parts(ratio);
    if ratio_neg {
        return false;
    }

    let scale = value_s.max(ref_s);
    let value_m = value_m * pow10(scale - value_s);
    let ref_m = ref_m * pow10(scale - ref_s);
    let diff = if value_neg == ref_neg {
        if value_m >= ref_m { value_m - ref_m } else { ref_m - value_m }
    } else {
        value_m + ref_m
    };

    // diff / 10^scale <= ratio_m / 10^ratio_s × ref_m / 10^scale
    diff * pow10(ratio_s) <= ratio_m * ref_m
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_scaled_from_decimal() {
        assert_eq!(scaled_from_decimal(dec!(0.1), 18), Some(U512::exp10(17)));
        assert_eq!(scaled_from_decimal(dec!(2.50), 1), Some(U512::from(25u8)));
        assert_eq!(scaled_from_decimal(dec!(0.01), 1), None);
        assert_eq!(scaled_from_decimal(dec!(-1), 18), None);
    }

    #[test]
    fn test_decimal_from_scaled_exact() {
        let raw = U512::from(952_380_952_380_952_380_953u128);
        assert_eq!(
            decimal_from_scaled(raw, false, 18, Rounding::Down),
            Some(dec!(952.380952380952380953))
        );
        assert_eq!(
            decimal_from_scaled(U512::from(25u8), true, 1, Rounding::Up),
            Some(dec!(-2.5))
        );
    }

    #[test]
    fn test_decimal_from_scaled_drops_digits_in_direction() {
        // 123456789012.345678901234567891 has 30 significant digits
        let raw = U512::from_dec_str("123456789012345678901234567891").unwrap();
        assert_eq!(
            decimal_from_scaled(raw, false, 18, Rounding::Down),
            Some(dec!(123456789012.34567890123456789))
        );
        assert_eq!(
            decimal_from_scaled(raw, false, 18, Rounding::Up),
            Some(dec!(123456789012.3456789012345679))
        );
        assert_eq!(
            decimal_from_scaled(raw, true, 18, Rounding::Down),
            Some(dec!(-123456789012.3456789012345679))
        );
        assert_eq!(decimal_from_scaled(pow10(40), false, 0, Rounding::Down), None);
    }

    #[test]
    fn test_narrow() {
        assert_eq!(narrow(U512::from(7u8)), Some(U256::from(7u8)));
        assert_eq!(narrow(pow10(80)), None);
    }

    #[test]
    fn test_within_ratio_is_exact() {
        assert!(within_ratio(dec!(1050), dec!(1000), dec!(0.05)));
        assert!(within_ratio(dec!(950), dec!(1000), dec!(0.05)));
        assert!(!within_ratio(dec!(1050.000000000000000001), dec!(1000), dec!(0.05)));
        // 28 significant digits on each side, where a decimal product would round
        let reference = dec!(1234567890.123456789012345678);
        let ratio = dec!(0.000000000000000001);
        let edge = reference + dec!(0.000000001234567890);
        assert!(within_ratio(edge, reference, ratio));
        assert!(!within_ratio(edge + dec!(0.000000000000000001), reference, ratio));
        assert!(!within_ratio(dec!(1), dec!(1), dec!(-0.1)));
    }
}
