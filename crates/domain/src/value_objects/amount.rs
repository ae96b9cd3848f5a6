//! Fixed-point reserve and trade quantities.

use crate::error::{Result, VammError};
use crate::math::fixed::{decimal_parts, narrow, pow10, scaled_from_decimal};
use crate::math::rounding::PRECISION_SCALE;
use primitive_types::{U256, U512};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fractional digits of a [`ReserveProduct`].
const PRODUCT_SCALE: u32 = 2 * PRECISION_SCALE;

/// Non-negative quantity with exactly 18 fractional digits, held as the
/// integer `value × 10^18`.
///
/// Sums, differences and products are exact. The only rounding happens in
/// [`Amount::mul_ratio_floor`] and [`ReserveProduct::div_ceil`], which name
/// their direction.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Amount {
    raw: U256,
}

impl Amount {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Wraps the integer `value × 10^18`.
    pub fn from_raw(raw: U256) -> Self {
        Self { raw }
    }

    /// Whole units.
    pub fn from_units(units: u64) -> Self {
        Self {
            raw: U256::from(units) * U256::exp10(PRECISION_SCALE as usize),
        }
    }

    /// Converts a decimal with at most 18 fractional digits. `None` for a
    /// negative or finer value.
    pub fn from_decimal(value: Decimal) -> Option<Self> {
        scaled_from_decimal(value, PRECISION_SCALE)
            .and_then(narrow)
            .map(Self::from_raw)
    }

    /// The integer `value × 10^18`.
    pub fn raw(&self) -> U256 {
        self.raw
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.raw.checked_add(other.raw).map(Self::from_raw)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.raw.checked_sub(other.raw).map(Self::from_raw)
    }

    /// Exact product of two amounts.
    pub fn checked_mul(self, other: Self) -> Option<ReserveProduct> {
        self.raw
            .checked_mul(other.raw)
            .map(|raw| ReserveProduct { raw })
    }

    /// `self × ratio` rounded down. `None` for a negative ratio.
    pub fn mul_ratio_floor(self, ratio: Decimal) -> Option<Self> {
        let (negative, ratio_m, ratio_s) = decimal_parts(ratio);
        if negative {
            return None;
        }
        narrow(U512::from(self.raw) * ratio_m / pow10(ratio_s)).map(Self::from_raw)
    }

    /// Exact `self <= ratio × whole`. A negative ratio admits nothing.
    pub fn at_most_ratio_of(self, whole: Self, ratio: Decimal) -> bool {
        let (negative, ratio_m, ratio_s) = decimal_parts(ratio);
        if negative {
            return false;
        }
        U512::from(self.raw) * pow10(ratio_s) <= U512::from(whole.raw) * ratio_m
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_fixed(f, self.raw, PRECISION_SCALE)
    }
}

impl FromStr for Amount {
    type Err = VammError;

    fn from_str(s: &str) -> Result<Self> {
        parse_fixed(s, PRECISION_SCALE).map(Self::from_raw)
    }
}

impl TryFrom<String> for Amount {
    type Error = VammError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.to_string()
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = VammError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::from_decimal(value).ok_or_else(|| VammError::MalformedAmount {
            value: value.to_string(),
            reason: "must be non-negative with at most 18 decimal places".into(),
        })
    }
}

/// Exact product of two [`Amount`]s, carrying 36 fractional digits.
///
/// This is the pool invariant `k = quote × base`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct ReserveProduct {
    raw: U256,
}

impl ReserveProduct {
    /// The integer `value × 10^36`.
    pub fn raw(&self) -> U256 {
        self.raw
    }

    /// Smallest amount whose product with `divisor` is not below `self`.
    /// `None` for a zero divisor.
    pub fn div_ceil(self, divisor: Amount) -> Option<Amount> {
        if divisor.is_zero() {
            return None;
        }
        let (quotient, remainder) = self.raw.div_mod(divisor.raw);
        if remainder.is_zero() {
            Some(Amount::from_raw(quotient))
        } else {
            quotient.checked_add(U256::one()).map(Amount::from_raw)
        }
    }
}

impl fmt::Display for ReserveProduct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_fixed(f, self.raw, PRODUCT_SCALE)
    }
}

impl FromStr for ReserveProduct {
    type Err = VammError;

    fn from_str(s: &str) -> Result<Self> {
        parse_fixed(s, PRODUCT_SCALE).map(|raw| Self { raw })
    }
}

impl TryFrom<String> for ReserveProduct {
    type Error = VammError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ReserveProduct> for String {
    fn from(product: ReserveProduct) -> Self {
        product.to_string()
    }
}

fn write_fixed(f: &mut fmt::Formatter<'_>, raw: U256, scale: u32) -> fmt::Result {
    let (whole, frac) = raw.div_mod(U256::exp10(scale as usize));
    if frac.is_zero() {
        return write!(f, "{whole}");
    }
    let width = scale as usize;
    let digits = format!("{:0>width$}", frac.to_string());
    write!(f, "{whole}.{}", digits.trim_end_matches('0'))
}

fn parse_fixed(s: &str, scale: u32) -> Result<U256> {
    let malformed = |reason: &str| VammError::MalformedAmount {
        value: s.to_string(),
        reason: reason.to_string(),
    };
    let (whole, frac) = match s.split_once('.') {
        Some((whole, frac)) => (whole, Some(frac)),
        None => (s, None),
    };
    let is_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(whole) || frac.is_some_and(|frac| !is_digits(frac)) {
        return Err(malformed("expected unsigned decimal digits"));
    }
    let frac = frac.unwrap_or("");
    let width = scale as usize;
    if frac.len() > width {
        return Err(malformed(&format!("more than {scale} decimal places")));
    }
    U256::from_dec_str(&format!("{whole}{frac:0<width$}"))
        .map_err(|_| malformed("does not fit 256 bits"))
}
