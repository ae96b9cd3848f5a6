use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Interval a risk parameter must fall in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatioBound {
    pub lower: Decimal,
    pub lower_inclusive: bool,
    /// `None` means unbounded above.
    pub upper: Option<Decimal>,
    pub upper_inclusive: bool,
}

impl RatioBound {
    /// `(0, 1]`: trade limit, fluctuation limit, oracle spread.
    pub const POSITIVE_FRACTION: Self = Self {
        lower: Decimal::ZERO,
        lower_inclusive: false,
        upper: Some(Decimal::ONE),
        upper_inclusive: true,
    };

    /// `[0, 1)`: maintenance margin ratio.
    pub const PROPER_FRACTION: Self = Self {
        lower: Decimal::ZERO,
        lower_inclusive: true,
        upper: Some(Decimal::ONE),
        upper_inclusive: false,
    };

    /// `[1, ∞)`: max leverage.
    pub const AT_LEAST_ONE: Self = Self {
        lower: Decimal::ONE,
        lower_inclusive: true,
        upper: None,
        upper_inclusive: false,
    };

    pub fn contains(&self, value: Decimal) -> bool {
        let above_lower = if self.lower_inclusive {
            value >= self.lower
        } else {
            value > self.lower
        };
        let below_upper = match self.upper {
            None => true,
            Some(upper) if self.upper_inclusive => value <= upper,
            Some(upper) => value < upper,
        };
        above_lower && below_upper
    }
}

impl fmt::Display for RatioBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.lower_inclusive { '[' } else { '(' };
        match self.upper {
            Some(upper) => {
                let close = if self.upper_inclusive { ']' } else { ')' };
                write!(f, "{open}{}, {upper}{close}", self.lower)
            }
            None => write!(f, "{open}{}, inf)", self.lower),
        }
    }
}
