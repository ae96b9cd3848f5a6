use crate::error::{Result, VammError};
use crate::math::fixed::within_ratio;
use crate::math::rounding::{Rounding, div_rounded};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Quote units per one base unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Price {
    pub value: Decimal,
}

impl Price {
    pub fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Creates a price, rejecting zero and negative values.
    ///
    /// # Errors
    /// Returns `InvariantViolation` when `value <= 0`.
    pub fn try_new(value: Decimal) -> Result<Self> {
        if value <= Decimal::ZERO {
            return Err(VammError::invariant(format!(
                "price must be positive, got {value}"
            )));
        }
        Ok(Self { value })
    }

    /// Fractional distance `|self − reference| / reference`.
    ///
    /// Rounded up so that reported deviations never understate a move.
    pub fn deviation_from(&self, reference: Price) -> Option<Decimal> {
        let diff = self.value.checked_sub(reference.value)?.abs();
        div_rounded(diff, reference.value, Rounding::Up)
    }

    /// Returns true when `|self − reference| <= ratio × reference`.
    ///
    /// Evaluated exactly on widened integers, so a move of exactly `ratio`
    /// passes whatever the precision of the operands.
    pub fn within_ratio_of(&self, reference: Price, ratio: Decimal) -> bool {
        within_ratio(self.value, reference.value, ratio)
    }
}

impl From<Decimal> for Price {
    fn from(d: Decimal) -> Self {
        Self::new(d)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
