pub mod constant_product;
pub mod fixed;
pub mod rounding;

pub use constant_product::{CurveOutcome, apply_trade, calculate_k, price_impact, spot_price};
pub use rounding::{PRECISION_SCALE, Rounding, div_rounded, exceeds_precision};
