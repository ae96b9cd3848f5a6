//! Domain model for the virtual AMM pricing engine.
//!
//! This crate holds everything that is pure and replica-deterministic:
//! - Value objects (asset pairs, amounts, prices, ratio bounds)
//! - The `Pool` entity and its governance-controlled risk parameters
//! - The constant-product pricing curve with explicit rounding
//! - Parameter constraints shared by pool creation and updates
//! - The unified error type
//!
//! Reserves and trade amounts are exact 18-digit fixed-point integers on
//! `primitive_types::U256`. Prices and ratios are `rust_decimal::Decimal`.
//! Nothing on the pricing path touches floating point.

/// Pool entities.
pub mod entities;
/// Trade direction and asset side.
pub mod enums;
/// Unified error type.
pub mod error;
/// Pricing curve and decimal rounding.
pub mod math;
/// Parameter constraints and violation reporting.
pub mod validation;
/// Value objects.
pub mod value_objects;

pub use entities::{MarginParams, Pool, PoolParams};
pub use enums::{AssetSide, Direction};
pub use error::{Result, VammError};
pub use math::rounding::{PRECISION_SCALE, Rounding};
pub use validation::{ProposalField, Violation, Violations};
pub use value_objects::{Amount, AssetPair, Price, RatioBound, ReserveProduct};
