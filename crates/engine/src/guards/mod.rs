//! Guard checks evaluated on a hypothetical post-trade state.
//!
//! All guards are pure: they read the pool and the candidate outcome and
//! either pass or return the rejection. The swap engine runs them in a fixed
//! order and commits nothing until every one has passed:
//! 1. Trade limit, input leg (before the curve) and counter leg (after it)
//! 2. Fluctuation limit against the block's opening price
//! 3. Oracle spread limit against a fresh reference price

mod fluctuation;
mod oracle_spread;
mod trade_limit;

pub use fluctuation::check_fluctuation_limit;
pub use oracle_spread::{check_oracle_spread, fresh_reference_price};
pub use trade_limit::{check_trade_limit, trade_limit};
