//! Swap execution against a pool store.

mod engine;
mod request;

#[cfg(test)]
mod proptest_properties;

pub use engine::SwapEngine;
pub use request::{SwapOutcome, SwapPhase, SwapRequest};
