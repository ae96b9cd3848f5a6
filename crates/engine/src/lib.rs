//! Swap execution, risk guards and governance for the virtual AMM.
//!
//! This crate drives pools defined in `vamm-domain`:
//! - Pool registry over an explicit store (in-memory or key-value backed)
//! - Per-block context holding each pool's opening price
//! - Guard checks: trade limit, fluctuation limit, oracle spread
//! - Swap engine with all-or-nothing commits
//! - Governance proposals, validation and the protobuf wire codec
//! - Reserve snapshots and TWAP
//! - The `VammKeeper` facade and its event buffer
//!
//! Logging uses `tracing`; the library installs no subscriber.

/// Prelude module for convenient imports.
pub mod prelude;

/// Per-block execution context.
pub mod block;
/// Engine configuration.
pub mod config;
/// Keeper events.
pub mod events;
/// Governance proposals, validation and wire codec.
pub mod governance;
/// Guard checks.
pub mod guards;
/// Keeper facade.
pub mod keeper;
/// Oracle interface.
pub mod oracle;
/// Pool registry.
pub mod registry;
/// Reserve snapshots and TWAP.
pub mod snapshot;
/// Swap execution.
pub mod swap;
