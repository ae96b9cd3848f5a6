//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use vamm_engine::prelude::*;
//! ```

pub use crate::block::BlockContext;
pub use crate::config::EngineConfig;
pub use crate::events::{EventRecord, VammEvent};
pub use crate::governance::{
    CodecError, CreatePoolProposal, EditPoolParamsProposal, validate_create_pool,
    validate_edit_pool,
};
pub use crate::keeper::VammKeeper;
pub use crate::oracle::{OraclePrice, PriceOracle, StaticOracle};
pub use crate::registry::{KeyValueStore, KvPoolStore, MemoryKv, MemoryPoolStore, PoolStore};
pub use crate::snapshot::{ReserveSnapshot, SnapshotHistory};
pub use crate::swap::{SwapEngine, SwapOutcome, SwapPhase, SwapRequest};

pub use vamm_domain::{
    Amount, AssetPair, AssetSide, Direction, MarginParams, Pool, PoolParams, Price,
    ProposalField, ReserveProduct, Result, VammError, Violation, Violations,
};
