//! Pool registry: the single mutable resource of the engine.
//!
//! The registry is an explicit store object handed to every operation; there
//! is no process-wide pool table. Two backends are provided:
//! - `MemoryPoolStore` keeps decoded pools in an ordered map
//! - `KvPoolStore` keeps encoded pool records in a byte key-value store,
//!   matching the persisted layout of the surrounding state machine

mod kv;
mod store;

pub use kv::{KeyValueStore, KvPoolStore, MemoryKv};
pub use store::{MemoryPoolStore, PoolStore};
