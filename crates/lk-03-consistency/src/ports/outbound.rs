//! # Outbound Ports (Driven Ports)
//!
//! Nodes are addressed as `&dyn KeyValueStore` so a live store can be
//! compared against any other backend, including a loaded snapshot.

pub use shared_kv::{BatchOperation, InMemoryKVStore, KeyValueStore};
