//! # Outbound Ports (Driven Ports)
//!
//! Index entries live in the same substrate as the documents they point at.

pub use shared_kv::{BatchOperation, KeyValueStore};
