//! # Shared Key-Value Substrate
//!
//! The ordered byte-string key-value engine that every Ledger-KV subsystem
//! persists into, expressed as a port plus its adapters.
//!
//! ## Substrate Contract
//!
//! | Operation | Guarantee |
//! |-----------|-----------|
//! | `get` / `put` / `delete` | Point operations, `delete` is idempotent |
//! | `atomic_batch_write` | All operations land, or none do |
//! | `prefix_scan` / `visit_prefix` | Ascending byte-lexicographic key order |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Key namespace rules and substrate errors
//! - `ports/` - The `KeyValueStore` driven port
//! - `adapters/` - In-memory, file-backed and (optionally) RocksDB engines
//!
//! ## Usage
//!
//! ```
//! use shared_kv::{BatchOperation, InMemoryKVStore, KeyValueStore};
//!
//! let store = InMemoryKVStore::new();
//! store
//!     .atomic_batch_write(vec![
//!         BatchOperation::put(b"order:1", b"{}"),
//!         BatchOperation::put(b"order:2", b"{}"),
//!     ])
//!     .unwrap();
//! assert_eq!(store.prefix_scan(b"order:").unwrap().len(), 2);
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::{DatabaseLock, FileBackedKVStore, InMemoryKVStore, LockError};
pub use domain::errors::KVStoreError;
pub use domain::keys::{is_system_key, record_type_of, SYSTEM_KEY_SENTINEL};
pub use ports::outbound::{BatchOperation, KeyValueStore, ScanResult};

#[cfg(feature = "rocksdb")]
pub use adapters::{RocksDbConfig, RocksDbStore};

#[cfg(feature = "test-utils")]
pub use adapters::FaultInjectingStore;
