//! # Substrate Adapters
//!
//! Implementations of the `KeyValueStore` port.
//!
//! - `memory` - Ordered in-memory map (tests, snapshot loading)
//! - `file` - Single-image file store guarded by a directory lock
//! - `lock` - Process-level exclusive lock on a store directory
//! - `rocksdb` - Production engine (feature `rocksdb`)
//! - `faulty` - Fault-injecting wrapper (feature `test-utils`)

mod file;
mod lock;
mod memory;

#[cfg(feature = "rocksdb")]
mod rocksdb;

#[cfg(feature = "test-utils")]
mod faulty;

pub use file::FileBackedKVStore;
pub use lock::{DatabaseLock, LockError};
pub use memory::InMemoryKVStore;

#[cfg(feature = "rocksdb")]
pub use self::rocksdb::{RocksDbConfig, RocksDbStore};

#[cfg(feature = "test-utils")]
pub use faulty::FaultInjectingStore;
