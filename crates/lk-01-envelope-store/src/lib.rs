//! # Envelope Store (lk-01)
//!
//! Wraps caller documents in a tamper-evident envelope before they reach the
//! key-value substrate.
//!
//! ## Envelope Layout
//!
//! ```text
//! {
//!   "data":      <document JSON, stored verbatim>,
//!   "hash":      <hex SHA-256 of the exact "data" bytes>,
//!   "timestamp": <RFC 3339 UTC, second precision>,
//!   "node":      <origin node id>
//! }
//! ```
//!
//! ## Domain Invariants
//!
//! | Invariant | Description |
//! |-----------|-------------|
//! | Digest | `hash == sha256(data)` for every envelope read back; mismatch is reported, never repaired |
//! | Overwrite | `put` replaces the envelope at a key unconditionally (last write wins) |
//! | Batch | `batch_insert` is all-or-error through one atomic substrate write |
//! | System keys | Keys starting with `_` are never counted |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Envelope type, digest, errors
//! - `ports/` - `EnvelopeStoreApi` (inbound), `TimeSource` (outbound)
//! - `service.rs` - `EnvelopeStore` implementing the API over any `KeyValueStore`
//!
//! ## Usage
//!
//! ```
//! use lk_01_envelope_store::{EnvelopeStore, EnvelopeStoreApi, EnvelopeStoreConfig};
//! use serde_json::json;
//! use shared_kv::InMemoryKVStore;
//!
//! let store = EnvelopeStore::with_system_clock(
//!     InMemoryKVStore::new(),
//!     EnvelopeStoreConfig::default(),
//! );
//!
//! store.put("order:00001", &json!({"amount": 1000})).unwrap();
//! let envelope = store.get("order:00001").unwrap();
//! assert!(envelope.verify());
//! assert_eq!(envelope.document().unwrap()["amount"], 1000);
//! ```

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::digest::digest_hex;
pub use domain::envelope::{Envelope, EnvelopeStoreConfig, DEFAULT_NODE_ID};
pub use domain::errors::EnvelopeError;
pub use ports::inbound::EnvelopeStoreApi;
pub use ports::outbound::{FixedTimeSource, SystemTimeSource, TimeSource};
pub use service::{read_envelope, EnvelopeStore};
