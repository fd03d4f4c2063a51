//! # Ledger-KV Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/              # criterion benchmarks for the core paths
//! └── src/integration/      # cross-subsystem scenarios
//!     ├── envelope_flows.rs     # round-trip, integrity, batch atomicity
//!     ├── index_flows.rs        # index equality, re-indexing, normalization
//!     └── replication_flows.rs  # export/import, validator, last-write-wins
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p lk-tests
//! cargo test -p lk-tests integration::replication_flows
//! cargo bench -p lk-tests
//! ```

pub mod fixtures;
pub mod integration;
