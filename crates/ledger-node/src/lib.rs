//! # Ledger Node Runtime
//!
//! Wires the Ledger-KV subsystems to a node's on-disk store and exposes
//! them through the `ledgerctl` CLI.
//!
//! ## Layout
//!
//! - `config` - `NodeConfig` (defaults, environment, flags)
//! - `telemetry` - tracing subscriber setup
//! - `node` - opening a node store and its document repository
//! - `commands` - `ledgerctl` subcommands
//!
//! ## Data Root
//!
//! ```text
//! leveldb-stores/
//! ├── node1/      one store per node, exclusively locked while open
//! └── node2/
//! ```

pub mod commands;
pub mod config;
pub mod node;
pub mod telemetry;

pub use config::{Backend, ConfigError, NodeConfig};
pub use node::{open_repository, open_store, NodeRepository, SharedStore};
