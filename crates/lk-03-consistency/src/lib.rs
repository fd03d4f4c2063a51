//! # Consistency Validator (lk-03)
//!
//! Offline replication between nodes and after-the-fact divergence checks.
//!
//! ```text
//! node A --export_snapshot--> snapshot.json --import_snapshot--> node B
//!                                                                  |
//! node A <------------------- ConsistencyValidator::validate ------+
//! ```
//!
//! ## What the Validator Can See
//!
//! - Missing keys and content differences between A and B.
//! - Encoding-only differences (key order, whitespace) are NOT divergence
//!   for JSON values; index entries must match byte-for-byte.
//!
//! Import overwrites unconditionally (last write wins). If A and B held
//! conflicting values for a key before replication, the import erases B's
//! value and validation afterwards reports the nodes as identical. The
//! conflict is not detectable here.

pub mod domain;
pub mod export;
pub mod import;
pub mod ports;
pub mod service;

pub use domain::compare::{canonical_json, values_match};
pub use domain::errors::ReplicationError;
pub use domain::record::ReplicationRecord;
pub use domain::report::{Discrepancy, DiscrepancyKind, ValidationReport, ValidatorConfig, Verdict};
pub use export::{export_snapshot, ExportSummary};
pub use import::{
    import_snapshot, load_snapshot, read_snapshot, ImportConfig, ImportSummary, DEFAULT_IMPORT_BATCH_SIZE,
};
pub use ports::inbound::ConsistencyValidatorApi;
pub use service::ConsistencyValidator;
