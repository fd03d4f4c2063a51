//! Cross-subsystem scenarios.

pub mod envelope_flows;
pub mod index_flows;
pub mod replication_flows;
