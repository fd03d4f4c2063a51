//! Ports for the Index Engine.

pub mod inbound;
pub mod outbound;
