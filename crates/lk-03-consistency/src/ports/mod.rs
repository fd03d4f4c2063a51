//! Ports for the Consistency Validator.

pub mod inbound;
pub mod outbound;
