//! Ports for the Envelope Store.

pub mod inbound;
pub mod outbound;
