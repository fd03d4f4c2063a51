//! Domain layer for the Envelope Store.

pub mod digest;
pub mod envelope;
pub mod errors;
