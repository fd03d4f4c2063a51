//! Domain layer for the Index Engine.

pub mod errors;
pub mod fields;
pub mod keys;
