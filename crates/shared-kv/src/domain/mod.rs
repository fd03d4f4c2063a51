//! # Domain Layer
//!
//! Key namespace conventions and substrate error types.

pub mod errors;
pub mod keys;
