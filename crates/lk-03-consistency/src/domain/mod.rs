//! Domain layer for the Consistency Validator.

pub mod compare;
pub mod errors;
pub mod record;
pub mod report;
