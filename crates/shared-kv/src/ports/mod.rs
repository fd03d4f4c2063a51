//! # Ports Layer
//!
//! - `outbound` - The substrate SPI implemented by the adapters

pub mod outbound;
