//! # Outbound Ports (Driven Ports)
//!
//! The substrate comes from `shared-kv`; the clock is injected so tests can
//! pin timestamps.

use chrono::{DateTime, Utc};

pub use shared_kv::{BatchOperation, KeyValueStore};

/// Source of envelope write times.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeSource(pub DateTime<Utc>);

impl TimeSource for FixedTimeSource {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
