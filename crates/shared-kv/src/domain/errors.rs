//! # Substrate Errors
//!
//! Failures surfaced by a `KeyValueStore` adapter.
//!
//! `Locked` and `OpenFailed` are only produced while opening a store; every
//! other operation reports `IOError` or `CorruptionError`.

use std::path::PathBuf;
use thiserror::Error;

/// Key-value store errors.
#[derive(Debug, Clone, Error)]
pub enum KVStoreError {
    /// I/O error during read/write.
    #[error("KV store I/O error: {message}")]
    IOError { message: String },

    /// Data corruption in the store.
    #[error("KV store corruption: {message}")]
    CorruptionError { message: String },

    /// Another process (or handle) already owns the store directory.
    #[error("KV store at {} is locked{}", path.display(), pid.map(|p| format!(" by process {}", p)).unwrap_or_default())]
    Locked { path: PathBuf, pid: Option<u32> },

    /// The engine refused to open the store.
    #[error("failed to open KV store at {}: {message}", path.display())]
    OpenFailed { path: PathBuf, message: String },
}

impl KVStoreError {
    /// Build an `IOError` from any displayable cause.
    pub fn io(cause: impl std::fmt::Display) -> Self {
        KVStoreError::IOError {
            message: cause.to_string(),
        }
    }

    /// Whether this error was raised while opening the store.
    pub fn is_open_error(&self) -> bool {
        matches!(
            self,
            KVStoreError::Locked { .. } | KVStoreError::OpenFailed { .. }
        )
    }
}
