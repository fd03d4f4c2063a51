//! # Domain Errors
//!
//! Every variant names the key it concerns so callers can render a message
//! without re-deriving context.

use shared_kv::KVStoreError;
use thiserror::Error;

/// Errors returned by the Envelope Store.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// The substrate failed to read or write.
    #[error("storage failure during {operation} of '{key}': {source}")]
    Storage {
        operation: &'static str,
        key: String,
        #[source]
        source: KVStoreError,
    },

    /// No envelope is stored at the key. Expected, not a failure.
    #[error("key not found: '{key}'")]
    NotFound { key: String },

    /// The caller's document could not be encoded as JSON.
    #[error("cannot serialize document for '{key}': {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The stored bytes are not a valid envelope.
    #[error("cannot decode envelope at '{key}': {source}")]
    Deserialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl EnvelopeError {
    pub(crate) fn storage(operation: &'static str, key: impl Into<String>, source: KVStoreError) -> Self {
        EnvelopeError::Storage {
            operation,
            key: key.into(),
            source,
        }
    }

    /// True for `NotFound`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, EnvelopeError::NotFound { .. })
    }

    /// The key the failed operation targeted.
    pub fn key(&self) -> &str {
        match self {
            EnvelopeError::Storage { key, .. }
            | EnvelopeError::NotFound { key }
            | EnvelopeError::Serialization { key, .. }
            | EnvelopeError::Deserialization { key, .. } => key,
        }
    }
}
