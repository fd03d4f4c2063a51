//! # Domain Errors

use lk_01_envelope_store::EnvelopeError;
use shared_kv::KVStoreError;
use thiserror::Error;

/// Errors returned by the Index Engine and the document repository.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The substrate failed.
    #[error("storage failure during {operation} on '{target}': {source}")]
    Storage {
        operation: &'static str,
        /// Index key, scan prefix or primary key being touched.
        target: String,
        #[source]
        source: KVStoreError,
    },

    /// A precondition failed; nothing was written.
    #[error("invalid argument to {operation}: {reason}")]
    InvalidArgument {
        operation: &'static str,
        reason: String,
    },

    /// Reading or sealing a document envelope failed.
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),
}

impl IndexError {
    pub(crate) fn storage(operation: &'static str, target: impl Into<String>, source: KVStoreError) -> Self {
        IndexError::Storage {
            operation,
            target: target.into(),
            source,
        }
    }

    pub(crate) fn invalid(operation: &'static str, reason: impl Into<String>) -> Self {
        IndexError::InvalidArgument {
            operation,
            reason: reason.into(),
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, IndexError::InvalidArgument { .. })
    }
}
