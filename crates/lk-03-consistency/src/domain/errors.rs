//! # Domain Errors

use shared_kv::KVStoreError;
use thiserror::Error;

/// Errors from export, import and validation.
#[derive(Debug, Error)]
pub enum ReplicationError {
    /// A substrate read or write failed.
    #[error("storage failure during {operation} at '{key}': {source}")]
    Storage {
        operation: &'static str,
        key: String,
        #[source]
        source: KVStoreError,
    },

    /// Reading or writing the snapshot stream failed.
    #[error("snapshot I/O failure during {operation}: {source}")]
    Io {
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The snapshot is not a JSON array of records.
    #[error("malformed snapshot: {source}")]
    Format {
        #[source]
        source: serde_json::Error,
    },

    /// A record cannot be turned back into a key/value pair.
    #[error("invalid record #{index} ('{key}'): {reason}")]
    InvalidRecord {
        index: usize,
        key: String,
        reason: String,
    },

    /// A chunk failed after earlier chunks were committed.
    #[error("import stopped after {committed} of {total} entries: {source}")]
    PartialImport {
        committed: usize,
        total: usize,
        #[source]
        source: KVStoreError,
    },
}

impl ReplicationError {
    pub(crate) fn storage(operation: &'static str, key: &[u8], source: KVStoreError) -> Self {
        ReplicationError::Storage {
            operation,
            key: String::from_utf8_lossy(key).into_owned(),
            source,
        }
    }

    pub(crate) fn io(operation: &'static str, source: std::io::Error) -> Self {
        ReplicationError::Io { operation, source }
    }
}

impl From<serde_json::Error> for ReplicationError {
    fn from(source: serde_json::Error) -> Self {
        if source.is_io() {
            ReplicationError::Io {
                operation: "snapshot stream",
                source: source.into(),
            }
        } else {
            ReplicationError::Format { source }
        }
    }
}
