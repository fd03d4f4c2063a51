//! # Snapshot Import
//!
//! Writes an exported snapshot into a node. Import is an unconditional
//! overwrite: whatever the target held at an imported key is replaced, and
//! no record of the replaced value is kept.

use std::io::Read;

use shared_kv::{is_system_key, InMemoryKVStore};
use tracing::{debug, info, warn};

use crate::domain::errors::ReplicationError;
use crate::domain::record::ReplicationRecord;
use crate::ports::outbound::{BatchOperation, KeyValueStore};

/// Entries per atomic batch.
pub const DEFAULT_IMPORT_BATCH_SIZE: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    pub batch_size: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_IMPORT_BATCH_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped_system: usize,
    pub batches: usize,
}

/// Parse a snapshot fully, rejecting it before any write if any record is bad.
pub fn read_snapshot<R: Read>(reader: R) -> Result<Vec<(Vec<u8>, Vec<u8>)>, ReplicationError> {
    let records: Vec<ReplicationRecord> = serde_json::from_reader(reader)?;
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| record.into_entry(index))
        .collect()
}

/// Import the snapshot read from `reader` into `store`.
///
/// Entries are written in atomic chunks of `config.batch_size`. If a chunk
/// fails, earlier chunks stay committed and the error says how many.
pub fn import_snapshot<R: Read>(
    store: &dyn KeyValueStore,
    reader: R,
    config: &ImportConfig,
) -> Result<ImportSummary, ReplicationError> {
    let entries = read_snapshot(reader)?;
    let mut summary = ImportSummary::default();

    let mut writable = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        if is_system_key(&key) {
            warn!(key = %String::from_utf8_lossy(&key), "Skipping system key in snapshot");
            summary.skipped_system += 1;
        } else {
            writable.push(BatchOperation::put(key, value));
        }
    }

    let total = writable.len();
    let batch_size = config.batch_size.max(1);
    let mut remaining = writable.into_iter().peekable();
    while remaining.peek().is_some() {
        let chunk: Vec<BatchOperation> = remaining.by_ref().take(batch_size).collect();
        let len = chunk.len();
        store
            .atomic_batch_write(chunk)
            .map_err(|source| ReplicationError::PartialImport {
                committed: summary.imported,
                total,
                source,
            })?;
        summary.imported += len;
        summary.batches += 1;
        debug!(committed = summary.imported, total, "Imported chunk");
    }

    info!(
        imported = summary.imported,
        skipped_system = summary.skipped_system,
        batches = summary.batches,
        "Imported snapshot"
    );
    Ok(summary)
}

/// Materialize a snapshot as an in-memory node, e.g. to validate a live
/// store against an export file.
pub fn load_snapshot<R: Read>(reader: R) -> Result<InMemoryKVStore, ReplicationError> {
    let store = InMemoryKVStore::new();
    import_snapshot(&store, reader, &ImportConfig::default())?;
    Ok(store)
}
