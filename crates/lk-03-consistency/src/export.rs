//! # Snapshot Export
//!
//! Streams every non-system entry of a node, in key order, as a JSON array
//! of `ReplicationRecord`s.

use std::io::Write;
use std::ops::ControlFlow;

use shared_kv::is_system_key;
use tracing::{info, warn};

use crate::domain::errors::ReplicationError;
use crate::domain::record::ReplicationRecord;
use crate::ports::outbound::KeyValueStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub exported: usize,
    /// Records carried as base64.
    pub raw: usize,
    /// Entries left out because their key is not UTF-8.
    pub skipped: usize,
}

/// Write `store`'s snapshot to `writer`.
pub fn export_snapshot<W: Write>(
    store: &dyn KeyValueStore,
    mut writer: W,
) -> Result<ExportSummary, ReplicationError> {
    let mut summary = ExportSummary::default();
    let mut failure = None;

    writer
        .write_all(b"[\n")
        .map_err(|e| ReplicationError::io("export", e))?;

    store
        .visit_prefix(b"", &mut |key, value| {
            if is_system_key(key) {
                return ControlFlow::Continue(());
            }
            let Some(record) = ReplicationRecord::from_entry(key, value) else {
                warn!(key = %String::from_utf8_lossy(key), "Skipping entry with non-UTF-8 key");
                summary.skipped += 1;
                return ControlFlow::Continue(());
            };

            let written = write_record(&mut writer, &record, summary.exported == 0);
            if let Err(e) = written {
                failure = Some(e);
                return ControlFlow::Break(());
            }
            summary.exported += 1;
            if record.is_raw {
                summary.raw += 1;
            }
            ControlFlow::Continue(())
        })
        .map_err(|e| ReplicationError::storage("export", b"", e))?;

    if let Some(e) = failure {
        return Err(e);
    }

    writer
        .write_all(b"\n]\n")
        .and_then(|()| writer.flush())
        .map_err(|e| ReplicationError::io("export", e))?;

    info!(
        exported = summary.exported,
        raw = summary.raw,
        skipped = summary.skipped,
        "Exported snapshot"
    );
    Ok(summary)
}

fn write_record<W: Write>(
    writer: &mut W,
    record: &ReplicationRecord,
    first: bool,
) -> Result<(), ReplicationError> {
    if !first {
        writer
            .write_all(b",\n")
            .map_err(|e| ReplicationError::io("export", e))?;
    }
    serde_json::to_writer_pretty(&mut *writer, record)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use shared_kv::InMemoryKVStore;

    #[test]
    fn test_export_is_a_json_array_in_key_order() {
        let kv = InMemoryKVStore::new();
        kv.put(b"order:2", br#"{"a":2}"#).unwrap();
        kv.put(b"order:1", br#"{"a":1}"#).unwrap();
        kv.put(b"idx:order:a:1:order:1", b"order:1").unwrap();
        kv.put(b"_meta", b"skip me").unwrap();

        let mut out = Vec::new();
        let summary = export_snapshot(&kv, &mut out).unwrap();
        assert_eq!(
            summary,
            ExportSummary {
                exported: 3,
                raw: 1,
                skipped: 0
            }
        );

        let parsed: Value = serde_json::from_slice(&out).unwrap();
        let keys: Vec<&str> = parsed
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["key"].as_str().unwrap())
            .collect();
        assert_eq!(keys, vec!["idx:order:a:1:order:1", "order:1", "order:2"]);
        assert_eq!(parsed[1]["value"]["a"], 1);
        assert_eq!(parsed[0]["is_raw"], true);
    }

    #[test]
    fn test_empty_store_exports_empty_array() {
        let mut out = Vec::new();
        let summary = export_snapshot(&InMemoryKVStore::new(), &mut out).unwrap();
        assert_eq!(summary.exported, 0);
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert!(parsed.is_empty());
    }
}
