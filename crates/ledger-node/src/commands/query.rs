//! Read-only commands.

use std::collections::BTreeMap;
use std::io::Write;
use std::ops::ControlFlow;

use anyhow::{Context, Result};
use lk_01_envelope_store::EnvelopeStoreApi;
use lk_02_index_engine::{IndexEngineApi, INDEX_NAMESPACE};
use serde_json::json;
use shared_kv::{is_system_key, record_type_of, KeyValueStore};

use super::{IndexArgs, EXIT_INTEGRITY_MISMATCH, EXIT_SUCCESS};
use crate::config::NodeConfig;
use crate::node::{open_repository, open_store};

const UNTYPED: &str = "(untyped)";
const SECONDARY_INDEXES: &str = "secondary indexes";

pub(super) fn count(config: &NodeConfig, node: &str, out: &mut dyn Write) -> Result<u8> {
    let repo = open_repository(config, node)?;
    writeln!(out, "{}", repo.envelopes().count()?)?;
    Ok(EXIT_SUCCESS)
}

pub(super) fn stats(config: &NodeConfig, node: &str, out: &mut dyn Write) -> Result<u8> {
    let store = open_store(config, node)?;

    let mut total = 0usize;
    let mut per_type: BTreeMap<String, usize> = BTreeMap::new();
    store
        .visit_prefix(b"", &mut |key, _| {
            if is_system_key(key) {
                return ControlFlow::Continue(());
            }
            total += 1;
            let label = if key.starts_with(INDEX_NAMESPACE.as_bytes()) {
                SECONDARY_INDEXES
            } else {
                std::str::from_utf8(key)
                    .ok()
                    .and_then(record_type_of)
                    .unwrap_or(UNTYPED)
            };
            *per_type.entry(label.to_string()).or_insert(0) += 1;
            ControlFlow::Continue(())
        })
        .with_context(|| format!("cannot scan node '{node}'"))?;

    writeln!(out, "{node}: {total} keys")?;
    for (label, count) in &per_type {
        writeln!(out, "  {label:<20} {count:>10}")?;
    }
    Ok(EXIT_SUCCESS)
}

pub(super) fn get(config: &NodeConfig, node: &str, key: &str, out: &mut dyn Write) -> Result<u8> {
    let repo = open_repository(config, node)?;
    let envelope = repo.envelopes().get(key)?;

    let view = json!({
        "key": key,
        "hash": envelope.integrity_digest(),
        "timestamp": envelope.written_at(),
        "node": envelope.origin_node(),
        "verified": envelope.verify(),
        "data": envelope.document().with_context(|| format!("payload of '{key}' is not JSON"))?,
    });
    writeln!(out, "{}", serde_json::to_string_pretty(&view)?)?;
    Ok(EXIT_SUCCESS)
}

pub(super) fn verify(config: &NodeConfig, node: &str, key: &str, out: &mut dyn Write) -> Result<u8> {
    let repo = open_repository(config, node)?;
    if repo.envelopes().verify_integrity(key)? {
        writeln!(out, "OK {key}")?;
        Ok(EXIT_SUCCESS)
    } else {
        writeln!(out, "MISMATCH {key}: stored digest does not match payload")?;
        Ok(EXIT_INTEGRITY_MISMATCH)
    }
}

pub(super) fn search(
    config: &NodeConfig,
    node: &str,
    index: &IndexArgs,
    value: &str,
    limit: usize,
    out: &mut dyn Write,
) -> Result<u8> {
    let repo = open_repository(config, node)?;
    let found = repo.find(&index.record_type, &index.field, value)?;

    writeln!(
        out,
        "{} document(s) with {}.{} = {:?}",
        found.len(),
        index.record_type,
        index.field,
        value
    )?;
    for document in found.iter().take(limit) {
        writeln!(out, "{}\t{}", document.primary_key, document.envelope.payload())?;
    }
    if found.len() > limit {
        writeln!(out, "... {} more", found.len() - limit)?;
    }
    Ok(EXIT_SUCCESS)
}

pub(super) fn index_stats(
    config: &NodeConfig,
    node: &str,
    index: &IndexArgs,
    out: &mut dyn Write,
) -> Result<u8> {
    let repo = open_repository(config, node)?;
    let counts = repo.indexes().list_indexes(&index.record_type, &index.field)?;

    writeln!(
        out,
        "{}.{}: {} distinct value(s)",
        index.record_type,
        index.field,
        counts.len()
    )?;
    for (value, count) in &counts {
        writeln!(out, "  {value:<30} {count:>8}")?;
    }
    Ok(EXIT_SUCCESS)
}
