//! Export, import and validation between nodes.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use lk_03_consistency::{
    export_snapshot, import_snapshot, load_snapshot, ConsistencyValidator, ConsistencyValidatorApi,
    ImportConfig, Verdict,
};
use shared_kv::KeyValueStore;

use super::{EXIT_DIVERGED, EXIT_SUCCESS};
use crate::config::NodeConfig;
use crate::node::open_store;

pub(super) fn export(config: &NodeConfig, node: &str, output: &Path, out: &mut dyn Write) -> Result<u8> {
    let store = open_store(config, node)?;
    let file = File::create(output).with_context(|| format!("cannot create {}", output.display()))?;

    let summary = export_snapshot(store.as_ref(), BufWriter::new(file))?;
    writeln!(
        out,
        "exported {} entries ({} raw) from {} to {}",
        summary.exported,
        summary.raw,
        node,
        output.display()
    )?;
    if summary.skipped > 0 {
        writeln!(out, "skipped {} entries with non-UTF-8 keys", summary.skipped)?;
    }
    Ok(EXIT_SUCCESS)
}

pub(super) fn import(
    config: &NodeConfig,
    node: &str,
    input: &Path,
    batch_size: Option<usize>,
    out: &mut dyn Write,
) -> Result<u8> {
    let file = File::open(input).with_context(|| format!("cannot open {}", input.display()))?;
    let store = open_store(config, node)?;
    let import_config = ImportConfig {
        batch_size: batch_size.unwrap_or(config.import_batch_size),
    };

    let summary = import_snapshot(store.as_ref(), BufReader::new(file), &import_config)?;
    writeln!(
        out,
        "imported {} entries into {} in {} batch(es)",
        summary.imported, node, summary.batches
    )?;
    Ok(EXIT_SUCCESS)
}

pub(super) fn validate(
    config: &NodeConfig,
    node: &str,
    against: Option<&str>,
    snapshot: Option<&Path>,
    out: &mut dyn Write,
) -> Result<u8> {
    if against == Some(node) {
        anyhow::bail!("cannot validate node '{node}' against itself; pick another node or --snapshot");
    }

    let store = open_store(config, node)?;
    let (other, other_name): (Box<dyn KeyValueStore>, String) = match (against, snapshot) {
        (Some(other), _) => (Box::new(open_store(config, other)?), other.to_string()),
        (None, Some(path)) => {
            let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
            (
                Box::new(load_snapshot(BufReader::new(file))?),
                path.display().to_string(),
            )
        }
        (None, None) => anyhow::bail!("validate needs --against or --snapshot"),
    };

    let report = ConsistencyValidator::default().validate(store.as_ref(), other.as_ref())?;

    writeln!(out, "{node}: {} keys", report.count_a)?;
    writeln!(out, "{other_name}: {} keys", report.count_b)?;
    match report.verdict() {
        Verdict::Identical => {
            writeln!(out, "identical ({} keys checked)", report.checked)?;
            return Ok(EXIT_SUCCESS);
        }
        Verdict::CountMismatch { difference } => {
            writeln!(out, "diverged: key counts differ by {difference}")?;
        }
        Verdict::Diverged => {
            writeln!(
                out,
                "diverged: {} problem(s), {} missing in {}, {} with different values",
                report.problems(),
                report.missing_in_b,
                other_name,
                report.mismatched
            )?;
            for discrepancy in &report.discrepancies {
                writeln!(out, "  {:?} {}", discrepancy.kind, discrepancy.key)?;
            }
            if report.discrepancies.len() < report.problems() {
                writeln!(out, "  ... {} more", report.problems() - report.discrepancies.len())?;
            }
        }
    }
    Ok(EXIT_DIVERGED)
}
