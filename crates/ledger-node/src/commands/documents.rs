//! Document writes through the repository, keeping indexes in step.

use std::io::Write;

use anyhow::{Context, Result};
use serde_json::Value;

use super::EXIT_SUCCESS;
use crate::config::NodeConfig;
use crate::node::open_repository;

pub(super) fn put(
    config: &NodeConfig,
    node: &str,
    record_type: &str,
    key: &str,
    json: &str,
    out: &mut dyn Write,
) -> Result<u8> {
    let document: Value = serde_json::from_str(json).context("document is not valid JSON")?;
    let repo = open_repository(config, node)?;
    repo.save(record_type, key, &document)?;

    writeln!(out, "stored {key} on {node}")?;
    Ok(EXIT_SUCCESS)
}

pub(super) fn delete(
    config: &NodeConfig,
    node: &str,
    record_type: &str,
    key: &str,
    out: &mut dyn Write,
) -> Result<u8> {
    let repo = open_repository(config, node)?;
    if repo.remove(record_type, key)? {
        writeln!(out, "deleted {key} from {node}")?;
    } else {
        writeln!(out, "{key} not present on {node}")?;
    }
    Ok(EXIT_SUCCESS)
}
