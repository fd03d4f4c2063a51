//! # `ledgerctl` Commands
//!
//! | Command | Exit code |
//! |---------|-----------|
//! | `verify` | 2 when the digest does not match |
//! | `validate` | 3 when the nodes differ |
//!
//! Any error exits with 1.

mod documents;
mod query;
mod replicate;

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::config::{Backend, NodeConfig};

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_INTEGRITY_MISMATCH: u8 = 2;
pub const EXIT_DIVERGED: u8 = 3;

/// Operator CLI for Ledger-KV nodes.
#[derive(Parser, Debug)]
#[command(name = "ledgerctl", version)]
#[command(about = "Query, replicate and validate Ledger-KV node stores")]
pub struct Cli {
    /// Directory holding one store per node [env: LK_DATA_ROOT]
    #[arg(long, global = true)]
    pub data_root: Option<PathBuf>,

    /// Origin id stamped into written envelopes [env: LK_NODE_ID]
    #[arg(long, global = true)]
    pub node_id: Option<String>,

    /// Storage engine [env: LK_BACKEND]
    #[arg(long, global = true, value_enum)]
    pub backend: Option<Backend>,

    #[command(subcommand)]
    pub command: Command,
}

/// Node selector shared by every command.
#[derive(Args, Debug, Clone)]
pub struct NodeArg {
    /// Node name (a directory under the data root)
    #[arg(long, short = 'n', default_value = "node1")]
    pub node: String,
}

/// Index lookup arguments.
#[derive(Args, Debug, Clone)]
pub struct IndexArgs {
    #[arg(long)]
    pub record_type: String,
    #[arg(long)]
    pub field: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Number of non-system keys
    Count(NodeArg),

    /// Key count per record type
    Stats(NodeArg),

    /// Print the envelope stored at KEY
    Get {
        #[command(flatten)]
        node: NodeArg,
        key: String,
    },

    /// Check the envelope digest at KEY
    Verify {
        #[command(flatten)]
        node: NodeArg,
        key: String,
    },

    /// Store a JSON document at KEY and index it
    Put {
        #[command(flatten)]
        node: NodeArg,
        /// Record type used for index entries
        #[arg(long)]
        record_type: String,
        key: String,
        /// Document as a JSON object
        json: String,
    },

    /// Delete the document at KEY and its index entries
    Delete {
        #[command(flatten)]
        node: NodeArg,
        #[arg(long)]
        record_type: String,
        key: String,
    },

    /// Documents whose indexed FIELD equals VALUE
    Search {
        #[command(flatten)]
        node: NodeArg,
        #[command(flatten)]
        index: IndexArgs,
        #[arg(long)]
        value: String,
        /// Maximum documents printed
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Entry count per distinct value of an indexed field
    IndexStats {
        #[command(flatten)]
        node: NodeArg,
        #[command(flatten)]
        index: IndexArgs,
    },

    /// Write a node's snapshot to a JSON file
    Export {
        #[command(flatten)]
        node: NodeArg,
        #[arg(long, short = 'o')]
        output: PathBuf,
    },

    /// Load a snapshot file into a node, overwriting existing keys
    Import {
        #[command(flatten)]
        node: NodeArg,
        #[arg(long, short = 'i')]
        input: PathBuf,
        /// Entries per atomic batch [env: LK_IMPORT_BATCH_SIZE]
        #[arg(long)]
        batch_size: Option<usize>,
    },

    /// Compare a node against another node or a snapshot file
    Validate {
        #[command(flatten)]
        node: NodeArg,
        /// Other node
        #[arg(long, conflicts_with = "snapshot", required_unless_present = "snapshot")]
        against: Option<String>,
        /// Snapshot file
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
}

impl Cli {
    /// Apply flag overrides on top of `base`.
    pub fn config(&self, base: NodeConfig) -> NodeConfig {
        let mut config = base;
        if let Some(root) = &self.data_root {
            config.data_root = root.clone();
        }
        if let Some(id) = &self.node_id {
            config.node_id = Some(id.clone());
        }
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        config
    }
}

/// Run one command, writing its report to `out`. Returns the exit status.
pub fn execute(command: &Command, config: &NodeConfig, out: &mut dyn Write) -> Result<u8> {
    match command {
        Command::Count(node) => query::count(config, &node.node, out),
        Command::Stats(node) => query::stats(config, &node.node, out),
        Command::Get { node, key } => query::get(config, &node.node, key, out),
        Command::Verify { node, key } => query::verify(config, &node.node, key, out),
        Command::Put {
            node,
            record_type,
            key,
            json,
        } => documents::put(config, &node.node, record_type, key, json, out),
        Command::Delete {
            node,
            record_type,
            key,
        } => documents::delete(config, &node.node, record_type, key, out),
        Command::Search {
            node,
            index,
            value,
            limit,
        } => query::search(config, &node.node, index, value, *limit, out),
        Command::IndexStats { node, index } => query::index_stats(config, &node.node, index, out),
        Command::Export { node, output } => replicate::export(config, &node.node, output, out),
        Command::Import {
            node,
            input,
            batch_size,
        } => replicate::import(config, &node.node, input, *batch_size, out),
        Command::Validate {
            node,
            against,
            snapshot,
        } => replicate::validate(config, &node.node, against.as_deref(), snapshot.as_deref(), out),
    }
}
