//! # Node Configuration
//!
//! Defaults, overridden by environment variables, overridden by CLI flags.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use lk_03_consistency::DEFAULT_IMPORT_BATCH_SIZE;
use thiserror::Error;

/// Directory holding one sub-directory per node.
pub const DEFAULT_DATA_ROOT: &str = "leveldb-stores";

/// Storage engine behind a node directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Backend {
    /// Single-image file store (always available).
    #[default]
    File,
    /// RocksDB (requires the `rocksdb` feature).
    Rocksdb,
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "file" => Ok(Backend::File),
            "rocksdb" => Ok(Backend::Rocksdb),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::File => write!(f, "file"),
            Backend::Rocksdb => write!(f, "rocksdb"),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown backend '{0}' (expected 'file' or 'rocksdb')")]
    UnknownBackend(String),

    #[error("invalid value '{value}' for {variable}")]
    InvalidValue { variable: &'static str, value: String },

    #[error("invalid node name '{0}': must be a single non-empty path component")]
    InvalidNodeName(String),
}

/// Complete node configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    /// Origin id stamped into envelopes. Defaults to the node name.
    pub node_id: Option<String>,
    /// Parent directory of all node stores.
    pub data_root: PathBuf,
    pub backend: Backend,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_level: String,
    pub json_logs: bool,
    pub import_batch_size: usize,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            node_id: None,
            data_root: PathBuf::from(DEFAULT_DATA_ROOT),
            backend: Backend::default(),
            log_level: "info".to_string(),
            json_logs: false,
            import_batch_size: DEFAULT_IMPORT_BATCH_SIZE,
        }
    }
}

impl NodeConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `LK_NODE_ID`: Origin node id (default: the node name)
    /// - `LK_DATA_ROOT`: Data root (default: leveldb-stores)
    /// - `LK_BACKEND`: `file` or `rocksdb` (default: file)
    /// - `LK_LOG_LEVEL` or `RUST_LOG`: Log filter (default: info)
    /// - `LK_JSON_LOGS`: Emit JSON logs (default: false)
    /// - `LK_IMPORT_BATCH_SIZE`: Entries per import batch (default: 1000)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let backend = match lookup("LK_BACKEND") {
            Some(value) => value.parse()?,
            None => defaults.backend,
        };

        let import_batch_size = match lookup("LK_IMPORT_BATCH_SIZE") {
            Some(value) => match value.parse::<usize>() {
                Ok(size) if size > 0 => size,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        variable: "LK_IMPORT_BATCH_SIZE",
                        value,
                    })
                }
            },
            None => defaults.import_batch_size,
        };

        Ok(Self {
            node_id: lookup("LK_NODE_ID").filter(|id| !id.is_empty()),
            data_root: lookup("LK_DATA_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_root),
            backend,
            log_level: lookup("LK_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_level),
            json_logs: lookup("LK_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(defaults.json_logs),
            import_batch_size,
        })
    }

    /// Directory of the store for `node`.
    pub fn node_path(&self, node: &str) -> Result<PathBuf, ConfigError> {
        let valid = !node.is_empty()
            && node != "."
            && node != ".."
            && !node.contains(['/', '\\']);
        if !valid {
            return Err(ConfigError::InvalidNodeName(node.to_string()));
        }
        Ok(self.data_root.join(node))
    }

    /// Origin id for envelopes written to `node`.
    pub fn origin_id(&self, node: &str) -> String {
        self.node_id.clone().unwrap_or_else(|| node.to_string())
    }
}
