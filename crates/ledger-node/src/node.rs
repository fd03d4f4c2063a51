//! Opening a node's store.

use std::sync::Arc;

use anyhow::{Context, Result};
use lk_01_envelope_store::{EnvelopeStoreConfig, SystemTimeSource};
use lk_02_index_engine::DocumentRepository;
use shared_kv::{FileBackedKVStore, KeyValueStore};
use tracing::info;

use crate::config::{Backend, NodeConfig};

/// A node's substrate, shared between its subsystems.
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Envelope Store and Index Engine over one node.
pub type NodeRepository = DocumentRepository<SharedStore, SystemTimeSource>;

/// Open (creating if needed) the store for `node`.
///
/// Fails if another process holds the node open.
pub fn open_store(config: &NodeConfig, node: &str) -> Result<SharedStore> {
    let path = config.node_path(node)?;

    let store: SharedStore = match config.backend {
        Backend::File => Arc::new(
            FileBackedKVStore::open(&path)
                .with_context(|| format!("cannot open node '{}' at {}", node, path.display()))?,
        ),
        Backend::Rocksdb => open_rocksdb(&path, node)?,
    };

    info!(node, backend = %config.backend, path = %path.display(), "Opened node store");
    Ok(store)
}

#[cfg(feature = "rocksdb")]
fn open_rocksdb(path: &std::path::Path, node: &str) -> Result<SharedStore> {
    let store = shared_kv::RocksDbStore::open_default(path)
        .with_context(|| format!("cannot open node '{}' at {}", node, path.display()))?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "rocksdb"))]
fn open_rocksdb(_path: &std::path::Path, node: &str) -> Result<SharedStore> {
    anyhow::bail!(
        "node '{}' requested the rocksdb backend, but ledgerctl was built without the `rocksdb` feature",
        node
    )
}

/// Repository over `node`, stamping envelopes with the configured origin id.
pub fn open_repository(config: &NodeConfig, node: &str) -> Result<NodeRepository> {
    let store = open_store(config, node)?;
    Ok(DocumentRepository::new(
        store,
        SystemTimeSource,
        EnvelopeStoreConfig::for_node(config.origin_id(node)),
    ))
}
