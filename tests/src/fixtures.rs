//! Shared builders for scenarios and benchmarks.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use lk_01_envelope_store::{EnvelopeStore, EnvelopeStoreConfig, FixedTimeSource};
use lk_02_index_engine::{DocumentRepository, IndexEngine};
use serde_json::{json, Value};
use shared_kv::InMemoryKVStore;

pub type MemStore = Arc<InMemoryKVStore>;

/// Every node in a scenario writes at this instant, so identical documents
/// produce identical envelopes.
pub fn fixed_clock() -> FixedTimeSource {
    FixedTimeSource(Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).single().unwrap_or_default())
}

/// One in-memory node: substrate, envelope store and index engine.
pub struct TestNode {
    pub kv: MemStore,
    pub envelopes: EnvelopeStore<MemStore, FixedTimeSource>,
    pub indexes: IndexEngine<MemStore>,
}

impl TestNode {
    pub fn new(node_id: &str) -> Self {
        let kv = Arc::new(InMemoryKVStore::new());
        Self {
            envelopes: EnvelopeStore::new(kv.clone(), fixed_clock(), EnvelopeStoreConfig::for_node(node_id)),
            indexes: IndexEngine::new(kv.clone()),
            kv,
        }
    }

    pub fn repository(&self) -> DocumentRepository<MemStore, FixedTimeSource> {
        DocumentRepository::new(
            self.kv.clone(),
            fixed_clock(),
            EnvelopeStoreConfig::for_node(self.envelopes.node_id()),
        )
    }
}

/// `order:<id>` document with the fields the scenarios index on.
pub fn order(id: u32, status: &str, region: &str, amount: u64) -> (String, Value) {
    (
        format!("order:{id:05}"),
        json!({
            "ledger_type": "order",
            "customer_id": format!("customer:{:03}", id % 50),
            "status": status,
            "region": region,
            "amount": amount,
        }),
    )
}
