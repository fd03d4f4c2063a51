//! # Envelope Flows
//!
//! Round-trip, integrity and batch atomicity against real substrates.

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use lk_01_envelope_store::{
        EnvelopeError, EnvelopeStore, EnvelopeStoreApi, EnvelopeStoreConfig, SystemTimeSource,
    };
    use serde_json::Value;
    use shared_kv::{FaultInjectingStore, FileBackedKVStore, InMemoryKVStore, KeyValueStore};
    use tempfile::TempDir;

    use crate::fixtures::order;

    #[test]
    fn test_round_trip_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let (key, doc) = order(1, "pending", "eu", 1000);

        {
            let kv = FileBackedKVStore::open(dir.path()).unwrap();
            let store = EnvelopeStore::with_system_clock(kv, EnvelopeStoreConfig::for_node("node1"));
            store.put(&key, &doc).unwrap();
        }

        let kv = FileBackedKVStore::open(dir.path()).unwrap();
        let store = EnvelopeStore::with_system_clock(kv, EnvelopeStoreConfig::for_node("node1"));
        let envelope = store.get(&key).unwrap();

        assert_eq!(envelope.document().unwrap(), doc);
        assert_eq!(envelope.origin_node(), "node1");
        assert!(store.verify_integrity(&key).unwrap());
    }

    #[test]
    fn test_out_of_band_edit_is_detected_not_repaired() {
        let kv = Arc::new(InMemoryKVStore::new());
        let store = EnvelopeStore::with_system_clock(kv.clone(), EnvelopeStoreConfig::default());
        let (key, doc) = order(7, "paid", "na", 4200);
        store.put(&key, &doc).unwrap();

        let stored = String::from_utf8(kv.get(key.as_bytes()).unwrap().unwrap()).unwrap();
        let edited = stored.replace("\"amount\":4200", "\"amount\":4201");
        kv.put(key.as_bytes(), edited.as_bytes()).unwrap();

        assert!(!store.verify_integrity(&key).unwrap());
        // Reads still succeed and return the edited bytes.
        let envelope = store.get(&key).unwrap();
        assert_eq!(envelope.document().unwrap()["amount"], 4201);
        assert!(!envelope.verify());
    }

    #[test]
    fn test_batch_is_all_or_error() {
        let kv = Arc::new(FaultInjectingStore::new(InMemoryKVStore::new()));
        let store = EnvelopeStore::with_system_clock(kv.clone(), EnvelopeStoreConfig::default());

        let first: BTreeMap<String, Value> = (1..=3).map(|i| order(i, "pending", "eu", 100)).collect();
        store.batch_insert(&first).unwrap();
        let before = kv.prefix_scan(b"").unwrap();

        kv.fail_batches(true);
        let second: BTreeMap<String, Value> = (2..=6).map(|i| order(i, "shipped", "eu", 200)).collect();
        let err = store.batch_insert(&second).unwrap_err();
        assert!(matches!(err, EnvelopeError::Storage { .. }));
        assert_eq!(kv.prefix_scan(b"").unwrap(), before);

        kv.fail_batches(false);
        store.batch_insert(&second).unwrap();
        for key in second.keys() {
            assert_eq!(store.get(key).unwrap().document().unwrap()["status"], "shipped");
        }
        assert_eq!(store.count().unwrap(), 6);
    }

    #[test]
    fn test_file_store_batch_is_durable() {
        let dir = TempDir::new().unwrap();
        let entries: BTreeMap<String, Value> = (1..=50).map(|i| order(i, "paid", "apac", i as u64)).collect();
        {
            let kv = FileBackedKVStore::open(dir.path()).unwrap();
            let store = EnvelopeStore::new(kv, SystemTimeSource, EnvelopeStoreConfig::default());
            store.batch_insert(&entries).unwrap();
        }

        let store = EnvelopeStore::with_system_clock(
            FileBackedKVStore::open(dir.path()).unwrap(),
            EnvelopeStoreConfig::default(),
        );
        assert_eq!(store.count().unwrap(), 50);
        assert!(entries.keys().all(|k| store.verify_integrity(k).unwrap()));
    }

    #[test]
    fn test_delete_then_get() {
        let store = EnvelopeStore::with_system_clock(InMemoryKVStore::new(), EnvelopeStoreConfig::default());
        let (key, doc) = order(3, "pending", "eu", 1);
        store.put(&key, &doc).unwrap();

        store.delete(&key).unwrap();
        store.delete(&key).unwrap();
        assert!(store.get(&key).unwrap_err().is_not_found());
        assert_eq!(store.count().unwrap(), 0);
    }
}
