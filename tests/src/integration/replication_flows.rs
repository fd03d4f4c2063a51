//! # Replication Flows
//!
//! Export, import and validation between independent nodes.

#[cfg(test)]
mod tests {
    use lk_01_envelope_store::EnvelopeStoreApi;
    use lk_03_consistency::{
        export_snapshot, import_snapshot, load_snapshot, ConsistencyValidator, ConsistencyValidatorApi,
        DiscrepancyKind, ImportConfig, ValidatorConfig, Verdict,
    };
    use serde_json::json;
    use shared_kv::{InMemoryKVStore, KeyValueStore};

    use crate::fixtures::{order, TestNode};

    fn snapshot_of(store: &dyn KeyValueStore) -> Vec<u8> {
        let mut out = Vec::new();
        export_snapshot(store, &mut out).unwrap();
        out
    }

    fn seed(node: &TestNode, ids: std::ops::RangeInclusive<u32>) {
        let repo = node.repository();
        for id in ids {
            let (key, doc) = order(id, "paid", "eu", id as u64);
            repo.save("order", &key, &doc).unwrap();
        }
    }

    #[test]
    fn test_equal_writes_validate_identical_both_ways() {
        let a = TestNode::new("node1");
        let b = TestNode::new("node1");
        seed(&a, 1..=20);
        seed(&b, 1..=20);

        let validator = ConsistencyValidator::default();
        let ab = validator.validate(&a.kv, &b.kv).unwrap();
        let ba = validator.validate(&b.kv, &a.kv).unwrap();

        assert!(ab.is_identical());
        assert!(ba.is_identical());
        assert_eq!(ab.checked, ab.count_a);
    }

    #[test]
    fn test_formatting_differences_are_tolerated() {
        let a = InMemoryKVStore::new();
        let b = InMemoryKVStore::new();
        a.put(b"order:1", br#"{"a":1,"b":{"c":[1,2]}}"#).unwrap();
        b.put(b"order:1", b"{ \"b\": { \"c\": [1, 2] },\n  \"a\": 1 }").unwrap();

        let report = ConsistencyValidator::default().validate(&a, &b).unwrap();
        assert!(report.is_identical());
        assert_eq!(report.checked, 1);
    }

    #[test]
    fn test_number_spelling_is_tolerated() {
        let a = TestNode::new("node1");
        a.envelopes.put("order:00001", &json!({"amount": 1000, "rate": 0.25})).unwrap();
        let stored = String::from_utf8(a.kv.get(b"order:00001").unwrap().unwrap()).unwrap();
        assert!(stored.contains(r#""amount":1000"#));

        // Same envelope as another encoder would write it.
        let respelled = stored
            .replace(r#""amount":1000"#, r#""amount":1e3"#)
            .replace(r#""rate":0.25"#, r#""rate":2.5e-1"#);
        let b = InMemoryKVStore::new();
        b.put(b"order:00001", respelled.as_bytes()).unwrap();
        let c = InMemoryKVStore::new();
        c.put(b"order:00001", stored.replace(r#""amount":1000"#, r#""amount":1000.0"#).as_bytes())
            .unwrap();

        let validator = ConsistencyValidator::default();
        assert_eq!(validator.validate(&a.kv, &b).unwrap().verdict(), Verdict::Identical);
        assert_eq!(validator.validate(&a.kv, &c).unwrap().verdict(), Verdict::Identical);
    }

    #[test]
    fn test_index_entries_compare_bytewise() {
        let a = InMemoryKVStore::new();
        let b = InMemoryKVStore::new();
        a.put(b"idx:order:status:paid:order:1", b"order:1").unwrap();
        b.put(b"idx:order:status:paid:order:1", b"order:2").unwrap();

        let report = ConsistencyValidator::default().validate(&a, &b).unwrap();
        assert_eq!(report.verdict(), Verdict::Diverged);
        assert_eq!(report.mismatched, 1);
        assert_eq!(report.discrepancies[0].kind, DiscrepancyKind::ValueMismatch);
    }

    #[test]
    fn test_import_overwrites_conflicting_values() {
        let a = TestNode::new("node1");
        let b = TestNode::new("node2");
        a.envelopes.put("order:00001", &json!({"amount": 1000})).unwrap();
        b.envelopes.put("order:00001", &json!({"amount": 2000})).unwrap();

        let validator = ConsistencyValidator::default();
        assert_eq!(validator.validate(&a.kv, &b.kv).unwrap().mismatched, 1);

        let snapshot = snapshot_of(&a.kv);
        import_snapshot(&b.kv, snapshot.as_slice(), &ImportConfig::default()).unwrap();

        // No conflict is detected: B simply holds A's value now.
        assert!(validator.validate(&a.kv, &b.kv).unwrap().is_identical());
        let envelope = b.envelopes.get("order:00001").unwrap();
        assert_eq!(envelope.document().unwrap()["amount"], 1000);
        assert_eq!(envelope.origin_node(), "node1");
    }

    #[test]
    fn test_losing_side_index_entries_survive_import() {
        let a = TestNode::new("node1");
        let b = TestNode::new("node2");
        let (key, doc) = order(1, "paid", "eu", 1000);
        a.repository().save("order", &key, &doc).unwrap();
        let (_, other) = order(1, "pending", "eu", 1000);
        b.repository().save("order", &key, &other).unwrap();

        import_snapshot(&b.kv, snapshot_of(&a.kv).as_slice(), &ImportConfig::default()).unwrap();

        let report = ConsistencyValidator::default().validate(&a.kv, &b.kv).unwrap();
        assert_eq!(report.verdict(), Verdict::CountMismatch { difference: 1 });
        assert_eq!(report.checked, 0);
        assert_eq!(b.repository().find("order", "status", "pending").unwrap().len(), 1);
    }

    #[test]
    fn test_count_mismatch_skips_key_pass() {
        let a = TestNode::new("node1");
        let b = TestNode::new("node1");
        for id in 1..=3 {
            let (key, doc) = order(id, "paid", "eu", 1);
            a.envelopes.put(&key, &doc).unwrap();
            if id < 3 {
                b.envelopes.put(&key, &doc).unwrap();
            }
        }

        let report = ConsistencyValidator::default().validate(&a.kv, &b.kv).unwrap();
        assert_eq!(report.verdict(), Verdict::CountMismatch { difference: 1 });
        assert_eq!(report.checked, 0);
        assert!(report.discrepancies.is_empty());
    }

    #[test]
    fn test_equal_counts_with_different_keys() {
        let a = InMemoryKVStore::new();
        let b = InMemoryKVStore::new();
        a.put(b"order:1", b"{}").unwrap();
        b.put(b"order:2", b"{}").unwrap();

        let report = ConsistencyValidator::default().validate(&a, &b).unwrap();
        assert_eq!(report.verdict(), Verdict::Diverged);
        assert_eq!(report.missing_in_b, 1);
        assert_eq!(report.checked, 0);
    }

    #[test]
    fn test_snapshot_validates_against_its_source() {
        let a = TestNode::new("node1");
        seed(&a, 1..=30);
        a.kv.put(b"blob:1", &[0xff, 0x00, 0x10]).unwrap();
        a.kv.put(b"order:padded", b" {\"a\":1} ").unwrap();

        let copy = load_snapshot(snapshot_of(&a.kv).as_slice()).unwrap();

        assert!(ConsistencyValidator::default().validate(&a.kv, &copy).unwrap().is_identical());
        assert_eq!(copy.get(b"blob:1").unwrap().unwrap(), vec![0xff, 0x00, 0x10]);
        assert_eq!(copy.get(b"order:padded").unwrap().unwrap(), b" {\"a\":1} ".to_vec());
    }

    #[test]
    fn test_imported_envelopes_still_verify() {
        let a = TestNode::new("node1");
        let b = TestNode::new("node2");
        seed(&a, 1..=25);

        let summary = import_snapshot(
            &b.kv,
            snapshot_of(&a.kv).as_slice(),
            &ImportConfig { batch_size: 10 },
        )
        .unwrap();
        assert_eq!(summary.imported, a.envelopes.count().unwrap());

        for id in 1..=25 {
            let (key, _) = order(id, "paid", "eu", 0);
            assert!(b.envelopes.verify_integrity(&key).unwrap());
        }
        assert_eq!(b.repository().find("order", "region", "EU").unwrap().len(), 25);
    }

    #[test]
    fn test_discrepancy_list_is_capped_but_counts_are_not() {
        let a = InMemoryKVStore::new();
        let b = InMemoryKVStore::new();
        for i in 0..5 {
            let key = format!("order:{i}");
            a.put(key.as_bytes(), br#"{"v":1}"#).unwrap();
            b.put(key.as_bytes(), br#"{"v":2}"#).unwrap();
        }

        let validator = ConsistencyValidator::new(ValidatorConfig {
            max_reported_discrepancies: 2,
        });
        let report = validator.validate(&a, &b).unwrap();
        assert_eq!(report.mismatched, 5);
        assert_eq!(report.problems(), 5);
        assert_eq!(report.discrepancies.len(), 2);
    }
}
