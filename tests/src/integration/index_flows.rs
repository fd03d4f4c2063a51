//! # Index Flows
//!
//! The index-entry invariant under manual maintenance and through the
//! repository facade.

#[cfg(test)]
mod tests {
    use lk_01_envelope_store::EnvelopeStoreApi;
    use lk_02_index_engine::{IndexEngineApi, IndexError};
    use serde_json::{json, Map, Value};
    use shared_kv::KeyValueStore;

    use crate::fixtures::{order, TestNode};

    fn object(value: &Value) -> &Map<String, Value> {
        value.as_object().unwrap()
    }

    #[test]
    fn test_manual_mode_update_moves_primary_key() {
        let node = TestNode::new("node1");
        let (key, v1) = order(1, "pending", "eu", 100);
        node.envelopes.put(&key, &v1).unwrap();
        node.indexes.update_indexes("order", &key, None, Some(object(&v1))).unwrap();

        assert_eq!(node.indexes.search_by_index("order", "status", "pending").unwrap(), vec![key.clone()]);

        let mut v2 = v1.clone();
        v2["status"] = json!("shipped");
        node.envelopes.put(&key, &v2).unwrap();
        node.indexes
            .update_indexes("order", &key, Some(object(&v1)), Some(object(&v2)))
            .unwrap();

        assert!(node.indexes.search_by_index("order", "status", "pending").unwrap().is_empty());
        assert_eq!(node.indexes.search_by_index("order", "status", "shipped").unwrap(), vec![key.clone()]);
        // Unchanged fields keep their entry.
        assert_eq!(node.indexes.search_by_index("order", "region", "eu").unwrap(), vec![key]);
    }

    #[test]
    fn test_manual_mode_does_not_index_on_put() {
        let node = TestNode::new("node1");
        let (key, doc) = order(1, "pending", "eu", 100);
        node.envelopes.put(&key, &doc).unwrap();

        assert!(node.indexes.search_by_index("order", "status", "pending").unwrap().is_empty());
    }

    #[test]
    fn test_create_index_appears_exactly_once() {
        let node = TestNode::new("node1");
        for _ in 0..3 {
            node.indexes.create_index("customer", "country", "France", "customer:1").unwrap();
        }
        let hits = node.indexes.search_by_index("customer", "country", "france").unwrap();
        assert_eq!(hits, vec!["customer:1"]);
    }

    #[test]
    fn test_normalization_is_case_and_whitespace_insensitive() {
        let node = TestNode::new("node1");
        node.indexes.create_index("customer", "region", "NA", "customer:1").unwrap();
        node.indexes.create_index("customer", "region", " na", "customer:2").unwrap();
        node.indexes.create_index("customer", "region", "EU", "customer:3").unwrap();

        let a = node.indexes.search_by_index("customer", "region", "  NA ").unwrap();
        let b = node.indexes.search_by_index("customer", "region", "na").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_results_follow_primary_key_order() {
        let node = TestNode::new("node1");
        for id in [30, 4, 17, 1] {
            let (key, doc) = order(id, "paid", "eu", 1);
            node.indexes.update_indexes("order", &key, None, Some(object(&doc))).unwrap();
        }
        let hits = node.indexes.search_by_index("order", "status", "paid").unwrap();
        assert_eq!(hits, vec!["order:00001", "order:00004", "order:00017", "order:00030"]);
    }

    #[test]
    fn test_discriminator_is_never_indexed() {
        let node = TestNode::new("node1");
        let (key, doc) = order(1, "paid", "eu", 1);
        node.indexes.update_indexes("order", &key, None, Some(object(&doc))).unwrap();

        assert!(node.indexes.search_by_index("order", "ledger_type", "order").unwrap().is_empty());
        // customer_id, status, region, amount
        assert_eq!(node.kv.prefix_scan(b"idx:").unwrap().len(), 4);
    }

    #[test]
    fn test_stale_entries_are_advisory() {
        let node = TestNode::new("node1");
        let (key, doc) = order(1, "paid", "eu", 1);
        node.envelopes.put(&key, &doc).unwrap();
        node.indexes.update_indexes("order", &key, None, Some(object(&doc))).unwrap();

        node.envelopes.delete(&key).unwrap();

        // The entry outlives its document; best-effort skips it, strict mode surfaces it.
        assert_eq!(node.indexes.count_by_index("order", "status", "paid").unwrap(), 1);
        assert!(node.indexes.get_by_index("order", "status", "paid").unwrap().is_empty());
        assert!(matches!(
            node.indexes.get_by_index_strict("order", "status", "paid"),
            Err(IndexError::Envelope(_))
        ));
    }

    #[test]
    fn test_repository_keeps_indexes_in_step() {
        let node = TestNode::new("node1");
        let repo = node.repository();

        for id in 1..=10 {
            let status = if id % 2 == 0 { "paid" } else { "pending" };
            let (key, doc) = order(id, status, "eu", id as u64 * 10);
            repo.save("order", &key, &doc).unwrap();
        }
        for id in (1..=10).step_by(2) {
            let (key, doc) = order(id, "paid", "eu", id as u64 * 10);
            repo.save("order", &key, &doc).unwrap();
        }
        repo.remove("order", "order:00010").unwrap();

        let stats = repo.indexes().list_indexes("order", "status").unwrap();
        assert_eq!(stats.get("paid"), Some(&9));
        assert_eq!(stats.get("pending"), None);

        let paid = repo.find("order", "status", "PAID").unwrap();
        assert_eq!(paid.len(), 9);
        assert!(paid.iter().all(|d| d.envelope.verify()));
    }

    #[test]
    fn test_composite_index_round() {
        let node = TestNode::new("node1");
        let (key, _) = order(5, "paid", "eu", 1);
        node.indexes
            .create_composite_index("order", &["status", "region"], &["Paid", "EU"], &key)
            .unwrap();

        assert_eq!(
            node.indexes
                .search_by_composite_index("order", &["status", "region"], &[" paid ", "eu"])
                .unwrap(),
            vec![key]
        );
        assert!(node
            .indexes
            .search_by_composite_index("order", &["status", "region"], &["paid"])
            .unwrap_err()
            .is_invalid_argument());
    }

    #[test]
    fn test_index_entries_share_the_node_keyspace() {
        let node = TestNode::new("node1");
        let (key, doc) = order(1, "paid", "eu", 1);
        node.repository().save("order", &key, &doc).unwrap();

        // 1 document + 4 index entries, all counted as non-system keys.
        assert_eq!(node.envelopes.count().unwrap(), 5);
    }

    #[test]
    fn test_system_keys_stay_out_of_every_index() {
        let node = TestNode::new("node1");
        let (_, doc) = order(1, "paid", "eu", 1);

        node.indexes.create_index("order", "status", "paid", "_meta:1").unwrap();
        node.indexes.update_indexes("order", "_meta:1", None, Some(object(&doc))).unwrap();
        node.repository().save("order", "_config", &doc).unwrap();

        assert!(node.kv.prefix_scan(b"idx:").unwrap().is_empty());
        assert!(node.indexes.search_by_index("order", "status", "paid").unwrap().is_empty());
        // The document itself is stored, and stays out of the key count.
        assert!(node.envelopes.get("_config").unwrap().verify());
        assert_eq!(node.envelopes.count().unwrap(), 0);
    }
}
