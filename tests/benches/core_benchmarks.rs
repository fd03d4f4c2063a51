//! # Ledger-KV Core Benchmarks
//!
//! | Subsystem | Operation | Shape |
//! |-----------|-----------|-------|
//! | lk-01 Envelope Store | batch insert | one atomic batch per call |
//! | lk-02 Index Engine | equality search | one prefix scan |
//! | lk-03 Consistency | validate | count pass + key pass |

use std::collections::BTreeMap;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lk_01_envelope_store::EnvelopeStoreApi;
use lk_02_index_engine::IndexEngineApi;
use lk_03_consistency::{export_snapshot, load_snapshot, ConsistencyValidator, ConsistencyValidatorApi};
use lk_tests::fixtures::{order, TestNode};
use serde_json::Value;

const STATUSES: [&str; 4] = ["pending", "paid", "shipped", "cancelled"];

fn seeded_node(documents: u32) -> TestNode {
    let node = TestNode::new("node1");
    let repo = node.repository();
    for id in 0..documents {
        let (key, doc) = order(id, STATUSES[id as usize % STATUSES.len()], "eu", u64::from(id));
        if repo.save("order", &key, &doc).is_err() {
            break;
        }
    }
    node
}

// ============================================================================
// LK-01: Envelope Store
// ============================================================================

fn bench_envelope_batch_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("lk-01-envelope-store");
    group.measurement_time(Duration::from_secs(5));

    for size in [10u32, 100, 1000] {
        let entries: BTreeMap<String, Value> = (0..size).map(|id| order(id, "paid", "eu", 1)).collect();

        group.throughput(Throughput::Elements(u64::from(size)));
        group.bench_with_input(BenchmarkId::new("batch_insert", size), &entries, |b, entries| {
            b.iter(|| {
                let node = TestNode::new("node1");
                black_box(node.envelopes.batch_insert(entries).is_ok())
            })
        });
    }

    let node = seeded_node(1000);
    group.bench_function("verify_integrity", |b| {
        b.iter(|| black_box(node.envelopes.verify_integrity("order:00500").ok()))
    });

    group.finish();
}

// ============================================================================
// LK-02: Index Engine
// ============================================================================

fn bench_index_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("lk-02-index-engine");

    for documents in [1_000u32, 10_000] {
        let node = seeded_node(documents);
        group.bench_with_input(BenchmarkId::new("search_by_index", documents), &node, |b, node| {
            b.iter(|| black_box(node.indexes.search_by_index("order", "status", "Paid").map(|hits| hits.len())))
        });
        group.bench_with_input(BenchmarkId::new("get_by_index", documents), &node, |b, node| {
            b.iter(|| black_box(node.indexes.get_by_index("order", "status", "paid").map(|docs| docs.len())))
        });
    }

    group.finish();
}

// ============================================================================
// LK-03: Consistency
// ============================================================================

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("lk-03-consistency");
    group.sample_size(20);

    let node = seeded_node(5_000);
    let mut snapshot = Vec::new();
    if export_snapshot(&node.kv, &mut snapshot).is_err() {
        return;
    }
    let Ok(copy) = load_snapshot(snapshot.as_slice()) else {
        return;
    };
    let validator = ConsistencyValidator::default();

    group.bench_function("validate_identical_5000", |b| {
        b.iter(|| black_box(validator.validate(&node.kv, &copy).map(|r| r.checked)))
    });
    group.bench_function("export_5000", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(snapshot.len());
            black_box(export_snapshot(&node.kv, &mut out).map(|s| s.exported))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_envelope_batch_insert, bench_index_search, bench_validate);
criterion_main!(benches);
