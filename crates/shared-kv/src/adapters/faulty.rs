use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::errors::KVStoreError;
use crate::ports::outbound::{BatchOperation, KeyValueStore, ScanResult};

/// Wraps a store and fails writes on demand.
///
/// Failed writes never reach the inner store, which models an engine that
/// rejected the whole batch.
pub struct FaultInjectingStore<KV> {
    inner: KV,
    fail_batches: AtomicBool,
    fail_puts: AtomicBool,
}

impl<KV: KeyValueStore> FaultInjectingStore<KV> {
    pub fn new(inner: KV) -> Self {
        Self {
            inner,
            fail_batches: AtomicBool::new(false),
            fail_puts: AtomicBool::new(false),
        }
    }

    /// Make every subsequent batch write fail (or succeed again).
    pub fn fail_batches(&self, fail: bool) {
        self.fail_batches.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent single-key put fail (or succeed again).
    pub fn fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    pub fn inner(&self) -> &KV {
        &self.inner
    }
}

impl<KV: KeyValueStore> KeyValueStore for FaultInjectingStore<KV> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        self.inner.get(key)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(KVStoreError::io("injected put failure"));
        }
        self.inner.put(key, value)
    }

    fn delete(&self, key: &[u8]) -> Result<(), KVStoreError> {
        self.inner.delete(key)
    }

    fn atomic_batch_write(&self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        if self.fail_batches.load(Ordering::SeqCst) {
            return Err(KVStoreError::io("injected batch failure"));
        }
        self.inner.atomic_batch_write(operations)
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        self.inner.exists(key)
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError> {
        self.inner.prefix_scan(prefix)
    }
}
