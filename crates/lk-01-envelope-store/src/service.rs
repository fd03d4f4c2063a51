//! # Envelope Store Service
//!
//! Implements `EnvelopeStoreApi` over any `KeyValueStore`.

use std::collections::BTreeMap;
use std::ops::ControlFlow;

use serde::Serialize;
use shared_kv::is_system_key;
use tracing::{debug, info, warn};

use crate::domain::envelope::{Envelope, EnvelopeStoreConfig};
use crate::domain::errors::EnvelopeError;
use crate::ports::inbound::EnvelopeStoreApi;
use crate::ports::outbound::{BatchOperation, KeyValueStore, SystemTimeSource, TimeSource};

/// The Envelope Store.
pub struct EnvelopeStore<KV, TS = SystemTimeSource>
where
    KV: KeyValueStore,
    TS: TimeSource,
{
    kv_store: KV,
    time_source: TS,
    config: EnvelopeStoreConfig,
}

impl<KV: KeyValueStore> EnvelopeStore<KV, SystemTimeSource> {
    /// Store stamping envelopes with the wall clock.
    pub fn with_system_clock(kv_store: KV, config: EnvelopeStoreConfig) -> Self {
        Self::new(kv_store, SystemTimeSource, config)
    }
}

impl<KV, TS> EnvelopeStore<KV, TS>
where
    KV: KeyValueStore,
    TS: TimeSource,
{
    pub fn new(kv_store: KV, time_source: TS, config: EnvelopeStoreConfig) -> Self {
        Self {
            kv_store,
            time_source,
            config,
        }
    }

    /// The underlying substrate.
    pub fn kv_store(&self) -> &KV {
        &self.kv_store
    }

    pub fn node_id(&self) -> &str {
        &self.config.node_id
    }

    /// Envelope bytes for `document`, without writing them.
    ///
    /// Used to compose an envelope write into a larger atomic batch.
    pub fn seal<D>(&self, key: &str, document: &D) -> Result<Vec<u8>, EnvelopeError>
    where
        D: Serialize + ?Sized,
    {
        Envelope::seal(document, self.time_source.now(), self.config.node_id.as_str())
            .and_then(|envelope| envelope.to_bytes())
            .map_err(|source| EnvelopeError::Serialization {
                key: key.to_string(),
                source,
            })
    }

    /// Read the envelope at `key`, `None` when absent.
    pub fn try_get(&self, key: &str) -> Result<Option<Envelope>, EnvelopeError> {
        read_envelope(&self.kv_store, key)
    }
}

/// Read and parse the envelope stored at `key` in any substrate.
///
/// `Ok(None)` when the key is absent; `Deserialization` when the stored
/// bytes are not an envelope.
pub fn read_envelope<KV>(kv_store: &KV, key: &str) -> Result<Option<Envelope>, EnvelopeError>
where
    KV: KeyValueStore + ?Sized,
{
    let Some(bytes) = kv_store
        .get(key.as_bytes())
        .map_err(|e| EnvelopeError::storage("get", key, e))?
    else {
        return Ok(None);
    };

    Envelope::from_bytes(&bytes)
        .map(Some)
        .map_err(|source| EnvelopeError::Deserialization {
            key: key.to_string(),
            source,
        })
}

impl<KV, TS> EnvelopeStoreApi for EnvelopeStore<KV, TS>
where
    KV: KeyValueStore,
    TS: TimeSource,
{
    fn put<D>(&self, key: &str, document: &D) -> Result<(), EnvelopeError>
    where
        D: Serialize + ?Sized,
    {
        let bytes = self.seal(key, document)?;
        self.kv_store
            .put(key.as_bytes(), &bytes)
            .map_err(|e| EnvelopeError::storage("put", key, e))?;

        debug!(key, size = bytes.len(), "Stored envelope");
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Envelope, EnvelopeError> {
        self.try_get(key)?.ok_or_else(|| EnvelopeError::NotFound {
            key: key.to_string(),
        })
    }

    fn delete(&self, key: &str) -> Result<(), EnvelopeError> {
        self.kv_store
            .delete(key.as_bytes())
            .map_err(|e| EnvelopeError::storage("delete", key, e))?;

        debug!(key, "Deleted envelope");
        Ok(())
    }

    fn batch_insert<D>(&self, entries: &BTreeMap<String, D>) -> Result<(), EnvelopeError>
    where
        D: Serialize,
    {
        if entries.is_empty() {
            return Ok(());
        }

        let mut operations = Vec::with_capacity(entries.len());
        for (key, document) in entries {
            operations.push(BatchOperation::put(key.as_bytes(), self.seal(key, document)?));
        }

        let first_key = entries.keys().next().map(String::as_str).unwrap_or_default();
        self.kv_store
            .atomic_batch_write(operations)
            .map_err(|e| EnvelopeError::storage("batch_insert", first_key, e))?;

        info!(entries = entries.len(), node = %self.config.node_id, "Batch inserted envelopes");
        Ok(())
    }

    fn count(&self) -> Result<usize, EnvelopeError> {
        let mut count = 0usize;
        self.kv_store
            .visit_prefix(b"", &mut |key, _| {
                if !is_system_key(key) {
                    count += 1;
                }
                ControlFlow::Continue(())
            })
            .map_err(|e| EnvelopeError::storage("count", "", e))?;
        Ok(count)
    }

    fn verify_integrity(&self, key: &str) -> Result<bool, EnvelopeError> {
        let envelope = self.get(key)?;
        let intact = envelope.verify();
        if !intact {
            warn!(
                key,
                stored_digest = envelope.integrity_digest(),
                node = envelope.origin_node(),
                "Envelope digest mismatch"
            );
        }
        Ok(intact)
    }
}
