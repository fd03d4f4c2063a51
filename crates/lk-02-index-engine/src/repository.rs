//! # Document Repository
//!
//! Writes a document and its index delta as one atomic batch, so the index
//! invariant cannot be forgotten by a caller:
//!
//! ```text
//! save(order, order:1, {status: shipped})
//!   batch [ put    order:1                                <- envelope
//!           delete idx:order:status:pending:order:1       <- old entries
//!           put    idx:order:status:shipped:order:1 ]     <- new entries
//! ```
//!
//! Callers that need the manual mode use `envelopes()` and `indexes()`
//! directly.

use lk_01_envelope_store::{
    Envelope, EnvelopeError, EnvelopeStore, EnvelopeStoreApi, EnvelopeStoreConfig, TimeSource,
};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::domain::errors::IndexError;
use crate::ports::inbound::{IndexEngineApi, IndexedDocument};
use crate::ports::outbound::{BatchOperation, KeyValueStore};
use crate::service::IndexEngine;

/// Envelope Store and Index Engine sharing one substrate.
pub struct DocumentRepository<KV, TS>
where
    KV: KeyValueStore + Clone,
    TS: TimeSource,
{
    envelopes: EnvelopeStore<KV, TS>,
    indexes: IndexEngine<KV>,
}

impl<KV, TS> DocumentRepository<KV, TS>
where
    KV: KeyValueStore + Clone,
    TS: TimeSource,
{
    pub fn new(kv_store: KV, time_source: TS, config: EnvelopeStoreConfig) -> Self {
        Self {
            indexes: IndexEngine::new(kv_store.clone()),
            envelopes: EnvelopeStore::new(kv_store, time_source, config),
        }
    }

    pub fn envelopes(&self) -> &EnvelopeStore<KV, TS> {
        &self.envelopes
    }

    pub fn indexes(&self) -> &IndexEngine<KV> {
        &self.indexes
    }

    /// Store `document` at `key` and re-index it, atomically.
    ///
    /// `document` must be a JSON object. Entries derived from the previous
    /// version (if any) are removed in the same batch.
    pub fn save(&self, record_type: &str, key: &str, document: &Value) -> Result<(), IndexError> {
        let Value::Object(new_fields) = document else {
            return Err(IndexError::InvalidArgument {
                operation: "save",
                reason: format!("document for '{key}' is not a JSON object"),
            });
        };

        let old_fields = self.current_fields(key)?;
        let mut operations = vec![BatchOperation::put(key.as_bytes(), self.envelopes.seal(key, document)?)];
        operations.extend(self.indexes.index_delta(
            "save",
            record_type,
            key,
            old_fields.as_ref(),
            Some(new_fields),
        )?);

        let count = operations.len();
        self.envelopes
            .kv_store()
            .atomic_batch_write(operations)
            .map_err(|e| IndexError::Storage {
                operation: "save",
                target: key.to_string(),
                source: e,
            })?;

        debug!(record_type, key, operations = count, "Saved document");
        Ok(())
    }

    /// Delete the document at `key` and all of its index entries, atomically.
    ///
    /// Returns `false` when nothing was stored at `key`.
    pub fn remove(&self, record_type: &str, key: &str) -> Result<bool, IndexError> {
        let Some(envelope) = self.envelopes.try_get(key)? else {
            return Ok(false);
        };

        let mut operations = vec![BatchOperation::delete(key.as_bytes())];
        if let Some(old_fields) = object_of(&envelope, key) {
            operations.extend(self.indexes.index_delta("remove", record_type, key, Some(&old_fields), None)?);
        }

        self.envelopes
            .kv_store()
            .atomic_batch_write(operations)
            .map_err(|e| IndexError::Storage {
                operation: "remove",
                target: key.to_string(),
                source: e,
            })?;

        debug!(record_type, key, "Removed document");
        Ok(true)
    }

    pub fn get(&self, key: &str) -> Result<Envelope, EnvelopeError> {
        self.envelopes.get(key)
    }

    /// Best-effort lookup by indexed field.
    pub fn find(&self, record_type: &str, field: &str, value: &str) -> Result<Vec<IndexedDocument>, IndexError> {
        self.indexes.get_by_index(record_type, field, value)
    }

    fn current_fields(&self, key: &str) -> Result<Option<Map<String, Value>>, IndexError> {
        match self.envelopes.try_get(key) {
            Ok(Some(envelope)) => Ok(object_of(&envelope, key)),
            Ok(None) => Ok(None),
            // A corrupt previous version is replaced; its entries cannot be derived.
            Err(EnvelopeError::Deserialization { .. }) => {
                warn!(key, "Overwriting undecodable envelope; stale index entries may remain");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn object_of(envelope: &Envelope, key: &str) -> Option<Map<String, Value>> {
    match envelope.document() {
        Ok(Value::Object(fields)) => Some(fields),
        _ => {
            debug!(key, "Stored document is not an object; no index entries derived");
            None
        }
    }
}
