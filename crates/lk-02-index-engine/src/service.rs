//! # Index Engine Service
//!
//! Implements `IndexEngineApi` over any `KeyValueStore`.

use std::collections::BTreeMap;
use std::ops::ControlFlow;

use lk_01_envelope_store::{read_envelope, EnvelopeError};
use serde_json::{Map, Value};
use shared_kv::is_system_key;
use tracing::debug;

use crate::domain::errors::IndexError;
use crate::domain::fields::{field_text, is_indexable_field};
use crate::domain::keys::{
    check_composite, check_name, check_primary_key, composite_field, composite_value,
    field_prefix, normalize_value, search_prefix, value_of_entry, IndexKey,
};
use crate::ports::inbound::{IndexEngineApi, IndexedDocument};
use crate::ports::outbound::{BatchOperation, KeyValueStore};

/// The Index Engine.
pub struct IndexEngine<KV: KeyValueStore> {
    kv_store: KV,
}

impl<KV: KeyValueStore> IndexEngine<KV> {
    pub fn new(kv_store: KV) -> Self {
        Self { kv_store }
    }

    pub fn kv_store(&self) -> &KV {
        &self.kv_store
    }

    /// Entries for every indexable scalar field of `fields`.
    pub fn entries_for(
        &self,
        operation: &'static str,
        record_type: &str,
        primary_key: &str,
        fields: &Map<String, Value>,
    ) -> Result<Vec<IndexKey>, IndexError> {
        let mut entries = Vec::new();
        for (field, value) in fields {
            if !is_indexable_field(field) {
                continue;
            }
            let Some(text) = field_text(value) else {
                continue;
            };
            check_name(operation, "field", field)?;
            entries.push(IndexKey::new(record_type, field, &text, primary_key));
        }
        Ok(entries)
    }

    /// Batch operations moving `primary_key` from `old_fields` to `new_fields`.
    ///
    /// Deletes come first so an unchanged field ends up re-put, not deleted.
    pub fn index_delta(
        &self,
        operation: &'static str,
        record_type: &str,
        primary_key: &str,
        old_fields: Option<&Map<String, Value>>,
        new_fields: Option<&Map<String, Value>>,
    ) -> Result<Vec<BatchOperation>, IndexError> {
        check_name(operation, "record type", record_type)?;
        check_primary_key(operation, primary_key)?;

        let mut operations = Vec::new();
        if is_system_key(primary_key.as_bytes()) {
            debug!(operation, primary_key, "System key is never indexed");
            return Ok(operations);
        }
        if let Some(old) = old_fields {
            for entry in self.entries_for(operation, record_type, primary_key, old)? {
                operations.push(BatchOperation::delete(entry.encode()));
            }
        }
        if let Some(new) = new_fields {
            for entry in self.entries_for(operation, record_type, primary_key, new)? {
                operations.push(BatchOperation::put(entry.encode(), entry.target()));
            }
        }
        Ok(operations)
    }

    fn apply(&self, operation: &'static str, primary_key: &str, operations: Vec<BatchOperation>) -> Result<(), IndexError> {
        if operations.is_empty() {
            return Ok(());
        }
        let count = operations.len();
        self.kv_store
            .atomic_batch_write(operations)
            .map_err(|e| IndexError::storage(operation, primary_key, e))?;
        debug!(operation, primary_key, entries = count, "Applied index batch");
        Ok(())
    }

    /// Primary keys whose entry sits exactly under `prefix`.
    fn scan_exact(&self, operation: &'static str, prefix: &str) -> Result<Vec<String>, IndexError> {
        let mut hits = Vec::new();
        self.kv_store
            .visit_prefix(prefix.as_bytes(), &mut |key, value| {
                if key[prefix.len()..] == *value && !is_system_key(value) {
                    match std::str::from_utf8(value) {
                        Ok(primary_key) => hits.push(primary_key.to_string()),
                        Err(_) => debug!(prefix, "Skipping index entry with non-UTF-8 target"),
                    }
                }
                ControlFlow::Continue(())
            })
            .map_err(|e| IndexError::storage(operation, prefix, e))?;
        Ok(hits)
    }

    fn resolve(
        &self,
        operation: &'static str,
        primary_keys: Vec<String>,
        strict: bool,
    ) -> Result<Vec<IndexedDocument>, IndexError> {
        let mut documents = Vec::with_capacity(primary_keys.len());
        for primary_key in primary_keys {
            let resolved = match read_envelope(&self.kv_store, &primary_key) {
                Ok(Some(envelope)) => Ok(envelope),
                Ok(None) => Err(EnvelopeError::NotFound {
                    key: primary_key.clone(),
                }),
                Err(EnvelopeError::Storage { source, .. }) => {
                    return Err(IndexError::storage(operation, primary_key, source));
                }
                Err(e) => Err(e),
            };

            match resolved {
                Ok(envelope) => documents.push(IndexedDocument {
                    primary_key,
                    envelope,
                }),
                Err(e) if strict => return Err(e.into()),
                Err(e) => debug!(error = %e, "Skipping unresolvable index target"),
            }
        }
        Ok(documents)
    }

    fn checked_search_prefix(
        &self,
        operation: &'static str,
        record_type: &str,
        field: &str,
        value: &str,
    ) -> Result<String, IndexError> {
        check_name(operation, "record type", record_type)?;
        check_name(operation, "field", field)?;
        Ok(search_prefix(record_type, field, &normalize_value(value)))
    }
}

impl<KV: KeyValueStore> IndexEngineApi for IndexEngine<KV> {
    fn create_index(
        &self,
        record_type: &str,
        field: &str,
        value: &str,
        primary_key: &str,
    ) -> Result<(), IndexError> {
        check_name("create_index", "record type", record_type)?;
        check_name("create_index", "field", field)?;
        check_primary_key("create_index", primary_key)?;
        if is_system_key(primary_key.as_bytes()) {
            debug!(primary_key, "System key is never indexed");
            return Ok(());
        }

        let entry = IndexKey::new(record_type, field, value, primary_key);
        self.kv_store
            .put(&entry.encode(), entry.target())
            .map_err(|e| IndexError::storage("create_index", primary_key, e))
    }

    fn search_by_index(
        &self,
        record_type: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<String>, IndexError> {
        let prefix = self.checked_search_prefix("search_by_index", record_type, field, value)?;
        self.scan_exact("search_by_index", &prefix)
    }

    fn get_by_index(
        &self,
        record_type: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<IndexedDocument>, IndexError> {
        let primary_keys = self.search_by_index(record_type, field, value)?;
        self.resolve("get_by_index", primary_keys, false)
    }

    fn get_by_index_strict(
        &self,
        record_type: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<IndexedDocument>, IndexError> {
        let primary_keys = self.search_by_index(record_type, field, value)?;
        self.resolve("get_by_index_strict", primary_keys, true)
    }

    fn count_by_index(&self, record_type: &str, field: &str, value: &str) -> Result<usize, IndexError> {
        Ok(self.search_by_index(record_type, field, value)?.len())
    }

    fn update_indexes(
        &self,
        record_type: &str,
        primary_key: &str,
        old_fields: Option<&Map<String, Value>>,
        new_fields: Option<&Map<String, Value>>,
    ) -> Result<(), IndexError> {
        let operations = self.index_delta("update_indexes", record_type, primary_key, old_fields, new_fields)?;
        self.apply("update_indexes", primary_key, operations)
    }

    fn delete_indexes(
        &self,
        record_type: &str,
        primary_key: &str,
        fields: &Map<String, Value>,
    ) -> Result<(), IndexError> {
        let operations = self.index_delta("delete_indexes", record_type, primary_key, Some(fields), None)?;
        self.apply("delete_indexes", primary_key, operations)
    }

    fn list_indexes(&self, record_type: &str, field: &str) -> Result<BTreeMap<String, usize>, IndexError> {
        check_name("list_indexes", "record type", record_type)?;
        check_name("list_indexes", "field", field)?;

        let prefix = field_prefix(record_type, field);
        let mut counts = BTreeMap::new();
        self.kv_store
            .visit_prefix(prefix.as_bytes(), &mut |key, value| {
                if is_system_key(value) {
                    return ControlFlow::Continue(());
                }
                if let Some(normalized) = value_of_entry(key, prefix.as_bytes(), value) {
                    *counts
                        .entry(String::from_utf8_lossy(normalized).into_owned())
                        .or_insert(0) += 1;
                }
                ControlFlow::Continue(())
            })
            .map_err(|e| IndexError::storage("list_indexes", prefix.as_str(), e))?;
        Ok(counts)
    }

    fn create_composite_index(
        &self,
        record_type: &str,
        fields: &[&str],
        values: &[&str],
        primary_key: &str,
    ) -> Result<(), IndexError> {
        check_name("create_composite_index", "record type", record_type)?;
        check_composite("create_composite_index", fields, values)?;
        check_primary_key("create_composite_index", primary_key)?;
        if is_system_key(primary_key.as_bytes()) {
            debug!(primary_key, "System key is never indexed");
            return Ok(());
        }

        // Values are already normalized by composite_value; IndexKey::new is a no-op on them.
        let entry = IndexKey::new(
            record_type,
            &composite_field(fields),
            &composite_value(values),
            primary_key,
        );
        self.kv_store
            .put(&entry.encode(), entry.target())
            .map_err(|e| IndexError::storage("create_composite_index", primary_key, e))
    }

    fn search_by_composite_index(
        &self,
        record_type: &str,
        fields: &[&str],
        values: &[&str],
    ) -> Result<Vec<String>, IndexError> {
        check_name("search_by_composite_index", "record type", record_type)?;
        check_composite("search_by_composite_index", fields, values)?;

        let prefix = search_prefix(record_type, &composite_field(fields), &composite_value(values));
        self.scan_exact("search_by_composite_index", &prefix)
    }
}
