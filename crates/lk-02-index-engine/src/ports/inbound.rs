//! # Inbound Ports (Driving Ports)
//!
//! The primary API for the Index Engine.

use std::collections::BTreeMap;

use lk_01_envelope_store::Envelope;
use serde_json::{Map, Value};

use crate::domain::errors::IndexError;

/// A document resolved through an index.
#[derive(Debug, Clone)]
pub struct IndexedDocument {
    pub primary_key: String,
    pub envelope: Envelope,
}

/// Equality indexes over document fields.
///
/// Values are normalized on both write and lookup. Record types and field
/// names are validated before any write (`InvalidArgument`).
pub trait IndexEngineApi {
    /// Write one index entry. Re-creating an existing entry is a no-op.
    fn create_index(
        &self,
        record_type: &str,
        field: &str,
        value: &str,
        primary_key: &str,
    ) -> Result<(), IndexError>;

    /// Primary keys indexed under `value`, in substrate key order.
    ///
    /// Returns an empty vector when nothing matches.
    fn search_by_index(
        &self,
        record_type: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<String>, IndexError>;

    /// `search_by_index` then a best-effort read of each document.
    ///
    /// Targets that are missing or not valid envelopes are skipped.
    /// Substrate failures are still returned.
    fn get_by_index(
        &self,
        record_type: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<IndexedDocument>, IndexError>;

    /// Like `get_by_index`, but the first unresolvable target is an error.
    fn get_by_index_strict(
        &self,
        record_type: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<IndexedDocument>, IndexError>;

    /// Number of primary keys indexed under `value`.
    fn count_by_index(&self, record_type: &str, field: &str, value: &str) -> Result<usize, IndexError>;

    /// Move `primary_key`'s entries from `old_fields` to `new_fields`.
    ///
    /// Entries for every indexable field of `old_fields` are deleted and
    /// entries for every indexable field of `new_fields` created, in one
    /// atomic batch.
    fn update_indexes(
        &self,
        record_type: &str,
        primary_key: &str,
        old_fields: Option<&Map<String, Value>>,
        new_fields: Option<&Map<String, Value>>,
    ) -> Result<(), IndexError>;

    /// Delete the entry of every indexable field in `fields`.
    fn delete_indexes(
        &self,
        record_type: &str,
        primary_key: &str,
        fields: &Map<String, Value>,
    ) -> Result<(), IndexError>;

    /// Number of entries per distinct normalized value of `field`.
    fn list_indexes(&self, record_type: &str, field: &str) -> Result<BTreeMap<String, usize>, IndexError>;

    /// Write one composite entry. `fields` order is part of the index identity.
    fn create_composite_index(
        &self,
        record_type: &str,
        fields: &[&str],
        values: &[&str],
        primary_key: &str,
    ) -> Result<(), IndexError>;

    /// Primary keys indexed under the composite `values`.
    fn search_by_composite_index(
        &self,
        record_type: &str,
        fields: &[&str],
        values: &[&str],
    ) -> Result<Vec<String>, IndexError>;
}
