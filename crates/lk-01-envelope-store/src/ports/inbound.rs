//! # Inbound Ports (Driving Ports)
//!
//! The primary API for the Envelope Store.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::envelope::Envelope;
use crate::domain::errors::EnvelopeError;

/// Document CRUD with integrity envelopes.
///
/// Every operation is synchronous and issues at most one substrate write.
pub trait EnvelopeStoreApi {
    /// Wrap `document` and write it at `key`, replacing any previous envelope.
    ///
    /// ## Errors
    ///
    /// - `Serialization`: the document is not representable as JSON
    /// - `Storage`: the substrate write failed
    fn put<D>(&self, key: &str, document: &D) -> Result<(), EnvelopeError>
    where
        D: Serialize + ?Sized;

    /// Read the envelope at `key`.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: nothing stored at `key`
    /// - `Deserialization`: the stored bytes are not an envelope
    fn get(&self, key: &str) -> Result<Envelope, EnvelopeError>;

    /// Remove `key`. Succeeds when the key is already absent.
    fn delete(&self, key: &str) -> Result<(), EnvelopeError>;

    /// Write every entry in one atomic substrate batch.
    ///
    /// Fail-fast: the first document that cannot be serialized aborts the
    /// call before anything is written. An empty map is a no-op.
    fn batch_insert<D>(&self, entries: &BTreeMap<String, D>) -> Result<(), EnvelopeError>
    where
        D: Serialize;

    /// Number of non-system keys in the substrate (index entries included).
    fn count(&self) -> Result<usize, EnvelopeError>;

    /// Recompute the digest of the envelope at `key`.
    ///
    /// Returns `Ok(false)` on mismatch; the caller decides what to do.
    fn verify_integrity(&self, key: &str) -> Result<bool, EnvelopeError>;
}
