//! # Envelope
//!
//! The unit actually stored for a document key.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use super::digest::digest_hex;

/// Node id used when none is configured.
pub const DEFAULT_NODE_ID: &str = "node1";

/// A document wrapped with its digest, write time and origin node.
///
/// `payload` holds the document JSON exactly as it was written, so the
/// digest can be recomputed over the same bytes it was taken from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "data")]
    payload: Box<RawValue>,
    #[serde(rename = "hash")]
    integrity_digest: String,
    #[serde(rename = "timestamp")]
    written_at: String,
    #[serde(rename = "node")]
    origin_node: String,
}

impl Envelope {
    /// Serialize `document` and wrap it.
    pub fn seal<D>(
        document: &D,
        written_at: DateTime<Utc>,
        origin_node: impl Into<String>,
    ) -> Result<Self, serde_json::Error>
    where
        D: Serialize + ?Sized,
    {
        let payload = serde_json::value::to_raw_value(document)?;
        let integrity_digest = digest_hex(payload.get().as_bytes());
        Ok(Self {
            payload,
            integrity_digest,
            written_at: written_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            origin_node: origin_node.into(),
        })
    }

    /// Parse stored bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Encode for storage.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// The stored document JSON, byte for byte.
    pub fn payload(&self) -> &str {
        self.payload.get()
    }

    pub fn integrity_digest(&self) -> &str {
        &self.integrity_digest
    }

    pub fn written_at(&self) -> &str {
        &self.written_at
    }

    /// Parsed write time, if the stored text is valid RFC 3339.
    pub fn written_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.written_at)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }

    pub fn origin_node(&self) -> &str {
        &self.origin_node
    }

    /// Recompute the digest over the payload and compare.
    pub fn verify(&self) -> bool {
        digest_hex(self.payload().as_bytes()) == self.integrity_digest
    }

    /// Deserialize the payload into a caller type.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(self.payload())
    }

    /// The payload as a generic JSON value.
    pub fn document(&self) -> Result<serde_json::Value, serde_json::Error> {
        self.decode()
    }
}

/// Envelope Store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeStoreConfig {
    /// Stamped into the `node` field of every envelope this store writes.
    pub node_id: String,
}

impl Default for EnvelopeStoreConfig {
    fn default() -> Self {
        Self {
            node_id: DEFAULT_NODE_ID.to_string(),
        }
    }
}

impl EnvelopeStoreConfig {
    pub fn for_node(node_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
        }
    }
}
