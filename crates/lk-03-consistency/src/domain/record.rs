//! # Replication Record
//!
//! One exported key/value pair:
//!
//! ```text
//! {"key": "order:00001", "value": {"data": {...}, "hash": "...", ...}}
//! {"key": "idx:order:status:paid:order:00001", "raw_value": "b3JkZXI6MDAwMDE=", "is_raw": true}
//! ```
//!
//! `value` carries the stored JSON verbatim. Index entries, and any value
//! whose bytes would not survive a trip through JSON text unchanged, travel
//! as standard base64 in `raw_value`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use super::compare::is_index_key;
use super::errors::ReplicationError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicationRecord {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Box<RawValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_value: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_raw: bool,
}

impl ReplicationRecord {
    /// Encode a stored entry. `None` when the key is not UTF-8 and so cannot
    /// be carried in the `key` field.
    pub fn from_entry(key: &[u8], value: &[u8]) -> Option<Self> {
        let key_text = std::str::from_utf8(key).ok()?.to_string();

        let json = (!is_index_key(key))
            .then(|| std::str::from_utf8(value).ok())
            .flatten()
            .and_then(|text| RawValue::from_string(text.to_string()).ok())
            // Surrounding whitespace is dropped by RawValue; keep exact bytes instead.
            .filter(|raw| raw.get().as_bytes() == value)
            // A literal `null` would read back as an absent `value`.
            .filter(|raw| raw.get() != "null");

        Some(match json {
            Some(raw) => Self {
                key: key_text,
                value: Some(raw),
                raw_value: None,
                is_raw: false,
            },
            None => Self {
                key: key_text,
                value: None,
                raw_value: Some(STANDARD.encode(value)),
                is_raw: true,
            },
        })
    }

    /// Decode back into the stored bytes. `index` is the record's position,
    /// used for error context.
    pub fn into_entry(self, index: usize) -> Result<(Vec<u8>, Vec<u8>), ReplicationError> {
        let invalid = |key: &str, reason: String| ReplicationError::InvalidRecord {
            index,
            key: key.to_string(),
            reason,
        };

        if self.key.is_empty() {
            return Err(invalid("", "empty key".to_string()));
        }

        let value = if self.is_raw {
            let encoded = self
                .raw_value
                .as_deref()
                .ok_or_else(|| invalid(&self.key, "is_raw set without raw_value".to_string()))?;
            STANDARD
                .decode(encoded)
                .map_err(|e| invalid(&self.key, format!("bad base64: {e}")))?
        } else {
            let raw = self
                .value
                .as_ref()
                .ok_or_else(|| invalid(&self.key, "record has no value".to_string()))?;
            raw.get().as_bytes().to_vec()
        };

        Ok((self.key.into_bytes(), value))
    }
}
