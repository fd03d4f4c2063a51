//! # Index Key Encoding
//!
//! ```text
//! idx:<recordType>:<field>:<normalizedValue>:<primaryKey>
//! ```
//!
//! Record types and field names may not contain `:`. Normalized values and
//! primary keys may, which is why lookups compare the scan remainder against
//! the stored primary key instead of splitting on `:`.

use super::errors::IndexError;

/// Every index entry lives under this prefix.
pub const INDEX_NAMESPACE: &str = "idx:";

/// Joins composite field names and composite values.
pub const COMPOSITE_SEPARATOR: &str = "-";

const KEY_SEPARATOR: char = ':';

/// Trim surrounding whitespace and lower-case.
pub fn normalize_value(value: &str) -> String {
    value.trim().to_lowercase()
}

/// A fully-resolved index entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexKey {
    pub record_type: String,
    pub field: String,
    pub normalized_value: String,
    pub primary_key: String,
}

impl IndexKey {
    /// Build an entry, normalizing `value`.
    pub fn new(record_type: &str, field: &str, value: &str, primary_key: &str) -> Self {
        Self {
            record_type: record_type.to_string(),
            field: field.to_string(),
            normalized_value: normalize_value(value),
            primary_key: primary_key.to_string(),
        }
    }

    /// The substrate key.
    pub fn encode(&self) -> Vec<u8> {
        let mut key = search_prefix(&self.record_type, &self.field, &self.normalized_value);
        key.push_str(&self.primary_key);
        key.into_bytes()
    }

    /// The substrate value: the primary key.
    pub fn target(&self) -> &[u8] {
        self.primary_key.as_bytes()
    }
}

/// `idx:<recordType>:<field>:<normalizedValue>:`
pub fn search_prefix(record_type: &str, field: &str, normalized_value: &str) -> String {
    format!("{INDEX_NAMESPACE}{record_type}:{field}:{normalized_value}:")
}

/// `idx:<recordType>:<field>:`
pub fn field_prefix(record_type: &str, field: &str) -> String {
    format!("{INDEX_NAMESPACE}{record_type}:{field}:")
}

/// Field names joined in caller order: `["status", "region"]` -> `status-region`.
pub fn composite_field<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(COMPOSITE_SEPARATOR)
}

/// Values normalized then joined in caller order.
pub fn composite_value<S: AsRef<str>>(values: &[S]) -> String {
    values
        .iter()
        .map(|v| normalize_value(v.as_ref()))
        .collect::<Vec<_>>()
        .join(COMPOSITE_SEPARATOR)
}

/// If `key` is an index entry under `prefix` pointing at `primary_key`,
/// return the normalized value it encodes.
pub fn value_of_entry<'k>(key: &'k [u8], prefix: &[u8], primary_key: &[u8]) -> Option<&'k [u8]> {
    let remainder = key.strip_prefix(prefix)?;
    let value = remainder.strip_suffix(primary_key)?;
    value.strip_suffix(&[KEY_SEPARATOR as u8])
}

/// Reject record types and field names that would corrupt the key layout.
pub(crate) fn check_name(operation: &'static str, what: &str, name: &str) -> Result<(), IndexError> {
    if name.is_empty() {
        return Err(IndexError::invalid(operation, format!("{what} must not be empty")));
    }
    if name.contains(KEY_SEPARATOR) {
        return Err(IndexError::invalid(
            operation,
            format!("{what} '{name}' must not contain '{KEY_SEPARATOR}'"),
        ));
    }
    Ok(())
}

pub(crate) fn check_primary_key(operation: &'static str, primary_key: &str) -> Result<(), IndexError> {
    if primary_key.is_empty() {
        return Err(IndexError::invalid(operation, "primary key must not be empty"));
    }
    Ok(())
}

/// Validate a composite field list against its values.
pub(crate) fn check_composite<F: AsRef<str>, V: AsRef<str>>(
    operation: &'static str,
    fields: &[F],
    values: &[V],
) -> Result<(), IndexError> {
    if fields.is_empty() {
        return Err(IndexError::invalid(operation, "composite index needs at least one field"));
    }
    if fields.len() != values.len() {
        return Err(IndexError::invalid(
            operation,
            format!("{} fields but {} values", fields.len(), values.len()),
        ));
    }
    for field in fields {
        let field = field.as_ref();
        check_name(operation, "field", field)?;
        // ["a-b", "c"] and ["a", "b-c"] would share one joined name.
        if field.contains(COMPOSITE_SEPARATOR) {
            return Err(IndexError::invalid(
                operation,
                format!("composite field '{field}' must not contain '{COMPOSITE_SEPARATOR}'"),
            ));
        }
    }
    Ok(())
}
