//! # Key Namespaces
//!
//! Document keys follow `<type>:<id>` (e.g. `order:00001`). Keys starting
//! with [`SYSTEM_KEY_SENTINEL`] hold node metadata and are invisible to
//! counting, classification, indexing, export and validation.

/// First byte of every reserved system/metadata key.
pub const SYSTEM_KEY_SENTINEL: u8 = b'_';

/// Whether `key` is reserved for system metadata.
///
/// The empty key is reserved as well: it has no namespace and cannot be
/// produced by any document or index operation.
pub fn is_system_key(key: &[u8]) -> bool {
    match key.first() {
        None => true,
        Some(&first) => first == SYSTEM_KEY_SENTINEL,
    }
}

/// The `<type>` namespace of a `<type>:<id>` key, if it has one.
pub fn record_type_of(key: &str) -> Option<&str> {
    match key.split_once(':') {
        Some((record_type, _)) if !record_type.is_empty() => Some(record_type),
        _ => None,
    }
}
