//! Which document fields are indexed, and how their values become text.

use serde_json::Value;

/// Envelope fields plus the document-type discriminator.
pub const NON_INDEXABLE_FIELDS: [&str; 5] = ["data", "hash", "timestamp", "node", "ledger_type"];

pub fn is_indexable_field(field: &str) -> bool {
    !NON_INDEXABLE_FIELDS.contains(&field)
}

/// Text form of a scalar field value, before normalization.
///
/// Strings are taken verbatim; numbers and booleans by their JSON text.
/// `null`, arrays and objects are not indexable and yield `None`.
pub fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
