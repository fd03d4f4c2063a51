//! Value comparison rules.
//!
//! Index entries compare byte-for-byte. Everything else compares
//! semantically when both sides parse as JSON: each side is re-serialized
//! through `serde_json::Value` (object keys sorted, every number reduced to
//! its `f64` value) and the results compared. `1000`, `1000.0` and `1e3` are
//! the same value. Values that do not parse fall back to byte equality.

use lk_02_index_engine::INDEX_NAMESPACE;
use serde_json::{Number, Value};

/// Largest magnitude below which every integer is exact in an `f64`.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Canonical JSON encoding of `bytes`, if they are JSON at all.
pub fn canonical_json(bytes: &[u8]) -> Option<Vec<u8>> {
    let mut value: Value = serde_json::from_slice(bytes).ok()?;
    canonicalize_numbers(&mut value);
    serde_json::to_vec(&value).ok()
}

/// Rewrite every number to one spelling of its `f64` value: integral values
/// in exact range as integers, everything else as a float.
fn canonicalize_numbers(value: &mut Value) {
    match value {
        Value::Number(n) => {
            if let Some(canonical) = n.as_f64().and_then(canonical_number) {
                *n = canonical;
            }
        }
        Value::Array(items) => items.iter_mut().for_each(canonicalize_numbers),
        Value::Object(fields) => fields.values_mut().for_each(canonicalize_numbers),
        Value::Null | Value::Bool(_) | Value::String(_) => {}
    }
}

fn canonical_number(f: f64) -> Option<Number> {
    if f.fract() == 0.0 && f.abs() < MAX_EXACT_INTEGER {
        // -0.0 lands here too and becomes 0.
        Some(Number::from(f as i64))
    } else {
        Number::from_f64(f)
    }
}

pub fn is_index_key(key: &[u8]) -> bool {
    key.starts_with(INDEX_NAMESPACE.as_bytes())
}

/// Whether the values stored at `key` on two nodes agree.
pub fn values_match(key: &[u8], a: &[u8], b: &[u8]) -> bool {
    if a == b {
        return true;
    }
    if is_index_key(key) {
        return false;
    }
    match (canonical_json(a), canonical_json(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
