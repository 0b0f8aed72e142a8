//! Canonical JSON encoding and content hashes of run artifacts.
//!
//! Object keys are sorted at every depth and the output is compact, so two
//! equal values always encode to the same bytes.

use rl_core::errors::{ErrorInfo, RlError};
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

fn sort_keys(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = std::mem::take(map).into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            for (key, mut child) in entries {
                sort_keys(&mut child);
                map.insert(key, child);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(sort_keys),
        _ => {}
    }
}

/// Key-sorted compact JSON of `value`.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, RlError> {
    let mut tree = serde_json::to_value(value)
        .map_err(|err| RlError::Serde(ErrorInfo::new("canonical-encode", err.to_string())))?;
    sort_keys(&mut tree);
    serde_json::to_vec(&tree)
        .map_err(|err| RlError::Serde(ErrorInfo::new("canonical-write", err.to_string())))
}

/// Lowercase hex SHA-256 of the canonical JSON of `value`.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, RlError> {
    let digest = Sha256::digest(to_canonical_json_bytes(value)?);
    Ok(format!("{:x}", digest))
}
