use bed_core::errors::{BedError, ErrorInfo};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Hex SHA-256 of the canonical JSON encoding of `value`. Object keys are
/// sorted, so the digest does not depend on field order.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, BedError> {
    let canonical = serde_json::to_value(value)
        .and_then(|value| serde_json::to_vec(&value))
        .map_err(|err| BedError::Serde(ErrorInfo::new("json-encode", err.to_string())))?;
    Ok(format!("{:x}", Sha256::digest(canonical)))
}
