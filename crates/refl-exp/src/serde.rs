//! JSON and YAML encoding of plans and reports, and their content hashes.

use refl_core::errors::{ErrorInfo, ReflError};
use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};

fn serde_error(code: &str, err: impl ToString) -> ReflError {
    ReflError::Serde(ErrorInfo::new(code, err.to_string()))
}

/// Compact JSON with object keys sorted at every depth.
///
/// Going through [`serde_json::Value`] sorts keys because its map is a
/// `BTreeMap` (the `preserve_order` feature is not enabled).
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, ReflError> {
    let value = serde_json::to_value(value).map_err(|err| serde_error("json-serialize", err))?;
    serde_json::to_vec(&value).map_err(|err| serde_error("json-write", err))
}

/// Decodes JSON.
pub fn from_json_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, ReflError> {
    serde_json::from_slice(data).map_err(|err| serde_error("json-deserialize", err))
}

/// Encodes YAML.
pub fn to_yaml_string<T: Serialize>(value: &T) -> Result<String, ReflError> {
    serde_yaml::to_string(value).map_err(|err| serde_error("yaml-serialize", err))
}

/// Decodes YAML.
pub fn from_yaml_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, ReflError> {
    serde_yaml::from_slice(data).map_err(|err| serde_error("yaml-deserialize", err))
}

/// Hex SHA-256 of the canonical JSON of `value`.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, ReflError> {
    let digest = Sha256::digest(to_canonical_json_bytes(value)?);
    Ok(format!("{digest:x}"))
}
