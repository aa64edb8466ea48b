use std::fs;
use std::path::Path;

use crate::errors::{ConfigError, DeparturesError, Result};

/// Serializes a value to pretty JSON with canonical error handling.
pub fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| DeparturesError::SerializationError(err.to_string()))
}

/// Reads and deserializes a JSON file, reporting the offending path on failure.
pub fn read_json_file<T: serde::de::DeserializeOwned>(
    path: impl AsRef<Path>,
) -> std::result::Result<T, ConfigError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|err| ConfigError::from_io(path, err))?;
    serde_json::from_str(&raw).map_err(|err| ConfigError::parse_error(path, err.to_string()))
}
