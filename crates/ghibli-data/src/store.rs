//! Reading and writing JSON data files.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Errors that can occur while loading or saving data files.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Failed to read {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Failed to parse {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Failed to write {path}: {message}")]
    WriteError { path: String, message: String },
}

/// Read and deserialize a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DataError> {
    let content = fs::read_to_string(path).map_err(|e| DataError::ReadError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    serde_json::from_str(&content).map_err(|e| DataError::ParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Serialize a value as two-space indented JSON with a trailing newline.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), DataError> {
    let mut json = serde_json::to_string_pretty(value).map_err(|e| DataError::WriteError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    json.push('\n');

    fs::write(path, json).map_err(|e| DataError::WriteError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
