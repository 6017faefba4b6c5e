//! Reading and writing JSON documents.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{Result, SchemaError};

/// Reads and parses a JSON document.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid JSON.
pub fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| SchemaError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `value` as pretty-printed JSON with a trailing newline, creating
/// parent directories as needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot be written.
pub fn write_json(path: &Path, value: &Value) -> Result<()> {
    let io_err = |source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let mut text = serde_json::to_string_pretty(value).map_err(|source| SchemaError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    text.push('\n');
    fs::write(path, text).map_err(io_err)
}

/// Checks that `path` carries the extension `expected`.
///
/// # Errors
///
/// Returns [`SchemaError::UnexpectedExtension`] when the extension differs.
pub fn check_extension(path: &Path, expected: &'static str) -> Result<()> {
    if path.extension().is_some_and(|ext| ext == expected) {
        Ok(())
    } else {
        Err(SchemaError::UnexpectedExtension {
            path: path.to_path_buf(),
            expected,
        })
    }
}
