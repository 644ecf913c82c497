//! Payload and manifest file loading.
//!
//! All file reads in the stack go through these functions so missing files
//! and parse failures carry the offending path. Payload files are JSON;
//! the source manifest is YAML.
//!
//! ## Payload envelope tolerance
//!
//! Dump files usually hold the payload array directly, but rows exported
//! straight from the raw store wrap it as `{"payload_json": [...]}`. Both
//! shapes are accepted.

use std::path::Path;

use serde_json::Value;

use crate::error::{PackError, PackResult};

/// Read a file to a string, mapping NotFound to a path-carrying error.
fn read_file(path: &Path) -> PackResult<String> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PackError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            PackError::Io(e)
        }
    })
}

/// Load a JSON file and return it as a `serde_json::Value`.
pub fn load_json_value(path: &Path) -> PackResult<Value> {
    let content = read_file(path)?;
    serde_json::from_str(&content).map_err(|e| PackError::JsonParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load a JSON file into a strongly-typed struct.
pub fn load_json_typed<T: serde::de::DeserializeOwned>(path: &Path) -> PackResult<T> {
    let content = read_file(path)?;
    serde_json::from_str(&content).map_err(|e| PackError::JsonParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load a YAML file into a strongly-typed struct.
pub fn load_yaml_typed<T: serde::de::DeserializeOwned>(path: &Path) -> PackResult<T> {
    let content = read_file(path)?;
    serde_yaml::from_str(&content).map_err(|e| PackError::YamlParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load a payload file as a sequence of raw record values.
///
/// Accepts either a top-level JSON array or an object whose `payload_json`
/// field holds the array.
pub fn load_payload_values(path: &Path) -> PackResult<Vec<Value>> {
    let value = load_json_value(path)?;
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("payload_json") {
            Some(Value::Array(items)) => Ok(items),
            Some(_) => Err(PackError::UnexpectedPayloadShape {
                path: path.to_path_buf(),
                detail: "payload_json is not an array".to_string(),
            }),
            None => Err(PackError::UnexpectedPayloadShape {
                path: path.to_path_buf(),
                detail: "expected an array or an object with payload_json".to_string(),
            }),
        },
        _ => Err(PackError::UnexpectedPayloadShape {
            path: path.to_path_buf(),
            detail: "expected an array".to_string(),
        }),
    }
}
