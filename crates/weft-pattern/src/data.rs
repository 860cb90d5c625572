//! Loading and merging of pattern data files.
//!
//! Data lives beside templates as JSON or YAML. All formats funnel into
//! one in-memory shape, `serde_json::Map`, so the cascade never cares
//! which file format a value came from.

use std::fs;
use std::path::Path;

use serde_json::Value;

/// The in-memory shape of all pattern data.
pub type DataMap = serde_json::Map<String, Value>;

/// Recognized data file extensions, in probe order.
pub const DATA_EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Failed to read data file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse data file {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Data file {0} must contain a top-level mapping")]
    NotAMapping(String),
}

/// Whether a path carries one of the recognized data extensions.
pub fn is_data_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| DATA_EXTENSIONS.contains(&ext))
}

/// Load a JSON or YAML data file into a map.
///
/// An empty or `null` document is an empty map. Any other non-mapping
/// top level is rejected.
pub fn load_data_file(path: &Path) -> Result<DataMap, DataError> {
    let raw = fs::read_to_string(path).map_err(|source| DataError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let parsed: Value = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&raw).map_err(|err| DataError::Parse {
            path: path.display().to_string(),
            message: err.to_string(),
        })?,
        _ => serde_yaml::from_str(&raw).map_err(|err| DataError::Parse {
            path: path.display().to_string(),
            message: err.to_string(),
        })?,
    };

    match parsed {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(DataMap::new()),
        _ => Err(DataError::NotAMapping(path.display().to_string())),
    }
}

/// Merge `incoming` into `target`, recursing through nested objects.
///
/// Incoming wins on conflict. Arrays and scalars replace wholesale; only
/// objects merge key by key.
pub fn deep_merge(target: &mut DataMap, incoming: DataMap) {
    for (key, value) in incoming {
        match (target.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(update)) => {
                deep_merge(existing, update);
            }
            (_, value) => {
                target.insert(key, value);
            }
        }
    }
}
