//! Index-mapping bootstrap helpers.
//!
//! The plugin creates its system indices from JSON mapping files that
//! carry their schema version under `_meta.schema_version`. These helpers
//! load and validate those files and expose the default index settings
//! used at creation time.

use std::path::Path;

use serde_json::{json, Value};

use crate::error::{Error, Result};
use crate::utils::strings::is_json;

/// Default settings for index creation: a single shard with auto-expand
/// replicas (0-1) for availability at minimal resource cost.
pub fn default_index_settings() -> Value {
    json!({
        "index.number_of_shards": "1",
        "index.auto_expand_replicas": "0-1",
    })
}

/// Settings for small, critical indices that need a replica on every
/// node (auto-expand 0-all). Increases storage and indexing load.
pub fn all_nodes_replica_index_settings() -> Value {
    json!({
        "index.number_of_shards": "1",
        "index.auto_expand_replicas": "0-all",
    })
}

// The updated variants omit static settings like shard count, which
// cannot change after index creation.

pub fn updated_default_index_settings() -> Value {
    json!({ "index.auto_expand_replicas": "0-1" })
}

pub fn updated_all_nodes_replica_index_settings() -> Value {
    json!({ "index.auto_expand_replicas": "0-all" })
}

/// Load an index mapping from a file, validating that it holds JSON.
pub fn mapping_from_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let mapping = std::fs::read_to_string(path)?.trim().to_string();

    if mapping.is_empty() || !is_json(&mapping) {
        tracing::warn!("rejected mapping file {}: not valid JSON", path.display());
        return Err(Error::InvalidArgument(format!(
            "invalid or non-JSON mapping at: {}",
            path.display()
        )));
    }

    tracing::debug!("loaded index mapping from {}", path.display());
    Ok(mapping)
}

/// Extract `_meta.schema_version` from a mapping document.
pub fn version_from_mapping(mapping: &str) -> Result<u32> {
    if mapping.trim().is_empty() {
        return Err(Error::InvalidArgument(
            "mapping cannot be null or empty".to_string(),
        ));
    }

    let mapping: Value = serde_json::from_str(mapping)
        .map_err(|e| Error::Schema(format!("mapping is not valid JSON: {}", e)))?;

    let meta = mapping
        .get("_meta")
        .and_then(Value::as_object)
        .ok_or_else(|| Error::Schema("failed to find \"_meta\" object in mapping".to_string()))?;

    let version = meta
        .get("schema_version")
        .ok_or_else(|| {
            Error::Schema("failed to find \"schema_version\" in \"_meta\" object".to_string())
        })?;

    version
        .as_u64()
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| {
            Error::Schema(format!(
                "invalid \"schema_version\" value in mapping: {}",
                version
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings_keys() {
        let settings = default_index_settings();
        assert_eq!(settings["index.number_of_shards"], "1");
        assert_eq!(settings["index.auto_expand_replicas"], "0-1");

        let settings = all_nodes_replica_index_settings();
        assert_eq!(settings["index.auto_expand_replicas"], "0-all");

        let updated = updated_default_index_settings();
        assert!(updated.get("index.number_of_shards").is_none());
    }

    #[test]
    fn test_mapping_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mapping.json");
        std::fs::write(&path, r#"{"_meta": {"schema_version": 3}}"#).unwrap();

        let mapping = mapping_from_file(&path).unwrap();
        assert_eq!(version_from_mapping(&mapping).unwrap(), 3);
    }

    #[test]
    fn test_mapping_from_file_rejects_non_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mapping.json");
        std::fs::write(&path, "not json at all").unwrap();

        let err = mapping_from_file(&path).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_mapping_from_file_rejects_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mapping.json");
        std::fs::write(&path, "   \n").unwrap();

        let err = mapping_from_file(&path).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_mapping_from_file_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = mapping_from_file(temp_dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_version_from_mapping_failures() {
        let err = version_from_mapping(r#"{"properties": {}}"#).unwrap_err();
        assert!(matches!(err, Error::Schema(_)));

        let err = version_from_mapping(r#"{"_meta": {}}"#).unwrap_err();
        assert!(matches!(err, Error::Schema(_)));

        let err = version_from_mapping(r#"{"_meta": {"schema_version": "three"}}"#).unwrap_err();
        assert!(matches!(err, Error::Schema(_)));

        let err = version_from_mapping("").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
