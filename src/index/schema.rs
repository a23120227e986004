//! Schema identification for the persisted index
//!
//! Every index file carries `schemaVersion` and `schemaId`. Within a major
//! version, known fields are parsed and unknown ones ignored; a different
//! type or major version is rejected.

use serde::Deserialize;
use serde_json::Value;

/// Schema version for the index file
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier for the index file
pub const SCHEMA_ID: &str = "skill-index/index@1";

/// Error type for schema validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("unsupported schemaVersion {actual} (expected {expected})")]
    UnsupportedVersion { expected: u32, actual: u32 },

    #[error("schemaId mismatch: expected '{expected}', got '{actual}'")]
    IdMismatch { expected: String, actual: String },

    #[error("{0}")]
    MissingHeader(String),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexHeader {
    schema_version: u32,
    schema_id: String,
}

/// Check the index header of a parsed document before full decoding.
pub fn validate_header(value: &Value) -> Result<(), SchemaError> {
    if value.get("schemaVersion").is_none() {
        // Files written by the older script carry "version" + "skills"
        let reason = if value.get("skills").is_some() && value.get("version").is_some() {
            "legacy index without schemaVersion; rebuild it with build-index".to_string()
        } else {
            "missing schemaVersion".to_string()
        };
        return Err(SchemaError::MissingHeader(reason));
    }

    let header = IndexHeader::deserialize(value)
        .map_err(|e| SchemaError::MissingHeader(format!("invalid index header: {}", e)))?;

    if header.schema_version != SCHEMA_VERSION {
        return Err(SchemaError::UnsupportedVersion {
            expected: SCHEMA_VERSION,
            actual: header.schema_version,
        });
    }

    // The id encodes type and major version, so equality covers both
    if header.schema_id != SCHEMA_ID {
        return Err(SchemaError::IdMismatch {
            expected: SCHEMA_ID.to_string(),
            actual: header.schema_id,
        });
    }

    Ok(())
}
