//! Index persistence
//!
//! The index is pretty-printed JSON with stable field and key order, so
//! successive builds of an unchanged tree diff cleanly. Writes go to a
//! temporary file in the destination directory and are renamed into
//! place; readers never observe a partially written index.

use serde_json::Value;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::record::Index;
use super::schema::validate_header;
use crate::error::IndexError;

impl Index {
    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse and validate from JSON.
    ///
    /// `path` is only used for error reporting.
    pub fn from_json(json: &str, path: &Path) -> Result<Self, IndexError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| IndexError::format(path, format!("not valid JSON: {}", e)))?;

        validate_header(&value).map_err(|e| IndexError::format(path, e.to_string()))?;

        let index: Index =
            serde_json::from_value(value).map_err(|e| IndexError::format(path, e.to_string()))?;

        index
            .validate()
            .map_err(|reason| IndexError::format(path, reason))?;

        Ok(index)
    }
}

/// Write `index` to `path` atomically (write-then-rename).
pub fn save(index: &Index, path: &Path) -> Result<(), IndexError> {
    let json = index.to_json().map_err(|e| IndexError::Io {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidData, e.to_string()),
    })?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(|e| IndexError::io(&parent, e))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "index".to_string());
    let temp_path = parent.join(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()));

    if let Err(e) = write_synced(&temp_path, json.as_bytes()) {
        let _ = fs::remove_file(&temp_path);
        return Err(IndexError::io(&temp_path, e));
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(IndexError::io(path, e));
    }

    info!(path = %path.display(), records = index.len(), "index saved");
    Ok(())
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.write_all(b"\n")?;
    file.sync_all()
}

/// Load and validate the index at `path`.
///
/// `NotFound` means there is no index yet; callers decide whether that is fatal.
pub fn load(path: &Path) -> Result<Index, IndexError> {
    let json = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::InvalidData => IndexError::format(path, "index file is not valid UTF-8"),
        _ => IndexError::io(path, e),
    })?;

    let index = Index::from_json(&json, path)?;
    debug!(path = %path.display(), records = index.len(), "index loaded");
    Ok(index)
}
