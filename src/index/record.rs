//! Index and per-artifact records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skill_digest::Fingerprint;
use std::collections::{BTreeMap, HashMap};

use super::schema::{SCHEMA_ID, SCHEMA_VERSION};

/// One indexed artifact.
///
/// The logical path is not stored here; it is the record's key in
/// [`Index::records`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    /// SHA-256 of the full file content
    #[serde(rename = "hash")]
    pub fingerprint: Fingerprint,

    /// Bytes hashed
    #[serde(rename = "size")]
    pub size_bytes: u64,

    /// Filesystem modification time at hash time (informational)
    #[serde(rename = "modified")]
    pub modified_at: DateTime<Utc>,
}

/// Persisted collection index (.skills-hash.json)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Index {
    /// Schema version
    pub schema_version: u32,

    /// Schema identifier
    pub schema_id: String,

    /// When the build that produced this index finished
    pub last_updated: DateTime<Utc>,

    /// Always equals `records.len()`
    pub total_artifacts: usize,

    /// Logical path → record, in lexicographic key order
    pub records: BTreeMap<String, ArtifactRecord>,
}

impl Index {
    /// Wrap freshly built records, stamping the current time
    pub fn new(records: BTreeMap<String, ArtifactRecord>) -> Self {
        Self::with_timestamp(records, Utc::now())
    }

    pub fn with_timestamp(
        records: BTreeMap<String, ArtifactRecord>,
        last_updated: DateTime<Utc>,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            schema_id: SCHEMA_ID.to_string(),
            last_updated,
            total_artifacts: records.len(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, logical_path: &str) -> Option<&ArtifactRecord> {
        self.records.get(logical_path)
    }

    /// Iterate records in logical path order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArtifactRecord)> {
        self.records.iter().map(|(path, record)| (path.as_str(), record))
    }

    /// Logical paths grouped by fingerprint, each group in path order
    pub fn fingerprint_groups(&self) -> HashMap<&Fingerprint, Vec<&str>> {
        let mut groups: HashMap<&Fingerprint, Vec<&str>> = HashMap::with_capacity(self.len());
        for (path, record) in self.iter() {
            groups.entry(&record.fingerprint).or_default().push(path);
        }
        groups
    }

    /// Check structural invariants of a loaded index.
    ///
    /// Returns a description of the first violation found.
    pub fn validate(&self) -> Result<(), String> {
        if self.total_artifacts != self.records.len() {
            return Err(format!(
                "totalArtifacts is {} but records holds {} entries",
                self.total_artifacts,
                self.records.len()
            ));
        }

        for path in self.records.keys() {
            validate_logical_path(path)?;
        }

        Ok(())
    }
}

/// Logical paths are relative, `/`-separated, with no empty, `.` or `..` segments
fn validate_logical_path(path: &str) -> Result<(), String> {
    if path.is_empty() {
        return Err("record with empty logical path".to_string());
    }
    if path.starts_with('/') || path.contains('\\') {
        return Err(format!("record path '{}' is not a relative '/'-separated path", path));
    }
    if path.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..") {
        return Err(format!("record path '{}' has an invalid segment", path));
    }
    Ok(())
}
