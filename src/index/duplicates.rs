//! Intra-index duplicate detection
//!
//! Groups logical paths by fingerprint in a single pass; any group with
//! more than one member is a duplicate set.

use serde::Serialize;
use skill_digest::Fingerprint;

use super::Index;

/// Paths whose content hashes to the same fingerprint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateSet {
    pub fingerprint: Fingerprint,

    /// Sorted, at least two entries
    pub paths: Vec<String>,
}

/// Find every fingerprint shared by two or more records.
///
/// Sets are ordered by their first path so reports are stable across runs.
pub fn find_duplicates(index: &Index) -> Vec<DuplicateSet> {
    let mut sets: Vec<DuplicateSet> = index
        .fingerprint_groups()
        .into_iter()
        .filter(|(_, paths)| paths.len() > 1)
        .map(|(fingerprint, paths)| DuplicateSet {
            fingerprint: fingerprint.clone(),
            paths: paths.into_iter().map(str::to_string).collect(),
        })
        .collect();

    sets.sort_by(|a, b| a.paths[0].cmp(&b.paths[0]));
    sets
}
