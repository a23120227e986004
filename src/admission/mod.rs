//! Pre-admission duplicate check
//!
//! Hashes a candidate artifact and looks its fingerprint up in the
//! persisted index. Read-only: the index is never modified here.

use serde::Serialize;
use skill_digest::{hash_file, Fingerprint};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::IndexError;
use crate::index::{self, Index};

/// Reverse lookup from fingerprint to the logical paths that carry it.
///
/// Built once per index and reusable across many checks.
#[derive(Debug, Clone, Default)]
pub struct FingerprintLookup {
    by_fingerprint: HashMap<Fingerprint, Vec<String>>,
}

impl FingerprintLookup {
    pub fn from_index(index: &Index) -> Self {
        let by_fingerprint: HashMap<Fingerprint, Vec<String>> = index
            .fingerprint_groups()
            .into_iter()
            .map(|(fingerprint, paths)| {
                let paths: Vec<String> = paths.into_iter().map(str::to_string).collect();
                (fingerprint.clone(), paths)
            })
            .collect();
        Self { by_fingerprint }
    }

    /// Every logical path whose content has this fingerprint
    pub fn matches(&self, fingerprint: &Fingerprint) -> &[String] {
        self.by_fingerprint
            .get(fingerprint)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Outcome of checking one candidate against an index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdmissionVerdict {
    pub candidate: PathBuf,
    pub fingerprint: Fingerprint,

    /// First existing path (lexicographic) with identical content
    pub matching_path: Option<String>,

    /// All existing paths with identical content
    pub all_matches: Vec<String>,
}

impl AdmissionVerdict {
    pub fn is_duplicate(&self) -> bool {
        self.matching_path.is_some()
    }
}

/// Result of a check that may have had no index to consult
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmissionCheck {
    /// The candidate was compared against a loaded index
    Checked(AdmissionVerdict),

    /// No index exists yet; uniqueness was not established
    IndexUnavailable {
        candidate: PathBuf,
        fingerprint: Fingerprint,
        index_path: PathBuf,
    },
}

impl AdmissionCheck {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, AdmissionCheck::Checked(v) if v.is_duplicate())
    }
}

/// Hash `candidate` and look it up in `lookup`.
///
/// Fails with `NotFound` if the candidate does not exist.
pub fn check_duplicate(
    candidate: &Path,
    lookup: &FingerprintLookup,
) -> Result<AdmissionVerdict, IndexError> {
    let digest = hash_file(candidate)?;
    Ok(verdict_for(candidate, digest.fingerprint, lookup))
}

/// Check `candidate` against the persisted index at `index_path`.
///
/// The candidate is hashed first, so a missing candidate is always
/// `NotFound`. A missing index is reported as
/// [`AdmissionCheck::IndexUnavailable`], never as "not a duplicate".
pub fn check_candidate(
    candidate: &Path,
    index_path: &Path,
) -> Result<AdmissionCheck, IndexError> {
    let digest = hash_file(candidate)?;

    let index = match index::load(index_path) {
        Ok(index) => index,
        Err(e) if e.is_not_found() => {
            warn!(index = %index_path.display(), "no index available; duplicate check skipped");
            return Ok(AdmissionCheck::IndexUnavailable {
                candidate: candidate.to_path_buf(),
                fingerprint: digest.fingerprint,
                index_path: index_path.to_path_buf(),
            });
        }
        Err(e) => return Err(e),
    };

    let lookup = FingerprintLookup::from_index(&index);
    Ok(AdmissionCheck::Checked(verdict_for(
        candidate,
        digest.fingerprint,
        &lookup,
    )))
}

fn verdict_for(
    candidate: &Path,
    fingerprint: Fingerprint,
    lookup: &FingerprintLookup,
) -> AdmissionVerdict {
    let all_matches = lookup.matches(&fingerprint).to_vec();

    debug!(
        candidate = %candidate.display(),
        hash = %fingerprint.short(),
        matches = all_matches.len(),
        "admission check"
    );

    AdmissionVerdict {
        candidate: candidate.to_path_buf(),
        fingerprint,
        matching_path: all_matches.first().cloned(),
        all_matches,
    }
}
