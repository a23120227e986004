//! Command orchestration
//!
//! Ties config, builder, store and checker together for a collection
//! root. The root is always passed in explicitly; nothing here derives it
//! from the process or binary location.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::admission::{check_candidate, AdmissionCheck};
use crate::config::IndexConfig;
use crate::error::IndexError;
use crate::index::{self, BuildOutcome, Index, IndexBuilder};
use crate::report::{BuildReport, CheckReport, IndexListing};

/// Stable process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(i32)]
pub enum ExitCode {
    /// Clean build, unique candidate, or check skipped for lack of an index
    Success = 0,
    /// Build found duplicate groups, or the candidate duplicates an artifact
    DuplicatesFound = 1,
    /// The operation itself failed
    Failure = 2,
}

impl ExitCode {
    pub fn as_i32(&self) -> i32 {
        *self as i32
    }
}

/// A completed and persisted build
#[derive(Debug, Clone)]
pub struct BuildRun {
    pub root: PathBuf,
    pub index_path: PathBuf,
    pub outcome: BuildOutcome,
}

impl BuildRun {
    pub fn report(&self) -> BuildReport {
        BuildReport::new(&self.root, &self.index_path, &self.outcome)
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.outcome.has_duplicates() {
            ExitCode::DuplicatesFound
        } else {
            ExitCode::Success
        }
    }
}

/// Rebuild the index for `root` from scratch and persist it.
///
/// The index is saved even when duplicates are found; duplicates only
/// change the exit code.
pub fn build_and_save(root: &Path) -> Result<BuildRun, IndexError> {
    let config = IndexConfig::load(root)?;
    let outcome = IndexBuilder::from_config(&config)?.build(root)?;

    let index_path = config.index_path(root);
    index::save(&outcome.index, &index_path)?;

    info!(
        root = %root.display(),
        artifacts = outcome.index.len(),
        duplicate_groups = outcome.duplicates.len(),
        "build complete"
    );

    Ok(BuildRun {
        root: root.to_path_buf(),
        index_path,
        outcome,
    })
}

/// Result of a `check` against a collection root
#[derive(Debug, Clone)]
pub struct CheckRun {
    pub check: AdmissionCheck,
}

impl CheckRun {
    pub fn report(&self) -> CheckReport {
        CheckReport::new(&self.check)
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.check.is_duplicate() {
            ExitCode::DuplicatesFound
        } else {
            ExitCode::Success
        }
    }
}

/// Check `candidate` against the index persisted for `root`.
pub fn check(candidate: &Path, root: &Path) -> Result<CheckRun, IndexError> {
    let config = IndexConfig::load(root)?;
    let check = check_candidate(candidate, &config.index_path(root))?;
    Ok(CheckRun { check })
}

/// Load the persisted index for `root`.
pub fn show(root: &Path) -> Result<(PathBuf, Index), IndexError> {
    let config = IndexConfig::load(root)?;
    let index_path = config.index_path(root);
    let index = index::load(&index_path)?;
    Ok((index_path, index))
}

/// Listing of the persisted index for `root`
pub fn listing(root: &Path) -> Result<IndexListing, IndexError> {
    let (index_path, index) = show(root)?;
    Ok(IndexListing::new(&index_path, &index))
}
