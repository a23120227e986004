//! Collection scanner
//!
//! Enumerates every artifact file (a fixed file name, at any depth) under
//! a collection root and returns them in lexicographic order of their
//! logical paths, so repeated scans of an unchanged tree iterate
//! identically.

mod exclude;

pub use exclude::{ExcludeError, ExcludeRules};

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::DEFAULT_ARTIFACT_NAME;
use crate::error::IndexError;

/// Options controlling which files a scan selects
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// File name every artifact carries
    pub artifact_name: String,

    /// Sub-directories of the root to walk (empty = whole root)
    pub scan_dirs: Vec<String>,

    /// Paths pruned from the walk
    pub exclude: ExcludeRules,

    /// Index file location relative to the root, never selected
    pub index_file: Option<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            artifact_name: DEFAULT_ARTIFACT_NAME.to_string(),
            scan_dirs: Vec::new(),
            exclude: ExcludeRules::default(),
            index_file: None,
        }
    }
}

impl ScanOptions {
    /// Options selecting every file named `artifact_name` under the root
    pub fn for_artifact(artifact_name: &str) -> Result<Self, ExcludeError> {
        Ok(Self {
            artifact_name: artifact_name.to_string(),
            scan_dirs: Vec::new(),
            exclude: ExcludeRules::new()?,
            index_file: None,
        })
    }
}

/// One artifact discovered by a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedArtifact {
    /// Path relative to the collection root, `/`-separated
    pub logical_path: String,

    /// Path on the filesystem
    pub fs_path: PathBuf,
}

/// Scan `root` for artifacts.
///
/// Returns an empty list if the root exists but holds no matches.
/// Fails with `NotFound` if `root` itself does not exist.
pub fn scan(root: &Path, options: &ScanOptions) -> Result<Vec<ScannedArtifact>, IndexError> {
    let metadata = fs::metadata(root).map_err(|e| IndexError::io(root, e))?;
    if !metadata.is_dir() {
        return Err(IndexError::Io {
            path: root.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
        });
    }

    let starts: Vec<PathBuf> = if options.scan_dirs.is_empty() {
        vec![root.to_path_buf()]
    } else {
        options.scan_dirs.iter().map(|d| root.join(d)).collect()
    };

    // Overlapping scan_dirs collapse onto the same logical path
    let mut found: BTreeMap<String, PathBuf> = BTreeMap::new();

    for start in &starts {
        if !start.exists() {
            warn!(dir = %start.display(), "scan directory does not exist, skipping");
            continue;
        }
        walk(root, start, options, &mut found)?;
    }

    debug!(root = %root.display(), count = found.len(), "scan complete");

    Ok(found
        .into_iter()
        .map(|(logical_path, fs_path)| ScannedArtifact {
            logical_path,
            fs_path,
        })
        .collect())
}

fn walk(
    root: &Path,
    start: &Path,
    options: &ScanOptions,
    found: &mut BTreeMap<String, PathBuf>,
) -> Result<(), IndexError> {
    let walker = WalkDir::new(start)
        .follow_links(false)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        .into_iter()
        .filter_entry(|entry| match exclusion_path(root, entry.path()) {
            Some(rel) if !rel.is_empty() => !options.exclude.is_excluded(&rel),
            _ => true,
        });

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(start).to_path_buf();
            match e.into_io_error() {
                Some(source) => IndexError::io(&path, source),
                None => IndexError::Io {
                    path,
                    source: io::Error::other("filesystem loop detected"),
                },
            }
        })?;

        let file_type = entry.file_type();
        if file_type.is_dir() || entry.file_name() != options.artifact_name.as_str() {
            continue;
        }
        if file_type.is_symlink() {
            // Links to files are artifacts; directory links are never descended
            let target = fs::metadata(entry.path()).map_err(|source| IndexError::Io {
                path: entry.path().to_path_buf(),
                source,
            })?;
            if !target.is_file() {
                debug!(path = %entry.path().display(), "symlink does not point at a file");
                continue;
            }
        } else if !file_type.is_file() {
            continue;
        }

        let rel = logical_path(root, entry.path()).ok_or_else(|| IndexError::Io {
            path: entry.path().to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidData, "path is not valid UTF-8"),
        })?;
        if options.index_file.as_deref() == Some(rel.as_str()) {
            continue;
        }

        found.insert(rel, entry.into_path());
    }

    Ok(())
}

/// Lossy relative path, only ever matched against exclusion globs
fn exclusion_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect();
    Some(parts.join("/"))
}

/// Path of `path` relative to `root`, joined with `/`.
///
/// `None` if `path` is outside `root` or has non-UTF-8 components.
pub fn logical_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let mut parts = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(parts.join("/"))
}
