//! Error taxonomy shared by the scanner, builder, store and checker
//!
//! Duplicates are never errors; they come back as `DuplicateSet` and
//! `AdmissionVerdict` values.

use skill_digest::DigestError;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::ConfigError;

/// Errors for index operations
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// A referenced path (root dir, candidate file, index file) does not exist
    #[error("not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Read or write failure mid-operation
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Persisted index exists but is not a valid index of a supported schema
    #[error("invalid index file {}: {reason}", path.display())]
    Format { path: PathBuf, reason: String },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl IndexError {
    /// Map an io::Error, promoting `NotFound` to its own variant
    pub fn io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            IndexError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            IndexError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub fn format(path: &Path, reason: impl Into<String>) -> Self {
        IndexError::Format {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, IndexError::NotFound { .. })
    }
}

impl From<DigestError> for IndexError {
    fn from(err: DigestError) -> Self {
        match err {
            DigestError::NotFound { path } => IndexError::NotFound { path },
            DigestError::Io { path, source } => IndexError::Io { path, source },
        }
    }
}
