//! Streaming SHA-256 over files and readers

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::Fingerprint;

/// Read buffer size fed into the running digest
pub const CHUNK_SIZE: usize = 4 * 1024;

/// Errors for file hashing
#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DigestError {
    fn from_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            DigestError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            DigestError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Fingerprint plus the number of bytes that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDigest {
    pub fingerprint: Fingerprint,
    pub size: u64,
}

/// Hash everything readable from `reader`.
///
/// Returns the fingerprint and the total byte count.
pub fn hash_reader<R: Read>(mut reader: R) -> io::Result<(Fingerprint, u64)> {
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; CHUNK_SIZE];
    let mut total = 0u64;

    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..n]);
        total += n as u64;
    }

    Ok((Fingerprint::from_digest(&hasher.finalize()), total))
}

/// Hash a file's full content.
///
/// The size reported is the number of bytes actually hashed, not the
/// metadata length, so it always matches the fingerprint.
pub fn hash_file(path: &Path) -> Result<FileDigest, DigestError> {
    let file = File::open(path).map_err(|e| DigestError::from_io(path, e))?;
    let (fingerprint, size) = hash_reader(file).map_err(|e| DigestError::from_io(path, e))?;
    Ok(FileDigest { fingerprint, size })
}

/// Hash an in-memory buffer
pub fn hash_bytes(data: &[u8]) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(data);
    Fingerprint::from_digest(&hasher.finalize())
}
