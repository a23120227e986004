//! Content fingerprints for skill documents
//!
//! A fingerprint is the lowercase hex SHA-256 of a file's full byte
//! content. Files are streamed through the digest in fixed-size chunks so
//! large documents are never loaded into memory in one allocation.

mod fingerprint;
mod hasher;

pub use fingerprint::{Fingerprint, FingerprintError, FINGERPRINT_HEX_LEN, SHORT_LEN};
pub use hasher::{hash_bytes, hash_file, hash_reader, DigestError, FileDigest, CHUNK_SIZE};
