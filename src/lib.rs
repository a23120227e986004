//! Skill Index - duplicate detection for skill collections
//!
//! Fingerprints every `SKILL.md` under a collection root with SHA-256,
//! persists the fingerprints in a JSON index, and checks candidate
//! documents against that index before they are added.

pub mod admission;
pub mod config;
pub mod error;
pub mod index;
pub mod pipeline;
pub mod report;
pub mod scan;

pub use admission::{
    check_candidate, check_duplicate, AdmissionCheck, AdmissionVerdict, FingerprintLookup,
};
pub use config::{ConfigError, IndexConfig};
pub use error::IndexError;
pub use index::{ArtifactRecord, BuildOutcome, DuplicateSet, Index, IndexBuilder};
pub use pipeline::ExitCode;
pub use scan::{scan, ScanOptions, ScannedArtifact};
pub use skill_digest::{hash_bytes, hash_file, hash_reader, Fingerprint};
