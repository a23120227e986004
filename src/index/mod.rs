//! Content-addressed index of a skill collection
//!
//! Builds the path → fingerprint mapping, persists it, and reports
//! artifacts whose content is byte-identical.

mod builder;
mod duplicates;
mod record;
mod schema;
mod store;

pub use builder::{BuildOutcome, IndexBuilder};
pub use duplicates::{find_duplicates, DuplicateSet};
pub use record::{ArtifactRecord, Index};
pub use schema::{validate_header, SchemaError, SCHEMA_ID, SCHEMA_VERSION};
pub use store::{load, save};
