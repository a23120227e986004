//! Validated SHA-256 fingerprint type

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Length of a hex-encoded SHA-256 digest
pub const FINGERPRINT_HEX_LEN: usize = 64;

/// Length of the abbreviated form used in console output
pub const SHORT_LEN: usize = 16;

/// Errors for fingerprint parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FingerprintError {
    #[error("fingerprint must be {expected} hex characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("fingerprint contains non-hex character '{0}'")]
    InvalidCharacter(char),
}

/// Hex-encoded SHA-256 digest of an artifact's full content.
///
/// Always lowercase and exactly [`FINGERPRINT_HEX_LEN`] characters. Values
/// read from disk go through [`Fingerprint::parse`], so a malformed hash in
/// a persisted index is rejected at deserialization time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Parse and normalize a hex digest string
    pub fn parse(s: &str) -> Result<Self, FingerprintError> {
        if s.len() != FINGERPRINT_HEX_LEN {
            return Err(FingerprintError::InvalidLength {
                expected: FINGERPRINT_HEX_LEN,
                actual: s.len(),
            });
        }

        if let Some(c) = s.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(FingerprintError::InvalidCharacter(c));
        }

        Ok(Self(s.to_ascii_lowercase()))
    }

    /// Build from raw digest output
    pub(crate) fn from_digest(bytes: &[u8]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Full hex string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated prefix for display
    pub fn short(&self) -> &str {
        &self.0[..SHORT_LEN]
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for Fingerprint {
    type Err = FingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
