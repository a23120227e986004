//! Exclusion rules for collection scans
//!
//! Patterns are matched against logical paths (relative to the collection
//! root, `/`-separated).

use globset::{Glob, GlobSet, GlobSetBuilder};

/// Default patterns to exclude from scans
const DEFAULT_EXCLUDES: &[&str] = &[
    "**/.git",
    "**/.git/**",
    "**/node_modules",
    "**/node_modules/**",
    "target",
    "target/**",
];

/// Errors for exclusion rules
#[derive(Debug, thiserror::Error)]
pub enum ExcludeError {
    #[error("Glob pattern error: {0}")]
    GlobError(#[from] globset::Error),
}

/// Exclusion rules for filtering scanned paths
#[derive(Debug, Clone)]
pub struct ExcludeRules {
    glob_set: GlobSet,
    patterns: Vec<String>,
}

impl Default for ExcludeRules {
    fn default() -> Self {
        Self::new().expect("built-in exclude patterns compile")
    }
}

impl ExcludeRules {
    /// Create new exclusion rules with defaults
    pub fn new() -> Result<Self, ExcludeError> {
        Self::build(Vec::new())
    }

    /// Add additional patterns on top of the defaults
    pub fn with_patterns<S: AsRef<str>>(self, patterns: &[S]) -> Result<Self, ExcludeError> {
        let mut extra = self.patterns;
        extra.extend(
            patterns
                .iter()
                .map(|p| p.as_ref().trim())
                .filter(|p| !p.is_empty())
                .map(str::to_string),
        );
        Self::build(extra)
    }

    fn build(patterns: Vec<String>) -> Result<Self, ExcludeError> {
        let mut builder = GlobSetBuilder::new();

        for pattern in DEFAULT_EXCLUDES {
            builder.add(Glob::new(pattern)?);
        }
        for pattern in &patterns {
            builder.add(Glob::new(pattern)?);
        }

        Ok(Self {
            glob_set: builder.build()?,
            patterns,
        })
    }

    /// Check if a logical path should be excluded
    pub fn is_excluded(&self, logical_path: &str) -> bool {
        self.glob_set.is_match(logical_path)
    }
}
