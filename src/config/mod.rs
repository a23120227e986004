//! Collection configuration (.skill-index.toml)
//!
//! Optional file at the collection root. Every key has a default: without
//! the file, every `SKILL.md` under the root is indexed into
//! `.skills-hash.json`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::scan::{ExcludeError, ExcludeRules, ScanOptions};

/// Config file name, relative to the collection root
pub const CONFIG_FILE: &str = ".skill-index.toml";

/// Filename every artifact carries
pub const DEFAULT_ARTIFACT_NAME: &str = "SKILL.md";

/// Index file name, relative to the collection root
pub const DEFAULT_INDEX_FILE: &str = ".skills-hash.json";

/// Error types for config operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid exclude pattern: {0}")]
    ExcludeError(#[from] ExcludeError),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Collection configuration from .skill-index.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IndexConfig {
    /// Filename selected by the scanner, at any depth
    pub artifact_name: String,

    /// Index file path relative to the root
    pub index_file: String,

    /// Sub-directories to scan (empty = whole root)
    pub scan_dirs: Vec<String>,

    /// Extra glob patterns excluded from the scan, matched on logical paths
    pub exclude: Vec<String>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            artifact_name: DEFAULT_ARTIFACT_NAME.to_string(),
            index_file: DEFAULT_INDEX_FILE.to_string(),
            scan_dirs: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

impl IndexConfig {
    /// Load `<root>/.skill-index.toml`, falling back to defaults if absent
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        match Self::from_file(&root.join(CONFIG_FILE)) {
            Err(ConfigError::IoError(e)) if e.kind() == io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            result => result,
        }
    }

    /// Load and parse config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_str(&contents)
    }

    /// Parse config from a TOML string
    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        let config: IndexConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = self.artifact_name.trim();
        if name.is_empty() {
            return Err(ConfigError::ValidationError(
                "'artifact_name' cannot be empty".to_string(),
            ));
        }
        if name.contains('/') || name.contains('\\') {
            return Err(ConfigError::ValidationError(format!(
                "'artifact_name' must be a bare file name, got '{}'",
                self.artifact_name
            )));
        }

        if self.index_file.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "'index_file' cannot be empty".to_string(),
            ));
        }
        Self::validate_relative("index_file", &self.index_file)?;

        for dir in &self.scan_dirs {
            Self::validate_relative("scan_dirs", dir)?;
        }

        // Surface bad globs at load time rather than at scan time
        ExcludeRules::new()?.with_patterns(&self.exclude)?;

        Ok(())
    }

    /// Paths must stay inside the collection root
    fn validate_relative(key: &str, value: &str) -> Result<(), ConfigError> {
        let path = Path::new(value);
        let escapes = path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(ConfigError::ValidationError(format!(
                "'{}' entry '{}' must be a relative path inside the collection root",
                key, value
            )));
        }
        Ok(())
    }

    /// Absolute location of the index file for `root`
    pub fn index_path(&self, root: &Path) -> PathBuf {
        root.join(&self.index_file)
    }

    /// Scanner options derived from this config
    pub fn scan_options(&self) -> Result<ScanOptions, ConfigError> {
        let exclude = ExcludeRules::new()?.with_patterns(&self.exclude)?;
        Ok(ScanOptions {
            artifact_name: self.artifact_name.trim().to_string(),
            scan_dirs: self.scan_dirs.clone(),
            exclude,
            index_file: Some(self.index_file.clone()),
        })
    }
}
