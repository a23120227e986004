//! Human and JSON renderings of command results

use serde::Serialize;
use skill_digest::Fingerprint;
use std::path::{Path, PathBuf};

use crate::admission::AdmissionCheck;
use crate::index::{find_duplicates, BuildOutcome, DuplicateSet, Index};

/// Summary of a `build-index` run
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub root: PathBuf,
    pub index_path: PathBuf,
    pub total_artifacts: usize,
    pub records: Vec<RecordLine>,
    pub duplicates: Vec<DuplicateSet>,
}

/// One record as shown in listings
#[derive(Debug, Clone, Serialize)]
pub struct RecordLine {
    pub path: String,
    pub hash: Fingerprint,
    pub size: u64,
}

fn record_lines(index: &Index) -> Vec<RecordLine> {
    index
        .iter()
        .map(|(path, record)| RecordLine {
            path: path.to_string(),
            hash: record.fingerprint.clone(),
            size: record.size_bytes,
        })
        .collect()
}

fn push_records(output: &mut String, records: &[RecordLine]) {
    for record in records {
        output.push_str(&format!("  {}\n", record.path));
        output.push_str(&format!("    Hash: {}...\n", record.hash.short()));
        output.push_str(&format!("    Size: {} bytes\n\n", record.size));
    }
}

fn push_duplicates(output: &mut String, duplicates: &[DuplicateSet]) {
    if duplicates.is_empty() {
        output.push_str("No duplicate skills found.\n");
        return;
    }

    output.push_str(&format!(
        "Duplicate skills found ({} group{}):\n\n",
        duplicates.len(),
        if duplicates.len() == 1 { "" } else { "s" }
    ));
    for set in duplicates {
        output.push_str(&format!(
            "  Hash: {}... ({} copies)\n",
            set.fingerprint.short(),
            set.paths.len()
        ));
        for path in &set.paths {
            output.push_str(&format!("    - {}\n", path));
        }
    }
}

impl BuildReport {
    pub fn new(root: &Path, index_path: &Path, outcome: &BuildOutcome) -> Self {
        Self {
            root: root.to_path_buf(),
            index_path: index_path.to_path_buf(),
            total_artifacts: outcome.index.total_artifacts,
            records: record_lines(&outcome.index),
            duplicates: outcome.duplicates.clone(),
        }
    }

    pub fn to_human(&self) -> String {
        let mut output = String::new();

        if self.records.is_empty() {
            output.push_str(&format!("No skills found under {}\n\n", self.root.display()));
        } else {
            output.push_str(&format!("Found {} skills:\n\n", self.total_artifacts));
            push_records(&mut output, &self.records);
        }

        push_duplicates(&mut output, &self.duplicates);
        output.push_str(&format!("\nHash index saved: {}\n", self.index_path.display()));
        output
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Outcome class of a `check` run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Unique,
    Duplicate,
    IndexUnavailable,
}

/// Verdict of a `check` run
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub candidate: PathBuf,
    pub status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matching_path: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub all_matches: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_path: Option<PathBuf>,
}

impl CheckReport {
    pub fn new(check: &AdmissionCheck) -> Self {
        match check {
            AdmissionCheck::Checked(verdict) => Self {
                candidate: verdict.candidate.clone(),
                status: if verdict.is_duplicate() {
                    CheckStatus::Duplicate
                } else {
                    CheckStatus::Unique
                },
                hash: Some(verdict.fingerprint.to_string()),
                matching_path: verdict.matching_path.clone(),
                all_matches: verdict.all_matches.clone(),
                index_path: None,
            },
            AdmissionCheck::IndexUnavailable {
                candidate,
                fingerprint,
                index_path,
            } => Self {
                candidate: candidate.clone(),
                status: CheckStatus::IndexUnavailable,
                hash: Some(fingerprint.to_string()),
                matching_path: None,
                all_matches: Vec::new(),
                index_path: Some(index_path.clone()),
            },
        }
    }

    pub fn to_human(&self) -> String {
        let mut output = format!("Checking skill: {}\n\n", self.candidate.display());

        match self.status {
            CheckStatus::Duplicate => {
                output.push_str("Duplicate skill detected!\n");
                output.push_str(&format!("  New skill: {}\n", self.candidate.display()));
                for path in &self.all_matches {
                    output.push_str(&format!("  Existing:  {}\n", path));
                }
                if let Some(ref hash) = self.hash {
                    output.push_str(&format!("  Hash: {}\n", hash));
                }
                output.push_str("\nDuplicate content found; confirm before adding.\n");
            }
            CheckStatus::IndexUnavailable => {
                output.push_str("Hash index not found; duplicate check skipped.\n");
                if let Some(ref path) = self.index_path {
                    output.push_str(&format!("  Expected at: {}\n", path.display()));
                }
                output.push_str("  Run `skill-index build-index` to create it.\n");
            }
            CheckStatus::Unique => {
                output.push_str("No duplicate detected; safe to add.\n");
            }
        }

        output
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Contents of a persisted index, for `show`
#[derive(Debug, Clone, Serialize)]
pub struct IndexListing {
    pub index_path: PathBuf,
    pub schema_id: String,
    pub last_updated: String,
    pub total_artifacts: usize,
    pub records: Vec<RecordLine>,
    pub duplicates: Vec<DuplicateSet>,
}

impl IndexListing {
    pub fn new(index_path: &Path, index: &Index) -> Self {
        Self {
            index_path: index_path.to_path_buf(),
            schema_id: index.schema_id.clone(),
            last_updated: index.last_updated.to_rfc3339(),
            total_artifacts: index.total_artifacts,
            records: record_lines(index),
            duplicates: find_duplicates(index),
        }
    }

    pub fn to_human(&self) -> String {
        let mut output = format!(
            "Index: {} ({})\nLast updated: {}\nSkills: {}\n\n",
            self.index_path.display(),
            self.schema_id,
            self.last_updated,
            self.total_artifacts
        );
        push_records(&mut output, &self.records);
        push_duplicates(&mut output, &self.duplicates);
        output
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admission::AdmissionVerdict;
    use crate::index::ArtifactRecord;
    use chrono::Utc;
    use skill_digest::hash_bytes;
    use std::collections::BTreeMap;

    fn outcome(entries: &[(&str, &str)]) -> BuildOutcome {
        let records: BTreeMap<String, ArtifactRecord> = entries
            .iter()
            .map(|(path, content)| {
                (
                    path.to_string(),
                    ArtifactRecord {
                        fingerprint: hash_bytes(content.as_bytes()),
                        size_bytes: content.len() as u64,
                        modified_at: Utc::now(),
                    },
                )
            })
            .collect();
        let index = Index::new(records);
        let duplicates = find_duplicates(&index);
        BuildOutcome { index, duplicates }
    }

    #[test]
    fn test_build_report_human_lists_duplicates() {
        let report = BuildReport::new(
            Path::new("/skills"),
            Path::new("/skills/.skills-hash.json"),
            &outcome(&[("a/SKILL.md", "X"), ("b/SKILL.md", "X")]),
        );
        let text = report.to_human();

        assert!(text.contains("Found 2 skills"));
        assert!(text.contains(&format!("Hash: {}...", hash_bytes(b"X").short())));
        assert!(text.contains("(2 copies)"));
        assert!(text.contains("    - a/SKILL.md"));
        assert!(text.contains("    - b/SKILL.md"));
    }

    #[test]
    fn test_build_report_empty() {
        let report = BuildReport::new(
            Path::new("/skills"),
            Path::new("/skills/.skills-hash.json"),
            &outcome(&[]),
        );
        let text = report.to_human();
        assert!(text.contains("No skills found"));
        assert!(text.contains("No duplicate skills found."));
    }

    #[test]
    fn test_build_report_json() {
        let report = BuildReport::new(
            Path::new("/skills"),
            Path::new("/skills/.skills-hash.json"),
            &outcome(&[("a/SKILL.md", "X"), ("b/SKILL.md", "Y")]),
        );
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["total_artifacts"], 2);
        assert_eq!(value["records"][0]["path"], "a/SKILL.md");
        assert_eq!(value["duplicates"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_check_report_statuses() {
        let verdict = AdmissionVerdict {
            candidate: PathBuf::from("c/SKILL.md"),
            fingerprint: hash_bytes(b"X"),
            matching_path: Some("a/SKILL.md".to_string()),
            all_matches: vec!["a/SKILL.md".to_string()],
        };
        let report = CheckReport::new(&AdmissionCheck::Checked(verdict.clone()));
        assert_eq!(report.status, CheckStatus::Duplicate);
        assert!(report.to_human().contains("Existing:  a/SKILL.md"));

        let unique = AdmissionVerdict {
            matching_path: None,
            all_matches: Vec::new(),
            ..verdict
        };
        let report = CheckReport::new(&AdmissionCheck::Checked(unique));
        assert_eq!(report.status, CheckStatus::Unique);
        assert!(report.to_human().contains("safe to add"));

        let report = CheckReport::new(&AdmissionCheck::IndexUnavailable {
            candidate: PathBuf::from("c/SKILL.md"),
            fingerprint: hash_bytes(b"X"),
            index_path: PathBuf::from(".skills-hash.json"),
        });
        assert_eq!(report.status, CheckStatus::IndexUnavailable);
        assert!(report.to_json().unwrap().contains("\"index_unavailable\""));
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["hash"], hash_bytes(b"X").as_str());
        assert_eq!(value["index_path"], ".skills-hash.json");
    }
}
