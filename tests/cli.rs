//! CLI Tests
//!
//! Exit codes and output of the `skill-index` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

fn skill_index(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_skill-index"))
        .args(args)
        .output()
        .expect("failed to run skill-index")
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_build_index_clean_exits_zero() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a/SKILL.md", "A");
    write(dir.path(), "b/SKILL.md", "B");

    let output = skill_index(&["build-index", path_arg(dir.path())]);
    assert_eq!(output.status.code(), Some(0));

    let text = stdout(&output);
    assert!(text.contains("Found 2 skills"));
    assert!(text.contains("No duplicate skills found."));
    assert!(dir.path().join(".skills-hash.json").exists());
}

#[test]
fn test_build_index_duplicates_exit_one() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a/SKILL.md", "X");
    write(dir.path(), "b/SKILL.md", "X");

    let output = skill_index(&["build-index", path_arg(dir.path()), "--json"]);
    assert_eq!(output.status.code(), Some(1));

    let report: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["total_artifacts"], 2);
    assert_eq!(report["duplicates"][0]["paths"][0], "a/SKILL.md");
    assert_eq!(report["duplicates"][0]["paths"][1], "b/SKILL.md");

    // Persisted despite the duplicates
    assert!(dir.path().join(".skills-hash.json").exists());
}

#[test]
fn test_build_index_missing_root_exits_two() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing");

    let output = skill_index(&["build-index", path_arg(&missing)]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("not found"));
}

#[test]
fn test_check_verdicts() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a/SKILL.md", "X");
    write(dir.path(), "b/SKILL.md", "X");
    skill_index(&["build-index", path_arg(dir.path())]);

    let staging = TempDir::new().unwrap();
    write(staging.path(), "c/SKILL.md", "X");
    write(staging.path(), "d/SKILL.md", "Y");

    let dup = staging.path().join("c/SKILL.md");
    let output = skill_index(&[
        "check",
        path_arg(&dup),
        "--root",
        path_arg(dir.path()),
        "--json",
    ]);
    assert_eq!(output.status.code(), Some(1));
    let verdict: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(verdict["status"], "duplicate");
    assert_eq!(verdict["matching_path"], "a/SKILL.md");

    let unique = staging.path().join("d/SKILL.md");
    let output = skill_index(&["check", path_arg(&unique), "--root", path_arg(dir.path())]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("safe to add"));
}

#[test]
fn test_check_without_index_warns_and_exits_zero() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "c/SKILL.md", "X");

    let candidate = dir.path().join("c/SKILL.md");
    let output = skill_index(&[
        "check",
        path_arg(&candidate),
        "--root",
        path_arg(dir.path()),
        "--json",
    ]);
    assert_eq!(output.status.code(), Some(0));

    let verdict: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(verdict["status"], "index_unavailable");
    // The candidate is still fingerprinted so callers can record it
    assert_eq!(verdict["hash"].as_str().map(str::len), Some(64));
    assert!(String::from_utf8_lossy(&output.stderr).contains("no index available"));
}

#[test]
fn test_check_missing_candidate_exits_two() {
    let dir = TempDir::new().unwrap();
    let candidate = dir.path().join("nope/SKILL.md");

    let output = skill_index(&["check", path_arg(&candidate), "--root", path_arg(dir.path())]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_check_malformed_index_exits_two() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), ".skills-hash.json", "{\"schemaVersion\": 1}");
    write(dir.path(), "c/SKILL.md", "X");

    let candidate = dir.path().join("c/SKILL.md");
    let output = skill_index(&["check", path_arg(&candidate), "--root", path_arg(dir.path())]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid index file"));
}

#[test]
fn test_show_lists_records() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a/SKILL.md", "A");
    skill_index(&["build-index", path_arg(dir.path())]);

    let output = skill_index(&["show", path_arg(dir.path()), "--json"]);
    assert_eq!(output.status.code(), Some(0));

    let listing: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(listing["total_artifacts"], 1);
    assert_eq!(listing["records"][0]["path"], "a/SKILL.md");
    assert_eq!(listing["schema_id"], "skill-index/index@1");
}

#[test]
fn test_show_without_index_exits_two() {
    let dir = TempDir::new().unwrap();
    let output = skill_index(&["show", path_arg(dir.path())]);
    assert_eq!(output.status.code(), Some(2));
}
