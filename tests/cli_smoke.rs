mod common;

use assert_cmd::prelude::*;
use common::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

fn entropy_json(dir: &std::path::Path, extra: &[&str]) -> serde_json::Value {
    let mut cmd = Command::cargo_bin("almanack").unwrap();
    cmd.current_dir(dir)
        .arg("--repo")
        .arg(dir)
        .args(["entropy", "--json"])
        .args(extra);
    let out = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&out).unwrap()
}

#[test]
fn entropy_json_scores_equal_split() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    equal_split_history(dir.path());

    let v = entropy_json(dir.path(), &[]);
    let score = v["total_normalized_entropy"].as_f64().unwrap();
    assert!((score - 0.5).abs() < 1e-9, "score was {score}");
    assert_eq!(v["file_count"].as_u64(), Some(2));
    assert!(v.get("repo_path").and_then(|p| p.as_str()).is_some());
    assert!(v.get("files").is_none());
}

#[test]
fn entropy_files_lists_per_file_contributions() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    equal_split_history(dir.path());

    let v = entropy_json(dir.path(), &["--files"]);
    let files = v["files"].as_array().unwrap();
    assert_eq!(files.len(), 2);
    for f in files {
        assert_eq!(f["changed_lines"].as_u64(), Some(5));
        assert!((f["entropy"].as_f64().unwrap() - 0.5).abs() < 1e-9);
    }
}

#[test]
fn entropy_ndjson_emits_one_line_per_file() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    equal_split_history(dir.path());

    let mut cmd = Command::cargo_bin("almanack").unwrap();
    cmd.current_dir(dir.path())
        .arg("--repo")
        .arg(dir.path())
        .args(["entropy", "--ndjson"]);
    let out = cmd.assert().success().get_output().stdout.clone();
    let text = String::from_utf8(out).unwrap();
    let paths: Vec<String> = text
        .lines()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap()["path"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(paths, vec!["x.py".to_string(), "y.py".to_string()]);
}

#[test]
fn entropy_output_writes_report_file() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    equal_split_history(dir.path());
    let report_dir = tempdir().unwrap();
    let report_path = report_dir.path().join("entropy.json");

    let mut cmd = Command::cargo_bin("almanack").unwrap();
    cmd.current_dir(dir.path())
        .arg("--repo")
        .arg(dir.path())
        .args(["entropy", "--output"])
        .arg(&report_path);
    let out = cmd.assert().success().get_output().stdout.clone();
    assert!(String::from_utf8(out).unwrap().contains("Entropy Report"));

    let saved: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    for key in ["repo_path", "total_normalized_entropy"] {
        assert!(saved.get(key).is_some(), "missing key {key}");
    }
}

#[test]
fn explicit_range_narrows_the_diff() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    equal_split_history(dir.path());

    // HEAD~1..HEAD only adds y.py: a single changed file carries no uncertainty.
    let v = entropy_json(dir.path(), &["--source", "HEAD~1", "--target", "HEAD"]);
    assert_eq!(v["file_count"].as_u64(), Some(1));
    assert_eq!(v["total_normalized_entropy"].as_f64(), Some(0.0));
}

#[test]
fn single_commit_repository_scores_zero() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), "lib.rs", "pub fn hi(){}\n");

    let v = entropy_json(dir.path(), &[]);
    assert_eq!(v["file_count"].as_u64(), Some(0));
    assert_eq!(v["total_normalized_entropy"].as_f64(), Some(0.0));
}

#[test]
fn unknown_commit_is_reported() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    equal_split_history(dir.path());

    let mut cmd = Command::cargo_bin("almanack").unwrap();
    cmd.current_dir(dir.path())
        .arg("--repo")
        .arg(dir.path())
        .args(["entropy", "--source", "0000000000000000000000000000000000000bad"]);
    let out = cmd.assert().failure().get_output().stderr.clone();
    assert!(String::from_utf8_lossy(&out).contains("Unresolvable commit"));
}
