//! Integration tests for stagehand-cli.
//!
//! Note: Tests use `unwrap`/`expect` which is acceptable in test code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use stagehand_core::test_utils::TarTestBuilder;
use stagehand_core::test_utils::create_test_zip;
use stagehand_core::test_utils::write_archive;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use tempfile::TempDir;

fn stagehand_cmd() -> Command {
    cargo_bin_cmd!("stagehand")
}

/// Writes the two-file upload used by most tests and returns its path.
fn sample_zip(dir: &Path) -> PathBuf {
    let path = dir.join("upload.zip");
    write_archive(&path, &create_test_zip(&[("a/1.txt", b"x"), ("b/2.csv", b"y")]));
    path
}

fn sample_tree(dir: &Path) -> PathBuf {
    let root = dir.join("tree");
    fs::create_dir_all(root.join("a")).unwrap();
    fs::create_dir_all(root.join("b")).unwrap();
    fs::write(root.join("a/1.txt"), "x").unwrap();
    fs::write(root.join("b/2.csv"), "y").unwrap();
    fs::write(root.join(".env"), "secret").unwrap();
    root
}

#[test]
fn test_version_flag() {
    stagehand_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("stagehand"));
}

#[test]
fn test_help_lists_commands() {
    stagehand_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("list-files"));
}

#[test]
fn test_extract_creates_files() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = sample_zip(temp.path());
    let out = temp.path().join("work");

    stagehand_cmd()
        .arg("extract")
        .arg(&archive)
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Extraction complete"));

    assert_eq!(fs::read_to_string(out.join("a/1.txt")).unwrap(), "x");
    assert_eq!(fs::read_to_string(out.join("b/2.csv")).unwrap(), "y");
}

#[test]
fn test_extract_json_output() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = sample_zip(temp.path());

    let output = stagehand_cmd()
        .arg("extract")
        .arg("--json")
        .arg(&archive)
        .arg(temp.path().join("out"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).expect("invalid JSON output");
    assert_eq!(json["status"], "success");
    assert_eq!(json["operation"], "extract");
    assert_eq!(json["data"]["files_extracted"], 2);
    assert_eq!(json["data"]["bytes_written"], 2);
}

#[test]
fn test_extract_traversal_fails_with_hint() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = temp.path().join("evil.zip");
    write_archive(&archive, &create_test_zip(&[("../../evil.txt", b"x")]));

    stagehand_cmd()
        .arg("extract")
        .arg(&archive)
        .arg(temp.path().join("work/safe"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Security violation"))
        .stderr(predicate::str::contains("HINT"));

    assert!(!temp.path().join("evil.txt").exists());
}

#[test]
fn test_extract_json_error() {
    let temp = TempDir::new().expect("failed to create temp dir");

    let output = stagehand_cmd()
        .arg("extract")
        .arg("--json")
        .arg(temp.path().join("missing.zip"))
        .arg(temp.path().join("out"))
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).expect("invalid JSON output");
    assert_eq!(json["status"], "error");
    assert_eq!(json["operation"], "extract");
    assert!(json["error"].as_str().unwrap().contains("I/O error"));
}

#[test]
fn test_extract_nonexistent_archive() {
    let temp = TempDir::new().expect("failed to create temp dir");

    stagehand_cmd()
        .arg("extract")
        .arg("nonexistent.zip")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_extract_quota_flag() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = sample_zip(temp.path());

    stagehand_cmd()
        .arg("extract")
        .arg("--max-files")
        .arg("1")
        .arg(&archive)
        .arg(temp.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("limit exceeded"));
}

#[test]
fn test_extract_byte_size_flag() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = sample_zip(temp.path());

    stagehand_cmd()
        .arg("extract")
        .arg("--max-total-size")
        .arg("1K")
        .arg("--max-file-size")
        .arg("512")
        .arg(&archive)
        .arg(temp.path().join("out"))
        .assert()
        .success();

    stagehand_cmd()
        .arg("extract")
        .arg("--max-total-size")
        .arg("lots")
        .arg(&archive)
        .assert()
        .failure();
}

#[test]
fn test_extract_limits_are_opt_in() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let name = format!("{}/leaf.txt", ["d"; 40].join("/"));
    let archive = temp.path().join("deep.zip");
    write_archive(&archive, &create_test_zip(&[(name.as_str(), b"x")]));

    stagehand_cmd()
        .arg("extract")
        .arg(&archive)
        .arg(temp.path().join("out"))
        .assert()
        .success();
    assert!(temp.path().join("out").join(&name).is_file());

    stagehand_cmd()
        .arg("extract")
        .arg("--max-depth")
        .arg("32")
        .arg(&archive)
        .arg(temp.path().join("limited"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--max-depth"));
}

#[test]
fn test_extract_extensionless_upload() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let upload = temp.path().join("upload-3f9a2c");
    write_archive(&upload, &create_test_zip(&[("a/1.txt", b"x")]));

    stagehand_cmd()
        .arg("extract")
        .arg(&upload)
        .arg(temp.path().join("out"))
        .assert()
        .success();
    assert_eq!(
        fs::read_to_string(temp.path().join("out/a/1.txt")).unwrap(),
        "x"
    );
}

#[test]
fn test_extract_unsupported_format() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = temp.path().join("data.rar");
    fs::write(&archive, b"Rar!").unwrap();

    stagehand_cmd()
        .arg("extract")
        .arg(&archive)
        .arg(temp.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not supported"));
    assert!(!temp.path().join("out").exists());
}

#[test]
fn test_build_zip() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = sample_tree(temp.path());
    let output = temp.path().join("bundle.zip");

    stagehand_cmd()
        .arg("build")
        .arg(&source)
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Archive built"));

    assert!(output.is_file());
}

#[test]
fn test_build_json_output() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = sample_tree(temp.path());

    let output = stagehand_cmd()
        .arg("build")
        .arg("--json")
        .arg(&source)
        .arg(temp.path().join("bundle.tar.gz"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).expect("invalid JSON output");
    assert_eq!(json["operation"], "build");
    assert_eq!(json["data"]["files_added"], 3);
    assert!(json["data"]["archive_size"].as_u64().unwrap() > 0);
}

#[test]
fn test_build_exclude_hidden() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = sample_tree(temp.path());

    let output = stagehand_cmd()
        .arg("build")
        .arg("--json")
        .arg("--exclude-hidden")
        .arg(&source)
        .arg(temp.path().join("bundle.tar"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).expect("invalid JSON output");
    assert_eq!(json["data"]["files_added"], 2);
    assert_eq!(json["data"]["files_skipped"], 1);
}

#[test]
fn test_build_output_exists_without_force() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = sample_tree(temp.path());
    let output = temp.path().join("bundle.zip");
    fs::write(&output, "old").unwrap();

    stagehand_cmd()
        .arg("build")
        .arg(&source)
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    stagehand_cmd()
        .arg("build")
        .arg("--force")
        .arg(&source)
        .arg(&output)
        .assert()
        .success();
}

#[test]
fn test_build_invalid_compression_level() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = sample_tree(temp.path());

    stagehand_cmd()
        .arg("build")
        .arg("-l")
        .arg("10")
        .arg(&source)
        .arg(temp.path().join("out.zip"))
        .assert()
        .failure();
}

#[test]
fn test_build_missing_source() {
    let temp = TempDir::new().expect("failed to create temp dir");

    stagehand_cmd()
        .arg("build")
        .arg(temp.path().join("nope"))
        .arg(temp.path().join("out.zip"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Source directory not found"));
}

#[test]
fn test_build_then_extract_round_trip() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = sample_tree(temp.path());
    let archive = temp.path().join("bundle.tgz");
    let restored = temp.path().join("restored");

    stagehand_cmd()
        .arg("build")
        .arg("-l")
        .arg("1")
        .arg(&source)
        .arg(&archive)
        .assert()
        .success();
    stagehand_cmd()
        .arg("extract")
        .arg(&archive)
        .arg(&restored)
        .assert()
        .success();

    assert_eq!(fs::read_to_string(restored.join("a/1.txt")).unwrap(), "x");
    assert_eq!(fs::read_to_string(restored.join(".env")).unwrap(), "secret");
}

#[test]
fn test_list_files_filtered() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = sample_tree(temp.path());

    stagehand_cmd()
        .arg("list-files")
        .arg(&source)
        .arg("-e")
        .arg("csv")
        .assert()
        .success()
        .stdout(predicate::str::contains("2.csv"))
        .stdout(predicate::str::contains("1.txt").not());
}

#[test]
fn test_list_files_json_order() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = sample_tree(temp.path());

    let output = stagehand_cmd()
        .arg("list-files")
        .arg("--json")
        .arg(&source)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).expect("invalid JSON output");
    assert_eq!(json["data"]["total_files"], 3);
    let paths: Vec<&str> = json["data"]["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["path"].as_str().unwrap())
        .collect();
    assert!(paths[0].ends_with(".env"));
    assert!(paths[1].ends_with("1.txt"));
    assert!(paths[2].ends_with("2.csv"));
}

#[test]
fn test_list_files_missing_dir() {
    let temp = TempDir::new().expect("failed to create temp dir");

    stagehand_cmd()
        .arg("list-files")
        .arg(temp.path().join("missing"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_inspect_marks_unsafe_entries() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = temp.path().join("mixed.tar");
    let data = TarTestBuilder::new()
        .add_file("ok.txt", b"fine")
        .add_raw_file("../escape.sh", b"x")
        .build();
    write_archive(&archive, &data);

    stagehand_cmd()
        .arg("inspect")
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("ok.txt"))
        .stdout(predicate::str::contains("would be rejected"));

    stagehand_cmd()
        .arg("inspect")
        .arg("--strict")
        .arg(&archive)
        .assert()
        .failure();

    assert!(!temp.path().join("ok.txt").exists());
}

#[test]
fn test_inspect_json_output() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = sample_zip(temp.path());

    let output = stagehand_cmd()
        .arg("inspect")
        .arg("--json")
        .arg(&archive)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).expect("invalid JSON output");
    assert_eq!(json["data"]["total_entries"], 2);
    assert_eq!(json["data"]["unsafe_entries"], 0);
    assert_eq!(json["data"]["entries"][0]["kind"], "file");
}

#[test]
fn test_clean_removes_tree() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let tree = sample_tree(temp.path());

    stagehand_cmd()
        .arg("clean")
        .arg(&tree)
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed"));
    assert!(!tree.exists());

    stagehand_cmd()
        .arg("clean")
        .arg(&tree)
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to remove"));
}

#[test]
fn test_quiet_with_json_produces_no_output() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archive = sample_zip(temp.path());

    stagehand_cmd()
        .arg("extract")
        .arg("--json")
        .arg("--quiet")
        .arg(&archive)
        .arg(temp.path().join("out"))
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_verbose_and_quiet_conflict() {
    stagehand_cmd()
        .arg("--verbose")
        .arg("--quiet")
        .arg("clean")
        .arg("whatever")
        .assert()
        .failure();
}

#[test]
fn test_completion_bash() {
    stagehand_cmd()
        .arg("completion")
        .arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("stagehand"));
}
