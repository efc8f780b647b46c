//! Integration tests for the filo CLI
//!
//! Every test points FILO_DATA_DIR at a temp directory so no real user
//! state is touched, and none of them require a running Ollama service.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn filo_cmd(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("filo").unwrap();
    cmd.env("FILO_DATA_DIR", data_dir.path());
    cmd
}

fn setup_scan_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("report_2024.pdf"), b"pdf").unwrap();
    fs::write(dir.path().join("notes.txt"), b"txt").unwrap();
    fs::write(dir.path().join("photo.JPG"), b"jpg").unwrap();
    fs::write(dir.path().join(".hidden"), b"x").unwrap();
    dir
}

#[test]
fn test_scan_counts_visible_files() {
    let data_dir = TempDir::new().unwrap();
    let scan_dir = setup_scan_dir();

    filo_cmd(&data_dir)
        .arg("scan")
        .arg(scan_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Files:   3"))
        .stdout(predicate::str::contains(".jpg"));
}

#[test]
fn test_scan_missing_directory_fails() {
    let data_dir = TempDir::new().unwrap();

    filo_cmd(&data_dir)
        .arg("scan")
        .arg("/definitely/not/a/real/path")
        .assert()
        .failure()
        .code(1);
}

#[test]
fn test_config_shows_defaults() {
    let data_dir = TempDir::new().unwrap();

    filo_cmd(&data_dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("= qwen3:8b"))
        .stdout(predicate::str::contains("= 0.85"))
        .stdout(predicate::str::contains("batch_size"));
}

#[test]
fn test_config_set_persists() {
    let data_dir = TempDir::new().unwrap();

    filo_cmd(&data_dir)
        .arg("config")
        .arg("--set")
        .arg("llm_model=llama3.2:3b")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration saved"));

    filo_cmd(&data_dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("= llama3.2:3b"));
}

#[test]
fn test_config_set_unknown_key_fails() {
    let data_dir = TempDir::new().unwrap();

    filo_cmd(&data_dir)
        .arg("config")
        .arg("--set")
        .arg("frobnicate=yes")
        .assert()
        .failure()
        .code(1);
}

#[test]
fn test_stats_on_fresh_database() {
    let data_dir = TempDir::new().unwrap();

    filo_cmd(&data_dir)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Classifications: 0"))
        .stdout(predicate::str::contains("Learning:        on"));
}

#[test]
fn test_reset_all_with_yes() {
    let data_dir = TempDir::new().unwrap();

    filo_cmd(&data_dir)
        .arg("reset")
        .arg("all")
        .arg("--yes")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared all learned state"));
}

#[test]
fn test_undo_list_empty() {
    let data_dir = TempDir::new().unwrap();

    filo_cmd(&data_dir)
        .arg("undo")
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No undoable operations"));
}

#[test]
fn test_undo_without_batches() {
    let data_dir = TempDir::new().unwrap();

    filo_cmd(&data_dir)
        .arg("undo")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to undo"));
}

#[test]
fn test_undo_unknown_batch_fails() {
    let data_dir = TempDir::new().unwrap();

    filo_cmd(&data_dir)
        .arg("undo")
        .arg("19990101_000000")
        .assert()
        .failure()
        .code(1);
}

#[test]
fn test_organize_missing_directory_fails() {
    let data_dir = TempDir::new().unwrap();

    filo_cmd(&data_dir)
        .arg("/definitely/not/a/real/path")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Directory not found"));
}

#[test]
fn test_organize_empty_directory_succeeds() {
    let data_dir = TempDir::new().unwrap();
    let empty = TempDir::new().unwrap();

    filo_cmd(&data_dir)
        .arg(empty.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to organize"));
}

#[test]
fn test_organize_requires_service_for_unknown_files() {
    let data_dir = TempDir::new().unwrap();
    // Point the service URL somewhere nothing listens
    fs::write(
        data_dir.path().join("config.json"),
        br#"{"ollama_url": "http://127.0.0.1:9"}"#,
    )
    .unwrap();

    let scan_dir = setup_scan_dir();

    filo_cmd(&data_dir)
        .arg(scan_dir.path())
        .arg("--dry-run")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Ollama service is not running"));
}
