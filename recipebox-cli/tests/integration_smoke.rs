//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_top_level_help_lists_commands() {
    let mut cmd = Command::cargo_bin("recipebox").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("provision"));
}

#[test]
fn test_serve_help() {
    let mut cmd = Command::cargo_bin("recipebox").unwrap();
    cmd.arg("serve").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Address to bind to"))
        .stdout(predicate::str::contains("--in-memory"));
}

#[test]
fn test_provision_help() {
    let mut cmd = Command::cargo_bin("recipebox").unwrap();
    cmd.arg("provision").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Table holding recipe documents"));
}

#[test]
fn test_config_path_honours_flag() {
    let mut cmd = Command::cargo_bin("recipebox").unwrap();
    cmd.args(["--config", "/tmp/recipebox-test.toml", "config", "path"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("/tmp/recipebox-test.toml"));
}

#[test]
fn test_config_show_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[database]\ntable = \"dishes\"\n").unwrap();

    let mut cmd = Command::cargo_bin("recipebox").unwrap();
    cmd.arg("--config")
        .arg(&path)
        .args(["config", "show"])
        .env_remove("RECIPEBOX_DB_TABLE");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("table = \"dishes\""));
}

#[test]
fn test_config_show_missing_file_fails() {
    let mut cmd = Command::cargo_bin("recipebox").unwrap();
    cmd.args(["--config", "/nonexistent/recipebox.toml", "config", "show"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_completions_bash() {
    let mut cmd = Command::cargo_bin("recipebox").unwrap();
    cmd.arg("completions").arg("bash");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("recipebox"));
}
