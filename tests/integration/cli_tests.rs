//! CLI integration tests
//!
//! These tests verify argument handling and the configuration checks that
//! run before any network access.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command running in an empty directory with no credentials in the environment
fn assetaudit(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("assetaudit").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("ENVIRONMENT_ID")
        .env_remove("API_KEY");
    cmd
}

#[test]
fn test_cli_help() {
    let dir = TempDir::new().unwrap();
    assetaudit(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("assetaudit"))
        .stdout(predicate::str::contains("--match-mode"))
        .stdout(predicate::str::contains("--output-dir"));
}

#[test]
fn test_cli_version() {
    let dir = TempDir::new().unwrap();
    assetaudit(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_environment_id_fails() {
    let dir = TempDir::new().unwrap();
    assetaudit(&dir)
        .env("API_KEY", "secret")
        .assert()
        .failure()
        .stderr(predicate::str::contains("ENVIRONMENT_ID"));

    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_missing_api_key_fails() {
    let dir = TempDir::new().unwrap();
    assetaudit(&dir)
        .env("ENVIRONMENT_ID", "env")
        .assert()
        .failure()
        .stderr(predicate::str::contains("API_KEY"));
}

#[test]
fn test_env_file_missing_key() {
    let dir = TempDir::new().unwrap();
    let env_file = dir.path().join("audit.env");
    std::fs::write(&env_file, "ENVIRONMENT_ID=env-from-file\n").unwrap();

    assetaudit(&dir)
        .arg("--env-file")
        .arg(&env_file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("API_KEY"));
}

#[test]
fn test_invalid_match_mode_rejected() {
    let dir = TempDir::new().unwrap();
    assetaudit(&dir)
        .args(["--match-mode", "fuzzy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("fuzzy"));
}
