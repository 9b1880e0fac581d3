//! Smoke tests for command wiring and failure paths that need no database

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn dormctl(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dormctl").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("DB_HOST")
        .env_remove("DB_PORT")
        .env_remove("DB_NAME")
        .env_remove("DB_USER")
        .env_remove("DB_PASSWORD");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    dormctl(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("report"));
}

#[test]
fn test_report_help() {
    let dir = TempDir::new().unwrap();
    dormctl(&dir)
        .args(["report", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--reference-date"))
        .stdout(predicate::str::contains("--only"));
}

#[test]
fn test_load_help() {
    let dir = TempDir::new().unwrap();
    dormctl(&dir)
        .args(["load", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rooms JSON array"));
}

#[test]
fn test_unknown_report_rejected() {
    let dir = TempDir::new().unwrap();
    dormctl(&dir)
        .args(["report", "--only", "oldest"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown report 'oldest'"));
}

#[test]
fn test_bad_reference_date_rejected() {
    let dir = TempDir::new().unwrap();
    dormctl(&dir)
        .args(["run", "--reference-date", "21/10/2025"])
        .assert()
        .failure();
}

#[test]
fn test_unreachable_database_writes_nothing() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("rooms.json"), r#"[{"id": 1, "name": "Red"}]"#).unwrap();
    std::fs::write(dir.path().join("students.json"), "[]").unwrap();

    dormctl(&dir)
        .args(["run", "--host", "127.0.0.1", "--port", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not connect"));

    for report in [
        "rooms_and_students_on_them.json",
        "youngest_rooms.json",
        "rooms_with_large_age_difference.json",
        "multisex_rooms.json",
    ] {
        assert!(!dir.path().join(report).exists(), "{report} should not exist");
    }
}

#[test]
fn test_missing_explicit_config_fails() {
    let dir = TempDir::new().unwrap();
    dormctl(&dir)
        .args(["init", "--config", "nope.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load configuration"));
}
