//! CLI smoke tests for the maestro binary

use assert_cmd::Command;
use predicates::prelude::*;

fn maestro() -> Command {
    Command::cargo_bin("maestro").expect("binary should build")
}

#[test]
fn test_help_lists_subcommands_and_log_path() {
    maestro()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("show-config"))
        .stdout(predicate::str::contains("Logs are written to"));
}

#[test]
fn test_version() {
    maestro()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("maestro"));
}

#[test]
fn test_unknown_mode_is_rejected() {
    maestro()
        .args(["chat", "--mode", "brunch"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown mode: brunch"));
}

#[test]
fn test_unknown_locale_is_rejected() {
    maestro()
        .args(["chat", "--locale", "fr"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown locale"));
}
