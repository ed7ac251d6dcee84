//! CLI smoke tests.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_the_commands() {
    Command::cargo_bin("hooksmith")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("update"));
}

#[test]
fn version_matches_the_crate() {
    Command::cargo_bin("hooksmith")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn init_outside_a_repository_fails() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    Command::cargo_bin("hooksmith")
        .unwrap()
        .current_dir(temp_dir.path())
        .args(["init", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no git repository"));
}
