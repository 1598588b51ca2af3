use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_lists_subcommands() {
    cargo_bin_cmd!("medgal")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("logout"))
        .stdout(predicate::str::contains("whoami"))
        .stdout(predicate::str::contains("health"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_version() {
    cargo_bin_cmd!("medgal")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("medgal"));
}

#[test]
fn test_login_requires_a_flow() {
    let dir = tempfile::tempdir().unwrap();
    cargo_bin_cmd!("medgal")
        .env("MEDGAL_HOME", dir.path())
        .arg("login")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--email"));
}
