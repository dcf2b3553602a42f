//! Exit codes and messages of the `stddoc` binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn stddoc() -> Command {
    let mut cmd = Command::cargo_bin("stddoc").unwrap();
    cmd.env_remove("RUST_LOG").env("NO_COLOR", "1");
    cmd
}

#[test]
fn missing_arguments_print_usage() {
    stddoc()
        .args(["phobos", "2.032"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn bare_invocation_prints_usage() {
    stddoc()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn nonexistent_phobos_dir_exits_three() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("phobos");
    let dest = dir.path().join("phobosdoc");

    stddoc()
        .current_dir(dir.path())
        .arg("phobos")
        .arg("2.032")
        .arg(&missing)
        .arg(&dest)
        .assert()
        .code(3)
        .stderr(predicate::str::contains(format!(
            "The path '{}' doesn't exist.",
            missing.display()
        )));

    assert!(!dest.exists());
}

#[test]
fn nonexistent_tango_dir_exits_three() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("tango");

    stddoc()
        .current_dir(dir.path())
        .arg("tango")
        .arg(&missing)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("doesn't exist."));

    assert!(!dir.path().join("tangodoc").exists());
}

#[test]
fn malformed_version_is_a_user_error() {
    let dir = tempfile::tempdir().unwrap();

    stddoc()
        .current_dir(dir.path())
        .args(["phobos", "two", "."])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid version 'two'"));
}

#[test]
fn missing_dil_is_a_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("phobos")).unwrap();

    stddoc()
        .current_dir(dir.path())
        .env("STDDOC_TOOL__DIL_ROOT", dir.path().join("no-dil"))
        .args(["phobos", "2.032", "phobos"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("generator not found"));

    assert!(!dir.path().join("phobosdoc").exists());
}

#[test]
fn unknown_config_key_is_reported() {
    let dir = tempfile::tempdir().unwrap();

    stddoc()
        .current_dir(dir.path())
        .args(["config", "get", "nope"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn config_get_reads_environment() {
    let dir = tempfile::tempdir().unwrap();

    stddoc()
        .current_dir(dir.path())
        .env("STDDOC_ARCHIVE__SEVEN_ZIP", "7za")
        .args(["config", "get", "archive.seven_zip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("archive.seven_zip = 7za"));
}
