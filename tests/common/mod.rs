use assert_cmd::prelude::*;
use lumina_error::ErrorCode;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

/// Writes `program` to a temporary `.shader` file and runs the compiled
/// `lumina` binary against it, asserting a clean (diagnostic-free) exit.
pub fn compile_and_assert_clean(program: &str) {
    let temp_dir = tempdir().unwrap();
    let source_path = temp_dir.path().join("test_program.shader");
    fs::write(&source_path, program).unwrap();

    Command::cargo_bin("lumina")
        .unwrap()
        .arg(&source_path)
        .assert()
        .success();
}

/// Writes `program` to a temporary `.shader` file, runs `lumina` against
/// it, and asserts the run failed with a diagnostic carrying
/// `expected_code` and containing `expected_message` on stderr.
pub fn compile_and_expect_error(program: &str, expected_code: ErrorCode, expected_message: &str) {
    let temp_dir = tempdir().unwrap();
    let source_path = temp_dir.path().join("test_program.shader");
    fs::write(&source_path, program).unwrap();

    Command::cargo_bin("lumina")
        .unwrap()
        .arg(&source_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains(expected_code.to_string()))
        .stderr(predicate::str::contains(expected_message));
}

/// Like [`compile_and_assert_clean`] but returns the temp directory so the
/// caller can create additional files (e.g. include targets) alongside the
/// entry file before invoking the compiler themselves.
pub fn write_program(dir: &std::path::Path, name: &str, program: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, program).unwrap();
    path
}
