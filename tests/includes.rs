mod common;

use assert_cmd::prelude::*;
use common::write_program;
use lumina_error::ErrorCode;
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn splices_an_included_files_declarations() {
    let dir = tempdir().unwrap();
    write_program(
        dir.path(),
        "material.shader",
        r#"
        struct Material {
            float shininess;
        };
        "#,
    );
    let entry = write_program(
        dir.path(),
        "entry.shader",
        r#"
        #include "material.shader"

        void run() {
            Material m;
            m.shininess = 1.0;
        }
        "#,
    );

    Command::cargo_bin("lumina").unwrap().arg(&entry).assert().success();
}

#[test]
fn expands_a_duplicate_include_only_once() {
    let dir = tempdir().unwrap();
    write_program(
        dir.path(),
        "material.shader",
        r#"
        struct Material {
            float shininess;
        };
        "#,
    );
    let entry = write_program(
        dir.path(),
        "entry.shader",
        r#"
        #include "material.shader"
        #include "material.shader"

        void run() {
            Material m;
        }
        "#,
    );

    Command::cargo_bin("lumina")
        .unwrap()
        .arg(&entry)
        .assert()
        .success()
        .stderr(predicate::str::contains(ErrorCode::DuplicateDeclaration.to_string()).not());
}

#[test]
fn missing_include_produces_a_single_diagnostic_and_continues() {
    let dir = tempdir().unwrap();
    let entry = write_program(
        dir.path(),
        "entry.shader",
        r#"#include "missing.shader""#,
    );

    Command::cargo_bin("lumina")
        .unwrap()
        .arg(&entry)
        .assert()
        .failure()
        .stderr(predicate::str::contains(ErrorCode::IncludeFileNotFound.to_string()))
        .stderr(predicate::str::contains("missing.shader"));
}
