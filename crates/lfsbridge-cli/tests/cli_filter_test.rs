// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2026 LfsBridge Contributors

//! `lfsbridge filter` end-to-end tests against stub helpers.

#![cfg(unix)]

use lfsbridge_test_utils::{LfsbridgeCommand, StubHelper, TestPaths, TestRepo};
use predicates::prelude::*;
use tempfile::TempDir;

fn filter(repo: &TestRepo, stub: &StubHelper) -> LfsbridgeCommand {
    LfsbridgeCommand::new()
        .in_dir(repo.path())
        .with_helper(stub)
        .args(&["--quiet", "filter"])
}

#[test]
fn test_clean_round_trip_through_helper() {
    let repo = TestRepo::initialized();
    let stub = StubHelper::echo();

    let assert = filter(&repo, &stub)
        .args(&["clean", "a.bin"])
        .stdin("HELLO")
        .run_success();

    assert_eq!(assert.get_output().stdout, b"HELLO");
}

#[test]
fn test_smudge_returns_helper_output() {
    let repo = TestRepo::initialized();
    let stub = StubHelper::uppercase();

    let assert = filter(&repo, &stub)
        .args(&["smudge", "Assets/hero.psd"])
        .stdin("pointer contents")
        .run_success();

    assert_eq!(assert.get_output().stdout, b"POINTER CONTENTS");
}

#[test]
fn test_mode_reaches_helper() {
    let repo = TestRepo::initialized();
    let stub = StubHelper::mode_prefix();

    let cleaned = filter(&repo, &stub).args(&["clean", "a.bin"]).stdin("x").run_success();
    let smudged = filter(&repo, &stub).args(&["smudge", "a.bin"]).stdin("y").run_success();

    assert_eq!(cleaned.get_output().stdout, b"clean:x");
    assert_eq!(smudged.get_output().stdout, b"smudge:y");
}

#[test]
fn test_file_argument_is_optional() {
    let repo = TestRepo::initialized();
    let stub = StubHelper::echo();

    let assert = filter(&repo, &stub).arg("clean").stdin("no path").run_success();

    assert_eq!(assert.get_output().stdout, b"no path");
}

#[test]
fn test_large_content_streams_through() {
    let repo = TestRepo::initialized();
    let stub = StubHelper::echo();
    let payload: Vec<u8> = (0..2 * 1024 * 1024).map(|i| (i % 253) as u8).collect();

    let assert = filter(&repo, &stub)
        .args(&["clean", "big.bin"])
        .stdin(payload.clone())
        .run_success();

    assert!(assert.get_output().stdout == payload);
}

#[test]
fn test_disabled_filter_passes_content_through() {
    let repo = TestRepo::initialized();
    // Would fail if it were ever started.
    let stub = StubHelper::failing(9);

    let assert = filter(&repo, &stub)
        .env("LFSBRIDGE_FILTER_ENABLED", "false")
        .args(&["clean", "a.bin"])
        .stdin("untouched")
        .run_success();

    assert_eq!(assert.get_output().stdout, b"untouched");
}

#[test]
fn test_failing_helper_fails_command() {
    let repo = TestRepo::initialized();
    let stub = StubHelper::failing(3);

    filter(&repo, &stub)
        .args(&["clean", "a.bin"])
        .stdin("data")
        .run_failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("complete failed for a.bin"));
}

#[test]
fn test_missing_helper_fails_command() {
    let repo = TestRepo::initialized();

    LfsbridgeCommand::new()
        .in_dir(repo.path())
        .env("LFSBRIDGE_HELPER_PROGRAM", "/nonexistent/git-lfs")
        .args(&["--quiet", "filter", "clean", "a.bin"])
        .stdin("data")
        .run_failure()
        .stderr(predicate::str::contains("create failed for a.bin"));
}

#[test]
fn test_helper_from_repository_config() {
    let repo = TestRepo::initialized();
    let stub = StubHelper::uppercase();
    repo.write_config(&format!(
        "[helper]\nprogram = \"{}\"\nargs = [\"{}\"]\n",
        stub.program().display(),
        stub.script().display()
    ));

    let assert = LfsbridgeCommand::new()
        .in_dir(repo.path())
        .args(&["--quiet", "filter", "smudge", "a.bin"])
        .stdin("from config")
        .run_success();

    assert_eq!(assert.get_output().stdout, b"FROM CONFIG");
}

#[test]
fn test_filter_with_repository_flag() {
    let repo = TestRepo::initialized();
    let elsewhere = TempDir::new().unwrap();
    let stub = StubHelper::echo();

    let assert = LfsbridgeCommand::new()
        .in_dir(elsewhere.path())
        .with_helper(&stub)
        .args(&["-C", &TestPaths::to_arg(repo.path()), "filter", "clean", "a.bin"])
        .stdin("elsewhere")
        .run_success();

    assert_eq!(assert.get_output().stdout, b"elsewhere");
}

#[test]
fn test_logs_never_reach_stdout() {
    let repo = TestRepo::initialized();
    let stub = StubHelper::echo();

    let assert = LfsbridgeCommand::new()
        .in_dir(repo.path())
        .with_helper(&stub)
        .args(&["--verbose", "filter", "clean", "a.bin"])
        .stdin("content only")
        .run_success();

    assert_eq!(assert.get_output().stdout, b"content only");
}
