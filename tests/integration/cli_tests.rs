//! CLI integration tests.
//!
//! Runs the built binary against temporary trees and checks exit codes and
//! output.

use crate::mocks::{coverage_summary, header_file, MockTree};
use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

fn scl_lint(tree: &MockTree) -> Command {
    let mut cmd = Command::cargo_bin("scl-lint").unwrap();
    cmd.env_remove("SCL_LINT_CONFIG")
        .env_remove("SCL_LINT_LOG")
        .arg("--no-color")
        .arg("-C")
        .arg(tree.path());
    cmd
}

#[test]
fn test_clean_tree_exits_zero() {
    let tree = MockTree::valid();
    scl_lint(&tree)
        .assert()
        .code(0)
        .stdout(contains("COPYRIGHT HEADERS"))
        .stdout(contains("HEADER GUARDS"))
        .stdout(contains("SUMMARY: 6 passed, 0 warnings, 0 failed, 0 skipped"));
}

#[test]
fn test_bad_header_exits_one() {
    let tree = MockTree::valid();
    tree.write("src/scl/bad.cc", "#include <vector>\n");

    scl_lint(&tree)
        .arg("headers")
        .assert()
        .code(1)
        .stdout(contains("src/scl/bad.cc invalid header (error on line: 0)"))
        .stdout(contains("failures detected"));
}

#[test]
fn test_bad_guard_exits_one() {
    let tree = MockTree::valid();
    tree.write("include/scl/ss/shamir.h", &header_file("SCL_SS_SHAMIR_H"));

    scl_lint(&tree)
        .arg("guards")
        .assert()
        .code(1)
        .stdout(contains("No opening header in include/scl/ss/shamir.h"));
}

#[test]
fn test_guards_ignore_copyright_failures() {
    let tree = MockTree::valid();
    tree.write("src/scl/bad.cc", "int x;\n");

    scl_lint(&tree).arg("guards").assert().code(0);
}

#[test]
fn test_coverage_exact_threshold() {
    let tree = MockTree::new();
    tree.write("summary.txt", &coverage_summary(95.0, 95.0));
    let report = tree.join("summary.txt");

    scl_lint(&tree)
        .args(["coverage", "--line-threshold", "95", "--function-threshold", "95"])
        .arg(&report)
        .assert()
        .code(0);

    scl_lint(&tree)
        .args(["coverage", "--mode", "above", "--line-threshold", "95", "--function-threshold", "95"])
        .arg(&report)
        .assert()
        .code(1)
        .stdout(contains("Coverage not met"));
}

#[test]
fn test_coverage_default_requires_full_coverage() {
    let tree = MockTree::new();
    tree.write("summary.txt", &coverage_summary(96.4, 85.0));

    scl_lint(&tree)
        .arg("coverage")
        .arg(tree.join("summary.txt"))
        .assert()
        .code(1)
        .stdout(contains("lines coverage 96.4% (required >= 100.0%) not met"));
}

#[test]
fn test_malformed_coverage_report_fails() {
    let tree = MockTree::new();
    tree.write("summary.txt", "nothing to see\n");

    scl_lint(&tree)
        .arg("coverage")
        .arg(tree.join("summary.txt"))
        .assert()
        .code(1)
        .stdout(contains("malformed coverage report"));
}

#[test]
fn test_check_with_coverage_runs_everything() {
    let tree = MockTree::valid();
    tree.write("build/summary.txt", &coverage_summary(100.0, 100.0));

    scl_lint(&tree)
        .arg("check")
        .arg("--coverage")
        .arg(tree.join("build/summary.txt"))
        .assert()
        .code(0)
        .stdout(contains("COVERAGE"))
        .stdout(contains("SUMMARY: 7 passed"));
}

#[test]
fn test_invalid_threshold_exits_two() {
    let tree = MockTree::valid();
    scl_lint(&tree)
        .args(["--line-threshold", "150"])
        .assert()
        .code(2)
        .stderr(contains("Error:"));
}

#[test]
fn test_broken_config_file_exits_two() {
    let tree = MockTree::valid();
    tree.write("scl-lint.toml", "[guards]\nunknown = true\n");

    scl_lint(&tree).assert().code(2).stderr(contains("scl-lint.toml"));
}

#[test]
fn test_coverage_run_ignores_empty_roots() {
    let tree = MockTree::new();
    tree.write("scl-lint.toml", "[copyright]\nroots = []\n[guards]\nroots = []\n");
    tree.write("summary.txt", &coverage_summary(100.0, 100.0));

    scl_lint(&tree).arg("coverage").arg(tree.join("summary.txt")).assert().code(0);
    scl_lint(&tree)
        .arg("guards")
        .assert()
        .code(2)
        .stderr(contains("guards.roots must not be empty"));
}

#[test]
fn test_config_file_changes_guard_prefix() {
    let tree = MockTree::new();
    tree.write("scl-lint.toml", "[guards]\nprefix = \"\"\n");
    tree.write("include/scl/hash.h", &header_file("SCL_HASH_H"));

    scl_lint(&tree).arg("guards").assert().code(0);
}

#[test]
fn test_json_output() {
    let tree = MockTree::valid();
    tree.write("src/scl/bad.cc", "int x;\n");

    let output = scl_lint(&tree).args(["--format", "json", "headers"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["passed"], false);
    assert_eq!(doc["summary"]["failed"], 1);
    assert_eq!(doc["summary"]["passed"], 4);
    let failed: Vec<_> = doc["findings"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|f| f["result"]["status"] == "fail")
        .collect();
    assert_eq!(failed[0]["target"], "src/scl/bad.cc");
    assert_eq!(failed[0]["kind"], "copyright");
}

#[test]
fn test_junit_output() {
    let tree = MockTree::valid();
    scl_lint(&tree)
        .args(["--format", "junit"])
        .assert()
        .code(0)
        .stdout(predicate::str::starts_with("<?xml"))
        .stdout(contains("<testsuite name=\"guards\""));
}

#[test]
fn test_quiet_hides_passes() {
    let tree = MockTree::valid();
    tree.write("src/scl/bad.cc", "int x;\n");

    scl_lint(&tree)
        .args(["-q", "headers"])
        .assert()
        .code(1)
        .stdout(contains("[FAIL]"))
        .stdout(contains("[PASS]").not());
}

#[test]
fn test_list_command() {
    Command::cargo_bin("scl-lint")
        .unwrap()
        .arg("list")
        .assert()
        .success()
        .stdout(contains("copyright"))
        .stdout(contains("guards"))
        .stdout(contains("coverage"));
}

#[test]
fn test_version_command() {
    Command::cargo_bin("scl-lint")
        .unwrap()
        .arg("version")
        .assert()
        .success()
        .stdout(contains("scl-lint"));
}

#[test]
fn test_unknown_flag_is_rejected() {
    Command::cargo_bin("scl-lint")
        .unwrap()
        .arg("--frobnicate")
        .assert()
        .failure()
        .stderr(contains("--frobnicate"));
}
