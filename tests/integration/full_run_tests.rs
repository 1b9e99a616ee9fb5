//! End-to-end runs of the library entry point against temporary trees.

use crate::mocks::{coverage_summary, header_file, license, source_file, MockTree};
use scl_lint::checks::coverage::ThresholdMode;
use scl_lint::{run_checks, CheckKind, CheckResult, Finding, LintConfig};

fn config_for(tree: &MockTree, kinds: &[CheckKind]) -> LintConfig {
    LintConfig {
        base_dir: tree.path().to_path_buf(),
        kinds: kinds.to_vec(),
        ..Default::default()
    }
}

fn failures(findings: &[Finding]) -> Vec<&Finding> {
    findings.iter().filter(|f| f.result.is_failure()).collect()
}

fn fail_message(finding: &Finding) -> &str {
    match &finding.result {
        CheckResult::Fail { message, .. } => message,
        other => panic!("expected failure, got {:?}", other),
    }
}

#[test]
fn test_valid_tree_passes() {
    let tree = MockTree::valid();
    let report = run_checks(&config_for(&tree, &[CheckKind::Copyright, CheckKind::HeaderGuard])).unwrap();

    let summary = report.summary();
    // 4 files for copyright, 2 headers for guards
    assert_eq!(summary.total, 6);
    assert_eq!(summary.passed, 6);
    assert_eq!(summary.exit_code(), 0);
    assert!(report.passed());
}

#[test]
fn test_findings_are_sorted_by_path() {
    let tree = MockTree::valid();
    let report = run_checks(&config_for(&tree, &[CheckKind::Copyright])).unwrap();

    let targets: Vec<_> = report.findings.iter().map(|f| f.target.as_str()).collect();
    assert_eq!(
        targets,
        vec![
            "include/scl/hash.h",
            "include/scl/util/prg.h",
            "src/scl/hash.cc",
            "test/scl/test_hash.cc"
        ]
    );
}

#[test]
fn test_run_is_idempotent() {
    let tree = MockTree::valid();
    tree.write("src/scl/bad.cc", "int x;\n");
    let config = config_for(&tree, &[CheckKind::Copyright, CheckKind::HeaderGuard]);

    let first = run_checks(&config).unwrap();
    let second = run_checks(&config).unwrap();

    assert_eq!(first.summary(), second.summary());
    let statuses = |r: &scl_lint::Report| r.findings.iter().map(|f| f.result.status()).collect::<Vec<_>>();
    assert_eq!(statuses(&first), statuses(&second));
}

#[test]
fn test_empty_file_fails_on_first_line() {
    let tree = MockTree::valid();
    tree.write("src/scl/empty.cc", "");

    let report = run_checks(&config_for(&tree, &[CheckKind::Copyright])).unwrap();
    let failed = failures(&report.findings);

    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].target, "src/scl/empty.cc");
    assert_eq!(fail_message(failed[0]), "src/scl/empty.cc invalid header (error on line: 0)");
    assert_eq!(report.summary().exit_code(), 1);
}

#[test]
fn test_missing_blank_line_after_header_fails() {
    let tree = MockTree::valid();
    tree.write("src/scl/tight.cc", &format!("{}#include <vector>\n", license(2023)));

    let report = run_checks(&config_for(&tree, &[CheckKind::Copyright])).unwrap();
    let failed = failures(&report.findings);

    assert_eq!(failed.len(), 1);
    assert_eq!(fail_message(failed[0]), "src/scl/tight.cc invalid header (error on line: 16)");
}

#[test]
fn test_any_copyright_holder_is_accepted() {
    let tree = MockTree::new();
    let content = source_file().replace("Anders Dalskov", "Someone Else");
    tree.write("src/other.cc", &content);

    let report = run_checks(&config_for(&tree, &[CheckKind::Copyright])).unwrap();
    assert!(report.passed());
}

#[test]
fn test_non_matching_extensions_are_ignored() {
    let tree = MockTree::valid();
    tree.write("src/CMakeLists.txt", "cmake_minimum_required(VERSION 3.14)\n");
    tree.write("include/scl/notes.md", "# notes\n");

    let report = run_checks(&config_for(&tree, &[CheckKind::Copyright, CheckKind::HeaderGuard])).unwrap();
    assert_eq!(report.summary().total, 6);
    assert!(report.passed());
}

#[test]
fn test_guard_with_wrong_case_fails() {
    let tree = MockTree::valid();
    tree.write("include/scl/net/channel.h", &header_file("_scl_net_channel_h"));

    let report = run_checks(&config_for(&tree, &[CheckKind::HeaderGuard])).unwrap();
    let failed = failures(&report.findings);

    assert_eq!(failed.len(), 1);
    assert_eq!(fail_message(failed[0]), "No opening header in include/scl/net/channel.h");
}

#[test]
fn test_guard_with_wrong_endif_reports_expected_and_found() {
    let tree = MockTree::valid();
    let content = header_file("_SCL_MATH_FF_H").replace("#endif  // _SCL_MATH_FF_H", "#endif // _SCL_MATH_FF_H");
    tree.write("include/scl/math/ff.h", &content);

    let report = run_checks(&config_for(&tree, &[CheckKind::HeaderGuard])).unwrap();
    let failed = failures(&report.findings);

    assert_eq!(failed.len(), 1);
    assert_eq!(fail_message(failed[0]), "include/scl/math/ff.h invalid header");
    match &failed[0].result {
        CheckResult::Fail { details, .. } => {
            assert!(details.contains("Expected:"));
            assert!(details.contains("#endif  // _SCL_MATH_FF_H"));
            assert!(details.contains("Found:"));
            assert!(details.contains("#endif // _SCL_MATH_FF_H"));
        }
        _ => unreachable!(),
    }
}

#[test]
fn test_guard_symbol_uses_path_below_root() {
    let tree = MockTree::new();
    tree.write("include/scl/util/hash.h", &header_file("_SCL_UTIL_HASH_H"));
    tree.write("include/top.h", &header_file("_TOP_H"));

    let report = run_checks(&config_for(&tree, &[CheckKind::HeaderGuard])).unwrap();
    assert_eq!(report.summary().passed, 2);
}

#[test]
fn test_parallel_matches_sequential() {
    let tree = MockTree::valid();
    for i in 0..12 {
        tree.write(&format!("src/scl/gen_{:02}.cc", i), &source_file());
    }
    tree.write("src/scl/gen_05.cc", "// no header\n");
    tree.write("include/scl/gen.h", &header_file("_SCL_GEN"));

    let sequential = run_checks(&config_for(&tree, &[CheckKind::Copyright, CheckKind::HeaderGuard])).unwrap();
    let parallel = run_checks(&LintConfig {
        parallel: true,
        jobs: 3,
        ..config_for(&tree, &[CheckKind::Copyright, CheckKind::HeaderGuard])
    })
    .unwrap();

    assert_eq!(sequential.summary(), parallel.summary());
    let view = |r: &scl_lint::Report| {
        r.findings
            .iter()
            .map(|f| (f.kind, f.target.clone(), f.result.status()))
            .collect::<Vec<_>>()
    };
    assert_eq!(view(&sequential), view(&parallel));
    assert_eq!(sequential.summary().failed, 2);
}

#[test]
fn test_fail_fast_stops_after_first_failure() {
    let tree = MockTree::new();
    tree.write("src/a.cc", "bad\n");
    tree.write("src/b.cc", "bad\n");
    tree.write("src/c.cc", "bad\n");

    let report = run_checks(&LintConfig {
        fail_fast: true,
        ..config_for(&tree, &[CheckKind::Copyright])
    })
    .unwrap();

    assert_eq!(report.summary().failed, 1);
    assert_eq!(report.summary().exit_code(), 1);
}

#[test]
fn test_missing_root_is_a_warning() {
    let tree = MockTree::new();
    tree.write("src/scl/hash.cc", &source_file());

    let report = run_checks(&config_for(&tree, &[CheckKind::Copyright])).unwrap();
    let summary = report.summary();

    // include/ and test/ are absent
    assert_eq!(summary.warned, 2);
    assert_eq!(summary.passed, 1);
    assert_eq!(summary.exit_code(), 0);
}

#[test]
fn test_no_headers_is_skipped() {
    let tree = MockTree::new();
    tree.write("include/README", "headers live here\n");

    let report = run_checks(&config_for(&tree, &[CheckKind::HeaderGuard])).unwrap();
    let summary = report.summary();

    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.exit_code(), 0);
}

#[test]
fn test_coverage_threshold_modes() {
    let tree = MockTree::new();
    tree.write("build/summary.txt", &coverage_summary(100.0, 100.0));

    let mut config = LintConfig {
        coverage_report: Some(tree.join("build/summary.txt")),
        ..config_for(&tree, &[CheckKind::Coverage])
    };

    let report = run_checks(&config).unwrap();
    assert!(report.passed());

    config.settings.coverage.mode = ThresholdMode::Above;
    let report = run_checks(&config).unwrap();
    assert!(!report.passed());
    assert_eq!(fail_message(&report.findings[0]), "Coverage not met");
}

#[test]
fn test_coverage_below_threshold_fails() {
    let tree = MockTree::new();
    tree.write("summary.txt", &coverage_summary(96.4, 85.0));

    let mut config = LintConfig {
        coverage_report: Some(tree.join("summary.txt")),
        ..config_for(&tree, &[CheckKind::Coverage])
    };
    config.settings.coverage.lines = 95.0;
    config.settings.coverage.functions = 90.0;

    let report = run_checks(&config).unwrap();
    assert_eq!(report.summary().failed, 1);
    match &report.findings[0].result {
        CheckResult::Fail { details, .. } => {
            assert!(details.contains("functions coverage 85.0%"));
            assert!(details.contains("not met"));
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[test]
fn test_missing_coverage_report_fails() {
    let tree = MockTree::new();
    let config = LintConfig {
        coverage_report: Some(tree.join("nope.txt")),
        ..config_for(&tree, &[CheckKind::Coverage])
    };

    let report = run_checks(&config).unwrap();
    assert_eq!(report.summary().failed, 1);
}
