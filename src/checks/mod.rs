//! Structural checks.
//!
//! - Copyright: license header block at the top of every source file
//! - Header guard: path-derived `#ifndef`/`#define`/`#endif` triple
//! - Coverage: line and function coverage thresholds
//!
//! # Graceful Degradation
//!
//! Checks never panic on file content. Unreadable files, short files and
//! malformed reports all become `CheckResult::Fail` with a diagnostic, so a
//! single bad file never hides the results for the rest of the tree.

pub mod copyright;
pub mod coverage;
pub mod guard;

use crate::CheckKind;

/// Description of an available check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInfo {
    pub kind: CheckKind,
    pub description: &'static str,
    pub input: &'static str,
}

/// Get all available checks
pub fn get_all_checks() -> Vec<CheckInfo> {
    vec![
        CheckInfo {
            kind: CheckKind::Copyright,
            description: "License header block followed by a blank line",
            input: "*.h, *.cc under include/, src/, test/",
        },
        CheckInfo {
            kind: CheckKind::HeaderGuard,
            description: "#ifndef/#define pair and trailing #endif with path-derived symbol",
            input: "*.h under include/",
        },
        CheckInfo {
            kind: CheckKind::Coverage,
            description: "Line and function coverage against thresholds",
            input: "coverage summary report",
        },
    ]
}
