//! Result aggregation and reporting.
//!
//! Collects findings and generates summaries.

use crate::{CheckKind, CheckResult, Finding};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Result summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub passed: u32,
    pub warned: u32,
    pub failed: u32,
    pub skipped: u32,
    pub total: u32,
    pub total_duration_ms: u64,
}

impl ResultSummary {
    fn from_findings<'a>(findings: impl IntoIterator<Item = &'a Finding>) -> Self {
        let mut summary = ResultSummary::default();

        for finding in findings {
            summary.total += 1;
            summary.total_duration_ms += finding.result.duration_ms();

            match &finding.result {
                CheckResult::Pass { .. } => summary.passed += 1,
                CheckResult::Warn { .. } => summary.warned += 1,
                CheckResult::Fail { .. } => summary.failed += 1,
                CheckResult::Skip { .. } => summary.skipped += 1,
            }
        }

        summary
    }

    /// Process exit code for this summary: 1 if anything failed, else 0.
    pub fn exit_code(&self) -> u8 {
        if self.failed > 0 {
            1
        } else {
            0
        }
    }
}

/// Report containing every finding of a run
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub timestamp: DateTime<Utc>,
    pub base_dir: String,
    pub findings: Vec<Finding>,
    pub total_duration_ms: u64,
}

impl ValidationReport {
    /// Create a new empty report
    pub fn new() -> Self {
        ValidationReport {
            timestamp: Utc::now(),
            base_dir: ".".to_string(),
            findings: Vec::new(),
            total_duration_ms: 0,
        }
    }

    /// Calculate summary statistics
    pub fn summary(&self) -> ResultSummary {
        ResultSummary::from_findings(&self.findings)
    }

    /// Whether every finding passed, warned or was skipped
    pub fn passed(&self) -> bool {
        !self.findings.iter().any(|f| f.result.is_failure())
    }

    /// Findings for one check kind, in run order
    pub fn by_kind(&self, kind: CheckKind) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.kind == kind)
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Result aggregator for collecting findings
#[derive(Debug, Default)]
pub struct ResultAggregator {
    findings: Vec<Finding>,
    total_duration_ms: u64,
}

impl ResultAggregator {
    /// Create a new result aggregator
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_duration(&mut self, total_duration_ms: u64) {
        self.total_duration_ms = total_duration_ms;
    }

    /// Add a completed finding
    pub fn add_result(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn extend(&mut self, findings: impl IntoIterator<Item = Finding>) {
        self.findings.extend(findings);
    }

    /// Create final validation report
    pub fn into_report(self) -> ValidationReport {
        ValidationReport {
            timestamp: Utc::now(),
            base_dir: ".".to_string(),
            findings: self.findings,
            total_duration_ms: self.total_duration_ms,
        }
    }
}
