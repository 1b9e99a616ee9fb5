//! Coverage threshold check.
//!
//! Reads a coverage summary (as printed by `lcov --summary`) and compares
//! the line and function percentages against configured thresholds.

use crate::engine::discovery::Target;
use crate::CheckResult;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::time::Instant;
use thiserror::Error;

static PERCENTAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,3}(?:\.\d+)?)%").expect("percentage pattern is valid"));

/// How a measured percentage is compared against its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ThresholdMode {
    /// `value >= threshold`
    #[default]
    AtLeast,
    /// `value > threshold`
    Above,
}

impl ThresholdMode {
    pub fn meets(self, value: f64, threshold: f64) -> bool {
        match self {
            ThresholdMode::AtLeast => value >= threshold,
            ThresholdMode::Above => value > threshold,
        }
    }

    pub fn operator(self) -> &'static str {
        match self {
            ThresholdMode::AtLeast => ">=",
            ThresholdMode::Above => ">",
        }
    }
}

/// Zero-based rows of the summary holding each metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryRows {
    pub lines: usize,
    pub functions: usize,
}

impl Default for SummaryRows {
    fn default() -> Self {
        SummaryRows { lines: 2, functions: 3 }
    }
}

/// Required percentages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageThresholds {
    pub lines: f64,
    pub functions: f64,
    pub mode: ThresholdMode,
}

/// The summary did not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoverageError {
    #[error("malformed coverage report: row {row} ({metric}) is missing")]
    MissingRow { row: usize, metric: &'static str },

    #[error("malformed coverage report: row {row} is not the {metric} entry: {text:?}")]
    UnexpectedRow {
        row: usize,
        metric: &'static str,
        text: String,
    },

    #[error("malformed coverage report: no percentage on row {row} ({metric}): {text:?}")]
    NoPercentage {
        row: usize,
        metric: &'static str,
        text: String,
    },
}

/// Percentages extracted from a summary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageSummary {
    pub lines: f64,
    pub functions: f64,
}

impl CoverageSummary {
    pub fn parse(text: &str, rows: SummaryRows) -> Result<Self, CoverageError> {
        let all: Vec<&str> = text.lines().collect();
        Ok(CoverageSummary {
            lines: extract(&all, rows.lines, "lines")?,
            functions: extract(&all, rows.functions, "functions")?,
        })
    }
}

fn extract(rows: &[&str], row: usize, metric: &'static str) -> Result<f64, CoverageError> {
    let text = rows
        .get(row)
        .ok_or(CoverageError::MissingRow { row, metric })?;

    if !text.to_lowercase().contains(metric) {
        return Err(CoverageError::UnexpectedRow {
            row,
            metric,
            text: text.to_string(),
        });
    }

    PERCENTAGE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .ok_or_else(|| CoverageError::NoPercentage {
            row,
            metric,
            text: text.to_string(),
        })
}

/// Comparison of one metric against its threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricVerdict {
    pub metric: &'static str,
    pub value: f64,
    pub threshold: f64,
    pub met: bool,
}

/// Comparison of every metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageVerdict {
    pub lines: MetricVerdict,
    pub functions: MetricVerdict,
    pub mode: ThresholdMode,
}

impl CoverageVerdict {
    pub fn passed(&self) -> bool {
        self.lines.met && self.functions.met
    }

    fn describe(&self) -> String {
        [self.lines, self.functions]
            .iter()
            .map(|m| {
                format!(
                    "{} coverage {:.1}% (required {} {:.1}%){}",
                    m.metric,
                    m.value,
                    self.mode.operator(),
                    m.threshold,
                    if m.met { "" } else { " not met" }
                )
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

pub fn evaluate(summary: &CoverageSummary, thresholds: &CoverageThresholds) -> CoverageVerdict {
    let verdict = |metric, value, threshold| MetricVerdict {
        metric,
        value,
        threshold,
        met: thresholds.mode.meets(value, threshold),
    };

    CoverageVerdict {
        lines: verdict("lines", summary.lines, thresholds.lines),
        functions: verdict("functions", summary.functions, thresholds.functions),
        mode: thresholds.mode,
    }
}

/// Check a coverage summary file.
pub fn check_file(rows: SummaryRows, thresholds: &CoverageThresholds, target: &Target) -> CheckResult {
    let start = Instant::now();

    let text = match std::fs::read_to_string(&target.path) {
        Ok(text) => text,
        Err(e) => {
            return CheckResult::Fail {
                message: format!("{} could not be read", target.display),
                details: e.to_string(),
                duration_ms: start.elapsed().as_millis() as u64,
            };
        }
    };

    let summary = match CoverageSummary::parse(&text, rows) {
        Ok(summary) => summary,
        Err(e) => {
            return CheckResult::Fail {
                message: format!("{} is not a coverage summary", target.display),
                details: e.to_string(),
                duration_ms: start.elapsed().as_millis() as u64,
            };
        }
    };

    let verdict = evaluate(&summary, thresholds);
    let duration_ms = start.elapsed().as_millis() as u64;

    if verdict.passed() {
        CheckResult::Pass {
            message: verdict.describe(),
            duration_ms,
        }
    } else {
        CheckResult::Fail {
            message: "Coverage not met".to_string(),
            details: verdict.describe(),
            duration_ms,
        }
    }
}
