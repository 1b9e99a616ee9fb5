//! Output formatting for scl-lint.
//!
//! Provides terminal, JSON, and JUnit XML output formatters.
//!
//! All formatters produce valid output for any ValidationReport input,
//! including an empty one.

use crate::cli::args::OutputFormat;
use crate::engine::result::{ResultSummary, ValidationReport};
use crate::{CheckKind, CheckResult, Finding};
use serde::Serialize;

const RULE: &str = "--------------------------------------------------------------------------------";

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format a validation report into a string
    fn format(&self, report: &ValidationReport) -> String;
}

/// Terminal (human-readable) formatter
pub struct TerminalFormatter {
    color: bool,
    verbose: bool,
    quiet: bool,
}

impl TerminalFormatter {
    pub fn new(color: bool, verbose: bool, quiet: bool) -> Self {
        TerminalFormatter { color, verbose, quiet }
    }

    fn colorize(&self, text: &str, color_code: &str) -> String {
        if self.color {
            format!("\x1b[{}m{}\x1b[0m", color_code, text)
        } else {
            text.to_string()
        }
    }

    fn status(&self, result: &CheckResult) -> String {
        match result {
            CheckResult::Pass { .. } => self.colorize("[PASS]", "32"),
            CheckResult::Warn { .. } => self.colorize("[WARN]", "33"),
            CheckResult::Fail { .. } => self.colorize("[FAIL]", "31"),
            CheckResult::Skip { .. } => self.colorize("[SKIP]", "90"),
        }
    }

    fn format_finding(&self, finding: &Finding, output: &mut String) {
        let status = self.status(&finding.result);

        match &finding.result {
            CheckResult::Pass { message, duration_ms } => {
                if self.verbose {
                    output.push_str(&format!("  {} {}: {} ({}ms)\n", status, finding.target, message, duration_ms));
                } else {
                    output.push_str(&format!("  {} {}\n", status, finding.target));
                }
            }
            CheckResult::Warn { message, details } => {
                output.push_str(&format!("  {} {}: {}\n", status, finding.target, message));
                if self.verbose && !details.is_empty() {
                    push_indented(output, details);
                }
            }
            CheckResult::Fail {
                message,
                details,
                duration_ms,
            } => {
                if self.verbose {
                    output.push_str(&format!("  {} {} ({}ms)\n", status, message, duration_ms));
                } else {
                    output.push_str(&format!("  {} {}\n", status, message));
                }
                push_indented(output, details);
            }
            CheckResult::Skip { reason } => {
                output.push_str(&format!("  {} {}: {}\n", status, finding.target, reason));
            }
        }
    }
}

fn push_indented(output: &mut String, text: &str) {
    for line in text.lines() {
        output.push_str("         ");
        output.push_str(line);
        output.push('\n');
    }
}

fn section_header(kind: CheckKind) -> &'static str {
    match kind {
        CheckKind::Copyright => "COPYRIGHT HEADERS",
        CheckKind::HeaderGuard => "HEADER GUARDS",
        CheckKind::Coverage => "COVERAGE",
    }
}

impl OutputFormatter for TerminalFormatter {
    fn format(&self, report: &ValidationReport) -> String {
        let mut output = String::new();

        output.push_str(RULE);
        output.push('\n');
        output.push_str("scl-lint report\n");
        output.push_str(&format!("Directory: {}\n", report.base_dir));
        output.push_str(&format!("Timestamp: {}\n", report.timestamp.format("%Y-%m-%dT%H:%M:%SZ")));
        output.push_str(RULE);
        output.push_str("\n\n");

        for kind in CheckKind::ALL {
            let findings: Vec<_> = report.by_kind(kind).collect();
            if findings.is_empty() {
                continue;
            }

            let shown: Vec<_> = findings
                .into_iter()
                .filter(|f| !self.quiet || matches!(f.result, CheckResult::Fail { .. } | CheckResult::Warn { .. }))
                .collect();
            if shown.is_empty() {
                continue;
            }

            output.push_str(section_header(kind));
            output.push('\n');
            for finding in shown {
                self.format_finding(finding, &mut output);
            }
            output.push('\n');
        }

        let summary = report.summary();
        output.push_str(RULE);
        output.push('\n');
        output.push_str(&format!(
            "SUMMARY: {} passed, {} warnings, {} failed, {} skipped\n",
            summary.passed, summary.warned, summary.failed, summary.skipped
        ));
        output.push_str(&format!("Total time: {:.1}s\n", report.total_duration_ms as f64 / 1000.0));

        let exit_desc = if summary.failed > 0 {
            "failures detected"
        } else {
            "all checks passed"
        };
        output.push_str(&format!("Exit code: {} ({})\n", summary.exit_code(), exit_desc));
        output.push_str(RULE);

        output
    }
}

/// JSON formatter
pub struct JsonFormatter {
    pretty: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    timestamp: String,
    base_dir: &'a str,
    total_duration_ms: u64,
    passed: bool,
    summary: ResultSummary,
    findings: &'a [Finding],
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        JsonFormatter { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &ValidationReport) -> String {
        let doc = JsonReport {
            timestamp: report.timestamp.to_rfc3339(),
            base_dir: &report.base_dir,
            total_duration_ms: report.total_duration_ms,
            passed: report.passed(),
            summary: report.summary(),
            findings: &report.findings,
        };

        let rendered = if self.pretty {
            serde_json::to_string_pretty(&doc)
        } else {
            serde_json::to_string(&doc)
        };

        // Serializing plain structs with string keys cannot fail.
        rendered.unwrap_or_else(|e| format!("{{\"error\":{:?}}}", e.to_string()))
    }
}

/// JUnit XML formatter
#[derive(Default)]
pub struct JunitFormatter;

impl JunitFormatter {
    pub fn new() -> Self {
        JunitFormatter
    }

    fn escape_xml(s: &str) -> String {
        let mut result = String::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '&' => result.push_str("&amp;"),
                '<' => result.push_str("&lt;"),
                '>' => result.push_str("&gt;"),
                '"' => result.push_str("&quot;"),
                '\'' => result.push_str("&apos;"),
                c => result.push(c),
            }
        }
        result
    }
}

impl OutputFormatter for JunitFormatter {
    fn format(&self, report: &ValidationReport) -> String {
        let mut output = String::new();
        output.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");

        let summary = report.summary();
        output.push_str(&format!(
            "<testsuites tests=\"{}\" failures=\"{}\" errors=\"0\" skipped=\"{}\" time=\"{:.3}\">\n",
            summary.total,
            summary.failed,
            summary.skipped,
            report.total_duration_ms as f64 / 1000.0
        ));

        for kind in CheckKind::ALL {
            let findings: Vec<_> = report.by_kind(kind).collect();
            if findings.is_empty() {
                continue;
            }

            let failures = findings.iter().filter(|f| f.result.is_failure()).count();
            let skipped = findings
                .iter()
                .filter(|f| matches!(f.result, CheckResult::Skip { .. }))
                .count();
            let suite_ms: u64 = findings.iter().map(|f| f.result.duration_ms()).sum();

            output.push_str(&format!(
                "  <testsuite name=\"{}\" tests=\"{}\" failures=\"{}\" errors=\"0\" skipped=\"{}\" time=\"{:.3}\">\n",
                kind.id(),
                findings.len(),
                failures,
                skipped,
                suite_ms as f64 / 1000.0
            ));

            for finding in findings {
                output.push_str(&format!(
                    "    <testcase name=\"{}\" classname=\"scl-lint.{}\" time=\"{:.3}\">\n",
                    Self::escape_xml(&finding.target),
                    kind.id(),
                    finding.result.duration_ms() as f64 / 1000.0
                ));

                match &finding.result {
                    CheckResult::Pass { message, .. } => {
                        output.push_str(&format!("      <system-out>{}</system-out>\n", Self::escape_xml(message)));
                    }
                    CheckResult::Warn { message, details } => {
                        output.push_str(&format!(
                            "      <system-out>WARNING: {} - {}</system-out>\n",
                            Self::escape_xml(message),
                            Self::escape_xml(details)
                        ));
                    }
                    CheckResult::Fail { message, details, .. } => {
                        output.push_str(&format!(
                            "      <failure message=\"{}\">{}</failure>\n",
                            Self::escape_xml(message),
                            Self::escape_xml(details)
                        ));
                    }
                    CheckResult::Skip { reason } => {
                        output.push_str(&format!("      <skipped message=\"{}\" />\n", Self::escape_xml(reason)));
                    }
                }

                output.push_str("    </testcase>\n");
            }

            output.push_str("  </testsuite>\n");
        }

        output.push_str("</testsuites>");
        output
    }
}

/// Get a formatter based on the output format
pub fn get_formatter(format: OutputFormat, no_color: bool, verbose: bool, quiet: bool) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(TerminalFormatter::new(!no_color, verbose, quiet)),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
        OutputFormat::Junit => Box::new(JunitFormatter::new()),
    }
}
