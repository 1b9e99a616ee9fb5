//! scl-lint library
//!
//! Structural CI checks for the SCL source tree.
//!
//! This library provides:
//! - Copyright header validation against a fixed license block template
//! - Header guard validation with guard symbols derived from file paths
//! - Coverage threshold enforcement over a coverage summary report
//! - Text, JSON and JUnit XML reporting
//!
//! # Example
//!
//! ```no_run
//! use scl_lint::{run_checks, LintConfig};
//!
//! let config = LintConfig::default();
//! let report = run_checks(&config).expect("checks could not run");
//! println!("Files failed: {}", report.summary().failed);
//! ```

pub mod checks;
pub mod cli;
pub mod config;
pub mod engine;
pub mod version;

use cli::args::{Args, Command};
use engine::orchestrator::{create_checks, CheckOrchestrator, OrchestratorConfig};
use engine::result::ValidationReport;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

// Re-exports for public API
pub use config::{ConfigError, Settings};
pub use engine::result::{ResultSummary, ValidationReport as Report};

/// Outcome of applying one check to one target.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckResult {
    /// Target satisfied the check
    Pass { message: String, duration_ms: u64 },
    /// Something worth reporting that does not fail the run
    Warn { message: String, details: String },
    /// Target violated the check
    Fail {
        message: String,
        details: String,
        duration_ms: u64,
    },
    /// Check did not apply
    Skip { reason: String },
}

impl CheckResult {
    pub fn is_failure(&self) -> bool {
        matches!(self, CheckResult::Fail { .. })
    }

    /// Short lowercase status label.
    pub fn status(&self) -> &'static str {
        match self {
            CheckResult::Pass { .. } => "pass",
            CheckResult::Warn { .. } => "warn",
            CheckResult::Fail { .. } => "fail",
            CheckResult::Skip { .. } => "skip",
        }
    }

    pub fn duration_ms(&self) -> u64 {
        match self {
            CheckResult::Pass { duration_ms, .. } | CheckResult::Fail { duration_ms, .. } => {
                *duration_ms
            }
            CheckResult::Warn { .. } | CheckResult::Skip { .. } => 0,
        }
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckResult::Pass { message, .. } => write!(f, "PASS: {}", message),
            CheckResult::Warn { message, details } => write!(f, "WARN: {} ({})", message, details),
            CheckResult::Fail { message, details, .. } => {
                write!(f, "FAIL: {} ({})", message, details)
            }
            CheckResult::Skip { reason } => write!(f, "SKIP: {}", reason),
        }
    }
}

/// The checks scl-lint knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckKind {
    /// License header block at the top of every source file
    Copyright,
    /// `#ifndef`/`#define`/`#endif` triple in every public header
    HeaderGuard,
    /// Line and function coverage thresholds
    Coverage,
}

impl CheckKind {
    /// Every kind, in reporting order.
    pub const ALL: [CheckKind; 3] = [CheckKind::Copyright, CheckKind::HeaderGuard, CheckKind::Coverage];

    /// Stable identifier used on the command line and in machine output.
    pub fn id(&self) -> &'static str {
        match self {
            CheckKind::Copyright => "copyright",
            CheckKind::HeaderGuard => "guards",
            CheckKind::Coverage => "coverage",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckKind::Copyright => write!(f, "Copyright Header"),
            CheckKind::HeaderGuard => write!(f, "Header Guard"),
            CheckKind::Coverage => write!(f, "Coverage Threshold"),
        }
    }
}

/// A check applied to a single target, with its result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub kind: CheckKind,
    /// Path of the checked file as shown to the user
    pub target: String,
    pub result: CheckResult,
}

/// Errors that stop a run before a report can be produced.
#[derive(Debug, Error)]
pub enum LintError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to walk source tree: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("{path} is not below root {root}")]
    OutsideRoot { path: PathBuf, root: PathBuf },
}

/// Configuration for a single run.
#[derive(Debug, Clone)]
pub struct LintConfig {
    /// Templates, roots and thresholds
    pub settings: Settings,
    /// Directory the configured roots are resolved against
    pub base_dir: PathBuf,
    /// Checks to run
    pub kinds: Vec<CheckKind>,
    /// Coverage summary to evaluate (coverage check only)
    pub coverage_report: Option<PathBuf>,
    /// Spread targets over worker threads
    pub parallel: bool,
    /// Stop scheduling targets after the first failure
    pub fail_fast: bool,
    /// Worker thread count when parallel
    pub jobs: usize,
}

impl Default for LintConfig {
    fn default() -> Self {
        LintConfig {
            settings: Settings::default(),
            base_dir: PathBuf::from("."),
            kinds: vec![CheckKind::Copyright, CheckKind::HeaderGuard],
            coverage_report: None,
            parallel: false,
            fail_fast: false,
            jobs: 4,
        }
    }
}

impl LintConfig {
    /// Create configuration from command line arguments and loaded settings.
    ///
    /// Command line threshold and mode flags override the settings file.
    pub fn from_args(args: &Args, mut settings: Settings) -> Result<Self, LintError> {
        if let Some(mode) = args.mode {
            settings.coverage.mode = mode;
        }
        if let Some(lines) = args.line_threshold {
            settings.coverage.lines = lines;
        }
        if let Some(functions) = args.function_threshold {
            settings.coverage.functions = functions;
        }
        settings.validate()?;

        let (kinds, coverage_report) = match args.command() {
            Command::Check { coverage: Some(report) } => (CheckKind::ALL.to_vec(), Some(report)),
            Command::Check { coverage: None } => {
                (vec![CheckKind::Copyright, CheckKind::HeaderGuard], None)
            }
            Command::Headers => (vec![CheckKind::Copyright], None),
            Command::Guards => (vec![CheckKind::HeaderGuard], None),
            Command::Coverage { report } => (vec![CheckKind::Coverage], Some(report)),
            Command::List | Command::Version => (Vec::new(), None),
        };

        let jobs = args.jobs.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        });

        Ok(LintConfig {
            settings,
            base_dir: args.dir.clone(),
            kinds,
            coverage_report,
            parallel: args.parallel,
            fail_fast: args.fail_fast,
            jobs,
        })
    }
}

/// Run the configured checks.
///
/// Enumerates targets for every requested check, applies the checks and
/// returns the aggregated report. Individual file problems become `Fail`
/// findings; only problems that prevent enumeration (walk errors, bad
/// settings) are returned as errors.
///
/// # Example
///
/// ```no_run
/// use scl_lint::{run_checks, CheckKind, LintConfig};
///
/// let config = LintConfig {
///     kinds: vec![CheckKind::HeaderGuard],
///     ..Default::default()
/// };
///
/// match run_checks(&config) {
///     Ok(report) => println!("{} headers checked", report.summary().total),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_checks(config: &LintConfig) -> Result<ValidationReport, LintError> {
    let orch_config = OrchestratorConfig {
        parallel: config.parallel,
        fail_fast: config.fail_fast,
        max_parallel: config.jobs.max(1),
    };

    let mut orchestrator = CheckOrchestrator::new(orch_config);
    orchestrator.register_checks(create_checks(config)?);

    let mut report = orchestrator.run_kinds(&config.kinds);
    report.base_dir = config.base_dir.display().to_string();
    Ok(report)
}
