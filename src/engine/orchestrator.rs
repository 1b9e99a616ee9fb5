//! Check execution orchestrator.
//!
//! Manages check registration and execution over each check's targets.
//!
//! # Graceful Degradation
//!
//! This module handles errors gracefully:
//! - Check panics: Caught via std::panic::catch_unwind, converted to Fail result
//! - Missing roots: Recorded as Warn findings, the check still runs
//! - No targets: Recorded as a single Skip finding
//! - Fail fast: Targets not yet started are dropped from the report
//!
//! Findings always appear in registration order, then target order, whether
//! or not the run is parallel.

use crate::checks::{copyright, coverage, guard};
use crate::config::ConfigError;
use crate::engine::discovery::{discover, Target};
use crate::engine::result::{ResultAggregator, ValidationReport};
use crate::{CheckKind, CheckResult, Finding, LintConfig, LintError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Orchestrator configuration
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub parallel: bool,
    pub fail_fast: bool,
    pub max_parallel: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        OrchestratorConfig {
            parallel: false,
            fail_fast: false,
            max_parallel: 4,
        }
    }
}

/// Per-target check function.
pub type CheckFn = Box<dyn Fn(&Target) -> CheckResult + Send + Sync>;

/// A registered check with its targets and execution function
pub struct RegisteredCheck {
    pub kind: CheckKind,
    pub name: String,
    pub targets: Vec<Target>,
    /// `(target, message)` pairs recorded as Warn findings before the targets run
    pub warnings: Vec<(String, String)>,
    /// Shown as the target of the Skip finding when there are no targets
    pub scope: String,
    pub check_fn: CheckFn,
}

/// Check orchestrator
pub struct CheckOrchestrator {
    config: OrchestratorConfig,
    checks: Vec<RegisteredCheck>,
}

impl CheckOrchestrator {
    /// Create a new orchestrator with the given configuration
    pub fn new(config: OrchestratorConfig) -> Self {
        CheckOrchestrator {
            config,
            checks: Vec::new(),
        }
    }

    /// Register checks for execution
    pub fn register_checks(&mut self, checks: Vec<RegisteredCheck>) {
        self.checks.extend(checks);
    }

    /// Register a single check
    pub fn register_check(&mut self, check: RegisteredCheck) {
        self.checks.push(check);
    }

    /// Run all registered checks
    pub fn run_all(&self) -> ValidationReport {
        self.run_checks(self.checks.iter().collect())
    }

    /// Run registered checks of the given kinds
    pub fn run_kinds(&self, kinds: &[CheckKind]) -> ValidationReport {
        self.run_checks(self.checks.iter().filter(|c| kinds.contains(&c.kind)).collect())
    }

    fn run_checks(&self, selected: Vec<&RegisteredCheck>) -> ValidationReport {
        let start = Instant::now();
        let stop = AtomicBool::new(false);
        let mut aggregator = ResultAggregator::new();

        for check in selected {
            if stop.load(Ordering::Relaxed) {
                break;
            }

            for (target, message) in &check.warnings {
                aggregator.add_result(Finding {
                    kind: check.kind,
                    target: target.clone(),
                    result: CheckResult::Warn {
                        message: message.clone(),
                        details: format!("{} found nothing to check here", check.name),
                    },
                });
            }

            if check.targets.is_empty() {
                aggregator.add_result(Finding {
                    kind: check.kind,
                    target: check.scope.clone(),
                    result: CheckResult::Skip {
                        reason: "no matching files".to_string(),
                    },
                });
                continue;
            }

            let findings = if self.config.parallel && self.config.max_parallel > 1 {
                self.run_parallel(check, &stop)
            } else {
                self.run_targets(check, &check.targets, &stop)
            };

            let failed = findings.iter().filter(|f| f.result.is_failure()).count();
            info!(
                check = check.kind.id(),
                targets = check.targets.len(),
                checked = findings.len(),
                failed,
                "check finished"
            );
            aggregator.extend(findings);
        }

        aggregator.set_duration(start.elapsed().as_millis() as u64);
        aggregator.into_report()
    }

    /// Run a check over a slice of its targets in order
    fn run_targets(&self, check: &RegisteredCheck, targets: &[Target], stop: &AtomicBool) -> Vec<Finding> {
        let mut findings = Vec::with_capacity(targets.len());

        for target in targets {
            if stop.load(Ordering::Relaxed) {
                break;
            }

            let finding = self.execute_check(check, target);
            if self.config.fail_fast && finding.result.is_failure() {
                stop.store(true, Ordering::Relaxed);
            }
            findings.push(finding);
        }

        findings
    }

    /// Split targets into contiguous chunks, one scoped thread per chunk
    fn run_parallel(&self, check: &RegisteredCheck, stop: &AtomicBool) -> Vec<Finding> {
        let chunk_size = check.targets.len().div_ceil(self.config.max_parallel).max(1);

        thread::scope(|s| {
            let handles: Vec<_> = check
                .targets
                .chunks(chunk_size)
                .map(|chunk| (chunk, s.spawn(move || self.run_targets(check, chunk, stop))))
                .collect();

            handles
                .into_iter()
                .flat_map(|(chunk, h)| joined_findings(check, chunk, h.join()))
                .collect()
        })
    }

    /// Execute a check on one target
    fn execute_check(&self, check: &RegisteredCheck, target: &Target) -> Finding {
        let start = Instant::now();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| (check.check_fn)(target)))
            .unwrap_or_else(|_| CheckResult::Fail {
                message: format!("{} check panicked on {}", check.name, target.display),
                details: "An unexpected error occurred".to_string(),
                duration_ms: start.elapsed().as_millis() as u64,
            });

        debug!(check = check.kind.id(), target = %target.display, status = result.status(), "checked");

        Finding {
            kind: check.kind,
            target: target.display.clone(),
            result,
        }
    }
}

/// Findings of a worker thread. A worker that died reports every target of
/// its chunk as failed so no file goes unreported.
fn joined_findings(
    check: &RegisteredCheck,
    chunk: &[Target],
    joined: thread::Result<Vec<Finding>>,
) -> Vec<Finding> {
    match joined {
        Ok(findings) => findings,
        Err(_) => {
            warn!(check = check.kind.id(), targets = chunk.len(), "worker thread panicked");
            chunk
                .iter()
                .map(|target| Finding {
                    kind: check.kind,
                    target: target.display.clone(),
                    result: CheckResult::Fail {
                        message: format!("{} worker stopped before checking {}", check.name, target.display),
                        details: "worker thread panicked".to_string(),
                        duration_ms: 0,
                    },
                })
                .collect()
        }
    }
}

/// A check that runs needs somewhere to look.
fn require_roots(section: &str, roots: &[String]) -> Result<(), LintError> {
    if roots.is_empty() {
        return Err(ConfigError::Invalid(format!("{}.roots must not be empty", section)).into());
    }
    Ok(())
}

fn missing_root_warnings(missing: &[String]) -> Vec<(String, String)> {
    missing
        .iter()
        .map(|root| (root.clone(), format!("root directory '{}' does not exist", root)))
        .collect()
}

/// Create the checks requested by `config`, with their targets enumerated
pub fn create_checks(config: &LintConfig) -> Result<Vec<RegisteredCheck>, LintError> {
    let settings = &config.settings;
    let mut checks = Vec::new();

    if config.kinds.contains(&CheckKind::Copyright) {
        require_roots("copyright", &settings.copyright.roots)?;
        let template = settings.copyright.template()?;
        let found = discover(&config.base_dir, &settings.copyright.roots, &settings.copyright.extensions)?;

        checks.push(RegisteredCheck {
            kind: CheckKind::Copyright,
            name: CheckKind::Copyright.to_string(),
            targets: found.targets,
            warnings: missing_root_warnings(&found.missing_roots),
            scope: settings.copyright.roots.join(", "),
            check_fn: Box::new(move |target: &Target| copyright::check_file(&template, target)),
        });
    }

    if config.kinds.contains(&CheckKind::HeaderGuard) {
        require_roots("guards", &settings.guards.roots)?;
        let prefix = settings.guards.prefix.clone();
        let found = discover(&config.base_dir, &settings.guards.roots, &settings.guards.extensions)?;

        checks.push(RegisteredCheck {
            kind: CheckKind::HeaderGuard,
            name: CheckKind::HeaderGuard.to_string(),
            targets: found.targets,
            warnings: missing_root_warnings(&found.missing_roots),
            scope: settings.guards.roots.join(", "),
            check_fn: Box::new(move |target: &Target| guard::check_file(&prefix, target)),
        });
    }

    if config.kinds.contains(&CheckKind::Coverage) {
        if let Some(report) = &config.coverage_report {
            let rows = settings.coverage.rows();
            let thresholds = settings.coverage.thresholds();

            checks.push(RegisteredCheck {
                kind: CheckKind::Coverage,
                name: CheckKind::Coverage.to_string(),
                targets: vec![Target::file(report)],
                warnings: Vec::new(),
                scope: report.display().to_string(),
                check_fn: Box::new(move |target: &Target| coverage::check_file(rows, &thresholds, target)),
            });
        }
    }

    Ok(checks)
}
