//! Command line arguments for scl-lint.

use crate::checks::coverage::ThresholdMode;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable terminal output
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
    /// JUnit XML for CI/CD integration
    Junit,
}

/// Command to execute
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Run copyright header and header guard checks (default)
    Check {
        /// Also check this coverage summary
        #[arg(long, value_name = "REPORT")]
        coverage: Option<PathBuf>,
    },
    /// Check copyright headers only
    Headers,
    /// Check header guards only
    Guards,
    /// Check coverage thresholds from a summary report
    Coverage {
        /// Coverage summary text file
        report: PathBuf,
    },
    /// List all available checks
    List,
    /// Print version information
    Version,
}

/// Parsed command line arguments
#[derive(Parser, Debug, Clone)]
#[command(
    name = "scl-lint",
    version,
    about = "Structural CI checks for the SCL source tree",
    after_help = "EXIT CODES:\n    0   All checks passed\n    1   One or more checks failed\n    2   Runtime error"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Base directory the configured roots are resolved against
    #[arg(short = 'C', long = "dir", global = true, default_value = ".", value_name = "DIR")]
    pub dir: PathBuf,

    /// Load settings from TOML file (default: scl-lint.toml in the base directory)
    #[arg(long, global = true, env = "SCL_LINT_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Only output failures and warnings
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Include durations and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output (also honours NO_COLOR)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Check files on several threads
    #[arg(long, global = true)]
    pub parallel: bool,

    /// Worker threads for --parallel (default: available cores)
    #[arg(long, global = true, value_name = "N")]
    pub jobs: Option<usize>,

    /// Stop on first failure
    #[arg(long, global = true)]
    pub fail_fast: bool,

    /// Coverage comparison: at-least (>=) or above (>)
    #[arg(long, global = true, value_enum)]
    pub mode: Option<ThresholdMode>,

    /// Required line coverage in percent
    #[arg(long, global = true, value_name = "PCT")]
    pub line_threshold: Option<f64>,

    /// Required function coverage in percent
    #[arg(long, global = true, value_name = "PCT")]
    pub function_threshold: Option<f64>,
}

impl Args {
    /// The command to run, `check` when none was given
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Check { coverage: None })
    }
}
