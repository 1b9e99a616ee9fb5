//! scl-lint CLI entry point
//!
//! Structural CI checks for the SCL source tree.

use clap::Parser;
use scl_lint::checks::get_all_checks;
use scl_lint::cli::args::{Args, Command};
use scl_lint::cli::output::get_formatter;
use scl_lint::version::get_build_info;
use scl_lint::{run_checks, LintConfig, Settings};
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit code for errors that prevent the checks from running
const EXIT_RUNTIME_ERROR: u8 = 2;

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match args.command() {
        Command::Version => {
            println!("{}", get_build_info());
            ExitCode::SUCCESS
        }
        Command::List => {
            print_check_list();
            ExitCode::SUCCESS
        }
        _ => run(&args),
    }
}

/// Logs go to stderr so stdout only carries the report.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("SCL_LINT_LOG")
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn print_check_list() {
    println!("Available checks:");
    println!();
    for check in get_all_checks() {
        println!("  {:<10} {}", check.kind.id(), check.kind);
        println!("  {:<10} {}", "", check.description);
        println!("  {:<10} input: {}", "", check.input);
        println!();
    }
}

fn run(args: &Args) -> ExitCode {
    let settings = match Settings::load_or_default(&args.dir, args.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_RUNTIME_ERROR);
        }
    };

    let config = match LintConfig::from_args(args, settings) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_RUNTIME_ERROR);
        }
    };

    let report = match run_checks(&config) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error running checks: {}", e);
            return ExitCode::from(EXIT_RUNTIME_ERROR);
        }
    };

    let no_color =
        args.no_color || std::env::var_os("NO_COLOR").is_some() || !std::io::stdout().is_terminal();
    let formatter = get_formatter(args.format, no_color, args.verbose, args.quiet);
    println!("{}", formatter.format(&report));

    ExitCode::from(report.summary().exit_code())
}
