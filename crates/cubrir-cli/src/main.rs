//! Cubridor CLI: contract-coverage verification gate
//!
//! ## Usage
//!
//! ```bash
//! cubridor coverage                          # Run the runtime-coverage gate
//! cubridor coverage --print-matrix           # Gate plus condensed matrix
//! cubridor coverage --report-md report.md    # Gate plus markdown report
//! cubridor command-map                       # Check CLI doc vs catalog
//! ```

use clap::Parser;
use cubridor::{handlers, Cli, CliConfig, CliResult, Commands, Verbosity};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_tracing(config.verbosity);

    match run(&config, cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &CliConfig, command: Commands) -> CliResult<bool> {
    match command {
        Commands::Coverage(args) => handlers::run_coverage(config, &args),
        Commands::CommandMap(args) => handlers::run_command_map(config, &args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else {
        match cli.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    };

    CliConfig::new().with_verbosity(verbosity)
}

/// Stdout carries the gate verdict; tracing goes to stderr so the
/// FAIL/PASS lines stay machine-parseable.
fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.filter_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
