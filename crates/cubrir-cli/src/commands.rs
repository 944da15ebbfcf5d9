//! CLI command definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cubridor: CLI for Cubrir - contract-coverage verification gate
#[derive(Parser, Debug)]
#[command(name = "cubridor")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the runtime-coverage gate
    ///
    /// Every implemented catalog operation must be declared on the
    /// session surface, mapped uniquely, and exercised by a runtime
    /// test that awaits completion and asserts on the response.
    Coverage(CoverageArgs),

    /// Check the CLI doc against the catalog command map
    ///
    /// Every documented command must have exactly one catalog row
    /// with a non-placeholder API mapping, and no two commands may
    /// share an API path.
    CommandMap(CommandMapArgs),
}

/// Arguments for the coverage command
#[derive(Parser, Debug)]
pub struct CoverageArgs {
    /// Path to the command catalog markdown
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Path to the session surface script
    #[arg(long)]
    pub session: Option<PathBuf>,

    /// Directory holding the runtime tests
    #[arg(long)]
    pub tests_root: Option<PathBuf>,

    /// Glob pattern selecting runtime test files
    #[arg(long)]
    pub test_glob: Option<String>,

    /// Write coverage matrix markdown report to this path
    #[arg(long)]
    pub report_md: Option<PathBuf>,

    /// Write raw coverage matrix JSON report to this path
    #[arg(long)]
    pub report_json: Option<PathBuf>,

    /// Print concise matrix summary to stdout
    #[arg(long)]
    pub print_matrix: bool,
}

/// Arguments for the command-map command
#[derive(Parser, Debug)]
pub struct CommandMapArgs {
    /// Path to the CLI reference doc
    #[arg(long)]
    pub cli_doc: Option<PathBuf>,

    /// Path to the command catalog markdown
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}
