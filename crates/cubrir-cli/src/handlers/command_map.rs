//! Command-map check handler

use crate::commands::CommandMapArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use cubrir::command_map;
use cubrir::config::{DEFAULT_CATALOG_PATH, DEFAULT_CLI_DOC_PATH};
use std::path::PathBuf;
use tracing::debug;

/// Run the command-map check. Returns whether it passed.
pub fn run_command_map(config: &CliConfig, args: &CommandMapArgs) -> CliResult<bool> {
    let cli_doc = args
        .cli_doc
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CLI_DOC_PATH));
    let catalog = args
        .catalog
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH));
    debug!(?cli_doc, ?catalog, "running command-map check");

    let outcome = command_map::run(&cli_doc, &catalog)?;

    for violation in &outcome.violations {
        println!("FAIL: {}:", violation.headline());
        for item in violation.items() {
            println!("  - {item}");
        }
    }

    if !config.verbosity.is_quiet() {
        println!("CLI commands: {}", outcome.cli_command_count);
        println!("Catalog rows: {}", outcome.catalog_row_count);
    }

    if !outcome.passed() {
        return Ok(false);
    }

    println!("PASS: command catalog fully covers the CLI doc with unique non-empty API mapping");
    Ok(true)
}
