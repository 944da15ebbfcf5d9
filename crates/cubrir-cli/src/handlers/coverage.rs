//! Coverage gate handler

use crate::commands::CoverageArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use cubrir::verify::GateViolation;
use cubrir::{matrix_summary, matrix_to_json, matrix_to_markdown, verify, GateOutcome, VerifyConfig};
use std::path::Path;
use tracing::debug;

/// Build the verifier configuration from CLI overrides.
fn build_verify_config(args: &CoverageArgs) -> VerifyConfig {
    let mut config = VerifyConfig::new();
    if let Some(catalog) = &args.catalog {
        config = config.with_catalog_path(catalog);
    }
    if let Some(session) = &args.session {
        config = config.with_surface_path(session);
    }
    if let Some(tests_root) = &args.tests_root {
        config = config.with_tests_root(tests_root);
    }
    if let Some(test_glob) = &args.test_glob {
        config = config.with_test_glob(test_glob.clone());
    }
    config
}

fn write_report(path: &Path, contents: &str) -> CliResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, contents)?;
    println!("WROTE: {}", path.display());
    Ok(())
}

/// Write the optional markdown/JSON reports when a matrix exists.
fn write_optional_reports(
    verify_config: &VerifyConfig,
    outcome: &GateOutcome,
    args: &CoverageArgs,
) -> CliResult<()> {
    if let Some(report_md) = &args.report_md {
        write_report(report_md, &matrix_to_markdown(&outcome.matrix))?;
    }
    if let Some(report_json) = &args.report_json {
        let payload = matrix_to_json(verify_config, &outcome.matrix, &outcome.diagnostics)
            .map_err(|e| crate::error::CliError::report_generation(e.to_string()))?;
        write_report(report_json, &payload)?;
    }
    Ok(())
}

fn print_violation(violation: &GateViolation, outcome: &GateOutcome) {
    match violation {
        GateViolation::NoRuntimeTests { pattern } => {
            println!("FAIL: no runtime tests matched pattern: {pattern}");
        }
        other => {
            println!("FAIL: {}:", other.headline());
            for member in other.members() {
                println!("  - {member}");
            }
            if matches!(other, GateViolation::MissingRuntimeCoverage(_))
                && !outcome.diagnostics.is_empty()
            {
                println!("\nDiagnostics (unverified call sites):");
                for diagnostic in &outcome.diagnostics {
                    println!("  - {diagnostic}");
                }
            }
        }
    }
}

/// Run the coverage gate. Returns whether it passed.
pub fn run_coverage(config: &CliConfig, args: &CoverageArgs) -> CliResult<bool> {
    let verify_config = build_verify_config(args);
    debug!(?verify_config, "running coverage gate");

    let outcome = verify::run(&verify_config)?;

    // Reports and the summary reflect the matrix even when the
    // coverage invariant itself fails.
    if !outcome.matrix.is_empty() {
        write_optional_reports(&verify_config, &outcome, args)?;
        if args.print_matrix && !config.verbosity.is_quiet() {
            print!("{}", matrix_summary(&outcome.matrix));
        }
    }

    if let Some(violation) = &outcome.violation {
        print_violation(violation, &outcome);
        return Ok(false);
    }

    println!(
        "PASS: implemented session operations have runtime test coverage \
         ({}/{} operations; tests={})",
        outcome.covered_count, outcome.declared_count, outcome.test_count
    );
    Ok(true)
}
