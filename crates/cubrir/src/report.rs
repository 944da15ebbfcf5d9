//! Report rendering
//!
//! Markdown matrix table, structured JSON payload, and the condensed
//! stdout summary. Rendering is deterministic: matrix rows and
//! diagnostics arrive already sorted, so unchanged artifacts produce
//! byte-identical output.

use crate::analyzer::Diagnostic;
use crate::config::VerifyConfig;
use crate::matrix::{covered_count, CoverageRow};
use serde::Serialize;

/// Field-complete JSON report payload
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    implemented_phases: Vec<&'a str>,
    implemented_status: Vec<&'a str>,
    matrix: &'a [CoverageRow],
    diagnostics: &'a [Diagnostic],
}

/// Render the coverage matrix as a markdown table.
#[must_use]
pub fn matrix_to_markdown(matrix: &[CoverageRow]) -> String {
    let mut output = String::new();
    output.push_str("# Runtime Coverage Matrix (Implemented Session Operations)\n\n");
    output.push_str("| Operation | Covered | Hit Count | Test Locations |\n");
    output.push_str("|---|---|---:|---|\n");

    for row in matrix {
        let covered = if row.covered { "yes" } else { "no" };
        let locations: Vec<String> = row
            .hits
            .iter()
            .map(|hit| format!("`{}:{}`", hit.test, hit.line))
            .collect();
        let location_cell = if locations.is_empty() {
            "-".to_string()
        } else {
            locations.join("<br>")
        };
        output.push_str(&format!(
            "| `{}` | {} | {} | {} |\n",
            row.operation, covered, row.hit_count, location_cell
        ));
    }

    output.push_str(&format!(
        "\nSummary: covered `{}/{}` implemented session operations.\n",
        covered_count(matrix),
        matrix.len()
    ));
    output
}

/// Render the structured JSON report.
pub fn matrix_to_json(
    config: &VerifyConfig,
    matrix: &[CoverageRow],
    diagnostics: &[Diagnostic],
) -> Result<String, serde_json::Error> {
    let payload = JsonReport {
        implemented_phases: config.implemented_phases.iter().map(String::as_str).collect(),
        implemented_status: config.implemented_status.iter().map(String::as_str).collect(),
        matrix,
        diagnostics,
    };
    serde_json::to_string_pretty(&payload)
}

/// Render the condensed per-operation summary for stdout.
#[must_use]
pub fn matrix_summary(matrix: &[CoverageRow]) -> String {
    let mut output = String::from("\nCoverage Matrix Summary\n");
    for row in matrix {
        let covered = if row.covered { "yes" } else { "no" };
        output.push_str(&format!(
            " - {}: {} (hits={})\n",
            row.operation, covered, row.hit_count
        ));
    }
    output
}
