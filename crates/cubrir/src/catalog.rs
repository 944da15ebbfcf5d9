//! Catalog extractor
//!
//! Parses pipe-delimited catalog rows into `(command, api_path, phase,
//! status)` and derives the set of operations the catalog declares as
//! implemented. Rows that do not look like data rows (headers,
//! separators, prose) are silently skipped; only the phase/status
//! filter decides membership.

use crate::config::VerifyConfig;
use serde::Serialize;
use std::collections::BTreeMap;

/// One qualifying catalog row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    /// CLI command cell (column 0)
    pub command: String,
    /// API path cell (column 2), e.g. `session.click`
    pub api_path: String,
    /// Phase cell (column 4)
    pub phase: String,
    /// Status cell (column 5)
    pub status: String,
}

/// Strip surrounding whitespace and backticks from a table cell
fn normalize_cell(cell: &str) -> String {
    cell.trim().trim_matches('`').to_string()
}

/// Split a markdown table row into normalized cells.
///
/// Returns `None` for lines that are not pipe-delimited rows.
fn split_row(line: &str) -> Option<Vec<String>> {
    let line = line.trim();
    if !line.starts_with('|') || !line.ends_with('|') {
        return None;
    }
    let inner: Vec<&str> = line.split('|').collect();
    if inner.len() < 3 {
        return None;
    }
    Some(inner[1..inner.len() - 1].iter().map(|c| normalize_cell(c)).collect())
}

/// Extract the declared-implemented operations from catalog text.
///
/// A row qualifies when it has at least six cells, its phase and status
/// cells are members of the configured implemented sets, and its API
/// path cell starts with the configured prefix. The returned map is
/// keyed by operation name, so iteration order is stable.
#[must_use]
pub fn parse_implemented_operations(
    catalog_text: &str,
    config: &VerifyConfig,
) -> BTreeMap<String, CatalogEntry> {
    let mut operations = BTreeMap::new();

    for line in catalog_text.lines() {
        let Some(cells) = split_row(line) else {
            continue;
        };
        if cells.len() < 6 {
            continue;
        }

        let entry = CatalogEntry {
            command: cells[0].clone(),
            api_path: cells[2].clone(),
            phase: cells[4].clone(),
            status: cells[5].clone(),
        };

        if !config.implemented_phases.contains(&entry.phase) {
            continue;
        }
        if !config.implemented_status.contains(&entry.status) {
            continue;
        }
        let Some(operation) = entry.api_path.strip_prefix(&config.api_prefix) else {
            continue;
        };
        let operation = operation.trim();
        if operation.is_empty() {
            continue;
        }

        operations.insert(operation.to_string(), entry);
    }

    operations
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const CATALOG: &str = "\
# v3 CLI Command Catalog

| CLI Command | Args | Addon API | Notes | Phase | Status |
|---|---|---|---|---|---|
| `open` | url | `session.open` | - | `M3.1` | `implemented_gdscript` |
| `click` | ref | `session.click` | - | `M3.2` | `implemented_gdscript_best_effort` |
| `trace` | - | `session.trace` | - | `M5` | `planned` |
| `snapshot` | - | `session.snapshot` | - | `M3.1` | `planned` |
| `version` | - | `cli.version` | - | `M3.1` | `implemented_gdscript` |
";

    #[test]
    fn test_qualifying_rows_extracted() {
        let ops = parse_implemented_operations(CATALOG, &VerifyConfig::default());
        let names: Vec<&str> = ops.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["click", "open"]);
    }

    #[test]
    fn test_entry_fields() {
        let ops = parse_implemented_operations(CATALOG, &VerifyConfig::default());
        let entry = &ops["open"];
        assert_eq!(entry.command, "open");
        assert_eq!(entry.api_path, "session.open");
        assert_eq!(entry.phase, "M3.1");
        assert_eq!(entry.status, "implemented_gdscript");
    }

    #[test]
    fn test_unqualified_phase_excluded() {
        let ops = parse_implemented_operations(CATALOG, &VerifyConfig::default());
        assert!(!ops.contains_key("trace"));
    }

    #[test]
    fn test_unqualified_status_excluded() {
        let ops = parse_implemented_operations(CATALOG, &VerifyConfig::default());
        assert!(!ops.contains_key("snapshot"));
    }

    #[test]
    fn test_non_session_api_excluded() {
        let ops = parse_implemented_operations(CATALOG, &VerifyConfig::default());
        assert!(ops.values().all(|e| e.api_path.starts_with("session.")));
    }

    #[test]
    fn test_headers_and_separators_skipped() {
        let text = "| CLI Command | Args | Addon API | Notes | Phase | Status |\n|---|---|---|---|---|---|\n";
        let ops = parse_implemented_operations(text, &VerifyConfig::default());
        assert!(ops.is_empty());
    }

    #[test]
    fn test_short_rows_skipped() {
        let text = "| `open` | `session.open` | `M3.1` |\n";
        let ops = parse_implemented_operations(text, &VerifyConfig::default());
        assert!(ops.is_empty());
    }

    #[test]
    fn test_empty_operation_segment_skipped() {
        let text = "| `x` | - | `session.` | - | `M3.1` | `implemented_gdscript` |\n";
        let ops = parse_implemented_operations(text, &VerifyConfig::default());
        assert!(ops.is_empty());
    }

    #[test]
    fn test_normalize_cell_strips_backticks() {
        assert_eq!(normalize_cell("  `session.open`  "), "session.open");
        assert_eq!(normalize_cell("plain"), "plain");
    }

    proptest! {
        // Filtering is total over the configured phase/status sets: a row
        // whose phase or status falls outside them never contributes an
        // operation, whatever its other cells contain.
        #[test]
        fn prop_filtering_is_total(
            op in "[a-z_]{1,12}",
            phase in "[A-Z][0-9]\\.[0-9]",
            status in "[a-z_]{1,24}",
        ) {
            let config = VerifyConfig::default();
            let row = format!(
                "| `{op}` | - | `session.{op}` | - | `{phase}` | `{status}` |\n"
            );
            let ops = parse_implemented_operations(&row, &config);
            let qualifies = config.implemented_phases.contains(&phase)
                && config.implemented_status.contains(&status);
            prop_assert_eq!(ops.contains_key(&op), qualifies);
        }
    }
}
