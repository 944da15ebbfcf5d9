//! Coverage matrix
//!
//! One row per declared-implemented operation, aggregated across all
//! runtime-test artifacts.

use crate::analyzer::{FileCoverage, VerifiedHit};
use serde::Serialize;
use std::collections::BTreeMap;

/// Coverage for one declared operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageRow {
    /// Operation name
    pub operation: String,
    /// Whether at least one verified hit exists
    pub covered: bool,
    /// Number of verified hits
    pub hit_count: usize,
    /// All verified hits, across all artifacts
    pub hits: Vec<VerifiedHit>,
}

/// Merge per-artifact coverage into one map.
///
/// Explicit map-union so parallel scans never share mutable state; the
/// result is independent of scan order up to per-operation hit order.
#[must_use]
pub fn merge_coverage(parts: Vec<FileCoverage>) -> FileCoverage {
    let mut merged = FileCoverage::default();
    for part in parts {
        merged.absorb(part);
    }
    merged
}

/// Build the coverage matrix for the declared operations.
///
/// Hits for operations outside the declared set are dropped here; they
/// belong to the surface/catalog bijection checks, not the matrix.
#[must_use]
pub fn build_matrix<V>(
    declared: &BTreeMap<String, V>,
    coverage: &FileCoverage,
) -> Vec<CoverageRow> {
    declared
        .keys()
        .map(|operation| {
            let hits = coverage.hits.get(operation).cloned().unwrap_or_default();
            CoverageRow {
                operation: operation.clone(),
                covered: !hits.is_empty(),
                hit_count: hits.len(),
                hits,
            }
        })
        .collect()
}

/// Count the covered rows in a matrix.
#[must_use]
pub fn covered_count(matrix: &[CoverageRow]) -> usize {
    matrix.iter().filter(|row| row.covered).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Analyzer;
    use crate::config::VerifyConfig;

    fn declared(names: &[&str]) -> BTreeMap<String, ()> {
        names.iter().map(|n| ((*n).to_string(), ())).collect()
    }

    fn coverage_for(op: &str) -> FileCoverage {
        let text = format!(
            "var rid = session.{op}(\"arg\")\n\
             var resp = await T.wait_for_completed(self, pending, rid)\n\
             T.require_ok_response(self, resp)\n"
        );
        Analyzer::new(&VerifyConfig::default()).scan_text("tests/a.gd", &text)
    }

    #[test]
    fn test_matrix_row_per_declared_operation() {
        let matrix = build_matrix(&declared(&["click", "open"]), &coverage_for("click"));
        assert_eq!(matrix.len(), 2);
        assert_eq!(matrix[0].operation, "click");
        assert!(matrix[0].covered);
        assert_eq!(matrix[0].hit_count, 1);
        assert_eq!(matrix[1].operation, "open");
        assert!(!matrix[1].covered);
        assert_eq!(matrix[1].hit_count, 0);
    }

    #[test]
    fn test_undeclared_hits_dropped() {
        let matrix = build_matrix(&declared(&["open"]), &coverage_for("click"));
        assert_eq!(matrix.len(), 1);
        assert!(!matrix[0].covered);
    }

    #[test]
    fn test_merge_order_does_not_change_matrix() {
        let a = coverage_for("click");
        let b = coverage_for("open");

        let forward = merge_coverage(vec![a.clone(), b.clone()]);
        let backward = merge_coverage(vec![b, a]);

        let decl = declared(&["click", "open"]);
        assert_eq!(build_matrix(&decl, &forward), build_matrix(&decl, &backward));
    }

    #[test]
    fn test_covered_count() {
        let matrix = build_matrix(&declared(&["click", "open"]), &coverage_for("click"));
        assert_eq!(covered_count(&matrix), 1);
    }
}
