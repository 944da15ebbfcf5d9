//! Gate evaluation
//!
//! Correlates the catalog, the surface, and the runtime-test scans,
//! enforcing the coverage invariants in order. The library returns a
//! structured outcome; rendering and exit-status mapping belong to the
//! caller.

use crate::analyzer::{Analyzer, Diagnostic, FileCoverage};
use crate::catalog::parse_implemented_operations;
use crate::config::VerifyConfig;
use crate::error::{ArtifactKind, CoverageError, CoverageResult};
use crate::matrix::{build_matrix, covered_count, merge_coverage, CoverageRow};
use crate::surface::parse_public_operations;
use std::path::PathBuf;
use tracing::{debug, info};

/// A fatal gate violation, with every offending member listed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateViolation {
    /// Catalog-declared operations absent from the surface
    MissingInSession(Vec<String>),
    /// Public surface operations with no qualifying catalog row
    ExtraPublicMethods(Vec<String>),
    /// No runtime test matched the configured glob
    NoRuntimeTests {
        /// The pattern that matched nothing
        pattern: String,
    },
    /// Declared operations with zero verified hits
    MissingRuntimeCoverage(Vec<String>),
}

impl GateViolation {
    /// Stable identifier used in FAIL output
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MissingInSession(_) => "missing_in_session",
            Self::ExtraPublicMethods(_) => "extra_public_methods",
            Self::NoRuntimeTests { .. } => "no_runtime_tests",
            Self::MissingRuntimeCoverage(_) => "missing_runtime_coverage",
        }
    }

    /// One-line description of the violated invariant
    #[must_use]
    pub const fn headline(&self) -> &'static str {
        match self {
            Self::MissingInSession(_) => {
                "catalog marks operations as implemented but the session surface lacks them"
            }
            Self::ExtraPublicMethods(_) => {
                "surface has public operations not marked implemented in the catalog"
            }
            Self::NoRuntimeTests { .. } => "no runtime tests matched the configured pattern",
            Self::MissingRuntimeCoverage(_) => {
                "implemented session operations without verified runtime coverage"
            }
        }
    }

    /// The offending members, exhaustively
    #[must_use]
    pub fn members(&self) -> &[String] {
        match self {
            Self::MissingInSession(items)
            | Self::ExtraPublicMethods(items)
            | Self::MissingRuntimeCoverage(items) => items,
            Self::NoRuntimeTests { .. } => &[],
        }
    }
}

/// Result of one gate run
#[derive(Debug, Clone)]
pub struct GateOutcome {
    /// Coverage matrix; empty when a pre-matrix violation fired
    pub matrix: Vec<CoverageRow>,
    /// All accumulated unverifiable-call diagnostics
    pub diagnostics: Vec<Diagnostic>,
    /// The first violated invariant, if any
    pub violation: Option<GateViolation>,
    /// Number of declared-implemented operations
    pub declared_count: usize,
    /// Number of covered operations
    pub covered_count: usize,
    /// Number of runtime-test files scanned
    pub test_count: usize,
}

impl GateOutcome {
    /// Whether every invariant held
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.violation.is_none()
    }

    fn violated(violation: GateViolation) -> Self {
        Self {
            matrix: Vec::new(),
            diagnostics: Vec::new(),
            violation: Some(violation),
            declared_count: 0,
            covered_count: 0,
            test_count: 0,
        }
    }
}

/// Locate the runtime tests matching the configured glob, sorted.
fn find_runtime_tests(config: &VerifyConfig) -> CoverageResult<Vec<PathBuf>> {
    let pattern = config.tests_root.join(&config.test_glob);
    let pattern = pattern.to_string_lossy().into_owned();
    let paths = glob::glob(&pattern).map_err(|source| CoverageError::InvalidGlob {
        pattern: pattern.clone(),
        source,
    })?;

    let mut tests: Vec<PathBuf> = paths.flatten().collect();
    tests.sort();
    Ok(tests)
}

/// Run the full contract-coverage gate.
///
/// Invariants are enforced in order: surface ⊇ declared, surface ⊆
/// declared, at least one runtime test, every declared operation
/// covered. Missing inputs and empty extractions are hard errors;
/// invariant violations come back as a structured [`GateOutcome`].
pub fn run(config: &VerifyConfig) -> CoverageResult<GateOutcome> {
    if !config.surface_path.exists() {
        return Err(CoverageError::missing(
            ArtifactKind::Surface,
            &config.surface_path,
        ));
    }
    if !config.catalog_path.exists() {
        return Err(CoverageError::missing(
            ArtifactKind::Catalog,
            &config.catalog_path,
        ));
    }
    if !config.tests_root.exists() {
        return Err(CoverageError::missing(
            ArtifactKind::TestsRoot,
            &config.tests_root,
        ));
    }

    let surface_text = std::fs::read_to_string(&config.surface_path)?;
    let catalog_text = std::fs::read_to_string(&config.catalog_path)?;

    let surface_ops = parse_public_operations(&surface_text);
    if surface_ops.is_empty() {
        return Err(CoverageError::EmptySurface);
    }

    let declared = parse_implemented_operations(&catalog_text, config);
    if declared.is_empty() {
        return Err(CoverageError::EmptyCatalog);
    }
    debug!(
        declared = declared.len(),
        surface = surface_ops.len(),
        "extracted operation sets"
    );

    let missing_in_session: Vec<String> = declared
        .keys()
        .filter(|op| !surface_ops.contains(*op))
        .cloned()
        .collect();
    if !missing_in_session.is_empty() {
        return Ok(GateOutcome::violated(GateViolation::MissingInSession(
            missing_in_session,
        )));
    }

    let extra_public: Vec<String> = surface_ops
        .iter()
        .filter(|op| !declared.contains_key(*op))
        .cloned()
        .collect();
    if !extra_public.is_empty() {
        return Ok(GateOutcome::violated(GateViolation::ExtraPublicMethods(
            extra_public,
        )));
    }

    let runtime_tests = find_runtime_tests(config)?;
    if runtime_tests.is_empty() {
        let pattern = config.tests_root.join(&config.test_glob);
        return Ok(GateOutcome::violated(GateViolation::NoRuntimeTests {
            pattern: pattern.to_string_lossy().into_owned(),
        }));
    }

    // Each scan is independent; the merge is a pure map-union.
    let analyzer = Analyzer::new(config);
    let mut parts = Vec::with_capacity(runtime_tests.len());
    for test in &runtime_tests {
        parts.push(analyzer.scan_file(test)?);
    }
    let coverage: FileCoverage = merge_coverage(parts);

    let matrix = build_matrix(&declared, &coverage);
    let covered = covered_count(&matrix);
    info!(
        declared = declared.len(),
        covered,
        tests = runtime_tests.len(),
        "coverage matrix built"
    );

    let uncovered: Vec<String> = matrix
        .iter()
        .filter(|row| !row.covered)
        .map(|row| row.operation.clone())
        .collect();
    let violation = if uncovered.is_empty() {
        None
    } else {
        Some(GateViolation::MissingRuntimeCoverage(uncovered))
    };

    Ok(GateOutcome {
        declared_count: matrix.len(),
        covered_count: covered,
        test_count: runtime_tests.len(),
        diagnostics: coverage.diagnostics,
        matrix,
        violation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    const CATALOG: &str = "\
| CLI Command | Args | Addon API | Notes | Phase | Status |
|---|---|---|---|---|---|
| `screenshot` | - | `session.screenshot` | - | `M3.1` | `implemented_gdscript` |
";

    const SURFACE: &str = "\
class_name WryPwSession

func screenshot(path: String) -> String:
    return _dispatch(\"screenshot\", {\"path\": path})

func _dispatch(op, params) -> String:
    return \"r1\"
";

    const RUNTIME_TEST: &str = "\
var rid = session.screenshot(\"out.png\")
var resp = await T.wait_for_completed(self, pending, rid)
T.require_ok_response(self, resp)
";

    struct Fixture {
        _dir: TempDir,
        config: VerifyConfig,
    }

    fn fixture(catalog: &str, surface: &str, tests: &[(&str, &str)]) -> Fixture {
        let dir = TempDir::new().unwrap();
        let catalog_path = dir.path().join("catalog.md");
        let surface_path = dir.path().join("session.gd");
        let tests_root = dir.path().join("tests");
        std::fs::create_dir(&tests_root).unwrap();
        std::fs::write(&catalog_path, catalog).unwrap();
        std::fs::write(&surface_path, surface).unwrap();
        for (name, text) in tests {
            std::fs::write(tests_root.join(name), text).unwrap();
        }

        let config = VerifyConfig::new()
            .with_catalog_path(catalog_path)
            .with_surface_path(surface_path)
            .with_tests_root(tests_root)
            .with_test_glob("test_*_runtime.gd");
        Fixture { _dir: dir, config }
    }

    #[test]
    fn test_scenario_a_full_pass() {
        let fx = fixture(
            CATALOG,
            SURFACE,
            &[("test_session_runtime.gd", RUNTIME_TEST)],
        );
        let outcome = run(&fx.config).unwrap();

        assert!(outcome.passed());
        assert_eq!(outcome.declared_count, 1);
        assert_eq!(outcome.covered_count, 1);
        assert_eq!(outcome.test_count, 1);
        let row = &outcome.matrix[0];
        assert_eq!(row.operation, "screenshot");
        assert!(row.covered);
        assert_eq!(row.hit_count, 1);
    }

    #[test]
    fn test_scenario_b_missing_in_session() {
        let catalog = "\
| CLI Command | Args | Addon API | Notes | Phase | Status |
| `resize` | - | `session.resize` | - | `M3.1` | `implemented_gdscript` |
| `screenshot` | - | `session.screenshot` | - | `M3.1` | `implemented_gdscript` |
";
        let fx = fixture(
            catalog,
            SURFACE,
            &[("test_session_runtime.gd", RUNTIME_TEST)],
        );
        let outcome = run(&fx.config).unwrap();

        let violation = outcome.violation.unwrap();
        assert_eq!(violation.kind(), "missing_in_session");
        assert_eq!(violation.members(), ["resize".to_string()]);
    }

    #[test]
    fn test_scenario_c_extra_public_methods() {
        let surface = "\
func screenshot(path: String) -> String:
    return \"r1\"

func hover(ref: String) -> String:
    return \"r2\"
";
        let fx = fixture(
            CATALOG,
            surface,
            &[("test_session_runtime.gd", RUNTIME_TEST)],
        );
        let outcome = run(&fx.config).unwrap();

        let violation = outcome.violation.unwrap();
        assert_eq!(violation.kind(), "extra_public_methods");
        assert_eq!(violation.members(), ["hover".to_string()]);
    }

    #[test]
    fn test_scenario_d_unverified_call_site() {
        let test = "\
var rid = session.screenshot(\"out.png\")
var resp = await T.wait_for_completed(self, pending, rid)
T.require_true(self, unrelated_flag)
";
        let fx = fixture(CATALOG, SURFACE, &[("test_session_runtime.gd", test)]);
        let outcome = run(&fx.config).unwrap();

        let violation = outcome.violation.as_ref().unwrap();
        assert_eq!(violation.kind(), "missing_runtime_coverage");
        assert_eq!(violation.members(), ["screenshot".to_string()]);
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(
            outcome.diagnostics[0].reason.to_string(),
            "response variable not used in assertion block"
        );
    }

    #[test]
    fn test_no_runtime_tests_is_a_violation() {
        let fx = fixture(CATALOG, SURFACE, &[("notes.txt", "n/a")]);
        let outcome = run(&fx.config).unwrap();
        let violation = outcome.violation.unwrap();
        assert_eq!(violation.kind(), "no_runtime_tests");
    }

    #[test]
    fn test_missing_surface_is_fatal() {
        let fx = fixture(CATALOG, SURFACE, &[]);
        let config = fx
            .config
            .clone()
            .with_surface_path(Path::new("does/not/exist.gd"));
        let err = run(&config).unwrap_err();
        assert!(matches!(err, CoverageError::MissingInput { .. }));
    }

    #[test]
    fn test_empty_catalog_is_fatal() {
        let fx = fixture(
            "# no tables here\n",
            SURFACE,
            &[("test_session_runtime.gd", RUNTIME_TEST)],
        );
        let err = run(&fx.config).unwrap_err();
        assert!(matches!(err, CoverageError::EmptyCatalog));
    }

    #[test]
    fn test_empty_surface_is_fatal() {
        let fx = fixture(
            CATALOG,
            "# nothing public\nfunc _hidden():\n    pass\n",
            &[("test_session_runtime.gd", RUNTIME_TEST)],
        );
        let err = run(&fx.config).unwrap_err();
        assert!(matches!(err, CoverageError::EmptySurface));
    }

    #[test]
    fn test_hits_merge_across_test_files() {
        let fx = fixture(
            CATALOG,
            SURFACE,
            &[
                ("test_session_a_runtime.gd", RUNTIME_TEST),
                ("test_session_b_runtime.gd", RUNTIME_TEST),
            ],
        );
        let outcome = run(&fx.config).unwrap();
        assert!(outcome.passed());
        assert_eq!(outcome.matrix[0].hit_count, 2);
        assert_eq!(outcome.test_count, 2);
    }

    #[test]
    fn test_idempotent_runs() {
        let fx = fixture(
            CATALOG,
            SURFACE,
            &[("test_session_runtime.gd", RUNTIME_TEST)],
        );
        let first = run(&fx.config).unwrap();
        let second = run(&fx.config).unwrap();
        assert_eq!(first.matrix, second.matrix);
        assert_eq!(first.diagnostics, second.diagnostics);
    }
}
