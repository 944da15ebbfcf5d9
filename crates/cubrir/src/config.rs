//! Verifier configuration
//!
//! All paths, filter sets, and lookahead windows live in one explicit
//! struct passed into the analysis entry point. There is no module-level
//! mutable state; a fresh run derives everything from current file text.

use std::collections::BTreeSet;
use std::path::PathBuf;

/// Default catalog document location
pub const DEFAULT_CATALOG_PATH: &str = "docs/plan/v3-cli-command-catalog.md";

/// Default API surface declaration
pub const DEFAULT_SURFACE_PATH: &str =
    "godot-wry-playwright/addons/godot_wry_playwright/wry_pw_session.gd";

/// Default runtime-test directory
pub const DEFAULT_TESTS_ROOT: &str = "godot-wry-playwright/tests";

/// Default runtime-test filename convention
pub const DEFAULT_TEST_GLOB: &str = "test_wry_pw_session*_runtime.gd";

/// Default CLI reference document (command-map check)
pub const DEFAULT_CLI_DOC_PATH: &str = "playwright-cli.md";

/// Configuration for a contract-coverage verification run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyConfig {
    /// Catalog markdown document
    pub catalog_path: PathBuf,
    /// API surface declaration file
    pub surface_path: PathBuf,
    /// Directory containing runtime test scripts
    pub tests_root: PathBuf,
    /// Filename glob selecting runtime test scripts under `tests_root`
    pub test_glob: String,
    /// Catalog phases counted as implemented
    pub implemented_phases: BTreeSet<String>,
    /// Catalog status values counted as implemented
    pub implemented_status: BTreeSet<String>,
    /// API path prefix marking a session operation (`session.`)
    pub api_prefix: String,
    /// Max lines after an invocation to find its completion wait
    pub wait_window: usize,
    /// Max lines after a completion wait to find the next invocation
    pub block_window: usize,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            surface_path: PathBuf::from(DEFAULT_SURFACE_PATH),
            tests_root: PathBuf::from(DEFAULT_TESTS_ROOT),
            test_glob: DEFAULT_TEST_GLOB.to_string(),
            implemented_phases: ["M3.1", "M3.2"].iter().map(ToString::to_string).collect(),
            implemented_status: [
                "implemented_gdscript",
                "implemented_gdscript_best_effort",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
            api_prefix: "session.".to_string(),
            wait_window: 25,
            block_window: 80,
        }
    }
}

impl VerifyConfig {
    /// Create the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the catalog document path
    #[must_use]
    pub fn with_catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = path.into();
        self
    }

    /// Set the surface declaration path
    #[must_use]
    pub fn with_surface_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.surface_path = path.into();
        self
    }

    /// Set the runtime-test directory
    #[must_use]
    pub fn with_tests_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.tests_root = path.into();
        self
    }

    /// Set the runtime-test filename glob
    #[must_use]
    pub fn with_test_glob(mut self, pattern: impl Into<String>) -> Self {
        self.test_glob = pattern.into();
        self
    }

    /// Set the implemented-phase filter set
    #[must_use]
    pub fn with_implemented_phases<I, S>(mut self, phases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.implemented_phases = phases.into_iter().map(Into::into).collect();
        self
    }

    /// Set the implemented-status filter set
    #[must_use]
    pub fn with_implemented_status<I, S>(mut self, status: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.implemented_status = status.into_iter().map(Into::into).collect();
        self
    }
}
