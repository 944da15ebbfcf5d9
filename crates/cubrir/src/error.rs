//! Error types for the verifier

use std::path::PathBuf;
use thiserror::Error;

/// Result type for verifier operations
pub type CoverageResult<T> = Result<T, CoverageError>;

/// Which input artifact a missing-input error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Catalog markdown document
    Catalog,
    /// API surface declaration file
    Surface,
    /// Runtime test directory
    TestsRoot,
    /// CLI reference document (command-map check)
    CliDoc,
}

impl ArtifactKind {
    /// Human-readable artifact name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Catalog => "catalog file",
            Self::Surface => "surface file",
            Self::TestsRoot => "tests root",
            Self::CliDoc => "CLI doc",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while verifying contract coverage
#[derive(Debug, Error)]
pub enum CoverageError {
    /// A required input artifact does not exist
    #[error("missing {kind}: {}", path.display())]
    MissingInput {
        /// Which artifact is missing
        kind: ArtifactKind,
        /// Path that was checked
        path: PathBuf,
    },

    /// The catalog filter matched zero implemented rows
    #[error("no implemented session operations found in catalog")]
    EmptyCatalog,

    /// The surface declaration exposes no public operations
    #[error("no public operations found in surface declaration")]
    EmptySurface,

    /// The runtime-test glob pattern is malformed
    #[error("invalid test glob pattern '{pattern}': {source}")]
    InvalidGlob {
        /// The offending pattern
        pattern: String,
        /// Underlying glob error
        source: glob::PatternError,
    },

    /// IO error reading an artifact
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoverageError {
    /// Create a missing-input error
    #[must_use]
    pub fn missing(kind: ArtifactKind, path: impl Into<PathBuf>) -> Self {
        Self::MissingInput {
            kind,
            path: path.into(),
        }
    }
}
