//! Cubrir: Contract-Coverage Verification for Session APIs
//!
//! Cubrir (Spanish: "to cover") proves, by static lexical analysis,
//! that every operation a command catalog marks as implemented is
//! declared on the scripted API surface, mapped uniquely, and
//! exercised by at least one runtime test that follows the
//! invoke / await-completion / assert idiom.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      CUBRIR Pipeline                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌──────────┐   ┌──────────┐   ┌───────────┐   ┌─────────┐  │
//! │  │ Catalog  │   │ Surface  │   │ Runtime   │   │ Matrix  │  │
//! │  │ Extractor│──►│ Extractor│──►│ Test      │──►│ Builder │  │
//! │  │          │   │          │   │ Analyzer  │   │ Reporter│  │
//! │  └──────────┘   └──────────┘   └───────────┘   └─────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! A call site only counts as coverage when the invocation is
//! followed, within a bounded window, by a completion wait on the
//! same request variable and an assertion block that references the
//! response variable. Everything in between is reported as a
//! near-miss diagnostic rather than silently ignored.

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

pub mod analyzer;
pub mod catalog;
pub mod command_map;
pub mod config;
pub mod error;
pub mod matrix;
pub mod report;
pub mod surface;
pub mod verify;

pub use analyzer::{Analyzer, Diagnostic, FileCoverage, UnverifiableReason, VerifiedHit};
pub use catalog::{parse_implemented_operations, CatalogEntry};
pub use command_map::{CommandMapOutcome, CommandMapViolation};
pub use config::VerifyConfig;
pub use error::{ArtifactKind, CoverageError, CoverageResult};
pub use matrix::{build_matrix, merge_coverage, CoverageRow};
pub use report::{matrix_summary, matrix_to_json, matrix_to_markdown};
pub use surface::parse_public_operations;
pub use verify::{GateOutcome, GateViolation};
