//! Cubrir CLI Library
//!
//! Command-line interface for the Cubrir contract-coverage gate.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::format_push_string)] // String building is clear and correct
#![allow(clippy::missing_errors_doc)] // Error types are self-documenting

mod commands;
mod config;
mod error;
pub mod handlers;

pub use commands::{Cli, CommandMapArgs, Commands, CoverageArgs};
pub use config::{CliConfig, Verbosity};
pub use error::{CliError, CliResult};
