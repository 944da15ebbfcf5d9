//! Subcommand handlers
//!
//! Each handler renders a library outcome to stdout and reports
//! whether the gate passed. Exit-status mapping stays in `main`.

pub mod command_map;
pub mod coverage;

pub use command_map::run_command_map;
pub use coverage::run_coverage;
