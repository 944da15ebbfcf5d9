//! Command-map verifier
//!
//! Sibling check to the coverage gate: every CLI command in the
//! reference doc must map to exactly one non-empty API path in the
//! catalog, and vice versa. Deliberately independent of the coverage
//! matrix; command/phase collisions are this check's concern, not the
//! analyzer's.

use crate::error::{ArtifactKind, CoverageError, CoverageResult};
use std::collections::BTreeMap;
use std::path::Path;

/// Placeholder values treated as an unmapped API cell
const UNMAPPED: [&str; 3] = ["", "TBD", "TODO"];

/// Strip surrounding whitespace and backticks from a table cell
fn normalize_cell(cell: &str) -> String {
    cell.trim().trim_matches('`').to_string()
}

/// Catalog command → API mapping plus duplicate rows
#[derive(Debug, Default, Clone)]
pub struct CatalogCommandMap {
    /// First-seen mapping from CLI command to API path
    pub mapping: BTreeMap<String, String>,
    /// Commands that appeared in more than one row, in document order
    pub duplicates: Vec<String>,
}

/// One violated command-map invariant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandMapViolation {
    /// Catalog rows repeating a CLI command
    DuplicateRows(Vec<String>),
    /// Doc commands with no catalog row
    MissingCommands(Vec<String>),
    /// Catalog commands absent from the doc
    ExtraCommands(Vec<String>),
    /// Commands whose API cell is empty or a placeholder
    UnmappedCommands(Vec<String>),
    /// API paths claimed by more than one command
    SharedApiMappings(Vec<(String, Vec<String>)>),
}

impl CommandMapViolation {
    /// One-line description for FAIL output
    #[must_use]
    pub const fn headline(&self) -> &'static str {
        match self {
            Self::DuplicateRows(_) => "duplicate command rows in catalog",
            Self::MissingCommands(_) => "commands missing in catalog",
            Self::ExtraCommands(_) => "catalog has commands not present in CLI doc",
            Self::UnmappedCommands(_) => "commands without mapped addon API",
            Self::SharedApiMappings(_) => "multiple CLI commands map to the same addon API",
        }
    }

    /// The offending items, exhaustively, one line each
    #[must_use]
    pub fn items(&self) -> Vec<String> {
        match self {
            Self::DuplicateRows(items)
            | Self::MissingCommands(items)
            | Self::ExtraCommands(items)
            | Self::UnmappedCommands(items) => items.clone(),
            Self::SharedApiMappings(shared) => shared
                .iter()
                .map(|(api, commands)| format!("{api}: {}", commands.join(", ")))
                .collect(),
        }
    }
}

/// Result of the command-map check
#[derive(Debug, Clone)]
pub struct CommandMapOutcome {
    /// Number of distinct commands in the CLI doc
    pub cli_command_count: usize,
    /// Number of mapped catalog rows
    pub catalog_row_count: usize,
    /// Every violated invariant, each listing all members
    pub violations: Vec<CommandMapViolation>,
}

impl CommandMapOutcome {
    /// Whether the mapping is complete, unique, and non-empty
    #[must_use]
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Extract CLI commands from the reference doc, in document order.
///
/// Lines starting `playwright-cli ` contribute their first argument
/// token; `#` comments are stripped first, and the `-s=name <sub>`
/// form keeps its subcommand token.
#[must_use]
pub fn extract_cli_commands(cli_doc_text: &str) -> Vec<String> {
    let mut commands = Vec::new();

    for raw in cli_doc_text.lines() {
        let line = raw.split('#').next().unwrap_or("").trim();
        let Some(rest) = line.strip_prefix("playwright-cli ") else {
            continue;
        };

        let parts: Vec<&str> = rest.split_whitespace().collect();
        let Some(first) = parts.first() else {
            continue;
        };

        let command = if first.starts_with("-s=name") {
            let Some(sub) = parts.get(1) else {
                continue;
            };
            format!("-s=name {sub}")
        } else {
            (*first).to_string()
        };

        if !commands.contains(&command) {
            commands.push(command);
        }
    }

    commands
}

/// Check whether a first cell is a header or separator, not a command.
fn is_header_cell(cell: &str) -> bool {
    let lowered = cell.to_lowercase();
    if matches!(lowered.as_str(), "cli command" | "") {
        return true;
    }
    lowered.chars().all(|c| matches!(c, '-' | ':' | ' '))
}

/// Extract the catalog's command → API mapping.
#[must_use]
pub fn extract_catalog_commands(catalog_text: &str) -> CatalogCommandMap {
    let mut map = CatalogCommandMap::default();

    for raw in catalog_text.lines() {
        let line = raw.trim();
        if !line.starts_with('|') || !line.ends_with('|') {
            continue;
        }
        let segments: Vec<&str> = line.split('|').collect();
        if segments.len() < 5 {
            continue;
        }
        let cells: Vec<String> = segments[1..segments.len() - 1]
            .iter()
            .map(|c| normalize_cell(c))
            .collect();
        if cells.len() < 3 {
            continue;
        }
        if is_header_cell(&cells[0]) {
            continue;
        }

        let command = cells[0].clone();
        let api_path = cells[2].clone();
        if map.mapping.contains_key(&command) {
            map.duplicates.push(command);
            continue;
        }
        map.mapping.insert(command, api_path);
    }

    map
}

/// Check the mapping invariants between a CLI doc and a catalog.
#[must_use]
pub fn check(cli_doc_text: &str, catalog_text: &str) -> CommandMapOutcome {
    let cli_commands = extract_cli_commands(cli_doc_text);
    let catalog = extract_catalog_commands(catalog_text);

    let mut violations = Vec::new();

    if !catalog.duplicates.is_empty() {
        violations.push(CommandMapViolation::DuplicateRows(
            catalog.duplicates.clone(),
        ));
    }

    let missing: Vec<String> = cli_commands
        .iter()
        .filter(|cmd| !catalog.mapping.contains_key(*cmd))
        .cloned()
        .collect();
    if !missing.is_empty() {
        violations.push(CommandMapViolation::MissingCommands(missing));
    }

    let extra: Vec<String> = catalog
        .mapping
        .keys()
        .filter(|cmd| !cli_commands.contains(*cmd))
        .cloned()
        .collect();
    if !extra.is_empty() {
        violations.push(CommandMapViolation::ExtraCommands(extra));
    }

    let unmapped: Vec<String> = catalog
        .mapping
        .iter()
        .filter(|(_, api)| UNMAPPED.contains(&api.as_str()))
        .map(|(cmd, _)| cmd.clone())
        .collect();
    if !unmapped.is_empty() {
        violations.push(CommandMapViolation::UnmappedCommands(unmapped));
    }

    let mut api_to_commands: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for (cmd, api) in &catalog.mapping {
        api_to_commands.entry(api.as_str()).or_default().push(cmd.clone());
    }
    let shared: Vec<(String, Vec<String>)> = api_to_commands
        .into_iter()
        .filter(|(_, cmds)| cmds.len() > 1)
        .map(|(api, cmds)| (api.to_string(), cmds))
        .collect();
    if !shared.is_empty() {
        violations.push(CommandMapViolation::SharedApiMappings(shared));
    }

    CommandMapOutcome {
        cli_command_count: cli_commands.len(),
        catalog_row_count: catalog.mapping.len(),
        violations,
    }
}

/// Run the command-map check against files on disk.
pub fn run(cli_doc: &Path, catalog: &Path) -> CoverageResult<CommandMapOutcome> {
    if !cli_doc.exists() {
        return Err(CoverageError::missing(ArtifactKind::CliDoc, cli_doc));
    }
    if !catalog.exists() {
        return Err(CoverageError::missing(ArtifactKind::Catalog, catalog));
    }
    let cli_doc_text = std::fs::read_to_string(cli_doc)?;
    let catalog_text = std::fs::read_to_string(catalog)?;
    Ok(check(&cli_doc_text, &catalog_text))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLI_DOC: &str = "\
# Reference
playwright-cli open <url>        # open a page
playwright-cli click <ref>
playwright-cli -s=name snapshot  # named session form
playwright-cli click <ref>       # repeated on purpose
";

    const CATALOG: &str = "\
| CLI Command | Args | Addon API |
|---|---|---|
| `open` | url | `session.open` |
| `click` | ref | `session.click` |
| `-s=name snapshot` | - | `session.snapshot` |
";

    #[test]
    fn test_extract_cli_commands() {
        let commands = extract_cli_commands(CLI_DOC);
        assert_eq!(commands, vec!["open", "click", "-s=name snapshot"]);
    }

    #[test]
    fn test_extract_catalog_commands() {
        let catalog = extract_catalog_commands(CATALOG);
        assert_eq!(catalog.mapping.len(), 3);
        assert_eq!(catalog.mapping["open"], "session.open");
        assert!(catalog.duplicates.is_empty());
    }

    #[test]
    fn test_full_mapping_passes() {
        let outcome = check(CLI_DOC, CATALOG);
        assert!(outcome.passed());
        assert_eq!(outcome.cli_command_count, 3);
        assert_eq!(outcome.catalog_row_count, 3);
    }

    #[test]
    fn test_duplicate_rows_detected() {
        let catalog = format!("{CATALOG}| `open` | url | `session.open2` |\n");
        let outcome = check(CLI_DOC, &catalog);
        assert!(outcome
            .violations
            .iter()
            .any(|v| matches!(v, CommandMapViolation::DuplicateRows(d) if d == &["open"])));
    }

    #[test]
    fn test_missing_command_detected() {
        let doc = format!("{CLI_DOC}playwright-cli hover <ref>\n");
        let outcome = check(&doc, CATALOG);
        assert!(outcome
            .violations
            .iter()
            .any(|v| matches!(v, CommandMapViolation::MissingCommands(m) if m == &["hover"])));
    }

    #[test]
    fn test_extra_command_detected() {
        let catalog = format!("{CATALOG}| `fill` | ref text | `session.fill` |\n");
        let outcome = check(CLI_DOC, &catalog);
        assert!(outcome
            .violations
            .iter()
            .any(|v| matches!(v, CommandMapViolation::ExtraCommands(e) if e == &["fill"])));
    }

    #[test]
    fn test_unmapped_command_detected() {
        let catalog = "\
| CLI Command | Args | Addon API |
|---|---|---|
| `open` | url | TBD |
| `click` | ref | `session.click` |
| `-s=name snapshot` | - | `session.snapshot` |
";
        let outcome = check(CLI_DOC, catalog);
        assert!(outcome
            .violations
            .iter()
            .any(|v| matches!(v, CommandMapViolation::UnmappedCommands(u) if u == &["open"])));
    }

    #[test]
    fn test_shared_api_mapping_detected() {
        let catalog = "\
| CLI Command | Args | Addon API |
|---|---|---|
| `open` | url | `session.open` |
| `click` | ref | `session.open` |
| `-s=name snapshot` | - | `session.snapshot` |
";
        let outcome = check(CLI_DOC, catalog);
        let shared = outcome
            .violations
            .iter()
            .find_map(|v| match v {
                CommandMapViolation::SharedApiMappings(s) => Some(s),
                _ => None,
            })
            .unwrap();
        assert_eq!(shared.len(), 1);
        assert_eq!(shared[0].0, "session.open");
        assert_eq!(shared[0].1, vec!["click".to_string(), "open".to_string()]);
    }

    #[test]
    fn test_violation_items_render() {
        let violation = CommandMapViolation::SharedApiMappings(vec![(
            "session.open".to_string(),
            vec!["click".to_string(), "open".to_string()],
        )]);
        assert_eq!(violation.items(), vec!["session.open: click, open"]);
    }
}
