//! Call-site analyzer
//!
//! Reconstructs the asynchronous request → await → assert idiom from
//! runtime-test text without executing anything. The analyzer is
//! artifact-local and operation-agnostic: it does not know which
//! operations the catalog declares, it only reports what each file
//! verifiably exercises.
//!
//! The correlation key between the three steps is the request
//! identifier bound at the invocation; the completion wait must await
//! that exact identifier, which prevents false positives between
//! unrelated call sites in the same file.

use crate::config::VerifyConfig;
use crate::error::CoverageResult;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::debug;

/// A verifiably exercised call site
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifiedHit {
    /// Runtime test file (as given to the analyzer)
    pub test: String,
    /// 1-based line of the invocation
    pub line: u32,
    /// Identifier the request id was bound to
    pub request_var: String,
    /// Identifier the response was bound to
    pub response_var: String,
    /// De-duplicated sorted assertion helper names in the block
    pub assertions: Vec<String>,
}

/// Why a call site could not be verified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnverifiableReason {
    /// No completion wait for the request id within the lookahead window
    MissingCompletionWait,
    /// The wait is immediately followed by the next invocation or EOF
    MissingAssertionBlock,
    /// The block contains no assertion-helper invocation
    MissingAssertion,
    /// Assertions exist but never touch the bound response identifier
    ResponseNotReferenced,
}

impl UnverifiableReason {
    /// Diagnostic wording for reports and stdout
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingCompletionWait => "missing completion wait",
            Self::MissingAssertionBlock => "missing assertion block",
            Self::MissingAssertion => "missing require_* assertion",
            Self::ResponseNotReferenced => "response variable not used in assertion block",
        }
    }
}

impl std::fmt::Display for UnverifiableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An unverifiable call site, kept for triage output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Runtime test file
    pub test: String,
    /// 1-based line of the invocation
    pub line: u32,
    /// Operation that was invoked
    pub operation: String,
    /// Why verification failed
    pub reason: UnverifiableReason,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{} session.{} -> {}",
            self.test, self.line, self.operation, self.reason
        )
    }
}

/// Per-operation hit lists plus diagnostics for one or more artifacts
#[derive(Debug, Default, Clone)]
pub struct FileCoverage {
    /// Verified hits keyed by operation name
    pub hits: BTreeMap<String, Vec<VerifiedHit>>,
    /// Unverifiable call sites
    pub diagnostics: Vec<Diagnostic>,
}

impl FileCoverage {
    /// Fold another artifact's coverage into this one.
    ///
    /// Pure map-union on the hit lists; commutative and associative up
    /// to per-operation hit order, so scans may run in any order.
    pub fn absorb(&mut self, other: FileCoverage) {
        for (operation, hits) in other.hits {
            self.hits.entry(operation).or_default().extend(hits);
        }
        self.diagnostics.extend(other.diagnostics);
    }
}

/// Lexical analyzer for runtime-test artifacts
#[derive(Debug)]
pub struct Analyzer {
    call_re: Regex,
    next_call_re: Regex,
    require_re: Regex,
    wait_window: usize,
    block_window: usize,
}

impl Analyzer {
    /// Compile the fixed patterns for the configured windows.
    #[must_use]
    pub fn new(config: &VerifyConfig) -> Self {
        Self {
            call_re: Regex::new(r"\bvar\s+([A-Za-z0-9_]+)\s*=\s*session\.([A-Za-z0-9_]+)\s*\(")
                .expect("valid call pattern"),
            next_call_re: Regex::new(r"^\s*var\s+[A-Za-z0-9_]+\s*=\s*session\.[A-Za-z0-9_]+\s*\(")
                .expect("valid next-call pattern"),
            require_re: Regex::new(r"\bT\.(require_[A-Za-z0-9_]+)\(")
                .expect("valid require pattern"),
            wait_window: config.wait_window,
            block_window: config.block_window,
        }
    }

    /// Scan one runtime-test file.
    pub fn scan_file(&self, path: &Path) -> CoverageResult<FileCoverage> {
        let text = std::fs::read_to_string(path)?;
        let label = path.to_string_lossy().replace('\\', "/");
        Ok(self.scan_text(&label, &text))
    }

    /// Scan runtime-test text under the given file label.
    #[must_use]
    pub fn scan_text(&self, test_label: &str, text: &str) -> FileCoverage {
        let lines: Vec<&str> = text.lines().collect();
        let mut coverage = FileCoverage::default();

        for (line_index, line) in lines.iter().enumerate() {
            let Some(call) = self.call_re.captures(line) else {
                continue;
            };
            let request_var = &call[1];
            let operation = &call[2];

            match self.inspect_call_block(&lines, line_index, request_var) {
                Ok((response_var, assertions)) => {
                    coverage
                        .hits
                        .entry(operation.to_string())
                        .or_default()
                        .push(VerifiedHit {
                            test: test_label.to_string(),
                            line: (line_index + 1) as u32,
                            request_var: request_var.to_string(),
                            response_var,
                            assertions,
                        });
                }
                Err(reason) => {
                    coverage.diagnostics.push(Diagnostic {
                        test: test_label.to_string(),
                        line: (line_index + 1) as u32,
                        operation: operation.to_string(),
                        reason,
                    });
                }
            }
        }

        debug!(
            test = test_label,
            operations = coverage.hits.len(),
            diagnostics = coverage.diagnostics.len(),
            "scanned runtime test"
        );
        coverage
    }

    /// Verify the wait/assert block that must follow an invocation.
    ///
    /// On success returns the response identifier and the sorted,
    /// de-duplicated assertion helper names found in the block.
    fn inspect_call_block(
        &self,
        lines: &[&str],
        call_index: usize,
        request_var: &str,
    ) -> Result<(String, Vec<String>), UnverifiableReason> {
        let wait_re = self.wait_pattern(request_var);

        // Completion wait: offsets 1..=wait_window after the invocation.
        let wait_end = lines.len().min(call_index + self.wait_window + 1);
        let mut wait_index = None;
        let mut response_var = String::new();
        for index in (call_index + 1)..wait_end {
            if let Some(caps) = wait_re.captures(lines[index]) {
                wait_index = Some(index);
                response_var = caps[1].to_string();
                break;
            }
        }
        let Some(wait_index) = wait_index else {
            return Err(UnverifiableReason::MissingCompletionWait);
        };

        // Assertion block: lines strictly between the wait and the next
        // invocation (searched up to block_window lines) or end of file.
        let scan_end = lines.len().min(wait_index + self.block_window + 1);
        let mut next_call_index = lines.len();
        for index in (wait_index + 1)..scan_end {
            if self.next_call_re.is_match(lines[index]) {
                next_call_index = index;
                break;
            }
        }

        let block = &lines[wait_index + 1..next_call_index];
        if block.is_empty() {
            return Err(UnverifiableReason::MissingAssertionBlock);
        }

        let mut assertions = BTreeSet::new();
        for line in block {
            for caps in self.require_re.captures_iter(line) {
                assertions.insert(caps[1].to_string());
            }
        }
        if assertions.is_empty() {
            return Err(UnverifiableReason::MissingAssertion);
        }

        // An assertion that never touches the response proves nothing.
        if !block.iter().any(|line| line.contains(&response_var)) {
            return Err(UnverifiableReason::ResponseNotReferenced);
        }

        Ok((response_var, assertions.into_iter().collect()))
    }

    /// Build the completion-wait pattern keyed to one request identifier.
    fn wait_pattern(&self, request_var: &str) -> Regex {
        let pattern = format!(
            r"\bvar\s+([A-Za-z0-9_]+)\s*=\s*await\s+T\.wait_for_completed\(self,\s*pending,\s*{}\s*\)",
            regex::escape(request_var)
        );
        Regex::new(&pattern).expect("valid wait pattern")
    }
}
