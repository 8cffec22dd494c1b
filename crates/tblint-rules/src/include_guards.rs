//! Include guard rules.
//!
//! A file `fifo_pkg.svh` is expected to read:
//!
//! ```text
//! // File: fifo_pkg.svh
//! `ifndef FIFO_PKG_SVH
//! `define FIFO_PKG_SVH
//! ...
//! `endif // FIFO_PKG_SVH
//! ```

use crate::context::DocsContext;
use crate::settings::IncludeGuardSettings;
use regex::Regex;
use tblint_core::{ConfigError, FileContext, Finding, Rule, RuleError};

/// Lines at the end of a file searched for the closing `` `endif ``.
const FOOTER_LINES: usize = 5;

/// Guard macro for a file name: `fifo_pkg.svh` → `FIFO_PKG_SVH`.
#[must_use]
pub fn guard_name(file_name: &str) -> String {
    file_name.replace('.', "_").to_uppercase()
}

/// Number of lines before the first statement: blank lines, comments and
/// preprocessor directives are skipped.
fn preamble_len(lines: &[&str]) -> usize {
    let mut in_block = false;
    for (i, line) in lines.iter().enumerate() {
        let mut text = line.trim();
        if in_block {
            match text.find("*/") {
                Some(pos) => {
                    in_block = false;
                    text = text[pos + 2..].trim();
                }
                None => continue,
            }
        }
        if text.is_empty() || text.starts_with("//") || text.starts_with('`') {
            continue;
        }
        if let Some(rest) = text.strip_prefix("/*") {
            if !rest.contains("*/") {
                in_block = true;
            }
            continue;
        }
        return i;
    }
    lines.len()
}

fn is_package_file(ctx: &DocsContext, settings: &IncludeGuardSettings) -> bool {
    settings.guards_optional_for_packages && ctx.tree().declares_package()
}

fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|e| ConfigError::InvalidSettings {
        linter: crate::NAME.to_string(),
        message: format!("include_guards: {e}"),
    })
}

/// Byte offset of the first directive in `text` naming `guard`.
fn find_directive(pattern: &Regex, text: &str, guard: &str) -> Option<usize> {
    pattern
        .captures_iter(text)
        .find(|caps| &caps[1] == guard)
        .and_then(|caps| caps.get(0))
        .map(|m| m.start())
}

/// `[ND_GUARD_MISS]`: `` `ifndef ``/`` `define `` before the first statement
/// and `` `endif `` in the last lines.
#[derive(Debug, Clone)]
pub struct IncludeGuards {
    settings: IncludeGuardSettings,
    ifndef: Regex,
    define: Regex,
}

impl IncludeGuards {
    /// Creates the rule.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSettings`] if the directive patterns
    /// cannot be built.
    pub fn new(settings: IncludeGuardSettings) -> Result<Self, ConfigError> {
        Ok(Self {
            settings,
            ifndef: compile(r"`ifndef\s+(\w+)")?,
            define: compile(r"`define\s+(\w+)")?,
        })
    }
}

impl Rule<DocsContext> for IncludeGuards {
    fn id(&self) -> &'static str {
        "[ND_GUARD_MISS]"
    }

    fn description(&self) -> &'static str {
        "Include guards must follow proper format"
    }

    fn check(&self, file: &FileContext<'_>, ctx: &DocsContext) -> Result<Vec<Finding>, RuleError> {
        if is_package_file(ctx, &self.settings) {
            return Ok(Vec::new());
        }
        let file_name = file
            .file_name()
            .ok_or_else(|| RuleError::new("file name is not valid UTF-8"))?;
        let guard = guard_name(file_name);

        let lines = file.lines();
        let preamble = lines[..preamble_len(lines)].join("\n");
        let tail_start = lines.len().saturating_sub(FOOTER_LINES);
        let has_endif = lines[tail_start..].iter().any(|l| l.contains("`endif"));

        let ifndef = find_directive(&self.ifndef, &preamble, &guard);
        let has_define = ifndef
            .is_some_and(|start| find_directive(&self.define, &preamble[start..], &guard).is_some());

        if ifndef.is_none() && !has_endif {
            return Ok(vec![Finding::new(
                1,
                format!("Missing include guard (`ifndef {guard} / `define {guard} / `endif)"),
            )]);
        }

        let mut findings = Vec::new();
        if ifndef.is_none() {
            findings.push(Finding::new(
                1,
                format!(
                    "Missing or incorrect include guard (`ifndef {guard}) - must appear before first statement"
                ),
            ));
        } else if !has_define {
            findings.push(Finding::new(
                1,
                format!("Missing `define {guard} in include guard"),
            ));
        }
        if !has_endif {
            findings.push(Finding::new(
                lines.len().max(1),
                "Missing `endif for include guard",
            ));
        }
        Ok(findings)
    }
}

/// `[ND_GUARD_FMT]`: the closing `` `endif `` carries a trailing comment.
#[derive(Debug, Clone, Default)]
pub struct GuardFormat {
    settings: IncludeGuardSettings,
}

impl GuardFormat {
    /// Creates the rule.
    #[must_use]
    pub fn new(settings: IncludeGuardSettings) -> Self {
        Self { settings }
    }
}

impl Rule<DocsContext> for GuardFormat {
    fn id(&self) -> &'static str {
        "[ND_GUARD_FMT]"
    }

    fn description(&self) -> &'static str {
        "Include guard `endif should have a comment"
    }

    fn check(&self, file: &FileContext<'_>, ctx: &DocsContext) -> Result<Vec<Finding>, RuleError> {
        if is_package_file(ctx, &self.settings) {
            return Ok(Vec::new());
        }
        let lines = file.lines();
        let tail_start = lines.len().saturating_sub(FOOTER_LINES);
        let endifs: Vec<(usize, &str)> = lines
            .iter()
            .enumerate()
            .skip(tail_start)
            .filter_map(|(i, l)| l.find("`endif").map(|pos| (i + 1, &l[pos + "`endif".len()..])))
            .collect();

        let commented = endifs
            .iter()
            .any(|(_, rest)| rest.trim_start().starts_with("//"));
        match endifs.last() {
            Some((line, _)) if !commented => {
                Ok(vec![Finding::new(*line, "`endif should have a comment")])
            }
            _ => Ok(Vec::new()),
        }
    }
}
