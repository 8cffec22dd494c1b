//! Core types for lint violations and results.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Severity level for lint violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Informational message, does not fail lint.
    #[serde(alias = "info", alias = "Info")]
    Info,
    /// Warning that should be addressed. Fails lint in strict mode.
    #[serde(alias = "warning", alias = "Warning")]
    Warning,
    /// Error that must be fixed.
    #[serde(alias = "error", alias = "Error")]
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// What a rule reports: a location and a message, without severity.
///
/// Rules never pick their own severity or identifier. The owning
/// [`RuleSet`](crate::RuleSet) stamps both when turning a finding into a
/// [`Violation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed, 0 when unknown).
    pub column: usize,
    /// Human-readable message.
    pub message: String,
    /// Optional source excerpt.
    pub context: Option<String>,
}

impl Finding {
    /// Creates a finding at the given line with an unknown column.
    #[must_use]
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column: 0,
            message: message.into(),
            context: None,
        }
    }

    /// Sets the column.
    #[must_use]
    pub fn with_column(mut self, column: usize) -> Self {
        self.column = column;
        self
    }

    /// Attaches a source excerpt.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// A lint violation found during analysis.
///
/// Immutable once created; the only constructor is [`Violation::stamp`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    file: PathBuf,
    line: usize,
    column: usize,
    severity: Severity,
    rule_id: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<String>,
}

impl Violation {
    /// Stamps a finding with the reporting rule's identifier and its
    /// effective severity.
    #[must_use]
    pub fn stamp(rule_id: &str, severity: Severity, file: &Path, finding: Finding) -> Self {
        Self {
            file: file.to_path_buf(),
            line: finding.line,
            column: finding.column,
            severity,
            rule_id: rule_id.to_string(),
            message: finding.message,
            context: finding.context,
        }
    }

    /// File the violation was found in.
    #[must_use]
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Line number (1-indexed).
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Column number (0 when unknown).
    #[must_use]
    pub fn column(&self) -> usize {
        self.column
    }

    /// Effective severity.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Bracketed rule identifier, e.g. `[ND_CLASS_MISS]`.
    #[must_use]
    pub fn rule_id(&self) -> &str {
        &self.rule_id
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Optional source excerpt.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} {} {}",
            self.file.display(),
            self.line,
            self.column,
            self.severity,
            self.rule_id,
            self.message
        )
    }
}

/// A rule that failed internally while checking a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleFailure {
    /// File being checked when the rule failed.
    pub file: PathBuf,
    /// Identifier of the failing rule.
    pub rule_id: String,
    /// Failure description.
    pub message: String,
}

impl std::fmt::Display for RuleFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: Rule {} failed: {}",
            self.file.display(),
            self.rule_id,
            self.message
        )
    }
}

/// Result of running one linter, either for a single file (a fragment) or
/// merged across a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalyzerResult {
    /// Name of the linter that produced this result.
    pub linter: String,
    /// Number of files the rules ran on.
    pub files_checked: usize,
    /// Number of files that could not be read or parsed.
    pub files_failed: usize,
    /// All violations found.
    pub violations: Vec<Violation>,
    /// Per-file failure messages (read or parse failures).
    pub errors: BTreeMap<PathBuf, String>,
    /// Rules that failed internally.
    pub rule_failures: Vec<RuleFailure>,
    /// Set when the linter could not run at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unavailable: Option<String>,
}

impl AnalyzerResult {
    /// Creates an empty result for the named linter.
    #[must_use]
    pub fn new(linter: impl Into<String>) -> Self {
        Self {
            linter: linter.into(),
            ..Self::default()
        }
    }

    /// Creates a result for a linter that could not run.
    #[must_use]
    pub fn unavailable(linter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            unavailable: Some(reason.into()),
            ..Self::new(linter)
        }
    }

    /// Returns true if the linter could not run.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        self.unavailable.is_some()
    }

    /// Records a file that could not be read or parsed.
    pub fn record_file_failure(&mut self, file: &Path, message: impl Into<String>) {
        self.files_failed += 1;
        self.errors.insert(file.to_path_buf(), message.into());
    }

    /// Records a rule that failed internally.
    pub fn record_rule_failure(&mut self, file: &Path, rule_id: &str, message: impl Into<String>) {
        self.rule_failures.push(RuleFailure {
            file: file.to_path_buf(),
            rule_id: rule_id.to_string(),
            message: message.into(),
        });
    }

    /// Counts violations by severity as `(errors, warnings, infos)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        self.violations
            .iter()
            .fold((0, 0, 0), |(e, w, i), v| match v.severity {
                Severity::Error => (e + 1, w, i),
                Severity::Warning => (e, w + 1, i),
                Severity::Info => (e, w, i + 1),
            })
    }

    /// Number of ERROR violations.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.count_by_severity().0
    }

    /// Number of WARNING violations.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.count_by_severity().1
    }

    /// Number of INFO violations.
    #[must_use]
    pub fn info_count(&self) -> usize {
        self.count_by_severity().2
    }

    /// Returns violations filtered by severity.
    #[must_use]
    pub fn by_severity(&self, severity: Severity) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .collect()
    }

    /// Merges a per-file fragment into this result.
    pub fn merge(&mut self, other: Self) {
        self.files_checked += other.files_checked;
        self.files_failed += other.files_failed;
        self.violations.extend(other.violations);
        self.errors.extend(other.errors);
        self.rule_failures.extend(other.rule_failures);
        if self.unavailable.is_none() {
            self.unavailable = other.unavailable;
        }
    }

    /// Sorts violations by file, then line, then column.
    ///
    /// The sort is stable, so violations at the same position keep the
    /// order their rules were registered in.
    pub fn sort(&mut self) {
        self.violations.sort_by(|a, b| {
            a.file
                .cmp(&b.file)
                .then(a.line.cmp(&b.line))
                .then(a.column.cmp(&b.column))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_violation(file: &str, line: usize, severity: Severity) -> Violation {
        Violation::stamp(
            "[ND_CLASS_MISS]",
            severity,
            Path::new(file),
            Finding::new(line, "Class 'foo' without 'Class:' documentation"),
        )
    }

    #[test]
    fn stamp_carries_rule_id_and_severity() {
        let v = Violation::stamp(
            "[ND_FUNC_MISS]",
            Severity::Warning,
            Path::new("a.sv"),
            Finding::new(7, "missing").with_column(3).with_context("function f"),
        );
        assert_eq!(v.rule_id(), "[ND_FUNC_MISS]");
        assert_eq!(v.severity(), Severity::Warning);
        assert_eq!(v.line(), 7);
        assert_eq!(v.column(), 3);
        assert_eq!(v.context(), Some("function f"));
    }

    #[test]
    fn display_is_single_line() {
        let v = make_violation("a.sv", 3, Severity::Error);
        assert_eq!(
            v.to_string(),
            "a.sv:3:0: ERROR [ND_CLASS_MISS] Class 'foo' without 'Class:' documentation"
        );
    }

    #[test]
    fn severity_parses_any_case() {
        let upper: Severity = serde_json::from_str("\"WARNING\"").unwrap();
        let lower: Severity = serde_json::from_str("\"warning\"").unwrap();
        assert_eq!(upper, Severity::Warning);
        assert_eq!(lower, Severity::Warning);
        assert!(serde_json::from_str::<Severity>("\"fatal\"").is_err());
    }

    #[test]
    fn severity_orders_info_below_error() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn count_by_severity_counts_each_level() {
        let mut result = AnalyzerResult::new("naturaldocs");
        result.violations.push(make_violation("a.sv", 1, Severity::Error));
        result.violations.push(make_violation("a.sv", 2, Severity::Warning));
        result.violations.push(make_violation("a.sv", 3, Severity::Warning));
        result.violations.push(make_violation("a.sv", 4, Severity::Info));
        assert_eq!(result.count_by_severity(), (1, 2, 1));
        assert_eq!(result.by_severity(Severity::Warning).len(), 2);
    }

    #[test]
    fn merge_accumulates_fragments() {
        let mut total = AnalyzerResult::new("naturaldocs");
        let mut a = AnalyzerResult::new("naturaldocs");
        a.files_checked = 1;
        a.violations.push(make_violation("a.sv", 1, Severity::Error));
        let mut b = AnalyzerResult::new("naturaldocs");
        b.record_file_failure(Path::new("b.sv"), "syntax error");
        b.record_rule_failure(Path::new("c.sv"), "[X]", "boom");

        total.merge(a);
        total.merge(b);

        assert_eq!(total.files_checked, 1);
        assert_eq!(total.files_failed, 1);
        assert_eq!(total.violations.len(), 1);
        assert_eq!(total.errors.get(Path::new("b.sv")).map(String::as_str), Some("syntax error"));
        assert_eq!(total.rule_failures.len(), 1);
    }

    #[test]
    fn sort_orders_by_file_then_line() {
        let mut result = AnalyzerResult::new("naturaldocs");
        result.violations.push(make_violation("b.sv", 1, Severity::Error));
        result.violations.push(make_violation("a.sv", 9, Severity::Error));
        result.violations.push(make_violation("a.sv", 2, Severity::Error));
        result.sort();
        let order: Vec<(String, usize)> = result
            .violations
            .iter()
            .map(|v| (v.file().display().to_string(), v.line()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("a.sv".to_string(), 2),
                ("a.sv".to_string(), 9),
                ("b.sv".to_string(), 1)
            ]
        );
    }

    #[test]
    fn unavailable_result_is_flagged() {
        let result = AnalyzerResult::unavailable("verible", "binary not found");
        assert!(result.is_unavailable());
        assert_eq!(result.files_checked, 0);
    }
}
