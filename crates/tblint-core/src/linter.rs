//! Linter trait and the rule-running machinery shared by linters.

use crate::config::{AnalyzerConfig, RuleConfig};
use crate::context::FileContext;
use crate::rule::{Rule, RuleBox, RuleInfo};
use crate::syntax::ParseFailure;
use crate::types::{AnalyzerResult, Severity, Violation};

use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use tracing::{debug, warn};

/// A named bundle of rules applicable to certain file types.
pub trait Linter: Send + Sync {
    /// Registry name (e.g., `"naturaldocs"`).
    fn name(&self) -> &str;

    /// File extensions this linter handles, without the dot.
    fn supported_extensions(&self) -> &[&str];

    /// Whether `path` has a supported extension.
    fn supports(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.supported_extensions()
                    .iter()
                    .any(|s| s.eq_ignore_ascii_case(ext))
            })
    }

    /// Checks that external tools this linter needs are present.
    ///
    /// # Errors
    ///
    /// Returns [`LinterUnavailable`] when the linter cannot run; the
    /// orchestrator then reports it as unavailable for every file.
    fn check_availability(&self) -> Result<(), LinterUnavailable> {
        Ok(())
    }

    /// Registered rules with their effective configuration.
    fn rules(&self) -> Vec<RuleInfo>;

    /// Lints one file. Failures are recorded in the returned fragment.
    fn lint_file(&self, path: &Path) -> AnalyzerResult;
}

/// Type alias for boxed Linter trait objects.
pub type LinterBox = Box<dyn Linter>;

/// An external tool a linter depends on is missing or unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{tool} is unavailable: {reason}")]
pub struct LinterUnavailable {
    /// Tool name.
    pub tool: String,
    /// What is wrong.
    pub reason: String,
}

impl LinterUnavailable {
    /// Creates a new unavailability record.
    #[must_use]
    pub fn new(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            reason: reason.into(),
        }
    }
}

struct RuleEntry<C> {
    rule: RuleBox<C>,
    config: RuleConfig,
}

impl<C> RuleEntry<C> {
    fn severity(&self) -> Severity {
        self.config.effective_severity(self.rule.default_severity())
    }
}

/// Ordered collection of rules bound to their effective configuration.
///
/// ```ignore
/// let rules = RuleSet::for_config(&config)
///     .rule(FileHeader::new(settings.file_header.clone()))
///     .rule(MissingDocs::new(DeclKind::Class));
/// ```
pub struct RuleSet<C> {
    overrides: BTreeMap<String, RuleConfig>,
    entries: Vec<RuleEntry<C>>,
}

impl<C> RuleSet<C> {
    /// Creates an empty set that takes rule overrides from `config`.
    #[must_use]
    pub fn for_config(config: &AnalyzerConfig) -> Self {
        Self {
            overrides: config.rules.clone(),
            entries: Vec::new(),
        }
    }

    /// Adds a rule.
    #[must_use]
    pub fn rule<R: Rule<C> + 'static>(mut self, rule: R) -> Self {
        self.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule.
    pub fn push(&mut self, rule: RuleBox<C>) {
        let config = self.overrides.get(rule.id()).copied().unwrap_or_default();
        self.entries.push(RuleEntry { rule, config });
    }

    /// Number of registered rules, enabled or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Describes every registered rule.
    #[must_use]
    pub fn infos(&self) -> Vec<RuleInfo> {
        self.entries
            .iter()
            .map(|e| RuleInfo {
                id: e.rule.id(),
                description: e.rule.description(),
                default_severity: e.rule.default_severity(),
                severity: e.severity(),
                enabled: e.config.enabled,
            })
            .collect()
    }

    /// Runs every enabled rule against one prepared file.
    ///
    /// A rule that errors or panics is recorded as a rule failure; the
    /// remaining rules still run.
    pub fn run(&self, file: &FileContext<'_>, ctx: &C, result: &mut AnalyzerResult) {
        for entry in &self.entries {
            let id = entry.rule.id();
            if !entry.config.enabled {
                debug!("Skipping disabled rule: {}", id);
                continue;
            }

            let outcome = catch_unwind(AssertUnwindSafe(|| entry.rule.check(file, ctx)));
            match outcome {
                Ok(Ok(findings)) => {
                    let severity = entry.severity();
                    result.violations.extend(
                        findings
                            .into_iter()
                            .map(|f| Violation::stamp(id, severity, file.path(), f)),
                    );
                }
                Ok(Err(e)) => {
                    warn!("Rule {} failed on {}: {}", id, file.path().display(), e);
                    result.record_rule_failure(file.path(), id, e.to_string());
                }
                Err(_) => {
                    warn!("Rule {} panicked on {}", id, file.path().display());
                    result.record_rule_failure(file.path(), id, "rule panicked");
                }
            }
        }
    }
}

/// Reads `path` once, prepares the shared context once, and runs `rules`.
///
/// Read and prepare failures are recorded as failed files and no rules run
/// for them.
pub fn lint_with_context<C, F>(
    linter: &str,
    path: &Path,
    rules: &RuleSet<C>,
    prepare: F,
) -> AnalyzerResult
where
    F: FnOnce(&FileContext<'_>) -> Result<C, ParseFailure>,
{
    let mut result = AnalyzerResult::new(linter);
    debug!("{}: linting {}", linter, path.display());

    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("{}: cannot read {}: {}", linter, path.display(), e);
            result.record_file_failure(path, format!("failed to read file: {e}"));
            return result;
        }
    };
    let content = String::from_utf8_lossy(&bytes);
    let file = FileContext::new(path, &content);

    let ctx = match prepare(&file) {
        Ok(ctx) => ctx,
        Err(e) => {
            warn!("{}: failed to parse {}: {}", linter, path.display(), e);
            result.record_file_failure(path, format!("parse failed: {e}"));
            return result;
        }
    };

    rules.run(&file, &ctx, &mut result);
    result.files_checked += 1;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleError;
    use crate::types::Finding;
    use std::fs;
    use tempfile::TempDir;

    struct LineCount;

    impl Rule<usize> for LineCount {
        fn id(&self) -> &'static str {
            "[T_LINES]"
        }
        fn default_severity(&self) -> Severity {
            Severity::Warning
        }
        fn check(&self, _file: &FileContext<'_>, ctx: &usize) -> Result<Vec<Finding>, RuleError> {
            Ok(vec![Finding::new(1, format!("{ctx} lines"))])
        }
    }

    struct Failing;

    impl Rule<usize> for Failing {
        fn id(&self) -> &'static str {
            "[T_FAIL]"
        }
        fn check(&self, _file: &FileContext<'_>, _ctx: &usize) -> Result<Vec<Finding>, RuleError> {
            Err(RuleError::new("cannot evaluate"))
        }
    }

    struct Panicking;

    impl Rule<usize> for Panicking {
        fn id(&self) -> &'static str {
            "[T_PANIC]"
        }
        fn check(&self, _file: &FileContext<'_>, _ctx: &usize) -> Result<Vec<Finding>, RuleError> {
            panic!("unexpected state")
        }
    }

    fn source_file(content: &str) -> (TempDir, std::path::PathBuf) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.sv");
        fs::write(&path, content).unwrap();
        (tmp, path)
    }

    fn config_with(rule_id: &str, rule: RuleConfig) -> AnalyzerConfig {
        let mut config = AnalyzerConfig::default();
        config.rules.insert(rule_id.to_string(), rule);
        config
    }

    #[test]
    fn prepares_once_and_stamps_default_severity() {
        let (_tmp, path) = source_file("a\nb\nc\n");
        let rules = RuleSet::for_config(&AnalyzerConfig::default()).rule(LineCount);
        let mut calls = 0;
        let result = lint_with_context("t", &path, &rules, |f| {
            calls += 1;
            Ok(f.line_count())
        });

        assert_eq!(calls, 1);
        assert_eq!(result.files_checked, 1);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].severity(), Severity::Warning);
        assert_eq!(result.violations[0].message(), "3 lines");
    }

    #[test]
    fn disabled_rule_contributes_nothing() {
        let (_tmp, path) = source_file("a\n");
        let config = config_with(
            "[T_LINES]",
            RuleConfig {
                enabled: false,
                severity: None,
            },
        );
        let rules = RuleSet::for_config(&config).rule(LineCount);
        let result = lint_with_context("t", &path, &rules, |f| Ok(f.line_count()));
        assert!(result.violations.is_empty());
        assert_eq!(result.files_checked, 1);
    }

    #[test]
    fn severity_override_keeps_message_and_line() {
        let (_tmp, path) = source_file("a\n");
        let plain = RuleSet::for_config(&AnalyzerConfig::default()).rule(LineCount);
        let config = config_with(
            "[T_LINES]",
            RuleConfig {
                enabled: true,
                severity: Some(Severity::Error),
            },
        );
        let overridden = RuleSet::for_config(&config).rule(LineCount);

        let before = lint_with_context("t", &path, &plain, |f| Ok(f.line_count()));
        let after = lint_with_context("t", &path, &overridden, |f| Ok(f.line_count()));

        assert_eq!(after.violations[0].severity(), Severity::Error);
        assert_eq!(after.violations[0].message(), before.violations[0].message());
        assert_eq!(after.violations[0].line(), before.violations[0].line());
    }

    #[test]
    fn prepare_failure_skips_rules_and_counts_failed_file() {
        let (_tmp, path) = source_file("garbage\n");
        let rules = RuleSet::for_config(&AnalyzerConfig::default()).rule(LineCount);
        let result = lint_with_context("t", &path, &rules, |_| {
            Err::<usize, _>(ParseFailure::new("syntax error"))
        });
        assert_eq!(result.files_checked, 0);
        assert_eq!(result.files_failed, 1);
        assert!(result.violations.is_empty());
        assert!(result.errors[&path].contains("syntax error"));
    }

    #[test]
    fn unreadable_file_is_a_failed_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing.sv");
        let rules = RuleSet::for_config(&AnalyzerConfig::default()).rule(LineCount);
        let result = lint_with_context("t", &path, &rules, |f| Ok(f.line_count()));
        assert_eq!(result.files_failed, 1);
        assert_eq!(result.files_checked, 0);
    }

    #[test]
    fn failing_rules_are_contained() {
        let (_tmp, path) = source_file("a\n");
        let rules = RuleSet::for_config(&AnalyzerConfig::default())
            .rule(Failing)
            .rule(Panicking)
            .rule(LineCount);
        let result = lint_with_context("t", &path, &rules, |f| Ok(f.line_count()));

        assert_eq!(result.files_checked, 1);
        assert_eq!(result.violations.len(), 1);
        let failed: Vec<&str> = result
            .rule_failures
            .iter()
            .map(|f| f.rule_id.as_str())
            .collect();
        assert_eq!(failed, vec!["[T_FAIL]", "[T_PANIC]"]);
    }

    #[test]
    fn infos_report_effective_configuration() {
        let config = config_with(
            "[T_LINES]",
            RuleConfig {
                enabled: false,
                severity: Some(Severity::Info),
            },
        );
        let rules = RuleSet::for_config(&config).rule(LineCount).rule(Failing);
        let infos = rules.infos();
        assert_eq!(rules.len(), 2);
        assert_eq!(infos[0].default_severity, Severity::Warning);
        assert_eq!(infos[0].severity, Severity::Info);
        assert!(!infos[0].enabled);
        assert!(infos[1].enabled);
    }
}
