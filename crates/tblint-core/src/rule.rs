//! Rule trait for defining lint rules.

use crate::context::FileContext;
use crate::types::{Finding, Severity};
use serde::Serialize;

/// A single, independently configurable check.
///
/// `C` is the context the owning linter prepares once per file (for
/// example, a parsed syntax tree). Rules only read it.
///
/// # Example
///
/// ```ignore
/// use tblint_core::{FileContext, Finding, Rule, RuleError, Severity};
///
/// pub struct NoTabs;
///
/// impl Rule<()> for NoTabs {
///     fn id(&self) -> &'static str { "[STYLE_NO_TABS]" }
///     fn default_severity(&self) -> Severity { Severity::Warning }
///
///     fn check(&self, file: &FileContext<'_>, _ctx: &()) -> Result<Vec<Finding>, RuleError> {
///         Ok(file
///             .lines()
///             .iter()
///             .enumerate()
///             .filter(|(_, l)| l.contains('\t'))
///             .map(|(i, _)| Finding::new(i + 1, "tab character"))
///             .collect())
///     }
/// }
/// ```
pub trait Rule<C>: Send + Sync {
    /// Returns the stable bracketed identifier (e.g., `[ND_CLASS_MISS]`).
    fn id(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for findings from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Checks a single file and returns any findings.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] when the rule cannot complete its check. The
    /// failure is recorded against this rule and the file; other rules
    /// still run.
    fn check(&self, file: &FileContext<'_>, ctx: &C) -> Result<Vec<Finding>, RuleError>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox<C> = Box<dyn Rule<C>>;

/// Internal failure of a rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RuleError {
    message: String,
}

impl RuleError {
    /// Creates a new rule error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Description of a registered rule and its effective configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleInfo {
    /// Bracketed identifier.
    pub id: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Severity the rule declares.
    pub default_severity: Severity,
    /// Severity after configuration overrides.
    pub severity: Severity,
    /// Whether the rule runs.
    pub enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    struct TestRule;

    impl Rule<()> for TestRule {
        fn id(&self) -> &'static str {
            "[TEST_RULE]"
        }

        fn description(&self) -> &'static str {
            "A test rule"
        }

        fn check(&self, _file: &FileContext<'_>, _ctx: &()) -> Result<Vec<Finding>, RuleError> {
            Ok(vec![Finding::new(1, "Test violation")])
        }
    }

    #[test]
    fn test_rule_trait_defaults() {
        let rule = TestRule;
        assert_eq!(rule.id(), "[TEST_RULE]");
        assert_eq!(rule.default_severity(), Severity::Error);

        let file = FileContext::new(Path::new("a.sv"), "module m; endmodule\n");
        let findings = rule.check(&file, &()).unwrap();
        assert_eq!(findings.len(), 1);
    }
}
