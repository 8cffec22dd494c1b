//! Rules requiring a documentation topic on each kind of declaration.
//!
//! One rule per [`DeclKind`], so each kind can be enabled and graded
//! separately:
//!
//! | Id | Kind | Default |
//! |----|------|---------|
//! | `[ND_PKG_MISS]` | package | ERROR |
//! | `[ND_CLASS_MISS]` | class | ERROR |
//! | `[ND_FUNC_MISS]` | function | ERROR |
//! | `[ND_TASK_MISS]` | task | ERROR |
//! | `[ND_CONST_MISS]` | constraint | ERROR |
//! | `[ND_TYPEDEF_MISS]` | typedef | WARNING |
//! | `[ND_VAR_MISS]` | variable | INFO |
//! | `[ND_PARAM_MISS]` | parameter | INFO |

use crate::context::DocsContext;
use crate::keywords;
use tblint_core::{DeclKind, FileContext, Finding, Rule, RuleError, Severity};

/// Reports declarations of one kind that carry no documentation topic.
#[derive(Debug, Clone, Copy)]
pub struct MissingDocs {
    kind: DeclKind,
}

impl MissingDocs {
    /// Creates the rule for `kind`.
    #[must_use]
    pub fn new(kind: DeclKind) -> Self {
        Self { kind }
    }

    /// One rule per declaration kind.
    #[must_use]
    pub fn all() -> Vec<Self> {
        DeclKind::ALL.into_iter().map(Self::new).collect()
    }

    /// Kind checked by this rule.
    #[must_use]
    pub fn kind(&self) -> DeclKind {
        self.kind
    }
}

impl Rule<DocsContext> for MissingDocs {
    fn id(&self) -> &'static str {
        match self.kind {
            DeclKind::Package => "[ND_PKG_MISS]",
            DeclKind::Class => "[ND_CLASS_MISS]",
            DeclKind::Function => "[ND_FUNC_MISS]",
            DeclKind::Task => "[ND_TASK_MISS]",
            DeclKind::Constraint => "[ND_CONST_MISS]",
            DeclKind::Typedef => "[ND_TYPEDEF_MISS]",
            DeclKind::Variable => "[ND_VAR_MISS]",
            DeclKind::Parameter => "[ND_PARAM_MISS]",
        }
    }

    fn description(&self) -> &'static str {
        match self.kind {
            DeclKind::Package => "Packages must have 'Package:' documentation",
            DeclKind::Class => "Classes must have 'Class:' documentation",
            DeclKind::Function => "Functions must have 'Function:' documentation",
            DeclKind::Task => "Tasks must have 'Task:' or 'Function:' documentation",
            DeclKind::Constraint => "Constraints must have 'Constraint:' or 'define:' documentation",
            DeclKind::Typedef => "Typedefs should have 'Typedef:' or 'Type:' documentation",
            DeclKind::Variable => "Member variables may have 'Variable:' documentation",
            DeclKind::Parameter => "Parameters may have 'Parameter:' or 'Constant:' documentation",
        }
    }

    fn default_severity(&self) -> Severity {
        match self.kind {
            DeclKind::Typedef => Severity::Warning,
            DeclKind::Variable | DeclKind::Parameter => Severity::Info,
            _ => Severity::Error,
        }
    }

    fn check(&self, _file: &FileContext<'_>, ctx: &DocsContext) -> Result<Vec<Finding>, RuleError> {
        let keyword = keywords::primary_keyword(self.kind);
        Ok(ctx
            .checked_of_kind(self.kind)
            .filter(|(_, assessment)| assessment.is_missing())
            .map(|(decl, _)| {
                let message = if decl.name.is_empty() {
                    format!("{keyword} without '{keyword}:' documentation")
                } else {
                    format!("{keyword} '{}' without '{keyword}:' documentation", decl.name)
                };
                Finding::new(decl.line, message)
            })
            .collect())
    }
}
