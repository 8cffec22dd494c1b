//! Rules checking the keyword and title of a documentation topic.

use crate::context::DocsContext;
use crate::docblock::DocIssue;
use crate::keywords;
use tblint_core::{Declaration, FileContext, Finding, Rule, RuleError};

fn describe(decl: &Declaration) -> String {
    format!("{} '{}'", decl.kind, decl.name)
}

fn findings<F>(ctx: &DocsContext, mut report: F) -> Vec<Finding>
where
    F: FnMut(&Declaration, &DocIssue) -> Option<String>,
{
    ctx.checked()
        .flat_map(|(decl, assessment)| assessment.issues.iter().map(move |issue| (decl, issue)))
        .filter_map(|(decl, issue)| report(decl, issue).map(|msg| Finding::new(decl.line, msg)))
        .collect()
}

/// `[ND_KW_INVALID]`: the topic keyword is not a NaturalDocs keyword.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvalidKeyword;

impl Rule<DocsContext> for InvalidKeyword {
    fn id(&self) -> &'static str {
        "[ND_KW_INVALID]"
    }

    fn description(&self) -> &'static str {
        "Documentation topics must use a NaturalDocs keyword"
    }

    fn check(&self, _file: &FileContext<'_>, ctx: &DocsContext) -> Result<Vec<Finding>, RuleError> {
        Ok(findings(ctx, |decl, issue| match issue {
            DocIssue::InvalidKeyword { keyword } => Some(format!(
                "Unknown NaturalDocs keyword '{keyword}:' documenting {}",
                describe(decl)
            )),
            _ => None,
        }))
    }
}

/// `[ND_KW_TYPE]`: the keyword exists but cannot document this kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct WrongKeyword;

impl Rule<DocsContext> for WrongKeyword {
    fn id(&self) -> &'static str {
        "[ND_KW_TYPE]"
    }

    fn description(&self) -> &'static str {
        "Documentation keyword must match the kind of declaration"
    }

    fn check(&self, _file: &FileContext<'_>, ctx: &DocsContext) -> Result<Vec<Finding>, RuleError> {
        Ok(findings(ctx, |decl, issue| match issue {
            DocIssue::WrongKeyword { keyword } => Some(format!(
                "'{keyword}:' cannot document {} (expected one of: {})",
                describe(decl),
                keywords::accepted_keywords(decl.kind).join(", ")
            )),
            _ => None,
        }))
    }
}

/// `[ND_NAME_MISMATCH]`: the topic title names a different identifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameMismatch;

impl Rule<DocsContext> for NameMismatch {
    fn id(&self) -> &'static str {
        "[ND_NAME_MISMATCH]"
    }

    fn description(&self) -> &'static str {
        "Documented name must match the declared name"
    }

    fn check(&self, _file: &FileContext<'_>, ctx: &DocsContext) -> Result<Vec<Finding>, RuleError> {
        Ok(findings(ctx, |decl, issue| match issue {
            DocIssue::NameMismatch { documented } => Some(format!(
                "Documented name '{documented}' does not match {}",
                describe(decl)
            )),
            _ => None,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tblint_core::{DeclKind, SyntaxTree};

    fn check<R: Rule<DocsContext>>(rule: &R, src: &str, decl: Declaration) -> Vec<String> {
        let file = FileContext::new(Path::new("t.sv"), src);
        let mut tree = SyntaxTree::new();
        tree.push_declaration(decl);
        let ctx = DocsContext::new(tree, &file);
        rule.check(&file, &ctx)
            .unwrap()
            .into_iter()
            .map(|f| f.message)
            .collect()
    }

    #[test]
    fn invalid_keyword_message() {
        let messages = check(
            &InvalidKeyword,
            "// Widget: c\nclass c;",
            Declaration::new(DeclKind::Class, "c", 2),
        );
        assert_eq!(
            messages,
            vec!["Unknown NaturalDocs keyword 'Widget:' documenting class 'c'"]
        );
    }

    #[test]
    fn wrong_keyword_lists_accepted() {
        let messages = check(
            &WrongKeyword,
            "// Class: t\ntypedef int t;",
            Declaration::new(DeclKind::Typedef, "t", 2),
        );
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("'Class:' cannot document typedef 't'"));
        assert!(messages[0].contains("enum"));
    }

    #[test]
    fn name_mismatch_only_fires_on_mismatch() {
        let decl = || Declaration::new(DeclKind::Class, "c", 2);
        assert_eq!(
            check(&NameMismatch, "// Class: d\nclass c;", decl()),
            vec!["Documented name 'd' does not match class 'c'"]
        );
        assert!(check(&NameMismatch, "// Class: c\nclass c;", decl()).is_empty());
        assert!(check(&NameMismatch, "// Widget: d\nclass c;", decl()).is_empty());
    }
}
