//! Per-file context shared by the NaturalDocs rules.

use crate::docblock::{self, Assessment};
use crate::prototypes;
use std::collections::HashSet;
use tblint_core::{DeclKind, Declaration, FileContext, SyntaxTree};

/// A parsed file with every declaration's documentation assessed once.
#[derive(Debug, Clone)]
pub struct DocsContext {
    tree: SyntaxTree,
    assessments: Vec<Assessment>,
    covered: HashSet<usize>,
}

impl DocsContext {
    /// Assesses every declaration in `tree` against the text of `file`.
    #[must_use]
    pub fn new(tree: SyntaxTree, file: &FileContext<'_>) -> Self {
        let assessments: Vec<Assessment> = tree
            .declarations()
            .iter()
            .map(|decl| {
                let scope_start = decl
                    .scope
                    .and_then(|id| tree.scope(id))
                    .map(|scope| scope.start_line);
                docblock::assess(file.lines(), decl.kind, &decl.name, decl.line, scope_start)
            })
            .collect();
        let covered = prototypes::covered_implementations(&tree, &assessments);
        Self {
            tree,
            assessments,
            covered,
        }
    }

    /// The syntax tree this context was built from.
    #[must_use]
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    /// Declarations that need their own documentation, with their
    /// assessments. Bodies covered by a documented prototype are left out.
    pub fn checked(&self) -> impl Iterator<Item = (&Declaration, &Assessment)> {
        self.tree
            .declarations()
            .iter()
            .zip(&self.assessments)
            .enumerate()
            .filter(|(i, _)| !self.covered.contains(i))
            .map(|(_, pair)| pair)
    }

    /// [`DocsContext::checked`] restricted to one kind.
    pub fn checked_of_kind(&self, kind: DeclKind) -> impl Iterator<Item = (&Declaration, &Assessment)> {
        self.checked().filter(move |(decl, _)| decl.kind == kind)
    }
}
