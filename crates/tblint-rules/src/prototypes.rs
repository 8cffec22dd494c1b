//! Pairs out-of-line subroutine bodies with their documented prototypes.
//!
//! `extern` and `pure virtual` prototypes carry the documentation for a
//! method; the `Owner::name` body defined later does not need its own.

use crate::docblock::Assessment;
use std::collections::HashSet;
use tblint_core::{DeclKind, SyntaxTree};

/// Indices of declarations whose documentation is carried by a prototype.
///
/// `assessments` must be index-aligned with `tree.declarations()`.
#[must_use]
pub fn covered_implementations(tree: &SyntaxTree, assessments: &[Assessment]) -> HashSet<usize> {
    let mut by_owner: HashSet<(DeclKind, &str, &str)> = HashSet::new();
    let mut by_name: HashSet<(DeclKind, &str)> = HashSet::new();

    for (decl, assessment) in tree.declarations().iter().zip(assessments) {
        if !decl.kind.is_subroutine() || !decl.is_prototype || !assessment.is_documented() {
            continue;
        }
        let owner = tree
            .enclosing_class(decl)
            .map(|scope| scope.name.as_str())
            .or(decl.qualifier.as_deref());
        match owner {
            Some(owner) => {
                by_owner.insert((decl.kind, owner, decl.name.as_str()));
            }
            None => {
                by_name.insert((decl.kind, decl.name.as_str()));
            }
        }
    }

    tree.declarations()
        .iter()
        .enumerate()
        .filter(|(_, decl)| decl.kind.is_subroutine() && decl.is_out_of_line())
        .filter(|(_, decl)| {
            let name = decl.name.as_str();
            let owned = decl
                .qualifier
                .as_deref()
                .is_some_and(|owner| by_owner.contains(&(decl.kind, owner, name)));
            owned || by_name.contains(&(decl.kind, name))
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docblock::{DocIssue, ScanStop};
    use tblint_core::{Declaration, ScopeKind};

    fn documented() -> Assessment {
        Assessment {
            block: Some(crate::docblock::DocBlock {
                first_line: 1,
                last_line: 1,
                topic: None,
            }),
            issues: Vec::new(),
            stop: ScanStop::Comment,
        }
    }

    fn undocumented() -> Assessment {
        Assessment {
            block: None,
            issues: vec![DocIssue::Missing],
            stop: ScanStop::Code,
        }
    }

    fn class_with_prototype() -> SyntaxTree {
        let mut tree = SyntaxTree::new();
        let class = tree.push_scope(ScopeKind::Class, "drv", 1, 5, None);
        tree.push_declaration(Declaration::new(DeclKind::Class, "drv", 1));
        tree.push_declaration(
            Declaration::new(DeclKind::Function, "run", 3)
                .prototype()
                .in_scope(class),
        );
        tree.push_declaration(Declaration::new(DeclKind::Function, "run", 8).with_qualifier("drv"));
        tree.push_declaration(Declaration::new(DeclKind::Function, "run", 12).with_qualifier("mon"));
        tree
    }

    #[test]
    fn documented_prototype_covers_matching_owner() {
        let tree = class_with_prototype();
        let assessments = vec![documented(), documented(), undocumented(), undocumented()];
        let covered = covered_implementations(&tree, &assessments);
        assert_eq!(covered, HashSet::from([2]));
    }

    #[test]
    fn undocumented_prototype_covers_nothing() {
        let tree = class_with_prototype();
        let assessments = vec![documented(), undocumented(), undocumented(), undocumented()];
        assert!(covered_implementations(&tree, &assessments).is_empty());
    }

    #[test]
    fn ownerless_prototype_matches_by_name() {
        let mut tree = SyntaxTree::new();
        tree.push_declaration(Declaration::new(DeclKind::Task, "main", 2).prototype());
        tree.push_declaration(Declaration::new(DeclKind::Task, "main", 9).with_qualifier("env"));
        tree.push_declaration(Declaration::new(DeclKind::Function, "main", 14).with_qualifier("env"));
        let assessments = vec![documented(), undocumented(), undocumented()];
        assert_eq!(covered_implementations(&tree, &assessments), HashSet::from([1]));
    }

    #[test]
    fn constructor_body_is_covered() {
        let mut tree = SyntaxTree::new();
        let class = tree.push_scope(ScopeKind::Class, "env", 1, 4, None);
        tree.push_declaration(
            Declaration::new(DeclKind::Function, "new", 2)
                .prototype()
                .in_scope(class),
        );
        tree.push_declaration(Declaration::new(DeclKind::Function, "new", 7).with_qualifier("env"));
        let assessments = vec![documented(), undocumented()];
        assert_eq!(covered_implementations(&tree, &assessments), HashSet::from([1]));
    }
}
