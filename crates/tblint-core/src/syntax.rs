//! Language-agnostic view of a parsed source file.
//!
//! [`SyntaxTreeProvider`] is the extension point for parsers. It turns
//! source text into a flat [`SyntaxTree`]: the declarations that
//! documentation rules attach to, and the scopes that enclose them.

use crate::linter::LinterUnavailable;
use serde::Serialize;
use std::path::Path;

/// Kind of a documentable declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DeclKind {
    /// `package p;`
    Package,
    /// `class c;`
    Class,
    /// `function f();`
    Function,
    /// `task t();`
    Task,
    /// `constraint c { ... }`
    Constraint,
    /// `typedef ... t;`
    Typedef,
    /// Member or module-level data declaration.
    Variable,
    /// Body-level `parameter` / `localparam`.
    Parameter,
}

impl DeclKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Package,
        Self::Class,
        Self::Function,
        Self::Task,
        Self::Constraint,
        Self::Typedef,
        Self::Variable,
        Self::Parameter,
    ];

    /// Lower-case label used in messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Package => "package",
            Self::Class => "class",
            Self::Function => "function",
            Self::Task => "task",
            Self::Constraint => "constraint",
            Self::Typedef => "typedef",
            Self::Variable => "variable",
            Self::Parameter => "parameter",
        }
    }

    /// Whether declarations of this kind can be split into a prototype and
    /// an out-of-line implementation.
    #[must_use]
    pub fn is_subroutine(self) -> bool {
        matches!(self, Self::Function | Self::Task)
    }
}

impl std::fmt::Display for DeclKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Index of a scope within its [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ScopeId(pub usize);

/// Kind of an enclosing scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ScopeKind {
    /// `package ... endpackage`
    Package,
    /// `class ... endclass`
    Class,
    /// `module ... endmodule`
    Module,
    /// `interface ... endinterface`
    Interface,
    /// `program ... endprogram`
    Program,
    /// `function ... endfunction`
    Function,
    /// `task ... endtask`
    Task,
}

/// A region of the file that encloses declarations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scope {
    /// Index of this scope.
    pub id: ScopeId,
    /// Kind of construct.
    pub kind: ScopeKind,
    /// Name of the construct (empty when anonymous).
    pub name: String,
    /// Line of the opening keyword (1-indexed).
    pub start_line: usize,
    /// Line of the closing keyword (1-indexed).
    pub end_line: usize,
    /// Enclosing scope.
    pub parent: Option<ScopeId>,
}

/// A named construct that documentation rules attach to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    /// Kind of construct.
    pub kind: DeclKind,
    /// Unqualified name.
    pub name: String,
    /// Owner in an `Owner::member` out-of-line definition.
    pub qualifier: Option<String>,
    /// Forward (`extern`, `pure virtual`) declaration.
    pub is_prototype: bool,
    /// Line of the declaration (1-indexed).
    pub line: usize,
    /// Innermost enclosing scope.
    pub scope: Option<ScopeId>,
}

impl Declaration {
    /// Creates a top-level, non-prototype declaration.
    #[must_use]
    pub fn new(kind: DeclKind, name: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            name: name.into(),
            qualifier: None,
            is_prototype: false,
            line,
            scope: None,
        }
    }

    /// Marks this declaration as a prototype.
    #[must_use]
    pub fn prototype(mut self) -> Self {
        self.is_prototype = true;
        self
    }

    /// Sets the `Owner::` qualifier.
    #[must_use]
    pub fn with_qualifier(mut self, owner: impl Into<String>) -> Self {
        self.qualifier = Some(owner.into());
        self
    }

    /// Sets the enclosing scope.
    #[must_use]
    pub fn in_scope(mut self, scope: ScopeId) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Whether this is an `Owner::member` body defined outside its owner.
    #[must_use]
    pub fn is_out_of_line(&self) -> bool {
        self.qualifier.is_some() && !self.is_prototype
    }
}

/// Declarations and scopes of one file, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyntaxTree {
    declarations: Vec<Declaration>,
    scopes: Vec<Scope>,
}

impl SyntaxTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a scope and returns its id.
    pub fn push_scope(
        &mut self,
        kind: ScopeKind,
        name: impl Into<String>,
        start_line: usize,
        end_line: usize,
        parent: Option<ScopeId>,
    ) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            id,
            kind,
            name: name.into(),
            start_line,
            end_line,
            parent,
        });
        id
    }

    /// Adds a declaration.
    pub fn push_declaration(&mut self, declaration: Declaration) {
        self.declarations.push(declaration);
    }

    /// All declarations, in the order they were added.
    #[must_use]
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// All scopes.
    #[must_use]
    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    /// Looks up a scope.
    #[must_use]
    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.0)
    }

    /// Nearest enclosing class of a declaration, walking scope parents.
    #[must_use]
    pub fn enclosing_class(&self, declaration: &Declaration) -> Option<&Scope> {
        let mut current = declaration.scope.and_then(|id| self.scope(id));
        while let Some(scope) = current {
            if scope.kind == ScopeKind::Class {
                return Some(scope);
            }
            current = scope.parent.and_then(|id| self.scope(id));
        }
        None
    }

    /// Declarations of one kind.
    pub fn of_kind(&self, kind: DeclKind) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter().filter(move |d| d.kind == kind)
    }

    /// Whether the file declares a package.
    #[must_use]
    pub fn declares_package(&self) -> bool {
        self.of_kind(DeclKind::Package).next().is_some()
    }
}

/// The provider could not build a tree for a file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ParseFailure {
    message: String,
}

impl ParseFailure {
    /// Creates a new parse failure.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Converts source text into a [`SyntaxTree`].
///
/// Implement this to plug in a parser. Calls are blocking and may be made
/// from several worker threads at once.
pub trait SyntaxTreeProvider: Send + Sync {
    /// Short identifier used in logs (e.g., `"verible-verilog-syntax"`).
    fn name(&self) -> &str;

    /// Checks that the provider can run (binary present, etc.).
    ///
    /// # Errors
    ///
    /// Returns [`LinterUnavailable`] describing what is missing.
    fn check_availability(&self) -> Result<(), LinterUnavailable> {
        Ok(())
    }

    /// Parses one file.
    ///
    /// # Errors
    ///
    /// Returns [`ParseFailure`] when no tree can be built for the file.
    fn parse(&self, path: &Path, text: &str) -> Result<SyntaxTree, ParseFailure>;
}
