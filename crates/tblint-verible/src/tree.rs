//! Verible's exported concrete syntax tree and its conversion into a
//! [`SyntaxTree`].
//!
//! `verible-verilog-syntax --export_json --printtree` prints one object per
//! input file:
//!
//! ```json
//! { "fifo.sv": { "tree": { "tag": "kDescriptionList", "children": [ ... ] },
//!                "errors": [ { "line": 2, "column": 4, "phrase": "endclass" } ] } }
//! ```
//!
//! Branches carry a tag and children (some `null`); leaves carry a tag,
//! byte offsets and their text. Branch spans are derived from their leaves.
//!
//! Offsets index the raw file bytes, so the walker works on bytes and only
//! decodes the slices it reads.

use regex::Regex;
use serde::Deserialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use tblint_core::{DeclKind, Declaration, ScopeId, ScopeKind, SyntaxTree};

/// Per-file export output, keyed by the path Verible was given.
pub type ExportOutput = BTreeMap<String, FileExport>;

/// Export for one file.
#[derive(Debug, Clone, Deserialize)]
pub struct FileExport {
    /// Root of the tree; absent when parsing failed outright.
    #[serde(default)]
    pub tree: Option<Node>,
    /// Syntax errors.
    #[serde(default)]
    pub errors: Vec<ExportError>,
}

/// A syntax error reported by the exporter. `line` and `column` are 0-based.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExportError {
    /// Line of the offending token.
    pub line: usize,
    /// Column of the offending token.
    pub column: usize,
    /// Offending token text.
    #[serde(default)]
    pub phrase: String,
}

/// A node of the concrete syntax tree.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Node {
    /// Token.
    Leaf {
        /// Token tag (e.g. `SymbolIdentifier`).
        tag: String,
        /// Byte offset of the first character.
        start: usize,
        /// Byte offset one past the last character.
        end: usize,
    },
    /// Grammar production.
    Branch {
        /// Production tag (e.g. `kClassDeclaration`).
        tag: String,
        /// Children; `null` marks an omitted optional element.
        #[serde(default)]
        children: Vec<Option<Node>>,
    },
}

impl Node {
    /// Node tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Leaf { tag, .. } | Self::Branch { tag, .. } => tag,
        }
    }

    /// Present children, in order.
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        let children: &[Option<Node>] = match self {
            Self::Leaf { .. } => &[],
            Self::Branch { children, .. } => children,
        };
        children.iter().flatten()
    }

    /// Byte range covered by this node, or `None` if it has no leaves.
    #[must_use]
    pub fn span(&self) -> Option<(usize, usize)> {
        match self {
            Self::Leaf { start, end, .. } => Some((*start, *end)),
            Self::Branch { .. } => {
                let first = self.children().find_map(Node::span)?;
                let last = self
                    .children()
                    .filter_map(Node::span)
                    .last()
                    .unwrap_or(first);
                Some((first.0, last.1))
            }
        }
    }

    /// Source text covered by this node; invalid UTF-8 is replaced.
    #[must_use]
    pub fn text<'s>(&self, source: &'s [u8]) -> Cow<'s, str> {
        self.span()
            .and_then(|(start, end)| source.get(start..end))
            .map_or(Cow::Borrowed(""), String::from_utf8_lossy)
    }

    /// First node with `tag` in pre-order, including `self`.
    #[must_use]
    pub fn find(&self, tag: &str) -> Option<&Node> {
        if self.tag() == tag {
            return Some(self);
        }
        self.children().find_map(|c| c.find(tag))
    }
}

/// Maps byte offsets to 1-based line numbers.
#[derive(Debug, Clone)]
pub struct LineIndex {
    newlines: Vec<usize>,
}

impl LineIndex {
    /// Indexes `source`.
    #[must_use]
    pub fn new(source: &[u8]) -> Self {
        Self {
            newlines: source
                .iter()
                .enumerate()
                .filter(|(_, b)| **b == b'\n')
                .map(|(i, _)| i)
                .collect(),
        }
    }

    /// Line containing `offset`.
    #[must_use]
    pub fn line(&self, offset: usize) -> usize {
        self.newlines.partition_point(|&nl| nl < offset) + 1
    }
}

/// Name-extraction patterns for declarations whose name is not a direct
/// identifier child.
#[derive(Debug, Clone)]
pub struct NamePatterns {
    parameter: Regex,
    typedef: Regex,
    variable: Regex,
}

impl NamePatterns {
    /// Compiles the patterns.
    ///
    /// # Errors
    ///
    /// Returns the regex error if a pattern fails to compile.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            parameter: Regex::new(r"\b(?:parameter|localparam)\b.*?\b(\w+)\s*(?:=|;)")?,
            typedef: Regex::new(r"\}\s*(\w+)\s*;|typedef\s+\w+(?:\s*\[.*?\])?\s*(\w+)\s*;")?,
            variable: Regex::new(r"\b(\w+)\s*(?:;|=)")?,
        })
    }

    fn capture(pattern: &Regex, text: &str) -> Option<String> {
        let caps = pattern.captures(text)?;
        caps.iter()
            .skip(1)
            .flatten()
            .next()
            .map(|m| m.as_str().to_string())
    }
}

/// Converts an exported tree into declarations and scopes.
pub struct TreeWalker<'a> {
    source: &'a [u8],
    lines: LineIndex,
    patterns: &'a NamePatterns,
    tree: SyntaxTree,
}

impl<'a> TreeWalker<'a> {
    /// Creates a walker over `source`, the bytes the tree was parsed from.
    #[must_use]
    pub fn new(source: &'a [u8], patterns: &'a NamePatterns) -> Self {
        Self {
            source,
            lines: LineIndex::new(source),
            patterns,
            tree: SyntaxTree::new(),
        }
    }

    /// Walks `root` and returns the collected tree.
    #[must_use]
    pub fn walk(mut self, root: &Node) -> SyntaxTree {
        self.visit(root, None);
        self.tree
    }

    fn visit(&mut self, node: &Node, scope: Option<ScopeId>) {
        match node.tag() {
            "kPackageDeclaration" => {
                self.open(node, scope, ScopeKind::Package, Some(DeclKind::Package));
            }
            "kClassDeclaration" => {
                self.open(node, scope, ScopeKind::Class, Some(DeclKind::Class));
            }
            "kModuleDeclaration" => self.open(node, scope, ScopeKind::Module, None),
            "kInterfaceDeclaration" => self.open(node, scope, ScopeKind::Interface, None),
            "kProgramDeclaration" => self.open(node, scope, ScopeKind::Program, None),
            // Header parameter ports are not body-level parameters.
            "kFormalParameterList" | "kPortDeclarationList" => {}
            "kFunctionPrototype" => self.subroutine(node, scope, DeclKind::Function, true),
            "kTaskPrototype" => self.subroutine(node, scope, DeclKind::Task, true),
            "kFunctionDeclaration" => self.subroutine(node, scope, DeclKind::Function, false),
            "kTaskDeclaration" => self.subroutine(node, scope, DeclKind::Task, false),
            "kClassConstructorPrototype" => {
                self.declare(node, scope, DeclKind::Function, "new".to_string(), true, None);
            }
            "kClassConstructor" => {
                let qualifier = constructor_id(node)
                    .and_then(|q| split_qualified(&q.text(self.source)).0);
                self.declare(node, scope, DeclKind::Function, "new".to_string(), false, qualifier);
            }
            "kConstraintDeclaration" => {
                if let Some(name) = self.identifier(node) {
                    self.declare(node, scope, DeclKind::Constraint, name, false, None);
                }
            }
            "kTypeDeclaration" => {
                let text = node.text(self.source);
                if let Some(name) = NamePatterns::capture(&self.patterns.typedef, &text) {
                    self.declare(node, scope, DeclKind::Typedef, name, false, None);
                }
            }
            "kParamDeclaration" => {
                let text = node.text(self.source);
                if let Some(name) = NamePatterns::capture(&self.patterns.parameter, &text) {
                    self.declare(node, scope, DeclKind::Parameter, name, false, None);
                }
            }
            "kDataDeclaration" => {
                let text = node.text(self.source);
                if let Some(name) = NamePatterns::capture(&self.patterns.variable, &text) {
                    self.declare(node, scope, DeclKind::Variable, name, false, None);
                }
            }
            _ => {
                for child in node.children() {
                    self.visit(child, scope);
                }
            }
        }
    }

    fn line_of(&self, node: &Node) -> usize {
        node.span().map_or(1, |(start, _)| self.lines.line(start))
    }

    fn end_line_of(&self, node: &Node) -> usize {
        node.span()
            .map_or(1, |(_, end)| self.lines.line(end.saturating_sub(1)))
    }

    fn identifier(&self, node: &Node) -> Option<String> {
        node.find("SymbolIdentifier")
            .map(|id| id.text(self.source).into_owned())
    }

    fn open(
        &mut self,
        node: &Node,
        parent: Option<ScopeId>,
        kind: ScopeKind,
        decl: Option<DeclKind>,
    ) {
        let name = self.identifier(node).unwrap_or_default();
        if let Some(decl) = decl {
            self.declare(node, parent, decl, name.clone(), false, None);
        }
        let id = self.tree.push_scope(
            kind,
            name,
            self.line_of(node),
            self.end_line_of(node),
            parent,
        );
        for child in node.children() {
            self.visit(child, Some(id));
        }
    }

    fn subroutine(&mut self, node: &Node, scope: Option<ScopeId>, kind: DeclKind, prototype: bool) {
        let header_tag = match kind {
            DeclKind::Task => "kTaskHeader",
            _ => "kFunctionHeader",
        };
        let Some(id) = node.find(header_tag).and_then(|header| {
            header
                .children()
                .find(|c| matches!(c.tag(), "kUnqualifiedId" | "kQualifiedId"))
        }) else {
            return;
        };
        let (qualifier, name) = split_qualified(&id.text(self.source));
        if name.is_empty() {
            return;
        }
        self.declare(node, scope, kind, name, prototype, qualifier);
    }

    fn declare(
        &mut self,
        node: &Node,
        scope: Option<ScopeId>,
        kind: DeclKind,
        name: String,
        prototype: bool,
        qualifier: Option<String>,
    ) {
        let mut decl = Declaration::new(kind, name, self.line_of(node));
        if prototype {
            decl = decl.prototype();
        }
        if let Some(owner) = qualifier {
            decl = decl.with_qualifier(owner);
        }
        if let Some(scope) = scope {
            decl = decl.in_scope(scope);
        }
        self.tree.push_declaration(decl);
    }
}

/// The `Owner::new` id of an out-of-line constructor: a direct child of the
/// constructor or of its header, never an id inside ports or the body.
fn constructor_id(node: &Node) -> Option<&Node> {
    node.children().find_map(|child| match child.tag() {
        "kQualifiedId" => Some(child),
        "kFunctionHeader" | "kClassConstructorPrototype" => {
            child.children().find(|c| c.tag() == "kQualifiedId")
        }
        _ => None,
    })
}

/// Splits `a::b::name` into (`Some("b")`, `"name"`).
fn split_qualified(text: &str) -> (Option<String>, String) {
    let mut parts: Vec<&str> = text.split("::").map(str::trim).collect();
    let name = parts.pop().unwrap_or_default();
    let name = name
        .split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
        .next()
        .unwrap_or_default()
        .to_string();
    (parts.pop().map(str::to_string), name)
}
