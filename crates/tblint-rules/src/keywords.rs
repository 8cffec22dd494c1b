//! NaturalDocs topic keywords and which declaration kinds they may document.

use tblint_core::DeclKind;

/// Keywords that open a topic but never document a declaration.
pub const STRUCTURAL: &[&str] = &[
    "file",
    "section",
    "title",
    "group",
    "topic",
    "company",
    "author",
    "description",
    "about",
    "macro",
    "interface",
    "module",
    "covergroup",
];

/// Keywords accepted on a declaration of `kind`, lower-case.
#[must_use]
pub fn accepted_keywords(kind: DeclKind) -> &'static [&'static str] {
    match kind {
        DeclKind::Package => &["package"],
        DeclKind::Class => &["class"],
        DeclKind::Function => &[
            "function",
            "func",
            "method",
            "procedure",
            "proc",
            "constructor",
        ],
        DeclKind::Task => &["task", "function", "func", "method", "procedure", "proc"],
        DeclKind::Constraint => &["constraint", "define", "variable"],
        DeclKind::Typedef => &[
            "typedef",
            "type",
            "enum",
            "enumeration",
            "struct",
            "union",
            "variable",
        ],
        DeclKind::Variable => &["variable", "var", "property", "field"],
        DeclKind::Parameter => &[
            "parameter",
            "param",
            "constant",
            "const",
            "property",
            "localparam",
        ],
    }
}

/// Canonical keyword for `kind`, also used as its display name.
#[must_use]
pub fn primary_keyword(kind: DeclKind) -> &'static str {
    match kind {
        DeclKind::Package => "Package",
        DeclKind::Class => "Class",
        DeclKind::Function => "Function",
        DeclKind::Task => "Task",
        DeclKind::Constraint => "Constraint",
        DeclKind::Typedef => "Typedef",
        DeclKind::Variable => "Variable",
        DeclKind::Parameter => "Parameter",
    }
}

/// How a topic keyword relates to the keyword table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordClass {
    /// Documents at least one declaration kind.
    Declaration,
    /// Known, but attached to no declaration kind.
    Structural,
    /// Not a NaturalDocs keyword.
    Unknown,
}

/// Classifies a keyword, ignoring case.
#[must_use]
pub fn classify(keyword: &str) -> KeywordClass {
    let lower = keyword.to_ascii_lowercase();
    if DeclKind::ALL
        .iter()
        .any(|&k| accepted_keywords(k).contains(&lower.as_str()))
    {
        KeywordClass::Declaration
    } else if STRUCTURAL.contains(&lower.as_str()) {
        KeywordClass::Structural
    } else {
        KeywordClass::Unknown
    }
}

/// Returns true if `keyword` may document a declaration of `kind`.
#[must_use]
pub fn accepts(kind: DeclKind, keyword: &str) -> bool {
    let lower = keyword.to_ascii_lowercase();
    accepted_keywords(kind).contains(&lower.as_str())
}
