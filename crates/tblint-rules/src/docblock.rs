//! Associates a comment block with a declaration and checks its topic line.
//!
//! The scan walks upward from the line above a declaration and stops at the
//! nearest of these boundaries:
//!
//! - the opening line of the enclosing scope;
//! - [`MAX_SCAN_LINES`] lines above the declaration;
//! - a scope terminator (`endclass`, `join_none`, `}`, `` `endif ``, ...);
//! - two consecutive blank lines;
//! - any other line of code.
//!
//! Preprocessor directives and `(* attribute *)` lines are skipped. The first
//! comment found is the candidate block: a run of `//` lines or a single
//! `/* ... */` block.

use crate::keywords::{self, KeywordClass};
use tblint_core::DeclKind;

/// Maximum number of lines scanned above a declaration.
pub const MAX_SCAN_LINES: usize = 50;

const TERMINATORS: &[&str] = &[
    "end",
    "endcase",
    "endchecker",
    "endclass",
    "endclocking",
    "endfunction",
    "endgenerate",
    "endgroup",
    "endinterface",
    "endmodule",
    "endpackage",
    "endprogram",
    "endproperty",
    "endsequence",
    "endtask",
    "join",
    "join_any",
    "join_none",
];

/// Why the upward scan stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStop {
    /// A comment block was found.
    Comment,
    /// Two or more consecutive blank lines.
    BlankGap,
    /// A line closing a scope.
    Terminator,
    /// A line of code.
    Code,
    /// [`MAX_SCAN_LINES`] exhausted.
    Window,
    /// Reached the opening line of the enclosing scope.
    ScopeStart,
    /// Reached line 1.
    StartOfFile,
}

/// A `Keyword: Title` line inside a comment block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    /// Keyword as written.
    pub keyword: String,
    /// Text after the colon, trimmed.
    pub title: String,
    /// Line of the topic (1-indexed).
    pub line: usize,
}

/// The comment block found above a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocBlock {
    /// First line of the block (1-indexed).
    pub first_line: usize,
    /// Last line of the block (1-indexed).
    pub last_line: usize,
    /// Header topic, if any line parses as one.
    pub topic: Option<Topic>,
}

/// A problem with a declaration's documentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocIssue {
    /// No block, or a block without a declaration topic.
    Missing,
    /// The topic keyword is not a NaturalDocs keyword.
    InvalidKeyword {
        /// Keyword as written.
        keyword: String,
    },
    /// The keyword exists but cannot document this kind of declaration.
    WrongKeyword {
        /// Keyword as written.
        keyword: String,
    },
    /// The topic title names a different identifier.
    NameMismatch {
        /// Identifier taken from the title.
        documented: String,
    },
}

/// Outcome of checking one declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    /// Block found above the declaration.
    pub block: Option<DocBlock>,
    /// Problems found; empty when documented correctly.
    pub issues: Vec<DocIssue>,
    /// Why the scan stopped.
    pub stop: ScanStop,
}

impl Assessment {
    /// A block was found and has no issues.
    #[must_use]
    pub fn is_documented(&self) -> bool {
        self.block.is_some() && self.issues.is_empty()
    }

    /// No usable documentation was found.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.issues.contains(&DocIssue::Missing)
    }
}

/// Assesses the documentation of the declaration `name` of `kind` at
/// `line`, scanning no higher than the line after `scope_start`.
#[must_use]
pub fn assess(
    lines: &[&str],
    kind: DeclKind,
    name: &str,
    line: usize,
    scope_start: Option<usize>,
) -> Assessment {
    let (block, stop) = find_block(lines, line, scope_start);
    let issues = match &block {
        Some(block) => topic_issues(kind, name, block.topic.as_ref()),
        None => vec![DocIssue::Missing],
    };
    Assessment {
        block,
        issues,
        stop,
    }
}

fn find_block(
    lines: &[&str],
    line: usize,
    scope_start: Option<usize>,
) -> (Option<DocBlock>, ScanStop) {
    let window_floor = line.saturating_sub(MAX_SCAN_LINES).max(1);
    let scope_floor = scope_start.map_or(1, |s| s + 1);
    let lower = window_floor.max(scope_floor);

    let mut blanks = 0;
    for n in (lower..line).rev() {
        let Some(text) = lines.get(n - 1) else {
            continue;
        };
        let trimmed = text.trim();

        if trimmed.is_empty() {
            blanks += 1;
            if blanks >= 2 {
                return (None, ScanStop::BlankGap);
            }
            continue;
        }
        if is_terminator(trimmed) {
            return (None, ScanStop::Terminator);
        }
        if trimmed.starts_with("//") {
            return (Some(line_comment_block(lines, n, lower)), ScanStop::Comment);
        }
        if trimmed.ends_with("*/") {
            return match star_comment_block(lines, n, lower) {
                Some(block) => (Some(block), ScanStop::Comment),
                None => (None, ScanStop::Code),
            };
        }
        if is_transparent(trimmed) {
            blanks = 0;
            continue;
        }
        return (None, ScanStop::Code);
    }

    let stop = if scope_start.is_some() && scope_floor >= window_floor {
        ScanStop::ScopeStart
    } else if window_floor > 1 {
        ScanStop::Window
    } else {
        ScanStop::StartOfFile
    };
    (None, stop)
}

fn is_terminator(trimmed: &str) -> bool {
    if trimmed.starts_with('}') {
        return true;
    }
    if let Some(rest) = trimmed.strip_prefix("`endif") {
        return !rest.starts_with(is_word_char);
    }
    let word_end = trimmed.find(|c: char| !is_word_char(c)).unwrap_or(trimmed.len());
    TERMINATORS.contains(&&trimmed[..word_end])
}

fn is_transparent(trimmed: &str) -> bool {
    trimmed.starts_with('`') || (trimmed.starts_with("(*") && trimmed.ends_with("*)"))
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn line_comment_block(lines: &[&str], last: usize, lower: usize) -> DocBlock {
    let mut first = last;
    while first > lower
        && lines
            .get(first - 2)
            .is_some_and(|l| l.trim().starts_with("//"))
    {
        first -= 1;
    }
    let content = (first..=last).filter_map(|n| {
        lines
            .get(n - 1)
            .map(|l| (n, l.trim().trim_start_matches('/').trim()))
    });
    DocBlock {
        first_line: first,
        last_line: last,
        topic: select_topic(content),
    }
}

/// Returns `None` when the `/*` opening the block follows code on its line.
fn star_comment_block(lines: &[&str], last: usize, lower: usize) -> Option<DocBlock> {
    let mut first = lower;
    for n in (lower..=last).rev() {
        let trimmed = lines.get(n - 1).map_or("", |l| l.trim());
        if let Some(pos) = trimmed.find("/*") {
            if !trimmed[..pos].trim().is_empty() {
                return None;
            }
            first = n;
            break;
        }
    }
    let content = (first..=last).filter_map(|n| lines.get(n - 1).map(|l| (n, strip_star(l))));
    Some(DocBlock {
        first_line: first,
        last_line: last,
        topic: select_topic(content),
    })
}

fn strip_star(line: &str) -> &str {
    let mut text = line.trim();
    if let Some(pos) = text.find("/*") {
        text = &text[pos + 2..];
    }
    if let Some(pos) = text.rfind("*/") {
        text = &text[..pos];
    }
    text.trim().trim_start_matches('*').trim()
}

/// Picks the header topic of a block: the first line whose keyword documents
/// some declaration kind, otherwise the first line with any text.
fn select_topic<'a>(content: impl Iterator<Item = (usize, &'a str)>) -> Option<Topic> {
    let mut fallback: Option<Option<Topic>> = None;
    for (line, text) in content {
        if !text.chars().any(char::is_alphanumeric) {
            continue;
        }
        let topic = parse_topic(text).map(|(keyword, title)| Topic {
            keyword: keyword.to_string(),
            title: title.to_string(),
            line,
        });
        if let Some(t) = &topic {
            if keywords::classify(&t.keyword) == KeywordClass::Declaration {
                return topic;
            }
        }
        if fallback.is_none() {
            fallback = Some(topic);
        }
    }
    fallback.flatten()
}

/// Splits `Keyword: Title`. A `::` after the word is a scope operator, not
/// a topic.
fn parse_topic(text: &str) -> Option<(&str, &str)> {
    let end = text.find(|c: char| !is_word_char(c)).unwrap_or(text.len());
    if end == 0 {
        return None;
    }
    let (keyword, rest) = text.split_at(end);
    let rest = rest.trim_start().strip_prefix(':')?;
    if rest.starts_with(':') {
        return None;
    }
    Some((keyword, rest.trim()))
}

/// Identifier named by a topic title: the first word, last `::` segment,
/// without parameter or port lists.
fn documented_name(title: &str) -> &str {
    let token = title.split_whitespace().next().unwrap_or("");
    let token = token.rsplit("::").next().unwrap_or(token);
    let end = token
        .find(|c: char| matches!(c, '#' | '(' | ';' | '[' | ','))
        .unwrap_or(token.len());
    &token[..end]
}

fn topic_issues(kind: DeclKind, name: &str, topic: Option<&Topic>) -> Vec<DocIssue> {
    let Some(topic) = topic else {
        return vec![DocIssue::Missing];
    };
    match keywords::classify(&topic.keyword) {
        KeywordClass::Structural => vec![DocIssue::Missing],
        KeywordClass::Unknown => vec![DocIssue::InvalidKeyword {
            keyword: topic.keyword.clone(),
        }],
        KeywordClass::Declaration => {
            let mut issues = Vec::new();
            if !keywords::accepts(kind, &topic.keyword) {
                issues.push(DocIssue::WrongKeyword {
                    keyword: topic.keyword.clone(),
                });
            }
            let documented = documented_name(&topic.title);
            if documented != name {
                issues.push(DocIssue::NameMismatch {
                    documented: documented.to_string(),
                });
            }
            issues
        }
    }
}
