//! Context types for rule execution.

use std::path::Path;

/// Context provided to per-file rules.
///
/// Holds the file path and its raw text, split into lines once.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    path: &'a Path,
    content: &'a str,
    lines: Vec<&'a str>,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str) -> Self {
        Self {
            path,
            content,
            lines: content.lines().collect(),
        }
    }

    /// Path of the file being checked.
    #[must_use]
    pub fn path(&self) -> &'a Path {
        self.path
    }

    /// Raw file text.
    #[must_use]
    pub fn content(&self) -> &'a str {
        self.content
    }

    /// File text split into lines, without line terminators.
    #[must_use]
    pub fn lines(&self) -> &[&'a str] {
        &self.lines
    }

    /// Returns the text of a 1-indexed line.
    #[must_use]
    pub fn line(&self, number: usize) -> Option<&'a str> {
        number
            .checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .copied()
    }

    /// Number of lines in the file.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// File name without directories, if representable as UTF-8.
    #[must_use]
    pub fn file_name(&self) -> Option<&'a str> {
        self.path.file_name().and_then(|n| n.to_str())
    }
}
