//! Verible adapter errors.

use std::path::PathBuf;
use tblint_core::ParseFailure;

/// Failures running a Verible tool or reading its output.
#[derive(Debug, thiserror::Error)]
pub enum VeribleError {
    /// The tool could not be started.
    #[error("failed to run {}: {source}", .tool.display())]
    Spawn {
        /// Binary that was run.
        tool: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The tool's output could not be decoded.
    #[error("unexpected output from {tool}: {message}")]
    Output {
        /// Tool name.
        tool: String,
        /// Decoder message.
        message: String,
    },

    /// The file has syntax errors. Line and column are 1-based.
    #[error("syntax error at {line}:{column} near '{phrase}'")]
    Syntax {
        /// Line of the first error.
        line: usize,
        /// Column of the first error.
        column: usize,
        /// Offending token.
        phrase: String,
    },

    /// An output pattern failed to compile.
    #[error(transparent)]
    Pattern(#[from] regex::Error),
}

impl From<VeribleError> for ParseFailure {
    fn from(err: VeribleError) -> Self {
        ParseFailure::new(err.to_string())
    }
}
