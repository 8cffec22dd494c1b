//! # tblint-verible
//!
//! Adapters for the [Verible](https://github.com/chipsalliance/verible)
//! SystemVerilog tools:
//!
//! - [`VeribleSyntax`]: a [`SyntaxTreeProvider`](tblint_core::SyntaxTreeProvider)
//!   that runs `verible-verilog-syntax --export_json --printtree` and turns
//!   the exported tree into declarations and scopes.
//! - [`VeribleStyleLinter`]: a [`Linter`](tblint_core::Linter) that runs
//!   `verible-verilog-lint` and maps each diagnostic to a `[VB_...]`
//!   violation.
//!
//! Binaries are located by [`Discovery`]. A missing binary makes the owning
//! linter report itself unavailable instead of failing the run.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod discovery;
pub mod tree;

mod error;
mod style;
mod syntax;

pub use discovery::Discovery;
pub use error::VeribleError;
pub use style::{
    rule_id, Diagnostic, OutputParser, VeribleSettings, VeribleStyleLinter, DEFAULT_RULES_FILE,
    NAME, SYNTAX_ERROR,
};
pub use syntax::{SyntaxSettings, VeribleSyntax};
