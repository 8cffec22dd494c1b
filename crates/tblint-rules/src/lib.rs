//! # tblint-rules
//!
//! NaturalDocs documentation rules for SystemVerilog.
//!
//! Declarations come from a [`SyntaxTreeProvider`](tblint_core::SyntaxTreeProvider);
//! this crate finds the comment block above each one and checks that it opens
//! with a topic whose keyword fits the declaration and whose title names it.
//!
//! ## Available Rules
//!
//! | Id | Default | Description |
//! |----|---------|-------------|
//! | `[ND_FILE_HDR_MISS]` | ERROR | `File:` topic in the file header |
//! | `[ND_COMPANY_MISS]` | WARNING | `Company:` field matching the configured pattern |
//! | `[ND_AUTHOR_MISS]` | WARNING | `Author:` field with the configured email domain |
//! | `[ND_GUARD_MISS]` | ERROR | `` `ifndef ``/`` `define ``/`` `endif `` include guard |
//! | `[ND_GUARD_FMT]` | ERROR | Comment after the closing `` `endif `` |
//! | `[ND_PKG_MISS]` .. `[ND_PARAM_MISS]` | varies | Per-kind documentation, see [`MissingDocs`] |
//! | `[ND_KW_INVALID]` | ERROR | Topic keyword is not a NaturalDocs keyword |
//! | `[ND_KW_TYPE]` | ERROR | Topic keyword does not fit the declaration kind |
//! | `[ND_NAME_MISMATCH]` | ERROR | Topic title names another identifier |
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use tblint_rules::NaturalDocsLinter;
//!
//! let linter = NaturalDocsLinter::new(&config.linter("naturaldocs"), Arc::new(provider))?;
//! let result = linter.lint_file(Path::new("rtl/fifo_pkg.sv"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod docblock;
pub mod keywords;

mod context;
mod declaration_docs;
mod file_header;
mod include_guards;
mod keyword_checks;
mod linter;
mod prototypes;
mod settings;

pub use context::DocsContext;
pub use declaration_docs::MissingDocs;
pub use file_header::{AuthorField, CompanyField, FileHeader};
pub use include_guards::{guard_name, GuardFormat, IncludeGuards};
pub use keyword_checks::{InvalidKeyword, NameMismatch, WrongKeyword};
pub use linter::{NaturalDocsLinter, NAME};
pub use prototypes::covered_implementations;
pub use settings::{FileHeaderSettings, IncludeGuardSettings, NaturalDocsSettings};
