//! # tblint-core
//!
//! Core framework for documentation-conformance linting of SystemVerilog
//! sources.
//!
//! This crate provides the foundational traits and types shared by every
//! linter. It includes:
//!
//! - [`Rule`] trait for a single, independently configurable check
//! - [`Linter`] trait and [`RuleSet`] for bundling rules per file type
//! - [`EffectiveConfig`] for hierarchical configuration resolution
//! - [`Registry`] and [`Orchestrator`] for running linters over many files
//! - [`SyntaxTreeProvider`] for plugging in an external parser
//!
//! ## Example
//!
//! ```ignore
//! use tblint_core::{EffectiveConfig, Orchestrator, Registry};
//!
//! let mut registry = Registry::new();
//! registry.register("mylinter", "My checks", |cfg| Ok(Box::new(MyLinter::new(cfg)?)))?;
//!
//! let config = EffectiveConfig::resolve_or_default(None)?;
//! let report = Orchestrator::new(registry, config).run_all(&[], &files)?;
//! std::process::exit(report.exit_code(false));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod context;
mod linter;
mod orchestrator;
mod registry;
mod rule;
mod syntax;
mod types;

pub use config::{
    AnalyzerConfig, ConfigError, EffectiveConfig, GlobalSettings, ProjectInfo, RuleConfig,
};
pub use context::FileContext;
pub use linter::{lint_with_context, Linter, LinterBox, LinterUnavailable, RuleSet};
pub use orchestrator::{Orchestrator, OrchestratorError, RunReport};
pub use registry::{LinterFactory, Registry, RegistryError};
pub use rule::{Rule, RuleBox, RuleError, RuleInfo};
pub use syntax::{
    DeclKind, Declaration, ParseFailure, Scope, ScopeId, ScopeKind, SyntaxTree,
    SyntaxTreeProvider,
};
pub use types::{AnalyzerResult, Finding, RuleFailure, Severity, Violation};
