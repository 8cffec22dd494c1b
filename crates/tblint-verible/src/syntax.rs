//! Syntax trees from `verible-verilog-syntax`.

use crate::discovery::{Discovery, SYNTAX_TOOL};
use crate::error::VeribleError;
use crate::tree::{ExportOutput, NamePatterns, TreeWalker};
use serde::Deserialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::process::Command;
use tblint_core::{
    AnalyzerConfig, ConfigError, LinterUnavailable, ParseFailure, SyntaxTree, SyntaxTreeProvider,
};
use tracing::debug;

/// Settings read from the configuration of the linter that owns the
/// provider.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SyntaxSettings {
    /// Explicit path to `verible-verilog-syntax`.
    pub verible_syntax: Option<PathBuf>,
}

/// [`SyntaxTreeProvider`] backed by `verible-verilog-syntax --export_json`.
#[derive(Debug)]
pub struct VeribleSyntax {
    executable: Option<PathBuf>,
    searched: String,
    patterns: NamePatterns,
}

impl VeribleSyntax {
    /// Locates the binary with `discovery`, honoring an explicit path.
    ///
    /// # Errors
    ///
    /// Returns [`VeribleError::Pattern`] if the name patterns fail to compile.
    pub fn new(discovery: &Discovery, explicit: Option<&Path>) -> Result<Self, VeribleError> {
        Ok(Self {
            executable: discovery.find(SYNTAX_TOOL, explicit),
            searched: discovery.describe_search(SYNTAX_TOOL, explicit),
            patterns: NamePatterns::new()?,
        })
    }

    /// Builds the provider from `linter`'s settings and the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSettings`] if the settings do not have
    /// the expected shape.
    pub fn from_config(linter: &str, config: &AnalyzerConfig) -> Result<Self, ConfigError> {
        let settings: SyntaxSettings = config.settings_as(linter)?;
        Self::new(&Discovery::from_env(), settings.verible_syntax.as_deref()).map_err(|e| {
            ConfigError::InvalidSettings {
                linter: linter.to_string(),
                message: e.to_string(),
            }
        })
    }

    /// Resolved binary, if any.
    #[must_use]
    pub fn executable(&self) -> Option<&Path> {
        self.executable.as_deref()
    }

    /// Converts exporter output for a single file into a tree. `source` is
    /// the raw file content the export's byte offsets refer to.
    ///
    /// # Errors
    ///
    /// Returns [`VeribleError::Output`] for undecodable output and
    /// [`VeribleError::Syntax`] when the file did not parse.
    pub fn tree_from_export(&self, json: &str, source: &[u8]) -> Result<SyntaxTree, VeribleError> {
        let output = decode_export(json).map_err(|e| VeribleError::Output {
            tool: SYNTAX_TOOL.to_string(),
            message: e.to_string(),
        })?;
        let Some(export) = output.into_values().next() else {
            return Err(VeribleError::Output {
                tool: SYNTAX_TOOL.to_string(),
                message: "no file in export".to_string(),
            });
        };
        if let Some(first) = export.errors.first() {
            return Err(VeribleError::Syntax {
                line: first.line + 1,
                column: first.column + 1,
                phrase: first.phrase.clone(),
            });
        }
        let root = export.tree.ok_or_else(|| VeribleError::Output {
            tool: SYNTAX_TOOL.to_string(),
            message: "export has no tree".to_string(),
        })?;
        Ok(TreeWalker::new(source, &self.patterns).walk(&root))
    }
}

impl SyntaxTreeProvider for VeribleSyntax {
    fn name(&self) -> &str {
        SYNTAX_TOOL
    }

    fn check_availability(&self) -> Result<(), LinterUnavailable> {
        match &self.executable {
            Some(_) => Ok(()),
            None => Err(LinterUnavailable::new(SYNTAX_TOOL, self.searched.clone())),
        }
    }

    fn parse(&self, path: &Path, text: &str) -> Result<SyntaxTree, ParseFailure> {
        let Some(exe) = &self.executable else {
            return Err(ParseFailure::new(self.searched.clone()));
        };
        debug!("{} --export_json --printtree {}", exe.display(), path.display());

        // Exits non-zero on syntax errors but still prints the export.
        let output = Command::new(exe)
            .args(["--export_json", "--printtree"])
            .arg(path)
            .output()
            .map_err(|source| VeribleError::Spawn {
                tool: exe.clone(),
                source,
            })?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VeribleError::Output {
                tool: SYNTAX_TOOL.to_string(),
                message: format!("no output ({})", stderr.trim()),
            }
            .into());
        }
        let raw = match std::fs::read(path) {
            Ok(raw) => Cow::Owned(raw),
            Err(e) => {
                debug!("re-reading {} failed ({}), using decoded text", path.display(), e);
                Cow::Borrowed(text.as_bytes())
            }
        };
        Ok(self.tree_from_export(&stdout, &raw)?)
    }
}

/// Decodes the export without serde_json's nesting limit; deep `else if`
/// chains and expressions nest well past it.
fn decode_export(json: &str) -> serde_json::Result<ExportOutput> {
    let mut de = serde_json::Deserializer::from_str(json);
    de.disable_recursion_limit();
    let output = ExportOutput::deserialize(&mut de)?;
    de.end()?;
    Ok(output)
}
