//! Style lint through `verible-verilog-lint`.

use crate::discovery::{Discovery, LINT_TOOL};
use crate::error::VeribleError;
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;
use tblint_core::{
    AnalyzerConfig, AnalyzerResult, ConfigError, Finding, Linter, LinterUnavailable, RuleInfo,
    Severity, Violation,
};
use tracing::{debug, warn};

/// Registered name of the Verible style linter.
pub const NAME: &str = "verible";

/// Rule id for syntax errors reported by the lint tool.
pub const SYNTAX_ERROR: &str = "[VB_SYNTAX_ERROR]";

/// Rules file looked up next to the configuration when none is set.
pub const DEFAULT_RULES_FILE: &str = ".rules.verible_lint";

/// Settings of the `verible` linter.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VeribleSettings {
    /// Explicit path to `verible-verilog-lint`.
    pub executable: Option<PathBuf>,
    /// `--rules_config` file, relative to the configuration document.
    pub rules_file: Option<PathBuf>,
    /// Severity of style diagnostics without a per-rule override.
    pub default_severity: Severity,
}

impl Default for VeribleSettings {
    fn default() -> Self {
        Self {
            executable: None,
            rules_file: None,
            default_severity: Severity::Warning,
        }
    }
}

/// One parsed diagnostic line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// `[VB_...]` rule id.
    pub rule_id: String,
    /// Location and message.
    pub finding: Finding,
}

/// Parses `verible-verilog-lint` output.
#[derive(Debug, Clone)]
pub struct OutputParser {
    style: Regex,
    syntax: Regex,
}

impl OutputParser {
    /// Compiles the line patterns.
    ///
    /// # Errors
    ///
    /// Returns the regex error if a pattern fails to compile.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            style: Regex::new(
                r"^([^:]+):(\d+):(\d+)(?:-\d+)?:\s*(.+?)\s*\[([^\]]+)\]\s*\[([^\]]+)\]",
            )?,
            syntax: Regex::new(r"^([^:]+):(\d+):(\d+)(?:-\d+)?:\s*(syntax error.*?)\s*$")?,
        })
    }

    /// Parses every recognized line of `output`. Other lines are ignored.
    #[must_use]
    pub fn parse(&self, output: &str) -> Vec<Diagnostic> {
        output
            .lines()
            .filter(|l| !l.trim().is_empty())
            .filter_map(|l| self.parse_line(l))
            .collect()
    }

    fn parse_line(&self, line: &str) -> Option<Diagnostic> {
        if let Some(caps) = self.syntax.captures(line) {
            let finding = Finding::new(caps[2].parse().ok()?, caps[4].to_string())
                .with_column(caps[3].parse().ok()?);
            return Some(Diagnostic {
                rule_id: SYNTAX_ERROR.to_string(),
                finding,
            });
        }
        let caps = self.style.captures(line)?;
        let finding = Finding::new(caps[2].parse().ok()?, caps[4].trim().to_string())
            .with_column(caps[3].parse().ok()?)
            .with_context(caps[5].trim().to_string());
        Some(Diagnostic {
            rule_id: rule_id(caps[6].trim()),
            finding,
        })
    }
}

/// `no-trailing-spaces` → `[VB_NO_TRAILING_SPACES]`.
#[must_use]
pub fn rule_id(rule_name: &str) -> String {
    format!("[VB_{}]", rule_name.replace('-', "_").to_uppercase())
}

/// Runs `verible-verilog-lint` per file and reports its diagnostics.
///
/// Verible's own rule set is open-ended, so rules are configured by their
/// `[VB_...]` ids without being registered up front.
#[derive(Debug)]
pub struct VeribleStyleLinter {
    config: AnalyzerConfig,
    settings: VeribleSettings,
    executable: Option<PathBuf>,
    searched: String,
    rules_file: Option<PathBuf>,
    parser: OutputParser,
}

impl VeribleStyleLinter {
    /// Builds the linter from its configuration and the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSettings`] if the settings do not have
    /// the expected shape.
    pub fn new(config: &AnalyzerConfig) -> Result<Self, ConfigError> {
        Self::with_discovery(config, &Discovery::from_env())
    }

    /// Like [`new`](Self::new) with an explicit environment snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSettings`] if the settings do not have
    /// the expected shape.
    pub fn with_discovery(
        config: &AnalyzerConfig,
        discovery: &Discovery,
    ) -> Result<Self, ConfigError> {
        let settings: VeribleSettings = config.settings_as(NAME)?;
        let parser = OutputParser::new().map_err(|e| invalid(&VeribleError::Pattern(e)))?;
        let explicit = settings.executable.as_deref();
        let executable = discovery.find(LINT_TOOL, explicit);
        let searched = discovery.describe_search(LINT_TOOL, explicit);
        let rules_file = rules_file(config, &settings);
        debug!(
            "{}: executable {:?}, rules file {:?}",
            NAME, executable, rules_file
        );
        Ok(Self {
            config: config.clone(),
            settings,
            executable,
            searched,
            rules_file,
            parser,
        })
    }

    fn severity_for(&self, rule_id: &str) -> Severity {
        let default = if rule_id == SYNTAX_ERROR {
            Severity::Error
        } else {
            self.settings.default_severity
        };
        self.config.rule(rule_id).effective_severity(default)
    }

    /// Turns raw tool output for `path` into a result.
    #[must_use]
    pub fn result_from_output(&self, path: &Path, output: &str) -> AnalyzerResult {
        let mut result = AnalyzerResult::new(NAME);
        for diagnostic in self.parser.parse(output) {
            if !self.config.is_rule_enabled(&diagnostic.rule_id) {
                debug!("{}: {} disabled", NAME, diagnostic.rule_id);
                continue;
            }
            let severity = self.severity_for(&diagnostic.rule_id);
            result.violations.push(Violation::stamp(
                &diagnostic.rule_id,
                severity,
                path,
                diagnostic.finding,
            ));
        }
        result.files_checked = 1;
        result
    }

    fn run(&self, exe: &Path, path: &Path) -> Result<String, VeribleError> {
        let mut command = Command::new(exe);
        if let Some(rules) = &self.rules_file {
            command.arg(format!("--rules_config={}", rules.display()));
        }
        let output = command
            .arg(path)
            .output()
            .map_err(|source| VeribleError::Spawn {
                tool: exe.to_path_buf(),
                source,
            })?;
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push('\n');
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(text)
    }
}

fn invalid(err: &VeribleError) -> ConfigError {
    ConfigError::InvalidSettings {
        linter: NAME.to_string(),
        message: err.to_string(),
    }
}

/// Configured rules file, or the default file next to the configuration
/// document. A configured file that does not exist is
/// ignored.
fn rules_file(config: &AnalyzerConfig, settings: &VeribleSettings) -> Option<PathBuf> {
    let base = config
        .source
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_default();
    if let Some(file) = &settings.rules_file {
        let path = base.join(file);
        if path.is_file() {
            return Some(path);
        }
        warn!("{}: rules file {} not found, ignoring", NAME, path.display());
        return None;
    }
    let default = base.join(DEFAULT_RULES_FILE);
    default.is_file().then_some(default)
}

impl Linter for VeribleStyleLinter {
    fn name(&self) -> &str {
        NAME
    }

    fn supported_extensions(&self) -> &[&str] {
        &["sv", "svh", "v", "vh"]
    }

    fn check_availability(&self) -> Result<(), LinterUnavailable> {
        match &self.executable {
            Some(_) => Ok(()),
            None => Err(LinterUnavailable::new(LINT_TOOL, self.searched.clone())),
        }
    }

    fn rules(&self) -> Vec<RuleInfo> {
        let mut infos = vec![RuleInfo {
            id: SYNTAX_ERROR,
            description: "Syntax errors reported by verible-verilog-lint",
            default_severity: Severity::Error,
            severity: self.severity_for(SYNTAX_ERROR),
            enabled: self.config.is_rule_enabled(SYNTAX_ERROR),
        }];
        infos.push(RuleInfo {
            id: "[VB_*]",
            description: "Style diagnostics, configured by their [VB_...] ids",
            default_severity: self.settings.default_severity,
            severity: self.settings.default_severity,
            enabled: true,
        });
        infos
    }

    fn lint_file(&self, path: &Path) -> AnalyzerResult {
        let Some(exe) = &self.executable else {
            let mut result = AnalyzerResult::new(NAME);
            result.record_file_failure(path, self.searched.clone());
            return result;
        };
        if !path.is_file() {
            let mut result = AnalyzerResult::new(NAME);
            result.record_file_failure(path, "file not found");
            return result;
        }
        match self.run(exe, path) {
            Ok(output) => self.result_from_output(path, &output),
            Err(e) => {
                warn!("{}: {}", NAME, e);
                let mut result = AnalyzerResult::new(NAME);
                result.record_file_failure(path, e.to_string());
                result
            }
        }
    }
}
