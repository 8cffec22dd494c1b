//! Configuration types and hierarchical resolution.
//!
//! A root document (TOML, or JSON when the file ends in `.json`) names the
//! linters to run. Each linter entry may link a separate document through
//! `config_file`; the linked document is loaded relative to the root
//! document's directory and the root entry is layered on top of it:
//!
//! ```toml
//! [global]
//! strict_mode = false
//!
//! [linters.naturaldocs]
//! enabled = true
//! config_file = "configs/naturaldocs.toml"
//!
//! [linters.naturaldocs.rules."[ND_VAR_MISS]"]
//! enabled = false
//! ```
//!
//! Root fields replace linked fields. The `rules` tables merge per rule
//! identifier, and field by field within one identifier.

use crate::types::Severity;
use miette::Diagnostic;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

const RULES_KEY: &str = "rules";
const LINK_KEY: &str = "config_file";
const LEGACY_SEVERITY_KEY: &str = "severity_levels";
const LEGACY_TOGGLE_KEY: &str = "linter_rules";

/// Per-rule configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Severity override for this rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            severity: None,
        }
    }
}

impl RuleConfig {
    /// Severity to stamp on findings, given the rule's default.
    #[must_use]
    pub fn effective_severity(&self, default: Severity) -> Severity {
        self.severity.unwrap_or(default)
    }
}

/// Effective configuration for one linter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Whether the linter runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Per-rule configurations keyed by bracketed rule identifier.
    #[serde(default)]
    pub rules: BTreeMap<String, RuleConfig>,

    /// Document that defined this configuration: the linked document if
    /// any, otherwise the root document. Relative paths in settings are
    /// resolved against its directory.
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,

    /// Linter-specific settings. Each linter reads these through
    /// [`AnalyzerConfig::settings_as`] into its own typed struct.
    #[serde(flatten)]
    pub settings: BTreeMap<String, Value>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rules: BTreeMap::new(),
            source: None,
            settings: BTreeMap::new(),
        }
    }
}

impl AnalyzerConfig {
    /// Returns the configuration for a rule. An absent entry means
    /// "enabled with the rule's default severity".
    #[must_use]
    pub fn rule(&self, rule_id: &str) -> RuleConfig {
        self.rules.get(rule_id).copied().unwrap_or_default()
    }

    /// Checks if a rule is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        self.rule(rule_id).enabled
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, rule_id: &str) -> Option<Severity> {
        self.rule(rule_id).severity
    }

    /// Gets a raw setting value.
    #[must_use]
    pub fn setting(&self, key: &str) -> Option<&Value> {
        self.settings.get(key)
    }

    /// Deserializes the free-form settings into a typed struct.
    ///
    /// Unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSettings`] if a known key has the wrong
    /// shape.
    pub fn settings_as<T: DeserializeOwned>(&self, linter: &str) -> Result<T, ConfigError> {
        let object: Map<String, Value> = self
            .settings
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        serde_json::from_value(Value::Object(object)).map_err(|e| ConfigError::InvalidSettings {
            linter: linter.to_string(),
            message: e.to_string(),
        })
    }
}

/// Free-text project information shown in reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectInfo {
    /// Project name.
    pub name: String,
    /// Company name.
    pub company: String,
    /// Short description.
    pub description: String,
}

/// Settings that apply to the whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalSettings {
    /// Treat warnings as failures.
    pub strict_mode: bool,
    /// Colorize text output.
    pub use_color: bool,
    /// Worker thread count (default: available parallelism).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RootDocument {
    project: ProjectInfo,
    global: GlobalSettings,
    linters: BTreeMap<String, Value>,
}

/// Fully merged configuration for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EffectiveConfig {
    /// Project information.
    pub project: ProjectInfo,
    /// Run-wide settings.
    pub global: GlobalSettings,
    /// Effective configuration per linter name.
    pub linters: BTreeMap<String, AnalyzerConfig>,
    /// Root document this configuration was loaded from.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl EffectiveConfig {
    /// Built-in defaults: every linter enabled, no rule overrides.
    #[must_use]
    pub fn defaults() -> Self {
        Self::default()
    }

    /// Loads and merges the root document at `root` and every document it
    /// links.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if the root or a linked document
    /// does not exist, and [`ConfigError::Malformed`] if a document cannot
    /// be decoded into the expected shape.
    pub fn resolve(root: &Path) -> Result<Self, ConfigError> {
        let document = load_document(root)?;
        let base_dir = root.parent().unwrap_or_else(|| Path::new(""));

        let parsed: RootDocument =
            serde_json::from_value(Value::Object(document)).map_err(|e| malformed(root, e))?;

        let mut linters = BTreeMap::new();
        for (name, entry) in parsed.linters {
            let Value::Object(mut inline) = entry else {
                return Err(ConfigError::Malformed {
                    path: root.to_path_buf(),
                    message: format!("linters.{name}: expected a table"),
                });
            };

            let link = match inline.remove(LINK_KEY) {
                None => None,
                Some(Value::String(link)) => Some(base_dir.join(link)),
                Some(_) => {
                    return Err(ConfigError::Malformed {
                        path: root.to_path_buf(),
                        message: format!("linters.{name}.{LINK_KEY}: expected a path string"),
                    })
                }
            };
            fold_legacy_rules(&mut inline, root)?;

            let merged = match &link {
                Some(link_path) => {
                    debug!("Loading linked config for {}: {}", name, link_path.display());
                    let mut linked = load_document(link_path)?;
                    linked.remove(LINK_KEY);
                    fold_legacy_rules(&mut linked, link_path)?;
                    merge_entries(linked, inline)
                }
                None => inline,
            };

            let mut config: AnalyzerConfig = serde_json::from_value(Value::Object(merged))
                .map_err(|e| ConfigError::Malformed {
                    path: link.clone().unwrap_or_else(|| root.to_path_buf()),
                    message: format!("linters.{name}: {e}"),
                })?;
            config.source = Some(link.unwrap_or_else(|| root.to_path_buf()));
            linters.insert(name, config);
        }

        Ok(Self {
            project: parsed.project,
            global: parsed.global,
            linters,
            source: Some(root.to_path_buf()),
        })
    }

    /// Resolves `root` if given, otherwise returns [`EffectiveConfig::defaults`].
    ///
    /// A missing root is never silently replaced by defaults: passing a
    /// path that does not exist is an error.
    ///
    /// # Errors
    ///
    /// See [`EffectiveConfig::resolve`].
    pub fn resolve_or_default(root: Option<&Path>) -> Result<Self, ConfigError> {
        match root {
            Some(path) => Self::resolve(path),
            None => {
                debug!("No configuration file, using built-in defaults");
                Ok(Self::defaults())
            }
        }
    }

    /// Effective configuration for a linter; defaults when not configured.
    #[must_use]
    pub fn linter(&self, name: &str) -> AnalyzerConfig {
        self.linters.get(name).cloned().unwrap_or_default()
    }

    /// Checks if a linter is enabled (default: true).
    #[must_use]
    pub fn is_linter_enabled(&self, name: &str) -> bool {
        self.linters.get(name).map_or(true, |c| c.enabled)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum ConfigError {
    /// Root or linked document does not exist.
    #[error("configuration file not found: {}", .path.display())]
    #[diagnostic(
        code(tblint::config::not_found),
        help("check the path, or run `tblint init` to create a configuration")
    )]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// IO error reading a document.
    #[error("failed to read configuration {}: {source}", .path.display())]
    #[diagnostic(code(tblint::config::io))]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Document cannot be decoded into the expected shape.
    #[error("malformed configuration {}: {message}", .path.display())]
    #[diagnostic(code(tblint::config::malformed))]
    Malformed {
        /// Offending document.
        path: PathBuf,
        /// Decoder message.
        message: String,
    },

    /// Linter-specific settings have the wrong shape.
    #[error("invalid settings for linter '{linter}': {message}")]
    #[diagnostic(code(tblint::config::settings))]
    InvalidSettings {
        /// Linter whose settings failed to decode.
        linter: String,
        /// Decoder message.
        message: String,
    },
}

fn default_true() -> bool {
    true
}

fn malformed(path: &Path, error: impl std::fmt::Display) -> ConfigError {
    ConfigError::Malformed {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

fn load_document(path: &Path) -> Result<Map<String, Value>, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let value: Value = if is_json(path) {
        serde_json::from_str(&content).map_err(|e| malformed(path, e))?
    } else {
        toml::from_str(&content).map_err(|e| malformed(path, e))?
    };

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(malformed(path, "expected a table at the document root")),
    }
}

/// Folds `severity_levels = { ID = "WARNING" }` and
/// `linter_rules = { ID = false }` into `rules`. Explicit `rules` fields win.
fn fold_legacy_rules(entry: &mut Map<String, Value>, path: &Path) -> Result<(), ConfigError> {
    let severities = entry.remove(LEGACY_SEVERITY_KEY);
    let toggles = entry.remove(LEGACY_TOGGLE_KEY);
    if severities.is_none() && toggles.is_none() {
        return Ok(());
    }

    let rules = entry
        .entry(RULES_KEY)
        .or_insert_with(|| Value::Object(Map::new()));
    let Value::Object(rules) = rules else {
        return Err(malformed(path, "`rules` must be a table"));
    };

    for (legacy, field) in [(severities, "severity"), (toggles, "enabled")] {
        let Some(legacy) = legacy else { continue };
        let Value::Object(legacy) = legacy else {
            return Err(malformed(path, format!("legacy `{field}` map must be a table")));
        };
        for (rule_id, value) in legacy {
            if let Value::Object(rule) = rules
                .entry(rule_id)
                .or_insert_with(|| Value::Object(Map::new()))
            {
                rule.entry(field).or_insert(value);
            }
        }
    }
    Ok(())
}

/// Layers `inline` over `linked`.
fn merge_entries(mut linked: Map<String, Value>, inline: Map<String, Value>) -> Map<String, Value> {
    for (key, value) in inline {
        let merged = match (key.as_str(), linked.remove(&key), value) {
            (RULES_KEY, Some(Value::Object(base)), Value::Object(overlay)) => {
                Value::Object(merge_rule_maps(base, overlay))
            }
            (_, _, value) => value,
        };
        linked.insert(key, merged);
    }
    linked
}

fn merge_rule_maps(mut base: Map<String, Value>, overlay: Map<String, Value>) -> Map<String, Value> {
    for (rule_id, value) in overlay {
        let merged = match (base.remove(&rule_id), value) {
            (Some(Value::Object(mut fields)), Value::Object(over)) => {
                fields.extend(over);
                Value::Object(fields)
            }
            (_, value) => value,
        };
        base.insert(rule_id, merged);
    }
    base
}
