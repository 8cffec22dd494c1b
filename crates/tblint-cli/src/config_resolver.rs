//! Configuration file resolution with global fallback.
//!
//! Resolves the configuration file path using a deterministic priority order:
//!
//! 1. `--config` flag (explicit path)
//! 2. `tblint.toml`, `.tblint.toml` or `tblint.json` in the working directory
//! 3. `~/.tblint/config.toml` (global fallback)
//! 4. No config found → defaults

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tblint_core::EffectiveConfig;

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly specified via `--config` flag.
    Explicit(PathBuf),
    /// Found in the project directory.
    Project(PathBuf),
    /// Loaded from the global config directory (`~/.tblint/`).
    Global(PathBuf),
    /// No config found; defaults will be used.
    Default,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Returns `true` if the config was loaded from the global directory.
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global(_))
    }

    /// Human-readable description for report headers.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Default => "built-in defaults".to_string(),
            other => other
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        }
    }

    /// Loads the effective configuration.
    ///
    /// Configuration errors are rendered as diagnostics on stderr and turned
    /// into exit status 2.
    pub fn load(&self) -> Result<EffectiveConfig, ExitCode> {
        if self.is_global() {
            if let Some(p) = self.path() {
                tracing::info!("Using global config: {}", p.display());
            }
        }
        EffectiveConfig::resolve_or_default(self.path()).map_err(|e| {
            eprintln!("{:?}", miette::Report::new(e));
            ExitCode::from(2)
        })
    }
}

/// Project-level config file names, checked in order.
const PROJECT_CONFIG_NAMES: &[&str] = &["tblint.toml", ".tblint.toml", "tblint.json"];

/// Config file name within the global config directory.
const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Resolves the configuration file path.
///
/// See module-level docs for resolution order.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_inner(project_dir, explicit, global_config_dir())
}

/// Testable core: accepts `global_dir` as parameter to avoid env var races.
fn resolve_inner(
    project_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<PathBuf>,
) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    let mut found = project_configs(project_dir).into_iter();
    if let Some(config) = found.next() {
        for shadowed in found {
            tracing::warn!(
                "Ignoring {} (shadowed by {})",
                shadowed.display(),
                config.display()
            );
        }
        tracing::debug!("Found project config: {}", config.display());
        return ConfigSource::Project(config);
    }

    if let Some(dir) = global_dir {
        let candidate = dir.join(GLOBAL_CONFIG_NAME);
        if candidate.exists() {
            tracing::debug!("Found global config: {}", candidate.display());
            return ConfigSource::Global(candidate);
        }
    }

    ConfigSource::Default
}

/// Project config files present in `project_dir`, in priority order.
fn project_configs(project_dir: &Path) -> Vec<PathBuf> {
    PROJECT_CONFIG_NAMES
        .iter()
        .map(|name| project_dir.join(name))
        .filter(|p| p.is_file())
        .collect()
}

/// Returns the global config directory path.
///
/// Resolution: `$TBLINT_CONFIG_DIR` > `~/.tblint/`
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("TBLINT_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".tblint"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn explicit_takes_priority_over_project() {
        let tmp = TempDir::new().unwrap();
        let explicit = tmp.path().join("custom.toml");
        fs::write(&explicit, "").unwrap();

        let project = tmp.path().join("project");
        fs::create_dir(&project).unwrap();
        fs::write(project.join("tblint.toml"), "").unwrap();

        let result = resolve_inner(&project, Some(&explicit), None);
        assert_eq!(result, ConfigSource::Explicit(explicit));
    }

    #[test]
    fn explicit_does_not_check_existence() {
        let result = resolve_inner(
            Path::new("/tmp"),
            Some(Path::new("/nonexistent.toml")),
            None,
        );
        assert_eq!(
            result,
            ConfigSource::Explicit(PathBuf::from("/nonexistent.toml"))
        );
    }

    #[test]
    fn project_names_in_priority_order() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("tblint.json"), "{}").unwrap();
        assert_eq!(
            resolve_inner(tmp.path(), None, None),
            ConfigSource::Project(tmp.path().join("tblint.json"))
        );

        fs::write(tmp.path().join(".tblint.toml"), "").unwrap();
        assert_eq!(
            resolve_inner(tmp.path(), None, None),
            ConfigSource::Project(tmp.path().join(".tblint.toml"))
        );

        fs::write(tmp.path().join("tblint.toml"), "").unwrap();
        assert_eq!(
            resolve_inner(tmp.path(), None, None),
            ConfigSource::Project(tmp.path().join("tblint.toml"))
        );
    }

    #[test]
    fn project_configs_lists_every_candidate_in_order() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("tblint.json"), "{}").unwrap();
        fs::write(tmp.path().join("tblint.toml"), "").unwrap();
        fs::create_dir(tmp.path().join(".tblint.toml")).unwrap();

        assert_eq!(
            project_configs(tmp.path()),
            vec![tmp.path().join("tblint.toml"), tmp.path().join("tblint.json")]
        );
    }

    #[test]
    fn global_fallback_when_no_project_config() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        fs::write(global.path().join("config.toml"), "").unwrap();

        let result = resolve_inner(project.path(), None, Some(global.path().to_path_buf()));
        assert_eq!(
            result,
            ConfigSource::Global(global.path().join("config.toml"))
        );
    }

    #[test]
    fn global_skipped_when_project_config_exists() {
        let project = TempDir::new().unwrap();
        fs::write(project.path().join("tblint.toml"), "").unwrap();

        let global = TempDir::new().unwrap();
        fs::write(global.path().join("config.toml"), "").unwrap();

        let result = resolve_inner(project.path(), None, Some(global.path().to_path_buf()));
        assert!(matches!(result, ConfigSource::Project(_)));
    }

    #[test]
    fn no_config_anywhere_returns_default() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        let result = resolve_inner(project.path(), None, Some(global.path().to_path_buf()));
        assert_eq!(result, ConfigSource::Default);
        assert_eq!(result.describe(), "built-in defaults");
    }

    #[test]
    fn default_loads_builtin_config() {
        let config = ConfigSource::Default.load().unwrap();
        assert!(config.linters.is_empty());
        assert!(config.source.is_none());
    }

    #[test]
    fn missing_explicit_config_fails_to_load() {
        let source = ConfigSource::Explicit(PathBuf::from("/nonexistent/tblint.toml"));
        assert!(source.load().is_err());
    }
}
