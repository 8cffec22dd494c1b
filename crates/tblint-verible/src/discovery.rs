//! Locating Verible binaries.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Style linter binary.
pub const LINT_TOOL: &str = "verible-verilog-lint";

/// Syntax tree exporter binary.
pub const SYNTAX_TOOL: &str = "verible-verilog-syntax";

/// Environment variable naming the lint binary directly.
pub const EXECUTABLE_VAR: &str = "VERIBLE_EXECUTABLE";

/// Environment variable naming a Verible installation directory.
pub const HOME_VAR: &str = "VERIBLE_HOME";

/// Snapshot of the environment used to find Verible tools.
///
/// Lookup order:
///
/// 1. `VERIBLE_EXECUTABLE` (lint tool only)
/// 2. explicit `executable` setting
/// 3. `PATH`
/// 4. `$VERIBLE_HOME/bin`
/// 5. `$VERIBLE_HOME`
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    executable_var: Option<OsString>,
    path_var: Option<OsString>,
    home_var: Option<OsString>,
}

impl Discovery {
    /// Captures the relevant variables from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            executable_var: env::var_os(EXECUTABLE_VAR),
            path_var: env::var_os("PATH"),
            home_var: env::var_os(HOME_VAR),
        }
    }

    /// Overrides `VERIBLE_EXECUTABLE`.
    #[must_use]
    pub fn with_executable_var(mut self, value: impl Into<OsString>) -> Self {
        self.executable_var = Some(value.into());
        self
    }

    /// Overrides `PATH`.
    #[must_use]
    pub fn with_path_var(mut self, value: impl Into<OsString>) -> Self {
        self.path_var = Some(value.into());
        self
    }

    /// Overrides `VERIBLE_HOME`.
    #[must_use]
    pub fn with_home_var(mut self, value: impl Into<OsString>) -> Self {
        self.home_var = Some(value.into());
        self
    }

    /// Finds `tool`, preferring `explicit` when it names an existing file.
    #[must_use]
    pub fn find(&self, tool: &str, explicit: Option<&Path>) -> Option<PathBuf> {
        if tool == LINT_TOOL {
            if let Some(path) = self.executable_var.as_ref().map(PathBuf::from) {
                if path.is_file() {
                    return Some(path);
                }
                debug!("{} points at missing file {}", EXECUTABLE_VAR, path.display());
            }
        }

        if let Some(path) = explicit {
            if path.is_file() {
                return Some(path.to_path_buf());
            }
            debug!("configured executable {} does not exist", path.display());
        }

        let mut dirs: Vec<PathBuf> = self
            .path_var
            .as_ref()
            .map(|p| env::split_paths(p).collect())
            .unwrap_or_default();
        if let Some(home) = &self.home_var {
            let home = PathBuf::from(home);
            dirs.push(home.join("bin"));
            dirs.push(home);
        }

        let found = dirs.iter().find_map(|dir| candidate(dir, tool));
        debug!("{} resolved to {:?}", tool, found);
        found
    }

    /// Explains where `tool` was looked for, for unavailability reports.
    #[must_use]
    pub fn describe_search(&self, tool: &str, explicit: Option<&Path>) -> String {
        let mut places = Vec::new();
        if tool == LINT_TOOL {
            if let Some(value) = &self.executable_var {
                places.push(format!("{EXECUTABLE_VAR}={}", Path::new(value).display()));
            }
        }
        if let Some(path) = explicit {
            places.push(format!("executable setting {}", path.display()));
        }
        places.push("PATH".to_string());
        match &self.home_var {
            Some(home) => {
                let home = Path::new(home);
                places.push(home.join("bin").display().to_string());
                places.push(home.display().to_string());
            }
            None => places.push(format!("{HOME_VAR} (unset)")),
        }
        format!("{tool} not found (searched {})", places.join(", "))
    }
}

fn candidate(dir: &Path, tool: &str) -> Option<PathBuf> {
    [tool.to_string(), format!("{tool}{}", env::consts::EXE_SUFFIX)]
        .into_iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}
