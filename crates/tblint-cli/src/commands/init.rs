//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

pub(crate) const DEFAULT_CONFIG: &str = r#"# tblint configuration

[project]
name = ""
company = ""
description = ""

[global]
# Treat warnings as errors
strict_mode = false
use_color = false
# jobs = 4

[linters.naturaldocs]
enabled = true
# Rule settings can also live in a separate document:
# config_file = "configs/naturaldocs.toml"
# verible_syntax = "/opt/verible/bin/verible-verilog-syntax"

[linters.naturaldocs.file_header]
header_lines = 30
# company_pattern = "Acme Corp"
# company_name = "Acme Corporation"
# email_domain = "@acme.com"

[linters.naturaldocs.include_guards]
guards_optional_for_packages = true

# Each rule can be disabled or have its severity overridden
[linters.naturaldocs.rules."[ND_VAR_MISS]"]
enabled = true
# severity = "WARNING"

[linters.verible]
enabled = true
# executable = "/opt/verible/bin/verible-verilog-lint"
# rules_file = ".rules.verible_lint"
default_severity = "WARNING"

# [linters.verible.rules."[VB_LINE_LENGTH]"]
# enabled = false
"#;

/// Runs the init command.
pub fn run(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join("tblint.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)?;

    println!("Created tblint.toml");
    println!("\nNext steps:");
    println!("  1. Edit tblint.toml to configure linters and rules");
    println!("  2. Run: tblint check -f files.txt");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tblint_core::{EffectiveConfig, Severity};
    use tempfile::TempDir;

    #[test]
    fn template_resolves() {
        let tmp = TempDir::new().unwrap();
        run(tmp.path(), false).unwrap();

        let config = EffectiveConfig::resolve(&tmp.path().join("tblint.toml")).unwrap();
        assert!(config.is_linter_enabled("naturaldocs"));
        assert!(config.is_linter_enabled("verible"));
        assert_eq!(
            config.linter("naturaldocs").setting("file_header").unwrap()["header_lines"],
            30
        );
        assert_eq!(
            config.linter("verible").setting("default_severity").unwrap(),
            &serde_json::json!("WARNING")
        );
        assert!(!config.global.strict_mode);
        assert_eq!(
            config.linter("naturaldocs").rule_severity("[ND_VAR_MISS]"),
            None::<Severity>
        );
    }

    #[test]
    fn template_is_valid_toml() {
        let parsed: toml::Value = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert!(parsed.get("linters").is_some());
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("tblint.toml"), "# mine\n").unwrap();

        assert!(run(tmp.path(), false).is_err());
        assert_eq!(
            std::fs::read_to_string(tmp.path().join("tblint.toml")).unwrap(),
            "# mine\n"
        );

        run(tmp.path(), true).unwrap();
        assert!(std::fs::read_to_string(tmp.path().join("tblint.toml"))
            .unwrap()
            .starts_with("# tblint configuration"));
    }
}
