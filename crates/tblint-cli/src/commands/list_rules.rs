//! List rules command implementation.

use anyhow::{bail, Context, Result};
use std::process::ExitCode;

use crate::config_resolver::ConfigSource;
use crate::linters::builtin_registry;

/// Runs the list-rules command.
pub fn run(only: Option<&str>, source: &ConfigSource) -> Result<ExitCode> {
    let config = match source.load() {
        Ok(config) => config,
        Err(code) => return Ok(code),
    };
    let registry = builtin_registry().context("Failed to register linters")?;

    let names: Vec<&str> = match only {
        Some(name) if registry.contains(name) => vec![name],
        Some(name) => bail!(
            "unknown linter '{name}' (available: {})",
            registry.names().join(", ")
        ),
        None => registry.names(),
    };

    for name in names {
        let linter = registry.get(name, &config.linter(name))?;
        println!("{name}:\n");
        println!(
            "{:<22} {:<9} {:<8} Description",
            "Rule", "Severity", "Enabled"
        );
        println!("{}", "-".repeat(80));
        for rule in linter.rules() {
            let severity = if rule.severity == rule.default_severity {
                rule.severity.to_string()
            } else {
                format!("{}*", rule.severity)
            };
            let enabled = if rule.enabled { "yes" } else { "no" };
            println!(
                "{:<22} {:<9} {:<8} {}",
                rule.id, severity, enabled, rule.description
            );
        }
        println!();
    }

    println!("* severity overridden by configuration");
    Ok(ExitCode::SUCCESS)
}
