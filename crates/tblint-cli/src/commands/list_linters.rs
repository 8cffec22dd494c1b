//! List linters command implementation.

use anyhow::{Context, Result};
use std::process::ExitCode;

use crate::config_resolver::ConfigSource;
use crate::linters::builtin_registry;

/// Runs the list-linters command.
pub fn run(source: &ConfigSource) -> Result<ExitCode> {
    let config = match source.load() {
        Ok(config) => config,
        Err(code) => return Ok(code),
    };
    let registry = builtin_registry().context("Failed to register linters")?;

    println!("Available linters:\n");
    println!("{:<14} {:<10} Description", "Name", "Status");
    println!("{}", "-".repeat(80));
    for (name, description) in registry.descriptions() {
        let status = if config.is_linter_enabled(name) {
            "enabled"
        } else {
            "disabled"
        };
        println!("{name:<14} {status:<10} {description}");
    }

    println!("\nUse --linter to run specific linters, e.g.:");
    println!("  tblint check --linter naturaldocs rtl/");
    Ok(ExitCode::SUCCESS)
}
