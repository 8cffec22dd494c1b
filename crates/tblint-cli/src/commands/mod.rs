//! Subcommand implementations.

pub mod check;
pub mod init;
pub mod list_linters;
pub mod list_rules;
pub mod output;
