//! Check command implementation.

use anyhow::{bail, Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tblint_core::Orchestrator;

use super::output::{self, ReportOptions};
use crate::config_resolver::ConfigSource;
use crate::linters::builtin_registry;
use crate::OutputFormat;

/// Extensions picked up when walking a directory.
const SOURCE_EXTENSIONS: &[&str] = &["sv", "svh", "v", "vh"];

/// Arguments of `tblint check`.
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Files, directories or glob patterns to lint
    pub files: Vec<String>,

    /// File listing paths to lint, one per line (`#` starts a comment)
    #[arg(short = 'f', long = "file-list")]
    pub file_list: Option<PathBuf>,

    /// Only run this linter (can be specified multiple times)
    #[arg(short, long = "linter")]
    pub linters: Vec<String>,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable colored output
    #[arg(long)]
    pub color: bool,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of worker threads (default: available parallelism)
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

/// Runs the check command.
pub fn run(args: &CheckArgs, source: &ConfigSource) -> Result<ExitCode> {
    let config = match source.load() {
        Ok(config) => config,
        Err(code) => return Ok(code),
    };

    let files = collect_files(args)?;
    if files.is_empty() {
        bail!("no files specified\n\nTip: use -f for file lists:\n  tblint check -f files.txt");
    }

    let strict = args.strict || config.global.strict_mode;
    let color = (args.color || config.global.use_color) && args.output.is_none();
    let project = config.project.clone();

    let registry = builtin_registry().context("Failed to register linters")?;
    let orchestrator = Orchestrator::new(registry, config).with_jobs(args.jobs);

    tracing::info!("Checking {} file(s)", files.len());
    let report = orchestrator.run_all(&args.linters, &files)?;

    let described = source.describe();
    let options = ReportOptions {
        color,
        strict,
        project: &project,
        config: &described,
    };
    let rendered = output::render(&report, args.format, &options)?;
    match &args.output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("Failed to write report: {}", path.display()))?,
        None => print!("{rendered}"),
    }

    Ok(ExitCode::from(u8::try_from(report.exit_code(strict)).unwrap_or(1)))
}

/// Expands positional arguments and the file list into the files to lint,
/// in order and without duplicates.
fn collect_files(args: &CheckArgs) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for arg in &args.files {
        reject_file_list(Path::new(arg))?;
        expand(arg, &mut files)?;
    }
    if let Some(list) = &args.file_list {
        files.extend(read_file_list(list)?);
    }

    let mut seen = std::collections::HashSet::new();
    files.retain(|f| seen.insert(f.clone()));
    Ok(files)
}

/// A `.txt` positional argument whose first line looks like a file list is
/// almost always a missing `-f`.
fn reject_file_list(path: &Path) -> Result<()> {
    if path.extension().and_then(|e| e.to_str()) != Some("txt") || !path.is_file() {
        return Ok(());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let first = content.lines().next().unwrap_or_default().trim();
    if first.starts_with('#') || first.ends_with(".sv") || first.ends_with(".svh") {
        bail!(
            "'{0}' appears to be a file list\nUse: tblint check -f {0}\nNot: tblint check {0}",
            path.display()
        );
    }
    Ok(())
}

fn read_file_list(list: &Path) -> Result<Vec<PathBuf>> {
    let content = std::fs::read_to_string(list)
        .with_context(|| format!("File list '{}' not found", list.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(PathBuf::from)
        .collect())
}

fn expand(arg: &str, files: &mut Vec<PathBuf>) -> Result<()> {
    let path = Path::new(arg);
    if path.is_dir() {
        files.extend(discover_files(path)?);
    } else if arg.contains(['*', '?', '[']) {
        let mut matched: Vec<PathBuf> = glob::glob(arg)
            .with_context(|| format!("Invalid glob pattern: {arg}"))?
            .filter_map(Result::ok)
            .filter(|p| p.is_file())
            .collect();
        matched.sort();
        if matched.is_empty() {
            tracing::warn!("Pattern {} matched no files", arg);
        }
        files.extend(matched);
    } else {
        files.push(path.to_path_buf());
    }
    Ok(())
}

fn discover_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut builder = ignore::WalkBuilder::new(root);
    builder.hidden(false).git_ignore(true);

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let supported = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext));
        if supported {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args_for(files: &[&Path]) -> CheckArgs {
        CheckArgs {
            files: files.iter().map(|p| p.display().to_string()).collect(),
            ..CheckArgs::default()
        }
    }

    #[test]
    fn file_list_skips_comments_and_blanks() {
        let tmp = TempDir::new().unwrap();
        let list = tmp.path().join("files.txt");
        fs::write(&list, "# testbench\nrtl/a.sv\n\n  rtl/b.svh  \n# rtl/c.sv\n").unwrap();

        let files = read_file_list(&list).unwrap();
        assert_eq!(
            files,
            vec![PathBuf::from("rtl/a.sv"), PathBuf::from("rtl/b.svh")]
        );
    }

    #[test]
    fn missing_file_list_is_an_error() {
        let err = read_file_list(Path::new("/nonexistent/files.txt")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn positional_file_list_gets_a_hint() {
        let tmp = TempDir::new().unwrap();
        let list = tmp.path().join("files.txt");
        fs::write(&list, "rtl/a.sv\n").unwrap();

        let err = collect_files(&args_for(&[&list])).unwrap_err();
        assert!(err.to_string().contains("appears to be a file list"));

        let notes = tmp.path().join("notes.txt");
        fs::write(&notes, "just notes\n").unwrap();
        assert_eq!(collect_files(&args_for(&[&notes])).unwrap(), vec![notes]);
    }

    #[test]
    fn directories_are_walked_for_sources() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("rtl")).unwrap();
        fs::write(tmp.path().join("rtl/b.sv"), "").unwrap();
        fs::write(tmp.path().join("rtl/a.svh"), "").unwrap();
        fs::write(tmp.path().join("rtl/readme.md"), "").unwrap();

        let files = collect_files(&args_for(&[tmp.path()])).unwrap();
        assert_eq!(
            files,
            vec![tmp.path().join("rtl/a.svh"), tmp.path().join("rtl/b.sv")]
        );
    }

    #[test]
    fn globs_expand_and_duplicates_collapse() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.sv"), "").unwrap();
        fs::write(tmp.path().join("b.sv"), "").unwrap();
        let pattern = tmp.path().join("*.sv");
        let a = tmp.path().join("a.sv");

        let files = collect_files(&args_for(&[&a, &pattern])).unwrap();
        assert_eq!(files, vec![a, tmp.path().join("b.sv")]);
    }
}
