//! Shared output formatting for lint results.

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tblint_core::{AnalyzerResult, ProjectInfo, RuleFailure, RunReport, Severity, Violation};

use crate::OutputFormat;

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

/// Presentation settings for one report.
#[derive(Debug, Clone, Copy)]
pub struct ReportOptions<'a> {
    /// Emit ANSI colors.
    pub color: bool,
    /// Warnings fail the run.
    pub strict: bool,
    /// Project information from the configuration.
    pub project: &'a ProjectInfo,
    /// Where the configuration came from.
    pub config: &'a str,
}

impl ReportOptions<'_> {
    fn paint(&self, color: &str, text: &str) -> String {
        if self.color {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

/// Render a report in the specified format.
pub fn render(report: &RunReport, format: OutputFormat, options: &ReportOptions<'_>) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => render_text(report, options)?,
        OutputFormat::Json => render_json(report, options)?,
        OutputFormat::Compact => render_compact(report)?,
    })
}

fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => RED,
        Severity::Warning => YELLOW,
        Severity::Info => BLUE,
    }
}

fn render_text(report: &RunReport, options: &ReportOptions<'_>) -> Result<String, std::fmt::Error> {
    let rule = "=".repeat(80);
    let mut out = String::new();

    let mut title = "TBLINT".to_string();
    if !options.project.name.is_empty() {
        write!(title, " - {}", options.project.name)?;
    }
    if !options.project.company.is_empty() {
        write!(title, " ({})", options.project.company)?;
    }
    writeln!(out, "{}", options.paint(CYAN, &rule))?;
    writeln!(out, "{}", options.paint(CYAN, &title))?;
    if !options.project.description.is_empty() {
        writeln!(out, "{}", options.project.description)?;
    }
    writeln!(out, "{}", options.paint(CYAN, &rule))?;
    writeln!(out, "Configuration: {}", options.config)?;

    for (name, result) in report.iter() {
        write_linter(&mut out, name, result, options, &rule)?;
    }

    let status = if report.passed(options.strict) {
        options.paint(GREEN, "TBLINT : PASSED")
    } else {
        options.paint(RED, "TBLINT : FAILED")
    };
    writeln!(out)?;
    writeln!(out, "{rule}")?;
    writeln!(out, "{status}")?;
    writeln!(out, "{rule}")?;
    Ok(out)
}

fn write_linter(
    out: &mut String,
    name: &str,
    result: &AnalyzerResult,
    options: &ReportOptions<'_>,
    rule: &str,
) -> std::fmt::Result {
    if let Some(reason) = &result.unavailable {
        writeln!(out)?;
        writeln!(out, "{}", options.paint(YELLOW, &format!("{name}: unavailable: {reason}")))?;
    }

    let mut current: Option<&Path> = None;
    for v in &result.violations {
        if current != Some(v.file()) {
            writeln!(out)?;
            writeln!(out, "{}", options.paint(CYAN, &format!("File: {}", v.file().display())))?;
            current = Some(v.file());
        }
        let line = format!(
            "  {}:{}:{}: {} {}: {}",
            v.file().display(),
            v.line(),
            v.column(),
            v.rule_id(),
            v.severity(),
            v.message()
        );
        writeln!(out, "{}", options.paint(severity_color(v.severity()), &line))?;
    }

    for (file, message) in &result.errors {
        writeln!(out)?;
        writeln!(out, "{}", options.paint(RED, &format!("✗ {}: {}", file.display(), message)))?;
    }
    for failure in &result.rule_failures {
        writeln!(out)?;
        writeln!(out, "{}", options.paint(RED, &format!("✗ {failure}")))?;
    }

    let (errors, warnings, infos) = result.count_by_severity();
    writeln!(out)?;
    writeln!(out, "{}", options.paint(CYAN, rule))?;
    writeln!(out, "{}", options.paint(CYAN, &format!("{name} Summary")))?;
    writeln!(out, "{}", options.paint(CYAN, rule))?;
    writeln!(out, "Files checked: {}", result.files_checked)?;
    if result.files_failed > 0 {
        writeln!(
            out,
            "{}",
            options.paint(RED, &format!("Files failed: {}", result.files_failed))
        )?;
    }
    writeln!(out, "{}", options.paint(RED, &format!("Errors: {errors}")))?;
    writeln!(out, "{}", options.paint(YELLOW, &format!("Warnings: {warnings}")))?;
    writeln!(out, "{}", options.paint(BLUE, &format!("Info: {infos}")))?;
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    linters: BTreeMap<&'a str, JsonLinter<'a>>,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonLinter<'a> {
    files_checked: usize,
    files_failed: usize,
    errors: usize,
    warnings: usize,
    info: usize,
    violations: &'a [Violation],
    file_errors: &'a BTreeMap<PathBuf, String>,
    rule_failures: &'a [RuleFailure],
    #[serde(skip_serializing_if = "Option::is_none")]
    unavailable: Option<&'a str>,
}

#[derive(Default, Serialize)]
struct JsonSummary {
    total_files_checked: usize,
    total_files_failed: usize,
    total_errors: usize,
    total_warnings: usize,
    total_info: usize,
    passed: bool,
}

fn render_json(report: &RunReport, options: &ReportOptions<'_>) -> serde_json::Result<String> {
    let mut summary = JsonSummary {
        passed: report.passed(options.strict),
        ..JsonSummary::default()
    };
    let mut linters = BTreeMap::new();
    for (name, result) in report.iter() {
        let (errors, warnings, info) = result.count_by_severity();
        summary.total_files_checked += result.files_checked;
        summary.total_files_failed += result.files_failed;
        summary.total_errors += errors;
        summary.total_warnings += warnings;
        summary.total_info += info;
        linters.insert(
            name,
            JsonLinter {
                files_checked: result.files_checked,
                files_failed: result.files_failed,
                errors,
                warnings,
                info,
                violations: &result.violations,
                file_errors: &result.errors,
                rule_failures: &result.rule_failures,
                unavailable: result.unavailable.as_deref(),
            },
        );
    }
    let mut json = serde_json::to_string_pretty(&JsonReport { linters, summary })?;
    json.push('\n');
    Ok(json)
}

fn render_compact(report: &RunReport) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    for (name, result) in report.iter() {
        for v in &result.violations {
            writeln!(
                out,
                "{}:{}:{}: {} {} {}",
                v.file().display(),
                v.line(),
                v.column(),
                v.severity(),
                v.rule_id(),
                v.message(),
            )?;
        }
        for (file, message) in &result.errors {
            writeln!(out, "{}: {name}: {message}", file.display())?;
        }
        if let Some(reason) = &result.unavailable {
            writeln!(out, "{name}: unavailable: {reason}")?;
        }
    }
    Ok(out)
}
