//! File header rules: `File:`, `Company:` and `Author:` fields near the top
//! of every file.

use crate::context::DocsContext;
use crate::settings::FileHeaderSettings;
use regex::{Regex, RegexBuilder};
use tblint_core::{ConfigError, FileContext, Finding, Rule, RuleError, Severity};

/// Comment leader accepted before a header field.
const LEADER: &str = r"(?://|/\*|\*)\s*";

fn compile(pattern: &str, case_insensitive: bool) -> Result<Regex, ConfigError> {
    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|e| ConfigError::InvalidSettings {
            linter: crate::NAME.to_string(),
            message: format!("file_header: {e}"),
        })
}

fn header(file: &FileContext<'_>, lines: usize) -> String {
    file.lines()
        .iter()
        .take(lines)
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
}

/// `[ND_FILE_HDR_MISS]`: the header must contain a `File:` topic.
#[derive(Debug, Clone)]
pub struct FileHeader {
    lines: usize,
    pattern: Regex,
}

impl FileHeader {
    /// Creates the rule.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSettings`] if the field pattern cannot be
    /// built.
    pub fn new(settings: &FileHeaderSettings) -> Result<Self, ConfigError> {
        Ok(Self {
            lines: settings.header_lines,
            pattern: compile(&format!(r"{LEADER}File\s*:"), false)?,
        })
    }
}

impl Rule<DocsContext> for FileHeader {
    fn id(&self) -> &'static str {
        "[ND_FILE_HDR_MISS]"
    }

    fn description(&self) -> &'static str {
        "File header must contain 'File:' keyword"
    }

    fn check(&self, file: &FileContext<'_>, _ctx: &DocsContext) -> Result<Vec<Finding>, RuleError> {
        if self.pattern.is_match(&header(file, self.lines)) {
            return Ok(Vec::new());
        }
        Ok(vec![Finding::new(1, "Missing 'File:' keyword in header")])
    }
}

/// `[ND_COMPANY_MISS]`: the header must name the configured company.
#[derive(Debug, Clone)]
pub struct CompanyField {
    lines: usize,
    pattern: Option<Regex>,
    message: String,
}

impl CompanyField {
    /// Creates the rule. Without `company_pattern` it reports nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSettings`] if the field pattern cannot be
    /// built.
    pub fn new(settings: &FileHeaderSettings) -> Result<Self, ConfigError> {
        let company = settings
            .company_pattern
            .as_deref()
            .filter(|p| !p.is_empty());
        let pattern = company
            .map(|p| compile(&format!(r"{LEADER}Company\s*:\s*{}", regex::escape(p)), true))
            .transpose()?;
        let message = match (&settings.company_name, company) {
            (Some(name), _) if !name.is_empty() => {
                format!("Missing or incomplete 'Company: {name}' in header")
            }
            (_, Some(p)) => format!("Missing 'Company:' field with pattern '{p}'"),
            _ => String::new(),
        };
        Ok(Self {
            lines: settings.header_lines,
            pattern,
            message,
        })
    }
}

impl Rule<DocsContext> for CompanyField {
    fn id(&self) -> &'static str {
        "[ND_COMPANY_MISS]"
    }

    fn description(&self) -> &'static str {
        "File header should contain 'Company:' field"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, file: &FileContext<'_>, _ctx: &DocsContext) -> Result<Vec<Finding>, RuleError> {
        match &self.pattern {
            Some(pattern) if !pattern.is_match(&header(file, self.lines)) => {
                Ok(vec![Finding::new(1, self.message.clone())])
            }
            _ => Ok(Vec::new()),
        }
    }
}

/// `[ND_AUTHOR_MISS]`: the header must carry an `Author:` line with an
/// address in the configured domain.
#[derive(Debug, Clone)]
pub struct AuthorField {
    lines: usize,
    domain: Option<String>,
    pattern: Option<Regex>,
}

impl AuthorField {
    /// Creates the rule. Without `email_domain` it reports nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSettings`] if the field pattern cannot be
    /// built.
    pub fn new(settings: &FileHeaderSettings) -> Result<Self, ConfigError> {
        let domain = settings.email_domain.clone().filter(|d| !d.is_empty());
        let pattern = domain
            .as_deref()
            .map(|d| compile(&format!(r"{LEADER}Author\s*:.*{}", regex::escape(d)), false))
            .transpose()?;
        Ok(Self {
            lines: settings.header_lines,
            domain,
            pattern,
        })
    }
}

impl Rule<DocsContext> for AuthorField {
    fn id(&self) -> &'static str {
        "[ND_AUTHOR_MISS]"
    }

    fn description(&self) -> &'static str {
        "File header should contain 'Author:' field with email"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, file: &FileContext<'_>, _ctx: &DocsContext) -> Result<Vec<Finding>, RuleError> {
        let (Some(pattern), Some(domain)) = (&self.pattern, &self.domain) else {
            return Ok(Vec::new());
        };
        if pattern.is_match(&header(file, self.lines)) {
            return Ok(Vec::new());
        }
        Ok(vec![Finding::new(
            1,
            format!("Missing 'Author:' with {domain} email"),
        )])
    }
}
