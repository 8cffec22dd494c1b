//! Typed settings for the NaturalDocs linter.
//!
//! Read from the linter's configuration entry:
//!
//! ```toml
//! [linters.naturaldocs.file_header]
//! company_pattern = "Acme Corp"
//! company_name = "Acme Corporation"
//! email_domain = "@acme.com"
//!
//! [linters.naturaldocs.include_guards]
//! guards_optional_for_packages = true
//! ```

use serde::Deserialize;

/// Settings for the NaturalDocs linter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NaturalDocsSettings {
    /// File header checks.
    pub file_header: FileHeaderSettings,
    /// Include guard checks.
    pub include_guards: IncludeGuardSettings,
}

/// Settings for the file header rules.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileHeaderSettings {
    /// Text expected after `Company:`. The company rule is inert when unset.
    pub company_pattern: Option<String>,
    /// Company name shown in messages.
    pub company_name: Option<String>,
    /// Domain expected on the `Author:` line. The author rule is inert when
    /// unset.
    pub email_domain: Option<String>,
    /// Number of leading lines searched.
    pub header_lines: usize,
}

impl Default for FileHeaderSettings {
    fn default() -> Self {
        Self {
            company_pattern: None,
            company_name: None,
            email_domain: None,
            header_lines: 30,
        }
    }
}

/// Settings for the include guard rules.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IncludeGuardSettings {
    /// Skip files that declare a package.
    pub guards_optional_for_packages: bool,
}

impl Default for IncludeGuardSettings {
    fn default() -> Self {
        Self {
            guards_optional_for_packages: true,
        }
    }
}
