//! The NaturalDocs linter: parses each file once and runs the documentation
//! rules over the resulting [`DocsContext`].

use crate::context::DocsContext;
use crate::declaration_docs::MissingDocs;
use crate::file_header::{AuthorField, CompanyField, FileHeader};
use crate::include_guards::{GuardFormat, IncludeGuards};
use crate::keyword_checks::{InvalidKeyword, NameMismatch, WrongKeyword};
use crate::settings::NaturalDocsSettings;
use std::path::Path;
use std::sync::Arc;
use tblint_core::{
    lint_with_context, AnalyzerConfig, AnalyzerResult, ConfigError, Linter, LinterUnavailable,
    RuleInfo, RuleSet, SyntaxTreeProvider,
};
use tracing::debug;

/// Registered name of the NaturalDocs linter.
pub const NAME: &str = "naturaldocs";

/// Checks NaturalDocs documentation in SystemVerilog sources.
pub struct NaturalDocsLinter {
    rules: RuleSet<DocsContext>,
    provider: Arc<dyn SyntaxTreeProvider>,
}

impl NaturalDocsLinter {
    /// Builds the linter from its effective configuration, using `provider`
    /// to parse files.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSettings`] if the linter's settings do
    /// not have the expected shape.
    pub fn new(
        config: &AnalyzerConfig,
        provider: Arc<dyn SyntaxTreeProvider>,
    ) -> Result<Self, ConfigError> {
        let settings: NaturalDocsSettings = config.settings_as(NAME)?;
        debug!("{} settings: {:?}", NAME, settings);

        let mut rules = RuleSet::for_config(config)
            .rule(FileHeader::new(&settings.file_header)?)
            .rule(CompanyField::new(&settings.file_header)?)
            .rule(AuthorField::new(&settings.file_header)?)
            .rule(IncludeGuards::new(settings.include_guards.clone())?)
            .rule(GuardFormat::new(settings.include_guards.clone()));
        for rule in MissingDocs::all() {
            rules.push(Box::new(rule));
        }
        let rules = rules
            .rule(InvalidKeyword)
            .rule(WrongKeyword)
            .rule(NameMismatch);

        Ok(Self { rules, provider })
    }
}

impl std::fmt::Debug for NaturalDocsLinter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NaturalDocsLinter")
            .field("rules", &self.rules.len())
            .field("provider", &self.provider.name())
            .finish()
    }
}

impl Linter for NaturalDocsLinter {
    fn name(&self) -> &str {
        NAME
    }

    fn supported_extensions(&self) -> &[&str] {
        &["sv", "svh"]
    }

    fn check_availability(&self) -> Result<(), LinterUnavailable> {
        self.provider.check_availability()
    }

    fn rules(&self) -> Vec<RuleInfo> {
        self.rules.infos()
    }

    fn lint_file(&self, path: &Path) -> AnalyzerResult {
        lint_with_context(NAME, path, &self.rules, |file| {
            let tree = self.provider.parse(file.path(), file.content())?;
            Ok(DocsContext::new(tree, file))
        })
    }
}
