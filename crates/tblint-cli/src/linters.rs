//! Built-in linter registrations.

use std::sync::Arc;
use tblint_core::{Registry, RegistryError};
use tblint_rules::NaturalDocsLinter;
use tblint_verible::{VeribleStyleLinter, VeribleSyntax};

/// Registry with every linter shipped in this binary, in report order.
///
/// # Errors
///
/// Returns [`RegistryError::Duplicate`] if two built-ins share a name.
pub fn builtin_registry() -> Result<Registry, RegistryError> {
    let mut registry = Registry::new();
    registry.register(
        tblint_rules::NAME,
        "NaturalDocs documentation conformance (syntax trees from verible-verilog-syntax)",
        |config| {
            let provider = VeribleSyntax::from_config(tblint_rules::NAME, config)?;
            Ok(Box::new(NaturalDocsLinter::new(config, Arc::new(provider))?))
        },
    )?;
    registry.register(
        tblint_verible::NAME,
        "Verible style lint (verible-verilog-lint)",
        |config| Ok(Box::new(VeribleStyleLinter::new(config)?)),
    )?;
    Ok(registry)
}
