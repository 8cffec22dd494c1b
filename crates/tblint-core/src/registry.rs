//! Registration table mapping linter names to constructors.

use crate::config::{AnalyzerConfig, ConfigError};
use crate::linter::LinterBox;
use thiserror::Error;

/// Builds a linter from its effective configuration.
pub type LinterFactory =
    Box<dyn Fn(&AnalyzerConfig) -> Result<LinterBox, ConfigError> + Send + Sync>;

/// Errors raised by the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Two linters registered under the same name.
    #[error("linter '{name}' is already registered")]
    Duplicate {
        /// Conflicting name.
        name: String,
    },

    /// No linter registered under this name.
    #[error("unknown linter '{name}' (available: {available})")]
    Unknown {
        /// Requested name.
        name: String,
        /// Comma-separated registered names.
        available: String,
    },

    /// The factory rejected its configuration.
    #[error("cannot construct linter '{name}': {source}")]
    Construct {
        /// Linter name.
        name: String,
        /// Configuration problem.
        #[source]
        source: ConfigError,
    },
}

struct Entry {
    name: String,
    description: String,
    factory: LinterFactory,
}

/// An explicit, constructible table of available linters.
///
/// Registration order is preserved and is the order linters are listed and
/// run in when no names are requested.
#[derive(Default)]
pub struct Registry {
    entries: Vec<Entry>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a linter constructor.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] if `name` is already taken; the
    /// existing entry is left untouched.
    pub fn register<F>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        factory: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&AnalyzerConfig) -> Result<LinterBox, ConfigError> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.contains(&name) {
            return Err(RegistryError::Duplicate { name });
        }
        self.entries.push(Entry {
            name,
            description: description.into(),
            factory: Box::new(factory),
        });
        Ok(())
    }

    /// Constructs the named linter.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Unknown`] for an unregistered name and
    /// [`RegistryError::Construct`] if the factory rejects `config`.
    pub fn get(&self, name: &str, config: &AnalyzerConfig) -> Result<LinterBox, RegistryError> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| RegistryError::Unknown {
                name: name.to_string(),
                available: self.names().join(", "),
            })?;
        (entry.factory)(config).map_err(|source| RegistryError::Construct {
            name: name.to_string(),
            source,
        })
    }

    /// Returns true if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Registered names, in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// `(name, description)` pairs, in registration order.
    pub fn descriptions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|e| (e.name.as_str(), e.description.as_str()))
    }

    /// Number of registered linters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("linters", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linter::Linter;
    use crate::rule::RuleInfo;
    use crate::types::AnalyzerResult;
    use std::path::Path;

    struct Named(&'static str);

    impl Linter for Named {
        fn name(&self) -> &str {
            self.0
        }
        fn supported_extensions(&self) -> &[&str] {
            &["sv"]
        }
        fn rules(&self) -> Vec<RuleInfo> {
            Vec::new()
        }
        fn lint_file(&self, _path: &Path) -> AnalyzerResult {
            AnalyzerResult::new(self.0)
        }
    }

    fn registry_with(names: &[&'static str]) -> Registry {
        let mut registry = Registry::new();
        for &name in names {
            registry
                .register(name, "test linter", move |_| Ok(Box::new(Named(name)) as LinterBox))
                .unwrap();
        }
        registry
    }

    #[test]
    fn names_keep_registration_order() {
        let registry = registry_with(&["verible", "naturaldocs"]);
        assert_eq!(registry.names(), vec!["verible", "naturaldocs"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = registry_with(&["naturaldocs"]);
        let err = registry
            .register("naturaldocs", "again", |_| Ok(Box::new(Named("x")) as LinterBox))
            .unwrap_err();
        assert!(matches!(err, RegistryError::Duplicate { ref name } if name == "naturaldocs"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn get_constructs_named_linter() {
        let registry = registry_with(&["naturaldocs"]);
        let linter = registry
            .get("naturaldocs", &AnalyzerConfig::default())
            .unwrap();
        assert_eq!(linter.name(), "naturaldocs");
        assert!(linter.supports(Path::new("a.SV")));
        assert!(!linter.supports(Path::new("a.txt")));
    }

    #[test]
    fn get_unknown_lists_available() {
        let registry = registry_with(&["naturaldocs", "verible"]);
        let err = registry
            .get("spyglass", &AnalyzerConfig::default())
            .err()
            .unwrap();
        assert_eq!(
            err.to_string(),
            "unknown linter 'spyglass' (available: naturaldocs, verible)"
        );
    }

    #[test]
    fn factory_errors_surface_as_construct() {
        let mut registry = Registry::new();
        registry
            .register("strict", "rejects everything", |_| {
                Err(ConfigError::InvalidSettings {
                    linter: "strict".into(),
                    message: "bad".into(),
                })
            })
            .unwrap();
        let err = registry.get("strict", &AnalyzerConfig::default()).err().unwrap();
        assert!(matches!(err, RegistryError::Construct { .. }));
    }

    #[test]
    fn registries_are_isolated() {
        let a = registry_with(&["naturaldocs"]);
        let b = Registry::new();
        assert!(a.contains("naturaldocs"));
        assert!(!b.contains("naturaldocs"));
    }
}
