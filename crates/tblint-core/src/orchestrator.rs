//! Runs a selection of linters over a file list and aggregates the results.

use crate::config::EffectiveConfig;
use crate::linter::LinterBox;
use crate::registry::{Registry, RegistryError};
use crate::types::{AnalyzerResult, Severity};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that abort a run before any file is linted.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// A requested linter name is not registered.
    #[error("unknown linter '{name}' (available: {available})")]
    UnknownLinter {
        /// Requested name.
        name: String,
        /// Comma-separated registered names.
        available: String,
    },

    /// A linter could not be constructed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The worker pool could not be built.
    #[error("cannot start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Merged results of one run, keyed by linter name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    results: BTreeMap<String, AnalyzerResult>,
}

impl RunReport {
    /// Result of one linter, if it was selected.
    #[must_use]
    pub fn get(&self, linter: &str) -> Option<&AnalyzerResult> {
        self.results.get(linter)
    }

    /// Results in linter-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnalyzerResult)> {
        self.results.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of linters in the report.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns true if no linter ran.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Totals across linters as `(errors, warnings, infos)`.
    #[must_use]
    pub fn totals(&self) -> (usize, usize, usize) {
        self.results.values().fold((0, 0, 0), |(e, w, i), r| {
            let (re, rw, ri) = r.count_by_severity();
            (e + re, w + rw, i + ri)
        })
    }

    /// Number of violations at `severity` across all linters.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        let (e, w, i) = self.totals();
        match severity {
            Severity::Error => e,
            Severity::Warning => w,
            Severity::Info => i,
        }
    }

    /// Process exit status for this report.
    ///
    /// Non-zero when any ERROR was reported, or any WARNING in strict mode.
    /// Unavailable linters and rule failures do not change the status.
    #[must_use]
    pub fn exit_code(&self, strict: bool) -> i32 {
        i32::from(!self.passed(strict))
    }

    /// Returns true if the run passes.
    #[must_use]
    pub fn passed(&self, strict: bool) -> bool {
        let (errors, warnings, _) = self.totals();
        errors == 0 && (!strict || warnings == 0)
    }
}

impl FromIterator<AnalyzerResult> for RunReport {
    fn from_iter<I: IntoIterator<Item = AnalyzerResult>>(iter: I) -> Self {
        let mut results: BTreeMap<String, AnalyzerResult> = BTreeMap::new();
        for result in iter {
            match results.get_mut(&result.linter) {
                Some(existing) => existing.merge(result),
                None => {
                    results.insert(result.linter.clone(), result);
                }
            }
        }
        Self { results }
    }
}

/// Drives linters from a [`Registry`] using an [`EffectiveConfig`].
///
/// # Example
///
/// ```ignore
/// let orchestrator = Orchestrator::new(registry, config).with_jobs(Some(4));
/// let report = orchestrator.run_all(&[], &files)?;
/// std::process::exit(report.exit_code(false));
/// ```
#[derive(Debug)]
pub struct Orchestrator {
    registry: Registry,
    config: EffectiveConfig,
    jobs: Option<usize>,
}

impl Orchestrator {
    /// Creates an orchestrator. Worker count defaults to
    /// `config.global.jobs`, or rayon's default when unset.
    #[must_use]
    pub fn new(registry: Registry, config: EffectiveConfig) -> Self {
        let jobs = config.global.jobs;
        Self {
            registry,
            config,
            jobs,
        }
    }

    /// Overrides the worker count. `None` keeps the current value.
    #[must_use]
    pub fn with_jobs(mut self, jobs: Option<usize>) -> Self {
        if jobs.is_some() {
            self.jobs = jobs;
        }
        self
    }

    /// The registry linters are constructed from.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The configuration in effect.
    #[must_use]
    pub fn config(&self) -> &EffectiveConfig {
        &self.config
    }

    /// Runs the named linters (all registered linters when `names` is
    /// empty) over `files`.
    ///
    /// Each `(linter, file)` pair is an independent unit of work. Results
    /// are merged per linter in a fixed order, so the report does not
    /// depend on scheduling.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorError::UnknownLinter`] for an unregistered
    /// name, [`OrchestratorError::Registry`] if a linter rejects its
    /// configuration, and [`OrchestratorError::ThreadPool`] if the worker
    /// pool cannot start.
    pub fn run_all(
        &self,
        names: &[String],
        files: &[PathBuf],
    ) -> Result<RunReport, OrchestratorError> {
        let selected = self.select(names)?;

        let mut linters: Vec<LinterBox> = Vec::new();
        let mut results: Vec<AnalyzerResult> = Vec::new();
        for name in selected {
            if !self.config.is_linter_enabled(name) {
                info!("Linter {} is disabled, skipping", name);
                continue;
            }
            let linter = self.registry.get(name, &self.config.linter(name))?;
            match linter.check_availability() {
                Ok(()) => {
                    results.push(AnalyzerResult::new(name));
                    linters.push(linter);
                }
                Err(e) => {
                    warn!("{}", e);
                    results.push(AnalyzerResult::unavailable(name, e.reason));
                }
            }
        }

        let work: Vec<(usize, &PathBuf)> = linters
            .iter()
            .enumerate()
            .flat_map(|(idx, linter)| {
                files
                    .iter()
                    .filter(move |f| linter.supports(f))
                    .map(move |f| (idx, f))
            })
            .collect();
        debug!(
            "Linting {} work items across {} linters",
            work.len(),
            linters.len()
        );

        let lint = || -> Vec<AnalyzerResult> {
            work.par_iter()
                .map(|(idx, file)| linters[*idx].lint_file(file))
                .collect()
        };
        let fragments = match self.jobs {
            Some(n) => rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()?
                .install(lint),
            None => lint(),
        };

        let mut report: RunReport = results.into_iter().chain(fragments).collect();
        for result in report.results.values_mut() {
            result.sort();
        }
        Ok(report)
    }

    fn select<'a>(&'a self, names: &'a [String]) -> Result<Vec<&'a str>, OrchestratorError> {
        if names.is_empty() {
            return Ok(self.registry.names());
        }
        let mut selected: Vec<&str> = Vec::new();
        for name in names {
            if !self.registry.contains(name) {
                return Err(OrchestratorError::UnknownLinter {
                    name: name.clone(),
                    available: self.registry.names().join(", "),
                });
            }
            if !selected.contains(&name.as_str()) {
                selected.push(name);
            }
        }
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyzerConfig;
    use crate::linter::{Linter, LinterUnavailable};
    use crate::rule::RuleInfo;
    use crate::types::{Finding, Violation};
    use std::path::Path;

    /// Reports one violation per file at a fixed severity.
    struct Fake {
        name: &'static str,
        severity: Severity,
        available: bool,
    }

    impl Linter for Fake {
        fn name(&self) -> &str {
            self.name
        }
        fn supported_extensions(&self) -> &[&str] {
            &["sv", "svh"]
        }
        fn check_availability(&self) -> Result<(), LinterUnavailable> {
            if self.available {
                Ok(())
            } else {
                Err(LinterUnavailable::new(self.name, "binary not found"))
            }
        }
        fn rules(&self) -> Vec<RuleInfo> {
            Vec::new()
        }
        fn lint_file(&self, path: &Path) -> AnalyzerResult {
            let mut result = AnalyzerResult::new(self.name);
            result.files_checked = 1;
            result.violations.push(Violation::stamp(
                "[FAKE]",
                self.severity,
                path,
                Finding::new(1, "fake"),
            ));
            result
        }
    }

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .register("errors", "always errors", |_| {
                Ok(Box::new(Fake {
                    name: "errors",
                    severity: Severity::Error,
                    available: true,
                }) as LinterBox)
            })
            .unwrap();
        registry
            .register("warnings", "always warns", |_| {
                Ok(Box::new(Fake {
                    name: "warnings",
                    severity: Severity::Warning,
                    available: true,
                }) as LinterBox)
            })
            .unwrap();
        registry
            .register("missing", "never available", |_| {
                Ok(Box::new(Fake {
                    name: "missing",
                    severity: Severity::Error,
                    available: false,
                }) as LinterBox)
            })
            .unwrap();
        registry
    }

    fn files() -> Vec<PathBuf> {
        vec![
            PathBuf::from("b.sv"),
            PathBuf::from("a.svh"),
            PathBuf::from("notes.txt"),
        ]
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn runs_all_linters_when_none_named() {
        let orchestrator = Orchestrator::new(registry(), EffectiveConfig::defaults());
        let report = orchestrator.run_all(&[], &files()).unwrap();
        assert_eq!(report.len(), 3);
        assert_eq!(report.get("errors").unwrap().files_checked, 2);
        assert!(report.get("missing").unwrap().is_unavailable());
        assert_eq!(report.get("missing").unwrap().files_checked, 0);
    }

    #[test]
    fn violations_are_sorted_by_file() {
        let orchestrator = Orchestrator::new(registry(), EffectiveConfig::defaults());
        let report = orchestrator.run_all(&names(&["errors"]), &files()).unwrap();
        let order: Vec<_> = report
            .get("errors")
            .unwrap()
            .violations
            .iter()
            .map(|v| v.file().to_path_buf())
            .collect();
        assert_eq!(order, vec![PathBuf::from("a.svh"), PathBuf::from("b.sv")]);
    }

    #[test]
    fn unknown_linter_is_an_error() {
        let orchestrator = Orchestrator::new(registry(), EffectiveConfig::defaults());
        let err = orchestrator
            .run_all(&names(&["spyglass"]), &files())
            .unwrap_err();
        assert!(matches!(err, OrchestratorError::UnknownLinter { .. }));
    }

    #[test]
    fn duplicate_names_run_once() {
        let orchestrator = Orchestrator::new(registry(), EffectiveConfig::defaults());
        let report = orchestrator
            .run_all(&names(&["errors", "errors"]), &files())
            .unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report.get("errors").unwrap().violations.len(), 2);
    }

    #[test]
    fn disabled_linter_is_skipped() {
        let mut config = EffectiveConfig::defaults();
        config.linters.insert(
            "errors".into(),
            AnalyzerConfig {
                enabled: false,
                ..AnalyzerConfig::default()
            },
        );
        let orchestrator = Orchestrator::new(registry(), config);
        let report = orchestrator.run_all(&[], &files()).unwrap();
        assert!(report.get("errors").is_none());
        assert!(report.get("warnings").is_some());
    }

    #[test]
    fn exit_code_follows_severity_and_strict_mode() {
        let orchestrator = Orchestrator::new(registry(), EffectiveConfig::defaults());

        let warnings = orchestrator.run_all(&names(&["warnings"]), &files()).unwrap();
        assert_eq!(warnings.exit_code(false), 0);
        assert_eq!(warnings.exit_code(true), 1);

        let errors = orchestrator.run_all(&names(&["errors"]), &files()).unwrap();
        assert_eq!(errors.exit_code(false), 1);

        let unavailable = orchestrator.run_all(&names(&["missing"]), &files()).unwrap();
        assert_eq!(unavailable.exit_code(true), 0);
    }

    #[test]
    fn explicit_job_count_gives_same_report() {
        let many: Vec<PathBuf> = (0..40).map(|i| PathBuf::from(format!("f{i:02}.sv"))).collect();
        let default = Orchestrator::new(registry(), EffectiveConfig::defaults())
            .run_all(&[], &many)
            .unwrap();
        let single = Orchestrator::new(registry(), EffectiveConfig::defaults())
            .with_jobs(Some(1))
            .run_all(&[], &many)
            .unwrap();
        assert_eq!(default, single);
        assert_eq!(default.totals(), (40, 40, 0));
    }
}
