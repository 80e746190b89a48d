//! Checker Registry
//!
//! Ordered set of active checkers. Hosts own an instance instead of
//! relying on process-wide state.

use std::sync::Arc;

use crate::archive::PackageRegistry;
use crate::core::checker::Checker;
use crate::core::document::SourceDocument;
use crate::validation::Diagnostic;

#[derive(Clone, Default)]
pub struct CheckerRegistry {
    checkers: Vec<Arc<dyn Checker>>,
}

impl CheckerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a checker unless one with the same name is already present.
    ///
    /// Returns `true` if the checker was added.
    pub fn register(&mut self, checker: Arc<dyn Checker>) -> bool {
        if self.is_registered(checker.name()) {
            log::debug!("Checker {} already registered", checker.name());
            return false;
        }
        log::debug!("Registered checker {}", checker.name());
        self.checkers.push(checker);
        true
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.checkers.iter().any(|c| c.name() == name)
    }

    /// Registered checkers that apply to `mode`, in registration order
    pub fn checkers_for_mode<'a>(
        &'a self,
        mode: &'a str,
    ) -> impl Iterator<Item = &'a Arc<dyn Checker>> + 'a {
        self.checkers.iter().filter(move |c| c.supports_mode(mode))
    }

    pub fn names(&self) -> Vec<&str> {
        self.checkers.iter().map(|c| c.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.checkers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkers.is_empty()
    }

    /// Run every checker for `mode` and concatenate what they report
    pub fn run_checks(
        &self,
        mode: &str,
        document: &SourceDocument,
        packages: &PackageRegistry,
    ) -> Vec<Diagnostic> {
        let mut collected = Vec::new();

        for checker in self.checkers_for_mode(mode) {
            let name = checker.name();
            checker.check(
                document,
                packages,
                Box::new(|status, diagnostics| {
                    log::trace!("{} {:?} with {} diagnostics", name, status, diagnostics.len());
                    collected.extend(diagnostics);
                }),
            );
        }

        collected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::checker::{CheckStatus, CompletionCallback};
    use crate::validation::Severity;

    struct StubChecker {
        name: &'static str,
        modes: &'static [&'static str],
    }

    impl Checker for StubChecker {
        fn name(&self) -> &str {
            self.name
        }

        fn modes(&self) -> &[&'static str] {
            self.modes
        }

        fn check(&self, _: &SourceDocument, _: &PackageRegistry, callback: CompletionCallback<'_>) {
            callback(
                CheckStatus::Finished,
                vec![Diagnostic {
                    line: 1,
                    column: 0,
                    severity: Severity::Warning,
                    message: format!("from {}", self.name),
                }],
            );
        }
    }

    fn stub(name: &'static str, modes: &'static [&'static str]) -> Arc<dyn Checker> {
        Arc::new(StubChecker { name, modes })
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = CheckerRegistry::new();
        assert!(registry.register(stub("a", &["emacs-lisp"])));
        assert!(!registry.register(stub("a", &["emacs-lisp"])));
        assert!(registry.register(stub("b", &["emacs-lisp"])));

        assert_eq!(registry.names(), vec!["a", "b"]);
    }

    #[test]
    fn test_checkers_filtered_by_mode() {
        let mut registry = CheckerRegistry::new();
        registry.register(stub("elisp", &["emacs-lisp"]));
        registry.register(stub("scheme", &["scheme"]));

        let names: Vec<_> = registry
            .checkers_for_mode("emacs-lisp")
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(names, vec!["elisp"]);
        assert_eq!(registry.checkers_for_mode("python").count(), 0);
    }

    #[test]
    fn test_run_checks_keeps_registration_order() {
        let mut registry = CheckerRegistry::new();
        registry.register(stub("first", &["emacs-lisp"]));
        registry.register(stub("second", &["emacs-lisp"]));

        let diagnostics = registry.run_checks(
            "emacs-lisp",
            &SourceDocument::new(""),
            &PackageRegistry::new(),
        );
        let messages: Vec<_> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["from first", "from second"]);
    }
}
