//! Checkers
//!
//! A checker inspects one document and reports back through a completion
//! callback. Hosts find checkers through a [`CheckerRegistry`].

use std::fmt;
use std::sync::Arc;

use crate::archive::PackageRegistry;
use crate::core::document::SourceDocument;
use crate::core::registry::CheckerRegistry;
use crate::validation::{check_document, Diagnostic, MetadataExtractor, PackageBufferInfo};

/// Language mode of Emacs Lisp documents (the LSP language id)
pub const EMACS_LISP_MODE: &str = "emacs-lisp";

/// Status delivered with a check's diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Finished,
}

/// Receives the outcome of a check. Invoked exactly once per check.
pub type CompletionCallback<'a> = Box<dyn FnOnce(CheckStatus, Vec<Diagnostic>) + Send + 'a>;

pub trait Checker: Send + Sync {
    /// Unique name; registering the same name twice is a no-op
    fn name(&self) -> &str;

    /// Language modes this checker applies to
    fn modes(&self) -> &[&'static str];

    fn supports_mode(&self, mode: &str) -> bool {
        self.modes().iter().any(|m| *m == mode)
    }

    fn check(
        &self,
        document: &SourceDocument,
        packages: &PackageRegistry,
        callback: CompletionCallback<'_>,
    );
}

/// Validates the `Package-Requires` header of Emacs Lisp packages
pub struct PackageRequiresChecker {
    extractor: Box<dyn MetadataExtractor>,
}

impl PackageRequiresChecker {
    pub const NAME: &'static str = "emacs-lisp-package";

    pub fn new() -> Self {
        Self::with_extractor(Box::new(PackageBufferInfo))
    }

    /// Use a different metadata extractor for the sanity check
    pub fn with_extractor(extractor: Box<dyn MetadataExtractor>) -> Self {
        Self { extractor }
    }
}

impl Default for PackageRequiresChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PackageRequiresChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackageRequiresChecker").finish_non_exhaustive()
    }
}

impl Checker for PackageRequiresChecker {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn modes(&self) -> &[&'static str] {
        &[EMACS_LISP_MODE]
    }

    fn check(
        &self,
        document: &SourceDocument,
        packages: &PackageRegistry,
        callback: CompletionCallback<'_>,
    ) {
        let diagnostics = check_document(document, packages, self.extractor.as_ref()).finish();
        log::debug!(
            "{} produced {} diagnostics",
            Self::NAME,
            diagnostics.len()
        );
        callback(CheckStatus::Finished, diagnostics);
    }
}

/// Register the Package-Requires checker. Safe to call repeatedly.
///
/// Returns `true` if the checker was newly added.
pub fn setup(registry: &mut CheckerRegistry) -> bool {
    registry.register(Arc::new(PackageRequiresChecker::new()))
}
