//! Core Checker Plumbing
//!
//! Documents, the checker trait and the registry hosts use to find checkers.

pub mod checker;
pub mod document;
pub mod registry;

pub use checker::{
    setup, CheckStatus, Checker, CompletionCallback, PackageRequiresChecker, EMACS_LISP_MODE,
};
pub use document::SourceDocument;
pub use registry::CheckerRegistry;
