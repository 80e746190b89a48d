//! Package-Requires Language Server
//!
//! Checks the `;; Package-Requires:` header of Emacs Lisp packages.
//!
//! This library provides:
//! - A reader for the dependency list and per-declaration validation
//! - A metadata sanity check for the whole package file
//! - TOML package archives backing the availability check
//! - A checker registry and an LSP host for it

pub mod archive;
pub mod config;
pub mod core;
pub mod lsp;
pub mod parser;
pub mod validation;
pub mod version;

// Re-exports for clean public API
pub use archive::{ArchiveManager, PackageRegistry};
pub use config::Config;
pub use crate::core::{setup, CheckStatus, Checker, CheckerRegistry, PackageRequiresChecker, SourceDocument};
pub use parser::{locate_header, read_declarations, HeaderMatch};
pub use validation::{check_document, Diagnostic, DiagnosticCollector, Severity};
pub use version::ParsedVersion;
