//! Validation Engine
//!
//! Declaration checks, the metadata sanity check and the diagnostic
//! collector they report into.

pub mod engine;
pub mod metadata;

pub use engine::{
    check_document, check_header, classify, validate_declarations, Candidate,
    DependencyDeclaration, Diagnostic, DiagnosticCollector, Severity, HOST_PACKAGE,
    MORE_THAN_ONE_EXPRESSION,
};
pub use metadata::{
    check_metadata, MetadataError, MetadataExtractor, PackageBufferInfo, PackageMetadata,
};
