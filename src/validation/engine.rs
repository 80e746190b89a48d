//! Validation Engine
//!
//! Turns a located dependency header into diagnostics. Parsing lives in
//! `crate::parser`; this module decides what is wrong with the result.

use serde::Serialize;

use crate::archive::PackageRegistry;
use crate::core::SourceDocument;
use crate::parser::{locate_header, read_declarations, HeaderMatch, Sexp};
use crate::validation::metadata::{check_metadata, MetadataExtractor};
use crate::version::ParsedVersion;

/// Package name that stands for the Emacs version itself
pub const HOST_PACKAGE: &str = "emacs";

/// Message reported when the header holds text after the dependency list
pub const MORE_THAN_ONE_EXPRESSION: &str = "more than one expression provided";

/// Severity of a diagnostic message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A positioned diagnostic. Lines are 1-based, columns 0-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub line: usize,
    pub column: usize,
    pub severity: Severity,
    pub message: String,
}

/// Ordered accumulator for the diagnostics of one check
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, line: usize, column: usize, message: String) {
        self.diagnostics.push(Diagnostic {
            line,
            column,
            severity: Severity::Error,
            message,
        });
    }

    pub fn add_warning(&mut self, line: usize, column: usize, message: String) {
        self.diagnostics.push(Diagnostic {
            line,
            column,
            severity: Severity::Warning,
            message,
        });
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Hand over the diagnostics in insertion order
    pub fn finish(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

/// A well-formed `(name "version")` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyDeclaration {
    pub name: String,
    pub version: String,
}

/// A list element after shape classification
#[derive(Debug, Clone, PartialEq)]
pub enum Candidate<'a> {
    WellFormed(DependencyDeclaration),
    Malformed(&'a Sexp),
}

/// Classify a list element by shape: a symbol followed by a string
pub fn classify(entry: &Sexp) -> Candidate<'_> {
    if let Some([name, version]) = entry.as_list() {
        if let (Some(name), Some(version)) = (name.as_symbol(), version.as_str()) {
            return Candidate::WellFormed(DependencyDeclaration {
                name: name.to_string(),
                version: version.to_string(),
            });
        }
    }
    Candidate::Malformed(entry)
}

/// Validate every element of the dependency list, in order
pub fn validate_declarations(
    line: usize,
    entries: &[Sexp],
    packages: &PackageRegistry,
    result: &mut DiagnosticCollector,
) {
    for entry in entries {
        match classify(entry) {
            Candidate::WellFormed(declaration) => {
                validate_declaration(line, &declaration, packages, result);
            }
            Candidate::Malformed(value) => {
                result.add_error(
                    line,
                    0,
                    format!(
                        "Expected (package-name \"version-num\"), but found {}",
                        value
                    ),
                );
            }
        }
    }
}

/// Version and availability checks; each reports independently
fn validate_declaration(
    line: usize,
    declaration: &DependencyDeclaration,
    packages: &PackageRegistry,
    result: &mut DiagnosticCollector,
) {
    if let Err(e) = ParsedVersion::parse(&declaration.version) {
        log::debug!("Rejected version {:?}: {}", declaration.version, e);
        result.add_error(
            line,
            0,
            format!(
                "{} is not a valid version string",
                Sexp::Str(declaration.version.clone())
            ),
        );
    }

    if declaration.name != HOST_PACKAGE && !packages.contains(&declaration.name) {
        result.add_error(
            line,
            0,
            format!(
                "Package {} is unknown in the current package list.",
                Sexp::Symbol(declaration.name.clone())
            ),
        );
    }
}

/// Read and validate the text of a located header
pub fn check_header(
    header: &HeaderMatch,
    packages: &PackageRegistry,
    result: &mut DiagnosticCollector,
) {
    match read_declarations(&header.text) {
        Ok(list) => {
            if list.has_trailing_input {
                result.add_error(header.line, 0, MORE_THAN_ONE_EXPRESSION.to_string());
            }
            // The parsed prefix is still validated
            validate_declarations(header.line, &list.entries, packages, result);
        }
        Err(e) => {
            result.add_error(
                header.line,
                0,
                format!("Couldn't parse dependency header: {}", e),
            );
        }
    }
}

/// Run the whole pipeline over one document
pub fn check_document(
    document: &SourceDocument,
    packages: &PackageRegistry,
    extractor: &dyn MetadataExtractor,
) -> DiagnosticCollector {
    let mut result = DiagnosticCollector::new();

    match locate_header(document.text()) {
        Some(header) => check_header(&header, packages, &mut result),
        None => log::trace!("No Package-Requires header found"),
    }

    check_metadata(document, extractor, &mut result);

    result
}
