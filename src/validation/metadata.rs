//! Package metadata sanity check
//!
//! The whole-file metadata (file header line, terminating comment,
//! version header) is read by a [`MetadataExtractor`]. The check only
//! cares whether extraction succeeds; a failure becomes one
//! document-level warning.

use std::collections::HashMap;

use regex::Regex;
use thiserror::Error;

use crate::core::SourceDocument;
use crate::validation::engine::DiagnosticCollector;
use crate::version::ParsedVersion;

/// Why package metadata could not be extracted
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Package lacks a file header")]
    MissingFileHeader,

    #[error("Package lacks a terminating comment")]
    MissingTerminator { file: String },

    #[error("Package lacks a \"Version\" or \"Package-Version\" header")]
    MissingVersion,

    #[error("invalid header pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Package metadata read from a single-file package
#[derive(Debug, Clone, PartialEq)]
pub struct PackageMetadata {
    /// File name without the `.el` extension
    pub name: String,
    pub summary: String,
    pub version: ParsedVersion,
    /// Raw `Package-Requires` text, if present
    pub requires: Option<String>,
    pub keywords: Vec<String>,
}

/// Reads whole-document package metadata
pub trait MetadataExtractor: Send + Sync {
    fn extract(&self, document: &SourceDocument) -> Result<PackageMetadata, MetadataError>;
}

/// Default extractor following the conventional single-file package layout:
///
/// ```text
/// ;;; foo.el --- Summary line  -*- lexical-binding: t -*-
/// ;; Version: 1.0
/// ;; Package-Requires: ((emacs "25.1"))
/// ...
/// ;;; foo.el ends here
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PackageBufferInfo;

impl MetadataExtractor for PackageBufferInfo {
    fn extract(&self, document: &SourceDocument) -> Result<PackageMetadata, MetadataError> {
        let lines: Vec<&str> = document.text().lines().collect();

        let file_header_re =
            Regex::new(r"^;;; ([^ ]*)\.el ---[ \t]*(.*?)[ \t]*(-\*-.*-\*-[ \t]*)?$")?;
        let (start, name, summary) = lines
            .iter()
            .enumerate()
            .find_map(|(idx, line)| {
                let captures = file_header_re.captures(line)?;
                Some((idx, captures[1].to_string(), captures[2].to_string()))
            })
            .ok_or(MetadataError::MissingFileHeader)?;

        let terminator = format!(";;; {}.el ends here", name);
        let end = lines[start + 1..]
            .iter()
            .position(|line| line.contains(&terminator))
            .map(|offset| start + 1 + offset)
            .ok_or_else(|| MetadataError::MissingTerminator { file: name.clone() })?;

        let headers = HeaderBlock::scan(&lines[start..=end])?;

        let version = headers
            .value("package-version")
            .and_then(strip_rcs_id)
            .or_else(|| headers.value("version").and_then(strip_rcs_id))
            .ok_or(MetadataError::MissingVersion)?;

        let requires = headers.value("package-requires").map(str::to_string);
        let keywords = headers
            .value("keywords")
            .map(|value| {
                value
                    .split([' ', ','])
                    .filter(|word| !word.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(PackageMetadata {
            name,
            summary,
            version,
            requires,
            keywords,
        })
    }
}

/// `;; Key: value` headers found before the `;;; Code:` marker.
///
/// Keys are lowercased; the first occurrence of a key wins.
struct HeaderBlock {
    headers: HashMap<String, String>,
}

impl HeaderBlock {
    fn scan(region: &[&str]) -> Result<Self, regex::Error> {
        let header_re =
            Regex::new(r"^;+[ \t]+(?:@\(#\))?[ \t]*\$?([A-Za-z0-9-]+)[ \t]*:[ \t]*(.*?)[ \t]*$")?;
        let code_re = Regex::new(r"(?i)^;;;[ \t]*Code:")?;

        let mut headers = HashMap::new();
        for line in region.iter().take_while(|line| !code_re.is_match(line)) {
            if let Some(captures) = header_re.captures(line) {
                headers
                    .entry(captures[1].to_ascii_lowercase())
                    .or_insert_with(|| captures[2].to_string());
            }
        }

        Ok(Self { headers })
    }

    fn value(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(String::as_str)
    }
}

/// Drop an RCS `$Revision: ... $` wrapper and keep the value only if it
/// is a valid version
fn strip_rcs_id(value: &str) -> Option<ParsedVersion> {
    let trimmed = value.trim();
    let unwrapped = match trimmed.strip_prefix("$Revision:") {
        Some(rest) => rest.trim_end_matches('$').trim(),
        None => trimmed,
    };
    ParsedVersion::parse(unwrapped).ok()
}

/// Run the extractor and convert a failure into a document-level warning
pub fn check_metadata(
    document: &SourceDocument,
    extractor: &dyn MetadataExtractor,
    result: &mut DiagnosticCollector,
) {
    if let Err(e) = extractor.extract(document) {
        result.add_warning(0, 0, format!("package metadata cannot be parsed: {}", e));
    }
}
