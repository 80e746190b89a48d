//! Emacs-style version strings
//!
//! Versions are dot-separated integers, optionally interleaved with
//! pre-release markers such as `pre`, `beta` or `rc`:
//!
//! - `1.0`, `24.3`, `2.24.1`
//! - `1.0pre2`, `1.0-rc1`, `3.0.beta`, `0.9_alpha3`
//!
//! Anything else (unknown words, trailing dots, leading letters) is rejected.

use std::fmt;

use thiserror::Error;

/// Errors raised while reading a version string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("Invalid version syntax: '' (must start with a number)")]
    Empty,

    #[error("Invalid version syntax: '{0}' (must start with a number)")]
    MustStartWithNumber(String),

    #[error("Invalid version syntax: '{0}'")]
    InvalidSyntax(String),

    #[error("Invalid version syntax: '{0}' (component does not fit in 63 bits)")]
    ComponentTooLarge(String),
}

/// Pre-release markers, ordered from least to most mature
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PreRelease {
    Snapshot,
    Alpha,
    Beta,
    Pre,
}

impl PreRelease {
    /// Numeric rank used when versions are flattened into integer lists
    pub fn rank(self) -> i64 {
        match self {
            PreRelease::Snapshot => -4,
            PreRelease::Alpha => -3,
            PreRelease::Beta => -2,
            PreRelease::Pre => -1,
        }
    }

    fn label(self) -> &'static str {
        match self {
            PreRelease::Snapshot => "snapshot",
            PreRelease::Alpha => "alpha",
            PreRelease::Beta => "beta",
            PreRelease::Pre => "pre",
        }
    }

    /// Classify a non-numeric run found between two version numbers.
    ///
    /// The run may start with one of `-._+ ` before the marker word;
    /// a lone `-`, `_` or `+` is a snapshot marker.
    fn classify(run: &str) -> Option<Self> {
        let word = match run.chars().next() {
            Some('-' | '.' | '_' | '+' | ' ') => &run[1..],
            _ => run,
        };

        if word.is_empty() {
            return matches!(run, "-" | "_" | "+").then_some(PreRelease::Snapshot);
        }

        match word.to_ascii_lowercase().as_str() {
            "snapshot" | "unknown" | "cvs" | "git" | "bzr" | "svn" | "hg" | "darcs" => {
                Some(PreRelease::Snapshot)
            }
            "alpha" => Some(PreRelease::Alpha),
            "beta" => Some(PreRelease::Beta),
            "pre" | "rc" => Some(PreRelease::Pre),
            _ => None,
        }
    }
}

/// One component of a parsed version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionComponent {
    /// Non-negative, at most `i64::MAX`
    Number(i64),
    Marker(PreRelease),
}

/// A version decomposed into its ordered components
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParsedVersion {
    components: Vec<VersionComponent>,
}

impl ParsedVersion {
    /// Parse a version string such as `"24.3"` or `"1.0-rc2"`
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let Some(first) = input.chars().next() else {
            return Err(VersionError::Empty);
        };
        if !first.is_ascii_digit() {
            return Err(VersionError::MustStartWithNumber(input.to_string()));
        }

        let invalid = || VersionError::InvalidSyntax(input.to_string());
        let mut components = Vec::new();
        let mut rest = input;

        loop {
            let digits_end = rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len());
            if digits_end > 0 {
                let number = rest[..digits_end]
                    .parse::<i64>()
                    .map_err(|_| VersionError::ComponentTooLarge(input.to_string()))?;
                components.push(VersionComponent::Number(number));
                rest = &rest[digits_end..];
            }

            if rest.is_empty() {
                break;
            }

            let run_end = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
            let run = &rest[..run_end];
            rest = &rest[run_end..];

            if run == "." {
                if rest.is_empty() {
                    return Err(invalid());
                }
                continue;
            }

            let marker = PreRelease::classify(run).ok_or_else(invalid)?;
            components.push(VersionComponent::Marker(marker));

            if rest.is_empty() {
                break;
            }
        }

        Ok(Self { components })
    }

    pub fn components(&self) -> &[VersionComponent] {
        &self.components
    }

    /// Flatten into integers, with markers mapped to their negative rank
    pub fn to_list(&self) -> Vec<i64> {
        self.components
            .iter()
            .map(|component| match component {
                VersionComponent::Number(n) => *n,
                VersionComponent::Marker(marker) => marker.rank(),
            })
            .collect()
    }
}

impl fmt::Display for ParsedVersion {
    /// Canonical form: `1.0-rc1` renders as `1.0pre1`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut previous_was_number = false;
        for component in &self.components {
            match component {
                VersionComponent::Number(n) => {
                    if previous_was_number {
                        f.write_str(".")?;
                    }
                    write!(f, "{}", n)?;
                    previous_was_number = true;
                }
                VersionComponent::Marker(marker) => {
                    f.write_str(marker.label())?;
                    previous_was_number = false;
                }
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for ParsedVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
