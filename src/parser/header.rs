//! Package-Requires header detection

use regex::Regex;

const HEADER_PATTERN: &str = r"^;; *Package-Requires *: *(.*?) *$";

/// The dependency header line found in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMatch {
    /// 1-based line number
    pub line: usize,
    /// Text captured after the colon, trailing spaces stripped
    pub text: String,
}

/// Find the first `;; Package-Requires:` line in the document.
///
/// Returns `None` when the document declares no dependencies.
pub fn locate_header(content: &str) -> Option<HeaderMatch> {
    let header_re = Regex::new(HEADER_PATTERN).ok()?;

    content.lines().enumerate().find_map(|(idx, line)| {
        let captures = header_re.captures(line)?;
        Some(HeaderMatch {
            line: idx + 1,
            text: captures.get(1)?.as_str().to_string(),
        })
    })
}
