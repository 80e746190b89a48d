//! Dependency Header Parser
//!
//! Locates the `Package-Requires` header and reads its text into a list
//! of candidate declarations. Shape checks happen later, in validation.

pub mod ast;
pub mod header;
pub mod lexer;

use thiserror::Error;

pub use ast::{read_expression, Sexp, MAX_DEPTH};
pub use header::{locate_header, HeaderMatch};
pub use lexer::{Lexer, Token, TokenKind};

/// Reasons the header text could not be read as a dependency list
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("End of file during parsing")]
    EndOfInput,

    #[error("Invalid read syntax: \"{0}\"")]
    InvalidSyntax(String),

    #[error("Expected a list of dependencies, but found {0}")]
    NotAList(String),

    #[error("Nesting deeper than {0} levels")]
    TooDeep(usize),
}

/// The elements of a successfully read dependency list
#[derive(Debug, Clone, PartialEq)]
pub struct DeclarationList {
    /// Candidate declarations, shape unchecked
    pub entries: Vec<Sexp>,
    /// True when anything but whitespace follows the list
    pub has_trailing_input: bool,
}

/// Read header text as exactly one list expression
pub fn read_declarations(text: &str) -> Result<DeclarationList, ReadError> {
    let mut lexer = Lexer::new(text);
    let value = read_expression(&mut lexer)?;

    let entries = match value {
        Sexp::List(items) => items,
        other => return Err(ReadError::NotAList(other.to_string())),
    };

    // The list must consume the whole header; comments after it count as extra text
    let has_trailing_input = !lexer.remaining().trim_start().is_empty();

    Ok(DeclarationList {
        entries,
        has_trailing_input,
    })
}
