//! Values read from a dependency header
//!
//! Pure data plus a recursive-descent reader over lexer tokens.
//! Nothing is evaluated; the reader only builds the nested structure.

use std::fmt;

use super::lexer::{Lexer, Token, TokenKind};
use super::ReadError;

/// A value in Lisp reader syntax
#[derive(Debug, Clone, PartialEq)]
pub enum Sexp {
    /// A symbol such as `seq` or `emacs`
    Symbol(String),
    /// A string literal (contents only)
    Str(String),
    /// A numeric literal, kept as written
    Number(String),
    /// A proper list; `nil` and `()` both read as the empty list
    List(Vec<Sexp>),
}

impl Sexp {
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Sexp::Symbol(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Sexp::Str(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Sexp]> {
        match self {
            Sexp::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Sexp {
    /// Print in reader syntax, so strings come back quoted
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sexp::Symbol(name) => {
                for ch in name.chars() {
                    if ch.is_whitespace() || matches!(ch, '(' | ')' | '"' | '\'' | ';' | '\\') {
                        f.write_str("\\")?;
                    }
                    write!(f, "{}", ch)?;
                }
                Ok(())
            }
            Sexp::Str(text) => {
                f.write_str("\"")?;
                for ch in text.chars() {
                    match ch {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        _ => write!(f, "{}", ch)?,
                    }
                }
                f.write_str("\"")
            }
            Sexp::Number(text) => f.write_str(text),
            Sexp::List(items) if items.is_empty() => f.write_str("nil"),
            Sexp::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Deepest list or quote nesting the reader accepts
pub const MAX_DEPTH: usize = 512;

/// Read exactly one expression from the lexer.
///
/// The lexer is left positioned just after the expression, so the caller
/// can inspect whatever text follows it.
pub fn read_expression(lexer: &mut Lexer<'_>) -> Result<Sexp, ReadError> {
    read_nested(lexer, 0)
}

fn read_nested(lexer: &mut Lexer<'_>, depth: usize) -> Result<Sexp, ReadError> {
    match lexer.next_token()? {
        Some(token) => read_from_token(lexer, token, depth),
        None => Err(ReadError::EndOfInput),
    }
}

fn read_from_token(lexer: &mut Lexer<'_>, token: Token, depth: usize) -> Result<Sexp, ReadError> {
    match token.kind {
        TokenKind::OpenParen | TokenKind::Quote if depth >= MAX_DEPTH => {
            Err(ReadError::TooDeep(MAX_DEPTH))
        }
        TokenKind::OpenParen => read_list(lexer, depth + 1),
        TokenKind::CloseParen => Err(ReadError::InvalidSyntax(")".to_string())),
        TokenKind::Quote => {
            let quoted = read_nested(lexer, depth + 1)?;
            Ok(Sexp::List(vec![Sexp::Symbol("quote".to_string()), quoted]))
        }
        TokenKind::Str => Ok(Sexp::Str(token.text)),
        TokenKind::Number => Ok(Sexp::Number(token.text)),
        TokenKind::Symbol if token.text == "nil" => Ok(Sexp::List(Vec::new())),
        TokenKind::Symbol => Ok(Sexp::Symbol(token.text)),
    }
}

fn read_list(lexer: &mut Lexer<'_>, depth: usize) -> Result<Sexp, ReadError> {
    let mut items = Vec::new();

    loop {
        match lexer.next_token()? {
            None => return Err(ReadError::EndOfInput),
            Some(token) if token.kind == TokenKind::CloseParen => break,
            Some(token) => items.push(read_from_token(lexer, token, depth)?),
        }
    }

    Ok(Sexp::List(items))
}
