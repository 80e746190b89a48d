//! Lisp literal lexer
//!
//! Splits the text of a dependency header into tokens. Only the subset of
//! reader syntax that can appear in a dependency list is recognised;
//! anything else is reported as invalid read syntax.

use super::ReadError;

/// Token types in a dependency list
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `'` quote shorthand
    Quote,
    /// Symbol like `seq` or `emacs`
    Symbol,
    /// String literal, `text` holds the unescaped contents
    Str,
    /// Integer or float literal
    Number,
}

/// A token with its text content and byte span in the source
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// Incremental tokenizer over a single header
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    /// Byte offset just past the last consumed token
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Text not yet consumed
    pub fn remaining(&self) -> &'a str {
        &self.source[self.pos..]
    }

    /// Produce the next token, or `None` at end of input
    pub fn next_token(&mut self) -> Result<Option<Token>, ReadError> {
        self.skip_whitespace_and_comments();

        let start = self.pos;
        let Some(ch) = self.peek() else {
            return Ok(None);
        };

        let token = match ch {
            '(' => self.single(TokenKind::OpenParen, start),
            ')' => self.single(TokenKind::CloseParen, start),
            '\'' => self.single(TokenKind::Quote, start),
            '"' => self.string(start)?,
            '[' | ']' | '#' | '`' | ',' | '?' => {
                return Err(ReadError::InvalidSyntax(ch.to_string()));
            }
            _ => self.atom(start)?,
        };

        Ok(Some(token))
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.bump();
            } else if ch == ';' {
                // Comment runs to end of line
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn single(&mut self, kind: TokenKind, start: usize) -> Token {
        self.bump();
        Token {
            kind,
            text: self.source[start..self.pos].to_string(),
            start,
            end: self.pos,
        }
    }

    fn string(&mut self, start: usize) -> Result<Token, ReadError> {
        self.bump(); // opening quote
        let mut text = String::new();

        loop {
            match self.bump() {
                None => return Err(ReadError::EndOfInput),
                Some('"') => break,
                Some('\\') => match self.bump() {
                    None => return Err(ReadError::EndOfInput),
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    // Escaped newline is a line continuation
                    Some('\n') => {}
                    Some(other) => text.push(other),
                },
                Some(other) => text.push(other),
            }
        }

        Ok(Token {
            kind: TokenKind::Str,
            text,
            start,
            end: self.pos,
        })
    }

    fn atom(&mut self, start: usize) -> Result<Token, ReadError> {
        let mut text = String::new();

        while let Some(ch) = self.peek() {
            if ch.is_whitespace() || matches!(ch, '(' | ')' | '"' | '\'' | ';' | '[' | ']') {
                break;
            }
            self.bump();
            if ch == '\\' {
                match self.bump() {
                    Some(escaped) => text.push(escaped),
                    None => return Err(ReadError::EndOfInput),
                }
            } else {
                text.push(ch);
            }
        }

        if text == "." {
            return Err(ReadError::InvalidSyntax(".".to_string()));
        }

        let kind = if is_number(&text) {
            TokenKind::Number
        } else {
            TokenKind::Symbol
        };

        Ok(Token {
            kind,
            text,
            start,
            end: self.pos,
        })
    }
}

/// Integer (`12`, `-3`, `4.`) or float (`1.5`, `.5`, `1e3`) literal
fn is_number(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    if unsigned.is_empty() {
        return false;
    }

    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(idx) => (&unsigned[..idx], Some(&unsigned[idx + 1..])),
        None => (unsigned, None),
    };

    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (mantissa, None),
    };

    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(int_part) || !frac_part.is_none_or(all_digits) {
        return false;
    }
    if int_part.is_empty() && frac_part.is_none_or(str::is_empty) {
        return false;
    }

    match exponent {
        None => true,
        Some(exp) => {
            let digits = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            !digits.is_empty() && all_digits(digits) && frac_part.is_none_or(|f| !f.is_empty())
        }
    }
}
