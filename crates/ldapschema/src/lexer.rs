//! Definition tokenizer
//!
//! An RFC 4512 definition is an envelope `( ... )` holding whitespace
//! separated segments. Quoted segments (`'...'`) are emitted without their
//! quotes; grouped segments (`( ... )`) are emitted with their parentheses so
//! list arguments stay distinguishable from scalars and can be re-tokenized
//! with [`Token::group_items`].
//!
//! Scanning is deliberately non-nesting: the envelope is the first `(` and
//! the last `)` of the input, and a group ends at the first `)` after it.

use crate::{Error, Result, sorted};
use std::fmt;
use tracing::trace;

/// Segment type of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Keyword, OID or unquoted value
    Bare,
    /// Quoted string, quotes stripped
    Quoted,
    /// Parenthesized list, parentheses kept
    Group,
}

/// One segment of a definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(text: impl Into<String>, kind: TokenKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn is_group(&self) -> bool {
        self.kind == TokenKind::Group
    }

    /// Case-insensitive match against a keyword; quoted text never matches
    #[must_use]
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Bare && self.text.eq_ignore_ascii_case(keyword)
    }

    /// Whether the token opens a vendor extension (`X-...`)
    #[must_use]
    pub fn is_extension(&self) -> bool {
        self.kind == TokenKind::Bare
            && self.text.len() > 2
            && self.text.as_bytes()[..2].eq_ignore_ascii_case(b"X-")
    }

    /// Tokens inside a group; a scalar token yields itself
    ///
    /// # Errors
    ///
    /// Fails with [`Error::MalformedDefinition`] on an unterminated quote
    /// inside the group.
    pub fn group_items(&self) -> Result<Vec<Token>> {
        if !self.is_group() {
            return Ok(vec![self.clone()]);
        }
        let inner = self
            .text
            .strip_prefix('(')
            .and_then(|t| t.strip_suffix(')'))
            .unwrap_or(&self.text);
        scan(inner)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Quoted => write!(f, "'{}'", self.text),
            TokenKind::Bare | TokenKind::Group => f.write_str(&self.text),
        }
    }
}

/// Locate the `( ... )` envelope and return the text between the delimiters
///
/// # Errors
///
/// Fails with [`Error::MalformedDefinition`] when either delimiter is
/// missing or the closing one does not follow the opening one.
pub fn envelope(definition: &str) -> Result<&str> {
    let open = definition
        .find('(')
        .ok_or_else(|| Error::malformed("missing opening '('"))?;
    let close = definition
        .rfind(')')
        .ok_or_else(|| Error::malformed("missing closing ')'"))?;
    if close <= open {
        return Err(Error::malformed("closing ')' precedes opening '('"));
    }
    Ok(&definition[open + 1..close])
}

/// Split a definition into tokens
///
/// # Errors
///
/// Fails with [`Error::MalformedDefinition`] on a bad envelope or an
/// unterminated quoted string or group, and with [`Error::OutOfMemory`] when
/// the token list cannot grow.
pub fn tokenize(definition: &str) -> Result<Vec<Token>> {
    scan(envelope(definition)?)
}

fn scan(body: &str) -> Result<Vec<Token>> {
    let bytes = body.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let byte = bytes[pos];
        if byte.is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        let (token, next) = match byte {
            b'\'' => {
                let end = closing_quote(bytes, pos + 1).ok_or_else(|| {
                    Error::malformed(format!("unterminated quoted string at offset {pos}"))
                })?;
                (Token::new(&body[pos + 1..end], TokenKind::Quoted), end + 1)
            }
            b'(' => {
                let end = bytes[pos + 1..]
                    .iter()
                    .position(|&b| b == b')')
                    .map(|offset| pos + 1 + offset)
                    .ok_or_else(|| {
                        Error::malformed(format!("unterminated group at offset {pos}"))
                    })?;
                (Token::new(&body[pos..=end], TokenKind::Group), end + 1)
            }
            _ => {
                let end = bytes[pos..]
                    .iter()
                    .position(u8::is_ascii_whitespace)
                    .map_or(bytes.len(), |offset| pos + offset);
                (Token::new(&body[pos..end], TokenKind::Bare), end)
            }
        };

        trace!(kind = ?token.kind, text = %token.text, "token");
        sorted::append(&mut tokens, token)?;
        pos = next;
    }

    Ok(tokens)
}

/// Index of the first `'` at or after `start` not escaped by a backslash
///
/// A quote preceded by an even run of backslashes (`\\'`) still closes.
fn closing_quote(bytes: &[u8], start: usize) -> Option<usize> {
    (start..bytes.len()).find(|&idx| {
        bytes[idx] == b'\''
            && bytes[start..idx].iter().rev().take_while(|&&b| b == b'\\').count() % 2 == 0
    })
}
