//! Keyword-driven field parsers
//!
//! Every parse starts by opening a [`ParseContext`] on the raw definition:
//! the envelope is checked, the text tokenized and token 0 taken as the OID.
//! The per-kind parsers then walk the remaining tokens, dispatching on
//! keywords. Nothing is inserted into a registry here; a parser either
//! returns a complete entity or a fatal [`Error`].

pub mod attribute_type;
pub mod matching_rule;
pub mod object_class;
pub mod syntax;

use crate::config::SchemaConfig;
use crate::lexer::{self, Token};
use crate::log::{IssueKind, SchemaLog};
use crate::model::{EntityKind, Extension, Model};
use crate::sorted::{self, Insertion};
use crate::{Error, Result};
use tracing::trace;

/// Token cursor and log handle for the definition being parsed
pub struct ParseContext<'a> {
    log: &'a mut SchemaLog,
    config: SchemaConfig,
    tokens: Vec<Token>,
    pos: usize,
    oid: String,
}

impl<'a> ParseContext<'a> {
    /// Tokenize `definition` and build the entity's base model
    ///
    /// # Errors
    ///
    /// Fails with [`Error::MalformedDefinition`] when the input is not UTF-8,
    /// the envelope is malformed, a segment is unterminated or the OID is
    /// missing. An envelope failure is also recorded in `log`.
    pub fn open(
        log: &'a mut SchemaLog,
        config: SchemaConfig,
        kind: EntityKind,
        definition: &[u8],
    ) -> Result<(Self, Model)> {
        let text = std::str::from_utf8(definition)
            .map_err(|err| Error::malformed(format!("definition is not valid UTF-8: {err}")))?;

        if let Err(err) = lexer::envelope(text) {
            log.record(
                IssueKind::MalformedDefinition,
                None,
                format!("invalid {kind} definition syntax: {}", text.trim()),
            );
            return Err(err);
        }

        let mut tokens = lexer::tokenize(text)?.into_iter();
        let oid = match tokens.next() {
            Some(token) if token.kind == lexer::TokenKind::Bare => token.text,
            Some(token) => {
                return Err(Error::malformed(format!(
                    "expected OID, found '{}'",
                    token.text
                )));
            }
            None => return Err(Error::malformed("definition is missing its OID")),
        };
        trace!(%kind, %oid, "parsing definition");

        let mut model = Model::new(kind, oid.clone(), text);
        model.spec = ldapschema_spec::lookup(&oid);
        let ctx = Self {
            log,
            config,
            tokens: tokens.collect(),
            pos: 0,
            oid,
        };
        Ok((ctx, model))
    }

    #[must_use]
    pub fn oid(&self) -> &str {
        &self.oid
    }

    #[must_use]
    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    /// Next keyword token, if any remain
    pub fn next_keyword(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned()?;
        self.pos += 1;
        trace!(oid = %self.oid, keyword = %token.text, "keyword");
        Some(token)
    }

    /// Consume the argument of `keyword`
    ///
    /// # Errors
    ///
    /// Fails when the definition ends after the keyword.
    pub fn argument(&mut self, keyword: &Token) -> Result<Token> {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or_else(|| self.malformed(format!("'{}' is missing its argument", keyword.text)))?;
        self.pos += 1;
        Ok(token)
    }

    /// Consume a single-valued argument (`qdstring`, `oid`, `woid`)
    ///
    /// # Errors
    ///
    /// Fails when the argument is missing or is a group.
    pub fn scalar(&mut self, keyword: &Token) -> Result<String> {
        let token = self.argument(keyword)?;
        if token.is_group() {
            return Err(self.malformed(format!(
                "'{}' expects a single value, found '{}'",
                keyword.text, token.text
            )));
        }
        Ok(token.text)
    }

    /// Consume a `qdescrs` argument: one name or a parenthesized list of names
    ///
    /// # Errors
    ///
    /// Fails when the argument is missing or the list is malformed.
    pub fn names(&mut self, keyword: &Token) -> Result<Vec<String>> {
        let token = self.argument(keyword)?;
        let items = self.group_items(&token)?;
        Ok(items
            .into_iter()
            .filter(|item| item.text != "$")
            .map(|item| item.text)
            .collect())
    }

    /// Consume an `oids` argument: one OID or a `$` separated list
    ///
    /// A separator other than `$` is recorded as [`IssueKind::InvalidDelimiter`]
    /// and skipped.
    ///
    /// # Errors
    ///
    /// Fails when the argument is missing or the list is malformed.
    pub fn oids(&mut self, keyword: &Token) -> Result<Vec<String>> {
        let token = self.argument(keyword)?;
        let items = self.group_items(&token)?;
        let mut oids = Vec::with_capacity(items.len().div_ceil(2));
        for (idx, item) in items.into_iter().enumerate() {
            if idx % 2 == 0 {
                oids.push(item.text);
            } else if item.text != "$" {
                self.record(
                    IssueKind::InvalidDelimiter,
                    format!("'{}' contains invalid delimiter '{}'", keyword.text, item.text),
                );
            }
        }
        Ok(oids)
    }

    /// Parse an `X-` extension starting at `tag` into `model`
    ///
    /// # Errors
    ///
    /// Fails when the extension value is missing or malformed, or on
    /// allocation failure.
    pub fn extension(&mut self, model: &mut Model, tag: &Token) -> Result<()> {
        let value = self.argument(tag)?;
        let values = self
            .group_items(&value)?
            .into_iter()
            .map(|item| item.text)
            .collect();
        let extension = Extension {
            tag: tag.text.clone(),
            values,
        };

        let insertion = sorted::insert(&mut model.extensions, extension, |a, b| {
            sorted::cmp_ignore_case(&a.tag, &b.tag)
        })?;
        if let Insertion::Duplicate(_) = insertion {
            self.record(
                IssueKind::DuplicateExtension,
                format!("definition contains duplicate extension '{}'", tag.text),
            );
        }
        Ok(())
    }

    /// Record a recoverable issue against the entity being parsed
    pub fn record(&mut self, kind: IssueKind, message: impl Into<String>) {
        self.log.record(kind, Some(&self.oid), message);
    }

    /// Fatal error attributed to the entity being parsed
    #[must_use]
    pub fn malformed(&self, message: impl Into<String>) -> Error {
        Error::malformed_in(self.oid.clone(), message)
    }

    /// Fatal error for a keyword not valid for the entity kind
    ///
    /// The term is also recorded as [`IssueKind::MalformedDefinition`] so it
    /// shows up in the schema report.
    #[must_use]
    pub fn unknown(&mut self, token: &Token) -> Error {
        let message = format!("invalid term '{}' in definition", token.text);
        self.record(IssueKind::MalformedDefinition, message.clone());
        self.malformed(message)
    }

    fn group_items(&self, token: &Token) -> Result<Vec<Token>> {
        token.group_items().map_err(|err| match err {
            Error::MalformedDefinition { oid: None, message } => self.malformed(message),
            other => other,
        })
    }
}
