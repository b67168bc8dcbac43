#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]

//! # ldapschema
//!
//! Parser and semantic resolver for the LDAP schema definition language
//! (RFC 4512).
//!
//! Raw definitions of LDAP syntaxes, matching rules, attribute types and
//! object classes are tokenized, parsed field by field, and inserted into a
//! [`Schema`] registry that indexes every entity by OID and by name. Object
//! class `MUST`/`MAY` clauses are linked to attribute types in both
//! directions, and [`Schema::resolve`] computes inherited attribute sets once
//! every definition is known.
//!
//! Failures come in two tiers: a definition that cannot be parsed returns an
//! [`Error`], while consistency problems (duplicates, dangling references)
//! are appended to a [`SchemaLog`] and parsing carries on.
//!
//! ## Example Usage
//!
//! ```rust
//! use ldapschema::{Schema, SchemaLog};
//!
//! let mut schema = Schema::new();
//! let mut log = SchemaLog::new();
//!
//! schema.parse_attribute_type(&mut log, "( 2.5.4.41 NAME 'name' )").unwrap();
//! schema.parse_attribute_type(&mut log, "( 2.5.4.3 NAME 'cn' SUP name )").unwrap();
//! let person = schema
//!     .parse_object_class(&mut log, "( 2.5.6.6 NAME 'person' MUST cn )")
//!     .unwrap();
//! schema.resolve(&mut log).unwrap();
//!
//! let cn = schema.find_attribute_type("CN").unwrap();
//! assert!(schema.attribute_type(cn).required_by.contains(&person));
//! assert!(log.is_empty());
//! ```

pub mod config;
pub mod ids;
pub mod lexer;
pub mod loader;
pub mod log;
pub mod model;
pub mod parser;
pub mod registry;
pub mod resolver;
pub mod sorted;

pub use config::SchemaConfig;
pub use ids::{AttributeTypeId, MatchingRuleId, ModelRef, ObjectClassId, SyntaxId};
pub use lexer::{Token, TokenKind, tokenize};
pub use loader::{LoadFailure, LoadReport, SchemaLoader};
pub use log::{IssueKind, SchemaIssue, SchemaLog};
pub use model::{
    AttributeType, AttributeUsage, EntityKind, Extension, Flags, MatchingRule, Model, ObjectClass,
    ObjectClassKind, Syntax, SyntaxClass,
};
pub use registry::{Alias, Schema};
pub use resolver::Linked;

use std::collections::TryReserveError;
use thiserror::Error;

/// Fatal errors that abort parsing of a single definition
#[derive(Error, Debug)]
pub enum Error {
    #[error("Out of memory: {0}")]
    OutOfMemory(#[from] TryReserveError),

    #[error("Malformed definition{}: {message}", subject_suffix(.oid))]
    MalformedDefinition {
        oid: Option<String>,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid schema format at line {line}: {message}")]
    InvalidFormat { line: usize, message: String },
}

fn subject_suffix(oid: &Option<String>) -> String {
    oid.as_deref().map(|o| format!(" '{o}'")).unwrap_or_default()
}

/// Error code identifying the category of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    OutOfMemory,
    MalformedDefinition,
    Io,
    InvalidFormat,
}

impl Error {
    /// Build a malformed-definition error without OID context.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDefinition {
            oid: None,
            message: message.into(),
        }
    }

    /// Build a malformed-definition error attributed to an entity.
    pub fn malformed_in(oid: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedDefinition {
            oid: Some(oid.into()),
            message: message.into(),
        }
    }

    /// Error code for this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::OutOfMemory(_) => ErrorKind::OutOfMemory,
            Self::MalformedDefinition { .. } => ErrorKind::MalformedDefinition,
            Self::Io(_) => ErrorKind::Io,
            Self::InvalidFormat { .. } => ErrorKind::InvalidFormat,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
