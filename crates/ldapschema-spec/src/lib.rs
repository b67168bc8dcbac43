#![deny(rust_2018_idioms)]
#![warn(clippy::all)]

//! # ldapschema-spec
//!
//! Read-only catalog of descriptive metadata for well-known LDAP schema OIDs.
//!
//! The catalog is compiled ahead of time and kept sorted by OID so a lookup
//! is a binary search. Entries describe LDAP syntaxes (data class,
//! human-readability, ABNF, an optional value pattern) and a handful of
//! standard matching rules, attribute types and object classes.
//!
//! ```rust
//! let spec = ldapschema_spec::lookup("1.3.6.1.4.1.1466.115.121.1.7").unwrap();
//! assert_eq!(spec.name, Some("Boolean"));
//! assert!(spec.human_readable);
//! ```

mod catalog;

use serde::Serialize;

/// Kind of schema element an OID specification describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SpecKind {
    Syntax,
    MatchingRule,
    AttributeType,
    ObjectClass,
}

/// Representation class of values using a syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum DataClass {
    #[default]
    Unknown,
    Ascii,
    Utf8,
    Integer,
    Unsigned,
    Boolean,
    Data,
    Image,
    Audio,
    Utf8MultiLine,
}

/// Static description of a well-known OID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OidSpec {
    /// Dotted-decimal object identifier
    pub oid: &'static str,
    /// Short name or descriptor
    pub name: Option<&'static str>,
    /// Human-readable description
    pub desc: Option<&'static str>,
    /// Kind of schema element
    pub kind: SpecKind,
    /// Data class of values (syntaxes only)
    pub class: DataClass,
    /// Values are human readable
    pub human_readable: bool,
    /// ABNF is built from the common productions of RFC 4512
    pub common_abnf: bool,
    /// ABNF grammar text
    pub abnf: Option<&'static str>,
    /// POSIX extended regular expression matching valid values
    pub re_posix: Option<&'static str>,
    /// Defining document
    pub spec: Option<&'static str>,
    /// Section of the defining document
    pub spec_section: Option<&'static str>,
    /// Example values
    pub examples: &'static [&'static str],
}

impl OidSpec {
    pub(crate) const EMPTY: Self = Self {
        oid: "",
        name: None,
        desc: None,
        kind: SpecKind::Syntax,
        class: DataClass::Unknown,
        human_readable: false,
        common_abnf: false,
        abnf: None,
        re_posix: None,
        spec: None,
        spec_section: None,
        examples: &[],
    };
}

/// Strip whitespace and single quotes surrounding an OID
#[must_use]
pub fn normalize_oid(oid: &str) -> &str {
    oid.trim().trim_matches('\'').trim()
}

/// Find the specification for an OID
#[must_use]
pub fn lookup(oid: &str) -> Option<&'static OidSpec> {
    let oid = normalize_oid(oid);
    catalog::OIDSPECS
        .binary_search_by(|spec| spec.oid.cmp(oid))
        .ok()
        .map(|idx| &catalog::OIDSPECS[idx])
}

/// All catalog entries in OID order
#[must_use]
pub fn all() -> &'static [OidSpec] {
    catalog::OIDSPECS
}
