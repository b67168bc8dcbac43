//! Schema entity model
//!
//! All four entity kinds embed a [`Model`] carrying the fields RFC 4512
//! definitions share. Cross-entity links are arena ids, see [`crate::ids`].

use crate::ids::{AttributeTypeId, MatchingRuleId, ObjectClassId, SyntaxId};
use ldapschema_spec::OidSpec;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Value representation class of a syntax
pub use ldapschema_spec::DataClass as SyntaxClass;

/// Bit flags recorded on a model
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Flags(u32);

impl Flags {
    pub const EMPTY: Self = Self(0);
    /// attributeType: restricted to a single value
    pub const SINGLE_VALUE: Self = Self(0x0001);
    pub const OBSOLETE: Self = Self(0x0002);
    /// attributeType: collective
    pub const COLLECTIVE: Self = Self(0x0004);
    /// attributeType: not user modifiable
    pub const NO_USER_MOD: Self = Self(0x0008);
    /// ldapSyntax: values are human readable
    pub const READABLE: Self = Self(0x0020);
    /// ldapSyntax: ABNF uses the RFC 4512 common productions
    pub const COMMON_ABNF: Self = Self(0x0040);

    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Flags that carry over from a syntax to attribute types using it
    #[must_use]
    pub const fn syntax_inherited(self) -> Self {
        Self(self.0 & (Self::READABLE.0 | Self::COMMON_ABNF.0))
    }
}

impl BitOr for Flags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Discriminant of the entity kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum EntityKind {
    Syntax,
    MatchingRule,
    AttributeType,
    ObjectClass,
}

impl EntityKind {
    /// Name used by RFC 4512 subschema attributes
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Syntax => "ldapSyntax",
            Self::MatchingRule => "matchingRule",
            Self::AttributeType => "attributeType",
            Self::ObjectClass => "objectClass",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vendor extension (`X-...`) attached to a model
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Extension {
    pub tag: String,
    pub values: Vec<String>,
}

/// Fields shared by every entity kind
#[derive(Clone, Debug, Serialize)]
pub struct Model {
    pub kind: EntityKind,
    pub flags: Flags,
    pub oid: String,
    pub desc: Option<String>,
    /// Definition text exactly as supplied
    pub definition: String,
    /// Catalog metadata for well-known OIDs
    pub spec: Option<&'static OidSpec>,
    /// Extensions sorted by tag, unique per model
    pub extensions: Vec<Extension>,
}

impl Model {
    pub(crate) fn new(kind: EntityKind, oid: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            kind,
            flags: Flags::EMPTY,
            oid: oid.into(),
            desc: None,
            definition: definition.into(),
            spec: None,
            extensions: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_obsolete(&self) -> bool {
        self.flags.contains(Flags::OBSOLETE)
    }

    /// Find an extension by tag, ignoring case
    #[must_use]
    pub fn extension(&self, tag: &str) -> Option<&Extension> {
        self.extensions
            .binary_search_by(|ext| crate::sorted::cmp_ignore_case(&ext.tag, tag))
            .ok()
            .map(|idx| &self.extensions[idx])
    }
}

/// LDAP syntax (RFC 4512 4.1.5)
#[derive(Clone, Debug, Serialize)]
pub struct Syntax {
    pub model: Model,
    pub class: SyntaxClass,
    /// Value pattern compiled from catalog metadata
    #[serde(skip)]
    pub pattern: Option<Regex>,
}

impl Syntax {
    /// Check a value against the syntax pattern; `None` when no pattern is known
    #[must_use]
    pub fn is_valid_value(&self, value: &str) -> Option<bool> {
        self.pattern.as_ref().map(|re| re.is_match(value))
    }

    #[must_use]
    pub fn is_human_readable(&self) -> bool {
        self.model.flags.contains(Flags::READABLE)
    }
}

/// Matching rule (RFC 4512 4.1.3)
#[derive(Clone, Debug, Serialize)]
pub struct MatchingRule {
    pub model: Model,
    pub names: Vec<String>,
    /// Assertion syntax OID as declared
    pub syntax_oid: Option<String>,
    pub syntax: Option<SyntaxId>,
}

/// Application of an attribute type
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum AttributeUsage {
    #[default]
    UserApplications,
    DirectoryOperation,
    DistributedOperation,
    DsaOperation,
}

impl AttributeUsage {
    /// Parse the RFC 4512 `usage` production, ignoring case
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        [
            Self::UserApplications,
            Self::DirectoryOperation,
            Self::DistributedOperation,
            Self::DsaOperation,
        ]
        .into_iter()
        .find(|usage| usage.as_str().eq_ignore_ascii_case(keyword))
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UserApplications => "userApplications",
            Self::DirectoryOperation => "directoryOperation",
            Self::DistributedOperation => "distributedOperation",
            Self::DsaOperation => "dSAOperation",
        }
    }

    #[must_use]
    pub const fn is_operational(self) -> bool {
        !matches!(self, Self::UserApplications)
    }
}

impl fmt::Display for AttributeUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attribute type (RFC 4512 4.1.2)
#[derive(Clone, Debug, Serialize)]
pub struct AttributeType {
    pub model: Model,
    pub names: Vec<String>,
    pub usage: AttributeUsage,
    /// Superior type as declared
    pub superior_name: Option<String>,
    pub superior: Option<AttributeTypeId>,
    /// Syntax OID as declared, without the length bound
    pub syntax_oid: Option<String>,
    pub syntax: Option<SyntaxId>,
    /// Suggested minimum upper bound from `SYNTAX oid{n}`
    pub min_upper: Option<u64>,
    pub equality: Option<String>,
    pub ordering: Option<String>,
    pub substr: Option<String>,
    pub equality_rule: Option<MatchingRuleId>,
    pub ordering_rule: Option<MatchingRuleId>,
    pub substr_rule: Option<MatchingRuleId>,
    /// Object classes requiring this attribute, ordered by OID
    pub required_by: Vec<ObjectClassId>,
    /// Object classes allowing this attribute, ordered by OID
    pub allowed_by: Vec<ObjectClassId>,
}

impl AttributeType {
    pub(crate) fn new(model: Model) -> Self {
        Self {
            model,
            names: Vec::new(),
            usage: AttributeUsage::default(),
            superior_name: None,
            superior: None,
            syntax_oid: None,
            syntax: None,
            min_upper: None,
            equality: None,
            ordering: None,
            substr: None,
            equality_rule: None,
            ordering_rule: None,
            substr_rule: None,
            required_by: Vec::new(),
            allowed_by: Vec::new(),
        }
    }

    /// First declared name, or the OID
    #[must_use]
    pub fn primary_name(&self) -> &str {
        self.names.first().map_or(self.model.oid.as_str(), String::as_str)
    }

    #[must_use]
    pub fn is_single_value(&self) -> bool {
        self.model.flags.contains(Flags::SINGLE_VALUE)
    }

    /// `required_by` or `allowed_by`
    #[must_use]
    pub fn classes(&self, required: bool) -> &[ObjectClassId] {
        if required { &self.required_by } else { &self.allowed_by }
    }

    pub(crate) fn classes_mut(&mut self, required: bool) -> &mut Vec<ObjectClassId> {
        if required { &mut self.required_by } else { &mut self.allowed_by }
    }
}

/// Kind of object class
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ObjectClassKind {
    #[default]
    Structural,
    Abstract,
    Auxiliary,
}

impl ObjectClassKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Structural => "STRUCTURAL",
            Self::Abstract => "ABSTRACT",
            Self::Auxiliary => "AUXILIARY",
        }
    }
}

impl fmt::Display for ObjectClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Object class (RFC 4512 4.1.1)
#[derive(Clone, Debug, Serialize)]
pub struct ObjectClass {
    pub model: Model,
    pub kind: ObjectClassKind,
    pub names: Vec<String>,
    /// Superior classes as declared
    pub superior_names: Vec<String>,
    pub superiors: Vec<ObjectClassId>,
    /// Directly required attribute types, ordered by OID
    pub must: Vec<AttributeTypeId>,
    /// Directly allowed attribute types, ordered by OID
    pub may: Vec<AttributeTypeId>,
    /// Required attribute types inherited from superiors
    pub inherited_must: Vec<AttributeTypeId>,
    /// Allowed attribute types inherited from superiors
    pub inherited_may: Vec<AttributeTypeId>,
}

impl ObjectClass {
    pub(crate) fn new(model: Model) -> Self {
        Self {
            model,
            kind: ObjectClassKind::default(),
            names: Vec::new(),
            superior_names: Vec::new(),
            superiors: Vec::new(),
            must: Vec::new(),
            may: Vec::new(),
            inherited_must: Vec::new(),
            inherited_may: Vec::new(),
        }
    }

    /// First declared name, or the OID
    #[must_use]
    pub fn primary_name(&self) -> &str {
        self.names.first().map_or(self.model.oid.as_str(), String::as_str)
    }

    /// One of the four attribute sets
    #[must_use]
    pub fn attributes(&self, required: bool, inherited: bool) -> &[AttributeTypeId] {
        match (required, inherited) {
            (true, false) => &self.must,
            (true, true) => &self.inherited_must,
            (false, false) => &self.may,
            (false, true) => &self.inherited_may,
        }
    }

    pub(crate) fn attributes_mut(&mut self, required: bool, inherited: bool) -> &mut Vec<AttributeTypeId> {
        match (required, inherited) {
            (true, false) => &mut self.must,
            (true, true) => &mut self.inherited_must,
            (false, false) => &mut self.may,
            (false, true) => &mut self.inherited_may,
        }
    }

    /// Direct and inherited required attribute types
    pub fn all_must(&self) -> impl Iterator<Item = AttributeTypeId> + '_ {
        self.must.iter().chain(&self.inherited_must).copied()
    }

    /// Direct and inherited allowed attribute types
    pub fn all_may(&self) -> impl Iterator<Item = AttributeTypeId> + '_ {
        self.may.iter().chain(&self.inherited_may).copied()
    }
}
