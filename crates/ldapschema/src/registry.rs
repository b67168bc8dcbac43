//! Schema registry
//!
//! [`Schema`] owns every parsed entity in per-kind arenas and indexes them
//! through sorted tables: a global OID table, and one alias table per kind
//! holding each entity once under its OID and once per declared name.
//!
//! An entity whose OID is already registered is kept in its arena and in
//! the duplicates list for reporting, but it receives no aliases and no
//! relationship links, so lookups keep resolving to the first definition.

use crate::config::SchemaConfig;
use crate::ids::{AttributeTypeId, MatchingRuleId, ModelRef, ObjectClassId, SyntaxId};
use crate::log::{IssueKind, SchemaLog};
use crate::model::{
    AttributeType, EntityKind, Flags, MatchingRule, Model, ObjectClass, Syntax,
};
use crate::parser::{self, ParseContext};
use crate::sorted::{self, Insertion};
use crate::{Error, Result};
use regex::Regex;
use serde::Serialize;
use tracing::debug;

/// Lookup key (OID or name) and the entity it designates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alias<I> {
    pub name: String,
    pub target: I,
}

impl<I> Alias<I> {
    fn new(name: impl Into<String>, target: I) -> Self {
        Self {
            name: name.into(),
            target,
        }
    }
}

/// In-memory LDAP schema
#[derive(Debug, Default)]
pub struct Schema {
    pub(crate) config: SchemaConfig,
    pub(crate) syntaxes: Vec<Syntax>,
    pub(crate) matching_rules: Vec<MatchingRule>,
    pub(crate) attribute_types: Vec<AttributeType>,
    pub(crate) object_classes: Vec<ObjectClass>,
    /// First entity per OID, sorted by OID
    pub(crate) oids: Vec<Alias<ModelRef>>,
    /// Later entities whose OID was already registered
    pub(crate) duplicates: Vec<ModelRef>,
    pub(crate) syntax_aliases: Vec<Alias<SyntaxId>>,
    pub(crate) matching_rule_aliases: Vec<Alias<MatchingRuleId>>,
    pub(crate) attribute_type_aliases: Vec<Alias<AttributeTypeId>>,
    pub(crate) object_class_aliases: Vec<Alias<ObjectClassId>>,
}

impl Schema {
    /// Create an empty schema with the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: SchemaConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Parsing

    /// Parse and register an LDAP syntax definition
    ///
    /// Catalog metadata is attached by OID; when it supplies a value pattern
    /// the pattern is compiled, and a pattern that fails to compile is left
    /// out.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedDefinition`] when the definition cannot be
    /// parsed, leaving the schema unchanged, or [`Error::OutOfMemory`].
    pub fn parse_syntax(
        &mut self,
        log: &mut SchemaLog,
        definition: impl AsRef<[u8]>,
    ) -> Result<SyntaxId> {
        let (mut ctx, model) =
            ParseContext::open(log, self.config, EntityKind::Syntax, definition.as_ref())?;
        let mut syntax = parser::syntax::parse(&mut ctx, model)?;

        if let Some(spec) = syntax.model.spec {
            if spec.human_readable {
                syntax.model.flags |= Flags::READABLE;
            }
            if spec.common_abnf {
                syntax.model.flags |= Flags::COMMON_ABNF;
            }
            syntax.class = spec.class;
            if let Some(source) = spec.re_posix {
                match Regex::new(source) {
                    Ok(pattern) => syntax.pattern = Some(pattern),
                    Err(err) => debug!(oid = %syntax.model.oid, %err, "value pattern not compiled"),
                }
            }
        }

        let id = next_id(&self.syntaxes, SyntaxId::from_index)?;
        let oid = syntax.model.oid.clone();
        let desc = syntax.model.desc.clone();
        let names = desc.as_slice();
        self.reserve(names.len())?;

        let unique = self.insert_oid(log, id.into(), &oid)?;
        sorted::append(&mut self.syntaxes, syntax)?;
        if unique {
            insert_aliases(&mut self.syntax_aliases, log, EntityKind::Syntax, id, &oid, names)?;
        }

        debug!(%oid, ?id, "registered ldapSyntax");
        Ok(id)
    }

    /// Parse and register a matching rule definition
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedDefinition`] when the definition cannot be
    /// parsed, leaving the schema unchanged, or [`Error::OutOfMemory`].
    pub fn parse_matching_rule(
        &mut self,
        log: &mut SchemaLog,
        definition: impl AsRef<[u8]>,
    ) -> Result<MatchingRuleId> {
        let (mut ctx, model) = ParseContext::open(
            log,
            self.config,
            EntityKind::MatchingRule,
            definition.as_ref(),
        )?;
        let mut rule = parser::matching_rule::parse(&mut ctx, model)?;
        rule.syntax = rule
            .syntax_oid
            .as_deref()
            .and_then(|oid| self.find_syntax(oid));

        let id = next_id(&self.matching_rules, MatchingRuleId::from_index)?;
        let oid = rule.model.oid.clone();
        let names = rule.names.clone();
        self.reserve(names.len())?;

        let unique = self.insert_oid(log, id.into(), &oid)?;
        sorted::append(&mut self.matching_rules, rule)?;
        if unique {
            insert_aliases(
                &mut self.matching_rule_aliases,
                log,
                EntityKind::MatchingRule,
                id,
                &oid,
                &names,
            )?;
        }

        debug!(%oid, ?id, "registered matchingRule");
        Ok(id)
    }

    /// Parse and register an attribute type definition
    ///
    /// A `SYNTAX` naming an already registered syntax is resolved at once and
    /// the syntax's readability flags are inherited; otherwise resolution is
    /// left to [`Schema::resolve`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedDefinition`] when the definition cannot be
    /// parsed, leaving the schema unchanged, or [`Error::OutOfMemory`].
    pub fn parse_attribute_type(
        &mut self,
        log: &mut SchemaLog,
        definition: impl AsRef<[u8]>,
    ) -> Result<AttributeTypeId> {
        let (mut ctx, model) = ParseContext::open(
            log,
            self.config,
            EntityKind::AttributeType,
            definition.as_ref(),
        )?;
        let mut attr = parser::attribute_type::parse(&mut ctx, model)?;
        let syntax = attr.syntax_oid.as_deref().and_then(|oid| self.find_syntax(oid));
        if let Some(syntax) = syntax {
            attr.syntax = Some(syntax);
            attr.model.flags |= self.syntax(syntax).model.flags.syntax_inherited();
        }

        let id = next_id(&self.attribute_types, AttributeTypeId::from_index)?;
        let oid = attr.model.oid.clone();
        let names = attr.names.clone();
        self.reserve(names.len())?;

        let unique = self.insert_oid(log, id.into(), &oid)?;
        sorted::append(&mut self.attribute_types, attr)?;
        if unique {
            insert_aliases(
                &mut self.attribute_type_aliases,
                log,
                EntityKind::AttributeType,
                id,
                &oid,
                &names,
            )?;
        }

        debug!(%oid, ?id, "registered attributeType");
        Ok(id)
    }

    /// Parse and register an object class definition
    ///
    /// Every `MUST`/`MAY` name is looked up among the registered attribute
    /// types and linked in both directions. Unknown names are logged as
    /// [`IssueKind::InvalidReference`] and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedDefinition`] when the definition cannot be
    /// parsed, leaving the schema unchanged, or [`Error::OutOfMemory`].
    pub fn parse_object_class(
        &mut self,
        log: &mut SchemaLog,
        definition: impl AsRef<[u8]>,
    ) -> Result<ObjectClassId> {
        let (mut ctx, model) = ParseContext::open(
            log,
            self.config,
            EntityKind::ObjectClass,
            definition.as_ref(),
        )?;
        let draft = parser::object_class::parse(&mut ctx, model)?;

        let id = next_id(&self.object_classes, ObjectClassId::from_index)?;
        let oid = draft.class.model.oid.clone();
        let names = draft.class.names.clone();
        self.reserve(names.len())?;

        let unique = self.insert_oid(log, id.into(), &oid)?;
        sorted::append(&mut self.object_classes, draft.class)?;
        if !unique {
            debug!(%oid, ?id, "registered duplicate objectClass");
            return Ok(id);
        }
        insert_aliases(
            &mut self.object_class_aliases,
            log,
            EntityKind::ObjectClass,
            id,
            &oid,
            &names,
        )?;

        for (field, required, attrs) in [("MUST", true, &draft.must), ("MAY", false, &draft.may)] {
            for name in attrs {
                let Some(attr) = self.find_attribute_type(name) else {
                    log.record(
                        IssueKind::InvalidReference,
                        Some(&oid),
                        format!("'{field}' contains invalid attributeType '{name}'"),
                    );
                    continue;
                };
                if self.link(id, attr, required, false)?.is_duplicate() {
                    log.record(
                        IssueKind::DuplicateRelationship,
                        Some(&oid),
                        format!("'{field}' contains duplicate attributeType '{name}'"),
                    );
                }
            }
        }

        debug!(%oid, ?id, "registered objectClass");
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Access by id

    /// # Panics
    ///
    /// Panics if `id` was not issued by this schema.
    #[must_use]
    pub fn syntax(&self, id: SyntaxId) -> &Syntax {
        &self.syntaxes[id.to_index()]
    }

    /// # Panics
    ///
    /// Panics if `id` was not issued by this schema.
    #[must_use]
    pub fn matching_rule(&self, id: MatchingRuleId) -> &MatchingRule {
        &self.matching_rules[id.to_index()]
    }

    /// # Panics
    ///
    /// Panics if `id` was not issued by this schema.
    #[must_use]
    pub fn attribute_type(&self, id: AttributeTypeId) -> &AttributeType {
        &self.attribute_types[id.to_index()]
    }

    /// # Panics
    ///
    /// Panics if `id` was not issued by this schema.
    #[must_use]
    pub fn object_class(&self, id: ObjectClassId) -> &ObjectClass {
        &self.object_classes[id.to_index()]
    }

    /// Base model of any entity
    #[must_use]
    pub fn model(&self, entity: ModelRef) -> &Model {
        match entity {
            ModelRef::Syntax(id) => &self.syntax(id).model,
            ModelRef::MatchingRule(id) => &self.matching_rule(id).model,
            ModelRef::AttributeType(id) => &self.attribute_type(id).model,
            ModelRef::ObjectClass(id) => &self.object_class(id).model,
        }
    }

    // ------------------------------------------------------------------
    // Lookup

    /// Entity registered under `oid` (the first one, for duplicated OIDs)
    #[must_use]
    pub fn by_oid(&self, oid: &str) -> Option<ModelRef> {
        sorted::find(&self.oids, |entry| sorted::cmp_oids(&entry.name, oid)).map(|e| e.target)
    }

    /// Syntax by OID or description, ignoring case
    #[must_use]
    pub fn find_syntax(&self, name: &str) -> Option<SyntaxId> {
        find_alias(&self.syntax_aliases, name)
    }

    /// Matching rule by OID or name, ignoring case
    #[must_use]
    pub fn find_matching_rule(&self, name: &str) -> Option<MatchingRuleId> {
        find_alias(&self.matching_rule_aliases, name)
    }

    /// Attribute type by OID or name, ignoring case
    #[must_use]
    pub fn find_attribute_type(&self, name: &str) -> Option<AttributeTypeId> {
        find_alias(&self.attribute_type_aliases, name)
    }

    /// Object class by OID or name, ignoring case
    #[must_use]
    pub fn find_object_class(&self, name: &str) -> Option<ObjectClassId> {
        find_alias(&self.object_class_aliases, name)
    }

    /// Entity of any kind by OID or name
    ///
    /// Kinds are tried in the order attribute type, object class, matching
    /// rule, syntax.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<ModelRef> {
        self.by_oid(name)
            .or_else(|| self.find_attribute_type(name).map(ModelRef::from))
            .or_else(|| self.find_object_class(name).map(ModelRef::from))
            .or_else(|| self.find_matching_rule(name).map(ModelRef::from))
            .or_else(|| self.find_syntax(name).map(ModelRef::from))
    }

    // ------------------------------------------------------------------
    // Iteration

    /// Registered entities in OID order, duplicates excluded
    pub fn models(&self) -> impl Iterator<Item = ModelRef> + '_ {
        self.oids.iter().map(|entry| entry.target)
    }

    /// Entities whose OID was already registered, in parse order
    #[must_use]
    pub fn duplicates(&self) -> &[ModelRef] {
        &self.duplicates
    }

    pub fn syntaxes(&self) -> impl Iterator<Item = (SyntaxId, &Syntax)> + '_ {
        enumerate(&self.syntaxes, SyntaxId::from_index)
    }

    pub fn matching_rules(&self) -> impl Iterator<Item = (MatchingRuleId, &MatchingRule)> + '_ {
        enumerate(&self.matching_rules, MatchingRuleId::from_index)
    }

    pub fn attribute_types(&self) -> impl Iterator<Item = (AttributeTypeId, &AttributeType)> + '_ {
        enumerate(&self.attribute_types, AttributeTypeId::from_index)
    }

    pub fn object_classes(&self) -> impl Iterator<Item = (ObjectClassId, &ObjectClass)> + '_ {
        enumerate(&self.object_classes, ObjectClassId::from_index)
    }

    /// Alias table of a kind, sorted case-insensitively
    #[must_use]
    pub fn attribute_type_aliases(&self) -> &[Alias<AttributeTypeId>] {
        &self.attribute_type_aliases
    }

    #[must_use]
    pub fn object_class_aliases(&self) -> &[Alias<ObjectClassId>] {
        &self.object_class_aliases
    }

    /// Number of entities of one kind, duplicates included
    #[must_use]
    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Syntax => self.syntaxes.len(),
            EntityKind::MatchingRule => self.matching_rules.len(),
            EntityKind::AttributeType => self.attribute_types.len(),
            EntityKind::ObjectClass => self.object_classes.len(),
        }
    }

    /// Number of entities of all kinds, duplicates included
    #[must_use]
    pub fn len(&self) -> usize {
        self.syntaxes.len()
            + self.matching_rules.len()
            + self.attribute_types.len()
            + self.object_classes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ------------------------------------------------------------------
    // Internals

    /// Reserve room for one entity with `names` aliases beyond its OID
    fn reserve(&mut self, names: usize) -> Result<()> {
        self.oids.try_reserve(1)?;
        self.duplicates.try_reserve(1)?;
        self.syntaxes.try_reserve(1)?;
        self.matching_rules.try_reserve(1)?;
        self.attribute_types.try_reserve(1)?;
        self.object_classes.try_reserve(1)?;
        self.syntax_aliases.try_reserve(names + 1)?;
        self.matching_rule_aliases.try_reserve(names + 1)?;
        self.attribute_type_aliases.try_reserve(names + 1)?;
        self.object_class_aliases.try_reserve(names + 1)?;
        Ok(())
    }

    /// Insert into the OID table; returns false when the OID is taken
    fn insert_oid(&mut self, log: &mut SchemaLog, target: ModelRef, oid: &str) -> Result<bool> {
        let entry = Alias::new(oid, target);
        match sorted::insert(&mut self.oids, entry, |a, b| sorted::cmp_oids(&a.name, &b.name))? {
            Insertion::Inserted(_) => Ok(true),
            Insertion::Duplicate(_) => {
                log.record(
                    IssueKind::DuplicateEntity,
                    Some(oid),
                    format!("definition defines duplicate OID '{oid}'"),
                );
                sorted::append(&mut self.duplicates, target)?;
                Ok(false)
            }
        }
    }
}

fn next_id<T, I>(arena: &[T], from_index: fn(usize) -> Option<I>) -> Result<I> {
    from_index(arena.len()).ok_or_else(|| Error::malformed("schema holds too many definitions"))
}

fn enumerate<'a, T, I: 'a>(
    arena: &'a [T],
    from_index: fn(usize) -> Option<I>,
) -> impl Iterator<Item = (I, &'a T)> + 'a {
    arena
        .iter()
        .enumerate()
        .filter_map(move |(idx, item)| from_index(idx).map(|id| (id, item)))
}

fn find_alias<I: Copy>(aliases: &[Alias<I>], name: &str) -> Option<I> {
    sorted::find(aliases, |alias| sorted::cmp_ignore_case(&alias.name, name)).map(|a| a.target)
}

/// Register `target` under its OID and each name; collisions are logged only
fn insert_aliases<I: Copy>(
    aliases: &mut Vec<Alias<I>>,
    log: &mut SchemaLog,
    kind: EntityKind,
    target: I,
    oid: &str,
    names: &[String],
) -> Result<()> {
    let keys = std::iter::once(("oid", oid)).chain(names.iter().map(|n| ("name", n.as_str())));
    for (label, key) in keys {
        let insertion = sorted::insert(aliases, Alias::new(key, target), |a, b| {
            sorted::cmp_ignore_case(&a.name, &b.name)
        })?;
        if insertion.is_duplicate() {
            log.record(
                IssueKind::DuplicateEntity,
                Some(oid),
                format!("{kind} with duplicate {label} '{key}' found"),
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    const DSTRING: &str = "( 1.3.6.1.4.1.1466.115.121.1.15 DESC 'Directory String' )";

    #[test]
    fn test_syntax_gets_catalog_metadata() {
        let mut schema = Schema::new();
        let mut log = SchemaLog::new();
        let id = schema.parse_syntax(&mut log, DSTRING).unwrap();

        let syntax = schema.syntax(id);
        assert!(syntax.model.spec.is_some());
        assert!(syntax.is_human_readable());
        assert_eq!(syntax.is_valid_value("hello"), Some(true));
        assert_eq!(syntax.is_valid_value(""), Some(false));
        assert_eq!(schema.find_syntax("directory string"), Some(id));
        assert_eq!(schema.find_syntax("1.3.6.1.4.1.1466.115.121.1.15"), Some(id));
    }

    #[test]
    fn test_unknown_syntax_has_no_pattern() {
        let mut schema = Schema::new();
        let mut log = SchemaLog::new();
        let id = schema.parse_syntax(&mut log, "( 1.2.3.4 DESC 'Private' )").unwrap();
        assert!(schema.syntax(id).model.spec.is_none());
        assert_eq!(schema.syntax(id).is_valid_value("x"), None);
    }

    #[test]
    fn test_attribute_inherits_syntax_flags() {
        let mut schema = Schema::new();
        let mut log = SchemaLog::new();
        let syntax = schema.parse_syntax(&mut log, DSTRING).unwrap();
        let attr = schema
            .parse_attribute_type(
                &mut log,
                "( 2.5.4.41 NAME 'name' SYNTAX 1.3.6.1.4.1.1466.115.121.1.15{32768} )",
            )
            .unwrap();

        let attr = schema.attribute_type(attr);
        assert_eq!(attr.syntax, Some(syntax));
        assert_eq!(attr.min_upper, Some(32768));
        assert!(attr.model.flags.contains(Flags::READABLE));
        assert!(log.is_empty());
    }

    #[test]
    fn test_lookup_by_oid_and_name() {
        let mut schema = Schema::new();
        let mut log = SchemaLog::new();
        let cn = schema
            .parse_attribute_type(&mut log, "( 2.5.4.3 NAME ( 'cn' 'commonName' ) )")
            .unwrap();

        assert_eq!(schema.find_attribute_type("CommonName"), Some(cn));
        assert_eq!(schema.find_attribute_type("2.5.4.3"), Some(cn));
        assert_eq!(schema.by_oid("2.5.4.3"), Some(ModelRef::AttributeType(cn)));
        assert_eq!(schema.find("cn"), Some(ModelRef::AttributeType(cn)));
        assert_eq!(schema.find_object_class("cn"), None);
        assert_eq!(schema.attribute_type_aliases().len(), 3);
    }

    #[test]
    fn test_duplicate_oid_logged_once() {
        let mut schema = Schema::new();
        let mut log = SchemaLog::new();
        let definition = "( 2.5.4.3 NAME 'cn' DESC 'Common Name' )";
        let first = schema.parse_attribute_type(&mut log, definition).unwrap();
        let second = schema.parse_attribute_type(&mut log, definition).unwrap();

        assert_ne!(first, second);
        assert_eq!(log.len(), 1);
        assert_eq!(log.count(IssueKind::DuplicateEntity), 1);
        assert_eq!(schema.find_attribute_type("cn"), Some(first));
        assert_eq!(schema.duplicates(), &[ModelRef::AttributeType(second)]);
        assert_eq!(schema.models().count(), 1);
        assert_eq!(schema.count(EntityKind::AttributeType), 2);
    }

    #[test]
    fn test_name_collision_does_not_block() {
        let mut schema = Schema::new();
        let mut log = SchemaLog::new();
        schema.parse_attribute_type(&mut log, "( 1.1 NAME 'x' )").unwrap();
        let second = schema.parse_attribute_type(&mut log, "( 1.2 NAME 'X' )").unwrap();

        assert_eq!(log.count(IssueKind::DuplicateEntity), 1);
        assert_eq!(schema.find_attribute_type("1.2"), Some(second));
        assert_eq!(schema.models().count(), 2);
    }

    #[test]
    fn test_models_in_oid_order() {
        let mut schema = Schema::new();
        let mut log = SchemaLog::new();
        schema.parse_object_class(&mut log, "( 2.5.6.0 NAME 'top' ABSTRACT )").unwrap();
        schema.parse_attribute_type(&mut log, "( 2.5.4.3 NAME 'cn' )").unwrap();
        schema.parse_syntax(&mut log, DSTRING).unwrap();

        let oids: Vec<_> = schema.models().map(|m| schema.model(m).oid.as_str()).collect();
        assert_eq!(oids, vec!["1.3.6.1.4.1.1466.115.121.1.15", "2.5.4.3", "2.5.6.0"]);
    }

    #[test]
    fn test_malformed_leaves_schema_unchanged() {
        let mut schema = Schema::new();
        let mut log = SchemaLog::new();
        for bad in ["( 2.5.4.3 NAME 'cn'", "( 2.5.4.3 NAME 'cn )", "( 2.5.4.3 BOGUS )"] {
            let err = schema.parse_attribute_type(&mut log, bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedDefinition);
        }
        assert!(schema.is_empty());
        assert!(schema.find_attribute_type("cn").is_none());
    }
}
