//! Relationship resolver
//!
//! [`Schema::link`] pairs an attribute type with an object class in both
//! directions. [`Schema::resolve`] is the post-parse pass that settles
//! everything that depends on definition order: late syntaxes, attribute
//! type and object class superiors, inherited must/may sets and matching
//! rule references.

use crate::ids::{AttributeTypeId, ModelRef, ObjectClassId};
use crate::log::{IssueKind, SchemaLog};
use crate::model::AttributeType;
use crate::registry::Schema;
use crate::Result;
use std::collections::HashSet;
use std::hash::Hash;
use tracing::{debug, info};

/// Outcome of [`Schema::link`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Linked {
    /// Both sides recorded the pair
    Linked,
    /// The pair was already present; nothing changed
    Duplicate,
}

impl Linked {
    #[must_use]
    pub fn is_duplicate(self) -> bool {
        matches!(self, Self::Duplicate)
    }
}

/// Transitive superiors of an entity, nearest first
struct Ancestry<I> {
    ancestors: Vec<I>,
    /// The chain leads back to the starting entity
    cyclic: bool,
}

fn ancestry<I, F>(start: I, mut parents: F) -> Ancestry<I>
where
    I: Copy + Eq + Hash,
    F: FnMut(I) -> Vec<I>,
{
    let mut ancestors = Vec::new();
    let mut visited = HashSet::new();
    let mut cyclic = false;
    let mut queue = std::collections::VecDeque::from(parents(start));

    while let Some(current) = queue.pop_front() {
        if current == start {
            cyclic = true;
            continue;
        }
        if visited.insert(current) {
            ancestors.push(current);
            queue.extend(parents(current));
        }
    }

    Ancestry { ancestors, cyclic }
}

impl Schema {
    /// Link `attr` into the must or may set of `class` and `class` into the
    /// matching `required_by`/`allowed_by` set of `attr`
    ///
    /// With `inherited` the attribute goes into the class's inherited set.
    /// A direct pair is recorded on both sides or on neither: when either
    /// side already holds it, [`Linked::Duplicate`] is returned and nothing
    /// changes. An inherited pair is only a duplicate when the inherited set
    /// already holds it; the attribute side is shared with the direct link
    /// and is left as is when it already lists the class.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfMemory`] when a list cannot grow.
    ///
    /// # Panics
    ///
    /// Panics if either id was not issued by this schema.
    pub fn link(
        &mut self,
        class: ObjectClassId,
        attr: AttributeTypeId,
        required: bool,
        inherited: bool,
    ) -> Result<Linked> {
        let attr_key = |id: AttributeTypeId| (self.attribute_type(id).model.oid.as_str(), id);
        let class_key = |id: ObjectClassId| (self.object_class(id).model.oid.as_str(), id);

        let target = attr_key(attr);
        let Err(class_pos) = self
            .object_class(class)
            .attributes(required, inherited)
            .binary_search_by(|probe| attr_key(*probe).cmp(&target))
        else {
            return Ok(Linked::Duplicate);
        };
        let target = class_key(class);
        let attr_pos = match self
            .attribute_type(attr)
            .classes(required)
            .binary_search_by(|probe| class_key(*probe).cmp(&target))
        {
            Err(pos) => Some(pos),
            // a direct link already put the class on the attribute side
            Ok(_) if inherited => None,
            Ok(_) => return Ok(Linked::Duplicate),
        };

        self.object_classes[class.to_index()]
            .attributes_mut(required, inherited)
            .try_reserve(1)?;
        if let Some(pos) = attr_pos {
            let classes = self.attribute_types[attr.to_index()].classes_mut(required);
            classes.try_reserve(1)?;
            classes.insert(pos, class);
        }
        self.object_classes[class.to_index()]
            .attributes_mut(required, inherited)
            .insert(class_pos, attr);

        debug!(?class, ?attr, required, inherited, "linked");
        Ok(Linked::Linked)
    }

    /// Settle references that depend on definition order
    ///
    /// Runs, in order: syntax reconciliation, attribute type superiors
    /// (with syntax and matching rule inheritance), matching rule
    /// references, and object class superiors with inherited must/may.
    /// Link state is stable across repeated calls; unresolvable references
    /// are recorded in `log` on every call.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfMemory`] when a list cannot grow.
    pub fn resolve(&mut self, log: &mut SchemaLog) -> Result<()> {
        if self.config.reconcile_syntaxes {
            self.reconcile_syntaxes(log);
        }
        self.resolve_attribute_superiors(log);
        self.resolve_matching_rules();
        if self.config.resolve_inheritance {
            self.resolve_object_class_superiors(log)?;
        }

        info!(
            syntaxes = self.syntaxes.len(),
            matching_rules = self.matching_rules.len(),
            attribute_types = self.attribute_types.len(),
            object_classes = self.object_classes.len(),
            issues = log.len(),
            "schema resolved"
        );
        Ok(())
    }

    fn reconcile_syntaxes(&mut self, log: &mut SchemaLog) {
        let have_syntaxes = !self.syntaxes.is_empty();
        for idx in 0..self.attribute_types.len() {
            let attr = &self.attribute_types[idx];
            if attr.syntax.is_some() {
                continue;
            }
            let Some(oid) = attr.syntax_oid.as_deref() else {
                continue;
            };
            match self.find_syntax(oid) {
                Some(syntax) => {
                    let flags = self.syntax(syntax).model.flags.syntax_inherited();
                    let attr = &mut self.attribute_types[idx];
                    attr.syntax = Some(syntax);
                    attr.model.flags |= flags;
                }
                None if have_syntaxes => {
                    let message = format!("SYNTAX references unknown ldapSyntax '{oid}'");
                    log.record(IssueKind::InvalidReference, Some(&attr.model.oid), message);
                }
                None => {}
            }
        }
    }

    fn resolve_attribute_superiors(&mut self, log: &mut SchemaLog) {
        for idx in 0..self.attribute_types.len() {
            let attr = &self.attribute_types[idx];
            let superior = match attr.superior_name.as_deref() {
                None => None,
                Some(name) => {
                    let found = self.find_attribute_type(name);
                    if found.is_none() {
                        let message = format!("SUP references unknown attributeType '{name}'");
                        log.record(IssueKind::InvalidReference, Some(&attr.model.oid), message);
                    }
                    found
                }
            };
            self.attribute_types[idx].superior = superior;
        }

        let ids: Vec<AttributeTypeId> = self.attribute_types().map(|(id, _)| id).collect();
        let mut cyclic = Vec::new();
        for &id in &ids {
            let chain = ancestry(id, |current| {
                self.attribute_types[current.to_index()].superior.into_iter().collect()
            });
            if chain.cyclic {
                log.record(
                    IssueKind::InvalidReference,
                    Some(&self.attribute_type(id).model.oid),
                    "attributeType superior chain is cyclic",
                );
                cyclic.push(id);
                continue;
            }
            self.inherit_from_superiors(id, &chain.ancestors);
        }
        for id in cyclic {
            self.attribute_types[id.to_index()].superior = None;
        }
    }

    /// Copy SYNTAX and matching rules an attribute type leaves undeclared
    /// from its nearest superior that declares them
    fn inherit_from_superiors(&mut self, id: AttributeTypeId, ancestors: &[AttributeTypeId]) {
        let attr = self.attribute_type(id);
        let syntax = match attr.syntax_oid {
            Some(_) => None,
            None => self
                .nearest(ancestors, |a| a.syntax_oid.is_some())
                .map(|a| {
                    let flags = a
                        .syntax
                        .map(|s| self.syntax(s).model.flags.syntax_inherited())
                        .unwrap_or_default();
                    (a.syntax, a.min_upper, flags)
                }),
        };
        let inherit_rule = |own: &Option<String>, field: fn(&AttributeType) -> &Option<String>| {
            if own.is_some() {
                return None;
            }
            self.nearest(ancestors, |a| field(a).is_some())
                .and_then(|a| field(a).clone())
        };
        let equality = inherit_rule(&attr.equality, |a| &a.equality);
        let ordering = inherit_rule(&attr.ordering, |a| &a.ordering);
        let substr = inherit_rule(&attr.substr, |a| &a.substr);

        let attr = &mut self.attribute_types[id.to_index()];
        if let Some((syntax, min_upper, flags)) = syntax {
            attr.syntax = syntax;
            attr.min_upper = attr.min_upper.or(min_upper);
            attr.model.flags |= flags;
        }
        if equality.is_some() {
            attr.equality = equality;
        }
        if ordering.is_some() {
            attr.ordering = ordering;
        }
        if substr.is_some() {
            attr.substr = substr;
        }
    }

    fn nearest(
        &self,
        ancestors: &[AttributeTypeId],
        pick: impl Fn(&AttributeType) -> bool,
    ) -> Option<&AttributeType> {
        ancestors
            .iter()
            .map(|id| self.attribute_type(*id))
            .find(|a| pick(a))
    }

    fn resolve_matching_rules(&mut self) {
        for idx in 0..self.attribute_types.len() {
            let attr = &self.attribute_types[idx];
            let find = |name: &Option<String>| name.as_deref().and_then(|n| self.find_matching_rule(n));
            let (equality, ordering, substr) = (find(&attr.equality), find(&attr.ordering), find(&attr.substr));

            let attr = &mut self.attribute_types[idx];
            attr.equality_rule = equality;
            attr.ordering_rule = ordering;
            attr.substr_rule = substr;
        }
        for idx in 0..self.matching_rules.len() {
            if self.matching_rules[idx].syntax.is_none() {
                let syntax = self.matching_rules[idx]
                    .syntax_oid
                    .as_deref()
                    .and_then(|oid| self.find_syntax(oid));
                self.matching_rules[idx].syntax = syntax;
            }
        }
    }

    fn resolve_object_class_superiors(&mut self, log: &mut SchemaLog) -> Result<()> {
        for idx in 0..self.object_classes.len() {
            let class = &self.object_classes[idx];
            let mut superiors = Vec::with_capacity(class.superior_names.len());
            for name in &class.superior_names {
                match self.find_object_class(name) {
                    Some(id) if !superiors.contains(&id) => superiors.push(id),
                    Some(_) => {}
                    None => log.record(
                        IssueKind::InvalidReference,
                        Some(&class.model.oid),
                        format!("SUP references unknown objectClass '{name}'"),
                    ),
                }
            }
            self.object_classes[idx].superiors = superiors;
        }

        let duplicates: HashSet<ObjectClassId> = self
            .duplicates
            .iter()
            .filter_map(|entity| match entity {
                ModelRef::ObjectClass(id) => Some(*id),
                _ => None,
            })
            .collect();
        let ids: Vec<ObjectClassId> = self
            .object_classes()
            .map(|(id, _)| id)
            .filter(|id| !duplicates.contains(id))
            .collect();

        for id in ids {
            let chain = ancestry(id, |current| self.object_classes[current.to_index()].superiors.clone());
            if chain.cyclic {
                log.record(
                    IssueKind::InvalidReference,
                    Some(&self.object_class(id).model.oid),
                    "objectClass superior chain is cyclic",
                );
                continue;
            }

            for ancestor in chain.ancestors {
                let superior = self.object_class(ancestor);
                let must = superior.must.clone();
                let may = superior.may.clone();
                for attr in must {
                    self.link(id, attr, true, true)?;
                }
                for attr in may {
                    self.link(id, attr, false, true)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema_with(definitions: &[(&str, &str)]) -> (Schema, SchemaLog) {
        let mut schema = Schema::new();
        let mut log = SchemaLog::new();
        for (kind, definition) in definitions {
            match *kind {
                "at" => {
                    schema.parse_attribute_type(&mut log, definition).unwrap();
                }
                "oc" => {
                    schema.parse_object_class(&mut log, definition).unwrap();
                }
                "mr" => {
                    schema.parse_matching_rule(&mut log, definition).unwrap();
                }
                "syn" => {
                    schema.parse_syntax(&mut log, definition).unwrap();
                }
                other => panic!("unknown kind {other}"),
            }
        }
        (schema, log)
    }

    #[test]
    fn test_link_is_symmetric_and_idempotent() {
        let (mut schema, _) = schema_with(&[
            ("at", "( 2.5.4.3 NAME 'cn' )"),
            ("oc", "( 2.5.6.6 NAME 'person' )"),
        ]);
        let cn = schema.find_attribute_type("cn").unwrap();
        let person = schema.find_object_class("person").unwrap();

        assert_eq!(schema.link(person, cn, true, false).unwrap(), Linked::Linked);
        assert_eq!(schema.link(person, cn, true, false).unwrap(), Linked::Duplicate);
        assert_eq!(schema.object_class(person).must, vec![cn]);
        assert_eq!(schema.attribute_type(cn).required_by, vec![person]);
        assert!(schema.attribute_type(cn).allowed_by.is_empty());
    }

    #[test]
    fn test_must_ordered_by_oid() {
        let (schema, log) = schema_with(&[
            ("at", "( 2.5.4.4 NAME 'sn' )"),
            ("at", "( 2.5.4.3 NAME 'cn' )"),
            ("at", "( 2.5.4.35 NAME 'userPassword' )"),
            ("oc", "( 2.5.6.6 NAME 'person' MUST ( sn $ cn $ userPassword ) )"),
        ]);
        let person = schema.object_class(schema.find_object_class("person").unwrap());
        let oids: Vec<_> = person
            .must
            .iter()
            .map(|id| schema.attribute_type(*id).model.oid.as_str())
            .collect();
        assert_eq!(oids, vec!["2.5.4.3", "2.5.4.35", "2.5.4.4"]);
        assert!(log.is_empty());
    }

    #[test]
    fn test_three_level_inheritance() {
        let (mut schema, mut log) = schema_with(&[
            ("at", "( 1.1.1 NAME 'a' )"),
            ("at", "( 1.1.2 NAME 'b' )"),
            ("at", "( 1.1.3 NAME 'c' )"),
            ("at", "( 1.1.4 NAME 'd' )"),
            ("oc", "( 1.2.1 NAME 'grandparent' MUST a MAY d )"),
            ("oc", "( 1.2.2 NAME 'parent' SUP grandparent MUST b )"),
            ("oc", "( 1.2.3 NAME 'child' SUP parent MUST c )"),
        ]);
        schema.resolve(&mut log).unwrap();

        let id = |name| schema.find_attribute_type(name).unwrap();
        let child = schema.find_object_class("child").unwrap();
        let class = schema.object_class(child);
        assert_eq!(class.must, vec![id("c")]);
        assert_eq!(class.inherited_must, vec![id("a"), id("b")]);
        assert_eq!(class.inherited_may, vec![id("d")]);
        assert!(schema.attribute_type(id("a")).required_by.contains(&child));
        assert!(schema.attribute_type(id("d")).allowed_by.contains(&child));

        let before = class.inherited_must.clone();
        schema.resolve(&mut log).unwrap();
        assert_eq!(schema.object_class(child).inherited_must, before);
        assert!(log.is_empty());
    }

    #[test]
    fn test_inherited_attribute_also_declared_directly() {
        let (mut schema, mut log) = schema_with(&[
            ("at", "( 2.5.4.0 NAME 'objectClass' )"),
            ("at", "( 2.5.4.3 NAME 'cn' )"),
            ("at", "( 2.5.4.13 NAME 'description' )"),
            ("oc", "( 2.5.6.0 NAME 'top' ABSTRACT MUST objectClass MAY description )"),
            ("oc", "( 1.2.1 NAME 'middle' SUP top MAY description )"),
            ("oc", "( 1.2.2 NAME 'leaf' SUP middle MUST ( objectClass $ cn ) )"),
        ]);
        schema.resolve(&mut log).unwrap();

        let object_class = schema.find_attribute_type("objectClass").unwrap();
        let cn = schema.find_attribute_type("cn").unwrap();
        let description = schema.find_attribute_type("description").unwrap();
        let leaf = schema.find_object_class("leaf").unwrap();
        let middle = schema.find_object_class("middle").unwrap();

        let class = schema.object_class(leaf);
        assert_eq!(class.must, vec![object_class, cn]);
        assert_eq!(class.inherited_must, vec![object_class]);
        assert_eq!(class.inherited_may, vec![description]);
        assert_eq!(schema.object_class(middle).may, vec![description]);
        assert_eq!(schema.object_class(middle).inherited_may, vec![description]);

        // the attribute side lists each class once
        let required_by = &schema.attribute_type(object_class).required_by;
        assert_eq!(required_by.iter().filter(|c| **c == leaf).count(), 1);
        let allowed_by = &schema.attribute_type(description).allowed_by;
        assert_eq!(allowed_by.iter().filter(|c| **c == middle).count(), 1);
        assert!(allowed_by.contains(&leaf));

        assert_eq!(schema.link(leaf, object_class, true, true).unwrap(), Linked::Duplicate);
        schema.resolve(&mut log).unwrap();
        assert_eq!(schema.object_class(leaf).inherited_must, vec![object_class]);
        assert!(log.is_empty());
    }

    #[test]
    fn test_class_superior_errors() {
        let (mut schema, mut log) = schema_with(&[
            ("oc", "( 1.2.1 NAME 'x' SUP y )"),
            ("oc", "( 1.2.2 NAME 'y' SUP x )"),
            ("oc", "( 1.2.3 NAME 'z' SUP missing )"),
        ]);
        schema.resolve(&mut log).unwrap();
        assert_eq!(log.count(IssueKind::InvalidReference), 3);
        assert_eq!(log.for_subject("1.2.3").count(), 1);
    }

    #[test]
    fn test_attribute_superior_inheritance() {
        let (mut schema, mut log) = schema_with(&[
            ("at", "( 2.5.4.3 NAME 'cn' SUP name )"),
            (
                "at",
                "( 2.5.4.41 NAME 'name' EQUALITY caseIgnoreMatch SYNTAX 1.3.6.1.4.1.1466.115.121.1.15{32768} )",
            ),
            ("mr", "( 2.5.13.2 NAME 'caseIgnoreMatch' SYNTAX 1.3.6.1.4.1.1466.115.121.1.15 )"),
            ("syn", "( 1.3.6.1.4.1.1466.115.121.1.15 DESC 'Directory String' )"),
        ]);
        schema.resolve(&mut log).unwrap();

        let name = schema.find_attribute_type("name").unwrap();
        let cn = schema.attribute_type(schema.find_attribute_type("cn").unwrap());
        let syntax = schema.find_syntax("Directory String");
        assert_eq!(cn.superior, Some(name));
        assert_eq!(cn.syntax, syntax);
        assert_eq!(cn.syntax_oid, None);
        assert_eq!(cn.min_upper, Some(32768));
        assert_eq!(cn.equality_rule, schema.find_matching_rule("caseIgnoreMatch"));
        assert_eq!(schema.attribute_type(name).syntax, syntax);
        assert!(log.is_empty());
    }

    #[test]
    fn test_attribute_superior_cycle() {
        let (mut schema, mut log) = schema_with(&[
            ("at", "( 1.1 NAME 'a' SUP b )"),
            ("at", "( 1.2 NAME 'b' SUP a )"),
        ]);
        schema.resolve(&mut log).unwrap();
        assert_eq!(log.count(IssueKind::InvalidReference), 2);
        let a = schema.find_attribute_type("a").unwrap();
        assert_eq!(schema.attribute_type(a).superior, None);
    }

    #[test]
    fn test_unknown_syntax_only_reported_with_syntaxes() {
        let (mut schema, mut log) = schema_with(&[("at", "( 1.1 NAME 'a' SYNTAX 9.9.9 )")]);
        schema.resolve(&mut log).unwrap();
        assert!(log.is_empty());

        schema
            .parse_syntax(&mut log, "( 1.3.6.1.4.1.1466.115.121.1.15 DESC 'Directory String' )")
            .unwrap();
        schema.resolve(&mut log).unwrap();
        assert_eq!(log.count(IssueKind::InvalidReference), 1);
    }
}
