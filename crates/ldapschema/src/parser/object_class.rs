//! ObjectClassDescription (RFC 4512 4.1.1)

use super::ParseContext;
use crate::Result;
use crate::log::IssueKind;
use crate::model::{Flags, Model, ObjectClass, ObjectClassKind};

/// Parsed object class whose `MUST`/`MAY` names are not yet linked
#[derive(Debug, Clone)]
pub struct ObjectClassDraft {
    pub class: ObjectClass,
    /// Attribute names from `MUST`, in declaration order
    pub must: Vec<String>,
    /// Attribute names from `MAY`, in declaration order
    pub may: Vec<String>,
}

/// Parse the fields of an object class
///
/// # Errors
///
/// Fails on an unknown keyword or a missing argument.
pub fn parse(ctx: &mut ParseContext<'_>, model: Model) -> Result<ObjectClassDraft> {
    let mut class = ObjectClass::new(model);
    let mut must: Option<Vec<String>> = None;
    let mut may: Option<Vec<String>> = None;

    while let Some(keyword) = ctx.next_keyword() {
        if keyword.is_extension() {
            ctx.extension(&mut class.model, &keyword)?;
        } else if keyword.is_keyword("NAME") {
            class.names = ctx.names(&keyword)?;
        } else if keyword.is_keyword("DESC") {
            class.model.desc = Some(ctx.scalar(&keyword)?);
        } else if keyword.is_keyword("OBSOLETE") {
            class.model.flags |= Flags::OBSOLETE;
        } else if keyword.is_keyword("SUP") {
            class.superior_names = ctx.oids(&keyword)?;
        } else if keyword.is_keyword("ABSTRACT") {
            class.kind = ObjectClassKind::Abstract;
        } else if keyword.is_keyword("STRUCTURAL") {
            class.kind = ObjectClassKind::Structural;
        } else if keyword.is_keyword("AUXILIARY") {
            class.kind = auxiliary_kind(ctx);
        } else if keyword.is_keyword("MUST") || keyword.is_keyword("MAY") {
            let names = ctx.oids(&keyword)?;
            let slot = if keyword.is_keyword("MUST") { &mut must } else { &mut may };
            if slot.is_some() {
                ctx.record(
                    IssueKind::DuplicateRelationship,
                    format!("definition contains duplicate '{}'", keyword.text),
                );
            } else {
                *slot = Some(names);
            }
        } else {
            return Err(ctx.unknown(&keyword));
        }
    }

    Ok(ObjectClassDraft {
        class,
        must: must.unwrap_or_default(),
        may: may.unwrap_or_default(),
    })
}

fn auxiliary_kind(ctx: &mut ParseContext<'_>) -> ObjectClassKind {
    if !ctx.config().legacy_auxiliary_kind {
        return ObjectClassKind::Auxiliary;
    }
    ctx.record(IssueKind::AmbiguousKind, "AUXILIARY mapped to STRUCTURAL");
    ObjectClassKind::Structural
}
