//! MatchingRuleDescription (RFC 4512 4.1.3)

use super::ParseContext;
use crate::Result;
use crate::model::{Flags, MatchingRule, Model};

/// Parse the fields of a matching rule
///
/// # Errors
///
/// Fails on an unknown keyword or a missing argument.
pub fn parse(ctx: &mut ParseContext<'_>, model: Model) -> Result<MatchingRule> {
    let mut rule = MatchingRule {
        model,
        names: Vec::new(),
        syntax_oid: None,
        syntax: None,
    };

    while let Some(keyword) = ctx.next_keyword() {
        if keyword.is_extension() {
            ctx.extension(&mut rule.model, &keyword)?;
        } else if keyword.is_keyword("NAME") {
            rule.names = ctx.names(&keyword)?;
        } else if keyword.is_keyword("DESC") {
            rule.model.desc = Some(ctx.scalar(&keyword)?);
        } else if keyword.is_keyword("OBSOLETE") {
            rule.model.flags |= Flags::OBSOLETE;
        } else if keyword.is_keyword("SYNTAX") {
            rule.syntax_oid = Some(ctx.scalar(&keyword)?);
        } else {
            return Err(ctx.unknown(&keyword));
        }
    }

    Ok(rule)
}
