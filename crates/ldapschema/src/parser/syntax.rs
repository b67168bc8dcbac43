//! SyntaxDescription (RFC 4512 4.1.5)

use super::ParseContext;
use crate::Result;
use crate::model::{Model, Syntax, SyntaxClass};

/// Parse the fields of an LDAP syntax
///
/// Catalog metadata and the value pattern are attached by the registry.
///
/// # Errors
///
/// Fails on an unknown keyword or a missing argument.
pub fn parse(ctx: &mut ParseContext<'_>, model: Model) -> Result<Syntax> {
    let mut syntax = Syntax {
        model,
        class: SyntaxClass::default(),
        pattern: None,
    };

    while let Some(keyword) = ctx.next_keyword() {
        if keyword.is_extension() {
            ctx.extension(&mut syntax.model, &keyword)?;
        } else if keyword.is_keyword("DESC") {
            syntax.model.desc = Some(ctx.scalar(&keyword)?);
        } else {
            return Err(ctx.unknown(&keyword));
        }
    }

    Ok(syntax)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchemaConfig;
    use crate::log::SchemaLog;
    use crate::model::EntityKind;

    fn parse_str(definition: &str) -> Result<Syntax> {
        let mut log = SchemaLog::new();
        let (mut ctx, model) = ParseContext::open(
            &mut log,
            SchemaConfig::default(),
            EntityKind::Syntax,
            definition.as_bytes(),
        )?;
        parse(&mut ctx, model)
    }

    #[test]
    fn test_directory_string() {
        let syntax = parse_str(
            "( 1.3.6.1.4.1.1466.115.121.1.15 DESC 'Directory String' X-NOT-HUMAN-READABLE 'FALSE' )",
        )
        .unwrap();
        assert_eq!(syntax.model.desc.as_deref(), Some("Directory String"));
        assert_eq!(syntax.model.extensions.len(), 1);
        assert!(syntax.pattern.is_none());
    }

    #[test]
    fn test_rejects_name() {
        let err = parse_str("( 1.3.6.1.4.1.1466.115.121.1.15 NAME 'dstring' )").unwrap_err();
        assert!(err.to_string().contains("invalid term 'NAME'"));
    }
}
