//! AttributeTypeDescription (RFC 4512 4.1.2)

use super::ParseContext;
use crate::Result;
use crate::model::{AttributeType, AttributeUsage, Flags, Model};

/// Parse the fields of an attribute type
///
/// # Errors
///
/// Fails on an unknown keyword, a missing argument, an invalid `USAGE`
/// value or a malformed `SYNTAX` length bound.
pub fn parse(ctx: &mut ParseContext<'_>, model: Model) -> Result<AttributeType> {
    let mut attr = AttributeType::new(model);

    while let Some(keyword) = ctx.next_keyword() {
        if keyword.is_extension() {
            ctx.extension(&mut attr.model, &keyword)?;
        } else if keyword.is_keyword("NAME") {
            attr.names = ctx.names(&keyword)?;
        } else if keyword.is_keyword("DESC") {
            attr.model.desc = Some(ctx.scalar(&keyword)?);
        } else if keyword.is_keyword("OBSOLETE") {
            attr.model.flags |= Flags::OBSOLETE;
        } else if keyword.is_keyword("SUP") {
            attr.superior_name = Some(ctx.scalar(&keyword)?);
        } else if keyword.is_keyword("EQUALITY") {
            attr.equality = Some(ctx.scalar(&keyword)?);
        } else if keyword.is_keyword("ORDERING") {
            attr.ordering = Some(ctx.scalar(&keyword)?);
        } else if keyword.is_keyword("SUBSTR") {
            attr.substr = Some(ctx.scalar(&keyword)?);
        } else if keyword.is_keyword("SYNTAX") {
            let value = ctx.scalar(&keyword)?;
            let (oid, bound) = split_length_bound(ctx, &value)?;
            attr.syntax_oid = Some(oid);
            attr.min_upper = bound;
        } else if keyword.is_keyword("SINGLE-VALUE") {
            attr.model.flags |= Flags::SINGLE_VALUE;
        } else if keyword.is_keyword("COLLECTIVE") {
            attr.model.flags |= Flags::COLLECTIVE;
        } else if keyword.is_keyword("NO-USER-MODIFICATION") {
            attr.model.flags |= Flags::NO_USER_MOD;
        } else if keyword.is_keyword("USAGE") {
            let value = ctx.scalar(&keyword)?;
            attr.usage = AttributeUsage::from_keyword(&value)
                .ok_or_else(|| ctx.malformed(format!("invalid USAGE '{value}'")))?;
        } else {
            return Err(ctx.unknown(&keyword));
        }
    }

    Ok(attr)
}

/// Split `oid{n}` into the OID and its decimal bound
fn split_length_bound(ctx: &ParseContext<'_>, value: &str) -> Result<(String, Option<u64>)> {
    let Some((oid, rest)) = value.split_once('{') else {
        return Ok((value.to_string(), None));
    };
    let bound = rest
        .strip_suffix('}')
        .ok_or_else(|| ctx.malformed(format!("SYNTAX '{value}' has an unterminated length bound")))?;
    let bound = bound
        .parse::<u64>()
        .map_err(|_| ctx.malformed(format!("SYNTAX '{value}' has an invalid length bound")))?;
    Ok((oid.to_string(), Some(bound)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchemaConfig;
    use crate::log::SchemaLog;
    use crate::model::EntityKind;

    fn parse_str(log: &mut SchemaLog, definition: &str) -> Result<AttributeType> {
        let (mut ctx, model) = ParseContext::open(
            log,
            SchemaConfig::default(),
            EntityKind::AttributeType,
            definition.as_bytes(),
        )?;
        parse(&mut ctx, model)
    }

    #[test]
    fn test_common_name() {
        let mut log = SchemaLog::new();
        let attr = parse_str(&mut log, "( 2.5.4.3 NAME 'cn' DESC 'Common Name' SUP name )").unwrap();
        assert_eq!(attr.model.oid, "2.5.4.3");
        assert_eq!(attr.names, vec!["cn"]);
        assert_eq!(attr.model.desc.as_deref(), Some("Common Name"));
        assert_eq!(attr.superior_name.as_deref(), Some("name"));
        assert!(attr.superior.is_none());
        assert!(log.is_empty());
    }

    #[test]
    fn test_full_definition() {
        let mut log = SchemaLog::new();
        let attr = parse_str(
            &mut log,
            "( 2.5.18.1 NAME 'createTimestamp' EQUALITY generalizedTimeMatch \
             ORDERING generalizedTimeOrderingMatch \
             SYNTAX 1.3.6.1.4.1.1466.115.121.1.24{64} SINGLE-VALUE \
             NO-USER-MODIFICATION USAGE directoryOperation X-ORIGIN 'RFC 4512' )",
        )
        .unwrap();
        assert_eq!(attr.equality.as_deref(), Some("generalizedTimeMatch"));
        assert_eq!(attr.ordering.as_deref(), Some("generalizedTimeOrderingMatch"));
        assert_eq!(attr.syntax_oid.as_deref(), Some("1.3.6.1.4.1.1466.115.121.1.24"));
        assert_eq!(attr.min_upper, Some(64));
        assert!(attr.is_single_value());
        assert!(attr.model.flags.contains(Flags::NO_USER_MOD));
        assert_eq!(attr.usage, AttributeUsage::DirectoryOperation);
        assert_eq!(attr.model.extension("x-origin").unwrap().values, vec!["RFC 4512"]);
    }

    #[test]
    fn test_names_list_and_quoted_syntax() {
        let mut log = SchemaLog::new();
        let attr = parse_str(
            &mut log,
            "( 2.5.4.3 NAME ( 'cn' 'commonName' ) SYNTAX '1.3.6.1.4.1.1466.115.121.1.15' COLLECTIVE OBSOLETE )",
        )
        .unwrap();
        assert_eq!(attr.names, vec!["cn", "commonName"]);
        assert_eq!(attr.syntax_oid.as_deref(), Some("1.3.6.1.4.1.1466.115.121.1.15"));
        assert_eq!(attr.min_upper, None);
        assert!(attr.model.is_obsolete());
        assert!(attr.model.flags.contains(Flags::COLLECTIVE));
    }

    #[test]
    fn test_fatal_errors() {
        let mut log = SchemaLog::new();
        for definition in [
            "( 1.2.3 FOO bar )",
            "( 1.2.3 USAGE operational )",
            "( 1.2.3 SYNTAX 1.2{abc} )",
            "( 1.2.3 SYNTAX 1.2{32 )",
            "( 1.2.3 NAME )",
            "( 1.2.3 SUP ( a $ b ) )",
        ] {
            assert!(parse_str(&mut log, definition).is_err(), "{definition}");
        }
        assert!(log.is_empty());
    }

    #[test]
    fn test_usage_case_insensitive() {
        let mut log = SchemaLog::new();
        let attr = parse_str(&mut log, "( 1.2.3 usage DSAOPERATION )").unwrap();
        assert_eq!(attr.usage, AttributeUsage::DsaOperation);
    }
}
