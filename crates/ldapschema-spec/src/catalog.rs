//! Compiled OID specification table.
//!
//! Entries MUST stay sorted by `oid` (byte order); `lookup` binary-searches.

use crate::{DataClass, OidSpec, SpecKind};

const RFC4517: Option<&str> = Some("RFC 4517");
const RFC4519: Option<&str> = Some("RFC 4519");

pub(crate) static OIDSPECS: &[OidSpec] = &[
    OidSpec {
        oid: "1.3.6.1.4.1.1466.115.121.1.11",
        name: Some("Country String"),
        desc: Some("Two-letter ISO 3166 country code"),
        class: DataClass::Ascii,
        human_readable: true,
        common_abnf: true,
        abnf: Some("CountryString  = 2(PrintableCharacter)"),
        re_posix: Some(r"^[A-Za-z]{2}$"),
        spec: RFC4517,
        spec_section: Some("3.3.4"),
        examples: &["US", "AU"],
        ..OidSpec::EMPTY
    },
    OidSpec {
        oid: "1.3.6.1.4.1.1466.115.121.1.12",
        name: Some("DN"),
        desc: Some("Distinguished name"),
        class: DataClass::Utf8,
        human_readable: true,
        abnf: Some("DN = distinguishedName"),
        spec: RFC4517,
        spec_section: Some("3.3.9"),
        examples: &["UID=jsmith,DC=example,DC=net"],
        ..OidSpec::EMPTY
    },
    OidSpec {
        oid: "1.3.6.1.4.1.1466.115.121.1.15",
        name: Some("Directory String"),
        desc: Some("Non-empty UTF-8 string"),
        class: DataClass::Utf8,
        human_readable: true,
        common_abnf: true,
        abnf: Some("DirectoryString = 1*UTF8"),
        re_posix: Some(r"^.+$"),
        spec: RFC4517,
        spec_section: Some("3.3.6"),
        examples: &["This is a value of Directory String containing #!%#@"],
        ..OidSpec::EMPTY
    },
    OidSpec {
        oid: "1.3.6.1.4.1.1466.115.121.1.24",
        name: Some("Generalized Time"),
        desc: Some("Calendar date and time of day"),
        class: DataClass::Ascii,
        human_readable: true,
        abnf: Some(
            "GeneralizedTime = century year month day hour\n\
             \x20                  [ minute [ second / leap-second ] ]\n\
             \x20                  [ fraction ]\n\
             \x20                  g-time-zone",
        ),
        re_posix: Some(r"^[0-9]{10}([0-9]{2}([0-9]{2})?)?([.,][0-9]+)?(Z|[+-][0-9]{2}([0-9]{2})?)$"),
        spec: RFC4517,
        spec_section: Some("3.3.13"),
        examples: &["199412161032Z", "199412160532-0500"],
        ..OidSpec::EMPTY
    },
    OidSpec {
        oid: "1.3.6.1.4.1.1466.115.121.1.26",
        name: Some("IA5 String"),
        desc: Some("String of IA5 (ASCII) characters"),
        class: DataClass::Ascii,
        human_readable: true,
        abnf: Some("IA5String = *(%x00-7F)"),
        re_posix: Some(r"^[\x00-\x7F]*$"),
        spec: RFC4517,
        spec_section: Some("3.3.15"),
        examples: &["user@example.com"],
        ..OidSpec::EMPTY
    },
    OidSpec {
        oid: "1.3.6.1.4.1.1466.115.121.1.27",
        name: Some("INTEGER"),
        desc: Some("Arbitrary-precision signed integer"),
        class: DataClass::Integer,
        human_readable: true,
        common_abnf: true,
        abnf: Some("Integer = ( HYPHEN LDIGIT *DIGIT ) / number"),
        re_posix: Some(r"^(0|-?[1-9][0-9]*)$"),
        spec: RFC4517,
        spec_section: Some("3.3.16"),
        examples: &["1321", "-42", "0"],
        ..OidSpec::EMPTY
    },
    OidSpec {
        oid: "1.3.6.1.4.1.1466.115.121.1.28",
        name: Some("JPEG"),
        desc: Some("JFIF encoded image"),
        class: DataClass::Image,
        spec: RFC4517,
        spec_section: Some("3.3.17"),
        ..OidSpec::EMPTY
    },
    OidSpec {
        oid: "1.3.6.1.4.1.1466.115.121.1.3",
        name: Some("Attribute Type Description"),
        desc: Some("RFC 4512 attribute type definition"),
        class: DataClass::Utf8,
        human_readable: true,
        common_abnf: true,
        abnf: Some("AttributeTypeDescription = LPAREN WSP numericoid ... extensions WSP RPAREN"),
        spec: RFC4517,
        spec_section: Some("3.3.1"),
        ..OidSpec::EMPTY
    },
    OidSpec {
        oid: "1.3.6.1.4.1.1466.115.121.1.36",
        name: Some("Numeric String"),
        desc: Some("Digits and spaces"),
        class: DataClass::Ascii,
        human_readable: true,
        abnf: Some("NumericString = 1*(DIGIT / SPACE)"),
        re_posix: Some(r"^[0-9 ]+$"),
        spec: RFC4517,
        spec_section: Some("3.3.23"),
        examples: &["15 079 672 281"],
        ..OidSpec::EMPTY
    },
    OidSpec {
        oid: "1.3.6.1.4.1.1466.115.121.1.37",
        name: Some("Object Class Description"),
        desc: Some("RFC 4512 object class definition"),
        class: DataClass::Utf8,
        human_readable: true,
        common_abnf: true,
        abnf: Some("ObjectClassDescription = LPAREN WSP numericoid ... extensions WSP RPAREN"),
        spec: RFC4517,
        spec_section: Some("3.3.24"),
        ..OidSpec::EMPTY
    },
    OidSpec {
        oid: "1.3.6.1.4.1.1466.115.121.1.38",
        name: Some("OID"),
        desc: Some("Object identifier or descriptor"),
        class: DataClass::Ascii,
        human_readable: true,
        common_abnf: true,
        abnf: Some("oid = descr / numericoid"),
        re_posix: Some(r"^([0-2](\.(0|[1-9][0-9]*))+|[A-Za-z][A-Za-z0-9-]*)$"),
        spec: RFC4517,
        spec_section: Some("3.3.26"),
        examples: &["1.2.3.4", "cn"],
        ..OidSpec::EMPTY
    },
    OidSpec {
        oid: "1.3.6.1.4.1.1466.115.121.1.40",
        name: Some("Octet String"),
        desc: Some("Arbitrary sequence of octets"),
        class: DataClass::Data,
        abnf: Some("OctetString = *OCTET"),
        spec: RFC4517,
        spec_section: Some("3.3.25"),
        ..OidSpec::EMPTY
    },
    OidSpec {
        oid: "1.3.6.1.4.1.1466.115.121.1.41",
        name: Some("Postal Address"),
        desc: Some("Dollar-separated lines of a postal address"),
        class: DataClass::Utf8MultiLine,
        human_readable: true,
        abnf: Some(
            "PostalAddress = line *( DOLLAR line )\n\
             line          = 1*line-char",
        ),
        spec: RFC4517,
        spec_section: Some("3.3.28"),
        examples: &["1234 Main St.$Anytown, CA 12345$USA"],
        ..OidSpec::EMPTY
    },
    OidSpec {
        oid: "1.3.6.1.4.1.1466.115.121.1.44",
        name: Some("Printable String"),
        desc: Some("String of PrintableString characters"),
        class: DataClass::Ascii,
        human_readable: true,
        common_abnf: true,
        abnf: Some("PrintableString = 1*PrintableCharacter"),
        re_posix: Some(r"^[A-Za-z0-9'()+,./:? =-]+$"),
        spec: RFC4517,
        spec_section: Some("3.3.29"),
        examples: &["This is a PrintableString."],
        ..OidSpec::EMPTY
    },
    OidSpec {
        oid: "1.3.6.1.4.1.1466.115.121.1.50",
        name: Some("Telephone Number"),
        desc: Some("E.123 telephone number"),
        class: DataClass::Ascii,
        human_readable: true,
        abnf: Some("TelephoneNumber = PrintableString"),
        re_posix: Some(r"^[A-Za-z0-9'()+,./:? =-]+$"),
        spec: RFC4517,
        spec_section: Some("3.3.31"),
        examples: &["+1 512 315 0280", "+1-512-315-0280"],
        ..OidSpec::EMPTY
    },
    OidSpec {
        oid: "1.3.6.1.4.1.1466.115.121.1.53",
        name: Some("UTC Time"),
        desc: Some("Two-digit-year calendar date and time"),
        class: DataClass::Ascii,
        human_readable: true,
        abnf: Some("UTCTime = year month day hour minute [ second ] [ u-time-zone ]"),
        re_posix: Some(r"^[0-9]{10}([0-9]{2})?(Z|[+-][0-9]{4})$"),
        spec: RFC4517,
        spec_section: Some("3.3.34"),
        examples: &["9412161032Z"],
        ..OidSpec::EMPTY
    },
    OidSpec {
        oid: "1.3.6.1.4.1.1466.115.121.1.54",
        name: Some("LDAP Syntax Description"),
        desc: Some("RFC 4512 LDAP syntax definition"),
        class: DataClass::Utf8,
        human_readable: true,
        common_abnf: true,
        abnf: Some("SyntaxDescription = LPAREN WSP numericoid [ SP \"DESC\" SP qdstring ] extensions WSP RPAREN"),
        spec: RFC4517,
        spec_section: Some("3.3.18"),
        ..OidSpec::EMPTY
    },
    OidSpec {
        oid: "1.3.6.1.4.1.1466.115.121.1.6",
        name: Some("Bit String"),
        desc: Some("Sequence of binary digits"),
        class: DataClass::Ascii,
        human_readable: true,
        abnf: Some("BitString = SQUOTE *binary-digit SQUOTE \"B\""),
        re_posix: Some(r"^'[01]*'B$"),
        spec: RFC4517,
        spec_section: Some("3.3.2"),
        examples: &["'0101111101'B"],
        ..OidSpec::EMPTY
    },
    OidSpec {
        oid: "1.3.6.1.4.1.1466.115.121.1.7",
        name: Some("Boolean"),
        desc: Some("TRUE or FALSE"),
        class: DataClass::Boolean,
        human_readable: true,
        abnf: Some("Boolean = \"TRUE\" / \"FALSE\""),
        re_posix: Some(r"^(TRUE|FALSE)$"),
        spec: RFC4517,
        spec_section: Some("3.3.3"),
        examples: &["TRUE", "FALSE"],
        ..OidSpec::EMPTY
    },
    OidSpec {
        oid: "2.5.13.0",
        name: Some("objectIdentifierMatch"),
        kind: SpecKind::MatchingRule,
        spec: RFC4517,
        spec_section: Some("4.2.26"),
        ..OidSpec::EMPTY
    },
    OidSpec {
        oid: "2.5.13.2",
        name: Some("caseIgnoreMatch"),
        kind: SpecKind::MatchingRule,
        spec: RFC4517,
        spec_section: Some("4.2.11"),
        ..OidSpec::EMPTY
    },
    OidSpec {
        oid: "2.5.13.30",
        name: Some("objectIdentifierFirstComponentMatch"),
        kind: SpecKind::MatchingRule,
        spec: RFC4517,
        spec_section: Some("4.2.27"),
        ..OidSpec::EMPTY
    },
    OidSpec {
        oid: "2.5.4.0",
        name: Some("objectClass"),
        kind: SpecKind::AttributeType,
        spec: Some("RFC 4512"),
        spec_section: Some("3.3"),
        ..OidSpec::EMPTY
    },
    OidSpec {
        oid: "2.5.4.3",
        name: Some("cn"),
        desc: Some("Common name"),
        kind: SpecKind::AttributeType,
        spec: RFC4519,
        spec_section: Some("2.3"),
        ..OidSpec::EMPTY
    },
    OidSpec {
        oid: "2.5.4.35",
        name: Some("userPassword"),
        kind: SpecKind::AttributeType,
        spec: RFC4519,
        spec_section: Some("2.41"),
        ..OidSpec::EMPTY
    },
    OidSpec {
        oid: "2.5.4.4",
        name: Some("sn"),
        desc: Some("Surname"),
        kind: SpecKind::AttributeType,
        spec: RFC4519,
        spec_section: Some("2.32"),
        ..OidSpec::EMPTY
    },
    OidSpec {
        oid: "2.5.4.41",
        name: Some("name"),
        kind: SpecKind::AttributeType,
        spec: RFC4519,
        spec_section: Some("2.18"),
        ..OidSpec::EMPTY
    },
    OidSpec {
        oid: "2.5.6.0",
        name: Some("top"),
        kind: SpecKind::ObjectClass,
        spec: Some("RFC 4512"),
        spec_section: Some("2.4.1"),
        ..OidSpec::EMPTY
    },
    OidSpec {
        oid: "2.5.6.6",
        name: Some("person"),
        kind: SpecKind::ObjectClass,
        spec: RFC4519,
        spec_section: Some("3.12"),
        ..OidSpec::EMPTY
    },
];
