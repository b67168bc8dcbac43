//! Labelled text rendering of schema entities

use ldapschema::model::{Flags, Model};
use ldapschema::{
    AttributeType, AttributeTypeId, MatchingRule, MatchingRuleId, ModelRef, ObjectClass, ObjectClassId, Schema,
    Syntax, SyntaxId, Token, TokenKind, tokenize,
};
use std::io::{self, Write};

const HEADER_WIDTH: usize = 16;
const INDENT: usize = 3;
const FIELD_WIDTH: usize = 13;

/// Writes entities of one schema as aligned `label: value` lines
pub struct Printer<'a, W> {
    schema: &'a Schema,
    out: W,
}

impl<'a, W: Write> Printer<'a, W> {
    pub fn new(schema: &'a Schema, out: W) -> Self {
        Self { schema, out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn entity(&mut self, entity: ModelRef) -> io::Result<()> {
        match entity {
            ModelRef::Syntax(id) => self.syntax(id),
            ModelRef::MatchingRule(id) => self.matching_rule(id),
            ModelRef::AttributeType(id) => self.attribute_type(id),
            ModelRef::ObjectClass(id) => self.object_class(id),
        }
    }

    pub fn syntax(&mut self, id: SyntaxId) -> io::Result<()> {
        let schema = self.schema;
        let syntax: &Syntax = schema.syntax(id);
        let model = &syntax.model;
        self.header(model)?;
        self.multiline("description:", model.desc.as_deref())?;
        self.flags(model.flags)?;
        self.field("data class:", &format!("{:?}", syntax.class))?;
        if let Some(spec) = model.spec {
            if let Some(abnf) = spec.abnf {
                self.multiline("abnf:", Some(abnf))?;
            }
            if let Some(re) = spec.re_posix {
                self.field("pattern:", re)?;
            }
            self.list("examples:", spec.examples.iter().copied())?;
        }
        self.footer(model)
    }

    pub fn matching_rule(&mut self, id: MatchingRuleId) -> io::Result<()> {
        let schema = self.schema;
        let rule: &MatchingRule = schema.matching_rule(id);
        let model = &rule.model;
        self.header(model)?;
        self.names(&rule.names)?;
        self.multiline("description:", model.desc.as_deref())?;
        self.flags(model.flags)?;
        self.syntax_line(rule.syntax, rule.syntax_oid.as_deref(), None)?;
        self.footer(model)
    }

    pub fn attribute_type(&mut self, id: AttributeTypeId) -> io::Result<()> {
        let schema = self.schema;
        let attr: &AttributeType = schema.attribute_type(id);
        let model = &attr.model;
        self.header(model)?;
        self.names(&attr.names)?;
        self.multiline("description:", model.desc.as_deref())?;
        self.flags(model.flags)?;
        self.field("usage:", attr.usage.as_str())?;
        if let Some(sup) = attr.superior {
            self.field("superior:", schema.attribute_type(sup).primary_name())?;
        } else if let Some(name) = &attr.superior_name {
            self.field("superior:", &format!("{name} (unresolved)"))?;
        }
        self.syntax_line(attr.syntax, attr.syntax_oid.as_deref(), attr.min_upper)?;
        self.rule_line("equality:", attr.equality_rule, attr.equality.as_deref())?;
        self.rule_line("ordering:", attr.ordering_rule, attr.ordering.as_deref())?;
        self.rule_line("substring:", attr.substr_rule, attr.substr.as_deref())?;
        self.classes("required by:", &attr.required_by)?;
        self.classes("allowed by:", &attr.allowed_by)?;
        self.footer(model)
    }

    pub fn object_class(&mut self, id: ObjectClassId) -> io::Result<()> {
        let schema = self.schema;
        let class: &ObjectClass = schema.object_class(id);
        let model = &class.model;
        self.header(model)?;
        self.names(&class.names)?;
        self.multiline("description:", model.desc.as_deref())?;
        self.flags(model.flags)?;
        self.field("kind:", class.kind.as_str())?;
        if class.superiors.is_empty() {
            self.list("superior:", class.superior_names.iter().map(String::as_str))?;
        } else {
            self.classes("superior:", &class.superiors)?;
        }
        self.attributes("must:", &class.must)?;
        self.attributes("may:", &class.may)?;
        self.attributes("inherited must:", &class.inherited_must)?;
        self.attributes("inherited may:", &class.inherited_may)?;
        self.footer(model)
    }

    fn header(&mut self, model: &Model) -> io::Result<()> {
        let label = format!("{}:", model.kind);
        writeln!(self.out, "{label:<HEADER_WIDTH$} {}", model.oid)
    }

    fn footer(&mut self, model: &Model) -> io::Result<()> {
        if let Some(spec) = model.spec {
            match (spec.spec, spec.spec_section) {
                (Some(doc), Some(section)) => self.field("specification:", &format!("{doc} section {section}"))?,
                (Some(doc), None) => self.field("specification:", doc)?,
                _ => {}
            }
        }
        for ext in &model.extensions {
            let values: Vec<String> = ext.values.iter().map(|v| format!("'{v}'")).collect();
            self.field(&format!("{}:", ext.tag), &format!("( {} )", values.join(" ")))?;
        }
        self.definition(&model.definition)?;
        writeln!(self.out)
    }

    fn field(&mut self, label: &str, value: &str) -> io::Result<()> {
        writeln!(self.out, "{:INDENT$}{label:<FIELD_WIDTH$} {value}", "")
    }

    fn more(&mut self, value: &str) -> io::Result<()> {
        writeln!(self.out, "{:HEADER_WIDTH$} {value}", "")
    }

    fn list<'s>(&mut self, label: &str, values: impl IntoIterator<Item = &'s str>) -> io::Result<()> {
        let mut values = values.into_iter();
        let Some(first) = values.next() else {
            return Ok(());
        };
        self.field(label, first)?;
        for value in values {
            self.more(value)?;
        }
        Ok(())
    }

    fn multiline(&mut self, label: &str, text: Option<&str>) -> io::Result<()> {
        match text {
            Some(text) => self.list(label, text.lines()),
            None => Ok(()),
        }
    }

    fn names(&mut self, names: &[String]) -> io::Result<()> {
        let label = if names.len() > 1 { "names:" } else { "name:" };
        self.list(label, names.iter().map(String::as_str))
    }

    fn flags(&mut self, flags: Flags) -> io::Result<()> {
        let labels = [
            (Flags::OBSOLETE, "obsolete"),
            (Flags::SINGLE_VALUE, "single value"),
            (Flags::READABLE, "human readable"),
            (Flags::COLLECTIVE, "collective"),
            (Flags::NO_USER_MOD, "no user modification"),
        ];
        self.list(
            "flags:",
            labels.into_iter().filter(|(flag, _)| flags.contains(*flag)).map(|(_, label)| label),
        )
    }

    fn syntax_line(&mut self, id: Option<SyntaxId>, declared: Option<&str>, bound: Option<u64>) -> io::Result<()> {
        let schema = self.schema;
        let syntax = id.map(|id| schema.syntax(id));
        let mut line = match (syntax, declared) {
            (Some(syntax), _) => match &syntax.model.desc {
                Some(desc) => format!("{} ({desc})", syntax.model.oid),
                None => syntax.model.oid.clone(),
            },
            (None, Some(oid)) => format!("{oid} (unresolved)"),
            (None, None) => return Ok(()),
        };
        if let Some(bound) = bound {
            line.push_str(&format!(" {{{bound}}}"));
        }
        self.field("syntax:", &line)?;
        let abnf = syntax.and_then(|syntax| syntax.model.spec).and_then(|spec| spec.abnf);
        self.multiline("abnf:", abnf)
    }

    fn rule_line(&mut self, label: &str, id: Option<MatchingRuleId>, declared: Option<&str>) -> io::Result<()> {
        match (id, declared) {
            (Some(id), _) => {
                let schema = self.schema;
                let rule = schema.matching_rule(id);
                let name = rule.names.first().unwrap_or(&rule.model.oid);
                self.field(label, name)
            }
            (None, Some(name)) => self.field(label, &format!("{name} (unresolved)")),
            (None, None) => Ok(()),
        }
    }

    fn classes(&mut self, label: &str, ids: &[ObjectClassId]) -> io::Result<()> {
        let schema = self.schema;
        self.list(label, ids.iter().map(|id| schema.object_class(*id).primary_name()))
    }

    fn attributes(&mut self, label: &str, ids: &[AttributeTypeId]) -> io::Result<()> {
        let schema = self.schema;
        self.list(label, ids.iter().map(|id| schema.attribute_type(*id).primary_name()))
    }

    /// Definition reflowed with one keyword and its arguments per line
    fn definition(&mut self, definition: &str) -> io::Result<()> {
        let Ok(tokens) = tokenize(definition) else {
            return self.field("definition:", definition.trim());
        };
        writeln!(self.out, "{:INDENT$}{:<FIELD_WIDTH$} (", "", "definition:")?;
        for line in definition_lines(&tokens) {
            writeln!(self.out, "{:HEADER_WIDTH$}    {line}", "")?;
        }
        writeln!(self.out, "{:HEADER_WIDTH$} )", "")
    }
}

fn definition_lines(tokens: &[Token]) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for token in tokens {
        let starts_line = lines.is_empty() || opens_clause(token);
        match lines.last_mut() {
            Some(line) if !starts_line => {
                line.push(' ');
                line.push_str(&token.to_string());
            }
            _ => lines.push(token.to_string()),
        }
    }
    lines
}

/// Bare words in upper case open a new clause
fn opens_clause(token: &Token) -> bool {
    token.kind == TokenKind::Bare && token.as_str().starts_with(|c: char| c.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ldapschema::SchemaLog;

    fn sample() -> Schema {
        let mut schema = Schema::new();
        let mut log = SchemaLog::new();
        schema
            .parse_syntax(&mut log, "( 1.3.6.1.4.1.1466.115.121.1.15 DESC 'Directory String' )")
            .unwrap();
        schema
            .parse_attribute_type(
                &mut log,
                "( 2.5.4.41 NAME 'name' EQUALITY caseIgnoreMatch SYNTAX 1.3.6.1.4.1.1466.115.121.1.15{32768} )",
            )
            .unwrap();
        schema
            .parse_attribute_type(&mut log, "( 2.5.4.3 NAME ( 'cn' 'commonName' ) SUP name X-ORIGIN 'RFC 4519' )")
            .unwrap();
        schema
            .parse_object_class(&mut log, "( 2.5.6.0 NAME 'top' ABSTRACT )")
            .unwrap();
        schema
            .parse_object_class(&mut log, "( 2.5.6.6 NAME 'person' SUP top STRUCTURAL MUST cn )")
            .unwrap();
        schema.resolve(&mut log).unwrap();
        schema
    }

    fn render(schema: &Schema, name: &str) -> String {
        let entity = schema.find(name).unwrap();
        let mut printer = Printer::new(schema, Vec::new());
        printer.entity(entity).unwrap();
        String::from_utf8(printer.into_inner()).unwrap()
    }

    #[test]
    fn test_attribute_type_layout() {
        let schema = sample();
        let text = render(&schema, "cn");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "attributeType:   2.5.4.3");
        assert_eq!(lines[1], "   names:        cn");
        assert_eq!(lines[2], "                 commonName");
        assert!(text.contains("   superior:     name\n"));
        assert!(text.contains("   syntax:       1.3.6.1.4.1.1466.115.121.1.15 (Directory String) {32768}\n"));
        assert!(text.contains("   equality:     caseIgnoreMatch (unresolved)\n"));
        assert!(text.contains("   required by:  person\n"));
        assert!(text.contains("   X-ORIGIN:     ( 'RFC 4519' )\n"));
    }

    #[test]
    fn test_object_class_layout() {
        let schema = sample();
        let text = render(&schema, "person");
        assert!(text.starts_with("objectClass:     2.5.6.6\n"));
        assert!(text.contains("   kind:         STRUCTURAL\n"));
        assert!(text.contains("   superior:     top\n"));
        assert!(text.contains("   must:         cn\n"));
        assert!(!text.contains("inherited"));
    }

    #[test]
    fn test_definition_reflow() {
        let schema = sample();
        let text = render(&schema, "person");
        let expected = "   definition:   (\n\
                        \x20                   2.5.6.6\n\
                        \x20                   NAME 'person'\n\
                        \x20                   SUP top\n\
                        \x20                   STRUCTURAL\n\
                        \x20                   MUST cn\n\
                        \x20                )\n";
        assert!(text.ends_with(&format!("{expected}\n")), "{text}");
    }

    #[test]
    fn test_grouped_names_stay_on_one_line() {
        let tokens = tokenize("( 2.5.4.3 NAME ( 'cn' 'commonName' ) SUP name )").unwrap();
        assert_eq!(
            definition_lines(&tokens),
            vec!["2.5.4.3", "NAME ( 'cn' 'commonName' )", "SUP name"]
        );
    }
}
