//! Subschema text loader
//!
//! Accepts the two textual forms schemas are usually shipped in:
//!
//! - LDIF subschema entries (`attributeTypes: ( ... )`), where a line
//!   starting with one space continues the previous line and is unfolded
//!   without the space;
//! - OpenLDAP `.schema` files (`attributetype ( ... )`), where any line
//!   starting with whitespace continues the previous one and `#` starts a
//!   comment line.
//!
//! Definitions are collected from any number of sources first and parsed
//! in dependency order (syntaxes, matching rules, attribute types, object
//! classes) when [`SchemaLoader::load`] runs, so file order never matters.

use crate::config::SchemaConfig;
use crate::log::SchemaLog;
use crate::model::EntityKind;
use crate::registry::Schema;
use crate::{Error, ErrorKind, Result};
use std::fmt;
use std::path::Path;
use tracing::{debug, info, trace};

/// A definition that could not be loaded
#[derive(Debug)]
pub struct LoadFailure {
    /// File name or caller supplied label
    pub source: String,
    /// 1-based line where the record starts
    pub line: usize,
    pub error: Error,
}

impl fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.source, self.line, self.error)
    }
}

/// Result of a load: the resolved schema, its issues and rejected definitions
#[derive(Debug)]
pub struct LoadReport {
    pub schema: Schema,
    pub log: SchemaLog,
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    /// No rejected definitions and no recorded issues
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.log.is_empty()
    }
}

#[derive(Debug)]
struct Record {
    kind: EntityKind,
    source: String,
    line: usize,
    definition: String,
}

/// Logical line after continuation handling
struct Logical {
    line: usize,
    text: String,
    ldif: bool,
}

/// Collects schema definitions from text and builds a [`Schema`]
#[derive(Debug, Default)]
pub struct SchemaLoader {
    config: SchemaConfig,
    records: Vec<Record>,
    failures: Vec<LoadFailure>,
}

impl SchemaLoader {
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

    /// Number of definitions collected so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Collect the definitions in `text`; returns how many were found
    ///
    /// Base64 encoded definitions cannot be read and are reported as
    /// [`Error::InvalidFormat`] failures when the schema is loaded.
    pub fn add_str(&mut self, source: &str, text: &str) -> usize {
        let before = self.records.len();

        for logical in logical_lines(text) {
            let Some((key, value, base64)) = split_record(&logical) else {
                continue;
            };
            let Some(kind) = record_kind(key) else {
                trace!(source, line = logical.line, key, "skipping record");
                continue;
            };
            if base64 {
                self.failures.push(LoadFailure {
                    source: source.to_string(),
                    line: logical.line,
                    error: Error::InvalidFormat {
                        line: logical.line,
                        message: format!("base64 encoded '{key}' values are not supported"),
                    },
                });
                continue;
            }
            if logical.ldif && !value.starts_with('(') {
                // e.g. `objectClass: subschema` in the entry itself
                trace!(source, line = logical.line, key, value, "skipping non-definition value");
                continue;
            }

            self.records.push(Record {
                kind,
                source: source.to_string(),
                line: logical.line,
                definition: value.to_string(),
            });
        }

        let found = self.records.len() - before;
        debug!(source, definitions = found, "collected schema text");
        found
    }

    /// Read a schema file and collect its definitions
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be read.
    pub fn add_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Ok(self.add_str(&path.display().to_string(), &text))
    }

    /// Parse every collected definition in dependency order and resolve
    ///
    /// Definitions that fail to parse are reported in
    /// [`LoadReport::failures`] and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`] when the schema cannot grow.
    pub fn load(self) -> Result<LoadReport> {
        let Self {
            config,
            mut records,
            mut failures,
        } = self;
        records.sort_by_key(|record| rank(record.kind));

        let mut schema = Schema::with_config(config);
        let mut log = SchemaLog::new();
        for record in records {
            let definition = record.definition.as_str();
            let parsed = match record.kind {
                EntityKind::Syntax => schema.parse_syntax(&mut log, definition).map(drop),
                EntityKind::MatchingRule => schema.parse_matching_rule(&mut log, definition).map(drop),
                EntityKind::AttributeType => schema.parse_attribute_type(&mut log, definition).map(drop),
                EntityKind::ObjectClass => schema.parse_object_class(&mut log, definition).map(drop),
            };
            match parsed {
                Ok(()) => {}
                Err(err) if err.kind() == ErrorKind::OutOfMemory => return Err(err),
                Err(error) => failures.push(LoadFailure {
                    source: record.source,
                    line: record.line,
                    error,
                }),
            }
        }

        schema.resolve(&mut log)?;
        info!(
            entities = schema.len(),
            failures = failures.len(),
            issues = log.len(),
            "schema loaded"
        );
        Ok(LoadReport {
            schema,
            log,
            failures,
        })
    }
}

const fn rank(kind: EntityKind) -> u8 {
    match kind {
        EntityKind::Syntax => 0,
        EntityKind::MatchingRule => 1,
        EntityKind::AttributeType => 2,
        EntityKind::ObjectClass => 3,
    }
}

fn record_kind(key: &str) -> Option<EntityKind> {
    const KEYS: &[(&str, EntityKind)] = &[
        ("ldapSyntaxes", EntityKind::Syntax),
        ("ldapSyntax", EntityKind::Syntax),
        ("matchingRules", EntityKind::MatchingRule),
        ("matchingRule", EntityKind::MatchingRule),
        ("attributeTypes", EntityKind::AttributeType),
        ("attributeType", EntityKind::AttributeType),
        ("objectClasses", EntityKind::ObjectClass),
        ("objectClass", EntityKind::ObjectClass),
    ];
    KEYS.iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(key))
        .map(|(_, kind)| *kind)
}

/// Join continuation lines and drop comments and blank lines
fn logical_lines(text: &str) -> Vec<Logical> {
    let mut lines: Vec<Logical> = Vec::new();
    let mut open = false;

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.starts_with('#') {
            open = false;
            continue;
        }
        if line.trim().is_empty() {
            open = false;
            continue;
        }

        if line.starts_with([' ', '\t']) {
            match lines.last_mut() {
                Some(current) if open && current.ldif => current.text.push_str(&line[1..]),
                Some(current) if open => {
                    current.text.push(' ');
                    current.text.push_str(line.trim());
                }
                _ => trace!(line = idx + 1, "continuation without a record"),
            }
            continue;
        }

        let ldif = match line.find([':', ' ', '\t']) {
            Some(pos) => line.as_bytes()[pos] == b':',
            None => false,
        };
        lines.push(Logical {
            line: idx + 1,
            text: line.to_string(),
            ldif,
        });
        open = true;
    }

    lines
}

/// Split a logical line into key, value and whether the value is base64
fn split_record(logical: &Logical) -> Option<(&str, &str, bool)> {
    let text = logical.text.as_str();
    if logical.ldif {
        let (key, rest) = text.split_once(':')?;
        let (value, base64) = match rest.strip_prefix(':') {
            Some(encoded) => (encoded, true),
            None => (rest, false),
        };
        return Some((key.trim(), value.trim(), base64));
    }
    let (key, rest) = text.split_once([' ', '\t'])?;
    Some((key, rest.trim(), false))
}
