//! Recoverable schema error log
//!
//! Consistency problems found while building a schema never abort parsing;
//! they are appended here against the entity under construction.

use serde::Serialize;
use std::fmt;
use tracing::warn;

/// Category of a recoverable schema issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IssueKind {
    /// Definition envelope anomaly; the definition itself was rejected
    MalformedDefinition,
    /// OID or name already registered
    DuplicateEntity,
    /// Reference to an unknown attribute type, class or syntax
    InvalidReference,
    /// Attribute already linked to the object class, or a repeated MUST/MAY clause
    DuplicateRelationship,
    /// Object class kind keyword mapped onto another kind
    AmbiguousKind,
    /// Attribute list separator other than `$`
    InvalidDelimiter,
    /// Extension tag repeated within one definition
    DuplicateExtension,
}

impl IssueKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MalformedDefinition => "malformed definition",
            Self::DuplicateEntity => "duplicate entity",
            Self::InvalidReference => "invalid reference",
            Self::DuplicateRelationship => "duplicate relationship",
            Self::AmbiguousKind => "ambiguous kind",
            Self::InvalidDelimiter => "invalid delimiter",
            Self::DuplicateExtension => "duplicate extension",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single recoverable issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaIssue {
    pub kind: IssueKind,
    /// OID of the entity the issue was recorded against
    pub subject: Option<String>,
    pub message: String,
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subject {
            Some(subject) => write!(f, "{subject}: {} ({})", self.message, self.kind),
            None => write!(f, "{} ({})", self.message, self.kind),
        }
    }
}

/// Schema-wide accumulator of recoverable issues
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchemaLog {
    issues: Vec<SchemaIssue>,
}

impl SchemaLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an issue against `subject`
    pub fn record(&mut self, kind: IssueKind, subject: Option<&str>, message: impl Into<String>) {
        let issue = SchemaIssue {
            kind,
            subject: subject.map(str::to_string),
            message: message.into(),
        };
        warn!(kind = %issue.kind, subject = issue.subject.as_deref().unwrap_or("-"), "{}", issue.message);
        self.issues.push(issue);
    }

    #[must_use]
    pub fn issues(&self) -> &[SchemaIssue] {
        &self.issues
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SchemaIssue> {
        self.issues.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Number of issues of one kind
    #[must_use]
    pub fn count(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|i| i.kind == kind).count()
    }

    #[must_use]
    pub fn has(&self, kind: IssueKind) -> bool {
        self.issues.iter().any(|i| i.kind == kind)
    }

    /// Number of distinct entities with at least one issue
    #[must_use]
    pub fn entities_with_issues(&self) -> usize {
        self.by_subject().into_iter().filter(|(s, _)| s.is_some()).count()
    }

    /// Issues grouped by subject, in order of first appearance
    #[must_use]
    pub fn by_subject(&self) -> Vec<(Option<&str>, Vec<&SchemaIssue>)> {
        let mut groups: Vec<(Option<&str>, Vec<&SchemaIssue>)> = Vec::new();
        for issue in &self.issues {
            let subject = issue.subject.as_deref();
            match groups.iter_mut().find(|(s, _)| *s == subject) {
                Some((_, group)) => group.push(issue),
                None => groups.push((subject, vec![issue])),
            }
        }
        groups
    }

    /// Issues recorded against one entity
    pub fn for_subject<'a>(&'a self, oid: &'a str) -> impl Iterator<Item = &'a SchemaIssue> + 'a {
        self.issues
            .iter()
            .filter(move |i| i.subject.as_deref() == Some(oid))
    }

    pub fn clear(&mut self) {
        self.issues.clear();
    }
}

impl<'a> IntoIterator for &'a SchemaLog {
    type Item = &'a SchemaIssue;
    type IntoIter = std::slice::Iter<'a, SchemaIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_count() {
        let mut log = SchemaLog::new();
        assert!(log.is_empty());

        log.record(IssueKind::DuplicateEntity, Some("2.5.4.3"), "duplicate OID '2.5.4.3'");
        log.record(IssueKind::InvalidReference, Some("2.5.6.6"), "MUST contains unknown 'foo'");
        log.record(IssueKind::InvalidReference, Some("2.5.6.6"), "MAY contains unknown 'bar'");

        assert_eq!(log.len(), 3);
        assert_eq!(log.count(IssueKind::InvalidReference), 2);
        assert!(log.has(IssueKind::DuplicateEntity));
        assert!(!log.has(IssueKind::AmbiguousKind));
    }

    #[test]
    fn test_grouping_by_subject() {
        let mut log = SchemaLog::new();
        log.record(IssueKind::InvalidReference, Some("1.1"), "a");
        log.record(IssueKind::InvalidReference, Some("1.2"), "b");
        log.record(IssueKind::InvalidDelimiter, Some("1.1"), "c");
        log.record(IssueKind::MalformedDefinition, None, "d");

        let groups = log.by_subject();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].0, Some("1.1"));
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(log.entities_with_issues(), 2);
        assert_eq!(log.for_subject("1.2").count(), 1);
    }

    #[test]
    fn test_issue_display() {
        let issue = SchemaIssue {
            kind: IssueKind::DuplicateEntity,
            subject: Some("2.5.4.3".to_string()),
            message: "duplicate name 'cn'".to_string(),
        };
        assert_eq!(issue.to_string(), "2.5.4.3: duplicate name 'cn' (duplicate entity)");
    }
}
