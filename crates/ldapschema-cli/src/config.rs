//! Configuration file for the `ldapschema` tool

use anyhow::{Context, Result};
use ldapschema::SchemaConfig;
use serde::Deserialize;
use std::path::Path;

/// Contents of the YAML configuration file
///
/// ```yaml
/// strict: true
/// schema:
///   legacy_auxiliary_kind: false
///   resolve_inheritance: true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub schema: SchemaConfig,
    /// Treat any schema issue as a failure
    pub strict: bool,
}

impl CliConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("invalid configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read configuration {}", path.display()))?;
        Self::from_yaml(&yaml).with_context(|| format!("in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config() {
        let config = CliConfig::from_yaml("{}").unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_nested_schema_section() {
        let config = CliConfig::from_yaml("strict: true\nschema:\n  legacy_auxiliary_kind: true\n").unwrap();
        assert!(config.strict);
        assert!(config.schema.legacy_auxiliary_kind);
        assert!(config.schema.resolve_inheritance);
    }

    #[test]
    fn test_unknown_type_rejected() {
        assert!(CliConfig::from_yaml("strict: sometimes\n").is_err());
    }
}
