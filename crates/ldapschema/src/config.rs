//! Schema build configuration

use serde::{Deserialize, Serialize};

/// Options controlling how a [`crate::Schema`] treats its input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Re-resolve attribute SYNTAX references during [`crate::Schema::resolve`]
    pub reconcile_syntaxes: bool,
    /// Compute object class inherited must/may during [`crate::Schema::resolve`]
    pub resolve_inheritance: bool,
    /// Map `AUXILIARY` onto [`crate::ObjectClassKind::Structural`]
    pub legacy_auxiliary_kind: bool,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            reconcile_syntaxes: true,
            resolve_inheritance: true,
            legacy_auxiliary_kind: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SchemaConfig::default();
        assert!(config.reconcile_syntaxes);
        assert!(config.resolve_inheritance);
        assert!(!config.legacy_auxiliary_kind);
    }

    #[test]
    fn test_partial_yaml() {
        let config: SchemaConfig = serde_yaml::from_str("legacy_auxiliary_kind: true\n").unwrap();
        assert!(config.legacy_auxiliary_kind);
        assert!(config.reconcile_syntaxes);
    }
}
