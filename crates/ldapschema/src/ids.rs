//! Index types for the schema arena.
//!
//! Every entity lives in a per-kind vector owned by [`crate::Schema`];
//! relationships and aliases store these ids instead of references.

use core::num::NonZeroU32;
use serde::Serialize;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(NonZeroU32);

        impl $name {
            /// Create from a 0-based index.
            #[must_use]
            pub fn from_index(index: usize) -> Option<Self> {
                u32::try_from(index + 1).ok().and_then(NonZeroU32::new).map(Self)
            }

            /// Get the 0-based index.
            #[must_use]
            pub const fn to_index(self) -> usize {
                (self.0.get() - 1) as usize
            }
        }
    };
}

define_id!(
    /// LDAP syntax identifier.
    SyntaxId
);

define_id!(
    /// Matching rule identifier.
    MatchingRuleId
);

define_id!(
    /// Attribute type identifier.
    AttributeTypeId
);

define_id!(
    /// Object class identifier.
    ObjectClassId
);

/// Reference to an entity of any kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ModelRef {
    Syntax(SyntaxId),
    MatchingRule(MatchingRuleId),
    AttributeType(AttributeTypeId),
    ObjectClass(ObjectClassId),
}

impl From<SyntaxId> for ModelRef {
    fn from(id: SyntaxId) -> Self {
        Self::Syntax(id)
    }
}

impl From<MatchingRuleId> for ModelRef {
    fn from(id: MatchingRuleId) -> Self {
        Self::MatchingRule(id)
    }
}

impl From<AttributeTypeId> for ModelRef {
    fn from(id: AttributeTypeId) -> Self {
        Self::AttributeType(id)
    }
}

impl From<ObjectClassId> for ModelRef {
    fn from(id: ObjectClassId) -> Self {
        Self::ObjectClass(id)
    }
}
