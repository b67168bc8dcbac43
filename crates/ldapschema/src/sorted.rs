//! Ordered registry primitives
//!
//! Lists in the schema (the OID table, alias tables, relationship lists,
//! extensions) are kept sorted by a kind-specific comparator so lookups are
//! binary searches and duplicates are detected on insert.

use crate::Result;
use std::cmp::Ordering;

/// Outcome of a sorted insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// Item stored at this index
    Inserted(usize),
    /// An equal item already sits at this index; nothing was stored
    Duplicate(usize),
}

impl Insertion {
    #[must_use]
    pub fn is_duplicate(self) -> bool {
        matches!(self, Self::Duplicate(_))
    }
}

/// Insert `item` keeping `list` sorted by `compare`
///
/// # Errors
///
/// Returns [`crate::Error::OutOfMemory`] when the list cannot grow.
pub fn insert<T, F>(list: &mut Vec<T>, item: T, mut compare: F) -> Result<Insertion>
where
    F: FnMut(&T, &T) -> Ordering,
{
    match list.binary_search_by(|probe| compare(probe, &item)) {
        Ok(idx) => Ok(Insertion::Duplicate(idx)),
        Err(idx) => {
            list.try_reserve(1)?;
            list.insert(idx, item);
            Ok(Insertion::Inserted(idx))
        }
    }
}

/// Append `item` without ordering or duplicate checks
///
/// # Errors
///
/// Returns [`crate::Error::OutOfMemory`] when the list cannot grow.
pub fn append<T>(list: &mut Vec<T>, item: T) -> Result<()> {
    list.try_reserve(1)?;
    list.push(item);
    Ok(())
}

/// Find an item by probing with `compare(item)` (the item's ordering relative to the key)
pub fn find<T, F>(list: &[T], compare: F) -> Option<&T>
where
    F: FnMut(&T) -> Ordering,
{
    list.binary_search_by(compare).ok().map(|idx| &list[idx])
}

/// ASCII case-insensitive ordering used for names and aliases
#[must_use]
pub fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|c| c.to_ascii_lowercase())
        .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
}

/// Ordering of the global OID table
#[must_use]
pub fn cmp_oids(a: &str, b: &str) -> Ordering {
    a.cmp(b)
}
