//! Identifier types for source trees and declarations.
//!
//! [`DeclId`] is the declaration identity used to deduplicate candidate
//! classes: two syntax nodes are the same declaration exactly when their
//! ids are equal.

use std::fmt;

/// Identifies a source tree within a compilation.
///
/// # Example
///
/// ```
/// use derived_props_core::SourceId;
///
/// let source = SourceId::new(0);
/// assert_eq!(source.index(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(u32);

impl SourceId {
    /// Create a new source ID with the given index.
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Get the underlying index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "source_{}", self.0)
    }
}

impl From<u32> for SourceId {
    fn from(index: u32) -> Self {
        Self::new(index)
    }
}

/// Identifies one type declaration inside a source tree.
///
/// Indices are assigned in document order (pre-order, so an outer type is
/// numbered before the types nested inside it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId {
    /// Source tree holding the declaration.
    pub source: SourceId,
    /// Position of the declaration within its tree.
    pub index: u32,
}

impl DeclId {
    /// Create a declaration id.
    #[inline]
    pub const fn new(source: SourceId, index: u32) -> Self {
        Self { source, index }
    }
}

impl fmt::Display for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.source, self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_id_display() {
        assert_eq!(SourceId::new(5).to_string(), "source_5");
    }

    #[test]
    fn decl_id_equality_and_order() {
        let a = DeclId::new(SourceId::new(0), 1);
        let b = DeclId::new(SourceId::new(0), 1);
        let c = DeclId::new(SourceId::new(1), 0);
        assert_eq!(a, b);
        assert!(a < c);
        assert_eq!(a.to_string(), "source_0#1");
    }
}
