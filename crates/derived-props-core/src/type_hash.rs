//! Deterministic hash-based type identity.
//!
//! [`TypeHash`] is a 64-bit hash that identifies a type by its fully
//! qualified name. Two lookups of the same name always produce the same
//! hash, so symbol identity can be compared without holding references into
//! the registry.
//!
//! # Examples
//!
//! ```
//! use derived_props_core::TypeHash;
//!
//! let a = TypeHash::from_name("Definitions.DerivedProperties");
//! let b = TypeHash::from_name("Definitions.DerivedProperties");
//! assert_eq!(a, b);
//! assert_ne!(a, TypeHash::from_name("Definitions.Other"));
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain-specific mixing constants for hash computation.
pub mod hash_constants {
    /// Domain marker for type hashes
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;

    /// Domain marker for type parameter hashes
    pub const TYPE_PARAM: u64 = 0x7d3c8b4a92e15f6d;
}

/// A deterministic 64-bit hash identifying a type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Create a type hash from a qualified type name.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Create a hash for a type parameter declared by `owner`.
    ///
    /// Type parameters are identified by their owner and position, not by
    /// name, so renaming `T` to `TItem` keeps the identity stable.
    #[inline]
    pub fn from_type_param(owner: TypeHash, index: usize) -> Self {
        TypeHash(
            hash_constants::TYPE_PARAM
                ^ owner.0.rotate_left(17)
                ^ xxh64(&(index as u64).to_le_bytes(), 0),
        )
    }

    /// Check whether this is the empty hash.
    #[inline]
    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        assert_eq!(TypeHash::from_name("App.Person"), TypeHash::from_name("App.Person"));
    }

    #[test]
    fn distinct_names_distinct_hashes() {
        assert_ne!(TypeHash::from_name("App.Person"), TypeHash::from_name("Other.Person"));
    }

    #[test]
    fn type_params_depend_on_owner_and_position() {
        let owner = TypeHash::from_name("App.Box");
        let other = TypeHash::from_name("App.Bag");
        assert_ne!(TypeHash::from_type_param(owner, 0), TypeHash::from_type_param(owner, 1));
        assert_ne!(TypeHash::from_type_param(owner, 0), TypeHash::from_type_param(other, 0));
    }

    #[test]
    fn empty_hash() {
        assert!(TypeHash::EMPTY.is_empty());
        assert!(!TypeHash::from_name("int").is_empty());
    }
}
