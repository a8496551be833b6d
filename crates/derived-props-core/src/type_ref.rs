//! Resolved type references.
//!
//! A [`TypeRef`] is what a written type (`List<int>`, `string?`, `T[]`)
//! resolves to in the scope where it was written. Named types keep the hash
//! of their definition so the registry can render either the constructed
//! form or the original (unconstructed) definition.

use crate::TypeHash;

/// A type as used by a member declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// Predefined keyword type (`int`, `string`, `object`, `void`, ...).
    Keyword(String),
    /// A named type, possibly generic.
    Named {
        /// Definition the name resolved to, if any.
        definition: Option<TypeHash>,
        /// Name as written, without type arguments.
        written: String,
        /// Type arguments in order (empty for non-generic uses).
        args: Vec<TypeRef>,
    },
    /// A type parameter in scope (`T`).
    TypeParameter(String),
    /// Array with the given rank (`T[]` is rank 1, `T[,]` is rank 2).
    Array { element: Box<TypeRef>, rank: u32 },
    /// Nullable type (`T?`).
    Nullable(Box<TypeRef>),
    /// Unmanaged pointer (`T*`).
    Pointer(Box<TypeRef>),
    /// Tuple type (`(int Count, string Name)`).
    Tuple(Vec<TupleElement>),
}

/// One element of a tuple type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TupleElement {
    pub ty: TypeRef,
    pub name: Option<String>,
}

impl TypeRef {
    /// Convenience constructor for an unresolved named type.
    pub fn unresolved(written: impl Into<String>, args: Vec<TypeRef>) -> Self {
        TypeRef::Named {
            definition: None,
            written: written.into(),
            args,
        }
    }

    /// The definition hash of a named type.
    pub fn definition(&self) -> Option<TypeHash> {
        match self {
            TypeRef::Named { definition, .. } => *definition,
            _ => None,
        }
    }

    /// Whether any part of this type failed to resolve.
    pub fn has_unresolved(&self) -> bool {
        match self {
            TypeRef::Keyword(_) | TypeRef::TypeParameter(_) => false,
            TypeRef::Named {
                definition, args, ..
            } => definition.is_none() || args.iter().any(TypeRef::has_unresolved),
            TypeRef::Array { element, .. } => element.has_unresolved(),
            TypeRef::Nullable(inner) | TypeRef::Pointer(inner) => inner.has_unresolved(),
            TypeRef::Tuple(elements) => elements.iter().any(|e| e.ty.has_unresolved()),
        }
    }
}
