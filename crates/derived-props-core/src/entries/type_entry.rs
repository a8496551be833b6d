//! Type entry.
//!
//! A [`TypeEntry`] is the symbol for one named type. Partial declarations
//! of the same type share a single entry; their declarations, attributes
//! and members are appended in discovery order.

use crate::{DeclId, Modifiers, QualifiedName, TypeHash};

use super::{AttributeData, MemberEntry};

/// The syntactic kind of a type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    /// `record` / `record class`.
    Record,
    /// `record struct`.
    RecordStruct,
    Enum,
}

impl TypeKind {
    /// The declaration keyword(s) for this kind.
    pub fn keyword(self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Struct => "struct",
            TypeKind::Interface => "interface",
            TypeKind::Record => "record",
            TypeKind::RecordStruct => "record struct",
            TypeKind::Enum => "enum",
        }
    }
}

/// Where a type's symbol came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeSource {
    /// Declared in a source tree of the compilation; syntax is available.
    Source,
    /// Declared in a metadata-only reference; no member syntax.
    Metadata,
}

/// Registry entry for a named type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeEntry {
    /// Simple name (without type parameters).
    pub name: String,
    /// Fully qualified name; containing types appear in the path.
    pub qualified_name: QualifiedName,
    /// Namespace only, without containing types.
    pub namespace: Vec<String>,
    /// Type hash for identity.
    pub type_hash: TypeHash,
    pub kind: TypeKind,
    pub source: TypeSource,
    /// Union of modifiers across all declarations.
    pub modifiers: Modifiers,
    /// Declared type parameter names.
    pub type_params: Vec<String>,
    /// Enclosing type for nested declarations.
    pub containing_type: Option<TypeHash>,
    /// Every declaration of this type, in discovery order.
    pub declarations: Vec<DeclId>,
    /// Attributes from all declarations, in declaration order.
    pub attributes: Vec<AttributeData>,
    /// Members from all declarations, in declaration order.
    pub members: Vec<MemberEntry>,
}

impl TypeEntry {
    /// Create a new type entry with no declarations or members.
    pub fn new(
        qualified_name: QualifiedName,
        namespace: Vec<String>,
        kind: TypeKind,
        source: TypeSource,
    ) -> Self {
        Self {
            name: qualified_name.name.clone(),
            type_hash: qualified_name.to_type_hash(),
            qualified_name,
            namespace,
            kind,
            source,
            modifiers: Modifiers::empty(),
            type_params: Vec::new(),
            containing_type: None,
            declarations: Vec::new(),
            attributes: Vec::new(),
            members: Vec::new(),
        }
    }

    /// Get the type hash.
    #[inline]
    pub fn type_hash(&self) -> TypeHash {
        self.type_hash
    }

    /// Whether the type declares type parameters.
    #[inline]
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    /// All members with exactly this name.
    pub fn members_named<'a, 'n>(
        &'a self,
        name: &'n str,
    ) -> impl Iterator<Item = &'a MemberEntry> + use<'a, 'n> {
        self.members.iter().filter(move |m| m.name() == name)
    }

    /// Namespace joined with `.`; empty for the global namespace.
    pub fn namespace_string(&self) -> String {
        self.namespace.join(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entries::{FieldEntry, MemberEntry};
    use crate::TypeRef;

    #[test]
    fn new_entry_hash_matches_name() {
        let entry = TypeEntry::new(
            QualifiedName::from("App.Person"),
            vec!["App".into()],
            TypeKind::Class,
            TypeSource::Source,
        );
        assert_eq!(entry.name, "Person");
        assert_eq!(entry.type_hash(), TypeHash::from_name("App.Person"));
        assert_eq!(entry.namespace_string(), "App");
        assert!(!entry.is_generic());
    }

    #[test]
    fn members_named_filters_by_exact_name() {
        let mut entry = TypeEntry::new(
            QualifiedName::global("Names"),
            Vec::new(),
            TypeKind::Class,
            TypeSource::Source,
        );
        for name in ["First", "first", "First"] {
            entry.members.push(MemberEntry::Field(FieldEntry::new(
                name,
                TypeRef::Keyword("string".into()),
                Modifiers::CONST,
            )));
        }
        assert_eq!(entry.members_named("First").count(), 2);
        assert_eq!(entry.members_named("Last").count(), 0);
    }

    #[test]
    fn members_outlive_the_name() {
        let mut entry = TypeEntry::new(
            QualifiedName::global("Repo"),
            Vec::new(),
            TypeKind::Class,
            TypeSource::Source,
        );
        entry.members.push(MemberEntry::Field(FieldEntry::new(
            "Key",
            TypeRef::Keyword("string".into()),
            Modifiers::CONST,
        )));

        let found: Vec<&MemberEntry> = {
            let name = String::from("Key");
            entry.members_named(&name).collect()
        };
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name(), "Key");
    }
}
