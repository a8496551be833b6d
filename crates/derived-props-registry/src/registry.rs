//! TypeRegistry - storage for every type symbol of a compilation.
//!
//! Types are stored in a single map by [`TypeHash`]. Top-level types are
//! also indexed by simple name in the [`NamespaceTree`]; nested types are
//! indexed under their containing type.
//!
//! # Identity
//!
//! A type's hash is computed from its metadata-style name: the namespace,
//! containing types and simple name joined with `.`, with a `` `N`` arity
//! suffix on every generic segment (`App.Outer`1.Inner`). Non-generic
//! types therefore hash exactly like their display name.
//!
//! # Example
//!
//! ```
//! use derived_props_core::{QualifiedName, TypeEntry, TypeKind, TypeSource};
//! use derived_props_registry::TypeRegistry;
//!
//! let mut registry = TypeRegistry::new();
//! let entry = TypeEntry::new(
//!     QualifiedName::from("Definitions.DerivedProperties"),
//!     vec!["Definitions".into()],
//!     TypeKind::Class,
//!     TypeSource::Source,
//! );
//! let hash = entry.type_hash;
//! registry.register_type(entry).unwrap();
//!
//! assert_eq!(registry.lookup_metadata_name("Definitions.DerivedProperties"), Some(hash));
//! assert_eq!(registry.display_name(hash).as_deref(), Some("Definitions.DerivedProperties"));
//! ```

use derived_props_core::{
    QualifiedName, RegistrationError, Span, TupleElement, TypeEntry, TypeHash, TypeRef,
};
use petgraph::graph::NodeIndex;
use rustc_hash::FxHashMap;

use crate::namespace_tree::NamespaceTree;

/// Build the identity key for a type declared under `parent`.
///
/// `parent` is the namespace string for top-level types, or the
/// containing type's key for nested ones.
pub fn type_identity(parent: &str, name: &str, arity: usize) -> String {
    let mut key = String::with_capacity(parent.len() + name.len() + 3);
    if !parent.is_empty() {
        key.push_str(parent);
        key.push('.');
    }
    key.push_str(name);
    if arity > 0 {
        key.push('`');
        key.push_str(&arity.to_string());
    }
    key
}

/// Split a metadata name segment into its name and optional arity suffix.
fn split_arity(segment: &str) -> (&str, Option<usize>) {
    match segment.rsplit_once('`') {
        Some((name, arity)) => match arity.parse() {
            Ok(arity) => (name, Some(arity)),
            Err(_) => (segment, None),
        },
        None => (segment, None),
    }
}

/// Type registry.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    /// All types by hash.
    types: FxHashMap<TypeHash, TypeEntry>,

    /// Registration order, for deterministic iteration.
    order: Vec<TypeHash>,

    /// Nested types by containing type, in registration order.
    nested: FxHashMap<TypeHash, Vec<TypeHash>>,

    /// Namespace hierarchy with top-level types.
    namespaces: NamespaceTree,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Get a type by hash.
    pub fn get(&self, hash: TypeHash) -> Option<&TypeEntry> {
        self.types.get(&hash)
    }

    /// Get a mutable type by hash.
    pub fn get_mut(&mut self, hash: TypeHash) -> Option<&mut TypeEntry> {
        self.types.get_mut(&hash)
    }

    /// Check whether a type is registered.
    pub fn contains(&self, hash: TypeHash) -> bool {
        self.types.contains_key(&hash)
    }

    /// All types, in registration order.
    pub fn types(&self) -> impl Iterator<Item = &TypeEntry> {
        self.order.iter().filter_map(|hash| self.types.get(hash))
    }

    /// Number of registered types.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// The namespace hierarchy.
    pub fn namespaces(&self) -> &NamespaceTree {
        &self.namespaces
    }

    /// Mutable access to the namespace hierarchy.
    pub fn namespaces_mut(&mut self) -> &mut NamespaceTree {
        &mut self.namespaces
    }

    /// Types nested directly inside `container`.
    pub fn nested_types(&self, container: TypeHash) -> &[TypeHash] {
        self.nested.get(&container).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Find a nested type by simple name and arity.
    pub fn find_nested(&self, container: TypeHash, name: &str, arity: usize) -> Option<TypeHash> {
        self.nested_types(container)
            .iter()
            .copied()
            .find(|&hash| self.matches(hash, name, arity))
    }

    /// Find a top-level type in a namespace by simple name and arity.
    pub fn find_in_namespace(&self, node: NodeIndex, name: &str, arity: usize) -> Option<TypeHash> {
        self.namespaces
            .types_named(node, name)
            .iter()
            .copied()
            .find(|&hash| self.matches(hash, name, arity))
    }

    fn matches(&self, hash: TypeHash, name: &str, arity: usize) -> bool {
        self.get(hash)
            .is_some_and(|entry| entry.name == name && entry.type_params.len() == arity)
    }

    /// Look up a type by metadata name.
    ///
    /// Segments are separated by `.` or `+`. A `` `N`` arity suffix narrows
    /// the match; without one, the non-generic type is preferred and any
    /// single generic type of that name is accepted.
    pub fn lookup_metadata_name(&self, name: &str) -> Option<TypeHash> {
        let name = name.strip_prefix("global::").unwrap_or(name);
        let segments: Vec<(&str, Option<usize>)> = name
            .split(['.', '+'])
            .filter(|s| !s.is_empty())
            .map(split_arity)
            .collect();
        if segments.is_empty() {
            return None;
        }

        let names: Vec<&str> = segments.iter().map(|(name, _)| *name).collect();
        for ns_len in (0..segments.len()).rev() {
            let Some(node) = self.namespaces.get_path(&names[..ns_len]) else {
                continue;
            };
            let (first, arity) = segments[ns_len];
            let found = self.pick_arity(self.namespaces.types_named(node, first), arity);
            let Some(mut current) = found else {
                continue;
            };
            let mut complete = true;
            for &(nested, arity) in &segments[ns_len + 1..] {
                let candidates: Vec<TypeHash> = self
                    .nested_types(current)
                    .iter()
                    .copied()
                    .filter(|&h| self.get(h).is_some_and(|e| e.name == nested))
                    .collect();
                match self.pick_arity(&candidates, arity) {
                    Some(next) => current = next,
                    None => {
                        complete = false;
                        break;
                    }
                }
            }
            if complete {
                return Some(current);
            }
        }
        None
    }

    fn pick_arity(&self, candidates: &[TypeHash], arity: Option<usize>) -> Option<TypeHash> {
        let arity_of = |hash: &TypeHash| self.get(*hash).map(|e| e.type_params.len());
        match arity {
            Some(n) => candidates.iter().copied().find(|h| arity_of(h) == Some(n)),
            None => candidates
                .iter()
                .copied()
                .find(|h| arity_of(h) == Some(0))
                .or(match candidates {
                    [only] => Some(*only),
                    _ => None,
                }),
        }
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register a new type.
    ///
    /// Top-level types are indexed in their namespace; nested types under
    /// their containing type, which must already be registered.
    pub fn register_type(&mut self, entry: TypeEntry) -> Result<(), RegistrationError> {
        let hash = entry.type_hash;
        if self.types.contains_key(&hash) {
            return Err(RegistrationError::DuplicateType {
                name: entry.qualified_name.to_string(),
                span: Span::default(),
            });
        }

        match entry.containing_type {
            Some(container) => {
                if !self.types.contains_key(&container) {
                    return Err(RegistrationError::InvalidNamespace);
                }
                self.nested.entry(container).or_default().push(hash);
            }
            None => {
                let node = self.namespaces.get_or_create_path(&entry.namespace);
                self.namespaces.register_type(node, &entry.name, hash);
            }
        }

        self.order.push(hash);
        self.types.insert(hash, entry);
        Ok(())
    }

    // ========================================================================
    // Display
    // ========================================================================

    /// Fully-qualified display name of a type definition, with its own
    /// type parameters: `App.Outer<T>.Inner`.
    pub fn display_name(&self, hash: TypeHash) -> Option<String> {
        let entry = self.get(hash)?;
        let mut text = match entry.containing_type.and_then(|c| self.display_name(c)) {
            Some(container) => container,
            None => entry.namespace_string(),
        };
        if !text.is_empty() {
            text.push('.');
        }
        text.push_str(&entry.name);
        if entry.is_generic() {
            text.push('<');
            text.push_str(&entry.type_params.join(", "));
            text.push('>');
        }
        Some(text)
    }

    /// Qualified name of a type, without type parameters.
    pub fn qualified_name(&self, hash: TypeHash) -> Option<&QualifiedName> {
        self.get(hash).map(|entry| &entry.qualified_name)
    }

    /// Render a type as written, with its arguments: `App.Box<int>`.
    pub fn display_type(&self, ty: &TypeRef) -> String {
        match ty {
            TypeRef::Keyword(keyword) => keyword.clone(),
            TypeRef::TypeParameter(name) => name.clone(),
            TypeRef::Named {
                definition,
                written,
                args,
            } => {
                let mut text = definition
                    .and_then(|hash| self.qualified_name(hash))
                    .map(ToString::to_string)
                    .unwrap_or_else(|| written.clone());
                if !args.is_empty() {
                    let args: Vec<String> = args.iter().map(|a| self.display_type(a)).collect();
                    text.push('<');
                    text.push_str(&args.join(", "));
                    text.push('>');
                }
                text
            }
            TypeRef::Array { element, rank } => {
                let commas = ",".repeat(rank.saturating_sub(1) as usize);
                format!("{}[{commas}]", self.display_type(element))
            }
            TypeRef::Nullable(inner) => format!("{}?", self.display_type(inner)),
            TypeRef::Pointer(inner) => format!("{}*", self.display_type(inner)),
            TypeRef::Tuple(elements) => {
                let elements: Vec<String> =
                    elements.iter().map(|e| self.display_tuple_element(e)).collect();
                format!("({})", elements.join(", "))
            }
        }
    }

    fn display_tuple_element(&self, element: &TupleElement) -> String {
        match &element.name {
            Some(name) => format!("{} {name}", self.display_type(&element.ty)),
            None => self.display_type(&element.ty),
        }
    }

    /// Render the original (unconstructed) definition of a type.
    ///
    /// A resolved named type renders as its definition with the
    /// definition's own type parameters, so `List<int>` becomes
    /// `System.Collections.Generic.List<T>`. Every other shape renders as
    /// [`display_type`](Self::display_type) does.
    pub fn display_original_definition(&self, ty: &TypeRef) -> String {
        match ty {
            TypeRef::Named {
                definition: Some(hash),
                ..
            } => self
                .display_name(*hash)
                .unwrap_or_else(|| self.display_type(ty)),
            _ => self.display_type(ty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use derived_props_core::{TypeKind, TypeSource};

    fn make_type(qualified: &str, namespace: &[&str], params: &[&str]) -> TypeEntry {
        let mut entry = TypeEntry::new(
            QualifiedName::from(qualified),
            namespace.iter().map(|s| s.to_string()).collect(),
            TypeKind::Class,
            TypeSource::Source,
        );
        entry.type_params = params.iter().map(|s| s.to_string()).collect();
        let parent = entry.namespace_string();
        entry.type_hash = TypeHash::from_name(&type_identity(&parent, &entry.name, params.len()));
        entry
    }

    fn nested(container: &TypeEntry, key: &str, name: &str) -> TypeEntry {
        let mut entry = TypeEntry::new(
            container.qualified_name.child(name),
            container.namespace.clone(),
            TypeKind::Class,
            TypeSource::Source,
        );
        entry.containing_type = Some(container.type_hash);
        entry.type_hash = TypeHash::from_name(&type_identity(key, name, 0));
        entry
    }

    #[test]
    fn identity_keys() {
        assert_eq!(type_identity("", "Person", 0), "Person");
        assert_eq!(type_identity("App", "Box", 1), "App.Box`1");
        assert_eq!(type_identity("App.Outer`1", "Inner", 0), "App.Outer`1.Inner");
    }

    #[test]
    fn register_and_get() {
        let mut registry = TypeRegistry::new();
        let entry = make_type("App.Person", &["App"], &[]);
        let hash = entry.type_hash;
        registry.register_type(entry).unwrap();

        assert!(registry.contains(hash));
        assert_eq!(registry.type_count(), 1);
        let ns = registry.namespaces().get_path(&["App"]).unwrap();
        assert_eq!(registry.find_in_namespace(ns, "Person", 0), Some(hash));
        assert_eq!(registry.find_in_namespace(ns, "Person", 1), None);
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut registry = TypeRegistry::new();
        registry.register_type(make_type("App.Person", &["App"], &[])).unwrap();
        let result = registry.register_type(make_type("App.Person", &["App"], &[]));
        assert!(matches!(result, Err(RegistrationError::DuplicateType { name, .. }) if name == "App.Person"));
    }

    #[test]
    fn nested_requires_container() {
        let mut registry = TypeRegistry::new();
        let outer = make_type("App.Outer", &["App"], &[]);
        let inner = nested(&outer, "App.Outer", "Inner");
        assert_eq!(
            registry.register_type(inner.clone()),
            Err(RegistrationError::InvalidNamespace)
        );
        let outer_hash = outer.type_hash;
        registry.register_type(outer).unwrap();
        let inner_hash = inner.type_hash;
        registry.register_type(inner).unwrap();
        assert_eq!(registry.find_nested(outer_hash, "Inner", 0), Some(inner_hash));
    }

    #[test]
    fn metadata_lookup() {
        let mut registry = TypeRegistry::new();
        let list = make_type("System.Collections.Generic.List", &["System", "Collections", "Generic"], &["T"]);
        let list_hash = list.type_hash;
        registry.register_type(list).unwrap();
        let outer = make_type("App.Outer", &["App"], &[]);
        let outer_hash = outer.type_hash;
        let inner = nested(&outer, "App.Outer", "Inner");
        let inner_hash = inner.type_hash;
        registry.register_type(outer).unwrap();
        registry.register_type(inner).unwrap();

        assert_eq!(registry.lookup_metadata_name("System.Collections.Generic.List`1"), Some(list_hash));
        assert_eq!(registry.lookup_metadata_name("System.Collections.Generic.List"), Some(list_hash));
        assert_eq!(registry.lookup_metadata_name("System.Collections.Generic.List`2"), None);
        assert_eq!(registry.lookup_metadata_name("App.Outer"), Some(outer_hash));
        assert_eq!(registry.lookup_metadata_name("App.Outer+Inner"), Some(inner_hash));
        assert_eq!(registry.lookup_metadata_name("App.Outer.Inner"), Some(inner_hash));
        assert_eq!(registry.lookup_metadata_name("App.Missing"), None);
        assert_eq!(registry.lookup_metadata_name(""), None);
    }

    #[test]
    fn display_forms() {
        let mut registry = TypeRegistry::new();
        let list = make_type("System.Collections.Generic.List", &["System", "Collections", "Generic"], &["T"]);
        let list_hash = list.type_hash;
        registry.register_type(list).unwrap();

        let constructed = TypeRef::Named {
            definition: Some(list_hash),
            written: "List".into(),
            args: vec![TypeRef::Keyword("int".into())],
        };
        assert_eq!(registry.display_type(&constructed), "System.Collections.Generic.List<int>");
        assert_eq!(
            registry.display_original_definition(&constructed),
            "System.Collections.Generic.List<T>"
        );

        let unresolved = TypeRef::unresolved("Missing", vec![TypeRef::TypeParameter("T".into())]);
        assert_eq!(registry.display_original_definition(&unresolved), "Missing<T>");

        let array = TypeRef::Array {
            element: Box::new(TypeRef::Nullable(Box::new(TypeRef::Keyword("int".into())))),
            rank: 2,
        };
        assert_eq!(registry.display_original_definition(&array), "int?[,]");

        let tuple = TypeRef::Tuple(vec![
            TupleElement { ty: TypeRef::Keyword("int".into()), name: Some("Count".into()) },
            TupleElement { ty: TypeRef::Pointer(Box::new(TypeRef::Keyword("byte".into()))), name: None },
        ]);
        assert_eq!(registry.display_type(&tuple), "(int Count, byte*)");
    }

    #[test]
    fn nested_display_name_includes_container_params() {
        let mut registry = TypeRegistry::new();
        let outer = make_type("App.Outer", &["App"], &["T"]);
        let inner = nested(&outer, "App.Outer`1", "Inner");
        let inner_hash = inner.type_hash;
        registry.register_type(outer).unwrap();
        registry.register_type(inner).unwrap();
        assert_eq!(registry.display_name(inner_hash).as_deref(), Some("App.Outer<T>.Inner"));
    }

    #[test]
    fn types_iterate_in_registration_order() {
        let mut registry = TypeRegistry::new();
        for name in ["C", "A", "B"] {
            registry.register_type(make_type(name, &[], &[])).unwrap();
        }
        let names: Vec<&str> = registry.types().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }
}
