//! Type resolution for converting written types to [`TypeRef`]s.
//!
//! This module provides [`TypeResolver`], which looks names up in a
//! [`Scope`] against the [`TypeRegistry`].
//!
//! ## Lookup order for a simple name
//!
//! 1. Type parameters of the enclosing types, innermost first
//! 2. Types nested in the enclosing types, innermost first
//! 3. For each namespace level, innermost first:
//!    - types declared in that namespace
//!    - `using` aliases declared at that level
//!    - types imported by that level's `using` and `using static`
//!      directives; two different matches make the name ambiguous
//!
//! Qualified names resolve their first segment as a type (then walk
//! nested types) or as a namespace relative to each level. `global::`
//! starts from the root namespace.

use derived_props_core::{TupleElement, TypeHash, TypeRef};
use derived_props_parser::{NamedType, TypeSegment, TypeSyntax};
use petgraph::graph::NodeIndex;

use crate::namespace_tree::ResolutionResult;
use crate::registry::TypeRegistry;
use crate::scope::{AliasTarget, Scope};

/// Resolves written types within one scope.
pub struct TypeResolver<'a> {
    registry: &'a TypeRegistry,
    scope: &'a Scope,
}

impl<'a> TypeResolver<'a> {
    /// Create a resolver for `scope`.
    pub fn new(registry: &'a TypeRegistry, scope: &'a Scope) -> Self {
        Self { registry, scope }
    }

    /// The scope names are resolved in.
    pub fn scope(&self) -> &'a Scope {
        self.scope
    }

    /// The registry names are resolved against.
    pub fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }

    /// Resolve a written type. Names that fail to resolve are kept as
    /// written, with no definition.
    pub fn resolve(&self, ty: &TypeSyntax) -> TypeRef {
        match ty {
            TypeSyntax::Predefined { keyword, .. } => TypeRef::Keyword(keyword.clone()),
            TypeSyntax::Named(named) => self.resolve_named(named),
            TypeSyntax::Array { element, rank, .. } => TypeRef::Array {
                element: Box::new(self.resolve(element)),
                rank: *rank,
            },
            TypeSyntax::Nullable { inner, .. } => TypeRef::Nullable(Box::new(self.resolve(inner))),
            TypeSyntax::Pointer { inner, .. } => TypeRef::Pointer(Box::new(self.resolve(inner))),
            TypeSyntax::Tuple { elements, .. } => TypeRef::Tuple(
                elements
                    .iter()
                    .map(|element| TupleElement {
                        ty: self.resolve(&element.ty),
                        name: element.name.as_ref().map(|n| n.name.clone()),
                    })
                    .collect(),
            ),
        }
    }

    /// Resolve a named type, including its type arguments.
    pub fn resolve_named(&self, named: &NamedType) -> TypeRef {
        if named.alias.is_none()
            && let [segment] = named.segments.as_slice()
            && segment.type_args.is_empty()
            && self.is_type_parameter(&segment.name.name)
        {
            return TypeRef::TypeParameter(segment.name.name.clone());
        }

        let written = match &named.alias {
            Some(alias) => format!("{}::{}", alias.name, named.dotted_name()),
            None => named.dotted_name(),
        };
        let args = named
            .segments
            .iter()
            .flat_map(|segment| segment.type_args.iter())
            .map(|arg| self.resolve(arg))
            .collect();

        TypeRef::Named {
            definition: self.lookup_type(named).ok(),
            written,
            args,
        }
    }

    /// Whether `name` is a type parameter of an enclosing type.
    pub fn is_type_parameter(&self, name: &str) -> bool {
        self.scope.types.iter().any(|&ty| {
            self.registry
                .get(ty)
                .is_some_and(|entry| entry.type_params.iter().any(|p| p == name))
        })
    }

    /// Resolve an attribute name to its class: the name as written, then
    /// with the `Attribute` suffix appended.
    pub fn lookup_attribute(&self, name: &TypeSyntax) -> Option<TypeHash> {
        let named = name.as_named()?;
        match self.lookup_type(named) {
            ResolutionResult::Found(hash) => return Some(hash),
            ResolutionResult::Ambiguous(_) => return None,
            ResolutionResult::NotFound => {}
        }

        let mut suffixed = named.clone();
        let last = suffixed.segments.last_mut()?;
        last.name.name.push_str("Attribute");
        self.lookup_type(&suffixed).ok()
    }

    /// Resolve a (possibly qualified) type name to its definition.
    pub fn lookup_type(&self, named: &NamedType) -> ResolutionResult<TypeHash> {
        if let Some(alias) = &named.alias {
            if alias.name == "global" {
                return self.resolve_in_namespace(self.registry.namespaces().root(), &named.segments);
            }
            return match self.scope.alias(&alias.name) {
                Some(AliasTarget::Namespace(node)) => self.resolve_in_namespace(*node, &named.segments),
                _ => ResolutionResult::NotFound,
            };
        }

        let Some((first, rest)) = named.segments.split_first() else {
            return ResolutionResult::NotFound;
        };

        match self.lookup_simple(&first.name.name, first.type_args.len()) {
            ResolutionResult::Found(hash) => {
                return self.walk_nested(hash, rest).map_or(ResolutionResult::NotFound, ResolutionResult::Found);
            }
            ResolutionResult::Ambiguous(matches) => return ResolutionResult::Ambiguous(matches),
            ResolutionResult::NotFound => {}
        }

        if rest.is_empty() || !first.type_args.is_empty() {
            return ResolutionResult::NotFound;
        }

        if let Some(AliasTarget::Namespace(node)) = self.scope.alias(&first.name.name) {
            return self.resolve_in_namespace(*node, rest);
        }

        let tree = self.registry.namespaces();
        for level in &self.scope.levels {
            if let Some(node) = tree.find_child(level.namespace, &first.name.name) {
                let result = self.resolve_in_namespace(node, rest);
                if !result.is_not_found() {
                    return result;
                }
            }
        }
        ResolutionResult::NotFound
    }

    /// Resolve a simple name with the given number of type arguments.
    pub fn lookup_simple(&self, name: &str, arity: usize) -> ResolutionResult<TypeHash> {
        for &ty in &self.scope.types {
            if let Some(hash) = self.registry.find_nested(ty, name, arity) {
                return ResolutionResult::Found(hash);
            }
        }

        for level in &self.scope.levels {
            if let Some(hash) = self.registry.find_in_namespace(level.namespace, name, arity) {
                return ResolutionResult::Found(hash);
            }

            if arity == 0
                && let Some(AliasTarget::Type(ty)) = level.aliases.get(name)
                && let Some(hash) = ty.definition()
            {
                return ResolutionResult::Found(hash);
            }

            let imported = level
                .usings
                .iter()
                .filter_map(|&ns| self.registry.find_in_namespace(ns, name, arity))
                .chain(
                    level
                        .static_usings
                        .iter()
                        .filter_map(|&ty| self.registry.find_nested(ty, name, arity)),
                )
                .collect();
            match ResolutionResult::from_matches(imported) {
                ResolutionResult::NotFound => continue,
                result => return result,
            }
        }

        ResolutionResult::NotFound
    }

    /// Resolve a namespace name relative to each level, innermost first.
    ///
    /// A single-segment name may also be a namespace alias.
    pub fn lookup_namespace<S: AsRef<str>>(&self, path: &[S]) -> Option<NodeIndex> {
        let tree = self.registry.namespaces();
        if let [only] = path
            && let Some(AliasTarget::Namespace(node)) = self.scope.alias(only.as_ref())
        {
            return Some(*node);
        }
        self.scope
            .levels
            .iter()
            .find_map(|level| tree.get_relative_path(level.namespace, path))
    }

    /// Resolve `segments` starting in namespace `node`: leading segments
    /// name namespaces, the first type found continues through nested types.
    fn resolve_in_namespace(&self, node: NodeIndex, segments: &[TypeSegment]) -> ResolutionResult<TypeHash> {
        let tree = self.registry.namespaces();
        let mut current = node;
        for (i, segment) in segments.iter().enumerate() {
            let name = &segment.name.name;
            if let Some(hash) = self.registry.find_in_namespace(current, name, segment.type_args.len()) {
                return self
                    .walk_nested(hash, &segments[i + 1..])
                    .map_or(ResolutionResult::NotFound, ResolutionResult::Found);
            }
            if !segment.type_args.is_empty() {
                return ResolutionResult::NotFound;
            }
            match tree.find_child(current, name) {
                Some(child) => current = child,
                None => return ResolutionResult::NotFound,
            }
        }
        ResolutionResult::NotFound
    }

    fn walk_nested(&self, start: TypeHash, segments: &[TypeSegment]) -> Option<TypeHash> {
        segments.iter().try_fold(start, |container, segment| {
            self.registry
                .find_nested(container, &segment.name.name, segment.type_args.len())
        })
    }
}
