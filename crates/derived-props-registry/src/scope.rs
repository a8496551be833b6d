//! Declaration scopes for name lookup.
//!
//! A [`Scope`] describes what a simple name can refer to at one point of a
//! source tree: the enclosing types, then each enclosing namespace
//! declaration level with the `using` directives written at that level.
//! Levels hold the namespaces from innermost outwards and always end with
//! the global namespace, whose level carries the compilation-unit and
//! `global using` directives.

use derived_props_core::{TypeHash, TypeRef};
use petgraph::graph::NodeIndex;
use rustc_hash::FxHashMap;

/// What a `using` alias names.
#[derive(Debug, Clone, PartialEq)]
pub enum AliasTarget {
    Namespace(NodeIndex),
    Type(TypeRef),
}

/// One namespace level of a scope.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeLevel {
    /// Namespace searched at this level.
    pub namespace: NodeIndex,
    /// Namespaces imported by `using X.Y;` at this level.
    pub usings: Vec<NodeIndex>,
    /// Types imported by `using static X.Y;` at this level.
    pub static_usings: Vec<TypeHash>,
    /// `using A = X.Y;` aliases declared at this level.
    pub aliases: FxHashMap<String, AliasTarget>,
}

impl ScopeLevel {
    /// A level with no imports.
    pub fn new(namespace: NodeIndex) -> Self {
        Self {
            namespace,
            usings: Vec::new(),
            static_usings: Vec::new(),
            aliases: FxHashMap::default(),
        }
    }

    /// Whether this level declares any import.
    pub fn has_imports(&self) -> bool {
        !self.usings.is_empty() || !self.static_usings.is_empty() || !self.aliases.is_empty()
    }
}

/// Lookup scope at a point of a source tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scope {
    /// Enclosing types, innermost first.
    pub types: Vec<TypeHash>,
    /// Namespace levels, innermost first.
    pub levels: Vec<ScopeLevel>,
}

impl Scope {
    /// A scope at the top of a compilation unit.
    pub fn compilation_unit(root: ScopeLevel) -> Self {
        Self {
            types: Vec::new(),
            levels: vec![root],
        }
    }

    /// This scope with a new innermost namespace level.
    pub fn enter_namespace(&self, level: ScopeLevel) -> Self {
        let mut levels = Vec::with_capacity(self.levels.len() + 1);
        levels.push(level);
        levels.extend(self.levels.iter().cloned());
        Self {
            types: self.types.clone(),
            levels,
        }
    }

    /// This scope inside the body of `ty`.
    pub fn enter_type(&self, ty: TypeHash) -> Self {
        let mut types = Vec::with_capacity(self.types.len() + 1);
        types.push(ty);
        types.extend_from_slice(&self.types);
        Self {
            types,
            levels: self.levels.clone(),
        }
    }

    /// The innermost namespace.
    pub fn current_namespace(&self) -> Option<NodeIndex> {
        self.levels.first().map(|level| level.namespace)
    }

    /// The alias with this name, searching levels innermost first.
    pub fn alias(&self, name: &str) -> Option<&AliasTarget> {
        self.levels.iter().find_map(|level| level.aliases.get(name))
    }
}
