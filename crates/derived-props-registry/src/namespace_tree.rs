//! Namespace Tree - hierarchical storage for type names.
//!
//! Uses `petgraph::DiGraph` with:
//! - Nodes: `NamespaceData` (top-level types declared at that level)
//! - Edges: the child namespace's simple name
//!
//! `using` directives are not edges here: they belong to a single
//! declaration scope, so they are carried by [`crate::scope::Scope`].

use derived_props_core::TypeHash;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashMap;

/// Result of name resolution that may be ambiguous.
///
/// When several `using` directives bring the same name into scope the
/// lookup is ambiguous, and the name is treated as unresolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionResult<T> {
    /// Found exactly one match.
    Found(T),
    /// Found multiple matches from different imports.
    Ambiguous(Vec<T>),
    /// Not found in any searched location.
    NotFound,
}

impl<T> ResolutionResult<T> {
    /// Check if resolution found exactly one match.
    pub fn is_found(&self) -> bool {
        matches!(self, ResolutionResult::Found(_))
    }

    /// Check if resolution was ambiguous.
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, ResolutionResult::Ambiguous(_))
    }

    /// Check if the name was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolutionResult::NotFound)
    }

    /// Convert to Option, returning Some for Found, None otherwise.
    pub fn ok(self) -> Option<T> {
        match self {
            ResolutionResult::Found(v) => Some(v),
            _ => None,
        }
    }
}

impl<T: PartialEq> ResolutionResult<T> {
    /// Build a result from the distinct matches found at one scope level.
    pub fn from_matches(mut matches: Vec<T>) -> Self {
        let mut distinct: Vec<T> = Vec::with_capacity(matches.len());
        for candidate in matches.drain(..) {
            if !distinct.contains(&candidate) {
                distinct.push(candidate);
            }
        }
        match distinct.len() {
            0 => ResolutionResult::NotFound,
            1 => match distinct.pop() {
                Some(only) => ResolutionResult::Found(only),
                None => ResolutionResult::NotFound,
            },
            _ => ResolutionResult::Ambiguous(distinct),
        }
    }
}

/// Data stored in each namespace node.
#[derive(Debug, Default)]
pub struct NamespaceData {
    /// Top-level types in this namespace by simple name.
    /// Vec holds the generic arities declared under the same name.
    pub types: FxHashMap<String, Vec<TypeHash>>,
}

impl NamespaceData {
    pub fn new() -> Self {
        Self::default()
    }
}

/// The namespace graph.
#[derive(Debug)]
pub struct NamespaceTree {
    /// The directed graph storing all namespaces.
    graph: DiGraph<NamespaceData, String>,

    /// The root (global) namespace node.
    root: NodeIndex,

    /// Reverse index: TypeHash -> namespace node, for top-level types.
    type_hash_index: FxHashMap<TypeHash, NodeIndex>,
}

impl Default for NamespaceTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceTree {
    /// Create a new namespace tree with an empty root.
    pub fn new() -> Self {
        let mut graph = DiGraph::new();
        let root = graph.add_node(NamespaceData::new());
        Self {
            graph,
            root,
            type_hash_index: FxHashMap::default(),
        }
    }

    /// Get the root namespace node index.
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Get a namespace node's data.
    pub fn get_namespace(&self, node: NodeIndex) -> Option<&NamespaceData> {
        self.graph.node_weight(node)
    }

    /// Get a mutable reference to a namespace node's data.
    pub fn get_namespace_mut(&mut self, node: NodeIndex) -> Option<&mut NamespaceData> {
        self.graph.node_weight_mut(node)
    }

    /// Number of namespaces, including the root.
    pub fn namespace_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Find a child namespace by name.
    pub fn find_child(&self, parent: NodeIndex, name: &str) -> Option<NodeIndex> {
        self.graph
            .edges(parent)
            .find(|edge| edge.weight() == name)
            .map(|edge| edge.target())
    }

    /// Get or create a child namespace.
    pub fn get_or_create_child(&mut self, parent: NodeIndex, name: &str) -> NodeIndex {
        if let Some(child) = self.find_child(parent, name) {
            return child;
        }

        let child = self.graph.add_node(NamespaceData::new());
        self.graph.add_edge(parent, child, name.to_string());
        child
    }

    /// Get or create a namespace path from root.
    pub fn get_or_create_path<S: AsRef<str>>(&mut self, path: &[S]) -> NodeIndex {
        let mut current = self.root;
        for segment in path {
            current = self.get_or_create_child(current, segment.as_ref());
        }
        current
    }

    /// Get an existing namespace by path, or None if it doesn't exist.
    pub fn get_path<S: AsRef<str>>(&self, path: &[S]) -> Option<NodeIndex> {
        self.get_relative_path(self.root, path)
    }

    /// Walk `path` downwards from `start`.
    pub fn get_relative_path<S: AsRef<str>>(&self, start: NodeIndex, path: &[S]) -> Option<NodeIndex> {
        let mut current = start;
        for segment in path {
            current = self.find_child(current, segment.as_ref())?;
        }
        Some(current)
    }

    /// Find the parent namespace of a node.
    pub fn find_parent(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .edges_directed(node, Direction::Incoming)
            .next()
            .map(|edge| edge.source())
    }

    /// Get the simple name of a namespace node.
    pub fn get_namespace_name(&self, node: NodeIndex) -> Option<&str> {
        if node == self.root {
            return None;
        }
        self.graph
            .edges_directed(node, Direction::Incoming)
            .next()
            .map(|edge| edge.weight().as_str())
    }

    /// Get the full namespace path for a node.
    pub fn get_namespace_path(&self, node: NodeIndex) -> Vec<String> {
        let mut path = Vec::new();
        let mut current = node;

        while current != self.root {
            if let Some(name) = self.get_namespace_name(current) {
                path.push(name.to_string());
            }
            match self.find_parent(current) {
                Some(parent) => current = parent,
                None => break,
            }
        }

        path.reverse();
        path
    }

    /// The node and its ancestors, innermost first, ending at the root.
    pub fn ancestors(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut chain = vec![node];
        let mut current = node;
        while let Some(parent) = self.find_parent(current) {
            chain.push(parent);
            current = parent;
        }
        chain
    }

    // ========================================================================
    // Type Registration
    // ========================================================================

    /// Register a top-level type under its simple name.
    ///
    /// Registering the same hash twice is a no-op, so partial declarations
    /// can call this for every declaration.
    pub fn register_type(&mut self, node: NodeIndex, name: &str, hash: TypeHash) {
        let Some(data) = self.graph.node_weight_mut(node) else {
            return;
        };
        let arities = data.types.entry(name.to_string()).or_default();
        if !arities.contains(&hash) {
            arities.push(hash);
        }
        self.type_hash_index.insert(hash, node);
    }

    /// Types declared directly in `node` with this simple name.
    pub fn types_named(&self, node: NodeIndex, name: &str) -> &[TypeHash] {
        self.graph
            .node_weight(node)
            .and_then(|data| data.types.get(name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The namespace a top-level type was registered in.
    pub fn namespace_of(&self, hash: TypeHash) -> Option<NodeIndex> {
        self.type_hash_index.get(&hash).copied()
    }
}
