//! Registration Pass (Pass 1) - Register all type declarations.
//!
//! This pass walks every source tree and registers each type declaration
//! under its fully-qualified name, creating namespaces as it goes. It does
//! not look at members or attributes; those need every type to be known
//! and are handled by the completion pass.
//!
//! ## Partial types
//!
//! Declarations that share a name are merged into one [`TypeEntry`] when
//! all of them are `partial` and agree on their kind. Anything else is a
//! [`RegistrationError`], and the conflicting declaration (with its nested
//! types) is left out of the registry.

use derived_props_core::{
    DeclId, QualifiedName, RegistrationError, TypeEntry, TypeHash, TypeSource,
};
use derived_props_parser::{NamespaceMember, TypeDecl};
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::compilation::SourceTree;
use crate::registry::{TypeRegistry, type_identity};

/// Output of the registration pass.
#[derive(Debug, Default)]
pub struct RegistrationOutput {
    /// Number of distinct types registered.
    pub types_registered: usize,
    /// Number of declarations merged into an existing partial type.
    pub partials_merged: usize,
    /// The type each registered declaration belongs to.
    pub declarations: FxHashMap<DeclId, TypeHash>,
    /// Collected errors.
    pub errors: Vec<RegistrationError>,
}

/// The enclosing type of a nested declaration.
struct Container<'c> {
    hash: TypeHash,
    key: &'c str,
    name: &'c QualifiedName,
}

/// Pass 1: register all type declarations.
pub struct RegistrationPass<'a> {
    registry: &'a mut TypeRegistry,
    source: TypeSource,
    output: RegistrationOutput,
}

impl<'a> RegistrationPass<'a> {
    /// Create a new registration pass.
    pub fn new(registry: &'a mut TypeRegistry) -> Self {
        Self {
            registry,
            source: TypeSource::Source,
            output: RegistrationOutput::default(),
        }
    }

    /// Run the registration pass over the trees, in order.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(mut self, trees: &[SourceTree]) -> RegistrationOutput {
        for tree in trees {
            self.source = tree.kind;
            self.visit_members(&tree.syntax.members, &[]);
        }
        self.output
    }

    fn visit_members(&mut self, members: &[NamespaceMember], namespace: &[String]) {
        for member in members {
            match member {
                NamespaceMember::Namespace(ns) => {
                    let mut path = namespace.to_vec();
                    path.extend(ns.path());
                    self.registry.namespaces_mut().get_or_create_path(&path);
                    self.visit_members(&ns.members, &path);
                }
                NamespaceMember::Type(decl) => self.visit_type(decl, namespace, None),
            }
        }
    }

    fn visit_type(&mut self, decl: &TypeDecl, namespace: &[String], container: Option<Container<'_>>) {
        let name = decl.name.name.as_str();
        let arity = decl.type_params.len();
        let (qualified, key) = match &container {
            Some(c) => (c.name.child(name), type_identity(c.key, name, arity)),
            None => (
                QualifiedName::new(name, namespace.to_vec()),
                type_identity(&namespace.join("."), name, arity),
            ),
        };
        let hash = TypeHash::from_name(&key);

        let registered = match self.registry.get_mut(hash) {
            Some(existing) => {
                let both_partial = existing.modifiers.is_partial() && decl.modifiers.is_partial();
                if both_partial && existing.kind == decl.kind && existing.source == self.source {
                    existing.declarations.push(decl.id);
                    existing.modifiers |= decl.modifiers;
                    self.output.partials_merged += 1;
                    trace!(type_name = %qualified, decl = %decl.id, "merged partial declaration");
                    true
                } else if both_partial && existing.kind != decl.kind {
                    self.output.errors.push(RegistrationError::PartialKindMismatch {
                        name: qualified.to_string(),
                        first: existing.kind.keyword(),
                        second: decl.kind.keyword(),
                    });
                    false
                } else {
                    self.output.errors.push(RegistrationError::DuplicateType {
                        name: qualified.to_string(),
                        span: decl.name.span,
                    });
                    false
                }
            }
            None => {
                let mut entry = TypeEntry::new(qualified.clone(), namespace.to_vec(), decl.kind, self.source);
                entry.type_hash = hash;
                entry.modifiers = decl.modifiers;
                entry.type_params = decl.type_params.iter().map(|p| p.name.clone()).collect();
                entry.containing_type = container.as_ref().map(|c| c.hash);
                entry.declarations.push(decl.id);
                match self.registry.register_type(entry) {
                    Ok(()) => {
                        self.output.types_registered += 1;
                        true
                    }
                    Err(error) => {
                        self.output.errors.push(error);
                        false
                    }
                }
            }
        };

        if !registered {
            return;
        }
        self.output.declarations.insert(decl.id, hash);

        for nested in decl.nested_types() {
            let container = Container {
                hash,
                key: &key,
                name: &qualified,
            };
            self.visit_type(nested, namespace, Some(container));
        }
    }
}
