//! Compilations: parsed source trees plus their resolved type registry.
//!
//! A [`Compilation`] is built once from a set of sources and metadata
//! references and is immutable afterwards. Building runs the two passes:
//!
//! - [`RegistrationPass`] registers every type declaration
//! - [`CompletionPass`] resolves members, attributes and constants
//!
//! Metadata references are declaration-only sources standing in for
//! referenced assemblies. Their types resolve like any other, but their
//! property getters carry no source text.

use derived_props_core::{DeclId, ParseErrors, RegistrationError, SourceId, TypeEntry, TypeHash, TypeRef, TypeSource};
use derived_props_parser::{Attribute, Parser, SourceFile};
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;

use crate::passes::{CompletionPass, RegistrationPass};
use crate::registry::TypeRegistry;

/// Errors raised while building a [`Compilation`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompilationError {
    /// A source tree failed to parse.
    #[error("failed to parse '{file}': {errors}")]
    Parse { file: String, errors: ParseErrors },

    /// Declarations conflict with each other.
    #[error("{} registration error(s), first: {}", .0.len(), .0.first().map(ToString::to_string).unwrap_or_default())]
    Registration(Vec<RegistrationError>),
}

/// One parsed source tree.
#[derive(Debug, Clone)]
pub struct SourceTree {
    /// Identity of the tree within its compilation.
    pub id: SourceId,
    /// File name the tree was added under.
    pub name: String,
    /// Full source text.
    pub text: String,
    pub syntax: SourceFile,
    /// Whether the tree is user source or a metadata reference.
    pub kind: TypeSource,
}

impl SourceTree {
    /// Parse `text` into a tree.
    pub fn parse(id: SourceId, name: String, text: String, kind: TypeSource) -> Result<Self, ParseErrors> {
        let syntax = Parser::parse(&text, id)?;
        Ok(Self {
            id,
            name,
            text,
            syntax,
            kind,
        })
    }
}

/// Builder for a [`Compilation`].
///
/// # Example
///
/// ```
/// use derived_props_registry::Compilation;
///
/// let mut builder = Compilation::builder();
/// builder.add_source("Person.cs", "namespace App { public partial class Person { } }");
/// let compilation = builder.build().unwrap();
///
/// let person = compilation.type_by_metadata_name("App.Person").unwrap();
/// assert_eq!(compilation.type_display_name(person).as_deref(), Some("App.Person"));
/// ```
#[derive(Debug, Default)]
pub struct CompilationBuilder {
    inputs: Vec<(String, String, TypeSource)>,
}

impl CompilationBuilder {
    /// Add a user source file.
    pub fn add_source(&mut self, name: impl Into<String>, text: impl Into<String>) -> SourceId {
        self.push(name.into(), text.into(), TypeSource::Source)
    }

    /// Add a declaration-only metadata reference.
    pub fn add_metadata_reference(&mut self, name: impl Into<String>, text: impl Into<String>) -> SourceId {
        self.push(name.into(), text.into(), TypeSource::Metadata)
    }

    fn push(&mut self, name: String, text: String, kind: TypeSource) -> SourceId {
        let id = SourceId::new(self.inputs.len() as u32);
        self.inputs.push((name, text, kind));
        id
    }

    /// Parse every input and resolve the type registry.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn build(self) -> Result<Compilation, CompilationError> {
        let mut trees = Vec::with_capacity(self.inputs.len());
        for (index, (name, text, kind)) in self.inputs.into_iter().enumerate() {
            let id = SourceId::new(index as u32);
            match SourceTree::parse(id, name.clone(), text, kind) {
                Ok(tree) => trees.push(tree),
                Err(errors) => return Err(CompilationError::Parse { file: name, errors }),
            }
        }

        let mut registry = TypeRegistry::new();
        let registration = RegistrationPass::new(&mut registry).run(&trees);
        if !registration.errors.is_empty() {
            return Err(CompilationError::Registration(registration.errors));
        }

        let completion = CompletionPass::new(&mut registry, &registration.declarations).run(&trees);
        debug!(
            trees = trees.len(),
            types = registration.types_registered,
            partials = registration.partials_merged,
            members = completion.members_added,
            attributes = completion.attributes_recorded,
            unresolved_attributes = completion.unresolved_attributes,
            constants = completion.constants_evaluated,
            unresolved_usings = completion.unresolved_usings,
            "compilation built"
        );

        Ok(Compilation {
            trees,
            registry,
            declarations: registration.declarations,
        })
    }
}

/// Parsed source trees and the resolved types they declare.
#[derive(Debug)]
pub struct Compilation {
    trees: Vec<SourceTree>,
    registry: TypeRegistry,
    declarations: FxHashMap<DeclId, TypeHash>,
}

impl Compilation {
    /// Start building a compilation.
    pub fn builder() -> CompilationBuilder {
        CompilationBuilder::default()
    }

    /// All trees, in the order they were added.
    pub fn trees(&self) -> &[SourceTree] {
        &self.trees
    }

    /// User source trees, excluding metadata references.
    pub fn source_trees(&self) -> impl Iterator<Item = &SourceTree> {
        self.trees.iter().filter(|tree| tree.kind == TypeSource::Source)
    }

    pub fn tree(&self, id: SourceId) -> Option<&SourceTree> {
        self.trees.get(id.index() as usize)
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// The type a declaration contributes to.
    pub fn declared_type(&self, decl: DeclId) -> Option<TypeHash> {
        self.declarations.get(&decl).copied()
    }

    /// The attribute class an attribute usage on `decl` resolved to.
    pub fn attribute_class(&self, decl: DeclId, attribute: &Attribute) -> Option<TypeHash> {
        let entry = self.type_entry(self.declared_type(decl)?)?;
        entry
            .attributes
            .iter()
            .find(|data| data.declaration == decl && data.span == attribute.span)
            .and_then(|data| data.attribute_class)
    }

    pub fn type_entry(&self, hash: TypeHash) -> Option<&TypeEntry> {
        self.registry.get(hash)
    }

    /// Display name of a type, e.g. `App.Outer<T>.Inner`.
    pub fn type_display_name(&self, hash: TypeHash) -> Option<String> {
        self.registry.display_name(hash)
    }

    /// Find a type by metadata name (`App.Outer+Inner`, `App.Box`1`).
    pub fn type_by_metadata_name(&self, name: &str) -> Option<TypeHash> {
        self.registry.lookup_metadata_name(name)
    }

    /// Display a type reference in its unconstructed form.
    pub fn display_original_definition(&self, ty: &TypeRef) -> String {
        self.registry.display_original_definition(ty)
    }

    /// Display a type reference as written, with its type arguments.
    pub fn display_type(&self, ty: &TypeRef) -> String {
        self.registry.display_type(ty)
    }
}
