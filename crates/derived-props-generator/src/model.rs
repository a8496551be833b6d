//! The semantic model a generation pass runs against.
//!
//! [`SourceModel`] is everything the pipeline asks of its host: the syntax
//! trees to scan and a handful of symbol queries. [`Compilation`]
//! implements it; hosts with their own front end can implement it too.

use derived_props_core::{DeclId, TypeEntry, TypeHash, TypeRef};
use derived_props_parser::{Attribute, SourceFile};
use derived_props_registry::Compilation;

/// Syntax and symbol queries over one compilation.
pub trait SourceModel {
    /// Syntax trees whose declarations may be candidates, in order.
    fn syntax_trees(&self) -> Vec<&SourceFile>;

    /// The attribute class an attribute usage on `decl` binds to.
    fn attribute_class(&self, decl: DeclId, attribute: &Attribute) -> Option<TypeHash>;

    /// Fully-qualified display name of a type, e.g. `App.Outer<T>.Inner`.
    fn type_display_name(&self, ty: TypeHash) -> Option<String>;

    /// The type symbol a declaration contributes to.
    fn declared_type(&self, decl: DeclId) -> Option<TypeHash>;

    /// Find a type by metadata name.
    fn type_by_metadata_name(&self, name: &str) -> Option<TypeHash>;

    fn type_entry(&self, ty: TypeHash) -> Option<&TypeEntry>;

    /// Render a type in its original, unconstructed definition form.
    fn display_original_definition(&self, ty: &TypeRef) -> String;
}

impl SourceModel for Compilation {
    fn syntax_trees(&self) -> Vec<&SourceFile> {
        self.source_trees().map(|tree| &tree.syntax).collect()
    }

    fn attribute_class(&self, decl: DeclId, attribute: &Attribute) -> Option<TypeHash> {
        Compilation::attribute_class(self, decl, attribute)
    }

    fn type_display_name(&self, ty: TypeHash) -> Option<String> {
        Compilation::type_display_name(self, ty)
    }

    fn declared_type(&self, decl: DeclId) -> Option<TypeHash> {
        Compilation::declared_type(self, decl)
    }

    fn type_by_metadata_name(&self, name: &str) -> Option<TypeHash> {
        Compilation::type_by_metadata_name(self, name)
    }

    fn type_entry(&self, ty: TypeHash) -> Option<&TypeEntry> {
        Compilation::type_entry(self, ty)
    }

    fn display_original_definition(&self, ty: &TypeRef) -> String {
        Compilation::display_original_definition(self, ty)
    }
}
