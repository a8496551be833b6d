//! Abstract syntax tree for declaration sources.
//!
//! This module provides:
//! - AST node definitions for namespaces, type declarations and members
//! - Parser for transforming tokens into AST
//! - Visitor pattern and [`SyntaxNode`] traversal
//!
//! Member bodies are not modelled. The parser keeps the span of every
//! getter so its exact source text can be sliced back out.
//!
//! # Example
//!
//! ```
//! use derived_props_core::SourceId;
//! use derived_props_parser::parse;
//!
//! let source = r#"
//!     namespace App;
//!
//!     [Marker("Name")]
//!     public partial class Person { }
//! "#;
//!
//! let file = parse(source, SourceId::new(0)).unwrap();
//! assert_eq!(file.type_declarations().len(), 1);
//! ```

pub mod decl;
pub mod expr;
pub mod types;
pub mod visitor;

mod decl_parser;
mod expr_parser;
mod literal;
mod parser;
mod type_parser;

pub use decl::*;
pub use expr::*;
pub use parser::Parser;
pub use types::*;
pub use visitor::{SyntaxNode, Visitor};

use derived_props_core::{SourceId, Span};

/// An identifier with its location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident {
    /// The identifier text, without a verbatim `@` prefix.
    pub name: String,
    pub span: Span,
}

impl Ident {
    /// Create a new identifier.
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

impl std::fmt::Display for Ident {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// A parsed source tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    /// Identity of this tree within its compilation.
    pub source: SourceId,
    /// `using` directives at file scope.
    pub usings: Vec<UsingDirective>,
    /// Assembly- and module-targeted attribute lists.
    pub attributes: Vec<AttributeList>,
    /// Top-level namespaces and types.
    pub members: Vec<NamespaceMember>,
    pub span: Span,
}

impl SourceFile {
    /// All type declarations in document order.
    ///
    /// Nested types follow the type that contains them.
    pub fn type_declarations(&self) -> Vec<&TypeDecl> {
        visitor::type_declarations(self)
    }

    /// Every syntax node in the tree, outermost first.
    pub fn descendants(&self) -> Vec<SyntaxNode<'_>> {
        visitor::descendants(self)
    }

    /// Number of type declarations in this tree.
    pub fn declaration_count(&self) -> usize {
        self.type_declarations().len()
    }
}
