//! Declaration parser crate.
//!
//! This crate provides the lexer and parser for the declaration sources
//! the derived-property generator reads. It includes:
//! - Lexical analysis (tokenization)
//! - Abstract Syntax Tree (AST) definitions
//! - Parser for transforming tokens into AST, with error recovery
//! - Visitor pattern and [`SyntaxNode`] traversal
//!
//! # Example
//!
//! ```
//! use derived_props_core::SourceId;
//! use derived_props_parser::{MemberDecl, Parser};
//!
//! let source = r#"
//!     namespace Definitions;
//!
//!     public static class DerivedProperties
//!     {
//!         public static string FullName => First + " " + Last;
//!     }
//! "#;
//!
//! let file = Parser::parse(source, SourceId::new(0)).unwrap();
//! let repository = file.type_declarations()[0];
//! assert!(matches!(repository.members[0], MemberDecl::Property(_)));
//! ```

pub mod ast;
pub mod lexer;

pub use ast::visitor;
pub use ast::*;
pub use lexer::{Lexer, Token, TokenKind};

use derived_props_core::{ParseErrors, SourceId};

/// Parse a source tree, failing on any lexical or syntax error.
pub fn parse(source: &str, source_id: SourceId) -> Result<SourceFile, ParseErrors> {
    Parser::parse(source, source_id)
}

/// Parse a source tree, returning the recovered tree and all errors.
pub fn parse_lenient(source: &str, source_id: SourceId) -> (SourceFile, ParseErrors) {
    Parser::parse_lenient(source, source_id)
}
