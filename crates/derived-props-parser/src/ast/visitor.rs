//! Visitor pattern for traversing the AST.
//!
//! The [`Visitor`] trait has one `visit_*` method per node type; the
//! defaults call the matching `walk_*` function to continue traversal.
//! Override any `visit_*` method to customize behavior for specific nodes.
//!
//! ```
//! use derived_props_core::SourceId;
//! use derived_props_parser::{parse, TypeDecl, Visitor};
//!
//! struct ClassCounter {
//!     count: usize,
//! }
//!
//! impl Visitor for ClassCounter {
//!     fn visit_type_decl(&mut self, decl: &TypeDecl) {
//!         self.count += 1;
//!         derived_props_parser::visitor::walk_type_decl(self, decl);
//!     }
//! }
//!
//! let file = parse("class A { class B { } } class C { }", SourceId::new(0)).unwrap();
//! let mut counter = ClassCounter { count: 0 };
//! counter.visit_source_file(&file);
//! assert_eq!(counter.count, 3);
//! ```

use crate::ast::decl::*;
use crate::ast::SourceFile;

/// Visitor trait for traversing AST nodes.
pub trait Visitor: Sized {
    /// Visit a source file (root node).
    fn visit_source_file(&mut self, file: &SourceFile) {
        walk_source_file(self, file);
    }

    /// Visit a `using` directive.
    fn visit_using(&mut self, _using: &UsingDirective) {}

    /// Visit a namespace declaration.
    fn visit_namespace(&mut self, namespace: &NamespaceDecl) {
        walk_namespace(self, namespace);
    }

    /// Visit a type declaration.
    fn visit_type_decl(&mut self, decl: &TypeDecl) {
        walk_type_decl(self, decl);
    }

    /// Visit a member of a type declaration.
    fn visit_member(&mut self, member: &MemberDecl) {
        walk_member(self, member);
    }
}

pub fn walk_source_file<V: Visitor>(visitor: &mut V, file: &SourceFile) {
    for using in &file.usings {
        visitor.visit_using(using);
    }
    walk_namespace_members(visitor, &file.members);
}

pub fn walk_namespace<V: Visitor>(visitor: &mut V, namespace: &NamespaceDecl) {
    for using in &namespace.usings {
        visitor.visit_using(using);
    }
    walk_namespace_members(visitor, &namespace.members);
}

fn walk_namespace_members<V: Visitor>(visitor: &mut V, members: &[NamespaceMember]) {
    for member in members {
        match member {
            NamespaceMember::Namespace(ns) => visitor.visit_namespace(ns),
            NamespaceMember::Type(ty) => visitor.visit_type_decl(ty),
        }
    }
}

pub fn walk_type_decl<V: Visitor>(visitor: &mut V, decl: &TypeDecl) {
    for member in &decl.members {
        visitor.visit_member(member);
    }
}

pub fn walk_member<V: Visitor>(visitor: &mut V, member: &MemberDecl) {
    if let MemberDecl::Type(ty) = member {
        visitor.visit_type_decl(ty);
    }
}

// ============================================================================
// Syntax nodes
// ============================================================================

/// A borrowed view of any node in a source tree.
///
/// This is the unit the candidate scanner inspects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyntaxNode<'a> {
    SourceFile(&'a SourceFile),
    Using(&'a UsingDirective),
    Namespace(&'a NamespaceDecl),
    Type(&'a TypeDecl),
    Member(&'a MemberDecl),
}

impl<'a> SyntaxNode<'a> {
    /// The type declaration, if this node is one.
    pub fn as_type_decl(&self) -> Option<&'a TypeDecl> {
        match self {
            SyntaxNode::Type(decl) => Some(decl),
            _ => None,
        }
    }
}

#[derive(Default)]
struct NodeCollector<'a> {
    nodes: Vec<SyntaxNode<'a>>,
}

impl<'a> NodeCollector<'a> {
    fn collect(file: &'a SourceFile) -> Vec<SyntaxNode<'a>> {
        let mut collector = NodeCollector::default();
        collector.nodes.push(SyntaxNode::SourceFile(file));
        collector.walk_members(&file.usings, &file.members);
        collector.nodes
    }

    fn walk_members(&mut self, usings: &'a [UsingDirective], members: &'a [NamespaceMember]) {
        self.nodes.extend(usings.iter().map(SyntaxNode::Using));
        for member in members {
            match member {
                NamespaceMember::Namespace(ns) => {
                    self.nodes.push(SyntaxNode::Namespace(ns));
                    self.walk_members(&ns.usings, &ns.members);
                }
                NamespaceMember::Type(ty) => self.walk_type(ty),
            }
        }
    }

    fn walk_type(&mut self, decl: &'a TypeDecl) {
        self.nodes.push(SyntaxNode::Type(decl));
        for member in &decl.members {
            match member {
                MemberDecl::Type(nested) => self.walk_type(nested),
                other => self.nodes.push(SyntaxNode::Member(other)),
            }
        }
    }
}

/// Every node of a tree in document order, outermost first.
///
/// A generic [`Visitor`] cannot hand out borrows tied to the tree, so this
/// walks the same shape directly.
pub fn descendants(file: &SourceFile) -> Vec<SyntaxNode<'_>> {
    NodeCollector::collect(file)
}

/// All type declarations of a tree in document order.
pub fn type_declarations(file: &SourceFile) -> Vec<&TypeDecl> {
    descendants(file)
        .into_iter()
        .filter_map(|node| node.as_type_decl())
        .collect()
}
