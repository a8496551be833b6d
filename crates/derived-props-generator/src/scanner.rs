//! Syntactic pre-filter for candidate classes.
//!
//! Runs on every syntax node, before any semantic work, so it only looks
//! at the shape of the node.

use derived_props_core::TypeKind;
use derived_props_parser::{SyntaxNode, TypeDecl};

use crate::model::SourceModel;

/// Whether `node` is a class declaration with at least one attribute list.
///
/// Records, structs and interfaces are not candidates.
#[inline]
pub fn is_candidate_node(node: &SyntaxNode<'_>) -> bool {
    matches!(node, SyntaxNode::Type(decl) if decl.kind == TypeKind::Class && decl.has_attributes())
}

/// Candidate nodes of every tree of the model, in tree then document order.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn scan<M: SourceModel + ?Sized>(model: &M) -> Vec<&TypeDecl> {
    model
        .syntax_trees()
        .into_iter()
        .flat_map(|file| file.descendants())
        .filter(is_candidate_node)
        .filter_map(|node| node.as_type_decl())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use derived_props_core::SourceId;
    use derived_props_parser::Parser;
    use derived_props_registry::Compilation;

    fn candidates(source: &str) -> Vec<String> {
        let file = Parser::parse(source, SourceId::new(0)).unwrap();
        file.descendants()
            .iter()
            .filter(|node| is_candidate_node(node))
            .filter_map(|node| node.as_type_decl())
            .map(|decl| decl.name.name.clone())
            .collect()
    }

    #[test]
    fn only_attributed_classes() {
        let names = candidates(
            "[A] class One { }\nclass Two { }\n[A] struct Three { }\n[A] record Four { }\n[A] interface IFive { }",
        );
        assert_eq!(names, vec!["One"]);
    }

    #[test]
    fn nested_classes_follow_their_container() {
        let names = candidates("[A] class Outer { [B] class Inner { } class Plain { } }\n[C] class Next { }");
        assert_eq!(names, vec!["Outer", "Inner", "Next"]);
    }

    #[test]
    fn scan_walks_trees_in_order() {
        let mut builder = Compilation::builder();
        builder.add_source("b.cs", "namespace B { [X] partial class Second { } }");
        builder.add_source("a.cs", "[X] partial class First { }");
        let compilation = builder.build().unwrap();

        let names: Vec<_> = scan(&compilation).iter().map(|decl| decl.name.name.as_str()).collect();
        assert_eq!(names, vec!["Second", "First"]);
    }
}
