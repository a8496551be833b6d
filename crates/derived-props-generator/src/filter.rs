//! Semantic filter: keep candidates that carry the marker attribute.

use derived_props_core::{DeclId, Span, TypeHash};
use derived_props_parser::TypeDecl;
use rustc_hash::FxHashSet;
use tracing::trace;

use crate::model::SourceModel;

/// A class declaration that carries the marker attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateClass {
    /// Declaration identity; candidates are unique by it.
    pub decl: DeclId,
    /// Simple name as written.
    pub name: String,
    /// Span of the declared name.
    pub span: Span,
}

/// Keep `decl` if one of its attributes binds to the `marker` class.
///
/// Attributes are checked in declaration order and the first match wins.
/// Attributes that do not resolve are skipped.
pub fn filter_candidate<M: SourceModel + ?Sized>(
    model: &M,
    decl: &TypeDecl,
    marker: TypeHash,
) -> Option<CandidateClass> {
    for attribute in decl.all_attributes() {
        let Some(class) = model.attribute_class(decl.id, attribute) else {
            continue;
        };
        trace!(class = %decl.name, attribute = %attribute.name, matched = class == marker, "attribute on candidate");
        if class == marker {
            return Some(CandidateClass {
                decl: decl.id,
                name: decl.name.name.clone(),
                span: decl.name.span,
            });
        }
    }
    None
}

/// Filter scanned nodes into distinct candidates, keeping discovery order.
///
/// `marker_name` is a metadata name (`Ns.Outer+MarkAttribute`). When it does
/// not resolve, no class can carry the marker.
pub fn collect_candidates<'d, M, I>(model: &M, nodes: I, marker_name: &str) -> Vec<CandidateClass>
where
    M: SourceModel + ?Sized,
    I: IntoIterator<Item = &'d TypeDecl>,
{
    let Some(marker) = model.type_by_metadata_name(marker_name) else {
        return Vec::new();
    };
    let mut seen = FxHashSet::default();
    nodes
        .into_iter()
        .filter_map(|decl| filter_candidate(model, decl, marker))
        .filter(|candidate| seen.insert(candidate.decl))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner;
    use derived_props_registry::Compilation;

    const MARKER: &str = "Definitions.HasDerivedPropertyAttribute";

    fn compile(sources: &[&str]) -> Compilation {
        let mut builder = Compilation::builder();
        builder.add_metadata_reference(
            "Definitions.cs",
            "namespace Definitions { public sealed class HasDerivedPropertyAttribute : System.Attribute { } \
             public sealed class OtherAttribute : System.Attribute { } }",
        );
        for (i, text) in sources.iter().enumerate() {
            builder.add_source(format!("file{i}.cs"), *text);
        }
        builder.build().unwrap()
    }

    fn names(compilation: &Compilation) -> Vec<String> {
        collect_candidates(compilation, scanner::scan(compilation), MARKER)
            .into_iter()
            .map(|candidate| candidate.name)
            .collect()
    }

    #[test]
    fn marker_by_short_and_full_name() {
        let compilation = compile(&[
            "using Definitions;\n[HasDerivedProperty(\"A\")] partial class Short { }",
            "[Definitions.HasDerivedPropertyAttribute(\"A\")] partial class Full { }",
        ]);
        assert_eq!(names(&compilation), vec!["Short", "Full"]);
    }

    #[test]
    fn other_and_unresolved_attributes_are_filtered_out() {
        let compilation = compile(&[
            "using Definitions;\n[Other] class A { }\n[Unknown(\"x\")] class B { }\n[Unknown, HasDerivedProperty(\"x\")] partial class C { }",
        ]);
        assert_eq!(names(&compilation), vec!["C"]);
    }

    #[test]
    fn same_named_attribute_elsewhere_is_not_the_marker() {
        let compilation = compile(&[
            "namespace Mine { class HasDerivedPropertyAttribute : System.Attribute { } [HasDerivedProperty(\"A\")] class Fake { } }",
        ]);
        assert!(names(&compilation).is_empty());
    }

    #[test]
    fn nested_marker_by_metadata_name() {
        let mut builder = Compilation::builder();
        builder.add_source(
            "lib.cs",
            "namespace Lib { public class Outer { public sealed class MarkAttribute : System.Attribute { } } }",
        );
        builder.add_source("app.cs", "[Lib.Outer.Mark(\"X\")] partial class Marked { }\nclass Plain { }");
        let compilation = builder.build().unwrap();

        let candidates = collect_candidates(&compilation, scanner::scan(&compilation), "Lib.Outer+MarkAttribute");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "Marked");
        assert!(collect_candidates(&compilation, scanner::scan(&compilation), "Lib.MarkAttribute").is_empty());
    }

    #[test]
    fn duplicate_nodes_yield_one_candidate() {
        let compilation = compile(&["using Definitions;\n[HasDerivedProperty(\"A\"), HasDerivedProperty(\"B\")] partial class P { }"]);
        let nodes = scanner::scan(&compilation);
        let twice = nodes.iter().chain(nodes.iter()).copied();
        let candidates = collect_candidates(&compilation, twice, MARKER);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].span.slice(&compilation.trees()[1].text), Some("P"));
    }
}
