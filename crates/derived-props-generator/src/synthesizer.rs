//! Member synthesis: copy repository properties into candidate classes.
//!
//! For each candidate the synthesizer reads the marker attributes applied
//! to the class (across all of its partial declarations), finds the named
//! property on the template-repository type, and copies that property's
//! declared type and getter text into a new partial declaration of the
//! class. Getter text is spliced verbatim: identifiers inside it are not
//! rebound to the new class.

use std::fmt::Write;

use derived_props_core::{
    AttributeData, ConstantValue, DeclId, GetterForm, GetterSyntax, QualifiedName, TypeEntry,
    TypeHash, TypeKind,
};
use tracing::trace;

use crate::config::GeneratorConfig;
use crate::error::{ClassError, SynthesisErrorKind};
use crate::filter::CandidateClass;
use crate::model::SourceModel;
use crate::well_known::WellKnownTypes;

/// One generated property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedProperty {
    pub name: String,
    /// Declared type in its original definition form.
    pub ty: String,
    pub getter: GetterSyntax,
}

impl SynthesizedProperty {
    /// The property declaration, unindented.
    pub fn render(&self) -> String {
        match self.getter.form {
            GetterForm::Arrow => format!("public {} {} {};", self.ty, self.name, self.getter.text),
            GetterForm::Accessor => format!("public {} {} {{ {} }}", self.ty, self.name, self.getter.text),
        }
    }
}

/// The head of a partial type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeHeader {
    pub accessibility: Option<&'static str>,
    pub kind: TypeKind,
    pub name: String,
    pub type_params: Vec<String>,
}

impl TypeHeader {
    fn from_entry(entry: &TypeEntry) -> Self {
        Self {
            accessibility: entry.modifiers.accessibility_keywords(),
            kind: entry.kind,
            name: entry.name.clone(),
            type_params: entry.type_params.clone(),
        }
    }

    /// `public partial class Name<T>`
    pub fn declaration(&self) -> String {
        let mut text = String::new();
        if let Some(accessibility) = self.accessibility {
            text.push_str(accessibility);
            text.push(' ');
        }
        text.push_str("partial ");
        text.push_str(self.kind.keyword());
        text.push(' ');
        text.push_str(&self.name);
        if !self.type_params.is_empty() {
            text.push('<');
            text.push_str(&self.type_params.join(", "));
            text.push('>');
        }
        text
    }

    /// Name with its generic arity: ``Box`1``.
    pub fn metadata_name(&self) -> String {
        match self.type_params.len() {
            0 => self.name.clone(),
            arity => format!("{}`{arity}", self.name),
        }
    }
}

/// The generated partial definition of one candidate class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedClass {
    pub decl: DeclId,
    pub type_hash: TypeHash,
    pub qualified_name: QualifiedName,
    pub namespace: Vec<String>,
    /// Containing types, outermost first.
    pub containers: Vec<TypeHeader>,
    pub header: TypeHeader,
    /// Properties in marker-attribute order.
    pub properties: Vec<SynthesizedProperty>,
}

impl SynthesizedClass {
    /// Namespace, containing types and the class, each type with its arity.
    pub fn metadata_segments(&self) -> Vec<String> {
        self.namespace
            .iter()
            .cloned()
            .chain(self.containers.iter().map(TypeHeader::metadata_name))
            .chain(std::iter::once(self.header.metadata_name()))
            .collect()
    }

    /// Render the artifact text.
    pub fn render(&self, config: &GeneratorConfig) -> String {
        let mut out = String::new();
        if config.auto_generated_header {
            out.push_str("// <auto-generated/>\n");
        }
        for using in &config.usings {
            let _ = writeln!(out, "using {using};");
        }
        if !out.is_empty() {
            out.push('\n');
        }
        if !self.namespace.is_empty() {
            let _ = writeln!(out, "namespace {};", self.namespace.join("."));
            out.push('\n');
        }

        let headers = self.containers.iter().chain(std::iter::once(&self.header));
        for (depth, header) in headers.enumerate() {
            let indent = "\t".repeat(depth);
            let _ = writeln!(out, "{indent}{}", header.declaration());
            let _ = writeln!(out, "{indent}{{");
        }

        let depth = self.containers.len() + 1;
        let indent = "\t".repeat(depth);
        for property in &self.properties {
            let _ = writeln!(out, "{indent}{}", property.render());
        }

        for depth in (0..depth).rev() {
            let _ = writeln!(out, "{}}}", "\t".repeat(depth));
        }
        out
    }
}

/// Builds [`SynthesizedClass`]es for candidates of one pass.
pub struct MemberSynthesizer<'m, M: ?Sized> {
    model: &'m M,
    types: WellKnownTypes,
}

impl<'m, M: SourceModel + ?Sized> MemberSynthesizer<'m, M> {
    pub fn new(model: &'m M, types: WellKnownTypes) -> Self {
        Self { model, types }
    }

    /// Synthesize the partial definition of a candidate.
    ///
    /// Returns `Ok(None)` when the declaration has no type symbol.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn synthesize(&self, candidate: &CandidateClass) -> Result<Option<SynthesizedClass>, ClassError> {
        let Some(type_hash) = self.model.declared_type(candidate.decl) else {
            trace!(class = %candidate.name, "candidate has no declared type");
            return Ok(None);
        };
        let Some(entry) = self.model.type_entry(type_hash) else {
            return Ok(None);
        };

        let fail = |kind| ClassError {
            class: self
                .model
                .type_display_name(type_hash)
                .unwrap_or_else(|| candidate.name.clone()),
            span: candidate.span,
            kind,
        };

        let mut properties = Vec::new();
        for attribute in entry.attributes.iter().filter(|a| a.is_class(self.types.marker)) {
            let property = self.copy_property(attribute).map_err(fail)?;
            trace!(class = %entry.qualified_name, property = %property.name, "derived property");
            properties.push(property);
        }

        Ok(Some(SynthesizedClass {
            decl: candidate.decl,
            type_hash,
            qualified_name: entry.qualified_name.clone(),
            namespace: entry.namespace.clone(),
            containers: self.containers(entry),
            header: TypeHeader {
                accessibility: entry.modifiers.accessibility_keywords().or(Some("public")),
                ..TypeHeader::from_entry(entry)
            },
            properties,
        }))
    }

    /// Copy the repository property a marker attribute names.
    fn copy_property(&self, attribute: &AttributeData) -> Result<SynthesizedProperty, SynthesisErrorKind> {
        let argument = attribute
            .arguments
            .first()
            .ok_or(SynthesisErrorKind::MissingArgument)?;
        let name = match &argument.value {
            Ok(ConstantValue::String(name)) => name.clone(),
            Ok(other) => {
                return Err(SynthesisErrorKind::NotAString {
                    kind: other.kind_name(),
                });
            }
            Err(error) => return Err(SynthesisErrorKind::NonConstantArgument(error.clone())),
        };

        let members: Vec<_> = self
            .model
            .type_entry(self.types.repository)
            .map(|repository| repository.members_named(&name).collect())
            .unwrap_or_default();
        let member = match members.as_slice() {
            [] => return Err(SynthesisErrorKind::MemberNotFound { name }),
            [member] => *member,
            many => {
                return Err(SynthesisErrorKind::AmbiguousMember {
                    name,
                    count: many.len(),
                });
            }
        };
        let Some(property) = member.as_property() else {
            return Err(SynthesisErrorKind::NotAProperty {
                kind: member.kind_name(),
                name,
            });
        };
        let Some(getter) = property.first_getter() else {
            return Err(SynthesisErrorKind::MissingGetter { name });
        };

        Ok(SynthesizedProperty {
            ty: self.model.display_original_definition(&property.ty),
            getter: getter.clone(),
            name,
        })
    }

    /// Headers of the containing types, outermost first.
    fn containers(&self, entry: &TypeEntry) -> Vec<TypeHeader> {
        let mut containers = Vec::new();
        let mut current = entry.containing_type;
        while let Some(hash) = current {
            let Some(container) = self.model.type_entry(hash) else {
                break;
            };
            containers.push(TypeHeader::from_entry(container));
            current = container.containing_type;
        }
        containers.reverse();
        containers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{filter, scanner, well_known};
    use derived_props_core::ConstantError;
    use derived_props_registry::Compilation;
    use pretty_assertions::assert_eq;

    const DEFINITIONS: &str = r#"
namespace Definitions
{
    public sealed class HasDerivedPropertyAttribute : System.Attribute
    {
        public HasDerivedPropertyAttribute(string propertyName) { }
    }

    public static partial class DerivedProperties
    {
        public const string Full = nameof(FullName);
        public static string FullName => First + " " + Last;
        public static int Count { get { return Items.Count; } }
        public static System.Collections.Generic.List<int> Items => new();
        public static string Both => "a";
        public static string Both() => "b";
        public static int Field;
        public static string NoGetter { set { } }
    }
}
"#;

    fn compile(source: &str) -> Compilation {
        let mut builder = Compilation::builder();
        builder.add_metadata_reference(
            "List.cs",
            "namespace System.Collections.Generic { public class List<T> { public int Count; } }",
        );
        builder.add_source("Definitions.cs", DEFINITIONS);
        builder.add_source("Model.cs", source);
        builder.build().unwrap()
    }

    fn synthesize(source: &str) -> Vec<Result<Option<SynthesizedClass>, ClassError>> {
        let compilation = compile(source);
        let config = GeneratorConfig::default();
        let types = well_known::resolve(&compilation, &config).unwrap();
        let candidates =
            filter::collect_candidates(&compilation, scanner::scan(&compilation), &config.marker_attribute);
        let synthesizer = MemberSynthesizer::new(&compilation, types);
        candidates.iter().map(|c| synthesizer.synthesize(c)).collect()
    }

    fn single(source: &str) -> SynthesizedClass {
        let mut results = synthesize(source);
        assert_eq!(results.len(), 1);
        results.remove(0).unwrap().unwrap()
    }

    fn error_kind(source: &str) -> SynthesisErrorKind {
        let mut results = synthesize(source);
        assert_eq!(results.len(), 1);
        results.remove(0).unwrap_err().kind
    }

    #[test]
    fn arrow_property_is_copied() {
        let class = single(
            "using Definitions;\nnamespace App;\n[HasDerivedProperty(\"FullName\")]\npublic partial class Person { }",
        );
        assert_eq!(class.namespace, vec!["App"]);
        assert_eq!(class.properties.len(), 1);
        assert_eq!(
            class.properties[0].render(),
            "public string FullName => First + \" \" + Last;"
        );
    }

    #[test]
    fn accessor_property_is_wrapped() {
        let class = single(
            "using Definitions;\n[HasDerivedProperty(\"Count\")] partial class Bag { }",
        );
        assert_eq!(
            class.properties[0].render(),
            "public int Count { get { return Items.Count; } }"
        );
    }

    #[test]
    fn generic_type_keeps_its_parameters() {
        let class = single(
            "using Definitions;\n[HasDerivedProperty(\"Items\")] partial class Bag { }",
        );
        assert_eq!(class.properties[0].ty, "System.Collections.Generic.List<T>");
    }

    #[test]
    fn properties_follow_attribute_order() {
        let class = single(
            "using Definitions;\n[HasDerivedProperty(\"Count\")]\n[HasDerivedProperty(DerivedProperties.Full)]\npartial class Bag { }",
        );
        let names: Vec<_> = class.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Count", "FullName"]);
    }

    #[test]
    fn render_with_containers() {
        let class = single(
            "using Definitions;\nnamespace App.Models\n{\n    internal static partial class Outer<T>\n    {\n        \
             [HasDerivedProperty(\"FullName\")]\n        partial class Person { }\n    }\n}",
        );
        assert_eq!(class.metadata_segments(), vec!["App", "Models", "Outer`1", "Person"]);
        assert_eq!(
            class.render(&GeneratorConfig::default()),
            "using System;\n\nnamespace App.Models;\n\ninternal partial class Outer<T>\n{\n\tpublic partial class Person\n\t{\n\t\tpublic string FullName => First + \" \" + Last;\n\t}\n}\n"
        );
    }

    #[test]
    fn render_in_global_namespace_without_usings() {
        let class = single("[Definitions.HasDerivedProperty(\"FullName\")] sealed partial class Person { }");
        let config = GeneratorConfig::default()
            .with_usings(Vec::<String>::new())
            .with_auto_generated_header(true);
        assert_eq!(
            class.render(&config),
            "// <auto-generated/>\n\npublic partial class Person\n{\n\tpublic string FullName => First + \" \" + Last;\n}\n"
        );
    }

    #[test]
    fn missing_argument() {
        assert_eq!(
            error_kind("using Definitions;\n[HasDerivedProperty] partial class P { }"),
            SynthesisErrorKind::MissingArgument
        );
    }

    #[test]
    fn non_constant_argument() {
        assert!(matches!(
            error_kind("using Definitions;\n[HasDerivedProperty(Path.Combine(\"a\"))] partial class P { }"),
            SynthesisErrorKind::NonConstantArgument(ConstantError::NotConstant { .. })
        ));
    }

    #[test]
    fn numeric_argument_is_not_a_string() {
        assert_eq!(
            error_kind("using Definitions;\n[HasDerivedProperty(42)] partial class P { }"),
            SynthesisErrorKind::NotAString { kind: "integer" }
        );
    }

    #[test]
    fn member_lookup_failures() {
        assert_eq!(
            error_kind("using Definitions;\n[HasDerivedProperty(\"Nope\")] partial class P { }"),
            SynthesisErrorKind::MemberNotFound { name: "Nope".into() }
        );
        assert_eq!(
            error_kind("using Definitions;\n[HasDerivedProperty(\"Both\")] partial class P { }"),
            SynthesisErrorKind::AmbiguousMember {
                name: "Both".into(),
                count: 2
            }
        );
        assert_eq!(
            error_kind("using Definitions;\n[HasDerivedProperty(\"Field\")] partial class P { }"),
            SynthesisErrorKind::NotAProperty {
                name: "Field".into(),
                kind: "field"
            }
        );
        assert_eq!(
            error_kind("using Definitions;\n[HasDerivedProperty(\"NoGetter\")] partial class P { }"),
            SynthesisErrorKind::MissingGetter {
                name: "NoGetter".into()
            }
        );
    }

    #[test]
    fn error_names_the_class() {
        let mut results = synthesize("using Definitions;\nnamespace App { [HasDerivedProperty(\"Nope\")] partial class P<T> { } }");
        let error = results.remove(0).unwrap_err();
        assert_eq!(error.class, "App.P<T>");
    }
}
