//! Derived-property generation for C# declaration sources.
//!
//! Classes annotated with `[HasDerivedProperty("Name")]` receive a generated
//! partial definition holding a copy of the `Name` property declared on the
//! template-repository type `Definitions.DerivedProperties`.
//!
//! The crate is a facade over the workspace:
//!
//! - [`derived_props_parser`]: lexer and declaration parser
//! - [`derived_props_registry`]: type registry and [`Compilation`]
//! - [`derived_props_generator`]: the generation pipeline
//!
//! # Example
//!
//! ```
//! use derived_props::{PassStatus, Project};
//!
//! let mut project = Project::new();
//! project.add_source("Definitions.cs", r#"
//!     namespace Definitions;
//!     public sealed class HasDerivedPropertyAttribute : System.Attribute
//!     {
//!         public HasDerivedPropertyAttribute(string propertyName) { }
//!     }
//!     public static class DerivedProperties
//!     {
//!         public static string FullName => First + " " + Last;
//!     }
//! "#).unwrap();
//! project.add_source("Person.cs", r#"
//!     using Definitions;
//!     namespace App;
//!     [HasDerivedProperty(nameof(DerivedProperties.FullName))]
//!     public partial class Person { public string First; public string Last; }
//! "#).unwrap();
//!
//! assert_eq!(project.generate().unwrap(), PassStatus::Completed { artifacts: 1 });
//! let text = project.generated().get("App.Person.g.cs").unwrap();
//! assert!(text.contains("public partial class Person"));
//! ```

mod project;

pub use project::{Project, ProjectError};

pub use derived_props_core::{
    ConstantError, ConstantValue, DeclId, ParseError, ParseErrors, QualifiedName, RegistrationError,
    SourceId, Span, TypeHash,
};
pub use derived_props_generator::{
    ArtifactNaming, CancellationToken, ClassError, DerivedPropertyGenerator, GeneratedArtifact,
    GeneratedSources, GenerationError, GenerationOutput, GeneratorConfig, PassStatus, SourceModel,
    SynthesisErrorKind,
};
pub use derived_props_parser::{parse, parse_lenient};
pub use derived_props_registry::{Compilation, CompilationBuilder, CompilationError};

pub use derived_props_core as core;
pub use derived_props_generator as generator;
pub use derived_props_parser as parser;
pub use derived_props_registry as registry;
