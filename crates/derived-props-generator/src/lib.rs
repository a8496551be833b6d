//! Derived-property generator.
//!
//! Finds classes annotated with the marker attribute and generates, for
//! each, a partial definition holding copies of the template-repository
//! properties the attributes name.
//!
//! ## Pipeline
//!
//! ```text
//! SourceModel ─► scanner ─► filter ─► candidates ─┐
//!            └─► well_known ──────────────────────┴─► synthesizer ─► emitter
//! ```
//!
//! - [`scanner`]: syntactic pre-filter on every node
//! - [`filter`]: keep classes whose attributes bind to the marker
//! - [`well_known`]: resolve the marker and repository types
//! - [`synthesizer`]: copy the named properties into each candidate
//! - [`emitter`]: stage artifacts under hint names
//!
//! A pass is all-or-nothing: if any class fails, or the pass is cancelled,
//! nothing is added to the host's [`GeneratedSources`].
//!
//! # Example
//!
//! ```
//! use derived_props_generator::{CancellationToken, DerivedPropertyGenerator, GeneratedSources, PassStatus};
//! use derived_props_registry::Compilation;
//!
//! let mut builder = Compilation::builder();
//! builder.add_source("Definitions.cs", r#"
//!     namespace Definitions;
//!     public sealed class HasDerivedPropertyAttribute : System.Attribute { }
//!     public static class DerivedProperties { public static string FullName => First + " " + Last; }
//! "#);
//! builder.add_source("Person.cs", r#"
//!     using Definitions;
//!     namespace App;
//!     [HasDerivedProperty("FullName")]
//!     public partial class Person { }
//! "#);
//! let compilation = builder.build().unwrap();
//!
//! let generator = DerivedPropertyGenerator::default();
//! let mut sources = GeneratedSources::new();
//! let status = generator.run(&compilation, &CancellationToken::new(), &mut sources).unwrap();
//!
//! assert_eq!(status, PassStatus::Completed { artifacts: 1 });
//! assert!(sources.get("App.Person.g.cs").unwrap().contains("public string FullName => First + \" \" + Last;"));
//! ```

pub mod cancel;
pub mod config;
pub mod emitter;
pub mod error;
pub mod filter;
pub mod model;
pub mod scanner;
pub mod synthesizer;
pub mod well_known;

pub use cancel::CancellationToken;
pub use config::{ArtifactNaming, GeneratorConfig};
pub use emitter::{ArtifactEmitter, GeneratedArtifact, GeneratedSources};
pub use error::{ClassError, GenerationError, SynthesisErrorKind};
pub use filter::CandidateClass;
pub use model::SourceModel;
pub use synthesizer::{MemberSynthesizer, SynthesizedClass, SynthesizedProperty};
pub use well_known::{MissingWellKnownTypes, WellKnownTypes};

use tracing::{debug, warn};

/// How a pass ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassStatus {
    /// Artifacts were generated for every candidate with a type symbol.
    Completed { artifacts: usize },
    /// No class carries the marker attribute.
    NoCandidates,
    /// Candidates exist but a well-known type is missing; nothing was done.
    MissingWellKnownTypes { marker_found: bool, repository_found: bool },
}

/// Result of a successful pass, before anything is committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutput {
    pub status: PassStatus,
    /// Artifacts in candidate discovery order.
    pub artifacts: Vec<GeneratedArtifact>,
}

/// Runs generation passes with one configuration.
#[derive(Debug, Clone, Default)]
pub struct DerivedPropertyGenerator {
    config: GeneratorConfig,
}

impl DerivedPropertyGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Run a pass and commit its artifacts to `sources`.
    ///
    /// On error `sources` is left untouched.
    pub fn run<M: SourceModel + ?Sized>(
        &self,
        model: &M,
        cancel: &CancellationToken,
        sources: &mut GeneratedSources,
    ) -> Result<PassStatus, GenerationError> {
        let output = self.execute(model, cancel)?;
        sources.extend(output.artifacts);
        Ok(output.status)
    }

    /// Run a pass without committing its artifacts.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn execute<M: SourceModel + ?Sized>(
        &self,
        model: &M,
        cancel: &CancellationToken,
    ) -> Result<GenerationOutput, GenerationError> {
        let nodes = scanner::scan(model);
        let candidates = filter::collect_candidates(model, nodes, &self.config.marker_attribute);
        debug!(candidates = candidates.len(), "candidates collected");
        if candidates.is_empty() {
            return Ok(GenerationOutput {
                status: PassStatus::NoCandidates,
                artifacts: Vec::new(),
            });
        }

        let types = match well_known::resolve(model, &self.config) {
            Ok(types) => types,
            Err(missing) => {
                return Ok(GenerationOutput {
                    status: PassStatus::MissingWellKnownTypes {
                        marker_found: missing.marker_found,
                        repository_found: missing.repository_found,
                    },
                    artifacts: Vec::new(),
                });
            }
        };

        let synthesizer = MemberSynthesizer::new(model, types);
        let mut classes = Vec::with_capacity(candidates.len());
        let mut errors = Vec::new();
        for candidate in &candidates {
            if let Err(error) = cancel.check() {
                warn!("generation cancelled");
                return Err(error);
            }
            match synthesizer.synthesize(candidate) {
                Ok(Some(class)) => classes.push(class),
                Ok(None) => {}
                Err(error) => errors.push(error),
            }
        }
        if !errors.is_empty() {
            warn!(failed = errors.len(), first = %errors[0], "generation aborted");
            return Err(GenerationError::Synthesis(errors));
        }

        let mut emitter = ArtifactEmitter::new(&self.config);
        for class in &classes {
            if let Err(error) = emitter.stage(class, class.render(&self.config)) {
                warn!(%error, "generation aborted");
                return Err(error);
            }
        }

        Ok(GenerationOutput {
            status: PassStatus::Completed {
                artifacts: emitter.len(),
            },
            artifacts: emitter.into_artifacts(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use derived_props_registry::Compilation;
    use pretty_assertions::assert_eq;

    const DEFINITIONS: &str = "namespace Definitions;\n\
        public sealed class HasDerivedPropertyAttribute : System.Attribute { }\n\
        public static class DerivedProperties { public static string Name => \"n\"; }\n";

    fn compilation(sources: &[&str]) -> Compilation {
        let mut builder = Compilation::builder();
        for (i, text) in sources.iter().enumerate() {
            builder.add_source(format!("file{i}.cs"), *text);
        }
        builder.build().unwrap()
    }

    #[test]
    fn no_candidates() {
        let compilation = compilation(&[DEFINITIONS, "class Person { }"]);
        let output = DerivedPropertyGenerator::default()
            .execute(&compilation, &CancellationToken::new())
            .unwrap();
        assert_eq!(output.status, PassStatus::NoCandidates);
        assert!(output.artifacts.is_empty());
    }

    #[test]
    fn missing_repository_is_a_status() {
        let compilation = compilation(&[
            "namespace Definitions { public class HasDerivedPropertyAttribute { } }",
            "[Definitions.HasDerivedProperty(\"Name\")] partial class Person { }",
        ]);
        let output = DerivedPropertyGenerator::default()
            .execute(&compilation, &CancellationToken::new())
            .unwrap();
        assert_eq!(
            output.status,
            PassStatus::MissingWellKnownTypes {
                marker_found: true,
                repository_found: false
            }
        );
    }

    #[test]
    fn failure_leaves_sources_untouched() {
        let compilation = compilation(&[
            DEFINITIONS,
            "using Definitions;\n[HasDerivedProperty(\"Name\")] partial class Good { }\n[HasDerivedProperty(\"Missing\")] partial class Bad { }",
        ]);
        let mut sources = GeneratedSources::new();
        sources.add_source("Earlier.g.cs", "kept");

        let result = DerivedPropertyGenerator::default().run(&compilation, &CancellationToken::new(), &mut sources);
        let Err(GenerationError::Synthesis(errors)) = result else {
            panic!("expected synthesis error, got {result:?}");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].class, "Bad");
        assert_eq!(sources.hint_names().collect::<Vec<_>>(), vec!["Earlier.g.cs"]);
    }

    #[test]
    fn cancelled_before_first_class() {
        let compilation = compilation(&[DEFINITIONS, "[Definitions.HasDerivedProperty(\"Name\")] partial class P { }"]);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut sources = GeneratedSources::new();
        assert_eq!(
            DerivedPropertyGenerator::default().run(&compilation, &cancel, &mut sources),
            Err(GenerationError::Cancelled)
        );
        assert!(sources.is_empty());
    }

    #[test]
    fn nested_marker_and_repository() {
        let compilation = compilation(&[
            "namespace Lib { public class Outer { public sealed class MarkAttribute : System.Attribute { } }\n\
             public static class Repo { public static string X => \"x\"; } }",
            "[Lib.Outer.Mark(\"X\")] partial class P { }",
        ]);
        let config = GeneratorConfig::default()
            .with_marker_attribute("Lib.Outer+MarkAttribute")
            .with_repository_type("Lib.Repo");
        let output = DerivedPropertyGenerator::new(config)
            .execute(&compilation, &CancellationToken::new())
            .unwrap();
        assert_eq!(output.status, PassStatus::Completed { artifacts: 1 });
        assert!(output.artifacts[0].text.contains("\tpublic string X => \"x\";\n"));
    }

    #[test]
    fn repeated_runs_are_stable() {
        let compilation = compilation(&[DEFINITIONS, "[Definitions.HasDerivedProperty(\"Name\")] partial class P { }"]);
        let generator = DerivedPropertyGenerator::default();
        let cancel = CancellationToken::new();

        let first = generator.execute(&compilation, &cancel).unwrap();
        let second = generator.execute(&compilation, &cancel).unwrap();
        assert_eq!(first, second);

        let mut sources = GeneratedSources::new();
        generator.run(&compilation, &cancel, &mut sources).unwrap();
        generator.run(&compilation, &cancel, &mut sources).unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources.get("P.g.cs"), Some(first.artifacts[0].text.as_str()));
    }
}
