//! Resolution of the marker attribute and template-repository types.

use derived_props_core::TypeHash;
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::model::SourceModel;

/// The two types a pass needs, resolved in the current compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WellKnownTypes {
    pub marker: TypeHash,
    pub repository: TypeHash,
}

/// Which well-known types were found when at least one was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingWellKnownTypes {
    pub marker_found: bool,
    pub repository_found: bool,
}

/// Look up both configured types by metadata name.
pub fn resolve<M: SourceModel + ?Sized>(
    model: &M,
    config: &GeneratorConfig,
) -> Result<WellKnownTypes, MissingWellKnownTypes> {
    let marker = model.type_by_metadata_name(&config.marker_attribute);
    let repository = model.type_by_metadata_name(&config.repository_type);
    match (marker, repository) {
        (Some(marker), Some(repository)) => Ok(WellKnownTypes { marker, repository }),
        (marker, repository) => {
            debug!(
                marker = %config.marker_attribute,
                marker_found = marker.is_some(),
                repository = %config.repository_type,
                repository_found = repository.is_some(),
                "well-known types missing"
            );
            Err(MissingWellKnownTypes {
                marker_found: marker.is_some(),
                repository_found: repository.is_some(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use derived_props_registry::Compilation;

    fn compile(source: &str) -> Compilation {
        let mut builder = Compilation::builder();
        builder.add_source("defs.cs", source);
        builder.build().unwrap()
    }

    #[test]
    fn both_found() {
        let compilation = compile(
            "namespace Definitions { class HasDerivedPropertyAttribute { } static class DerivedProperties { } }",
        );
        let types = resolve(&compilation, &GeneratorConfig::default()).unwrap();
        assert_eq!(types.marker, compilation.type_by_metadata_name("Definitions.HasDerivedPropertyAttribute").unwrap());
        assert_ne!(types.marker, types.repository);
    }

    #[test]
    fn missing_repository() {
        let compilation = compile("namespace Definitions { class HasDerivedPropertyAttribute { } }");
        assert_eq!(
            resolve(&compilation, &GeneratorConfig::default()),
            Err(MissingWellKnownTypes {
                marker_found: true,
                repository_found: false,
            })
        );
    }

    #[test]
    fn configured_names_and_nested_metadata_names() {
        let compilation = compile("namespace Lib { class Outer { class Mark { } } class Templates<T> { } }");
        let config = GeneratorConfig::default()
            .with_marker_attribute("Lib.Outer+Mark")
            .with_repository_type("Lib.Templates`1");
        assert!(resolve(&compilation, &config).is_ok());
    }
}
