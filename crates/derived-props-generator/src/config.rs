//! Generator configuration.

/// Default fully-qualified name of the marker attribute.
pub const DEFAULT_MARKER_ATTRIBUTE: &str = "Definitions.HasDerivedPropertyAttribute";

/// Default fully-qualified name of the template-repository type.
pub const DEFAULT_REPOSITORY_TYPE: &str = "Definitions.DerivedProperties";

/// How artifact hint names are derived from the generated class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArtifactNaming {
    /// Namespace, containing types and name: `App.Outer.Person.g.cs`.
    /// Generic types carry their arity: `App.Box`1.g.cs`.
    #[default]
    QualifiedName,
    /// The class's simple name only: `Person.g.cs`.
    SimpleName,
}

/// Settings for a [`DerivedPropertyGenerator`](crate::DerivedPropertyGenerator).
///
/// # Example
///
/// ```
/// use derived_props_generator::{ArtifactNaming, GeneratorConfig};
///
/// let config = GeneratorConfig::default()
///     .with_artifact_naming(ArtifactNaming::SimpleName)
///     .with_auto_generated_header(true);
/// assert_eq!(config.marker_attribute, "Definitions.HasDerivedPropertyAttribute");
/// assert_eq!(config.file_suffix, ".g.cs");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Fully-qualified name of the marker attribute class.
    pub marker_attribute: String,
    /// Fully-qualified name of the template-repository type.
    pub repository_type: String,
    pub artifact_naming: ArtifactNaming,
    /// Appended to every hint name.
    pub file_suffix: String,
    /// Namespaces imported at the top of every artifact.
    pub usings: Vec<String>,
    /// Start every artifact with `// <auto-generated/>`.
    pub auto_generated_header: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            marker_attribute: DEFAULT_MARKER_ATTRIBUTE.to_string(),
            repository_type: DEFAULT_REPOSITORY_TYPE.to_string(),
            artifact_naming: ArtifactNaming::default(),
            file_suffix: ".g.cs".to_string(),
            usings: vec!["System".to_string()],
            auto_generated_header: false,
        }
    }
}

impl GeneratorConfig {
    pub fn with_marker_attribute(mut self, name: impl Into<String>) -> Self {
        self.marker_attribute = name.into();
        self
    }

    pub fn with_repository_type(mut self, name: impl Into<String>) -> Self {
        self.repository_type = name.into();
        self
    }

    pub fn with_artifact_naming(mut self, naming: ArtifactNaming) -> Self {
        self.artifact_naming = naming;
        self
    }

    pub fn with_file_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.file_suffix = suffix.into();
        self
    }

    /// Replace the imported namespaces.
    pub fn with_usings<I, S>(mut self, usings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.usings = usings.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_auto_generated_header(mut self, enabled: bool) -> Self {
        self.auto_generated_header = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_override_defaults() {
        let config = GeneratorConfig::default()
            .with_marker_attribute("Lib.DeriveAttribute")
            .with_repository_type("Lib.Templates")
            .with_file_suffix(".generated.cs")
            .with_usings(["System", "System.Linq"]);

        assert_eq!(config.marker_attribute, "Lib.DeriveAttribute");
        assert_eq!(config.repository_type, "Lib.Templates");
        assert_eq!(config.file_suffix, ".generated.cs");
        assert_eq!(config.usings, vec!["System", "System.Linq"]);
        assert_eq!(config.artifact_naming, ArtifactNaming::QualifiedName);
        assert!(!config.auto_generated_header);
    }
}
