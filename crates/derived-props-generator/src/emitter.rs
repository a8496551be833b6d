//! Artifact staging and the host output channel.
//!
//! An [`ArtifactEmitter`] stages the artifacts of one pass and rejects
//! key collisions. Staged artifacts reach a host only once the whole pass
//! has succeeded, through [`GeneratedSources::add_source`].

use derived_props_core::QualifiedName;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::config::{ArtifactNaming, GeneratorConfig};
use crate::error::GenerationError;
use crate::synthesizer::SynthesizedClass;

/// One generated source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    /// Key the host stores the artifact under, e.g. `App.Person.g.cs`.
    pub hint_name: String,
    /// The class the artifact extends.
    pub class: QualifiedName,
    pub text: String,
}

/// Stages the artifacts of one pass.
#[derive(Debug)]
pub struct ArtifactEmitter {
    naming: ArtifactNaming,
    suffix: String,
    artifacts: Vec<GeneratedArtifact>,
    keys: FxHashMap<String, usize>,
}

impl ArtifactEmitter {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            naming: config.artifact_naming,
            suffix: config.file_suffix.clone(),
            artifacts: Vec::new(),
            keys: FxHashMap::default(),
        }
    }

    /// The hint name `class` is stored under.
    pub fn hint_name(&self, class: &SynthesizedClass) -> String {
        let stem = match self.naming {
            ArtifactNaming::QualifiedName => class.metadata_segments().join("."),
            ArtifactNaming::SimpleName => class.header.name.clone(),
        };
        format!("{stem}{}", self.suffix)
    }

    /// Stage the artifact for `class`.
    pub fn stage(&mut self, class: &SynthesizedClass, text: String) -> Result<(), GenerationError> {
        let hint_name = self.hint_name(class);
        if let Some(&index) = self.keys.get(&hint_name) {
            return Err(GenerationError::ArtifactKeyCollision {
                first: self.artifacts[index].class.to_string(),
                second: class.qualified_name.to_string(),
                hint_name,
            });
        }
        debug!(hint_name = %hint_name, properties = class.properties.len(), "artifact staged");
        self.keys.insert(hint_name.clone(), self.artifacts.len());
        self.artifacts.push(GeneratedArtifact {
            hint_name,
            class: class.qualified_name.clone(),
            text,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Staged artifacts, in staging order.
    pub fn into_artifacts(self) -> Vec<GeneratedArtifact> {
        self.artifacts
    }
}

/// Generated sources held by a host, keyed by hint name.
///
/// Adding a source under an existing key replaces its text, so running
/// a pass again over unchanged input leaves the collection unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedSources {
    sources: Vec<(String, String)>,
    index: FxHashMap<String, usize>,
}

impl GeneratedSources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the source stored under `hint_name`.
    pub fn add_source(&mut self, hint_name: impl Into<String>, text: impl Into<String>) {
        let hint_name = hint_name.into();
        let text = text.into();
        match self.index.get(&hint_name) {
            Some(&i) => self.sources[i].1 = text,
            None => {
                self.index.insert(hint_name.clone(), self.sources.len());
                self.sources.push((hint_name, text));
            }
        }
    }

    /// Add every artifact of a pass.
    pub fn extend(&mut self, artifacts: impl IntoIterator<Item = GeneratedArtifact>) {
        for artifact in artifacts {
            self.add_source(artifact.hint_name, artifact.text);
        }
    }

    pub fn get(&self, hint_name: &str) -> Option<&str> {
        self.index.get(hint_name).map(|&i| self.sources[i].1.as_str())
    }

    /// Hint names and texts, in the order keys were first added.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sources.iter().map(|(hint, text)| (hint.as_str(), text.as_str()))
    }

    pub fn hint_names(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|(hint, _)| hint.as_str())
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl FromIterator<GeneratedArtifact> for GeneratedSources {
    fn from_iter<T: IntoIterator<Item = GeneratedArtifact>>(iter: T) -> Self {
        let mut sources = Self::new();
        sources.extend(iter);
        sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthesizer::TypeHeader;
    use derived_props_core::{DeclId, SourceId, TypeHash, TypeKind};

    fn class(namespace: &[&str], name: &str, type_params: &[&str]) -> SynthesizedClass {
        let namespace: Vec<String> = namespace.iter().map(|s| s.to_string()).collect();
        SynthesizedClass {
            decl: DeclId::new(SourceId::new(0), 0),
            type_hash: TypeHash::from_name(name),
            qualified_name: QualifiedName::new(name, namespace.clone()),
            namespace,
            containers: Vec::new(),
            header: TypeHeader {
                accessibility: Some("public"),
                kind: TypeKind::Class,
                name: name.to_string(),
                type_params: type_params.iter().map(|s| s.to_string()).collect(),
            },
            properties: Vec::new(),
        }
    }

    #[test]
    fn qualified_hint_names() {
        let emitter = ArtifactEmitter::new(&GeneratorConfig::default());
        assert_eq!(emitter.hint_name(&class(&["App", "Models"], "Person", &[])), "App.Models.Person.g.cs");
        assert_eq!(emitter.hint_name(&class(&[], "Box", &["T"])), "Box`1.g.cs");
    }

    #[test]
    fn simple_names_collide_across_namespaces() {
        let config = GeneratorConfig::default()
            .with_artifact_naming(ArtifactNaming::SimpleName)
            .with_file_suffix(".cs");
        let mut emitter = ArtifactEmitter::new(&config);
        emitter.stage(&class(&["A"], "Person", &[]), "a".into()).unwrap();

        let error = emitter.stage(&class(&["B"], "Person", &[]), "b".into()).unwrap_err();
        assert_eq!(
            error,
            GenerationError::ArtifactKeyCollision {
                hint_name: "Person.cs".into(),
                first: "A.Person".into(),
                second: "B.Person".into(),
            }
        );
        assert_eq!(emitter.len(), 1);
    }

    #[test]
    fn add_source_replaces_existing_key() {
        let mut sources = GeneratedSources::new();
        sources.add_source("A.g.cs", "one");
        sources.add_source("B.g.cs", "two");
        sources.add_source("A.g.cs", "three");

        assert_eq!(sources.len(), 2);
        assert_eq!(sources.get("A.g.cs"), Some("three"));
        assert_eq!(sources.hint_names().collect::<Vec<_>>(), vec!["A.g.cs", "B.g.cs"]);
        assert_eq!(sources.get("C.g.cs"), None);
    }

    #[test]
    fn collect_keeps_only_given_artifacts() {
        let artifact = |hint: &str| GeneratedArtifact {
            hint_name: hint.to_string(),
            class: QualifiedName::global(hint),
            text: hint.to_lowercase(),
        };
        let sources: GeneratedSources = vec![artifact("A.g.cs"), artifact("B.g.cs")].into_iter().collect();
        assert_eq!(sources.hint_names().collect::<Vec<_>>(), vec!["A.g.cs", "B.g.cs"]);
        assert_eq!(sources.get("B.g.cs"), Some("b.g.cs"));
    }
}
