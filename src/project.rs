//! Project API.
//!
//! A [`Project`] holds the source files and metadata references of one
//! compilation, builds them on demand and runs the generator over the
//! result. Each successful pass replaces the generated sources of the
//! previous one.
//!
//! # Example
//!
//! ```
//! use derived_props::Project;
//!
//! let mut project = Project::new();
//! project.add_source("a.cs", "class A { }").unwrap();
//! assert!(project.has_pending_changes());
//!
//! project.build().unwrap();
//! assert!(!project.has_pending_changes());
//!
//! // Identical text is not a change.
//! assert!(!project.update_source("a.cs", "class A { }").unwrap());
//! ```

use derived_props_core::TypeSource;
use derived_props_generator::{
    CancellationToken, DerivedPropertyGenerator, GeneratedSources, GenerationError, GeneratorConfig,
    PassStatus,
};
use derived_props_registry::{Compilation, CompilationError};
use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;
use tracing::debug;
use xxhash_rust::xxh64::xxh64;

/// Errors from building or generating a [`Project`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectError {
    /// No source file or reference was added.
    #[error("project has no sources")]
    NoSources,

    /// The named file is not part of the project.
    #[error("file not found: {0}")]
    FileNotFound(String),

    /// A file name is already used by a file of the other kind.
    #[error("'{0}' is already added as a {1}")]
    KindConflict(String, &'static str),

    #[error(transparent)]
    Compilation(#[from] CompilationError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

#[derive(Debug)]
struct SourceFile {
    name: String,
    text: String,
    kind: TypeSource,
}

/// Source files, references and generated output of one compilation.
#[derive(Debug, Default)]
pub struct Project {
    generator: DerivedPropertyGenerator,
    /// Files in the order they were added.
    files: Vec<SourceFile>,
    /// File name -> index into `files`.
    index: FxHashMap<String, usize>,
    /// Hash of each file's text, for change detection.
    source_hashes: FxHashMap<String, u64>,
    /// Files changed since the last build.
    dirty_files: FxHashSet<String>,
    compilation: Option<Compilation>,
    generated: GeneratedSources,
    cancel: CancellationToken,
}

impl Project {
    /// Create an empty project with the default generator configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty project with a custom generator configuration.
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self {
            generator: DerivedPropertyGenerator::new(config),
            ..Self::default()
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        self.generator.config()
    }

    fn hash_source(text: &str) -> u64 {
        xxh64(text.as_bytes(), 0)
    }

    /// Add a source file, or replace the text of one already added.
    ///
    /// Returns whether the project changed.
    pub fn add_source(&mut self, name: impl Into<String>, text: impl Into<String>) -> Result<bool, ProjectError> {
        self.insert(name.into(), text.into(), TypeSource::Source)
    }

    /// Add a declaration-only reference, or replace one already added.
    ///
    /// Types declared in references resolve like source types, but their
    /// classes are never generation candidates and their property getters
    /// carry no text to copy.
    pub fn add_reference(&mut self, name: impl Into<String>, text: impl Into<String>) -> Result<bool, ProjectError> {
        self.insert(name.into(), text.into(), TypeSource::Metadata)
    }

    /// Change the text of a file already added.
    ///
    /// Returns `true` if the text actually changed.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::FileNotFound`] if no file has this name.
    pub fn update_source(&mut self, name: impl AsRef<str>, text: impl Into<String>) -> Result<bool, ProjectError> {
        let name = name.as_ref();
        let Some(&i) = self.index.get(name) else {
            return Err(ProjectError::FileNotFound(name.to_string()));
        };
        let kind = self.files[i].kind;
        self.insert(name.to_string(), text.into(), kind)
    }

    fn insert(&mut self, name: String, text: String, kind: TypeSource) -> Result<bool, ProjectError> {
        let hash = Self::hash_source(&text);
        match self.index.get(&name) {
            Some(&i) => {
                let file = &mut self.files[i];
                if file.kind != kind {
                    let existing = match file.kind {
                        TypeSource::Source => "source",
                        TypeSource::Metadata => "reference",
                    };
                    return Err(ProjectError::KindConflict(name, existing));
                }
                if self.source_hashes.get(&name) == Some(&hash) {
                    return Ok(false);
                }
                file.text = text;
            }
            None => {
                self.index.insert(name.clone(), self.files.len());
                self.files.push(SourceFile {
                    name: name.clone(),
                    text,
                    kind,
                });
            }
        }
        self.source_hashes.insert(name.clone(), hash);
        self.dirty_files.insert(name);
        Ok(true)
    }

    /// Remove a file. Returns whether it was present.
    pub fn remove_source(&mut self, name: &str) -> bool {
        let Some(i) = self.index.remove(name) else {
            return false;
        };
        self.files.remove(i);
        for index in self.index.values_mut() {
            if *index > i {
                *index -= 1;
            }
        }
        self.source_hashes.remove(name);
        self.dirty_files.insert(name.to_string());
        true
    }

    /// Whether files changed since the last successful build.
    pub fn has_pending_changes(&self) -> bool {
        !self.dirty_files.is_empty()
    }

    pub fn dirty_files(&self) -> &FxHashSet<String> {
        &self.dirty_files
    }

    /// Rebuild the compilation if files changed since the last build.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn build(&mut self) -> Result<&Compilation, ProjectError> {
        if self.files.is_empty() {
            return Err(ProjectError::NoSources);
        }
        if self.dirty_files.is_empty() && self.compilation.is_some() {
            return self.compilation.as_ref().ok_or(ProjectError::NoSources);
        }

        let mut builder = Compilation::builder();
        for file in &self.files {
            match file.kind {
                TypeSource::Source => builder.add_source(&file.name, &file.text),
                TypeSource::Metadata => builder.add_metadata_reference(&file.name, &file.text),
            };
        }
        let compilation = builder.build()?;
        debug!(files = self.files.len(), changed = self.dirty_files.len(), "project built");
        self.dirty_files.clear();
        Ok(self.compilation.insert(compilation))
    }

    /// The last successful build, if any.
    pub fn compilation(&self) -> Option<&Compilation> {
        self.compilation.as_ref()
    }

    /// Build if needed, then run a generation pass.
    ///
    /// A successful pass replaces [`generated`](Self::generated) with its
    /// own artifacts, so classes that lost their marker drop out. A failed
    /// pass leaves the previous output in place.
    pub fn generate(&mut self) -> Result<PassStatus, ProjectError> {
        self.build()?;
        let Some(compilation) = &self.compilation else {
            return Err(ProjectError::NoSources);
        };
        let output = self.generator.execute(compilation, &self.cancel)?;
        self.generated = output.artifacts.into_iter().collect();
        Ok(output.status)
    }

    /// Generated sources of the last successful pass.
    pub fn generated(&self) -> &GeneratedSources {
        &self.generated
    }

    /// A token that cancels running and future passes while set.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}
