//! Generation errors.
//!
//! ```text
//! SynthesisErrorKind - why one candidate class could not be synthesized
//! ClassError         - a SynthesisErrorKind located at its class
//! GenerationError    - why a pass produced no artifacts
//! ```
//!
//! A pass is all-or-nothing: any [`ClassError`] aborts it, after every
//! candidate has been tried so that all failures are reported together.

use derived_props_core::{ConstantError, Span};
use thiserror::Error;

/// Why a derived property could not be synthesized for a class.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisErrorKind {
    /// The marker attribute was applied without a property name.
    #[error("marker attribute has no property-name argument")]
    MissingArgument,

    /// The property-name argument is not a compile-time constant.
    #[error("property-name argument is not constant: {0}")]
    NonConstantArgument(ConstantError),

    /// The property-name argument is a constant of another kind.
    #[error("property-name argument is a {kind} constant, expected a string")]
    NotAString { kind: &'static str },

    /// No repository member has the requested name.
    #[error("repository type has no member named '{name}'")]
    MemberNotFound { name: String },

    /// Several repository members share the requested name.
    #[error("repository type has {count} members named '{name}'")]
    AmbiguousMember { name: String, count: usize },

    /// The repository member with the requested name is not a property.
    #[error("repository member '{name}' is a {kind}, not a property")]
    NotAProperty { name: String, kind: &'static str },

    /// No declaration of the repository property has getter syntax.
    #[error("repository property '{name}' has no getter syntax")]
    MissingGetter { name: String },
}

/// A synthesis failure for one candidate class.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{class} at {span}: {kind}")]
pub struct ClassError {
    /// Display name of the candidate class.
    pub class: String,
    /// Span of the candidate declaration's name.
    pub span: Span,
    pub kind: SynthesisErrorKind,
}

/// Why a generation pass was aborted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// One or more candidate classes failed synthesis.
    #[error("{} class(es) failed synthesis, first: {}", .0.len(), .0.first().map(ToString::to_string).unwrap_or_default())]
    Synthesis(Vec<ClassError>),

    /// Two artifacts of the same pass share a hint name.
    #[error("artifact '{hint_name}' generated for both {first} and {second}")]
    ArtifactKeyCollision {
        hint_name: String,
        first: String,
        second: String,
    },

    /// The pass was cancelled before it finished.
    #[error("generation cancelled")]
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_error_display() {
        let error = ClassError {
            class: "App.Person".into(),
            span: Span::new(30, 3, 22, 6),
            kind: SynthesisErrorKind::AmbiguousMember {
                name: "FullName".into(),
                count: 2,
            },
        };
        assert_eq!(
            error.to_string(),
            "App.Person at 3:22: repository type has 2 members named 'FullName'"
        );
    }

    #[test]
    fn synthesis_error_reports_first() {
        let error = GenerationError::Synthesis(vec![ClassError {
            class: "Person".into(),
            span: Span::point(0, 1, 1),
            kind: SynthesisErrorKind::MissingArgument,
        }]);
        assert_eq!(
            error.to_string(),
            "1 class(es) failed synthesis, first: Person at 1:1: marker attribute has no property-name argument"
        );
    }
}
