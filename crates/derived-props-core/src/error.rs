//! Error types shared by the front end and the registry.
//!
//! ## Error Hierarchy
//!
//! ```text
//! LexError           - tokenization errors
//! ParseError         - parser errors (with ParseErrorKind), collected in ParseErrors
//! RegistrationError  - symbol registration errors
//! ConstantError      - an expression is not a usable compile-time constant
//! ```
//!
//! Generation-time errors live in the generator crate, next to the pass
//! that produces them.

use std::fmt;

use thiserror::Error;

use crate::Span;

// ============================================================================
// Lexer Errors
// ============================================================================

/// Errors that occur during lexical analysis (tokenization).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// An unexpected character was encountered.
    #[error("unexpected character '{ch}' at {span}")]
    UnexpectedChar { ch: char, span: Span },

    /// A string literal was not properly terminated.
    #[error("unterminated string at {span}")]
    UnterminatedString { span: Span },

    /// A character literal was not properly terminated.
    #[error("unterminated character literal at {span}")]
    UnterminatedChar { span: Span },

    /// A block comment was not properly terminated.
    #[error("unterminated comment at {span}")]
    UnterminatedComment { span: Span },
}

impl LexError {
    /// Get the span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedChar { span, .. } => *span,
            LexError::UnterminatedString { span } => *span,
            LexError::UnterminatedChar { span } => *span,
            LexError::UnterminatedComment { span } => *span,
        }
    }
}

// ============================================================================
// Parse Errors
// ============================================================================

/// Categories of parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// A specific token was expected but not found.
    ExpectedToken,
    /// An unexpected token was encountered.
    UnexpectedToken,
    /// Unexpected end of file.
    UnexpectedEof,
    /// A type was expected.
    ExpectedType,
    /// An identifier was expected.
    ExpectedIdentifier,
    /// A declaration was expected.
    ExpectedDeclaration,
    /// A class member was expected.
    ExpectedClassMember,
    /// Mismatched delimiter (parentheses, brackets, braces).
    MismatchedDelimiter,
    /// Invalid escape sequence in a string literal.
    InvalidEscapeSequence,
    /// A literal value could not be parsed.
    InvalidLiteral,
    /// The lexer reported an error.
    LexError,
}

impl ParseErrorKind {
    /// Returns a human-readable name for this error kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseErrorKind::ExpectedToken => "expected token",
            ParseErrorKind::UnexpectedToken => "unexpected token",
            ParseErrorKind::UnexpectedEof => "unexpected end of file",
            ParseErrorKind::ExpectedType => "expected type",
            ParseErrorKind::ExpectedIdentifier => "expected identifier",
            ParseErrorKind::ExpectedDeclaration => "expected declaration",
            ParseErrorKind::ExpectedClassMember => "expected class member",
            ParseErrorKind::MismatchedDelimiter => "mismatched delimiter",
            ParseErrorKind::InvalidEscapeSequence => "invalid escape sequence",
            ParseErrorKind::InvalidLiteral => "invalid literal",
            ParseErrorKind::LexError => "lexical error",
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parse error with location and context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at {span}: {message}")]
pub struct ParseError {
    /// The category of this error.
    pub kind: ParseErrorKind,
    /// The source location where the error occurred.
    pub span: Span,
    /// A detailed error message.
    pub message: String,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(kind: ParseErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    /// Create an "expected token" error.
    pub fn expected_token(span: Span, expected: &str, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedToken,
            span,
            format!("expected {expected}, found {found}"),
        )
    }

    /// Create an "unexpected token" error.
    pub fn unexpected_token(span: Span, token: &str) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedToken,
            span,
            format!("unexpected '{token}'"),
        )
    }
}

impl From<LexError> for ParseError {
    fn from(error: LexError) -> Self {
        ParseError::new(ParseErrorKind::LexError, error.span(), error.to_string())
    }
}

/// A collection of parse errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseErrors {
    errors: Vec<ParseError>,
}

impl ParseErrors {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an error.
    pub fn push(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    /// Check if there are no errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Borrow the errors.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Consume into the underlying vector.
    pub fn into_vec(self) -> Vec<ParseError> {
        self.errors
    }
}

impl From<ParseError> for ParseErrors {
    fn from(error: ParseError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl FromIterator<ParseError> for ParseErrors {
    fn from_iter<T: IntoIterator<Item = ParseError>>(iter: T) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.as_slice() {
            [] => write!(f, "no errors"),
            [single] => write!(f, "{single}"),
            errors => {
                writeln!(f, "{} parse errors:", errors.len())?;
                for error in errors {
                    writeln!(f, "  {error}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ParseErrors {}

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors raised while registering declarations into the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// Two non-partial declarations share a fully-qualified name.
    #[error("duplicate type '{name}' at {span}")]
    DuplicateType { name: String, span: Span },

    /// Partial declarations of the same name disagree on their kind.
    #[error("partial declarations of '{name}' have different kinds ({first} vs {second})")]
    PartialKindMismatch {
        name: String,
        first: &'static str,
        second: &'static str,
    },

    /// The namespace node could not be found.
    #[error("invalid namespace")]
    InvalidNamespace,
}

// ============================================================================
// Constant Errors
// ============================================================================

/// Why an expression could not be evaluated to a compile-time constant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstantError {
    /// The expression form is never constant (calls, `typeof`, holes in
    /// interpolated strings, ...).
    #[error("'{text}' is not a constant expression")]
    NotConstant { text: String },

    /// A name did not resolve to a `const` field.
    #[error("'{name}' does not name a constant")]
    UnresolvedName { name: String },

    /// A constant refers back to itself.
    #[error("constant '{name}' depends on itself")]
    Cyclic { name: String },

    /// Operands cannot be combined by the operator.
    #[error("operator '{op}' cannot combine {lhs} and {rhs}")]
    InvalidOperands {
        op: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_error_span() {
        let span = Span::new(0, 2, 4, 3);
        assert_eq!(LexError::UnterminatedString { span }.span(), span);
        assert_eq!(
            LexError::UnexpectedChar { ch: '#', span }.to_string(),
            "unexpected character '#' at 2:4"
        );
    }

    #[test]
    fn parse_error_display() {
        let error = ParseError::expected_token(Span::new(10, 1, 11, 1), "';'", "'}'");
        assert_eq!(
            error.to_string(),
            "expected token at 1:11: expected ';', found '}'"
        );
    }

    #[test]
    fn parse_errors_collection() {
        let mut errors = ParseErrors::new();
        assert!(errors.is_empty());
        errors.push(ParseError::unexpected_token(Span::default(), "}"));
        errors.push(LexError::UnterminatedComment { span: Span::default() }.into());
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.errors()[1].kind, ParseErrorKind::LexError);
        assert!(errors.to_string().starts_with("2 parse errors:"));
    }

    #[test]
    fn constant_error_messages() {
        let error = ConstantError::NotConstant {
            text: "GetName()".into(),
        };
        assert_eq!(error.to_string(), "'GetName()' is not a constant expression");
    }
}
