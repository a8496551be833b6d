//! Expression nodes.
//!
//! Only the constant-expression subset is modelled: literals, names,
//! `nameof`, parentheses, unary minus and `+`. Anything else is kept as
//! [`Expr::Unsupported`] with the span of its source text.

use derived_props_core::Span;

use crate::ast::NamedType;

/// An expression in an attribute argument or initializer.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal value.
    Literal(Literal),
    /// Simple or qualified name: `Name`, `Constants.Name`.
    Name(NamedType),
    /// `nameof(Target)`
    NameOf { target: NamedType, span: Span },
    /// `lhs + rhs`
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        span: Span,
    },
    /// `-operand`
    Negate { operand: Box<Expr>, span: Span },
    /// `(inner)`
    Paren { inner: Box<Expr>, span: Span },
    /// Anything outside the constant subset.
    Unsupported { span: Span },
}

impl Expr {
    /// Get the span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Expr::Literal(literal) => literal.span,
            Expr::Name(name) => name.span,
            Expr::NameOf { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Negate { span, .. }
            | Expr::Paren { span, .. }
            | Expr::Unsupported { span } => *span,
        }
    }
}

/// Binary operators in the constant subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `+`
    Add,
}

impl BinaryOp {
    /// The operator's source text.
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
        }
    }
}

/// A literal with its decoded value.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub kind: LiteralKind,
    pub span: Span,
}

/// Decoded literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralKind {
    /// Regular, verbatim or raw string, escapes processed.
    String(String),
    /// Interpolated string; `None` when it contains holes.
    Interpolated(Option<String>),
    Char(char),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}
