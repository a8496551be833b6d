//! Type syntax nodes.
//!
//! Types as written in declarations: predefined keywords, (qualified,
//! generic) names, arrays, nullable types, pointers and tuples.

use std::fmt;

use derived_props_core::Span;

use crate::ast::Ident;

/// A type as written in source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSyntax {
    /// `int`, `string`, `object`, `void`, ...
    Predefined { keyword: String, span: Span },
    /// `List<int>`, `System.String`, `global::App.Person`
    Named(NamedType),
    /// `T[]`, `T[,]`
    Array {
        element: Box<TypeSyntax>,
        rank: u32,
        span: Span,
    },
    /// `T?`
    Nullable { inner: Box<TypeSyntax>, span: Span },
    /// `T*`
    Pointer { inner: Box<TypeSyntax>, span: Span },
    /// `(int Count, string Name)`
    Tuple {
        elements: Vec<TupleElementSyntax>,
        span: Span,
    },
}

impl TypeSyntax {
    /// Get the span of this type.
    pub fn span(&self) -> Span {
        match self {
            TypeSyntax::Predefined { span, .. }
            | TypeSyntax::Array { span, .. }
            | TypeSyntax::Nullable { span, .. }
            | TypeSyntax::Pointer { span, .. }
            | TypeSyntax::Tuple { span, .. } => *span,
            TypeSyntax::Named(named) => named.span,
        }
    }

    /// Get the named type, if this is one.
    pub fn as_named(&self) -> Option<&NamedType> {
        match self {
            TypeSyntax::Named(named) => Some(named),
            _ => None,
        }
    }
}

impl fmt::Display for TypeSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSyntax::Predefined { keyword, .. } => f.write_str(keyword),
            TypeSyntax::Named(named) => write!(f, "{named}"),
            TypeSyntax::Array { element, rank, .. } => {
                write!(f, "{element}[{}]", ",".repeat(rank.saturating_sub(1) as usize))
            }
            TypeSyntax::Nullable { inner, .. } => write!(f, "{inner}?"),
            TypeSyntax::Pointer { inner, .. } => write!(f, "{inner}*"),
            TypeSyntax::Tuple { elements, .. } => {
                f.write_str("(")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", element.ty)?;
                    if let Some(name) = &element.name {
                        write!(f, " {name}")?;
                    }
                }
                f.write_str(")")
            }
        }
    }
}

/// One element of a tuple type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TupleElementSyntax {
    pub ty: TypeSyntax,
    pub name: Option<Ident>,
}

/// A possibly qualified, possibly generic type name.
///
/// `global::System.Collections.Generic.List<int>` has alias `global` and
/// five segments, the last carrying one type argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedType {
    /// Alias qualifier before `::`.
    pub alias: Option<Ident>,
    pub segments: Vec<TypeSegment>,
    pub span: Span,
}

/// One dot-separated segment of a [`NamedType`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeSegment {
    pub name: Ident,
    pub type_args: Vec<TypeSyntax>,
}

impl NamedType {
    /// The segment names joined with `.`, without alias or type arguments.
    pub fn dotted_name(&self) -> String {
        let names: Vec<&str> = self.segments.iter().map(|s| s.name.name.as_str()).collect();
        names.join(".")
    }

    /// The last segment.
    pub fn last(&self) -> Option<&TypeSegment> {
        self.segments.last()
    }

    /// Whether the name is qualified with `global::`.
    pub fn is_global(&self) -> bool {
        self.alias.as_ref().is_some_and(|a| a.name == "global")
    }

    /// Whether any segment has type arguments.
    pub fn is_generic(&self) -> bool {
        self.segments.iter().any(|s| !s.type_args.is_empty())
    }
}

impl fmt::Display for NamedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(alias) = &self.alias {
            write!(f, "{alias}::")?;
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(&segment.name.name)?;
            if !segment.type_args.is_empty() {
                f.write_str("<")?;
                for (j, arg) in segment.type_args.iter().enumerate() {
                    if j > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Ident {
        Ident::new(name, Span::default())
    }

    fn segment(name: &str, type_args: Vec<TypeSyntax>) -> TypeSegment {
        TypeSegment {
            name: ident(name),
            type_args,
        }
    }

    #[test]
    fn named_type_display() {
        let int = TypeSyntax::Predefined {
            keyword: "int".into(),
            span: Span::default(),
        };
        let named = NamedType {
            alias: Some(ident("global")),
            segments: vec![segment("System", Vec::new()), segment("List", vec![int])],
            span: Span::default(),
        };
        assert_eq!(named.to_string(), "global::System.List<int>");
        assert_eq!(named.dotted_name(), "System.List");
        assert!(named.is_global());
        assert!(named.is_generic());
    }

    #[test]
    fn composite_display() {
        let element = TypeSyntax::Named(NamedType {
            alias: None,
            segments: vec![segment("T", Vec::new())],
            span: Span::default(),
        });
        let array = TypeSyntax::Array {
            element: Box::new(TypeSyntax::Nullable {
                inner: Box::new(element),
                span: Span::default(),
            }),
            rank: 2,
            span: Span::default(),
        };
        assert_eq!(array.to_string(), "T?[,]");
    }
}
