//! Type parsing.
//!
//! Parses written types: predefined keywords, qualified generic names,
//! tuples, and the `?`, `*` and `[]` suffixes.

use derived_props_core::{ParseError, ParseErrorKind};

use crate::ast::parser::Parser;
use crate::ast::types::{NamedType, TupleElementSyntax, TypeSegment, TypeSyntax};
use crate::ast::Ident;
use crate::lexer::TokenKind;

impl<'src> Parser<'src> {
    /// Parse a complete type, including suffixes.
    pub fn parse_type(&mut self) -> Result<TypeSyntax, ParseError> {
        let mut ty = self.parse_base_type()?;
        let start = ty.span();

        loop {
            match self.peek().kind {
                TokenKind::Question => {
                    self.advance();
                    ty = TypeSyntax::Nullable {
                        inner: Box::new(ty),
                        span: self.span_from(start),
                    };
                }
                TokenKind::Star => {
                    self.advance();
                    ty = TypeSyntax::Pointer {
                        inner: Box::new(ty),
                        span: self.span_from(start),
                    };
                }
                TokenKind::LeftBracket if self.is_rank_specifier() => {
                    self.advance();
                    let mut rank = 1;
                    while self.eat(TokenKind::Comma).is_some() {
                        rank += 1;
                    }
                    self.expect(TokenKind::RightBracket)?;
                    ty = TypeSyntax::Array {
                        element: Box::new(ty),
                        rank,
                        span: self.span_from(start),
                    };
                }
                _ => return Ok(ty),
            }
        }
    }

    /// `[` followed only by commas and `]`.
    fn is_rank_specifier(&self) -> bool {
        let mut n = 1;
        while self.peek_nth(n).kind == TokenKind::Comma {
            n += 1;
        }
        self.peek_nth(n).kind == TokenKind::RightBracket
    }

    fn parse_base_type(&mut self) -> Result<TypeSyntax, ParseError> {
        let token = *self.peek();
        match token.kind {
            TokenKind::PredefinedType => {
                self.advance();
                Ok(TypeSyntax::Predefined {
                    keyword: token.lexeme.to_string(),
                    span: token.span,
                })
            }
            TokenKind::LeftParen => self.parse_tuple_type(),
            TokenKind::Identifier => Ok(TypeSyntax::Named(self.parse_named_type(true)?)),
            _ => Err(ParseError::new(
                ParseErrorKind::ExpectedType,
                token.span,
                format!("expected type, found '{}'", token.lexeme),
            )),
        }
    }

    fn parse_tuple_type(&mut self) -> Result<TypeSyntax, ParseError> {
        let start = self.expect(TokenKind::LeftParen)?.span;
        let mut elements = Vec::new();
        loop {
            let ty = self.parse_type()?;
            let name = if self.check(TokenKind::Identifier) {
                Some(self.parse_ident()?)
            } else {
                None
            };
            elements.push(TupleElementSyntax { ty, name });
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::RightParen)?;
        Ok(TypeSyntax::Tuple {
            elements,
            span: self.span_from(start),
        })
    }

    /// Parse `alias::A.B<T>.C`.
    ///
    /// With `type_args` false, a `<` ends the name instead of starting an
    /// argument list (used for names inside expressions).
    pub(super) fn parse_named_type(&mut self, type_args: bool) -> Result<NamedType, ParseError> {
        let start = self.peek().span;
        let alias = if self.check(TokenKind::Identifier)
            && self.peek_nth(1).kind == TokenKind::ColonColon
        {
            let alias = self.parse_ident()?;
            self.advance();
            Some(alias)
        } else {
            None
        };

        let mut segments = vec![self.parse_type_segment(type_args)?];
        while self.check(TokenKind::Dot) && self.peek_nth(1).kind == TokenKind::Identifier {
            self.advance();
            segments.push(self.parse_type_segment(type_args)?);
        }

        Ok(NamedType {
            alias,
            segments,
            span: self.span_from(start),
        })
    }

    fn parse_type_segment(&mut self, type_args: bool) -> Result<TypeSegment, ParseError> {
        let name = self.parse_ident()?;
        let args = if type_args && self.check(TokenKind::Less) {
            self.parse_type_args()?
        } else {
            Vec::new()
        };
        Ok(TypeSegment {
            name,
            type_args: args,
        })
    }

    /// Parse `<T, U>`. Empty unbound forms (`<>`, `<,>`) yield no arguments.
    fn parse_type_args(&mut self) -> Result<Vec<TypeSyntax>, ParseError> {
        self.expect(TokenKind::Less)?;
        let mut args = Vec::new();
        if self.check(TokenKind::Greater) || self.check(TokenKind::Comma) {
            while self.eat(TokenKind::Comma).is_some() {}
            self.expect(TokenKind::Greater)?;
            return Ok(args);
        }
        loop {
            args.push(self.parse_type()?);
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::Greater)?;
        Ok(args)
    }

    /// Parse an identifier.
    pub(super) fn parse_ident(&mut self) -> Result<Ident, ParseError> {
        let token = *self.peek();
        if token.kind != TokenKind::Identifier {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedIdentifier,
                token.span,
                format!("expected identifier, found '{}'", token.lexeme),
            ));
        }
        self.advance();
        Ok(Ident::new(token.ident_name(), token.span))
    }

    /// Parse `<T, in U, out V>` declared type parameters, with their
    /// attributes and variance skipped.
    pub(super) fn parse_type_params(&mut self) -> Result<Vec<Ident>, ParseError> {
        let mut params = Vec::new();
        if self.eat(TokenKind::Less).is_none() {
            return Ok(params);
        }
        loop {
            while self.check(TokenKind::LeftBracket) {
                self.skip_balanced();
            }
            if self.peek().kind == TokenKind::Keyword && matches!(self.peek().lexeme, "in" | "out")
            {
                self.advance();
            }
            params.push(self.parse_ident()?);
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::Greater)?;
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::parser::Parser;
    use crate::ast::types::TypeSyntax;
    use derived_props_core::SourceId;

    fn parse_type(source: &str) -> TypeSyntax {
        let mut parser = Parser::new(source, SourceId::new(0));
        let ty = parser.parse_type().unwrap();
        assert!(parser.is_eof(), "trailing input in {source:?}");
        ty
    }

    #[test]
    fn predefined() {
        assert!(matches!(parse_type("int"), TypeSyntax::Predefined { keyword, .. } if keyword == "int"));
    }

    #[test]
    fn nested_generics() {
        let ty = parse_type("Dictionary<string, List<int>>");
        assert_eq!(ty.to_string(), "Dictionary<string, List<int>>");
        let named = ty.as_named().unwrap();
        assert_eq!(named.segments[0].type_args.len(), 2);
    }

    #[test]
    fn qualified_with_alias() {
        let ty = parse_type("global::System.Collections.Generic.IEnumerable<T>");
        let named = ty.as_named().unwrap();
        assert!(named.is_global());
        assert_eq!(named.dotted_name(), "System.Collections.Generic.IEnumerable");
    }

    #[test]
    fn suffixes() {
        assert_eq!(parse_type("int?[]").to_string(), "int?[]");
        assert_eq!(parse_type("byte*").to_string(), "byte*");
        assert!(matches!(parse_type("T[,,]"), TypeSyntax::Array { rank: 3, .. }));
    }

    #[test]
    fn tuples() {
        let ty = parse_type("(int Count, string)");
        assert_eq!(ty.to_string(), "(int Count, string)");
    }

    #[test]
    fn span_covers_whole_type() {
        let ty = parse_type("List<int>?");
        assert_eq!(ty.span().len, 10);
    }

    #[test]
    fn type_params_skip_variance() {
        let mut parser = Parser::new("<in T, out U, V>", SourceId::new(0));
        let params = parser.parse_type_params().unwrap();
        let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["T", "U", "V"]);
    }

    #[test]
    fn missing_type() {
        let mut parser = Parser::new(";", SourceId::new(0));
        assert!(parser.parse_type().is_err());
    }
}
