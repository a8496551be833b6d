//! Expression parsing.
//!
//! Expressions are parsed speculatively: the constant subset is turned
//! into a tree, and anything else is skipped (balanced) up to the
//! caller's terminator and kept as [`Expr::Unsupported`].

use derived_props_core::{ParseError, ParseErrorKind, Span};

use crate::ast::expr::{BinaryOp, Expr, Literal, LiteralKind};
use crate::ast::literal::{self, EscapeError};
use crate::ast::parser::Parser;
use crate::lexer::{Token, TokenKind};

impl<'src> Parser<'src> {
    /// Parse an expression that ends before one of `terminators`.
    ///
    /// The terminator is not consumed. An empty expression records an
    /// error and yields [`Expr::Unsupported`] with an empty span.
    pub fn parse_expression(&mut self, terminators: &[TokenKind]) -> Expr {
        let start_pos = self.position;
        let start = self.peek().span;

        if let Some(expr) = self.parse_additive()
            && terminators.contains(&self.peek().kind)
        {
            return expr;
        }

        self.position = start_pos;
        self.skip_until(terminators);
        if self.position == start_pos {
            let token = *self.peek();
            let error = self.unexpected(&token, "expression");
            self.errors.push(error);
            return Expr::Unsupported {
                span: Span::point(start.offset, start.line, start.col),
            };
        }
        Expr::Unsupported {
            span: self.span_from(start),
        }
    }

    fn parse_additive(&mut self) -> Option<Expr> {
        let mut lhs = self.parse_unary()?;
        while self.eat(TokenKind::Plus).is_some() {
            let rhs = self.parse_unary()?;
            let span = lhs.span().merge(rhs.span());
            lhs = Expr::Binary {
                op: BinaryOp::Add,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span,
            };
        }
        Some(lhs)
    }

    fn parse_unary(&mut self) -> Option<Expr> {
        if let Some(minus) = self.eat(TokenKind::Minus) {
            let operand = self.parse_unary()?;
            let span = minus.span.merge(operand.span());
            return Some(Expr::Negate {
                operand: Box::new(operand),
                span,
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Option<Expr> {
        let token = *self.peek();
        match token.kind {
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_additive()?;
                self.eat(TokenKind::RightParen)?;
                Some(Expr::Paren {
                    inner: Box::new(inner),
                    span: self.span_from(token.span),
                })
            }
            TokenKind::Identifier
                if token.lexeme == "nameof" && self.peek_nth(1).kind == TokenKind::LeftParen =>
            {
                self.advance();
                self.advance();
                let target = self.parse_named_type(true).ok()?;
                self.eat(TokenKind::RightParen)?;
                Some(Expr::NameOf {
                    target,
                    span: self.span_from(token.span),
                })
            }
            TokenKind::Identifier => self.parse_named_type(false).ok().map(Expr::Name),
            _ => {
                let kind = self.parse_literal(&token)?;
                Some(Expr::Literal(Literal {
                    kind,
                    span: token.span,
                }))
            }
        }
    }

    /// Decode a literal token, consuming it.
    fn parse_literal(&mut self, token: &Token<'src>) -> Option<LiteralKind> {
        let lexeme = token.lexeme;
        let kind = match token.kind {
            TokenKind::StringLiteral => match literal::decode_string(lexeme) {
                Ok(value) => LiteralKind::String(value),
                Err(error) => return self.escape_error(token, error),
            },
            TokenKind::VerbatimStringLiteral => LiteralKind::String(literal::decode_verbatim(lexeme)),
            TokenKind::InterpolatedStringLiteral => match literal::decode_interpolated(lexeme) {
                Ok(value) => LiteralKind::Interpolated(value),
                Err(error) => return self.escape_error(token, error),
            },
            TokenKind::RawStringLiteral => {
                let interpolated = lexeme.starts_with('$');
                match literal::decode_raw(lexeme) {
                    Some(value) if !interpolated => LiteralKind::String(value),
                    value => LiteralKind::Interpolated(value),
                }
            }
            TokenKind::CharLiteral => match literal::decode_char(lexeme) {
                Ok(value) => LiteralKind::Char(value),
                Err(error) => return self.escape_error(token, error),
            },
            TokenKind::IntLiteral => match literal::decode_int(lexeme) {
                Some(value) => LiteralKind::Int(value),
                None => return self.invalid_literal(token),
            },
            TokenKind::RealLiteral => match literal::decode_real(lexeme) {
                Some(value) => LiteralKind::Float(value),
                None => return self.invalid_literal(token),
            },
            TokenKind::True => LiteralKind::Bool(true),
            TokenKind::False => LiteralKind::Bool(false),
            TokenKind::Null => LiteralKind::Null,
            _ => return None,
        };
        self.advance();
        Some(kind)
    }

    fn escape_error<T>(&mut self, token: &Token<'src>, error: EscapeError) -> Option<T> {
        let offset = token.span.offset + error.offset as u32;
        let col = token.span.col + error.offset as u32;
        self.errors.push(ParseError::new(
            ParseErrorKind::InvalidEscapeSequence,
            Span::new(offset, token.span.line, col, 2),
            format!("invalid escape sequence in {}", token.lexeme),
        ));
        self.advance();
        None
    }

    fn invalid_literal<T>(&mut self, token: &Token<'src>) -> Option<T> {
        self.errors.push(ParseError::new(
            ParseErrorKind::InvalidLiteral,
            token.span,
            format!("'{}' is out of range", token.lexeme),
        ));
        self.advance();
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::expr::{Expr, LiteralKind};
    use crate::ast::parser::Parser;
    use crate::lexer::TokenKind;
    use derived_props_core::{ParseErrorKind, SourceId};

    const TERMINATORS: &[TokenKind] = &[TokenKind::Comma, TokenKind::RightParen, TokenKind::Semicolon];

    fn parse(source: &str) -> (Expr, Parser<'_>) {
        let mut parser = Parser::new(source, SourceId::new(0));
        let expr = parser.parse_expression(TERMINATORS);
        (expr, parser)
    }

    #[test]
    fn string_literal() {
        let (expr, _) = parse(r#""Full\tName";"#);
        assert!(matches!(expr, Expr::Literal(lit) if lit.kind == LiteralKind::String("Full\tName".into())));
    }

    #[test]
    fn concatenation_is_left_associative() {
        let (expr, _) = parse(r#""a" + B + nameof(C));"#);
        let Expr::Binary { lhs, rhs, .. } = expr else {
            panic!("expected binary");
        };
        assert!(matches!(*lhs, Expr::Binary { .. }));
        assert!(matches!(*rhs, Expr::NameOf { .. }));
    }

    #[test]
    fn qualified_name() {
        let (expr, _) = parse("Constants.Names.Full,");
        let Expr::Name(name) = expr else {
            panic!("expected name");
        };
        assert_eq!(name.dotted_name(), "Constants.Names.Full");
    }

    #[test]
    fn nameof_generic_type() {
        let (expr, _) = parse("nameof(List<int>);");
        assert!(matches!(expr, Expr::NameOf { target, .. } if target.dotted_name() == "List"));
    }

    #[test]
    fn calls_are_unsupported() {
        let (expr, parser) = parse("GetName(1, 2) + \"x\", next");
        let Expr::Unsupported { span } = expr else {
            panic!("expected unsupported");
        };
        assert_eq!(span.slice(parser.source), Some("GetName(1, 2) + \"x\""));
        assert!(parser.check(TokenKind::Comma));
    }

    #[test]
    fn negative_and_parenthesized() {
        let (expr, _) = parse("-(1 + 2);");
        assert!(matches!(expr, Expr::Negate { .. }));
    }

    #[test]
    fn interpolated_with_hole() {
        let (expr, _) = parse("$\"{x}\";");
        assert!(matches!(expr, Expr::Literal(lit) if lit.kind == LiteralKind::Interpolated(None)));
    }

    #[test]
    fn bad_escape_reports_error() {
        let (expr, mut parser) = parse(r#""a\q";"#);
        assert!(matches!(expr, Expr::Unsupported { .. }));
        let errors = parser.take_errors();
        assert_eq!(errors.errors()[0].kind, ParseErrorKind::InvalidEscapeSequence);
    }

    #[test]
    fn empty_expression_is_an_error() {
        let (expr, parser) = parse(")");
        assert!(matches!(expr, Expr::Unsupported { span } if span.is_empty()));
        assert!(parser.has_errors());
    }
}
