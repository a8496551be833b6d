//! Declaration parsing.
//!
//! Parses compilation units, namespaces, `using` directives, attribute
//! lists, type declarations and their members. Method, constructor,
//! operator and accessor bodies are skipped with balanced delimiters;
//! only their spans are kept.

use derived_props_core::{Modifiers, ParseError, ParseErrorKind, Span, TypeKind};

use crate::ast::decl::*;
use crate::ast::expr::Expr;
use crate::ast::parser::Parser;
use crate::ast::types::{NamedType, TypeSyntax};
use crate::ast::{Ident, SourceFile};
use crate::lexer::TokenKind;

/// Contextual keywords that act as declaration modifiers.
const CONTEXTUAL_MODIFIERS: &[&str] = &["partial", "file", "required", "async"];

impl<'src> Parser<'src> {
    /// Parse a complete source file.
    ///
    /// Errors are collected on the parser; the returned tree holds
    /// everything that could be recovered.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse_source_file(&mut self) -> SourceFile {
        let mut usings = Vec::new();
        let mut attributes = Vec::new();
        let mut members = Vec::new();
        self.parse_namespace_body(&mut usings, &mut attributes, &mut members, false);

        SourceFile {
            source: self.source_id,
            usings,
            attributes,
            members,
            span: Span::new(0, 1, 1, self.source.len() as u32),
        }
    }

    /// Parse namespace members until EOF, or until the closing `}` when
    /// `braced` (which is left for the caller).
    fn parse_namespace_body(
        &mut self,
        usings: &mut Vec<UsingDirective>,
        attributes: &mut Vec<AttributeList>,
        members: &mut Vec<NamespaceMember>,
        braced: bool,
    ) {
        loop {
            if self.is_eof() || (braced && self.check(TokenKind::RightBrace)) {
                return;
            }

            let result = if self.is_using_directive() {
                self.parse_using().map(|using| usings.push(using))
            } else if self.is_global_attribute_list() {
                self.parse_attribute_list().map(|list| attributes.push(list))
            } else if self.check(TokenKind::Namespace) {
                self.parse_namespace()
                    .map(|ns| members.push(NamespaceMember::Namespace(ns)))
            } else if self.check(TokenKind::RightBrace) {
                let token = self.advance();
                Err(ParseError::unexpected_token(token.span, token.lexeme))
            } else {
                self.parse_namespace_member().map(|decl| {
                    if let Some(decl) = decl {
                        members.push(NamespaceMember::Type(decl));
                    }
                })
            };

            if let Err(error) = result {
                self.record(error);
                self.synchronize();
            }
        }
    }

    fn is_using_directive(&self) -> bool {
        self.check(TokenKind::Using)
            || (self.check_contextual("global") && self.peek_nth(1).kind == TokenKind::Using)
    }

    fn is_global_attribute_list(&self) -> bool {
        self.check(TokenKind::LeftBracket)
            && matches!(self.peek_nth(1).lexeme, "assembly" | "module")
            && self.peek_nth(2).kind == TokenKind::Colon
    }

    // ========================================================================
    // Namespaces and using directives
    // ========================================================================

    /// Parse `namespace A.B;` (file-scoped, runs to EOF) or `namespace A.B { ... }`.
    fn parse_namespace(&mut self) -> Result<NamespaceDecl, ParseError> {
        let start = self.expect(TokenKind::Namespace)?.span;

        let mut name = vec![self.parse_ident()?];
        while self.eat(TokenKind::Dot).is_some() {
            name.push(self.parse_ident()?);
        }

        let mut usings = Vec::new();
        let mut attributes = Vec::new();
        let mut members = Vec::new();

        let file_scoped = self.eat(TokenKind::Semicolon).is_some();
        if file_scoped {
            self.parse_namespace_body(&mut usings, &mut attributes, &mut members, false);
        } else {
            self.expect(TokenKind::LeftBrace)?;
            self.parse_namespace_body(&mut usings, &mut attributes, &mut members, true);
            self.expect_closing_brace();
            self.eat(TokenKind::Semicolon);
        }

        Ok(NamespaceDecl {
            name,
            file_scoped,
            usings,
            members,
            span: self.span_from(start),
        })
    }

    /// Parse `[global] using [static] [Alias =] Target;`.
    fn parse_using(&mut self) -> Result<UsingDirective, ParseError> {
        let start = self.peek().span;
        let is_global = self.eat_contextual("global").is_some();
        self.expect(TokenKind::Using)?;

        let kind = if self.peek().kind == TokenKind::Modifier && self.peek().lexeme == "static" {
            self.advance();
            UsingKind::Static
        } else if self.check(TokenKind::Identifier) && self.peek_nth(1).kind == TokenKind::Equal {
            let alias = self.parse_ident()?;
            self.advance();
            UsingKind::Alias(alias)
        } else {
            UsingKind::Namespace
        };

        let target = self.parse_type()?;
        self.expect(TokenKind::Semicolon)?;

        Ok(UsingDirective {
            kind,
            target,
            is_global,
            span: self.span_from(start),
        })
    }

    /// Record a missing `}` without entering panic mode.
    fn expect_closing_brace(&mut self) {
        if self.eat(TokenKind::RightBrace).is_none() {
            let token = *self.peek();
            let error = self.unexpected(&token, "'}'");
            self.errors.push(error);
        }
    }

    // ========================================================================
    // Attributes and modifiers
    // ========================================================================

    /// Parse zero or more attribute lists.
    fn parse_attribute_lists(&mut self) -> Result<Vec<AttributeList>, ParseError> {
        let mut lists = Vec::new();
        while self.check(TokenKind::LeftBracket) {
            lists.push(self.parse_attribute_list()?);
        }
        Ok(lists)
    }

    /// Parse `[target: A, B(args)]`.
    fn parse_attribute_list(&mut self) -> Result<AttributeList, ParseError> {
        let start = self.expect(TokenKind::LeftBracket)?.span;

        let target = if matches!(
            self.peek().kind,
            TokenKind::Identifier | TokenKind::Keyword | TokenKind::Event
        ) && self.peek_nth(1).kind == TokenKind::Colon
        {
            let token = self.advance();
            self.advance();
            Some(Ident::new(token.ident_name(), token.span))
        } else {
            None
        };

        let mut attributes = Vec::new();
        loop {
            attributes.push(self.parse_attribute()?);
            if self.eat(TokenKind::Comma).is_none() || self.check(TokenKind::RightBracket) {
                break;
            }
        }
        self.expect(TokenKind::RightBracket)?;

        Ok(AttributeList {
            target,
            attributes,
            span: self.span_from(start),
        })
    }

    fn parse_attribute(&mut self) -> Result<Attribute, ParseError> {
        let start = self.peek().span;
        let name = TypeSyntax::Named(self.parse_named_type(true)?);

        let mut arguments = Vec::new();
        if self.eat(TokenKind::LeftParen).is_some() {
            while !self.check(TokenKind::RightParen) && !self.is_eof() {
                arguments.push(self.parse_attribute_arg());
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
            self.expect(TokenKind::RightParen)?;
        }

        Ok(Attribute {
            name,
            arguments,
            span: self.span_from(start),
        })
    }

    /// Parse `value`, `Name = value` or `name: value`.
    fn parse_attribute_arg(&mut self) -> AttributeArg {
        let start = self.peek().span;
        let kind = if self.check(TokenKind::Identifier)
            && matches!(self.peek_nth(1).kind, TokenKind::Equal | TokenKind::Colon)
        {
            let token = self.advance();
            let name = Ident::new(token.ident_name(), token.span);
            match self.advance().kind {
                TokenKind::Colon => AttributeArgKind::Parameter(name),
                _ => AttributeArgKind::Property(name),
            }
        } else {
            AttributeArgKind::Positional
        };
        let value = self.parse_expression(&[TokenKind::Comma, TokenKind::RightParen]);
        AttributeArg {
            kind,
            value,
            span: self.span_from(start),
        }
    }

    /// Parse declaration modifiers, including contextual ones.
    fn parse_modifiers(&mut self) -> Modifiers {
        let mut modifiers = Modifiers::empty();
        loop {
            let token = *self.peek();
            let is_modifier = match token.kind {
                TokenKind::Modifier => true,
                TokenKind::Identifier => {
                    CONTEXTUAL_MODIFIERS.contains(&token.lexeme) && self.modifier_follows()
                }
                _ => false,
            };
            if !is_modifier {
                return modifiers;
            }
            if let Some(flag) = Modifiers::from_keyword(token.lexeme) {
                modifiers |= flag;
            }
            self.advance();
        }
    }

    /// Whether the token after a contextual modifier continues a declaration.
    fn modifier_follows(&self) -> bool {
        matches!(
            self.peek_nth(1).kind,
            TokenKind::Modifier
                | TokenKind::Identifier
                | TokenKind::PredefinedType
                | TokenKind::Class
                | TokenKind::Struct
                | TokenKind::Interface
                | TokenKind::Enum
                | TokenKind::Delegate
                | TokenKind::Event
                | TokenKind::LeftParen
        )
    }

    // ========================================================================
    // Type declarations
    // ========================================================================

    /// Parse a type or delegate declaration at namespace level.
    /// Delegates are skipped and yield `None`.
    fn parse_namespace_member(&mut self) -> Result<Option<TypeDecl>, ParseError> {
        let start = self.peek().span;
        let attributes = self.parse_attribute_lists()?;
        let modifiers = self.parse_modifiers();

        if self.is_type_keyword() {
            return self.parse_type_decl(attributes, modifiers, start).map(Some);
        }
        if self.check(TokenKind::Delegate) {
            self.skip_until(&[TokenKind::Semicolon]);
            self.expect(TokenKind::Semicolon)?;
            return Ok(None);
        }

        let token = *self.peek();
        Err(ParseError::new(
            ParseErrorKind::ExpectedDeclaration,
            token.span,
            format!("expected type declaration, found '{}'", token.lexeme),
        ))
    }

    fn is_type_keyword(&self) -> bool {
        match self.peek().kind {
            TokenKind::Class | TokenKind::Struct | TokenKind::Interface | TokenKind::Enum => true,
            TokenKind::Identifier => {
                self.peek().lexeme == "record"
                    && matches!(
                        self.peek_nth(1).kind,
                        TokenKind::Identifier | TokenKind::Class | TokenKind::Struct
                    )
            }
            _ => false,
        }
    }

    /// Parse a type declaration; attributes and modifiers are already consumed.
    fn parse_type_decl(
        &mut self,
        attributes: Vec<AttributeList>,
        modifiers: Modifiers,
        start: Span,
    ) -> Result<TypeDecl, ParseError> {
        let id = self.next_decl_id();

        let keyword = self.advance();
        let kind = match keyword.kind {
            TokenKind::Class => TypeKind::Class,
            TokenKind::Struct => TypeKind::Struct,
            TokenKind::Interface => TypeKind::Interface,
            TokenKind::Enum => TypeKind::Enum,
            _ => {
                if self.eat(TokenKind::Struct).is_some() {
                    TypeKind::RecordStruct
                } else {
                    self.eat(TokenKind::Class);
                    TypeKind::Record
                }
            }
        };

        let name = self.parse_ident()?;
        let type_params = self.parse_type_params()?;

        // Primary constructor, base list and constraint clauses.
        if self.check(TokenKind::LeftParen) {
            self.skip_balanced();
        }
        if self.check(TokenKind::Colon) || self.check_contextual("where") {
            self.skip_until(&[TokenKind::LeftBrace, TokenKind::Semicolon]);
        }

        let mut members = Vec::new();
        if self.eat(TokenKind::Semicolon).is_none() {
            self.expect(TokenKind::LeftBrace)?;
            if kind == TypeKind::Enum {
                self.skip_until(&[TokenKind::RightBrace]);
            } else {
                members = self.parse_type_body(&name.name);
            }
            self.expect_closing_brace();
            self.eat(TokenKind::Semicolon);
        }

        Ok(TypeDecl {
            id,
            attributes,
            modifiers,
            kind,
            name,
            type_params,
            members,
            span: self.span_from(start),
        })
    }

    /// Parse members until the closing `}` (not consumed).
    fn parse_type_body(&mut self, type_name: &str) -> Vec<MemberDecl> {
        let mut members = Vec::new();
        loop {
            if self.is_eof() || self.check(TokenKind::RightBrace) {
                return members;
            }
            if self.eat(TokenKind::Semicolon).is_some() {
                continue;
            }
            match self.parse_member(type_name) {
                Ok(member) => members.push(member),
                Err(error) => {
                    self.record(error);
                    self.synchronize();
                }
            }
        }
    }

    // ========================================================================
    // Members
    // ========================================================================

    fn parse_member(&mut self, type_name: &str) -> Result<MemberDecl, ParseError> {
        let start = self.peek().span;
        let attributes = self.parse_attribute_lists()?;
        let modifiers = self.parse_modifiers();

        if self.is_type_keyword() {
            return Ok(MemberDecl::Type(self.parse_type_decl(attributes, modifiers, start)?));
        }

        let token = *self.peek();
        match token.kind {
            TokenKind::Event => return self.parse_event(attributes, modifiers, start),
            TokenKind::Delegate | TokenKind::Tilde | TokenKind::ConversionKeyword => {
                return self.skip_member(start);
            }
            TokenKind::Identifier
                if token.ident_name() == type_name
                    && self.peek_nth(1).kind == TokenKind::LeftParen =>
            {
                return self.skip_member(start);
            }
            TokenKind::RightBrace | TokenKind::Eof => {
                return Err(ParseError::new(
                    ParseErrorKind::ExpectedClassMember,
                    token.span,
                    "expected member after attributes or modifiers",
                ));
            }
            _ => {}
        }

        let ty = self.parse_type()?;

        match self.peek().kind {
            TokenKind::Operator | TokenKind::This => return self.skip_member(start),
            TokenKind::Identifier => {}
            _ => {
                let token = *self.peek();
                return Err(self.unexpected(&token, "member name"));
            }
        }

        let name = self.parse_named_type(true)?;
        if self.check(TokenKind::Dot) && self.peek_nth(1).kind == TokenKind::This {
            return self.skip_member(start);
        }

        match self.peek().kind {
            TokenKind::LeftParen => self.parse_method(attributes, modifiers, ty, name, start),
            TokenKind::LeftBrace | TokenKind::Arrow => {
                self.parse_property(attributes, modifiers, ty, name, start)
            }
            TokenKind::Equal | TokenKind::Semicolon | TokenKind::Comma => {
                self.parse_field(attributes, modifiers, ty, name, start)
            }
            _ => {
                let token = *self.peek();
                Err(ParseError::new(
                    ParseErrorKind::ExpectedClassMember,
                    token.span,
                    format!("unexpected '{}' in member declaration", token.lexeme),
                ))
            }
        }
    }

    /// Skip a member whose body the AST does not model: through a
    /// balanced `{ ... }` block, `=> expr;` or `;`.
    fn skip_member(&mut self, start: Span) -> Result<MemberDecl, ParseError> {
        self.skip_until(&[TokenKind::LeftBrace, TokenKind::Semicolon, TokenKind::Arrow]);
        self.skip_body()?;
        Ok(MemberDecl::Other {
            span: self.span_from(start),
        })
    }

    /// Skip `{ ... }`, `=> expr;` or `;` at the current position.
    fn skip_body(&mut self) -> Result<(), ParseError> {
        match self.peek().kind {
            TokenKind::LeftBrace => {
                self.skip_balanced();
                Ok(())
            }
            TokenKind::Arrow => {
                self.advance();
                self.skip_until(&[TokenKind::Semicolon]);
                self.expect(TokenKind::Semicolon).map(|_| ())
            }
            _ => self.expect(TokenKind::Semicolon).map(|_| ()),
        }
    }

    /// A member name as an identifier. Explicit interface implementations
    /// keep their interface prefix.
    fn member_ident(name: &NamedType) -> Ident {
        match name.segments.as_slice() {
            [single] if name.alias.is_none() => single.name.clone(),
            segments => {
                let mut qualified = name.clone();
                if let Some(last) = qualified.segments.last_mut() {
                    last.type_args.clear();
                }
                let last_span = segments.last().map(|s| s.name.span).unwrap_or(name.span);
                Ident::new(qualified.to_string(), name.span.merge(last_span))
            }
        }
    }

    fn parse_method(
        &mut self,
        attributes: Vec<AttributeList>,
        modifiers: Modifiers,
        return_type: TypeSyntax,
        name: NamedType,
        start: Span,
    ) -> Result<MemberDecl, ParseError> {
        let type_params = name
            .last()
            .map(|segment| {
                segment
                    .type_args
                    .iter()
                    .filter_map(|arg| arg.as_named().and_then(|n| n.last()))
                    .map(|s| s.name.clone())
                    .collect()
            })
            .unwrap_or_default();

        self.skip_balanced();
        self.skip_until(&[TokenKind::LeftBrace, TokenKind::Semicolon, TokenKind::Arrow]);
        self.skip_body()?;

        Ok(MemberDecl::Method(MethodDecl {
            attributes,
            modifiers,
            return_type,
            name: Self::member_ident(&name),
            type_params,
            span: self.span_from(start),
        }))
    }

    fn parse_property(
        &mut self,
        attributes: Vec<AttributeList>,
        modifiers: Modifiers,
        ty: TypeSyntax,
        name: NamedType,
        start: Span,
    ) -> Result<MemberDecl, ParseError> {
        let mut initializer = None;
        let body = if self.check(TokenKind::Arrow) {
            let arrow = self.advance().span;
            self.skip_until(&[TokenKind::Semicolon]);
            let span = self.span_from(arrow);
            self.expect(TokenKind::Semicolon)?;
            PropertyBody::Arrow { span }
        } else {
            let accessors = self.parse_accessor_list()?;
            if self.eat(TokenKind::Equal).is_some() {
                initializer = Some(self.parse_expression(&[TokenKind::Semicolon]));
                self.expect(TokenKind::Semicolon)?;
            }
            PropertyBody::Accessors(accessors)
        };

        Ok(MemberDecl::Property(PropertyDecl {
            attributes,
            modifiers,
            ty,
            name: Self::member_ident(&name),
            body,
            initializer,
            span: self.span_from(start),
        }))
    }

    /// Parse `{ get; private set; }`, `{ get => x; }`, `{ get { ... } }`.
    fn parse_accessor_list(&mut self) -> Result<Vec<AccessorDecl>, ParseError> {
        self.expect(TokenKind::LeftBrace)?;
        let mut accessors = Vec::new();

        while self.eat(TokenKind::RightBrace).is_none() {
            let start = self.peek().span;
            self.parse_attribute_lists()?;
            let modifiers = self.parse_modifiers();

            let keyword = self.parse_ident()?;
            let kind = AccessorKind::from_keyword(&keyword.name).ok_or_else(|| {
                ParseError::expected_token(keyword.span, "accessor", &format!("'{}'", keyword.name))
            })?;

            let body = match self.peek().kind {
                TokenKind::LeftBrace => {
                    let open = self.peek().span;
                    self.skip_balanced();
                    AccessorBody::Block(self.span_from(open))
                }
                TokenKind::Arrow => {
                    let arrow = self.advance().span;
                    self.skip_until(&[TokenKind::Semicolon]);
                    let span = self.span_from(arrow);
                    self.expect(TokenKind::Semicolon)?;
                    AccessorBody::Arrow(span)
                }
                _ => {
                    self.expect(TokenKind::Semicolon)?;
                    AccessorBody::None
                }
            };

            accessors.push(AccessorDecl {
                kind,
                modifiers,
                body,
                span: self.span_from(start),
            });
        }

        Ok(accessors)
    }

    fn parse_field(
        &mut self,
        attributes: Vec<AttributeList>,
        modifiers: Modifiers,
        ty: TypeSyntax,
        name: NamedType,
        start: Span,
    ) -> Result<MemberDecl, ParseError> {
        let mut declarators = Vec::new();
        let mut name = Self::member_ident(&name);

        loop {
            let initializer: Option<Expr> = if self.eat(TokenKind::Equal).is_some() {
                Some(self.parse_expression(&[TokenKind::Comma, TokenKind::Semicolon]))
            } else {
                None
            };
            let span = self.span_from(name.span);
            declarators.push(VariableDeclarator {
                name,
                initializer,
                span,
            });

            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
            name = self.parse_ident()?;
        }
        self.expect(TokenKind::Semicolon)?;

        Ok(MemberDecl::Field(FieldDecl {
            attributes,
            modifiers,
            ty,
            declarators,
            span: self.span_from(start),
        }))
    }

    /// Parse a field-like event or an event with `add`/`remove` accessors.
    fn parse_event(
        &mut self,
        attributes: Vec<AttributeList>,
        modifiers: Modifiers,
        start: Span,
    ) -> Result<MemberDecl, ParseError> {
        self.expect(TokenKind::Event)?;
        let ty = self.parse_type()?;
        let mut names = vec![Self::member_ident(&self.parse_named_type(false)?)];

        if self.check(TokenKind::LeftBrace) {
            self.skip_balanced();
        } else {
            loop {
                if self.eat(TokenKind::Equal).is_some() {
                    self.parse_expression(&[TokenKind::Comma, TokenKind::Semicolon]);
                }
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
                names.push(self.parse_ident()?);
            }
            self.expect(TokenKind::Semicolon)?;
        }

        Ok(MemberDecl::Event(EventDecl {
            attributes,
            modifiers,
            ty,
            names,
            span: self.span_from(start),
        }))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::decl::*;
    use crate::ast::expr::{Expr, LiteralKind};
    use crate::ast::parser::Parser;
    use crate::ast::SourceFile;
    use derived_props_core::{GetterForm, Modifiers, ParseErrorKind, SourceId, TypeKind};

    fn parse_ok(source: &str) -> SourceFile {
        let mut parser = Parser::new(source, SourceId::new(0));
        let file = parser.parse_source_file();
        assert!(!parser.has_errors(), "errors: {}", parser.take_errors());
        file
    }

    fn only_type(file: &SourceFile) -> &TypeDecl {
        let types = file.type_declarations();
        assert_eq!(types.len(), 1);
        types[0]
    }

    #[test]
    fn usings_and_file_scoped_namespace() {
        let file = parse_ok(
            "global using System; using static System.Math; using Json = System.Text.Json;\n\
             namespace App.Models;\nclass A { }",
        );
        assert_eq!(file.usings.len(), 3);
        assert!(file.usings[0].is_global);
        assert_eq!(file.usings[1].kind, UsingKind::Static);
        assert!(matches!(&file.usings[2].kind, UsingKind::Alias(a) if a.name == "Json"));

        let NamespaceMember::Namespace(ns) = &file.members[0] else {
            panic!("expected namespace");
        };
        assert!(ns.file_scoped);
        assert_eq!(ns.qualified_name(), "App.Models");
        assert_eq!(ns.members.len(), 1);
    }

    #[test]
    fn nested_block_namespaces() {
        let file = parse_ok("namespace A { namespace B.C { class X { } } }");
        let NamespaceMember::Namespace(outer) = &file.members[0] else {
            panic!("expected namespace");
        };
        let NamespaceMember::Namespace(inner) = &outer.members[0] else {
            panic!("expected nested namespace");
        };
        assert_eq!(inner.qualified_name(), "B.C");
    }

    #[test]
    fn attributes_and_modifiers() {
        let file = parse_ok(
            r#"[assembly: Version("1.0")]
               [Marker("FullName"), Other]
               [Marker(nameof(Age))]
               public sealed partial class Person { }"#,
        );
        assert_eq!(file.attributes.len(), 1);
        let decl = only_type(&file);
        assert_eq!(decl.attributes.len(), 2);
        assert_eq!(decl.all_attributes().count(), 3);
        assert!(decl.modifiers.contains(Modifiers::PUBLIC | Modifiers::SEALED | Modifiers::PARTIAL));

        let first = decl.all_attributes().next().unwrap();
        assert_eq!(first.name.to_string(), "Marker");
        let arg = first.constructor_arguments().next().unwrap();
        assert!(matches!(&arg.value, Expr::Literal(l) if l.kind == LiteralKind::String("FullName".into())));
    }

    #[test]
    fn named_attribute_arguments() {
        let file = parse_ok(r#"[A("x", name: "n", Flag = true)] class C { }"#);
        let attr = only_type(&file).all_attributes().next().unwrap();
        let named: Vec<&str> = attr.named().map(|(n, _)| n.name.as_str()).collect();
        assert_eq!(named, vec!["Flag"]);

        let constructor: Vec<&AttributeArgKind> = attr.constructor_arguments().map(|a| &a.kind).collect();
        assert_eq!(constructor.len(), 2);
        assert_eq!(constructor[0], &AttributeArgKind::Positional);
        assert!(matches!(constructor[1], AttributeArgKind::Parameter(name) if name.name == "name"));
    }

    #[test]
    fn type_kinds_and_headers() {
        let file = parse_ok(
            "record Point(int X, int Y); record struct P2(int X); \
             struct S<T> : IEquatable<S<T>> where T : new() { } \
             interface I { } enum E { A = 1, B } class G<in T, U> : Base<T> { }",
        );
        let kinds: Vec<TypeKind> = file.type_declarations().iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TypeKind::Record,
                TypeKind::RecordStruct,
                TypeKind::Struct,
                TypeKind::Interface,
                TypeKind::Enum,
                TypeKind::Class
            ]
        );
        let generic = file.type_declarations()[5];
        assert_eq!(generic.type_params.len(), 2);
    }

    #[test]
    fn arrow_property_getter_span() {
        let source = "class R { public string FullName => First + \" \" + Last; }";
        let file = parse_ok(source);
        let MemberDecl::Property(prop) = &only_type(&file).members[0] else {
            panic!("expected property");
        };
        let (form, span) = prop.getter().unwrap();
        assert_eq!(form, GetterForm::Arrow);
        assert_eq!(span.slice(source), Some("=> First + \" \" + Last"));
    }

    #[test]
    fn accessor_getter_span() {
        let source = "class R { public int Count { [A] private get { return items.Count; } set; } }";
        let file = parse_ok(source);
        let MemberDecl::Property(prop) = &only_type(&file).members[0] else {
            panic!("expected property");
        };
        let (form, span) = prop.getter().unwrap();
        assert_eq!(form, GetterForm::Accessor);
        assert_eq!(span.slice(source), Some("[A] private get { return items.Count; }"));
        assert!(prop.has_setter());
    }

    #[test]
    fn auto_getter_is_not_an_implementation() {
        let file = parse_ok("partial class R { public partial string Name { get; } }");
        let MemberDecl::Property(prop) = &only_type(&file).members[0] else {
            panic!("expected property");
        };
        assert_eq!(prop.getter(), None);
        assert!(!prop.has_setter());
    }

    #[test]
    fn auto_property_with_initializer() {
        let file = parse_ok("class R { public List<int> Items { get; init; } = new(); }");
        let MemberDecl::Property(prop) = &only_type(&file).members[0] else {
            panic!("expected property");
        };
        assert!(matches!(prop.initializer, Some(Expr::Unsupported { .. })));
        assert_eq!(prop.ty.to_string(), "List<int>");
    }

    #[test]
    fn fields_and_constants() {
        let file = parse_ok(r#"class K { public const string A = "a", B = A + "b"; private int[] x; }"#);
        let decl = only_type(&file);
        let MemberDecl::Field(consts) = &decl.members[0] else {
            panic!("expected field");
        };
        assert!(consts.modifiers.is_const());
        assert_eq!(consts.declarators.len(), 2);
        assert_eq!(consts.declarators[1].name.name, "B");
        assert!(matches!(consts.declarators[1].initializer, Some(Expr::Binary { .. })));
    }

    #[test]
    fn other_members_are_skipped() {
        let source = r#"
            class M {
                public M(int a) : this() { }
                ~M() { }
                public int this[int i] => i;
                public static M operator +(M a, M b) => a;
                public static implicit operator int(M m) { return 0; }
                public void Run<T>(T value) where T : class { Console.WriteLine("}"); }
                public event EventHandler Changed, Updated;
                public event EventHandler Custom { add { } remove { } }
                int IShape.Area => 0;
                public delegate void Handler(int x);
                partial void OnChanged();
            }"#;
        let file = parse_ok(source);
        let decl = only_type(&file);
        let summary: Vec<&str> = decl
            .members
            .iter()
            .map(|m| match m {
                MemberDecl::Other { .. } => "other",
                MemberDecl::Method(_) => "method",
                MemberDecl::Event(_) => "event",
                MemberDecl::Property(_) => "property",
                MemberDecl::Field(_) => "field",
                MemberDecl::Type(_) => "type",
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                "other", "other", "other", "other", "other", "method", "event", "event", "property",
                "other", "method"
            ]
        );
        let MemberDecl::Property(explicit) = &decl.members[8] else {
            panic!("expected property");
        };
        assert_eq!(explicit.name.name, "IShape.Area");
    }

    #[test]
    fn nested_types_are_members() {
        let file = parse_ok("class Outer { public partial class Inner { } private enum Mode { A } }");
        let outer = file.type_declarations()[0];
        assert_eq!(outer.nested_types().count(), 2);
        assert_eq!(file.type_declarations().len(), 3);
    }

    #[test]
    fn recovers_from_bad_member() {
        let mut parser = Parser::new(
            "class A { int = 5; public string Name => \"n\"; } class B { }",
            SourceId::new(0),
        );
        let file = parser.parse_source_file();
        let errors = parser.take_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(file.type_declarations().len(), 2);
        assert_eq!(file.type_declarations()[0].members.len(), 1);
    }

    #[test]
    fn missing_closing_brace_is_reported() {
        let mut parser = Parser::new("class A { int x;", SourceId::new(0));
        let file = parser.parse_source_file();
        assert_eq!(file.type_declarations().len(), 1);
        let errors = parser.take_errors();
        assert_eq!(errors.errors()[0].kind, ParseErrorKind::UnexpectedEof);
    }

    #[test]
    fn stray_top_level_token() {
        let mut parser = Parser::new("int x; class A { }", SourceId::new(0));
        let file = parser.parse_source_file();
        assert_eq!(
            parser.take_errors().errors()[0].kind,
            ParseErrorKind::ExpectedDeclaration
        );
        assert_eq!(file.type_declarations().len(), 1);
    }
}
