//! Parser infrastructure.
//!
//! Provides the main [`Parser`] struct with token navigation, error
//! recovery and balanced skipping of bodies the AST does not model.

use derived_props_core::{DeclId, ParseError, ParseErrorKind, ParseErrors, SourceId, Span};

use crate::ast::SourceFile;
use crate::lexer::{Lexer, Token, TokenKind};

/// The main parser for declaration sources.
///
/// The whole source is tokenized up front, so lookahead is a buffer index.
pub struct Parser<'src> {
    /// Source text, for slicing spans.
    pub(super) source: &'src str,
    /// Identity of the tree being parsed.
    pub(super) source_id: SourceId,
    /// Buffered tokens for lookahead.
    pub(super) buffer: Vec<Token<'src>>,
    /// Current position in the buffer.
    pub(super) position: usize,
    /// Accumulated parse errors.
    pub(super) errors: ParseErrors,
    /// Whether we're in panic mode (skipping to a synchronization point).
    pub(super) panic_mode: bool,
    /// Next type declaration index.
    next_decl: u32,
}

impl<'src> Parser<'src> {
    /// Create a new parser for the given source code.
    ///
    /// Lexer errors are recorded as parse errors immediately.
    pub fn new(source: &'src str, source_id: SourceId) -> Self {
        let (buffer, lex_errors) = Lexer::tokenize(source);
        let errors = lex_errors.into_iter().map(ParseError::from).collect();

        Self {
            source,
            source_id,
            buffer,
            position: 0,
            errors,
            panic_mode: false,
            next_decl: 0,
        }
    }

    /// Parse a complete source tree, failing on any error.
    pub fn parse(source: &'src str, source_id: SourceId) -> Result<SourceFile, ParseErrors> {
        let (file, errors) = Self::parse_lenient(source, source_id);
        if errors.is_empty() {
            Ok(file)
        } else {
            Err(errors)
        }
    }

    /// Parse a source tree, returning whatever was recovered along with the
    /// errors.
    pub fn parse_lenient(source: &'src str, source_id: SourceId) -> (SourceFile, ParseErrors) {
        let mut parser = Parser::new(source, source_id);
        let file = parser.parse_source_file();
        (file, parser.take_errors())
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Take the errors, leaving an empty error collection.
    pub fn take_errors(&mut self) -> ParseErrors {
        std::mem::take(&mut self.errors)
    }

    /// Allocate the next declaration id in document order.
    pub(super) fn next_decl_id(&mut self) -> DeclId {
        let id = DeclId::new(self.source_id, self.next_decl);
        self.next_decl += 1;
        id
    }

    // ========================================================================
    // Token Navigation
    // ========================================================================

    /// Peek at the current token without consuming it.
    pub fn peek(&self) -> &Token<'src> {
        self.peek_nth(0)
    }

    /// Peek ahead n tokens without consuming. Past the end this returns
    /// the trailing EOF token.
    pub fn peek_nth(&self, n: usize) -> &Token<'src> {
        let last = self.buffer.len() - 1;
        &self.buffer[(self.position + n).min(last)]
    }

    /// Get the current token and advance to the next.
    pub fn advance(&mut self) -> Token<'src> {
        let token = *self.peek();
        if token.kind != TokenKind::Eof {
            self.position += 1;
        }
        token
    }

    /// The most recently consumed token.
    pub fn previous(&self) -> Option<&Token<'src>> {
        self.position.checked_sub(1).and_then(|i| self.buffer.get(i))
    }

    /// Check if the current token matches the given kind.
    pub fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Check if the current token is EOF.
    pub fn is_eof(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    /// If the current token matches the given kind, consume it and return Some.
    pub fn eat(&mut self, kind: TokenKind) -> Option<Token<'src>> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Expect the current token to be of the given kind.
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token<'src>, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let token = *self.peek();
            Err(self.unexpected(&token, kind.description()))
        }
    }

    /// Check if the current token is an identifier with the given name.
    /// This is used for contextual keywords.
    pub fn check_contextual(&self, name: &str) -> bool {
        let token = self.peek();
        token.kind == TokenKind::Identifier && token.lexeme == name
    }

    /// Consume an identifier if it matches the given contextual keyword.
    pub fn eat_contextual(&mut self, name: &str) -> Option<Token<'src>> {
        if self.check_contextual(name) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Span from `start` through the most recently consumed token.
    pub(super) fn span_from(&self, start: Span) -> Span {
        match self.previous() {
            Some(prev) if prev.span.offset >= start.offset => start.merge(prev.span),
            _ => start,
        }
    }

    /// Build the "expected X, found Y" error for a token.
    pub(super) fn unexpected(&self, token: &Token<'src>, expected: &str) -> ParseError {
        if token.kind == TokenKind::Eof {
            ParseError::new(
                ParseErrorKind::UnexpectedEof,
                token.span,
                format!("expected {expected}, found end of file"),
            )
        } else {
            ParseError::expected_token(token.span, expected, &format!("'{}'", token.lexeme))
        }
    }

    // ========================================================================
    // Error Handling
    // ========================================================================

    /// Record a parse error.
    ///
    /// While in panic mode further errors are suppressed until the parser
    /// resynchronizes.
    pub fn record(&mut self, error: ParseError) {
        if !self.panic_mode {
            self.errors.push(error);
        }
        self.panic_mode = true;
    }

    /// Synchronize after an error by skipping to the end of the current
    /// member or declaration.
    ///
    /// Stops after a top-level `;`, after a balanced `{ ... }` block, or
    /// before a declaration keyword or a closing `}` that belongs to the
    /// enclosing body.
    pub fn synchronize(&mut self) {
        self.panic_mode = false;
        let start_pos = self.position;

        while !self.is_eof() {
            match self.peek().kind {
                TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                TokenKind::RightBrace => return,
                TokenKind::LeftBrace => {
                    self.skip_balanced();
                    self.eat(TokenKind::Semicolon);
                    return;
                }
                TokenKind::LeftParen | TokenKind::LeftBracket => self.skip_balanced(),
                TokenKind::Class
                | TokenKind::Struct
                | TokenKind::Interface
                | TokenKind::Enum
                | TokenKind::Namespace
                    if self.position > start_pos =>
                {
                    return;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    // ========================================================================
    // Skipping
    // ========================================================================

    /// Skip a bracketed group starting at the current opener, through its
    /// matching closer. Parentheses, brackets and braces are counted together.
    pub(super) fn skip_balanced(&mut self) {
        let mut depth = 0usize;
        while !self.is_eof() {
            let token = self.advance();
            match token.kind {
                TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => depth += 1,
                TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return;
                    }
                }
                _ => {}
            }
            if depth == 0 {
                return;
            }
        }
        let span = self.peek().span;
        self.record(ParseError::new(
            ParseErrorKind::MismatchedDelimiter,
            span,
            "unclosed delimiter",
        ));
    }

    /// Skip tokens until one of `terminators` is current at nesting depth
    /// zero, or a closer that would leave the current group. Does not
    /// consume the stopping token.
    pub(super) fn skip_until(&mut self, terminators: &[TokenKind]) {
        while !self.is_eof() {
            let kind = self.peek().kind;
            if terminators.contains(&kind) {
                return;
            }
            match kind {
                TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => {
                    self.skip_balanced();
                }
                TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => return,
                _ => {
                    self.advance();
                }
            }
        }
    }
}
