//! Main lexer implementation.
//!
//! The [`Lexer`] converts source text into a stream of [`Token`]s. It
//! dispatches on the first character of each token. Comments, whitespace
//! and preprocessor lines are trivia and never reach the parser.
//!
//! Malformed input is reported as a [`LexError`] and skipped, so the token
//! stream is always usable for recovery.

use derived_props_core::{LexError, Span};

use super::cursor::{Cursor, is_ident_continue, is_ident_start};
use super::token::{Token, TokenKind, lookup_keyword};

/// Lexer for declaration source text.
pub struct Lexer<'src> {
    /// Low-level character cursor.
    cursor: Cursor<'src>,
    /// Accumulated errors.
    errors: Vec<LexError>,
}

/// Start position of the token being scanned.
#[derive(Clone, Copy)]
struct Start {
    offset: u32,
    line: u32,
    col: u32,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            errors: Vec::new(),
        }
    }

    /// Tokenize the whole source.
    ///
    /// The returned token list always ends with an [`TokenKind::Eof`] token.
    pub fn tokenize(source: &'src str) -> (Vec<Token<'src>>, Vec<LexError>) {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if eof {
                break;
            }
        }
        (tokens, lexer.errors)
    }

    /// Take accumulated errors, leaving an empty vec.
    pub fn take_errors(&mut self) -> Vec<LexError> {
        std::mem::take(&mut self.errors)
    }

    /// Check if any errors occurred.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Consume and return the next token.
    pub fn next_token(&mut self) -> Token<'src> {
        loop {
            self.skip_trivia();

            if self.cursor.is_eof() {
                return self.make_eof();
            }

            if let Some(token) = self.scan_token() {
                return token;
            }
        }
    }

    // =========================================
    // Internal: Token scanning
    // =========================================

    /// Scan one token. Returns `None` when the input was trivia or invalid.
    fn scan_token(&mut self) -> Option<Token<'src>> {
        let start = self.start();
        let c = self.cursor.peek()?;

        match c {
            '"' => self.scan_string(start, StringPrefix::default()),
            '\'' => self.scan_char(start),
            '@' | '$' => self.scan_prefixed(start),
            c if c.is_ascii_digit() => Some(self.scan_number(start)),
            '.' if self.cursor.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => {
                Some(self.scan_number(start))
            }
            c if is_ident_start(c) => Some(self.scan_identifier(start)),
            _ => self.scan_operator(start),
        }
    }

    fn start(&self) -> Start {
        Start {
            offset: self.cursor.offset(),
            line: self.cursor.line(),
            col: self.cursor.column(),
        }
    }

    fn span_from(&self, start: Start) -> Span {
        Span::new(
            start.offset,
            start.line,
            start.col,
            self.cursor.offset() - start.offset,
        )
    }

    fn make_token(&self, kind: TokenKind, start: Start) -> Token<'src> {
        Token::new(kind, self.cursor.slice_from(start.offset), self.span_from(start))
    }

    fn make_eof(&self) -> Token<'src> {
        let span = Span::point(self.cursor.offset(), self.cursor.line(), self.cursor.column());
        Token::new(TokenKind::Eof, "", span)
    }

    fn error(&mut self, error: LexError) -> Option<Token<'src>> {
        self.errors.push(error);
        None
    }

    // =========================================
    // Scanning: Trivia
    // =========================================

    /// Skip whitespace, comments, the BOM and preprocessor lines.
    fn skip_trivia(&mut self) {
        loop {
            self.cursor.eat('\u{FEFF}');
            self.cursor.eat_while(char::is_whitespace);

            if self.cursor.check_str("//") {
                self.skip_line();
            } else if self.cursor.check_str("/*") {
                let start = self.start();
                self.cursor.advance_n(2);
                if !self.skip_block_comment() {
                    let span = self.span_from(start);
                    self.errors.push(LexError::UnterminatedComment { span });
                }
            } else if self.cursor.peek() == Some('#') && self.at_line_start() {
                self.skip_line();
            } else {
                return;
            }
        }
    }

    fn skip_line(&mut self) {
        self.cursor.eat_while(|c| c != '\n');
    }

    /// Returns `false` if the comment runs to end of input.
    fn skip_block_comment(&mut self) -> bool {
        while !self.cursor.is_eof() {
            if self.cursor.eat_str("*/") {
                return true;
            }
            self.cursor.advance();
        }
        false
    }

    /// Whether only whitespace precedes the cursor on the current line.
    fn at_line_start(&self) -> bool {
        let before = &self.cursor.source()[..self.cursor.offset() as usize];
        let line = before.rsplit('\n').next().unwrap_or("");
        line.chars().all(char::is_whitespace)
    }

    // =========================================
    // Scanning: Strings
    // =========================================

    /// Scan a token starting with `@` or `$`: verbatim identifiers,
    /// verbatim strings and interpolated strings.
    fn scan_prefixed(&mut self, start: Start) -> Option<Token<'src>> {
        let mut prefix = StringPrefix::default();
        loop {
            match self.cursor.peek() {
                Some('@') if !prefix.verbatim => {
                    if self.cursor.peek_nth(1).is_some_and(is_ident_start) && prefix.dollars == 0 {
                        self.cursor.advance();
                        self.cursor.eat_while(is_ident_continue);
                        return Some(self.make_token(TokenKind::Identifier, start));
                    }
                    prefix.verbatim = true;
                    self.cursor.advance();
                }
                Some('$') => {
                    prefix.dollars += 1;
                    self.cursor.advance();
                }
                Some('"') => return self.scan_string(start, prefix),
                _ => {
                    let ch = self.cursor.source()[start.offset as usize..]
                        .chars()
                        .next()
                        .unwrap_or('@');
                    let span = self.span_from(start);
                    return self.error(LexError::UnexpectedChar { ch, span });
                }
            }
        }
    }

    /// Scan a string literal; the cursor is on the opening quote.
    fn scan_string(&mut self, start: Start, prefix: StringPrefix) -> Option<Token<'src>> {
        if self.cursor.check_str("\"\"\"") {
            return self.scan_raw_string(start);
        }
        self.cursor.advance();

        let terminated = if prefix.verbatim {
            self.skip_verbatim_body(prefix.dollars > 0)
        } else {
            self.skip_regular_body(prefix.dollars > 0)
        };
        if !terminated {
            let span = self.span_from(start);
            return self.error(LexError::UnterminatedString { span });
        }
        self.eat_utf8_suffix();

        let kind = match (prefix.dollars > 0, prefix.verbatim) {
            (true, _) => TokenKind::InterpolatedStringLiteral,
            (false, true) => TokenKind::VerbatimStringLiteral,
            (false, false) => TokenKind::StringLiteral,
        };
        Some(self.make_token(kind, start))
    }

    /// Body of `"..."` after the opening quote, through the closing quote.
    fn skip_regular_body(&mut self, interpolated: bool) -> bool {
        loop {
            match self.cursor.peek() {
                None | Some('\n') => return false,
                Some('\\') => {
                    self.cursor.advance();
                    if self.cursor.peek().is_some_and(|c| c != '\n') {
                        self.cursor.advance();
                    }
                }
                Some('"') => {
                    self.cursor.advance();
                    return true;
                }
                Some('{') if interpolated => {
                    self.cursor.advance();
                    if !self.cursor.eat('{') && !self.skip_hole() {
                        return false;
                    }
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    /// Body of `@"..."` after the opening quote; `""` is an escaped quote.
    fn skip_verbatim_body(&mut self, interpolated: bool) -> bool {
        loop {
            match self.cursor.peek() {
                None => return false,
                Some('"') => {
                    self.cursor.advance();
                    if !self.cursor.eat('"') {
                        return true;
                    }
                }
                Some('{') if interpolated => {
                    self.cursor.advance();
                    if !self.cursor.eat('{') && !self.skip_hole() {
                        return false;
                    }
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    /// Skip an interpolation hole after its opening `{`, through the
    /// matching `}`. Nested literals are skipped whole.
    fn skip_hole(&mut self) -> bool {
        let mut depth = 1usize;
        loop {
            let start = self.start();
            match self.cursor.peek() {
                None => return false,
                Some('{') => {
                    depth += 1;
                    self.cursor.advance();
                }
                Some('}') => {
                    self.cursor.advance();
                    depth -= 1;
                    if depth == 0 {
                        return true;
                    }
                }
                Some('"' | '@' | '$') => {
                    let before = self.errors.len();
                    let nested = if self.cursor.peek() == Some('"') {
                        self.scan_string(start, StringPrefix::default())
                    } else {
                        self.scan_prefixed(start)
                    };
                    if nested.is_none() && self.errors.len() > before {
                        self.errors.truncate(before);
                        return false;
                    }
                }
                Some('\'') => {
                    self.scan_char(start);
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    /// Scan `"""..."""` with any number (at least three) of quotes.
    fn scan_raw_string(&mut self, start: Start) -> Option<Token<'src>> {
        let quotes = self.cursor.eat_while(|c| c == '"').len();
        let closing = "\"".repeat(quotes);
        loop {
            if self.cursor.is_eof() {
                let span = self.span_from(start);
                return self.error(LexError::UnterminatedString { span });
            }
            if self.cursor.eat_str(&closing) {
                self.eat_utf8_suffix();
                return Some(self.make_token(TokenKind::RawStringLiteral, start));
            }
            self.cursor.advance();
        }
    }

    fn eat_utf8_suffix(&mut self) {
        if (self.cursor.check_str("u8") || self.cursor.check_str("U8"))
            && !self.cursor.peek_nth(2).is_some_and(is_ident_continue)
        {
            self.cursor.advance_n(2);
        }
    }

    /// Scan a character literal `'a'`, `'\n'`, `'A'`.
    fn scan_char(&mut self, start: Start) -> Option<Token<'src>> {
        self.cursor.advance();
        loop {
            match self.cursor.peek() {
                None | Some('\n') => {
                    let span = self.span_from(start);
                    return self.error(LexError::UnterminatedChar { span });
                }
                Some('\\') => {
                    self.cursor.advance();
                    if self.cursor.peek().is_some_and(|c| c != '\n') {
                        self.cursor.advance();
                    }
                }
                Some('\'') => {
                    self.cursor.advance();
                    return Some(self.make_token(TokenKind::CharLiteral, start));
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    // =========================================
    // Scanning: Numbers
    // =========================================

    fn scan_number(&mut self, start: Start) -> Token<'src> {
        if self.cursor.peek() == Some('0')
            && matches!(self.cursor.peek_nth(1), Some('x' | 'X' | 'b' | 'B'))
        {
            self.cursor.advance_n(2);
            self.cursor.eat_while(|c| c.is_ascii_hexdigit() || c == '_');
            self.eat_int_suffix();
            return self.make_token(TokenKind::IntLiteral, start);
        }

        let mut real = false;
        self.eat_digits();

        if self.cursor.peek() == Some('.') && self.cursor.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
            real = true;
            self.cursor.advance();
            self.eat_digits();
        }

        if matches!(self.cursor.peek(), Some('e' | 'E')) {
            let sign = matches!(self.cursor.peek_nth(1), Some('+' | '-'));
            let digit_at = if sign { 2 } else { 1 };
            if self.cursor.peek_nth(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                real = true;
                self.cursor.advance_n(digit_at);
                self.eat_digits();
            }
        }

        if matches!(self.cursor.peek(), Some('f' | 'F' | 'd' | 'D' | 'm' | 'M')) {
            real = true;
            self.cursor.advance();
        } else if !real {
            self.eat_int_suffix();
        }

        let kind = if real {
            TokenKind::RealLiteral
        } else {
            TokenKind::IntLiteral
        };
        self.make_token(kind, start)
    }

    fn eat_digits(&mut self) {
        self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_');
    }

    fn eat_int_suffix(&mut self) {
        self.cursor.eat_while(|c| matches!(c, 'u' | 'U' | 'l' | 'L'));
    }

    // =========================================
    // Scanning: Identifiers and operators
    // =========================================

    fn scan_identifier(&mut self, start: Start) -> Token<'src> {
        self.cursor.eat_while(is_ident_continue);
        let text = self.cursor.slice_from(start.offset);
        let kind = lookup_keyword(text).unwrap_or(TokenKind::Identifier);
        self.make_token(kind, start)
    }

    /// Scan punctuation. `>` is always a single token so that nested
    /// generic argument lists close one level at a time.
    fn scan_operator(&mut self, start: Start) -> Option<Token<'src>> {
        use TokenKind::*;

        let c = self.cursor.advance()?;
        let kind = match c {
            '(' => LeftParen,
            ')' => RightParen,
            '[' => LeftBracket,
            ']' => RightBracket,
            '{' => LeftBrace,
            '}' => RightBrace,
            ';' => Semicolon,
            ',' => Comma,
            '.' => Dot,
            '~' => Tilde,
            '>' => Greater,
            ':' => {
                if self.cursor.eat(':') {
                    ColonColon
                } else {
                    Colon
                }
            }
            '?' => {
                if self.cursor.eat('?') {
                    self.cursor.eat('=');
                    Punct
                } else {
                    Question
                }
            }
            '=' => {
                if self.cursor.eat('>') {
                    Arrow
                } else if self.cursor.eat('=') {
                    Punct
                } else {
                    Equal
                }
            }
            '<' => {
                if self.cursor.eat('=') {
                    Punct
                } else if self.cursor.check_str("<") {
                    self.cursor.advance();
                    self.cursor.eat('=');
                    Punct
                } else {
                    Less
                }
            }
            '+' => {
                if self.cursor.eat('+') || self.cursor.eat('=') {
                    Punct
                } else {
                    Plus
                }
            }
            '-' => {
                if self.cursor.eat('-') || self.cursor.eat('=') || self.cursor.eat('>') {
                    Punct
                } else {
                    Minus
                }
            }
            '*' => {
                if self.cursor.eat('=') {
                    Punct
                } else {
                    Star
                }
            }
            '!' | '%' | '^' | '/' => {
                self.cursor.eat('=');
                Punct
            }
            '&' | '|' => {
                if !self.cursor.eat(c) {
                    self.cursor.eat('=');
                }
                Punct
            }
            ch => {
                let span = self.span_from(start);
                return self.error(LexError::UnexpectedChar { ch, span });
            }
        };
        Some(self.make_token(kind, start))
    }
}

/// Prefix characters seen before a string's opening quote.
#[derive(Debug, Clone, Copy, Default)]
struct StringPrefix {
    verbatim: bool,
    dollars: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let (tokens, errors) = Lexer::tokenize(source);
        assert!(errors.is_empty(), "unexpected lex errors: {errors:?}");
        tokens.into_iter().map(|t| t.kind).collect()
    }

    fn lexemes(source: &str) -> Vec<&str> {
        let (tokens, _) = Lexer::tokenize(source);
        tokens
            .into_iter()
            .filter(|t| t.kind != TokenKind::Eof)
            .map(|t| t.lexeme)
            .collect()
    }

    #[test]
    fn declaration_tokens() {
        use TokenKind::*;
        assert_eq!(
            kinds("public partial class Person { }"),
            vec![Modifier, Identifier, Class, Identifier, LeftBrace, RightBrace, Eof]
        );
    }

    #[test]
    fn arrow_and_greater() {
        use TokenKind::*;
        assert_eq!(
            kinds("List<List<int>> X => y;"),
            vec![
                Identifier, Less, Identifier, Less, PredefinedType, Greater, Greater, Identifier,
                Arrow, Identifier, Semicolon, Eof
            ]
        );
    }

    #[test]
    fn global_alias() {
        use TokenKind::*;
        assert_eq!(
            kinds("global::System.String"),
            vec![Identifier, ColonColon, Identifier, Dot, Identifier, Eof]
        );
    }

    #[test]
    fn string_literals() {
        assert_eq!(
            lexemes(r#""a\"b" @"c""d" $"{x} and {{y}}" "u"u8"#),
            vec![r#""a\"b""#, r#"@"c""d""#, r#"$"{x} and {{y}}""#, r#""u"u8"#]
        );
        let (tokens, _) = Lexer::tokenize(r#"$@"{"in"}" """raw "quote" text""""#);
        assert_eq!(tokens[0].kind, TokenKind::InterpolatedStringLiteral);
        assert_eq!(tokens[1].kind, TokenKind::RawStringLiteral);
        assert_eq!(tokens[1].lexeme, r#""""raw "quote" text""""#);
    }

    #[test]
    fn interpolation_hole_with_nested_braces() {
        let (tokens, errors) = Lexer::tokenize(r#"$"{new { A = "}" }.A}" ;"#);
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::InterpolatedStringLiteral);
        assert_eq!(tokens[1].kind, TokenKind::Semicolon);
    }

    #[test]
    fn numbers() {
        use TokenKind::*;
        assert_eq!(
            kinds("42 0xFF 10UL 3.14 1e3 2.5m 1_000"),
            vec![IntLiteral, IntLiteral, IntLiteral, RealLiteral, RealLiteral, RealLiteral, IntLiteral, Eof]
        );
    }

    #[test]
    fn trivia_is_skipped() {
        let source = "#nullable enable\n// line\n/* block\n */ class /** doc */ A";
        assert_eq!(lexemes(source), vec!["class", "A"]);
    }

    #[test]
    fn verbatim_identifier() {
        let (tokens, _) = Lexer::tokenize("@class");
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].ident_name(), "class");
    }

    #[test]
    fn spans_track_lines() {
        let (tokens, _) = Lexer::tokenize("class A\n{\n  int X;\n}");
        let int = tokens.iter().find(|t| t.lexeme == "int").unwrap();
        assert_eq!((int.span.line, int.span.col), (3, 3));
        assert_eq!(int.span.offset, 12);
        assert_eq!(int.span.len, 3);
    }

    #[test]
    fn unterminated_string_is_reported() {
        let (tokens, errors) = Lexer::tokenize("\"abc\nclass");
        assert!(matches!(errors[0], LexError::UnterminatedString { .. }));
        assert_eq!(tokens[0].kind, TokenKind::Class);
    }

    #[test]
    fn unterminated_comment_is_reported() {
        let (_, errors) = Lexer::tokenize("class /* never closed");
        assert!(matches!(errors[0], LexError::UnterminatedComment { .. }));
    }

    #[test]
    fn unexpected_char_is_reported() {
        let (tokens, errors) = Lexer::tokenize("a ` b");
        assert!(matches!(errors[0], LexError::UnexpectedChar { ch: '`', .. }));
        assert_eq!(tokens.len(), 3);
    }
}
