//! Token types for the declaration lexer.
//!
//! Contextual keywords (`partial`, `record`, `get`, `nameof`, `global`, ...)
//! are lexed as identifiers; the parser checks their lexeme where the
//! grammar gives them meaning.

use derived_props_core::Span;
use std::fmt;

/// A token from the source code.
///
/// The lexeme borrows from the source text being parsed.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    /// The type of token.
    pub kind: TokenKind,
    /// The source text of this token.
    pub lexeme: &'src str,
    /// Location in source.
    pub span: Span,
}

impl<'src> Token<'src> {
    /// Create a new token.
    #[inline]
    pub fn new(kind: TokenKind, lexeme: &'src str, span: Span) -> Self {
        Self { kind, lexeme, span }
    }

    /// Identifier text with a leading `@` (verbatim identifier) removed.
    pub fn ident_name(&self) -> &'src str {
        self.lexeme.strip_prefix('@').unwrap_or(self.lexeme)
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?} @ {:?})", self.kind, self.lexeme, self.span)
    }
}

/// All token types produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // =========================================
    // Literals
    // =========================================
    /// Regular string: `"hello\n"`
    StringLiteral,
    /// Verbatim string: `@"C:\path"`
    VerbatimStringLiteral,
    /// Interpolated string: `$"{a} b"`, `$@"..."`
    InterpolatedStringLiteral,
    /// Raw string: `"""text"""`, optionally interpolated
    RawStringLiteral,
    /// Character literal: `'a'`
    CharLiteral,
    /// Integer literal: `42`, `0xFF`, `10UL`
    IntLiteral,
    /// Real literal: `3.14`, `1e3`, `2.5m`
    RealLiteral,

    // =========================================
    // Identifiers
    // =========================================
    /// Identifier or contextual keyword
    Identifier,

    // =========================================
    // Keywords
    // =========================================
    /// `namespace`
    Namespace,
    /// `using`
    Using,
    /// `class`
    Class,
    /// `struct`
    Struct,
    /// `interface`
    Interface,
    /// `enum`
    Enum,
    /// `delegate`
    Delegate,
    /// `event`
    Event,
    /// `operator`
    Operator,
    /// `implicit` / `explicit`
    ConversionKeyword,
    /// `this`
    This,
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,
    /// Modifier keyword: `public`, `static`, `const`, `readonly`, ...
    Modifier,
    /// Predefined type keyword: `int`, `string`, `object`, `void`, ...
    PredefinedType,
    /// Any other reserved keyword (`return`, `if`, `new` in expressions, ...)
    Keyword,

    // =========================================
    // Punctuation
    // =========================================
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `:`
    Colon,
    /// `::`
    ColonColon,
    /// `?`
    Question,
    /// `=>`
    Arrow,
    /// `=`
    Equal,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `~`
    Tilde,
    /// Any other operator character or sequence
    Punct,

    // =========================================
    // Special
    // =========================================
    /// End of file
    Eof,
}

impl TokenKind {
    /// Returns a human-readable description.
    pub fn description(self) -> &'static str {
        use TokenKind::*;
        match self {
            StringLiteral | VerbatimStringLiteral | InterpolatedStringLiteral | RawStringLiteral => {
                "string literal"
            }
            CharLiteral => "character literal",
            IntLiteral | RealLiteral => "number",
            Identifier => "identifier",
            Namespace => "'namespace'",
            Using => "'using'",
            Class => "'class'",
            Struct => "'struct'",
            Interface => "'interface'",
            Enum => "'enum'",
            Delegate => "'delegate'",
            Event => "'event'",
            Operator => "'operator'",
            ConversionKeyword => "conversion keyword",
            This => "'this'",
            True => "'true'",
            False => "'false'",
            Null => "'null'",
            Modifier => "modifier",
            PredefinedType => "type keyword",
            Keyword => "keyword",
            LeftParen => "'('",
            RightParen => "')'",
            LeftBracket => "'['",
            RightBracket => "']'",
            LeftBrace => "'{'",
            RightBrace => "'}'",
            Semicolon => "';'",
            Comma => "','",
            Dot => "'.'",
            Colon => "':'",
            ColonColon => "'::'",
            Question => "'?'",
            Arrow => "'=>'",
            Equal => "'='",
            Less => "'<'",
            Greater => "'>'",
            Plus => "'+'",
            Minus => "'-'",
            Star => "'*'",
            Tilde => "'~'",
            Punct => "operator",
            Eof => "end of file",
        }
    }

    /// Whether this token is any kind of string literal.
    pub fn is_string_literal(self) -> bool {
        matches!(
            self,
            TokenKind::StringLiteral
                | TokenKind::VerbatimStringLiteral
                | TokenKind::InterpolatedStringLiteral
                | TokenKind::RawStringLiteral
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Look up a reserved keyword.
///
/// Returns `None` for identifiers, including contextual keywords.
pub fn lookup_keyword(ident: &str) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match ident {
        "namespace" => Namespace,
        "using" => Using,
        "class" => Class,
        "struct" => Struct,
        "interface" => Interface,
        "enum" => Enum,
        "delegate" => Delegate,
        "event" => Event,
        "operator" => Operator,
        "implicit" | "explicit" => ConversionKeyword,
        "this" => This,
        "true" => True,
        "false" => False,
        "null" => Null,

        "public" | "private" | "protected" | "internal" | "static" | "sealed" | "abstract"
        | "readonly" | "const" | "virtual" | "override" | "new" | "extern" | "unsafe"
        | "volatile" | "ref" => Modifier,

        "bool" | "byte" | "sbyte" | "char" | "decimal" | "double" | "float" | "int" | "uint"
        | "long" | "ulong" | "short" | "ushort" | "object" | "string" | "void" => PredefinedType,

        "as" | "base" | "break" | "case" | "catch" | "checked" | "continue"
        | "default" | "do" | "else" | "finally" | "fixed" | "for" | "foreach" | "goto" | "if"
        | "in" | "is" | "lock" | "out" | "params" | "return" | "sizeof" | "stackalloc"
        | "switch" | "throw" | "try" | "typeof" | "unchecked" | "while" => Keyword,

        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords() {
        assert_eq!(lookup_keyword("class"), Some(TokenKind::Class));
        assert_eq!(lookup_keyword("public"), Some(TokenKind::Modifier));
        assert_eq!(lookup_keyword("string"), Some(TokenKind::PredefinedType));
        assert_eq!(lookup_keyword("typeof"), Some(TokenKind::Keyword));
    }

    #[test]
    fn contextual_keywords_are_identifiers() {
        for word in ["partial", "record", "get", "set", "init", "nameof", "global", "var"] {
            assert_eq!(lookup_keyword(word), None, "{word}");
        }
    }

    #[test]
    fn verbatim_identifier_name() {
        let token = Token::new(TokenKind::Identifier, "@class", Span::default());
        assert_eq!(token.ident_name(), "class");
    }
}
