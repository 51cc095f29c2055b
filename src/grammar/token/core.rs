//! Token definitions shared by every dialect
//!
//!     A token is a slice of the input tagged with a [TokenKind] and the locations of its first
//!     character and of the character just past it. Tokens borrow from the buffer handed to the
//!     lexer, so they are cheap to copy around and never outlive the source.
//!
//!     The kind set is closed and shared by all rule sets. The scripting-language kinds
//!     (Identifier .. Preprocessor) are produced by the ECMAScript and C dialects, while the
//!     grammar kinds (Define .. TypeTag) are what the BNF dialect feeds the grammar parser.
//!     Eof and Error are produced by the lexer itself, never by a rule.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::grammar::location::{Location, Span};

/// The category of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Identifier,
    Keyword,
    Boolean,
    Null,
    Number,
    String,
    Char,
    Template,
    Regexp,
    Punctuator,
    Comment,
    Whitespace,
    Newline,
    Preprocessor,

    /// `::=` or `:`
    Define,
    Pipe,
    LeftParen,
    RightParen,
    Star,
    Plus,
    Question,
    Semicolon,
    /// A quoted terminal such as `'+'` or `"while"`
    Literal,
    /// A balanced `{ ... }` block attached to an alternative
    Action,
    /// `%token`, `%left`, `%prec`, ...
    Directive,
    /// A `%{ ... %}` prologue block
    Code,
    /// `%%`
    Mark,
    /// `<type>` in `%token <type> NAME`
    TypeTag,

    Eof,
    /// A code point no rule matched
    Error,
}

impl TokenKind {
    /// Whitespace and newlines
    pub fn is_whitespace(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Newline)
    }

    pub fn is_comment(self) -> bool {
        self == TokenKind::Comment
    }

    /// Tokens that carry no syntax: whitespace, newlines and comments
    pub fn is_trivia(self) -> bool {
        self.is_whitespace() || self.is_comment()
    }

    /// The upper-case name used in token dumps
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Keyword => "KEYWORD",
            TokenKind::Boolean => "BOOLEAN_LITERAL",
            TokenKind::Null => "NULL_LITERAL",
            TokenKind::Number => "NUMERIC_LITERAL",
            TokenKind::String => "STRING_LITERAL",
            TokenKind::Char => "CHAR_LITERAL",
            TokenKind::Template => "TEMPLATE_LITERAL",
            TokenKind::Regexp => "REGEXP_LITERAL",
            TokenKind::Punctuator => "PUNCTUATOR",
            TokenKind::Comment => "COMMENT",
            TokenKind::Whitespace => "WHITESPACE",
            TokenKind::Newline => "NEWLINE",
            TokenKind::Preprocessor => "PREPROCESSOR",
            TokenKind::Define => "DEFINE",
            TokenKind::Pipe => "PIPE",
            TokenKind::LeftParen => "LEFT_PAREN",
            TokenKind::RightParen => "RIGHT_PAREN",
            TokenKind::Star => "STAR",
            TokenKind::Plus => "PLUS",
            TokenKind::Question => "QUESTION",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Literal => "LITERAL",
            TokenKind::Action => "ACTION",
            TokenKind::Directive => "DIRECTIVE",
            TokenKind::Code => "CODE",
            TokenKind::Mark => "MARK",
            TokenKind::TypeTag => "TYPE_TAG",
            TokenKind::Eof => "EOF",
            TokenKind::Error => "ERROR",
        }
    }

    /// How the kind reads inside an error message ("expected ..., found ...")
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Keyword => "keyword",
            TokenKind::Boolean => "boolean literal",
            TokenKind::Null => "null literal",
            TokenKind::Number => "number",
            TokenKind::String => "string literal",
            TokenKind::Char => "character literal",
            TokenKind::Template => "template literal",
            TokenKind::Regexp => "regular expression",
            TokenKind::Punctuator => "punctuator",
            TokenKind::Comment => "comment",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Newline => "newline",
            TokenKind::Preprocessor => "preprocessor line",
            TokenKind::Define => "'::=' or ':'",
            TokenKind::Pipe => "'|'",
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::Star => "'*'",
            TokenKind::Plus => "'+'",
            TokenKind::Question => "'?'",
            TokenKind::Semicolon => "';'",
            TokenKind::Literal => "quoted literal",
            TokenKind::Action => "action block",
            TokenKind::Directive => "directive",
            TokenKind::Code => "code block",
            TokenKind::Mark => "'%%'",
            TokenKind::TypeTag => "type tag",
            TokenKind::Eof => "end of input",
            TokenKind::Error => "unexpected character",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A lexed slice of the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    /// Location of the first character
    pub start: Location,
    /// Location just past the last character
    pub end: Location,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, text: &'src str, start: Location, end: Location) -> Self {
        Self {
            kind,
            text,
            start,
            end,
        }
    }

    /// The end-of-input token sitting at `at`
    pub fn eof(at: Location) -> Self {
        Self::new(TokenKind::Eof, "", at, at)
    }

    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Length in code points
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_measures() {
        let start = Location::start();
        let token = Token::new(TokenKind::String, "'wö'", start, start.advance("'wö'"));
        assert_eq!(token.len(), 5);
        assert_eq!(token.char_count(), 4);
        assert_eq!(token.span().byte_range(), 0..5);
        assert_eq!(token.to_string(), "'wö'");
    }

    #[test]
    fn test_eof_token_is_empty() {
        let at = Location::new(10, 2, 4);
        let token = Token::eof(at);
        assert!(token.is_eof());
        assert!(token.is_empty());
        assert_eq!(token.start, token.end);
    }

    #[test]
    fn test_trivia_kinds() {
        assert!(TokenKind::Whitespace.is_trivia());
        assert!(TokenKind::Newline.is_trivia());
        assert!(TokenKind::Comment.is_trivia());
        assert!(!TokenKind::Identifier.is_trivia());
        assert!(!TokenKind::Eof.is_trivia());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(TokenKind::Regexp.to_string(), "REGEXP_LITERAL");
        assert_eq!(TokenKind::Define.describe(), "'::=' or ':'");
    }
}
