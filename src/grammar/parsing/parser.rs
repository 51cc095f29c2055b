//! Token-level parser helpers
//!
//! [Parser] wraps a [Lexer] with the small vocabulary recursive-descent code is written in:
//! look at the current token, consume it, or insist on a kind and fail with a [SyntaxError].

use std::sync::Arc;

use crate::grammar::error::SyntaxError;
use crate::grammar::lexing::Lexer;
use crate::grammar::token::{Token, TokenKind};

pub struct Parser<'src> {
    lexer: Lexer<'src>,
}

impl<'src> Parser<'src> {
    pub fn new(lexer: Lexer<'src>) -> Self {
        Self { lexer }
    }

    pub fn set_input(&mut self, text: &'src str, source_name: &str) {
        self.lexer.set_input(text, source_name);
    }

    pub fn lexer(&self) -> &Lexer<'src> {
        &self.lexer
    }

    pub fn source_name(&self) -> &str {
        self.lexer.source_name()
    }

    pub fn source(&self) -> &'src str {
        self.lexer.source()
    }

    /// The token about to be consumed
    pub fn current(&mut self) -> Token<'src> {
        self.lexer.peek(0)
    }

    /// The k-th upcoming token; `lookahead(0)` is `current()`
    pub fn lookahead(&mut self, k: usize) -> Token<'src> {
        self.lexer.peek(k)
    }

    /// Consume and return the current token
    pub fn advance(&mut self) -> Token<'src> {
        self.lexer.next_token()
    }

    pub fn check(&mut self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    /// Consume the current token if it is of `kind`
    pub fn eat(&mut self, kind: TokenKind) -> Option<Token<'src>> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    pub fn expect(&mut self, kind: TokenKind) -> Result<Token<'src>, SyntaxError> {
        self.expect_described(kind, kind.describe())
    }

    /// Like [Parser::expect], naming what is missing in the error as `what`
    pub fn expect_described(
        &mut self,
        kind: TokenKind,
        what: &str,
    ) -> Result<Token<'src>, SyntaxError> {
        match self.eat(kind) {
            Some(token) => Ok(token),
            None => {
                let found = self.current();
                Err(self.error_at(&found, &[what]))
            }
        }
    }

    /// Expect a token of `kind` whose text is exactly `text`
    pub fn expect_text(&mut self, kind: TokenKind, text: &str) -> Result<Token<'src>, SyntaxError> {
        let token = self.current();
        if token.kind == kind && token.text == text {
            Ok(self.advance())
        } else {
            let expected = format!("'{}'", text);
            Err(self.error_at(&token, &[expected.as_str()]))
        }
    }

    /// `expected ..., found <token>`
    pub fn error_at(&self, token: &Token, expected: &[&str]) -> SyntaxError {
        SyntaxError::unexpected(self.source_name_arc(), token, expected)
    }

    /// An error at `token` with its own message
    pub fn error_message(&self, token: &Token, message: impl Into<String>) -> SyntaxError {
        SyntaxError::at(self.source_name_arc(), token, message)
    }

    fn source_name_arc(&self) -> Arc<str> {
        self.lexer.source_name_arc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::lexing::Dialect;

    fn parser(source: &str) -> Parser<'_> {
        let mut parser = Parser::new(Lexer::for_dialect(Dialect::Bnf));
        parser.set_input(source, "test.y");
        parser
    }

    #[test]
    fn test_check_eat_expect() {
        let mut parser = parser("a ::= b");
        assert!(parser.check(TokenKind::Identifier));
        assert!(parser.eat(TokenKind::Define).is_none());
        assert_eq!(parser.expect(TokenKind::Identifier).unwrap().text, "a");
        assert_eq!(parser.lookahead(1).text, "b");
        assert_eq!(parser.expect(TokenKind::Define).unwrap().text, "::=");
        assert_eq!(parser.advance().text, "b");
        assert!(parser.check(TokenKind::Eof));
    }

    #[test]
    fn test_expect_failure_reports_both_sides() {
        let mut parser = parser("a | b");
        parser.advance();
        let err = parser.expect(TokenKind::Define).unwrap_err();
        assert_eq!(err.expected, vec!["'::=' or ':'"]);
        assert_eq!(err.found, TokenKind::Pipe);
        assert_eq!(err.found_text, "|");
        assert_eq!(err.location.column, 3);
        assert_eq!(&*err.source_name, "test.y");
        // The failed expectation does not consume anything
        assert!(parser.check(TokenKind::Pipe));
    }

    #[test]
    fn test_expect_text() {
        let mut parser = parser("%start expr");
        assert!(parser.expect_text(TokenKind::Directive, "%token").is_err());
        assert!(parser.expect_text(TokenKind::Directive, "%start").is_ok());
    }

    #[test]
    fn test_error_token_names_the_character() {
        let mut parser = parser("a ::= @");
        parser.advance();
        parser.advance();
        let err = parser.expect(TokenKind::Identifier).unwrap_err();
        assert_eq!(err.found, TokenKind::Error);
        assert!(err.message.contains("unexpected character '@'"));
    }
}
