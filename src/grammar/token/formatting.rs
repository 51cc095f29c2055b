//! Token stream rendering
//!
//! This module converts token streams back into text. There are two renderings:
//!
//! - [detokenize] concatenates the raw text of each token. With whitespace and comments kept
//!   by the lexer, this reproduces the input exactly, which is what the round-trip tests rely on.
//! - [inspect] renders one token per line with its position, length, kind and escaped text.
//!   This is the format of the `grammar tokens` command.

use super::core::Token;

/// Detokenize a stream of tokens into a string
///
/// The end-of-input token contributes nothing.
///
/// # Examples
///
/// ```ignore
/// use grammar_parser::grammar::lexing::{tokenize, LexerOptions};
/// use grammar_parser::grammar::token::detokenize;
///
/// let options = LexerOptions { skip_whitespace: false, skip_comments: false, ..Default::default() };
/// let tokens = tokenize("a ::= 'x' ;", "inline", &options);
/// assert_eq!(detokenize(&tokens), "a ::= 'x' ;");
/// ```
pub fn detokenize(tokens: &[Token]) -> String {
    let mut result = String::with_capacity(tokens.iter().map(Token::len).sum());
    for token in tokens {
        result.push_str(token.text);
    }
    result
}

/// One-line description of a token
pub fn inspect(token: &Token) -> String {
    format!(
        "Token {{ loc: {}, offset: {}, length: {}, type: {}, chars: '{}' }}",
        token.start,
        token.start.offset,
        token.char_count(),
        token.kind,
        token.text.escape_debug()
    )
}

/// One line per token, in stream order
pub fn inspect_all(tokens: &[Token]) -> String {
    let mut result = String::new();
    for token in tokens {
        result.push_str(&inspect(token));
        result.push('\n');
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::location::Location;
    use crate::grammar::token::TokenKind;

    fn token(kind: TokenKind, text: &str, start: Location) -> Token<'_> {
        Token::new(kind, text, start, start.advance(text))
    }

    #[test]
    fn test_detokenize_concatenates() {
        let a = token(TokenKind::Identifier, "a", Location::start());
        let ws = token(TokenKind::Whitespace, " ", a.end);
        let define = token(TokenKind::Define, "::=", ws.end);
        let eof = Token::eof(define.end);

        assert_eq!(detokenize(&[a, ws, define, eof]), "a ::=");
    }

    #[test]
    fn test_inspect_escapes_text() {
        let newline = token(TokenKind::Newline, "\n", Location::new(3, 1, 4));
        assert_eq!(
            inspect(&newline),
            "Token { loc: 1:4, offset: 3, length: 1, type: NEWLINE, chars: '\\n' }"
        );
    }

    #[test]
    fn test_inspect_all_one_line_per_token() {
        let a = token(TokenKind::Identifier, "a", Location::start());
        let eof = Token::eof(a.end);
        let dump = inspect_all(&[a, eof]);
        assert_eq!(dump.lines().count(), 2);
        assert!(dump.lines().last().unwrap().contains("type: EOF"));
    }
}
