//! Property-based tests for the lexer
//!
//! Arbitrary input, including characters no rule knows about, must lex to a finite stream
//! that ends in a single repeatable Eof, covers the input without gaps, and carries
//! locations that agree with a line index built over the same text.

use grammar_parser::grammar::lexing::{tokenize, Dialect, Lexer, LexerOptions};
use grammar_parser::grammar::location::LineIndex;
use grammar_parser::grammar::token::{detokenize, TokenKind};
use proptest::prelude::*;

fn dialect_strategy() -> impl Strategy<Value = Dialect> {
    prop_oneof![Just(Dialect::Ecmascript), Just(Dialect::C), Just(Dialect::Bnf)]
}

/// Text built from grammar-ish fragments, so that most rules get exercised
fn grammar_like_strategy() -> impl Strategy<Value = String> {
    let fragment = prop_oneof![
        Just("expr".to_string()),
        Just(" ".to_string()),
        Just("\n".to_string()),
        Just("::=".to_string()),
        Just(":".to_string()),
        Just("|".to_string()),
        Just("'+'".to_string()),
        Just("\"x\"".to_string()),
        Just("(".to_string()),
        Just(")".to_string()),
        Just("*".to_string()),
        Just(";".to_string()),
        Just("{ $$ = 1; }".to_string()),
        Just("%%".to_string()),
        Just("%token".to_string()),
        Just("/* c */".to_string()),
        Just("/re/".to_string()),
        Just("0x1F".to_string()),
        Just("é".to_string()),
        Just("@".to_string()),
        "[a-z]{1,6}",
    ];
    prop::collection::vec(fragment, 0..40).prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn test_tokenize_terminates_with_single_eof(input in any::<String>(), dialect in dialect_strategy()) {
        let tokens = tokenize(&input, "prop", &LexerOptions::for_dialect(dialect));
        let eofs = tokens.iter().filter(|token| token.is_eof()).count();
        prop_assert_eq!(eofs, 1);
        prop_assert!(tokens.last().unwrap().is_eof());
    }

    #[test]
    fn test_eof_is_idempotent(input in grammar_like_strategy(), dialect in dialect_strategy()) {
        let mut lexer = Lexer::for_dialect(dialect);
        lexer.set_input(&input, "prop");
        let mut eof = lexer.next_token();
        while !eof.is_eof() {
            eof = lexer.next_token();
        }
        prop_assert_eq!(lexer.next_token(), eof);
        prop_assert_eq!(lexer.peek(0), eof);
        prop_assert_eq!(lexer.peek(2), eof);
        prop_assert_eq!(eof.start.offset, input.len());
    }

    #[test]
    fn test_lossless_stream_reproduces_input(input in any::<String>(), dialect in dialect_strategy()) {
        let tokens = tokenize(&input, "prop", &LexerOptions::lossless(dialect));
        prop_assert_eq!(detokenize(&tokens), input);
    }

    #[test]
    fn test_tokens_are_contiguous_and_non_empty(input in grammar_like_strategy()) {
        let tokens = tokenize(&input, "prop", &LexerOptions::lossless(Dialect::Bnf));
        let mut offset = 0;
        for token in &tokens {
            prop_assert_eq!(token.start.offset, offset);
            if !token.is_eof() {
                prop_assert!(!token.text.is_empty());
            }
            offset = token.end.offset;
        }
        prop_assert_eq!(offset, input.len());
    }

    #[test]
    fn test_locations_agree_with_line_index(input in grammar_like_strategy(), dialect in dialect_strategy()) {
        let index = LineIndex::new(&input);
        for token in tokenize(&input, "prop", &LexerOptions::for_dialect(dialect)) {
            prop_assert_eq!(token.start, index.location(token.start.offset));
            prop_assert_eq!(token.end, index.location(token.end.offset));
        }
    }

    #[test]
    fn test_error_tokens_are_single_code_points(input in any::<String>()) {
        for token in tokenize(&input, "prop", &LexerOptions::default()) {
            if token.kind == TokenKind::Error {
                prop_assert_eq!(token.char_count(), 1);
            }
        }
    }
}
