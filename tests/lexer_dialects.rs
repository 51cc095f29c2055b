//! Dialect-level lexing tests
//!
//! Each case lexes a short snippet with one of the built-in rule sets and checks kinds and
//! texts of the resulting tokens.

use grammar_parser::grammar::lexing::{Dialect, Lexer, RuleSet};
use grammar_parser::grammar::location::Location;
use grammar_parser::grammar::testing::lex_pairs;
use grammar_parser::grammar::token::TokenKind;
use rstest::rstest;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[rstest]
#[case(Dialect::Ecmascript, "if", TokenKind::Keyword)]
#[case(Dialect::Ecmascript, "ifx", TokenKind::Identifier)]
#[case(Dialect::Ecmascript, "true", TokenKind::Boolean)]
#[case(Dialect::Ecmascript, "null", TokenKind::Null)]
#[case(Dialect::Ecmascript, "`tpl`", TokenKind::Template)]
#[case(Dialect::Ecmascript, "1e3", TokenKind::Number)]
#[case(Dialect::C, "while", TokenKind::Keyword)]
#[case(Dialect::C, "whilst", TokenKind::Identifier)]
#[case(Dialect::C, "'\\0'", TokenKind::Char)]
#[case(Dialect::C, "#pragma once", TokenKind::Preprocessor)]
#[case(Dialect::Bnf, "::=", TokenKind::Define)]
#[case(Dialect::Bnf, ":", TokenKind::Define)]
#[case(Dialect::Bnf, "%%", TokenKind::Mark)]
#[case(Dialect::Bnf, "%left", TokenKind::Directive)]
#[case(Dialect::Bnf, "<node>", TokenKind::TypeTag)]
#[case(Dialect::Bnf, "'::='", TokenKind::Literal)]
#[case(Dialect::Bnf, "{ { nested } }", TokenKind::Action)]
fn test_single_token(#[case] dialect: Dialect, #[case] source: &str, #[case] kind: TokenKind) {
    assert_eq!(lex_pairs(source, dialect), vec![(kind, source)]);
}

#[test]
fn test_newline_starts_line_two() {
    let mut lexer = Lexer::for_dialect(Dialect::Ecmascript);
    lexer.set_input("a\nb", "lines.js");
    let a = lexer.next_token();
    let b = lexer.next_token();
    assert_eq!(a.start, Location::new(0, 1, 1));
    assert_eq!(b.start, Location::new(2, 2, 1));
    assert_eq!(b.end, Location::new(3, 2, 2));
}

#[test]
fn test_unmatched_character_then_resume() {
    assert_eq!(
        lex_pairs("a ` b", Dialect::Bnf),
        vec![
            (TokenKind::Identifier, "a"),
            (TokenKind::Error, "`"),
            (TokenKind::Identifier, "b")
        ]
    );
}

#[test]
fn test_ecmascript_statement() {
    let pairs = lex_pairs("let re = /a\\/b/g; const n = x / 2;", Dialect::Ecmascript);
    let kinds: Vec<_> = pairs.iter().map(|(kind, _)| *kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Keyword,
            TokenKind::Identifier,
            TokenKind::Punctuator,
            TokenKind::Regexp,
            TokenKind::Punctuator,
            TokenKind::Keyword,
            TokenKind::Identifier,
            TokenKind::Punctuator,
            TokenKind::Identifier,
            TokenKind::Punctuator,
            TokenKind::Number,
            TokenKind::Punctuator,
        ]
    );
    assert_eq!(pairs[3].1, "/a\\/b/g");
}

#[test]
fn test_c_function() {
    let source = "#include <stdio.h>\nint main(void) { return printf(\"%d\\n\", 0x2A); }\n";
    let pairs = lex_pairs(source, Dialect::C);
    assert_eq!(pairs[0], (TokenKind::Preprocessor, "#include <stdio.h>"));
    assert_eq!(pairs[1], (TokenKind::Keyword, "int"));
    assert!(pairs.contains(&(TokenKind::String, "\"%d\\n\"")));
    assert!(pairs.contains(&(TokenKind::Number, "0x2A")));
}

#[test]
fn test_custom_rule_set() {
    let rules = RuleSet::builder()
        .pattern(r"[ \t\n]+", TokenKind::Whitespace)
        .pattern(r"[0-9]+", TokenKind::Number)
        .literals(&["+", "++"], TokenKind::Punctuator)
        .build()
        .unwrap();

    let mut lexer = Lexer::new(Arc::new(rules), Default::default());
    lexer.set_input("1 ++ 2", "custom");
    let texts: Vec<_> = lexer.map(|token| token.text).collect();
    assert_eq!(texts, vec!["1", "++", "2"]);
}

#[rstest]
#[case(Dialect::Bnf, "{ ")]
#[case(Dialect::Bnf, "%{ ")]
#[case(Dialect::C, "/* ")]
#[case(Dialect::Ecmascript, "/* ")]
fn test_stray_openers_lex_in_linear_time(#[case] dialect: Dialect, #[case] opener: &str) {
    let source = opener.repeat(10_000);
    let started = Instant::now();
    let tokens = lex_pairs(&source, dialect);
    assert!(
        started.elapsed() < Duration::from_secs(2),
        "lexing took {:?}",
        started.elapsed()
    );
    assert!(!tokens.is_empty());
    assert!(tokens.iter().all(|(kind, _)| !matches!(
        kind,
        TokenKind::Action | TokenKind::Code | TokenKind::Comment
    )));
}

#[test]
fn test_inner_block_still_closes_after_outer_fails() {
    assert_eq!(
        lex_pairs("{ { }", Dialect::Bnf),
        vec![(TokenKind::Error, "{"), (TokenKind::Action, "{ }")]
    );
}
