//! Testing utilities
//!
//! Small helpers shared by unit and integration tests. They panic with the full error on
//! failure, which is what a test wants.

use crate::grammar::error::GrammarError;
use crate::grammar::lexing::{tokenize, Dialect, LexerOptions};
use crate::grammar::model::{Grammar, Symbol, Terminal};
use crate::grammar::parsing::parse_grammar;
use crate::grammar::token::TokenKind;

/// `(kind, text)` for every token before Eof, trivia skipped
pub fn lex_pairs(source: &str, dialect: Dialect) -> Vec<(TokenKind, &str)> {
    tokenize(source, "test", &LexerOptions::for_dialect(dialect))
        .into_iter()
        .filter(|token| !token.is_eof())
        .map(|token| (token.kind, token.text))
        .collect()
}

/// Parse or panic with the error rendered
pub fn parse_ok(source: &str) -> Grammar {
    match parse_grammar(source, "test.y") {
        Ok(grammar) => grammar,
        Err(err) => panic!("expected {:?} to parse, got: {}", source, err),
    }
}

/// Parse expecting failure
pub fn parse_err(source: &str) -> GrammarError {
    match parse_grammar(source, "test.y") {
        Ok(grammar) => panic!("expected {:?} to fail, got:\n{}", source, grammar),
        Err(err) => err,
    }
}

/// Compact one-line rendering of a symbol: names bare, literals quoted, regexes slashed
pub fn shape(symbol: &Symbol) -> String {
    match symbol {
        Symbol::Terminal(Terminal::Literal(text)) => format!("'{}'", text),
        Symbol::Terminal(Terminal::Regex(pattern)) => format!("/{}/", pattern),
        Symbol::Terminal(Terminal::Token(name)) => format!("%{}", name),
        Symbol::Nonterminal(nonterminal) => nonterminal.name.clone(),
        Symbol::Group(alternatives) => {
            let inner: Vec<String> = alternatives
                .iter()
                .map(|alternative| {
                    alternative
                        .symbols
                        .iter()
                        .map(shape)
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect();
            format!("({})", inner.join(" | "))
        }
        Symbol::Quantified { symbol, quantifier } => {
            format!("{}{}", shape(symbol), quantifier.as_str())
        }
    }
}

/// One string per alternative of `rule`
pub fn alternatives(grammar: &Grammar, rule: &str) -> Vec<String> {
    let production = match grammar.rule(rule) {
        Some(production) => production,
        None => panic!("no rule named {:?}", rule),
    };
    production
        .alternatives
        .iter()
        .map(|alternative| {
            alternative
                .symbols
                .iter()
                .map(shape)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}
