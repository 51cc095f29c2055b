//! # grammar-parser
//!
//! A rule-driven lexer and an EBNF/yacc grammar parser.
//!
//! File Layout
//!
//! src/grammar
//!   ├── token       Token and TokenKind, shared by every dialect
//!   ├── lexing      The lexer, rule sets and the built-in ECMAScript, C and BNF dialects
//!   ├── parsing     Token-level parser helpers and the EBNF/yacc parser
//!   ├── model       The grammar model and its finalization
//!   ├── formats     JSON, YAML, JavaScript module and EBNF output
//!   └── error       Error types and source context rendering
//! src/config.rs     Configuration loading for the binary
//!
//! Parsing a grammar is one call:
//!
//! ```ignore
//! let grammar = grammar_parser::grammar::parse_grammar("expr ::= term ('+' term)* ;", "expr.ebnf")?;
//! ```
//!
//! For testing helpers, see the [testing module](grammar::testing).

pub mod config;
pub mod grammar;

pub use grammar::{parse_grammar, Grammar, GrammarError};
