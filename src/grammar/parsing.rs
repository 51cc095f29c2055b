//! Parsing
//!
//!     Parsing turns grammar source text into a [Grammar](crate::grammar::model::Grammar):
//!         1. Lexing with the BNF rule set. See [lexing](crate::grammar::lexing).
//!         2. Recursive descent over the tokens. See [ebnf].
//!         3. Finalization, resolving every rule reference. See
//!            [Grammar::finalize](crate::grammar::model::Grammar::finalize).
//!
//!     [parser::Parser] holds the token-level helpers the descent is written with, and can be
//!     reused for other notations over other rule sets.

pub mod ebnf;
pub mod parser;

pub use ebnf::{EbnfParser, ParseOptions, Recovered};
pub use parser::Parser;

use crate::grammar::error::GrammarError;
use crate::grammar::model::Grammar;

/// Parse a grammar, stopping at the first error
pub fn parse_grammar(text: &str, source_name: &str) -> Result<Grammar, GrammarError> {
    let mut parser = EbnfParser::new(ParseOptions::default());
    parser.set_input(text, source_name);
    parser.parse()
}

/// Parse a grammar, collecting every error alongside the partial result
pub fn parse_grammar_recovering(text: &str, source_name: &str) -> Recovered {
    let mut parser = EbnfParser::new(ParseOptions { recover: true });
    parser.set_input(text, source_name);
    parser.parse_recovering()
}
