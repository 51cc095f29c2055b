//! Main module for grammar library functionality

pub mod error;
pub mod formats;
pub mod lexing;
pub mod location;
pub mod model;
pub mod parsing;
pub mod testing;
pub mod token;

pub use error::{format_source_context, GrammarError, ResolutionError, SyntaxError};
pub use lexing::{Dialect, Lexer, LexerOptions};
pub use location::{Location, Span};
pub use model::Grammar;
pub use parsing::{parse_grammar, parse_grammar_recovering, EbnfParser, ParseOptions};
pub use token::{Token, TokenKind};
