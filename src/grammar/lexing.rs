//! Lexer
//!
//!     Lexing turns a source buffer into a stream of [tokens](crate::grammar::token::Token).
//!     The lexer is generic: what it recognizes is entirely described by a
//!     [RuleSet](rules::RuleSet), an ordered table of rules plus a keyword table. Three rule sets
//!     ship with the crate (see [Dialect]): ECMAScript, C and BNF. The grammar parser runs on the
//!     BNF one.
//!
//! Matching
//!
//!     At each position the rules are tried in declaration order and the first match wins.
//!     Identifiers are then refined through the keyword table. Because the first match wins,
//!     longer punctuators are declared before their prefixes.
//!
//!     A rule that could match the empty string would make no progress, so building a rule set
//!     with one fails with a [ConfigurationError].
//!
//! Errors
//!
//!     Lexing never fails. A code point that no rule matches becomes a single Error token and the
//!     lexer carries on; whoever consumes the stream decides how bad that is. [LexError] is the
//!     structured form of such a token.
//!
//! Positions
//!
//!     Every token records where it starts and ends as byte offset, line and column. Lines and
//!     columns start at 1, and columns count code points, not bytes.

pub mod common;
pub mod dialects;
pub mod lexer;
pub mod matcher;
pub mod rules;

pub use common::{ConfigurationError, LexError, LexerOptions};
pub use dialects::Dialect;
pub use lexer::{tokenize, Lexer};
pub use matcher::{
    is_alpha_char, is_decimal_digit, is_hex_digit, is_identifier_char, is_identifier_first_char,
    is_line_terminator, is_octal_digit, is_punctuator, is_punctuator_char, is_quote_char,
    is_regexp_char, is_whitespace, CharClass, Matcher, ScanMemo,
};
pub use rules::{Guard, Rule, RuleSet, RuleSetBuilder};
