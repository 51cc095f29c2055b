//! Common lexer module
//!
//! This module contains the error types and options shared by the lexer and the rule sets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::dialects::Dialect;
use crate::grammar::location::Location;
use crate::grammar::token::{Token, TokenKind};

/// A position where no rule matched
///
/// The lexer itself never fails: it emits an [TokenKind::Error] token covering the offending
/// code point and moves on. A `LexError` is the structured form of such a token, for callers
/// that want to report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub source_name: Arc<str>,
    pub location: Location,
    pub character: char,
}

impl LexError {
    /// Build the error for an `Error` token. Returns `None` for any other kind.
    pub fn from_token(source_name: Arc<str>, token: &Token) -> Option<Self> {
        if token.kind != TokenKind::Error {
            return None;
        }
        let character = token.text.chars().next()?;
        Some(Self {
            source_name,
            location: token.start,
            character,
        })
    }

    pub fn message(&self) -> String {
        format!("unexpected character '{}'", self.character.escape_debug())
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: lexing error: {}",
            self.source_name,
            self.location,
            self.message()
        )
    }
}

impl std::error::Error for LexError {}

/// Errors raised while building a rule set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A rule whose matcher accepts the empty string
    EmptyMatch { rule: usize, matcher: String },
    /// A pattern that does not compile
    InvalidPattern {
        rule: usize,
        pattern: String,
        reason: String,
    },
    /// A literal or delimiter that is the empty string
    EmptyDelimiter { rule: usize },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::EmptyMatch { rule, matcher } => {
                write!(f, "rule {} ({}) can match the empty string", rule, matcher)
            }
            ConfigurationError::InvalidPattern {
                rule,
                pattern,
                reason,
            } => write!(f, "rule {} has an invalid pattern /{}/: {}", rule, pattern, reason),
            ConfigurationError::EmptyDelimiter { rule } => {
                write!(f, "rule {} has an empty literal or delimiter", rule)
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// Lexer behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexerOptions {
    pub dialect: Dialect,
    /// Drop whitespace and newline tokens
    pub skip_whitespace: bool,
    /// Drop comment tokens
    pub skip_comments: bool,
}

impl LexerOptions {
    pub fn for_dialect(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    /// Options that keep every token, so that the stream reproduces the input
    pub fn lossless(dialect: Dialect) -> Self {
        Self {
            dialect,
            skip_whitespace: false,
            skip_comments: false,
        }
    }

    /// Whether a token of this kind is dropped from the stream
    pub fn skips(&self, kind: TokenKind) -> bool {
        (self.skip_whitespace && kind.is_whitespace()) || (self.skip_comments && kind.is_comment())
    }
}

impl Default for LexerOptions {
    fn default() -> Self {
        Self {
            dialect: Dialect::Bnf,
            skip_whitespace: true,
            skip_comments: true,
        }
    }
}
