//! The rule-driven lexer
//!
//!     The lexer walks a borrowed buffer with a single cursor. At each step it asks the rule set
//!     for the first rule matching at the cursor, stamps the matched text with its start and end
//!     locations, and moves the cursor past it. When no rule matches, the next code point becomes
//!     an Error token, so lexing always makes progress and never fails.
//!
//!     Lookahead is a buffer in front of the cursor: `peek(k)` scans as many tokens as needed and
//!     keeps them, `next_token()` drains the buffer before scanning again. The cursor therefore
//!     only ever moves forward.
//!
//!     Once the input is exhausted every call yields the same Eof token, and lookahead past it
//!     does not grow the buffer.

use std::collections::VecDeque;
use std::sync::Arc;

use super::common::{LexError, LexerOptions};
use super::dialects::Dialect;
use super::matcher::ScanMemo;
use super::rules::RuleSet;
use crate::grammar::location::Location;
use crate::grammar::token::{Token, TokenKind};

pub struct Lexer<'src> {
    rules: Arc<RuleSet>,
    options: LexerOptions,
    source_name: Arc<str>,
    input: &'src str,
    cursor: Location,
    lookahead: VecDeque<Token<'src>>,
    /// Last non-trivia token scanned, consulted by rule guards
    previous: Option<Token<'src>>,
    memo: ScanMemo,
}

impl<'src> Lexer<'src> {
    pub fn new(rules: Arc<RuleSet>, options: LexerOptions) -> Self {
        Self {
            rules,
            options,
            source_name: Arc::from(""),
            input: "",
            cursor: Location::start(),
            lookahead: VecDeque::new(),
            previous: None,
            memo: ScanMemo::default(),
        }
    }

    /// A lexer over a built-in dialect with default skip settings
    pub fn for_dialect(dialect: Dialect) -> Self {
        Self::with_options(LexerOptions::for_dialect(dialect))
    }

    /// A lexer over the dialect named in `options`
    pub fn with_options(options: LexerOptions) -> Self {
        Self::new(options.dialect.rule_set(), options)
    }

    /// Start over on a new buffer
    pub fn set_input(&mut self, text: &'src str, source_name: &str) {
        self.input = text;
        self.source_name = Arc::from(source_name);
        self.cursor = Location::start();
        self.lookahead.clear();
        self.previous = None;
        self.memo.clear();
    }

    /// The k-th upcoming token; `peek(0)` is the current one
    pub fn peek(&mut self, k: usize) -> Token<'src> {
        while self.lookahead.len() <= k {
            if let Some(eof) = self.lookahead.back().filter(|token| token.is_eof()) {
                return *eof;
            }
            let token = self.scan();
            self.lookahead.push_back(token);
        }
        self.lookahead[k]
    }

    /// Return the current token and move past it
    pub fn next_token(&mut self) -> Token<'src> {
        match self.lookahead.pop_front() {
            Some(token) => token,
            None => self.scan(),
        }
    }

    /// Location of the next unconsumed token (or of the raw cursor when nothing is buffered)
    pub fn position(&self) -> Location {
        self.lookahead
            .front()
            .map(|token| token.start)
            .unwrap_or(self.cursor)
    }

    pub fn offset(&self) -> usize {
        self.position().offset
    }

    pub fn is_eof(&mut self) -> bool {
        self.peek(0).is_eof()
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Shared handle on the source name, for errors that outlive the lexer
    pub fn source_name_arc(&self) -> Arc<str> {
        Arc::clone(&self.source_name)
    }

    pub fn source(&self) -> &'src str {
        self.input
    }

    pub fn options(&self) -> &LexerOptions {
        &self.options
    }

    /// Text of the line holding [Lexer::position], without its terminator
    pub fn current_line(&self) -> &'src str {
        let offset = self.offset();
        let start = self.input[..offset].rfind('\n').map_or(0, |index| index + 1);
        let end = self.input[offset..]
            .find('\n')
            .map_or(self.input.len(), |index| offset + index);
        let line = &self.input[start..end];
        line.strip_suffix('\r').unwrap_or(line)
    }

    /// Input from [Lexer::position] to the end
    pub fn remaining(&self) -> &'src str {
        &self.input[self.offset()..]
    }

    /// The structured error for an `Error` token produced by this lexer
    pub fn error_for(&self, token: &Token) -> Option<LexError> {
        LexError::from_token(self.source_name_arc(), token)
    }

    fn scan(&mut self) -> Token<'src> {
        loop {
            let start = self.cursor;
            let rest = &self.input[start.offset..];
            if rest.is_empty() {
                return Token::eof(start);
            }

            let (kind, len) = self
                .rules
                .match_at_cached(rest, self.previous.as_ref(), start, &mut self.memo)
                .unwrap_or_else(|| {
                    let width = rest.chars().next().map_or(1, char::len_utf8);
                    (TokenKind::Error, width)
                });

            let text = &rest[..len];
            let end = start.advance(text);
            self.cursor = end;
            let token = Token::new(kind, text, start, end);

            if !kind.is_trivia() {
                self.previous = Some(token);
            }
            if !self.options.skips(kind) {
                return token;
            }
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token<'src>;

    /// Tokens up to, not including, end of input
    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        (!token.is_eof()).then_some(token)
    }
}

/// Lex a whole buffer. The last token is always Eof.
pub fn tokenize<'src>(
    text: &'src str,
    source_name: &str,
    options: &LexerOptions,
) -> Vec<Token<'src>> {
    let mut lexer = Lexer::with_options(*options);
    lexer.set_input(text, source_name);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        tokens.push(token);
        if token.is_eof() {
            return tokens;
        }
    }
}
