//! Error types for grammar parsing
//!
//! Four things can go wrong, and [GrammarError] wraps each of them:
//!
//! - [LexError]: a code point no lexing rule matched
//! - [SyntaxError]: the token stream does not follow the grammar notation
//! - [ResolutionError]: a symbol names neither a rule nor a declared token; these are always
//!   reported as a batch, one per unresolved name
//! - [ConfigurationError]: a rule set that cannot be built

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::grammar::lexing::{ConfigurationError, LexError};
use crate::grammar::location::{LineIndex, Location};
use crate::grammar::token::{Token, TokenKind};

/// The parser met a token it cannot use here
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub source_name: Arc<str>,
    pub location: Location,
    /// What would have been accepted, as readable descriptions. Empty when the error is not
    /// about a missing token (a quantifier applied twice, say).
    pub expected: Vec<String>,
    pub found: TokenKind,
    pub found_text: String,
}

impl SyntaxError {
    /// `expected ..., found ...` at `token`
    pub fn unexpected(source_name: Arc<str>, token: &Token, expected: &[&str]) -> Self {
        let found = describe_found(token);
        let message = match expected {
            [] => format!("unexpected {}", found),
            [only] => format!("expected {}, found {}", only, found),
            [init @ .., last] => format!("expected {} or {}, found {}", init.join(", "), last, found),
        };
        Self {
            message,
            source_name,
            location: token.start,
            expected: expected.iter().map(|item| item.to_string()).collect(),
            found: token.kind,
            found_text: token.text.to_string(),
        }
    }

    /// An error with its own wording at `token`
    pub fn at(source_name: Arc<str>, token: &Token, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source_name,
            location: token.start,
            expected: Vec::new(),
            found: token.kind,
            found_text: token.text.to_string(),
        }
    }
}

fn describe_found(token: &Token) -> String {
    match token.kind {
        TokenKind::Eof => "end of input".to_string(),
        TokenKind::Error => format!("unexpected character '{}'", token.text.escape_debug()),
        kind if kind.describe().starts_with('\'') => kind.describe().to_string(),
        kind => format!("{} '{}'", kind.describe(), token.text.escape_debug()),
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: syntax error: {}",
            self.source_name, self.location, self.message
        )
    }
}

impl std::error::Error for SyntaxError {}

/// A symbol that names neither a rule nor a declared token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionError {
    pub name: String,
    pub source_name: Arc<str>,
    /// First place the name is used
    pub location: Location,
}

impl ResolutionError {
    pub fn message(&self) -> String {
        format!("undefined symbol '{}'", self.name)
    }
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: resolution error: {}",
            self.source_name,
            self.location,
            self.message()
        )
    }
}

impl std::error::Error for ResolutionError {}

/// Any error produced while turning text into a grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    Lex(LexError),
    Syntax(SyntaxError),
    /// Every unresolved name, in order of first use
    Resolution(Vec<ResolutionError>),
    Configuration(ConfigurationError),
}

/// Flat, serializable view of one error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub message: String,
    pub source_name: String,
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl GrammarError {
    pub fn message(&self) -> String {
        match self {
            GrammarError::Lex(err) => err.message(),
            GrammarError::Syntax(err) => err.message.clone(),
            GrammarError::Resolution(errors) => match errors.as_slice() {
                [only] => only.message(),
                _ => {
                    let names: Vec<&str> = errors.iter().map(|err| err.name.as_str()).collect();
                    format!("undefined symbols: {}", names.join(", "))
                }
            },
            GrammarError::Configuration(err) => err.to_string(),
        }
    }

    pub fn source_name(&self) -> Option<&str> {
        match self {
            GrammarError::Lex(err) => Some(&err.source_name),
            GrammarError::Syntax(err) => Some(&err.source_name),
            GrammarError::Resolution(errors) => errors.first().map(|err| &*err.source_name),
            GrammarError::Configuration(_) => None,
        }
    }

    /// Where the error happened; the first unresolved use for a resolution batch
    pub fn location(&self) -> Option<Location> {
        match self {
            GrammarError::Lex(err) => Some(err.location),
            GrammarError::Syntax(err) => Some(err.location),
            GrammarError::Resolution(errors) => errors.first().map(|err| err.location),
            GrammarError::Configuration(_) => None,
        }
    }

    pub fn line(&self) -> Option<usize> {
        self.location().map(|location| location.line)
    }

    pub fn column(&self) -> Option<usize> {
        self.location().map(|location| location.column)
    }

    pub fn offset(&self) -> Option<usize> {
        self.location().map(|location| location.offset)
    }

    /// One entry per underlying error; a resolution batch expands to one per name
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            GrammarError::Resolution(errors) => errors
                .iter()
                .map(|err| Diagnostic::new(err.message(), &err.source_name, err.location))
                .collect(),
            GrammarError::Configuration(err) => vec![Diagnostic {
                message: err.to_string(),
                source_name: String::new(),
                line: 0,
                column: 0,
                offset: 0,
            }],
            other => {
                let location = other.location().unwrap_or_default();
                vec![Diagnostic::new(
                    other.message(),
                    other.source_name().unwrap_or_default(),
                    location,
                )]
            }
        }
    }
}

impl Diagnostic {
    fn new(message: String, source_name: &str, location: Location) -> Self {
        Self {
            message,
            source_name: source_name.to_string(),
            line: location.line,
            column: location.column,
            offset: location.offset,
        }
    }
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::Lex(err) => write!(f, "{}", err),
            GrammarError::Syntax(err) => write!(f, "{}", err),
            GrammarError::Resolution(errors) => {
                for (index, err) in errors.iter().enumerate() {
                    if index > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
            GrammarError::Configuration(err) => write!(f, "configuration error: {}", err),
        }
    }
}

impl std::error::Error for GrammarError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GrammarError::Lex(err) => Some(err),
            GrammarError::Syntax(err) => Some(err),
            GrammarError::Resolution(errors) => errors
                .first()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            GrammarError::Configuration(err) => Some(err),
        }
    }
}

impl From<LexError> for GrammarError {
    fn from(err: LexError) -> Self {
        GrammarError::Lex(err)
    }
}

impl From<SyntaxError> for GrammarError {
    fn from(err: SyntaxError) -> Self {
        GrammarError::Syntax(err)
    }
}

impl From<Vec<ResolutionError>> for GrammarError {
    fn from(errors: Vec<ResolutionError>) -> Self {
        GrammarError::Resolution(errors)
    }
}

impl From<ConfigurationError> for GrammarError {
    fn from(err: ConfigurationError) -> Self {
        GrammarError::Configuration(err)
    }
}

pub type Result<T, E = GrammarError> = std::result::Result<T, E>;

/// Format source code context around an error location
///
/// Shows 2 lines before the error, the error line with >> marker, and 2 lines after.
/// All lines are numbered for easy reference.
pub fn format_source_context(source: &str, location: &Location) -> String {
    let index = LineIndex::new(source);
    let error_line = location.line;

    let first = error_line.saturating_sub(2).max(1);
    let last = (error_line + 2).min(index.line_count());

    let mut context = String::new();
    for line in first..=last {
        let Some(text) = index.line_text(line) else {
            continue;
        };
        let marker = if line == error_line { ">>" } else { "  " };
        context.push_str(&format!("{} {:3} | {}\n", marker, line, text));
    }
    context
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: TokenKind, text: &str) -> Token<'_> {
        let start = Location::new(6, 2, 3);
        Token::new(kind, text, start, start.advance(text))
    }

    #[test]
    fn test_unexpected_messages() {
        let name: Arc<str> = Arc::from("g.y");
        let err = SyntaxError::unexpected(name.clone(), &token(TokenKind::Pipe, "|"), &["rule name"]);
        assert_eq!(err.message, "expected rule name, found '|'");

        let err = SyntaxError::unexpected(
            name.clone(),
            &token(TokenKind::Identifier, "expr"),
            &["';'"],
        );
        assert_eq!(err.message, "expected ';', found identifier 'expr'");

        let err = SyntaxError::unexpected(
            name.clone(),
            &token(TokenKind::Eof, ""),
            &["';'", "'|'"],
        );
        assert_eq!(err.message, "expected ';' or '|', found end of input");
        assert_eq!(err.expected, vec!["';'", "'|'"]);

        let err = SyntaxError::unexpected(name, &token(TokenKind::Error, "@"), &["symbol"]);
        assert_eq!(err.message, "expected symbol, found unexpected character '@'");
        assert_eq!(err.to_string(), "g.y:2:3: syntax error: expected symbol, found unexpected character '@'");
    }

    #[test]
    fn test_grammar_error_accessors() {
        let err = GrammarError::from(vec![
            ResolutionError {
                name: "B".into(),
                source_name: Arc::from("g.y"),
                location: Location::new(6, 1, 7),
            },
            ResolutionError {
                name: "C".into(),
                source_name: Arc::from("g.y"),
                location: Location::new(20, 3, 1),
            },
        ]);
        assert_eq!(err.message(), "undefined symbols: B, C");
        assert_eq!(err.source_name(), Some("g.y"));
        assert_eq!(err.line(), Some(1));
        assert_eq!(err.column(), Some(7));
        assert_eq!(err.offset(), Some(6));

        let diagnostics = err.diagnostics();
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[1].message, "undefined symbol 'C'");
        assert_eq!(diagnostics[1].line, 3);
    }

    #[test]
    fn test_configuration_error_has_no_location() {
        let err = GrammarError::from(ConfigurationError::EmptyDelimiter { rule: 2 });
        assert_eq!(err.location(), None);
        assert_eq!(err.source_name(), None);
    }

    #[test]
    fn test_format_source_context() {
        let source = "line 1\nline 2\nline 3\nerror line\nline 5\nline 6\nline 7";
        let context = format_source_context(source, &Location::new(21, 4, 1));

        assert!(context.contains("line 2"));
        assert!(context.contains(">>   4 | error line"));
        assert!(context.contains("line 6"));
        assert!(!context.contains("line 1"));
        assert!(!context.contains("line 7"));
    }

    #[test]
    fn test_format_source_context_first_line() {
        let context = format_source_context("only\nsecond", &Location::start());
        assert_eq!(context, ">>   1 | only\n     2 | second\n");
    }
}
