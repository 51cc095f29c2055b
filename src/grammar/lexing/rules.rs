//! Rule sets
//!
//!     A rule set is an ordered list of rules plus a keyword table. The lexer tries the rules in
//!     declaration order at the cursor and the first one that matches wins, so longer
//!     punctuators must be declared before their prefixes. When the winning rule produces an
//!     identifier, the matched text is looked up in the keyword table, which may refine the kind
//!     (`if` becomes a Keyword, `true` a Boolean).
//!
//!     A rule may carry a [Guard], a condition on the previously emitted token that must hold
//!     for the rule to be tried at all. This is how the ECMAScript dialect tells a regular
//!     expression literal from a division.
//!
//!     Construction validates the rules: a matcher that accepts the empty string would stall the
//!     lexer, so such rules are reported as a [ConfigurationError] instead.

use std::collections::HashMap;

use super::common::ConfigurationError;
use super::matcher::{CharClass, Matcher, ScanMemo};
use crate::grammar::location::Location;
use crate::grammar::token::{Token, TokenKind};

/// A condition on the preceding significant token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Guard {
    /// Only where an operand may start: at the beginning of input or after an operator,
    /// never right after an identifier, literal or closing bracket
    NotAfterOperand,
    /// Only as the first significant token of a line
    AtLineStart,
}

/// Keywords after which an operand may still start
const OPERAND_KEYWORDS: &[&str] = &["this", "super"];

impl Guard {
    /// `previous` is the last non-trivia token emitted, `at` the cursor position.
    pub fn allows(self, previous: Option<&Token>, at: Location) -> bool {
        match self {
            Guard::NotAfterOperand => previous.map_or(true, |token| !ends_operand(token)),
            Guard::AtLineStart => previous.map_or(true, |token| token.end.line < at.line),
        }
    }
}

fn ends_operand(token: &Token) -> bool {
    match token.kind {
        TokenKind::Identifier
        | TokenKind::Boolean
        | TokenKind::Null
        | TokenKind::Number
        | TokenKind::String
        | TokenKind::Char
        | TokenKind::Template
        | TokenKind::Regexp => true,
        TokenKind::Keyword => OPERAND_KEYWORDS.contains(&token.text),
        TokenKind::Punctuator => matches!(token.text, ")" | "]" | "}"),
        _ => false,
    }
}

/// One lexing rule
#[derive(Debug, Clone)]
pub struct Rule {
    pub matcher: Matcher,
    pub kind: TokenKind,
    pub guard: Option<Guard>,
}

impl Rule {
    pub fn new(matcher: Matcher, kind: TokenKind) -> Self {
        Self {
            matcher,
            kind,
            guard: None,
        }
    }

    pub fn guarded(matcher: Matcher, kind: TokenKind, guard: Guard) -> Self {
        Self {
            matcher,
            kind,
            guard: Some(guard),
        }
    }
}

/// An ordered, validated list of rules with a keyword table
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
    keywords: HashMap<String, TokenKind>,
}

impl RuleSet {
    /// Validate and assemble a rule set
    pub fn new(
        rules: Vec<Rule>,
        keywords: HashMap<String, TokenKind>,
    ) -> Result<Self, ConfigurationError> {
        for (index, rule) in rules.iter().enumerate() {
            if rule.matcher.can_match_empty() {
                return Err(match &rule.matcher {
                    Matcher::Literal(_) | Matcher::Delimited { .. } | Matcher::Block { .. } => {
                        ConfigurationError::EmptyDelimiter { rule: index }
                    }
                    matcher => ConfigurationError::EmptyMatch {
                        rule: index,
                        matcher: matcher.to_string(),
                    },
                });
            }
        }
        Ok(Self { rules, keywords })
    }

    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::default()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn keyword(&self, text: &str) -> Option<TokenKind> {
        self.keywords.get(text).copied()
    }

    /// Find the first rule matching at the start of `input`.
    ///
    /// Returns the refined kind and the byte length of the match.
    pub fn match_at(
        &self,
        input: &str,
        previous: Option<&Token>,
        at: Location,
    ) -> Option<(TokenKind, usize)> {
        self.match_at_cached(input, previous, at, &mut ScanMemo::default())
    }

    /// [RuleSet::match_at] for a lexer that keeps `memo` for the whole buffer
    pub fn match_at_cached(
        &self,
        input: &str,
        previous: Option<&Token>,
        at: Location,
        memo: &mut ScanMemo,
    ) -> Option<(TokenKind, usize)> {
        self.rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| rule.guard.map_or(true, |guard| guard.allows(previous, at)))
            .find_map(|(index, rule)| {
                let len = rule
                    .matcher
                    .match_len_cached(input, at.offset, index, memo)?;
                Some((self.refine(rule.kind, &input[..len]), len))
            })
    }

    fn refine(&self, kind: TokenKind, text: &str) -> TokenKind {
        if kind == TokenKind::Identifier {
            self.keyword(text).unwrap_or(kind)
        } else {
            kind
        }
    }
}

/// Builds a [RuleSet] in declaration order
///
/// Pattern compile errors are held back and reported by [RuleSetBuilder::build], so a rule
/// table can be written as a single chain.
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    rules: Vec<Rule>,
    keywords: HashMap<String, TokenKind>,
    error: Option<ConfigurationError>,
}

impl RuleSetBuilder {
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn literal(self, text: &str, kind: TokenKind) -> Self {
        self.rule(Rule::new(Matcher::literal(text), kind))
    }

    /// Several literals of one kind, reordered longest first
    pub fn literals(mut self, texts: &[&str], kind: TokenKind) -> Self {
        let mut sorted = texts.to_vec();
        sorted.sort_by_key(|text| std::cmp::Reverse(text.len()));
        for text in sorted {
            self = self.literal(text, kind);
        }
        self
    }

    pub fn class(self, class: CharClass, kind: TokenKind) -> Self {
        self.rule(Rule::new(Matcher::Class(class), kind))
    }

    pub fn pattern(self, source: &str, kind: TokenKind) -> Self {
        self.compiled(source, kind, None)
    }

    pub fn guarded_pattern(self, source: &str, kind: TokenKind, guard: Guard) -> Self {
        self.compiled(source, kind, Some(guard))
    }

    pub fn delimited(self, open: &str, close: &str, nested: bool, kind: TokenKind) -> Self {
        self.rule(Rule::new(Matcher::delimited(open, close, nested), kind))
    }

    pub fn block(self, open: &str, close: &str, kind: TokenKind) -> Self {
        self.rule(Rule::new(Matcher::block(open, close), kind))
    }

    /// Map each word to `kind` when it is lexed as an identifier
    pub fn keywords(mut self, words: &[&str], kind: TokenKind) -> Self {
        for word in words {
            self.keywords.insert((*word).to_string(), kind);
        }
        self
    }

    pub fn build(self) -> Result<RuleSet, ConfigurationError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        RuleSet::new(self.rules, self.keywords)
    }

    fn compiled(mut self, source: &str, kind: TokenKind, guard: Option<Guard>) -> Self {
        match Matcher::pattern(source) {
            Ok(matcher) => self.rules.push(Rule {
                matcher,
                kind,
                guard,
            }),
            Err(reason) => {
                let rule = self.rules.len();
                self.error.get_or_insert(ConfigurationError::InvalidPattern {
                    rule,
                    pattern: source.to_string(),
                    reason,
                });
            }
        }
        self
    }
}
