//! Rule matchers
//!
//! A matcher looks at the unconsumed input and reports how many bytes of it the rule accepts.
//! Every matcher is anchored at the start of the input, and a successful match is never empty:
//! rules that could match nothing are rejected when the rule set is built.
//!
//! Block scans that run off the end of the input are remembered in a [ScanMemo], so a buffer
//! full of stray openers is still lexed in linear time.

use regex::Regex;
use std::collections::HashMap;
use std::fmt;

use super::dialects::ECMASCRIPT_PUNCTUATORS;

/// Character classes used by class matchers and exposed as predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    Alpha,
    DecimalDigit,
    HexDigit,
    OctalDigit,
    IdentifierChar,
    IdentifierFirstChar,
    LineTerminator,
    Whitespace,
    QuoteChar,
    RegExpChar,
    PunctuatorChar,
}

const PUNCTUATOR_CHARS: &str = "=.-%}>,*[<!/]~&(;?|):+^{@";

impl CharClass {
    pub fn contains(self, ch: char) -> bool {
        match self {
            CharClass::Alpha => is_alpha_char(ch),
            CharClass::DecimalDigit => is_decimal_digit(ch),
            CharClass::HexDigit => is_hex_digit(ch),
            CharClass::OctalDigit => is_octal_digit(ch),
            CharClass::IdentifierChar => is_identifier_char(ch),
            CharClass::IdentifierFirstChar => is_identifier_first_char(ch),
            CharClass::LineTerminator => is_line_terminator(ch),
            CharClass::Whitespace => is_whitespace(ch),
            CharClass::QuoteChar => is_quote_char(ch),
            CharClass::RegExpChar => is_regexp_char(ch),
            CharClass::PunctuatorChar => is_punctuator_char(ch),
        }
    }

    /// Byte length of the longest run of class members at the start of `input`
    pub fn run_len(self, input: &str) -> usize {
        input
            .char_indices()
            .find(|&(_, ch)| !self.contains(ch))
            .map(|(index, _)| index)
            .unwrap_or(input.len())
    }
}

/// ASCII letters
pub fn is_alpha_char(ch: char) -> bool {
    ch.is_ascii_alphabetic()
}

pub fn is_decimal_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

pub fn is_hex_digit(ch: char) -> bool {
    ch.is_ascii_hexdigit()
}

pub fn is_octal_digit(ch: char) -> bool {
    ('0'..='7').contains(&ch)
}

/// Letters, digits, `$` and `_`
pub fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '$' || ch == '_'
}

/// Letters, `$` and `_`
pub fn is_identifier_first_char(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '$' || ch == '_'
}

pub fn is_line_terminator(ch: char) -> bool {
    ch == '\r' || ch == '\n'
}

/// Tab, vertical tab, form feed and space. Line terminators are not whitespace.
pub fn is_whitespace(ch: char) -> bool {
    matches!(ch, '\t' | '\u{0B}' | '\u{0C}' | ' ')
}

pub fn is_quote_char(ch: char) -> bool {
    matches!(ch, '"' | '\'' | '`')
}

/// The character that opens and closes a regular expression literal
pub fn is_regexp_char(ch: char) -> bool {
    ch == '/'
}

pub fn is_punctuator_char(ch: char) -> bool {
    PUNCTUATOR_CHARS.contains(ch)
}

/// Whether `text` is exactly one ECMAScript punctuator, such as `>>>=` or `?.`
pub fn is_punctuator(text: &str) -> bool {
    ECMASCRIPT_PUNCTUATORS.contains(&text)
}

/// How a rule recognizes its token
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Exact text
    Literal(String),
    /// A run of one or more characters of the class
    Class(CharClass),
    /// A regular expression, anchored at the cursor
    Pattern(Pattern),
    /// A block from `open` to the matching `close`. Quoted strings and C comments inside the
    /// block are skipped, and with `nested` inner `open`/`close` pairs must balance.
    Delimited {
        open: String,
        close: String,
        nested: bool,
    },
    /// From `open` to the first `close` after it, whatever lies between
    Block { open: String, close: String },
}

/// Remembers block scans that failed, per rule and absolute offset
///
/// A failed scan of a [Matcher::Delimited] block also settles every opener it stepped over,
/// and a failed [Matcher::Block] scan settles every later opener of the same rule.
#[derive(Debug, Default)]
pub struct ScanMemo {
    /// End offset of the block opened at `(rule, offset)`, `None` when it never closes
    openers: HashMap<(usize, usize), Option<usize>>,
    /// Offset from which a rule's block never closes
    exhausted: HashMap<usize, usize>,
}

impl ScanMemo {
    pub fn clear(&mut self) {
        self.openers.clear();
        self.exhausted.clear();
    }
}

/// A compiled pattern with its source and minimum match length
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
    min_len: Option<usize>,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, String> {
        let hir = regex_syntax::parse(source).map_err(|err| err.to_string())?;
        let regex = Regex::new(&format!(r"\A(?:{})", source)).map_err(|err| err.to_string())?;
        Ok(Self {
            source: source.to_string(),
            regex,
            min_len: hir.properties().minimum_len(),
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Shortest match in bytes, or `None` when the pattern can never match
    pub fn min_len(&self) -> Option<usize> {
        self.min_len
    }

    fn match_len(&self, input: &str) -> Option<usize> {
        self.regex.find(input).map(|found| found.end())
    }
}

impl Matcher {
    pub fn literal(text: impl Into<String>) -> Self {
        Matcher::Literal(text.into())
    }

    pub fn pattern(source: &str) -> Result<Self, String> {
        Pattern::new(source).map(Matcher::Pattern)
    }

    pub fn delimited(open: impl Into<String>, close: impl Into<String>, nested: bool) -> Self {
        Matcher::Delimited {
            open: open.into(),
            close: close.into(),
            nested,
        }
    }

    pub fn block(open: impl Into<String>, close: impl Into<String>) -> Self {
        Matcher::Block {
            open: open.into(),
            close: close.into(),
        }
    }

    /// Whether the matcher could accept zero bytes
    pub fn can_match_empty(&self) -> bool {
        match self {
            Matcher::Literal(text) => text.is_empty(),
            Matcher::Class(_) => false,
            Matcher::Pattern(pattern) => pattern.min_len() == Some(0),
            Matcher::Delimited { open, close, .. } | Matcher::Block { open, close } => {
                open.is_empty() || close.is_empty()
            }
        }
    }

    /// Byte length of the match at the start of `input`, if any. Never `Some(0)` for a
    /// matcher that passed [Matcher::can_match_empty].
    pub fn match_len(&self, input: &str) -> Option<usize> {
        self.match_len_cached(input, 0, 0, &mut ScanMemo::default())
    }

    /// [Matcher::match_len] for rule number `rule`, with `input` starting at byte `offset` of
    /// the buffer `memo` belongs to
    pub fn match_len_cached(
        &self,
        input: &str,
        offset: usize,
        rule: usize,
        memo: &mut ScanMemo,
    ) -> Option<usize> {
        let len = match self {
            Matcher::Literal(text) => input.starts_with(text.as_str()).then(|| text.len()),
            Matcher::Class(class) => Some(class.run_len(input)),
            Matcher::Pattern(pattern) => pattern.match_len(input),
            Matcher::Delimited {
                open,
                close,
                nested,
            } => {
                if !input.starts_with(open.as_str()) {
                    return None;
                }
                if let Some(known) = memo.openers.get(&(rule, offset)) {
                    return known.map(|end| end - offset);
                }
                let mut openers = Vec::new();
                let len = delimited_len(input, open, close, *nested, &mut openers);
                if len.is_none() {
                    memo.openers.insert((rule, offset), None);
                    memo.openers.extend(openers.into_iter().map(|(start, end)| {
                        ((rule, offset + start), end.map(|end| offset + end))
                    }));
                }
                len
            }
            Matcher::Block { open, close } => {
                let body = input.strip_prefix(open.as_str())?;
                if memo.exhausted.get(&rule).map_or(false, |&from| from <= offset) {
                    return None;
                }
                let len = body.find(close.as_str()).map(|end| open.len() + end + close.len());
                if len.is_none() {
                    let from = memo.exhausted.entry(rule).or_insert(offset);
                    *from = (*from).min(offset);
                }
                len
            }
        }?;
        (len > 0).then_some(len)
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Literal(text) => write!(f, "'{}'", text.escape_debug()),
            Matcher::Class(class) => write!(f, "{:?}+", class),
            Matcher::Pattern(pattern) => write!(f, "/{}/", pattern.source()),
            Matcher::Delimited { open, close, .. } | Matcher::Block { open, close } => {
                write!(f, "{} ... {}", open, close)
            }
        }
    }
}

/// Length of the block opening at the start of `input`.
///
/// On failure `openers` holds every inner opener the scan stepped over, with the end of its
/// own block or `None`: a scan started there would have gone exactly the same way.
fn delimited_len(
    input: &str,
    open: &str,
    close: &str,
    nested: bool,
    openers: &mut Vec<(usize, Option<usize>)>,
) -> Option<usize> {
    if !input.starts_with(open) {
        return None;
    }

    // Starts of the blocks still open, innermost last
    let mut stack = vec![0];
    let mut comments_close = true;
    let mut index = open.len();
    while index < input.len() {
        let rest = &input[index..];
        if rest.starts_with(close) {
            index += close.len();
            match stack.pop() {
                Some(start) if !stack.is_empty() => openers.push((start, Some(index))),
                _ => return Some(index),
            }
        } else if rest.starts_with(open) {
            if nested {
                stack.push(index);
            } else {
                openers.push((index, None));
            }
            index += open.len();
        } else {
            index += skipped_len(rest, &mut comments_close);
        }
    }
    openers.extend(stack.into_iter().skip(1).map(|start| (start, None)));
    None
}

/// Bytes to step over at `rest` inside a block: a whole comment or quoted string, otherwise
/// one character. `comments_close` goes false once a `/*` is found without its `*/`.
fn skipped_len(rest: &str, comments_close: &mut bool) -> usize {
    if rest.starts_with("//") {
        return rest.find('\n').unwrap_or(rest.len());
    }
    if *comments_close && rest.starts_with("/*") {
        match rest[2..].find("*/") {
            Some(end) => return end + 4,
            None => *comments_close = false,
        }
    }
    match rest.chars().next() {
        Some(quote @ ('"' | '\'')) => quoted_len(rest, quote).unwrap_or(1),
        Some(ch) => ch.len_utf8(),
        None => 1,
    }
}

/// Length of a quoted run starting at `rest`, ending at the first unescaped `quote` on the
/// same line. `None` when the line ends first, in which case the quote is plain text.
fn quoted_len(rest: &str, quote: char) -> Option<usize> {
    let mut escaped = false;
    for (index, ch) in rest.char_indices().skip(1) {
        match ch {
            '\n' => return None,
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            _ if ch == quote => return Some(index + ch.len_utf8()),
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_char_class_predicates() {
        assert!(is_whitespace('\t'));
        assert!(!is_whitespace('\n'));
        assert!(is_line_terminator('\r'));
        assert!(is_identifier_first_char('$'));
        assert!(!is_identifier_first_char('1'));
        assert!(is_identifier_char('1'));
        assert!(is_octal_digit('7'));
        assert!(!is_octal_digit('8'));
        assert!(is_hex_digit('F'));
        assert!(is_quote_char('`'));
        assert!(is_punctuator_char('@'));
        assert!(!is_punctuator_char('#'));
    }

    #[rstest]
    #[case('/', true)]
    #[case('\\', false)]
    #[case('*', false)]
    #[case('a', false)]
    fn test_is_regexp_char(#[case] ch: char, #[case] expected: bool) {
        assert_eq!(is_regexp_char(ch), expected);
        assert_eq!(CharClass::RegExpChar.contains(ch), expected);
    }

    #[rstest]
    #[case(">>>=", true)]
    #[case("?.", true)]
    #[case("=>", true)]
    #[case("{", true)]
    #[case("@", true)]
    #[case("", false)]
    #[case("=>>", false)]
    #[case("a", false)]
    #[case("<>", false)]
    fn test_is_punctuator(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(is_punctuator(text), expected);
    }

    #[test]
    fn test_class_run() {
        let matcher = Matcher::Class(CharClass::DecimalDigit);
        assert_eq!(matcher.match_len("123abc"), Some(3));
        assert_eq!(matcher.match_len("abc"), None);
        assert_eq!(matcher.match_len("42"), Some(2));
    }

    #[test]
    fn test_literal() {
        let matcher = Matcher::literal("::=");
        assert_eq!(matcher.match_len("::= x"), Some(3));
        assert_eq!(matcher.match_len(":x"), None);
    }

    #[test]
    fn test_pattern_is_anchored() {
        let matcher = Matcher::pattern("[0-9]+").unwrap();
        assert_eq!(matcher.match_len("12 34"), Some(2));
        assert_eq!(matcher.match_len("x12"), None);
    }

    #[test]
    fn test_pattern_alternation_is_anchored_as_a_whole() {
        let matcher = Matcher::pattern("a|b").unwrap();
        assert_eq!(matcher.match_len("xb"), None);
    }

    #[test]
    fn test_pattern_min_len() {
        assert!(Matcher::pattern("a*").unwrap().can_match_empty());
        assert!(Matcher::pattern("b?").unwrap().can_match_empty());
        assert!(!Matcher::pattern("a+").unwrap().can_match_empty());
        assert!(Matcher::literal("").can_match_empty());
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(Matcher::pattern("(unclosed").is_err());
    }

    #[test]
    fn test_delimited_nested() {
        let matcher = Matcher::delimited("{", "}", true);
        assert_eq!(matcher.match_len("{ a { b } c } d"), Some(13));
        assert_eq!(matcher.match_len("{ unterminated"), None);
    }

    #[test]
    fn test_delimited_skips_quotes() {
        let matcher = Matcher::delimited("{", "}", true);
        let input = r#"{ puts("}"); } rest"#;
        assert_eq!(matcher.match_len(input), Some(14));
    }

    #[test]
    fn test_delimited_unpaired_quote_is_text() {
        let matcher = Matcher::delimited("{", "}", true);
        let input = "{ /* don't */ x }";
        assert_eq!(matcher.match_len(input), Some(input.len()));
    }

    #[rstest]
    #[case("{ /* } */ x = 1; } rest", 18)]
    #[case("{ x; // }\n} rest", 11)]
    #[case("{ /* { */ } rest", 11)]
    fn test_delimited_skips_comments(#[case] input: &str, #[case] len: usize) {
        let matcher = Matcher::delimited("{", "}", true);
        assert_eq!(matcher.match_len(input), Some(len));
    }

    #[test]
    fn test_delimited_unclosed_comment_is_text() {
        let matcher = Matcher::delimited("{", "}", true);
        assert_eq!(matcher.match_len("{ a /* b } c"), Some(10));
        assert_eq!(matcher.match_len("{ a /* b } c /* d"), Some(10));
    }

    #[test]
    fn test_delimited_failure_settles_inner_openers() {
        let matcher = Matcher::delimited("{", "}", true);
        let mut memo = ScanMemo::default();
        assert_eq!(matcher.match_len_cached("{ { } {", 0, 0, &mut memo), None);
        assert_eq!(memo.openers.get(&(0, 2)), Some(&Some(5)));
        assert_eq!(memo.openers.get(&(0, 6)), Some(&None));
        assert_eq!(matcher.match_len_cached("{ } {", 2, 0, &mut memo), Some(3));
        assert_eq!(matcher.match_len_cached("{", 6, 0, &mut memo), None);
    }

    #[test]
    fn test_flat_failure_settles_inner_openers() {
        let matcher = Matcher::delimited("%{", "%}", false);
        let mut memo = ScanMemo::default();
        assert_eq!(matcher.match_len_cached("%{ a %{ b", 0, 0, &mut memo), None);
        assert_eq!(memo.openers.get(&(0, 5)), Some(&None));
    }

    #[test]
    fn test_block() {
        let matcher = Matcher::block("/*", "*/");
        assert_eq!(matcher.match_len("/* a { */ b */"), Some(9));
        assert_eq!(matcher.match_len("/**/"), Some(4));
        assert_eq!(matcher.match_len("/*/"), None);
        assert_eq!(matcher.match_len("a /* */"), None);
    }

    #[test]
    fn test_block_failure_settles_later_openers() {
        let matcher = Matcher::block("/*", "*/");
        let mut memo = ScanMemo::default();
        assert_eq!(matcher.match_len_cached("/* x /* y", 0, 3, &mut memo), None);
        assert_eq!(memo.exhausted.get(&3), Some(&0));
        assert_eq!(matcher.match_len_cached("/* y", 5, 3, &mut memo), None);
        assert_eq!(matcher.match_len_cached("/* y */", 5, 4, &mut memo), Some(7));
    }

    #[test]
    fn test_delimited_flat() {
        let matcher = Matcher::delimited("%{", "%}", false);
        let input = "%{\n#include <stdio.h>\n%}\n%%";
        assert_eq!(matcher.match_len(input), Some(input.len() - 3));
    }
}
