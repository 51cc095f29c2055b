//! ECMAScript tokens

use super::super::common::ConfigurationError;
use super::super::rules::{Guard, RuleSet};
use crate::grammar::token::TokenKind;

const KEYWORDS: &[&str] = &[
    "await",
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "enum",
    "export",
    "extends",
    "finally",
    "for",
    "function",
    "if",
    "implements",
    "import",
    "in",
    "instanceof",
    "interface",
    "let",
    "new",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "static",
    "super",
    "switch",
    "this",
    "throw",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
    "yield",
];

pub(crate) const PUNCTUATORS: &[&str] = &[
    ">>>=", "...", "===", "!==", "**=", "<<=", ">>=", ">>>", "&&=", "||=", "??=", "=>", "==",
    "!=", "<=", ">=", "&&", "||", "??", "?.", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=",
    "|=", "^=", "<<", ">>", "**", "{", "}", "(", ")", "[", "]", ";", ",", "<", ">", "+", "-",
    "*", "/", "%", "&", "|", "^", "!", "~", "?", ":", "=", ".", "@", "#",
];

pub(super) fn rules() -> Result<RuleSet, ConfigurationError> {
    RuleSet::builder()
        .pattern(r"[\t\x0B\x0C \x{00A0}\x{FEFF}]+", TokenKind::Whitespace)
        .pattern(r"\r\n|[\n\r\x{2028}\x{2029}]", TokenKind::Newline)
        .pattern(r"//[^\n\r]*", TokenKind::Comment)
        .block("/*", "*/", TokenKind::Comment)
        .pattern(r"`(?:[^`\\]|\\(?s:.))*`", TokenKind::Template)
        .pattern(r#""(?:[^"\\\n\r]|\\(?s:.))*""#, TokenKind::String)
        .pattern(r"'(?:[^'\\\n\r]|\\(?s:.))*'", TokenKind::String)
        .pattern(r"0[xX][0-9a-fA-F](?:_?[0-9a-fA-F])*n?", TokenKind::Number)
        .pattern(r"0[oO][0-7](?:_?[0-7])*n?", TokenKind::Number)
        .pattern(r"0[bB][01](?:_?[01])*n?", TokenKind::Number)
        .pattern(
            r"(?:[0-9][0-9_]*(?:\.[0-9_]*)?|\.[0-9][0-9_]*)(?:[eE][+-]?[0-9]+)?n?",
            TokenKind::Number,
        )
        .pattern(
            r"[\p{XID_Start}$_][\p{XID_Continue}$\x{200C}\x{200D}]*",
            TokenKind::Identifier,
        )
        .guarded_pattern(
            r"/(?:[^/\\\[\n\r]|\\[^\n\r]|\[(?:[^\]\\\n\r]|\\[^\n\r])*\])+/[A-Za-z]*",
            TokenKind::Regexp,
            Guard::NotAfterOperand,
        )
        .literals(PUNCTUATORS, TokenKind::Punctuator)
        .keywords(KEYWORDS, TokenKind::Keyword)
        .keywords(&["true", "false"], TokenKind::Boolean)
        .keywords(&["null"], TokenKind::Null)
        .build()
}
