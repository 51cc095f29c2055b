//! EBNF and yacc grammar tokens
//!
//! Both notations share one token set: `::=` and `:` both lex as Define, and the yacc-only
//! pieces (directives, `%%`, code blocks, actions) simply never appear in plain EBNF input.

use super::super::common::ConfigurationError;
use super::super::rules::RuleSet;
use crate::grammar::token::TokenKind;

pub(super) fn rules() -> Result<RuleSet, ConfigurationError> {
    RuleSet::builder()
        .pattern(r"[ \t\x0B\x0C\r]+", TokenKind::Whitespace)
        .literal("\n", TokenKind::Newline)
        .pattern(r"//[^\n]*", TokenKind::Comment)
        .block("/*", "*/", TokenKind::Comment)
        .pattern(r"#[^\n]*", TokenKind::Comment)
        .delimited("%{", "%}", false, TokenKind::Code)
        .literal("%%", TokenKind::Mark)
        .pattern(r"%[A-Za-z_][A-Za-z0-9_-]*", TokenKind::Directive)
        .literal("::=", TokenKind::Define)
        .literal(":", TokenKind::Define)
        .pattern(r"<[A-Za-z_][A-Za-z0-9_*.:]*>", TokenKind::TypeTag)
        .pattern(r"'(?:[^'\\\n]|\\.)*'", TokenKind::Literal)
        .pattern(r#""(?:[^"\\\n]|\\.)*""#, TokenKind::Literal)
        .pattern(r"/(?:[^/\\\n]|\\.)+/", TokenKind::Regexp)
        .delimited("{", "}", true, TokenKind::Action)
        .literal("|", TokenKind::Pipe)
        .literal("(", TokenKind::LeftParen)
        .literal(")", TokenKind::RightParen)
        .literal("*", TokenKind::Star)
        .literal("+", TokenKind::Plus)
        .literal("?", TokenKind::Question)
        .literal(";", TokenKind::Semicolon)
        .pattern(r"[0-9]+", TokenKind::Number)
        .pattern(r"[A-Za-z_][A-Za-z0-9_.-]*", TokenKind::Identifier)
        .build()
}
