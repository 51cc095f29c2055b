//! C11 tokens

use super::super::common::ConfigurationError;
use super::super::rules::{Guard, RuleSet};
use crate::grammar::token::TokenKind;

const KEYWORDS: &[&str] = &[
    "auto",
    "break",
    "case",
    "char",
    "const",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "enum",
    "extern",
    "float",
    "for",
    "goto",
    "if",
    "inline",
    "int",
    "long",
    "register",
    "restrict",
    "return",
    "short",
    "signed",
    "sizeof",
    "static",
    "struct",
    "switch",
    "typedef",
    "union",
    "unsigned",
    "void",
    "volatile",
    "while",
    "_Alignas",
    "_Alignof",
    "_Atomic",
    "_Bool",
    "_Complex",
    "_Generic",
    "_Imaginary",
    "_Noreturn",
    "_Static_assert",
    "_Thread_local",
];

const PUNCTUATORS: &[&str] = &[
    "...", "<<=", ">>=", "->", "++", "--", "<<", ">>", "<=", ">=", "==", "!=", "&&", "||", "*=",
    "/=", "%=", "+=", "-=", "&=", "^=", "|=", "##", "[", "]", "(", ")", "{", "}", ".", "&", "*",
    "+", "-", "~", "!", "/", "%", "<", ">", "^", "|", "?", ":", ";", "=", ",", "#",
];

pub(super) fn rules() -> Result<RuleSet, ConfigurationError> {
    RuleSet::builder()
        .pattern(r"[ \t\x0B\x0C]+", TokenKind::Whitespace)
        .pattern(r"\r?\n|\r", TokenKind::Newline)
        .pattern(r"//[^\n]*", TokenKind::Comment)
        .block("/*", "*/", TokenKind::Comment)
        .guarded_pattern(
            r"#(?:[^\n\\]|\\(?s:.))*",
            TokenKind::Preprocessor,
            Guard::AtLineStart,
        )
        .pattern(r"(?:u8|[LuU])?'(?:[^'\\\n]|\\.)+'", TokenKind::Char)
        .pattern(r#"(?:u8|[LuU])?"(?:[^"\\\n]|\\.)*""#, TokenKind::String)
        .pattern(
            r"0[xX](?:[0-9a-fA-F]+(?:\.[0-9a-fA-F]*)?|\.[0-9a-fA-F]+)(?:[pP][+-]?[0-9]+)?[uUlLfF]*",
            TokenKind::Number,
        )
        .pattern(
            r"(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?[uUlLfF]*",
            TokenKind::Number,
        )
        .pattern(r"[A-Za-z_][A-Za-z0-9_]*", TokenKind::Identifier)
        .literals(PUNCTUATORS, TokenKind::Punctuator)
        .keywords(KEYWORDS, TokenKind::Keyword)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::lexing::{tokenize, Dialect, LexerOptions};

    fn lex(source: &str) -> Vec<(TokenKind, &str)> {
        tokenize(source, "test.c", &LexerOptions::for_dialect(Dialect::C))
            .into_iter()
            .filter(|token| !token.is_eof())
            .map(|token| (token.kind, token.text))
            .collect()
    }

    #[test]
    fn test_preprocessor_lines() {
        let tokens = lex("#include <stdio.h>\n#define MAX(a, b) \\\n  ((a) > (b))\nint x;");
        assert_eq!(tokens[0], (TokenKind::Preprocessor, "#include <stdio.h>"));
        assert_eq!(
            tokens[1],
            (TokenKind::Preprocessor, "#define MAX(a, b) \\\n  ((a) > (b))")
        );
        assert_eq!(tokens[2], (TokenKind::Keyword, "int"));
    }

    #[test]
    fn test_hash_inside_a_line_is_a_punctuator() {
        let tokens = lex("x # y");
        assert_eq!(tokens[1], (TokenKind::Punctuator, "#"));
    }

    #[test]
    fn test_prefixed_literals() {
        assert_eq!(
            lex(r#"L'a' u8"text" '\n' U"wide""#),
            vec![
                (TokenKind::Char, "L'a'"),
                (TokenKind::String, r#"u8"text""#),
                (TokenKind::Char, r"'\n'"),
                (TokenKind::String, r#"U"wide""#)
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            lex("0x1fUL 1.5e10f 42 .5"),
            vec![
                (TokenKind::Number, "0x1fUL"),
                (TokenKind::Number, "1.5e10f"),
                (TokenKind::Number, "42"),
                (TokenKind::Number, ".5")
            ]
        );
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            lex("_Bool boolean"),
            vec![
                (TokenKind::Keyword, "_Bool"),
                (TokenKind::Identifier, "boolean")
            ]
        );
    }

    #[test]
    fn test_punctuators() {
        assert_eq!(
            lex("p->x <<= 2"),
            vec![
                (TokenKind::Identifier, "p"),
                (TokenKind::Punctuator, "->"),
                (TokenKind::Identifier, "x"),
                (TokenKind::Punctuator, "<<="),
                (TokenKind::Number, "2")
            ]
        );
    }
}
