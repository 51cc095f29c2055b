//! EBNF rendering of a grammar
//!
//! The output is accepted by the grammar parser, and parsing it back yields the same rules,
//! declarations and code blocks. Declarations are only written when there is something to
//! declare, so a plain EBNF grammar prints as plain EBNF.

use std::fmt;

use super::{Alternative, Grammar, Production, Symbol, Terminal};

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let explicit_start = self
            .start
            .as_deref()
            .filter(|start| self.rules.first().map(|rule| rule.name.as_str()) != Some(*start));
        let has_declarations = !self.prologue.is_empty()
            || !self.tokens.is_empty()
            || !self.precedence.is_empty()
            || !self.types.is_empty()
            || explicit_start.is_some();

        if has_declarations || self.epilogue.is_some() {
            for code in &self.prologue {
                writeln!(f, "%{{\n{}\n%}}", code)?;
            }
            for token in &self.tokens {
                f.write_str("%token")?;
                if let Some(tag) = &token.type_tag {
                    write!(f, " <{}>", tag)?;
                }
                write!(f, " {}", token.name)?;
                if let Some(alias) = &token.alias {
                    write!(f, " {}", quoted(alias))?;
                }
                writeln!(f)?;
            }
            for level in &self.precedence {
                f.write_str(level.associativity.directive())?;
                for symbol in &level.symbols {
                    write!(f, " {}", terminal(symbol))?;
                }
                writeln!(f)?;
            }
            for decl in &self.types {
                writeln!(f, "%type <{}> {}", decl.type_tag, decl.name)?;
            }
            if let Some(start) = explicit_start {
                writeln!(f, "%start {}", start)?;
            }
            writeln!(f, "%%")?;
        }

        for (index, rule) in self.rules.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write_production(f, rule)?;
        }

        if let Some(epilogue) = &self.epilogue {
            writeln!(f, "%%")?;
            f.write_str(epilogue)?;
        }
        Ok(())
    }
}

fn write_production(f: &mut fmt::Formatter<'_>, rule: &Production) -> fmt::Result {
    let indent = " ".repeat(rule.name.chars().count() + 1);
    write!(f, "{} ::=", rule.name)?;
    for (index, alternative) in rule.alternatives.iter().enumerate() {
        if index > 0 {
            write!(f, "\n{}|", indent)?;
        }
        let body = alternative_text(alternative);
        if !body.is_empty() {
            write!(f, " {}", body)?;
        }
    }
    writeln!(f, "\n{};", indent)
}

fn alternative_text(alternative: &Alternative) -> String {
    let mut parts: Vec<String> = alternative.symbols.iter().map(symbol_text).collect();
    if alternative.symbols.is_empty() {
        parts.push("%empty".to_string());
    }
    if let Some(precedence) = &alternative.precedence {
        parts.push(format!("%prec {}", precedence));
    }
    if let Some(action) = &alternative.action {
        parts.push(format!("{{ {} }}", action));
    }
    parts.join(" ")
}

fn symbol_text(symbol: &Symbol) -> String {
    match symbol {
        Symbol::Terminal(inner) => terminal(inner),
        Symbol::Nonterminal(nonterminal) => nonterminal.name.clone(),
        Symbol::Group(alternatives) => {
            let inner: Vec<String> = alternatives.iter().map(alternative_text).collect();
            format!("( {} )", inner.join(" | "))
        }
        Symbol::Quantified { symbol, quantifier } => {
            format!("{}{}", symbol_text(symbol), quantifier.as_str())
        }
    }
}

fn terminal(terminal: &Terminal) -> String {
    match terminal {
        Terminal::Literal(text) => quoted(text),
        Terminal::Regex(pattern) => format!("/{}/", pattern),
        Terminal::Token(name) => name.clone(),
    }
}

/// Single-quoted, with the escapes the lexer understands
pub(crate) fn quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for ch in text.chars() {
        match ch {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch => out.push(ch),
        }
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::location::Location;
    use crate::grammar::model::{Quantifier, TypeDecl};

    #[test]
    fn test_quoted_escapes() {
        assert_eq!(quoted("it's"), r"'it\'s'");
        assert_eq!(quoted("a\\b\n"), r"'a\\b\n'");
    }

    #[test]
    fn test_plain_rules() {
        let mut grammar = Grammar::new("g.ebnf");
        grammar.add_alternatives(
            "list",
            Location::start(),
            vec![
                Alternative::new(vec![Symbol::quantified(
                    Symbol::Group(vec![
                        Alternative::new(vec![Symbol::literal("a")]),
                        Alternative::new(vec![Symbol::literal("b")]),
                    ]),
                    Quantifier::ZeroOrMore,
                )]),
                Alternative::default(),
            ],
        );

        assert_eq!(
            grammar.to_string(),
            "list ::= ( 'a' | 'b' )*\n     | %empty\n     ;\n"
        );
    }

    #[test]
    fn test_nonterminal_types_are_declared() {
        let mut grammar = Grammar::new("g.y");
        grammar.declare_type(TypeDecl {
            name: "expr".into(),
            type_tag: "node".into(),
            location: Location::start(),
        });
        grammar.add_alternatives(
            "expr",
            Location::new(20, 2, 1),
            vec![Alternative::new(vec![Symbol::literal("x")])],
        );

        assert_eq!(
            grammar.to_string(),
            "%type <node> expr\n%%\nexpr ::= 'x'\n     ;\n"
        );
    }
}
