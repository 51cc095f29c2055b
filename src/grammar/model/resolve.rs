//! Finalization
//!
//! Resolves every nonterminal reference once parsing is complete. A name that is a rule gets
//! its [RuleId]; a name declared with `%token` turns into a token terminal; anything else is
//! reported. The walk covers nested groups and quantified symbols but never follows a
//! reference, so recursive grammars finish in one pass.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::{Grammar, RuleId, Symbol, Terminal};
use crate::grammar::error::ResolutionError;

struct Resolver<'g> {
    index: &'g HashMap<String, RuleId>,
    tokens: HashSet<&'g str>,
    source_name: Arc<str>,
    reported: HashSet<String>,
    errors: Vec<ResolutionError>,
}

impl Grammar {
    /// Resolve references and default the start rule to the first rule.
    ///
    /// On failure every unresolved name is returned, once each, in order of first use. The
    /// grammar is still usable: resolved references keep their ids and the rest stay `None`.
    pub fn finalize(&mut self) -> Result<(), Vec<ResolutionError>> {
        if self.start.is_none() {
            self.start = self.rules.first().map(|rule| rule.name.clone());
        }

        let Grammar {
            source_name,
            tokens,
            rules,
            index,
            ..
        } = self;

        let mut resolver = Resolver {
            index,
            tokens: tokens.iter().map(|token| token.name.as_str()).collect(),
            source_name: Arc::from(source_name.as_str()),
            reported: HashSet::new(),
            errors: Vec::new(),
        };

        for rule in rules.iter_mut() {
            for alternative in rule.alternatives.iter_mut() {
                for symbol in alternative.symbols.iter_mut() {
                    resolver.symbol(symbol);
                }
            }
        }

        if resolver.errors.is_empty() {
            Ok(())
        } else {
            Err(resolver.errors)
        }
    }

    /// Whether every reference points at a rule
    pub fn is_resolved(&self) -> bool {
        fn resolved(symbol: &Symbol) -> bool {
            match symbol {
                Symbol::Terminal(_) => true,
                Symbol::Nonterminal(nonterminal) => nonterminal.rule.is_some(),
                Symbol::Group(alternatives) => alternatives
                    .iter()
                    .all(|alternative| alternative.symbols.iter().all(resolved)),
                Symbol::Quantified { symbol, .. } => resolved(symbol),
            }
        }

        self.rules.iter().all(|rule| {
            rule.alternatives
                .iter()
                .all(|alternative| alternative.symbols.iter().all(resolved))
        })
    }
}

impl Resolver<'_> {
    fn symbol(&mut self, symbol: &mut Symbol) {
        match symbol {
            Symbol::Terminal(_) => {}
            Symbol::Group(alternatives) => {
                for alternative in alternatives.iter_mut() {
                    for inner in alternative.symbols.iter_mut() {
                        self.symbol(inner);
                    }
                }
            }
            Symbol::Quantified { symbol, .. } => self.symbol(symbol),
            Symbol::Nonterminal(nonterminal) => {
                if let Some(id) = self.index.get(&nonterminal.name) {
                    nonterminal.rule = Some(*id);
                } else if self.tokens.contains(nonterminal.name.as_str()) {
                    *symbol = Symbol::Terminal(Terminal::Token(nonterminal.name.clone()));
                } else if self.reported.insert(nonterminal.name.clone()) {
                    self.errors.push(ResolutionError {
                        name: nonterminal.name.clone(),
                        source_name: Arc::clone(&self.source_name),
                        location: nonterminal.location,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::location::Location;
    use crate::grammar::model::{Alternative, Quantifier, TokenDecl};

    fn reference(name: &str, offset: usize) -> Symbol {
        Symbol::nonterminal(name, Location::new(offset, 1, offset + 1))
    }

    #[test]
    fn test_recursive_rule_resolves() {
        let mut grammar = Grammar::new("g.y");
        grammar.add_alternatives(
            "list",
            Location::start(),
            vec![
                Alternative::new(vec![reference("list", 8), Symbol::literal(",")]),
                Alternative::default(),
            ],
        );

        assert!(grammar.finalize().is_ok());
        assert!(grammar.is_resolved());
        assert_eq!(grammar.start.as_deref(), Some("list"));
        match &grammar.rules[0].alternatives[0].symbols[0] {
            Symbol::Nonterminal(nonterminal) => assert_eq!(nonterminal.rule, Some(RuleId(0))),
            other => panic!("expected a nonterminal, got {:?}", other),
        }
    }

    #[test]
    fn test_declared_token_becomes_terminal() {
        let mut grammar = Grammar::new("g.y");
        grammar.declare_token(TokenDecl {
            name: "NUMBER".into(),
            type_tag: None,
            alias: None,
            location: Location::start(),
        });
        grammar.add_alternatives(
            "expr",
            Location::new(20, 3, 1),
            vec![Alternative::new(vec![Symbol::quantified(
                reference("NUMBER", 28),
                Quantifier::OneOrMore,
            )])],
        );

        assert!(grammar.finalize().is_ok());
        assert_eq!(
            grammar.rules[0].alternatives[0].symbols[0],
            Symbol::quantified(
                Symbol::Terminal(Terminal::Token("NUMBER".into())),
                Quantifier::OneOrMore
            )
        );
    }

    #[test]
    fn test_unresolved_names_reported_once_in_order() {
        let mut grammar = Grammar::new("g.y");
        grammar.add_alternatives(
            "a",
            Location::start(),
            vec![
                Alternative::new(vec![reference("C", 5), reference("B", 7)]),
                Alternative::new(vec![Symbol::Group(vec![Alternative::new(vec![
                    reference("B", 12),
                ])])]),
            ],
        );

        let errors = grammar.finalize().unwrap_err();
        let names: Vec<_> = errors.iter().map(|err| err.name.as_str()).collect();
        assert_eq!(names, vec!["C", "B"]);
        assert_eq!(errors[1].location.offset, 7);
        assert!(!grammar.is_resolved());
    }
}
