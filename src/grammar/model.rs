//! Grammar model
//!
//!     The parser produces a [Grammar]: an arena of productions addressed by [RuleId], plus the
//!     yacc declarations that came with them (tokens, precedence levels, prologue code and the
//!     epilogue). Nonterminal references are stored by name and resolved to arena indices by
//!     [Grammar::finalize], so forward and recursive references never need the target to exist
//!     yet and walking the model never follows a reference.
//!
//!     Rule names are unique. Declaring a rule a second time appends its alternatives to the
//!     first declaration, as yacc does.
//!
//!     All model types serialize with serde. The name index is rebuilt on deserialization.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::grammar::location::Location;

mod display;
mod resolve;

/// Index of a production in [Grammar::rules]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(pub usize);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "GrammarData")]
pub struct Grammar {
    pub source_name: String,
    /// The start rule. Filled in with the first rule by finalization when not declared.
    pub start: Option<String>,
    pub tokens: Vec<TokenDecl>,
    pub precedence: Vec<PrecedenceLevel>,
    /// `%type` tags given to names that are not tokens, usually nonterminals
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<TypeDecl>,
    pub rules: Vec<Production>,
    /// `%{ ... %}` blocks, without their delimiters
    pub prologue: Vec<String>,
    /// Everything after the second `%%`, verbatim
    pub epilogue: Option<String>,
    #[serde(skip)]
    index: HashMap<String, RuleId>,
}

/// Serialized shape of [Grammar]
#[derive(Deserialize)]
struct GrammarData {
    source_name: String,
    start: Option<String>,
    #[serde(default)]
    tokens: Vec<TokenDecl>,
    #[serde(default)]
    precedence: Vec<PrecedenceLevel>,
    #[serde(default)]
    types: Vec<TypeDecl>,
    rules: Vec<Production>,
    #[serde(default)]
    prologue: Vec<String>,
    #[serde(default)]
    epilogue: Option<String>,
}

impl From<GrammarData> for Grammar {
    fn from(data: GrammarData) -> Self {
        let index = data
            .rules
            .iter()
            .enumerate()
            .map(|(id, rule)| (rule.name.clone(), RuleId(id)))
            .collect();
        Self {
            source_name: data.source_name,
            start: data.start,
            tokens: data.tokens,
            precedence: data.precedence,
            types: data.types,
            rules: data.rules,
            prologue: data.prologue,
            epilogue: data.epilogue,
            index,
        }
    }
}

/// A named rule with its alternatives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Production {
    pub name: String,
    pub alternatives: Vec<Alternative>,
    /// Where the rule is first declared
    pub location: Location,
}

/// One right-hand side. No symbols means epsilon.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Alternative {
    pub symbols: Vec<Symbol>,
    /// Text of the `{ ... }` action, without the braces
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Symbol named by `%prec`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precedence: Option<String>,
}

impl Alternative {
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Self {
            symbols,
            ..Self::default()
        }
    }

    pub fn is_epsilon(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Symbol {
    Terminal(Terminal),
    Nonterminal(Nonterminal),
    /// A parenthesized alternation, inline
    Group(Vec<Alternative>),
    Quantified {
        symbol: Box<Symbol>,
        quantifier: Quantifier,
    },
}

impl Symbol {
    pub fn literal(text: impl Into<String>) -> Self {
        Symbol::Terminal(Terminal::Literal(text.into()))
    }

    pub fn nonterminal(name: impl Into<String>, location: Location) -> Self {
        Symbol::Nonterminal(Nonterminal::new(name, location))
    }

    pub fn quantified(symbol: Symbol, quantifier: Quantifier) -> Self {
        Symbol::Quantified {
            symbol: Box::new(symbol),
            quantifier,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Terminal {
    /// A quoted string, unescaped
    Literal(String),
    /// The body of a `/regex/` terminal
    Regex(String),
    /// A name declared with `%token`
    Token(String),
}

/// A reference to a rule by name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Nonterminal {
    pub name: String,
    /// Set by finalization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<RuleId>,
    pub location: Location,
}

impl Nonterminal {
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            rule: None,
            location,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantifier {
    /// `?`
    Optional,
    /// `*`
    ZeroOrMore,
    /// `+`
    OneOrMore,
}

impl Quantifier {
    pub fn as_str(self) -> &'static str {
        match self {
            Quantifier::Optional => "?",
            Quantifier::ZeroOrMore => "*",
            Quantifier::OneOrMore => "+",
        }
    }
}

/// A `%token` declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDecl {
    pub name: String,
    /// `<tag>` from `%token <tag>` or `%type <tag>`, without the angle brackets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_tag: Option<String>,
    /// A quoted alias, as in `%token PLUS "+"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub location: Location,
}

/// A `%type <tag> name` for a name that is not a declared token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    pub type_tag: String,
    pub location: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Associativity {
    Left,
    Right,
    NonAssoc,
}

impl Associativity {
    pub fn directive(self) -> &'static str {
        match self {
            Associativity::Left => "%left",
            Associativity::Right => "%right",
            Associativity::NonAssoc => "%nonassoc",
        }
    }
}

/// One `%left`/`%right`/`%nonassoc` line; later levels bind tighter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecedenceLevel {
    pub associativity: Associativity,
    pub symbols: Vec<Terminal>,
}

impl Grammar {
    pub fn new(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            start: None,
            tokens: Vec::new(),
            precedence: Vec::new(),
            types: Vec::new(),
            rules: Vec::new(),
            prologue: Vec::new(),
            epilogue: None,
            index: HashMap::new(),
        }
    }

    pub fn rule_id(&self, name: &str) -> Option<RuleId> {
        self.index.get(name).copied()
    }

    pub fn rule(&self, name: &str) -> Option<&Production> {
        self.rule_id(name).map(|id| self.production(id))
    }

    /// The production behind a resolved id
    ///
    /// # Panics
    ///
    /// When `id` does not come from this grammar.
    pub fn production(&self, id: RuleId) -> &Production {
        &self.rules[id.0]
    }

    pub fn start_rule(&self) -> Option<&Production> {
        self.start.as_deref().and_then(|name| self.rule(name))
    }

    pub fn token(&self, name: &str) -> Option<&TokenDecl> {
        self.tokens.iter().find(|token| token.name == name)
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.name.as_str())
    }

    /// Append alternatives to the rule called `name`, declaring it first if needed
    pub fn add_alternatives(
        &mut self,
        name: &str,
        location: Location,
        alternatives: Vec<Alternative>,
    ) -> RuleId {
        let id = self.declare_rule(name, location);
        self.rules[id.0].alternatives.extend(alternatives);
        id
    }

    pub fn declare_rule(&mut self, name: &str, location: Location) -> RuleId {
        if let Some(id) = self.rule_id(name) {
            return id;
        }
        let id = RuleId(self.rules.len());
        self.rules.push(Production {
            name: name.to_string(),
            alternatives: Vec::new(),
            location,
        });
        self.index.insert(name.to_string(), id);
        id
    }

    /// Record a `%token`. A repeated name keeps its first declaration and fills in a missing tag.
    /// A `%type` seen earlier for the same name moves onto the token.
    pub fn declare_token(&mut self, mut token: TokenDecl) {
        if let Some(position) = self.types.iter().position(|decl| decl.name == token.name) {
            let decl = self.types.remove(position);
            if token.type_tag.is_none() {
                token.type_tag = Some(decl.type_tag);
            }
        }
        match self.tokens.iter_mut().find(|known| known.name == token.name) {
            Some(known) => {
                if known.type_tag.is_none() {
                    known.type_tag = token.type_tag;
                }
                if known.alias.is_none() {
                    known.alias = token.alias;
                }
            }
            None => self.tokens.push(token),
        }
    }

    /// Record a `%type`: a declared token takes the tag when it has none, any other name keeps
    /// its first tag in [Grammar::types].
    pub fn declare_type(&mut self, decl: TypeDecl) {
        if let Some(token) = self.tokens.iter_mut().find(|token| token.name == decl.name) {
            if token.type_tag.is_none() {
                token.type_tag = Some(decl.type_tag);
            }
            return;
        }
        if !self.types.iter().any(|known| known.name == decl.name) {
            self.types.push(decl);
        }
    }

    /// The `%type` tag of a name, whether it is a token or not
    pub fn type_tag(&self, name: &str) -> Option<&str> {
        self.token(name)
            .and_then(|token| token.type_tag.as_deref())
            .or_else(|| {
                self.types
                    .iter()
                    .find(|decl| decl.name == name)
                    .map(|decl| decl.type_tag.as_str())
            })
    }
}
