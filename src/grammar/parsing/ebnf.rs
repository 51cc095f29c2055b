//! EBNF and yacc grammar parser
//!
//!     A recursive-descent parser over the BNF dialect. It reads both plain EBNF files and yacc
//!     grammars:
//!
//!         Grammar      := Declarations? RuleDecl+ Epilogue? EOF
//!         Declarations := (Code | Directive ...)* '%%'
//!         RuleDecl     := Identifier Define Alternation ';'?
//!         Alternation  := Sequence ('|' Sequence)*
//!         Sequence     := Factor* ('%prec' Name)? Action?
//!         Factor       := Primary Quantifier?
//!         Primary      := Identifier | Literal | Regex | '(' Alternation ')'
//!         Quantifier   := '*' | '+' | '?'
//!         Epilogue     := '%%' <rest of input>
//!
//!     The `;` closing a rule is optional: a rule also ends where an identifier followed by `::=`
//!     or `:` starts the next one. That is also why a sequence stops before such a pair.
//!
//! References
//!
//!     Rule references are recorded by name and only resolved once the whole input has been
//!     read (see [Grammar::finalize]), so rules may be used before they are declared. Names
//!     that match no rule are reported together as one resolution error batch.
//!
//! Recovery
//!
//!     By default the first error ends the parse. With recovery on, a broken rule is dropped,
//!     the parser skips to the next `;` or to the next `name ::=`, and carries on. Every error
//!     is collected and the partial grammar is returned alongside them.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::parser::Parser;
use crate::grammar::error::{GrammarError, ResolutionError, SyntaxError};
use crate::grammar::lexing::{Dialect, Lexer};
use crate::grammar::location::Location;
use crate::grammar::model::{
    Alternative, Associativity, Grammar, PrecedenceLevel, Quantifier, Symbol, Terminal,
    TokenDecl, TypeDecl,
};
use crate::grammar::token::{Token, TokenKind};

/// Groups nested deeper than this are rejected instead of exhausting the stack
const MAX_GROUP_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Keep going after errors, see [EbnfParser::parse_recovering]
    pub recover: bool,
}

/// The outcome of a recovering parse
#[derive(Debug, Clone)]
pub struct Recovered {
    /// Everything that parsed, including rules that failed to resolve
    pub grammar: Grammar,
    /// In input order; resolution errors come last
    pub errors: Vec<GrammarError>,
}

impl Recovered {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<Grammar, GrammarError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self.grammar),
        }
    }
}

/// Errors either abort the parse or pile up, depending on the mode
struct Errors {
    recover: bool,
    collected: Vec<GrammarError>,
}

impl Errors {
    fn report(&mut self, error: impl Into<GrammarError>) -> Result<(), GrammarError> {
        let error = error.into();
        if self.recover {
            self.collected.push(error);
            Ok(())
        } else {
            Err(error)
        }
    }
}

pub struct EbnfParser<'src> {
    parser: Parser<'src>,
    options: ParseOptions,
    /// `%start` name and where it was declared
    start: Option<(String, Location)>,
}

impl<'src> EbnfParser<'src> {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            parser: Parser::new(Lexer::for_dialect(Dialect::Bnf)),
            options,
            start: None,
        }
    }

    pub fn set_input(&mut self, text: &'src str, source_name: &str) {
        self.parser.set_input(text, source_name);
        self.start = None;
    }

    /// Parse the whole input into a finalized grammar.
    ///
    /// With [ParseOptions::recover] set, parsing goes on past errors but the first one collected
    /// is still returned; use [EbnfParser::parse_recovering] to get the partial grammar.
    pub fn parse(&mut self) -> Result<Grammar, GrammarError> {
        self.run(self.options.recover)?.into_result()
    }

    /// Parse the whole input, collecting every error instead of stopping at the first.
    pub fn parse_recovering(&mut self) -> Recovered {
        match self.run(true) {
            Ok(recovered) => recovered,
            Err(err) => Recovered {
                grammar: Grammar::new(self.parser.source_name()),
                errors: vec![err],
            },
        }
    }

    fn run(&mut self, recover: bool) -> Result<Recovered, GrammarError> {
        let mut grammar = Grammar::new(self.parser.source_name());
        let mut errors = Errors {
            recover,
            collected: Vec::new(),
        };

        self.declarations(&mut grammar, &mut errors)?;
        let end = self.rules(&mut grammar, &mut errors)?;
        if grammar.rules.is_empty() && errors.collected.is_empty() {
            errors.report(self.parser.error_at(&end, &["rule declaration"]))?;
        }
        self.finalize(&mut grammar, &mut errors)?;

        Ok(Recovered {
            grammar,
            errors: errors.collected,
        })
    }

    fn declarations(
        &mut self,
        grammar: &mut Grammar,
        errors: &mut Errors,
    ) -> Result<(), GrammarError> {
        loop {
            let token = self.parser.current();
            match token.kind {
                TokenKind::Code => {
                    self.parser.advance();
                    grammar.prologue.push(code_body(token.text).to_string());
                }
                TokenKind::Directive => {
                    self.parser.advance();
                    if let Err(err) = self.directive(grammar, &token) {
                        errors.report(err)?;
                        self.skip_directive();
                    }
                }
                TokenKind::Mark => {
                    self.parser.advance();
                    return Ok(());
                }
                _ => return Ok(()),
            }
        }
    }

    fn directive(&mut self, grammar: &mut Grammar, directive: &Token) -> Result<(), SyntaxError> {
        match directive.text {
            "%token" | "%term" => self.token_declaration(grammar),
            "%type" | "%nterm" => self.type_declaration(grammar, directive.text == "%type"),
            "%start" => {
                let name = self
                    .parser
                    .expect_described(TokenKind::Identifier, "start rule name")?;
                self.start = Some((name.text.to_string(), directive.start));
                Ok(())
            }
            "%left" => self.precedence_level(grammar, directive, Associativity::Left),
            "%right" => self.precedence_level(grammar, directive, Associativity::Right),
            "%nonassoc" => self.precedence_level(grammar, directive, Associativity::NonAssoc),
            _ => {
                self.skip_directive();
                Ok(())
            }
        }
    }

    /// `%token [<tag>] (NAME [number] ["alias"])+`
    fn token_declaration(&mut self, grammar: &mut Grammar) -> Result<(), SyntaxError> {
        let type_tag = self.type_tag();
        let mut declared = 0;
        loop {
            let token = self.parser.current();
            match token.kind {
                TokenKind::Identifier => {
                    self.parser.advance();
                    self.parser.eat(TokenKind::Number);
                    let alias = self
                        .parser
                        .eat(TokenKind::Literal)
                        .map(|literal| unescape(literal_body(literal.text)));
                    grammar.declare_token(TokenDecl {
                        name: token.text.to_string(),
                        type_tag: type_tag.clone(),
                        alias,
                        location: token.start,
                    });
                    declared += 1;
                }
                // Character tokens need no declaration
                TokenKind::Literal => {
                    self.parser.advance();
                    declared += 1;
                }
                _ => break,
            }
        }
        if declared == 0 {
            let found = self.parser.current();
            return Err(self.parser.error_at(&found, &["token name"]));
        }
        Ok(())
    }

    /// `%left`, `%right`, `%nonassoc`. Names listed there are tokens, as in yacc.
    fn precedence_level(
        &mut self,
        grammar: &mut Grammar,
        directive: &Token,
        associativity: Associativity,
    ) -> Result<(), SyntaxError> {
        let type_tag = self.type_tag();
        let mut symbols = Vec::new();
        loop {
            let token = self.parser.current();
            match token.kind {
                TokenKind::Identifier => {
                    self.parser.advance();
                    self.parser.eat(TokenKind::Number);
                    grammar.declare_token(TokenDecl {
                        name: token.text.to_string(),
                        type_tag: type_tag.clone(),
                        alias: None,
                        location: token.start,
                    });
                    symbols.push(Terminal::Token(token.text.to_string()));
                }
                TokenKind::Literal => {
                    self.parser.advance();
                    symbols.push(Terminal::Literal(unescape(literal_body(token.text))));
                }
                _ => break,
            }
        }
        if symbols.is_empty() {
            let found = self.parser.current();
            let expected = format!("symbols after {}", directive.text);
            return Err(self.parser.error_at(&found, &[expected.as_str()]));
        }
        grammar.precedence.push(PrecedenceLevel {
            associativity,
            symbols,
        });
        Ok(())
    }

    /// `%type <tag> name...`, or `%nterm [<tag>] name...`
    fn type_declaration(
        &mut self,
        grammar: &mut Grammar,
        needs_tag: bool,
    ) -> Result<(), SyntaxError> {
        let tag = self.type_tag();
        if tag.is_none() && needs_tag {
            let found = self.parser.current();
            return Err(self.parser.error_at(&found, &["type tag"]));
        }
        while matches!(
            self.parser.current().kind,
            TokenKind::Identifier | TokenKind::Literal
        ) {
            let name = self.parser.advance();
            // Character tokens need no declaration
            if name.kind != TokenKind::Identifier {
                continue;
            }
            if let Some(type_tag) = &tag {
                grammar.declare_type(TypeDecl {
                    name: name.text.to_string(),
                    type_tag: type_tag.clone(),
                    location: name.start,
                });
            }
        }
        Ok(())
    }

    fn type_tag(&mut self) -> Option<String> {
        self.parser
            .eat(TokenKind::TypeTag)
            .map(|tag| tag.text[1..tag.text.len() - 1].to_string())
    }

    /// Skip to the next declaration or to the end of the declarations
    fn skip_directive(&mut self) {
        while !matches!(
            self.parser.current().kind,
            TokenKind::Directive | TokenKind::Code | TokenKind::Mark | TokenKind::Eof
        ) {
            self.parser.advance();
        }
    }

    /// Parse rules up to the end of input or the epilogue. Returns the token that ended them.
    fn rules(
        &mut self,
        grammar: &mut Grammar,
        errors: &mut Errors,
    ) -> Result<Token<'src>, GrammarError> {
        loop {
            let token = self.parser.current();
            match token.kind {
                TokenKind::Eof => return Ok(token),
                TokenKind::Mark => {
                    self.parser.advance();
                    grammar.epilogue = epilogue(&self.parser.source()[token.end.offset..]);
                    return Ok(token);
                }
                _ => {}
            }
            if let Err(err) = self.rule_decl(grammar) {
                errors.report(err)?;
                self.synchronize(token.start.offset);
            }
        }
    }

    fn rule_decl(&mut self, grammar: &mut Grammar) -> Result<(), SyntaxError> {
        let name = self
            .parser
            .expect_described(TokenKind::Identifier, "rule name")?;
        self.parser.expect(TokenKind::Define)?;
        // Declared up front so references to a rule that fails to parse still resolve
        grammar.declare_rule(name.text, name.start);

        let alternatives = self.alternation(0)?;
        if self.parser.eat(TokenKind::Semicolon).is_none() && !self.at_rule_end() {
            let found = self.parser.current();
            return Err(self.parser.error_at(&found, &["';'", "'|'"]));
        }
        grammar.add_alternatives(name.text, name.start, alternatives);
        Ok(())
    }

    fn at_rule_end(&mut self) -> bool {
        matches!(
            self.parser.current().kind,
            TokenKind::Eof | TokenKind::Mark
        ) || self.starts_rule()
    }

    fn starts_rule(&mut self) -> bool {
        self.parser.check(TokenKind::Identifier)
            && self.parser.lookahead(1).kind == TokenKind::Define
    }

    /// Skip past the broken rule that started at `from`: up to and including the next `;`, or
    /// up to the next `name ::=`, the epilogue or the end of input.
    fn synchronize(&mut self, from: usize) {
        loop {
            let token = self.parser.current();
            match token.kind {
                TokenKind::Eof | TokenKind::Mark => return,
                TokenKind::Semicolon => {
                    self.parser.advance();
                    return;
                }
                TokenKind::Identifier if token.start.offset > from && self.starts_rule() => {
                    return
                }
                _ => {
                    self.parser.advance();
                }
            }
        }
    }

    fn alternation(&mut self, depth: usize) -> Result<Vec<Alternative>, SyntaxError> {
        let mut alternatives = vec![self.sequence(depth)?];
        while self.parser.eat(TokenKind::Pipe).is_some() {
            alternatives.push(self.sequence(depth)?);
        }
        Ok(alternatives)
    }

    fn sequence(&mut self, depth: usize) -> Result<Alternative, SyntaxError> {
        let mut alternative = Alternative::default();
        loop {
            let token = self.parser.current();
            match token.kind {
                TokenKind::Identifier if self.starts_rule() => break,
                TokenKind::Identifier
                | TokenKind::Literal
                | TokenKind::Regexp
                | TokenKind::LeftParen => {
                    if alternative.action.is_some() {
                        return Err(self
                            .parser
                            .error_message(&token, "an action must end its alternative"));
                    }
                    alternative.symbols.push(self.factor(depth)?);
                }
                TokenKind::Star | TokenKind::Plus | TokenKind::Question => {
                    return Err(self.parser.error_message(
                        &token,
                        format!("quantifier '{}' must follow a symbol", token.text),
                    ));
                }
                TokenKind::Directive if token.text == "%prec" => {
                    self.parser.advance();
                    let symbol = self.parser.current();
                    if !matches!(symbol.kind, TokenKind::Identifier | TokenKind::Literal) {
                        return Err(self.parser.error_at(&symbol, &["precedence symbol"]));
                    }
                    self.parser.advance();
                    alternative.precedence = Some(symbol.text.to_string());
                }
                TokenKind::Directive if token.text == "%empty" => {
                    self.parser.advance();
                }
                TokenKind::Action => {
                    if alternative.action.is_some() {
                        return Err(self
                            .parser
                            .error_message(&token, "an alternative takes a single action"));
                    }
                    self.parser.advance();
                    alternative.action = Some(action_body(token.text).to_string());
                }
                TokenKind::Error => return Err(self.parser.error_at(&token, &["symbol"])),
                _ => break,
            }
        }
        Ok(alternative)
    }

    fn factor(&mut self, depth: usize) -> Result<Symbol, SyntaxError> {
        let primary = self.primary(depth)?;
        let Some(quantifier) = self.quantifier() else {
            return Ok(primary);
        };
        let next = self.parser.current();
        if quantifier_of(next.kind).is_some() {
            return Err(self.parser.error_message(
                &next,
                format!(
                    "quantifier '{}' cannot follow quantifier '{}'",
                    next.text,
                    quantifier.as_str()
                ),
            ));
        }
        Ok(Symbol::quantified(primary, quantifier))
    }

    fn quantifier(&mut self) -> Option<Quantifier> {
        let quantifier = quantifier_of(self.parser.current().kind)?;
        self.parser.advance();
        Some(quantifier)
    }

    fn primary(&mut self, depth: usize) -> Result<Symbol, SyntaxError> {
        let token = self.parser.current();
        let symbol = match token.kind {
            TokenKind::Identifier => Symbol::nonterminal(token.text, token.start),
            TokenKind::Literal => Symbol::literal(unescape(literal_body(token.text))),
            TokenKind::Regexp => {
                Symbol::Terminal(Terminal::Regex(literal_body(token.text).to_string()))
            }
            TokenKind::LeftParen => {
                if depth >= MAX_GROUP_DEPTH {
                    return Err(self
                        .parser
                        .error_message(&token, "groups are nested too deeply"));
                }
                self.parser.advance();
                let alternatives = self.alternation(depth + 1)?;
                if self.parser.eat(TokenKind::RightParen).is_none() {
                    let found = self.parser.current();
                    return Err(self.parser.error_at(&found, &["')'", "'|'"]));
                }
                return Ok(Symbol::Group(alternatives));
            }
            _ => return Err(self.parser.error_at(&token, &["symbol"])),
        };
        self.parser.advance();
        Ok(symbol)
    }

    fn finalize(&mut self, grammar: &mut Grammar, errors: &mut Errors) -> Result<(), GrammarError> {
        let start = self.start.take();
        if let Some((name, _)) = &start {
            grammar.start = Some(name.clone());
        }

        let mut unresolved = grammar.finalize().err().unwrap_or_default();
        if let Some((name, location)) = start {
            if grammar.rule(&name).is_none() {
                unresolved.push(ResolutionError {
                    name,
                    source_name: Arc::from(self.parser.source_name()),
                    location,
                });
            }
        }

        if unresolved.is_empty() {
            Ok(())
        } else {
            errors.report(unresolved)
        }
    }
}

fn quantifier_of(kind: TokenKind) -> Option<Quantifier> {
    match kind {
        TokenKind::Question => Some(Quantifier::Optional),
        TokenKind::Star => Some(Quantifier::ZeroOrMore),
        TokenKind::Plus => Some(Quantifier::OneOrMore),
        _ => None,
    }
}

/// Text between the first and last character: the quotes of a literal, the slashes of a regex
fn literal_body(text: &str) -> &str {
    let mut chars = text.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}

fn action_body(text: &str) -> &str {
    literal_body(text).trim()
}

fn code_body(text: &str) -> &str {
    text.strip_prefix("%{")
        .and_then(|inner| inner.strip_suffix("%}"))
        .unwrap_or(text)
        .trim_matches(|ch| ch == '\n' || ch == '\r')
}

/// The epilogue without the line break that follows `%%`; `None` when blank
fn epilogue(rest: &str) -> Option<String> {
    if rest.trim().is_empty() {
        return None;
    }
    let text = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);
    Some(text.to_string())
}

/// Resolve backslash escapes in a quoted literal
pub(crate) fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"a\'b"), "a'b");
        assert_eq!(unescape(r"\n\t\\"), "\n\t\\");
        assert_eq!(unescape(r#"\""#), "\"");
    }

    #[test]
    fn test_bodies() {
        assert_eq!(literal_body("'+'"), "+");
        assert_eq!(literal_body("/[0-9]+/"), "[0-9]+");
        assert_eq!(action_body("{ $$ = $1; }"), "$$ = $1;");
        assert_eq!(code_body("%{\n#include <stdio.h>\n%}"), "#include <stdio.h>");
    }

    #[test]
    fn test_epilogue() {
        assert_eq!(epilogue("\nint main(void) {}\n").as_deref(), Some("int main(void) {}\n"));
        assert_eq!(epilogue("\n\n  "), None);
    }

    #[test]
    fn test_parser_is_reusable() {
        let mut parser = EbnfParser::new(ParseOptions::default());
        parser.set_input("a ::= 'x' ;", "one.ebnf");
        assert_eq!(parser.parse().unwrap().rules.len(), 1);

        parser.set_input("b ::= 'y' ; c ::= b ;", "two.ebnf");
        let grammar = parser.parse().unwrap();
        assert_eq!(grammar.source_name, "two.ebnf");
        assert_eq!(grammar.rule_names().collect::<Vec<_>>(), vec!["b", "c"]);
    }
}
