//! Built-in rule sets
//!
//! Each dialect is a static, lazily built [RuleSet] shared through an `Arc`, so any number of
//! lexers can use it at once.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::rules::RuleSet;

mod bnf;
mod c;
mod ecmascript;

pub(crate) use ecmascript::PUNCTUATORS as ECMASCRIPT_PUNCTUATORS;

static ECMASCRIPT_RULES: Lazy<Arc<RuleSet>> =
    Lazy::new(|| Arc::new(ecmascript::rules().expect("ECMAScript rule set is valid")));

static C_RULES: Lazy<Arc<RuleSet>> =
    Lazy::new(|| Arc::new(c::rules().expect("C rule set is valid")));

static BNF_RULES: Lazy<Arc<RuleSet>> =
    Lazy::new(|| Arc::new(bnf::rules().expect("BNF rule set is valid")));

/// A built-in rule set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Ecmascript,
    C,
    /// EBNF and yacc grammar files
    #[default]
    Bnf,
}

impl Dialect {
    pub const ALL: [Dialect; 3] = [Dialect::Ecmascript, Dialect::C, Dialect::Bnf];

    pub fn rule_set(self) -> Arc<RuleSet> {
        let rules: &Arc<RuleSet> = match self {
            Dialect::Ecmascript => &ECMASCRIPT_RULES,
            Dialect::C => &C_RULES,
            Dialect::Bnf => &BNF_RULES,
        };
        Arc::clone(rules)
    }

    pub fn name(self) -> &'static str {
        match self {
            Dialect::Ecmascript => "ecmascript",
            Dialect::C => "c",
            Dialect::Bnf => "bnf",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ecmascript" | "javascript" | "js" => Ok(Dialect::Ecmascript),
            "c" => Ok(Dialect::C),
            "bnf" | "ebnf" | "yacc" => Ok(Dialect::Bnf),
            other => Err(format!(
                "unknown dialect '{}' (expected ecmascript, c or bnf)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_rule_sets_build() {
        assert!(!ecmascript::rules().unwrap().is_empty());
        assert!(!c::rules().unwrap().is_empty());
        assert!(!bnf::rules().unwrap().is_empty());
    }

    #[test]
    fn test_rule_sets_are_shared() {
        let a = Dialect::C.rule_set();
        let b = Dialect::C.rule_set();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_parse_dialect_names() {
        assert_eq!("JS".parse::<Dialect>(), Ok(Dialect::Ecmascript));
        assert_eq!("yacc".parse::<Dialect>(), Ok(Dialect::Bnf));
        assert!("cobol".parse::<Dialect>().is_err());
        for dialect in Dialect::ALL {
            assert_eq!(dialect.name().parse::<Dialect>(), Ok(dialect));
        }
    }
}
