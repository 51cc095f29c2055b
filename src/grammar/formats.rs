//! Output formats for a parsed grammar
//!
//! - `json`: the serde model, pretty printed
//! - `yaml`: the same model as YAML
//! - `module`: the JSON wrapped in a self-invoking JavaScript function, the shape expected by
//!   table generators that `eval` their grammar file
//! - `ebnf`: the grammar printed back as EBNF/yacc text

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::grammar::model::Grammar;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Module,
    Ebnf,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Json,
        OutputFormat::Yaml,
        OutputFormat::Module,
        OutputFormat::Ebnf,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Module => "module",
            OutputFormat::Ebnf => "ebnf",
        }
    }

    /// Conventional file extension
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Module => "kison",
            OutputFormat::Ebnf => "ebnf",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputFormat::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| FormatError::UnknownFormat(s.to_string()))
    }
}

#[derive(Debug)]
pub enum FormatError {
    UnknownFormat(String),
    Json(serde_json::Error),
    Yaml(serde_yaml::Error),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::UnknownFormat(name) => write!(
                f,
                "unknown output format '{}' (expected json, yaml, module or ebnf)",
                name
            ),
            FormatError::Json(err) => write!(f, "JSON serialization failed: {}", err),
            FormatError::Yaml(err) => write!(f, "YAML serialization failed: {}", err),
        }
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FormatError::UnknownFormat(_) => None,
            FormatError::Json(err) => Some(err),
            FormatError::Yaml(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for FormatError {
    fn from(err: serde_json::Error) -> Self {
        FormatError::Json(err)
    }
}

impl From<serde_yaml::Error> for FormatError {
    fn from(err: serde_yaml::Error) -> Self {
        FormatError::Yaml(err)
    }
}

pub fn to_json(grammar: &Grammar) -> Result<String, FormatError> {
    Ok(serde_json::to_string_pretty(grammar)?)
}

pub fn to_yaml(grammar: &Grammar) -> Result<String, FormatError> {
    Ok(serde_yaml::to_string(grammar)?)
}

/// `(function () { return <json>; })();`, with the JSON indented one level
pub fn to_module(grammar: &Grammar) -> Result<String, FormatError> {
    let json = to_json(grammar)?;
    Ok(format!(
        "(function () {{\n    return {};\n\n}})();\n",
        json.replace('\n', "\n    ")
    ))
}

pub fn to_ebnf(grammar: &Grammar) -> String {
    grammar.to_string()
}

pub fn serialize(grammar: &Grammar, format: OutputFormat) -> Result<String, FormatError> {
    match format {
        OutputFormat::Json => to_json(grammar),
        OutputFormat::Yaml => to_yaml(grammar),
        OutputFormat::Module => to_module(grammar),
        OutputFormat::Ebnf => Ok(to_ebnf(grammar)),
    }
}

pub fn from_json(text: &str) -> Result<Grammar, FormatError> {
    Ok(serde_json::from_str(text)?)
}

pub fn from_yaml(text: &str) -> Result<Grammar, FormatError> {
    Ok(serde_yaml::from_str(text)?)
}
