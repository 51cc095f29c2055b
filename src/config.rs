//! Configuration loader for the grammar toolchain.
//!
//! `defaults/grammar.default.toml` is embedded into the binary so that docs and runtime
//! behavior stay in sync. Callers layer files, `GRAMMAR_*` environment variables and single-key
//! overrides on top of those defaults via [`Loader`] before deserializing into
//! [`GrammarConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

use crate::grammar::formats::OutputFormat;
use crate::grammar::lexing::LexerOptions;
use crate::grammar::parsing::ParseOptions;

const DEFAULT_TOML: &str = include_str!("../defaults/grammar.default.toml");

/// Prefix of the environment variables read by [`Loader::with_env`]
pub const ENV_PREFIX: &str = "GRAMMAR";

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GrammarConfig {
    pub lexer: LexerOptions,
    pub parser: ParseOptions,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer `GRAMMAR_<SECTION>__<KEY>` variables from the process environment.
    pub fn with_env(self) -> Self {
        self.with_environment(environment())
    }

    /// Layer an environment source, typically one built with [`environment`].
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.builder = self.builder.add_source(environment);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<GrammarConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The environment source read by [`Loader::with_env`]
pub fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<GrammarConfig, ConfigError> {
    Loader::new().build()
}
