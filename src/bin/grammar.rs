//! Command-line interface for grammar-parser
//! This binary parses EBNF/yacc grammar files into JSON, YAML, a JavaScript module or EBNF, and
//! dumps token streams for any of the built-in dialects.
//!
//! Usage:
//!   grammar parse `<path>` [--format `<format>`] [--output `<file>`] [--recover]  - Parse a grammar
//!   grammar tokens `<path>` [--dialect `<dialect>`] [--keep-whitespace] [--keep-comments]
//!                                                                         - Dump the token stream
//!
//! Settings come from the built-in defaults, then `--config <file>`, then `GRAMMAR_*`
//! environment variables, then the flags above.

use clap::{Arg, ArgAction, ArgMatches, Command};
use std::str::FromStr;
use std::sync::Arc;

use grammar_parser::config::{GrammarConfig, Loader};
use grammar_parser::grammar::formats::serialize;
use grammar_parser::grammar::lexing::{tokenize, LexError};
use grammar_parser::grammar::token::inspect_all;
use grammar_parser::grammar::{format_source_context, EbnfParser, GrammarError, Location};

fn main() {
    let matches = Command::new("grammar")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Parse EBNF and yacc grammars and inspect token streams")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Configuration file layered over the defaults"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .help("Log level: off, error, warn, info, debug or trace (default: $GRAMMAR_LOG or warn)"),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse a grammar file and write the result")
                .arg(
                    Arg::new("path")
                        .help("Path to the grammar file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format")
                        .value_parser(["json", "yaml", "module", "ebnf"]),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Write to this file instead of stdout"),
                )
                .arg(
                    Arg::new("recover")
                        .long("recover")
                        .action(ArgAction::SetTrue)
                        .help("Report every error and still write the partial grammar"),
                ),
        )
        .subcommand(
            Command::new("tokens")
                .about("Print the token stream of a file")
                .arg(
                    Arg::new("path")
                        .help("Path to the source file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("dialect")
                        .long("dialect")
                        .short('d')
                        .help("Rule set to lex with")
                        .value_parser(["ecmascript", "c", "bnf"]),
                )
                .arg(
                    Arg::new("keep-whitespace")
                        .long("keep-whitespace")
                        .action(ArgAction::SetTrue)
                        .help("Include whitespace and newline tokens"),
                )
                .arg(
                    Arg::new("keep-comments")
                        .long("keep-comments")
                        .action(ArgAction::SetTrue)
                        .help("Include comment tokens"),
                ),
        )
        .get_matches();

    init_logging(matches.get_one::<String>("log-level"));

    match matches.subcommand() {
        Some(("parse", parse_matches)) => {
            let config = load_config(&matches, parse_overrides(parse_matches));
            let path = parse_matches.get_one::<String>("path").unwrap();
            let output = parse_matches.get_one::<String>("output");
            handle_parse_command(path, output.map(String::as_str), &config);
        }
        Some(("tokens", tokens_matches)) => {
            let config = load_config(&matches, tokens_overrides(tokens_matches));
            let path = tokens_matches.get_one::<String>("path").unwrap();
            handle_tokens_command(path, &config);
        }
        _ => unreachable!(),
    }
}

fn init_logging(flag: Option<&String>) {
    let level = flag
        .cloned()
        .or_else(|| std::env::var("GRAMMAR_LOG").ok())
        .unwrap_or_else(|| "warn".to_owned());
    let level = log::LevelFilter::from_str(&level).unwrap_or_else(|_| {
        eprintln!("Unknown log level '{}', using warn", level);
        log::LevelFilter::Warn
    });

    let result = simplelog::TermLogger::init(
        level,
        simplelog::ConfigBuilder::new()
            .set_time_format_custom(&[])
            .build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Never,
    );
    if let Err(e) = result {
        eprintln!("Logging disabled: {}", e);
    }
}

/// A single `section.key` override taken from a command line flag
enum Override {
    Text(&'static str, String),
    Flag(&'static str, bool),
}

fn parse_overrides(matches: &ArgMatches) -> Vec<Override> {
    let mut overrides = Vec::new();
    if let Some(format) = matches.get_one::<String>("format") {
        overrides.push(Override::Text("output.format", format.clone()));
    }
    if matches.get_flag("recover") {
        overrides.push(Override::Flag("parser.recover", true));
    }
    overrides
}

fn tokens_overrides(matches: &ArgMatches) -> Vec<Override> {
    let mut overrides = Vec::new();
    if let Some(dialect) = matches.get_one::<String>("dialect") {
        overrides.push(Override::Text("lexer.dialect", dialect.clone()));
    }
    if matches.get_flag("keep-whitespace") {
        overrides.push(Override::Flag("lexer.skip_whitespace", false));
    }
    if matches.get_flag("keep-comments") {
        overrides.push(Override::Flag("lexer.skip_comments", false));
    }
    overrides
}

fn load_config(matches: &ArgMatches, overrides: Vec<Override>) -> GrammarConfig {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        log::debug!("Loading configuration from {}", path);
        loader = loader.with_file(path);
    }
    loader = loader.with_env();

    let loaded = overrides
        .into_iter()
        .try_fold(loader, |loader, item| match item {
            Override::Text(key, value) => loader.set_override(key, value),
            Override::Flag(key, value) => loader.set_override(key, value),
        })
        .and_then(Loader::build);

    loaded.unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(2);
    })
}

/// Handle the parse command
fn handle_parse_command(path: &str, output: Option<&str>, config: &GrammarConfig) {
    let source = read_source(path);

    let mut parser = EbnfParser::new(config.parser);
    parser.set_input(&source, path);

    let (grammar, failed) = if config.parser.recover {
        let recovered = parser.parse_recovering();
        report_errors(&source, &recovered.errors);
        if !recovered.errors.is_empty() {
            log::warn!(
                "{} error(s) in {}; writing the partial grammar",
                recovered.errors.len(),
                path
            );
        }
        let failed = !recovered.errors.is_empty();
        (recovered.grammar, failed)
    } else {
        match parser.parse() {
            Ok(grammar) => (grammar, false),
            Err(err) => {
                report_errors(&source, &[err]);
                std::process::exit(1);
            }
        }
    };

    log::info!(
        "Parsed {}: {} rules, {} tokens, start rule {}",
        path,
        grammar.rules.len(),
        grammar.tokens.len(),
        grammar.start.as_deref().unwrap_or("-")
    );

    let text = serialize(&grammar, config.output.format).unwrap_or_else(|e| {
        eprintln!("Output error: {}", e);
        std::process::exit(1);
    });

    match output {
        Some(file) => {
            if let Err(e) = std::fs::write(file, &text) {
                eprintln!("Error writing {}: {}", file, e);
                std::process::exit(1);
            }
            log::info!("Wrote {}: {} bytes", file, text.len());
        }
        None => print!("{}", text),
    }

    if failed {
        std::process::exit(1);
    }
}

/// Handle the tokens command
fn handle_tokens_command(path: &str, config: &GrammarConfig) {
    let source = read_source(path);
    log::debug!("Lexing {} with the {} rule set", path, config.lexer.dialect);

    let tokens = tokenize(&source, path, &config.lexer);
    print!("{}", inspect_all(&tokens));

    let source_name: Arc<str> = Arc::from(path);
    let errors: Vec<LexError> = tokens
        .iter()
        .filter_map(|token| LexError::from_token(Arc::clone(&source_name), token))
        .collect();
    if errors.is_empty() {
        return;
    }
    for error in &errors {
        eprintln!("{}", error);
        eprint!("{}", format_source_context(&source, &error.location));
    }
    std::process::exit(1);
}

fn read_source(path: &str) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file {}: {}", path, e);
        std::process::exit(1);
    })
}

fn report_errors(source: &str, errors: &[GrammarError]) {
    for error in errors {
        for diagnostic in error.diagnostics() {
            if diagnostic.line == 0 {
                eprintln!("error: {}", diagnostic.message);
                continue;
            }
            eprintln!(
                "{}:{}:{}: error: {}",
                diagnostic.source_name, diagnostic.line, diagnostic.column, diagnostic.message
            );
            let location = Location::new(diagnostic.offset, diagnostic.line, diagnostic.column);
            eprint!("{}", format_source_context(source, &location));
        }
    }
}
