//! nodeflow CLI
//!
//! Usage:
//!   nodeflow [OPTIONS] [FILE]
//!
//! Options:
//!   --example            Parse the built-in example program
//!   -g, --grammar        Show language grammar reference
//!   -f, --format <FMT>   Output format: text or toml
//!   -h, --help           Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

use nodeflow::{parse, render_program, OutputFormat, RenderConfig, EXAMPLE_PROGRAM};

#[derive(Parser)]
#[command(name = "nodeflow")]
#[command(about = "Parse compute/agent graph descriptions")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Parse the built-in example program
    #[arg(long, conflicts_with = "input")]
    example: bool,

    /// Show language grammar reference
    #[arg(short, long)]
    grammar: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Omit the success line from text output
    #[arg(long)]
    no_header: bool,

    /// Disable colors in error reports
    #[arg(long)]
    no_color: bool,

    /// Log debug events to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Toml,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Toml => OutputFormat::Toml,
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "warn,nodeflow=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.grammar {
        print_grammar();
        return;
    }

    // If no input and stdin is a terminal (interactive), show intro help
    if cli.input.is_none() && !cli.example && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    let (filename, source) = match read_source(&cli) {
        Ok(read) => read,
        Err(e) => {
            eprintln!("Error {}", e);
            std::process::exit(1);
        }
    };
    debug!(file = %filename, bytes = source.len(), "read source");

    let program = match parse(&source) {
        Ok(program) => program,
        Err(e) => {
            eprint!("{}", e.format(&source, &filename, !cli.no_color));
            std::process::exit(1);
        }
    };

    let config = RenderConfig::new()
        .with_format(cli.format.into())
        .with_header(!cli.no_header);
    match render_program(&program, &config) {
        Ok(output) => print!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Source text and the name used for it in diagnostics
fn read_source(cli: &Cli) -> Result<(String, String), String> {
    if cli.example {
        return Ok(("<example>".to_string(), EXAMPLE_PROGRAM.to_string()));
    }
    match &cli.input {
        Some(path) => fs::read_to_string(path)
            .map(|content| (path.display().to_string(), content))
            .map_err(|e| format!("reading file '{}': {}", path.display(), e)),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map(|_| ("<stdin>".to_string(), buffer))
                .map_err(|e| format!("reading from stdin: {}", e))
        }
    }
}

fn print_intro() {
    println!(
        r#"nodeflow - compute/agent graph descriptions

USAGE:
    nodeflow [OPTIONS] [FILE]
    echo '<code>' | nodeflow

OPTIONS:
    --example          Parse the built-in example program
    -g, --grammar      Show language grammar reference
    -f, --format       Output format: text (default) or toml
    --no-header        Omit the success line from text output
    --no-color         Plain error reports
    -v, --verbose      Log debug events to stderr
    -h, --help         Print help

QUICK START:
    nodeflow --example

Run --grammar for the syntax reference."#
    );
}

fn print_grammar() {
    println!(
        r#"NODEFLOW GRAMMAR
================

PROGRAM
-------
Zero or more nodes, in any order.

COMPUTE NODES
-------------
compute <name> {{
    input: <ident>
    output: <ident>
    code: "<text>"
}}

AGENT NODES
-----------
agent <name> {{
    watches: <node>.<field>
    can_add: <ident>
    code: "<text>"
}}

RULES
-----
Fields are required and must appear in the order shown.
Identifiers: letters, digits, underscore; not starting with a digit.
Strings have no escapes and end at the next double quote.
Keywords are not reserved: `compute agent {{ ... }}` names a node `agent`.
Comments run from // to the end of the line."#
    );
}
