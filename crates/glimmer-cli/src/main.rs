//! glimmer - the command-line driver for the Glimmer language.
//!
//! Parses arguments, loads configuration, installs the `tracing` subscriber
//! (the only place in this workspace that does), and dispatches to one of
//! three interactive loops or a one-shot file run. Everything that actually
//! understands Glimmer lives in `glimmer-lex`/`glimmer-par`/`glimmer-sem`/
//! `glimmer-eval`; this binary only wires `glimmer_cli::pipeline` to a
//! terminal or a file.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use glimmer_cli::pipeline;
use glimmer_cli::{Config, GlimmerCliError, Result};

/// Glimmer - a small dynamically-evaluated, statically type-checked
/// expression language.
#[derive(Parser, Debug)]
#[command(name = "glimmer")]
#[command(author = "Glimmer contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Lex, parse, and evaluate Glimmer programs", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true, env = "GLIMMER_VERBOSE")]
    verbose: bool,

    /// Path to a `glimmer.toml` configuration file, overriding the search order.
    #[arg(short, long, global = true, env = "GLIMMER_CONFIG")]
    config: Option<PathBuf>,

    /// Request an AST dot-file dump. The Graphviz visualizer itself is an
    /// external collaborator that isn't wired up; this only emits a notice
    /// that the hook would have fired.
    #[arg(long, global = true)]
    emit_ast_dot: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive loop that lexes each line and prints its tokens.
    Lex,
    /// Interactive loop that parses each line and prints its AST.
    Parse,
    /// Interactive loop that runs each line through the full pipeline (default).
    Repl,
    /// Run a source file through the full pipeline once.
    Run(RunArgs),
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Path to the source file to execute.
    path: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Everything below this line works in terms of `GlimmerCliError`;
    // `anyhow` only sits at this process boundary to collect whichever
    // stage failed into one reportable chain.
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    init_logging(cli.verbose)?;

    let config = load_config(cli.config.as_deref())?;
    glimmer_eval::set_max_call_depth(config.max_call_depth);

    if cli.emit_ast_dot {
        eprintln!("note: --emit-ast-dot requested, but the Graphviz visualizer is not wired up; skipping");
    }

    match cli.command.unwrap_or(Commands::Repl) {
        Commands::Lex => run_lex_repl()?,
        Commands::Parse => run_parse_repl(&config)?,
        Commands::Repl => run_eval_repl(&config)?,
        Commands::Run(args) => run_file(&args.path, &config)?,
    }
    Ok(())
}

fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose { EnvFilter::new("debug") } else { EnvFilter::new("info") };

    let subscriber = fmt::layer().with_target(false).with_thread_ids(false).with_thread_names(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .map_err(|e| GlimmerCliError::Config(format!("failed to initialize logging: {e}")))?;

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
}

fn run_file(path: &Path, config: &Config) -> Result<()> {
    let source = std::fs::read_to_string(path).map_err(|source| GlimmerCliError::ReadSource { path: path.to_path_buf(), source })?;
    let value = pipeline::run_source(&source, config.repl_echo_ast)?;
    println!("{value}");
    if value.is_error() {
        return Err(GlimmerCliError::Diagnostics(value.to_string()));
    }
    Ok(())
}

/// Lexes each line on its own; tokens never carry state across lines, so
/// there is nothing to accumulate.
fn run_lex_repl() -> Result<()> {
    let stdin = io::stdin();
    prompt();
    for line in stdin.lock().lines() {
        let line = line?;
        let (tokens, _interner) = pipeline::lex_tokens(&line);
        for token in tokens {
            println!("{token:?}");
        }
        prompt();
    }
    println!();
    Ok(())
}

/// Parses each line on its own and prints the resulting AST (or the parse
/// diagnostics). Like the lex loop, each line gets a fresh parser.
fn run_parse_repl(config: &Config) -> Result<()> {
    let stdin = io::stdin();
    prompt();
    for line in stdin.lock().lines() {
        let line = line?;
        match pipeline::parse(&line) {
            Ok((program, _interner)) => {
                if config.repl_echo_ast {
                    println!("{program:#?}");
                } else {
                    println!("{program:?}");
                }
            }
            Err(e) => eprintln!("{e}"),
        }
        prompt();
    }
    println!();
    Ok(())
}

/// Re-runs the whole accumulated session buffer through the pipeline on
/// every line, which is what gives later lines visibility into earlier
/// assignments without needing a parser that can share a `Symbol` interner
/// across separate `parse` calls. A line whose addition breaks the program
/// is dropped from the buffer so the session keeps working.
fn run_eval_repl(config: &Config) -> Result<()> {
    let stdin = io::stdin();
    let mut session = String::new();
    prompt();
    for line in stdin.lock().lines() {
        let line = line?;
        let mark = session.len();
        session.push_str(&line);
        session.push('\n');

        match pipeline::run_source(&session, config.repl_echo_ast) {
            Ok(value) => println!("{value}"),
            Err(e) => {
                eprintln!("{e}");
                session.truncate(mark);
            }
        }
        prompt();
    }
    println!();
    Ok(())
}

fn prompt() {
    print!(">> ");
    let _ = io::stdout().flush();
}
