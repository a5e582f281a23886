//! Wires `Lex → Parse → TypeCheck → Evaluate` (§10.2), the one place this
//! crate actually touches all four core crates. Each stage gets its own
//! `tracing` span so `--verbose` shows where a program spent its time and
//! where it failed; library crates below this one only ever log through
//! `tracing`'s facade, never install a subscriber themselves.

use glimmer_lex::Lexer;
use glimmer_par::ast::Program;
use glimmer_par::Parser;
use glimmer_sem::TypeError;
use glimmer_util::Interner;

use crate::error::{GlimmerCliError, Result};

/// Runs the lexer alone and collects every token, for the `tokens`
/// subcommand. Lexing never fails (§4.1 "a total `next_token`"), so this has
/// no error path of its own.
pub fn lex_tokens(source: &str) -> (Vec<glimmer_lex::Token>, Interner) {
    let _span = tracing::debug_span!("lex").entered();
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let tok = lexer.next_token();
        if tok.is_eof() {
            break;
        }
        tokens.push(tok);
    }
    (tokens, lexer.into_interner())
}

/// Parses `source` to a `Program`. Parsing drives its own lexer internally
/// (§4.2), so there is no separate lex stage to call out here beyond the
/// one span around the whole pass.
pub fn parse(source: &str) -> Result<(Program, Interner)> {
    let _span = tracing::debug_span!("parse").entered();
    let mut parser = Parser::new(source);
    let program = parser.parse_program();
    if parser.has_errors() {
        let joined = parser.diagnostics().iter().map(|d| d.to_string()).collect::<Vec<_>>().join("\n");
        return Err(GlimmerCliError::Diagnostics(joined));
    }
    Ok((program, parser.into_interner()))
}

/// Runs the static type checker over an already-parsed program.
pub fn typecheck(program: &Program, interner: &Interner) -> Result<()> {
    let _span = tracing::debug_span!("typecheck").entered();
    glimmer_sem::typecheck(program, interner)
        .map(|_| ())
        .map_err(|e: TypeError| GlimmerCliError::Diagnostics(e.to_string()))
}

/// Evaluates an already type-checked program. Evaluation itself never
/// returns a Rust `Err` (§4.4's `Value::Error` is ordinary data, not an
/// exception), so this hands back the raw `Value` for the caller to print
/// and to decide an exit code from.
pub fn eval(program: &Program, interner: &Interner) -> glimmer_eval::Value {
    let _span = tracing::debug_span!("eval").entered();
    glimmer_eval::eval(program, interner)
}

/// The full pipeline used by `run`: parse, typecheck, then evaluate.
/// `echo_ast` logs the parsed program at debug level before typechecking,
/// mirroring §10.3's `repl_echo_ast` config knob.
pub fn run_source(source: &str, echo_ast: bool) -> Result<glimmer_eval::Value> {
    let (program, interner) = parse(source)?;
    if echo_ast {
        tracing::debug!(ast = ?program, "parsed program");
    }
    typecheck(&program, &interner)?;
    Ok(eval(&program, &interner))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_source_evaluates_a_well_typed_program() {
        let value = run_source("1 + 2", false).unwrap();
        assert_eq!(value, glimmer_eval::Value::Int(3));
    }

    #[test]
    fn run_source_surfaces_parse_errors() {
        assert!(run_source("fn(", false).is_err());
    }

    #[test]
    fn run_source_surfaces_type_errors() {
        assert!(run_source(r#"1 + "a""#, false).is_err());
    }

    #[test]
    fn lex_tokens_stops_at_eof() {
        let (tokens, _) = lex_tokens("1 + 2");
        assert_eq!(tokens.len(), 3);
    }
}
