//! glimmer-sem - static type checker.
//!
//! The whole crate is a single recursive `typeof` synthesizer (§4.3): there
//! is no separate name-resolution pass over the AST, because the type
//! context already doubles as the scope chain — resolving an identifier and
//! typing it are the same lookup. Everything downstream of the parser sees
//! either a concrete `Ty` or a `TypeError` that already points at a `Span`.

pub mod builtins;
pub mod checker;
pub mod context;
pub mod types;

pub use checker::{typeof_expr, typeof_program, typeof_stmt};
pub use context::Context;
pub use types::{Ty, TypeError, TyResult};

use glimmer_par::ast::Program;
use glimmer_util::Interner;

/// Typechecks a whole program against a fresh top-level context. The
/// returned `Ty` is the type of the program's last statement; callers that
/// only care about pass/fail can discard it.
pub fn typecheck(program: &Program, interner: &Interner) -> TyResult {
    let mut ctx = Context::new();
    typeof_program(program, &mut ctx, interner)
}
