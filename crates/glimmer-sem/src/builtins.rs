//! Fixed arity/type schemas for the built-in call forms (§4.5), checked
//! ahead of user-defined bindings the same way `typechecker/builtinTypes.go`
//! dispatches on the callee identifier's name before ever trying to resolve
//! it as a normal function value.

use glimmer_par::ast::{CallExpr, Expr};
use glimmer_util::Interner;

use crate::context::Context;
use crate::types::{Ty, TypeError, TyResult};

pub const BUILTIN_NAMES: &[&str] = &["print", "len", "head", "tail", "slice", "push", "pop", "range"];

pub fn is_builtin(name: &str) -> bool {
    BUILTIN_NAMES.contains(&name)
}

/// Type-checks a call to a builtin by name. `arg_ty` synthesizes the type of
/// one already-evaluated-position argument expression; errors from it
/// short-circuit exactly like any other argument type error would.
pub fn typeof_builtin_call(
    name: &str,
    call: &CallExpr,
    ctx: &mut Context,
    interner: &Interner,
    mut arg_ty: impl FnMut(&Expr, &mut Context, &Interner) -> TyResult,
) -> TyResult {
    let span = call.span;
    let args = &call.args;

    macro_rules! wrong_arity {
        () => {
            return Err(TypeError::new(
                format!("incorrect num of arguments to {}, got={}", name, args.len()),
                span,
            ))
        };
    }

    match name {
        "print" => {
            for a in args {
                arg_ty(a, ctx, interner)?;
            }
            Ok(Ty::None)
        }
        "len" => {
            if args.len() != 1 {
                wrong_arity!();
            }
            let t = arg_ty(&args[0], ctx, interner)?;
            if !matches!(t, Ty::Array(_) | Ty::String) {
                return Err(TypeError::new(format!("argument to `len` must be array or string, got={}", t), span));
            }
            Ok(Ty::Int)
        }
        "head" | "tail" => {
            if args.len() != 1 {
                wrong_arity!();
            }
            let t = arg_ty(&args[0], ctx, interner)?;
            match t {
                Ty::Array(held) => Ok(*held),
                other => Err(TypeError::new(format!("argument to `{}` must be array, got={}", name, other), span)),
            }
        }
        "slice" => {
            if args.len() != 3 {
                wrong_arity!();
            }
            let arr_ty = arg_ty(&args[0], ctx, interner)?;
            if !matches!(arr_ty, Ty::Array(_)) {
                return Err(TypeError::new(format!("argument 1 to `slice` must be array, got={}", arr_ty), span));
            }
            let start_ty = arg_ty(&args[1], ctx, interner)?;
            if start_ty != Ty::Int {
                return Err(TypeError::new(format!("argument 2 to `slice` must be int, got={}", start_ty), span));
            }
            let end_ty = arg_ty(&args[2], ctx, interner)?;
            if end_ty != Ty::Int {
                return Err(TypeError::new(format!("argument 3 to `slice` must be int, got={}", end_ty), span));
            }
            Ok(arr_ty)
        }
        "push" => {
            if args.len() != 2 {
                wrong_arity!();
            }
            let arr_ty = arg_ty(&args[0], ctx, interner)?;
            let held = match &arr_ty {
                Ty::Array(held) => (**held).clone(),
                other => return Err(TypeError::new(format!("argument 1 to `push` must be array, got={}", other), span)),
            };
            let pushed_ty = arg_ty(&args[1], ctx, interner)?;
            if !pushed_ty.matches(&held) {
                return Err(TypeError::new(
                    format!("argument 2 to `push` must match argument 1's held type: {}, got={}", held, pushed_ty),
                    span,
                ));
            }
            Ok(arr_ty)
        }
        "pop" => {
            if args.len() != 1 {
                wrong_arity!();
            }
            let arr_ty = arg_ty(&args[0], ctx, interner)?;
            match arr_ty {
                Ty::Array(_) => Ok(arr_ty),
                other => Err(TypeError::new(format!("argument 1 to `pop` must be array, got={}", other), span)),
            }
        }
        "range" => {
            if args.is_empty() || args.len() > 3 {
                return Err(TypeError::new(
                    format!("incorrect num of arguments to range, got={}", args.len()),
                    span,
                ));
            }
            for (i, a) in args.iter().enumerate() {
                let t = arg_ty(a, ctx, interner)?;
                if t != Ty::Int {
                    return Err(TypeError::new(format!("argument {} to `range` must be int, got={}", i + 1, t), span));
                }
            }
            Ok(Ty::Array(Box::new(Ty::Int)))
        }
        other => Err(TypeError::new(format!("unknown builtin `{}`", other), span)),
    }
}
