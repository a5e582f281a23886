//! The recursive type synthesizer (§4.3): `typeof_expr`/`typeof_stmt` walk
//! the AST and either produce a concrete `Ty` or short-circuit with a
//! `TypeError`. Never mutates the AST; may mutate `ctx` by binding
//! assignment targets, exactly like `typechecker/typechecker*.go` mutates
//! its `*types.Context` in place.

use glimmer_par::ast::{
    AssignOp, AssignStmt, Block, CallExpr, Expr, ForEachStmt, ForStmt, FunctionExpr, IfExpr, IfStmt, InfixOp,
    PrefixOp, Program, Stmt,
};
use glimmer_util::{Interner, Symbol};

use crate::builtins::{is_builtin, typeof_builtin_call};
use crate::context::Context;
use crate::types::{Ty, TypeError, TyResult};

/// Public entry point (§6 `typecheck(program, ctx) -> TypeNode`): the type
/// of a program is the type of its last statement, short-circuited by the
/// first error.
pub fn typeof_program(program: &Program, ctx: &mut Context, interner: &Interner) -> TyResult {
    tracing::trace!(statements = program.len(), "typechecking program");
    let mut result = Ty::None;
    for stmt in program {
        result = typeof_stmt(stmt, ctx, interner)?;
    }
    Ok(result)
}

pub fn typeof_stmt(stmt: &Stmt, ctx: &mut Context, interner: &Interner) -> TyResult {
    match stmt {
        Stmt::Assign(assign) => typeof_assign(assign, ctx, interner),
        Stmt::Return(ret) => typeof_expr(&ret.value, ctx, interner),
        Stmt::Break(_) | Stmt::Continue(_) => Ok(Ty::None),
        Stmt::Expr(expr_stmt) => typeof_expr(&expr_stmt.expr, ctx, interner),
        Stmt::If(if_stmt) => typeof_if_stmt(if_stmt, ctx, interner),
        Stmt::For(for_stmt) => typeof_for_stmt(for_stmt, ctx, interner),
        Stmt::ForEach(for_each) => typeof_for_each(for_each, ctx, interner),
    }
}

fn typeof_assign(assign: &AssignStmt, ctx: &mut Context, interner: &Interner) -> TyResult {
    // §4.3: "Function-literal assignments pre-bind the name inside the
    // function's own context before typechecking its body, enabling
    // recursion." Compound operators (`+=` etc.) are not distinguished here
    // for typing purposes — the checker synthesizes the RHS expression's
    // type and rebinds, same as a plain `=` (mirrors
    // `typechecker.go`'s `AssignStatement` case, which never inspects
    // `node.Type`).
    let value_ty = if let (AssignOp::Assign, Expr::Function(fun)) = (&assign.op, &assign.value) {
        typeof_function_literal(fun, ctx, interner, Some(assign.name))?
    } else {
        typeof_expr(&assign.value, ctx, interner)?
    };
    ctx.set(assign.name, value_ty);
    Ok(Ty::None)
}

fn typeof_if_stmt(if_stmt: &IfStmt, ctx: &mut Context, interner: &Interner) -> TyResult {
    // §9.1: an if at statement position never has a value — branches are
    // checked only for error propagation, never unified with each other.
    for cond in &if_stmt.conditions {
        typeof_stmt(cond, ctx, interner)?;
    }
    typeof_block(&if_stmt.then_block, ctx, interner)?;
    for (conds, block) in &if_stmt.elifs {
        for cond in conds {
            typeof_stmt(cond, ctx, interner)?;
        }
        typeof_block(block, ctx, interner)?;
    }
    if let Some(else_block) = &if_stmt.else_block {
        typeof_block(else_block, ctx, interner)?;
    }
    Ok(Ty::None)
}

fn typeof_for_stmt(for_stmt: &ForStmt, ctx: &mut Context, interner: &Interner) -> TyResult {
    for pre in &for_stmt.pre {
        typeof_stmt(pre, ctx, interner)?;
    }
    for cond in &for_stmt.cond {
        typeof_stmt(cond, ctx, interner)?;
    }
    for post in &for_stmt.post {
        typeof_stmt(post, ctx, interner)?;
    }
    typeof_block(&for_stmt.body, ctx, interner)?;
    Ok(Ty::None)
}

fn typeof_for_each(for_each: &ForEachStmt, ctx: &mut Context, interner: &Interner) -> TyResult {
    let coll_ty = typeof_expr(&for_each.collection, ctx, interner)?;
    let span = for_each.span;

    if for_each.loop_vars.len() > 2 {
        return Err(TypeError::new("for statements must have at most 2 loop variables", span));
    }

    match &coll_ty {
        Ty::Array(held) => {
            if for_each.loop_vars.len() == 1 {
                ctx.set(for_each.loop_vars[0], (**held).clone());
            } else {
                ctx.set(for_each.loop_vars[0], Ty::Int);
                ctx.set(for_each.loop_vars[1], (**held).clone());
            }
        }
        Ty::Dict(held) => {
            ctx.set(for_each.loop_vars[0], Ty::String);
            if for_each.loop_vars.len() > 1 {
                ctx.set(for_each.loop_vars[1], (**held).clone());
            }
        }
        other => {
            return Err(TypeError::new(format!("for statements must iterate over a collection, got={}", other), span))
        }
    }

    typeof_block(&for_each.body, ctx, interner)?;
    Ok(Ty::None)
}

/// §4.3 "Block": synthesizes each statement (short-circuiting on error),
/// then unifies the types of every `return` statement plus the block's
/// last statement. `return` statements are additionally checked against the
/// nearest enclosing function's return type (§4.3 "Return inside a
/// function"), independent of the block-unification check.
fn typeof_block(block: &Block, ctx: &mut Context, interner: &Interner) -> TyResult {
    if block.stmts.is_empty() {
        return Ok(Ty::None);
    }

    let mut return_types: Vec<Ty> = Vec::new();
    let last_index = block.stmts.len() - 1;

    for (i, stmt) in block.stmts.iter().enumerate() {
        let stmt_ty = typeof_stmt(stmt, ctx, interner)?;

        if let Stmt::Return(ret) = stmt {
            if let Some(fn_ty) = ctx.return_type() {
                if !stmt_ty.matches(fn_ty) {
                    return Err(TypeError::new("return type mismatching function type", ret.span));
                }
            }
            return_types.push(stmt_ty);
        } else if i == last_index {
            return_types.push(stmt_ty);
        }
    }

    let unified = &return_types[0];
    for ty in &return_types[1..] {
        if !ty.matches(unified) {
            return Err(TypeError::new("block does not have unified return types", block.span));
        }
    }
    Ok(unified.clone())
}

pub fn typeof_expr(expr: &Expr, ctx: &mut Context, interner: &Interner) -> TyResult {
    match expr {
        Expr::Int(..) => Ok(Ty::Int),
        Expr::Float(..) => Ok(Ty::Float),
        Expr::Bool(..) => Ok(Ty::Bool),
        Expr::Str(..) => Ok(Ty::String),
        Expr::Identifier(sym, span) => ctx
            .get(*sym)
            .ok_or_else(|| TypeError::new(format!("identifier not found: {}", interner.resolve(*sym)), *span)),
        Expr::Array(arr) => typeof_array_literal(arr, ctx, interner),
        Expr::Dict(dict) => typeof_dict_literal(dict, ctx, interner),
        Expr::Prefix(prefix) => typeof_prefix(prefix, ctx, interner),
        Expr::Infix(infix) => typeof_infix(infix, ctx, interner),
        Expr::Index(index) => typeof_index(index, ctx, interner),
        Expr::Call(call) => typeof_call(call, ctx, interner),
        Expr::Function(fun) => typeof_function_literal(fun, ctx, interner, None),
        Expr::If(if_expr) => typeof_if_expr(if_expr, ctx, interner),
        Expr::Error(span) => Err(TypeError::new("malformed expression", *span)),
    }
}

fn typeof_array_literal(
    arr: &glimmer_par::ast::ArrayExpr,
    ctx: &mut Context,
    interner: &Interner,
) -> TyResult {
    if arr.elements.is_empty() {
        let explicit = arr.explicit_type.as_ref().expect("parser requires []T for an empty array literal");
        return Ok(Ty::Array(Box::new(Ty::from_ast(explicit))));
    }
    let held = typeof_expr(&arr.elements[0], ctx, interner)?;
    for item in &arr.elements[1..] {
        let item_ty = typeof_expr(item, ctx, interner)?;
        if !item_ty.matches(&held) {
            return Err(TypeError::new("array must have matching types", arr.span));
        }
    }
    Ok(Ty::Array(Box::new(held)))
}

fn typeof_dict_literal(dict: &glimmer_par::ast::DictExpr, ctx: &mut Context, interner: &Interner) -> TyResult {
    if dict.pairs.is_empty() {
        return Ok(Ty::Dict(Box::new(Ty::None)));
    }
    let mut held: Option<Ty> = None;
    for (_key, value) in &dict.pairs {
        let value_ty = typeof_expr(value, ctx, interner)?;
        match &held {
            None => held = Some(value_ty),
            Some(h) if value_ty.matches(h) => {}
            Some(_) => return Err(TypeError::new("dict must have matching value types", dict.span)),
        }
    }
    Ok(Ty::Dict(Box::new(held.unwrap())))
}

fn typeof_prefix(prefix: &glimmer_par::ast::PrefixExpr, ctx: &mut Context, interner: &Interner) -> TyResult {
    let right = typeof_expr(&prefix.right, ctx, interner)?;
    match prefix.op {
        PrefixOp::Not => {
            if !right.is_numeric() {
                return Err(TypeError::new("input to prefix op '!' must be numeric", prefix.span));
            }
            Ok(Ty::Bool)
        }
        PrefixOp::Neg => {
            if !right.is_numeric() {
                return Err(TypeError::new("input to prefix op '-' must be numeric", prefix.span));
            }
            Ok(if right == Ty::Float { Ty::Float } else { Ty::Int })
        }
    }
}

fn typeof_infix(infix: &glimmer_par::ast::InfixExpr, ctx: &mut Context, interner: &Interner) -> TyResult {
    let left = typeof_expr(&infix.left, ctx, interner)?;
    let right = typeof_expr(&infix.right, ctx, interner)?;
    let span = infix.span;

    let numeric_err = || {
        TypeError::new(format!("infix operator for '{} {} {}' not found", left, op_str(infix.op), right), span)
    };

    match infix.op {
        InfixOp::Add | InfixOp::Sub | InfixOp::Div => {
            if left == Ty::String && right == Ty::String {
                Ok(Ty::String)
            } else if left.is_numeric() && right.is_numeric() {
                Ok(highest_promotion(&left, &right))
            } else {
                Err(numeric_err())
            }
        }
        InfixOp::Mul => {
            if left == Ty::String && right == Ty::String {
                Ok(Ty::String)
            } else if left == Ty::String && right == Ty::Int {
                Ok(Ty::String)
            } else if left.is_numeric() && right.is_numeric() {
                Ok(highest_promotion(&left, &right))
            } else {
                Err(numeric_err())
            }
        }
        InfixOp::Lt | InfixOp::Gt | InfixOp::LtEq | InfixOp::GtEq => {
            if left.is_numeric() && right.is_numeric() {
                Ok(Ty::Bool)
            } else {
                Err(numeric_err())
            }
        }
        InfixOp::Eq | InfixOp::NotEq => {
            if left == Ty::String && right == Ty::String {
                Ok(Ty::Bool)
            } else if left.is_numeric() && right.is_numeric() {
                Ok(Ty::Bool)
            } else {
                Err(numeric_err())
            }
        }
        InfixOp::And | InfixOp::Or => {
            if left.is_numeric() && right.is_numeric() {
                Ok(Ty::Bool)
            } else {
                Err(numeric_err())
            }
        }
        InfixOp::Pipe => Err(numeric_err()),
    }
}

fn op_str(op: InfixOp) -> &'static str {
    match op {
        InfixOp::Add => "+",
        InfixOp::Sub => "-",
        InfixOp::Mul => "*",
        InfixOp::Div => "/",
        InfixOp::Lt => "<",
        InfixOp::Gt => ">",
        InfixOp::LtEq => "<=",
        InfixOp::GtEq => ">=",
        InfixOp::Eq => "==",
        InfixOp::NotEq => "!=",
        InfixOp::And => "&&",
        InfixOp::Or => "||",
        InfixOp::Pipe => "|",
    }
}

fn highest_promotion(left: &Ty, right: &Ty) -> Ty {
    if *left == Ty::Float || *right == Ty::Float {
        Ty::Float
    } else {
        Ty::Int
    }
}

fn typeof_index(index: &glimmer_par::ast::IndexExpr, ctx: &mut Context, interner: &Interner) -> TyResult {
    let container = typeof_expr(&index.left, ctx, interner)?;
    let span = index.span;
    match container {
        Ty::Array(held) => {
            let idx_ty = typeof_expr(&index.index, ctx, interner)?;
            if idx_ty != Ty::Int {
                return Err(TypeError::new("index of array must be int", span));
            }
            Ok(*held)
        }
        Ty::Dict(held) => {
            let idx_ty = typeof_expr(&index.index, ctx, interner)?;
            if idx_ty != Ty::String {
                return Err(TypeError::new("index of dict must be string", span));
            }
            Ok(*held)
        }
        other => Err(TypeError::new(format!("indexed type must be array or dict, got={}", other), span)),
    }
}

fn typeof_call(call: &CallExpr, ctx: &mut Context, interner: &Interner) -> TyResult {
    if let Expr::Identifier(sym, _) = &call.callee {
        let name = interner.resolve(*sym);
        if is_builtin(name) && ctx.get(*sym).is_none() {
            return typeof_builtin_call(name, call, ctx, interner, typeof_expr);
        }
    }

    let callee_ty = typeof_expr(&call.callee, ctx, interner)?;
    let (params, ret) = match callee_ty {
        Ty::Function(params, ret) => (params, ret),
        other => return Err(TypeError::new(format!("called object must be function, got={}", other), call.span)),
    };

    if params.len() != call.args.len() {
        return Err(TypeError::new("invalid number of arguments in call", call.span));
    }
    for (i, (param_ty, arg)) in params.iter().zip(&call.args).enumerate() {
        let arg_ty = typeof_expr(arg, ctx, interner)?;
        if !arg_ty.matches(param_ty) {
            return Err(TypeError::new(format!("param type mismatch for param {} in call", i + 1), call.span));
        }
    }
    Ok(*ret)
}

/// §4.3 "Function literal": parameters are bound inside a fresh enclosed
/// context (deep copy of the surrounding one, return-type slot set to the
/// declared return type); `bind_name`, when given, additionally pre-binds
/// the function's own name into that same fresh context before the body is
/// checked, so a recursive call inside the body resolves (§9 "Cyclic and
/// self-referential structures").
fn typeof_function_literal(
    fun: &FunctionExpr,
    ctx: &Context,
    interner: &Interner,
    bind_name: Option<Symbol>,
) -> TyResult {
    let return_ty = Ty::from_ast(&fun.return_type);
    let mut param_types = Vec::with_capacity(fun.params.len());
    for param in &fun.params {
        let pty = Ty::from_ast(&param.ty);
        if pty == Ty::None {
            return Err(TypeError::new("param can not be none type", param.span));
        }
        param_types.push(pty);
    }

    let fn_ty = Ty::Function(param_types.clone(), Box::new(return_ty.clone()));

    let mut fn_ctx = Context::enclosed(ctx, return_ty.clone());
    for (param, pty) in fun.params.iter().zip(&param_types) {
        fn_ctx.set(param.name, pty.clone());
    }
    if let Some(name) = bind_name {
        fn_ctx.set(name, fn_ty.clone());
    }

    let body_ty = typeof_block(&fun.body, &mut fn_ctx, interner)?;
    if !body_ty.matches(&return_ty) {
        return Err(TypeError::new("function body type does not match return type", fun.span));
    }

    Ok(fn_ty)
}

fn typeof_if_expr(if_expr: &IfExpr, ctx: &mut Context, interner: &Interner) -> TyResult {
    for cond in &if_expr.conditions {
        typeof_stmt(cond, ctx, interner)?;
    }
    let true_ty = typeof_block(&if_expr.then_block, ctx, interner)?;

    let mut branch_types = vec![true_ty.clone()];
    for (conds, block) in &if_expr.elifs {
        for cond in conds {
            typeof_stmt(cond, ctx, interner)?;
        }
        branch_types.push(typeof_block(block, ctx, interner)?);
    }
    match &if_expr.else_block {
        Some(block) => branch_types.push(typeof_block(block, ctx, interner)?),
        None => branch_types.push(Ty::None),
    }

    let unified = &branch_types[0];
    for ty in &branch_types[1..] {
        if !ty.matches(unified) {
            return Err(TypeError::new("if branches must match types", if_expr.span));
        }
    }
    Ok(true_ty)
}
