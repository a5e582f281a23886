//! The tree-walking evaluator (§4.4, §9). Every `eval_*` function returns a
//! plain `Value`; control-flow sentinels ride through the same channel as
//! ordinary results; see `value::Value::is_signal`.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

use glimmer_par::ast::{
    ArrayExpr, AssignOp, AssignStmt, Block, CallExpr, DictExpr, Expr, ForEachStmt, ForStmt, FunctionExpr, IfExpr,
    IfStmt, IndexExpr, InfixExpr, InfixOp, PrefixExpr, PrefixOp, Program, Stmt,
};
use glimmer_util::{Interner, Span, Symbol};

use crate::builtins::{build_dict, call_builtin, is_builtin};
use crate::env::Environment;
use crate::value::{FunctionValue, Value};

/// §10.3's recursion-depth guard: a practical safety net absent from
/// spec.md's Non-goals (it names no language feature), not a language-level
/// construct. `glimmer-cli` may raise or lower this from its config at
/// startup via `set_max_call_depth`; library callers (tests, other
/// embedders) get a generous default.
pub const DEFAULT_MAX_CALL_DEPTH: u32 = 2048;

static MAX_CALL_DEPTH: AtomicU32 = AtomicU32::new(DEFAULT_MAX_CALL_DEPTH);

thread_local! {
    static CALL_DEPTH: Cell<u32> = const { Cell::new(0) };
}

pub fn set_max_call_depth(limit: u32) {
    MAX_CALL_DEPTH.store(limit, Ordering::Relaxed);
}

struct CallDepthGuard;

impl Drop for CallDepthGuard {
    fn drop(&mut self) {
        CALL_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

fn enter_call(span: Span) -> Result<CallDepthGuard, Value> {
    let depth = CALL_DEPTH.with(|d| {
        let next = d.get() + 1;
        d.set(next);
        next
    });
    if depth > MAX_CALL_DEPTH.load(Ordering::Relaxed) {
        CALL_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
        return Err(Value::error("maximum recursion depth exceeded", span));
    }
    Ok(CallDepthGuard)
}

pub fn eval_program(program: &Program, env: &mut Environment, interner: &Interner) -> Value {
    let mut result = Value::Null;
    for stmt in program {
        result = eval_stmt(stmt, env, interner);
        if let Value::Return(inner) = result {
            return *inner;
        }
        if result.is_error() {
            return result;
        }
    }
    result
}

pub fn eval_stmt(stmt: &Stmt, env: &mut Environment, interner: &Interner) -> Value {
    match stmt {
        Stmt::Assign(assign) => eval_assign(assign, env, interner),
        Stmt::Return(ret) => {
            let v = eval_expr(&ret.value, env, interner);
            if v.is_error() { v } else { Value::Return(Box::new(v)) }
        }
        Stmt::Break(_) => Value::Break,
        Stmt::Continue(_) => Value::Continue,
        Stmt::Expr(expr_stmt) => eval_expr(&expr_stmt.expr, env, interner),
        Stmt::If(if_stmt) => eval_if_stmt(if_stmt, env, interner),
        Stmt::For(for_stmt) => eval_for_stmt(for_stmt, env, interner),
        Stmt::ForEach(for_each) => eval_for_each(for_each, env, interner),
    }
}

fn eval_assign(assign: &AssignStmt, env: &mut Environment, interner: &Interner) -> Value {
    // §11 "compound assignment desugars to the same infix-eval path as a
    // plain binary expression": `x += 1` evaluates as `x = x + 1` rather
    // than through a separate mutate-in-place code path.
    let value = if let (AssignOp::Assign, Expr::Function(fun)) = (&assign.op, &assign.value) {
        eval_function_literal(fun, env, interner, Some(assign.name))
    } else {
        let rhs = eval_expr(&assign.value, env, interner);
        if rhs.is_error() {
            return rhs;
        }
        match assign.op {
            AssignOp::Assign => rhs,
            AssignOp::AddAssign | AssignOp::SubAssign | AssignOp::MulAssign | AssignOp::DivAssign => {
                let current = env.get(assign.name).unwrap_or(Value::Null);
                let op = match assign.op {
                    AssignOp::AddAssign => InfixOp::Add,
                    AssignOp::SubAssign => InfixOp::Sub,
                    AssignOp::MulAssign => InfixOp::Mul,
                    AssignOp::DivAssign => InfixOp::Div,
                    AssignOp::Assign => unreachable!(),
                };
                eval_infix_values(current, rhs, op, assign.span)
            }
        }
    };
    if value.is_error() {
        return value;
    }
    env.set(assign.name, value);
    Value::Null
}

fn eval_if_stmt(if_stmt: &IfStmt, env: &mut Environment, interner: &Interner) -> Value {
    match eval_conditions(&if_stmt.conditions, env, interner) {
        Err(v) => return v,
        Ok(true) => return eval_block(&if_stmt.then_block, env, interner),
        Ok(false) => {}
    }
    for (conds, block) in &if_stmt.elifs {
        match eval_conditions(conds, env, interner) {
            Err(v) => return v,
            Ok(true) => return eval_block(block, env, interner),
            Ok(false) => {}
        }
    }
    if let Some(else_block) = &if_stmt.else_block {
        return eval_block(else_block, env, interner);
    }
    Value::Null
}

fn eval_if_expr(if_expr: &IfExpr, env: &mut Environment, interner: &Interner) -> Value {
    match eval_conditions(&if_expr.conditions, env, interner) {
        Err(v) => return v,
        Ok(true) => return eval_block(&if_expr.then_block, env, interner),
        Ok(false) => {}
    }
    for (conds, block) in &if_expr.elifs {
        match eval_conditions(conds, env, interner) {
            Err(v) => return v,
            Ok(true) => return eval_block(block, env, interner),
            Ok(false) => {}
        }
    }
    if let Some(else_block) = &if_expr.else_block {
        return eval_block(else_block, env, interner);
    }
    Value::Null
}

/// Runs a condition's statement list once in order, each statement
/// evaluated exactly once: every statement but the last purely for effect
/// (an error/return/break/continue among them short-circuits immediately),
/// and the last statement's own value decides truthiness.
fn eval_conditions(conds: &[Stmt], env: &mut Environment, interner: &Interner) -> Result<bool, Value> {
    let mut last = Value::Null;
    for cond in conds {
        last = eval_stmt(cond, env, interner);
        if last.is_signal() {
            return Err(last);
        }
    }
    Ok(last.is_truthy())
}

fn eval_for_stmt(for_stmt: &ForStmt, env: &mut Environment, interner: &Interner) -> Value {
    for pre in &for_stmt.pre {
        let v = eval_stmt(pre, env, interner);
        if v.is_signal() {
            return v;
        }
    }
    loop {
        if !for_stmt.cond.is_empty() {
            match eval_conditions(&for_stmt.cond, env, interner) {
                Err(v) => return v,
                Ok(false) => break,
                Ok(true) => {}
            }
        }

        let body_result = eval_loop_body(&for_stmt.body, env, interner);
        match body_result {
            Value::Break => break,
            v if v.is_signal() => return v,
            _ => {}
        }

        for post in &for_stmt.post {
            let v = eval_stmt(post, env, interner);
            if v.is_signal() {
                return v;
            }
        }
    }
    Value::Null
}

fn eval_for_each(for_each: &ForEachStmt, env: &mut Environment, interner: &Interner) -> Value {
    let collection = eval_expr(&for_each.collection, env, interner);
    if collection.is_error() {
        return collection;
    }

    match collection {
        Value::Array(elems) => {
            for (i, elem) in elems.iter().enumerate() {
                if for_each.loop_vars.len() == 1 {
                    env.set(for_each.loop_vars[0], elem.clone());
                } else {
                    env.set(for_each.loop_vars[0], Value::Int(i as i64));
                    env.set(for_each.loop_vars[1], elem.clone());
                }
                let body_result = eval_loop_body(&for_each.body, env, interner);
                match body_result {
                    Value::Break => break,
                    v if v.is_signal() => return v,
                    _ => {}
                }
            }
            Value::Null
        }
        Value::Dict(pairs) => {
            for (key, value) in pairs.iter() {
                env.set(for_each.loop_vars[0], Value::string(key.as_str()));
                if for_each.loop_vars.len() > 1 {
                    env.set(for_each.loop_vars[1], value.clone());
                }
                let body_result = eval_loop_body(&for_each.body, env, interner);
                match body_result {
                    Value::Break => break,
                    v if v.is_signal() => return v,
                    _ => {}
                }
            }
            Value::Null
        }
        other => Value::error(format!("for statements must iterate over a collection, got={}", other.type_name()), for_each.span),
    }
}

/// A loop body is an ordinary block, except `Break`/`Continue` reaching its
/// own top level are the loop's own business, not a signal to propagate
/// further (§4.4 "Inside non-loop blocks they propagate outward like
/// errors would" implies the converse: a loop consumes them for itself).
fn eval_loop_body(block: &Block, env: &mut Environment, interner: &Interner) -> Value {
    eval_block(block, env, interner)
}

/// §4.4 "Block": statements execute in order; the four control sentinels
/// (`Return`/`Break`/`Continue`/`Error`) reaching the top level of this
/// block short-circuit the rest of it and are handed to the caller
/// unchanged — including `Break`/`Continue`, which a plain nested `if`
/// cannot consume itself. Only `eval_for_stmt`/`eval_for_each`, which are
/// the actual loop bodies, intercept `Break`/`Continue` before they escape
/// further.
fn eval_block(block: &Block, env: &mut Environment, interner: &Interner) -> Value {
    let mut result = Value::Null;
    for stmt in &block.stmts {
        result = eval_stmt(stmt, env, interner);
        if result.is_signal() {
            return result;
        }
    }
    result
}

pub fn eval_expr(expr: &Expr, env: &mut Environment, interner: &Interner) -> Value {
    match expr {
        Expr::Int(n, _) => Value::Int(*n),
        Expr::Float(n, _) => Value::Float(*n),
        Expr::Bool(b, _) => Value::Bool(*b),
        Expr::Str(sym, _) => Value::string(interner.resolve(*sym)),
        Expr::Identifier(sym, span) => env
            .get(*sym)
            .unwrap_or_else(|| Value::error(format!("identifier not found: {}", interner.resolve(*sym)), *span)),
        Expr::Array(arr) => eval_array_literal(arr, env, interner),
        Expr::Dict(dict) => eval_dict_literal(dict, env, interner),
        Expr::Prefix(prefix) => eval_prefix(prefix, env, interner),
        Expr::Infix(infix) => eval_infix(infix, env, interner),
        Expr::Index(index) => eval_index(index, env, interner),
        Expr::Call(call) => eval_call(call, env, interner),
        Expr::Function(fun) => eval_function_literal(fun, env, interner, None),
        Expr::If(if_expr) => eval_if_expr(if_expr, env, interner),
        Expr::Error(span) => Value::error("malformed expression", *span),
    }
}

fn eval_array_literal(arr: &ArrayExpr, env: &mut Environment, interner: &Interner) -> Value {
    let mut elems = Vec::with_capacity(arr.elements.len());
    for e in &arr.elements {
        let v = eval_expr(e, env, interner);
        if v.is_error() {
            return v;
        }
        elems.push(v);
    }
    Value::Array(Rc::new(elems))
}

fn eval_dict_literal(dict: &DictExpr, env: &mut Environment, interner: &Interner) -> Value {
    let mut pairs = Vec::with_capacity(dict.pairs.len());
    for (key_expr, value_expr) in &dict.pairs {
        let key = dict_key_of(key_expr, env, interner);
        let key = match key {
            Ok(k) => k,
            Err(e) => return e,
        };
        let value = eval_expr(value_expr, env, interner);
        if value.is_error() {
            return value;
        }
        pairs.push((key, value));
    }
    build_dict(pairs)
}

/// A dict literal's keys may be bare identifiers (`{one: 1}`) used as
/// shorthand for their own name, or arbitrary expressions evaluating to a
/// string (`{"one": 1}`, `{keyExpr(): 1}`) — matches the parser accepting
/// any expression in key position (§4.2).
fn dict_key_of(key_expr: &Expr, env: &mut Environment, interner: &Interner) -> Result<String, Value> {
    if let Expr::Identifier(sym, _) = key_expr {
        if env.get(*sym).is_none() {
            return Ok(interner.resolve(*sym).to_string());
        }
    }
    match eval_expr(key_expr, env, interner) {
        Value::String(s) => Ok(s.to_string()),
        v if v.is_error() => Err(v),
        other => Err(Value::error(format!("dict keys must be string, got={}", other.type_name()), key_expr.span())),
    }
}

fn eval_prefix(prefix: &PrefixExpr, env: &mut Environment, interner: &Interner) -> Value {
    let right = eval_expr(&prefix.right, env, interner);
    if right.is_error() {
        return right;
    }
    match prefix.op {
        PrefixOp::Not => match promote_to_bool(&right, prefix.span) {
            Ok(b) => Value::Bool(!b),
            Err(e) => e,
        },
        PrefixOp::Neg => match &right {
            Value::Int(n) => Value::Int(-n),
            Value::Float(n) => Value::Float(-n),
            Value::Bool(b) => Value::Int(-(*b as i64)),
            other => Value::error(format!("input to prefix op '-' must be numeric, got={}", other.type_name()), prefix.span),
        },
    }
}

fn eval_infix(infix: &InfixExpr, env: &mut Environment, interner: &Interner) -> Value {
    let left = eval_expr(&infix.left, env, interner);
    if left.is_error() {
        return left;
    }
    let right = eval_expr(&infix.right, env, interner);
    if right.is_error() {
        return right;
    }
    eval_infix_values(left, right, infix.op, infix.span)
}

fn eval_infix_values(left: Value, right: Value, op: InfixOp, span: Span) -> Value {
    match (&left, &right) {
        (Value::String(a), Value::String(b)) => eval_string_string_infix(a, b, op, span),
        (Value::String(a), Value::Int(b)) => eval_string_int_infix(a, *b, op, span),
        _ if left.is_numeric() && right.is_numeric() => eval_numeric_infix(&left, &right, op, span),
        _ => Value::error(
            format!("infix operator for '{} {} {}' not found", left.type_name(), op_str(op), right.type_name()),
            span,
        ),
    }
}

fn eval_string_string_infix(a: &str, b: &str, op: InfixOp, span: Span) -> Value {
    match op {
        InfixOp::Add => Value::string(format!("{a}{b}")),
        InfixOp::Sub => Value::string(a.replacen(b, "", 1)),
        InfixOp::Div => Value::string(a.replace(b, "")),
        InfixOp::Mul => {
            // Character cross product: every character of `a` paired with
            // every character of `b`, concatenated in row-major order.
            let mut out = String::with_capacity(a.len() * b.len());
            for ca in a.chars() {
                for cb in b.chars() {
                    out.push(ca);
                    out.push(cb);
                }
            }
            Value::string(out)
        }
        InfixOp::Eq => Value::Bool(a == b),
        InfixOp::NotEq => Value::Bool(a != b),
        other => Value::error(format!("infix operator for 'string {} string' not found", op_str(other)), span),
    }
}

fn eval_string_int_infix(a: &str, b: i64, op: InfixOp, span: Span) -> Value {
    match op {
        InfixOp::Mul if b >= 0 => Value::string(a.repeat(b as usize)),
        _ => Value::error(format!("infix operator for 'string {} int' not found", op_str(op)), span),
    }
}

fn eval_numeric_infix(left: &Value, right: &Value, op: InfixOp, span: Span) -> Value {
    match op {
        InfixOp::And | InfixOp::Or => {
            let l = match promote_to_bool(left, span) {
                Ok(b) => b,
                Err(e) => return e,
            };
            let r = match promote_to_bool(right, span) {
                Ok(b) => b,
                Err(e) => return e,
            };
            Value::Bool(if op == InfixOp::And { l && r } else { l || r })
        }
        _ if matches!(left, Value::Float(_)) || matches!(right, Value::Float(_)) => {
            let l = promote_to_float(left);
            let r = promote_to_float(right);
            eval_float_infix(l, r, op, span)
        }
        _ => {
            let l = promote_to_int(left);
            let r = promote_to_int(right);
            eval_int_infix(l, r, op, span)
        }
    }
}

fn eval_int_infix(l: i64, r: i64, op: InfixOp, span: Span) -> Value {
    match op {
        InfixOp::Add => Value::Int(l + r),
        InfixOp::Sub => Value::Int(l - r),
        InfixOp::Mul => Value::Int(l * r),
        InfixOp::Div => {
            if r == 0 {
                Value::error("division by zero", span)
            } else {
                Value::Int(l / r)
            }
        }
        InfixOp::Lt => Value::Bool(l < r),
        InfixOp::Gt => Value::Bool(l > r),
        InfixOp::LtEq => Value::Bool(l <= r),
        InfixOp::GtEq => Value::Bool(l >= r),
        InfixOp::Eq => Value::Bool(l == r),
        InfixOp::NotEq => Value::Bool(l != r),
        InfixOp::And | InfixOp::Or => unreachable!("handled in eval_numeric_infix"),
        InfixOp::Pipe => Value::error("infix operator for '|' not found", span),
    }
}

fn eval_float_infix(l: f64, r: f64, op: InfixOp, span: Span) -> Value {
    match op {
        InfixOp::Add => Value::Float(l + r),
        InfixOp::Sub => Value::Float(l - r),
        InfixOp::Mul => Value::Float(l * r),
        InfixOp::Div => Value::Float(l / r),
        InfixOp::Lt => Value::Bool(l < r),
        InfixOp::Gt => Value::Bool(l > r),
        InfixOp::LtEq => Value::Bool(l <= r),
        InfixOp::GtEq => Value::Bool(l >= r),
        InfixOp::Eq => Value::Bool(l == r),
        InfixOp::NotEq => Value::Bool(l != r),
        InfixOp::And | InfixOp::Or => unreachable!("handled in eval_numeric_infix"),
        InfixOp::Pipe => Value::error("infix operator for '|' not found", span),
    }
}

fn promote_to_int(v: &Value) -> i64 {
    match v {
        Value::Int(n) => *n,
        Value::Bool(b) => *b as i64,
        Value::Float(n) => *n as i64,
        _ => unreachable!("promote_to_int called on a non-numeric value"),
    }
}

fn promote_to_float(v: &Value) -> f64 {
    match v {
        Value::Float(n) => *n,
        Value::Int(n) => *n as f64,
        Value::Bool(b) => *b as i64 as f64,
        _ => unreachable!("promote_to_float called on a non-numeric value"),
    }
}

fn promote_to_bool(v: &Value, span: Span) -> Result<bool, Value> {
    match v {
        Value::Bool(b) => Ok(*b),
        Value::Int(n) => Ok(*n != 0),
        Value::Float(n) => Ok(*n != 0.0),
        other => Err(Value::error(format!("input must be numeric, got={}", other.type_name()), span)),
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

fn eval_index(index: &IndexExpr, env: &mut Environment, interner: &Interner) -> Value {
    let container = eval_expr(&index.left, env, interner);
    if container.is_error() {
        return container;
    }
    let idx = eval_expr(&index.index, env, interner);
    if idx.is_error() {
        return idx;
    }
    let span = index.span;

    match (&container, &idx) {
        (Value::Array(elems), Value::Int(i)) => {
            if *i < 0 || *i as usize >= elems.len() {
                Value::error(format!("Index {i} out of range for array of length {}", elems.len()), span)
            } else {
                elems[*i as usize].clone()
            }
        }
        (Value::Dict(pairs), Value::String(key)) => pairs
            .get(key.as_ref())
            .cloned()
            .unwrap_or_else(|| Value::error(format!("key `{key}` not found in dict"), span)),
        (Value::Array(_), other) => {
            Value::error(format!("index of array must be int, got={}", other.type_name()), span)
        }
        (Value::Dict(_), other) => {
            Value::error(format!("index of dict must be string, got={}", other.type_name()), span)
        }
        (other, _) => Value::error(format!("indexed type must be array or dict, got={}", other.type_name()), span),
    }
}

fn eval_call(call: &CallExpr, env: &mut Environment, interner: &Interner) -> Value {
    if let Expr::Identifier(sym, _) = &call.callee {
        let name = interner.resolve(*sym);
        if is_builtin(name) && env.get(*sym).is_none() {
            let mut args = Vec::with_capacity(call.args.len());
            for a in &call.args {
                let v = eval_expr(a, env, interner);
                if v.is_error() {
                    return v;
                }
                args.push(v);
            }
            return call_builtin(name, &args, call.span);
        }
    }

    let callee = eval_expr(&call.callee, env, interner);
    if callee.is_error() {
        return callee;
    }

    let mut args = Vec::with_capacity(call.args.len());
    for a in &call.args {
        let v = eval_expr(a, env, interner);
        if v.is_error() {
            return v;
        }
        args.push(v);
    }

    apply_function(&callee, args, call.span, interner)
}

fn apply_function(callee: &Value, args: Vec<Value>, span: Span, interner: &Interner) -> Value {
    match callee {
        Value::Function(fun) => {
            if fun.params.len() != args.len() {
                return Value::error(
                    format!("wrong number of arguments. got={}, want={}", args.len(), fun.params.len()),
                    span,
                );
            }
            let _depth_guard = match enter_call(span) {
                Ok(guard) => guard,
                Err(e) => return e,
            };
            tracing::trace!(params = fun.params.len(), "crossing into function call");
            let mut call_env = Environment::enclosed(&fun.env);
            if let Some(self_name) = fun.self_name {
                call_env.set(self_name, callee.clone());
            }
            for (param, arg) in fun.params.iter().zip(args) {
                call_env.set(param.name, arg);
            }
            match eval_block(&fun.body, &mut call_env, interner) {
                Value::Return(inner) => *inner,
                other => other,
            }
        }
        Value::Builtin(name) => {
            tracing::trace!(name, "dispatching builtin");
            call_builtin(name, &args, span)
        }
        other => Value::error(format!("not a function: {}", other.type_name()), span),
    }
}

/// §9 "Recursion via a self-binding back-edge": a function literal on the
/// right-hand side of a plain assignment remembers its own name; `assign`
/// binds that name into the enclosing scope as usual, and every *call*
/// additionally rebinds it into that call's own fresh frame (see
/// `apply_function`) so a call from within the body resolves back to this
/// same function, without requiring the closure's captured environment to
/// already contain a reference to itself.
fn eval_function_literal(
    fun: &FunctionExpr,
    env: &mut Environment,
    _interner: &Interner,
    bind_name: Option<Symbol>,
) -> Value {
    Value::Function(Rc::new(FunctionValue {
        params: fun.params.clone(),
        body: fun.body.clone(),
        env: env.clone(),
        self_name: bind_name,
    }))
}
