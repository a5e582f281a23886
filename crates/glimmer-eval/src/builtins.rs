//! Runtime behavior for the 8 built-in calls (§4.5), dispatched by name
//! before ever trying to resolve the callee as a user binding — mirrors
//! `evaluator/builtins.go`'s flat switch over the callee identifier.
//!
//! `range` has no counterpart upstream; it is added here because §4.5's
//! builtin table requires it and the evaluator this crate is modeled on
//! simply never got around to implementing it.

use std::rc::Rc;

use glimmer_util::Span;
use indexmap::IndexMap;

use crate::value::Value;

pub const BUILTIN_NAMES: &[&str] = &["print", "len", "head", "tail", "slice", "push", "pop", "range"];

pub fn is_builtin(name: &str) -> bool {
    BUILTIN_NAMES.contains(&name)
}

pub fn call_builtin(name: &str, args: &[Value], span: Span) -> Value {
    match name {
        "print" => {
            for a in args {
                println!("{a}");
            }
            Value::Null
        }
        "len" => {
            if args.len() != 1 {
                return wrong_arity("len", args.len(), span);
            }
            match &args[0] {
                Value::Array(elems) => Value::Int(elems.len() as i64),
                Value::String(s) => Value::Int(s.len() as i64),
                other => Value::error(format!("argument to `len` not supported, got={}", other.type_name()), span),
            }
        }
        "head" => {
            if args.len() != 1 {
                return wrong_arity("head", args.len(), span);
            }
            match &args[0] {
                Value::Array(elems) => elems.first().cloned().unwrap_or(Value::Null),
                other => Value::error(format!("argument to `head` must be array, got={}", other.type_name()), span),
            }
        }
        "tail" => {
            if args.len() != 1 {
                return wrong_arity("tail", args.len(), span);
            }
            match &args[0] {
                Value::Array(elems) => elems.last().cloned().unwrap_or(Value::Null),
                other => Value::error(format!("argument to `tail` must be array, got={}", other.type_name()), span),
            }
        }
        "slice" => call_slice(args, span),
        "push" => {
            if args.len() != 2 {
                return wrong_arity("push", args.len(), span);
            }
            match &args[0] {
                Value::Array(elems) => {
                    let mut next = (**elems).clone();
                    next.push(args[1].clone());
                    Value::Array(Rc::new(next))
                }
                other => Value::error(format!("argument to `push` must be array, got={}", other.type_name()), span),
            }
        }
        "pop" => {
            if args.len() != 1 {
                return wrong_arity("pop", args.len(), span);
            }
            match &args[0] {
                Value::Array(elems) => {
                    let next = if elems.is_empty() { Vec::new() } else { elems[..elems.len() - 1].to_vec() };
                    Value::Array(Rc::new(next))
                }
                other => Value::error(format!("argument to `pop` must be array, got={}", other.type_name()), span),
            }
        }
        "range" => call_range(args, span),
        other => Value::error(format!("unknown builtin `{other}`"), span),
    }
}

fn wrong_arity(name: &str, got: usize, span: Span) -> Value {
    Value::error(format!("wrong number of arguments. got={got}, want for `{name}`"), span)
}

fn call_slice(args: &[Value], span: Span) -> Value {
    if args.len() != 3 {
        return wrong_arity("slice", args.len(), span);
    }
    let elems = match &args[0] {
        Value::Array(elems) => elems,
        other => return Value::error(format!("argument to `slice` must be array, got={}", other.type_name()), span),
    };
    let (start, end) = match (&args[1], &args[2]) {
        (Value::Int(s), Value::Int(e)) => (*s, *e),
        _ => return Value::error("arguments 2 and 3 to `slice` must be int", span),
    };
    let length = elems.len() as i64;

    if start > end {
        return Value::error(format!("invalid slice index {start} > {end}"), span);
    }
    if start < 0 || start >= length {
        return Value::error(format!("start index {start} out of range for array of length {length}"), span);
    }
    if end < 0 || end >= length {
        return Value::error(format!("end index {end} out of range for array of length {length}"), span);
    }

    Value::Array(Rc::new(elems[start as usize..end as usize].to_vec()))
}

fn call_range(args: &[Value], span: Span) -> Value {
    if args.is_empty() || args.len() > 3 {
        return wrong_arity("range", args.len(), span);
    }
    let mut ints = Vec::with_capacity(args.len());
    for a in args {
        match a {
            Value::Int(n) => ints.push(*n),
            other => return Value::error(format!("arguments to `range` must be int, got={}", other.type_name()), span),
        }
    }
    let (start, stop, step) = match ints.as_slice() {
        [stop] => (0, *stop, 1),
        [start, stop] => (*start, *stop, 1),
        [start, stop, step] => (*start, *stop, *step),
        _ => unreachable!("arity already checked"),
    };
    if step == 0 {
        return Value::error("range step must not be 0", span);
    }

    let mut out = Vec::new();
    let mut i = start;
    if step > 0 {
        while i < stop {
            out.push(Value::Int(i));
            i += step;
        }
    } else {
        while i > stop {
            out.push(Value::Int(i));
            i += step;
        }
    }
    Value::Array(Rc::new(out))
}

/// Constructs a `Value::Dict` from evaluated key/value pairs, keyed by the
/// key expression's printed form (§4.2: dict keys are strings at the type
/// level, and index expressions are checked against `string` — using the
/// same `Display` used for printing keeps literal-key and computed-key
/// dicts consistent with each other).
pub fn build_dict(pairs: Vec<(String, Value)>) -> Value {
    let mut map = IndexMap::with_capacity(pairs.len());
    for (k, v) in pairs {
        map.insert(k, v);
    }
    Value::Dict(Rc::new(map))
}
