//! The runtime value model (§6, §9 "Control-flow sentinels as ordinary
//! values"). `Return`/`Break`/`Continue`/`Error` are constructors of `Value`
//! itself rather than a separate `Result`-style channel, so `eval` always
//! has a single uniform return type and every block/loop walk is just a
//! pattern match deciding whether to keep going or hand the value upward.

use std::fmt;
use std::rc::Rc;

use glimmer_par::ast::{Block, Param};
use glimmer_util::{Span, Symbol};
use indexmap::IndexMap;

use crate::env::Environment;

#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    String(Rc<str>),
    Array(Rc<Vec<Value>>),
    Dict(Rc<IndexMap<String, Value>>),
    Function(Rc<FunctionValue>),
    Builtin(&'static str),
    Null,
    /// Wraps the value of an executed `return` statement; unwrapped at the
    /// call boundary in `apply_function`.
    Return(Box<Value>),
    Break,
    Continue,
    Error(Rc<RuntimeError>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionValue {
    pub params: Vec<Param>,
    pub body: Block,
    pub env: Environment,
    /// Set when this function was the right-hand side of a plain
    /// assignment (§9 "recursion via a self-binding back-edge"). A call
    /// rebinds this name to the function itself in the fresh call frame, so
    /// a recursive call inside the body resolves without needing the
    /// closure's own captured environment to already contain itself.
    pub self_name: Option<Symbol>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeError {
    pub message: String,
    pub span: Span,
}

impl Value {
    pub fn error(message: impl Into<String>, span: Span) -> Value {
        Value::Error(Rc::new(RuntimeError { message: message.into(), span }))
    }

    pub fn string(s: impl Into<Rc<str>>) -> Value {
        Value::String(s.into())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Any of the four control sentinels (§4.4, §9): a non-loop block
    /// forwards all of them outward unchanged; a loop body consumes
    /// `Break`/`Continue` itself and forwards only `Return`/`Error`.
    pub fn is_signal(&self) -> bool {
        matches!(self, Value::Return(_) | Value::Break | Value::Continue | Value::Error(_))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_) | Value::Bool(_))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Dict(_) => "dict",
            Value::Function(_) | Value::Builtin(_) => "function",
            Value::Null => "none",
            Value::Return(_) => "return",
            Value::Break => "break",
            Value::Continue => "continue",
            Value::Error(_) => "error",
        }
    }

    /// §9's "fragile" truthiness quirk, preserved intentionally: everything
    /// but `Null`/`false`/the literal string `"0"` is truthy, decided by
    /// comparing the value's own printed form against `"0"` rather than by
    /// a dedicated boolean coercion per variant.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            other => other.to_string() != "0",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Array(elems) => {
                write!(f, "[")?;
                for (i, e) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{e}")?;
                }
                write!(f, "]")
            }
            Value::Dict(pairs) => {
                write!(f, "{{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
            Value::Function(fun) => write!(f, "fn({} params)", fun.params.len()),
            Value::Builtin(name) => write!(f, "builtin fn {name}"),
            Value::Null => write!(f, "null"),
            Value::Return(inner) => write!(f, "{inner}"),
            Value::Break => write!(f, "break"),
            Value::Continue => write!(f, "continue"),
            Value::Error(err) => write!(f, "ERROR: {}", err.message),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Dict(a), Value::Dict(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Break, Value::Break) | (Value::Continue, Value::Continue) => true,
            (Value::Error(a), Value::Error(b)) => a == b,
            _ => false,
        }
    }
}
