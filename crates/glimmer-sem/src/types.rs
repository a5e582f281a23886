//! The synthesized type lattice (§3 "Type nodes", §4.3) and the distinguished
//! error carried by a failed `typeof` call.

use std::fmt;

use glimmer_par::ast::TypeNode as AstType;
use glimmer_util::Span;

/// A type produced by `typeof`. Mirrors the closed set of type-node variants
/// in §3 exactly; there is no `Error` member here on purpose — a failed
/// synthesis is a `TypeError` carried in the `Err` side of `TyResult`
/// instead, so the happy path never has to pattern-match an error out of an
/// otherwise-concrete type lattice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ty {
    Int,
    Float,
    Bool,
    String,
    None,
    Array(Box<Ty>),
    Dict(Box<Ty>),
    Function(Vec<Ty>, Box<Ty>),
}

impl Ty {
    /// Structural type-string equality (§4.3's "type-string equality is the
    /// comparison"): every unification check in the checker compares two
    /// types by this, not by Rust's derived `PartialEq`, to mirror the
    /// source's `String() != String()` comparisons exactly (distinguishing,
    /// e.g., the fact that two `Ty::Array(Int)` built from different call
    /// sites must still be considered the same type).
    pub fn matches(&self, other: &Ty) -> bool {
        self.to_string() == other.to_string()
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Ty::Int | Ty::Float | Ty::Bool)
    }

    /// Converts a parsed type annotation (`array[int]`, `fn(int) -> bool`,
    /// ...) into the synthesized lattice. The parser only ever emits
    /// `TypeNode::Error` after it has already recorded a diagnostic, so this
    /// maps it to `Ty::None` — by the time a typecheck runs over a program
    /// with parse errors, the caller has already bailed out on those.
    pub fn from_ast(node: &AstType) -> Ty {
        match node {
            AstType::Int => Ty::Int,
            AstType::Float => Ty::Float,
            AstType::Bool => Ty::Bool,
            AstType::String => Ty::String,
            AstType::None => Ty::None,
            AstType::Array(inner) => Ty::Array(Box::new(Ty::from_ast(inner))),
            AstType::Dict(inner) => Ty::Dict(Box::new(Ty::from_ast(inner))),
            AstType::Function(params, ret) => {
                Ty::Function(params.iter().map(Ty::from_ast).collect(), Box::new(Ty::from_ast(ret)))
            }
            AstType::Error => Ty::None,
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Int => write!(f, "int"),
            Ty::Float => write!(f, "float"),
            Ty::Bool => write!(f, "bool"),
            Ty::String => write!(f, "string"),
            Ty::None => write!(f, "none"),
            Ty::Array(inner) => write!(f, "array[{}]", inner),
            Ty::Dict(inner) => write!(f, "dict[{}]", inner),
            Ty::Function(params, ret) => {
                write!(f, "fn(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", p)?;
                }
                write!(f, ") -> {}", ret)
            }
        }
    }
}

/// A failed type synthesis (§7 "a distinguished `ErrorType` carrying
/// line/col/message"). Its `Display` impl is the exact wire format spec'd in
/// §6: `"Static TypeError at [<line>,<col>]: <msg>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeError {
    pub message: String,
    pub span: Span,
}

impl TypeError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        TypeError { message: message.into(), span }
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Static TypeError at {}: {}", self.span, self.message)
    }
}

pub type TyResult = Result<Ty, TypeError>;
