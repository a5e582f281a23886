//! AST node definitions for Glimmer source (§3).
//!
//! Every node carries the `Span` of the token that introduced it, so later
//! stages can point diagnostics back at source positions without re-walking
//! the token stream.

use glimmer_util::{Span, Symbol};

/// A parsed program is just its top-level statements.
pub type Program = Vec<Stmt>;

#[derive(Debug, Clone, PartialEq)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Eq,
    NotEq,
    And,
    Or,
    Pipe,
}

/// A recursive type annotation (§3, §4.2 "Type-node parsing").
#[derive(Debug, Clone, PartialEq)]
pub enum TypeNode {
    Int,
    Float,
    Bool,
    String,
    None,
    Array(Box<TypeNode>),
    Dict(Box<TypeNode>),
    Function(Vec<TypeNode>, Box<TypeNode>),
    /// Produced only on a malformed type annotation; the parser has already
    /// recorded a diagnostic by the time this appears.
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Symbol,
    pub ty: TypeNode,
    pub span: Span,
}

/// The condition/branch shape shared by if-statements and if-expressions
/// (§9.1: one surface syntax, two AST families disambiguated by parse
/// position).
#[derive(Debug, Clone, PartialEq)]
pub struct IfArms {
    pub conditions: Vec<Stmt>,
    pub then_block: Block,
    pub elifs: Vec<(Vec<Stmt>, Block)>,
    pub else_block: Option<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Int(i64, Span),
    Float(f64, Span),
    Bool(bool, Span),
    Str(Symbol, Span),
    Identifier(Symbol, Span),
    Array(Box<ArrayExpr>),
    Dict(Box<DictExpr>),
    Prefix(Box<PrefixExpr>),
    Infix(Box<InfixExpr>),
    Index(Box<IndexExpr>),
    Call(Box<CallExpr>),
    Function(Box<FunctionExpr>),
    If(Box<IfExpr>),
    /// A prefix position with no registered parselet. Recorded as a
    /// diagnostic at parse time; carried through as a placeholder so the
    /// rest of the tree still has something to hang off of.
    Error(Span),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Int(_, s)
            | Expr::Float(_, s)
            | Expr::Bool(_, s)
            | Expr::Str(_, s)
            | Expr::Identifier(_, s)
            | Expr::Error(s) => *s,
            Expr::Array(e) => e.span,
            Expr::Dict(e) => e.span,
            Expr::Prefix(e) => e.span,
            Expr::Infix(e) => e.span,
            Expr::Index(e) => e.span,
            Expr::Call(e) => e.span,
            Expr::Function(e) => e.span,
            Expr::If(e) => e.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayExpr {
    pub elements: Vec<Expr>,
    /// Only set (and only meaningful) for an empty literal: `[]int`.
    pub explicit_type: Option<TypeNode>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DictExpr {
    pub pairs: Vec<(Expr, Expr)>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrefixExpr {
    pub op: PrefixOp,
    pub right: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfixExpr {
    pub op: InfixOp,
    pub left: Expr,
    pub right: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpr {
    pub left: Expr,
    pub index: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Expr,
    pub args: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpr {
    pub params: Vec<Param>,
    pub return_type: TypeNode,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfExpr {
    pub conditions: Vec<Stmt>,
    pub then_block: Block,
    pub elifs: Vec<(Vec<Stmt>, Block)>,
    pub else_block: Option<Block>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Assign(AssignStmt),
    Return(ReturnStmt),
    Break(Span),
    Continue(Span),
    Expr(ExprStmt),
    If(IfStmt),
    For(ForStmt),
    ForEach(ForEachStmt),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Assign(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::Break(s) | Stmt::Continue(s) => *s,
            Stmt::Expr(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::For(s) => s.span,
            Stmt::ForEach(s) => s.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    pub name: Symbol,
    pub op: AssignOp,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub conditions: Vec<Stmt>,
    pub then_block: Block,
    pub elifs: Vec<(Vec<Stmt>, Block)>,
    pub else_block: Option<Block>,
    pub span: Span,
}

/// C-style form: `for pre, cond, post { .. }`, each list possibly empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub pre: Vec<Stmt>,
    pub cond: Vec<Stmt>,
    pub post: Vec<Stmt>,
    pub body: Block,
    pub span: Span,
}

/// Foreach form: `for x(, y) in collection { .. }`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForEachStmt {
    pub loop_vars: Vec<Symbol>,
    pub collection: Expr,
    pub body: Block,
    pub span: Span,
}
