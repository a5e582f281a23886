//! A pretty-printer used to test the parser's precedence laws (§8): for an
//! expression whose printed form is `s`, re-parsing `s` must print back to
//! `s`. Mirrors the fully-parenthesized `String()` methods in the teacher's
//! source AST (`ast_exprs.go`/`ast_literals.go`), adapted to Glimmer's node
//! set.

use glimmer_util::Interner;

use crate::ast::{Expr, InfixOp, PrefixOp};

fn prefix_op_str(op: PrefixOp) -> &'static str {
    match op {
        PrefixOp::Neg => "-",
        PrefixOp::Not => "!",
    }
}

fn infix_op_str(op: InfixOp) -> &'static str {
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

/// Prints the fully-parenthesized form of `expr`. Only the node kinds named
/// in §8's precedence laws (literals, prefix, infix, index, call,
/// identifier) need to round-trip; other node kinds print a best-effort
/// form that is not claimed to be idempotent.
pub fn print_expr(expr: &Expr, interner: &Interner) -> String {
    match expr {
        Expr::Int(n, _) => n.to_string(),
        Expr::Float(n, _) => format!("{}", n),
        Expr::Bool(b, _) => b.to_string(),
        Expr::Str(sym, _) => interner.resolve(*sym).to_string(),
        Expr::Identifier(sym, _) => interner.resolve(*sym).to_string(),
        Expr::Prefix(p) => format!("({}{})", prefix_op_str(p.op), print_expr(&p.right, interner)),
        Expr::Infix(i) => format!(
            "({} {} {})",
            print_expr(&i.left, interner),
            infix_op_str(i.op),
            print_expr(&i.right, interner)
        ),
        Expr::Index(ix) => format!("({}[{}])", print_expr(&ix.left, interner), print_expr(&ix.index, interner)),
        Expr::Call(c) => {
            let args: Vec<String> = c.args.iter().map(|a| print_expr(a, interner)).collect();
            format!("{}({})", print_expr(&c.callee, interner), args.join(", "))
        }
        Expr::Array(arr) => {
            let elems: Vec<String> = arr.elements.iter().map(|e| print_expr(e, interner)).collect();
            format!("[{}]", elems.join(", "))
        }
        Expr::Dict(_) => "{..}".to_string(),
        Expr::Function(_) => "fn(..)".to_string(),
        Expr::If(_) => "if(..)".to_string(),
        Expr::Error(_) => "<error>".to_string(),
    }
}
