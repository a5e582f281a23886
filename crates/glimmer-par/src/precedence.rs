//! The precedence ladder of §4.2, low to high.

use glimmer_lex::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Pipe,
    Equals,
    BooleanOp,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
    Index,
}

pub fn precedence_of(kind: &TokenKind) -> Precedence {
    match kind {
        TokenKind::Pipe => Precedence::Pipe,
        TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
        TokenKind::AndAnd | TokenKind::OrOr => Precedence::BooleanOp,
        TokenKind::Lt | TokenKind::Gt | TokenKind::LtEq | TokenKind::GtEq => {
            Precedence::LessGreater
        }
        TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
        TokenKind::Star | TokenKind::Slash => Precedence::Product,
        TokenKind::LParen => Precedence::Call,
        TokenKind::LBracket => Precedence::Index,
        _ => Precedence::Lowest,
    }
}

pub fn has_infix(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::Lt
            | TokenKind::Gt
            | TokenKind::LtEq
            | TokenKind::GtEq
            | TokenKind::Eq
            | TokenKind::NotEq
            | TokenKind::AndAnd
            | TokenKind::OrOr
            | TokenKind::Pipe
            | TokenKind::LParen
            | TokenKind::LBracket
    )
}
