use glimmer_util::{Span, Symbol};

/// The closed set of token kinds the lexer ever produces.
///
/// `ILLEGAL` is not an error: the lexer is total and never fails (§4.1's
/// "never fails" contract) — an unrecognized byte becomes an `Illegal`
/// token and it is the parser's job to turn that into a diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // literals
    Ident(Symbol),
    Int(i64),
    Float(f64),
    Str(Symbol),

    // operators
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Bang,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    AndAnd,
    OrOr,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    Pipe,

    // delimiters
    Comma,
    Colon,
    Semicolon,
    Arrow,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    // keywords
    Function,
    True,
    False,
    If,
    Else,
    For,
    In,
    Break,
    Continue,
    Return,

    // type keywords
    IntType,
    FloatType,
    BoolType,
    StringType,
    ArrayType,
    DictType,
    NoneType,

    // sentinels
    Illegal(String),
    Eof,
}

impl TokenKind {
    /// Looks up a scanned identifier against the fixed keyword table.
    /// Returns `None` for anything that is an ordinary identifier.
    pub fn keyword(ident: &str) -> Option<TokenKind> {
        Some(match ident {
            "fn" => TokenKind::Function,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "for" => TokenKind::For,
            "in" => TokenKind::In,
            "break" => TokenKind::Break,
            "continue" => TokenKind::Continue,
            "return" => TokenKind::Return,
            "int" => TokenKind::IntType,
            "float" => TokenKind::FloatType,
            "bool" => TokenKind::BoolType,
            "string" => TokenKind::StringType,
            "array" => TokenKind::ArrayType,
            "dict" => TokenKind::DictType,
            "none" => TokenKind::NoneType,
            _ => return None,
        })
    }
}

/// A single lexed token: kind plus the position it started at.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }

    pub fn line(&self) -> u32 {
        self.span.line
    }

    pub fn column(&self) -> u32 {
        self.span.column
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}
