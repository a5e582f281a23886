//! Property: for source composed of legal non-string tokens separated by
//! whitespace, re-emitting each token's literal text with single-space
//! separators and re-lexing yields the same kind sequence (spec §8's
//! lexer round-trip law; strings are excluded since re-emitting their raw
//! bytes can reintroduce an unescaped `"`).

use glimmer_lex::{Lexer, TokenKind};
use proptest::prelude::*;

fn literal_of(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Ident(_) => "an_identifier".to_string(),
        TokenKind::Int(n) => n.to_string(),
        TokenKind::Float(n) => format!("{:.1}", n),
        TokenKind::Assign => "=".to_string(),
        TokenKind::Plus => "+".to_string(),
        TokenKind::Minus => "-".to_string(),
        TokenKind::Star => "*".to_string(),
        TokenKind::Slash => "/".to_string(),
        TokenKind::Bang => "!".to_string(),
        TokenKind::Eq => "==".to_string(),
        TokenKind::NotEq => "!=".to_string(),
        TokenKind::Lt => "<".to_string(),
        TokenKind::Gt => ">".to_string(),
        TokenKind::LtEq => "<=".to_string(),
        TokenKind::GtEq => ">=".to_string(),
        TokenKind::AndAnd => "&&".to_string(),
        TokenKind::OrOr => "||".to_string(),
        TokenKind::PlusEq => "+=".to_string(),
        TokenKind::MinusEq => "-=".to_string(),
        TokenKind::StarEq => "*=".to_string(),
        TokenKind::SlashEq => "/=".to_string(),
        TokenKind::Pipe => "|".to_string(),
        TokenKind::Comma => ",".to_string(),
        TokenKind::Colon => ":".to_string(),
        TokenKind::Semicolon => ";".to_string(),
        TokenKind::Arrow => "->".to_string(),
        TokenKind::LParen => "(".to_string(),
        TokenKind::RParen => ")".to_string(),
        TokenKind::LBrace => "{".to_string(),
        TokenKind::RBrace => "}".to_string(),
        TokenKind::LBracket => "[".to_string(),
        TokenKind::RBracket => "]".to_string(),
        TokenKind::Function => "fn".to_string(),
        TokenKind::True => "true".to_string(),
        TokenKind::False => "false".to_string(),
        TokenKind::If => "if".to_string(),
        TokenKind::Else => "else".to_string(),
        TokenKind::For => "for".to_string(),
        TokenKind::In => "in".to_string(),
        TokenKind::Break => "break".to_string(),
        TokenKind::Continue => "continue".to_string(),
        TokenKind::Return => "return".to_string(),
        TokenKind::IntType => "int".to_string(),
        TokenKind::FloatType => "float".to_string(),
        TokenKind::BoolType => "bool".to_string(),
        TokenKind::StringType => "string".to_string(),
        TokenKind::ArrayType => "array".to_string(),
        TokenKind::DictType => "dict".to_string(),
        TokenKind::NoneType => "none".to_string(),
        other => panic!("round-trip fixture hit an excluded kind: {:?}", other),
    }
}

fn lex_all(source: &str) -> Vec<TokenKind> {
    let mut lexer = Lexer::new(source);
    let mut out = Vec::new();
    loop {
        let tok = lexer.next_token();
        if tok.is_eof() {
            break;
        }
        out.push(tok.kind);
    }
    out
}

/// Two tokens are "the same kind" for this law if they'd print identically
/// (symbol identities differ across separately-interned lexers).
fn same_shape(a: &TokenKind, b: &TokenKind) -> bool {
    match (a, b) {
        (TokenKind::Ident(_), TokenKind::Ident(_)) => true,
        _ => a == b,
    }
}

fn arb_non_string_token() -> impl Strategy<Value = TokenKind> {
    prop_oneof![
        Just(TokenKind::Plus),
        Just(TokenKind::Minus),
        Just(TokenKind::Star),
        Just(TokenKind::Slash),
        Just(TokenKind::Eq),
        Just(TokenKind::NotEq),
        Just(TokenKind::Lt),
        Just(TokenKind::GtEq),
        Just(TokenKind::AndAnd),
        Just(TokenKind::OrOr),
        Just(TokenKind::Arrow),
        Just(TokenKind::LParen),
        Just(TokenKind::RParen),
        Just(TokenKind::LBrace),
        Just(TokenKind::RBrace),
        Just(TokenKind::Comma),
        Just(TokenKind::Colon),
        Just(TokenKind::If),
        Just(TokenKind::Else),
        Just(TokenKind::For),
        Just(TokenKind::Return),
        Just(TokenKind::True),
        Just(TokenKind::False),
        Just(TokenKind::IntType),
        Just(TokenKind::Ident(glimmer_util::Interner::new().intern("an_identifier"))),
        (0i64..100_000).prop_map(TokenKind::Int),
    ]
}

proptest! {
    #[test]
    fn lexer_round_trips_non_string_tokens(tokens in prop::collection::vec(arb_non_string_token(), 0..30)) {
        let source = tokens.iter().map(literal_of).collect::<Vec<_>>().join(" ");
        let first_pass = lex_all(&source);
        let re_emitted = first_pass.iter().map(literal_of).collect::<Vec<_>>().join(" ");
        let second_pass = lex_all(&re_emitted);

        prop_assert_eq!(first_pass.len(), second_pass.len());
        for (a, b) in first_pass.iter().zip(second_pass.iter()) {
            prop_assert!(same_shape(a, b), "{:?} vs {:?}", a, b);
        }
    }

    #[test]
    fn every_token_has_a_positive_position(source in "[a-zA-Z0-9_+=<>(){}\\[\\], \n]{0,60}") {
        let mut lexer = Lexer::new(&source);
        loop {
            let tok = lexer.next_token();
            if tok.is_eof() {
                break;
            }
            prop_assert!(tok.line() >= 1);
            prop_assert!(tok.column() >= 1);
        }
    }
}
