//! Hand-written scanner for Glimmer source text: a byte-oriented cursor
//! plus a total `next_token` that never fails on malformed input.

pub mod cursor;
pub mod lexer;
pub mod token;

pub use lexer::Lexer;
pub use token::{Token, TokenKind};

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
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

    #[test]
    fn keywords_and_identifiers() {
        let ks = kinds("fn if else for in break continue return true false notakeyword");
        assert_eq!(
            ks,
            vec![
                TokenKind::Function,
                TokenKind::If,
                TokenKind::Else,
                TokenKind::For,
                TokenKind::In,
                TokenKind::Break,
                TokenKind::Continue,
                TokenKind::Return,
                TokenKind::True,
                TokenKind::False,
                TokenKind::Ident(glimmer_util::Interner::new().intern("notakeyword")),
            ]
        );
    }

    #[test]
    fn type_keywords() {
        let ks = kinds("int float bool string array dict none");
        assert_eq!(
            ks,
            vec![
                TokenKind::IntType,
                TokenKind::FloatType,
                TokenKind::BoolType,
                TokenKind::StringType,
                TokenKind::ArrayType,
                TokenKind::DictType,
                TokenKind::NoneType,
            ]
        );
    }

    #[test]
    fn two_char_operators_and_arrow() {
        let ks = kinds("== != <= >= && || += -= *= /= ->");
        assert_eq!(
            ks,
            vec![
                TokenKind::Eq,
                TokenKind::NotEq,
                TokenKind::LtEq,
                TokenKind::GtEq,
                TokenKind::AndAnd,
                TokenKind::OrOr,
                TokenKind::PlusEq,
                TokenKind::MinusEq,
                TokenKind::StarEq,
                TokenKind::SlashEq,
                TokenKind::Arrow,
            ]
        );
    }

    #[test]
    fn bare_ampersand_normalizes_to_double() {
        assert_eq!(kinds("&"), vec![TokenKind::AndAnd]);
        assert_eq!(kinds("& &"), vec![TokenKind::AndAnd, TokenKind::AndAnd]);
    }

    #[test]
    fn integer_and_float_literals() {
        assert_eq!(kinds("42"), vec![TokenKind::Int(42)]);
        assert_eq!(kinds("3.14"), vec![TokenKind::Float(3.14)]);
    }

    #[test]
    fn trailing_dot_strips_to_float() {
        assert_eq!(kinds("123."), vec![TokenKind::Float(123.0)]);
    }

    #[test]
    fn string_literal_has_no_escape_processing() {
        // Source bytes: "  a  b  \  "  c  d  "   (closing quote is the one
        // not immediately preceded by a backslash).
        let mut lexer = Lexer::new("\"ab\\\"cd\"");
        let tok = lexer.next_token();
        match tok.kind {
            TokenKind::Str(sym) => {
                assert_eq!(lexer.interner().resolve(sym), "ab\\\"cd");
            }
            other => panic!("expected string token, got {:?}", other),
        }
    }

    #[test]
    fn unterminated_string_stops_at_eof_without_panicking() {
        let mut lexer = Lexer::new("\"unterminated");
        let tok = lexer.next_token();
        assert!(matches!(tok.kind, TokenKind::Str(_)));
        assert!(lexer.next_token().is_eof());
    }

    #[test]
    fn line_comment_is_skipped() {
        assert_eq!(kinds("# a comment\nfn"), vec![TokenKind::Function]);
        assert_eq!(kinds("fn # trailing comment"), vec![TokenKind::Function]);
    }

    #[test]
    fn positions_are_one_based_and_track_lines() {
        let mut lexer = Lexer::new("fn\nif");
        let first = lexer.next_token();
        assert_eq!((first.line(), first.column()), (1, 1));
        let second = lexer.next_token();
        assert_eq!((second.line(), second.column()), (2, 1));
    }

    #[test]
    fn illegal_byte_is_a_token_not_an_error() {
        assert_eq!(kinds("@"), vec![TokenKind::Illegal("@".to_string())]);
    }
}
