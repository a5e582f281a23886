//! Byte-oriented scanner that turns Glimmer source text into a stream of
//! position-tagged tokens.

use glimmer_util::{Interner, Span, Symbol};

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

/// Scans one token at a time on demand.
///
/// `next_token` is total: it never fails. A byte the lexer can't place
/// becomes `TokenKind::Illegal` rather than an error — turning that into a
/// diagnostic is the parser's job.
///
/// Owns the `Interner` that backs every `Symbol` it produces; callers
/// downstream (the parser, and anything resolving identifiers back to
/// text) take it via `into_interner` once lexing is done.
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    interner: Interner,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer { cursor: Cursor::new(source), interner: Interner::new() }
    }

    /// Consumes the lexer, handing back the interner backing every symbol
    /// it produced.
    pub fn into_interner(self) -> Interner {
        self.interner
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Returns the next token, advancing past it.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        let span = self.start_span();

        if self.cursor.is_at_end() {
            return Token::new(TokenKind::Eof, span);
        }

        let c = self.cursor.current_char();
        let kind = match c {
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            ',' => self.single(TokenKind::Comma),
            ':' => self.single(TokenKind::Colon),
            ';' => self.single(TokenKind::Semicolon),
            '+' => self.one_or_two('=', TokenKind::Plus, TokenKind::PlusEq),
            '*' => self.one_or_two('=', TokenKind::Star, TokenKind::StarEq),
            '/' => self.one_or_two('=', TokenKind::Slash, TokenKind::SlashEq),
            '!' => self.one_or_two('=', TokenKind::Bang, TokenKind::NotEq),
            '=' => self.one_or_two('=', TokenKind::Assign, TokenKind::Eq),
            '<' => self.one_or_two('=', TokenKind::Lt, TokenKind::LtEq),
            '>' => self.one_or_two('=', TokenKind::Gt, TokenKind::GtEq),
            '|' => self.one_or_two('|', TokenKind::Pipe, TokenKind::OrOr),
            '-' => self.lex_minus(),
            '&' => self.lex_ampersand(),
            '"' => self.lex_string(),
            c if is_ident_start(c) => self.lex_identifier(),
            c if c.is_ascii_digit() => self.lex_number(),
            c => {
                self.cursor.advance();
                TokenKind::Illegal(c.to_string())
            }
        };

        Token::new(kind, span)
    }

    fn start_span(&self) -> Span {
        Span::new(self.cursor.line(), self.cursor.column(), self.cursor.position())
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.cursor.advance();
        kind
    }

    /// Consumes the current char; if `second` follows, consumes it too and
    /// returns `two`, otherwise returns `one`.
    fn one_or_two(&mut self, second: char, one: TokenKind, two: TokenKind) -> TokenKind {
        self.cursor.advance();
        if self.cursor.match_char(second) {
            two
        } else {
            one
        }
    }

    /// `-`, `-=`, or `->`.
    fn lex_minus(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            TokenKind::MinusEq
        } else if self.cursor.match_char('>') {
            TokenKind::Arrow
        } else {
            TokenKind::Minus
        }
    }

    /// Bare `&` is normalized to `&&` — a design choice, not an error
    /// (§4.1).
    fn lex_ampersand(&mut self) -> TokenKind {
        self.cursor.advance();
        self.cursor.match_char('&');
        TokenKind::AndAnd
    }

    fn lex_identifier(&mut self) -> TokenKind {
        let start = self.cursor.position();
        while is_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(start);
        TokenKind::keyword(text).unwrap_or_else(|| TokenKind::Ident(self.intern(text)))
    }

    /// Digits, with an optional `.` and trailing digits. A bare trailing
    /// `.` (`123.`) is consumed but stripped from the literal — the token
    /// is still a float.
    fn lex_number(&mut self) -> TokenKind {
        let start = self.cursor.position();
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }

        let mut is_float = false;
        if self.cursor.current_char() == '.' {
            is_float = true;
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        }

        let text = self.cursor.slice_from(start);
        if is_float {
            let text = text.strip_suffix('.').unwrap_or(text);
            TokenKind::Float(text.parse::<f64>().unwrap_or(0.0))
        } else {
            TokenKind::Int(text.parse::<i64>().unwrap_or(0))
        }
    }

    /// Bytes between double quotes. No escape processing: the closing
    /// quote is simply the first `"` not immediately preceded by `\`. An
    /// unterminated string stops at end-of-input without an error.
    fn lex_string(&mut self) -> TokenKind {
        self.cursor.advance();
        let start = self.cursor.position();

        loop {
            if self.cursor.is_at_end() {
                break;
            }
            let prev = self.cursor.current_char();
            self.cursor.advance();
            if prev == '"' {
                let content = &self.cursor.slice_from(start)[..self.cursor.position() - start - 1];
                return TokenKind::Str(self.intern(content));
            }
            if prev == '\\' && !self.cursor.is_at_end() {
                self.cursor.advance();
            }
        }

        TokenKind::Str(self.intern(self.cursor.slice_from(start)))
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while matches!(self.cursor.current_char(), ' ' | '\t' | '\r' | '\n') {
                self.cursor.advance();
            }
            if self.cursor.current_char() == '#' {
                while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
                    self.cursor.advance();
                }
                continue;
            }
            break;
        }
    }

    fn intern(&mut self, text: &str) -> Symbol {
        self.interner.intern(text)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
