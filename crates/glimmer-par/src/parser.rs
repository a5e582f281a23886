//! A Pratt / precedence-climbing parser over a pre-lexed token stream
//! (§4.2).
//!
//! Unlike the streaming `lexer handle + curToken + peekToken` state the
//! source description describes, this parser lexes eagerly into an owned
//! `Vec<Token>` and walks it with a `position` cursor — the same shape as
//! the teacher's own `Parser { tokens, position, .. }` — which turns the
//! for-loop foreach/C-style disambiguation (§9's "isolate this dispatch in
//! one parser routine") into a bounded lookahead instead of a backtracking
//! lexer.

use glimmer_lex::{Lexer, Token, TokenKind};
use glimmer_util::{Diagnostic, Handler, Interner, Span, Symbol};

use crate::ast::*;
use crate::precedence::{has_infix, precedence_of, Precedence};

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    handler: Handler,
    interner: Interner,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let tok = lexer.next_token();
            let at_eof = tok.is_eof();
            tokens.push(tok);
            if at_eof {
                break;
            }
        }
        Parser { tokens, position: 0, handler: Handler::new(), interner: lexer.into_interner() }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.handler.diagnostics()
    }

    pub fn has_errors(&self) -> bool {
        self.handler.has_errors()
    }

    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    pub fn into_interner(self) -> Interner {
        self.interner
    }

    pub fn parse_program(&mut self) -> Program {
        let mut stmts = Vec::new();
        while !matches!(self.cur_kind(), TokenKind::Eof) {
            stmts.push(self.parse_statement());
            self.advance();
        }
        stmts
    }

    // -- token cursor -----------------------------------------------------

    fn cur(&self) -> &Token {
        &self.tokens[self.position]
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.position + 1).unwrap_or_else(|| self.tokens.last().unwrap())
    }

    fn peek_n(&self, n: usize) -> &Token {
        self.tokens.get(self.position + n).unwrap_or_else(|| self.tokens.last().unwrap())
    }

    fn cur_kind(&self) -> &TokenKind {
        &self.cur().kind
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    fn advance(&mut self) {
        if self.position + 1 < self.tokens.len() {
            self.position += 1;
        }
    }

    fn error_here(&mut self, message: impl Into<String>) {
        let span = self.cur().span;
        self.handler.push_error(message, span);
    }

    /// If `peek` matches `want`'s variant, advances onto it and returns
    /// true; otherwise records a diagnostic and returns false.
    fn expect_peek_kind(&mut self, want: &TokenKind) -> bool {
        if std::mem::discriminant(self.peek_kind()) == std::mem::discriminant(want) {
            self.advance();
            true
        } else {
            let span = self.peek().span;
            self.handler.push_error(
                format!("expected next token to be {:?}, got {:?} instead", want, self.peek_kind()),
                span,
            );
            false
        }
    }

    fn ident_name(&mut self) -> Symbol {
        match self.cur().kind.clone() {
            TokenKind::Ident(sym) => sym,
            other => {
                self.error_here(format!("expected an identifier, got {:?}", other));
                self.interner.intern("<error>")
            }
        }
    }

    // -- statements ---------------------------------------------------------

    fn parse_statement(&mut self) -> Stmt {
        match self.cur().kind.clone() {
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::Ident(_) if is_assign_op(self.peek_kind()) => self.parse_assign_stmt(),
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::For => self.parse_for_stmt(),
            TokenKind::Break => {
                let span = self.cur().span;
                if matches!(self.peek_kind(), TokenKind::Semicolon) {
                    self.advance();
                }
                Stmt::Break(span)
            }
            TokenKind::Continue => {
                let span = self.cur().span;
                if matches!(self.peek_kind(), TokenKind::Semicolon) {
                    self.advance();
                }
                Stmt::Continue(span)
            }
            _ => self.parse_expr_stmt(),
        }
    }

    fn parse_assign_stmt(&mut self) -> Stmt {
        let span = self.cur().span;
        let name = self.ident_name();
        let op = assign_op_of(self.peek_kind());
        self.advance(); // cur = operator
        self.advance(); // cur = value start
        let value = self.parse_expression(Precedence::Lowest);
        if matches!(self.peek_kind(), TokenKind::Semicolon) {
            self.advance();
        }
        Stmt::Assign(AssignStmt { name, op, value, span })
    }

    fn parse_return_stmt(&mut self) -> Stmt {
        let span = self.cur().span;
        self.advance();
        let value = self.parse_expression(Precedence::Lowest);
        if matches!(self.peek_kind(), TokenKind::Semicolon) {
            self.advance();
        }
        Stmt::Return(ReturnStmt { value, span })
    }

    fn parse_expr_stmt(&mut self) -> Stmt {
        let span = self.cur().span;
        let expr = self.parse_expression(Precedence::Lowest);
        if matches!(self.peek_kind(), TokenKind::Semicolon) {
            self.advance();
        }
        Stmt::Expr(ExprStmt { expr, span })
    }

    fn parse_block(&mut self) -> Block {
        let span = self.cur().span; // cur == '{'
        self.advance();
        let mut stmts = Vec::new();
        while !matches!(self.cur_kind(), TokenKind::RBrace | TokenKind::Eof) {
            stmts.push(self.parse_statement());
            self.advance();
        }
        Block { stmts, span }
    }

    /// Shared by if-statement and if-expression (§9.1): parses the leading
    /// condition-statement-list, the then-block, and any `else if`/`else`
    /// chain. `self.cur()` must be the `if` token on entry.
    fn parse_if_arms(&mut self) -> IfArms {
        let mut conditions = Vec::new();
        while !matches!(self.peek_kind(), TokenKind::LBrace) {
            self.advance();
            conditions.push(self.parse_statement());
        }
        self.expect_peek_kind(&TokenKind::LBrace);
        let then_block = self.parse_block();

        let mut elifs = Vec::new();
        let mut else_block = None;
        while matches!(self.peek_kind(), TokenKind::Else) {
            self.advance(); // cur = 'else'
            if matches!(self.peek_kind(), TokenKind::If) {
                self.advance(); // cur = 'if'
                let mut cond_stmts = Vec::new();
                while !matches!(self.peek_kind(), TokenKind::LBrace) {
                    self.advance();
                    cond_stmts.push(self.parse_statement());
                }
                self.advance(); // cur = '{'
                elifs.push((cond_stmts, self.parse_block()));
            } else {
                if else_block.is_some() {
                    self.error_here("duplicate 'else' branch after an 'else'");
                }
                if self.expect_peek_kind(&TokenKind::LBrace) {
                    else_block = Some(self.parse_block());
                }
            }
        }

        IfArms { conditions, then_block, elifs, else_block }
    }

    fn parse_if_stmt(&mut self) -> Stmt {
        let span = self.cur().span;
        let arms = self.parse_if_arms();
        Stmt::If(IfStmt {
            conditions: arms.conditions,
            then_block: arms.then_block,
            elifs: arms.elifs,
            else_block: arms.else_block,
            span,
        })
    }

    fn parse_if_expr(&mut self) -> Expr {
        let span = self.cur().span;
        let arms = self.parse_if_arms();
        Expr::If(Box::new(IfExpr {
            conditions: arms.conditions,
            then_block: arms.then_block,
            elifs: arms.elifs,
            else_block: arms.else_block,
            span,
        }))
    }

    /// Dispatches between the foreach and C-style forms (§4.2, §9's "isolate
    /// this dispatch in one parser routine"). `self.cur()` is the `for`
    /// token on entry.
    fn parse_for_stmt(&mut self) -> Stmt {
        let span = self.cur().span;
        if self.looks_like_foreach() {
            self.parse_foreach(span)
        } else {
            self.parse_cstyle_for(span)
        }
    }

    fn looks_like_foreach(&self) -> bool {
        if !matches!(self.peek_kind(), TokenKind::Ident(_)) {
            return false;
        }
        match self.peek_n(2).kind {
            TokenKind::In => true,
            TokenKind::Comma => {
                matches!(self.peek_n(3).kind, TokenKind::Ident(_))
                    && matches!(self.peek_n(4).kind, TokenKind::In)
            }
            _ => false,
        }
    }

    fn parse_foreach(&mut self, span: Span) -> Stmt {
        self.advance(); // cur = first loop var
        let mut loop_vars = vec![self.ident_name()];
        self.advance();
        if matches!(self.cur_kind(), TokenKind::Comma) {
            self.advance(); // cur = second loop var
            loop_vars.push(self.ident_name());
            self.advance();
        }
        if !matches!(self.cur_kind(), TokenKind::In) {
            self.error_here(format!("expected 'in', got {:?}", self.cur_kind()));
        }
        self.advance(); // cur = collection expr start
        let collection = self.parse_expression(Precedence::Lowest);
        self.advance(); // cur = '{'
        let body = self.parse_block();
        Stmt::ForEach(ForEachStmt { loop_vars, collection, body, span })
    }

    fn parse_cstyle_for(&mut self, span: Span) -> Stmt {
        let wrapped = matches!(self.peek_kind(), TokenKind::LParen);
        if wrapped {
            self.advance(); // cur = '('
        }

        if matches!(self.peek_kind(), TokenKind::LBrace) {
            self.advance(); // cur = '{'
            let body = self.parse_block();
            return Stmt::For(ForStmt { pre: Vec::new(), cond: Vec::new(), post: Vec::new(), body, span });
        }

        let stop = [TokenKind::Comma, TokenKind::LBrace, TokenKind::RParen];
        let mut lists = vec![self.parse_stmt_list_until_peek(&stop)];
        while matches!(self.peek_kind(), TokenKind::Comma) {
            self.advance(); // cur = ','
            lists.push(self.parse_stmt_list_until_peek(&stop));
        }
        if lists.len() > 3 {
            self.error_here("too many ',' in for-loop header (at most two commas allowed)");
            lists.truncate(3);
        }

        if wrapped {
            self.expect_peek_kind(&TokenKind::RParen);
        }
        self.expect_peek_kind(&TokenKind::LBrace);
        let body = self.parse_block();

        let (pre, cond, post) = match lists.len() {
            1 => (Vec::new(), lists.remove(0), Vec::new()),
            2 => {
                let post = lists.remove(1);
                let cond = lists.remove(0);
                (Vec::new(), cond, post)
            }
            3 => {
                let post = lists.remove(2);
                let cond = lists.remove(1);
                let pre = lists.remove(0);
                (pre, cond, post)
            }
            _ => (Vec::new(), Vec::new(), Vec::new()),
        };
        Stmt::For(ForStmt { pre, cond, post, body, span })
    }

    /// Parses statements while `peek` is none of `stops`. Entry invariant:
    /// `cur` is the token immediately preceding the list (the `for`
    /// keyword, a `(`, or a `,`).
    fn parse_stmt_list_until_peek(&mut self, stops: &[TokenKind]) -> Vec<Stmt> {
        let mut stmts = Vec::new();
        while !kind_in(self.peek_kind(), stops) && !matches!(self.peek_kind(), TokenKind::Eof) {
            self.advance();
            stmts.push(self.parse_statement());
        }
        stmts
    }

    // -- expressions ----------------------------------------------------

    fn parse_expression(&mut self, precedence: Precedence) -> Expr {
        let mut left = self.parse_prefix();
        while !matches!(self.peek_kind(), TokenKind::Semicolon)
            && has_infix(self.peek_kind())
            && precedence < precedence_of(self.peek_kind())
        {
            self.advance();
            left = self.parse_infix(left);
        }
        left
    }

    fn parse_prefix(&mut self) -> Expr {
        match self.cur().kind.clone() {
            TokenKind::Ident(sym) => {
                let span = self.cur().span;
                Expr::Identifier(sym, span)
            }
            TokenKind::Int(n) => Expr::Int(n, self.cur().span),
            TokenKind::Float(n) => Expr::Float(n, self.cur().span),
            TokenKind::Str(sym) => Expr::Str(sym, self.cur().span),
            TokenKind::True => Expr::Bool(true, self.cur().span),
            TokenKind::False => Expr::Bool(false, self.cur().span),
            TokenKind::Minus => self.parse_prefix_op(PrefixOp::Neg),
            TokenKind::Bang => self.parse_prefix_op(PrefixOp::Not),
            TokenKind::LParen => self.parse_grouped_expr(),
            TokenKind::If => self.parse_if_expr(),
            TokenKind::Function => self.parse_function_literal(),
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::LBrace => self.parse_dict_literal(),
            other => {
                let span = self.cur().span;
                self.error_here(format!("no prefix parse function for {:?} found", other));
                Expr::Error(span)
            }
        }
    }

    fn parse_prefix_op(&mut self, op: PrefixOp) -> Expr {
        let span = self.cur().span;
        self.advance();
        let right = self.parse_expression(Precedence::Prefix);
        Expr::Prefix(Box::new(PrefixExpr { op, right, span }))
    }

    fn parse_grouped_expr(&mut self) -> Expr {
        self.advance(); // cur = first token of inner expr
        let expr = self.parse_expression(Precedence::Lowest);
        self.expect_peek_kind(&TokenKind::RParen);
        expr
    }

    fn parse_infix(&mut self, left: Expr) -> Expr {
        match self.cur().kind.clone() {
            TokenKind::LParen => self.parse_call_expr(left),
            TokenKind::LBracket => self.parse_index_expr(left),
            kind => {
                let span = self.cur().span;
                let op = infix_op_of(&kind);
                let precedence = precedence_of(&kind);
                self.advance(); // cur = right operand start
                let right = self.parse_expression(precedence);
                Expr::Infix(Box::new(InfixExpr { op, left, right, span }))
            }
        }
    }

    fn parse_call_expr(&mut self, callee: Expr) -> Expr {
        let span = self.cur().span; // '('
        let args = self.parse_expression_list(TokenKind::RParen);
        Expr::Call(Box::new(CallExpr { callee, args, span }))
    }

    fn parse_index_expr(&mut self, left: Expr) -> Expr {
        let span = self.cur().span; // '['
        self.advance();
        let index = self.parse_expression(Precedence::Lowest);
        self.expect_peek_kind(&TokenKind::RBracket);
        Expr::Index(Box::new(IndexExpr { left, index, span }))
    }

    fn parse_expression_list(&mut self, end: TokenKind) -> Vec<Expr> {
        let mut list = Vec::new();
        if std::mem::discriminant(self.peek_kind()) == std::mem::discriminant(&end) {
            self.advance();
            return list;
        }
        self.advance();
        list.push(self.parse_expression(Precedence::Lowest));
        while matches!(self.peek_kind(), TokenKind::Comma) {
            self.advance();
            self.advance();
            list.push(self.parse_expression(Precedence::Lowest));
        }
        self.expect_peek_kind(&end);
        list
    }

    fn parse_array_literal(&mut self) -> Expr {
        let span = self.cur().span; // '['
        if matches!(self.peek_kind(), TokenKind::RBracket) {
            self.advance(); // cur = ']'
            self.advance(); // cur = explicit element type
            let explicit_type = self.parse_type_node();
            return Expr::Array(Box::new(ArrayExpr { elements: Vec::new(), explicit_type: Some(explicit_type), span }));
        }
        let elements = self.parse_expression_list(TokenKind::RBracket);
        Expr::Array(Box::new(ArrayExpr { elements, explicit_type: None, span }))
    }

    fn parse_dict_literal(&mut self) -> Expr {
        let span = self.cur().span; // '{'
        let mut pairs = Vec::new();
        while !matches!(self.peek_kind(), TokenKind::RBrace) {
            self.advance(); // cur = key start
            let key = self.parse_expression(Precedence::Lowest);
            if !self.expect_peek_kind(&TokenKind::Colon) {
                break;
            }
            self.advance(); // cur = value start
            let value = self.parse_expression(Precedence::Lowest);
            pairs.push((key, value));
            if !matches!(self.peek_kind(), TokenKind::RBrace) && !self.expect_peek_kind(&TokenKind::Comma) {
                break;
            }
        }
        self.expect_peek_kind(&TokenKind::RBrace);
        Expr::Dict(Box::new(DictExpr { pairs, span }))
    }

    fn parse_function_literal(&mut self) -> Expr {
        let span = self.cur().span; // 'fn'
        if !self.expect_peek_kind(&TokenKind::LParen) {
            return Expr::Error(span);
        }
        let params = self.parse_function_params();
        if !self.expect_peek_kind(&TokenKind::Arrow) {
            return Expr::Error(span);
        }
        self.advance(); // cur = return type start
        let return_type = self.parse_type_node();
        if !self.expect_peek_kind(&TokenKind::LBrace) {
            return Expr::Error(span);
        }
        let body = self.parse_block();
        Expr::Function(Box::new(FunctionExpr { params, return_type, body, span }))
    }

    fn parse_function_params(&mut self) -> Vec<Param> {
        let mut params = Vec::new();
        if matches!(self.peek_kind(), TokenKind::RParen) {
            self.advance();
            return params;
        }
        self.advance(); // cur = first param name
        params.push(self.parse_one_param());
        while matches!(self.peek_kind(), TokenKind::Comma) {
            self.advance();
            self.advance();
            params.push(self.parse_one_param());
        }
        self.expect_peek_kind(&TokenKind::RParen);
        params
    }

    fn parse_one_param(&mut self) -> Param {
        let span = self.cur().span;
        let name = self.ident_name();
        self.expect_peek_kind(&TokenKind::Colon);
        self.advance(); // cur = type start
        let ty = self.parse_type_node();
        Param { name, ty, span }
    }

    fn parse_type_node(&mut self) -> TypeNode {
        match self.cur().kind.clone() {
            TokenKind::IntType => TypeNode::Int,
            TokenKind::FloatType => TypeNode::Float,
            TokenKind::BoolType => TypeNode::Bool,
            TokenKind::StringType => TypeNode::String,
            TokenKind::NoneType => TypeNode::None,
            TokenKind::ArrayType => {
                if !self.expect_peek_kind(&TokenKind::LBracket) {
                    return TypeNode::Error;
                }
                self.advance();
                let inner = self.parse_type_node();
                self.expect_peek_kind(&TokenKind::RBracket);
                TypeNode::Array(Box::new(inner))
            }
            TokenKind::DictType => {
                if !self.expect_peek_kind(&TokenKind::LBracket) {
                    return TypeNode::Error;
                }
                self.advance();
                let inner = self.parse_type_node();
                self.expect_peek_kind(&TokenKind::RBracket);
                TypeNode::Dict(Box::new(inner))
            }
            TokenKind::Function => {
                if !self.expect_peek_kind(&TokenKind::LParen) {
                    return TypeNode::Error;
                }
                let mut params = Vec::new();
                if matches!(self.peek_kind(), TokenKind::RParen) {
                    self.advance();
                } else {
                    self.advance();
                    params.push(self.parse_type_node());
                    while matches!(self.peek_kind(), TokenKind::Comma) {
                        self.advance();
                        self.advance();
                        params.push(self.parse_type_node());
                    }
                    self.expect_peek_kind(&TokenKind::RParen);
                }
                if !self.expect_peek_kind(&TokenKind::Arrow) {
                    return TypeNode::Error;
                }
                self.advance();
                let ret = self.parse_type_node();
                TypeNode::Function(params, Box::new(ret))
            }
            other => {
                self.error_here(format!("type not recognized: {:?}", other));
                TypeNode::Error
            }
        }
    }
}

fn is_assign_op(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Assign | TokenKind::PlusEq | TokenKind::MinusEq | TokenKind::StarEq | TokenKind::SlashEq
    )
}

fn assign_op_of(kind: &TokenKind) -> AssignOp {
    match kind {
        TokenKind::PlusEq => AssignOp::AddAssign,
        TokenKind::MinusEq => AssignOp::SubAssign,
        TokenKind::StarEq => AssignOp::MulAssign,
        TokenKind::SlashEq => AssignOp::DivAssign,
        _ => AssignOp::Assign,
    }
}

fn infix_op_of(kind: &TokenKind) -> InfixOp {
    match kind {
        TokenKind::Plus => InfixOp::Add,
        TokenKind::Minus => InfixOp::Sub,
        TokenKind::Star => InfixOp::Mul,
        TokenKind::Slash => InfixOp::Div,
        TokenKind::Lt => InfixOp::Lt,
        TokenKind::Gt => InfixOp::Gt,
        TokenKind::LtEq => InfixOp::LtEq,
        TokenKind::GtEq => InfixOp::GtEq,
        TokenKind::Eq => InfixOp::Eq,
        TokenKind::NotEq => InfixOp::NotEq,
        TokenKind::AndAnd => InfixOp::And,
        TokenKind::OrOr => InfixOp::Or,
        _ => InfixOp::Pipe,
    }
}

fn kind_in(kind: &TokenKind, set: &[TokenKind]) -> bool {
    set.iter().any(|k| std::mem::discriminant(k) == std::mem::discriminant(kind))
}
