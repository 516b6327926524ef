// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The parser implementation: recursive descent over the token stream.

use ula_ast::decl::{FunctionDef, Param, Program};
use ula_ast::expr::{BinOp, Expr, ExprKind, UnaryOp};
use ula_ast::stmt::{Block, Stmt, StmtKind};
use ula_ast::token::{Token, TokenKind};
use ula_ast::{NodeId, Span, Type};

/// Result of a parse: the whole program, or the first error hit.
pub type ParseResult = Result<Program, ParseError>;

/// The parser for Ula source code.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Counter for generating unique NodeIds
    next_node_id: u32,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0, next_node_id: 0 }
    }

    pub fn parse(&mut self) -> ParseResult {
        let mut funcs = Vec::new();
        self.skip_newlines();
        while !self.at_end() {
            funcs.push(self.parse_function()?);
            self.skip_newlines();
        }
        Ok(Program { funcs })
    }

    fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        id
    }

    // =========================================================================
    // Token Navigation
    // =========================================================================

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or_else(|| self.tokens.last().unwrap())
    }

    fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn peek(&self, n: usize) -> &TokenKind {
        self.tokens.get(self.pos + n).map(|t| &t.kind).unwrap_or(&TokenKind::Eof)
    }

    fn at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    fn advance(&mut self) -> &Token {
        if !self.at_end() {
            self.pos += 1;
        }
        self.tokens.get(self.pos - 1).unwrap()
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<&Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::expected(
                kind.display_name(),
                self.current_kind(),
                self.current().span,
            ))
        }
    }

    fn skip_newlines(&mut self) {
        while self.check(&TokenKind::Newline) {
            self.advance();
        }
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        match self.current_kind().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(ParseError::expected(
                "a name",
                self.current_kind(),
                self.current().span,
            )),
        }
    }

    /// End offset of the most recently consumed token.
    fn prev_end(&self, fallback: usize) -> usize {
        self.tokens
            .get(self.pos.saturating_sub(1))
            .map(|t| t.span.end)
            .unwrap_or(fallback)
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn parse_function(&mut self) -> Result<FunctionDef, ParseError> {
        let start = self.current().span.start;
        if !self.check(&TokenKind::Def) {
            return Err(ParseError::expected(
                "'def'",
                self.current_kind(),
                self.current().span,
            )
            .with_hint("only function definitions can appear at the top level"));
        }
        self.advance();

        let name = self.expect_ident()?;
        self.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                params.push(self.parse_param()?);
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen)?;
        self.expect(&TokenKind::Arrow)?;
        let ret = self.parse_return_type()?;
        self.expect(&TokenKind::Colon)?;
        self.expect(&TokenKind::Newline)?;
        let body = self.parse_block()?;

        let span = Span::new(start, body.span.end);
        Ok(FunctionDef { id: self.next_id(), name, params, ret, body, span })
    }

    fn parse_param(&mut self) -> Result<Param, ParseError> {
        let start = self.current().span.start;
        let name = self.expect_ident()?;
        self.expect(&TokenKind::Colon)?;
        let ty = self.parse_value_type()?;
        let span = Span::new(start, self.prev_end(start));
        Ok(Param { name, ty, span })
    }

    /// A type that a value can have: `u8`, `i8` or `bool`.
    fn parse_value_type(&mut self) -> Result<Type, ParseError> {
        let ty = match self.current_kind() {
            TokenKind::U8 => Type::U8,
            TokenKind::I8 => Type::I8,
            TokenKind::BoolTy => Type::Bool,
            TokenKind::Void => {
                return Err(ParseError::expected(
                    "a type",
                    self.current_kind(),
                    self.current().span,
                )
                .with_hint("'void' is only valid as a return type"));
            }
            _ => {
                return Err(ParseError::expected(
                    "a type",
                    self.current_kind(),
                    self.current().span,
                ));
            }
        };
        self.advance();
        Ok(ty)
    }

    fn parse_return_type(&mut self) -> Result<Type, ParseError> {
        if self.match_token(&TokenKind::Void) {
            Ok(Type::Void)
        } else {
            self.parse_value_type()
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_block(&mut self) -> Result<Block, ParseError> {
        self.expect(&TokenKind::Indent)?;
        let first = self.parse_stmt()?;
        let start = first.span.start;
        let mut stmts = vec![first];
        while !self.check(&TokenKind::Dedent) && !self.at_end() {
            stmts.push(self.parse_stmt()?);
        }
        self.expect(&TokenKind::Dedent)?;
        let end = stmts.last().map(|s| s.span.end).unwrap_or(start);
        Ok(Block { stmts, span: Span::new(start, end) })
    }

    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        match self.current_kind() {
            TokenKind::Let => self.parse_let_stmt(),
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::Ident(_) if matches!(self.peek(1), TokenKind::Eq) => {
                self.parse_assign_stmt()
            }
            _ => self.parse_expr_stmt(),
        }
    }

    fn parse_let_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current().span.start;
        self.advance(); // 'let'
        let name = self.expect_ident()?;
        self.expect(&TokenKind::Colon)?;
        let ty = self.parse_value_type()?;
        self.expect(&TokenKind::Eq)?;
        let init = self.parse_expr()?;
        let span = Span::new(start, init.span.end);
        self.expect(&TokenKind::Newline)?;
        Ok(Stmt { id: self.next_id(), kind: StmtKind::Let { name, ty, init }, span })
    }

    fn parse_assign_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current().span.start;
        let name = self.expect_ident()?;
        self.advance(); // '='
        let value = self.parse_expr()?;
        let span = Span::new(start, value.span.end);
        self.expect(&TokenKind::Newline)?;
        Ok(Stmt { id: self.next_id(), kind: StmtKind::Assign { name, value }, span })
    }

    fn parse_if_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current().span.start;
        self.advance(); // 'if'
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::Colon)?;
        self.expect(&TokenKind::Newline)?;
        let then_block = self.parse_block()?;

        let mut end = then_block.span.end;
        let else_block = if self.match_token(&TokenKind::Else) {
            self.expect(&TokenKind::Colon)?;
            self.expect(&TokenKind::Newline)?;
            let block = self.parse_block()?;
            end = block.span.end;
            Some(block)
        } else {
            None
        };

        Ok(Stmt {
            id: self.next_id(),
            kind: StmtKind::If { cond, then_block, else_block },
            span: Span::new(start, end),
        })
    }

    fn parse_return_stmt(&mut self) -> Result<Stmt, ParseError> {
        let keyword_span = self.current().span;
        self.advance(); // 'return'
        let value = if self.check(&TokenKind::Newline) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        let end = value.as_ref().map(|e| e.span.end).unwrap_or(keyword_span.end);
        self.expect(&TokenKind::Newline)?;
        Ok(Stmt {
            id: self.next_id(),
            kind: StmtKind::Return(value),
            span: Span::new(keyword_span.start, end),
        })
    }

    fn parse_expr_stmt(&mut self) -> Result<Stmt, ParseError> {
        let expr = self.parse_expr()?;
        let span = expr.span;
        self.expect(&TokenKind::Newline)?;
        Ok(Stmt { id: self.next_id(), kind: StmtKind::Expr(expr), span })
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_comparison()
    }

    /// Comparisons are non-associative: `a < b < c` is an error.
    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_additive()?;

        let op = match self.current_kind() {
            TokenKind::EqEq => BinOp::Eq,
            TokenKind::BangEq => BinOp::Ne,
            TokenKind::Lt => BinOp::Lt,
            TokenKind::LtEq => BinOp::Le,
            TokenKind::Gt => BinOp::Gt,
            TokenKind::GtEq => BinOp::Ge,
            _ => return Ok(left),
        };
        self.advance();
        let right = self.parse_additive()?;

        if self.current_kind().is_comparison() {
            return Err(ParseError::chained_comparison(self.current().span));
        }

        let span = Span::new(left.span.start, right.span.end);
        Ok(Expr {
            id: self.next_id(),
            kind: ExprKind::Binary { op, left: Box::new(left), right: Box::new(right) },
            span,
        })
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.current_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            let span = Span::new(left.span.start, right.span.end);
            left = Expr {
                id: self.next_id(),
                kind: ExprKind::Binary { op, left: Box::new(left), right: Box::new(right) },
                span,
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.check(&TokenKind::Minus) {
            let start = self.current().span.start;

            // Fold `-` onto an integer literal directly, so `-128` is a
            // literal and in range for i8.
            let folded = match self.peek(1) {
                TokenKind::Int(value) => Some(*value),
                _ => None,
            };
            if let Some(value) = folded {
                self.advance(); // '-'
                let end = self.advance().span.end;
                return Ok(Expr {
                    id: self.next_id(),
                    kind: ExprKind::Int(-value),
                    span: Span::new(start, end),
                });
            }

            self.advance(); // '-'
            let operand = self.parse_unary()?;
            let span = Span::new(start, operand.span.end);
            return Ok(Expr {
                id: self.next_id(),
                kind: ExprKind::Unary { op: UnaryOp::Neg, operand: Box::new(operand) },
                span,
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let span = self.current().span;
        match self.current_kind().clone() {
            TokenKind::Int(value) => {
                self.advance();
                Ok(Expr { id: self.next_id(), kind: ExprKind::Int(value), span })
            }
            TokenKind::Bool(value) => {
                self.advance();
                Ok(Expr { id: self.next_id(), kind: ExprKind::Bool(value), span })
            }
            TokenKind::Ident(name) => {
                self.advance();
                if self.check(&TokenKind::LParen) {
                    self.parse_call(name, span)
                } else {
                    Ok(Expr { id: self.next_id(), kind: ExprKind::Ident(name), span })
                }
            }
            TokenKind::LParen => {
                self.advance();
                let mut expr = self.parse_expr()?;
                let end = self.expect(&TokenKind::RParen)?.span.end;
                expr.span = Span::new(span.start, end);
                Ok(expr)
            }
            _ => Err(ParseError::expected(
                "an expression",
                self.current_kind(),
                self.current().span,
            )),
        }
    }

    fn parse_call(&mut self, callee: String, callee_span: Span) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::LParen)?;
        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                args.push(self.parse_expr()?);
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
        }
        let end = self.expect(&TokenKind::RParen)?.span.end;
        Ok(Expr {
            id: self.next_id(),
            kind: ExprKind::Call { callee, args },
            span: Span::new(callee_span.start, end),
        })
    }
}

/// A parse error with location and friendly message.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    pub span: Span,
    pub message: String,
    pub hint: Option<String>,
}

impl ParseError {
    fn expected(expected: &str, found: &TokenKind, span: Span) -> Self {
        Self {
            span,
            message: format!("expected {}, found {}", expected, found.display_name()),
            hint: None,
        }
    }

    fn chained_comparison(span: Span) -> Self {
        Self {
            span,
            message: "comparison operators cannot be chained".to_string(),
            hint: Some("use nested 'if' statements to combine comparisons".to_string()),
        }
    }

    fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
