use crate::kernel::ast::{AssignOp, BinaryOp, Declarator, Expr, Lit, ScalarType, Stmt, UnaryOp};
use crate::kernel::error::KernelError;
use crate::kernel::lexer::{Span, Token, TokenKind, lex};

/// Parse a kernel fragment into a statement list.
pub(crate) fn parse_fragment(src: &str) -> Result<Vec<Stmt>, KernelError> {
    let tokens = lex(src)?;
    let mut p = Parser { tokens, pos: 0 };
    let mut stmts = Vec::new();
    while p.peek().kind != TokenKind::Eof {
        stmts.push(p.parse_stmt()?);
    }
    Ok(stmts)
}

/// Parse a single expression.
#[cfg(test)]
pub(crate) fn parse_expr(src: &str) -> Result<Expr, KernelError> {
    let tokens = lex(src)?;
    let mut p = Parser { tokens, pos: 0 };
    let e = p.parse_expr()?;
    p.expect(TokenKind::Eof)?;
    Ok(e)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_at(&self, ahead: usize) -> &TokenKind {
        let i = (self.pos + ahead).min(self.tokens.len() - 1);
        &self.tokens[i].kind
    }

    fn bump(&mut self) -> &Token {
        let t = &self.tokens[self.pos];
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        t
    }

    fn span(&self) -> Span {
        self.peek().span
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), KernelError> {
        if self.peek().kind == kind {
            self.bump();
            Ok(())
        } else {
            Err(KernelError::new(
                self.span().start,
                format!("expected {kind:?}, found {:?}", self.peek().kind),
            ))
        }
    }

    fn consume(&mut self, kind: TokenKind) -> bool {
        if self.peek().kind == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn keyword(&self, kw: &str) -> bool {
        matches!(&self.peek().kind, TokenKind::Ident(s) if s == kw)
    }

    fn ident(&mut self) -> Result<(String, usize), KernelError> {
        let t = self.bump().clone();
        match t.kind {
            TokenKind::Ident(s) => Ok((s, t.span.start)),
            other => Err(KernelError::new(
                t.span.start,
                format!("expected identifier, found {other:?}"),
            )),
        }
    }

    fn parse_stmt(&mut self) -> Result<Stmt, KernelError> {
        if self.consume(TokenKind::Semi) {
            return Ok(Stmt::Empty);
        }
        if self.consume(TokenKind::LBrace) {
            let mut body = Vec::new();
            while !self.consume(TokenKind::RBrace) {
                if self.peek().kind == TokenKind::Eof {
                    return Err(KernelError::new(self.span().start, "unclosed block"));
                }
                body.push(self.parse_stmt()?);
            }
            return Ok(Stmt::Block(body));
        }
        if self.keyword("if") {
            self.bump();
            self.expect(TokenKind::LParen)?;
            let cond = self.parse_expr()?;
            self.expect(TokenKind::RParen)?;
            let then = Box::new(self.parse_stmt()?);
            let otherwise = if self.keyword("else") {
                self.bump();
                Some(Box::new(self.parse_stmt()?))
            } else {
                None
            };
            return Ok(Stmt::If {
                cond,
                then,
                otherwise,
            });
        }
        if self.keyword("while") {
            self.bump();
            self.expect(TokenKind::LParen)?;
            let cond = self.parse_expr()?;
            self.expect(TokenKind::RParen)?;
            let body = Box::new(self.parse_stmt()?);
            return Ok(Stmt::While { cond, body });
        }
        if let TokenKind::Ident(s) = &self.peek().kind
            && let Some(ty) = ScalarType::from_keyword(s)
        {
            self.bump();
            return self.parse_decl(ty);
        }
        if let TokenKind::Ident(_) = &self.peek().kind {
            let op = match self.peek_at(1) {
                TokenKind::Assign => Some(AssignOp::Set),
                TokenKind::PlusEq => Some(AssignOp::Add),
                TokenKind::MinusEq => Some(AssignOp::Sub),
                TokenKind::StarEq => Some(AssignOp::Mul),
                TokenKind::SlashEq => Some(AssignOp::Div),
                _ => None,
            };
            if let Some(op) = op {
                let (target, offset) = self.ident()?;
                self.bump();
                let value = self.parse_expr()?;
                self.expect(TokenKind::Semi)?;
                return Ok(Stmt::Assign {
                    target,
                    offset,
                    op,
                    value,
                });
            }
        }
        let e = self.parse_expr()?;
        self.expect(TokenKind::Semi)?;
        Ok(Stmt::Expr(e))
    }

    fn parse_decl(&mut self, ty: ScalarType) -> Result<Stmt, KernelError> {
        let mut vars = Vec::new();
        loop {
            let (name, offset) = self.ident()?;
            let init = if self.consume(TokenKind::Assign) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            vars.push(Declarator { name, offset, init });
            if self.consume(TokenKind::Comma) {
                continue;
            }
            self.expect(TokenKind::Semi)?;
            return Ok(Stmt::Decl { ty, vars });
        }
    }

    fn parse_expr(&mut self) -> Result<Expr, KernelError> {
        self.parse_ternary()
    }

    fn parse_ternary(&mut self) -> Result<Expr, KernelError> {
        let cond = self.parse_or()?;
        if !self.consume(TokenKind::Question) {
            return Ok(cond);
        }
        let then = self.parse_expr()?;
        self.expect(TokenKind::Colon)?;
        let otherwise = self.parse_ternary()?;
        Ok(Expr::Ternary {
            cond: Box::new(cond),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        })
    }

    fn parse_or(&mut self) -> Result<Expr, KernelError> {
        let mut e = self.parse_and()?;
        while self.consume(TokenKind::OrOr) {
            let r = self.parse_and()?;
            e = binary(BinaryOp::Or, e, r);
        }
        Ok(e)
    }

    fn parse_and(&mut self) -> Result<Expr, KernelError> {
        let mut e = self.parse_equality()?;
        while self.consume(TokenKind::AndAnd) {
            let r = self.parse_equality()?;
            e = binary(BinaryOp::And, e, r);
        }
        Ok(e)
    }

    fn parse_equality(&mut self) -> Result<Expr, KernelError> {
        let mut e = self.parse_comparison()?;
        loop {
            let op = if self.consume(TokenKind::EqEq) {
                BinaryOp::Eq
            } else if self.consume(TokenKind::Ne) {
                BinaryOp::Ne
            } else {
                break;
            };
            let r = self.parse_comparison()?;
            e = binary(op, e, r);
        }
        Ok(e)
    }

    fn parse_comparison(&mut self) -> Result<Expr, KernelError> {
        let mut e = self.parse_term()?;
        loop {
            let op = if self.consume(TokenKind::Lt) {
                BinaryOp::Lt
            } else if self.consume(TokenKind::Le) {
                BinaryOp::Le
            } else if self.consume(TokenKind::Gt) {
                BinaryOp::Gt
            } else if self.consume(TokenKind::Ge) {
                BinaryOp::Ge
            } else {
                break;
            };
            let r = self.parse_term()?;
            e = binary(op, e, r);
        }
        Ok(e)
    }

    fn parse_term(&mut self) -> Result<Expr, KernelError> {
        let mut e = self.parse_factor()?;
        loop {
            let op = if self.consume(TokenKind::Plus) {
                BinaryOp::Add
            } else if self.consume(TokenKind::Minus) {
                BinaryOp::Sub
            } else {
                break;
            };
            let r = self.parse_factor()?;
            e = binary(op, e, r);
        }
        Ok(e)
    }

    fn parse_factor(&mut self) -> Result<Expr, KernelError> {
        let mut e = self.parse_unary()?;
        loop {
            let op = if self.consume(TokenKind::Star) {
                BinaryOp::Mul
            } else if self.consume(TokenKind::Slash) {
                BinaryOp::Div
            } else if self.consume(TokenKind::Percent) {
                BinaryOp::Mod
            } else {
                break;
            };
            let r = self.parse_unary()?;
            e = binary(op, e, r);
        }
        Ok(e)
    }

    fn parse_unary(&mut self) -> Result<Expr, KernelError> {
        if self.consume(TokenKind::Minus) {
            let e = self.parse_unary()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Neg,
                expr: Box::new(e),
            });
        }
        if self.consume(TokenKind::Plus) {
            return self.parse_unary();
        }
        if self.consume(TokenKind::Bang) {
            let e = self.parse_unary()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                expr: Box::new(e),
            });
        }
        // C-style cast: `(float) expr`
        if self.peek().kind == TokenKind::LParen
            && *self.peek_at(2) == TokenKind::RParen
            && let TokenKind::Ident(s) = self.peek_at(1)
            && let Some(ty) = ScalarType::from_keyword(s)
        {
            self.bump();
            self.bump();
            self.bump();
            let e = self.parse_unary()?;
            return Ok(Expr::Cast {
                ty,
                expr: Box::new(e),
            });
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expr, KernelError> {
        let e = self.parse_primary()?;
        if self.peek().kind != TokenKind::LParen {
            return Ok(e);
        }
        let call_at = self.span().start;
        self.bump();
        let args = self.parse_args()?;
        match e {
            Expr::Var { name, offset } => Ok(Expr::Call {
                func: name,
                args,
                offset,
            }),
            _ => Err(KernelError::new(call_at, "call target must be an identifier")),
        }
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>, KernelError> {
        let mut args = Vec::new();
        if self.consume(TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            if self.consume(TokenKind::Comma) {
                continue;
            }
            self.expect(TokenKind::RParen)?;
            return Ok(args);
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, KernelError> {
        let t = self.bump().clone();
        match t.kind {
            TokenKind::Number(v) => Ok(Expr::Lit(Lit::F64(v))),
            TokenKind::True => Ok(Expr::Lit(Lit::Bool(true))),
            TokenKind::False => Ok(Expr::Lit(Lit::Bool(false))),
            TokenKind::Ident(name) => Ok(Expr::Var {
                name,
                offset: t.span.start,
            }),
            TokenKind::LParen => {
                let e = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(e)
            }
            other => Err(KernelError::new(
                t.span.start,
                format!("unexpected token {other:?}"),
            )),
        }
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/parser.rs"]
mod tests;
