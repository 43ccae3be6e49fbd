use crate::expression::ast::Expr;
use crate::expression::binary::BinaryOp;
use crate::expression::lexer::{Span, Token, TokenKind, lex};
use crate::expression::unary::UnaryOp;
use crate::foundation::error::{VizError, VizResult};

pub(crate) fn parse_expr(src: &str) -> VizResult<Expr> {
    let tokens = lex(src)?;
    let mut p = Parser { tokens, pos: 0 };
    let expr = p.parse_or()?;
    p.expect(TokenKind::Eof)?;
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn bump(&mut self) -> Token {
        let t = self.tokens[self.pos].clone();
        if t.kind != TokenKind::Eof {
            self.pos += 1;
        }
        t
    }

    fn span(&self) -> Span {
        self.peek().span
    }

    fn expect(&mut self, kind: TokenKind) -> VizResult<()> {
        if self.peek().kind == kind {
            self.bump();
            Ok(())
        } else {
            Err(VizError::parse(
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

    /// Left-associative binary level over `ops`, with `next` parsing operands.
    fn parse_level(
        &mut self,
        ops: &[(TokenKind, BinaryOp)],
        next: fn(&mut Self) -> VizResult<Expr>,
    ) -> VizResult<Expr> {
        let mut e = next(self)?;
        'outer: loop {
            for (kind, op) in ops {
                if self.consume(kind.clone()) {
                    let r = next(self)?;
                    e = binary(*op, e, r);
                    continue 'outer;
                }
            }
            return Ok(e);
        }
    }

    fn parse_or(&mut self) -> VizResult<Expr> {
        self.parse_level(&[(TokenKind::OrOr, BinaryOp::Or)], Self::parse_and)
    }

    fn parse_and(&mut self) -> VizResult<Expr> {
        self.parse_level(&[(TokenKind::AndAnd, BinaryOp::And)], Self::parse_equality)
    }

    fn parse_equality(&mut self) -> VizResult<Expr> {
        self.parse_level(
            &[(TokenKind::EqEq, BinaryOp::Eq), (TokenKind::Ne, BinaryOp::Ne)],
            Self::parse_comparison,
        )
    }

    fn parse_comparison(&mut self) -> VizResult<Expr> {
        self.parse_level(
            &[
                (TokenKind::Le, BinaryOp::Le),
                (TokenKind::Lt, BinaryOp::Lt),
                (TokenKind::Ge, BinaryOp::Ge),
                (TokenKind::Gt, BinaryOp::Gt),
            ],
            Self::parse_term,
        )
    }

    fn parse_term(&mut self) -> VizResult<Expr> {
        self.parse_level(
            &[(TokenKind::Plus, BinaryOp::Add), (TokenKind::Minus, BinaryOp::Sub)],
            Self::parse_factor,
        )
    }

    fn parse_factor(&mut self) -> VizResult<Expr> {
        self.parse_level(
            &[
                (TokenKind::Star, BinaryOp::Mul),
                (TokenKind::Slash, BinaryOp::Div),
                (TokenKind::Percent, BinaryOp::Mod),
            ],
            Self::parse_unary,
        )
    }

    fn parse_unary(&mut self) -> VizResult<Expr> {
        let op = if self.consume(TokenKind::Minus) {
            UnaryOp::Neg
        } else if self.consume(TokenKind::Bang) {
            UnaryOp::Not
        } else {
            return self.parse_power();
        };
        let e = self.parse_unary()?;
        Ok(Expr::Unary {
            op,
            expr: Box::new(e),
        })
    }

    /// `^` is right-associative and binds tighter than unary minus.
    fn parse_power(&mut self) -> VizResult<Expr> {
        let base = self.parse_primary()?;
        if self.consume(TokenKind::Caret) {
            let exp = self.parse_unary()?;
            return Ok(binary(BinaryOp::Pow, base, exp));
        }
        Ok(base)
    }

    fn parse_list(&mut self, close: TokenKind) -> VizResult<Vec<Expr>> {
        let mut items = Vec::new();
        if self.consume(close.clone()) {
            return Ok(items);
        }
        loop {
            items.push(self.parse_or()?);
            if self.consume(TokenKind::Comma) {
                continue;
            }
            self.expect(close)?;
            return Ok(items);
        }
    }

    fn parse_primary(&mut self) -> VizResult<Expr> {
        let t = self.bump();
        match t.kind {
            TokenKind::Number(v) => Ok(Expr::Number(v)),
            TokenKind::Str(s) => Ok(Expr::Text(s)),
            TokenKind::Hex(s) => Ok(Expr::Hex(s)),
            TokenKind::Prop(s) => Ok(Expr::Prop(s)),
            TokenKind::Ident(s) => {
                if self.consume(TokenKind::LParen) {
                    let args = self.parse_list(TokenKind::RParen)?;
                    return Ok(Expr::Call {
                        func: s,
                        args,
                        offset: t.span.start,
                    });
                }
                Ok(Expr::Ident(s))
            }
            TokenKind::LParen => {
                let e = self.parse_or()?;
                self.expect(TokenKind::RParen)?;
                Ok(e)
            }
            TokenKind::LBracket => Ok(Expr::Array(self.parse_list(TokenKind::RBracket)?)),
            other => Err(VizError::parse(
                t.span.start,
                format!("unexpected token {other:?}"),
            )),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/parser.rs"]
mod tests;
