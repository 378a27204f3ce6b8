//! Recursive-descent parser for payoff expressions.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/' | '%') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := postfix ('**' unary)?
//! postfix := primary ('[' expr ']')*
//! primary := number | ident | ident '(' (expr (',' expr)*)? ')' | '(' expr ')'
//! ```
//!
//! `**` binds tighter than a leading minus and associates to the right, so
//! `-2 ** 2` is `-(2 ** 2)` and `2 ** 3 ** 2` is `2 ** 9`.
//!
//! Later stages walk the tree recursively. Two limits keep that walk on the
//! stack: [`MAX_DEPTH`] bounds nesting and [`MAX_NODES`] bounds the total
//! node count, which also caps flat operator chains like `a + b + c + ...`.

use crate::ast::{AstExpr, AstExprKind, BinaryOp};
use crate::error::{ExpressionError, Span};
use crate::lexer::{Token, TokenKind};

/// Nesting limit; deeper input is rejected instead of exhausting the stack.
pub const MAX_DEPTH: usize = 64;

/// Node limit for a single expression.
pub const MAX_NODES: usize = 1024;

/// Parser state wrapping a token stream.
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    nodes: usize,
    source_len: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>, source_len: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
            nodes: 0,
            source_len,
        }
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn advance(&mut self) -> Option<&Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek_kind() == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &TokenKind) -> Result<Span, ExpressionError> {
        match self.tokens.get(self.pos) {
            Some(tok) if &tok.kind == expected => {
                self.pos += 1;
                Ok(tok.span)
            }
            Some(tok) => Err(ExpressionError::parse(
                format!("expected {}, got {}", expected.describe(), tok.kind.describe()),
                tok.span,
            )),
            None => Err(ExpressionError::parse(
                format!("expected {}, got end of input", expected.describe()),
                self.eof_span(),
            )),
        }
    }

    fn current_span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .map(|t| t.span)
            .unwrap_or_else(|| self.eof_span())
    }

    fn eof_span(&self) -> Span {
        Span::new(self.source_len, self.source_len)
    }

    fn enter(&mut self) -> Result<(), ExpressionError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ExpressionError::parse(
                format!("expression nested deeper than {} levels", MAX_DEPTH),
                self.current_span(),
            ));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Counts one more tree node against [`MAX_NODES`].
    fn node(&mut self, span: Span) -> Result<(), ExpressionError> {
        self.nodes += 1;
        if self.nodes > MAX_NODES {
            return Err(ExpressionError::parse(
                format!("expression has more than {} nodes", MAX_NODES),
                span,
            ));
        }
        Ok(())
    }
}

/// Parses a token stream into a single expression.
///
/// # Errors
///
/// `ExpressionError::Parse` on empty input, a missing construct, or tokens
/// left over after a complete expression.
pub fn parse(tokens: Vec<Token>, source_len: usize) -> Result<AstExpr, ExpressionError> {
    let mut p = Parser::new(tokens, source_len);
    if p.tokens.is_empty() {
        return Err(ExpressionError::parse("empty expression", p.eof_span()));
    }

    let expr = parse_expr(&mut p)?;
    if let Some(tok) = p.tokens.get(p.pos) {
        return Err(ExpressionError::parse(
            format!("unexpected {} after expression", tok.kind.describe()),
            tok.span,
        ));
    }
    Ok(expr)
}

fn binary(op: BinaryOp, lhs: AstExpr, rhs: AstExpr) -> AstExpr {
    let span = lhs.span.to(rhs.span);
    AstExpr {
        kind: AstExprKind::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        },
        span,
    }
}

fn parse_expr(p: &mut Parser) -> Result<AstExpr, ExpressionError> {
    p.enter()?;
    let mut left = parse_term(p)?;
    loop {
        let op = match p.peek_kind() {
            Some(TokenKind::Plus) => BinaryOp::Add,
            Some(TokenKind::Minus) => BinaryOp::Sub,
            _ => break,
        };
        p.node(p.current_span())?;
        p.advance();
        let right = parse_term(p)?;
        left = binary(op, left, right);
    }
    p.leave();
    Ok(left)
}

fn parse_term(p: &mut Parser) -> Result<AstExpr, ExpressionError> {
    let mut left = parse_unary(p)?;
    loop {
        let op = match p.peek_kind() {
            Some(TokenKind::Star) => BinaryOp::Mul,
            Some(TokenKind::Slash) => BinaryOp::Div,
            Some(TokenKind::Percent) => BinaryOp::Rem,
            _ => break,
        };
        p.node(p.current_span())?;
        p.advance();
        let right = parse_unary(p)?;
        left = binary(op, left, right);
    }
    Ok(left)
}

fn parse_unary(p: &mut Parser) -> Result<AstExpr, ExpressionError> {
    let negate = match p.peek_kind() {
        Some(TokenKind::Minus) => true,
        Some(TokenKind::Plus) => false,
        _ => return parse_power(p),
    };

    let start = p.current_span();
    if negate {
        p.node(start)?;
    }
    p.advance();
    p.enter()?;
    let operand = parse_unary(p)?;
    p.leave();

    if !negate {
        return Ok(operand);
    }
    let span = start.to(operand.span);
    Ok(AstExpr {
        kind: AstExprKind::Neg(Box::new(operand)),
        span,
    })
}

fn parse_power(p: &mut Parser) -> Result<AstExpr, ExpressionError> {
    let base = parse_postfix(p)?;
    if p.peek_kind() != Some(&TokenKind::StarStar) {
        return Ok(base);
    }
    p.node(p.current_span())?;
    p.advance();
    p.enter()?;
    let exponent = parse_unary(p)?;
    p.leave();
    Ok(binary(BinaryOp::Pow, base, exponent))
}

fn parse_postfix(p: &mut Parser) -> Result<AstExpr, ExpressionError> {
    let mut expr = parse_primary(p)?;
    while p.peek_kind() == Some(&TokenKind::LBracket) {
        p.node(p.current_span())?;
        p.advance();
        let index = parse_expr(p)?;
        let close = p.expect(&TokenKind::RBracket)?;
        let span = expr.span.to(close);
        expr = AstExpr {
            kind: AstExprKind::Index {
                target: Box::new(expr),
                index: Box::new(index),
            },
            span,
        };
    }
    Ok(expr)
}

fn parse_primary(p: &mut Parser) -> Result<AstExpr, ExpressionError> {
    let span = p.current_span();
    if matches!(p.peek_kind(), Some(TokenKind::Number(_) | TokenKind::Ident(_))) {
        p.node(span)?;
    }
    match p.peek_kind().cloned() {
        Some(TokenKind::Number(n)) => {
            p.advance();
            Ok(AstExpr {
                kind: AstExprKind::Number(n),
                span,
            })
        }
        Some(TokenKind::LParen) => {
            p.advance();
            let inner = parse_expr(p)?;
            let close = p.expect(&TokenKind::RParen)?;
            Ok(AstExpr {
                kind: inner.kind,
                span: span.to(close),
            })
        }
        Some(TokenKind::Ident(name)) => {
            p.advance();
            if !p.eat(&TokenKind::LParen) {
                return Ok(AstExpr {
                    kind: AstExprKind::Ident(name),
                    span,
                });
            }

            let mut args = Vec::new();
            if p.peek_kind() != Some(&TokenKind::RParen) {
                args.push(parse_expr(p)?);
                while p.eat(&TokenKind::Comma) {
                    args.push(parse_expr(p)?);
                }
            }
            let close = p.expect(&TokenKind::RParen)?;
            Ok(AstExpr {
                kind: AstExprKind::Call {
                    name,
                    name_span: span,
                    args,
                },
                span: span.to(close),
            })
        }
        Some(other) => Err(ExpressionError::parse(
            format!("expected expression, got {}", other.describe()),
            span,
        )),
        None => Err(ExpressionError::parse(
            "expected expression, got end of input",
            span,
        )),
    }
}
