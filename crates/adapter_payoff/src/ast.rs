//! Untyped syntax tree produced by the parser.

use crate::error::Span;

/// Binary operators, loosest binding first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%` (floored, result takes the sign of the divisor)
    Rem,
    /// `**`
    Pow,
}

impl BinaryOp {
    /// Source symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Pow => "**",
        }
    }
}

/// Expression node with its source span.
#[derive(Debug, Clone, PartialEq)]
pub struct AstExpr {
    /// Node payload.
    pub kind: AstExprKind,
    /// Source span of the whole sub-expression.
    pub span: Span,
}

/// Expression node kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum AstExprKind {
    /// Numeric literal.
    Number(f64),
    /// Name reference (`path`, `pi`, `math.e`).
    Ident(String),
    /// Unary minus.
    Neg(Box<AstExpr>),
    /// Binary operation.
    Binary {
        /// Operator.
        op: BinaryOp,
        /// Left operand.
        lhs: Box<AstExpr>,
        /// Right operand.
        rhs: Box<AstExpr>,
    },
    /// `target[index]`.
    Index {
        /// Indexed expression.
        target: Box<AstExpr>,
        /// Index expression.
        index: Box<AstExpr>,
    },
    /// `name(args...)`.
    Call {
        /// Function name as written.
        name: String,
        /// Span of the name alone.
        name_span: Span,
        /// Arguments in order.
        args: Vec<AstExpr>,
    },
}
