//! Typed intermediate representation of a compiled expression.
//!
//! Every node produces a scalar. The only series in the language is the
//! simulated path, which the IR touches through [`Node::Index`] and
//! [`Node::Reduce`].

use crate::ast::BinaryOp;
use crate::error::Span;

/// Whitelisted scalar functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    /// `abs(x)`
    Abs,
    /// `exp(x)`
    Exp,
    /// `log(x)`, natural logarithm
    Log,
    /// `sqrt(x)`
    Sqrt,
    /// `floor(x)`
    Floor,
    /// `ceil(x)`
    Ceil,
    /// `pow(x, y)`
    Pow,
    /// `max(a, b, ...)`
    Max,
    /// `min(a, b, ...)`
    Min,
}

/// Reductions over the whole path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    /// `sum(path)`
    Sum,
    /// `len(path)`
    Len,
    /// `max(path)`
    Max,
    /// `min(path)`
    Min,
}

/// Scalar-valued IR node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Literal or named constant.
    Const(f64),
    /// Unary minus.
    Neg(Box<Node>),
    /// Binary arithmetic.
    Binary {
        /// Operator.
        op: BinaryOp,
        /// Left operand.
        lhs: Box<Node>,
        /// Right operand.
        rhs: Box<Node>,
        /// Source span, for runtime errors.
        span: Span,
    },
    /// `path[index]`, negative indices counting from the end.
    Index {
        /// Index expression.
        index: Box<Node>,
        /// Source span, for runtime errors.
        span: Span,
    },
    /// Reduction of the whole path.
    Reduce {
        /// Which reduction.
        reducer: Reducer,
        /// Source span, for runtime errors.
        span: Span,
    },
    /// Whitelisted function applied to scalar arguments.
    Apply {
        /// Function.
        func: Func,
        /// Arguments, arity already checked.
        args: Vec<Node>,
        /// Source span, for runtime errors.
        span: Span,
    },
}

impl Node {
    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        match self {
            Node::Const(_) | Node::Reduce { .. } => 1,
            Node::Neg(inner) => 1 + inner.size(),
            Node::Binary { lhs, rhs, .. } => 1 + lhs.size() + rhs.size(),
            Node::Index { index, .. } => 1 + index.size(),
            Node::Apply { args, .. } => 1 + args.iter().map(Node::size).sum::<usize>(),
        }
    }

    /// True if the node never reads the path.
    pub fn is_constant(&self) -> bool {
        match self {
            Node::Const(_) => true,
            Node::Index { .. } | Node::Reduce { .. } => false,
            Node::Neg(inner) => inner.is_constant(),
            Node::Binary { lhs, rhs, .. } => lhs.is_constant() && rhs.is_constant(),
            Node::Apply { args, .. } => args.iter().all(Node::is_constant),
        }
    }
}
