//! Evaluator for compiled expressions.
//!
//! Walks the IR once per simulated path. Evaluation never panics: domain
//! errors, bad indices and division by zero come back as
//! `ExpressionError::Eval` pointing at the failing sub-expression.

use crate::ast::BinaryOp;
use crate::error::{ExpressionError, Span};
use crate::ir::{Func, Node, Reducer};

/// Evaluates `node` on `path`.
pub fn evaluate(node: &Node, path: &[f64]) -> Result<f64, ExpressionError> {
    match node {
        Node::Const(value) => Ok(*value),
        Node::Neg(inner) => Ok(-evaluate(inner, path)?),
        Node::Binary { op, lhs, rhs, span } => {
            binary(*op, evaluate(lhs, path)?, evaluate(rhs, path)?, *span)
        }
        Node::Index { index, span } => index_path(path, evaluate(index, path)?, *span),
        Node::Reduce { reducer, span } => reduce(*reducer, path, *span),
        Node::Apply { func, args, span } => {
            let values = args
                .iter()
                .map(|arg| evaluate(arg, path))
                .collect::<Result<Vec<_>, _>>()?;
            apply(*func, &values, *span)
        }
    }
}

fn binary(op: BinaryOp, a: f64, b: f64, span: Span) -> Result<f64, ExpressionError> {
    match op {
        BinaryOp::Add => Ok(a + b),
        BinaryOp::Sub => Ok(a - b),
        BinaryOp::Mul => Ok(a * b),
        BinaryOp::Div => {
            if b == 0.0 {
                return Err(ExpressionError::eval("division by zero", span));
            }
            Ok(a / b)
        }
        BinaryOp::Rem => {
            if b == 0.0 {
                return Err(ExpressionError::eval("modulo by zero", span));
            }
            Ok(floored_rem(a, b))
        }
        BinaryOp::Pow => power(a, b, span),
    }
}

/// Remainder with the sign of the divisor.
fn floored_rem(a: f64, b: f64) -> f64 {
    let r = a % b;
    if r != 0.0 && (r < 0.0) != (b < 0.0) {
        r + b
    } else {
        r
    }
}

fn power(base: f64, exponent: f64, span: Span) -> Result<f64, ExpressionError> {
    if base == 0.0 && exponent < 0.0 {
        return Err(ExpressionError::eval(
            "zero cannot be raised to a negative power",
            span,
        ));
    }
    if base < 0.0 && exponent.fract() != 0.0 {
        return Err(ExpressionError::eval(
            format!("negative base {} with fractional exponent {}", base, exponent),
            span,
        ));
    }
    Ok(base.powf(exponent))
}

fn index_path(path: &[f64], index: f64, span: Span) -> Result<f64, ExpressionError> {
    if !index.is_finite() || index.fract() != 0.0 {
        return Err(ExpressionError::eval(
            format!("index must be an integer, got {}", index),
            span,
        ));
    }

    let len = path.len() as f64;
    let resolved = if index < 0.0 { index + len } else { index };
    if resolved < 0.0 || resolved >= len {
        return Err(ExpressionError::eval(
            format!("index {} out of range for path of length {}", index, path.len()),
            span,
        ));
    }
    Ok(path[resolved as usize])
}

fn reduce(reducer: Reducer, path: &[f64], span: Span) -> Result<f64, ExpressionError> {
    match reducer {
        Reducer::Sum => Ok(path.iter().sum()),
        Reducer::Len => Ok(path.len() as f64),
        Reducer::Max | Reducer::Min => {
            let (first, rest) = path.split_first().ok_or_else(|| {
                ExpressionError::eval("cannot take max or min of an empty path", span)
            })?;
            let fold = if reducer == Reducer::Max { f64::max } else { f64::min };
            Ok(rest.iter().copied().fold(*first, fold))
        }
    }
}

fn apply(func: Func, args: &[f64], span: Span) -> Result<f64, ExpressionError> {
    match (func, args) {
        (Func::Abs, [x]) => Ok(x.abs()),
        (Func::Exp, [x]) => Ok(x.exp()),
        (Func::Log, [x]) => {
            if *x <= 0.0 {
                return Err(ExpressionError::eval(
                    format!("log of non-positive value {}", x),
                    span,
                ));
            }
            Ok(x.ln())
        }
        (Func::Sqrt, [x]) => {
            if *x < 0.0 {
                return Err(ExpressionError::eval(
                    format!("square root of negative value {}", x),
                    span,
                ));
            }
            Ok(x.sqrt())
        }
        (Func::Floor, [x]) => Ok(x.floor()),
        (Func::Ceil, [x]) => Ok(x.ceil()),
        (Func::Pow, [base, exponent]) => power(*base, *exponent, span),
        (Func::Max, [first, rest @ ..]) => Ok(rest.iter().copied().fold(*first, f64::max)),
        (Func::Min, [first, rest @ ..]) => Ok(rest.iter().copied().fold(*first, f64::min)),
        _ => Err(ExpressionError::eval(
            format!("{:?} called with {} argument(s)", func, args.len()),
            span,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn span() -> Span {
        Span::new(0, 1)
    }

    #[test]
    fn test_floored_remainder_follows_divisor_sign() {
        assert_eq!(floored_rem(7.0, 3.0), 1.0);
        assert_eq!(floored_rem(-7.0, 3.0), 2.0);
        assert_eq!(floored_rem(7.0, -3.0), -2.0);
        assert_eq!(floored_rem(6.0, 3.0), 0.0);
    }

    #[test]
    fn test_division_by_zero() {
        let err = binary(BinaryOp::Div, 1.0, 0.0, span()).unwrap_err();
        assert_eq!(err.message(), "division by zero");
        let err = binary(BinaryOp::Rem, 1.0, 0.0, span()).unwrap_err();
        assert_eq!(err.message(), "modulo by zero");
    }

    #[test]
    fn test_power_domain() {
        assert_relative_eq!(power(2.0, 10.0, span()).unwrap(), 1024.0);
        assert_relative_eq!(power(-2.0, 3.0, span()).unwrap(), -8.0);
        assert!(power(0.0, -1.0, span()).is_err());
        assert!(power(-8.0, 1.0 / 3.0, span()).is_err());
    }

    #[test]
    fn test_indexing() {
        let path = [1.0, 2.0, 3.0];
        assert_eq!(index_path(&path, 0.0, span()).unwrap(), 1.0);
        assert_eq!(index_path(&path, -1.0, span()).unwrap(), 3.0);
        assert_eq!(index_path(&path, -3.0, span()).unwrap(), 1.0);
        assert!(index_path(&path, 3.0, span()).is_err());
        assert!(index_path(&path, -4.0, span()).is_err());
        assert!(index_path(&path, 0.5, span())
            .unwrap_err()
            .message()
            .contains("integer"));
        assert!(index_path(&[], 0.0, span()).is_err());
    }

    #[test]
    fn test_reductions() {
        let path = [3.0, 1.0, 4.0, 1.0, 5.0];
        assert_eq!(reduce(Reducer::Sum, &path, span()).unwrap(), 14.0);
        assert_eq!(reduce(Reducer::Len, &path, span()).unwrap(), 5.0);
        assert_eq!(reduce(Reducer::Max, &path, span()).unwrap(), 5.0);
        assert_eq!(reduce(Reducer::Min, &path, span()).unwrap(), 1.0);

        assert_eq!(reduce(Reducer::Sum, &[], span()).unwrap(), 0.0);
        assert!(reduce(Reducer::Max, &[], span()).is_err());
    }

    #[test]
    fn test_function_domains() {
        assert!(apply(Func::Log, &[0.0], span()).is_err());
        assert!(apply(Func::Sqrt, &[-1.0], span()).is_err());
        assert_eq!(apply(Func::Sqrt, &[9.0], span()).unwrap(), 3.0);
        assert_eq!(apply(Func::Max, &[1.0, 7.0, 3.0], span()).unwrap(), 7.0);
        assert_eq!(apply(Func::Min, &[1.0, 7.0, -3.0], span()).unwrap(), -3.0);
        assert_eq!(apply(Func::Floor, &[-1.5], span()).unwrap(), -2.0);
        assert_eq!(apply(Func::Ceil, &[-1.5], span()).unwrap(), -1.0);
    }
}
