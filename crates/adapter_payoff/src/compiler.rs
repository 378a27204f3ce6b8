//! Compiler: AST → IR with name resolution and type checking.
//!
//! Expressions have two types. `path` is the only series; everything else is
//! a scalar. A series may only appear as the target of an index or as the
//! single argument of `sum`, `len`, `max` or `min`, and the whole expression
//! must be a scalar.

use std::f64::consts::{E, PI};

use crate::ast::{AstExpr, AstExprKind};
use crate::error::{ExpressionError, Span};
use crate::ir::{Func, Node, Reducer};

/// Names callable from an expression, sorted for error messages.
pub const ALLOWED_FUNCTIONS: [&str; 11] = [
    "abs", "ceil", "exp", "floor", "len", "log", "max", "min", "pow", "sqrt", "sum",
];

const SERIES_NAME: &str = "path";

/// Strips an optional `math.` prefix; other dotted names do not resolve.
fn canonical(name: &str) -> Option<&str> {
    match name.strip_prefix("math.") {
        Some(rest) => Some(rest),
        None if name.contains('.') => None,
        None => Some(name),
    }
}

fn constant(name: &str) -> Option<f64> {
    match canonical(name)? {
        "pi" => Some(PI),
        "e" => Some(E),
        _ => None,
    }
}

fn is_series(expr: &AstExpr) -> bool {
    matches!(&expr.kind, AstExprKind::Ident(name) if name == SERIES_NAME)
}

/// Lowers a parsed expression into a scalar IR tree.
///
/// # Errors
///
/// `ExpressionError::Compile` for unknown names, functions outside the
/// whitelist, wrong arity, or a series used where a scalar is required.
pub fn compile(expr: &AstExpr) -> Result<Node, ExpressionError> {
    scalar(expr)
}

fn scalar(expr: &AstExpr) -> Result<Node, ExpressionError> {
    match &expr.kind {
        AstExprKind::Number(value) => Ok(Node::Const(*value)),
        AstExprKind::Ident(name) if name == SERIES_NAME => Err(ExpressionError::compile(
            "`path` is a series here; index it or reduce it with sum, len, max or min",
            expr.span,
        )),
        AstExprKind::Ident(name) => constant(name).map(Node::Const).ok_or_else(|| {
            ExpressionError::compile(
                format!("unknown name `{}`; expressions may use `path`, `pi` and `e`", name),
                expr.span,
            )
        }),
        AstExprKind::Neg(inner) => Ok(Node::Neg(Box::new(scalar(inner)?))),
        AstExprKind::Binary { op, lhs, rhs } => Ok(Node::Binary {
            op: *op,
            lhs: Box::new(scalar(lhs)?),
            rhs: Box::new(scalar(rhs)?),
            span: expr.span,
        }),
        AstExprKind::Index { target, index } => {
            if !is_series(target) {
                return Err(ExpressionError::compile(
                    "only `path` can be indexed",
                    target.span,
                ));
            }
            Ok(Node::Index {
                index: Box::new(scalar(index)?),
                span: expr.span,
            })
        }
        AstExprKind::Call {
            name,
            name_span,
            args,
        } => call(name, *name_span, args, expr.span),
    }
}

fn call(name: &str, name_span: Span, args: &[AstExpr], span: Span) -> Result<Node, ExpressionError> {
    let canonical_name = canonical(name)
        .filter(|n| ALLOWED_FUNCTIONS.contains(n))
        .ok_or_else(|| {
            ExpressionError::compile(
                format!(
                    "function `{}` is not allowed; available: {}",
                    name,
                    ALLOWED_FUNCTIONS.join(", ")
                ),
                name_span,
            )
        })?;

    let arity_error = |expected: &str| {
        ExpressionError::compile(
            format!("`{}` expects {}, got {} argument(s)", name, expected, args.len()),
            span,
        )
    };

    let reduce = |reducer: Reducer| -> Result<Node, ExpressionError> {
        match args {
            [arg] if is_series(arg) => Ok(Node::Reduce { reducer, span }),
            [arg] => Err(ExpressionError::compile(
                format!("`{}` expects the series `path`", name),
                arg.span,
            )),
            _ => Err(arity_error("exactly one argument")),
        }
    };

    let apply = |func: Func, arity: usize| -> Result<Node, ExpressionError> {
        if args.len() != arity {
            let expected = match arity {
                1 => "one argument",
                _ => "two arguments",
            };
            return Err(arity_error(expected));
        }
        let args = args.iter().map(scalar).collect::<Result<Vec<_>, _>>()?;
        Ok(Node::Apply { func, args, span })
    };

    match canonical_name {
        "sum" => reduce(Reducer::Sum),
        "len" => reduce(Reducer::Len),
        "max" | "min" => {
            let (reducer, func) = if canonical_name == "max" {
                (Reducer::Max, Func::Max)
            } else {
                (Reducer::Min, Func::Min)
            };
            match args {
                [arg] if is_series(arg) => Ok(Node::Reduce { reducer, span }),
                [_] | [] => Err(arity_error("the series `path` or at least two scalars")),
                _ => {
                    let args = args.iter().map(scalar).collect::<Result<Vec<_>, _>>()?;
                    Ok(Node::Apply { func, args, span })
                }
            }
        }
        "abs" => apply(Func::Abs, 1),
        "exp" => apply(Func::Exp, 1),
        "log" => apply(Func::Log, 1),
        "sqrt" => apply(Func::Sqrt, 1),
        "floor" => apply(Func::Floor, 1),
        "ceil" => apply(Func::Ceil, 1),
        _ => apply(Func::Pow, 2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse;

    fn lower(source: &str) -> Result<Node, ExpressionError> {
        compile(&parse(tokenize(source)?, source.len())?)
    }

    fn compile_error(source: &str) -> String {
        match lower(source) {
            Err(ExpressionError::Compile { message, .. }) => message,
            other => panic!("{:?} compiled to {:?}", source, other),
        }
    }

    #[test]
    fn test_constants_resolve() {
        assert_eq!(lower("pi").unwrap(), Node::Const(PI));
        assert_eq!(lower("math.e").unwrap(), Node::Const(E));
    }

    #[test]
    fn test_math_prefix_is_accepted() {
        assert!(lower("math.sqrt(math.pow(path[0], 2))").is_ok());
        assert!(lower("math.floor(1.5) + math.ceil(1.5) + math.log(math.exp(1))").is_ok());
    }

    #[test]
    fn test_max_and_min_forms() {
        assert!(matches!(
            lower("max(path)").unwrap(),
            Node::Reduce {
                reducer: Reducer::Max,
                ..
            }
        ));
        assert!(matches!(
            lower("min(path[0], 3, 4)").unwrap(),
            Node::Apply { func: Func::Min, .. }
        ));
        assert!(compile_error("max(1)").contains("at least two scalars"));
        assert!(compile_error("max()").contains("at least two scalars"));
        assert!(compile_error("max(path, 1)").contains("series"));
    }

    #[test]
    fn test_series_misuse() {
        assert!(compile_error("path").contains("series"));
        assert!(compile_error("path + 1").contains("series"));
        assert!(compile_error("sum(path[0])").contains("expects the series"));
        assert!(compile_error("len(path, path)").contains("exactly one argument"));
        assert!(compile_error("abs(path)").contains("series"));
        assert!(compile_error("(1 + 2)[0]").contains("only `path`"));
    }

    #[test]
    fn test_unknown_names_and_functions() {
        assert!(compile_error("spot").contains("unknown name `spot`"));
        assert!(compile_error("os.system").contains("unknown name"));
        assert!(compile_error("open(1)").contains("function `open` is not allowed"));
        assert!(compile_error("math.sin(1)").contains("not allowed"));
        assert!(compile_error("__import__(1)").contains("not allowed"));
        assert!(compile_error("path(1)").contains("not allowed"));
    }

    #[test]
    fn test_arity() {
        assert!(compile_error("sqrt(1, 2)").contains("one argument"));
        assert!(compile_error("pow(2)").contains("two arguments"));
    }

    #[test]
    fn test_error_points_at_function_name() {
        let source = "1 + system(2)";
        match lower(source).unwrap_err() {
            ExpressionError::Compile { span, .. } => assert_eq!(span, Span::new(4, 10)),
            other => panic!("unexpected {:?}", other),
        }
    }
}
