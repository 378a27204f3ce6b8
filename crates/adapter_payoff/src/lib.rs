//! # Payoff Expression Adapter
//!
//! Turns user-supplied payoff text into a validated [`PathPayoff`] callable.
//! The pricing engines never see expression syntax; they only receive the
//! compiled result.
//!
//! # Architecture
//!
//! ```text
//! text ──→ Lexer ──→ Parser ──→ AST ──→ Compiler ──→ IR ──→ ExpressionPayoff
//!                                     (names, types)          (PathPayoff)
//! ```
//!
//! The language is arithmetic over the simulated path and nothing else:
//!
//! - `path`: the simulated prices, excluding the initial spot
//! - `path[i]`: one observation; negative indices count from the end
//! - constants `pi` and `e`
//! - operators `+ - * / % **` and unary minus
//! - functions `max`, `min`, `sum`, `len`, `abs`, `exp`, `log`, `sqrt`,
//!   `pow`, `floor`, `ceil`, also reachable as `math.<name>`
//!
//! There are no variables, no attribute access and no way to reach the host.
//!
//! # Quick Start
//!
//! ```rust
//! use adapter_payoff::compile;
//! use pricer_core::PathPayoff;
//!
//! let asian = compile("max(sum(path) / len(path) - 100, 0)").unwrap();
//! assert_eq!(asian.evaluate(&[90.0, 110.0, 130.0]).unwrap(), 10.0);
//!
//! assert!(compile("__import__('os')").is_err());
//! ```

#![deny(missing_docs)]

pub mod ast;
pub mod compiler;
pub mod error;
pub mod eval;
pub mod ir;
pub mod lexer;
pub mod parser;

use std::fmt;
use std::str::FromStr;

use pricer_core::traits::PathPayoff;
use pricer_core::types::PayoffFailure;
use tracing::debug;

pub use compiler::ALLOWED_FUNCTIONS;
pub use error::{annotate_source, ExpressionError, Span};

/// A compiled, type-checked payoff expression.
///
/// Cheap to share across threads: evaluation only reads the IR.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionPayoff {
    source: String,
    root: ir::Node,
    span: Span,
}

impl ExpressionPayoff {
    /// The source text the payoff was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns true if the expression never reads the path.
    pub fn is_constant(&self) -> bool {
        self.root.is_constant()
    }

    /// Evaluates the payoff on one path.
    ///
    /// # Errors
    ///
    /// `ExpressionError::Eval` on a bad index, division by zero, a domain
    /// error, or a non-finite result.
    pub fn eval(&self, path: &[f64]) -> Result<f64, ExpressionError> {
        let value = eval::evaluate(&self.root, path)?;
        if !value.is_finite() {
            return Err(ExpressionError::eval(
                format!("result is not finite ({})", value),
                self.span,
            ));
        }
        Ok(value)
    }
}

impl PathPayoff for ExpressionPayoff {
    fn evaluate(&self, path: &[f64]) -> Result<f64, PayoffFailure> {
        self.eval(path).map_err(Into::into)
    }
}

impl fmt::Display for ExpressionPayoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for ExpressionPayoff {
    type Err = ExpressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        compile(s)
    }
}

/// Lexes, parses and type-checks `source`.
///
/// # Errors
///
/// `Lex`, `Parse` or `Compile` variants of [`ExpressionError`], each with the
/// span of the offending text.
///
/// # Examples
///
/// ```rust
/// use adapter_payoff::{compile, ExpressionError};
///
/// let lookback = compile("max(path) - min(path)").unwrap();
/// assert_eq!(lookback.eval(&[100.0, 80.0, 120.0]).unwrap(), 40.0);
///
/// let err = compile("path + 1").unwrap_err();
/// assert!(matches!(err, ExpressionError::Compile { .. }));
/// ```
pub fn compile(source: &str) -> Result<ExpressionPayoff, ExpressionError> {
    let tokens = lexer::tokenize(source)?;
    let ast = parser::parse(tokens, source.len())?;
    let root = compiler::compile(&ast)?;

    debug!(expression = source, nodes = root.size(), "compiled payoff expression");

    Ok(ExpressionPayoff {
        source: source.to_string(),
        root,
        span: ast.span,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_terminal_call_and_put() {
        let call = compile("max(path[-1] - 100, 0)").unwrap();
        let put = compile("max(100 - path[-1], 0)").unwrap();
        let path = [95.0, 105.0, 112.5];

        assert_eq!(call.eval(&path).unwrap(), 12.5);
        assert_eq!(put.eval(&path).unwrap(), 0.0);
    }

    #[test]
    fn test_arithmetic_matches_host() {
        let expr = compile("-2 ** 2 + 7 % 3 * 2 - 1 / 4 + pi - math.e").unwrap();
        let expected = -(2.0_f64.powi(2)) + 1.0 * 2.0 - 0.25 + std::f64::consts::PI
            - std::f64::consts::E;
        assert_relative_eq!(expr.eval(&[]).unwrap(), expected, epsilon = 1e-12);
        assert!(expr.is_constant());
    }

    #[test]
    fn test_non_finite_result_is_an_error() {
        let expr = compile("exp(path[0])").unwrap();
        let err = expr.eval(&[1000.0]).unwrap_err();
        assert!(err.message().contains("not finite"));
        assert_eq!(err.span(), Span::new(0, 12));
    }

    #[test]
    fn test_payoff_failure_keeps_expression_error() {
        let expr = compile("path[5]").unwrap();
        let failure = PathPayoff::evaluate(&expr, &[1.0, 2.0]).unwrap_err();

        let inner = failure
            .downcast_ref::<ExpressionError>()
            .expect("expression error inside failure");
        assert!(inner.message().contains("out of range"));
    }

    #[test]
    fn test_from_str_and_display() {
        let expr: ExpressionPayoff = "sum(path)".parse().unwrap();
        assert_eq!(expr.to_string(), "sum(path)");
        assert_eq!(expr.source(), "sum(path)");
        assert!(!expr.is_constant());
    }
}
