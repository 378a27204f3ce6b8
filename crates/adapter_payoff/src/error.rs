//! Expression error types with span-based diagnostics.

use thiserror::Error;

/// Byte range in the expression source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Offset of the first byte.
    pub start: usize,
    /// Offset one past the last byte.
    pub end: usize,
}

impl Span {
    /// Creates a span covering `start..end`.
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both `self` and `other`.
    #[inline]
    pub fn to(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// Errors produced by the expression pipeline (lex, parse, compile, evaluate).
///
/// # Examples
///
/// ```rust
/// use adapter_payoff::{compile, ExpressionError};
///
/// let err = compile("open('x')").unwrap_err();
/// assert!(matches!(err, ExpressionError::Compile { .. }));
/// assert_eq!(err.span().start, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionError {
    /// Unexpected character or malformed literal.
    #[error("lex error at {}-{}: {message}", span.start, span.end)]
    Lex {
        /// What went wrong.
        message: String,
        /// Where.
        span: Span,
    },

    /// Unexpected token or missing construct.
    #[error("parse error at {}-{}: {message}", span.start, span.end)]
    Parse {
        /// What went wrong.
        message: String,
        /// Where.
        span: Span,
    },

    /// Unknown name, disallowed function, arity or type mismatch.
    #[error("compile error at {}-{}: {message}", span.start, span.end)]
    Compile {
        /// What went wrong.
        message: String,
        /// Where.
        span: Span,
    },

    /// Failure while evaluating a compiled expression on a path.
    #[error("eval error at {}-{}: {message}", span.start, span.end)]
    Eval {
        /// What went wrong.
        message: String,
        /// Sub-expression that failed.
        span: Span,
    },
}

impl ExpressionError {
    /// Source span the error points at.
    pub fn span(&self) -> Span {
        match self {
            Self::Lex { span, .. }
            | Self::Parse { span, .. }
            | Self::Compile { span, .. }
            | Self::Eval { span, .. } => *span,
        }
    }

    /// Error message without the position prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Lex { message, .. }
            | Self::Parse { message, .. }
            | Self::Compile { message, .. }
            | Self::Eval { message, .. } => message,
        }
    }

    pub(crate) fn lex(message: impl Into<String>, span: Span) -> Self {
        Self::Lex {
            message: message.into(),
            span,
        }
    }

    pub(crate) fn parse(message: impl Into<String>, span: Span) -> Self {
        Self::Parse {
            message: message.into(),
            span,
        }
    }

    pub(crate) fn compile(message: impl Into<String>, span: Span) -> Self {
        Self::Compile {
            message: message.into(),
            span,
        }
    }

    pub(crate) fn eval(message: impl Into<String>, span: Span) -> Self {
        Self::Eval {
            message: message.into(),
            span,
        }
    }
}

/// Renders `source` with a caret line under `span`.
///
/// ```rust
/// use adapter_payoff::{annotate_source, Span};
///
/// let rendered = annotate_source("max(path) + foo", Span::new(12, 15));
/// assert_eq!(rendered, "max(path) + foo\n            ^^^");
/// ```
pub fn annotate_source(source: &str, span: Span) -> String {
    let start = source
        .char_indices()
        .take_while(|(i, _)| *i < span.start)
        .count();
    let width = source
        .char_indices()
        .filter(|(i, _)| *i >= span.start && *i < span.end)
        .count()
        .max(1);
    format!("{}\n{}{}", source, " ".repeat(start), "^".repeat(width))
}
