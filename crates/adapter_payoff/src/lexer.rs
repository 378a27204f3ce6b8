//! Lexer for payoff expressions.
//!
//! Expressions are a single line of arithmetic; whitespace (including
//! newlines) only separates tokens.

use crate::error::{ExpressionError, Span};

/// Token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Token type and payload.
    pub kind: TokenKind,
    /// Location in the source.
    pub span: Span,
}

/// Token types.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Numeric literal.
    Number(f64),
    /// Identifier, possibly dotted (`math.sqrt`).
    Ident(String),

    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `,`
    Comma,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `**`
    StarStar,
    /// `/`
    Slash,
    /// `%`
    Percent,
}

impl TokenKind {
    /// Human readable form used in parse errors.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Number(n) => format!("number {}", n),
            TokenKind::Ident(name) => format!("identifier `{}`", name),
            TokenKind::LParen => "`(`".to_string(),
            TokenKind::RParen => "`)`".to_string(),
            TokenKind::LBracket => "`[`".to_string(),
            TokenKind::RBracket => "`]`".to_string(),
            TokenKind::Comma => "`,`".to_string(),
            TokenKind::Plus => "`+`".to_string(),
            TokenKind::Minus => "`-`".to_string(),
            TokenKind::Star => "`*`".to_string(),
            TokenKind::StarStar => "`**`".to_string(),
            TokenKind::Slash => "`/`".to_string(),
            TokenKind::Percent => "`%`".to_string(),
        }
    }
}

/// Tokenizes expression source text.
///
/// # Errors
///
/// `ExpressionError::Lex` on an unexpected character or a malformed number.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ExpressionError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let ch = bytes[pos];

        if ch.is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        let start = pos;

        // Number literal.
        if ch.is_ascii_digit() || (ch == b'.' && bytes.get(pos + 1).is_some_and(u8::is_ascii_digit)) {
            let (value, end) = lex_number(source, pos)?;
            tokens.push(Token {
                kind: TokenKind::Number(value),
                span: Span::new(start, end),
            });
            pos = end;
            continue;
        }

        // Identifier, with dotted segments.
        if is_ident_start(ch) {
            let end = lex_ident_end(source, pos)?;
            tokens.push(Token {
                kind: TokenKind::Ident(source[start..end].to_string()),
                span: Span::new(start, end),
            });
            pos = end;
            continue;
        }

        if ch == b'*' && bytes.get(pos + 1) == Some(&b'*') {
            tokens.push(Token {
                kind: TokenKind::StarStar,
                span: Span::new(start, start + 2),
            });
            pos += 2;
            continue;
        }

        let kind = match ch {
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b',' => TokenKind::Comma,
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Star,
            b'/' => TokenKind::Slash,
            b'%' => TokenKind::Percent,
            _ => {
                let unexpected = source[pos..].chars().next().unwrap_or('?');
                return Err(ExpressionError::lex(
                    format!("unexpected character '{}'", unexpected),
                    Span::new(start, start + unexpected.len_utf8()),
                ));
            }
        };
        tokens.push(Token {
            kind,
            span: Span::new(start, start + 1),
        });
        pos += 1;
    }

    Ok(tokens)
}

#[inline]
fn is_ident_start(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_'
}

#[inline]
fn is_ident_continue(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || ch == b'_'
}

fn lex_ident_end(source: &str, start: usize) -> Result<usize, ExpressionError> {
    let bytes = source.as_bytes();
    let mut pos = start;
    loop {
        while pos < bytes.len() && is_ident_continue(bytes[pos]) {
            pos += 1;
        }
        if pos < bytes.len() && bytes[pos] == b'.' {
            if bytes.get(pos + 1).is_some_and(|&b| is_ident_start(b)) {
                pos += 1;
                continue;
            }
            return Err(ExpressionError::lex(
                "expected a name after '.'",
                Span::new(pos, pos + 1),
            ));
        }
        return Ok(pos);
    }
}

/// Lexes `digits [. digits] [(e|E) [+|-] digits]`, or `. digits ...`.
fn lex_number(source: &str, start: usize) -> Result<(f64, usize), ExpressionError> {
    let bytes = source.as_bytes();
    let mut pos = start;

    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    if pos < bytes.len() && bytes[pos] == b'.' {
        pos += 1;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
    }
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let mut exp = pos + 1;
        if exp < bytes.len() && (bytes[exp] == b'+' || bytes[exp] == b'-') {
            exp += 1;
        }
        if exp < bytes.len() && bytes[exp].is_ascii_digit() {
            while exp < bytes.len() && bytes[exp].is_ascii_digit() {
                exp += 1;
            }
            pos = exp;
        } else {
            return Err(ExpressionError::lex(
                "malformed exponent",
                Span::new(start, exp),
            ));
        }
    }
    if pos < bytes.len() && is_ident_start(bytes[pos]) {
        return Err(ExpressionError::lex(
            format!("invalid number literal '{}'", &source[start..=pos]),
            Span::new(start, pos + 1),
        ));
    }

    let text = &source[start..pos];
    text.parse::<f64>()
        .map(|value| (value, pos))
        .map_err(|_| ExpressionError::lex(format!("invalid number literal '{}'", text), Span::new(start, pos)))
}
