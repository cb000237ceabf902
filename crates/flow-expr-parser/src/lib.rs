// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Parser for flow expressions.
//!
//! Hand-written recursive descent with precedence climbing for binary
//! operators. Input is a single expression string; output is one
//! [`Expr`] tree covering the whole input. Trailing tokens after a
//! complete expression are a parse error.
//!
//! ```
//! # use flow_expr_parser::parse_expression;
//! let expr = parse_expression("input1 + value * 2").unwrap();
//! ```

mod error;
mod expr;
mod stream;

pub use error::{ParseError, ParseErrorKind};
pub use stream::TokenStream;

use flow_expr_ast::{Expr, Span};
use flow_expr_lexer::Token;
use logos::Logos;
use std::ops::Range;

/// Tokenize an expression source string.
///
/// Returns tokens paired with their byte spans, or the first lexer
/// failure as a parse error.
fn tokenize(source: &str) -> Result<Vec<(Token, Range<usize>)>, ParseError> {
    let mut tokens = Vec::new();
    for (result, range) in Token::lexer(source).spanned() {
        match result {
            Ok(token) => tokens.push((token, range)),
            Err(()) => {
                let span = Span::new(range.start as u32, range.end as u32);
                return Err(ParseError::invalid_token(&source[range], span));
            }
        }
    }
    Ok(tokens)
}

/// Parse an expression source string into an AST.
///
/// The whole input must form exactly one expression. An empty or
/// blank-only string is an error.
pub fn parse_expression(source: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
        return Err(ParseError::unexpected_token(
            None,
            "in expression",
            Span::zero(),
        ));
    }

    let mut stream = TokenStream::new(&tokens);
    let expr = expr::parse_expr(&mut stream, 0)?;

    if !stream.at_end() {
        return Err(ParseError::unexpected_token(
            stream.peek(),
            "after expression",
            stream.current_span(),
        ));
    }

    Ok(expr)
}

/// Check whether `source` is a single plain identifier.
///
/// Used by editors to decide if a variable name is valid without going
/// through full expression parsing. Keywords (`true`, `false`, `null`)
/// are not identifiers.
pub fn parse_identifier(source: &str) -> bool {
    match tokenize(source) {
        Ok(tokens) => matches!(tokens.as_slice(), [(Token::Ident(_), _)]),
        Err(_) => false,
    }
}
