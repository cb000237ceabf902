//! Expression grammar - precedence climbing for binary operators, plus
//! conditional, unary, postfix and atomic forms.
//!
//! ## Precedence levels (lowest to highest)
//!
//! 1. `?:` (conditional) - right associative
//! 2. `||` - left associative
//! 3. `&&` - left associative
//! 4. `|` - left associative
//! 5. `^` - left associative
//! 6. `&` - left associative
//! 7. `==`, `!=` - left associative
//! 8. `<`, `<=`, `>`, `>=` - left associative
//! 9. `<<`, `>>` - left associative
//! 10. `+`, `-` - left associative
//! 11. `*`, `/`, `%` - left associative
//! 12. Unary `+`, `-`, `!`, `~` - prefix
//! 13. Postfix: `.member`, `[index]`, `(args)` - left associative

use crate::{ParseError, TokenStream};
use flow_expr_ast::{Expr, ExprKind, Value};
use flow_expr_lexer::Token;

/// Nesting limit for recursive productions.
///
/// Parsing is recursive, so a pathological input like `((((...1...))))`
/// would otherwise overflow the stack. Expressions written in the editor
/// are a few dozen nodes deep at most.
const MAX_DEPTH: usize = 200;

/// Get binary operator metadata (precedence and symbol).
///
/// Returns `(precedence, symbol, is_logical)` where higher precedence
/// means tighter binding. This is the single source of truth for binary
/// operator parsing. All binary operators are left associative.
fn binary_op_info(token: &Token) -> Option<(u8, &'static str, bool)> {
    match token {
        Token::PipePipe => Some((10, "||", true)),
        Token::AmpAmp => Some((20, "&&", true)),
        Token::Pipe => Some((30, "|", false)),
        Token::Caret => Some((40, "^", false)),
        Token::Amp => Some((50, "&", false)),
        Token::EqEq => Some((60, "==", false)),
        Token::BangEq => Some((60, "!=", false)),
        Token::Lt => Some((70, "<", false)),
        Token::LtEq => Some((70, "<=", false)),
        Token::Gt => Some((70, ">", false)),
        Token::GtEq => Some((70, ">=", false)),
        Token::Shl => Some((80, "<<", false)),
        Token::Shr => Some((80, ">>", false)),
        Token::Plus => Some((90, "+", false)),
        Token::Minus => Some((90, "-", false)),
        Token::Star => Some((100, "*", false)),
        Token::Slash => Some((100, "/", false)),
        Token::Percent => Some((100, "%", false)),
        _ => None,
    }
}

/// Parse a full expression, conditional operator included.
pub(crate) fn parse_expr(stream: &mut TokenStream, depth: usize) -> Result<Expr, ParseError> {
    if depth > MAX_DEPTH {
        return Err(ParseError::invalid_syntax(
            "expression is nested too deeply",
            stream.current_span(),
        ));
    }

    let test = parse_binary(stream, 0, depth + 1)?;

    if !matches!(stream.peek(), Some(Token::Question)) {
        return Ok(test);
    }
    stream.advance();

    let consequent = parse_expr(stream, depth + 1)?;
    stream.expect(Token::Colon)?;
    // Right associative: `a ? b : c ? d : e` nests into the alternate
    let alternate = parse_expr(stream, depth + 1)?;

    let span = test.span.merge(alternate.span);
    Ok(Expr::new(
        ExprKind::Conditional {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        },
        span,
    ))
}

/// Precedence climbing for binary and logical operators.
fn parse_binary(stream: &mut TokenStream, min_prec: u8, depth: usize) -> Result<Expr, ParseError> {
    if depth > MAX_DEPTH {
        return Err(ParseError::invalid_syntax(
            "expression is nested too deeply",
            stream.current_span(),
        ));
    }

    let mut left = parse_unary(stream, depth + 1)?;

    while let Some(token) = stream.peek() {
        if let Some((prec, symbol, is_logical)) = binary_op_info(token) {
            if prec < min_prec {
                break;
            }

            stream.advance();
            let right = parse_binary(stream, prec + 1, depth + 1)?;

            let span = left.span.merge(right.span);
            let kind = if is_logical {
                ExprKind::Logical {
                    op: symbol.to_string(),
                    left: Box::new(left),
                    right: Box::new(right),
                }
            } else {
                ExprKind::Binary {
                    op: symbol.to_string(),
                    left: Box::new(left),
                    right: Box::new(right),
                }
            };
            left = Expr::new(kind, span);
        } else {
            break;
        }
    }

    Ok(left)
}

/// Parse prefix unary operators.
fn parse_unary(stream: &mut TokenStream, depth: usize) -> Result<Expr, ParseError> {
    if depth > MAX_DEPTH {
        return Err(ParseError::invalid_syntax(
            "expression is nested too deeply",
            stream.current_span(),
        ));
    }

    let symbol = match stream.peek() {
        Some(Token::Plus) => "+",
        Some(Token::Minus) => "-",
        Some(Token::Bang) => "!",
        Some(Token::Tilde) => "~",
        _ => return parse_postfix(stream, depth + 1),
    };

    let start = stream.current_pos();
    stream.advance();
    let operand = parse_unary(stream, depth + 1)?;
    let span = stream.span_from(start);

    Ok(Expr::new(
        ExprKind::Unary {
            op: symbol.to_string(),
            operand: Box::new(operand),
        },
        span,
    ))
}

/// Parse postfix expressions (member access, indexing, calls).
fn parse_postfix(stream: &mut TokenStream, depth: usize) -> Result<Expr, ParseError> {
    let mut expr = parse_atom(stream, depth + 1)?;

    loop {
        match stream.peek() {
            Some(Token::Dot) => {
                stream.advance();
                let span = stream.current_span();
                let name = match stream.advance() {
                    Some(Token::Ident(s)) => s.clone(),
                    other => {
                        let other = other.cloned();
                        return Err(ParseError::unexpected_token(
                            other.as_ref(),
                            "after '.'",
                            span,
                        ));
                    }
                };

                let property = Expr::new(ExprKind::Identifier(name), span);
                let span = expr.span.merge(span);
                expr = Expr::new(
                    ExprKind::Member {
                        object: Box::new(expr),
                        property: Box::new(property),
                        computed: false,
                    },
                    span,
                );
            }
            Some(Token::LBracket) => {
                stream.advance();
                let index = parse_expr(stream, depth + 1)?;
                let end = stream.expect(Token::RBracket)?;

                let span = expr.span.merge(end);
                expr = Expr::new(
                    ExprKind::Member {
                        object: Box::new(expr),
                        property: Box::new(index),
                        computed: true,
                    },
                    span,
                );
            }
            Some(Token::LParen) => {
                let call_start = stream.current_pos();
                let arguments = parse_call_args(stream, depth + 1)?;
                let span = expr.span.merge(stream.span_from(call_start));
                expr = Expr::new(
                    ExprKind::Call {
                        callee: Box::new(expr),
                        arguments,
                    },
                    span,
                );
            }
            _ => break,
        }
    }

    Ok(expr)
}

/// Parse function call arguments.
fn parse_call_args(stream: &mut TokenStream, depth: usize) -> Result<Vec<Expr>, ParseError> {
    stream.expect(Token::LParen)?;

    let mut args = Vec::new();
    while !matches!(stream.peek(), Some(Token::RParen)) {
        args.push(parse_expr(stream, depth + 1)?);

        if !matches!(stream.peek(), Some(Token::RParen)) {
            stream.expect(Token::Comma)?;
        }
    }

    stream.expect(Token::RParen)?;
    Ok(args)
}

/// Parse an atomic expression (literal, identifier, parenthesized,
/// array or object literal).
fn parse_atom(stream: &mut TokenStream, depth: usize) -> Result<Expr, ParseError> {
    if depth > MAX_DEPTH {
        return Err(ParseError::invalid_syntax(
            "expression is nested too deeply",
            stream.current_span(),
        ));
    }

    let span = stream.current_span();
    match stream.peek() {
        Some(Token::Number(n)) => {
            let value = Value::Number(*n);
            stream.advance();
            Ok(Expr::new(ExprKind::Literal(value), span))
        }
        Some(Token::String(s)) => {
            let value = Value::String(s.clone());
            stream.advance();
            Ok(Expr::new(ExprKind::Literal(value), span))
        }
        Some(Token::True) => {
            stream.advance();
            Ok(Expr::new(ExprKind::Literal(Value::Bool(true)), span))
        }
        Some(Token::False) => {
            stream.advance();
            Ok(Expr::new(ExprKind::Literal(Value::Bool(false)), span))
        }
        Some(Token::Null) => {
            stream.advance();
            Ok(Expr::new(ExprKind::Literal(Value::Null), span))
        }
        Some(Token::Ident(name)) => {
            let name = name.clone();
            stream.advance();
            Ok(Expr::new(ExprKind::Identifier(name), span))
        }
        Some(Token::LParen) => {
            stream.advance();
            let inner = parse_expr(stream, depth + 1)?;
            stream.expect(Token::RParen)?;
            Ok(inner)
        }
        Some(Token::LBracket) => parse_array(stream, depth + 1),
        Some(Token::LBrace) => parse_object(stream, depth + 1),
        other => {
            let other = other.cloned();
            Err(ParseError::unexpected_token(
                other.as_ref(),
                "in expression",
                span,
            ))
        }
    }
}

/// Parse an array literal: `[a, b, c]`.
fn parse_array(stream: &mut TokenStream, depth: usize) -> Result<Expr, ParseError> {
    let start = stream.current_pos();
    stream.expect(Token::LBracket)?;

    let mut elements = Vec::new();
    while !matches!(stream.peek(), Some(Token::RBracket)) {
        elements.push(parse_expr(stream, depth + 1)?);

        if !matches!(stream.peek(), Some(Token::RBracket)) {
            stream.expect(Token::Comma)?;
        }
    }

    stream.expect(Token::RBracket)?;
    Ok(Expr::new(ExprKind::Array(elements), stream.span_from(start)))
}

/// Parse an object literal: `{ key: value, "other": value }`.
fn parse_object(stream: &mut TokenStream, depth: usize) -> Result<Expr, ParseError> {
    let start = stream.current_pos();
    stream.expect(Token::LBrace)?;

    let mut properties = Vec::new();
    while !matches!(stream.peek(), Some(Token::RBrace)) {
        let span = stream.current_span();
        let key = match stream.advance() {
            Some(Token::Ident(s)) => s.clone(),
            Some(Token::String(s)) => s.clone(),
            other => {
                let other = other.cloned();
                return Err(ParseError::unexpected_token(
                    other.as_ref(),
                    "as object key",
                    span,
                ));
            }
        };

        stream.expect(Token::Colon)?;
        let value = parse_expr(stream, depth + 1)?;
        properties.push((key, value));

        if !matches!(stream.peek(), Some(Token::RBrace)) {
            stream.expect(Token::Comma)?;
        }
    }

    stream.expect(Token::RBrace)?;
    Ok(Expr::new(
        ExprKind::Object(properties),
        stream.span_from(start),
    ))
}
