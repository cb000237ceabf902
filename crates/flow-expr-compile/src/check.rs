//! Static checker.
//!
//! Validates that an expression is syntactically well-formed and that
//! every reference in it resolves against a component's context, without
//! producing any output artifact. Used for live validation feedback and
//! as a pre-build gate; the compiler assumes a successful check.

use crate::error::{ExpressionError, Result};
use crate::model::{ExprContext, ExpressionSource, Project};
use crate::ops;
use flow_expr_ast::{Expr, ExprKind, Span};
use flow_expr_parser::{parse_expression, ParseError};

/// Check an expression against a component's resolution context.
///
/// `Empty` and `Number` sources are trivially valid. Text is trimmed,
/// parsed and walked; the first unresolvable reference aborts the walk.
pub fn check_expression(ctx: &ExprContext, source: ExpressionSource) -> Result<()> {
    let text = match source {
        ExpressionSource::Empty | ExpressionSource::Number(_) => return Ok(()),
        ExpressionSource::Text(text) => text.trim(),
    };
    let expr = parse_expression(text)?;
    check_node(ctx, &expr)
}

/// Check an assignment target.
///
/// The root must be assignable: a bare identifier, or a conditional
/// whose branches are both assignable. The test sub-expression of such
/// a conditional is an ordinary value expression.
pub fn check_assignable_expression(ctx: &ExprContext, source: ExpressionSource) -> Result<()> {
    let text = match source {
        ExpressionSource::Empty => return Ok(()),
        ExpressionSource::Number(_) => return Err(ExpressionError::NotAssignable),
        ExpressionSource::Text(text) => text.trim(),
    };
    let expr = parse_expression(text)?;
    if !is_assignable(&expr) {
        return Err(ExpressionError::NotAssignable);
    }
    check_assignable_node(ctx, &expr)
}

/// Check a template literal with `{expression}` holes.
///
/// The literal is rewritten into a string-concatenation expression and
/// checked like any other expression.
pub fn check_template_literal(ctx: &ExprContext, source: &str) -> Result<()> {
    let rewritten = template_literal_to_expression(source)?;
    check_expression(ctx, ExpressionSource::Text(&rewritten))
}

/// Rewrite a template literal into expression source.
///
/// `"Hello {name}!"` becomes `"Hello " + (name) + "!"`. Literal `{`,
/// `}` and `\` are written with a backslash escape. An unterminated
/// hole is a syntax error.
pub fn template_literal_to_expression(source: &str) -> Result<String> {
    let mut parts: Vec<String> = Vec::new();
    let mut literal = String::new();
    let mut chars = source.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, escaped)) => literal.push(escaped),
                None => literal.push('\\'),
            },
            '{' => {
                if !literal.is_empty() {
                    parts.push(quote_literal(&literal));
                    literal.clear();
                }

                let mut hole = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    hole.push(c);
                }
                if !closed {
                    let span = Span::new(pos as u32, source.len() as u32);
                    return Err(ParseError::invalid_syntax(
                        "unterminated '{' in template literal",
                        span,
                    )
                    .into());
                }
                parts.push(format!("({})", hole));
            }
            _ => literal.push(c),
        }
    }

    if !literal.is_empty() || parts.is_empty() {
        parts.push(quote_literal(&literal));
    }
    Ok(parts.join(" + "))
}

fn quote_literal(text: &str) -> String {
    let escaped = text.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

/// True iff the expression can be an assignment target.
pub(crate) fn is_assignable(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Identifier(_) => true,
        ExprKind::Conditional {
            consequent,
            alternate,
            ..
        } => is_assignable(consequent) && is_assignable(alternate),
        _ => false,
    }
}

pub(crate) fn check_node(ctx: &ExprContext, expr: &Expr) -> Result<()> {
    match &expr.kind {
        ExprKind::Literal(_) => Ok(()),
        ExprKind::Identifier(name) => check_identifier(ctx, name),
        ExprKind::Binary { op, left, right } => {
            ops::find_binary_operator(op).ok_or_else(|| ExpressionError::UnknownOperator {
                symbol: op.clone(),
                kind: "binary",
            })?;
            check_node(ctx, left)?;
            check_node(ctx, right)
        }
        ExprKind::Logical { op, left, right } => {
            ops::find_logical_operator(op).ok_or_else(|| ExpressionError::UnknownOperator {
                symbol: op.clone(),
                kind: "logical",
            })?;
            check_node(ctx, left)?;
            check_node(ctx, right)
        }
        ExprKind::Unary { op, operand } => {
            ops::find_unary_operator(op).ok_or_else(|| ExpressionError::UnknownOperator {
                symbol: op.clone(),
                kind: "unary",
            })?;
            check_node(ctx, operand)
        }
        ExprKind::Conditional {
            test,
            consequent,
            alternate,
        } => {
            // No type compatibility between branches: the runtime is
            // dynamically typed.
            check_node(ctx, test)?;
            check_node(ctx, consequent)?;
            check_node(ctx, alternate)
        }
        ExprKind::Call { callee, arguments } => {
            let function = resolve_function(callee, arguments.len())?;
            debug_assert!(ops::operation_index(function.name).is_some());
            for argument in arguments {
                check_node(ctx, argument)?;
            }
            Ok(())
        }
        ExprKind::Member { .. } => resolve_member(ctx.project, expr).map(|_| ()),
        ExprKind::Array(_) | ExprKind::Object(_) => Err(ExpressionError::UnsupportedNode {
            kind: expr.describe(),
        }),
    }
}

fn check_assignable_node(ctx: &ExprContext, expr: &Expr) -> Result<()> {
    match &expr.kind {
        ExprKind::Identifier(name) => check_identifier(ctx, name),
        ExprKind::Conditional {
            test,
            consequent,
            alternate,
        } => {
            check_node(ctx, test)?;
            check_assignable_node(ctx, consequent)?;
            check_assignable_node(ctx, alternate)
        }
        _ => Err(ExpressionError::NotAssignable),
    }
}

/// Resolve an identifier name: input, then flow local, then project
/// global. First match wins; no shadowing warnings.
fn check_identifier(ctx: &ExprContext, name: &str) -> Result<()> {
    let found = ctx.component.inputs.iter().any(|input| input == name)
        || ctx.flow.local_variables.iter().any(|var| var == name)
        || ctx.project.global_variables.iter().any(|var| var == name);
    if found {
        Ok(())
    } else {
        Err(ExpressionError::UnknownIdentifier {
            name: name.to_string(),
        })
    }
}

/// Resolve a call target to a registered function with matching arity.
pub(crate) fn resolve_function(
    callee: &Expr,
    actual_arity: usize,
) -> Result<&'static ops::BuiltInFunction> {
    let (namespace, function) = callee
        .as_dotted_names()
        .ok_or(ExpressionError::InvalidCallShape)?;
    let name = format!("{}.{}", namespace, function);
    let descriptor = ops::find_function(&name).ok_or(ExpressionError::UnknownFunction {
        name: name.clone(),
    })?;
    if actual_arity != descriptor.arity {
        return Err(ExpressionError::ArityMismatch {
            name,
            expected: descriptor.arity,
            actual: actual_arity,
        });
    }
    Ok(descriptor)
}

/// Resolve a member expression to its numeric value: enum member first,
/// then built-in constant.
pub(crate) fn resolve_member(project: &Project, expr: &Expr) -> Result<f64> {
    let (object, property) = expr
        .as_dotted_names()
        .ok_or(ExpressionError::UnsupportedMemberExpression)?;

    if let Some(enum_def) = project.enums.get(object) {
        return enum_def.members.get(property).copied().ok_or_else(|| {
            ExpressionError::UnknownEnumMember {
                enum_name: object.to_string(),
                member: property.to_string(),
            }
        });
    }

    let name = format!("{}.{}", object, property);
    ops::find_constant(&name)
        .map(|constant| constant.value)
        .ok_or(ExpressionError::UnknownConstant { name })
}
