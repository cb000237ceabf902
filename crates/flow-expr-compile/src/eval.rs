//! Design-time constant evaluator.
//!
//! A tree-walking interpreter for expressions that must be known before
//! any flow runs: default property values, previews. There is no
//! runtime binding at that point, so identifiers are never evaluable.
//!
//! Two surfaces: [`try_eval_constant_expression`] propagates errors,
//! [`eval_constant_expression`] is the best-effort form that logs and
//! degrades to `None`.

use crate::check;
use crate::error::{ExpressionError, Result};
use crate::model::{ExpressionSource, Project};
use crate::ops;
use flow_expr_ast::{Expr, ExprKind, Value};
use flow_expr_parser::parse_expression;

/// Evaluate a constant expression, propagating the first error.
pub fn try_eval_constant_expression(project: &Project, source: ExpressionSource) -> Result<Value> {
    let text = match source {
        ExpressionSource::Empty => return Ok(Value::Undefined),
        ExpressionSource::Number(n) => return Ok(Value::Number(n)),
        ExpressionSource::Text(text) => text.trim(),
    };
    let expr = parse_expression(text)?;
    eval_node(project, &expr)
}

/// Best-effort evaluation: any failure is logged and becomes `None`.
///
/// Used in preview contexts where a missing value is preferable to a
/// blocked interaction.
pub fn eval_constant_expression(project: &Project, source: ExpressionSource) -> Option<Value> {
    match try_eval_constant_expression(project, source) {
        Ok(value) => Some(value),
        Err(error) => {
            tracing::debug!(%error, "constant evaluation failed");
            None
        }
    }
}

fn eval_node(project: &Project, expr: &Expr) -> Result<Value> {
    match &expr.kind {
        ExprKind::Literal(value) => Ok(value.clone()),
        ExprKind::Identifier(name) => Err(ExpressionError::CannotEvaluateIdentifier {
            name: name.clone(),
        }),
        ExprKind::Binary { op, left, right } => {
            let descriptor =
                ops::find_binary_operator(op).ok_or_else(|| ExpressionError::UnknownOperator {
                    symbol: op.clone(),
                    kind: "binary",
                })?;
            let left = eval_node(project, left)?;
            let right = eval_node(project, right)?;
            (descriptor.eval)(&left, &right)
        }
        ExprKind::Logical { op, left, right } => {
            let descriptor =
                ops::find_logical_operator(op).ok_or_else(|| ExpressionError::UnknownOperator {
                    symbol: op.clone(),
                    kind: "logical",
                })?;
            let left = eval_node(project, left)?;
            let right = eval_node(project, right)?;
            (descriptor.eval)(&left, &right)
        }
        ExprKind::Unary { op, operand } => {
            let descriptor =
                ops::find_unary_operator(op).ok_or_else(|| ExpressionError::UnknownOperator {
                    symbol: op.clone(),
                    kind: "unary",
                })?;
            let operand = eval_node(project, operand)?;
            (descriptor.eval)(&operand)
        }
        ExprKind::Conditional {
            test,
            consequent,
            alternate,
        } => {
            // Only the taken branch is evaluated, unlike the compiler
            // which emits both.
            if eval_node(project, test)?.is_truthy() {
                eval_node(project, consequent)
            } else {
                eval_node(project, alternate)
            }
        }
        ExprKind::Call { callee, arguments } => {
            let function = check::resolve_function(callee, arguments.len())?;
            let arguments = arguments
                .iter()
                .map(|argument| eval_node(project, argument))
                .collect::<Result<Vec<_>>>()?;
            (function.eval)(&arguments)
        }
        ExprKind::Member { .. } => check::resolve_member(project, expr).map(Value::Number),
        ExprKind::Array(_) | ExprKind::Object(_) => Err(ExpressionError::UnsupportedNode {
            kind: expr.describe(),
        }),
    }
}
