//! Bytecode compiler.
//!
//! Lowers a checked expression into the 16-bit instruction encoding and
//! appends it to a caller-owned buffer. Emission is postfix: children
//! first, then the operation that consumes them, always terminated by
//! exactly one `END` word.
//!
//! Words are collected before any of them reach the buffer, so a failed
//! compile leaves the buffer exactly as it was.

use crate::check::{self, is_assignable};
use crate::error::{ExpressionError, Result};
use crate::instr;
use crate::model::{Assets, DataBuffer, ExprContext, ExpressionSource};
use crate::ops;
use flow_expr_ast::{Expr, ExprKind, Value};
use flow_expr_parser::parse_expression;

/// Compile an expression and append its instruction stream to `buffer`.
///
/// `Empty` (and blank text) compiles to a single push of `undefined`; a
/// `Number` source bypasses the parser and pushes itself.
pub fn build_expression(
    assets: &mut Assets,
    buffer: &mut DataBuffer,
    ctx: &ExprContext,
    source: ExpressionSource,
) -> Result<()> {
    let words = compile(assets, ctx, source, false)?;
    for word in words {
        buffer.write_uint16_non_aligned(word);
    }
    Ok(())
}

/// Compile an assignment target.
///
/// Identical lowering, but the root must be assignable (a bare
/// identifier or a conditional over assignable branches); fails with
/// [`NotAssignable`] before anything is emitted otherwise.
///
/// [`NotAssignable`]: ExpressionError::NotAssignable
pub fn build_assignable_expression(
    assets: &mut Assets,
    buffer: &mut DataBuffer,
    ctx: &ExprContext,
    source: ExpressionSource,
) -> Result<()> {
    let words = compile(assets, ctx, source, true)?;
    for word in words {
        buffer.write_uint16_non_aligned(word);
    }
    Ok(())
}

fn compile(
    assets: &mut Assets,
    ctx: &ExprContext,
    source: ExpressionSource,
    assignable: bool,
) -> Result<Vec<u16>> {
    let mut words = Vec::new();

    match source {
        ExpressionSource::Empty => {
            let index = assets.get_constant_index(&Value::Undefined);
            words.push(instr::push_constant(index)?);
        }
        ExpressionSource::Number(n) => {
            if assignable {
                return Err(ExpressionError::NotAssignable);
            }
            let index = assets.get_constant_index(&Value::Number(n));
            words.push(instr::push_constant(index)?);
        }
        ExpressionSource::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                let index = assets.get_constant_index(&Value::Undefined);
                words.push(instr::push_constant(index)?);
            } else {
                let expr = parse_expression(text)?;
                if assignable && !is_assignable(&expr) {
                    return Err(ExpressionError::NotAssignable);
                }
                emit_node(assets, ctx, &expr, &mut words)?;
            }
        }
    }

    words.push(instr::end());
    Ok(words)
}

fn emit_node(
    assets: &mut Assets,
    ctx: &ExprContext,
    expr: &Expr,
    words: &mut Vec<u16>,
) -> Result<()> {
    match &expr.kind {
        ExprKind::Literal(value) => {
            let index = assets.get_constant_index(value);
            words.push(instr::push_constant(index)?);
        }
        ExprKind::Identifier(name) => {
            words.push(emit_identifier(assets, ctx, name)?);
        }
        ExprKind::Binary { op, left, right } => {
            let descriptor =
                ops::find_binary_operator(op).ok_or_else(|| ExpressionError::UnknownOperator {
                    symbol: op.clone(),
                    kind: "binary",
                })?;
            emit_node(assets, ctx, left, words)?;
            emit_node(assets, ctx, right, words)?;
            words.push(emit_operation(descriptor.name)?);
        }
        ExprKind::Logical { op, left, right } => {
            let descriptor =
                ops::find_logical_operator(op).ok_or_else(|| ExpressionError::UnknownOperator {
                    symbol: op.clone(),
                    kind: "logical",
                })?;
            emit_node(assets, ctx, left, words)?;
            emit_node(assets, ctx, right, words)?;
            words.push(emit_operation(descriptor.name)?);
        }
        ExprKind::Unary { op, operand } => {
            let descriptor =
                ops::find_unary_operator(op).ok_or_else(|| ExpressionError::UnknownOperator {
                    symbol: op.clone(),
                    kind: "unary",
                })?;
            emit_node(assets, ctx, operand, words)?;
            words.push(emit_operation(descriptor.name)?);
        }
        ExprKind::Conditional {
            test,
            consequent,
            alternate,
        } => {
            // Flat emission: all three branches are present in the
            // stream; the VM's conditional op selects at runtime.
            emit_node(assets, ctx, test, words)?;
            emit_node(assets, ctx, consequent, words)?;
            emit_node(assets, ctx, alternate, words)?;
            words.push(emit_operation(ops::CONDITIONAL_OPERATOR)?);
        }
        ExprKind::Call { callee, arguments } => {
            let function = check::resolve_function(callee, arguments.len())?;
            for argument in arguments {
                emit_node(assets, ctx, argument, words)?;
            }
            // Format quirk: the function index is a raw word, not an
            // OPERATION-tagged one. The VM relies on it.
            let index =
                ops::operation_index(function.name).ok_or(ExpressionError::UnknownFunction {
                    name: function.name.to_string(),
                })?;
            words.push(index);
        }
        ExprKind::Member { .. } => {
            // Build-time member lookups go through the allocator's root
            // project, which may be a richer view than the check context.
            let value = check::resolve_member(assets.root_project, expr)?;
            let index = assets.get_constant_index(&Value::Number(value));
            words.push(instr::push_constant(index)?);
        }
        ExprKind::Array(_) | ExprKind::Object(_) => {
            return Err(ExpressionError::UnsupportedNode {
                kind: expr.describe(),
            });
        }
    }
    Ok(())
}

/// Resolve an identifier to its push instruction: input, then flow
/// local, then global. Same precedence as the checker.
fn emit_identifier(assets: &Assets, ctx: &ExprContext, name: &str) -> Result<u16> {
    if let Some(index) = assets.find_component_input_index(ctx.component, name) {
        return instr::push_input(index);
    }
    if let Some(index) = ctx
        .flow
        .local_variables
        .iter()
        .position(|var| var == name)
    {
        return instr::push_local_var(index);
    }
    if let Some(index) = assets.find_global_variable_index(name) {
        return instr::push_global_var(index);
    }
    // The checker runs first; reaching this means the expression or the
    // context changed since it passed.
    Err(ExpressionError::UnresolvedIdentifier {
        name: name.to_string(),
    })
}

fn emit_operation(name: &str) -> Result<u16> {
    let index = ops::operation_index(name).ok_or_else(|| ExpressionError::UnknownOperator {
        symbol: name.to_string(),
        kind: "operation",
    })?;
    instr::operation(index as usize)
}
