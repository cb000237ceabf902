// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Semantic passes over flow expressions: static checking, bytecode
//! compilation and design-time constant evaluation.
//!
//! # Design
//!
//! - `ops` — operator/function/constant registries and the derived
//!   operation-index table (a wire contract with the flow VM)
//! - `check` — validates an expression against a component's resolution
//!   context without producing output
//! - `codegen` — lowers a checked expression to 16-bit stack-machine
//!   words (`instr` holds the bit packing)
//! - `eval` — tree-walking interpreter for expressions evaluated before
//!   any flow runs; identifiers are never evaluable there
//! - `model` — the component/flow/project slices and build-time
//!   allocator the passes resolve against
//!
//! All passes re-parse on demand and share no mutable state beyond the
//! caller's [`Assets`] instance, so concurrent checks against the same
//! project are safe.

pub mod check;
pub mod codegen;
pub mod error;
pub mod eval;
pub mod instr;
pub mod model;
pub mod ops;

pub use check::{
    check_assignable_expression, check_expression, check_template_literal,
    template_literal_to_expression,
};
pub use codegen::{build_assignable_expression, build_expression};
pub use error::{ExpressionError, Result};
pub use eval::{eval_constant_expression, try_eval_constant_expression};
pub use model::{
    Assets, Component, DataBuffer, EnumDef, ExprContext, ExpressionSource, Flow, Project,
};

pub use flow_expr_ast::{Expr, ExprKind, Span, Value};
pub use flow_expr_parser::{parse_expression, parse_identifier};
