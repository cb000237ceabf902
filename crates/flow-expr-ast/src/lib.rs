// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! AST types for flow expressions.
//!
//! This crate contains the expression AST, the literal value type, and the
//! source-span type shared by the parser and all semantic passes.

pub mod ast;
pub mod foundation;

pub use ast::{Expr, ExprKind};
pub use foundation::{Span, Value};
