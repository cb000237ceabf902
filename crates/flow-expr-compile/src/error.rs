//! Checker, compiler and evaluator errors.

use flow_expr_parser::ParseError;
use thiserror::Error;

/// Result alias for expression operations.
pub type Result<T> = std::result::Result<T, ExpressionError>;

/// Error raised while checking, compiling or evaluating an expression.
///
/// The checker and compilers propagate every variant to the caller; the
/// lossy evaluator surface catches them all and degrades to `None`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionError {
    /// Expression source failed to parse.
    #[error("syntax error: {0}")]
    Syntax(#[from] ParseError),

    /// Identifier is not an input, local variable or global variable.
    #[error("unknown identifier '{name}'")]
    UnknownIdentifier { name: String },

    /// Operator symbol is not in the registry for its node kind.
    #[error("unknown {kind} operator '{symbol}'")]
    UnknownOperator {
        symbol: String,
        kind: &'static str,
    },

    /// Call target is not a registered built-in function.
    #[error("unknown function '{name}'")]
    UnknownFunction { name: String },

    /// Dotted name is neither an enum nor a built-in constant.
    #[error("unknown constant '{name}'")]
    UnknownConstant { name: String },

    /// Enum exists but has no member with this name.
    #[error("enum '{enum_name}' has no member '{member}'")]
    UnknownEnumMember { enum_name: String, member: String },

    /// Call argument count does not match the function's fixed arity.
    #[error("function '{name}' expects {expected} argument(s), got {actual}")]
    ArityMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// Call target is not of the `namespace.function` shape.
    #[error("call target must be of the form 'namespace.function'")]
    InvalidCallShape,

    /// Member access other than `Identifier.Identifier`.
    #[error("unsupported member expression")]
    UnsupportedMemberExpression,

    /// Node kind parsed by the grammar but not lowered by any semantic
    /// pass (array and object literals).
    #[error("unsupported expression node: {kind}")]
    UnsupportedNode { kind: &'static str },

    /// Assignable compilation on a non-lvalue root.
    #[error("expression is not assignable")]
    NotAssignable,

    /// Compiler-side identifier resolution failure.
    ///
    /// The checker catches unknown identifiers first; hitting this means
    /// the expression was edited after checking, or the build context
    /// diverged from the check context.
    #[error("unresolved identifier '{name}'")]
    UnresolvedIdentifier { name: String },

    /// Constant evaluation reached an identifier, which has no binding
    /// at design time.
    #[error("cannot evaluate identifier '{name}' without a running flow")]
    CannotEvaluateIdentifier { name: String },

    /// Resolved operand does not fit in the 13-bit instruction field.
    #[error("{what} index {index} does not fit in an instruction operand")]
    IndexOutOfRange { what: &'static str, index: usize },

    /// Operator or function applied to operands outside its domain.
    #[error("invalid operands for '{op}'")]
    InvalidOperands { op: String },
}
