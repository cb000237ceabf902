//! Expression AST.
//!
//! One node kind per syntactic form. ASTs are strict trees: every child
//! is owned by exactly one parent and dropped with it. Nodes are built
//! once by the parser and never mutated afterwards.
//!
//! Operators are stored by their symbolic form (`"+"`, `"&&"`, `"~"`)
//! and resolved against the operator registries by the semantic passes;
//! an unknown symbol is a semantic error, not a parse error.

use crate::foundation::{Span, Value};

/// An expression node with its source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

/// The syntactic form of an expression node.
///
/// This union is closed on purpose: every walker (checker, compiler,
/// evaluator) matches exhaustively, so adding a variant here fails to
/// compile until each pass handles it.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Literal value: `42`, `"text"`, `true`, `null`.
    Literal(Value),
    /// Bare identifier: `speed`.
    Identifier(String),
    /// Arithmetic/bitwise or comparison operator: `a + b`, `a << b`, `a == b`.
    Binary {
        op: String,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Short-circuiting boolean operator: `a && b`, `a || b`.
    Logical {
        op: String,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Prefix operator: `-a`, `!a`, `~a`, `+a`.
    Unary { op: String, operand: Box<Expr> },
    /// Ternary conditional: `test ? consequent : alternate`.
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    /// Function call: `Math.sin(x)`.
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },
    /// Member access: `Color.RED` (`computed == false`) or `a[i]`
    /// (`computed == true`).
    Member {
        object: Box<Expr>,
        property: Box<Expr>,
        computed: bool,
    },
    /// Array literal: `[1, 2, 3]`. Parsed but reserved — no semantic
    /// pass lowers it yet.
    Array(Vec<Expr>),
    /// Object literal: `{ x: 1 }`. Parsed but reserved, like `Array`.
    Object(Vec<(String, Expr)>),
}

impl Expr {
    /// Create a new expression node.
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Name of this node's syntactic form, for diagnostics.
    pub fn describe(&self) -> &'static str {
        match &self.kind {
            ExprKind::Literal(_) => "literal",
            ExprKind::Identifier(_) => "identifier",
            ExprKind::Binary { .. } => "binary expression",
            ExprKind::Logical { .. } => "logical expression",
            ExprKind::Unary { .. } => "unary expression",
            ExprKind::Conditional { .. } => "conditional expression",
            ExprKind::Call { .. } => "call expression",
            ExprKind::Member { .. } => "member expression",
            ExprKind::Array(_) => "array literal",
            ExprKind::Object(_) => "object literal",
        }
    }

    /// If this node is a bare identifier, its name.
    pub fn as_identifier(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// If this node is a non-computed `Identifier.Identifier` member
    /// access, the `(object, property)` name pair.
    ///
    /// This is the shape required for enum members, built-in constants,
    /// and call targets (`namespace.function`).
    pub fn as_dotted_names(&self) -> Option<(&str, &str)> {
        match &self.kind {
            ExprKind::Member {
                object,
                property,
                computed: false,
            } => Some((object.as_identifier()?, property.as_identifier()?)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Expr {
        Expr::new(ExprKind::Identifier(name.to_string()), Span::zero())
    }

    #[test]
    fn dotted_names_require_plain_identifiers() {
        let member = Expr::new(
            ExprKind::Member {
                object: Box::new(ident("Math")),
                property: Box::new(ident("PI")),
                computed: false,
            },
            Span::zero(),
        );
        assert_eq!(member.as_dotted_names(), Some(("Math", "PI")));

        let computed = Expr::new(
            ExprKind::Member {
                object: Box::new(ident("a")),
                property: Box::new(Expr::new(
                    ExprKind::Literal(Value::Number(0.0)),
                    Span::zero(),
                )),
                computed: true,
            },
            Span::zero(),
        );
        assert_eq!(computed.as_dotted_names(), None);
    }
}
