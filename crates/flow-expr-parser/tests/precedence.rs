//! Operator precedence and associativity tests.
//!
//! Verifies the precedence climbing parser handles all precedence
//! levels, from the conditional operator at the bottom up to postfix
//! forms at the top.

use flow_expr_ast::{Expr, ExprKind};
use flow_expr_parser::parse_expression;

/// Helper to parse an expression from source.
fn parse(source: &str) -> Expr {
    parse_expression(source).expect("parse failed")
}

/// Helper to check if an expression is a binary operation with the
/// given symbol.
fn is_binary(expr: &Expr, expected_op: &str) -> bool {
    match &expr.kind {
        ExprKind::Binary { op, .. } => op == expected_op,
        _ => false,
    }
}

/// Helper to check if an expression is a logical operation with the
/// given symbol.
fn is_logical(expr: &Expr, expected_op: &str) -> bool {
    match &expr.kind {
        ExprKind::Logical { op, .. } => op == expected_op,
        _ => false,
    }
}

/// Helper to get left and right operands of a binary or logical
/// expression.
fn get_operands(expr: &Expr) -> Option<(&Expr, &Expr)> {
    match &expr.kind {
        ExprKind::Binary { left, right, .. } | ExprKind::Logical { left, right, .. } => {
            Some((left.as_ref(), right.as_ref()))
        }
        _ => None,
    }
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    // a + b * c parses as: a + (b * c)
    let expr = parse("a + b * c");
    assert!(is_binary(&expr, "+"));
    let (left, right) = get_operands(&expr).unwrap();
    assert!(matches!(left.kind, ExprKind::Identifier(_)));
    assert!(is_binary(right, "*"));
}

#[test]
fn addition_left_associative() {
    // a - b + c parses as: (a - b) + c
    let expr = parse("a - b + c");
    assert!(is_binary(&expr, "+"));
    let (left, _right) = get_operands(&expr).unwrap();
    assert!(is_binary(left, "-"));
}

#[test]
fn shift_binds_tighter_than_comparison() {
    // a << b < c parses as: (a << b) < c
    let expr = parse("a << b < c");
    assert!(is_binary(&expr, "<"));
    let (left, _right) = get_operands(&expr).unwrap();
    assert!(is_binary(left, "<<"));
}

#[test]
fn comparison_binds_tighter_than_equality() {
    // a == b < c parses as: a == (b < c)
    let expr = parse("a == b < c");
    assert!(is_binary(&expr, "=="));
    let (_left, right) = get_operands(&expr).unwrap();
    assert!(is_binary(right, "<"));
}

#[test]
fn equality_binds_tighter_than_bitwise_and() {
    // a & b == c parses as: a & (b == c)
    let expr = parse("a & b == c");
    assert!(is_binary(&expr, "&"));
    let (_left, right) = get_operands(&expr).unwrap();
    assert!(is_binary(right, "=="));
}

#[test]
fn bitwise_ladder() {
    // a | b ^ c & d parses as: a | (b ^ (c & d))
    let expr = parse("a | b ^ c & d");
    assert!(is_binary(&expr, "|"));
    let (_left, right) = get_operands(&expr).unwrap();
    assert!(is_binary(right, "^"));
    let (_left, right) = get_operands(right).unwrap();
    assert!(is_binary(right, "&"));
}

#[test]
fn logical_or_is_lowest_binary() {
    // a || b && c parses as: a || (b && c)
    let expr = parse("a || b && c");
    assert!(is_logical(&expr, "||"));
    let (_left, right) = get_operands(&expr).unwrap();
    assert!(is_logical(right, "&&"));
}

#[test]
fn logical_and_binds_tighter_than_or_but_looser_than_bitwise() {
    // a && b | c parses as: a && (b | c)
    let expr = parse("a && b | c");
    assert!(is_logical(&expr, "&&"));
    let (_left, right) = get_operands(&expr).unwrap();
    assert!(is_binary(right, "|"));
}

#[test]
fn comparisons_are_binary_nodes() {
    // Comparisons share the Binary kind with arithmetic; only && and ||
    // are Logical nodes.
    let expr = parse("a < b");
    assert!(matches!(expr.kind, ExprKind::Binary { .. }));
    let expr = parse("a && b");
    assert!(matches!(expr.kind, ExprKind::Logical { .. }));
}

#[test]
fn conditional_is_lowest() {
    // a || b ? c : d parses as: (a || b) ? c : d
    let expr = parse("a || b ? c : d");
    match &expr.kind {
        ExprKind::Conditional { test, .. } => assert!(is_logical(test, "||")),
        other => panic!("expected conditional, got {:?}", other),
    }
}

#[test]
fn conditional_right_associative() {
    // a ? b : c ? d : e parses as: a ? b : (c ? d : e)
    let expr = parse("a ? b : c ? d : e");
    match &expr.kind {
        ExprKind::Conditional { alternate, .. } => {
            assert!(matches!(alternate.kind, ExprKind::Conditional { .. }));
        }
        other => panic!("expected conditional, got {:?}", other),
    }
}

#[test]
fn unary_binds_tighter_than_binary() {
    // -a * b parses as: (-a) * b
    let expr = parse("-a * b");
    assert!(is_binary(&expr, "*"));
    let (left, _right) = get_operands(&expr).unwrap();
    assert!(matches!(left.kind, ExprKind::Unary { .. }));
}

#[test]
fn unary_operators_nest() {
    // !~a parses as: !(~a)
    let expr = parse("!~a");
    match &expr.kind {
        ExprKind::Unary { op, operand } => {
            assert_eq!(op, "!");
            assert!(matches!(&operand.kind, ExprKind::Unary { op, .. } if op == "~"));
        }
        other => panic!("expected unary, got {:?}", other),
    }
}

#[test]
fn parentheses_override_precedence() {
    // (a + b) * c parses as: (a + b) * c
    let expr = parse("(a + b) * c");
    assert!(is_binary(&expr, "*"));
    let (left, _right) = get_operands(&expr).unwrap();
    assert!(is_binary(left, "+"));
}

#[test]
fn postfix_binds_tighter_than_unary() {
    // -Math.abs(x) parses as: -(Math.abs(x))
    let expr = parse("-Math.abs(x)");
    match &expr.kind {
        ExprKind::Unary { operand, .. } => {
            assert!(matches!(operand.kind, ExprKind::Call { .. }));
        }
        other => panic!("expected unary, got {:?}", other),
    }
}
