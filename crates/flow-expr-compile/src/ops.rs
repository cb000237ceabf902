//! Operator, function and constant registries.
//!
//! Single source of truth for every operator's symbolic form, canonical
//! name and evaluation semantics, and for the derived dense operation
//! index table. Registry order is a wire contract with the flow virtual
//! machine: operation indexes are assigned by enumeration position and
//! never serialized alongside the bytecode, so reordering or inserting
//! an entry anywhere but the end breaks every built project.

use crate::error::{ExpressionError, Result};
use flow_expr_ast::Value;
use indexmap::IndexMap;
use std::sync::LazyLock;

/// Binary or logical operator descriptor.
pub struct BinaryOperator {
    /// Symbolic form as written in source (`"+"`, `"=="`).
    pub symbol: &'static str,
    /// Canonical name used for operation-index lookup (`"add"`).
    pub name: &'static str,
    /// Design-time evaluation semantics.
    pub eval: fn(&Value, &Value) -> Result<Value>,
}

/// Unary operator descriptor.
pub struct UnaryOperator {
    pub symbol: &'static str,
    pub name: &'static str,
    pub eval: fn(&Value) -> Result<Value>,
}

/// Built-in function descriptor.
pub struct BuiltInFunction {
    /// Qualified name as written in source (`"Math.sin"`).
    pub name: &'static str,
    /// Fixed argument count.
    pub arity: usize,
    /// Design-time evaluation semantics.
    pub eval: fn(&[Value]) -> Result<Value>,
}

/// Built-in constant descriptor.
pub struct BuiltInConstant {
    pub name: &'static str,
    pub value: f64,
}

/// Reserved operation name for the ternary conditional.
pub const CONDITIONAL_OPERATOR: &str = "conditional";

/// Arithmetic and bitwise operators, in wire order.
pub static BINARY_OPERATORS: [BinaryOperator; 10] = [
    BinaryOperator { symbol: "+", name: "add", eval: eval_add },
    BinaryOperator { symbol: "-", name: "sub", eval: eval_sub },
    BinaryOperator { symbol: "*", name: "mul", eval: eval_mul },
    BinaryOperator { symbol: "/", name: "div", eval: eval_div },
    BinaryOperator { symbol: "%", name: "mod", eval: eval_mod },
    BinaryOperator { symbol: "<<", name: "left_shift", eval: eval_left_shift },
    BinaryOperator { symbol: ">>", name: "right_shift", eval: eval_right_shift },
    BinaryOperator { symbol: "&", name: "binary_and", eval: eval_binary_and },
    BinaryOperator { symbol: "|", name: "binary_or", eval: eval_binary_or },
    BinaryOperator { symbol: "^", name: "binary_xor", eval: eval_binary_xor },
];

/// Comparison and boolean operators, in wire order.
///
/// Comparisons parse as binary nodes and boolean operators as logical
/// nodes, but all of them live in this registry for index assignment.
pub static LOGICAL_OPERATORS: [BinaryOperator; 8] = [
    BinaryOperator { symbol: "==", name: "equal", eval: eval_equal },
    BinaryOperator { symbol: "!=", name: "not_equal", eval: eval_not_equal },
    BinaryOperator { symbol: "<", name: "less", eval: eval_less },
    BinaryOperator { symbol: ">", name: "greater", eval: eval_greater },
    BinaryOperator { symbol: "<=", name: "less_or_equal", eval: eval_less_or_equal },
    BinaryOperator { symbol: ">=", name: "greater_or_equal", eval: eval_greater_or_equal },
    BinaryOperator { symbol: "&&", name: "logical_and", eval: eval_logical_and },
    BinaryOperator { symbol: "||", name: "logical_or", eval: eval_logical_or },
];

/// Prefix operators, in wire order.
pub static UNARY_OPERATORS: [UnaryOperator; 4] = [
    UnaryOperator { symbol: "+", name: "unary_plus", eval: eval_unary_plus },
    UnaryOperator { symbol: "-", name: "unary_minus", eval: eval_unary_minus },
    UnaryOperator { symbol: "~", name: "binary_one_complement", eval: eval_complement },
    UnaryOperator { symbol: "!", name: "not", eval: eval_not },
];

/// Built-in functions, in wire order.
pub static BUILT_IN_FUNCTIONS: [BuiltInFunction; 20] = [
    BuiltInFunction { name: "Math.sin", arity: 1, eval: fn_math_sin },
    BuiltInFunction { name: "Math.cos", arity: 1, eval: fn_math_cos },
    BuiltInFunction { name: "Math.tan", arity: 1, eval: fn_math_tan },
    BuiltInFunction { name: "Math.asin", arity: 1, eval: fn_math_asin },
    BuiltInFunction { name: "Math.acos", arity: 1, eval: fn_math_acos },
    BuiltInFunction { name: "Math.atan", arity: 1, eval: fn_math_atan },
    BuiltInFunction { name: "Math.sqrt", arity: 1, eval: fn_math_sqrt },
    BuiltInFunction { name: "Math.exp", arity: 1, eval: fn_math_exp },
    BuiltInFunction { name: "Math.log", arity: 1, eval: fn_math_log },
    BuiltInFunction { name: "Math.log10", arity: 1, eval: fn_math_log10 },
    BuiltInFunction { name: "Math.abs", arity: 1, eval: fn_math_abs },
    BuiltInFunction { name: "Math.floor", arity: 1, eval: fn_math_floor },
    BuiltInFunction { name: "Math.ceil", arity: 1, eval: fn_math_ceil },
    BuiltInFunction { name: "Math.round", arity: 1, eval: fn_math_round },
    BuiltInFunction { name: "Math.min", arity: 2, eval: fn_math_min },
    BuiltInFunction { name: "Math.max", arity: 2, eval: fn_math_max },
    BuiltInFunction { name: "Math.pow", arity: 2, eval: fn_math_pow },
    BuiltInFunction { name: "String.length", arity: 1, eval: fn_string_length },
    BuiltInFunction { name: "String.toUpperCase", arity: 1, eval: fn_string_to_upper_case },
    BuiltInFunction { name: "String.toLowerCase", arity: 1, eval: fn_string_to_lower_case },
];

/// Built-in constants.
pub static BUILT_IN_CONSTANTS: [BuiltInConstant; 3] = [
    BuiltInConstant { name: "Math.PI", value: std::f64::consts::PI },
    BuiltInConstant { name: "Math.E", value: std::f64::consts::E },
    BuiltInConstant { name: "Math.Infinity", value: f64::INFINITY },
];

/// Dense operation-index table, built once on first use.
///
/// Enumeration order: binary, logical, unary, `conditional`, functions;
/// sequential from 0.
pub static OPERATION_INDEXES: LazyLock<IndexMap<&'static str, u16>> =
    LazyLock::new(build_operation_indexes);

fn build_operation_indexes() -> IndexMap<&'static str, u16> {
    let mut indexes = IndexMap::new();
    let mut next = 0u16;
    for op in &BINARY_OPERATORS {
        indexes.insert(op.name, next);
        next += 1;
    }
    for op in &LOGICAL_OPERATORS {
        indexes.insert(op.name, next);
        next += 1;
    }
    for op in &UNARY_OPERATORS {
        indexes.insert(op.name, next);
        next += 1;
    }
    indexes.insert(CONDITIONAL_OPERATOR, next);
    next += 1;
    for function in &BUILT_IN_FUNCTIONS {
        indexes.insert(function.name, next);
        next += 1;
    }
    indexes
}

/// Operation index for a canonical operator name or qualified function
/// name.
pub fn operation_index(name: &str) -> Option<u16> {
    OPERATION_INDEXES.get(name).copied()
}

/// Find the operator for a binary AST node.
///
/// Comparisons parse as binary nodes, so the lookup falls through to
/// the logical registry when the symbol is not arithmetic or bitwise.
pub fn find_binary_operator(symbol: &str) -> Option<&'static BinaryOperator> {
    BINARY_OPERATORS
        .iter()
        .find(|op| op.symbol == symbol)
        .or_else(|| LOGICAL_OPERATORS.iter().find(|op| op.symbol == symbol))
}

/// Find the operator for a logical AST node (`&&`, `||`).
pub fn find_logical_operator(symbol: &str) -> Option<&'static BinaryOperator> {
    LOGICAL_OPERATORS.iter().find(|op| op.symbol == symbol)
}

/// Find the operator for a unary AST node.
pub fn find_unary_operator(symbol: &str) -> Option<&'static UnaryOperator> {
    UNARY_OPERATORS.iter().find(|op| op.symbol == symbol)
}

/// Find a built-in function by qualified name.
pub fn find_function(name: &str) -> Option<&'static BuiltInFunction> {
    BUILT_IN_FUNCTIONS.iter().find(|f| f.name == name)
}

/// Find a built-in constant by qualified name.
pub fn find_constant(name: &str) -> Option<&'static BuiltInConstant> {
    BUILT_IN_CONSTANTS.iter().find(|c| c.name == name)
}

// === Evaluation semantics ===

fn invalid(op: &str) -> ExpressionError {
    ExpressionError::InvalidOperands { op: op.to_string() }
}

fn number_operand(op: &str, value: &Value) -> Result<f64> {
    value.as_number().ok_or_else(|| invalid(op))
}

/// Bitwise operators work on the integer part of their operands.
fn int_operand(op: &str, value: &Value) -> Result<i64> {
    Ok(number_operand(op, value)? as i64)
}

fn arith(op: &str, l: &Value, r: &Value, f: fn(f64, f64) -> f64) -> Result<Value> {
    Ok(Value::Number(f(
        number_operand(op, l)?,
        number_operand(op, r)?,
    )))
}

fn bitwise(op: &str, l: &Value, r: &Value, f: fn(i64, i64) -> i64) -> Result<Value> {
    Ok(Value::Number(
        f(int_operand(op, l)?, int_operand(op, r)?) as f64,
    ))
}

/// Text form used by `+` string concatenation.
fn concat_text(value: &Value) -> String {
    match value {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
    }
}

fn eval_add(l: &Value, r: &Value) -> Result<Value> {
    match (l, r) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
        (Value::String(_), _) | (_, Value::String(_)) => Ok(Value::String(format!(
            "{}{}",
            concat_text(l),
            concat_text(r)
        ))),
        _ => Err(invalid("+")),
    }
}

fn eval_sub(l: &Value, r: &Value) -> Result<Value> {
    arith("-", l, r, |a, b| a - b)
}

fn eval_mul(l: &Value, r: &Value) -> Result<Value> {
    arith("*", l, r, |a, b| a * b)
}

fn eval_div(l: &Value, r: &Value) -> Result<Value> {
    // IEEE semantics: 1/0 is infinity, 0/0 is NaN
    arith("/", l, r, |a, b| a / b)
}

fn eval_mod(l: &Value, r: &Value) -> Result<Value> {
    arith("%", l, r, |a, b| a % b)
}

fn eval_left_shift(l: &Value, r: &Value) -> Result<Value> {
    bitwise("<<", l, r, |a, b| a.wrapping_shl(b as u32))
}

fn eval_right_shift(l: &Value, r: &Value) -> Result<Value> {
    bitwise(">>", l, r, |a, b| a.wrapping_shr(b as u32))
}

fn eval_binary_and(l: &Value, r: &Value) -> Result<Value> {
    bitwise("&", l, r, |a, b| a & b)
}

fn eval_binary_or(l: &Value, r: &Value) -> Result<Value> {
    bitwise("|", l, r, |a, b| a | b)
}

fn eval_binary_xor(l: &Value, r: &Value) -> Result<Value> {
    bitwise("^", l, r, |a, b| a ^ b)
}

/// Equality as the flow runtime defines it: values of different types
/// are never equal, numbers compare by IEEE semantics (`NaN != NaN`).
fn value_eq(l: &Value, r: &Value) -> bool {
    match (l, r) {
        (Value::Undefined, Value::Undefined) => true,
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        _ => false,
    }
}

fn eval_equal(l: &Value, r: &Value) -> Result<Value> {
    Ok(Value::Bool(value_eq(l, r)))
}

fn eval_not_equal(l: &Value, r: &Value) -> Result<Value> {
    Ok(Value::Bool(!value_eq(l, r)))
}

fn compare(op: &str, l: &Value, r: &Value, f: fn(std::cmp::Ordering) -> bool) -> Result<Value> {
    let ordering = match (l, r) {
        (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => return Err(invalid(op)),
    };
    // NaN comparisons are all false
    Ok(Value::Bool(ordering.map(f).unwrap_or(false)))
}

fn eval_less(l: &Value, r: &Value) -> Result<Value> {
    compare("<", l, r, std::cmp::Ordering::is_lt)
}

fn eval_greater(l: &Value, r: &Value) -> Result<Value> {
    compare(">", l, r, std::cmp::Ordering::is_gt)
}

fn eval_less_or_equal(l: &Value, r: &Value) -> Result<Value> {
    compare("<=", l, r, std::cmp::Ordering::is_le)
}

fn eval_greater_or_equal(l: &Value, r: &Value) -> Result<Value> {
    compare(">=", l, r, std::cmp::Ordering::is_ge)
}

/// Value-returning boolean operators: `a && b` yields `a` when `a` is
/// falsy, otherwise `b`. Short-circuiting is the evaluator's concern,
/// not the registry's.
fn eval_logical_and(l: &Value, r: &Value) -> Result<Value> {
    Ok(if l.is_truthy() { r.clone() } else { l.clone() })
}

fn eval_logical_or(l: &Value, r: &Value) -> Result<Value> {
    Ok(if l.is_truthy() { l.clone() } else { r.clone() })
}

fn eval_unary_plus(v: &Value) -> Result<Value> {
    Ok(Value::Number(number_operand("+", v)?))
}

fn eval_unary_minus(v: &Value) -> Result<Value> {
    Ok(Value::Number(-number_operand("-", v)?))
}

fn eval_complement(v: &Value) -> Result<Value> {
    Ok(Value::Number(!int_operand("~", v)? as f64))
}

fn eval_not(v: &Value) -> Result<Value> {
    Ok(Value::Bool(!v.is_truthy()))
}

fn math1(name: &str, args: &[Value], f: fn(f64) -> f64) -> Result<Value> {
    match args {
        [v] => Ok(Value::Number(f(number_operand(name, v)?))),
        _ => Err(ExpressionError::ArityMismatch {
            name: name.to_string(),
            expected: 1,
            actual: args.len(),
        }),
    }
}

fn math2(name: &str, args: &[Value], f: fn(f64, f64) -> f64) -> Result<Value> {
    match args {
        [a, b] => Ok(Value::Number(f(
            number_operand(name, a)?,
            number_operand(name, b)?,
        ))),
        _ => Err(ExpressionError::ArityMismatch {
            name: name.to_string(),
            expected: 2,
            actual: args.len(),
        }),
    }
}

fn string1(name: &'static str, args: &[Value], f: fn(&str) -> Value) -> Result<Value> {
    match args {
        [Value::String(s)] => Ok(f(s)),
        [_] => Err(invalid(name)),
        _ => Err(ExpressionError::ArityMismatch {
            name: name.to_string(),
            expected: 1,
            actual: args.len(),
        }),
    }
}

fn fn_math_sin(args: &[Value]) -> Result<Value> {
    math1("Math.sin", args, f64::sin)
}

fn fn_math_cos(args: &[Value]) -> Result<Value> {
    math1("Math.cos", args, f64::cos)
}

fn fn_math_tan(args: &[Value]) -> Result<Value> {
    math1("Math.tan", args, f64::tan)
}

fn fn_math_asin(args: &[Value]) -> Result<Value> {
    math1("Math.asin", args, f64::asin)
}

fn fn_math_acos(args: &[Value]) -> Result<Value> {
    math1("Math.acos", args, f64::acos)
}

fn fn_math_atan(args: &[Value]) -> Result<Value> {
    math1("Math.atan", args, f64::atan)
}

fn fn_math_sqrt(args: &[Value]) -> Result<Value> {
    math1("Math.sqrt", args, f64::sqrt)
}

fn fn_math_exp(args: &[Value]) -> Result<Value> {
    math1("Math.exp", args, f64::exp)
}

fn fn_math_log(args: &[Value]) -> Result<Value> {
    math1("Math.log", args, f64::ln)
}

fn fn_math_log10(args: &[Value]) -> Result<Value> {
    math1("Math.log10", args, f64::log10)
}

fn fn_math_abs(args: &[Value]) -> Result<Value> {
    math1("Math.abs", args, f64::abs)
}

fn fn_math_floor(args: &[Value]) -> Result<Value> {
    math1("Math.floor", args, f64::floor)
}

fn fn_math_ceil(args: &[Value]) -> Result<Value> {
    math1("Math.ceil", args, f64::ceil)
}

fn fn_math_round(args: &[Value]) -> Result<Value> {
    math1("Math.round", args, f64::round)
}

fn fn_math_min(args: &[Value]) -> Result<Value> {
    math2("Math.min", args, f64::min)
}

fn fn_math_max(args: &[Value]) -> Result<Value> {
    math2("Math.max", args, f64::max)
}

fn fn_math_pow(args: &[Value]) -> Result<Value> {
    math2("Math.pow", args, f64::powf)
}

fn fn_string_length(args: &[Value]) -> Result<Value> {
    string1("String.length", args, |s| {
        Value::Number(s.chars().count() as f64)
    })
}

fn fn_string_to_upper_case(args: &[Value]) -> Result<Value> {
    string1("String.toUpperCase", args, |s| {
        Value::String(s.to_uppercase())
    })
}

fn fn_string_to_lower_case(args: &[Value]) -> Result<Value> {
    string1("String.toLowerCase", args, |s| {
        Value::String(s.to_lowercase())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_indexes_pin_wire_order() {
        assert_eq!(operation_index("add"), Some(0));
        assert_eq!(operation_index("binary_xor"), Some(9));
        assert_eq!(operation_index("equal"), Some(10));
        assert_eq!(operation_index("logical_or"), Some(17));
        assert_eq!(operation_index("unary_plus"), Some(18));
        assert_eq!(operation_index("not"), Some(21));
        assert_eq!(operation_index(CONDITIONAL_OPERATOR), Some(22));
        assert_eq!(operation_index("Math.sin"), Some(23));
        assert_eq!(operation_index("String.toLowerCase"), Some(42));
        assert_eq!(OPERATION_INDEXES.len(), 43);
    }

    #[test]
    fn binary_lookup_falls_through_to_logical() {
        assert_eq!(find_binary_operator("+").map(|op| op.name), Some("add"));
        assert_eq!(find_binary_operator("<").map(|op| op.name), Some("less"));
        assert!(find_logical_operator("+").is_none());
        assert!(find_binary_operator("**").is_none());
    }

    #[test]
    fn arithmetic_and_concat() {
        let eval = find_binary_operator("+").unwrap().eval;
        assert_eq!(
            eval(&Value::Number(2.0), &Value::Number(3.0)).unwrap(),
            Value::Number(5.0)
        );
        assert_eq!(
            eval(&Value::from("a"), &Value::Number(1.0)).unwrap(),
            Value::from("a1")
        );
        assert_eq!(
            eval(&Value::Bool(true), &Value::Null),
            Err(ExpressionError::InvalidOperands {
                op: "+".to_string()
            })
        );
    }

    #[test]
    fn comparisons() {
        let less = find_binary_operator("<").unwrap().eval;
        assert_eq!(
            less(&Value::Number(1.0), &Value::Number(2.0)).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            less(&Value::from("a"), &Value::from("b")).unwrap(),
            Value::Bool(true)
        );
        // NaN compares false both ways
        assert_eq!(
            less(&Value::Number(f64::NAN), &Value::Number(1.0)).unwrap(),
            Value::Bool(false)
        );
        assert!(less(&Value::Number(1.0), &Value::from("b")).is_err());
    }

    #[test]
    fn equality_ignores_bit_patterns() {
        let eq = find_binary_operator("==").unwrap().eval;
        assert_eq!(
            eq(&Value::Number(f64::NAN), &Value::Number(f64::NAN)).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            eq(&Value::Number(0.0), &Value::Number(-0.0)).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            eq(&Value::Number(0.0), &Value::Bool(false)).unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn logical_operators_return_operand_values() {
        let and = find_logical_operator("&&").unwrap().eval;
        let or = find_logical_operator("||").unwrap().eval;
        assert_eq!(
            and(&Value::Number(0.0), &Value::from("x")).unwrap(),
            Value::Number(0.0)
        );
        assert_eq!(
            and(&Value::Bool(true), &Value::from("x")).unwrap(),
            Value::from("x")
        );
        assert_eq!(
            or(&Value::Number(0.0), &Value::from("x")).unwrap(),
            Value::from("x")
        );
    }

    #[test]
    fn bitwise_truncates_to_integer() {
        let and = find_binary_operator("&").unwrap().eval;
        assert_eq!(
            and(&Value::Number(6.9), &Value::Number(3.0)).unwrap(),
            Value::Number(2.0)
        );
        let shl = find_binary_operator("<<").unwrap().eval;
        assert_eq!(
            shl(&Value::Number(1.0), &Value::Number(4.0)).unwrap(),
            Value::Number(16.0)
        );
    }

    #[test]
    fn unary_semantics() {
        let not = find_unary_operator("!").unwrap().eval;
        assert_eq!(not(&Value::Number(0.0)).unwrap(), Value::Bool(true));
        let neg = find_unary_operator("-").unwrap().eval;
        assert_eq!(neg(&Value::Number(2.5)).unwrap(), Value::Number(-2.5));
        assert!(neg(&Value::from("x")).is_err());
    }

    #[test]
    fn function_semantics() {
        let sqrt = find_function("Math.sqrt").unwrap();
        assert_eq!(sqrt.arity, 1);
        assert_eq!(
            (sqrt.eval)(&[Value::Number(9.0)]).unwrap(),
            Value::Number(3.0)
        );

        let length = find_function("String.length").unwrap();
        assert_eq!(
            (length.eval)(&[Value::from("héllo")]).unwrap(),
            Value::Number(5.0)
        );
        assert!((length.eval)(&[Value::Number(1.0)]).is_err());
    }

    #[test]
    fn constants() {
        assert_eq!(
            find_constant("Math.PI").map(|c| c.value),
            Some(std::f64::consts::PI)
        );
        assert!(find_constant("Math.TAU").is_none());
    }
}
